//! Example: submitting a job and watching it run.
//!
//! Reads connection settings from the TOML file named by `COOK_CONFIG`
//! (default `cook.toml`):
//!
//! ```toml
//! base_url = "http://localhost:12321"
//! username = "alice"
//! password = "secret"
//! ```
//!
//! Run with: cargo run --example submit_job

use cook_sdk::{ClientConfig, CookClient, CookResult, FetchUri, Job, ListJobsQuery};
use std::thread;
use std::time::Duration;

fn main() -> CookResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    let config_path = std::env::var("COOK_CONFIG").unwrap_or_else(|_| "cook.toml".to_string());
    let config = ClientConfig::load(&config_path)?;
    let user = config.credentials.username.clone();
    let client = CookClient::from_config(config)?;

    let job = Job::builder("hello-cook", Job::generate_uuid(), 50, "./hello.sh && sleep 5", 2)
        .cpus(0.5)
        .mem(64.0)
        .max_runtime(60_000)
        .uri(
            FetchUri::builder("https://example.com/artifacts/hello.sh")
                .executable(true)
                .cache(true)
                .build(),
        )
        .env("GREETING", "hello")
        .build()?;

    println!("Submitting job {}...", job.uuid());
    let response = client.jobs().submit_one(&job)?;
    println!("Scheduler said: {}", response.trim());

    for _ in 0..30 {
        thread::sleep(Duration::from_secs(2));

        let statuses = client.jobs().status_one(job.uuid())?;
        let Some(status) = statuses.first() else {
            continue;
        };
        println!(
            "  Status: {}, attempts: {}",
            status.status(),
            status.instances().len()
        );

        if status.status() == "completed" {
            if let Some(instance) = status.latest_instance() {
                println!(
                    "  Finished on {} with {}, output at {}",
                    instance.hostname().unwrap_or("?"),
                    instance.status(),
                    instance.output_url().unwrap_or("?")
                );
            }
            break;
        }
    }

    let recent = client
        .jobs()
        .list(&ListJobsQuery::new(user, ["running", "waiting"]).limit(10))?;
    println!("\n{} of your jobs are still in flight", recent.len());

    Ok(())
}
