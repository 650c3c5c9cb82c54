//! # Cook SDK
//!
//! Blocking Rust client for the Cook batch scheduler REST API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cook_sdk::{CookClient, CookResult, Job, ListJobsQuery};
//!
//! fn main() -> CookResult<()> {
//!     let client = CookClient::builder()
//!         .base_url("http://localhost:12321")
//!         .username("alice")
//!         .password("secret")
//!         .build()?;
//!
//!     // Submit a job
//!     let job = Job::builder("sleepy", Job::generate_uuid(), 50, "sleep 10", 3)
//!         .cpus(1.0)
//!         .mem(128.0)
//!         .build()?;
//!     client.jobs().submit_one(&job)?;
//!
//!     // Check on it
//!     for status in client.jobs().status_one(job.uuid())? {
//!         println!("{} is {}", status.uuid(), status.status());
//!     }
//!
//!     // List everything still in flight
//!     let query = ListJobsQuery::new("alice", ["running", "waiting"]).limit(20);
//!     let running = client.jobs().list(&query)?;
//!     println!("{} jobs in flight", running.len());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

#[cfg(test)]
mod test_support;

// Re-export main client
pub use api::{JobsApi, ListJobsQuery};
pub use client::{CookClient, CookClientBuilder};
pub use config::{ClientConfig, Credentials};
pub use error::{CookError, CookResult};

// Re-export the data model for convenience
pub use cook_core::{
    FetchUri, FetchUriBuilder, Job, JobBuilder, JobInstance, JobStatus, ModelError,
};
