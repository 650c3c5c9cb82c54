//! Configuration types for the Cook SDK.

use crate::error::{CookError, CookResult};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use url::Url;

/// Configuration for the Cook client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Cook scheduler.
    pub base_url: Url,
    /// Basic-auth credentials sent with every request.
    pub credentials: Credentials,
}

impl ClientConfig {
    /// Create a new configuration with the given base URL and credentials.
    pub fn new(base_url: Url, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            base_url,
            credentials: Credentials::new(username, password),
        }
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> CookResult<Self> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| CookError::Config(format!("Failed to parse configuration: {}", e)))?;
        let base_url = Url::parse(&file.base_url)?;

        Ok(Self::new(base_url, file.username, file.password))
    }

    /// Load a configuration file from disk.
    pub fn load(path: impl AsRef<Path>) -> CookResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CookError::Config(format!(
                "Failed to read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;
        tracing::debug!(path = %path.display(), "Loaded client configuration");

        Self::from_toml_str(&content)
    }

    /// Full URL of an endpoint under the base URL.
    ///
    /// The base path and query are kept, so `https://host/cook?tenant=a`
    /// yields `https://host/cook/rawscheduler?tenant=a`. Any fragment is
    /// dropped.
    pub fn endpoint(&self, path: &str) -> CookResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                CookError::Config(format!("base_url {} cannot hold a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        url.set_fragment(None);
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    base_url: String,
    username: String,
    password: String,
}

/// Username and password for HTTP basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config(base: &str) -> ClientConfig {
        ClientConfig::new(Url::parse(base).unwrap(), "alice", "secret")
    }

    #[test]
    fn test_client_config_new() {
        let url = Url::parse("https://cook.example.com").unwrap();
        let config = ClientConfig::new(url.clone(), "alice", "secret");

        assert_eq!(config.base_url, url);
        assert_eq!(config.credentials.username, "alice");
        assert_eq!(config.credentials.password, "secret");
    }

    #[test]
    fn test_endpoint() {
        let url = config("http://localhost:12321").endpoint("rawscheduler").unwrap();
        assert_eq!(url.as_str(), "http://localhost:12321/rawscheduler");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let url = config("https://gateway.example.com/cook").endpoint("/list").unwrap();
        assert_eq!(url.as_str(), "https://gateway.example.com/cook/list");

        let url = config("https://gateway.example.com/cook/").endpoint("retry").unwrap();
        assert_eq!(url.as_str(), "https://gateway.example.com/cook/retry");
    }

    #[test]
    fn test_endpoint_keeps_base_query() {
        let url = config("https://gw.example.com/cook?tenant=a")
            .endpoint("rawscheduler")
            .unwrap();
        assert_eq!(url.path(), "/cook/rawscheduler");
        assert_eq!(url.query(), Some("tenant=a"));
        assert_eq!(url.as_str(), "https://gw.example.com/cook/rawscheduler?tenant=a");

        let url = config("https://gw.example.com/cook/#top").endpoint("list").unwrap();
        assert_eq!(url.as_str(), "https://gw.example.com/cook/list");
    }

    #[test]
    fn test_endpoint_rejects_opaque_base() {
        let result = config("mailto:ops@example.com").endpoint("list");
        assert!(matches!(result, Err(CookError::Config(_))));
    }

    #[test]
    fn test_password_is_redacted() {
        let debug = format!("{:?}", config("http://localhost:12321"));

        assert!(debug.contains("alice"));
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_from_toml_str() {
        let config = ClientConfig::from_toml_str(
            r#"
            base_url = "https://cook.example.com"
            username = "alice"
            password = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url.as_str(), "https://cook.example.com/");
        assert_eq!(config.credentials, Credentials::new("alice", "secret"));
    }

    #[test]
    fn test_from_toml_str_missing_key() {
        let result = ClientConfig::from_toml_str(r#"base_url = "https://cook.example.com""#);
        assert!(matches!(result, Err(CookError::Config(_))));
    }

    #[test]
    fn test_from_toml_str_bad_url() {
        let result = ClientConfig::from_toml_str(
            r#"
            base_url = "not a url"
            username = "alice"
            password = "secret"
            "#,
        );
        assert!(matches!(result, Err(CookError::InvalidUrl(_))));
    }

    #[test]
    fn test_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"http://localhost:12321\"").unwrap();
        writeln!(file, "username = \"bob\"").unwrap();
        writeln!(file, "password = \"hunter2\"").unwrap();

        let config = ClientConfig::load(file.path()).unwrap();
        assert_eq!(config.credentials.username, "bob");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ClientConfig::load(dir.path().join("cook.toml"));

        assert!(matches!(result, Err(CookError::Config(_))));
    }
}
