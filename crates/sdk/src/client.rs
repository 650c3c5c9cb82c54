//! Main client for the Cook SDK.

use crate::api::JobsApi;
use crate::config::ClientConfig;
use crate::error::{CookError, CookResult};
use crate::transport::HttpTransport;
use std::sync::Arc;
use url::Url;

/// Main client for interacting with a Cook scheduler.
#[derive(Debug, Clone)]
pub struct CookClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
}

impl CookClient {
    /// Create a new client builder.
    pub fn builder() -> CookClientBuilder {
        CookClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(config: ClientConfig) -> CookResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self { config, http })
    }

    /// Get the jobs API.
    pub fn jobs(&self) -> JobsApi<'_> {
        JobsApi::new(self)
    }

    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    pub fn username(&self) -> &str {
        &self.config.credentials.username
    }
}

/// Builder for creating a CookClient.
#[derive(Debug, Default)]
pub struct CookClientBuilder {
    base_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

impl CookClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL of the Cook scheduler.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> CookResult<CookClient> {
        let base_url_str = self
            .base_url
            .ok_or_else(|| CookError::Config("base_url is required".to_string()))?;
        let username = self
            .username
            .ok_or_else(|| CookError::Config("username is required".to_string()))?;
        let password = self
            .password
            .ok_or_else(|| CookError::Config("password is required".to_string()))?;

        let base_url = Url::parse(&base_url_str)?;

        CookClient::from_config(ClientConfig::new(base_url, username, password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_base_url() {
        let result = CookClient::builder().username("alice").password("secret").build();
        assert!(matches!(result, Err(CookError::Config(ref m)) if m.contains("base_url")));
    }

    #[test]
    fn test_builder_requires_credentials() {
        let result = CookClient::builder()
            .base_url("http://localhost:12321")
            .password("secret")
            .build();
        assert!(matches!(result, Err(CookError::Config(ref m)) if m.contains("username")));

        let result = CookClient::builder()
            .base_url("http://localhost:12321")
            .username("alice")
            .build();
        assert!(matches!(result, Err(CookError::Config(ref m)) if m.contains("password")));
    }

    #[test]
    fn test_builder() {
        let client = CookClient::builder()
            .base_url("http://localhost:12321")
            .username("alice")
            .password("secret")
            .build()
            .unwrap();

        assert_eq!(client.base_url().as_str(), "http://localhost:12321/");
        assert_eq!(client.username(), "alice");
    }

    #[test]
    fn test_builder_rejects_bad_url() {
        let result = CookClient::builder()
            .base_url("localhost without scheme")
            .username("alice")
            .password("secret")
            .build();
        assert!(matches!(result, Err(CookError::InvalidUrl(_))));
    }
}
