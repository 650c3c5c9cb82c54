//! HTTP transport layer for the Cook SDK.

use crate::config::ClientConfig;
use crate::error::{CookError, CookResult};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Blocking HTTP transport that authenticates every request.
///
/// Each call sends exactly one request; nothing is retried.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> CookResult<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    /// Attach credentials, send, and reject non-success statuses.
    fn execute(&self, request_builder: RequestBuilder) -> CookResult<Response> {
        let credentials = &self.config.credentials;
        let response = request_builder
            .basic_auth(&credentials.username, Some(&credentials.password))
            .send()?;

        let status = response.status();
        debug!(status = status.as_u16(), "Response received");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        warn!(status = status.as_u16(), "Request rejected by scheduler");
        Err(CookError::from_response(status.as_u16(), &body))
    }

    fn decode<T: DeserializeOwned>(response: Response) -> CookResult<T> {
        let text = response.text()?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Execute a GET request with query parameters.
    pub fn get<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> CookResult<T> {
        let url = self.config.endpoint(path)?;
        debug!(url = %url, "GET request");

        let response = self.execute(self.client.get(url).query(query))?;
        Self::decode(response)
    }

    /// Execute a POST request with a JSON body, returning the raw response text.
    pub fn post_text<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> CookResult<String> {
        let url = self.config.endpoint(path)?;
        debug!(url = %url, "POST request");

        let response = self.execute(self.client.post(url).json(body))?;
        Ok(response.text()?)
    }

    /// Execute a POST request carrying only query parameters.
    pub fn post_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> CookResult<T> {
        let url = self.config.endpoint(path)?;
        debug!(url = %url, "POST request with query");

        let response = self.execute(self.client.post(url).query(query))?;
        Self::decode(response)
    }

    /// Execute a DELETE request with query parameters.
    pub fn delete<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> CookResult<T> {
        let url = self.config.endpoint(path)?;
        debug!(url = %url, "DELETE request");

        let response = self.execute(self.client.delete(url).query(query))?;
        Self::decode(response)
    }
}
