//! Error types for the Cook SDK.

use cook_core::ModelError;

/// Result type for SDK operations.
pub type CookResult<T> = Result<T, CookError>;

/// Error types that can occur when talking to a Cook scheduler.
#[derive(Debug, thiserror::Error)]
pub enum CookError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Scheduler answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// A job could not be built or a response could not be decoded.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Response body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl CookError {
    /// Create an API error from a status code and the raw response body.
    ///
    /// The body is kept verbatim; error responses are never parsed.
    pub fn from_response(status: u16, body: &str) -> Self {
        Self::Api {
            status,
            message: body.to_string(),
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
