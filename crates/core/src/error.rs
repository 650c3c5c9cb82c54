//! Error types for the Cook data model.

/// Result type for model construction and decoding.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while building or decoding model entities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A mandatory construction field was absent.
    #[error("\"{field}\" is required")]
    MissingRequired { field: String },

    /// A field held a value of the wrong JSON kind.
    #[error("expected {expected} for \"{field}\", got {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: &'static str,
    },

    /// A field held a value of the right kind that the scheduler cannot accept.
    #[error("invalid value for \"{field}\": {reason}")]
    InvalidValue { field: String, reason: String },

    /// A server response lacked a required key.
    #[error("response is missing required field \"{field}\"")]
    MissingField { field: String },
}

impl ModelError {
    /// Name of the field the error refers to.
    pub fn field(&self) -> &str {
        match self {
            Self::MissingRequired { field }
            | Self::TypeMismatch { field, .. }
            | Self::InvalidValue { field, .. }
            | Self::MissingField { field } => field,
        }
    }
}
