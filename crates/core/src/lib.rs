//! Data model for the Cook batch scheduler REST API.
//!
//! [`Job`] and [`FetchUri`] are built by callers and serialized for
//! submission. [`JobStatus`] and [`JobInstance`] are only ever decoded from
//! server responses.

pub mod error;
pub mod fetch_uri;
pub mod job;
pub mod status;
pub mod validate;

pub use error::{ModelError, ModelResult};
pub use fetch_uri::{FetchUri, FetchUriBuilder};
pub use job::{Job, JobBuilder};
pub use status::{JobInstance, JobStatus};
pub use validate::{check_field, JsonKind};
