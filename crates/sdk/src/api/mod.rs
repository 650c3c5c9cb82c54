//! API endpoint groups.

pub mod jobs;

pub use jobs::{JobsApi, ListJobsQuery};
