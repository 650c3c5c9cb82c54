//! Jobs API endpoints.

use crate::client::CookClient;
use crate::error::{CookError, CookResult};
use cook_core::{Job, JobStatus};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

const RAWSCHEDULER: &str = "rawscheduler";
const RETRY: &str = "retry";
const LIST: &str = "list";

/// Jobs API for submitting, inspecting and controlling jobs.
///
/// Every method sends exactly one blocking request.
pub struct JobsApi<'a> {
    client: &'a CookClient,
}

impl<'a> JobsApi<'a> {
    pub(crate) fn new(client: &'a CookClient) -> Self {
        Self { client }
    }

    /// Submit jobs, returning the scheduler's raw response text.
    pub fn submit(&self, jobs: &[Job]) -> CookResult<String> {
        if jobs.is_empty() {
            return Err(CookError::InvalidInput(
                "at least one job is required".to_string(),
            ));
        }
        debug!(count = jobs.len(), "Submitting jobs");

        self.client
            .http
            .post_text(RAWSCHEDULER, &SubmitJobsRequest { jobs })
    }

    pub fn submit_one(&self, job: &Job) -> CookResult<String> {
        self.submit(std::slice::from_ref(job))
    }

    /// Fetch the status of jobs by uuid.
    pub fn status<S: AsRef<str>>(&self, job_ids: &[S]) -> CookResult<Vec<JobStatus>> {
        let query = job_query(job_ids)?;
        let body: Vec<Value> = self.client.http.get(RAWSCHEDULER, &query)?;
        decode_statuses(&body)
    }

    pub fn status_one(&self, job_id: &str) -> CookResult<Vec<JobStatus>> {
        self.status(&[job_id])
    }

    /// Kill jobs by uuid.
    pub fn delete<S: AsRef<str>>(&self, job_ids: &[S]) -> CookResult<Value> {
        let query = job_query(job_ids)?;
        self.client.http.delete(RAWSCHEDULER, &query)
    }

    pub fn delete_one(&self, job_id: &str) -> CookResult<Value> {
        self.delete(&[job_id])
    }

    /// Grant a job `retries` total attempts.
    pub fn retry(&self, job_id: &str, retries: u32) -> CookResult<Value> {
        let retries = retries.to_string();
        let query = [("job", job_id), ("retries", retries.as_str())];
        self.client.http.post_query(RETRY, &query)
    }

    /// List a user's jobs in the given states.
    pub fn list(&self, query: &ListJobsQuery) -> CookResult<Vec<JobStatus>> {
        let params = query.params()?;
        let body: Vec<Value> = self.client.http.get(LIST, &params)?;
        decode_statuses(&body)
    }
}

#[derive(Serialize)]
struct SubmitJobsRequest<'a> {
    jobs: &'a [Job],
}

fn job_query<S: AsRef<str>>(job_ids: &[S]) -> CookResult<Vec<(&'static str, &str)>> {
    if job_ids.is_empty() {
        return Err(CookError::InvalidInput(
            "at least one job uuid is required".to_string(),
        ));
    }
    Ok(job_ids.iter().map(|id| ("job", id.as_ref())).collect())
}

fn decode_statuses(body: &[Value]) -> CookResult<Vec<JobStatus>> {
    Ok(body
        .iter()
        .map(JobStatus::from_json)
        .collect::<Result<Vec<_>, _>>()?)
}

/// Filter for [`JobsApi::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListJobsQuery {
    user: String,
    states: Vec<String>,
    start_ms: Option<i64>,
    end_ms: Option<i64>,
    limit: Option<u32>,
}

impl ListJobsQuery {
    /// Jobs owned by `user` in any of `states`.
    pub fn new<S: Into<String>>(user: impl Into<String>, states: impl IntoIterator<Item = S>) -> Self {
        Self {
            user: user.into(),
            states: states.into_iter().map(Into::into).collect(),
            start_ms: None,
            end_ms: None,
            limit: None,
        }
    }

    pub fn for_state(user: impl Into<String>, state: impl Into<String>) -> Self {
        let state: String = state.into();
        Self::new(user, [state])
    }

    /// Only jobs submitted at or after this time, in epoch milliseconds.
    pub fn start_ms(mut self, start_ms: i64) -> Self {
        self.start_ms = Some(start_ms);
        self
    }

    /// Only jobs submitted before this time, in epoch milliseconds.
    pub fn end_ms(mut self, end_ms: i64) -> Self {
        self.end_ms = Some(end_ms);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query parameters in request order. States are joined with `+`.
    fn params(&self) -> CookResult<Vec<(&'static str, String)>> {
        if self.states.is_empty() {
            return Err(CookError::InvalidInput(
                "at least one state is required".to_string(),
            ));
        }

        let mut params = vec![
            ("user", self.user.clone()),
            ("state", self.states.join("+")),
        ];
        if let Some(start_ms) = self.start_ms {
            params.push(("start_ms", start_ms.to_string()));
        }
        if let Some(end_ms) = self.end_ms {
            params.push(("end_ms", end_ms.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        Ok(params)
    }
}
