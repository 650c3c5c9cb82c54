//! Server-reported job state.
//!
//! Decoding is lenient: required keys must be present with a scalar value,
//! and optional values of an unexpected kind decode as absent.

use crate::error::{ModelError, ModelResult};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Current state of a previously submitted job.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct JobStatus {
    uuid: String,
    framework_id: Option<String>,
    status: String,
    instances: Vec<JobInstance>,
    cpus: Option<f64>,
    mem: Option<f64>,
    gpus: Option<f64>,
}

impl JobStatus {
    /// Decode one element of a status or list response.
    pub fn from_json(json: &Value) -> ModelResult<Self> {
        let empty = Map::new();
        let object = json.as_object().unwrap_or(&empty);

        let uuid = required_text(object, "uuid")?;
        let framework_id = text(required(object, "framework_id")?);
        let status = required_text(object, "status")?;
        let instances = match required(object, "instances")? {
            Value::Array(items) => items
                .iter()
                .map(JobInstance::from_json)
                .collect::<ModelResult<Vec<_>>>()?,
            _ => Vec::new(),
        };

        Ok(Self {
            uuid,
            framework_id,
            status,
            instances,
            cpus: object.get("cpus").and_then(Value::as_f64),
            mem: object.get("mem").and_then(Value::as_f64),
            gpus: object.get("gpus").and_then(Value::as_f64),
        })
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// Identifier of the framework that accepted the job, if assigned yet.
    pub fn framework_id(&self) -> Option<&str> {
        self.framework_id.as_deref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Execution attempts in the order the server reported them.
    pub fn instances(&self) -> &[JobInstance] {
        &self.instances
    }

    pub fn latest_instance(&self) -> Option<&JobInstance> {
        self.instances.last()
    }

    pub fn cpus(&self) -> Option<f64> {
        self.cpus
    }

    pub fn mem(&self) -> Option<f64> {
        self.mem
    }

    pub fn gpus(&self) -> Option<f64> {
        self.gpus
    }
}

impl TryFrom<Value> for JobStatus {
    type Error = ModelError;

    fn try_from(json: Value) -> ModelResult<Self> {
        Self::from_json(&json)
    }
}

/// One execution attempt of a job.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct JobInstance {
    status: String,
    start_time: Option<i64>,
    end_time: Option<i64>,
    task_id: Option<String>,
    hostname: Option<String>,
    ports: Option<Vec<u32>>,
    slave_id: Option<String>,
    executor_id: Option<String>,
    output_url: Option<String>,
}

impl JobInstance {
    pub fn from_json(json: &Value) -> ModelResult<Self> {
        let empty = Map::new();
        let object = json.as_object().unwrap_or(&empty);

        let status = required_text(object, "status")?;
        let ports = object.get("ports").and_then(Value::as_array).map(|ports| {
            ports
                .iter()
                .filter_map(Value::as_u64)
                .filter_map(|port| u32::try_from(port).ok())
                .collect()
        });

        Ok(Self {
            status,
            start_time: object.get("start_time").and_then(Value::as_i64),
            end_time: object.get("end_time").and_then(Value::as_i64),
            task_id: optional_text(object, "task_id"),
            hostname: optional_text(object, "hostname"),
            ports,
            slave_id: optional_text(object, "slave_id"),
            executor_id: optional_text(object, "executor_id"),
            output_url: optional_text(object, "output_url"),
        })
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Start time in milliseconds since the Unix epoch.
    pub fn start_time(&self) -> Option<i64> {
        self.start_time
    }

    /// End time in milliseconds since the Unix epoch.
    pub fn end_time(&self) -> Option<i64> {
        self.end_time
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.start_time.and_then(DateTime::from_timestamp_millis)
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.end_time.and_then(DateTime::from_timestamp_millis)
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    pub fn ports(&self) -> Option<&[u32]> {
        self.ports.as_deref()
    }

    pub fn slave_id(&self) -> Option<&str> {
        self.slave_id.as_deref()
    }

    pub fn executor_id(&self) -> Option<&str> {
        self.executor_id.as_deref()
    }

    /// URL of the sandbox directory holding the attempt's output.
    pub fn output_url(&self) -> Option<&str> {
        self.output_url.as_deref()
    }
}

impl TryFrom<Value> for JobInstance {
    type Error = ModelError;

    fn try_from(json: Value) -> ModelResult<Self> {
        Self::from_json(&json)
    }
}

fn required<'a>(object: &'a Map<String, Value>, key: &str) -> ModelResult<&'a Value> {
    object.get(key).ok_or_else(|| ModelError::MissingField {
        field: key.to_string(),
    })
}

/// A required key that must also carry a scalar; `null` counts as missing.
fn required_text(object: &Map<String, Value>, key: &str) -> ModelResult<String> {
    text(required(object, key)?).ok_or_else(|| ModelError::MissingField {
        field: key.to_string(),
    })
}

/// Scalars as text; `null` and containers read as absent.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn optional_text(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(text)
}
