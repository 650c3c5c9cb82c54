//! Job submission payloads.

use crate::error::{ModelError, ModelResult};
use crate::fetch_uri::FetchUri;
use crate::validate::{check_field, present, JsonKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A unit of work submitted to the scheduler.
///
/// Jobs are immutable once built. Use [`Job::builder`] when the fields are
/// known at compile time, or [`Job::from_json`] to validate an untyped
/// mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Job {
    name: String,
    uuid: String,
    priority: i32,
    command: String,
    max_retries: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_runtime: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cpus: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mem: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gpus: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ports: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uris: Option<Vec<FetchUri>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    env: Option<BTreeMap<String, String>>,
}

impl Job {
    /// Start building a job from its mandatory fields.
    pub fn builder(
        name: impl Into<String>,
        uuid: impl Into<String>,
        priority: i32,
        command: impl Into<String>,
        max_retries: u32,
    ) -> JobBuilder {
        JobBuilder {
            job: Job {
                name: name.into(),
                uuid: uuid.into(),
                priority,
                command: command.into(),
                max_retries,
                max_runtime: None,
                cpus: None,
                mem: None,
                gpus: None,
                ports: None,
                uris: None,
                env: None,
            },
        }
    }

    /// A fresh random identifier suitable for [`Job::builder`].
    pub fn generate_uuid() -> String {
        Uuid::new_v4().to_string()
    }

    /// Build a job from an untyped JSON mapping.
    ///
    /// Every field is checked for presence and kind before anything is
    /// constructed. `uris` entries are raw mappings checked the same way.
    pub fn from_json(json: &Value) -> ModelResult<Self> {
        check_field("job", Some(json), &[JsonKind::Object], true)?;
        let object = json.as_object().ok_or_else(|| ModelError::MissingRequired {
            field: "job".to_string(),
        })?;

        let name = required_string(object, "name")?;
        let uuid = required_string(object, "uuid")?;
        let priority = required("priority", integer(object, "priority", true)?)?;
        let command = required_string(object, "command")?;
        let max_retries = required("max_retries", integer(object, "max_retries", true)?)?;

        let max_runtime = integer(object, "max_runtime", false)?;
        let cpus = number(object, "cpus")?;
        let mem = number(object, "mem")?;
        let gpus = integer(object, "gpus", false)?;
        let ports = integer(object, "ports", false)?;
        let uris = uris(object)?;
        let env = env(object)?;

        let job = Self {
            name,
            uuid,
            priority,
            command,
            max_retries,
            max_runtime,
            cpus,
            mem,
            gpus,
            ports,
            uris,
            env,
        };
        job.validate()?;
        Ok(job)
    }

    /// Invariants the field types cannot express.
    ///
    /// Resource amounts must be finite, since JSON has no NaN or infinity.
    fn validate(&self) -> ModelResult<()> {
        for (field, value) in [("cpus", self.cpus), ("mem", self.mem)] {
            if let Some(value) = value.filter(|v| !v.is_finite()) {
                return Err(ModelError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("{} is not a finite number", value),
                });
            }
        }
        Ok(())
    }

    /// Serialize to the submission shape.
    ///
    /// Unset optional fields are left out entirely rather than sent as null.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Maximum runtime in milliseconds.
    pub fn max_runtime(&self) -> Option<u64> {
        self.max_runtime
    }

    pub fn cpus(&self) -> Option<f64> {
        self.cpus
    }

    /// Memory in megabytes.
    pub fn mem(&self) -> Option<f64> {
        self.mem
    }

    pub fn gpus(&self) -> Option<u32> {
        self.gpus
    }

    pub fn ports(&self) -> Option<u32> {
        self.ports
    }

    pub fn uris(&self) -> Option<&[FetchUri]> {
        self.uris.as_deref()
    }

    pub fn env(&self) -> Option<&BTreeMap<String, String>> {
        self.env.as_ref()
    }
}

impl TryFrom<&Value> for Job {
    type Error = ModelError;

    fn try_from(json: &Value) -> ModelResult<Self> {
        Self::from_json(json)
    }
}

impl TryFrom<Value> for Job {
    type Error = ModelError;

    fn try_from(json: Value) -> ModelResult<Self> {
        Self::from_json(&json)
    }
}

fn required<T>(name: &str, value: Option<T>) -> ModelResult<T> {
    value.ok_or_else(|| ModelError::MissingRequired {
        field: name.to_string(),
    })
}

fn required_string(object: &Map<String, Value>, name: &str) -> ModelResult<String> {
    let value = present(object, name);
    check_field(name, value, &[JsonKind::String], true)?;
    let value = value.and_then(Value::as_str).map(str::to_string);
    required(name, value)
}

fn integer<T: TryFrom<i128>>(
    object: &Map<String, Value>,
    name: &str,
    required: bool,
) -> ModelResult<Option<T>> {
    let value = present(object, name);
    check_field(name, value, &[JsonKind::Integer], required)?;

    value
        .map(|value| {
            value
                .as_i64()
                .map(i128::from)
                .or_else(|| value.as_u64().map(i128::from))
                .and_then(|wide| T::try_from(wide).ok())
                .ok_or_else(|| ModelError::TypeMismatch {
                    field: name.to_string(),
                    expected: format!("integer within {}", std::any::type_name::<T>()),
                    found: JsonKind::describe(value),
                })
        })
        .transpose()
}

fn number(object: &Map<String, Value>, name: &str) -> ModelResult<Option<f64>> {
    let value = present(object, name);
    check_field(name, value, &[JsonKind::Number], false)?;
    Ok(value.and_then(Value::as_f64))
}

fn uris(object: &Map<String, Value>) -> ModelResult<Option<Vec<FetchUri>>> {
    let value = present(object, "uris");
    check_field("uris", value, &[JsonKind::Array], false)?;

    value
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .enumerate()
                .map(|(index, entry)| FetchUri::from_json_at(&format!("uris[{}]", index), entry))
                .collect::<ModelResult<Vec<_>>>()
        })
        .transpose()
}

fn env(object: &Map<String, Value>) -> ModelResult<Option<BTreeMap<String, String>>> {
    let value = present(object, "env");
    check_field("env", value, &[JsonKind::Object], false)?;

    value
        .and_then(Value::as_object)
        .map(|entries| {
            entries
                .iter()
                .map(|(key, value)| -> ModelResult<(String, String)> {
                    let field = format!("env.{}", key);
                    check_field(&field, Some(value), &[JsonKind::String], true)?;
                    let value = value
                        .as_str()
                        .ok_or(ModelError::MissingRequired { field })?;
                    Ok((key.clone(), value.to_string()))
                })
                .collect::<ModelResult<BTreeMap<_, _>>>()
        })
        .transpose()
}

/// Builder for [`Job`].
#[derive(Debug, Clone)]
pub struct JobBuilder {
    job: Job,
}

impl JobBuilder {
    /// Maximum runtime in milliseconds.
    pub fn max_runtime(mut self, max_runtime: u64) -> Self {
        self.job.max_runtime = Some(max_runtime);
        self
    }

    pub fn cpus(mut self, cpus: f64) -> Self {
        self.job.cpus = Some(cpus);
        self
    }

    /// Memory in megabytes.
    pub fn mem(mut self, mem: f64) -> Self {
        self.job.mem = Some(mem);
        self
    }

    pub fn gpus(mut self, gpus: u32) -> Self {
        self.job.gpus = Some(gpus);
        self
    }

    pub fn ports(mut self, ports: u32) -> Self {
        self.job.ports = Some(ports);
        self
    }

    /// Append one resource to fetch before the command runs.
    pub fn uri(mut self, uri: FetchUri) -> Self {
        self.job.uris.get_or_insert_with(Vec::new).push(uri);
        self
    }

    /// Append several resources, keeping their order.
    pub fn uris(mut self, uris: impl IntoIterator<Item = FetchUri>) -> Self {
        self.job.uris.get_or_insert_with(Vec::new).extend(uris);
        self
    }

    /// Set one environment variable for the command.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.job
            .env
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn envs<K, V>(mut self, vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.job
            .env
            .get_or_insert_with(BTreeMap::new)
            .extend(vars.into_iter().map(|(key, value)| (key.into(), value.into())));
        self
    }

    /// Finish the job, rejecting non-finite `cpus` or `mem`.
    pub fn build(self) -> ModelResult<Job> {
        self.job.validate()?;
        Ok(self.job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> Job {
        Job::builder("sleepy", "26719da8-394f-44f9-9e6d-8a17500f5109", 50, "sleep 10", 3)
            .build()
            .unwrap()
    }

    fn raw_job() -> Value {
        json!({
            "name": "sleepy",
            "uuid": "26719da8-394f-44f9-9e6d-8a17500f5109",
            "priority": 50,
            "command": "sleep 10",
            "max_retries": 3
        })
    }

    #[test]
    fn test_required_fields_only() {
        let job = minimal();

        let json = job.to_json().unwrap();
        assert_eq!(json, raw_job());
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 5);
        for absent in ["max_runtime", "cpus", "mem", "gpus", "ports", "uris", "env"] {
            assert!(json.get(absent).is_none(), "{} should be omitted", absent);
        }
    }

    #[test]
    fn test_all_optional_fields() {
        let job = Job::builder("train", "u-1", 10, "python train.py", 1)
            .max_runtime(3_600_000)
            .cpus(2.0)
            .mem(4096.0)
            .gpus(1)
            .ports(2)
            .uri(FetchUri::builder("http://x/a.tgz").extract(true).build())
            .env("MODE", "fast")
            .build()
            .unwrap();

        assert_eq!(
            job.to_json().unwrap(),
            json!({
                "name": "train",
                "uuid": "u-1",
                "priority": 10,
                "command": "python train.py",
                "max_retries": 1,
                "max_runtime": 3_600_000,
                "cpus": 2.0,
                "mem": 4096.0,
                "gpus": 1,
                "ports": 2,
                "uris": [{"value": "http://x/a.tgz", "extract": true}],
                "env": {"MODE": "fast"}
            })
        );
    }

    #[test]
    fn test_uris_keep_order() {
        let job = Job::builder("j", "u", 1, "true", 0)
            .uri(FetchUri::builder("http://x/1").build())
            .uris(vec![
                FetchUri::builder("http://x/2").build(),
                FetchUri::builder("http://x/3").build(),
            ])
            .build()
            .unwrap();

        let values: Vec<&str> = job.uris().unwrap().iter().map(FetchUri::value).collect();
        assert_eq!(values, vec!["http://x/1", "http://x/2", "http://x/3"]);
    }

    #[test]
    fn test_envs() {
        let job = Job::builder("j", "u", 1, "env", 0)
            .envs([("A", "1"), ("B", "2")])
            .env("C", "3")
            .build()
            .unwrap();

        let env = job.env().unwrap();
        assert_eq!(env.len(), 3);
        assert_eq!(env["B"], "2");
    }

    #[test]
    fn test_from_json_round_trip() {
        let mut raw = raw_job();
        raw["cpus"] = json!(1);
        raw["uris"] = json!([{"value": "http://x/a.tgz", "executable": false}]);
        raw["env"] = json!({"HOME": "/tmp"});

        let job = Job::from_json(&raw).unwrap();
        assert_eq!(job.name(), "sleepy");
        assert_eq!(job.priority(), 50);
        assert_eq!(job.max_retries(), 3);
        assert_eq!(job.cpus(), Some(1.0));
        assert_eq!(job.uris().unwrap()[0].executable(), Some(false));
        assert_eq!(job.env().unwrap()["HOME"], "/tmp");
    }

    #[test]
    fn test_from_json_null_optional_is_absent() {
        let mut raw = raw_job();
        raw["gpus"] = Value::Null;

        let job = Job::from_json(&raw).unwrap();
        assert_eq!(job.gpus(), None);
        assert!(job.to_json().unwrap().get("gpus").is_none());
    }

    #[test]
    fn test_from_json_missing_required() {
        for field in ["name", "uuid", "priority", "command", "max_retries"] {
            let mut raw = raw_job();
            raw.as_object_mut().unwrap().remove(field);

            let err = Job::from_json(&raw).unwrap_err();
            assert_eq!(
                err,
                ModelError::MissingRequired {
                    field: field.to_string()
                },
                "removing {}",
                field
            );
        }
    }

    #[test]
    fn test_from_json_type_mismatch() {
        let cases = [
            ("name", json!(5)),
            ("uuid", json!(["a"])),
            ("priority", json!("high")),
            ("priority", json!(1.5)),
            ("command", json!(true)),
            ("max_retries", json!(-1)),
            ("max_runtime", json!("1h")),
            ("cpus", json!("two")),
            ("mem", json!({})),
            ("gpus", json!(0.5)),
            ("ports", json!(false)),
            ("uris", json!("http://x")),
            ("env", json!(["A=1"])),
        ];

        for (field, value) in cases {
            let mut raw = raw_job();
            raw[field] = value.clone();

            let err = Job::from_json(&raw).unwrap_err();
            assert!(
                matches!(err, ModelError::TypeMismatch { field: ref f, .. } if f == field),
                "{} = {} gave {:?}",
                field,
                value,
                err
            );
        }
    }

    #[test]
    fn test_from_json_bad_uri_entry() {
        let mut raw = raw_job();
        raw["uris"] = json!([{"value": "http://x/ok"}, "http://x/bare"]);

        let err = Job::from_json(&raw).unwrap_err();
        assert!(matches!(err, ModelError::TypeMismatch { ref field, .. } if field == "uris[1]"));

        raw["uris"] = json!([{"cache": true}]);
        let err = Job::from_json(&raw).unwrap_err();
        assert!(matches!(err, ModelError::MissingRequired { ref field } if field == "value"));
    }

    #[test]
    fn test_from_json_non_string_env_value() {
        let mut raw = raw_job();
        raw["env"] = json!({"PORT": 8080});

        let err = Job::from_json(&raw).unwrap_err();
        assert!(matches!(err, ModelError::TypeMismatch { ref field, .. } if field == "env.PORT"));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = Job::from_json(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, ModelError::TypeMismatch { ref field, .. } if field == "job"));
    }

    #[test]
    fn test_deserialize_validates() {
        let job: Job = serde_json::from_value(raw_job()).unwrap();
        assert_eq!(job, minimal());

        let mut raw = raw_job();
        raw["priority"] = json!("urgent");
        assert!(serde_json::from_value::<Job>(raw).is_err());
    }

    #[test]
    fn test_non_finite_resources_are_rejected() {
        let err = Job::builder("j", "u", 1, "true", 0)
            .cpus(f64::NAN)
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidValue { ref field, .. } if field == "cpus"));

        let err = Job::builder("j", "u", 1, "true", 0)
            .cpus(1.0)
            .mem(f64::INFINITY)
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidValue { ref field, .. } if field == "mem"));
    }

    #[test]
    fn test_set_resources_are_always_serialized() {
        let job = Job::builder("j", "u", 1, "true", 0)
            .cpus(0.25)
            .mem(0.0)
            .build()
            .unwrap();

        let json = job.to_json().unwrap();
        assert_eq!(json["cpus"], json!(0.25));
        assert_eq!(json["mem"], json!(0.0));
    }

    #[test]
    fn test_generate_uuid() {
        let a = Job::generate_uuid();
        let b = Job::generate_uuid();

        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }
}
