//! Resources the scheduler downloads before running a job.

use crate::error::{ModelError, ModelResult};
use crate::validate::{check_field, present, JsonKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A file or archive fetched into the sandbox ahead of the job command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct FetchUri {
    value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    executable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extract: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cache: Option<bool>,
}

impl FetchUri {
    /// Start building a descriptor for the resource at `value`.
    pub fn builder(value: impl Into<String>) -> FetchUriBuilder {
        FetchUriBuilder {
            uri: FetchUri {
                value: value.into(),
                executable: None,
                extract: None,
                cache: None,
            },
        }
    }

    /// Build a descriptor from an untyped JSON mapping, checking each field.
    pub fn from_json(json: &Value) -> ModelResult<Self> {
        Self::from_json_at("uri", json)
    }

    /// Same as [`FetchUri::from_json`], reporting errors under `path`.
    pub(crate) fn from_json_at(path: &str, json: &Value) -> ModelResult<Self> {
        check_field(path, Some(json), &[JsonKind::Object], true)?;
        let object = json.as_object().ok_or_else(|| ModelError::MissingRequired {
            field: path.to_string(),
        })?;

        let value = present(object, "value");
        check_field("value", value, &[JsonKind::String], true)?;
        let value = value
            .and_then(Value::as_str)
            .ok_or_else(|| ModelError::MissingRequired {
                field: "value".to_string(),
            })?;

        Ok(Self {
            value: value.to_string(),
            executable: flag(object, "executable")?,
            extract: flag(object, "extract")?,
            cache: flag(object, "cache")?,
        })
    }

    /// Serialize to the wire shape, omitting unset flags.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn executable(&self) -> Option<bool> {
        self.executable
    }

    pub fn extract(&self) -> Option<bool> {
        self.extract
    }

    pub fn cache(&self) -> Option<bool> {
        self.cache
    }
}

impl TryFrom<&Value> for FetchUri {
    type Error = ModelError;

    fn try_from(json: &Value) -> ModelResult<Self> {
        Self::from_json(json)
    }
}

impl TryFrom<Value> for FetchUri {
    type Error = ModelError;

    fn try_from(json: Value) -> ModelResult<Self> {
        Self::from_json(&json)
    }
}

fn flag(object: &Map<String, Value>, name: &str) -> ModelResult<Option<bool>> {
    let value = present(object, name);
    check_field(name, value, &[JsonKind::Boolean], false)?;
    Ok(value.and_then(Value::as_bool))
}

/// Builder for [`FetchUri`].
#[derive(Debug, Clone)]
pub struct FetchUriBuilder {
    uri: FetchUri,
}

impl FetchUriBuilder {
    /// Mark the fetched file as executable.
    pub fn executable(mut self, executable: bool) -> Self {
        self.uri.executable = Some(executable);
        self
    }

    /// Unpack the fetched archive.
    pub fn extract(mut self, extract: bool) -> Self {
        self.uri.extract = Some(extract);
        self
    }

    /// Let the agent cache the fetched artifact.
    pub fn cache(mut self, cache: bool) -> Self {
        self.uri.cache = Some(cache);
        self
    }

    pub fn build(self) -> FetchUri {
        self.uri
    }
}
