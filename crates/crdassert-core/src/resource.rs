//! Untyped resource documents

use serde_json::Value;

use crate::error::{Error, Result};
use crate::gvk::GroupVersionKind;

/// Name reported for resources that declare none
pub const UNNAMED: &str = "<unnamed>";

/// A custom resource instance in untyped form
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    gvk: GroupVersionKind,
    content: Value,
}

impl Resource {
    /// Wrap a decoded document, reading its `apiVersion` and `kind`
    pub fn from_value(content: Value) -> Result<Self> {
        let api_version = content
            .get("apiVersion")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Decode("resource is missing 'apiVersion'".to_string()))?;
        let kind = content
            .get("kind")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Decode("resource is missing 'kind'".to_string()))?;

        let gvk = GroupVersionKind::from_api_version(api_version, kind)?;

        Ok(Self { gvk, content })
    }

    pub fn gvk(&self) -> &GroupVersionKind {
        &self.gvk
    }

    /// `metadata.name`, else `metadata.generateName`, else [`UNNAMED`]
    pub fn name(&self) -> &str {
        let metadata = self.content.get("metadata");
        metadata
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str)
            .or_else(|| {
                metadata
                    .and_then(|m| m.get("generateName"))
                    .and_then(Value::as_str)
            })
            .unwrap_or(UNNAMED)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.content
            .get("metadata")
            .and_then(|m| m.get("namespace"))
            .and_then(Value::as_str)
    }

    pub fn content(&self) -> &Value {
        &self.content
    }

    pub fn into_content(self) -> Value {
        self.content
    }
}

impl TryFrom<Value> for Resource {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}
