//! CRD (CustomResourceDefinition) normalization
//!
//! Two manifest shapes are recognized, selected by the manifest's own
//! `apiVersion`/`kind`:
//!
//! - **current** (`apiextensions.k8s.io/v1`): `spec.versions[]`, each with
//!   its own `schema.openAPIV3Schema`
//! - **legacy** (`apiextensions.k8s.io/v1beta1`): `spec.version` plus a
//!   top-level `spec.validation.openAPIV3Schema`, optionally overridden per
//!   entry of `spec.versions[]`
//!
//! Both are parsed into a [`CrdDocument`] variant and converted into the one
//! canonical [`CrdDefinition`] the registry works with:
//!
//! ```text
//!   Value ──► CrdDocument::V1      ──┐
//!         └─► CrdDocument::V1Beta1 ──┴──► CrdDefinition
//! ```

pub mod v1;
pub mod v1beta1;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::gvk::GroupVersionKind;

pub const CRD_GROUP: &str = "apiextensions.k8s.io";
pub const CRD_KIND: &str = "CustomResourceDefinition";

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CrdNames {
    pub kind: String,
}

/// `schema` / `validation` wrapper around the OpenAPI v3 schema
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomResourceValidation {
    #[serde(rename = "openAPIV3Schema", default)]
    pub open_api_v3_schema: Option<Value>,
}

impl CustomResourceValidation {
    fn into_schema(self) -> Option<Value> {
        self.open_api_v3_schema.filter(|s| !s.is_null())
    }
}

/// A CRD manifest in one of the recognized API shapes
#[derive(Debug, Clone, PartialEq)]
pub enum CrdDocument {
    V1(v1::CustomResourceDefinition),
    V1Beta1(v1beta1::CustomResourceDefinition),
}

impl CrdDocument {
    /// Detect the shape from `apiVersion`/`kind` and deserialize it
    pub fn from_value(value: &Value) -> Result<Self> {
        let gvk = document_gvk(value);

        if gvk.group != CRD_GROUP || gvk.kind != CRD_KIND {
            return Err(Error::UnsupportedCrdShape { gvk });
        }

        match gvk.version.as_str() {
            "v1" => serde_json::from_value(value.clone())
                .map(CrdDocument::V1)
                .map_err(|e| Error::Decode(format!("invalid {} CRD: {}", gvk.api_version(), e))),
            "v1beta1" => serde_json::from_value(value.clone())
                .map(CrdDocument::V1Beta1)
                .map_err(|e| Error::Decode(format!("invalid {} CRD: {}", gvk.api_version(), e))),
            _ => Err(Error::UnsupportedCrdShape { gvk }),
        }
    }
}

/// One version of a CRD and the schema declared directly on it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrdVersion {
    pub name: String,
    pub schema: Option<Value>,
}

/// Canonical CRD representation the registry builds validators from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrdDefinition {
    /// `metadata.name`, informational only
    pub name: String,
    pub group: String,
    pub kind: String,
    pub versions: Vec<CrdVersion>,
    /// `spec.version` of legacy manifests
    pub legacy_version: Option<String>,
    /// `spec.validation.openAPIV3Schema` of legacy manifests
    pub legacy_schema: Option<Value>,
}

impl CrdDefinition {
    pub fn new(name: impl Into<String>, group: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            kind: kind.into(),
            versions: Vec::new(),
            legacy_version: None,
            legacy_schema: None,
        }
    }

    /// Add a version, with or without its own schema
    pub fn with_version(mut self, name: impl Into<String>, schema: Option<Value>) -> Self {
        self.versions.push(CrdVersion {
            name: name.into(),
            schema,
        });
        self
    }

    pub fn with_legacy_version(mut self, version: impl Into<String>) -> Self {
        self.legacy_version = Some(version.into());
        self
    }

    pub fn with_legacy_schema(mut self, schema: Value) -> Self {
        self.legacy_schema = Some(schema);
        self
    }

    /// Name used in error messages
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            format!("{}.{}", self.kind, self.group)
        } else {
            self.name.clone()
        }
    }
}

impl From<CrdDocument> for CrdDefinition {
    fn from(doc: CrdDocument) -> Self {
        match doc {
            CrdDocument::V1(crd) => CrdDefinition {
                name: crd.metadata.name,
                group: crd.spec.group,
                kind: crd.spec.names.kind,
                versions: crd
                    .spec
                    .versions
                    .into_iter()
                    .map(|v| CrdVersion {
                        name: v.name,
                        schema: v.schema.and_then(CustomResourceValidation::into_schema),
                    })
                    .collect(),
                legacy_version: None,
                legacy_schema: None,
            },
            CrdDocument::V1Beta1(crd) => CrdDefinition {
                name: crd.metadata.name,
                group: crd.spec.group,
                kind: crd.spec.names.kind,
                versions: crd
                    .spec
                    .versions
                    .into_iter()
                    .map(|v| CrdVersion {
                        name: v.name,
                        schema: v.schema.and_then(CustomResourceValidation::into_schema),
                    })
                    .collect(),
                legacy_version: crd.spec.version,
                legacy_schema: crd
                    .spec
                    .validation
                    .and_then(CustomResourceValidation::into_schema),
            },
        }
    }
}

/// Map an untyped CRD manifest into its canonical definition
pub fn normalize(value: &Value) -> Result<CrdDefinition> {
    CrdDocument::from_value(value).map(CrdDefinition::from)
}

/// An unparseable `apiVersion` is kept whole as the version, so it still
/// surfaces as an unsupported shape
fn document_gvk(value: &Value) -> GroupVersionKind {
    let api_version = value
        .get("apiVersion")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let kind = value.get("kind").and_then(Value::as_str).unwrap_or_default();

    GroupVersionKind::from_api_version(api_version, kind)
        .unwrap_or_else(|_| GroupVersionKind::new("", api_version, kind))
}
