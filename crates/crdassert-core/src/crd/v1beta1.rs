//! `apiextensions.k8s.io/v1beta1` CustomResourceDefinition shape (deprecated)
//!
//! Predates multi-version CRDs: a single `spec.version` and a top-level
//! `spec.validation` shared by every version. Later v1beta1 releases added
//! `spec.versions` with optional per-version schemas.

use serde::Deserialize;

use super::{CustomResourceValidation, CrdNames, ObjectMeta};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomResourceDefinition {
    #[serde(default)]
    pub metadata: ObjectMeta,
    pub spec: CustomResourceDefinitionSpec,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomResourceDefinitionSpec {
    pub group: String,
    pub names: CrdNames,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub versions: Vec<CustomResourceDefinitionVersion>,
    #[serde(default)]
    pub validation: Option<CustomResourceValidation>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomResourceDefinitionVersion {
    pub name: String,
    #[serde(default)]
    pub schema: Option<CustomResourceValidation>,
}
