//! `apiextensions.k8s.io/v1` CustomResourceDefinition shape
//!
//! Only the fields needed to route and validate resources are modelled;
//! everything else in the manifest is ignored.

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
    pub versions: Vec<CustomResourceDefinitionVersion>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomResourceDefinitionVersion {
    pub name: String,
    #[serde(default)]
    pub schema: Option<CustomResourceValidation>,
}
