//! Group/Version/Kind identifiers

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Composite key routing a resource to the validator of its schema
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// Build from an `apiVersion` string and a kind.
    ///
    /// `apps/v1` has group `apps`; a bare `v1` belongs to the core (empty) group.
    pub fn from_api_version(api_version: &str, kind: impl Into<String>) -> Result<Self> {
        let (group, version) = match api_version.split_once('/') {
            None => ("", api_version),
            Some((_, version)) if version.contains('/') => {
                return Err(Error::Decode(format!(
                    "unexpected GroupVersion string: {}",
                    api_version
                )));
            }
            Some((group, version)) => (group, version),
        };

        Ok(Self::new(group, version, kind))
    }

    /// `group/version`, or just `version` for the core group
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}, Kind={}", self.group, self.version, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_api_version_with_group() {
        let gvk = GroupVersionKind::from_api_version("external-secrets.io/v1", "ExternalSecret")
            .unwrap();
        assert_eq!(gvk.group, "external-secrets.io");
        assert_eq!(gvk.version, "v1");
        assert_eq!(gvk.kind, "ExternalSecret");
        assert_eq!(gvk.api_version(), "external-secrets.io/v1");
    }

    #[test]
    fn test_from_api_version_core_group() {
        let gvk = GroupVersionKind::from_api_version("v1", "ConfigMap").unwrap();
        assert_eq!(gvk.group, "");
        assert_eq!(gvk.version, "v1");
        assert_eq!(gvk.api_version(), "v1");
    }

    #[test]
    fn test_from_api_version_rejects_extra_segments() {
        let result = GroupVersionKind::from_api_version("a/b/c", "Thing");
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_display() {
        let gvk = GroupVersionKind::new("apiextensions.k8s.io", "v1", "CustomResourceDefinition");
        assert_eq!(
            gvk.to_string(),
            "apiextensions.k8s.io/v1, Kind=CustomResourceDefinition"
        );
        assert_eq!(
            GroupVersionKind::new("", "v1", "Pod").to_string(),
            "/v1, Kind=Pod"
        );
    }
}
