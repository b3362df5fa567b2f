//! Schema registry: one compiled validator per group/version/kind

use std::collections::HashMap;
use std::path::Path;

use crate::crd::{self, CrdDefinition};
use crate::document;
use crate::error::{Error, Result};
use crate::gvk::GroupVersionKind;
use crate::validator::SchemaValidator;

/// Validators keyed by the GVK they validate
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    validators: HashMap<GroupVersionKind, SchemaValidator>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and register a validator for every version of every CRD.
    ///
    /// A CRD without `versions` registers its legacy `spec.version`. Each
    /// version uses its own schema, falling back to the legacy
    /// `spec.validation` schema. A version with neither fails with
    /// [`Error::MissingSchema`].
    ///
    /// Registering a GVK that is already present replaces its validator.
    ///
    /// Not atomic: validators registered before a failing version stay in
    /// the registry.
    pub fn register<I>(&mut self, crds: I) -> Result<()>
    where
        I: IntoIterator<Item = CrdDefinition>,
    {
        for crd in crds {
            self.register_one(&crd)?;
        }
        Ok(())
    }

    fn register_one(&mut self, crd: &CrdDefinition) -> Result<()> {
        let versions: Vec<(&str, Option<&serde_json::Value>)> = if crd.versions.is_empty() {
            let implicit = crd
                .legacy_version
                .as_deref()
                .ok_or_else(|| Error::MissingVersion {
                    crd: crd.display_name(),
                })?;
            vec![(implicit, None)]
        } else {
            crd.versions
                .iter()
                .map(|v| (v.name.as_str(), v.schema.as_ref()))
                .collect()
        };

        for (version, own_schema) in versions {
            let gvk = GroupVersionKind::new(&crd.group, version, &crd.kind);

            let schema = own_schema
                .or(crd.legacy_schema.as_ref())
                .ok_or_else(|| Error::MissingSchema {
                    crd: crd.display_name(),
                    version: version.to_string(),
                })?;

            let validator = SchemaValidator::compile(&gvk, schema)?;

            if self.validators.insert(gvk.clone(), validator).is_some() {
                tracing::warn!(%gvk, crd = %crd.display_name(), "replacing previously registered validator");
            } else {
                tracing::debug!(%gvk, crd = %crd.display_name(), "registered validator");
            }
        }

        Ok(())
    }

    /// Decode, normalize and register raw CRD sources.
    ///
    /// Each item pairs a source name (usually a path) with its bytes. A
    /// source may hold a multi-document YAML stream. The first failure stops
    /// processing and is returned tagged with the offending source.
    pub fn register_documents<I, S, B>(&mut self, sources: I) -> Result<()>
    where
        I: IntoIterator<Item = (S, B)>,
        S: AsRef<str>,
        B: AsRef<[u8]>,
    {
        for (source_name, bytes) in sources {
            let source_name = source_name.as_ref();
            let documents = document::decode_sourced(source_name, bytes.as_ref())
                .map_err(|e| e.in_source(source_name))?;

            for doc in documents {
                crd::normalize(&doc.value)
                    .and_then(|crd| self.register([crd]))
                    .map_err(|e| e.in_source(&doc.source_name))?;
            }
        }
        Ok(())
    }

    /// Read CRD files and register them
    pub fn load_files<I, P>(&mut self, paths: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            let path = path.as_ref();
            let bytes = read_file(path)?;
            self.register_documents([(path.display().to_string(), bytes)])?;
        }
        Ok(())
    }

    pub fn get(&self, gvk: &GroupVersionKind) -> Option<&SchemaValidator> {
        self.validators.get(gvk)
    }

    pub fn contains(&self, gvk: &GroupVersionKind) -> bool {
        self.validators.contains_key(gvk)
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Registered GVKs, sorted
    pub fn gvks(&self) -> Vec<&GroupVersionKind> {
        let mut gvks: Vec<_> = self.validators.keys().collect();
        gvks.sort();
        gvks
    }
}

pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object_schema() -> serde_json::Value {
        json!({"type": "object"})
    }

    #[test]
    fn test_register_one_validator_per_version() {
        let crd = CrdDefinition::new("widgets.example.com", "example.com", "Widget")
            .with_version("v1", Some(object_schema()))
            .with_version("v1beta1", Some(object_schema()));

        let mut registry = SchemaRegistry::new();
        registry.register([crd]).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains(&GroupVersionKind::new("example.com", "v1", "Widget")));
        assert!(registry.contains(&GroupVersionKind::new("example.com", "v1beta1", "Widget")));
    }

    #[test]
    fn test_register_legacy_version_and_schema() {
        let crd = CrdDefinition::new("crontabs.stable.example.com", "stable.example.com", "CronTab")
            .with_legacy_version("v1")
            .with_legacy_schema(object_schema());

        let mut registry = SchemaRegistry::new();
        registry.register([crd]).unwrap();

        assert_eq!(
            registry.gvks(),
            vec![&GroupVersionKind::new("stable.example.com", "v1", "CronTab")]
        );
    }

    #[test]
    fn test_per_version_schema_wins_over_legacy() {
        let crd = CrdDefinition::new("", "example.com", "Widget")
            .with_version("v1", Some(json!({"type": "object", "required": ["spec"]})))
            .with_version("v2", None)
            .with_legacy_schema(json!({"type": "object"}));

        let mut registry = SchemaRegistry::new();
        registry.register([crd]).unwrap();

        let v1 = registry
            .get(&GroupVersionKind::new("example.com", "v1", "Widget"))
            .unwrap();
        let v2 = registry
            .get(&GroupVersionKind::new("example.com", "v2", "Widget"))
            .unwrap();

        assert!(!v1.validate(&json!({})).is_valid());
        assert!(v2.validate(&json!({})).is_valid());
    }

    #[test]
    fn test_missing_schema() {
        let crd = CrdDefinition::new("widgets.example.com", "example.com", "Widget")
            .with_version("v1", Some(object_schema()))
            .with_version("v2", None);

        let mut registry = SchemaRegistry::new();
        let err = registry.register([crd]).unwrap_err();

        match err {
            Error::MissingSchema { crd, version } => {
                assert_eq!(crd, "widgets.example.com");
                assert_eq!(version, "v2");
            }
            other => panic!("unexpected error: {other}"),
        }

        // Not rolled back
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_missing_version() {
        let crd = CrdDefinition::new("widgets.example.com", "example.com", "Widget")
            .with_legacy_schema(object_schema());

        let mut registry = SchemaRegistry::new();
        assert!(matches!(
            registry.register([crd]),
            Err(Error::MissingVersion { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_compile_error_aborts_batch() {
        let broken = CrdDefinition::new("", "example.com", "Broken")
            .with_version("v1", Some(json!({"type": "widget"})));
        let fine = CrdDefinition::new("", "example.com", "Fine")
            .with_version("v1", Some(object_schema()));

        let mut registry = SchemaRegistry::new();
        let err = registry.register([broken, fine]).unwrap_err();

        assert!(matches!(err, Error::SchemaCompile { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reregister_overwrites() {
        let gvk = GroupVersionKind::new("example.com", "v1", "Widget");
        let strict = CrdDefinition::new("", "example.com", "Widget")
            .with_version("v1", Some(json!({"type": "object", "required": ["spec"]})));
        let lax = CrdDefinition::new("", "example.com", "Widget")
            .with_version("v1", Some(object_schema()));

        let mut registry = SchemaRegistry::new();
        registry.register([strict]).unwrap();
        assert!(!registry.get(&gvk).unwrap().validate(&json!({})).is_valid());

        registry.register([lax]).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get(&gvk).unwrap().validate(&json!({})).is_valid());
    }

    #[test]
    fn test_register_documents_multi_document_stream() {
        let bundle = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: widgets.example.com
spec:
  group: example.com
  names:
    kind: Widget
  versions:
    - name: v1
      schema:
        openAPIV3Schema:
          type: object
---
apiVersion: apiextensions.k8s.io/v1beta1
kind: CustomResourceDefinition
metadata:
  name: gadgets.example.com
spec:
  group: example.com
  version: v1alpha1
  names:
    kind: Gadget
  validation:
    openAPIV3Schema:
      type: object
"#;

        let mut registry = SchemaRegistry::new();
        registry
            .register_documents([("bundle.yaml", bundle)])
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains(&GroupVersionKind::new("example.com", "v1", "Widget")));
        assert!(registry.contains(&GroupVersionKind::new("example.com", "v1alpha1", "Gadget")));
    }

    #[test]
    fn test_register_documents_stops_at_first_failure() {
        let unsupported = "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: cm\n";
        let valid = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
spec:
  group: example.com
  names:
    kind: Widget
  versions:
    - name: v1
      schema:
        openAPIV3Schema:
          type: object
"#;

        let mut registry = SchemaRegistry::new();
        let err = registry
            .register_documents([("configmap.yaml", unsupported), ("widget.yaml", valid)])
            .unwrap_err();

        match &err {
            Error::Source { source_name, source } => {
                assert_eq!(source_name, "configmap.yaml");
                assert!(matches!(**source, Error::UnsupportedCrdShape { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_documents_decode_error_names_source() {
        let mut registry = SchemaRegistry::new();
        let err = registry
            .register_documents([("broken.yaml", "spec: [unclosed")])
            .unwrap_err();

        assert!(err.to_string().starts_with("error on broken.yaml:"));
        assert!(matches!(err.root(), Error::Decode(_)));
    }

    #[test]
    fn test_register_documents_rejects_empty_source() {
        for (name, content) in [("empty-crd.yaml", ""), ("comments.yaml", "# nothing\n---\n")] {
            let mut registry = SchemaRegistry::new();
            let err = registry.register_documents([(name, content)]).unwrap_err();

            match &err {
                Error::Source { source_name, source } => {
                    assert_eq!(source_name, name);
                    assert!(matches!(**source, Error::Decode(_)));
                }
                other => panic!("unexpected error: {other}"),
            }
            assert!(registry.is_empty());
        }
    }

    #[test]
    fn test_load_files_missing_file() {
        let mut registry = SchemaRegistry::new();
        let err = registry
            .load_files(["/nonexistent/crd.yaml"])
            .unwrap_err();

        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/crd.yaml"));
    }
}
