//! Resource checking against registered CRD schemas

use std::path::Path;

use serde_json::Value;

use crate::crd::CrdDefinition;
use crate::document;
use crate::error::{Error, Result};
use crate::registry::{self, SchemaRegistry};
use crate::reporter::Reporter;
use crate::resource::Resource;
use crate::validator::{ValidationResult, Violation};

/// Checks resources against the CRD schemas loaded into it.
///
/// Lookup failures are returned as errors; schema violations are sent to
/// the [`Reporter`] and the check itself succeeds, so a batch keeps going
/// past a bad resource.
#[derive(Debug, Default)]
pub struct ResourceAsserter {
    registry: SchemaRegistry,
}

impl ResourceAsserter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: SchemaRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SchemaRegistry {
        &mut self.registry
    }

    pub fn into_registry(self) -> SchemaRegistry {
        self.registry
    }

    /// See [`SchemaRegistry::register`]
    pub fn load<I>(&mut self, crds: I) -> Result<()>
    where
        I: IntoIterator<Item = CrdDefinition>,
    {
        self.registry.register(crds)
    }

    /// See [`SchemaRegistry::register_documents`]
    pub fn load_documents<I, S, B>(&mut self, sources: I) -> Result<()>
    where
        I: IntoIterator<Item = (S, B)>,
        S: AsRef<str>,
        B: AsRef<[u8]>,
    {
        self.registry.register_documents(sources)
    }

    /// See [`SchemaRegistry::load_files`]
    pub fn load_files<I, P>(&mut self, paths: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.registry.load_files(paths)
    }

    /// Validate a resource without reporting anything
    pub fn validate(&self, resource: &Resource) -> Result<ValidationResult> {
        let gvk = resource.gvk();
        let validator = self
            .registry
            .get(gvk)
            .ok_or_else(|| Error::NoSchemaRegistered { gvk: gvk.clone() })?;

        Ok(validator.validate(resource.content()))
    }

    /// Check one resource.
    ///
    /// Returns [`Error::NoSchemaRegistered`] when no CRD was loaded for the
    /// resource's GVK. Otherwise returns `Ok`, and if the resource violates
    /// its schema, sends exactly one message listing every violation.
    pub fn check<R>(&self, reporter: &mut R, resource: &Resource) -> Result<()>
    where
        R: Reporter + ?Sized,
    {
        let result = self.validate(resource)?;

        tracing::debug!(
            gvk = %resource.gvk(),
            name = resource.name(),
            violations = result.errors.len(),
            "checked resource"
        );

        if !result.is_valid() {
            reporter.report(format_report(resource.name(), &result.errors));
        }

        Ok(())
    }

    /// Check an already decoded document
    pub fn check_value<R>(&self, reporter: &mut R, value: Value) -> Result<()>
    where
        R: Reporter + ?Sized,
    {
        self.check(reporter, &Resource::from_value(value)?)
    }

    /// Decode and check raw resource sources in order.
    ///
    /// Each item pairs a source name with its bytes; multi-document streams
    /// are checked document by document. The first setup error stops the
    /// batch and is returned tagged with the offending document.
    pub fn check_documents<R, I, S, B>(&self, reporter: &mut R, sources: I) -> Result<()>
    where
        R: Reporter + ?Sized,
        I: IntoIterator<Item = (S, B)>,
        S: AsRef<str>,
        B: AsRef<[u8]>,
    {
        for (source_name, bytes) in sources {
            let source_name = source_name.as_ref();
            let documents = document::decode_sourced(source_name, bytes.as_ref())
                .map_err(|e| e.in_source(source_name))?;

            for doc in documents {
                self.check_value(reporter, doc.value)
                    .map_err(|e| e.in_source(&doc.source_name))?;
            }
        }
        Ok(())
    }

    /// Read resource files and check them
    pub fn check_files<R, I, P>(&self, reporter: &mut R, paths: I) -> Result<()>
    where
        R: Reporter + ?Sized,
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            let path = path.as_ref();
            let bytes = registry::read_file(path)?;
            self.check_documents(reporter, [(path.display().to_string(), bytes)])?;
        }
        Ok(())
    }
}

/// Message sent to a reporter for a resource that failed validation
pub fn format_report(name: &str, violations: &[Violation]) -> String {
    let mut message = format!("{} resource failed to pass CRD validation:", name);
    for violation in violations {
        message.push_str("\n- ");
        message.push_str(&violation.to_string());
    }
    message
}
