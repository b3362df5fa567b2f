//! Error types for crdassert-core

use std::path::PathBuf;

use thiserror::Error;

use crate::gvk::GroupVersionKind;

/// Result type for crdassert-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Setup and lookup failures.
///
/// Schema violations found in a resource are not errors: they are delivered
/// through a [`Reporter`](crate::Reporter) so a batch of checks can continue.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Input is not a well-formed structured document
    #[error("decode error: {0}")]
    Decode(String),

    /// Document is neither an apiextensions.k8s.io/v1 nor a v1beta1 CRD
    #[error("unknown CRD type: {gvk}")]
    UnsupportedCrdShape { gvk: GroupVersionKind },

    /// A CRD version resolves to no schema at all
    #[error("CRD '{crd}' did not have validation defined for version '{version}'")]
    MissingSchema { crd: String, version: String },

    /// Legacy CRD declaring neither `spec.versions` nor `spec.version`
    #[error("CRD '{crd}' declares no version")]
    MissingVersion { crd: String },

    /// Schema is structurally invalid
    #[error("error on building schema validator for {gvk}: {message}")]
    SchemaCompile {
        gvk: GroupVersionKind,
        message: String,
    },

    /// No validator registered for a resource's GVK
    #[error(
        "no CRD is found for the resource of {gvk} kind\nHint: load the CRD with load(), load_documents() or load_files() first"
    )]
    NoSchemaRegistered { gvk: GroupVersionKind },

    /// File could not be read
    #[error("error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any of the above, tagged with the document it came from
    #[error("error on {source_name}: {source}")]
    Source {
        source_name: String,
        #[source]
        source: Box<Error>,
    },
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Decode(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(e.to_string())
    }
}

impl Error {
    /// Attach the identity of the offending document
    pub fn in_source(self, source_name: impl Into<String>) -> Self {
        Error::Source {
            source_name: source_name.into(),
            source: Box::new(self),
        }
    }

    /// The error without any [`Error::Source`] wrapping
    pub fn root(&self) -> &Error {
        match self {
            Error::Source { source, .. } => source.root(),
            other => other,
        }
    }

    /// Check if this is a lookup miss for an unregistered GVK
    pub fn is_no_schema_registered(&self) -> bool {
        matches!(self.root(), Error::NoSchemaRegistered { .. })
    }
}
