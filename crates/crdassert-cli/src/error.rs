//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use crdassert_core::Error as CoreError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// One or more resources violated their schema
    #[error("Validation failed: {failed} of {total} resource(s) violate their CRD schema")]
    #[diagnostic(code(crdassert::cli::validation))]
    ValidationFailed { failed: usize, total: usize },

    /// A CRD could not be loaded
    #[error("CRD error: {message}")]
    #[diagnostic(code(crdassert::cli::crd))]
    Crd {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// A resource's kind has no loaded CRD
    #[error("{message}")]
    #[diagnostic(
        code(crdassert::cli::no_schema),
        help("pass the CRD that defines this kind with --crd")
    )]
    NoSchema { message: String },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(crdassert::cli::io))]
    Io { message: String },

    /// Wrapped error for passthrough (stores the formatted message)
    #[error("{message}")]
    #[diagnostic(code(crdassert::cli::error))]
    Other { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::ValidationFailed { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Crd { .. } => exit_codes::CRD_ERROR,
            CliError::NoSchema { .. } => exit_codes::NO_SCHEMA_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Other { .. } => exit_codes::ERROR,
        }
    }

    /// Create an error for a failed CRD load
    pub fn crd(err: CoreError) -> Self {
        if matches!(err.root(), CoreError::Io { .. }) {
            return Self::from(err);
        }

        let help = match err.root() {
            CoreError::MissingSchema { .. } => {
                Some("add schema.openAPIV3Schema to the version".to_string())
            }
            CoreError::UnsupportedCrdShape { .. } => Some(
                "only apiextensions.k8s.io/v1 and v1beta1 CustomResourceDefinitions can be loaded"
                    .to_string(),
            ),
            _ => None,
        };

        Self::Crd {
            message: err.to_string(),
            help,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err.root() {
            CoreError::Io { .. } => CliError::Io { message },
            CoreError::NoSchemaRegistered { .. } => CliError::NoSchema { message },
            CoreError::UnsupportedCrdShape { .. }
            | CoreError::MissingSchema { .. }
            | CoreError::MissingVersion { .. }
            | CoreError::SchemaCompile { .. } => CliError::Crd {
                message,
                help: None,
            },
            _ => CliError::Other { message },
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
