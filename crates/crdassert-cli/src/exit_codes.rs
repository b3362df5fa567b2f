//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// Success - every resource matched its schema
#[allow(dead_code)]
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Validation error - at least one resource violated its schema
pub const VALIDATION_ERROR: i32 = 2;

/// CRD error - a CRD could not be decoded, normalized or compiled
pub const CRD_ERROR: i32 = 3;

/// No schema - a resource's kind has no loaded CRD
pub const NO_SCHEMA_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;
