//! Compiled CRD schema validators

use std::fmt;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};
use crate::gvk::GroupVersionKind;
use crate::openapi;

/// A single schema violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON pointer to the offending field, `(root)` for the document itself
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Result of validating one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Every violation found, in validator order
    pub errors: Vec<Violation>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn success() -> Self {
        Self::default()
    }

    /// Create a failed validation result with errors
    pub fn failure(errors: Vec<Violation>) -> Self {
        Self { errors }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validator for one CRD version with its compiled schema
pub struct SchemaValidator {
    /// The schema after OpenAPI extensions were translated
    schema: JsonValue,

    /// Compiled JSON Schema validator
    compiled: jsonschema::Validator,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl SchemaValidator {
    /// Compile the `openAPIV3Schema` of the CRD version identified by `gvk`
    pub fn compile(gvk: &GroupVersionKind, openapi_schema: &JsonValue) -> Result<Self> {
        let schema = openapi::to_json_schema(openapi_schema);

        let compiled = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft4)
            .build(&schema)
            .map_err(|e| Error::SchemaCompile {
                gvk: gvk.clone(),
                message: e.to_string(),
            })?;

        Ok(Self { schema, compiled })
    }

    /// Validate a document, collecting every violation.
    ///
    /// Floats with no fractional part (`3.0`) count as integers, as they do
    /// once the apiserver has decoded a manifest.
    pub fn validate(&self, document: &JsonValue) -> ValidationResult {
        let mut document = document.clone();
        coerce_integral_floats(&mut document);

        if self.compiled.is_valid(&document) {
            return ValidationResult::success();
        }

        let errors = self
            .compiled
            .iter_errors(&document)
            .map(|e| {
                let path = e.instance_path.to_string();
                Violation {
                    path: if path.is_empty() {
                        "(root)".to_string()
                    } else {
                        path
                    },
                    message: format_validation_error(&e),
                }
            })
            .collect();

        ValidationResult::failure(errors)
    }

    /// The translated JSON Schema this validator was compiled from
    pub fn schema(&self) -> &JsonValue {
        &self.schema
    }
}

fn coerce_integral_floats(value: &mut JsonValue) {
    match value {
        JsonValue::Array(items) => items.iter_mut().for_each(coerce_integral_floats),
        JsonValue::Object(map) => map.values_mut().for_each(coerce_integral_floats),
        _ => {
            let integral = value
                .as_f64()
                .filter(|f| value.is_f64() && f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER);
            if let Some(f) = integral {
                *value = JsonValue::from(f as i64);
            }
        }
    }
}

/// Largest magnitude below which every integer is exactly representable as f64
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Format a validation error into a user-friendly message
fn format_validation_error(error: &jsonschema::ValidationError) -> String {
    error.to_string().replace('"', "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn gvk() -> GroupVersionKind {
        GroupVersionKind::new("example.com", "v1", "Widget")
    }

    fn widget_schema() -> JsonValue {
        json!({
            "type": "object",
            "required": ["spec"],
            "properties": {
                "spec": {
                    "type": "object",
                    "required": ["size"],
                    "properties": {
                        "size": {"type": "integer", "minimum": 1, "maximum": 10},
                        "color": {"type": "string", "enum": ["red", "blue"]},
                        "port": {"x-kubernetes-int-or-string": true},
                        "note": {"type": "string", "nullable": true}
                    }
                }
            }
        })
    }

    #[test]
    fn test_validation_success() {
        let validator = SchemaValidator::compile(&gvk(), &widget_schema()).unwrap();

        let result = validator.validate(&json!({
            "apiVersion": "example.com/v1",
            "kind": "Widget",
            "spec": {"size": 3, "color": "red", "port": "http", "note": null}
        }));

        assert!(result.is_valid());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_validation_collects_every_error() {
        let validator = SchemaValidator::compile(&gvk(), &widget_schema()).unwrap();

        let result = validator.validate(&json!({
            "spec": {"size": 99, "color": "green", "port": 1.5}
        }));

        assert!(!result.is_valid());
        assert!(result.errors.len() >= 3);
        assert!(result.errors.iter().any(|e| e.path == "/spec/size"));
        assert!(result.errors.iter().any(|e| e.path == "/spec/color"));
        assert!(result.errors.iter().any(|e| e.path == "/spec/port"));
    }

    #[test]
    fn test_root_violation_path() {
        let validator = SchemaValidator::compile(&gvk(), &widget_schema()).unwrap();

        let result = validator.validate(&json!({"kind": "Widget"}));

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "(root)");
        assert!(result.errors[0].message.contains("'spec'"));
    }

    #[test]
    fn test_unknown_fields_are_allowed() {
        let validator = SchemaValidator::compile(&gvk(), &widget_schema()).unwrap();

        let result = validator.validate(&json!({
            "metadata": {"name": "w", "labels": {"a": "b"}},
            "spec": {"size": 1, "extra": true}
        }));

        assert!(result.is_valid());
    }

    #[test]
    fn test_integral_float_is_an_integer() {
        let validator = SchemaValidator::compile(
            &gvk(),
            &json!({"type": "object", "properties": {"replicas": {"type": "integer"}}}),
        )
        .unwrap();

        assert!(validator.validate(&json!({"replicas": 1.0})).is_valid());

        let result = validator.validate(&json!({"replicas": 1.5}));
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "/replicas");
    }

    #[test]
    fn test_compile_error() {
        let result = SchemaValidator::compile(&gvk(), &json!({"type": "widget"}));

        match result {
            Err(Error::SchemaCompile { gvk: failed, .. }) => assert_eq!(failed, gvk()),
            other => panic!("expected SchemaCompile, got {other:?}"),
        }
    }

    #[test]
    fn test_violation_display() {
        let violation = Violation {
            path: "/spec/size".to_string(),
            message: "99 is greater than the maximum of 10".to_string(),
        };
        assert_eq!(
            violation.to_string(),
            "/spec/size: 99 is greater than the maximum of 10"
        );
    }
}
