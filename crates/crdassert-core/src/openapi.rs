//! OpenAPI v3 structural schema to JSON Schema translation
//!
//! CRD schemas are written in the OpenAPI v3.0 dialect, which is JSON Schema
//! Draft 4 plus a handful of extensions. The extensions that change what a
//! document may contain are rewritten into plain Draft 4 keywords:
//!
//! - `nullable: true` also admits `null`
//! - `x-kubernetes-int-or-string: true` admits an integer or a string
//!
//! Other `x-kubernetes-*` extensions are kept verbatim; the validator
//! ignores unknown keywords.

use serde_json::{Map, Value, json};

/// Keywords whose value is a map of name -> subschema
const SCHEMA_MAP_KEYWORDS: &[&str] = &["properties", "patternProperties", "definitions"];

/// Keywords whose value is a single subschema (or a boolean)
const SCHEMA_KEYWORDS: &[&str] = &["additionalProperties", "additionalItems", "not"];

/// Keywords whose value is a list of subschemas
const SCHEMA_LIST_KEYWORDS: &[&str] = &["allOf", "anyOf", "oneOf"];

/// Translate a CRD `openAPIV3Schema` into a Draft 4 JSON Schema
pub fn to_json_schema(schema: &Value) -> Value {
    let Some(obj) = schema.as_object() else {
        return schema.clone();
    };

    let mut out = Map::with_capacity(obj.len());

    for (key, value) in obj {
        let k = key.as_str();
        let translated = if SCHEMA_MAP_KEYWORDS.contains(&k) {
            translate_map(value)
        } else if SCHEMA_KEYWORDS.contains(&k) {
            to_json_schema(value)
        } else if SCHEMA_LIST_KEYWORDS.contains(&k) {
            translate_list(value)
        } else if k == "items" {
            // Draft 4 allows both a single schema and a tuple of schemas
            match value {
                Value::Array(_) => translate_list(value),
                other => to_json_schema(other),
            }
        } else {
            value.clone()
        };
        out.insert(key.clone(), translated);
    }

    let nullable = flag(obj, "nullable");

    if flag(obj, "x-kubernetes-int-or-string") {
        apply_int_or_string(&mut out, nullable);
    }

    if nullable {
        apply_nullable(&mut out);
    }

    Value::Object(out)
}

fn flag(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn translate_map(value: &Value) -> Value {
    match value.as_object() {
        Some(map) => Value::Object(
            map.iter()
                .map(|(name, schema)| (name.clone(), to_json_schema(schema)))
                .collect(),
        ),
        None => value.clone(),
    }
}

fn translate_list(value: &Value) -> Value {
    match value.as_array() {
        Some(list) => Value::Array(list.iter().map(to_json_schema).collect()),
        None => value.clone(),
    }
}

fn apply_int_or_string(out: &mut Map<String, Value>, nullable: bool) {
    out.remove("type");

    // Generated CRDs usually spell the alternatives out already
    if out.contains_key("anyOf") {
        return;
    }

    let mut alternatives = vec![json!({"type": "integer"}), json!({"type": "string"})];
    if nullable {
        alternatives.push(json!({"type": "null"}));
    }
    out.insert("anyOf".into(), Value::Array(alternatives));
}

fn apply_nullable(out: &mut Map<String, Value>) {
    let null = Value::String("null".into());

    let widened = match out.get("type") {
        Some(Value::String(t)) => Some(json!([t, "null"])),
        _ => None,
    };

    if let Some(types) = widened {
        out.insert("type".into(), types);
    } else if let Some(Value::Array(types)) = out.get_mut("type") {
        if !types.contains(&null) {
            types.push(null);
        }
    }

    if let Some(Value::Array(values)) = out.get_mut("enum") {
        if !values.contains(&Value::Null) {
            values.push(Value::Null);
        }
    }
}
