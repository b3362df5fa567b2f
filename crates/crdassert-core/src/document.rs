//! Decoding of raw YAML/JSON sources into untyped documents

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// A decoded document together with the name it is reported under
#[derive(Debug, Clone, PartialEq)]
pub struct SourcedDocument {
    pub source_name: String,
    pub value: Value,
}

/// Decode a YAML (or JSON) byte source into its documents.
///
/// Multi-document streams (`---` separated) yield one value per document;
/// empty documents are skipped.
pub fn decode_documents(bytes: &[u8]) -> Result<Vec<Value>> {
    let mut documents = Vec::new();

    for de in serde_yaml::Deserializer::from_slice(bytes) {
        let value = Value::deserialize(de)?;
        if !value.is_null() {
            documents.push(value);
        }
    }

    Ok(documents)
}

/// Decode a source and name each document after it.
///
/// A single document keeps the source name; documents of a stream are
/// suffixed with their 1-based position (`bundle.yaml#2`). A source with
/// no document at all (empty, or only comments and separators) is an error.
pub fn decode_sourced(source_name: &str, bytes: &[u8]) -> Result<Vec<SourcedDocument>> {
    let documents = decode_documents(bytes)?;
    if documents.is_empty() {
        return Err(Error::Decode("no document found".to_string()));
    }
    let multi = documents.len() > 1;

    Ok(documents
        .into_iter()
        .enumerate()
        .map(|(i, value)| SourcedDocument {
            source_name: if multi {
                format!("{}#{}", source_name, i + 1)
            } else {
                source_name.to_string()
            },
            value,
        })
        .collect())
}
