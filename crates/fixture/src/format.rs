//! Fixture file formats
//!
//! | Extension | Parser | Extended types |
//! |-----------|--------|----------------|
//! | `json` | `serde_json` | yes: `$oid`, `$date`, `$numberLong`, ... |
//! | `yaml` | `serde_yaml` | no: `{"$date": ...}` stays a plain document |
//!
//! Extensions match exactly: `yml`, `JSON` and friends are not fixtures.
//! Either way a file must hold a sequence of documents.

use std::fmt;
use std::path::Path;

use mockmongo_core::{extjson, Document, Value};

use crate::error::{FixtureError, FixtureResult};

/// Format of a fixture file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureFormat {
    /// Extended JSON
    Json,
    /// Plain YAML
    Yaml,
}

impl FixtureFormat {
    /// Format for a file extension (without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "json" => Some(FixtureFormat::Json),
            "yaml" => Some(FixtureFormat::Yaml),
            _ => None,
        }
    }

    /// The file extension
    pub fn extension(self) -> &'static str {
        match self {
            FixtureFormat::Json => "json",
            FixtureFormat::Yaml => "yaml",
        }
    }

    /// Parse fixture file content
    ///
    /// `path` is only used in error messages.
    pub fn parse(self, path: &Path, content: &str) -> FixtureResult<Vec<Document>> {
        match self {
            FixtureFormat::Json => parse_json(path, content),
            FixtureFormat::Yaml => parse_yaml(path, content),
        }
    }

    /// Read and parse a fixture file
    pub fn read(self, path: &Path) -> FixtureResult<Vec<Document>> {
        let content =
            std::fs::read_to_string(path).map_err(|e| FixtureError::io(path, e))?;
        self.parse(path, &content)
    }
}

impl fmt::Display for FixtureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

fn parse_json(path: &Path, content: &str) -> FixtureResult<Vec<Document>> {
    let json: serde_json::Value =
        serde_json::from_str(content).map_err(|e| FixtureError::parse(path, e))?;
    let items = match json {
        serde_json::Value::Array(items) => items,
        other => {
            return Err(FixtureError::invalid(
                path,
                format!("expected an array of documents, found {}", json_kind(&other)),
            ))
        }
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let value = extjson::decode(item).map_err(|e| FixtureError::parse(path, e))?;
            into_document(path, index, value)
        })
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

fn parse_yaml(path: &Path, content: &str) -> FixtureResult<Vec<Document>> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| FixtureError::parse(path, e))?;
    let items = match yaml {
        serde_yaml::Value::Sequence(items) => items,
        _ => {
            return Err(FixtureError::invalid(
                path,
                "expected a sequence of mappings",
            ))
        }
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let value = yaml_to_value(path, item)?;
            into_document(path, index, value)
        })
        .collect()
}

fn into_document(path: &Path, index: usize, value: Value) -> FixtureResult<Document> {
    match value {
        Value::Document(doc) => Ok(doc),
        other => Err(FixtureError::invalid(
            path,
            format!("entry {} is {}, not a document", index, other.type_name()),
        )),
    }
}

fn yaml_to_value(path: &Path, yaml: serde_yaml::Value) -> FixtureResult<Value> {
    Ok(match yaml {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(|item| yaml_to_value(path, item))
                .collect::<FixtureResult<_>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut doc = Document::new();
            for (key, value) in mapping {
                doc.insert(yaml_key(path, key)?, yaml_to_value(path, value)?);
            }
            Value::Document(doc)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_value(path, tagged.value)?,
    })
}

/// Mapping keys must be scalars; non-string scalars are stringified
fn yaml_key(path: &Path, key: serde_yaml::Value) -> FixtureResult<String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        _ => Err(FixtureError::invalid(path, "mapping keys must be scalars")),
    }
}
