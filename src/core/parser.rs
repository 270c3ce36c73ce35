//! Shape documents: loading and validation.
//!
//! A shape document is YAML (JSON works too):
//!
//! ```yaml
//! delimiter: "/"
//! shape:
//!   title: post/title
//!   author:
//!     name: post/author/display_name
//! ```
//!
//! Validation reports:
//! - Empty shapes and empty nested collections
//! - Leaves that are not paths (booleans, floats, nulls)
//! - Output keys assigned more than once in one collection

use super::reshape::{output_key, reshape_with};
use super::types::*;
use crate::source::Node;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// A loaded shape document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShapeConfig {
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    pub shape: PathCollection,
}

fn default_delimiter() -> String {
    DEFAULT_DELIMITER.to_string()
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            shape: PathCollection::new(),
        }
    }
}

impl ShapeConfig {
    /// Reshape `source` with this document's shape and delimiter.
    pub fn apply<'a>(&self, source: &'a dyn Node) -> Reshaped<'a> {
        reshape_with(source, &self.shape, &self.delimiter)
    }
}

/// Parse a shape document from disk.
pub fn parse_shape_file(path: &Path) -> Result<ShapeConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    log::debug!("loading shape document {}", path.display());
    parse_shape_config(&content)
}

/// Parse a shape document from a string.
pub fn parse_shape_config(yaml: &str) -> Result<ShapeConfig, String> {
    serde_yaml_ng::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))
}

/// Parse a single path specification (a scalar, sequence or mapping) from
/// YAML or JSON text.
pub fn parse_path_spec(text: &str) -> Result<PathSpec, String> {
    serde_yaml_ng::from_str(text).map_err(|e| format!("YAML parse error: {}", e))
}

/// Convert a YAML value into a path specification.
///
/// Fails only on mapping keys that are neither strings nor integers.
pub fn path_spec_from_yaml(value: &serde_yaml_ng::Value) -> Result<PathSpec, String> {
    serde_yaml_ng::from_value(value.clone()).map_err(|e| format!("invalid path spec: {}", e))
}

/// Convert a JSON value into a path specification. JSON object keys are
/// always strings, so this cannot fail.
pub fn path_spec_from_json(value: &serde_json::Value) -> PathSpec {
    PathSpec::deserialize(value).unwrap_or_else(|e| {
        log::warn!("unexpected JSON path spec: {}", e);
        PathSpec::Invalid
    })
}

impl From<&serde_json::Value> for PathSpec {
    fn from(value: &serde_json::Value) -> Self {
        path_spec_from_json(value)
    }
}

/// Validate a parsed shape document. Returns a list of errors (empty = valid).
pub fn validate_shape(config: &ShapeConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.shape.is_empty() {
        errors.push(ValidationError {
            message: "shape must not be empty".to_string(),
        });
    }

    validate_collection(&config.shape, &config.delimiter, &mut Vec::new(), &mut errors);
    log::debug!("shape validation found {} problems", errors.len());
    errors
}

fn validate_collection(
    collection: &PathCollection,
    delimiter: &str,
    trail: &mut Vec<String>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();

    for (entry, spec) in collection.entries() {
        let key = output_key(entry, spec, delimiter);
        trail.push(key.clone());
        let at = trail.join(" > ");

        if !seen.insert(key) {
            errors.push(ValidationError {
                message: format!("output key '{}' is assigned more than once", at),
            });
        }

        match spec {
            PathSpec::Invalid => errors.push(ValidationError {
                message: format!("entry '{}' is not a path", at),
            }),
            PathSpec::Collection(nested) if nested.is_empty() => {
                errors.push(ValidationError {
                    message: format!("collection '{}' is empty", at),
                })
            }
            PathSpec::Collection(nested) => validate_collection(nested, delimiter, trail, errors),
            PathSpec::Scalar(_) => {}
        }

        trail.pop();
    }
}
