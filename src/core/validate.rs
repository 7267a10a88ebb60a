//! Required-key checks over parsed JSON documents.
//!
//! Both descriptor readers funnel their shape validation through these
//! helpers so every missing-key and wrong-kind condition reports the same
//! way, with the key path embedded (`settings::name` style, `::` between
//! nesting levels).

use std::fmt;

use serde_json::{Map, Value};

/// Expected JSON kind for a required key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Object,
    String,
    Array,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Object => "object",
            Kind::String => "string",
            Kind::Array => "array",
        };
        f.write_str(name)
    }
}

/// A required-key violation, carrying the offending key path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    Missing { key: String },
    WrongKind { key: String, expected: Kind },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::Missing { key } => write!(f, "missing key \"{key}\""),
            ShapeError::WrongKind { key, expected } => {
                write!(f, "\"{key}\" is not of type {expected}")
            }
        }
    }
}

/// Walk a `::`-separated key path, requiring every level to exist.
fn lookup<'a>(doc: &'a Value, path: &str) -> Result<&'a Value, ShapeError> {
    let mut current = doc;
    let mut walked = String::new();
    for segment in path.split("::") {
        if !walked.is_empty() {
            walked.push_str("::");
        }
        walked.push_str(segment);
        current = current.get(segment).ok_or_else(|| ShapeError::Missing {
            key: walked.clone(),
        })?;
    }
    Ok(current)
}

/// Require `path` to resolve to an object.
pub fn require_object<'a>(doc: &'a Value, path: &str) -> Result<&'a Map<String, Value>, ShapeError> {
    lookup(doc, path)?
        .as_object()
        .ok_or_else(|| ShapeError::WrongKind {
            key: path.to_string(),
            expected: Kind::Object,
        })
}

/// Require `path` to resolve to a string.
pub fn require_str<'a>(doc: &'a Value, path: &str) -> Result<&'a str, ShapeError> {
    lookup(doc, path)?
        .as_str()
        .ok_or_else(|| ShapeError::WrongKind {
            key: path.to_string(),
            expected: Kind::String,
        })
}

/// Require `path` to resolve to an array.
pub fn require_array<'a>(doc: &'a Value, path: &str) -> Result<&'a [Value], ShapeError> {
    lookup(doc, path)?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| ShapeError::WrongKind {
            key: path.to_string(),
            expected: Kind::Array,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn require_str_resolves_nested_path() {
        let doc = json!({"settings": {"name": "PMP"}});
        assert_eq!(require_str(&doc, "settings::name").expect("name"), "PMP");
    }

    #[test]
    fn missing_key_reports_walked_path() {
        let doc = json!({"settings": {}});
        let err = require_str(&doc, "settings::driver").unwrap_err();
        assert_eq!(
            err,
            ShapeError::Missing {
                key: "settings::driver".to_string()
            }
        );
        assert_eq!(err.to_string(), "missing key \"settings::driver\"");
    }

    #[test]
    fn missing_intermediate_reports_partial_path() {
        let doc = json!({});
        let err = require_str(&doc, "settings::driver").unwrap_err();
        assert_eq!(
            err,
            ShapeError::Missing {
                key: "settings".to_string()
            }
        );
    }

    #[test]
    fn wrong_kind_names_expected_type() {
        let doc = json!({"varlist": []});
        let err = require_object(&doc, "varlist").unwrap_err();
        assert_eq!(err.to_string(), "\"varlist\" is not of type object");
    }

    #[test]
    fn require_array_returns_slice() {
        let doc = json!({"contents": ["a", "b"]});
        assert_eq!(require_array(&doc, "contents").expect("contents").len(), 2);
    }
}
