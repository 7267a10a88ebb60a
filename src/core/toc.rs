//! The `contents.json` descriptor: a multi-configuration module's table of
//! contents.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::core::validate::{require_array, require_object, require_str, Kind, ShapeError};

/// Parsed TOC header, before configuration aggregation.
#[derive(Debug, Clone)]
pub struct TocHeader {
    pub name: String,
    pub long_name: String,
    /// Settings-file paths relative to the module root, in listing order.
    pub contents: Vec<String>,
}

/// Validate the TOC document shape and extract its header.
///
/// Required shape: `module` object with `name` and `long_name` strings,
/// plus a top-level `contents` array of strings.
pub fn parse_header(doc: &Value) -> Result<TocHeader, ShapeError> {
    require_object(doc, "module")?;
    let name = require_str(doc, "module::name")?;
    let long_name = require_str(doc, "module::long_name")?;
    let entries = require_array(doc, "contents")?;

    let mut contents = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let Some(entry) = entry.as_str() else {
            return Err(ShapeError::WrongKind {
                key: format!("contents[{index}]"),
                expected: Kind::String,
            });
        };
        contents.push(entry.to_string());
    }

    Ok(TocHeader {
        name: name.to_string(),
        long_name: long_name.to_string(),
        contents,
    })
}

/// Check a module name charset: alphanumeric, `_` and `/` only.
pub fn valid_module_name(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '/')
}

/// A module's table of contents: metadata plus the named configurations,
/// keyed by each configuration settings file's own `name` field and kept
/// in descriptor listing order.
#[derive(Debug, Clone)]
pub struct ModuleToc {
    pub name: String,
    pub long_name: String,
    configurations: Vec<(String, PathBuf)>,
}

impl ModuleToc {
    pub fn new(name: impl Into<String>, long_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            long_name: long_name.into(),
            configurations: Vec::new(),
        }
    }

    /// Add a configuration. Rejects duplicate configuration names.
    pub fn insert(&mut self, config_name: impl Into<String>, path: impl Into<PathBuf>) -> bool {
        let config_name = config_name.into();
        if self.find(&config_name).is_some() {
            return false;
        }
        self.configurations.push((config_name, path.into()));
        true
    }

    /// Settings-file path for a configuration, if listed.
    pub fn find(&self, config_name: &str) -> Option<&Path> {
        self.configurations
            .iter()
            .find(|(name, _)| name.as_str() == config_name)
            .map(|(_, path)| path.as_path())
    }

    /// Number of configurations.
    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    /// Iterate over (configuration name, settings path) in listing order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.configurations
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }
}
