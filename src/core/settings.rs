//! The `settings.json` descriptor: one module configuration.

use serde_json::{Map, Value};

use crate::core::validate::{require_object, require_str, ShapeError};

/// A single module configuration parsed from a settings descriptor.
///
/// Immutable once parsed; the library persists only name → path, so a
/// settings record lives for the duration of one registration or run
/// resolution and is then discarded.
#[derive(Debug, Clone)]
pub struct ModuleSettings {
    pub name: String,
    pub long_name: String,
    /// Driver script path, relative to the module root.
    pub driver: String,
    pub varlist: Map<String, Value>,
    pub obslist: Map<String, Value>,
}

impl ModuleSettings {
    /// Validate a parsed settings document and extract its fields.
    ///
    /// Required shape: `settings` object with `name`, `long_name` and
    /// `driver` strings, plus top-level `varlist` and `obslist` objects.
    pub fn from_value(doc: &Value) -> Result<Self, ShapeError> {
        require_object(doc, "settings")?;
        let name = require_str(doc, "settings::name")?;
        let long_name = require_str(doc, "settings::long_name")?;
        let driver = require_str(doc, "settings::driver")?;
        let varlist = require_object(doc, "varlist")?;
        let obslist = require_object(doc, "obslist")?;

        Ok(Self {
            name: name.to_string(),
            long_name: long_name.to_string(),
            driver: driver.to_string(),
            varlist: varlist.clone(),
            obslist: obslist.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validate::Kind;
    use serde_json::json;

    fn valid_doc() -> Value {
        json!({
            "settings": {
                "name": "CMECTEST",
                "long_name": "Test module",
                "driver": "driver.sh"
            },
            "varlist": {"tas": {"units": "K"}},
            "obslist": {}
        })
    }

    #[test]
    fn parses_valid_settings() {
        let settings = ModuleSettings::from_value(&valid_doc()).expect("parse");
        assert_eq!(settings.name, "CMECTEST");
        assert_eq!(settings.long_name, "Test module");
        assert_eq!(settings.driver, "driver.sh");
        assert_eq!(settings.varlist.len(), 1);
        assert!(settings.obslist.is_empty());
    }

    #[test]
    fn missing_driver_is_reported_with_path() {
        let mut doc = valid_doc();
        doc["settings"]
            .as_object_mut()
            .expect("settings object")
            .remove("driver");
        let err = ModuleSettings::from_value(&doc).unwrap_err();
        assert_eq!(
            err,
            ShapeError::Missing {
                key: "settings::driver".to_string()
            }
        );
    }

    #[test]
    fn missing_varlist_is_rejected() {
        let mut doc = valid_doc();
        doc.as_object_mut().expect("object").remove("varlist");
        let err = ModuleSettings::from_value(&doc).unwrap_err();
        assert_eq!(
            err,
            ShapeError::Missing {
                key: "varlist".to_string()
            }
        );
    }

    #[test]
    fn mistyped_obslist_is_rejected() {
        let mut doc = valid_doc();
        doc["obslist"] = json!("not an object");
        let err = ModuleSettings::from_value(&doc).unwrap_err();
        assert_eq!(
            err,
            ShapeError::WrongKind {
                key: "obslist".to_string(),
                expected: Kind::Object
            }
        );
    }
}
