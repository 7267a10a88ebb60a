//! Descriptor file probing and reading.
//!
//! Two read modes: the strict readers fail on any parse or shape problem
//! (direct registration, run resolution), while [`try_read_settings`] logs
//! and skips so TOC aggregation stays best-effort.

use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::core::settings::ModuleSettings;
use crate::core::toc::{parse_header, valid_module_name, ModuleToc};
use crate::error::Error;

/// Well-known settings descriptor filename.
pub const SETTINGS_FILENAME: &str = "settings.json";

/// Well-known table-of-contents descriptor filename.
pub const TOC_FILENAME: &str = "contents.json";

/// Path of the settings descriptor inside a module directory.
pub fn settings_path(module_dir: &Path) -> PathBuf {
    module_dir.join(SETTINGS_FILENAME)
}

/// Does `module_dir` carry a settings descriptor?
pub fn has_settings(module_dir: &Path) -> bool {
    settings_path(module_dir).exists()
}

/// Does `module_dir` carry a table-of-contents descriptor?
pub fn has_toc(module_dir: &Path) -> bool {
    module_dir.join(TOC_FILENAME).exists()
}

/// Open and parse a JSON document, folding read failures into the parse
/// error class.
pub(crate) fn read_json(path: &Path, what: &'static str) -> Result<Value, Error> {
    let file = fs::File::open(path).map_err(|source| Error::Parse {
        what,
        path: path.to_path_buf(),
        source: serde_json::Error::io(source),
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::Parse {
        what,
        path: path.to_path_buf(),
        source,
    })
}

/// Strict settings read: parse failures and shape violations are errors.
pub fn read_settings(path: &Path) -> Result<ModuleSettings, Error> {
    let doc = read_json(path, "settings")?;
    ModuleSettings::from_value(&doc).map_err(|violation| Error::MalformedDescriptor {
        what: "settings",
        path: path.to_path_buf(),
        violation,
    })
}

/// Lenient settings read for TOC aggregation: failures are logged and
/// yield `None`.
pub fn try_read_settings(path: &Path) -> Option<ModuleSettings> {
    match read_settings(path) {
        Ok(settings) => Some(settings),
        Err(err) => {
            warn!(path = %path.display(), %err, "skipping unreadable configuration");
            None
        }
    }
}

/// Read a module's `contents.json` and aggregate its configurations.
///
/// Each `contents` entry is resolved relative to `module_dir` and read
/// leniently; entries whose settings file is missing or malformed are
/// skipped. The configuration key is the settings file's own `name`
/// field, not the listing entry.
pub fn read_toc(module_dir: &Path) -> Result<ModuleToc, Error> {
    let path = module_dir.join(TOC_FILENAME);
    let doc = read_json(&path, "contents")?;
    let header = parse_header(&doc).map_err(|violation| Error::MalformedDescriptor {
        what: "contents",
        path: path.clone(),
        violation,
    })?;
    if !valid_module_name(&header.name) {
        return Err(Error::InvalidName {
            path,
            name: header.name,
        });
    }

    let mut toc = ModuleToc::new(header.name, header.long_name);
    for entry in &header.contents {
        let settings_path = module_dir.join(entry);
        let Some(settings) = try_read_settings(&settings_path) else {
            continue;
        };
        if !toc.insert(settings.name.clone(), settings_path) {
            warn!(
                configuration = settings.name.as_str(),
                "skipping repeated configuration name"
            );
        }
    }
    debug!(
        module = toc.name.as_str(),
        configurations = toc.len(),
        "table of contents read"
    );
    Ok(toc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{write_settings, write_toc};
    use std::fs;

    #[test]
    fn read_settings_round_trip() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_settings(temp.path(), "CMECTEST", "driver.sh");

        let settings = read_settings(&settings_path(temp.path())).expect("read");
        assert_eq!(settings.name, "CMECTEST");
        assert_eq!(settings.driver, "driver.sh");
    }

    #[test]
    fn read_settings_reports_missing_key() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(SETTINGS_FILENAME);
        fs::write(
            &path,
            r#"{"settings": {"name": "x", "long_name": "y"}, "varlist": {}, "obslist": {}}"#,
        )
        .expect("write");

        let err = read_settings(&path).unwrap_err();
        assert!(matches!(err, Error::MalformedDescriptor { .. }));
        assert!(err.to_string().contains("settings::driver"));
    }

    #[test]
    fn read_settings_reports_invalid_json() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(SETTINGS_FILENAME);
        fs::write(&path, "{not json").expect("write");

        let err = read_settings(&path).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn try_read_settings_swallows_failures() {
        let temp = tempfile::tempdir().expect("tempdir");
        assert!(try_read_settings(&temp.path().join("absent.json")).is_none());
    }

    #[test]
    fn toc_aggregation_skips_malformed_entries() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_settings(&temp.path().join("a"), "A", "driver.sh");
        write_settings(&temp.path().join("b"), "B", "driver.sh");
        // Third entry is missing the driver key and must be skipped.
        let broken = temp.path().join("c");
        fs::create_dir_all(&broken).expect("create dir");
        fs::write(
            broken.join(SETTINGS_FILENAME),
            r#"{"settings": {"name": "C", "long_name": "c"}, "varlist": {}, "obslist": {}}"#,
        )
        .expect("write");
        write_toc(
            temp.path(),
            "TRIO",
            &[
                "a/settings.json",
                "b/settings.json",
                "c/settings.json",
            ],
        );

        let toc = read_toc(temp.path()).expect("read toc");
        assert_eq!(toc.len(), 2);
        let names: Vec<&str> = toc.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn toc_keys_configurations_by_settings_name() {
        let temp = tempfile::tempdir().expect("tempdir");
        // Directory is called "one" but the settings name is "meanclimate".
        write_settings(&temp.path().join("one"), "meanclimate", "driver.sh");
        write_toc(temp.path(), "PMP", &["one/settings.json"]);

        let toc = read_toc(temp.path()).expect("read toc");
        assert!(toc.find("meanclimate").is_some());
        assert!(toc.find("one").is_none());
    }

    #[test]
    fn toc_rejects_invalid_module_name() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_toc(temp.path(), "bad name", &[]);

        let err = read_toc(temp.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidName { .. }));
    }

    #[test]
    fn probes_distinguish_descriptor_kinds() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_settings(temp.path(), "solo", "driver.sh");
        assert!(has_settings(temp.path()));
        assert!(!has_toc(temp.path()));
    }
}
