//! Persistent module library stored as a single JSON file.
//!
//! The on-disk document is `{ "version", "cmec-driver", "modules" }`; the
//! `cmec-driver` object is a reserved namespace carried through untouched.
//! The store keeps the parsed document and a name → path map side by side
//! and updates both on every mutation.
//!
//! There is no inter-process locking and `save` is a plain truncating
//! write; concurrent invocations against the same file race unguarded.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use jsonschema::Draft;
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::error::Error;
use crate::io::descriptor::read_json;

/// Well-known library filename inside the home directory.
pub const LIBRARY_FILENAME: &str = ".cmeclibrary";

/// Version string written to new libraries and compared against on load.
pub const DRIVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const LIBRARY_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/schemas/library/v1.schema.json"
));

/// Resolve the library file location.
///
/// Order: explicit override (the `--library` flag), `$HOME`, then the
/// current user's password database entry. Resolved once at process start
/// and handed to [`Library::load`].
pub fn locate_library(override_path: Option<PathBuf>) -> Result<PathBuf, Error> {
    if let Some(path) = override_path {
        return Ok(path);
    }

    if let Some(home) = env::var_os("HOME") {
        let home = PathBuf::from(home);
        if !home.is_dir() {
            return Err(Error::Environment {
                detail: format!(
                    "$HOME points to an invalid home directory {}",
                    home.display()
                ),
            });
        }
        return Ok(home.join(LIBRARY_FILENAME));
    }

    let user = nix::unistd::User::from_uid(nix::unistd::getuid())
        .map_err(|errno| Error::Environment {
            detail: format!("password database lookup failed: {errno}"),
        })?
        .ok_or_else(|| Error::Environment {
            detail: "no password database entry for the current user".to_string(),
        })?;
    if !user.dir.is_dir() {
        return Err(Error::Environment {
            detail: format!(
                "password database home directory {} does not exist",
                user.dir.display()
            ),
        });
    }
    Ok(user.dir.join(LIBRARY_FILENAME))
}

/// The module registry: name → module directory.
#[derive(Debug)]
pub struct Library {
    path: PathBuf,
    modules: BTreeMap<String, PathBuf>,
    doc: Value,
}

impl Library {
    /// Load the library at `path`, creating a fresh empty one first if the
    /// file does not exist yet.
    pub fn load(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            println!("CMEC library not found; creating new library");
            write_document(path, &new_document())?;
        }

        let doc = read_json(path, "library")?;
        check_schema(&doc, path)?;

        let version = doc
            .get("version")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed(path, "missing key \"version\""))?;
        // Plain string comparison, not semantic versioning.
        if DRIVER_VERSION < version {
            return Err(Error::VersionMismatch {
                library: version.to_string(),
                driver: DRIVER_VERSION.to_string(),
            });
        }

        let entries = doc
            .get("modules")
            .and_then(Value::as_object)
            .ok_or_else(|| malformed(path, "missing key \"modules\""))?;
        let mut modules = BTreeMap::new();
        for (name, value) in entries {
            let module_path = value.as_str().ok_or_else(|| {
                malformed(path, "an entry of \"modules\" is not of type string")
            })?;
            if modules
                .insert(name.clone(), PathBuf::from(module_path))
                .is_some()
            {
                return Err(Error::DuplicateModule { name: name.clone() });
            }
        }
        debug!(path = %path.display(), modules = modules.len(), "library loaded");

        Ok(Self {
            path: path.to_path_buf(),
            modules,
            doc,
        })
    }

    /// Write the document back to disk. Truncating write, not atomic.
    pub fn save(&self) -> Result<(), Error> {
        write_document(&self.path, &self.doc)
    }

    /// Add a module. Rejects names that are already registered.
    pub fn insert(&mut self, name: &str, path: &Path) -> bool {
        if self.modules.contains_key(name) {
            error!(
                name,
                "module already exists in library; if the path has changed first run \"unregister\""
            );
            return false;
        }
        self.modules.insert(name.to_string(), path.to_path_buf());
        self.doc["modules"][name] = Value::String(path.display().to_string());
        true
    }

    /// Remove a module. Returns `false` when the name is not registered.
    pub fn remove(&mut self, name: &str) -> Result<bool, Error> {
        if !self.modules.contains_key(name) {
            error!(name, "module not found in library");
            return Ok(false);
        }
        let entries = self
            .doc
            .get_mut("modules")
            .and_then(Value::as_object_mut)
            .ok_or_else(|| Error::InternalInconsistency {
                detail: "\"modules\" is missing from the document".to_string(),
            })?;
        if entries.remove(name).is_none() {
            return Err(Error::InternalInconsistency {
                detail: format!("module \"{name}\" appears in the map but not in the document"),
            });
        }
        self.modules.remove(name);
        Ok(true)
    }

    /// Registered path for `name`, if any.
    pub fn find(&self, name: &str) -> Option<&Path> {
        self.modules.get(name).map(PathBuf::as_path)
    }

    /// Number of registered modules.
    pub fn size(&self) -> usize {
        self.modules.len()
    }

    /// Iterate over (name, path) pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.modules
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }
}

fn new_document() -> Value {
    json!({
        "version": DRIVER_VERSION,
        "cmec-driver": {},
        "modules": {},
    })
}

fn malformed(path: &Path, detail: impl Into<String>) -> Error {
    Error::MalformedLibrary {
        path: path.to_path_buf(),
        detail: detail.into(),
    }
}

/// Validate the library document against the embedded JSON Schema
/// (Draft 2020-12), then let the caller apply semantic checks.
fn check_schema(doc: &Value, path: &Path) -> Result<(), Error> {
    static VALIDATOR: LazyLock<jsonschema::Validator> = LazyLock::new(|| {
        let schema: Value =
            serde_json::from_str(LIBRARY_SCHEMA).expect("library schema should be valid json");
        jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(&schema)
            .expect("library schema should compile")
    });

    let messages: Vec<String> = VALIDATOR.iter_errors(doc).map(|err| err.to_string()).collect();
    if !messages.is_empty() {
        return Err(malformed(path, messages.join("; ")));
    }
    Ok(())
}

fn write_document(path: &Path, doc: &Value) -> Result<(), Error> {
    let mut payload = serde_json::to_string_pretty(doc).map_err(|source| Error::Parse {
        what: "library",
        path: path.to_path_buf(),
        source,
    })?;
    payload.push('\n');
    fs::write(path, payload).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}
