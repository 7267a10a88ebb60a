//! Typed failure taxonomy for library, descriptor, and run operations.
//!
//! Core and io functions return these so callers (and tests) can match on
//! the failure class; orchestration modules wrap them in `anyhow` with
//! extra context on the way up to `main`.

use std::path::PathBuf;

use crate::core::validate::ShapeError;

/// Result alias for operations that fail with an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Structured failures surfaced by driver operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The byte stream at `path` is not valid JSON (or could not be read).
    #[error("malformed {what} file {}: {source}", .path.display())]
    Parse {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Valid JSON, but a required descriptor key is missing or mistyped.
    #[error("malformed {what} file {}: {violation}", .path.display())]
    MalformedDescriptor {
        what: &'static str,
        path: PathBuf,
        violation: ShapeError,
    },

    /// The library document fails schema or key validation.
    #[error("malformed library file {}: {detail}", .path.display())]
    MalformedLibrary { path: PathBuf, detail: String },

    /// A TOC module name contains characters outside alnum/`_`/`/`.
    #[error(
        "module name \"{name}\" in {} must only contain alphanumeric characters, '_' or '/'",
        .path.display()
    )]
    InvalidName { path: PathBuf, name: String },

    /// A run target string violates the target syntax.
    #[error("invalid run target \"{target}\": {reason}")]
    InvalidTarget { target: String, reason: &'static str },

    /// Insert of a module name that is already registered.
    #[error(
        "module \"{name}\" already exists in library; if the path has changed first run \"unregister {name}\""
    )]
    DuplicateModule { name: String },

    /// A run target names a module that is not registered.
    #[error("module \"{name}\" not found in library")]
    ModuleNotFound { name: String },

    /// A run target names a configuration the module's TOC does not list.
    #[error("module \"{module}\" does not contain configuration \"{configuration}\"")]
    ConfigurationNotFound { module: String, configuration: String },

    /// A configuration suffix was given for a single-configuration module.
    #[error("module \"{module}\" only contains a single configuration")]
    UnexpectedConfiguration { module: String },

    /// A module directory contains neither descriptor file.
    #[error(
        "module path {} must contain contents.json or settings.json",
        .path.display()
    )]
    NoDescriptor { path: PathBuf },

    /// No usable home directory for the library file.
    #[error("unable to locate library: {detail}")]
    Environment { detail: String },

    /// The stored library was written by a newer driver.
    #[error("library version \"{library}\" is greater than driver version \"{driver}\"")]
    VersionMismatch { library: String, driver: String },

    /// A run root directory does not exist.
    #[error("{} does not exist", .path.display())]
    PathNotFound { path: PathBuf },

    /// A run root exists but is not a directory.
    #[error("{} is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    /// Output directory creation failed.
    #[error("unable to create output directory {}: {source}", .path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The user declined to overwrite an existing output directory.
    #[error("unable to clear output directory {}", .path.display())]
    OutputConflict { path: PathBuf },

    /// Target resolution produced no driver scripts.
    #[error("no driver scripts resolved from the requested targets")]
    NoDriversResolved,

    /// The in-memory map and the document tree disagree.
    #[error("library inconsistency: {detail}")]
    InternalInconsistency { detail: String },

    /// Filesystem failure outside the classes above.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
