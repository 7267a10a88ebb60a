//! Child-process launch capability for driver scripts.
//!
//! The executor only constructs the invocation; actually running a
//! generated environment script goes through [`ProcessRunner`] so tests
//! record launches instead of spawning shells. Scripts run without a
//! timeout and block the calling thread until they finish.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Launches one generated environment script and waits for it to finish.
pub trait ProcessRunner {
    /// Run `script` with `workdir` as the working directory, returning the
    /// child's exit code (`None` when terminated by a signal).
    fn run(&mut self, script: &Path, workdir: &Path) -> Result<Option<i32>>;
}

/// Runner that spawns the script directly, inheriting stdio so driver
/// output streams to the user's terminal.
pub struct ShellRunner;

impl ProcessRunner for ShellRunner {
    fn run(&mut self, script: &Path, workdir: &Path) -> Result<Option<i32>> {
        debug!(script = %script.display(), workdir = %workdir.display(), "spawning driver script");
        let status = Command::new(script)
            .current_dir(workdir)
            .status()
            .with_context(|| format!("spawn {}", script.display()))?;
        if !status.success() {
            warn!(exit_code = ?status.code(), "driver script failed");
        }
        Ok(status.code())
    }
}
