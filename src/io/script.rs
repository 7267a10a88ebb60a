//! Per-run environment script generation.
//!
//! Each resolved run gets a `cmec_run.bash` in its output directory that
//! exports the four data-location variables and then invokes the module's
//! driver script.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use minijinja::{context, Environment};
use serde::Serialize;

const RUN_SCRIPT_TEMPLATE: &str = include_str!("templates/cmec_run.bash.j2");

/// Name of the generated environment script.
pub const RUN_SCRIPT_NAME: &str = "cmec_run.bash";

/// Absolute paths exported to a driver script.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptEnv {
    /// Module code directory (`CMEC_CODE_DIR`).
    pub code_dir: String,
    /// Observational data directory (`CMEC_OBS_DATA`).
    pub obs_data: String,
    /// Model data directory (`CMEC_MODEL_DATA`).
    pub model_data: String,
    /// Output directory for this run (`CMEC_WK_DIR`).
    pub wk_dir: String,
    /// Driver script invocation line.
    pub driver: String,
}

/// Render and write `cmec_run.bash` into `output_dir`, marking it
/// executable. Returns the script path.
pub fn write_run_script(output_dir: &Path, env_vars: &ScriptEnv) -> Result<PathBuf> {
    let mut env = Environment::new();
    env.add_template("cmec_run", RUN_SCRIPT_TEMPLATE)
        .expect("run script template should be valid");
    let template = env.get_template("cmec_run")?;
    let rendered = template.render(context! { env => env_vars })?;

    let path = output_dir.join(RUN_SCRIPT_NAME);
    fs::write(&path, rendered).with_context(|| format!("write {}", path.display()))?;

    let mut perms = fs::metadata(&path)
        .with_context(|| format!("stat {}", path.display()))?
        .permissions();
    perms.set_mode(0o775);
    fs::set_permissions(&path, perms)
        .with_context(|| format!("mark {} executable", path.display()))?;
    Ok(path)
}
