//! `run` command: resolve targets against the library and execute the
//! selected driver scripts.
//!
//! Resolution re-reads descriptors from disk on every invocation; the
//! library is the single source of truth and module directories may have
//! changed since registration. Execution is sequential and best-effort: a
//! failing driver script is reported but does not stop the batch.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::target::RunTarget;
use crate::error::Error;
use crate::io::descriptor;
use crate::io::library::Library;
use crate::io::process::ProcessRunner;
use crate::io::prompt::Confirm;
use crate::io::script::{self, ScriptEnv};

const BANNER: &str = "------------------------------------------------------------";

/// A module invocation produced by target resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRun {
    /// Directory exported as `CMEC_CODE_DIR`.
    pub module_path: PathBuf,
    /// Driver script to invoke.
    pub driver_script: PathBuf,
    /// Output-directory label relative to the working root.
    pub working_dir: PathBuf,
}

/// Expand `module[/configuration]` targets into concrete driver
/// invocations, preserving target order and TOC listing order.
pub fn resolve(lib: &Library, targets: &[String]) -> Result<Vec<ResolvedRun>, Error> {
    let mut runs = Vec::new();
    for raw in targets {
        let target = RunTarget::parse(raw)?;
        let module_path = lib
            .find(&target.module)
            .ok_or_else(|| Error::ModuleNotFound {
                name: target.module.clone(),
            })?;

        if descriptor::has_settings(module_path) {
            // Single-configuration module: no sub-selection to make.
            if target.configuration.is_some() {
                return Err(Error::UnexpectedConfiguration {
                    module: target.module.clone(),
                });
            }
            let settings = descriptor::read_settings(&descriptor::settings_path(module_path))?;
            runs.push(ResolvedRun {
                module_path: module_path.to_path_buf(),
                driver_script: module_path.join(&settings.driver),
                working_dir: PathBuf::from(&settings.name),
            });
        } else if descriptor::has_toc(module_path) {
            let toc = descriptor::read_toc(module_path)?;
            let mut matched = false;
            for (config, settings_path) in toc.iter() {
                if let Some(wanted) = &target.configuration
                    && wanted.as_str() != config
                {
                    continue;
                }
                let settings = descriptor::read_settings(settings_path)?;
                runs.push(ResolvedRun {
                    module_path: settings_path.parent().unwrap_or(module_path).to_path_buf(),
                    driver_script: module_path.join(&settings.driver),
                    working_dir: Path::new(&toc.name).join(&settings.name),
                });
                matched = true;
            }
            if let Some(wanted) = target.configuration
                && !matched
            {
                return Err(Error::ConfigurationNotFound {
                    module: target.module,
                    configuration: wanted,
                });
            }
        } else {
            return Err(Error::NoDescriptor {
                path: module_path.to_path_buf(),
            });
        }
    }

    if runs.is_empty() {
        return Err(Error::NoDriversResolved);
    }
    debug!(runs = runs.len(), "targets resolved");
    Ok(runs)
}

/// Check a run root directory and make it absolute.
fn absolute_dir(path: &Path) -> Result<PathBuf, Error> {
    let abs = std::path::absolute(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if !abs.exists() {
        return Err(Error::PathNotFound { path: abs });
    }
    if !abs.is_dir() {
        return Err(Error::NotADirectory { path: abs });
    }
    Ok(abs)
}

/// Execute resolved runs: prepare output directories, write environment
/// scripts, and launch each driver sequentially.
pub fn execute(
    obs_dir: &Path,
    model_dir: &Path,
    working_dir: &Path,
    runs: &[ResolvedRun],
    confirm: &mut dyn Confirm,
    runner: &mut dyn ProcessRunner,
) -> Result<()> {
    let obs = absolute_dir(obs_dir)?;
    let model = absolute_dir(model_dir)?;
    let work = absolute_dir(working_dir)?;

    println!("The following {} modules will be executed:", runs.len());
    println!("{BANNER}");
    for run in runs {
        println!("MODULE_NAME: {}", run.working_dir.display());
        println!("MODULE_PATH: {}", run.module_path.display());
        println!("  {}", run.driver_script.display());
    }
    println!("{BANNER}");

    println!("The following environment variables will be set:");
    println!("{BANNER}");
    println!("CMEC_OBS_DATA={}", obs.display());
    println!("CMEC_MODEL_DATA={}", model.display());
    println!("CMEC_WK_DIR={}/$MODULE_NAME", work.display());
    println!("CMEC_CODE_DIR=$MODULE_PATH");
    println!("{BANNER}");

    println!("Creating output directories");
    for run in runs {
        let output_dir = work.join(&run.working_dir);
        if output_dir.exists() {
            let question = format!("Path {} already exists. Overwrite?", output_dir.display());
            if !confirm.confirm(&question).context("confirm overwrite")? {
                return Err(Error::OutputConflict { path: output_dir }.into());
            }
            fs::remove_dir_all(&output_dir)
                .with_context(|| format!("remove {}", output_dir.display()))?;
        }
        fs::create_dir_all(&output_dir).map_err(|source| Error::DirectoryCreate {
            path: output_dir.clone(),
            source,
        })?;
    }

    // Write every environment script before launching any of them.
    let mut scripts = Vec::with_capacity(runs.len());
    for run in runs {
        let output_dir = work.join(&run.working_dir);
        let env_vars = ScriptEnv {
            code_dir: run.module_path.display().to_string(),
            obs_data: obs.display().to_string(),
            model_data: model.display().to_string(),
            wk_dir: output_dir.display().to_string(),
            driver: run.driver_script.display().to_string(),
        };
        let path = script::write_run_script(&output_dir, &env_vars)?;
        println!("{}", path.display());
        scripts.push((path, output_dir, run.working_dir.clone()));
    }

    println!("Executing driver scripts");
    for (path, output_dir, label) in &scripts {
        println!("{BANNER}");
        println!("{}", label.display());
        match runner.run(path, output_dir) {
            Ok(Some(0)) => {}
            Ok(Some(code)) => {
                println!("Module {} driver exited with status {code}", label.display());
            }
            Ok(None) => {
                println!("Module {} driver terminated by signal", label.display());
            }
            Err(err) => {
                println!("Module {} driver failed to launch: {err:#}", label.display());
            }
        }
    }
    println!("{BANNER}");
    Ok(())
}

/// The `run` command: resolve targets, then execute them.
pub fn run(
    library_path: &Path,
    obs_dir: &Path,
    model_dir: &Path,
    working_dir: &Path,
    targets: &[String],
    confirm: &mut dyn Confirm,
    runner: &mut dyn ProcessRunner,
) -> Result<()> {
    println!("Reading CMEC library");
    let lib = Library::load(library_path)?;

    println!("Identifying drivers");
    let runs = resolve(&lib, targets)?;
    execute(obs_dir, model_dir, working_dir, &runs, confirm, runner)
}
