//! `register` and `unregister` command workflows.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::error::Error;
use crate::io::descriptor::{self, SETTINGS_FILENAME, TOC_FILENAME};
use crate::io::library::Library;

const BANNER: &str = "------------------------------------------------------------";

/// Register the module directory at `module_dir` into the library.
///
/// The directory must carry a settings descriptor (single configuration)
/// or a TOC descriptor (multiple configurations); the descriptor's own
/// `name` field becomes the module identity.
pub fn register(library_path: &Path, module_dir: &Path) -> Result<()> {
    let module_dir = std::path::absolute(module_dir)
        .with_context(|| format!("resolve {}", module_dir.display()))?;
    println!("Registering {}", module_dir.display());

    let name = if descriptor::has_settings(&module_dir) {
        println!("Validating {SETTINGS_FILENAME}");
        let settings = descriptor::read_settings(&descriptor::settings_path(&module_dir))?;
        settings.name
    } else if descriptor::has_toc(&module_dir) {
        println!("Validating {TOC_FILENAME}");
        let toc = descriptor::read_toc(&module_dir)?;
        println!("Module {} ({})", toc.name, toc.long_name);
        println!("Contains {} configurations:", toc.len());
        println!("{BANNER}");
        for (config, _) in toc.iter() {
            println!("  {}/{}", toc.name, config);
        }
        println!("{BANNER}");
        toc.name
    } else {
        return Err(Error::NoDescriptor { path: module_dir }.into());
    };
    debug!(name = name.as_str(), "module identity determined");

    println!("Reading CMEC library");
    let mut lib = Library::load(library_path)?;

    println!("Adding new module to library");
    if !lib.insert(&name, &module_dir) {
        return Err(Error::DuplicateModule { name }.into());
    }

    println!("Writing CMEC library");
    lib.save()?;
    Ok(())
}

/// Remove the module named `module` from the library.
pub fn unregister(library_path: &Path, module: &str) -> Result<()> {
    println!("Unregistering {module}");

    println!("Reading CMEC library");
    let mut lib = Library::load(library_path)?;

    println!("Removing module");
    if !lib.remove(module)? {
        return Err(Error::ModuleNotFound {
            name: module.to_string(),
        }
        .into());
    }

    println!("Writing CMEC library");
    lib.save()?;
    Ok(())
}
