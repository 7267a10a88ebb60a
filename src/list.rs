//! `list` command: print registered modules and their configuration
//! counts. Read-only; the library file is never rewritten (beyond the
//! auto-create on a first-ever invocation).

use std::path::Path;

use anyhow::Result;

use crate::io::descriptor;
use crate::io::library::Library;

const BANNER: &str = "------------------------------------------------------------";

/// List registered modules; with `all`, list each TOC module's
/// configurations as well.
pub fn list(library_path: &Path, all: bool) -> Result<()> {
    println!("Reading CMEC library");
    let lib = Library::load(library_path)?;

    if lib.size() == 0 {
        println!("CMEC library contains no modules");
        return Ok(());
    }

    println!("CMEC library contains {} modules:", lib.size());
    println!("{BANNER}");
    for (name, path) in lib.iter() {
        if descriptor::has_toc(path) {
            let toc = descriptor::read_toc(path)?;
            println!("  {} [{} configurations]", name, toc.len());
            if all {
                for (config, _) in toc.iter() {
                    println!("    {name}/{config}");
                }
            }
        } else {
            println!("  {name} [1 configuration]");
        }
    }
    println!("{BANNER}");
    Ok(())
}
