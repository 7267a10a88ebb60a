//! Command-line interface for the CMEC driver.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cmec_driver::io::library::locate_library;
use cmec_driver::io::process::ShellRunner;
use cmec_driver::io::prompt::TerminalConfirm;
use cmec_driver::{exit_codes, list, logging, register, run};

#[derive(Parser)]
#[command(
    name = "cmec-driver",
    version,
    about = "Registry and invocation tool for CMEC-compliant evaluation modules"
)]
struct Cli {
    /// Library file location (defaults to `.cmeclibrary` in the home
    /// directory).
    #[arg(long, global = true, value_name = "FILE")]
    library: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a module directory to the library.
    Register {
        /// Directory containing `settings.json` or `contents.json`.
        module_dir: PathBuf,
    },
    /// Remove a module from the library.
    Unregister {
        /// Registered module name.
        module: String,
    },
    /// List registered modules.
    List {
        /// Also list each module's configurations.
        #[arg(long)]
        all: bool,
    },
    /// Run registered modules against observational and model data.
    Run {
        /// Observational data directory.
        obs_dir: PathBuf,
        /// Model data directory.
        model_dir: PathBuf,
        /// Output root; each module writes under its own subdirectory.
        working_dir: PathBuf,
        /// Targets of the form `module` or `module/configuration`.
        #[arg(required = true)]
        targets: Vec<String>,
    },
}

fn main() {
    logging::init();
    // Map clap usage errors to the driver's failure code (clap's own
    // convention is exit code 2); --help and --version stay successful.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let failed = err.use_stderr();
            let _ = err.print();
            std::process::exit(if failed { exit_codes::FAILURE } else { exit_codes::OK });
        }
    };
    if let Err(err) = dispatch(cli) {
        eprintln!("{:#}", err);
        std::process::exit(exit_codes::FAILURE);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let library = locate_library(cli.library)?;
    match cli.command {
        Command::Register { module_dir } => register::register(&library, &module_dir),
        Command::Unregister { module } => register::unregister(&library, &module),
        Command::List { all } => list::list(&library, all),
        Command::Run {
            obs_dir,
            model_dir,
            working_dir,
            targets,
        } => run::run(
            &library,
            &obs_dir,
            &model_dir,
            &working_dir,
            &targets,
            &mut TerminalConfirm,
            &mut ShellRunner,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn parse_register() {
        let cli = Cli::parse_from(["cmec-driver", "register", "modules/ilamb"]);
        assert!(matches!(cli.command, Command::Register { .. }));
    }

    #[test]
    fn parse_list_all() {
        let cli = Cli::parse_from(["cmec-driver", "list", "--all"]);
        assert!(matches!(cli.command, Command::List { all: true }));
    }

    #[test]
    fn parse_run_with_targets() {
        let cli = Cli::parse_from([
            "cmec-driver",
            "run",
            "obs",
            "model",
            "work",
            "PMP/meanclimate",
            "CMECTEST",
        ]);
        let Command::Run { targets, .. } = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(targets, vec!["PMP/meanclimate", "CMECTEST"]);
    }

    #[test]
    fn parse_run_requires_a_target() {
        let parsed = Cli::try_parse_from(["cmec-driver", "run", "obs", "model", "work"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn parse_library_override() {
        let cli = Cli::parse_from(["cmec-driver", "--library", "/tmp/lib.json", "list"]);
        assert_eq!(cli.library.as_deref(), Some(Path::new("/tmp/lib.json")));
    }
}
