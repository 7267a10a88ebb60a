//! Test-only fixtures: module directories, descriptor files, and scripted
//! capability implementations.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::json;

use crate::io::library::LIBRARY_FILENAME;
use crate::io::process::ProcessRunner;
use crate::io::prompt::Confirm;

/// Temp workspace holding a library file location and module directories.
pub struct TestWorkspace {
    temp: tempfile::TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn library_path(&self) -> PathBuf {
        self.temp.path().join(LIBRARY_FILENAME)
    }

    pub fn module_dir(&self, name: &str) -> PathBuf {
        self.temp.path().join("modules").join(name)
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Write a minimal valid `settings.json` into `dir`.
pub fn write_settings(dir: &Path, name: &str, driver: &str) {
    let doc = json!({
        "settings": {
            "name": name,
            "long_name": format!("{name} long name"),
            "driver": driver,
        },
        "varlist": {},
        "obslist": {},
    });
    fs::create_dir_all(dir).expect("create module dir");
    let payload = serde_json::to_string_pretty(&doc).expect("serialize settings");
    fs::write(dir.join("settings.json"), payload).expect("write settings");
}

/// Write a `contents.json` with the given module name and entries into `dir`.
pub fn write_toc(dir: &Path, name: &str, entries: &[&str]) {
    let doc = json!({
        "module": {
            "name": name,
            "long_name": format!("{name} long name"),
        },
        "contents": entries,
    });
    fs::create_dir_all(dir).expect("create module dir");
    let payload = serde_json::to_string_pretty(&doc).expect("serialize contents");
    fs::write(dir.join("contents.json"), payload).expect("write contents");
}

/// Build a multi-configuration module: a TOC plus one settings file per
/// configuration, each under its own subdirectory with a `driver.sh` field.
pub fn write_toc_module(dir: &Path, name: &str, configs: &[&str]) {
    for config in configs {
        write_settings(&dir.join(config), config, "driver.sh");
    }
    let entries: Vec<String> = configs
        .iter()
        .map(|config| format!("{config}/settings.json"))
        .collect();
    let refs: Vec<&str> = entries.iter().map(String::as_str).collect();
    write_toc(dir, name, &refs);
}

/// [`Confirm`] impl that replays a scripted sequence of answers.
///
/// Runs out of answers gracefully: further questions are declined.
pub struct ScriptedConfirm {
    answers: Vec<bool>,
    /// Questions asked, in order.
    pub asked: Vec<String>,
}

impl ScriptedConfirm {
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().rev().copied().collect(),
            asked: Vec::new(),
        }
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        self.asked.push(question.to_string());
        Ok(self.answers.pop().unwrap_or(false))
    }
}

/// [`ProcessRunner`] impl that records launches without spawning anything.
#[derive(Default)]
pub struct RecordingRunner {
    /// (script, workdir) pairs in launch order.
    pub launched: Vec<(PathBuf, PathBuf)>,
    /// Exit codes to hand back, consumed in order (0 once exhausted).
    pub exit_codes: Vec<i32>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&mut self, script: &Path, workdir: &Path) -> Result<Option<i32>> {
        self.launched
            .push((script.to_path_buf(), workdir.to_path_buf()));
        let code = if self.exit_codes.is_empty() {
            0
        } else {
            self.exit_codes.remove(0)
        };
        Ok(Some(code))
    }
}
