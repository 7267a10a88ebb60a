//! CLI tests for `run` through the real binary: a registered module's
//! driver script actually executes with the exported environment.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use cmec_driver::exit_codes;
use cmec_driver::test_support::write_settings;

/// Module whose driver records the exported environment into its work dir.
fn write_runnable_module(dir: &Path) {
    write_settings(dir, "CMECTEST", "driver.sh");
    let driver = dir.join("driver.sh");
    fs::write(
        &driver,
        "#!/bin/sh\necho \"$CMEC_MODEL_DATA\" > \"$CMEC_WK_DIR/ran\"\n",
    )
    .expect("write driver");
    let mut perms = fs::metadata(&driver).expect("stat driver").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&driver, perms).expect("chmod driver");
}

fn run_roots(root: &Path) -> (PathBuf, PathBuf, PathBuf) {
    let obs = root.join("obs");
    let model = root.join("model");
    let work = root.join("work");
    for dir in [&obs, &model, &work] {
        fs::create_dir_all(dir).expect("create root");
    }
    (obs, model, work)
}

fn driver(library: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cmec-driver"))
        .arg("--library")
        .arg(library)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("run cmec-driver")
}

#[test]
fn run_executes_driver_with_exported_environment() {
    let temp = tempfile::tempdir().expect("tempdir");
    let library = temp.path().join(".cmeclibrary");
    let module_dir = temp.path().join("modules").join("test");
    write_runnable_module(&module_dir);
    let (obs, model, work) = run_roots(temp.path());

    let output = driver(&library, &["register", module_dir.to_str().expect("utf8")]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let output = driver(
        &library,
        &[
            "run",
            obs.to_str().expect("utf8"),
            model.to_str().expect("utf8"),
            work.to_str().expect("utf8"),
            "CMECTEST",
        ],
    );
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let output_dir = work.join("CMECTEST");
    assert!(output_dir.join("cmec_run.bash").is_file());
    let recorded = fs::read_to_string(output_dir.join("ran")).expect("driver ran");
    assert_eq!(recorded.trim(), model.to_str().expect("utf8"));
}

#[test]
fn run_with_existing_output_and_no_reply_fails_untouched() {
    let temp = tempfile::tempdir().expect("tempdir");
    let library = temp.path().join(".cmeclibrary");
    let module_dir = temp.path().join("modules").join("test");
    write_runnable_module(&module_dir);
    let (obs, model, work) = run_roots(temp.path());

    let output = driver(&library, &["register", module_dir.to_str().expect("utf8")]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let existing = work.join("CMECTEST");
    fs::create_dir_all(&existing).expect("create existing");
    fs::write(existing.join("sentinel"), "keep").expect("write sentinel");

    // stdin is closed, so the overwrite prompt reads an empty reply and
    // declines.
    let output = driver(
        &library,
        &[
            "run",
            obs.to_str().expect("utf8"),
            model.to_str().expect("utf8"),
            work.to_str().expect("utf8"),
            "CMECTEST",
        ],
    );
    assert_eq!(output.status.code(), Some(exit_codes::FAILURE));
    assert!(existing.join("sentinel").is_file());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unable to clear output directory"));
}

#[test]
fn run_with_missing_obs_root_fails() {
    let temp = tempfile::tempdir().expect("tempdir");
    let library = temp.path().join(".cmeclibrary");
    let module_dir = temp.path().join("modules").join("test");
    write_runnable_module(&module_dir);
    let (_obs, model, work) = run_roots(temp.path());

    let output = driver(&library, &["register", module_dir.to_str().expect("utf8")]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let missing = temp.path().join("no-such-obs");
    let output = driver(
        &library,
        &[
            "run",
            missing.to_str().expect("utf8"),
            model.to_str().expect("utf8"),
            work.to_str().expect("utf8"),
            "CMECTEST",
        ],
    );
    assert_eq!(output.status.code(), Some(exit_codes::FAILURE));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"));
}
