use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn drvreg() -> Command {
    Command::new(env!("CARGO_BIN_EXE_drvreg"))
}

fn project(sources: &[&str], registry: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    let drivers = tmp.path().join("drivers");
    fs::create_dir_all(&drivers).unwrap();
    for source in sources {
        let path = drivers.join(source);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }
    fs::write(drivers.join("registry.toml"), format!("[drivers]\n{registry}")).unwrap();
    tmp
}

fn read(root: &Path, name: &str) -> Option<String> {
    fs::read_to_string(root.join("drivers").join(name)).ok()
}

#[test]
fn test_generates_outputs_from_current_directory() {
    let tmp = project(&["vt/vt.c", "fb.c", "nvme/nvme.c"], "vt = true\nfb = true\nnvme = false\n");

    drvreg()
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 of 3 drivers enabled"));

    assert_eq!(
        read(tmp.path(), "drivers_enabled.mk").unwrap(),
        "# Auto-generated. Do not edit.\nDRIVERS := vt/vt.c fb.c\n"
    );
    assert_eq!(
        read(tmp.path(), "drivers_enabled.h").unwrap(),
        "// Auto-generated. Do not edit.\n#ifndef DRIVERS_ENABLED_H\n#define DRIVERS_ENABLED_H\n\n\
         #define DRIVER_VT 1\n#define DRIVER_FB 1\n#define DRIVER_NVME 0\n\n#endif\n"
    );
}

#[test]
fn test_missing_driver_fails_without_writing() {
    let tmp = project(&["fb.c"], "fb = true\nghost = true\n");

    drvreg()
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Driver 'ghost' not found in drivers directory"));

    assert!(read(tmp.path(), "drivers_enabled.mk").is_none());
    assert!(read(tmp.path(), "drivers_enabled.h").is_none());
}

#[test]
fn test_missing_registry_is_reported() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("drivers")).unwrap();

    drvreg()
        .arg("--project-root")
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Registry not found"));
}

#[test]
fn test_malformed_registry_is_a_single_line() {
    let tmp = project(&[], "");
    fs::write(tmp.path().join("drivers/registry.toml"), "[drivers\nfb = true\n").unwrap();

    let output = drvreg().arg("--project-root").arg(tmp.path()).output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Malformed registry"));
    assert_eq!(stderr.trim_end().lines().count(), 1, "unexpected stderr: {stderr}");
}

#[test]
fn test_explicit_registry_and_quiet_mode() {
    let tmp = project(&["fb.c"], "fb = false\n");
    let alternate = tmp.path().join("alt.toml");
    fs::write(&alternate, "[drivers]\nfb = true\n").unwrap();

    drvreg()
        .arg("--project-root")
        .arg(tmp.path())
        .arg("--registry")
        .arg(&alternate)
        .arg("-q")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(read(tmp.path(), "drivers_enabled.mk").unwrap().ends_with("DRIVERS := fb.c\n"));
}

#[test]
fn test_layout_file_is_honoured() {
    let tmp = project(&[], "");
    fs::create_dir_all(tmp.path().join("dev")).unwrap();
    fs::write(tmp.path().join("dev/uart.c"), "").unwrap();
    fs::write(tmp.path().join("dev/registry.toml"), "[drivers]\nuart = true\n").unwrap();
    fs::write(tmp.path().join("drvreg.toml"), "driver_dir = \"dev\"\nbuild_variable = \"DEV_SRCS\"\n")
        .unwrap();

    drvreg().current_dir(tmp.path()).assert().success();

    let fragment = fs::read_to_string(tmp.path().join("dev/drivers_enabled.mk")).unwrap();
    assert!(fragment.ends_with("DEV_SRCS := uart.c\n"));
}

#[test]
fn test_missing_explicit_layout_fails() {
    let tmp = project(&["fb.c"], "fb = true\n");

    drvreg()
        .arg("--project-root")
        .arg(tmp.path())
        .arg("--layout")
        .arg(tmp.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Layout error"));
}

#[test]
fn test_log_dir_receives_diagnostics() {
    let tmp = project(&["fb.c"], "fb = true\n");
    let logs = tmp.path().join("logs");

    drvreg().current_dir(tmp.path()).arg("-v").arg("--log-dir").arg(&logs).assert().success();

    let log = fs::read_to_string(logs.join("drvreg.log")).unwrap();
    assert!(log.contains("Generated driver configuration"));
}
