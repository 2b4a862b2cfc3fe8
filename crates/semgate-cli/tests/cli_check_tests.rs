//! CLI integration tests
//!
//! Run the `semgate` binary against synthetic jar and aar builds and check
//! exit codes and the scraped `INFO:`/`ERROR:` lines.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use semgate_apidiff::classfile::access;
use semgate_apidiff::fixtures::{class_entry, write_aar, write_jar, ClassFileBuilder};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const VECTOR: &str = "com/io7m/jtensors/VectorI4F";

fn vector(with_dot: bool) -> Vec<(String, Vec<u8>)> {
    let mut builder = ClassFileBuilder::new(VECTOR)
        .field(access::PUBLIC | access::FINAL, "x", "F")
        .method(access::PUBLIC, "magnitude", "()F");
    if with_dot {
        builder = builder.method(access::PUBLIC | access::STATIC, "dot", "(FF)F");
    }
    vec![(class_entry(VECTOR), builder.build())]
}

fn jar(dir: &Path, name: &str, with_dot: bool) -> PathBuf {
    let path = dir.join(name);
    write_jar(&path, &vector(with_dot)).unwrap();
    path
}

fn semgate(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_semgate"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("SEMGATE_LOG_FORMAT")
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn check(dir: &Path, old: &Path, old_v: &str, new: &Path, new_v: &str, extra: &[&str]) -> Output {
    let mut args = vec![
        "--oldJarUri",
        old.to_str().unwrap(),
        "--oldJarVersion",
        old_v,
        "--newJar",
        new.to_str().unwrap(),
        "--newJarVersion",
        new_v,
        "--textReport",
        "report.txt",
        "--htmlReport",
        "report.html",
    ];
    args.extend_from_slice(extra);
    semgate(dir, &args)
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Every stderr line is a scrapeable `INFO:` or `ERROR:` diagnostic
fn assert_only_diagnostics(output: &Output) {
    let err = stderr(output);
    for line in err.lines() {
        assert!(
            line.starts_with("INFO: ") || line.starts_with("ERROR: "),
            "unexpected stderr line {:?} in:\n{}",
            line,
            err
        );
    }
}

fn error_lines(output: &Output) -> usize {
    stderr(output).lines().filter(|l| l.starts_with("ERROR:")).count()
}

#[test]
fn test_identical_jars_pass() {
    // Scenario: identical artifacts short-circuit to PASS
    let dir = TempDir::new().unwrap();
    let old = jar(dir.path(), "old.jar", true);
    let new = jar(dir.path(), "new.jar", true);

    let output = check(dir.path(), &old, "1.0.0", &new, "1.0.1", &[]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("INFO: Text report written to report.txt"));
    assert!(stderr(&output).contains("INFO: HTML report written to report.html"));
    assert!(dir.path().join("report.txt").exists());
}

#[test]
fn test_breaking_change_with_patch_bump_fails() {
    // Scenario: MAJOR required, PATCH declared
    let dir = TempDir::new().unwrap();
    let old = jar(dir.path(), "old.jar", true);
    let new = jar(dir.path(), "new.jar", false);

    let output = check(dir.path(), &old, "7.1.0", &new, "7.1.1", &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains(
        "ERROR: The version change between 7.1.0 and 7.1.1 is PATCH, but the changes made to the code require a MAJOR version change"
    ));
    let report = std::fs::read_to_string(dir.path().join("report.txt")).unwrap();
    assert!(report.starts_with("Old jar:     "));
    assert!(report.contains("Old version: 7.1.0"));
    assert!(report.contains("New version: 7.1.1"));
}

#[test]
fn test_breaking_change_on_unchanged_version_fails() {
    // Scenario: same declared version, public method removed
    let dir = TempDir::new().unwrap();
    let old = jar(dir.path(), "old.jar", true);
    let new = jar(dir.path(), "new.jar", false);

    let output = check(dir.path(), &old, "1.0.0", &new, "1.0.0", &[]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains(
        "The version change between 1.0.0 and 1.0.0 is PATCH, but the changes made to the code require a MAJOR version change"
    ), "stderr: {}", err);
    assert_eq!(error_lines(&output), 1);
}

#[test]
fn test_breaking_change_with_major_bump_passes() {
    let dir = TempDir::new().unwrap();
    let old = jar(dir.path(), "old.jar", true);
    let new = jar(dir.path(), "new.jar", false);

    let output = check(dir.path(), &old, "7.1.0", &new, "8.0.0", &[]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(!stderr(&output).contains("ERROR:"));
}

#[test]
fn test_pre_release_pair_passes() {
    let dir = TempDir::new().unwrap();
    let old = jar(dir.path(), "old.jar", true);
    let new = jar(dir.path(), "new.jar", false);

    let output = check(dir.path(), &old, "0.4.0", &new, "0.4.1", &[]);

    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_missing_old_with_flag_passes_and_without_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nonexistent");
    let new = jar(dir.path(), "new.jar", true);

    let with_flag = check(dir.path(), &missing, "1.0.0", &new, "1.0.0", &["--ignoreMissingOld"]);
    let without = check(dir.path(), &missing, "1.0.0", &new, "1.0.0", &[]);

    assert_eq!(with_flag.status.code(), Some(0), "stderr: {}", stderr(&with_flag));
    assert_eq!(without.status.code(), Some(1));
    assert!(stderr(&without).contains("ERR_NOT_FOUND"));
}

#[test]
fn test_missing_old_with_flag_reports_no_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nonexistent");
    let new = jar(dir.path(), "new.jar", true);

    let output = check(dir.path(), &missing, "1.0.0", &new, "1.0.0", &["--ignoreMissingOld"]);

    assert_eq!(output.status.code(), Some(0));
    assert_only_diagnostics(&output);
    assert_eq!(error_lines(&output), 0, "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("does not exist; compared the new artifact against itself"));
}

#[test]
fn test_fatal_error_prints_one_error_line() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nonexistent");
    let new = jar(dir.path(), "new.jar", true);

    let output = check(dir.path(), &missing, "1.0.0", &new, "1.0.1", &[]);

    assert_eq!(output.status.code(), Some(1));
    assert_only_diagnostics(&output);
    assert_eq!(error_lines(&output), 1, "stderr: {}", stderr(&output));
    assert!(!stderr(&output).contains("Try --help"));
}

#[test]
fn test_stderr_carries_only_diagnostics() {
    let dir = TempDir::new().unwrap();
    let old = jar(dir.path(), "old.jar", true);
    let new = jar(dir.path(), "new.jar", false);

    let pass = check(dir.path(), &old, "7.1.0", &new, "8.0.0", &[]);
    let fail = check(dir.path(), &old, "7.1.0", &new, "7.1.1", &[]);

    assert_only_diagnostics(&pass);
    assert_only_diagnostics(&fail);
    assert_eq!(error_lines(&fail), 1);
}

#[test]
fn test_unparseable_version_is_fatal() {
    let dir = TempDir::new().unwrap();
    let old = jar(dir.path(), "old.jar", true);
    let new = jar(dir.path(), "new.jar", true);

    let output = check(dir.path(), &old, "1.0", &new, "1.0.1", &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("ERROR: [ERR_INVALID_VERSION]"));
    assert!(stderr(&output).contains("INFO: Try --help for usage information"));
}

#[test]
fn test_exclusion_list_lets_excluded_breakage_through() {
    // Scenario: comments, blank lines, and a package glob
    let dir = TempDir::new().unwrap();
    let old = jar(dir.path(), "old.jar", true);
    let new = jar(dir.path(), "new.jar", false);
    std::fs::write(dir.path().join("excludes.txt"), "# Comment!\n\ncom.io7m.jtensors.*\n").unwrap();

    let output = check(dir.path(), &old, "7.1.0", &new, "7.1.1", &["--excludeList", "excludes.txt"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
}

#[test]
fn test_android_archives() {
    let dir = TempDir::new().unwrap();
    let old = dir.path().join("old.aar");
    let new = dir.path().join("new.aar");
    write_aar(&old, &vector(true)).unwrap();
    write_aar(&new, &vector(false)).unwrap();

    let patch = check(dir.path(), &old, "7.1.0", &new, "7.1.1", &[]);
    let major = check(dir.path(), &old, "7.1.0", &new, "8.0.0", &[]);

    assert_eq!(patch.status.code(), Some(1));
    assert_eq!(major.status.code(), Some(0), "stderr: {}", stderr(&major));
}

#[test]
fn test_old_jar_alias_and_json_report() {
    let dir = TempDir::new().unwrap();
    let old = jar(dir.path(), "old.jar", true);
    let new = jar(dir.path(), "new.jar", false);

    let output = semgate(
        dir.path(),
        &[
            "--oldJar",
            old.to_str().unwrap(),
            "--oldJarVersion",
            "1.0.0",
            "--newJar",
            new.to_str().unwrap(),
            "--newJarVersion",
            "2.0.0",
            "--textReport",
            "out/report.txt",
            "--htmlReport",
            "out/report.html",
            "--jsonReport",
            "out/report.json",
        ],
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("INFO: JSON report written to out/report.json"));
    let json = std::fs::read_to_string(dir.path().join("out/report.json")).unwrap();
    assert!(json.contains("\"required_change\": \"MAJOR\""));
}

#[cfg(unix)]
#[test]
fn test_relative_path_with_colon_is_a_local_file() {
    let dir = TempDir::new().unwrap();
    jar(dir.path(), "lib:7.1.0.jar", true);
    jar(dir.path(), "lib:8.0.0.jar", false);

    let output = semgate(
        dir.path(),
        &[
            "--oldJarUri",
            "lib:7.1.0.jar",
            "--oldJarVersion",
            "7.1.0",
            "--newJar",
            "lib:8.0.0.jar",
            "--newJarVersion",
            "8.0.0",
            "--textReport",
            "report.txt",
            "--htmlReport",
            "report.html",
        ],
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let report = std::fs::read_to_string(dir.path().join("report.txt")).unwrap();
    assert!(report.starts_with("Old jar:     lib:7.1.0.jar\n"));
}

#[test]
fn test_help_exits_zero() {
    let dir = TempDir::new().unwrap();
    let output = semgate(dir.path(), &["--help"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--oldJarUri"));
    assert!(stdout.contains("--ignoreMissingOld"));
}

#[test]
fn test_no_arguments_exits_one() {
    let dir = TempDir::new().unwrap();
    let output = semgate(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.starts_with("ERROR: "));
    assert!(err.contains("INFO: Try --help for usage information"));
}

#[test]
fn test_unknown_argument_exits_one() {
    let dir = TempDir::new().unwrap();
    let output = semgate(dir.path(), &["--nonsense"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("INFO: Try --help for usage information"));
}
