//! CLI end-to-end tests: `assert_cmd` spawns the real compiled binary,
//! `predicates` checks its stdout/stderr, `tempfile` supplies scratch
//! source files so nothing touches the repo tree.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn orangec() -> Command {
    Command::cargo_bin("orangec").unwrap()
}

fn write_source(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn compiles_a_simple_program_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "main.orange", "Main { void start() { int x; x = 1 + 2; } }");

    orangec()
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("function _"));
}

#[test]
fn writes_generated_js_to_the_requested_output_file() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "main.orange", "Main { void start() { } }");
    let output = dir.path().join("out.js");

    orangec()
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let generated = fs::read_to_string(&output).unwrap();
    assert!(generated.contains("function _"));
    assert!(generated.trim_end().ends_with("();"));
}

#[test]
fn reports_missing_start_and_exits_with_status_one() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "main.orange", "Main { void run() { } }");

    orangec()
        .arg(&input)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("start"));
}

#[test]
fn reports_an_arity_mismatch_with_the_offending_source_line() {
    let dir = TempDir::new().unwrap();
    let input = write_source(
        &dir,
        "main.orange",
        "Main { void f(int a, int b) { } void start() { f(1); } }",
    );

    orangec()
        .arg(&input)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("main.orange"));
}

#[test]
fn emit_tokens_prints_the_token_stream_and_stops_before_codegen() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "main.orange", "Main { void start() { } }");

    orangec()
        .arg(&input)
        .arg("--emit-tokens")
        .assert()
        .success()
        .stdout(predicate::str::contains("Identifier"));
}

#[test]
fn multiple_input_files_are_concatenated_into_one_program() {
    let dir = TempDir::new().unwrap();
    let lib = write_source(&dir, "lib.orange", "Lib { int twice(int x) { return x + x; } }");
    let main = write_source(&dir, "main.orange", "Main { void start() { int y; y = Lib:twice(21); } }");

    orangec().arg(&lib).arg(&main).assert().success();
}

#[test]
fn a_missing_input_file_is_reported_as_an_io_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does_not_exist.orange");

    orangec().arg(&missing).assert().failure().code(1);
}
