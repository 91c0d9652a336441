//! End-to-end CLI tests, grounded on the teacher's `assert_cmd`/`tempfile`
//! driver e2e tests: write a `.bas` fixture to a temp dir, run the real
//! `basic` binary against it, and check stdout/exit code.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn basic_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_basic"))
}

fn write_program(dir: &TempDir, name: &str, source: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, source).expect("failed to write fixture");
    path
}

fn run_program(source: &str) -> assert_cmd::assert::Assert {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = write_program(&dir, "program.bas", source);
    Command::new(basic_bin()).arg(&path).assert()
}

#[test]
fn cli_help_mentions_the_program_argument() {
    Command::new(basic_bin()).arg("--help").assert().success().stdout(predicate::str::contains("program"));
}

#[test]
fn scenario_hello_world() {
    run_program("10 PRINT \"HELLO, WORLD!\"\n").success().stdout("HELLO, WORLD!\n");
}

#[test]
fn scenario_for_loop_semicolon_print() {
    let source = "10 FOR I=1 TO 3\n20 PRINT I;\n30 NEXT I\n40 PRINT\n";
    run_program(source).success().stdout("1 2 3 \n");
}

#[test]
fn scenario_fibonacci_style_loop() {
    let source = "10 A=0:B=1\n20 FOR I=1 TO 5\n30 PRINT A;\n40 C=A+B:A=B:B=C\n50 NEXT I\n60 PRINT\n";
    run_program(source).success().stdout("0 1 1 2 3 \n");
}

#[test]
fn scenario_string_slicing() {
    let source = "10 A$=\"HELLO WORLD\"\n20 PRINT LEFT$(A$,5)\n30 PRINT MID$(A$,7,5)\n40 PRINT INSTR(A$,\"O\")\n";
    run_program(source).success().stdout("HELLO\nWORLD\n5\n");
}

#[test]
fn scenario_gosub_return() {
    let source = "10 GOSUB 100\n20 PRINT \"DONE\"\n30 END\n100 PRINT \"SUB\"\n110 RETURN\n";
    run_program(source).success().stdout("SUB\nDONE\n");
}

#[test]
fn scenario_and_or_with_not() {
    let source = "10 IF (1 AND 1) OR NOT(-1) THEN PRINT \"YES\"\n";
    run_program(source).success().stdout("YES\n");
}

#[test]
fn missing_file_exits_with_code_one() {
    Command::new(basic_bin())
        .arg("/nonexistent/path/to/program.bas")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn load_error_on_unnumbered_line_exits_with_code_one() {
    run_program("PRINT \"NO LINE NUMBER\"\n").failure().code(1);
}

#[test]
fn runtime_error_exits_non_zero_and_names_the_line() {
    run_program("10 GOTO 999\n").failure().code(2).stdout(predicate::str::contains("Error at line 10"));
}
