//! Tests for the sblex binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const GRAMMAR: &str = r#"
[[rules]]
premade = "whitespace"

[[rules]]
name = "KW"
pattern = "if|else"

[[rules]]
name = "PAREN"
pattern = "[()]"
depends_on = "KW"
error = { kind = "ExpectedParen", message = "line [[LINE]]: expected '(' but got '[[TEXT]]'" }
"#;

fn sblex() -> Command {
    Command::cargo_bin("sblex").expect("binary to build")
}

#[test]
fn tokenizes_file_with_grammar_as_json() {
    let dir = tempdir().unwrap();
    let grammar = dir.path().join("grammar.toml");
    let input = dir.path().join("input.txt");
    fs::write(&grammar, GRAMMAR).unwrap();
    fs::write(&input, "if(\nelse (\n").unwrap();

    let output = sblex()
        .arg(&input)
        .arg("--grammar")
        .arg(&grammar)
        .output()
        .unwrap();
    assert!(output.status.success());

    let tokens: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        tokens,
        serde_json::json!([
            {"type": "KW", "value": "if", "line": 0},
            {"type": "PAREN", "value": "(", "line": 0},
            {"type": "KW", "value": "else", "line": 1},
            {"type": "PAREN", "value": "(", "line": 1},
        ])
    );
}

#[test]
fn reports_custom_errors_and_fails() {
    let dir = tempdir().unwrap();
    let grammar = dir.path().join("grammar.toml");
    let input = dir.path().join("input.txt");
    fs::write(&grammar, GRAMMAR).unwrap();
    fs::write(&input, "if(\nif x").unwrap();

    sblex()
        .arg(&input)
        .args(["-g", grammar.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "ExpectedParen: line 1: expected '(' but got 'x'",
        ));
}

#[test]
fn premades_from_stdin_in_simple_format() {
    sblex()
        .args(["-", "--premades", "whitespace,int,identifier", "--format", "simple"])
        .write_stdin("x 42\n")
        .assert()
        .success()
        .stdout("IDENTIFIER(\"x\") @0\nINT(\"42\") @0\n");
}

#[test]
fn yaml_output() {
    sblex()
        .args(["-", "-p", "int", "-f", "yaml"])
        .write_stdin("7")
        .assert()
        .success()
        .stdout(predicate::str::contains("type: INT"))
        .stdout(predicate::str::contains("value: '7'"));
}

#[test]
fn truncates_error_text() {
    sblex()
        .args(["-", "-p", "int", "--max-error-text", "3"])
        .write_stdin("1abcdef")
        .assert()
        .failure()
        .stderr(predicate::str::contains("'abc...'"));
}

#[test]
fn rejects_unknown_premade() {
    sblex()
        .args(["-", "-p", "nope"])
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown premade 'nope'"));
}

#[test]
fn requires_some_rules() {
    sblex()
        .arg("-")
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no rules given"));
}

#[test]
fn lists_premades() {
    sblex()
        .arg("--list-premades")
        .assert()
        .success()
        .stdout(predicate::str::contains("var_declaration"))
        .stdout(predicate::str::contains("rule(name: 'INT'"));
}

#[test]
fn var_declaration_combines_with_identifier_premade() {
    sblex()
        .args([
            "-",
            "-p",
            "whitespace,var_declaration,identifier,operator",
            "-f",
            "simple",
        ])
        .write_stdin("var x = 1\ny = x\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("VAR_NAME(\"x\") @0"))
        .stdout(predicate::str::contains("IDENTIFIER(\"y\") @1"));
}
