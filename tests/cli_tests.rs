//! Integration tests for the tablediff CLI.

use assert_cmd::Command;
use predicates::prelude::*;

fn tablediff() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("tablediff"))
}

#[test]
fn test_text_output_to_stdout() {
    tablediff()
        .arg("tests/fixtures/menu_l.csv")
        .arg("tests/fixtures/menu_r.csv")
        .arg("id")
        .assert()
        .success()
        .code(0)
        .stdout(predicate::str::starts_with(r#"{"row_key": ["id"], "rows_added": {"4C": "#))
        .stdout(predicate::str::contains(r#""2A": [("price", "$4.10", "$3.95")]"#));
}

#[test]
fn test_json_output_with_composite_key() {
    tablediff()
        .args(["tests/fixtures/menu_l.csv", "tests/fixtures/menu_r.csv"])
        .args(["id", "name", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""row_key":["id","name"]"#))
        .stdout(predicate::str::contains(
            r#""1A, beer":[["pic","\ud83c\udf7a","\ud83c\udf7b"],["price","$6.00","$5.25"]]"#,
        ));
}

#[test]
fn test_identical_files_exit_0() {
    tablediff()
        .args(["tests/fixtures/menu_r.csv", "tests/fixtures/menu_r.csv", "id"])
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""rows_changed":{}"#));
}

#[test]
fn test_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("diff.json");

    tablediff()
        .args(["tests/fixtures/menu_l.csv", "tests/fixtures/menu_r.csv", "id", "--json", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains(r#""cols_removed":["score","togo"]"#));
}

#[test]
fn test_file_not_found_exits_nonzero() {
    tablediff()
        .args(["tests/fixtures/nonexistent.csv", "tests/fixtures/menu_r.csv", "id"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_missing_key_column_exits_nonzero() {
    tablediff()
        .args(["tests/fixtures/menu_l.csv", "tests/fixtures/menu_r.csv", "sku"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Key column(s) sku not found"));
}

#[test]
fn test_key_is_required() {
    tablediff()
        .args(["tests/fixtures/menu_l.csv", "tests/fixtures/menu_r.csv"])
        .assert()
        .failure();
}

#[test]
fn test_pretty_json() {
    tablediff()
        .args(["tests/fixtures/menu_l.csv", "tests/fixtures/menu_r.csv", "id", "--pretty"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{\n  \"row_key\": [\n    \"id\"\n  ],"));
}
