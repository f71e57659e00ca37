// Regression tests for the objc-grammar binary.
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("objc-grammar").unwrap();
    cmd.env_remove("OBJC_GRAMMAR_BASE").env_remove("RUST_LOG");
    cmd
}

#[test]
fn generate_writes_grammar_json_to_stdout() {
    cli()
        .args(["generate", "--compact"])
        .assert()
        .success()
        .stdout(contains("\"name\":\"objc\"").and(contains("\"message_expression\"")));
}

#[test]
fn generate_writes_to_a_file() {
    let path = std::env::temp_dir().join(format!("objc-grammar-{}.json", std::process::id()));
    cli()
        .arg("generate")
        .arg("--output")
        .arg(&path)
        .assert()
        .success();
    let written = fs::read_to_string(&path).unwrap();
    let _ = fs::remove_file(&path);
    let grammar = objc_grammar::Grammar::from_json(&written).unwrap();
    assert_eq!(grammar.start_rule(), Some("translation_unit"));
}

#[test]
fn validate_succeeds_on_the_built_in_grammar() {
    cli()
        .arg("validate")
        .assert()
        .success()
        .stderr(contains("Grammar validation passed"));
}

#[test]
fn unreadable_base_is_reported_with_a_diagnostic() {
    cli()
        .args(["validate", "--base", "tests/no-such-grammar.json"])
        .assert()
        .failure()
        .stderr(contains("objc_grammar::io::file").or(contains("I/O failure")));
}

#[test]
fn base_path_falls_back_to_the_environment() {
    cli()
        .arg("generate")
        .env("OBJC_GRAMMAR_BASE", "tests/no-such-grammar.json")
        .assert()
        .failure()
        .stderr(contains("no-such-grammar.json"));
}

#[test]
fn show_prints_a_composed_rule() {
    cli()
        .args(["show", "throw_statement"])
        .assert()
        .success()
        .stdout(contains("seq('@throw', optional($.expression), ';')"));
}

#[test]
fn show_rejects_unknown_rules() {
    cli()
        .args(["show", "no_such_rule"])
        .assert()
        .failure()
        .stderr(contains("objc_grammar::grammar::unknown_rule"));
}

#[test]
fn diff_shows_additions_to_a_base_rule() {
    cli()
        .args(["diff", "compound_statement"])
        .assert()
        .success()
        .stdout(contains("@autoreleasepool"));
}

#[test]
fn rules_hide_underscore_names_by_default() {
    let output = cli().arg("rules").output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.lines().any(|line| line == "class_interface"));
    assert!(!stdout.lines().any(|line| line.starts_with('_')));

    cli()
        .args(["rules", "--hidden"])
        .assert()
        .success()
        .stdout(contains("_expression_not_binary"));
}

#[test]
fn conflicts_lists_declared_sets() {
    cli()
        .arg("conflicts")
        .assert()
        .success()
        .stdout(contains("[expression, generic_specifier]"));
}

#[test]
fn fingerprint_is_stable_across_runs() {
    let first = cli().arg("fingerprint").output().unwrap();
    let second = cli().arg("fingerprint").output().unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
    assert_eq!(String::from_utf8(first.stdout).unwrap().trim().len(), 64);
}

#[test]
fn inspection_commands_honor_the_base_grammar() {
    for args in [
        vec!["conflicts"],
        vec!["rules"],
        vec!["show", "throw_statement"],
        vec!["diff", "compound_statement"],
        vec!["fingerprint"],
    ] {
        cli()
            .args(&args)
            .env("OBJC_GRAMMAR_BASE", "tests/no-such-grammar.json")
            .assert()
            .failure()
            .stderr(contains("no-such-grammar.json"));
    }
}

#[test]
fn diff_compares_against_a_loaded_base() {
    let path = std::env::temp_dir().join(format!("objc-grammar-base-{}.json", std::process::id()));
    let mut base = objc_grammar::grammar::c::grammar();
    base.define("throw_statement", objc_grammar::dsl::sym("expression"));
    fs::write(&path, base.to_json(false).unwrap()).unwrap();

    let output = cli()
        .args(["diff", "throw_statement", "--base"])
        .arg(&path)
        .output()
        .unwrap();
    let _ = fs::remove_file(&path);
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout).unwrap().contains("@throw"));
}

#[test]
fn loaded_base_fingerprint_matches_the_built_in_one() {
    let path = std::env::temp_dir().join(format!("objc-grammar-c-{}.json", std::process::id()));
    fs::write(&path, objc_grammar::grammar::c::grammar().to_json(false).unwrap()).unwrap();

    let loaded = cli().arg("fingerprint").arg("--base").arg(&path).output().unwrap();
    let built_in = cli().arg("fingerprint").output().unwrap();
    let _ = fs::remove_file(&path);
    assert!(loaded.status.success());
    assert_eq!(loaded.stdout, built_in.stdout);
}
