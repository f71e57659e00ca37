//! Validation of composed and hand-built grammars.

use objc_grammar::dsl::{optional, pattern, repeat, sym};
use objc_grammar::grammar::c;
use objc_grammar::validation::{validate_grammar, validate_structure};
use objc_grammar::{objc, seq, Grammar};
use pretty_assertions::assert_eq;

#[test]
fn composed_grammar_has_no_errors() {
    let result = validate_grammar(objc::grammar().unwrap());
    assert_eq!(result.errors, Vec::<String>::new());
    assert!(result.is_valid());
}

#[test]
fn base_grammar_is_structurally_sound() {
    let result = validate_structure(&c::grammar());
    assert_eq!(result.errors, Vec::<String>::new());
}

#[test]
fn base_grammar_lacks_the_object_model_kinds() {
    let result = validate_grammar(&c::grammar());
    assert!(!result.is_valid());
    for kind in ["message_expression", "class_interface", "block_literal"] {
        assert!(
            result.errors.iter().any(|error| error.contains(&format!("'{kind}'"))),
            "no error for {kind}"
        );
    }
    assert!(result
        .errors
        .iter()
        .any(|error| error == "Field 'receiver' is never attached"));
}

#[test]
fn dropping_a_referenced_rule_is_reported() {
    let mut grammar = objc::grammar().unwrap().clone();
    grammar.rules.shift_remove("method_parameter");
    let result = validate_structure(&grammar);
    assert!(result
        .errors
        .iter()
        .any(|error| error.contains("references undefined rule 'method_parameter'")));
}

#[test]
fn hand_built_grammar_reports_every_severity() {
    let mut grammar = Grammar::new("broken");
    grammar
        .define("program", repeat(sym("item")))
        .define("item", seq![sym("identifier"), optional(sym("missing"))])
        .define("identifier", pattern("[a-z]+"))
        .define("orphan", optional(sym("identifier")));
    grammar.inline.push("orphan".to_string());

    let result = validate_structure(&grammar);
    assert_eq!(
        result.errors,
        vec![
            "Rule 'item' references undefined rule 'missing'".to_string(),
            "Rule 'orphan' matches the empty string".to_string(),
        ]
    );
    assert_eq!(
        result.warnings,
        vec!["1 rules are unreachable from 'program': orphan".to_string()]
    );
    assert_eq!(
        result.suggestions,
        vec!["Inline rule 'orphan' is never referenced and can be dropped from 'inline'".to_string()]
    );
    assert!(!result.is_clean());
}

#[test]
fn empty_grammar_is_an_error() {
    let result = validate_structure(&Grammar::new("empty"));
    assert!(result.errors.iter().any(|error| error == "Grammar defines no rules"));
}
