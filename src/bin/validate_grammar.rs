//! Grammar Validation Tool
//!
//! Composes the Objective-C grammar onto the built-in C base and validates
//! it for defects the parser generator would reject or silently accept:
//! undefined references, rules matching the empty string, broken token
//! patterns, missing node kinds and fields.
//!
//! ## Usage
//! ```bash
//! cargo run --bin validate_grammar
//! ```

use std::process;

use objc_grammar::errors::print_error;
use objc_grammar::objc;
use objc_grammar::validation::{validate_grammar, ValidationResult};

/// Main entry point for the validation tool
fn main() {
    println!("🔍 Validating composed grammar: {}", objc::NAME);

    let grammar = match objc::grammar() {
        Ok(grammar) => grammar,
        Err(e) => {
            print_error(e);
            process::exit(1);
        }
    };

    println!("📋 Composed {} grammar rules", grammar.rules.len());

    let validation_result = validate_grammar(grammar);
    print_report(&validation_result);

    if !validation_result.is_valid() {
        process::exit(1);
    }
}

fn print_report(result: &ValidationResult) {
    print_section(&result.errors, "❌", "GRAMMAR VALIDATION ERRORS");
    print_section(&result.warnings, "⚠️ ", "GRAMMAR WARNINGS");
    print_section(&result.suggestions, "💡", "GRAMMAR SUGGESTIONS");

    if result.is_clean() {
        println!("✅ Grammar validation passed - no issues found");
    }
}

fn print_section(items: &[String], emoji: &str, title: &str) {
    if items.is_empty() {
        return;
    }

    eprintln!("{} {}:", emoji, title);
    for item in items {
        eprintln!("  • {}", item);
    }
    eprintln!();
}
