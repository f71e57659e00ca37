//! Handles all user-facing output for the CLI.
//!
//! This module is responsible for colorizing output, rendering rule diffs
//! and printing validation reports. By centralizing output logic here, we
//! ensure a consistent user experience across all commands.

use difference::{Changeset, Difference};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::validation::ValidationResult;

// ============================================================================
// CORE OUTPUT FUNCTIONS: User-facing CLI output utilities
// ============================================================================

/// Prints a rule with its name as a bold header.
pub fn print_rule(name: &str, rendered: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true));
    println!("{name}:");
    let _ = stdout.reset();
    println!("{rendered}");
}

/// Prints a line diff between the base and composed renderings of a rule.
pub fn print_rule_diff(name: &str, base: Option<&str>, composed: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
    match base {
        Some(_) => println!("--- {name} (base)\n+++ {name} (composed)"),
        None => println!("+++ {name} (new in the extension)"),
    }
    let _ = stdout.reset();

    let changeset = Changeset::new(base.unwrap_or(""), composed, "\n");
    print_diff(&mut stdout, &changeset.diffs);
}

pub fn print_list<I, T>(items: I)
where
    I: IntoIterator<Item = T>,
    T: std::fmt::Display,
{
    let mut empty = true;
    for item in items {
        empty = false;
        println!("{item}");
    }
    if empty {
        println!("  No items found.");
    }
}

/// Prints validation findings grouped by severity.
pub fn print_validation(result: &ValidationResult) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    print_section(&mut stderr, Color::Red, "errors", &result.errors);
    print_section(&mut stderr, Color::Yellow, "warnings", &result.warnings);
    print_section(&mut stderr, Color::Blue, "suggestions", &result.suggestions);

    if result.is_valid() {
        let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
        eprintln!("Grammar validation passed");
    } else {
        let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
        eprintln!("Grammar validation failed");
    }
    let _ = stderr.reset();
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn print_section(stderr: &mut StandardStream, color: Color, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    eprintln!("{} {title}:", items.len());
    let _ = stderr.reset();
    for item in items {
        eprintln!("• {item}");
    }
}

fn print_diff(stdout: &mut StandardStream, diffs: &[Difference]) {
    for diff in diffs {
        match diff {
            Difference::Same(ref x) => {
                let _ = stdout.reset();
                println!(" {}", x.replace('\n', "\n "));
            }
            Difference::Add(ref x) => {
                let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
                println!("+{}", x.replace('\n', "\n+"));
            }
            Difference::Rem(ref x) => {
                let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
                println!("-{}", x.replace('\n', "\n-"));
            }
        }
    }
    let _ = stdout.reset();
}
