//! The objc-grammar Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions: composing the grammar, writing
//! `grammar.json`, validating and inspecting rules.

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Once;

use clap::Parser;

use crate::cli::args::{Command, GrammarArgs};
use crate::dsl::is_hidden_name;
use crate::errors::{print_error, GrammarError, Result};
use crate::grammar::{self, c, Grammar};
use crate::objc;
use crate::validation::validate_grammar;

pub mod args;
pub mod output;

static TRACING_INIT: Once = Once::new();

/// Installs the log subscriber. Only active when `RUST_LOG` is set, e.g.
/// `RUST_LOG=objc_grammar=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}

/// Resolved options of the `generate` command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerateConfig {
    pub base: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub pretty: bool,
}

impl GenerateConfig {
    /// Composes the grammar this configuration describes.
    pub fn compose(&self) -> Result<Grammar> {
        compose_with_base(self.base.as_deref())
    }

    /// Composes and writes `grammar.json`; returns the serialized text.
    pub fn generate(&self) -> Result<String> {
        let json = self.compose()?.to_json(self.pretty)?;
        if let Some(path) = &self.output {
            std::fs::write(path, format!("{json}\n"))
                .map_err(|e| GrammarError::io(path.display(), e))?;
            tracing::info!(path = %path.display(), bytes = json.len(), "wrote grammar.json");
        }
        Ok(json)
    }
}

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    init_tracing();
    let args = GrammarArgs::parse();

    let base = args.base.as_deref();

    match args.command {
        Command::Generate { output, compact } => {
            let config = GenerateConfig {
                base: args.base.clone(),
                output,
                pretty: !compact,
            };
            let json = or_exit(config.generate());
            if config.output.is_none() {
                println!("{json}");
            }
        }

        Command::Validate => {
            let grammar = or_exit(compose_with_base(base));
            let result = validate_grammar(&grammar);
            output::print_validation(&result);
            if !result.is_valid() {
                process::exit(1);
            }
        }

        Command::Conflicts => {
            let grammar = or_exit(compose_with_base(base));
            output::print_list(
                grammar
                    .conflicts
                    .iter()
                    .map(|conflict| format!("[{}]", conflict.join(", "))),
            );
        }

        Command::Rules { hidden } => {
            let grammar = or_exit(compose_with_base(base));
            output::print_list(
                grammar
                    .rule_names()
                    .filter(|name| hidden || !is_hidden_name(name)),
            );
        }

        Command::Show { rule } => {
            let grammar = or_exit(compose_with_base(base));
            let definition = or_exit(grammar.rule(&rule));
            output::print_rule(&rule, &definition.pretty());
        }

        Command::Diff { rule } => {
            let original = or_exit(load_base(base));
            let composed = or_exit(objc::compose(&original));
            let definition = or_exit(composed.rule(&rule));
            let before = original.get(&rule).map(|before| before.pretty());
            output::print_rule_diff(&rule, before.as_deref(), &definition.pretty());
        }

        Command::Fingerprint => {
            let grammar = or_exit(compose_with_base(base));
            println!("{}", or_exit(grammar.fingerprint()));
        }
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Composes onto the `grammar.json` at `base`, or onto the built-in C grammar.
pub fn compose_with_base(base: Option<&Path>) -> Result<Grammar> {
    match base {
        Some(path) => objc::compose(&grammar::load_json(path)?),
        None => objc::grammar().cloned(),
    }
}

/// The `grammar.json` at `base`, or the built-in C grammar.
pub fn load_base(base: Option<&Path>) -> Result<Grammar> {
    match base {
        Some(path) => grammar::load_json(path),
        None => Ok(c::grammar()),
    }
}

fn or_exit<T>(result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        print_error(e);
        process::exit(1);
    })
}
