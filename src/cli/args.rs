//! Defines the command-line arguments and subcommands for the grammar CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "objc-grammar",
    version,
    about = "Composes the Objective-C grammar onto a C base grammar for tree-sitter."
)]
pub struct GrammarArgs {
    /// A tree-sitter-c grammar.json to compose onto instead of the built-in
    /// base. Applies to every subcommand.
    #[arg(long, global = true, env = "OBJC_GRAMMAR_BASE")]
    pub base: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compose the grammar and write grammar.json.
    Generate {
        /// Where to write grammar.json; stdout when omitted.
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Write compact JSON instead of pretty-printed JSON.
        #[arg(long)]
        compact: bool,
    },
    /// Validate the composed grammar and report errors, warnings and suggestions.
    Validate,
    /// List the declared conflict sets.
    Conflicts,
    /// List rule names in definition order.
    Rules {
        /// Include hidden rules (names starting with an underscore).
        #[arg(long)]
        hidden: bool,
    },
    /// Pretty-print one composed rule.
    Show {
        #[arg(required = true)]
        rule: String,
    },
    /// Show how the extension changed one base rule.
    Diff {
        #[arg(required = true)]
        rule: String,
    },
    /// Print the SHA-256 fingerprint of the composed grammar.json.
    Fingerprint,
}
