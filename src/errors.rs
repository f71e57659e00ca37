//! Grammar Error Handling
//!
//! One error type for every stage: composing the extension onto the base
//! grammar, loading and writing `grammar.json`, ranking conflicting parse
//! actions, and compiling token patterns. Each variant carries a stable
//! diagnostic code so the CLI (and tests) can tell failures apart without
//! matching on message text.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T, E = GrammarError> = std::result::Result<T, E>;

// ============================================================================
// ERROR TYPE
// ============================================================================

#[derive(Debug, Error, Diagnostic)]
pub enum GrammarError {
    #[error("cannot extend '{rule}': the base grammar has no such rule")]
    #[diagnostic(
        code(objc_grammar::merge::unknown_base_rule),
        help("use `define` for rules that are new in the extension")
    )]
    UnknownBaseRule { rule: String },

    #[error("cannot filter the alternatives of '{rule}': its base definition is not a choice")]
    #[diagnostic(code(objc_grammar::merge::not_a_choice))]
    NotAChoice { rule: String },

    #[error("'{rule}' has no alternative '{member}' to remove")]
    #[diagnostic(
        code(objc_grammar::merge::missing_member),
        help("the base grammar may have changed; re-check the filtered alternatives")
    )]
    MissingMember { rule: String, member: String },

    #[error("the base grammar declares no conflict {conflict:?} to remove")]
    #[diagnostic(code(objc_grammar::merge::missing_conflict))]
    MissingConflict { conflict: Vec<String> },

    #[error("rule '{rule}' is patched more than once")]
    #[diagnostic(code(objc_grammar::merge::duplicate_patch))]
    DuplicatePatch { rule: String },

    #[error("rule '{rule}' is not defined")]
    #[diagnostic(code(objc_grammar::grammar::unknown_rule))]
    UnknownRule { rule: String },

    #[error("actions over {rules:?} tie on precedence and are not a declared conflict")]
    #[diagnostic(
        code(objc_grammar::policy::unresolved_conflict),
        help("add a precedence to one of the rules or declare the set in `conflicts`")
    )]
    UnresolvedConflict { rules: Vec<String> },

    #[error("no candidate actions to resolve")]
    #[diagnostic(code(objc_grammar::policy::no_candidates))]
    NoCandidates,

    #[error("token pattern for '{origin}' does not compile: {message}")]
    #[diagnostic(code(objc_grammar::lexical::invalid_pattern))]
    InvalidPattern { origin: String, message: String },

    #[error("malformed syntax tree: {reason}")]
    #[diagnostic(code(objc_grammar::cst::malformed_tree))]
    MalformedTree { reason: String },

    #[error("malformed grammar JSON: {0}")]
    #[diagnostic(code(objc_grammar::io::json))]
    Json(#[from] serde_json::Error),

    #[error("I/O failure on {path}: {source}")]
    #[diagnostic(code(objc_grammar::io::file))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl GrammarError {
    pub fn io(path: impl fmt::Display, source: std::io::Error) -> Self {
        GrammarError::Io {
            path: path.to_string(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownBaseRule { .. }
            | Self::NotAChoice { .. }
            | Self::MissingMember { .. }
            | Self::MissingConflict { .. }
            | Self::DuplicatePatch { .. } => ErrorCategory::Merge,

            Self::UnknownRule { .. }
            | Self::InvalidPattern { .. }
            | Self::MalformedTree { .. } => ErrorCategory::Grammar,

            Self::UnresolvedConflict { .. } | Self::NoCandidates => ErrorCategory::Policy,

            Self::Json(_) | Self::Io { .. } => ErrorCategory::Io,
        }
    }
}

/// Coarse grouping used by the CLI exit paths and by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Merge,
    Grammar,
    Policy,
    Io,
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints an error with full miette diagnostics.
pub fn print_error(error: GrammarError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_codes_name_the_stage() {
        let error = GrammarError::UnknownBaseRule {
            rule: "block_literal".into(),
        };
        let code = error.code().map(|code| code.to_string());
        assert_eq!(code.as_deref(), Some("objc_grammar::merge::unknown_base_rule"));
        assert_eq!(error.category(), ErrorCategory::Merge);
        assert!(error.help().is_some());
    }

    #[test]
    fn json_errors_convert_with_question_mark() {
        fn parse() -> Result<serde_json::Value> {
            Ok(serde_json::from_str("{")?)
        }
        let error = parse().unwrap_err();
        assert_eq!(error.category(), ErrorCategory::Io);
    }
}
