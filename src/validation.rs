//! Static validation of composed grammars.
//!
//! The parser generator rejects some defects outright (undefined symbols)
//! and silently tolerates others (unreachable rules, rules that match the
//! empty string). [`validate_grammar`] runs every check in
//! [`validators::GrammarValidators`] and collects the findings by severity.

pub mod validators;

use crate::grammar::Grammar;
use crate::objc::{FIELD_NAMES, NODE_KINDS};

// =====================
// Core Data Structures
// =====================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

pub struct GrammarConstants {
    /// Node kinds consumers query by name.
    pub node_kinds: &'static [&'static str],
    /// Field names consumers query by name.
    pub field_names: &'static [&'static str],
}

pub const GRAMMAR_CONSTANTS: GrammarConstants = GrammarConstants {
    node_kinds: NODE_KINDS,
    field_names: FIELD_NAMES,
};

// =====================
// Traits
// =====================

pub trait ValidationReporter {
    fn report_error(&mut self, message: impl Into<String>);
    fn report_warning(&mut self, message: impl Into<String>);
    fn report_suggestion(&mut self, message: impl Into<String>);
}

impl ValidationReporter for ValidationResult {
    fn report_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
    fn report_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
    fn report_suggestion(&mut self, message: impl Into<String>) {
        self.suggestions.push(message.into());
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty() && self.suggestions.is_empty()
    }
}

// =====================
// Public API
// =====================

/// Structural checks that hold for any grammar.
pub fn validate_structure(grammar: &Grammar) -> ValidationResult {
    use validators::GrammarValidators;

    let mut result = ValidationResult::new();
    GrammarValidators::check_rule_references(grammar, &mut result);
    GrammarValidators::check_global_references(grammar, &mut result);
    GrammarValidators::check_nullable_rules(grammar, &mut result);
    GrammarValidators::check_patterns(grammar, &mut result);
    GrammarValidators::check_named_precedences(grammar, &mut result);
    GrammarValidators::check_duplicate_conflicts(grammar, &mut result);
    GrammarValidators::check_supertypes(grammar, &mut result);
    GrammarValidators::check_reachability(grammar, &mut result);
    GrammarValidators::check_unused_inline(grammar, &mut result);
    result
}

/// Structural checks plus the node kinds and fields consumers depend on.
pub fn validate_grammar(grammar: &Grammar) -> ValidationResult {
    use validators::GrammarValidators;

    let mut result = validate_structure(grammar);
    GrammarValidators::check_required_node_kinds(grammar, &mut result);
    GrammarValidators::check_required_fields(grammar, &mut result);
    tracing::debug!(
        grammar = %grammar.name,
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        suggestions = result.suggestions.len(),
        "validated grammar"
    );
    result
}
