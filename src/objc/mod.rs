//! Objective-C Grammar
//!
//! The Objective-C grammar is the C grammar plus one [`Extension`]. Each
//! submodule contributes the patches for one layer of the language; this
//! module assembles them in a fixed order and caches the composed result.
//!
//! ```no_run
//! let grammar = objc_grammar::objc::grammar()?;
//! assert!(grammar.contains("message_expression"));
//! # Ok::<(), objc_grammar::GrammarError>(())
//! ```

pub mod declarators;
pub mod expressions;
pub mod lexical;
pub mod object_model;
pub mod policy;
pub mod preproc;
pub mod statements;

use once_cell::sync::OnceCell;

use crate::errors::Result;
use crate::grammar::{c, Grammar};
use crate::merge::Extension;

pub const NAME: &str = "objc";

/// Node kinds downstream queries rely on.
pub const NODE_KINDS: &[&str] = &[
    "class_interface",
    "class_implementation",
    "protocol_declaration",
    "protocol_forward_declaration",
    "module_import",
    "compatibility_alias_declaration",
    "method_declaration",
    "method_definition",
    "property_declaration",
    "property_implementation",
    "message_expression",
    "selector_expression",
    "encode_expression",
    "available_expression",
    "block_literal",
    "array_literal",
    "dictionary_literal",
    "range_expression",
    "try_statement",
    "catch_clause",
    "finally_clause",
    "throw_statement",
    "synchronized_statement",
    "instance_variables",
    "visibility_specification",
    "attribute_specifier",
    "attribute_declaration",
];

/// Field names downstream queries rely on.
pub const FIELD_NAMES: &[&str] = &[
    "receiver",
    "method",
    "declarator",
    "superclass",
    "category",
    "alias",
    "class",
];

/// The full Objective-C patch set.
pub fn extension() -> Extension {
    let extension = Extension::new(NAME).word("identifier");
    let extension = lexical::patch(extension);
    let extension = policy::patch(extension);
    let extension = object_model::patch(extension);
    let extension = declarators::patch(extension);
    let extension = expressions::patch(extension);
    let extension = statements::patch(extension);
    preproc::patch(extension)
}

/// Composes the Objective-C extension onto an arbitrary C base.
pub fn compose(base: &Grammar) -> Result<Grammar> {
    extension().apply(base)
}

static GRAMMAR: OnceCell<Grammar> = OnceCell::new();

/// The Objective-C grammar over the built-in C base, composed once.
pub fn grammar() -> Result<&'static Grammar> {
    GRAMMAR.get_or_try_init(|| {
        let grammar = compose(&c::grammar())?;
        tracing::info!(rules = grammar.rules.len(), "composed objc grammar");
        Ok(grammar)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_names_are_unique() {
        let extension = extension();
        let mut names: Vec<_> = extension.patch_names().collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn cached_grammar_matches_a_fresh_composition() {
        let cached = grammar().unwrap();
        let fresh = compose(&c::grammar()).unwrap();
        assert_eq!(cached, &fresh);
    }

    #[test]
    fn required_node_kinds_are_produced() {
        let kinds = grammar().unwrap().node_kinds();
        for kind in NODE_KINDS {
            assert!(kinds.contains(*kind), "missing node kind {kind}");
        }
    }

    #[test]
    fn required_fields_are_attached() {
        let fields = grammar().unwrap().field_names();
        for name in FIELD_NAMES {
            assert!(fields.contains(*name), "missing field {name}");
        }
    }
}
