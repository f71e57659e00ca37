//! Declared ambiguities, inlined rules and supertypes.
//!
//! Every set in [`CONFLICTS`] names rules that may derive the same token
//! span. The generator keeps all readings alive for those sets and the
//! parser settles them with dynamic precedence (see [`crate::resolve`]).

use crate::merge::Extension;

/// Base conflict dropped from the composed grammar. `__extension__` stays
/// ambiguous only against `range_expression`, which is declared below.
pub const FILTERED_CONFLICT: [&str; 2] = ["type_qualifier", "extension_expression"];

pub const CONFLICTS: &[&[&str]] = &[
    &["enum_specifier"],
    &["expression", "generic_specifier"],
    &["_declarator", "type_specifier", "generic_specifier"],
    &["_declarator", "type_specifier", "sized_type_specifier"],
    &["attribute", "expression"],
    &["parameterized_arguments"],
    &["string_literal"],
    &["extension_expression", "range_expression"],
    &["abstract_array_declarator", "array_type_specifier"],
    &["_type_definition_type"],
];

pub const INLINE: &[&str] = &[
    "method_selector",
    "method_selector_no_list",
    "keyword_selector",
    "interface_declaration",
    "typedefed_identifier",
    "keyword_identifier",
];

pub const SUPERTYPES: &[&str] = &["specifier_qualifier"];

pub(crate) fn patch(extension: Extension) -> Extension {
    extension
        .remove_conflict(&FILTERED_CONFLICT)
        .add_conflicts(CONFLICTS)
        .add_inline(INLINE)
        .add_supertypes(SUPERTYPES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_sets_are_distinct() {
        for (index, set) in CONFLICTS.iter().enumerate() {
            for other in &CONFLICTS[index + 1..] {
                assert_ne!(set, other);
            }
        }
    }

    #[test]
    fn filtered_conflict_is_not_readded() {
        assert!(!CONFLICTS.iter().any(|set| {
            set.len() == 2 && set.contains(&"type_qualifier") && set.contains(&"extension_expression")
        }));
    }
}
