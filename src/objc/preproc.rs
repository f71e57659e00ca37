//! Preprocessor directives and the per-context conditional families.
//!
//! Each [`PreprocContext`] owns one `#if`/`#ifdef` family whose body only
//! admits what is valid in that context, so a conditional inside an
//! `@interface` holds interface declarations and one inside an enum holds
//! enumerators.

use crate::dsl::{
    alias, comma_sep, field, optional, pattern, preprocessor, sym, token_immediate, Rule,
};
use crate::grammar::preproc::ConditionalFamily;
use crate::merge::Extension;
use crate::{choice, seq};

/// Precedence of each item inside a conditional body.
pub const CONTENT_PRECEDENCE: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreprocContext {
    /// Statements and declarations at top level or in blocks.
    BlockItem,
    ImplementationDefinition,
    InterfaceDeclaration,
    Enumerator,
}

impl PreprocContext {
    pub const ALL: [PreprocContext; 4] = [
        PreprocContext::BlockItem,
        PreprocContext::ImplementationDefinition,
        PreprocContext::InterfaceDeclaration,
        PreprocContext::Enumerator,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            PreprocContext::BlockItem => "",
            PreprocContext::ImplementationDefinition => "_in_implementation_definition",
            PreprocContext::InterfaceDeclaration => "_in_interface_declaration",
            PreprocContext::Enumerator => "_in_enumerator",
        }
    }

    /// What a conditional body may contain in this context.
    pub fn content(self) -> Rule {
        match self {
            PreprocContext::BlockItem => choice![
                sym("_block_item"),
                sym("attribute_specifier"),
                sym("property_implementation"),
            ],
            PreprocContext::ImplementationDefinition => sym("implementation_definition"),
            PreprocContext::InterfaceDeclaration => sym("interface_declaration"),
            PreprocContext::Enumerator => seq![sym("enumerator"), ","],
        }
    }

    pub fn family(self) -> ConditionalFamily {
        ConditionalFamily::new(self.suffix(), self.content())
            .content_precedence(CONTENT_PRECEDENCE)
    }

    /// Rule name of the family's `directive` rule, e.g. `preproc_ifdef_in_enumerator`.
    pub fn rule_name(self, directive: &str) -> String {
        self.family().name(directive)
    }
}

fn line_end() -> Rule {
    token_immediate(pattern("\\r?\\n"))
}

pub(crate) fn patch(extension: Extension) -> Extension {
    let mut extension = extension;
    for context in PreprocContext::ALL {
        extension = extension.define_all(context.family().rules());
    }
    extension
        .define(
            "preproc_include",
            seq![
                field(
                    "directive",
                    choice![preprocessor("include"), preprocessor("import")]
                ),
                field(
                    "path",
                    choice![
                        sym("string_literal"),
                        sym("system_lib_string"),
                        sym("identifier"),
                        alias(sym("preproc_call_expression"), "call_expression"),
                    ],
                ),
                line_end(),
            ],
        )
        .define(
            "preproc_undef",
            seq![
                preprocessor("undef"),
                field("name", sym("identifier")),
                line_end(),
            ],
        )
        .define(
            "preproc_linemarker",
            seq![
                "#",
                sym("number_literal"),
                field("filename", sym("string_literal")),
                optional(seq![
                    field("row", sym("number_literal")),
                    optional(field("column", sym("number_literal"))),
                ]),
                line_end(),
            ],
        )
        .extend_choice("_preproc_expression", vec![sym("system_lib_string")])
        .define(
            "preproc_params",
            seq![
                token_immediate("("),
                comma_sep(choice![sym("identifier"), "..."]),
                optional("..."),
                ")",
            ],
        )
}
