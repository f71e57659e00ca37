//! Exception handling, synchronization, fast enumeration and autorelease
//! pools.

use crate::dsl::{comma_sep1, optional, pattern, prec, repeat, repeat1, sym, Rule};
use crate::merge::Extension;
use crate::{choice, seq};

/// Statement kinds added to `_non_case_statement`.
pub const STATEMENT_ADDITIONS: &[&str] = &[
    "try_statement",
    "throw_statement",
    "synchronized_statement",
    "ms_asm_block",
];

/// Structured exception statements of the base grammar, superseded by
/// `try_statement` (which also accepts `__try`).
pub const REPLACED_STATEMENTS: &[&str] = &["seh_try_statement", "seh_leave_statement"];

/// `@try { } @catch (...) { } @finally { }`: at least one catch clause or
/// the finally clause.
pub fn try_statement() -> Rule {
    seq![
        choice!["@try", "__try"],
        sym("compound_statement"),
        choice![
            seq![repeat1(sym("catch_clause")), optional(sym("finally_clause"))],
            sym("finally_clause"),
        ],
    ]
}

pub(crate) fn patch(extension: Extension) -> Extension {
    extension
        .extend_filtered(
            "_non_case_statement",
            REPLACED_STATEMENTS,
            STATEMENT_ADDITIONS.iter().map(|name| sym(name)).collect(),
            None,
        )
        .define("try_statement", try_statement())
        .define(
            "catch_clause",
            seq![
                choice!["@catch", "__catch"],
                optional(seq!["(", choice!["...", sym("type_name")], ")"]),
                sym("compound_statement"),
            ],
        )
        .define(
            "finally_clause",
            seq![choice!["@finally", "__finally"], sym("compound_statement")],
        )
        .define(
            "throw_statement",
            seq!["@throw", optional(sym("expression")), ";"],
        )
        .define(
            "synchronized_statement",
            seq![
                "@synchronized",
                "(",
                comma_sep1(sym("expression")),
                ")",
                sym("compound_statement"),
            ],
        )
        .define(
            "compound_statement",
            seq![
                optional("@autoreleasepool"),
                "{",
                repeat(sym("_block_item")),
                "}",
            ],
        )
        .extend_choice(
            "for_statement",
            vec![prec(
                1,
                seq![
                    "for",
                    "(",
                    choice![
                        seq![sym("_declaration_specifiers"), sym("_declarator")],
                        sym("identifier"),
                    ],
                    "in",
                    sym("expression"),
                    ")",
                    sym("_non_case_statement"),
                ],
            )],
        )
        .define("ms_asm_block", seq!["__asm", "{", pattern("[^}]*"), "}"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_requires_a_handler() {
        let rule = try_statement();
        let Rule::Seq { members } = &rule else {
            panic!("try statement is a sequence");
        };
        let handlers = members[2].members().unwrap();
        assert!(!handlers.iter().any(|handler| handler == &Rule::Blank));
        assert_eq!(handlers[1], sym("finally_clause"));
    }

    #[test]
    fn seh_statements_are_replaced() {
        let mut base = crate::grammar::Grammar::new("c");
        base.define(
            "_non_case_statement",
            choice![
                sym("expression_statement"),
                sym("seh_try_statement"),
                sym("seh_leave_statement"),
            ],
        )
        .define("for_statement", seq!["for", ";"]);
        let grammar = patch(Extension::new("objc")).apply(&base).unwrap();
        let symbols = grammar.rule("_non_case_statement").unwrap().symbols();
        assert_eq!(
            symbols,
            vec![
                "expression_statement",
                "try_statement",
                "throw_statement",
                "synchronized_statement",
                "ms_asm_block",
            ]
        );
    }
}
