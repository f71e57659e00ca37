//! Message sends, boxed literals, blocks and the `@`-expressions.

use crate::dsl::{
    comma_sep, comma_sep1, field, optional, pattern, prec, prec_left, prec_right, repeat, repeat1,
    sym, token_immediate, Rule,
};
use crate::grammar::c::prec as c_prec;
use crate::merge::Extension;
use crate::{choice, seq};

/// Expression forms added next to the C ones.
pub const EXPRESSION_ADDITIONS: &[&str] = &[
    "message_expression",
    "selector_expression",
    "available_expression",
    "range_expression",
    "block_literal",
    "dictionary_literal",
    "array_literal",
    "at_expression",
    "encode_expression",
    "va_arg_expression",
    "keyword_identifier",
];

/// `[receiver method]` and `[receiver key: arg, arg key: arg]`.
pub fn message_expression() -> Rule {
    prec(
        c_prec::CALL,
        seq![
            "[",
            field(
                "receiver",
                choice![sym("expression"), sym("generic_specifier")]
            ),
            repeat1(seq![
                field("method", sym("identifier")),
                repeat(seq![":", comma_sep1(sym("expression"))]),
            ]),
            "]",
        ],
    )
}

/// `^ [type] [(params)] { ... }`.
pub fn block_literal() -> Rule {
    seq![
        "^",
        optional(sym("attribute_specifier")),
        optional(sym("type_name")),
        optional(sym("attribute_specifier")),
        optional(sym("parameter_list")),
        optional(sym("attribute_specifier")),
        sym("compound_statement"),
    ]
}

fn boxed(open: &str, item: Rule, close: &str) -> Rule {
    seq![
        "@",
        open,
        optional(seq![comma_sep1(item), optional(",")]),
        close,
    ]
}

pub(crate) fn patch(extension: Extension) -> Extension {
    let extension = extension.extend_choice(
        "_expression_not_binary",
        EXPRESSION_ADDITIONS.iter().map(|name| sym(name)).collect(),
    );
    let extension = objc_expressions(extension);
    c_overrides(extension)
}

fn objc_expressions(extension: Extension) -> Extension {
    extension
        .define("message_expression", message_expression())
        .define(
            "selector_expression",
            prec_left(
                0,
                seq![
                    "@selector",
                    repeat1("("),
                    choice![
                        sym("identifier"),
                        sym("method_identifier"),
                        prec(-1, pattern("[^)]*"))
                    ],
                    repeat1(")"),
                ],
            ),
        )
        .define(
            "available_expression",
            seq![
                choice!["@available", "__builtin_available"],
                "(",
                comma_sep1(choice![
                    sym("identifier"),
                    seq![sym("identifier"), sym("version")],
                    "*",
                ]),
                ")",
            ],
        )
        .define(
            "range_expression",
            prec_right(0, seq![sym("expression"), "...", sym("expression")]),
        )
        .define("block_literal", block_literal())
        .define(
            "dictionary_literal",
            boxed("{", sym("dictionary_pair"), "}"),
        )
        .define(
            "dictionary_pair",
            seq![sym("expression"), ":", sym("expression")],
        )
        .define("array_literal", boxed("[", sym("expression"), "]"))
        .define("at_expression", prec_right(0, seq!["@", sym("expression")]))
        .define(
            "encode_expression",
            seq!["@encode", "(", sym("type_name"), ")"],
        )
        .define(
            "va_arg_expression",
            seq![
                "va_arg",
                "(",
                sym("expression"),
                ",",
                sym("type_descriptor"),
                ")"
            ],
        )
        .define(
            "method_identifier",
            prec_right(
                0,
                seq![
                    optional(sym("identifier")),
                    repeat1(token_immediate(":")),
                    repeat(seq![sym("identifier"), repeat1(token_immediate(":"))]),
                ],
            ),
        )
}

fn c_overrides(extension: Extension) -> Extension {
    extension
        .define(
            "cast_expression",
            prec(
                c_prec::CAST,
                choice![
                    seq![
                        "(",
                        field(
                            "type",
                            choice![
                                sym("type_descriptor"),
                                sym("typeof_specifier"),
                                sym("parameterized_arguments"),
                            ],
                        ),
                        ")",
                        field("value", sym("expression")),
                    ],
                    seq![choice!["__real", "__imag"], field("value", sym("expression"))],
                ],
            ),
        )
        .define(
            "argument_list",
            seq![
                "(",
                choice![
                    comma_sep(choice![
                        seq![
                            optional(sym("type_qualifier")),
                            choice![sym("expression"), sym("typeof_specifier")],
                        ],
                        sym("compound_statement"),
                    ]),
                    seq![
                        sym("_type_identifier"),
                        token_immediate("<"),
                        comma_sep1(sym("type_name")),
                        ">",
                    ],
                    sym("objc_bridge"),
                    sym("availability"),
                ],
                ")",
            ],
        )
        .define(
            "parenthesized_expression",
            seq![
                "(",
                choice![
                    sym("expression"),
                    sym("comma_expression"),
                    sym("compound_statement")
                ],
                ")",
            ],
        )
        .define(
            "_top_level_expression_statement",
            seq![optional(sym("_expression_not_binary")), ";"],
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::Associativity;

    #[test]
    fn message_send_binds_like_a_call() {
        let rule = message_expression();
        assert_eq!(rule.outer_precedence().level(), c_prec::CALL);
        assert_eq!(rule.field_names(), vec!["receiver", "method"]);
    }

    #[test]
    fn block_literal_needs_only_a_body() {
        let rule = block_literal();
        let Rule::Seq { members } = &rule else {
            panic!("block literal is a sequence");
        };
        assert_eq!(members.first(), Some(&Rule::from("^")));
        assert_eq!(members.last(), Some(&sym("compound_statement")));
        assert!(members[1..members.len() - 1].iter().all(Rule::is_optional));
    }

    #[test]
    fn boxed_literals_allow_a_trailing_comma() {
        assert_eq!(
            boxed("[", sym("expression"), "]").to_string(),
            "seq('@', '[', optional(seq(seq($.expression, repeat(seq(',', $.expression))), optional(','))), ']')"
        );
    }

    #[test]
    fn range_is_right_associative() {
        let extension = patch(Extension::new("objc"));
        let mut base = crate::grammar::Grammar::new("c");
        base.define("_expression_not_binary", sym("identifier"));
        let grammar = extension.apply(&base).unwrap();
        let info = grammar.rule("range_expression").unwrap().outer_precedence();
        assert_eq!(info.associativity, Some(Associativity::Right));
    }
}
