//! Token-level rules: extras, identifiers and literals.

use crate::dsl::{
    alias, optional, pattern, pattern_with_flags, prec, repeat, repeat1, sym,
    token, token_immediate, Rule,
};
use crate::merge::Extension;
use crate::{choice, seq};

/// Skipped between any two tokens: whitespace (including NBSP), line
/// continuations and comments.
pub fn extras() -> Vec<Rule> {
    vec![pattern("\\u00A0|\\s|\\\\\\r?\\n"), sym("comment")]
}

/// Identifiers admit `$` and universal character names.
pub const IDENTIFIER_PATTERN: &str = "(\\$|\\p{XID_Start}|_|\\\\u[0-9A-Fa-f]{4}|\\\\U[0-9A-Fa-f]{8})(\\$|\\p{XID_Continue}|\\\\u[0-9A-Fa-f]{4}|\\\\U[0-9A-Fa-f]{8})*";

/// Keywords that double as identifiers in parameter position.
pub const KEYWORD_IDENTIFIERS: [&str; 4] = ["id", "in", "struct", "const"];

fn number_literal() -> Rule {
    let separator = "'";
    let hex = || pattern("[0-9a-fA-F]");
    let decimal = || pattern("[0-9]");
    let hex_digits = || seq![repeat1(hex()), repeat(seq![separator, repeat1(hex())])];
    let decimal_digits =
        || seq![repeat1(decimal()), repeat(seq![separator, repeat1(decimal())])];
    token(seq![
        optional(pattern("[-\\+]")),
        optional(choice!["0x", "0b"]),
        choice![
            seq![
                choice![
                    decimal_digits(),
                    seq!["0b", decimal_digits()],
                    seq!["0x", hex_digits()],
                ],
                optional(seq![".", optional(hex_digits())]),
            ],
            seq![".", decimal_digits()],
        ],
        optional(seq![
            pattern("[eEpP]"),
            optional(seq![optional(pattern("[-\\+]")), hex_digits()]),
        ]),
        repeat(choice!["i", "u", "l", "U", "L", "f", "F"]),
    ])
}

fn string_literal() -> Rule {
    seq![
        choice![seq!["@", "\""], "L\"", "u\"", "U\"", "u8\"", "\""],
        repeat(choice![
            alias(
                token_immediate(prec(1, pattern("[^\\\\\"\\n]+"))),
                "string_content"
            ),
            sym("escape_sequence"),
        ]),
        "\"",
    ]
}

pub(crate) fn patch(extension: Extension) -> Extension {
    extension
        .extras(extras())
        .define(
            "identifier",
            pattern_with_flags(IDENTIFIER_PATTERN, "u"),
        )
        .define("number_literal", number_literal())
        .define("string_literal", string_literal())
        .define(
            "keyword_identifier",
            alias(
                prec(
                    -3,
                    Rule::choice(KEYWORD_IDENTIFIERS.iter().map(|k| Rule::from(*k)).collect()),
                ),
                "identifier",
            ),
        )
}
