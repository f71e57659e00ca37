//! Built-in C base grammar.
//!
//! The Objective-C rules are written as patches over this table. It mirrors
//! tree-sitter-c rule for rule (names, fields, precedences, conflicts) so
//! that the composed grammar matches what the generator would build from
//! `tree-sitter-c/grammar.js`. A different base can be loaded from a
//! `grammar.json` instead, see [`crate::grammar::load_json`].

use crate::dsl::{
    alias, comma_sep, comma_sep1, field, optional, pattern, prec, prec_dynamic, prec_left,
    prec_right, preprocessor, repeat, repeat1, sym, token, token_immediate, Rule,
};
use crate::grammar::preproc::ConditionalFamily;
use crate::grammar::Grammar;
use crate::{choice, seq};

/// Static precedence levels shared with the extension.
pub mod prec {
    pub const PAREN_DECLARATOR: i32 = -10;
    pub const ASSIGNMENT: i32 = -2;
    pub const CONDITIONAL: i32 = -1;
    pub const DEFAULT: i32 = 0;
    pub const LOGICAL_OR: i32 = 1;
    pub const LOGICAL_AND: i32 = 2;
    pub const INCLUSIVE_OR: i32 = 3;
    pub const EXCLUSIVE_OR: i32 = 4;
    pub const BITWISE_AND: i32 = 5;
    pub const EQUAL: i32 = 6;
    pub const RELATIONAL: i32 = 7;
    pub const OFFSETOF: i32 = 8;
    pub const SHIFT: i32 = 9;
    pub const ADD: i32 = 10;
    pub const MULTIPLY: i32 = 11;
    pub const CAST: i32 = 12;
    pub const SIZEOF: i32 = 13;
    pub const UNARY: i32 = 14;
    pub const CALL: i32 = 15;
    pub const FIELD: i32 = 16;
    pub const SUBSCRIPT: i32 = 17;
}

/// Operator table of `binary_expression`, in declaration order.
pub const BINARY_OPERATORS: &[(&str, i32)] = &[
    ("+", prec::ADD),
    ("-", prec::ADD),
    ("*", prec::MULTIPLY),
    ("/", prec::MULTIPLY),
    ("%", prec::MULTIPLY),
    ("||", prec::LOGICAL_OR),
    ("&&", prec::LOGICAL_AND),
    ("|", prec::INCLUSIVE_OR),
    ("^", prec::EXCLUSIVE_OR),
    ("&", prec::BITWISE_AND),
    ("==", prec::EQUAL),
    ("!=", prec::EQUAL),
    (">", prec::RELATIONAL),
    (">=", prec::RELATIONAL),
    ("<=", prec::RELATIONAL),
    ("<", prec::RELATIONAL),
    ("<<", prec::SHIFT),
    (">>", prec::SHIFT),
];

const SIZE_MODIFIERS: [&str; 4] = ["signed", "unsigned", "long", "short"];

const PRIMITIVE_TYPES: &[&str] = &[
    "bool", "char", "int", "float", "double", "void", "size_t", "ssize_t", "ptrdiff_t",
    "intptr_t", "uintptr_t", "charptr_t", "nullptr_t", "max_align_t", "int8_t", "int16_t",
    "int32_t", "int64_t", "uint8_t", "uint16_t", "uint32_t", "uint64_t", "char8_t",
    "char16_t", "char32_t",
];

fn size_modifier() -> Rule {
    Rule::choice(SIZE_MODIFIERS.iter().map(|m| Rule::from(*m)).collect())
}

fn line_end() -> Rule {
    token_immediate(pattern("\\r?\\n"))
}

/// The complete C grammar.
pub fn grammar() -> Grammar {
    let mut g = Grammar::new("c");
    g.word = Some("identifier".into());

    top_level(&mut g);
    preprocessor_rules(&mut g);
    declarations(&mut g);
    declarators(&mut g);
    types(&mut g);
    statements(&mut g);
    expressions(&mut g);
    literals(&mut g);

    g.extras = vec![pattern("\\s|\\\\\\r?\\n"), sym("comment")];
    g.inline = [
        "_type_identifier",
        "_field_identifier",
        "_statement_identifier",
        "_non_case_statement",
        "_assignment_left_expression",
        "_expression_not_binary",
    ]
    .map(String::from)
    .to_vec();
    g.supertypes = [
        "expression",
        "statement",
        "type_specifier",
        "_declarator",
        "_field_declarator",
        "_type_declarator",
        "_abstract_declarator",
    ]
    .map(String::from)
    .to_vec();
    let conflicts: &[&[&str]] = &[
        &["type_specifier", "_declarator"],
        &["type_specifier", "_declarator", "macro_type_specifier"],
        &["type_specifier", "expression"],
        &["type_specifier", "expression", "macro_type_specifier"],
        &["type_specifier", "macro_type_specifier"],
        &["type_specifier", "sized_type_specifier"],
        &["sized_type_specifier"],
        &["attributed_statement"],
        &["_declaration_modifiers", "attributed_statement"],
        &["enum_specifier"],
        &["type_specifier", "_old_style_parameter_list"],
        &["parameter_list", "_old_style_parameter_list"],
        &["function_declarator", "_function_declaration_declarator"],
        &["_block_item", "statement"],
        &["_top_level_item", "_top_level_statement"],
        &["type_specifier", "_top_level_expression_statement"],
        &["type_qualifier", "extension_expression"],
    ];
    g.conflicts = conflicts
        .iter()
        .map(|set| set.iter().map(|name| name.to_string()).collect())
        .collect();
    g
}

fn top_level(g: &mut Grammar) {
    g.define("translation_unit", repeat(sym("_top_level_item")));

    let shared = || {
        vec![
            sym("function_definition"),
            alias(sym("_old_style_function_definition"), "function_definition"),
            sym("linkage_specification"),
            sym("declaration"),
        ]
    };
    let preproc = || {
        vec![
            sym("attributed_statement"),
            sym("type_definition"),
            sym("_empty_declaration"),
            sym("preproc_if"),
            sym("preproc_ifdef"),
            sym("preproc_include"),
            sym("preproc_def"),
            sym("preproc_function_def"),
            sym("preproc_call"),
        ]
    };

    let mut top = shared();
    top.push(sym("_top_level_statement"));
    top.extend(preproc());
    g.define("_top_level_item", Rule::choice(top));

    let mut block = shared();
    block.push(sym("statement"));
    block.extend(preproc());
    g.define("_block_item", Rule::choice(block));
}

fn preprocessor_rules(g: &mut Grammar) {
    g.define(
        "preproc_include",
        seq![
            field("directive", preprocessor("include")),
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
    );
    g.define(
        "preproc_def",
        seq![
            preprocessor("define"),
            field("name", sym("identifier")),
            field("value", optional(sym("preproc_arg"))),
            line_end(),
        ],
    );
    g.define(
        "preproc_function_def",
        seq![
            preprocessor("define"),
            field("name", sym("identifier")),
            field("parameters", sym("preproc_params")),
            field("value", optional(sym("preproc_arg"))),
            line_end(),
        ],
    );
    g.define(
        "preproc_params",
        seq![
            token_immediate("("),
            comma_sep(choice![sym("identifier"), "..."]),
            ")",
        ],
    );
    g.define(
        "preproc_call",
        seq![
            field("directive", sym("preproc_directive")),
            field("argument", optional(sym("preproc_arg"))),
            line_end(),
        ],
    );

    g.define_all(ConditionalFamily::new("", sym("_block_item")).rules());
    g.define_all(
        ConditionalFamily::new("_in_field_declaration_list", sym("_field_declaration_list_item"))
            .rules(),
    );
    g.define_all(
        ConditionalFamily::new("_in_enumerator_list", seq![sym("enumerator"), ","]).rules(),
    );
    g.define_all(
        ConditionalFamily::new("_in_enumerator_list_no_comma", sym("enumerator"))
            .precedence(-1)
            .rules(),
    );

    g.define(
        "preproc_arg",
        token(prec(-1, pattern("\\S([^/\\n]|\\/[^*]|\\\\\\r?\\n)*"))),
    );
    g.define("preproc_directive", pattern("#[ \\t]*[a-zA-Z0-9]\\w*"));
    g.define(
        "_preproc_expression",
        choice![
            sym("identifier"),
            alias(sym("preproc_call_expression"), "call_expression"),
            sym("number_literal"),
            sym("char_literal"),
            sym("preproc_defined"),
            alias(sym("preproc_unary_expression"), "unary_expression"),
            alias(sym("preproc_binary_expression"), "binary_expression"),
            alias(
                sym("preproc_parenthesized_expression"),
                "parenthesized_expression"
            ),
        ],
    );
    g.define(
        "preproc_parenthesized_expression",
        seq!["(", sym("_preproc_expression"), ")"],
    );
    g.define(
        "preproc_defined",
        choice![
            prec(prec::CALL, seq!["defined", "(", sym("identifier"), ")"]),
            seq!["defined", sym("identifier")],
        ],
    );
    g.define(
        "preproc_unary_expression",
        prec_left(
            prec::UNARY,
            seq![
                field("operator", choice!["!", "~", "-", "+"]),
                field("argument", sym("_preproc_expression")),
            ],
        ),
    );
    g.define(
        "preproc_call_expression",
        prec(
            prec::CALL,
            seq![
                field("function", sym("identifier")),
                field(
                    "arguments",
                    alias(sym("preproc_argument_list"), "argument_list")
                ),
            ],
        ),
    );
    g.define(
        "preproc_argument_list",
        seq!["(", comma_sep(sym("_preproc_expression")), ")"],
    );
    g.define(
        "preproc_binary_expression",
        binary_table(BINARY_OPERATORS, "_preproc_expression"),
    );
}

fn binary_table(operators: &[(&str, i32)], operand: &str) -> Rule {
    Rule::choice(
        operators
            .iter()
            .map(|(operator, level)| {
                prec_left(
                    *level,
                    seq![
                        field("left", sym(operand)),
                        field("operator", *operator),
                        field("right", sym(operand)),
                    ],
                )
            })
            .collect(),
    )
}

fn declarations(g: &mut Grammar) {
    g.define(
        "function_definition",
        seq![
            optional(sym("ms_call_modifier")),
            sym("_declaration_specifiers"),
            optional(sym("ms_call_modifier")),
            field("declarator", sym("_declarator")),
            field("body", sym("compound_statement")),
        ],
    );
    g.define(
        "_old_style_function_definition",
        seq![
            optional(sym("ms_call_modifier")),
            sym("_declaration_specifiers"),
            field(
                "declarator",
                alias(sym("_old_style_function_declarator"), "function_declarator")
            ),
            repeat(sym("declaration")),
            field("body", sym("compound_statement")),
        ],
    );
    g.define(
        "declaration",
        seq![
            sym("_declaration_specifiers"),
            comma_sep1(field(
                "declarator",
                choice![
                    seq![
                        sym("_declaration_declarator"),
                        optional(sym("gnu_asm_expression"))
                    ],
                    sym("init_declarator"),
                ],
            )),
            ";",
        ],
    );
    g.define(
        "type_definition",
        seq![
            optional("__extension__"),
            "typedef",
            sym("_type_definition_type"),
            sym("_type_definition_declarators"),
            repeat(sym("attribute_specifier")),
            ";",
        ],
    );
    g.define(
        "_type_definition_type",
        seq![
            repeat(sym("type_qualifier")),
            field("type", sym("type_specifier")),
            repeat(sym("type_qualifier")),
        ],
    );
    g.define(
        "_type_definition_declarators",
        comma_sep1(field("declarator", sym("_type_declarator"))),
    );
    g.define(
        "_declaration_modifiers",
        choice![
            sym("storage_class_specifier"),
            sym("type_qualifier"),
            sym("attribute_specifier"),
            sym("attribute_declaration"),
            sym("ms_declspec_modifier"),
        ],
    );
    g.define(
        "_declaration_specifiers",
        prec_right(
            0,
            seq![
                repeat(sym("_declaration_modifiers")),
                field("type", sym("type_specifier")),
                repeat(sym("_declaration_modifiers")),
            ],
        ),
    );
    g.define(
        "linkage_specification",
        seq![
            "extern",
            field("value", sym("string_literal")),
            field(
                "body",
                choice![
                    sym("function_definition"),
                    sym("declaration"),
                    sym("declaration_list"),
                ],
            ),
        ],
    );
    g.define(
        "attribute_specifier",
        seq!["__attribute__", "(", sym("argument_list"), ")"],
    );
    g.define(
        "attribute",
        seq![
            optional(seq![field("prefix", sym("identifier")), "::"]),
            field("name", sym("identifier")),
            optional(sym("argument_list")),
        ],
    );
    g.define(
        "attribute_declaration",
        seq!["[[", comma_sep1(sym("attribute")), "]]"],
    );
    g.define(
        "ms_declspec_modifier",
        seq!["__declspec", "(", sym("identifier"), ")"],
    );
    g.define("ms_based_modifier", seq!["__based", sym("argument_list")]);
    g.define(
        "ms_call_modifier",
        choice![
            "__cdecl",
            "__clrcall",
            "__stdcall",
            "__fastcall",
            "__thiscall",
            "__vectorcall",
        ],
    );
    g.define("ms_restrict_modifier", "__restrict".into());
    g.define("ms_unsigned_ptr_modifier", "__uptr".into());
    g.define("ms_signed_ptr_modifier", "__sptr".into());
    g.define("ms_unaligned_ptr_modifier", choice!["_unaligned", "__unaligned"]);
    g.define(
        "ms_pointer_modifier",
        choice![
            sym("ms_unaligned_ptr_modifier"),
            sym("ms_restrict_modifier"),
            sym("ms_unsigned_ptr_modifier"),
            sym("ms_signed_ptr_modifier"),
        ],
    );
    g.define(
        "declaration_list",
        seq!["{", repeat(sym("_block_item")), "}"],
    );
}

fn declarators(g: &mut Grammar) {
    g.define(
        "_declarator",
        choice![
            sym("attributed_declarator"),
            sym("pointer_declarator"),
            sym("function_declarator"),
            sym("array_declarator"),
            sym("parenthesized_declarator"),
            sym("identifier"),
        ],
    );
    g.define(
        "_declaration_declarator",
        choice![
            sym("attributed_declarator"),
            sym("pointer_declarator"),
            alias(sym("_function_declaration_declarator"), "function_declarator"),
            sym("array_declarator"),
            sym("parenthesized_declarator"),
            sym("identifier"),
        ],
    );
    g.define(
        "_field_declarator",
        choice![
            alias(sym("attributed_field_declarator"), "attributed_declarator"),
            alias(sym("pointer_field_declarator"), "pointer_declarator"),
            alias(sym("function_field_declarator"), "function_declarator"),
            alias(sym("array_field_declarator"), "array_declarator"),
            alias(sym("parenthesized_field_declarator"), "parenthesized_declarator"),
            sym("_field_identifier"),
        ],
    );
    g.define(
        "_type_declarator",
        choice![
            alias(sym("attributed_type_declarator"), "attributed_declarator"),
            alias(sym("pointer_type_declarator"), "pointer_declarator"),
            alias(sym("function_type_declarator"), "function_declarator"),
            alias(sym("array_type_declarator"), "array_declarator"),
            alias(sym("parenthesized_type_declarator"), "parenthesized_declarator"),
            sym("_type_identifier"),
            alias(size_modifier(), "primitive_type"),
            sym("primitive_type"),
        ],
    );
    g.define(
        "_abstract_declarator",
        choice![
            sym("abstract_pointer_declarator"),
            sym("abstract_function_declarator"),
            sym("abstract_array_declarator"),
            sym("abstract_parenthesized_declarator"),
        ],
    );

    for (suffix, inner) in [
        ("", "_declarator"),
        ("_field", "_field_declarator"),
        ("_type", "_type_declarator"),
    ] {
        g.define(
            &format!("parenthesized{suffix}_declarator"),
            prec_dynamic(
                prec::PAREN_DECLARATOR,
                seq!["(", optional(sym("ms_call_modifier")), sym(inner), ")"],
            ),
        );
        g.define(
            &format!("attributed{suffix}_declarator"),
            prec_right(0, seq![sym(inner), repeat1(sym("attribute_declaration"))]),
        );
        g.define(
            &format!("pointer{suffix}_declarator"),
            prec_dynamic(
                1,
                prec_right(
                    0,
                    seq![
                        optional(sym("ms_based_modifier")),
                        "*",
                        repeat(sym("ms_pointer_modifier")),
                        repeat(sym("type_qualifier")),
                        field("declarator", sym(inner)),
                    ],
                ),
            ),
        );
        g.define(
            &format!("array{suffix}_declarator"),
            prec(
                1,
                seq![
                    field("declarator", sym(inner)),
                    "[",
                    repeat(choice![sym("type_qualifier"), "static"]),
                    field("size", optional(choice![sym("expression"), "*"])),
                    "]",
                ],
            ),
        );
    }
    g.define(
        "abstract_parenthesized_declarator",
        prec(
            1,
            seq![
                "(",
                optional(sym("ms_call_modifier")),
                sym("_abstract_declarator"),
                ")"
            ],
        ),
    );
    g.define(
        "abstract_pointer_declarator",
        prec_dynamic(
            1,
            prec_right(
                0,
                seq![
                    "*",
                    repeat(sym("type_qualifier")),
                    field("declarator", optional(sym("_abstract_declarator"))),
                ],
            ),
        ),
    );
    g.define(
        "abstract_array_declarator",
        prec(
            1,
            seq![
                field("declarator", optional(sym("_abstract_declarator"))),
                "[",
                repeat(choice![sym("type_qualifier"), "static"]),
                field("size", optional(choice![sym("expression"), "*"])),
                "]",
            ],
        ),
    );

    let function_suffix = || {
        seq![
            field("parameters", sym("parameter_list")),
            optional(sym("gnu_asm_expression")),
            repeat(choice![
                sym("attribute_specifier"),
                sym("identifier"),
                alias(sym("preproc_call_expression"), "call_expression"),
            ]),
        ]
    };
    g.define(
        "function_declarator",
        prec_right(
            1,
            seq![field("declarator", sym("_declarator")), function_suffix()],
        ),
    );
    g.define(
        "_function_declaration_declarator",
        prec_right(
            1,
            seq![
                field("declarator", sym("_declaration_declarator")),
                function_suffix()
            ],
        ),
    );
    g.define(
        "function_field_declarator",
        prec(
            1,
            seq![
                field("declarator", sym("_field_declarator")),
                field("parameters", sym("parameter_list")),
            ],
        ),
    );
    g.define(
        "function_type_declarator",
        prec(
            1,
            seq![
                field("declarator", sym("_type_declarator")),
                field("parameters", sym("parameter_list")),
            ],
        ),
    );
    g.define(
        "abstract_function_declarator",
        prec(
            1,
            seq![
                field("declarator", optional(sym("_abstract_declarator"))),
                field("parameters", sym("parameter_list")),
            ],
        ),
    );
    g.define(
        "_old_style_function_declarator",
        seq![
            field("declarator", sym("_declarator")),
            field(
                "parameters",
                alias(sym("_old_style_parameter_list"), "parameter_list")
            ),
        ],
    );
    g.define(
        "init_declarator",
        seq![
            field("declarator", sym("_declarator")),
            "=",
            field(
                "value",
                choice![sym("initializer_list"), sym("expression")]
            ),
        ],
    );
}

fn types(g: &mut Grammar) {
    g.define(
        "storage_class_specifier",
        choice![
            "extern",
            "static",
            "auto",
            "register",
            "inline",
            "__inline",
            "__inline__",
            "__forceinline",
            "thread_local",
            "__thread",
        ],
    );
    g.define(
        "type_qualifier",
        choice![
            "const",
            "constexpr",
            "volatile",
            "restrict",
            "__restrict__",
            "__extension__",
            "_Atomic",
            "_Noreturn",
            "noreturn",
            "_Nonnull",
            sym("alignas_qualifier"),
        ],
    );
    g.define(
        "alignas_qualifier",
        seq![
            choice!["alignas", "_Alignas"],
            "(",
            choice![sym("expression"), sym("type_descriptor")],
            ")",
        ],
    );
    g.define(
        "type_specifier",
        choice![
            sym("struct_specifier"),
            sym("union_specifier"),
            sym("enum_specifier"),
            sym("macro_type_specifier"),
            sym("sized_type_specifier"),
            sym("primitive_type"),
            sym("_type_identifier"),
        ],
    );
    g.define(
        "sized_type_specifier",
        prec_right(
            0,
            seq![
                repeat1(size_modifier()),
                optional(field(
                    "type",
                    choice![
                        prec_dynamic(-1, sym("_type_identifier")),
                        sym("primitive_type")
                    ],
                )),
            ],
        ),
    );
    g.define(
        "primitive_type",
        token(Rule::choice(
            PRIMITIVE_TYPES.iter().map(|name| Rule::from(*name)).collect(),
        )),
    );
    g.define(
        "enum_specifier",
        seq![
            "enum",
            choice![
                seq![
                    field("name", sym("_type_identifier")),
                    optional(seq![":", field("underlying_type", sym("primitive_type"))]),
                    field("body", optional(sym("enumerator_list"))),
                ],
                field("body", sym("enumerator_list")),
            ],
            optional(sym("attribute_specifier")),
        ],
    );
    g.define(
        "enumerator_list",
        seq![
            "{",
            repeat(choice![
                seq![sym("enumerator"), ","],
                alias(sym("preproc_if_in_enumerator_list"), "preproc_if"),
                alias(sym("preproc_ifdef_in_enumerator_list"), "preproc_ifdef"),
                seq![sym("preproc_call"), ","],
            ]),
            optional(choice![
                sym("enumerator"),
                alias(sym("preproc_if_in_enumerator_list_no_comma"), "preproc_if"),
                alias(
                    sym("preproc_ifdef_in_enumerator_list_no_comma"),
                    "preproc_ifdef"
                ),
                sym("preproc_call"),
            ]),
            "}",
        ],
    );
    for keyword in ["struct", "union"] {
        g.define(
            &format!("{keyword}_specifier"),
            prec_right(
                0,
                seq![
                    keyword,
                    optional(sym("attribute_specifier")),
                    optional(sym("ms_declspec_modifier")),
                    choice![
                        seq![
                            field("name", sym("_type_identifier")),
                            field("body", optional(sym("field_declaration_list"))),
                        ],
                        field("body", sym("field_declaration_list")),
                    ],
                    optional(sym("attribute_specifier")),
                ],
            ),
        );
    }
    g.define(
        "field_declaration_list",
        seq!["{", repeat(sym("_field_declaration_list_item")), "}"],
    );
    g.define(
        "_field_declaration_list_item",
        choice![
            sym("field_declaration"),
            sym("preproc_def"),
            sym("preproc_function_def"),
            sym("preproc_call"),
            alias(sym("preproc_if_in_field_declaration_list"), "preproc_if"),
            alias(sym("preproc_ifdef_in_field_declaration_list"), "preproc_ifdef"),
        ],
    );
    g.define(
        "field_declaration",
        seq![
            sym("_declaration_specifiers"),
            comma_sep(field("declarator", sym("_field_declarator"))),
            optional(sym("bitfield_clause")),
            optional(sym("attribute_specifier")),
            ";",
        ],
    );
    g.define("bitfield_clause", seq![":", sym("expression")]);
    g.define(
        "enumerator",
        seq![
            field("name", sym("identifier")),
            optional(seq!["=", field("value", sym("expression"))]),
        ],
    );
    g.define("variadic_parameter", "...".into());
    g.define(
        "parameter_list",
        seq![
            "(",
            comma_sep(choice![
                sym("parameter_declaration"),
                sym("variadic_parameter")
            ]),
            ")",
        ],
    );
    g.define(
        "_old_style_parameter_list",
        seq![
            "(",
            comma_sep(choice![sym("identifier"), sym("variadic_parameter")]),
            ")",
        ],
    );
    g.define(
        "parameter_declaration",
        seq![
            sym("_declaration_specifiers"),
            optional(field(
                "declarator",
                choice![sym("_declarator"), sym("_abstract_declarator")],
            )),
        ],
    );
    g.define(
        "macro_type_specifier",
        prec_dynamic(
            -1,
            seq![
                field("name", sym("identifier")),
                "(",
                field("type", sym("type_descriptor")),
                ")",
            ],
        ),
    );
    g.define("_empty_declaration", seq![sym("type_specifier"), ";"]);
}

fn statements(g: &mut Grammar) {
    g.define(
        "compound_statement",
        seq!["{", repeat(sym("_block_item")), "}"],
    );
    g.define(
        "attributed_statement",
        seq![repeat1(sym("attribute_declaration")), sym("statement")],
    );
    g.define(
        "statement",
        choice![sym("case_statement"), sym("_non_case_statement")],
    );

    let common = || {
        vec![
            sym("attributed_statement"),
            sym("labeled_statement"),
            sym("compound_statement"),
        ]
    };
    let control = || {
        vec![
            sym("if_statement"),
            sym("switch_statement"),
            sym("do_statement"),
            sym("while_statement"),
            sym("for_statement"),
            sym("return_statement"),
            sym("break_statement"),
            sym("continue_statement"),
            sym("goto_statement"),
        ]
    };

    let mut non_case = common();
    non_case.push(sym("expression_statement"));
    non_case.extend(control());
    non_case.push(sym("seh_try_statement"));
    non_case.push(sym("seh_leave_statement"));
    g.define("_non_case_statement", Rule::choice(non_case));

    let mut top = vec![sym("case_statement")];
    top.extend(common());
    top.push(alias(
        sym("_top_level_expression_statement"),
        "expression_statement",
    ));
    top.extend(control());
    g.define("_top_level_statement", Rule::choice(top));

    let expression_or_comma = || choice![sym("expression"), sym("comma_expression")];

    g.define(
        "labeled_statement",
        seq![
            field("label", sym("_statement_identifier")),
            ":",
            choice![sym("declaration"), sym("statement")],
        ],
    );
    g.define(
        "_top_level_expression_statement",
        seq![sym("_expression_not_binary"), ";"],
    );
    g.define(
        "expression_statement",
        seq![optional(expression_or_comma()), ";"],
    );
    g.define(
        "if_statement",
        prec_right(
            0,
            seq![
                "if",
                field("condition", sym("parenthesized_expression")),
                field("consequence", sym("statement")),
                optional(field("alternative", sym("else_clause"))),
            ],
        ),
    );
    g.define("else_clause", seq!["else", sym("statement")]);
    g.define(
        "switch_statement",
        seq![
            "switch",
            field("condition", sym("parenthesized_expression")),
            field("body", sym("compound_statement")),
        ],
    );
    g.define(
        "case_statement",
        prec_right(
            0,
            seq![
                choice![seq!["case", field("value", sym("expression"))], "default"],
                ":",
                repeat(choice![
                    sym("_non_case_statement"),
                    sym("declaration"),
                    sym("type_definition"),
                ]),
            ],
        ),
    );
    g.define(
        "while_statement",
        seq![
            "while",
            field("condition", sym("parenthesized_expression")),
            field("body", sym("statement")),
        ],
    );
    g.define(
        "do_statement",
        seq![
            "do",
            field("body", sym("statement")),
            "while",
            field("condition", sym("parenthesized_expression")),
            ";",
        ],
    );
    g.define(
        "for_statement",
        seq![
            "for",
            "(",
            sym("_for_statement_body"),
            ")",
            field("body", sym("statement")),
        ],
    );
    g.define(
        "_for_statement_body",
        seq![
            choice![
                field("initializer", sym("declaration")),
                seq![field("initializer", optional(expression_or_comma())), ";"],
            ],
            field("condition", optional(expression_or_comma())),
            ";",
            field("update", optional(expression_or_comma())),
        ],
    );
    g.define(
        "return_statement",
        seq!["return", optional(expression_or_comma()), ";"],
    );
    g.define("break_statement", seq!["break", ";"]);
    g.define("continue_statement", seq!["continue", ";"]);
    g.define(
        "goto_statement",
        seq!["goto", field("label", sym("_statement_identifier")), ";"],
    );
    g.define(
        "seh_try_statement",
        seq![
            "__try",
            field("body", sym("compound_statement")),
            choice![sym("seh_except_clause"), sym("seh_finally_clause")],
        ],
    );
    g.define(
        "seh_except_clause",
        seq![
            "__except",
            field("filter", sym("parenthesized_expression")),
            field("body", sym("compound_statement")),
        ],
    );
    g.define(
        "seh_finally_clause",
        seq!["__finally", field("body", sym("compound_statement"))],
    );
    g.define("seh_leave_statement", seq!["__leave", ";"]);
}

fn expressions(g: &mut Grammar) {
    g.define(
        "expression",
        choice![sym("_expression_not_binary"), sym("binary_expression")],
    );
    g.define(
        "_expression_not_binary",
        choice![
            sym("conditional_expression"),
            sym("assignment_expression"),
            sym("unary_expression"),
            sym("update_expression"),
            sym("cast_expression"),
            sym("pointer_expression"),
            sym("sizeof_expression"),
            sym("alignof_expression"),
            sym("offsetof_expression"),
            sym("generic_expression"),
            sym("subscript_expression"),
            sym("call_expression"),
            sym("field_expression"),
            sym("compound_literal_expression"),
            sym("identifier"),
            sym("number_literal"),
            sym("_string"),
            sym("true"),
            sym("false"),
            sym("null"),
            sym("char_literal"),
            sym("parenthesized_expression"),
            sym("gnu_asm_expression"),
            sym("extension_expression"),
        ],
    );
    g.define(
        "_string",
        prec_left(
            0,
            choice![sym("string_literal"), sym("concatenated_string")]
        ),
    );
    g.define(
        "comma_expression",
        seq![
            field("left", sym("expression")),
            ",",
            field(
                "right",
                choice![sym("expression"), sym("comma_expression")]
            ),
        ],
    );
    g.define(
        "conditional_expression",
        prec_right(
            prec::CONDITIONAL,
            seq![
                field("condition", sym("expression")),
                "?",
                optional(field(
                    "consequence",
                    choice![sym("expression"), sym("comma_expression")]
                )),
                ":",
                field("alternative", sym("expression")),
            ],
        ),
    );
    g.define(
        "_assignment_left_expression",
        choice![
            sym("identifier"),
            sym("call_expression"),
            sym("field_expression"),
            sym("pointer_expression"),
            sym("subscript_expression"),
            sym("parenthesized_expression"),
        ],
    );
    g.define(
        "assignment_expression",
        prec_right(
            prec::ASSIGNMENT,
            seq![
                field("left", sym("_assignment_left_expression")),
                field(
                    "operator",
                    choice!["=", "*=", "/=", "%=", "+=", "-=", "<<=", ">>=", "&=", "^=", "|="]
                ),
                field("right", sym("expression")),
            ],
        ),
    );
    g.define(
        "pointer_expression",
        prec_left(
            prec::CAST,
            seq![
                field("operator", choice!["*", "&"]),
                field("argument", sym("expression")),
            ],
        ),
    );
    g.define(
        "unary_expression",
        prec_left(
            prec::UNARY,
            seq![
                field("operator", choice!["!", "~", "-", "+"]),
                field("argument", sym("expression")),
            ],
        ),
    );
    g.define(
        "binary_expression",
        binary_table(BINARY_OPERATORS, "expression"),
    );
    let operator = || field("operator", choice!["--", "++"]);
    let argument = || field("argument", sym("expression"));
    g.define(
        "update_expression",
        prec_right(
            prec::UNARY,
            choice![seq![operator(), argument()], seq![argument(), operator()]],
        ),
    );
    g.define(
        "cast_expression",
        prec(
            prec::CAST,
            seq![
                "(",
                field("type", sym("type_descriptor")),
                ")",
                field("value", sym("expression")),
            ],
        ),
    );
    g.define(
        "type_descriptor",
        seq![
            repeat(sym("type_qualifier")),
            field("type", sym("type_specifier")),
            repeat(sym("type_qualifier")),
            field("declarator", optional(sym("_abstract_declarator"))),
        ],
    );
    g.define(
        "sizeof_expression",
        prec(
            prec::SIZEOF,
            seq![
                "sizeof",
                choice![
                    field("value", sym("expression")),
                    seq!["(", field("type", sym("type_descriptor")), ")"],
                ],
            ],
        ),
    );
    g.define(
        "alignof_expression",
        prec(
            prec::SIZEOF,
            seq![
                choice!["__alignof__", "__alignof", "_alignof", "alignof", "_Alignof"],
                "(",
                field("type", sym("type_descriptor")),
                ")",
            ],
        ),
    );
    g.define(
        "offsetof_expression",
        prec(
            prec::OFFSETOF,
            seq![
                "offsetof",
                "(",
                field("type", sym("type_descriptor")),
                ",",
                field("member", sym("_field_identifier")),
                ")",
            ],
        ),
    );
    g.define(
        "generic_expression",
        prec(
            prec::CALL,
            seq![
                "_Generic",
                "(",
                sym("expression"),
                ",",
                comma_sep1(seq![sym("type_descriptor"), ":", sym("expression")]),
                ")",
            ],
        ),
    );
    g.define(
        "subscript_expression",
        prec(
            prec::SUBSCRIPT,
            seq![
                field("argument", sym("expression")),
                "[",
                field("index", sym("expression")),
                "]",
            ],
        ),
    );
    g.define(
        "call_expression",
        prec(
            prec::CALL,
            seq![
                field("function", sym("expression")),
                field("arguments", sym("argument_list")),
            ],
        ),
    );
    gnu_asm(g);
    g.define(
        "extension_expression",
        seq!["__extension__", sym("expression")],
    );
    g.define(
        "argument_list",
        seq![
            "(",
            comma_sep(choice![sym("expression"), sym("compound_statement")]),
            ")",
        ],
    );
    g.define(
        "field_expression",
        seq![
            prec(
                prec::FIELD,
                seq![
                    field("argument", sym("expression")),
                    field("operator", choice![".", "->"]),
                ],
            ),
            field("field", sym("_field_identifier")),
        ],
    );
    g.define(
        "compound_literal_expression",
        seq![
            "(",
            field("type", sym("type_descriptor")),
            ")",
            field("value", sym("initializer_list")),
        ],
    );
    g.define(
        "parenthesized_expression",
        seq![
            "(",
            choice![sym("expression"), sym("comma_expression")],
            ")"
        ],
    );
    g.define(
        "initializer_list",
        seq![
            "{",
            comma_sep(choice![
                sym("initializer_pair"),
                sym("expression"),
                sym("initializer_list"),
            ]),
            optional(","),
            "}",
        ],
    );
    let value = || {
        field(
            "value",
            choice![sym("expression"), sym("initializer_list")],
        )
    };
    g.define(
        "initializer_pair",
        choice![
            seq![
                field(
                    "designator",
                    repeat1(choice![
                        sym("subscript_designator"),
                        sym("field_designator"),
                        sym("subscript_range_designator"),
                    ]),
                ),
                "=",
                value(),
            ],
            seq![field("designator", sym("_field_identifier")), ":", value()],
        ],
    );
    g.define(
        "subscript_designator",
        seq!["[", sym("expression"), "]"],
    );
    g.define(
        "subscript_range_designator",
        seq![
            "[",
            field("start", sym("expression")),
            "...",
            field("end", sym("expression")),
            "]",
        ],
    );
    g.define(
        "field_designator",
        seq![".", sym("_field_identifier")],
    );
}

fn gnu_asm(g: &mut Grammar) {
    g.define(
        "gnu_asm_expression",
        prec(
            prec::CALL,
            seq![
                choice!["asm", "__asm__", "__asm"],
                repeat(sym("gnu_asm_qualifier")),
                "(",
                field("assembly_code", sym("_string")),
                optional(seq![
                    field("output_operands", sym("gnu_asm_output_operand_list")),
                    optional(seq![
                        field("input_operands", sym("gnu_asm_input_operand_list")),
                        optional(seq![
                            field("clobbers", sym("gnu_asm_clobber_list")),
                            optional(field("goto_labels", sym("gnu_asm_goto_list"))),
                        ]),
                    ]),
                ]),
                ")",
            ],
        ),
    );
    g.define(
        "gnu_asm_qualifier",
        choice!["volatile", "__volatile__", "inline", "goto"],
    );
    for direction in ["output", "input"] {
        g.define(
            &format!("gnu_asm_{direction}_operand_list"),
            seq![
                ":",
                comma_sep(field(
                    "operand",
                    sym(&format!("gnu_asm_{direction}_operand"))
                )),
            ],
        );
        g.define(
            &format!("gnu_asm_{direction}_operand"),
            seq![
                optional(seq!["[", field("symbol", sym("identifier")), "]"]),
                field("constraint", sym("string_literal")),
                "(",
                field("value", sym("expression")),
                ")",
            ],
        );
    }
    g.define(
        "gnu_asm_clobber_list",
        seq![":", comma_sep(field("register", sym("_string")))],
    );
    g.define(
        "gnu_asm_goto_list",
        seq![":", comma_sep(field("label", sym("identifier")))],
    );
}

fn literals(g: &mut Grammar) {
    g.define(
        "number_literal",
        token(seq![
            optional(pattern("[-\\+]")),
            optional(choice!["0x", "0b"]),
            choice![
                seq![
                    pattern("[0-9a-fA-F]+(?:'[0-9a-fA-F]+)*"),
                    optional(seq![".", optional(pattern("[0-9a-fA-F]+"))]),
                ],
                seq![".", pattern("[0-9]+")],
            ],
            optional(seq![pattern("[eEpP]"), optional(pattern("[-\\+]?[0-9a-fA-F]+"))]),
            repeat(choice!["u", "l", "U", "L", "f", "F"]),
        ]),
    );
    g.define(
        "char_literal",
        seq![
            choice!["L'", "u'", "U'", "u8'", "'"],
            repeat1(choice![
                sym("escape_sequence"),
                alias(token_immediate(pattern("[^\\n']")), "character"),
            ]),
            "'",
        ],
    );
    g.define(
        "concatenated_string",
        prec_right(
            0,
            seq![
                choice![sym("identifier"), sym("string_literal")],
                sym("string_literal"),
                repeat(choice![sym("string_literal"), sym("identifier")]),
            ],
        ),
    );
    g.define(
        "string_literal",
        seq![
            choice!["L\"", "u\"", "U\"", "u8\"", "\""],
            repeat(choice![
                alias(
                    token_immediate(prec(1, pattern("[^\\\\\"\\n]+"))),
                    "string_content"
                ),
                sym("escape_sequence"),
            ]),
            "\"",
        ],
    );
    g.define(
        "escape_sequence",
        token(prec(
            1,
            seq![
                "\\",
                choice![
                    pattern("[^xuU]"),
                    pattern("\\d{2,3}"),
                    pattern("x[0-9a-fA-F]{1,4}"),
                    pattern("u[0-9a-fA-F]{4}"),
                    pattern("U[0-9a-fA-F]{8}"),
                ],
            ],
        )),
    );
    g.define(
        "system_lib_string",
        token(seq!["<", repeat(choice![pattern("[^>\\n]"), "\\>"]), ">"]),
    );
    g.define("true", token(choice!["TRUE", "true"]));
    g.define("false", token(choice!["FALSE", "false"]));
    g.define("null", choice!["NULL", "nullptr"]);
    g.define(
        "identifier",
        pattern("(\\p{XID_Start}|_|\\\\u[0-9A-Fa-f]{4}|\\\\U[0-9A-Fa-f]{8})(\\p{XID_Continue}|\\\\u[0-9A-Fa-f]{4}|\\\\U[0-9A-Fa-f]{8})*"),
    );
    g.define("_type_identifier", alias(sym("identifier"), "type_identifier"));
    g.define("_field_identifier", alias(sym("identifier"), "field_identifier"));
    g.define(
        "_statement_identifier",
        alias(sym("identifier"), "statement_identifier"),
    );
    g.define(
        "comment",
        token(choice![
            seq!["//", pattern("(\\\\+(.|\\r?\\n)|[^\\\\\\n])*")],
            seq!["/*", pattern("[^*]*\\*+([^/*][^*]*\\*+)*"), "/"],
        ]),
    );
}
