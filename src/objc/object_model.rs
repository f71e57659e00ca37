//! Classes, protocols, categories, properties and methods.
//!
//! `@interface`/`@implementation`/`@protocol` blocks hold their own member
//! grammars (`interface_declaration`, `implementation_definition`), and the
//! method rules build keyword selectors out of `identifier` and
//! `method_parameter` pieces so that `setX:(int)x y:(int)y` yields one
//! `method_parameter` per keyword.

use crate::dsl::{
    alias, comma_sep, comma_sep1, field, optional, pattern, prec, prec_left, prec_right, repeat,
    repeat1, sym, Rule,
};
use crate::merge::Extension;
use crate::{choice, seq};

/// Object-model statements admitted at the top level and inside blocks.
pub const TOP_LEVEL_ADDITIONS: &[&str] = &[
    "class_declaration",
    "class_interface",
    "class_implementation",
    "protocol_declaration",
    "protocol_forward_declaration",
    "module_import",
    "compatibility_alias_declaration",
    "preproc_undef",
    "preproc_linemarker",
];

pub const VISIBILITY_MARKERS: &[&str] = &["@private", "@protected", "@package", "@public"];

/// Attribute macros that take no arguments.
pub const AVAILABILITY_MARKERS: &[&str] = &[
    "NS_AUTOMATED_REFCOUNT_UNAVAILABLE",
    "NS_ROOT_CLASS",
    "NS_UNAVAILABLE",
    "NS_REQUIRES_NIL_TERMINATION",
    "CF_RETURNS_RETAINED",
    "CF_RETURNS_NOT_RETAINED",
    "DEPRECATED_ATTRIBUTE",
    "UI_APPEARANCE_SELECTOR",
    "UNAVAILABLE_ATTRIBUTE",
];

/// Attribute macros called with an argument list.
pub const AVAILABILITY_MACROS: &[&str] = &[
    "CF_FORMAT_FUNCTION",
    "NS_AVAILABLE",
    "__IOS_AVAILABLE",
    "NS_AVAILABLE_IOS",
    "API_AVAILABLE",
    "API_UNAVAILABLE",
    "API_DEPRECATED",
    "NS_ENUM_AVAILABLE_IOS",
    "NS_DEPRECATED_IOS",
    "NS_ENUM_DEPRECATED_IOS",
    "NS_FORMAT_FUNCTION",
    "DEPRECATED_MSG_ATTRIBUTE",
    "__deprecated_msg",
    "__deprecated_enum_msg",
    "NS_SWIFT_NAME",
    "NS_SWIFT_UNAVAILABLE",
    "NS_EXTENSION_UNAVAILABLE_IOS",
    "NS_CLASS_AVAILABLE_IOS",
    "NS_CLASS_DEPRECATED_IOS",
    "__OSX_AVAILABLE_STARTING",
];

pub const PLATFORMS: &[&str] = &["ios", "tvos", "macos", "macosx", "watchos"];

fn literals(words: &[&str]) -> Rule {
    Rule::choice(words.iter().map(|word| Rule::from(*word)).collect())
}

fn symbols(names: &[&str]) -> Vec<Rule> {
    names.iter().map(|name| sym(name)).collect()
}

pub(crate) fn patch(extension: Extension) -> Extension {
    let extension = extension
        .extend_choice("_top_level_item", symbols(TOP_LEVEL_ADDITIONS))
        .extend_choice("_block_item", symbols(TOP_LEVEL_ADDITIONS));
    let extension = container_rules(extension);
    let extension = member_rules(extension);
    let extension = method_rules(extension);
    attribute_rules(extension)
}

// ============================================================================
// CONTAINERS
// ============================================================================

fn container_rules(extension: Extension) -> Extension {
    extension
        .define(
            "module_import",
            seq![
                "@import",
                field(
                    "path",
                    seq![sym("identifier"), repeat(seq![".", sym("identifier")])]
                ),
                ";",
            ],
        )
        .define(
            "protocol_forward_declaration",
            seq![
                repeat(sym("_declaration_modifiers")),
                "@protocol",
                comma_sep1(sym("identifier")),
                ";",
            ],
        )
        .define(
            "class_declaration",
            seq![
                "@",
                "class",
                comma_sep1(seq![
                    sym("identifier"),
                    optional(sym("parameterized_arguments"))
                ]),
                ";",
            ],
        )
        .define(
            "class_interface",
            seq![
                sym("_class_interface_header"),
                optional(sym("_type_params")),
                optional(sym("_class_interface_inheritance")),
                optional(sym("parameterized_arguments")),
                optional(sym("instance_variables")),
                repeat(sym("interface_declaration")),
                "@end",
            ],
        )
        .define(
            "_class_interface_header",
            seq![
                repeat(sym("_declaration_modifiers")),
                "@interface",
                sym("identifier"),
                optional(";"),
            ],
        )
        .define(
            "_type_params",
            prec_right(
                0,
                choice![
                    seq![
                        sym("generic_arguments"),
                        optional(sym("parameterized_arguments"))
                    ],
                    sym("parameterized_arguments"),
                ],
            ),
        )
        .define(
            "_class_interface_inheritance",
            prec_right(
                1,
                choice![
                    seq![
                        ":",
                        field("superclass", sym("identifier")),
                        optional(sym("parameterized_arguments")),
                    ],
                    seq!["(", field("category", optional(sym("identifier"))), ")"],
                ],
            ),
        )
        .define(
            "class_implementation",
            seq![
                sym("_class_implementation_header"),
                optional(sym("_type_params")),
                optional(sym("_class_implementation_inheritance")),
                optional(sym("instance_variables")),
                repeat(sym("implementation_definition")),
                "@end",
            ],
        )
        .define(
            "_class_implementation_header",
            seq![
                repeat(sym("_declaration_modifiers")),
                "@implementation",
                sym("identifier"),
                optional(";"),
            ],
        )
        .define(
            "_class_implementation_inheritance",
            prec(
                1,
                choice![
                    seq![":", field("superclass", sym("identifier"))],
                    seq!["(", field("category", sym("identifier")), ")"],
                ],
            ),
        )
        .define(
            "protocol_reference_list",
            seq!["<", comma_sep1(sym("identifier")), ">"],
        )
        .define(
            "protocol_declaration",
            seq![
                repeat(sym("_declaration_modifiers")),
                "@protocol",
                sym("identifier"),
                optional(sym("protocol_reference_list")),
                repeat(sym("interface_declaration")),
                repeat(sym("qualified_protocol_interface_declaration")),
                "@end",
            ],
        )
        .define(
            "qualified_protocol_interface_declaration",
            choice![
                seq!["@optional", repeat(sym("interface_declaration"))],
                seq!["@required", repeat(sym("interface_declaration"))],
            ],
        )
        // Field names follow tree-sitter-objc: in `@compatibility_alias Alias Real`
        // the new name is `class` and the existing class is `alias`.
        .define(
            "compatibility_alias_declaration",
            seq![
                "@compatibility_alias",
                field("class", sym("identifier")),
                field("alias", sym("identifier")),
            ],
        )
}

// ============================================================================
// MEMBERS
// ============================================================================

fn member_rules(extension: Extension) -> Extension {
    extension
        .define(
            "instance_variables",
            seq![
                "{",
                repeat(seq![
                    optional(choice![
                        sym("attribute_specifier"),
                        sym("attribute_declaration")
                    ]),
                    sym("instance_variable"),
                ]),
                "}",
                optional(";"),
            ],
        )
        .define(
            "instance_variable",
            choice![
                sym("visibility_specification"),
                sym("struct_declaration"),
                sym("atomic_declaration"),
                sym("preproc_ifdef"),
                sym("preproc_if"),
            ],
        )
        .define("visibility_specification", literals(VISIBILITY_MARKERS))
        .define(
            "interface_declaration",
            choice![
                sym("declaration"),
                sym("property_declaration"),
                sym("method_declaration"),
                sym("function_definition"),
                sym("type_definition"),
                alias(sym("preproc_if_in_interface_declaration"), "preproc_if"),
                sym("preproc_def"),
                alias(
                    sym("preproc_ifdef_in_interface_declaration"),
                    "preproc_ifdef"
                ),
                sym("preproc_undef"),
                sym("preproc_call"),
                seq![sym("struct_specifier"), ";"],
            ],
        )
        .define(
            "implementation_definition",
            prec(
                1,
                choice![
                    sym("function_definition"),
                    sym("declaration"),
                    sym("property_implementation"),
                    seq![sym("struct_specifier"), ";"],
                    sym("method_definition"),
                    sym("preproc_function_def"),
                    sym("macro_type_specifier"),
                    sym("type_definition"),
                    alias(
                        sym("preproc_if_in_implementation_definition"),
                        "preproc_if"
                    ),
                    alias(
                        sym("preproc_ifdef_in_implementation_definition"),
                        "preproc_ifdef"
                    ),
                    sym("preproc_undef"),
                    sym("preproc_def"),
                    sym("preproc_call"),
                ],
            ),
        )
        .define(
            "property_declaration",
            seq![
                optional(sym("_declaration_modifiers")),
                "@property",
                optional(sym("property_attributes_declaration")),
                optional(choice![
                    sym("attribute_specifier"),
                    sym("attribute_declaration")
                ]),
                choice![sym("struct_declaration"), sym("atomic_declaration")],
            ],
        )
        .define(
            "property_attributes_declaration",
            seq!["(", comma_sep(sym("property_attribute")), ")"],
        )
        .define(
            "property_attribute",
            choice![
                sym("identifier"),
                seq![
                    sym("identifier"),
                    "=",
                    sym("identifier"),
                    optional(":")
                ],
            ],
        )
        .define(
            "property_implementation",
            choice![
                seq![
                    "@synthesize",
                    comma_sep1(seq![
                        sym("identifier"),
                        optional(seq!["=", sym("identifier")])
                    ]),
                    ";",
                ],
                seq![
                    "@dynamic",
                    optional("(class)"),
                    comma_sep1(sym("identifier")),
                    ";"
                ],
            ],
        )
}

// ============================================================================
// METHODS
// ============================================================================

/// `: (type) name`, then `label: (type) name` pieces.
fn parameter_chain() -> Rule {
    seq![
        sym("method_parameter"),
        repeat(seq![optional(sym("method_selector")), sym("method_parameter")]),
    ]
}

/// `, ...` or `, int a, int b` after the last keyword.
fn trailing_c_parameters() -> Rule {
    optional(seq![
        ",",
        choice![
            "...",
            comma_sep1(alias(sym("c_method_parameter"), "method_parameter"))
        ],
    ])
}

fn method_rules(extension: Extension) -> Extension {
    extension
        .define(
            "method_declaration",
            seq![
                choice!["+", "-"],
                optional(sym("method_type")),
                optional(choice![
                    sym("attribute_specifier"),
                    sym("attribute_declaration")
                ]),
                repeat1(choice![
                    seq![
                        sym("method_selector"),
                        optional(sym("attribute_specifier")),
                        optional(sym("method_parameter")),
                    ],
                    sym("method_parameter"),
                ]),
                trailing_c_parameters(),
                repeat(sym("_declaration_modifiers")),
                repeat1(prec_right(0, ";")),
            ],
        )
        .define(
            "method_definition",
            seq![
                choice!["+", "-"],
                optional(sym("method_type")),
                optional(sym("attribute_specifier")),
                choice![
                    seq![
                        sym("method_selector_no_list"),
                        optional(parameter_chain())
                    ],
                    parameter_chain(),
                ],
                trailing_c_parameters(),
                repeat(sym("declaration")),
                repeat(sym("_declaration_modifiers")),
                optional(";"),
                sym("compound_statement"),
                optional(";"),
            ],
        )
        .define(
            "method_type",
            seq![
                "(",
                comma_sep1(seq![
                    optional(sym("attribute_specifier")),
                    choice![sym("type_name"), sym("parameterized_arguments")],
                ]),
                ")",
            ],
        )
        .define(
            "method_selector",
            prec_left(
                0,
                choice![
                    sym("method_selector_no_list"),
                    seq![sym("keyword_selector"), ","]
                ],
            ),
        )
        .define(
            "method_selector_no_list",
            choice![
                sym("identifier"),
                sym("keyword_selector"),
                seq![sym("keyword_selector"), ",", "..."],
            ],
        )
        .define("keyword_selector", repeat1(sym("keyword_declarator")))
        .define(
            "keyword_declarator",
            seq![
                optional(sym("identifier")),
                ";",
                optional(sym("method_type")),
                sym("identifier"),
            ],
        )
        .define(
            "method_parameter",
            prec_right(
                0,
                seq![
                    ":",
                    optional(sym("method_type")),
                    optional(sym("_declaration_modifiers")),
                    choice![sym("identifier"), sym("keyword_identifier")],
                    repeat(sym("_declaration_modifiers")),
                ],
            ),
        )
        .define(
            "c_method_parameter",
            prec_left(
                0,
                seq![
                    sym("_declaration_specifiers"),
                    comma_sep1(prec_right(
                        0,
                        field(
                            "declarator",
                            choice![sym("_declarator"), sym("init_declarator")]
                        ),
                    )),
                ],
            ),
        )
}

// ============================================================================
// ATTRIBUTES
// ============================================================================

fn attribute_rules(extension: Extension) -> Extension {
    extension
        .define(
            "attribute",
            seq![
                optional(seq![field("prefix", sym("identifier")), "::"]),
                field("name", sym("identifier")),
                optional(seq!["(", comma_sep(sym("expression")), ")"]),
            ],
        )
        .define(
            "attribute_declaration",
            seq!["[", "[", comma_sep1(sym("attribute")), "]", "]"],
        )
        .define(
            "attribute_specifier",
            seq![
                choice!["__attribute__", "__attribute"],
                "(",
                choice![
                    sym("argument_list"),
                    seq!["(", comma_sep1(choice!["noreturn", "nothrow"]), ")"],
                ],
                ")",
            ],
        )
        .define(
            "availability_attribute_specifier",
            {
                let mut members: Vec<Rule> = AVAILABILITY_MARKERS
                    .iter()
                    .map(|marker| Rule::from(*marker))
                    .collect();
                members.push(seq![
                    literals(AVAILABILITY_MACROS),
                    "(",
                    comma_sep1(choice![
                        sym("string_literal"),
                        sym("concatenated_string"),
                        sym("version"),
                        sym("method_identifier"),
                        sym("identifier"),
                        seq![
                            sym("identifier"),
                            "(",
                            optional(sym("method_identifier")),
                            ")"
                        ],
                    ]),
                    ")",
                ]);
                Rule::choice(members)
            },
        )
        .define(
            "availability",
            seq![
                "availability",
                "(",
                comma_sep1(seq![
                    sym("identifier"),
                    optional(seq!["=", choice![sym("version"), sym("expression")]]),
                ]),
                ")",
            ],
        )
        .define(
            "version",
            prec_right(
                0,
                choice![
                    sym("platform"),
                    sym("version_number"),
                    seq![
                        sym("platform"),
                        "(",
                        comma_sep1(choice![sym("number_literal"), sym("identifier")]),
                        ")",
                    ],
                ],
            ),
        )
        .define("version_number", pattern("\\d+([\\._]\\d+)*"))
        .define("platform", literals(PLATFORMS))
        .define(
            "objc_bridge",
            seq![
                "objc_bridge_related",
                "(",
                sym("expression"),
                ",",
                optional(seq![sym("expression"), ":"]),
                ",",
                optional(sym("expression")),
                ")",
            ],
        )
}
