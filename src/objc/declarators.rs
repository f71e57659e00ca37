//! Declarators, qualifiers and type specifiers.
//!
//! C has four declarator flavors that share one shape but differ in the
//! symbol they recurse into: plain declarators for values, abstract ones
//! for type-only positions, field declarators for members and type
//! declarators for typedef targets. [`DeclaratorFlavor::build`] produces
//! every form of a flavor from the same template, so a form added here
//! (the block pointer `^`) is available in all four positions at once.

use crate::dsl::{
    alias, comma_sep, comma_sep1, field, optional, optional_comma_sep, prec, prec_dynamic, prec_right,
    repeat, repeat1, sym, Rule,
};
use crate::grammar::c::prec as c_prec;
use crate::merge::Extension;
use crate::{choice, seq};

// ============================================================================
// DECLARATOR FLAVORS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclaratorFlavor {
    Plain,
    Abstract,
    Field,
    Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclaratorForm {
    Pointer,
    Parenthesized,
    Function,
    BlockPointer,
}

impl DeclaratorForm {
    pub const ALL: [DeclaratorForm; 4] = [
        DeclaratorForm::Pointer,
        DeclaratorForm::Parenthesized,
        DeclaratorForm::Function,
        DeclaratorForm::BlockPointer,
    ];

    pub fn stem(self) -> &'static str {
        match self {
            DeclaratorForm::Pointer => "pointer",
            DeclaratorForm::Parenthesized => "parenthesized",
            DeclaratorForm::Function => "function",
            DeclaratorForm::BlockPointer => "block_pointer",
        }
    }
}

impl DeclaratorFlavor {
    pub const ALL: [DeclaratorFlavor; 4] = [
        DeclaratorFlavor::Plain,
        DeclaratorFlavor::Abstract,
        DeclaratorFlavor::Field,
        DeclaratorFlavor::Type,
    ];

    /// The hidden umbrella rule every form of this flavor recurses into.
    pub fn supertype(self) -> &'static str {
        match self {
            DeclaratorFlavor::Plain => "_declarator",
            DeclaratorFlavor::Abstract => "_abstract_declarator",
            DeclaratorFlavor::Field => "_field_declarator",
            DeclaratorFlavor::Type => "_type_declarator",
        }
    }

    pub fn rule_name(self, form: DeclaratorForm) -> String {
        let stem = form.stem();
        match self {
            DeclaratorFlavor::Plain => format!("{stem}_declarator"),
            DeclaratorFlavor::Abstract => format!("abstract_{stem}_declarator"),
            DeclaratorFlavor::Field => format!("{stem}_field_declarator"),
            DeclaratorFlavor::Type => format!("{stem}_type_declarator"),
        }
    }

    /// Node kind a form surfaces as. Field and type flavors are aliased
    /// back to the plain kind wherever the umbrella rule lists them.
    pub fn node_kind(self, form: DeclaratorForm) -> String {
        match self {
            DeclaratorFlavor::Abstract => self.rule_name(form),
            _ => DeclaratorFlavor::Plain.rule_name(form),
        }
    }

    fn inner(self) -> Rule {
        sym(self.supertype())
    }

    fn declarator_field(self) -> Rule {
        match self {
            DeclaratorFlavor::Abstract => field("declarator", optional(self.inner())),
            _ => field("declarator", self.inner()),
        }
    }

    pub fn build(self, form: DeclaratorForm) -> Rule {
        let abstract_ = self == DeclaratorFlavor::Abstract;
        match form {
            DeclaratorForm::Pointer => {
                let mut members = Vec::new();
                if !abstract_ {
                    members.push(optional(sym("ms_based_modifier")));
                }
                members.push("*".into());
                if !abstract_ {
                    members.push(repeat(sym("ms_pointer_modifier")));
                }
                members.push(repeat(sym("_declaration_modifiers")));
                members.push(self.declarator_field());
                prec_dynamic(1, prec_right(0, Rule::seq(members)))
            }
            DeclaratorForm::Parenthesized => {
                let body = seq!["(", repeat(sym("_declaration_modifiers")), self.inner(), ")"];
                if abstract_ {
                    prec(1, body)
                } else {
                    prec_dynamic(c_prec::PAREN_DECLARATOR, body)
                }
            }
            DeclaratorForm::Function => {
                let mut members = vec![
                    self.declarator_field(),
                    field("parameters", sym("parameter_list")),
                ];
                if self == DeclaratorFlavor::Plain {
                    members.push(optional(sym("gnu_asm_expression")));
                    members.push(repeat(sym("attribute_specifier")));
                } else {
                    members.push(repeat(choice![
                        sym("attribute_specifier"),
                        sym("type_qualifier")
                    ]));
                }
                prec_right(1, Rule::seq(members))
            }
            DeclaratorForm::BlockPointer => prec_dynamic(
                1,
                prec_right(
                    0,
                    seq!["^", repeat(sym("type_qualifier")), self.declarator_field()],
                ),
            ),
        }
    }

    /// Every form of this flavor, named.
    pub fn rules(self) -> Vec<(String, Rule)> {
        DeclaratorForm::ALL
            .iter()
            .map(|form| (self.rule_name(*form), self.build(*form)))
            .collect()
    }
}

// ============================================================================
// QUALIFIERS AND SPECIFIERS
// ============================================================================

/// Ownership, nullability and related qualifiers, accepted wherever
/// `const` and `volatile` are.
pub const QUALIFIERS: &[&str] = &[
    "nullable",
    "_Complex",
    "_Nonnull",
    "_Nullable",
    "_Nullable_result",
    "_Null_unspecified",
    "__autoreleasing",
    "__block",
    "__bridge",
    "__bridge_retained",
    "__bridge_transfer",
    "__complex",
    "__const",
    "__imag",
    "__kindof",
    "__nonnull",
    "__nullable",
    "__ptrauth_objc_class_ro",
    "__ptrauth_objc_isa_pointer",
    "__ptrauth_objc_super_pointer",
    "__real",
    "__strong",
    "__unsafe_unretained",
    "__unused",
    "__weak",
];

pub const STORAGE_CLASSES: &[&str] = &[
    "__inline__",
    "CG_EXTERN",
    "CG_INLINE",
    "FOUNDATION_EXPORT",
    "FOUNDATION_EXTERN",
    "FOUNDATION_STATIC_INLINE",
    "IBOutlet",
    "IBInspectable",
    "IB_DESIGNABLE",
    "NS_INLINE",
    "NS_VALID_UNTIL_END_OF_SCOPE",
    "OBJC_EXPORT",
    "OBJC_ROOT_CLASS",
    "UIKIT_EXTERN",
];

/// Typedef'd pseudo-primitives that may carry `<Protocol>`.
pub const TYPEDEFED_IDENTIFIERS: &[&str] = &["BOOL", "IMP", "SEL", "Class", "id"];

pub const PROTOCOL_QUALIFIERS: &[&str] = &["out", "inout", "bycopy", "byref", "oneway", "in"];

fn keywords(words: &[&str]) -> Vec<Rule> {
    words.iter().map(|word| Rule::from(*word)).collect()
}

fn record_specifier(keyword: &str) -> Rule {
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
    )
}

// ============================================================================
// PATCHES
// ============================================================================

pub(crate) fn patch(extension: Extension) -> Extension {
    let extension = declarator_rules(extension);
    let extension = declaration_rules(extension);
    let extension = qualifier_rules(extension);
    let extension = specifier_rules(extension);
    member_rules(extension)
}

fn declarator_rules(extension: Extension) -> Extension {
    let mut extension = extension
        .extend_filtered(
            "_declarator",
            &["attributed_declarator"],
            vec![sym("block_pointer_declarator")],
            Some(|rule| prec_right(0, rule)),
        )
        .extend_choice(
            "_abstract_declarator",
            vec![sym("abstract_block_pointer_declarator")],
        )
        .extend_choice(
            "_field_declarator",
            vec![alias(
                sym("block_pointer_field_declarator"),
                "block_pointer_declarator",
            )],
        );

    let type_form = |form: DeclaratorForm| {
        alias(
            sym(&DeclaratorFlavor::Type.rule_name(form)),
            &DeclaratorFlavor::Type.node_kind(form),
        )
    };
    extension = extension.define(
        "_type_declarator",
        choice![
            type_form(DeclaratorForm::Pointer),
            type_form(DeclaratorForm::Function),
            alias(sym("array_type_declarator"), "array_declarator"),
            type_form(DeclaratorForm::Parenthesized),
            type_form(DeclaratorForm::BlockPointer),
            sym("_type_identifier"),
            alias(
                choice!["signed", "unsigned", "long", "short"],
                "primitive_type"
            ),
            sym("primitive_type"),
        ],
    );

    for flavor in DeclaratorFlavor::ALL {
        extension = extension.define_all(flavor.rules());
    }

    extension.define(
        "init_declarator",
        seq![
            field("declarator", sym("_declarator")),
            optional(sym("attribute_specifier")),
            "=",
            field(
                "value",
                choice![sym("initializer_list"), sym("expression")]
            ),
        ],
    )
}

fn declaration_rules(extension: Extension) -> Extension {
    extension
        .define(
            "function_definition",
            seq![
                optional(sym("ms_call_modifier")),
                sym("_declaration_specifiers"),
                field("declarator", sym("_declarator")),
                field("body", sym("compound_statement")),
            ],
        )
        .define(
            "declaration",
            seq![
                sym("_declaration_specifiers"),
                comma_sep1(prec_right(
                    0,
                    field(
                        "declarator",
                        choice![
                            seq![
                                sym("_declarator"),
                                optional(sym("gnu_asm_expression"))
                            ],
                            sym("init_declarator"),
                            seq![sym("type_qualifier"), sym("identifier")],
                        ],
                    ),
                )),
                optional(sym("_declaration_modifiers")),
                ";",
            ],
        )
        .define(
            "type_definition",
            seq![
                optional("__extension__"),
                optional(sym("ms_declspec_modifier")),
                "typedef",
                optional(sym("attribute_specifier")),
                optional(sym("ms_declspec_modifier")),
                sym("_type_definition_type"),
                sym("_type_definition_declarators"),
                ";",
            ],
        )
        .define(
            "_type_definition_type",
            seq![
                repeat(sym("type_qualifier")),
                optional(sym("attribute_specifier")),
                field("type", sym("type_specifier")),
                optional(sym("ms_declspec_modifier")),
                repeat(sym("type_qualifier")),
            ],
        )
        .define(
            "_type_definition_declarators",
            seq![
                comma_sep1(field("declarator", sym("_type_declarator"))),
                optional(sym("_declaration_modifiers")),
            ],
        )
        .extend_choice(
            "_declaration_modifiers",
            vec![
                sym("availability_attribute_specifier"),
                sym("attribute_declaration"),
            ],
        )
        .define(
            "_declaration_specifiers",
            prec_right(
                0,
                seq![
                    repeat(sym("_declaration_modifiers")),
                    field("type", sym("type_specifier")),
                    repeat(sym("_declaration_modifiers")),
                ],
            ),
        )
        .define(
            "parameter_declaration",
            seq![
                sym("_declaration_specifiers"),
                optional(field(
                    "declarator",
                    choice![
                        seq![sym("_declarator"), optional(sym("_declaration_modifiers"))],
                        sym("_abstract_declarator"),
                    ],
                )),
            ],
        )
}

fn qualifier_rules(extension: Extension) -> Extension {
    extension
        .extend("type_qualifier", |original| {
            let mut members = vec![original.clone()];
            members.extend(keywords(QUALIFIERS));
            Ok(prec_right(0, Rule::choice(members)))
        })
        .extend("storage_class_specifier", |original| {
            let mut members = vec![original.clone()];
            members.extend(keywords(STORAGE_CLASSES));
            Ok(Rule::choice(members))
        })
        .define(
            "protocol_qualifier",
            Rule::choice(keywords(PROTOCOL_QUALIFIERS)),
        )
        .define(
            "specifier_qualifier",
            prec_right(
                0,
                choice![
                    sym("type_specifier"),
                    sym("type_qualifier"),
                    sym("protocol_qualifier"),
                ],
            ),
        )
}

fn specifier_rules(extension: Extension) -> Extension {
    extension
        .extend_choice(
            "type_specifier",
            vec![
                sym("typedefed_specifier"),
                sym("generic_specifier"),
                sym("typeof_specifier"),
                sym("array_type_specifier"),
            ],
        )
        .define(
            "typedefed_identifier",
            Rule::choice(keywords(TYPEDEFED_IDENTIFIERS)),
        )
        .define(
            "typedefed_specifier",
            prec_right(
                0,
                seq![
                    sym("typedefed_identifier"),
                    optional(sym("protocol_reference_list"))
                ],
            ),
        )
        .define(
            "generic_specifier",
            prec_right(
                0,
                seq![
                    sym("_type_identifier"),
                    repeat1(seq!["<", comma_sep1(sym("type_name")), ">"]),
                ],
            ),
        )
        .define(
            "typeof_specifier",
            seq![
                choice!["__typeof__", "__typeof", "typeof"],
                "(",
                choice![sym("expression"), sym("type_descriptor")],
                ")",
            ],
        )
        .define(
            "array_type_specifier",
            seq![
                sym("type_specifier"),
                "[",
                optional(seq![repeat(sym("type_qualifier")), sym("expression")]),
                "]",
            ],
        )
        .define(
            "type_name",
            prec_right(
                0,
                seq![
                    repeat1(prec_right(
                        0,
                        choice![
                            sym("specifier_qualifier"),
                            sym("attribute_specifier"),
                            sym("_declarator"),
                        ],
                    )),
                    optional(sym("protocol_reference_list")),
                    optional(sym("_abstract_declarator")),
                ],
            ),
        )
        .define(
            "parameterized_arguments",
            prec(
                -1,
                seq![
                    "<",
                    choice![
                        comma_sep1(seq![
                            comma_sep1(seq![
                                optional(choice!["__covariant", "__contravariant"]),
                                sym("_type_identifier"),
                            ]),
                            optional(seq![":", sym("type_name")]),
                        ]),
                        comma_sep1(sym("type_name")),
                    ],
                    ">",
                ],
            ),
        )
        .define(
            "generic_arguments",
            prec_right(
                0,
                seq!["(", comma_sep1(sym("_type_identifier")), ")"]
            ),
        )
        .define("struct_specifier", record_specifier("struct"))
        .define("union_specifier", record_specifier("union"))
        .define(
            "enum_specifier",
            seq![
                "enum",
                optional(sym("attribute_specifier")),
                optional(sym("ms_declspec_modifier")),
                choice![
                    seq![
                        field("name", sym("_type_identifier")),
                        optional(seq![
                            ":",
                            field(
                                "underlying_type",
                                choice![sym("_type_identifier"), sym("primitive_type")],
                            ),
                        ]),
                        field("body", optional(sym("enumerator_list"))),
                    ],
                    seq![
                        optional(seq![":", field("base", sym("_type_identifier"))]),
                        field("body", sym("enumerator_list")),
                    ],
                ],
                optional(sym("attribute_specifier")),
            ],
        )
        .define(
            "enumerator_list",
            seq![
                "{",
                optional_comma_sep(choice![
                    seq![sym("enumerator"), optional(sym("_declaration_modifiers"))],
                    alias(sym("preproc_ifdef_in_enumerator"), "preproc_ifdef"),
                ]),
                optional(","),
                "}",
            ],
        )
        .define(
            "enumerator",
            seq![
                field("name", sym("identifier")),
                optional(seq!["=", field("value", sym("expression"))]),
            ],
        )
}

fn member_rules(extension: Extension) -> Extension {
    extension
        .define(
            "field_declaration",
            seq![
                sym("_declaration_specifiers"),
                comma_sep(seq![
                    field(
                        "declarator",
                        choice![sym("_field_declarator"), sym("enum_specifier")]
                    ),
                    optional(sym("bitfield_clause")),
                ]),
                optional(sym("bitfield_clause")),
                optional(sym("attribute_specifier")),
                ";",
            ],
        )
        .extend_choice("_field_declaration_list_item", vec![sym("atdef_field")])
        .define(
            "atdef_field",
            seq!["@defs", "(", sym("identifier"), ")"],
        )
        .define(
            "struct_declaration",
            seq![
                repeat1(sym("specifier_qualifier")),
                comma_sep1(sym("struct_declarator")),
                optional(sym("_declaration_modifiers")),
                ";",
            ],
        )
        .define(
            "struct_declarator",
            choice![
                sym("_declarator"),
                seq![optional(sym("_declarator")), ":", sym("expression")],
            ],
        )
        .define(
            "atomic_declaration",
            seq![
                "_Atomic",
                "(",
                sym("type_specifier"),
                ")",
                sym("_field_identifier"),
                ";",
            ],
        )
}
