//! Shaping raw derivations of Objective-C snippets into the visible tree.
//!
//! Each raw tree below is the derivation the generated parser reports for
//! the snippet, hidden and supertype rules included.

use objc_grammar::cst::{flatten, validate_spans, Node, RawNode};
use objc_grammar::lexical::ExtrasMatcher;
use objc_grammar::{objc, Grammar};
use pretty_assertions::assert_eq;

fn grammar() -> &'static Grammar {
    objc::grammar().unwrap()
}

fn shape(raw: &RawNode, source: &str) -> Node {
    let node = flatten(grammar(), raw).unwrap();
    let extras = ExtrasMatcher::new(grammar()).unwrap();
    validate_spans(&node, source, &extras).unwrap();
    assert!(!node.has_error());
    node
}

fn token(text: &str, start: usize) -> RawNode {
    RawNode::token(text, start..start + text.len())
}

fn ident(start: usize, end: usize) -> RawNode {
    RawNode::leaf("identifier", start..end)
}

fn expression(inner: RawNode) -> RawNode {
    RawNode::rule("expression", vec![inner])
}

fn primitive(start: usize, end: usize) -> RawNode {
    RawNode::rule(
        "specifier_qualifier",
        vec![RawNode::rule(
            "type_specifier",
            vec![RawNode::leaf("primitive_type", start..end)],
        )],
    )
}

fn type_identifier(start: usize, end: usize) -> RawNode {
    RawNode::rule(
        "specifier_qualifier",
        vec![RawNode::rule(
            "type_specifier",
            vec![ident(start, end).aliased("type_identifier")],
        )],
    )
}

fn pointer_to(star: usize, name: RawNode) -> RawNode {
    RawNode::rule(
        "_declarator",
        vec![RawNode::rule(
            "pointer_declarator",
            vec![
                token("*", star),
                RawNode::rule("_declarator", vec![name]).field("declarator"),
            ],
        )],
    )
}

fn compound(open: usize, close: usize) -> RawNode {
    RawNode::rule("compound_statement", vec![token("{", open), token("}", close)])
}

fn method_type(open: usize, start: usize, end: usize) -> RawNode {
    RawNode::rule(
        "method_type",
        vec![
            token("(", open),
            RawNode::rule("type_name", vec![primitive(start, end)]),
            token(")", end),
        ],
    )
}

#[test]
fn message_send_has_receiver_and_method() {
    let source = "[NSObject new]";
    let raw = RawNode::rule(
        "message_expression",
        vec![
            token("[", 0),
            expression(ident(1, 9)).field("receiver"),
            ident(10, 13).field("method"),
            token("]", 13),
        ],
    );
    let node = shape(&raw, source);
    assert_eq!(
        node.to_sexp(),
        "(message_expression receiver: (identifier) method: (identifier))"
    );
    let receiver = node.child_by_field_name("receiver").unwrap();
    assert_eq!(receiver.text(source), "NSObject");
    assert!(receiver.is_a("expression"));
    assert_eq!(node.child_by_field_name("method").unwrap().text(source), "new");
}

#[test]
fn keyword_method_declaration_has_two_parameters() {
    let source = "- (void)setX:(int)x y:(int)y;";
    let selector = |start, end| {
        RawNode::rule(
            "method_selector",
            vec![RawNode::rule("method_selector_no_list", vec![ident(start, end)])],
        )
    };
    let raw = RawNode::rule(
        "method_declaration",
        vec![
            token("-", 0),
            method_type(2, 3, 7),
            selector(8, 12),
            RawNode::rule(
                "method_parameter",
                vec![token(":", 12), method_type(13, 14, 17), ident(18, 19)],
            ),
            selector(20, 21),
            RawNode::rule(
                "method_parameter",
                vec![token(":", 21), method_type(22, 23, 26), ident(27, 28)],
            ),
            token(";", 28),
        ],
    );
    let node = shape(&raw, source);
    assert_eq!(
        node.to_sexp(),
        "(method_declaration (method_type (type_name (primitive_type))) (identifier) \
         (method_parameter (method_type (type_name (primitive_type))) (identifier)) (identifier) \
         (method_parameter (method_type (type_name (primitive_type))) (identifier)))"
    );
    let labels: Vec<_> = node
        .named_children()
        .filter(|child| child.kind == "identifier")
        .map(|child| child.text(source))
        .collect();
    assert_eq!(labels, vec!["setX", "y"]);
    assert_eq!(
        node.named_children()
            .filter(|child| child.kind == "method_parameter")
            .count(),
        2
    );
}

#[test]
fn try_statement_has_catch_and_finally() {
    let source = "@try { } @catch (NSException *e) { } @finally { }";
    let raw = RawNode::rule(
        "try_statement",
        vec![
            token("@try", 0),
            compound(5, 7),
            RawNode::rule(
                "catch_clause",
                vec![
                    token("@catch", 9),
                    token("(", 16),
                    RawNode::rule(
                        "type_name",
                        vec![type_identifier(17, 28), pointer_to(29, ident(30, 31))],
                    ),
                    token(")", 31),
                    compound(33, 35),
                ],
            ),
            RawNode::rule("finally_clause", vec![token("@finally", 37), compound(46, 48)]),
        ],
    );
    let node = shape(&raw, source);
    assert_eq!(
        node.to_sexp(),
        "(try_statement (compound_statement) \
         (catch_clause (type_name (type_identifier) (pointer_declarator declarator: (identifier))) (compound_statement)) \
         (finally_clause (compound_statement)))"
    );
}

#[test]
fn property_declaration_keeps_attributes_and_declarator() {
    let source = "@property (nonatomic, strong) NSString *name;";
    let attribute = |start, end| RawNode::rule("property_attribute", vec![ident(start, end)]);
    let raw = RawNode::rule(
        "property_declaration",
        vec![
            token("@property", 0),
            RawNode::rule(
                "property_attributes_declaration",
                vec![
                    token("(", 10),
                    attribute(11, 20),
                    token(",", 20),
                    attribute(22, 28),
                    token(")", 28),
                ],
            ),
            RawNode::rule(
                "struct_declaration",
                vec![
                    type_identifier(30, 38),
                    RawNode::rule("struct_declarator", vec![pointer_to(39, ident(40, 44))]),
                    token(";", 44),
                ],
            ),
        ],
    );
    let node = shape(&raw, source);
    assert_eq!(
        node.to_sexp(),
        "(property_declaration (property_attributes_declaration (property_attribute (identifier)) \
         (property_attribute (identifier))) (struct_declaration (type_identifier) \
         (struct_declarator (pointer_declarator declarator: (identifier)))))"
    );
}

#[test]
fn ifdef_inside_an_interface_surfaces_as_preproc_ifdef() {
    let source = "@interface Foo\n#ifdef DEBUG\n@property int x;\n#endif\n@end";
    let property = RawNode::rule(
        "property_declaration",
        vec![
            token("@property", 28),
            RawNode::rule(
                "struct_declaration",
                vec![
                    primitive(38, 41),
                    RawNode::rule(
                        "struct_declarator",
                        vec![RawNode::rule("_declarator", vec![ident(42, 43)])],
                    ),
                    token(";", 43),
                ],
            ),
        ],
    );
    let conditional = RawNode::rule(
        "preproc_ifdef_in_interface_declaration",
        vec![
            token("#ifdef", 15),
            ident(22, 27).field("name"),
            RawNode::rule("interface_declaration", vec![property]),
            token("#endif", 45),
        ],
    )
    .aliased("preproc_ifdef");
    let raw = RawNode::rule(
        "class_interface",
        vec![
            RawNode::rule(
                "_class_interface_header",
                vec![token("@interface", 0), ident(11, 14)],
            ),
            RawNode::rule("interface_declaration", vec![conditional]),
            token("@end", 52),
        ],
    );
    let node = shape(&raw, source);
    assert_eq!(
        node.to_sexp(),
        "(class_interface (identifier) (preproc_ifdef name: (identifier) \
         (property_declaration (struct_declaration (primitive_type) (struct_declarator (identifier))))))"
    );
    let ifdef = node.find("preproc_ifdef").unwrap();
    assert_eq!(ifdef.child_by_field_name("name").unwrap().text(source), "DEBUG");
}

#[test]
fn caret_between_operands_is_xor() {
    let source = "int x = a ^ b;";
    let raw = RawNode::rule(
        "declaration",
        vec![
            RawNode::rule(
                "_declaration_specifiers",
                vec![RawNode::rule("type_specifier", vec![RawNode::leaf("primitive_type", 0..3)])
                    .field("type")],
            ),
            RawNode::rule(
                "init_declarator",
                vec![
                    RawNode::rule("_declarator", vec![ident(4, 5)]).field("declarator"),
                    token("=", 6),
                    expression(RawNode::rule(
                        "binary_expression",
                        vec![
                            expression(ident(8, 9)).field("left"),
                            token("^", 10).field("operator"),
                            expression(ident(12, 13)).field("right"),
                        ],
                    ))
                    .field("value"),
                ],
            )
            .field("declarator"),
            token(";", 13),
        ],
    );
    let node = shape(&raw, source);
    assert_eq!(
        node.to_sexp(),
        "(declaration type: (primitive_type) declarator: (init_declarator declarator: (identifier) \
         value: (binary_expression left: (identifier) right: (identifier))))"
    );
}

#[test]
fn caret_before_a_body_is_a_block_literal() {
    let source = "^{ return; }";
    let statement = RawNode::rule(
        "_block_item",
        vec![RawNode::rule(
            "statement",
            vec![RawNode::rule(
                "_non_case_statement",
                vec![RawNode::rule(
                    "return_statement",
                    vec![token("return", 3), token(";", 9)],
                )],
            )],
        )],
    );
    let raw = RawNode::rule(
        "block_literal",
        vec![
            token("^", 0),
            RawNode::rule("compound_statement", vec![token("{", 1), statement, token("}", 11)]),
        ],
    );
    let node = shape(&raw, source);
    assert_eq!(node.to_sexp(), "(block_literal (compound_statement (return_statement)))");
    assert!(node.find("return_statement").unwrap().is_a("statement"));
}

#[test]
fn shaping_is_deterministic() {
    let raw = RawNode::rule(
        "throw_statement",
        vec![token("@throw", 0), expression(ident(7, 10)), token(";", 10)],
    );
    assert_eq!(
        flatten(grammar(), &raw).unwrap(),
        flatten(grammar(), &raw).unwrap()
    );
}

#[test]
fn uncovered_source_text_is_reported() {
    let source = "[NSObject ? new]";
    let raw = RawNode::rule(
        "message_expression",
        vec![
            token("[", 0),
            expression(ident(1, 9)).field("receiver"),
            ident(12, 15).field("method"),
            token("]", 15),
        ],
    );
    let node = flatten(grammar(), &raw).unwrap();
    let extras = ExtrasMatcher::new(grammar()).unwrap();
    assert!(validate_spans(&node, source, &extras).is_err());
}
