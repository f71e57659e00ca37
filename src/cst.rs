//! Concrete syntax trees
//!
//! A parsing engine reports a raw derivation: one [`RawNode`] per rule it
//! reduced, hidden helpers and supertypes included. [`flatten`] shapes that
//! derivation into the tree consumers see, the way the generated parser
//! does: hidden, inlined and supertype rules are spliced into their parent,
//! fields on spliced rules carry over to the children they produce, and
//! aliases rename nodes.
//!
//! ```
//! use objc_grammar::cst::{flatten, RawNode};
//!
//! let grammar = objc_grammar::objc::grammar()?;
//! let raw = RawNode::rule("throw_statement", vec![
//!     RawNode::token("@throw", 0..6),
//!     RawNode::rule("expression", vec![RawNode::leaf("identifier", 7..10)]),
//!     RawNode::token(";", 10..11),
//! ]);
//! let node = flatten(grammar, &raw)?;
//! assert_eq!(node.to_sexp(), "(throw_statement (identifier))");
//! # Ok::<(), objc_grammar::GrammarError>(())
//! ```

use std::fmt;
use std::ops::Range;

use crate::errors::{GrammarError, Result};
use crate::grammar::Grammar;
use crate::lexical::ExtrasMatcher;

/// Kind given to nodes the engine could not fit into the grammar.
pub const ERROR_KIND: &str = "ERROR";

/// Byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

// ============================================================================
// RAW DERIVATIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNode {
    /// Rule name, or the token text for anonymous tokens.
    pub symbol: String,
    pub named: bool,
    pub alias: Option<String>,
    pub field: Option<String>,
    pub span: Span,
    pub children: Vec<RawNode>,
    pub error: bool,
}

impl RawNode {
    /// A reduced rule; its span covers its children.
    pub fn rule(symbol: &str, children: Vec<RawNode>) -> Self {
        let span = match (children.first(), children.last()) {
            (Some(first), Some(last)) => Span::new(first.span.start, last.span.end),
            _ => Span::default(),
        };
        Self {
            symbol: symbol.to_string(),
            named: true,
            alias: None,
            field: None,
            span,
            children,
            error: false,
        }
    }

    /// A named terminal such as `identifier` or `number_literal`.
    pub fn leaf(symbol: &str, span: impl Into<Span>) -> Self {
        Self {
            span: span.into(),
            ..Self::rule(symbol, Vec::new())
        }
    }

    /// An anonymous token such as `[` or `@end`.
    pub fn token(text: &str, span: impl Into<Span>) -> Self {
        Self {
            named: false,
            ..Self::leaf(text, span)
        }
    }

    /// A region the engine skipped during error recovery.
    pub fn error(children: Vec<RawNode>) -> Self {
        Self {
            error: true,
            ..Self::rule(ERROR_KIND, children)
        }
    }

    pub fn aliased(mut self, name: &str) -> Self {
        self.alias = Some(name.to_string());
        self
    }

    pub fn field(mut self, name: &str) -> Self {
        self.field = Some(name.to_string());
        self
    }

    pub fn spanning(mut self, span: impl Into<Span>) -> Self {
        self.span = span.into();
        self
    }
}

// ============================================================================
// SHAPED TREES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: String,
    pub named: bool,
    pub field: Option<String>,
    pub span: Span,
    pub children: Vec<Node>,
    /// Supertypes this node was reached through, outermost first.
    pub supertypes: Vec<String>,
    pub error: bool,
}

impl Node {
    pub fn child_by_field_name(&self, name: &str) -> Option<&Node> {
        self.children
            .iter()
            .find(|child| child.field.as_deref() == Some(name))
    }

    pub fn children_by_field_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> {
        self.children
            .iter()
            .filter(move |child| child.field.as_deref() == Some(name))
    }

    pub fn named_children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(|child| child.named)
    }

    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.span.start..self.span.end).unwrap_or("")
    }

    /// First node of `kind` in pre-order, this node included.
    pub fn find(&self, kind: &str) -> Option<&Node> {
        if self.kind == kind {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(kind))
    }

    pub fn has_error(&self) -> bool {
        self.error || self.children.iter().any(Node::has_error)
    }

    pub fn is_a(&self, kind: &str) -> bool {
        self.kind == kind || self.supertypes.iter().any(|supertype| supertype == kind)
    }

    /// S-expression of the named nodes, as printed by `tree-sitter parse`.
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        self.write_sexp(&mut out);
        out
    }

    fn write_sexp(&self, out: &mut String) {
        out.push('(');
        out.push_str(&self.kind);
        for child in self.named_children() {
            out.push(' ');
            if let Some(field) = &child.field {
                out.push_str(field);
                out.push_str(": ");
            }
            child.write_sexp(out);
        }
        out.push(')');
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sexp())
    }
}

// ============================================================================
// FLATTENING
// ============================================================================

/// Shapes a raw derivation into the visible tree.
pub fn flatten(grammar: &Grammar, raw: &RawNode) -> Result<Node> {
    let mut nodes = shape(grammar, raw, None, &[])?;
    match (nodes.pop(), nodes.is_empty()) {
        (Some(root), true) => Ok(root),
        _ => Err(GrammarError::MalformedTree {
            reason: format!("root '{}' does not produce exactly one node", raw.symbol),
        }),
    }
}

fn shape(
    grammar: &Grammar,
    raw: &RawNode,
    inherited_field: Option<&str>,
    supertypes: &[String],
) -> Result<Vec<Node>> {
    let field = raw.field.as_deref().or(inherited_field);

    if raw.error {
        return Ok(vec![Node {
            kind: ERROR_KIND.to_string(),
            named: true,
            field: field.map(str::to_string),
            span: raw.span,
            children: shape_children(grammar, raw)?,
            supertypes: Vec::new(),
            error: true,
        }]);
    }

    let kind = match &raw.alias {
        Some(alias) => alias.clone(),
        None if !raw.named => raw.symbol.clone(),
        None => {
            let symbol = raw.symbol.as_str();
            let external = grammar.external_names().any(|name| name == symbol);
            if !grammar.contains(symbol) && !external {
                return Err(GrammarError::UnknownRule {
                    rule: symbol.to_string(),
                });
            }
            if !grammar.is_materialized(symbol) {
                return splice(grammar, raw, field, supertypes);
            }
            symbol.to_string()
        }
    };

    Ok(vec![Node {
        kind,
        named: raw.named,
        field: field.map(str::to_string),
        span: raw.span,
        children: shape_children(grammar, raw)?,
        supertypes: supertypes.to_vec(),
        error: false,
    }])
}

fn splice(
    grammar: &Grammar,
    raw: &RawNode,
    field: Option<&str>,
    supertypes: &[String],
) -> Result<Vec<Node>> {
    let mut tags = supertypes.to_vec();
    if grammar.is_supertype(&raw.symbol) {
        tags.push(raw.symbol.clone());
    }
    let mut nodes = Vec::new();
    for child in &raw.children {
        nodes.extend(shape(grammar, child, field, &tags)?);
    }
    tracing::trace!(rule = %raw.symbol, produced = nodes.len(), "spliced hidden rule");
    Ok(nodes)
}

fn shape_children(grammar: &Grammar, raw: &RawNode) -> Result<Vec<Node>> {
    let mut children = Vec::new();
    for child in &raw.children {
        children.extend(shape(grammar, child, None, &[])?);
    }
    Ok(children)
}

// ============================================================================
// SPAN CHECKS
// ============================================================================

/// Checks that children lie inside their parent in source order and that
/// every byte between siblings is trivia. Regions under error nodes may
/// hold anything.
pub fn validate_spans(root: &Node, source: &str, extras: &ExtrasMatcher) -> Result<()> {
    if root.span.start > root.span.end || root.span.end > source.len() {
        return Err(malformed(format!(
            "'{}' spans {} outside a source of {} bytes",
            root.kind,
            root.span,
            source.len()
        )));
    }
    check_node(root, source, extras)
}

fn check_node(node: &Node, source: &str, extras: &ExtrasMatcher) -> Result<()> {
    let mut cursor = node.span.start;
    for child in &node.children {
        if !node.span.contains(&child.span) {
            return Err(malformed(format!(
                "'{}' at {} escapes its parent '{}' at {}",
                child.kind, child.span, node.kind, node.span
            )));
        }
        if child.span.start < cursor {
            return Err(malformed(format!(
                "'{}' at {} overlaps the previous sibling in '{}'",
                child.kind, child.span, node.kind
            )));
        }
        check_gap(node, source, extras, cursor, child.span.start)?;
        check_node(child, source, extras)?;
        cursor = child.span.end;
    }
    check_gap(node, source, extras, cursor, node.span.end)
}

fn check_gap(
    node: &Node,
    source: &str,
    extras: &ExtrasMatcher,
    start: usize,
    end: usize,
) -> Result<()> {
    if node.error || start == end {
        return Ok(());
    }
    let gap = source.get(start..end).unwrap_or_default();
    if extras.is_trivia(gap) {
        return Ok(());
    }
    Err(malformed(format!(
        "uncovered text {gap:?} at {start}..{end} inside '{}'",
        node.kind
    )))
}

fn malformed(reason: String) -> GrammarError {
    GrammarError::MalformedTree { reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::{alias, field, pattern, sym};
    use crate::{choice, seq};

    fn grammar() -> Grammar {
        let mut grammar = Grammar::new("test");
        grammar
            .define("program", sym("_item"))
            .define("_item", seq![field("value", sym("expression")), ";"])
            .define(
                "expression",
                choice![sym("identifier"), alias(sym("_word"), "keyword")],
            )
            .define("_word", pattern("@[a-z]+"))
            .define("identifier", pattern("[a-z]+"));
        grammar.supertypes.push("expression".into());
        grammar.extras.push(pattern("\\s"));
        grammar
    }

    fn raw() -> RawNode {
        RawNode::rule(
            "program",
            vec![RawNode::rule(
                "_item",
                vec![
                    RawNode::rule("expression", vec![RawNode::leaf("identifier", 0..3)])
                        .field("value"),
                    RawNode::token(";", 4..5),
                ],
            )],
        )
    }

    #[test]
    fn hidden_rules_and_supertypes_are_spliced() {
        let node = flatten(&grammar(), &raw()).unwrap();
        assert_eq!(node.to_sexp(), "(program value: (identifier))");
        assert_eq!(node.children.len(), 2);
        let value = node.child_by_field_name("value").unwrap();
        assert!(value.is_a("expression"));
        assert_eq!(value.text("abc ;"), "abc");
    }

    #[test]
    fn aliases_rename_hidden_rules() {
        let raw = RawNode::rule(
            "expression",
            vec![RawNode::rule("_word", vec![]).spanning(0..4).aliased("keyword")],
        );
        let nodes = shape(&grammar(), &raw, None, &[]).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind, "keyword");
        assert_eq!(nodes[0].supertypes, vec!["expression"]);
    }

    #[test]
    fn hidden_root_is_malformed() {
        let raw = RawNode::rule("_item", vec![RawNode::token(";", 0..1)]);
        assert!(matches!(
            flatten(&grammar(), &raw),
            Err(GrammarError::MalformedTree { .. })
        ));
    }

    #[test]
    fn unknown_symbols_are_rejected() {
        let raw = RawNode::leaf("mystery", 0..1);
        assert!(matches!(
            flatten(&grammar(), &raw),
            Err(GrammarError::UnknownRule { .. })
        ));
    }

    #[test]
    fn error_nodes_are_kept_and_reported() {
        let raw = RawNode::rule(
            "program",
            vec![RawNode::error(vec![RawNode::token("?", 0..1)])],
        );
        let node = flatten(&grammar(), &raw).unwrap();
        assert!(node.has_error());
        assert_eq!(node.to_sexp(), "(program (ERROR))");
    }

    #[test]
    fn spans_must_nest_and_gaps_must_be_trivia() {
        let grammar = grammar();
        let extras = ExtrasMatcher::new(&grammar).unwrap();
        let node = flatten(&grammar, &raw()).unwrap();
        assert!(validate_spans(&node, "abc ;", &extras).is_ok());
        assert!(validate_spans(&node, "abc+;", &extras).is_err());
        assert!(validate_spans(&node, "abc", &extras).is_err());
    }
}
