//! Conflict Resolution
//!
//! When the table builder finds several actions competing for the same
//! lookahead it asks [`ConflictPolicy::resolve`] for a winner. The ranking
//! is pure data interpreted once: static precedence, then associativity,
//! then (only for declared conflicts) the type-name hint, dynamic
//! precedence, context bias and finally declaration order.
//!
//! ```
//! use objc_grammar::resolve::{Action, ConflictPolicy, Reason, ResolutionContext};
//!
//! let grammar = objc_grammar::objc::grammar()?;
//! let policy = ConflictPolicy::new(grammar);
//! let actions = [
//!     Action::reduce(grammar, "message_expression")?,
//!     Action::reduce(grammar, "range_expression")?,
//! ];
//! let resolution = policy.resolve(&actions, &ResolutionContext::expression())?;
//! assert_eq!(resolution.winner, 0);
//! assert_eq!(resolution.reason, Reason::StaticPrecedence);
//! # Ok::<(), objc_grammar::GrammarError>(())
//! ```

use std::collections::BTreeSet;
use std::fmt;

use crate::cst::Node;
use crate::dsl::{Associativity, Rule};
use crate::errors::{GrammarError, Result};
use crate::grammar::Grammar;

/// Typedef'd pseudo-primitives every translation unit can use.
pub const BUILTIN_TYPE_NAMES: [&str; 5] = ["id", "Class", "SEL", "IMP", "BOOL"];

/// Non-declarator rules that still commit the contested text to a type.
const TYPE_READINGS: &[&str] = &[
    "type_specifier",
    "generic_specifier",
    "typedefed_specifier",
    "sized_type_specifier",
    "macro_type_specifier",
    "type_descriptor",
    "type_name",
    "cast_expression",
    "compound_literal_expression",
    "array_type_specifier",
    "specifier_qualifier",
    "parameterized_arguments",
    "declaration",
    "parameter_declaration",
    "field_declaration",
];

// ============================================================================
// ACTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Shift,
    Reduce,
}

/// Which reading of the contested text an action commits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    Declarator,
    Expression,
    Other,
}

/// Classifies a rule as a declarator/type reading or an expression reading.
pub fn reading_of(rule: &str) -> Reading {
    let name = rule.trim_start_matches('_');
    if name.contains("declarator") || TYPE_READINGS.contains(&name) {
        Reading::Declarator
    } else if name.ends_with("expression") {
        Reading::Expression
    } else {
        Reading::Other
    }
}

/// One candidate parse action with the precedence metadata of its rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    pub rule: String,
    pub precedence: i32,
    pub associativity: Option<Associativity>,
    pub dynamic: i32,
}

impl Action {
    pub fn shift(grammar: &Grammar, rule: &str) -> Result<Self> {
        Ok(Self::from_rule(ActionKind::Shift, rule, grammar.rule(rule)?))
    }

    pub fn reduce(grammar: &Grammar, rule: &str) -> Result<Self> {
        Ok(Self::from_rule(ActionKind::Reduce, rule, grammar.rule(rule)?))
    }

    /// Reduction by one alternative of a choice rule, e.g. a single
    /// operator row of `binary_expression`.
    pub fn reduce_alternative(grammar: &Grammar, rule: &str, index: usize) -> Result<Self> {
        let members = grammar
            .rule(rule)?
            .members()
            .ok_or_else(|| GrammarError::NotAChoice {
                rule: rule.to_string(),
            })?;
        let alternative = members.get(index).ok_or_else(|| GrammarError::MissingMember {
            rule: rule.to_string(),
            member: format!("#{index}"),
        })?;
        Ok(Self::from_rule(ActionKind::Reduce, rule, alternative))
    }

    fn from_rule(kind: ActionKind, name: &str, rule: &Rule) -> Self {
        let info = rule.outer_precedence();
        Self {
            kind,
            rule: name.to_string(),
            precedence: info.level(),
            associativity: info.associativity,
            dynamic: info.dynamic,
        }
    }

    pub fn reading(&self) -> Reading {
        reading_of(&self.rule)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ActionKind::Shift => "shift",
            ActionKind::Reduce => "reduce",
        };
        write!(f, "{kind} {} (prec {}, dynamic {})", self.rule, self.precedence, self.dynamic)
    }
}

// ============================================================================
// TYPE NAMES
// ============================================================================

/// Identifiers known to name types, used to split `(Foo)` casts from
/// parenthesized expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeNameRegistry {
    names: BTreeSet<String>,
}

impl Default for TypeNameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeNameRegistry {
    pub fn new() -> Self {
        Self {
            names: BUILTIN_TYPE_NAMES.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn is_type(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Records every type a parsed translation unit introduces: typedef
    /// names, `@class` forward declarations, interfaces and protocols.
    pub fn collect_from(&mut self, root: &Node, source: &str) {
        let mut pending = vec![root];
        while let Some(node) = pending.pop() {
            match node.kind.as_str() {
                "type_definition" => {
                    for declarator in node.children_by_field_name("declarator") {
                        if let Some(name) = declarator.find("type_identifier") {
                            self.insert(name.text(source));
                        }
                    }
                }
                "class_declaration" => {
                    for name in node.named_children().filter(|child| child.kind == "identifier") {
                        self.insert(name.text(source));
                    }
                }
                "class_interface" | "protocol_declaration" => {
                    if let Some(name) = node.named_children().find(|child| child.kind == "identifier") {
                        self.insert(name.text(source));
                    }
                }
                _ => {}
            }
            pending.extend(node.children.iter().rev());
        }
    }
}

// ============================================================================
// RESOLUTION
// ============================================================================

/// Syntactic position of the contested text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Declaration,
    Statement,
    Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionContext<'a> {
    pub position: Position,
    /// The identifier at the conflict point, when there is one.
    pub identifier: Option<&'a str>,
}

impl<'a> ResolutionContext<'a> {
    pub fn declaration() -> Self {
        Self {
            position: Position::Declaration,
            identifier: None,
        }
    }

    pub fn statement() -> Self {
        Self {
            position: Position::Statement,
            identifier: None,
        }
    }

    pub fn expression() -> Self {
        Self {
            position: Position::Expression,
            identifier: None,
        }
    }

    pub fn with_identifier(mut self, identifier: &'a str) -> Self {
        self.identifier = Some(identifier);
        self
    }
}

/// The ranking step that settled a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    Unique,
    StaticPrecedence,
    Associativity,
    TypeName,
    DynamicPrecedence,
    ContextBias,
    FirstListed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Index into the candidate slice.
    pub winner: usize,
    pub reason: Reason,
}

pub struct ConflictPolicy<'g> {
    grammar: &'g Grammar,
    types: TypeNameRegistry,
}

impl<'g> ConflictPolicy<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self::with_types(grammar, TypeNameRegistry::new())
    }

    pub fn with_types(grammar: &'g Grammar, types: TypeNameRegistry) -> Self {
        Self { grammar, types }
    }

    pub fn types(&self) -> &TypeNameRegistry {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TypeNameRegistry {
        &mut self.types
    }

    /// Picks one action out of `actions`.
    pub fn resolve(&self, actions: &[Action], context: &ResolutionContext) -> Result<Resolution> {
        match actions.len() {
            0 => return Err(GrammarError::NoCandidates),
            1 => return Ok(settled(0, Reason::Unique)),
            _ => {}
        }
        let mut alive: Vec<usize> = (0..actions.len()).collect();

        let top = alive.iter().map(|&i| actions[i].precedence).max().unwrap_or(0);
        alive.retain(|&i| actions[i].precedence == top);
        if let [winner] = alive[..] {
            return Ok(settled(winner, Reason::StaticPrecedence));
        }

        if let Some(preferred) = associativity_preference(actions, &alive) {
            alive.retain(|&i| actions[i].kind == preferred);
            if let [winner] = alive[..] {
                return Ok(settled(winner, Reason::Associativity));
            }
        }

        self.check_declared(actions, &alive)?;

        if let Some(identifier) = context.identifier {
            if self.types.is_type(identifier) {
                narrow(&mut alive, |i| actions[i].reading() == Reading::Declarator);
                if let [winner] = alive[..] {
                    tracing::trace!(identifier, rule = %actions[winner].rule, "type name decided conflict");
                    return Ok(settled(winner, Reason::TypeName));
                }
            }
        }

        let top = alive.iter().map(|&i| actions[i].dynamic).max().unwrap_or(0);
        alive.retain(|&i| actions[i].dynamic == top);
        if let [winner] = alive[..] {
            return Ok(settled(winner, Reason::DynamicPrecedence));
        }

        let biased = match context.position {
            Position::Declaration => Reading::Declarator,
            Position::Statement | Position::Expression => Reading::Expression,
        };
        narrow(&mut alive, |i| actions[i].reading() == biased);
        if let [winner] = alive[..] {
            return Ok(settled(winner, Reason::ContextBias));
        }

        Ok(settled(alive[0], Reason::FirstListed))
    }

    /// Ties past associativity must involve a declared conflict set.
    fn check_declared(&self, actions: &[Action], alive: &[usize]) -> Result<()> {
        let involved: BTreeSet<&str> = alive.iter().map(|&i| actions[i].rule.as_str()).collect();
        let declared = self.grammar.conflicts.iter().any(|conflict| {
            involved
                .iter()
                .all(|rule| conflict.iter().any(|name| name == rule))
        });
        if declared {
            return Ok(());
        }
        Err(GrammarError::UnresolvedConflict {
            rules: involved.into_iter().map(str::to_string).collect(),
        })
    }
}

fn settled(winner: usize, reason: Reason) -> Resolution {
    Resolution { winner, reason }
}

/// Keeps only the candidates matching `keep`, unless none would remain.
fn narrow(alive: &mut Vec<usize>, keep: impl Fn(usize) -> bool) {
    if alive.iter().any(|&i| keep(i)) {
        alive.retain(|&i| keep(i));
    }
}

/// Shift/reduce ties follow the associativity of the competing reductions.
fn associativity_preference(actions: &[Action], alive: &[usize]) -> Option<ActionKind> {
    let has_shift = alive.iter().any(|&i| actions[i].kind == ActionKind::Shift);
    let mut reductions = alive
        .iter()
        .filter(|&&i| actions[i].kind == ActionKind::Reduce)
        .map(|&i| actions[i].associativity);
    let first = reductions.next()?;
    if !has_shift || reductions.any(|other| other != first) {
        return None;
    }
    match first? {
        Associativity::Left => Some(ActionKind::Reduce),
        Associativity::Right => Some(ActionKind::Shift),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::{prec, prec_dynamic, prec_left, prec_right, sym};
    use crate::seq;

    fn action(kind: ActionKind, rule: &str, precedence: i32, dynamic: i32) -> Action {
        Action {
            kind,
            rule: rule.into(),
            precedence,
            associativity: None,
            dynamic,
        }
    }

    fn grammar_with_conflict(names: &[&str]) -> Grammar {
        let mut grammar = Grammar::new("test");
        for name in names {
            grammar.define(name, sym("identifier"));
        }
        grammar.conflicts.push(names.iter().map(|name| name.to_string()).collect());
        grammar
    }

    #[test]
    fn readings_classify_rule_names() {
        assert_eq!(reading_of("pointer_declarator"), Reading::Declarator);
        assert_eq!(reading_of("_abstract_declarator"), Reading::Declarator);
        assert_eq!(reading_of("generic_specifier"), Reading::Declarator);
        assert_eq!(reading_of("binary_expression"), Reading::Expression);
        assert_eq!(reading_of("compound_statement"), Reading::Other);
    }

    #[test]
    fn actions_read_outer_precedence() {
        let mut grammar = Grammar::new("test");
        grammar
            .define("call", prec(15, seq![sym("x"), "("]))
            .define("range", prec_right(-1, seq![sym("x"), "..."]))
            .define("pointer", prec_dynamic(1, prec_left(3, seq!["*", sym("x")])));
        let call = Action::reduce(&grammar, "call").unwrap();
        assert_eq!((call.precedence, call.associativity), (15, None));
        let range = Action::shift(&grammar, "range").unwrap();
        assert_eq!(range.associativity, Some(Associativity::Right));
        let pointer = Action::reduce(&grammar, "pointer").unwrap();
        assert_eq!((pointer.precedence, pointer.dynamic), (3, 1));
        assert!(Action::reduce(&grammar, "missing").is_err());
    }

    #[test]
    fn empty_candidate_list_is_an_error() {
        let grammar = Grammar::new("test");
        let policy = ConflictPolicy::new(&grammar);
        assert!(matches!(
            policy.resolve(&[], &ResolutionContext::statement()),
            Err(GrammarError::NoCandidates)
        ));
    }

    #[test]
    fn left_associativity_reduces() {
        let grammar = Grammar::new("test");
        let policy = ConflictPolicy::new(&grammar);
        let mut reduce = action(ActionKind::Reduce, "binary_expression", 10, 0);
        reduce.associativity = Some(Associativity::Left);
        let shift = action(ActionKind::Shift, "binary_expression", 10, 0);
        let resolution = policy
            .resolve(&[shift, reduce], &ResolutionContext::expression())
            .unwrap();
        assert_eq!(resolution, settled(1, Reason::Associativity));
    }

    #[test]
    fn undeclared_ties_are_grammar_defects() {
        let grammar = grammar_with_conflict(&["a", "b"]);
        let policy = ConflictPolicy::new(&grammar);
        let actions = [
            action(ActionKind::Reduce, "a", 0, 0),
            action(ActionKind::Reduce, "c", 0, 0),
        ];
        let error = policy
            .resolve(&actions, &ResolutionContext::statement())
            .unwrap_err();
        assert!(matches!(
            error,
            GrammarError::UnresolvedConflict { rules } if rules == ["a", "c"]
        ));
    }

    #[test]
    fn known_type_names_prefer_declarators() {
        let grammar = grammar_with_conflict(&["type_descriptor", "parenthesized_expression"]);
        let mut policy = ConflictPolicy::new(&grammar);
        let actions = [
            action(ActionKind::Reduce, "parenthesized_expression", 0, 0),
            action(ActionKind::Reduce, "type_descriptor", 0, 0),
        ];
        let unknown = ResolutionContext::statement().with_identifier("Foo");
        assert_eq!(
            policy.resolve(&actions, &unknown).unwrap(),
            settled(0, Reason::ContextBias)
        );

        policy.types_mut().insert("Foo");
        assert_eq!(
            policy.resolve(&actions, &unknown).unwrap(),
            settled(1, Reason::TypeName)
        );
    }

    #[test]
    fn dynamic_precedence_breaks_declared_ties() {
        let grammar = grammar_with_conflict(&["pointer_declarator", "binary_expression"]);
        let policy = ConflictPolicy::new(&grammar);
        let actions = [
            action(ActionKind::Reduce, "binary_expression", 0, 0),
            action(ActionKind::Reduce, "pointer_declarator", 0, 1),
        ];
        assert_eq!(
            policy.resolve(&actions, &ResolutionContext::statement()).unwrap(),
            settled(1, Reason::DynamicPrecedence)
        );
    }

    #[test]
    fn first_listed_wins_last() {
        let grammar = grammar_with_conflict(&["enum_specifier"]);
        let policy = ConflictPolicy::new(&grammar);
        let actions = [
            action(ActionKind::Reduce, "enum_specifier", 0, 0),
            action(ActionKind::Reduce, "enum_specifier", 0, 0),
        ];
        assert_eq!(
            policy.resolve(&actions, &ResolutionContext::declaration()).unwrap(),
            settled(0, Reason::FirstListed)
        );
    }
}
