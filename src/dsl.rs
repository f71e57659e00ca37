//! Rule DSL
//!
//! Grammar rules are plain data: a tree of [`Rule`] values built with the
//! combinators in this module. The tree serializes one-to-one to the rule
//! objects of tree-sitter's `grammar.json`, so the composed grammar can be
//! handed to the parser generator without any JavaScript in the loop.
//!
//! ```
//! use objc_grammar::dsl::{field, optional, sym};
//! use objc_grammar::seq;
//!
//! let rule = seq!["@throw", optional(sym("expression")), ";"];
//! assert_eq!(rule.to_string(), "seq('@throw', optional($.expression), ';')");
//! let _ = field("body", sym("compound_statement"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Static precedence value: a number or a named level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrecValue {
    Integer(i32),
    Name(String),
}

impl PrecValue {
    /// Numeric level, if this is not a named precedence.
    pub fn as_integer(&self) -> Option<i32> {
        match self {
            PrecValue::Integer(value) => Some(*value),
            PrecValue::Name(_) => None,
        }
    }
}

impl fmt::Display for PrecValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrecValue::Integer(value) => write!(f, "{value}"),
            PrecValue::Name(name) => write!(f, "'{name}'"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

/// Precedence metadata carried by the outermost wrappers of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrecedenceInfo {
    pub value: Option<PrecValue>,
    pub associativity: Option<Associativity>,
    pub dynamic: i32,
}

impl PrecedenceInfo {
    /// Static level as an integer; named and absent levels rank as 0.
    pub fn level(&self) -> i32 {
        self.value.as_ref().and_then(PrecValue::as_integer).unwrap_or(0)
    }
}

/// A production tree, shaped exactly like a `grammar.json` rule object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rule {
    Blank,
    String {
        value: String,
    },
    Pattern {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        flags: Option<String>,
    },
    Symbol {
        name: String,
    },
    Seq {
        members: Vec<Rule>,
    },
    Choice {
        members: Vec<Rule>,
    },
    Repeat {
        content: Box<Rule>,
    },
    Repeat1 {
        content: Box<Rule>,
    },
    Field {
        name: String,
        content: Box<Rule>,
    },
    Alias {
        content: Box<Rule>,
        named: bool,
        value: String,
    },
    Token {
        content: Box<Rule>,
    },
    ImmediateToken {
        content: Box<Rule>,
    },
    Prec {
        value: PrecValue,
        content: Box<Rule>,
    },
    PrecLeft {
        value: PrecValue,
        content: Box<Rule>,
    },
    PrecRight {
        value: PrecValue,
        content: Box<Rule>,
    },
    PrecDynamic {
        value: i32,
        content: Box<Rule>,
    },
}

impl From<&str> for Rule {
    fn from(value: &str) -> Self {
        string(value)
    }
}

impl From<String> for Rule {
    fn from(value: String) -> Self {
        Rule::String { value }
    }
}

/// Builds a `SEQ` rule. Bare string literals become literal tokens.
#[macro_export]
macro_rules! seq {
    ($($member:expr),+ $(,)?) => {
        $crate::dsl::Rule::Seq {
            members: vec![$($crate::dsl::Rule::from($member)),+],
        }
    };
}

/// Builds a `CHOICE` rule. Bare string literals become literal tokens.
#[macro_export]
macro_rules! choice {
    ($($member:expr),+ $(,)?) => {
        $crate::dsl::Rule::Choice {
            members: vec![$($crate::dsl::Rule::from($member)),+],
        }
    };
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

pub fn blank() -> Rule {
    Rule::Blank
}

/// Reference to another rule by name.
pub fn sym(name: &str) -> Rule {
    Rule::Symbol { name: name.into() }
}

pub fn string(value: &str) -> Rule {
    Rule::String {
        value: value.into(),
    }
}

pub fn pattern(value: &str) -> Rule {
    Rule::Pattern {
        value: value.into(),
        flags: None,
    }
}

pub fn pattern_with_flags(value: &str, flags: &str) -> Rule {
    Rule::Pattern {
        value: value.into(),
        flags: Some(flags.into()),
    }
}

pub fn field(name: &str, content: impl Into<Rule>) -> Rule {
    Rule::Field {
        name: name.into(),
        content: Box::new(content.into()),
    }
}

/// Presents `content` as a named node of kind `value`.
pub fn alias(content: impl Into<Rule>, value: &str) -> Rule {
    Rule::Alias {
        content: Box::new(content.into()),
        named: true,
        value: value.into(),
    }
}

/// Presents `content` as the anonymous token `value`.
pub fn alias_anonymous(content: impl Into<Rule>, value: &str) -> Rule {
    Rule::Alias {
        content: Box::new(content.into()),
        named: false,
        value: value.into(),
    }
}

pub fn token(content: impl Into<Rule>) -> Rule {
    Rule::Token {
        content: Box::new(content.into()),
    }
}

pub fn token_immediate(content: impl Into<Rule>) -> Rule {
    Rule::ImmediateToken {
        content: Box::new(content.into()),
    }
}

pub fn optional(content: impl Into<Rule>) -> Rule {
    Rule::Choice {
        members: vec![content.into(), Rule::Blank],
    }
}

pub fn repeat(content: impl Into<Rule>) -> Rule {
    Rule::Repeat {
        content: Box::new(content.into()),
    }
}

pub fn repeat1(content: impl Into<Rule>) -> Rule {
    Rule::Repeat1 {
        content: Box::new(content.into()),
    }
}

pub fn prec(value: i32, content: impl Into<Rule>) -> Rule {
    Rule::Prec {
        value: PrecValue::Integer(value),
        content: Box::new(content.into()),
    }
}

pub fn prec_named(name: &str, content: impl Into<Rule>) -> Rule {
    Rule::Prec {
        value: PrecValue::Name(name.into()),
        content: Box::new(content.into()),
    }
}

pub fn prec_left(value: i32, content: impl Into<Rule>) -> Rule {
    Rule::PrecLeft {
        value: PrecValue::Integer(value),
        content: Box::new(content.into()),
    }
}

pub fn prec_right(value: i32, content: impl Into<Rule>) -> Rule {
    Rule::PrecRight {
        value: PrecValue::Integer(value),
        content: Box::new(content.into()),
    }
}

pub fn prec_dynamic(value: i32, content: impl Into<Rule>) -> Rule {
    Rule::PrecDynamic {
        value,
        content: Box::new(content.into()),
    }
}

// ============================================================================
// SHARED HELPERS
// ============================================================================

/// One or more `rule`s separated by commas.
pub fn comma_sep1(rule: impl Into<Rule>) -> Rule {
    let rule = rule.into();
    seq![rule.clone(), repeat(seq![",", rule])]
}

/// Zero or more `rule`s separated by commas.
pub fn comma_sep(rule: impl Into<Rule>) -> Rule {
    optional(comma_sep1(rule))
}

/// One or more `rule`s where the separating commas may be omitted.
pub fn optional_comma_sep1(rule: impl Into<Rule>) -> Rule {
    let rule = rule.into();
    seq![rule.clone(), repeat(seq![optional(","), rule])]
}

pub fn optional_comma_sep(rule: impl Into<Rule>) -> Rule {
    optional(optional_comma_sep1(rule))
}

/// A `#directive` token tolerant of blanks after the hash.
pub fn preprocessor(directive: &str) -> Rule {
    alias_anonymous(
        pattern(&format!("#[ \\t]*{directive}")),
        &format!("#{directive}"),
    )
}

/// Hidden rules never produce a node of their own.
pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('_')
}

// ============================================================================
// QUERIES
// ============================================================================

impl Rule {
    pub fn seq(members: Vec<Rule>) -> Rule {
        Rule::Seq { members }
    }

    pub fn choice(members: Vec<Rule>) -> Rule {
        Rule::Choice { members }
    }

    /// Direct sub-rules, in order.
    pub fn children(&self) -> Vec<&Rule> {
        match self {
            Rule::Blank | Rule::String { .. } | Rule::Pattern { .. } | Rule::Symbol { .. } => {
                Vec::new()
            }
            Rule::Seq { members } | Rule::Choice { members } => members.iter().collect(),
            Rule::Repeat { content }
            | Rule::Repeat1 { content }
            | Rule::Field { content, .. }
            | Rule::Alias { content, .. }
            | Rule::Token { content }
            | Rule::ImmediateToken { content }
            | Rule::Prec { content, .. }
            | Rule::PrecLeft { content, .. }
            | Rule::PrecRight { content, .. }
            | Rule::PrecDynamic { content, .. } => vec![content.as_ref()],
        }
    }

    /// Pre-order traversal.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Rule)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Every rule name referenced by a symbol, in order of appearance.
    pub fn symbols(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.walk(&mut |rule| {
            if let Rule::Symbol { name } = rule {
                names.push(name.as_str());
            }
        });
        names
    }

    pub fn field_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.walk(&mut |rule| {
            if let Rule::Field { name, .. } = rule {
                if !names.contains(&name.as_str()) {
                    names.push(name.as_str());
                }
            }
        });
        names
    }

    /// The rule underneath any precedence wrappers.
    pub fn strip_prec(&self) -> &Rule {
        match self {
            Rule::Prec { content, .. }
            | Rule::PrecLeft { content, .. }
            | Rule::PrecRight { content, .. }
            | Rule::PrecDynamic { content, .. } => content.strip_prec(),
            other => other,
        }
    }

    /// Alternatives of a choice, looking through precedence wrappers.
    pub fn members(&self) -> Option<&[Rule]> {
        match self.strip_prec() {
            Rule::Choice { members } => Some(members),
            _ => None,
        }
    }

    /// Collects static level, associativity and dynamic level from the
    /// outermost chain of precedence wrappers. The outermost static wrapper
    /// wins when several are nested.
    pub fn outer_precedence(&self) -> PrecedenceInfo {
        let mut info = PrecedenceInfo::default();
        let mut current = self;
        loop {
            match current {
                Rule::Prec { value, content } => {
                    info.value.get_or_insert_with(|| value.clone());
                    current = content;
                }
                Rule::PrecLeft { value, content } => {
                    if info.value.is_none() {
                        info.value = Some(value.clone());
                        info.associativity = Some(Associativity::Left);
                    }
                    current = content;
                }
                Rule::PrecRight { value, content } => {
                    if info.value.is_none() {
                        info.value = Some(value.clone());
                        info.associativity = Some(Associativity::Right);
                    }
                    current = content;
                }
                Rule::PrecDynamic { value, content } => {
                    info.dynamic += value;
                    current = content;
                }
                _ => return info,
            }
        }
    }

    /// True for `choice(x, blank())` as built by [`optional`].
    pub fn is_optional(&self) -> bool {
        matches!(self, Rule::Choice { members } if members.last() == Some(&Rule::Blank))
    }

    /// Multi-line rendering that wraps wide constructs.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, 0);
        out
    }

    fn write_pretty(&self, out: &mut String, indent: usize) {
        let flat = self.to_string();
        let (head, args) = self.display_parts();
        if flat.len() + indent <= PRETTY_WIDTH || args.is_empty() {
            out.push_str(&flat);
            return;
        }
        out.push_str(&head);
        out.push_str("(\n");
        for arg in args {
            out.push_str(&" ".repeat(indent + PRETTY_INDENT));
            match arg {
                DisplayArg::Text(text) => out.push_str(&text),
                DisplayArg::Rule(rule) => rule.write_pretty(out, indent + PRETTY_INDENT),
            }
            out.push_str(",\n");
        }
        out.push_str(&" ".repeat(indent));
        out.push(')');
    }

    /// Function-call shape of this rule in the JavaScript DSL notation.
    fn display_parts(&self) -> (String, Vec<DisplayArg<'_>>) {
        match self {
            Rule::Blank => ("blank".into(), Vec::new()),
            Rule::String { .. } | Rule::Pattern { .. } | Rule::Symbol { .. } => {
                (String::new(), Vec::new())
            }
            Rule::Seq { members } => ("seq".into(), rule_args(members)),
            Rule::Choice { members } if self.is_optional() && members.len() == 2 => {
                ("optional".into(), vec![DisplayArg::Rule(&members[0])])
            }
            Rule::Choice { members } => ("choice".into(), rule_args(members)),
            Rule::Repeat { content } => ("repeat".into(), vec![DisplayArg::Rule(content)]),
            Rule::Repeat1 { content } => ("repeat1".into(), vec![DisplayArg::Rule(content)]),
            Rule::Field { name, content } => (
                "field".into(),
                vec![
                    DisplayArg::Text(format!("'{name}'")),
                    DisplayArg::Rule(content),
                ],
            ),
            Rule::Alias {
                content,
                named,
                value,
            } => {
                let target = if *named {
                    format!("$.{value}")
                } else {
                    format!("'{value}'")
                };
                (
                    "alias".into(),
                    vec![DisplayArg::Rule(content), DisplayArg::Text(target)],
                )
            }
            Rule::Token { content } => ("token".into(), vec![DisplayArg::Rule(content)]),
            Rule::ImmediateToken { content } => {
                ("token.immediate".into(), vec![DisplayArg::Rule(content)])
            }
            Rule::Prec { value, content } => (
                "prec".into(),
                vec![DisplayArg::Text(value.to_string()), DisplayArg::Rule(content)],
            ),
            Rule::PrecLeft { value, content } => (
                "prec.left".into(),
                vec![DisplayArg::Text(value.to_string()), DisplayArg::Rule(content)],
            ),
            Rule::PrecRight { value, content } => (
                "prec.right".into(),
                vec![DisplayArg::Text(value.to_string()), DisplayArg::Rule(content)],
            ),
            Rule::PrecDynamic { value, content } => (
                "prec.dynamic".into(),
                vec![DisplayArg::Text(value.to_string()), DisplayArg::Rule(content)],
            ),
        }
    }
}

const PRETTY_WIDTH: usize = 80;
const PRETTY_INDENT: usize = 2;

enum DisplayArg<'a> {
    Text(String),
    Rule(&'a Rule),
}

fn rule_args(members: &[Rule]) -> Vec<DisplayArg<'_>> {
    members.iter().map(DisplayArg::Rule).collect()
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::String { value } => {
                write!(f, "'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
            }
            Rule::Pattern { value, flags } => {
                write!(f, "/{value}/{}", flags.as_deref().unwrap_or(""))
            }
            Rule::Symbol { name } => write!(f, "$.{name}"),
            _ => {
                let (head, args) = self.display_parts();
                write!(f, "{head}(")?;
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    match arg {
                        DisplayArg::Text(text) => write!(f, "{text}")?,
                        DisplayArg::Rule(rule) => write!(f, "{rule}")?,
                    }
                }
                write!(f, ")")
            }
        }
    }
}
