//! Conditional-compilation rule families.
//!
//! `#if`/`#ifdef` blocks appear in many syntactic contexts, and each context
//! admits different content. Rather than one rule that accepts anything, a
//! [`ConditionalFamily`] generates the five directive rules (`if`, `ifdef`,
//! `else`, `elif`, `elifdef`) for one context, all sharing the same
//! directive skeleton. Suffixed families alias their branches back to the
//! unsuffixed node kinds so consumers see `preproc_else` wherever it occurs.

use crate::dsl::{alias, field, optional, prec, preprocessor, repeat, sym, Rule};
use crate::{choice, seq};

#[derive(Debug, Clone)]
pub struct ConditionalFamily {
    suffix: String,
    content: Rule,
    precedence: i32,
    content_precedence: Option<i32>,
}

impl ConditionalFamily {
    pub fn new(suffix: &str, content: Rule) -> Self {
        Self {
            suffix: suffix.to_string(),
            content,
            precedence: 0,
            content_precedence: None,
        }
    }

    /// Precedence wrapped around every generated rule.
    pub fn precedence(mut self, precedence: i32) -> Self {
        self.precedence = precedence;
        self
    }

    /// Precedence wrapped around each repeated content item.
    pub fn content_precedence(mut self, precedence: i32) -> Self {
        self.content_precedence = Some(precedence);
        self
    }

    pub fn name(&self, directive: &str) -> String {
        format!("preproc_{directive}{}", self.suffix)
    }

    fn branch(&self, directive: &str) -> Rule {
        let plain = format!("preproc_{directive}");
        if self.suffix.is_empty() {
            sym(&plain)
        } else {
            alias(sym(&self.name(directive)), &plain)
        }
    }

    fn body(&self) -> Rule {
        match self.content_precedence {
            Some(level) => repeat(prec(level, self.content.clone())),
            None => repeat(self.content.clone()),
        }
    }

    fn alternative(&self) -> Rule {
        field(
            "alternative",
            optional(choice![
                self.branch("else"),
                self.branch("elif"),
                self.branch("elifdef"),
            ]),
        )
    }

    fn wrap(&self, rule: Rule) -> Rule {
        if self.precedence == 0 {
            rule
        } else {
            prec(self.precedence, rule)
        }
    }

    /// The five rules of the family, `preproc_if*` first.
    pub fn rules(&self) -> Vec<(String, Rule)> {
        let condition = || field("condition", sym("_preproc_expression"));
        let name = || field("name", sym("identifier"));
        vec![
            (
                self.name("if"),
                self.wrap(seq![
                    preprocessor("if"),
                    condition(),
                    "\n",
                    self.body(),
                    self.alternative(),
                    preprocessor("endif"),
                ]),
            ),
            (
                self.name("ifdef"),
                self.wrap(seq![
                    choice![preprocessor("ifdef"), preprocessor("ifndef")],
                    name(),
                    self.body(),
                    self.alternative(),
                    preprocessor("endif"),
                ]),
            ),
            (
                self.name("else"),
                self.wrap(seq![preprocessor("else"), self.body()]),
            ),
            (
                self.name("elif"),
                self.wrap(seq![
                    preprocessor("elif"),
                    condition(),
                    "\n",
                    self.body(),
                    self.alternative(),
                ]),
            ),
            (
                self.name("elifdef"),
                self.wrap(seq![
                    choice![preprocessor("elifdef"), preprocessor("elifndef")],
                    name(),
                    self.body(),
                    self.alternative(),
                ]),
            ),
        ]
    }
}
