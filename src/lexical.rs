//! Extras matcher
//!
//! Compiles a grammar's `extras` (whitespace, line continuations and
//! comments) into anchored regular expressions so tooling can skip trivia
//! the same way the generated lexer does. Symbol extras such as `comment`
//! are resolved to their token definitions first.

use regex::Regex;

use crate::dsl::Rule;
use crate::errors::{GrammarError, Result};
use crate::grammar::Grammar;

/// Deepest chain of symbol references followed while compiling one extra.
const MAX_SYMBOL_DEPTH: usize = 32;

#[derive(Debug, Clone)]
struct CompiledExtra {
    origin: String,
    regex: Regex,
}

#[derive(Debug, Clone)]
pub struct ExtrasMatcher {
    extras: Vec<CompiledExtra>,
}

impl ExtrasMatcher {
    pub fn new(grammar: &Grammar) -> Result<Self> {
        let mut extras = Vec::with_capacity(grammar.extras.len());
        for extra in &grammar.extras {
            let origin = match extra {
                Rule::Symbol { name } => name.clone(),
                other => other.to_string(),
            };
            let source = to_regex(grammar, extra, 0)?;
            let regex = Regex::new(&format!("^(?:{source})")).map_err(|error| {
                GrammarError::InvalidPattern {
                    origin: origin.clone(),
                    message: error.to_string(),
                }
            })?;
            tracing::trace!(%origin, pattern = %regex, "compiled extra");
            extras.push(CompiledExtra { origin, regex });
        }
        Ok(Self { extras })
    }

    /// Names of the compiled extras, in grammar order.
    pub fn origins(&self) -> impl Iterator<Item = &str> {
        self.extras.iter().map(|extra| extra.origin.as_str())
    }

    /// Length of the longest extra starting at `offset`, if any matches.
    fn longest_at(&self, text: &str, offset: usize) -> Option<usize> {
        let rest = text.get(offset..)?;
        self.extras
            .iter()
            .filter_map(|extra| extra.regex.find(rest))
            .map(|found| found.end())
            .filter(|&len| len > 0)
            .max()
    }

    /// First offset at or after `offset` where no extra matches.
    pub fn skip(&self, text: &str, offset: usize) -> usize {
        let mut position = offset;
        while let Some(len) = self.longest_at(text, position) {
            position += len;
        }
        position
    }

    /// True when `text` consists solely of extras.
    pub fn is_trivia(&self, text: &str) -> bool {
        self.skip(text, 0) == text.len()
    }
}

fn to_regex(grammar: &Grammar, rule: &Rule, depth: usize) -> Result<String> {
    let source = match rule {
        Rule::Blank => String::new(),
        Rule::String { value } => regex::escape(value),
        Rule::Pattern { value, flags } => match flags.as_deref() {
            Some(flags) if flags.contains('i') => format!("(?i:{value})"),
            _ => format!("(?:{value})"),
        },
        Rule::Symbol { name } => {
            if depth >= MAX_SYMBOL_DEPTH {
                return Err(GrammarError::InvalidPattern {
                    origin: name.clone(),
                    message: "symbol references do not bottom out in a token".into(),
                });
            }
            to_regex(grammar, grammar.rule(name)?, depth + 1)?
        }
        Rule::Seq { members } => members
            .iter()
            .map(|member| to_regex(grammar, member, depth))
            .collect::<Result<Vec<_>>>()?
            .concat(),
        Rule::Choice { members } => {
            let alternatives = members
                .iter()
                .map(|member| to_regex(grammar, member, depth))
                .collect::<Result<Vec<_>>>()?;
            format!("(?:{})", alternatives.join("|"))
        }
        Rule::Repeat { content } => format!("(?:{})*", to_regex(grammar, content, depth)?),
        Rule::Repeat1 { content } => format!("(?:{})+", to_regex(grammar, content, depth)?),
        Rule::Field { content, .. }
        | Rule::Alias { content, .. }
        | Rule::Token { content }
        | Rule::ImmediateToken { content }
        | Rule::Prec { content, .. }
        | Rule::PrecLeft { content, .. }
        | Rule::PrecRight { content, .. }
        | Rule::PrecDynamic { content, .. } => to_regex(grammar, content, depth)?,
    };
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::{pattern, sym, token};
    use crate::{choice, seq};

    fn matcher() -> ExtrasMatcher {
        let mut grammar = Grammar::new("test");
        grammar.define(
            "comment",
            token(choice![
                seq!["//", pattern("(\\\\+(.|\\r?\\n)|[^\\\\\\n])*")],
                seq!["/*", pattern("[^*]*\\*+([^/*][^*]*\\*+)*"), "/"],
            ]),
        );
        grammar.extras = vec![pattern("\\u00A0|\\s|\\\\\\r?\\n"), sym("comment")];
        ExtrasMatcher::new(&grammar).unwrap()
    }

    #[test]
    fn skips_whitespace_and_comments() {
        let text = "  // note\n\t/* block */ x";
        assert_eq!(matcher().skip(text, 0), text.len() - 1);
    }

    #[test]
    fn skips_non_breaking_space_and_continuations() {
        let text = "\u{a0}\\\r\nid";
        assert_eq!(matcher().skip(text, 0), text.len() - 2);
    }

    #[test]
    fn leaves_partial_extras_for_the_tokenizer() {
        let matcher = matcher();
        assert_eq!(matcher.skip("/ 2", 0), 0);
        assert_eq!(matcher.skip("\\x", 0), 0);
        assert_eq!(matcher.skip("/* open", 0), 0);
    }

    #[test]
    fn trivia_is_extras_only() {
        let matcher = matcher();
        assert!(matcher.is_trivia(" /* a */ // b"));
        assert!(matcher.is_trivia(""));
        assert!(!matcher.is_trivia(" ; "));
    }

    #[test]
    fn symbol_cycles_are_rejected() {
        let mut grammar = Grammar::new("test");
        grammar.define("loop", sym("loop"));
        grammar.extras = vec![sym("loop")];
        assert!(matches!(
            ExtrasMatcher::new(&grammar),
            Err(GrammarError::InvalidPattern { .. })
        ));
    }
}
