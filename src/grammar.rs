//! Grammar container
//!
//! A [`Grammar`] is the ordered rule table plus the global declarations the
//! parser generator consumes: extras, conflicts, precedences, externals,
//! inline rules, supertypes and the keyword-extraction `word`. Its serde
//! shape is tree-sitter's `grammar.json`, so a grammar can be loaded from
//! (or written to) the same file the generator reads.

pub mod c;
pub mod preproc;

use std::collections::BTreeSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::dsl::{is_hidden_name, Rule};
use crate::errors::{GrammarError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grammar {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    pub rules: IndexMap<String, Rule>,
    #[serde(default)]
    pub extras: Vec<Rule>,
    #[serde(default)]
    pub conflicts: Vec<Vec<String>>,
    #[serde(default)]
    pub precedences: Vec<Vec<Rule>>,
    #[serde(default)]
    pub externals: Vec<Rule>,
    #[serde(default)]
    pub inline: Vec<String>,
    #[serde(default)]
    pub supertypes: Vec<String>,
}

impl Grammar {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            word: None,
            rules: IndexMap::new(),
            extras: Vec::new(),
            conflicts: Vec::new(),
            precedences: Vec::new(),
            externals: Vec::new(),
            inline: Vec::new(),
            supertypes: Vec::new(),
        }
    }

    /// Adds a rule, or replaces it in place when the name already exists.
    pub fn define(&mut self, name: &str, rule: Rule) -> &mut Self {
        self.rules.insert(name.to_string(), rule);
        self
    }

    /// Adds every rule of a generated family, in order.
    pub fn define_all(&mut self, rules: impl IntoIterator<Item = (String, Rule)>) -> &mut Self {
        for (name, rule) in rules {
            self.rules.insert(name, rule);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn rule(&self, name: &str) -> Result<&Rule> {
        self.rules.get(name).ok_or_else(|| GrammarError::UnknownRule {
            rule: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// The first rule is the start rule.
    pub fn start_rule(&self) -> Option<&str> {
        self.rules.keys().next().map(String::as_str)
    }

    /// Names of rules declared by the external scanner.
    pub fn external_names(&self) -> impl Iterator<Item = &str> {
        self.externals.iter().filter_map(|rule| match rule {
            Rule::Symbol { name } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Hidden, inlined and supertype rules never materialize as CST nodes.
    pub fn is_materialized(&self, name: &str) -> bool {
        !is_hidden_name(name)
            && !self.inline.iter().any(|inlined| inlined == name)
            && !self.is_supertype(name)
    }

    pub fn is_supertype(&self, name: &str) -> bool {
        self.supertypes.iter().any(|supertype| supertype == name)
    }

    /// True if `names` matches a declared conflict, ignoring order.
    pub fn has_conflict(&self, names: &[&str]) -> bool {
        let wanted = conflict_key(names.iter().copied());
        self.conflicts
            .iter()
            .any(|declared| conflict_key(declared.iter().map(String::as_str)) == wanted)
    }

    /// Every node kind a parse can produce: visible rule names plus the
    /// targets of named aliases.
    pub fn node_kinds(&self) -> BTreeSet<String> {
        let mut kinds: BTreeSet<String> = self
            .rule_names()
            .filter(|name| self.is_materialized(name))
            .map(str::to_string)
            .collect();
        for rule in self.rules.values() {
            rule.walk(&mut |node| {
                if let Rule::Alias {
                    named: true, value, ..
                } = node
                {
                    kinds.insert(value.clone());
                }
            });
        }
        kinds
    }

    /// Every field name used anywhere in the grammar.
    pub fn field_names(&self) -> BTreeSet<String> {
        self.rules
            .values()
            .flat_map(|rule| rule.field_names())
            .map(str::to_string)
            .collect()
    }

    // ------------------------------------------------------------------------
    // grammar.json
    // ------------------------------------------------------------------------

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// SHA-256 of the compact serialization, as lowercase hex.
    pub fn fingerprint(&self) -> Result<String> {
        let digest = Sha256::digest(self.to_json(false)?.as_bytes());
        Ok(digest.iter().map(|byte| format!("{byte:02x}")).collect())
    }
}

/// Loads a `grammar.json` produced by the tree-sitter CLI.
pub fn load_json(path: &Path) -> Result<Grammar> {
    let text =
        std::fs::read_to_string(path).map_err(|e| GrammarError::io(path.display(), e))?;
    let grammar = Grammar::from_json(&text)?;
    tracing::debug!(
        path = %path.display(),
        rules = grammar.rules.len(),
        "loaded base grammar"
    );
    Ok(grammar)
}

/// Order-insensitive identity of a conflict set.
pub(crate) fn conflict_key<'a>(names: impl Iterator<Item = &'a str>) -> BTreeSet<&'a str> {
    names.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::{alias, sym};
    use crate::seq;

    fn sample() -> Grammar {
        let mut grammar = Grammar::new("sample");
        grammar
            .define("source", sym("_item"))
            .define("_item", seq![alias(sym("word"), "keyword"), ";"])
            .define("word", crate::dsl::pattern("[a-z]+"));
        grammar.conflicts.push(vec!["word".into(), "_item".into()]);
        grammar
    }

    #[test]
    fn first_rule_is_start_rule() {
        assert_eq!(sample().start_rule(), Some("source"));
    }

    #[test]
    fn conflicts_match_regardless_of_order() {
        let grammar = sample();
        assert!(grammar.has_conflict(&["_item", "word"]));
        assert!(!grammar.has_conflict(&["word"]));
    }

    #[test]
    fn node_kinds_include_aliases_and_skip_hidden_rules() {
        let kinds = sample().node_kinds();
        assert!(kinds.contains("keyword"));
        assert!(kinds.contains("word"));
        assert!(!kinds.contains("_item"));
    }

    #[test]
    fn json_round_trip_preserves_rule_order() {
        let grammar = sample();
        let json = grammar.to_json(true).unwrap();
        let back = Grammar::from_json(&json).unwrap();
        let names: Vec<_> = back.rule_names().collect();
        assert_eq!(names, vec!["source", "_item", "word"]);
        assert_eq!(back.to_json(true).unwrap(), json);
    }

    #[test]
    fn fingerprint_is_stable() {
        assert_eq!(sample().fingerprint().unwrap(), sample().fingerprint().unwrap());
        assert_eq!(sample().fingerprint().unwrap().len(), 64);
    }

    #[test]
    fn unknown_rule_is_an_error() {
        assert!(matches!(
            sample().rule("missing"),
            Err(GrammarError::UnknownRule { .. })
        ));
    }
}
