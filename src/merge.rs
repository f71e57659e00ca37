//! Extension merge layer
//!
//! An [`Extension`] is a patch set over a base [`Grammar`]. Patches are
//! recorded first and applied later in a single pass, so every combinator
//! passed to [`Extension::extend`] receives the *unpatched* base rule as
//! plain data and returns the merged rule. Global lists are unioned in
//! declaration order without duplicates; base conflicts can be removed
//! explicitly with [`Extension::remove_conflict`].

use std::collections::HashSet;
use std::fmt;

use crate::dsl::{sym, Rule};
use crate::errors::{GrammarError, Result};
use crate::grammar::{conflict_key, Grammar};

/// Builds the merged rule from the base rule.
pub type Combinator = Box<dyn Fn(&Rule) -> Result<Rule> + Send + Sync>;

enum Patch {
    Define(Rule),
    Extend(Combinator),
}

impl fmt::Debug for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Patch::Define(rule) => f.debug_tuple("Define").field(rule).finish(),
            Patch::Extend(_) => f.write_str("Extend(..)"),
        }
    }
}

#[derive(Debug)]
pub struct Extension {
    name: String,
    word: Option<String>,
    patches: Vec<(String, Patch)>,
    extras: Option<Vec<Rule>>,
    added_extras: Vec<Rule>,
    conflicts: Vec<Vec<String>>,
    removed_conflicts: Vec<Vec<String>>,
    inline: Vec<String>,
    supertypes: Vec<String>,
}

impl Extension {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            word: None,
            patches: Vec::new(),
            extras: None,
            added_extras: Vec::new(),
            conflicts: Vec::new(),
            removed_conflicts: Vec::new(),
            inline: Vec::new(),
            supertypes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of every rule this extension defines or extends, in order.
    pub fn patch_names(&self) -> impl Iterator<Item = &str> {
        self.patches.iter().map(|(name, _)| name.as_str())
    }

    // ------------------------------------------------------------------------
    // Rule patches
    // ------------------------------------------------------------------------

    /// Adds a rule, or replaces a base rule outright.
    pub fn define(mut self, name: &str, rule: Rule) -> Self {
        self.patches.push((name.to_string(), Patch::Define(rule)));
        self
    }

    /// Adds every rule of a generated family.
    pub fn define_all(mut self, rules: impl IntoIterator<Item = (String, Rule)>) -> Self {
        for (name, rule) in rules {
            self.patches.push((name, Patch::Define(rule)));
        }
        self
    }

    /// Replaces a base rule with whatever `combinator` builds from it.
    pub fn extend<F>(mut self, name: &str, combinator: F) -> Self
    where
        F: Fn(&Rule) -> Result<Rule> + Send + Sync + 'static,
    {
        self.patches
            .push((name.to_string(), Patch::Extend(Box::new(combinator))));
        self
    }

    /// `choice(original, additions...)`.
    pub fn extend_choice(self, name: &str, additions: Vec<Rule>) -> Self {
        self.extend(name, move |original| {
            let mut members = Vec::with_capacity(additions.len() + 1);
            members.push(original.clone());
            members.extend(additions.iter().cloned());
            Ok(Rule::choice(members))
        })
    }

    /// Rebuilds a base choice without the alternatives that reference
    /// `removed`, appends `additions`, and optionally re-wraps the result.
    pub fn extend_filtered(
        self,
        name: &str,
        removed: &[&str],
        additions: Vec<Rule>,
        wrap: Option<fn(Rule) -> Rule>,
    ) -> Self {
        let rule_name = name.to_string();
        let removed: Vec<String> = removed.iter().map(|member| member.to_string()).collect();
        self.extend(name, move |original| {
            let members = original.members().ok_or_else(|| GrammarError::NotAChoice {
                rule: rule_name.clone(),
            })?;
            for member in &removed {
                if !members.contains(&sym(member)) {
                    return Err(GrammarError::MissingMember {
                        rule: rule_name.clone(),
                        member: member.clone(),
                    });
                }
            }
            let mut kept: Vec<Rule> = members
                .iter()
                .filter(|member| match member {
                    Rule::Symbol { name } => !removed.contains(name),
                    _ => true,
                })
                .cloned()
                .collect();
            kept.extend(additions.iter().cloned());
            let merged = Rule::choice(kept);
            Ok(match wrap {
                Some(wrap) => wrap(merged),
                None => merged,
            })
        })
    }

    // ------------------------------------------------------------------------
    // Global declarations
    // ------------------------------------------------------------------------

    /// Replaces the base extras entirely.
    pub fn extras(mut self, extras: Vec<Rule>) -> Self {
        self.extras = Some(extras);
        self
    }

    pub fn add_extras(mut self, extras: Vec<Rule>) -> Self {
        self.added_extras.extend(extras);
        self
    }

    pub fn add_conflicts(mut self, conflicts: &[&[&str]]) -> Self {
        self.conflicts.extend(conflicts.iter().map(|set| owned(set)));
        self
    }

    /// Drops a base conflict. Applying fails if the base never declared it.
    pub fn remove_conflict(mut self, conflict: &[&str]) -> Self {
        self.removed_conflicts.push(owned(conflict));
        self
    }

    pub fn add_inline(mut self, names: &[&str]) -> Self {
        self.inline.extend(owned(names));
        self
    }

    pub fn add_supertypes(mut self, names: &[&str]) -> Self {
        self.supertypes.extend(owned(names));
        self
    }

    pub fn word(mut self, word: &str) -> Self {
        self.word = Some(word.to_string());
        self
    }

    // ------------------------------------------------------------------------
    // Composition
    // ------------------------------------------------------------------------

    /// Composes this extension onto `base`. Pure: `base` is not modified and
    /// the same inputs always produce the same grammar.
    pub fn apply(&self, base: &Grammar) -> Result<Grammar> {
        let mut seen = HashSet::new();
        for (name, _) in &self.patches {
            if !seen.insert(name.as_str()) {
                return Err(GrammarError::DuplicatePatch { rule: name.clone() });
            }
        }

        let mut grammar = base.clone();
        grammar.name = self.name.clone();
        if let Some(word) = &self.word {
            grammar.word = Some(word.clone());
        }

        for (name, patch) in &self.patches {
            let rule = match patch {
                Patch::Define(rule) => rule.clone(),
                Patch::Extend(combinator) => {
                    let original = base.get(name).ok_or_else(|| GrammarError::UnknownBaseRule {
                        rule: name.clone(),
                    })?;
                    combinator(original)?
                }
            };
            tracing::trace!(
                rule = %name,
                replaced = base.contains(name),
                "applying patch"
            );
            grammar.define(name, rule);
        }

        if let Some(extras) = &self.extras {
            grammar.extras = extras.clone();
        }
        for extra in &self.added_extras {
            if !grammar.extras.contains(extra) {
                grammar.extras.push(extra.clone());
            }
        }

        for removed in &self.removed_conflicts {
            let key = conflict_key(removed.iter().map(String::as_str));
            let before = grammar.conflicts.len();
            grammar
                .conflicts
                .retain(|declared| conflict_key(declared.iter().map(String::as_str)) != key);
            if grammar.conflicts.len() == before {
                return Err(GrammarError::MissingConflict {
                    conflict: removed.clone(),
                });
            }
            tracing::debug!(conflict = ?removed, "removed base conflict");
        }
        for conflict in &self.conflicts {
            if !grammar.has_conflict(&conflict.iter().map(String::as_str).collect::<Vec<_>>()) {
                grammar.conflicts.push(conflict.clone());
            }
        }

        union(&mut grammar.inline, &self.inline);
        union(&mut grammar.supertypes, &self.supertypes);

        tracing::debug!(
            grammar = %grammar.name,
            patches = self.patches.len(),
            rules = grammar.rules.len(),
            conflicts = grammar.conflicts.len(),
            "composed grammar"
        );
        Ok(grammar)
    }
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn union(target: &mut Vec<String>, additions: &[String]) {
    for name in additions {
        if !target.contains(name) {
            target.push(name.clone());
        }
    }
}
