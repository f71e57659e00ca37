use std::collections::{BTreeSet, HashMap, HashSet};

use regex_syntax::Parser;

use crate::dsl::{PrecValue, Rule};
use crate::grammar::{conflict_key, Grammar};
use crate::validation::{ValidationReporter, ValidationResult, GRAMMAR_CONSTANTS};

/// Validates composed grammars for correctness issues.
/// Each validator focuses on a single concern.
pub struct GrammarValidators;

impl GrammarValidators {
    /// Checks that every symbol names a rule or an external token.
    pub fn check_rule_references(grammar: &Grammar, result: &mut ValidationResult) {
        let externals: HashSet<&str> = grammar.external_names().collect();

        for (name, rule) in &grammar.rules {
            let mut reported = HashSet::new();
            for reference in rule.symbols() {
                if grammar.contains(reference) || externals.contains(reference) {
                    continue;
                }
                if reported.insert(reference) {
                    result.report_error(format!(
                        "Rule '{name}' references undefined rule '{reference}'"
                    ));
                }
            }
        }
    }

    /// Checks that conflicts, inline, supertypes and word name real rules.
    pub fn check_global_references(grammar: &Grammar, result: &mut ValidationResult) {
        for conflict in &grammar.conflicts {
            for name in conflict {
                if !grammar.contains(name) {
                    result.report_error(format!(
                        "Conflict {conflict:?} names undefined rule '{name}'"
                    ));
                }
            }
        }
        for (list, names) in [("inline", &grammar.inline), ("supertypes", &grammar.supertypes)] {
            for name in names {
                if !grammar.contains(name) {
                    result.report_error(format!("'{list}' names undefined rule '{name}'"));
                }
            }
        }
        if let Some(word) = &grammar.word {
            if !grammar.contains(word) {
                result.report_error(format!("Keyword extraction word '{word}' is not a rule"));
            }
        }
    }

    /// Checks that no rule except the start rule, and no repetition body,
    /// can match the empty string.
    pub fn check_nullable_rules(grammar: &Grammar, result: &mut ValidationResult) {
        let nullable = nullable_rules(grammar);
        let start = grammar.start_rule();

        for (name, rule) in &grammar.rules {
            if Some(name.as_str()) != start && nullable.contains(name.as_str()) {
                result.report_error(format!("Rule '{name}' matches the empty string"));
            }
            rule.walk(&mut |node| {
                if let Rule::Repeat { content } | Rule::Repeat1 { content } = node {
                    if is_nullable(content, &nullable) {
                        result.report_error(format!(
                            "Rule '{name}' repeats {content}, which matches the empty string"
                        ));
                    }
                }
            });
        }
    }

    /// Checks that every token pattern is valid regex syntax.
    pub fn check_patterns(grammar: &Grammar, result: &mut ValidationResult) {
        for (name, rule) in &grammar.rules {
            rule.walk(&mut |node| {
                if let Rule::Pattern { value, .. } = node {
                    if let Err(error) = Parser::new().parse(value) {
                        result.report_error(format!(
                            "Rule '{name}' has a pattern /{value}/ that does not compile: {error}"
                        ));
                    }
                }
            });
        }
        for extra in &grammar.extras {
            if let Rule::Pattern { value, .. } = extra {
                if let Err(error) = Parser::new().parse(value) {
                    result.report_error(format!(
                        "Extra /{value}/ does not compile: {error}"
                    ));
                }
            }
        }
    }

    /// Checks that named precedence levels are declared in `precedences`.
    pub fn check_named_precedences(grammar: &Grammar, result: &mut ValidationResult) {
        let declared: HashSet<&str> = grammar
            .precedences
            .iter()
            .flatten()
            .filter_map(|entry| match entry {
                Rule::String { value } => Some(value.as_str()),
                Rule::Symbol { name } => Some(name.as_str()),
                _ => None,
            })
            .collect();

        for (name, rule) in &grammar.rules {
            rule.walk(&mut |node| {
                let value = match node {
                    Rule::Prec { value, .. }
                    | Rule::PrecLeft { value, .. }
                    | Rule::PrecRight { value, .. } => value,
                    _ => return,
                };
                if let PrecValue::Name(level) = value {
                    if !declared.contains(level.as_str()) {
                        result.report_error(format!(
                            "Rule '{name}' uses undeclared precedence '{level}'"
                        ));
                    }
                }
            });
        }
    }

    /// Checks for conflict sets declared more than once.
    pub fn check_duplicate_conflicts(grammar: &Grammar, result: &mut ValidationResult) {
        let mut seen = HashSet::new();
        for conflict in &grammar.conflicts {
            let key: BTreeSet<&str> = conflict_key(conflict.iter().map(String::as_str));
            if !seen.insert(key) {
                result.report_warning(format!("Conflict {conflict:?} is declared twice"));
            }
        }
    }

    /// Checks that supertypes are choices of alternatives.
    pub fn check_supertypes(grammar: &Grammar, result: &mut ValidationResult) {
        for name in &grammar.supertypes {
            let Some(rule) = grammar.get(name) else {
                continue;
            };
            if rule.members().is_none() {
                result.report_warning(format!(
                    "Supertype '{name}' is not a choice; it will not classify its children"
                ));
            }
        }
    }

    /// Reports rules that cannot be reached from the start rule.
    pub fn check_reachability(grammar: &Grammar, result: &mut ValidationResult) {
        let Some(start) = grammar.start_rule() else {
            result.report_error("Grammar defines no rules");
            return;
        };

        let mut reached: HashSet<&str> = HashSet::new();
        let mut pending: Vec<&str> = vec![start];
        pending.extend(grammar.extras.iter().flat_map(Rule::symbols));
        pending.extend(grammar.external_names());
        if let Some(word) = &grammar.word {
            pending.push(word);
        }

        while let Some(name) = pending.pop() {
            if !reached.insert(name) {
                continue;
            }
            if let Some(rule) = grammar.get(name) {
                pending.extend(rule.symbols());
            }
        }

        let unreachable: Vec<&str> = grammar
            .rule_names()
            .filter(|name| !reached.contains(name))
            .collect();
        if !unreachable.is_empty() {
            result.report_warning(format!(
                "{} rules are unreachable from '{start}': {}",
                unreachable.len(),
                unreachable.join(", ")
            ));
        }
    }

    /// Suggests dropping inline entries nothing refers to.
    pub fn check_unused_inline(grammar: &Grammar, result: &mut ValidationResult) {
        let references = reference_counts(grammar);
        for name in &grammar.inline {
            if !references.contains_key(name.as_str()) {
                result.report_suggestion(format!(
                    "Inline rule '{name}' is never referenced and can be dropped from 'inline'"
                ));
            }
        }
    }

    /// Checks that every node kind consumers rely on can be produced.
    pub fn check_required_node_kinds(grammar: &Grammar, result: &mut ValidationResult) {
        let kinds = grammar.node_kinds();
        for &kind in GRAMMAR_CONSTANTS.node_kinds {
            if !kinds.contains(kind) {
                result.report_error(format!(
                    "Node kind '{kind}' is neither a visible rule nor an alias target"
                ));
            }
        }
    }

    /// Checks that every field consumers rely on is attached somewhere.
    pub fn check_required_fields(grammar: &Grammar, result: &mut ValidationResult) {
        let fields = grammar.field_names();
        for &name in GRAMMAR_CONSTANTS.field_names {
            if !fields.contains(name) {
                result.report_error(format!("Field '{name}' is never attached"));
            }
        }
    }
}

/// Rules that can derive the empty string, computed to a fixed point.
/// Patterns count as non-empty: the lexer never produces empty tokens.
pub fn nullable_rules(grammar: &Grammar) -> HashSet<&str> {
    let mut nullable = HashSet::new();
    loop {
        let before = nullable.len();
        for (name, rule) in &grammar.rules {
            if !nullable.contains(name.as_str()) && is_nullable(rule, &nullable) {
                nullable.insert(name.as_str());
            }
        }
        if nullable.len() == before {
            return nullable;
        }
    }
}

fn is_nullable(rule: &Rule, nullable: &HashSet<&str>) -> bool {
    match rule {
        Rule::Blank | Rule::Repeat { .. } => true,
        Rule::String { value } => value.is_empty(),
        Rule::Pattern { .. } => false,
        Rule::Symbol { name } => nullable.contains(name.as_str()),
        Rule::Seq { members } => members.iter().all(|member| is_nullable(member, nullable)),
        Rule::Choice { members } => members.iter().any(|member| is_nullable(member, nullable)),
        Rule::Repeat1 { content }
        | Rule::Field { content, .. }
        | Rule::Alias { content, .. }
        | Rule::Token { content }
        | Rule::ImmediateToken { content }
        | Rule::Prec { content, .. }
        | Rule::PrecLeft { content, .. }
        | Rule::PrecRight { content, .. }
        | Rule::PrecDynamic { content, .. } => is_nullable(content, nullable),
    }
}

fn reference_counts(grammar: &Grammar) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for rule in grammar.rules.values() {
        for name in rule.symbols() {
            *counts.entry(name).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::{optional, pattern, prec_named, repeat, sym};
    use crate::seq;

    fn grammar(rules: Vec<(&str, Rule)>) -> Grammar {
        let mut grammar = Grammar::new("test");
        for (name, rule) in rules {
            grammar.define(name, rule);
        }
        grammar
    }

    #[test]
    fn undefined_references_are_errors() {
        let grammar = grammar(vec![("program", seq![sym("missing"), sym("missing")])]);
        let mut result = ValidationResult::new();
        GrammarValidators::check_rule_references(&grammar, &mut result);
        assert_eq!(result.errors, vec!["Rule 'program' references undefined rule 'missing'"]);
    }

    #[test]
    fn nullable_rules_and_repeat_bodies_are_errors() {
        let grammar = grammar(vec![
            ("program", repeat(sym("item"))),
            ("item", optional(sym("word"))),
            ("word", pattern("[a-z]+")),
        ]);
        let mut result = ValidationResult::new();
        GrammarValidators::check_nullable_rules(&grammar, &mut result);
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[0].contains("'program' repeats $.item"));
        assert!(result.errors[1].contains("'item' matches the empty string"));
    }

    #[test]
    fn start_rule_may_be_empty() {
        let grammar = grammar(vec![
            ("program", repeat(sym("word"))),
            ("word", pattern("[a-z]+")),
        ]);
        let mut result = ValidationResult::new();
        GrammarValidators::check_nullable_rules(&grammar, &mut result);
        assert!(result.is_valid());
    }

    #[test]
    fn broken_patterns_are_errors() {
        let grammar = grammar(vec![("program", pattern("[a-z"))]);
        let mut result = ValidationResult::new();
        GrammarValidators::check_patterns(&grammar, &mut result);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn named_precedences_must_be_declared() {
        let mut grammar = grammar(vec![("program", prec_named("call", sym("program")))]);
        let mut result = ValidationResult::new();
        GrammarValidators::check_named_precedences(&grammar, &mut result);
        assert_eq!(result.errors.len(), 1);

        grammar.precedences.push(vec![Rule::from("call")]);
        let mut result = ValidationResult::new();
        GrammarValidators::check_named_precedences(&grammar, &mut result);
        assert!(result.is_valid());
    }

    #[test]
    fn unreachable_rules_are_grouped_into_one_warning() {
        let grammar = grammar(vec![
            ("program", sym("word")),
            ("word", pattern("[a-z]+")),
            ("orphan", sym("word")),
            ("widow", sym("word")),
        ]);
        let mut result = ValidationResult::new();
        GrammarValidators::check_reachability(&grammar, &mut result);
        assert_eq!(
            result.warnings,
            vec!["2 rules are unreachable from 'program': orphan, widow"]
        );
    }

    #[test]
    fn duplicate_conflicts_ignore_order() {
        let mut grammar = grammar(vec![("a", pattern("a")), ("b", pattern("b"))]);
        grammar.conflicts = vec![
            vec!["a".into(), "b".into()],
            vec!["b".into(), "a".into()],
        ];
        let mut result = ValidationResult::new();
        GrammarValidators::check_duplicate_conflicts(&grammar, &mut result);
        assert_eq!(result.warnings.len(), 1);
    }
}
