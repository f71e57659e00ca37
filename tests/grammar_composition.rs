//! Composition of the Objective-C extension onto the C base grammar.

use objc_grammar::dsl::{Associativity, Rule};
use objc_grammar::grammar::c;
use objc_grammar::objc::declarators::{DeclaratorFlavor, DeclaratorForm};
use objc_grammar::objc::preproc::PreprocContext;
use objc_grammar::objc::{self, policy};
use objc_grammar::{Extension, Grammar};
use pretty_assertions::assert_eq;

fn grammar() -> &'static Grammar {
    objc::grammar().unwrap()
}

fn symbols(name: &str) -> Vec<String> {
    grammar()
        .rule(name)
        .unwrap()
        .symbols()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[test]
fn every_referenced_symbol_is_defined() {
    let grammar = grammar();
    for (name, rule) in &grammar.rules {
        for reference in rule.symbols() {
            assert!(grammar.contains(reference), "{name} references undefined {reference}");
        }
    }
}

#[test]
fn base_rules_not_patched_are_kept_verbatim() {
    let base = c::grammar();
    let composed = grammar();
    for name in ["while_statement", "if_statement", "sizeof_expression", "initializer_list"] {
        assert_eq!(composed.rule(name).unwrap(), base.rule(name).unwrap(), "{name}");
    }
}

#[test]
fn composition_is_deterministic() {
    let first = objc::compose(&c::grammar()).unwrap();
    let second = objc::compose(&c::grammar()).unwrap();
    assert_eq!(first.to_json(false).unwrap(), second.to_json(false).unwrap());
    assert_eq!(first.fingerprint().unwrap(), second.fingerprint().unwrap());
}

#[test]
fn composed_grammar_survives_a_json_round_trip() {
    let json = grammar().to_json(true).unwrap();
    let back = Grammar::from_json(&json).unwrap();
    assert_eq!(&back, grammar());
}

#[test]
fn composing_onto_a_loaded_base_matches_the_built_in_base() {
    let base_json = c::grammar().to_json(false).unwrap();
    let loaded = Grammar::from_json(&base_json).unwrap();
    assert_eq!(&objc::compose(&loaded).unwrap(), grammar());
}

#[test]
fn object_model_items_are_top_level_and_block_items() {
    let top = symbols("_top_level_item");
    let block = symbols("_block_item");
    for item in ["class_interface", "class_implementation", "protocol_declaration", "module_import"] {
        assert!(top.iter().any(|name| name == item), "top level lacks {item}");
        assert!(block.iter().any(|name| name == item), "blocks lack {item}");
    }
}

#[test]
fn message_expression_binds_at_call_precedence() {
    let rule = grammar().rule("message_expression").unwrap();
    assert_eq!(rule.outer_precedence().level(), c::prec::CALL);
    assert_eq!(rule.field_names(), vec!["receiver", "method"]);
    let receiver = symbols("message_expression");
    assert!(receiver.contains(&"generic_specifier".to_string()));
}

#[test]
fn block_literal_and_xor_coexist() {
    let grammar = grammar();
    assert!(symbols("_expression_not_binary").contains(&"block_literal".to_string()));
    let xor = grammar.rule("binary_expression").unwrap().members().unwrap()[8].clone();
    assert!(xor.to_string().contains("'^'"));
    assert!(grammar.contains("block_pointer_declarator"));
    assert!(symbols("_declarator").contains(&"block_pointer_declarator".to_string()));
}

#[test]
fn declarator_flavors_each_get_every_form() {
    let grammar = grammar();
    for flavor in DeclaratorFlavor::ALL {
        for form in DeclaratorForm::ALL {
            let name = flavor.rule_name(form);
            assert!(grammar.contains(&name), "missing {name}");
        }
    }
    let pointer = grammar.rule("pointer_declarator").unwrap().outer_precedence();
    assert_eq!(pointer.dynamic, 1);
    assert_eq!(pointer.associativity, Some(Associativity::Right));
}

#[test]
fn ownership_qualifiers_extend_type_qualifier() {
    let rendered = grammar().rule("type_qualifier").unwrap().to_string();
    for qualifier in ["'__weak'", "'__strong'", "'_Nullable'", "'const'"] {
        assert!(rendered.contains(qualifier), "type_qualifier lacks {qualifier}");
    }
}

#[test]
fn try_statement_requires_a_handler() {
    let grammar = grammar();
    let Rule::Seq { members } = grammar.rule("try_statement").unwrap() else {
        panic!("try_statement is a sequence");
    };
    assert!(!members.last().unwrap().is_optional());
    assert!(!symbols("_non_case_statement").contains(&"seh_try_statement".to_string()));
}

#[test]
fn property_declaration_accepts_attributes_and_a_body() {
    let symbols = symbols("property_declaration");
    for name in ["property_attributes_declaration", "struct_declaration", "atomic_declaration"] {
        assert!(symbols.contains(&name.to_string()), "property_declaration lacks {name}");
    }
}

#[test]
fn interface_conditionals_hold_interface_declarations() {
    let name = PreprocContext::InterfaceDeclaration.rule_name("ifdef");
    let ifdef = grammar().rule(&name).unwrap();
    assert!(ifdef.symbols().contains(&"interface_declaration"));
    let interface = grammar().rule("interface_declaration").unwrap().to_string();
    assert!(interface.contains(&format!("alias($.{name}, $.preproc_ifdef)")));
    assert!(interface.contains("$.property_declaration"));
}

#[test]
fn conflict_policy_is_applied() {
    let grammar = grammar();
    assert!(!grammar.has_conflict(&policy::FILTERED_CONFLICT));
    for conflict in policy::CONFLICTS {
        assert!(grammar.has_conflict(conflict), "missing conflict {conflict:?}");
    }
    assert!(grammar.has_conflict(&["sized_type_specifier"]));
    assert!(grammar.has_conflict(&["type_specifier", "_top_level_expression_statement"]));
    for name in policy::INLINE {
        assert!(grammar.inline.iter().any(|inlined| inlined == name));
    }
    assert!(grammar.supertypes.iter().any(|name| name == "specifier_qualifier"));
}

#[test]
fn applying_the_extension_to_its_own_output_is_a_fixed_point_for_definitions() {
    let mut definitions_only = Extension::new("objc");
    for name in ["class_interface", "message_expression"] {
        let rule = grammar().rule(name).unwrap().clone();
        definitions_only = definitions_only.define(name, rule);
    }
    let again = definitions_only.apply(grammar()).unwrap();
    assert_eq!(&again, grammar());
}

#[test]
fn every_base_conflict_but_the_filtered_one_survives_composition() {
    let base = c::grammar();
    for conflict in &base.conflicts {
        let names: Vec<&str> = conflict.iter().map(String::as_str).collect();
        if names == policy::FILTERED_CONFLICT {
            continue;
        }
        assert!(grammar().has_conflict(&names), "lost base conflict {names:?}");
    }
}

#[test]
fn compatibility_alias_fields_follow_the_upstream_grammar() {
    // `@compatibility_alias Alias Real;` labels `Alias` as `class` and
    // `Real` as `alias`, as tree-sitter-objc does. Consumers rely on it.
    let rule = grammar().rule("compatibility_alias_declaration").unwrap();
    assert_eq!(rule.field_names(), vec!["class", "alias"]);
}
