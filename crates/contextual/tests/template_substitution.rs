//! Integration tests for the substitution engine.

use std::collections::BTreeMap;

use contextual::{Lookup, Shared, SubstituteError, Substituter, Value, record};

fn descriptions(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_string(), value.clone()))
        .collect()
}

/// A lookup source that must never be consulted.
struct Unreachable;

impl Lookup for Unreachable {
    fn resolve(&self, name: &str) -> Option<Value> {
        panic!("unexpected lookup of '{name}'");
    }
}

// =============================================================================
// Identity on non-templated input
// =============================================================================

#[test]
fn scalars_pass_through_unchanged() {
    let source = descriptions(&[]);
    let engine = Substituter::new(&source);
    for value in [
        Value::Unit,
        Value::Bool(true),
        Value::Number(42),
        Value::Float(1.5),
    ] {
        assert_eq!(engine.apply(&value).unwrap(), value);
    }
}

#[test]
fn plain_strings_pass_through_unchanged() {
    let source = descriptions(&[("alias", Value::from("Test"))]);
    let engine = Substituter::new(&source);
    let value = Value::from("no placeholders here");
    assert_eq!(engine.apply(&value).unwrap(), value);
}

#[test]
fn containers_without_placeholders_pass_through_unchanged() {
    let source = descriptions(&[]);
    let engine = Substituter::new(&source);
    let value = Value::from(vec!["one", "two"]);
    assert_eq!(engine.apply(&value).unwrap(), value);
    let value = record! { "key" => "value" };
    assert_eq!(engine.apply(&value).unwrap(), value);
}

// =============================================================================
// Strict mode
// =============================================================================

#[test]
fn strict_placeholder_returns_value_without_stringifying() {
    let fixture = Value::from(vec!["one", "two"]);
    let source = descriptions(&[("fixture", fixture.clone())]);
    let engine = Substituter::new(&source);
    assert_eq!(engine.apply(&Value::from("{fixture}")).unwrap(), fixture);
}

#[test]
fn strict_placeholder_preserves_scalar_type() {
    let source = descriptions(&[("flag", Value::Bool(true)), ("count", Value::Number(3))]);
    let engine = Substituter::new(&source);
    assert_eq!(engine.apply(&Value::from("{flag}")).unwrap(), Value::Bool(true));
    assert_eq!(engine.apply(&Value::from("{count}")).unwrap(), Value::Number(3));
}

#[test]
fn strict_miss_returns_string_unchanged() {
    let source = descriptions(&[]);
    let engine = Substituter::new(&source);
    let value = Value::from("{missing}");
    assert_eq!(engine.apply(&value).unwrap(), value);
}

// =============================================================================
// General mode and recursion
// =============================================================================

#[test]
fn replaces_every_occurrence() {
    let source = descriptions(&[("x", Value::from("X"))]);
    let engine = Substituter::new(&source);
    let result = engine.apply(&Value::from("x is '{x}', again: {x}")).unwrap();
    assert_eq!(result, Value::from("x is 'X', again: X"));
}

#[test]
fn resolution_is_recursive() {
    let source = descriptions(&[
        ("context", Value::from("Test")),
        ("alias", Value::from("{context} Context")),
    ]);
    let engine = Substituter::new(&source);
    let result = engine.apply(&Value::from("alias is '{alias}'")).unwrap();
    assert_eq!(result, Value::from("alias is 'Test Context'"));
}

#[test]
fn unresolved_placeholders_stay_in_place() {
    let source = descriptions(&[("alias", Value::from("{context} Context"))]);
    let engine = Substituter::new(&source);
    let result = engine.apply(&Value::from("alias is '{alias}'")).unwrap();
    assert_eq!(result, Value::from("alias is '{context} Context'"));
}

#[test]
fn scalars_stringify_inside_text() {
    let source = descriptions(&[("n", Value::Number(42)), ("on", Value::Bool(true))]);
    let engine = Substituter::new(&source);
    let result = engine.apply(&Value::from("n={n} on={on}")).unwrap();
    assert_eq!(result, Value::from("n=42 on=true"));
}

#[test]
fn nested_placeholders_resolve_innermost_first() {
    let source = descriptions(&[("b", Value::from("x")), ("axc", Value::from("nested"))]);
    let engine = Substituter::new(&source);
    let result = engine.apply(&Value::from("{a{b}c}")).unwrap();
    assert_eq!(result, Value::from("nested"));
}

#[test]
fn fully_nested_group_resolves_its_inner_name() {
    let source = descriptions(&[("b", Value::from("x"))]);
    let engine = Substituter::new(&source);
    assert_eq!(engine.apply(&Value::from("{{b}}")).unwrap(), Value::from("{x}"));
}

#[test]
fn fully_nested_group_is_an_indirect_name() {
    let source = descriptions(&[("b", Value::from("alias")), ("alias", Value::from("Test"))]);
    let engine = Substituter::new(&source);
    assert_eq!(engine.apply(&Value::from("{{b}}")).unwrap(), Value::from("Test"));
}

#[test]
fn indirect_names_keep_the_looked_up_type() {
    let source = descriptions(&[
        ("b", Value::from("fixture")),
        ("fixture", Value::from(vec!["one", "two"])),
    ]);
    let engine = Substituter::new(&source);
    assert_eq!(
        engine.apply(&Value::from("{{b}}")).unwrap(),
        Value::from(vec!["one", "two"])
    );
}

#[test]
fn unresolvable_nested_group_stays_in_place() {
    let source = descriptions(&[]);
    let engine = Substituter::new(&source);
    let value = Value::from("{{missing}}");
    assert_eq!(engine.apply(&value).unwrap(), value);
}

#[test]
fn balanced_group_is_a_name_of_its_own() {
    // a literal braced key takes precedence over indirection
    let source = descriptions(&[("{b}", Value::from("X")), ("b", Value::from("x"))]);
    let engine = Substituter::new(&source);
    assert_eq!(engine.apply(&Value::from("{{b}}")).unwrap(), Value::from("X"));
}

// =============================================================================
// Escaping
// =============================================================================

#[test]
fn escaped_braces_are_not_looked_up() {
    let engine = Substituter::new(&Unreachable);
    let result = engine.apply(&Value::from("\\{literal\\}")).unwrap();
    assert_eq!(result, Value::from("{literal}"));
}

#[test]
fn escaped_braces_survive_neighbouring_replacements() {
    let source = descriptions(&[("x", Value::from("X"))]);
    let engine = Substituter::new(&source);
    let result = engine.apply(&Value::from("\\{x\\} is {x}")).unwrap();
    assert_eq!(result, Value::from("{x} is X"));
}

#[test]
fn looked_up_values_are_unescaped() {
    let source = descriptions(&[("braces", Value::from("\\{kept\\}"))]);
    let engine = Substituter::new(&source);
    let result = engine.apply(&Value::from("{braces}")).unwrap();
    assert_eq!(result, Value::from("{kept}"));
}

// =============================================================================
// Sequences and records
// =============================================================================

#[test]
fn sequence_substitution_preserves_structure() {
    let mut source = descriptions(&[("x", Value::from("X"))]);
    let fixture = Value::from(vec!["x is '{x}'", "y={x}"]);

    let engine = Substituter::new(&source);
    let result = engine.apply(&fixture).unwrap();
    assert_eq!(result, Value::from(vec!["x is 'X'", "y=X"]));

    source.insert("x".to_string(), Value::from("Y"));
    let engine = Substituter::new(&source);
    let result = engine.apply(&fixture).unwrap();
    assert_eq!(result, Value::from(vec!["x is 'Y'", "y=Y"]));
}

#[test]
fn record_substitution_builds_a_new_record() {
    let source = descriptions(&[("alias", Value::from("Test Context"))]);
    let fixture = record! {
        "aliasIs" => "alias is '{alias}'",
        "weAreIn" => "we are in {alias}",
    };

    let engine = Substituter::new(&source);
    let result = engine.apply(&fixture).unwrap();
    assert_eq!(
        result,
        record! {
            "aliasIs" => "alias is 'Test Context'",
            "weAreIn" => "we are in Test Context",
        }
    );
    // the original was not mutated
    assert_eq!(
        fixture.as_record().unwrap()["aliasIs"],
        Value::from("alias is '{alias}'")
    );
}

// =============================================================================
// Shared handles and exclusion
// =============================================================================

/// A lookup source reachable from its own descriptions through a shared
/// container handle.
struct SelfHolding {
    container: Shared,
    descriptions: BTreeMap<String, Value>,
}

impl Lookup for SelfHolding {
    fn resolve(&self, name: &str) -> Option<Value> {
        if name == "self" {
            return Some(Value::Shared(self.container.clone()));
        }
        self.descriptions.get(name).cloned()
    }

    fn excludes(&self, value: &Value) -> bool {
        matches!(value, Value::Shared(handle) if handle.ptr_eq(&self.container))
    }
}

#[test]
fn shared_handles_substitute_under_a_fresh_handle() {
    let handle = Shared::new(Value::from("x is '{x}'"));
    let source = descriptions(&[("x", Value::from("X")), ("held", Value::Shared(handle.clone()))]);
    let engine = Substituter::new(&source);

    let result = engine.apply(&Value::from("{held}")).unwrap();
    let result = result.as_shared().unwrap();
    assert!(!result.ptr_eq(&handle));
    assert_eq!(result.get(), Value::from("x is 'X'"));
    // the original handle is untouched
    assert_eq!(handle.get(), Value::from("x is '{x}'"));
}

#[test]
fn excluded_container_passes_through_unexpanded() {
    let source = SelfHolding {
        container: Shared::new(Value::from("holds {self}")),
        descriptions: descriptions(&[("x", Value::from("X"))]),
    };
    let engine = Substituter::new(&source);

    let result = engine.apply(&Value::from("{self}")).unwrap();
    let result = result.as_shared().unwrap();
    assert!(result.ptr_eq(&source.container));
    assert_eq!(result.get(), Value::from("holds {self}"));
}

// =============================================================================
// Depth cap
// =============================================================================

#[test]
fn cyclic_descriptions_fail_fast() {
    let source = descriptions(&[("a", Value::from("{b}!")), ("b", Value::from("{a}!"))]);
    let engine = Substituter::new(&source);
    let result = engine.apply(&Value::from("{a}"));
    assert!(matches!(result, Err(SubstituteError::TooDeep { limit: 64 })));
}

#[test]
fn custom_depth_cap_is_honoured() {
    let source = descriptions(&[("a", Value::from("{a} deep"))]);
    let engine = Substituter::with_max_depth(&source, 8);
    let result = engine.apply(&Value::from("{a}"));
    assert!(matches!(result, Err(SubstituteError::TooDeep { limit: 8 })));
}

#[test]
fn self_replacing_description_reaches_a_fixed_point() {
    // "{a}" expanding to the text "{a}" changes nothing, so the rescan
    // stops instead of recursing.
    let source = descriptions(&[("a", Value::from("{a}"))]);
    let engine = Substituter::new(&source);
    let result = engine.apply(&Value::from("before {a} after")).unwrap();
    assert_eq!(result, Value::from("before {a} after"));
}
