// Array access protocol: vivification, chains, copy-on-write, unset

use phlox::engine::{AccessKind, DiagnosticKind, Engine, Severity};
use phlox::value::{Array, ArrayKey, Reference, Value};

fn assert_int(v: &Value, expected: i32) {
    match v {
        Value::Int(i) => assert_eq!(*i, expected),
        other => panic!("expected Int({expected}), got {other:?}"),
    }
}

fn array_of(v: &Value) -> Array {
    match v {
        Value::Array(a) => a.clone(),
        other => panic!("expected Array, got {other:?}"),
    }
}

#[test]
fn test_write_chain_vivifies_null() {
    let mut engine = Engine::new();
    let slot = Reference::new(Value::Null);
    let step = engine.ensure_array(&slot).expect("vivified");
    engine.set_item(step, Some(&Value::str("x")), Value::Int(1));

    let a = array_of(&slot.get());
    assert_int(&a.get(&ArrayKey::from("x")).unwrap(), 1);
    assert!(engine.diagnostics().is_empty());
}

#[test]
fn test_vivification_replaces_empty_values_only() {
    let mut engine = Engine::new();
    // false, 0 and "" vivify
    for empty in [Value::Bool(false), Value::Int(0), Value::str("")] {
        let slot = Reference::new(empty);
        let step = engine.ensure_array(&slot).expect("vivified");
        engine.set_item(step, Some(&Value::Int(0)), Value::Int(7));
        assert_int(&array_of(&slot.get()).get(&ArrayKey::Int(0)).unwrap(), 7);
    }
    // "0" does not: it becomes a string offset write
    let slot = Reference::new(Value::str("0"));
    let step = engine.ensure_array(&slot).expect("string view");
    engine.set_item(step, Some(&Value::Int(0)), Value::str("x"));
    match slot.get() {
        Value::Buf(b) => assert_eq!(b.to_owned_string(), "x"),
        other => panic!("expected Buf, got {other:?}"),
    }
}

#[test]
fn test_nested_write_chain() {
    let mut engine = Engine::new();
    let slot = Reference::new(Value::Null);
    let step = engine.ensure_array(&slot).expect("outer");
    let step = engine
        .ensure_item_is_array(step, Some(&Value::Int(1)))
        .expect("inner");
    engine.set_item(step, Some(&Value::Int(2)), Value::Int(5));

    let outer = array_of(&slot.get());
    let inner = array_of(&outer.get(&ArrayKey::Int(1)).unwrap());
    assert_int(&inner.get(&ArrayKey::Int(2)).unwrap(), 5);
}

#[test]
fn test_vivification_is_idempotent() {
    let mut engine = Engine::new();
    let slot = Reference::new(Value::Null);
    for _ in 0..2 {
        let step = engine.ensure_array(&slot).expect("array");
        let step = engine
            .ensure_item_is_array(step, Some(&Value::str("k")))
            .expect("nested");
        engine.set_item(step, Some(&Value::Int(0)), Value::Int(9));
    }
    let outer = array_of(&slot.get());
    assert_eq!(outer.len(), 1);
    let inner = array_of(&outer.get(&ArrayKey::from("k")).unwrap());
    assert_eq!(inner.len(), 1);
}

#[test]
fn test_append_form() {
    let mut engine = Engine::new();
    let slot = Reference::new(Value::Null);
    for n in [10, 20] {
        let step = engine.ensure_array(&slot).expect("array");
        engine.set_item(step, None, Value::Int(n));
    }
    let a = array_of(&slot.get());
    assert_int(&a.get(&ArrayKey::Int(0)).unwrap(), 10);
    assert_int(&a.get(&ArrayKey::Int(1)).unwrap(), 20);
}

#[test]
fn test_append_past_max_key_reports() {
    let mut engine = Engine::new();
    let slot = Reference::new(Value::Null);
    let step = engine.ensure_array(&slot).expect("array");
    engine.set_item(step, Some(&Value::Long(i64::MAX)), Value::Int(1));

    let step = engine.ensure_array(&slot).expect("array");
    engine.set_item(step, None, Value::Int(2));
    let diags = engine.take_diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, DiagnosticKind::IntegerKeyMaxReached);
    assert_eq!(array_of(&slot.get()).len(), 1);
}

#[test]
fn test_chain_write_respects_assignment_copies() {
    let mut engine = Engine::new();
    let slot = Reference::new(Value::Null);
    let step = engine.ensure_array(&slot).expect("array");
    engine.set_item(step, Some(&Value::Int(0)), Value::Int(1));

    // copy out, then write through the original slot
    let copy = slot.get().clone_for_assignment();
    let step = engine.ensure_array(&slot).expect("array");
    engine.set_item(step, Some(&Value::Int(0)), Value::Int(2));

    assert_int(&array_of(&slot.get()).get(&ArrayKey::Int(0)).unwrap(), 2);
    assert_int(&array_of(&copy).get(&ArrayKey::Int(0)).unwrap(), 1);
}

#[test]
fn test_get_item_read_modes() {
    let mut engine = Engine::new();
    let mut a = Array::new();
    a.set(ArrayKey::Int(0), Value::Int(1));
    let base = Value::Array(a);

    assert_int(&engine.get_item(&base, &Value::Int(0), AccessKind::Read), 1);
    assert!(engine.diagnostics().is_empty());

    // absent key: notice in plain reads, silent otherwise
    let v = engine.get_item(&base, &Value::Int(9), AccessKind::Read);
    assert!(v.is_null());
    let diags = engine.take_diagnostics();
    assert_eq!(diags[0].severity(), Severity::Notice);

    let v = engine.get_item(&base, &Value::Int(9), AccessKind::Quiet);
    assert!(v.is_null());
    assert!(engine.diagnostics().is_empty());
}

#[test]
fn test_get_item_on_scalar_is_silent_null() {
    let mut engine = Engine::new();
    for base in [Value::Null, Value::Int(5), Value::Bool(true), Value::Double(1.5)] {
        let v = engine.get_item(&base, &Value::Int(0), AccessKind::Read);
        assert!(v.is_null());
    }
    assert!(engine.diagnostics().is_empty());
}

#[test]
fn test_key_canonicalization_unifies_lookups() {
    let mut engine = Engine::new();
    let slot = Reference::new(Value::Null);
    let step = engine.ensure_array(&slot).expect("array");
    engine.set_item(step, Some(&Value::str("8")), Value::Int(1));

    let base = slot.get();
    // integer 8 and text "8" are the same key
    assert_int(&engine.get_item(&base, &Value::Int(8), AccessKind::Read), 1);
    // "08" is not
    let v = engine.get_item(&base, &Value::str("08"), AccessKind::Quiet);
    assert!(v.is_null());
}

#[test]
fn test_illegal_key_reports() {
    let mut engine = Engine::new();
    let mut a = Array::new();
    a.set(ArrayKey::Int(0), Value::Int(1));
    let base = Value::Array(a);
    let v = engine.get_item(&base, &Value::Array(Array::new()), AccessKind::Read);
    assert!(v.is_null());
    let diags = engine.take_diagnostics();
    assert_eq!(diags.len(), 1);
    assert!(matches!(diags[0].kind, DiagnosticKind::IllegalOffsetType { .. }));
}

#[test]
fn test_get_item_ref_aliases_element() {
    let mut engine = Engine::new();
    let slot = Reference::new(Value::Null);
    let r = engine.get_item_ref(&slot, Some(&Value::Int(0)));
    r.set(Value::Int(9));

    let a = array_of(&slot.get());
    assert_int(&a.get(&ArrayKey::Int(0)).unwrap().dereferenced(), 9);

    // and the alias sees writes made through the array
    let step = engine.ensure_array(&slot).expect("array");
    engine.set_item(step, Some(&Value::Int(0)), Value::Int(10));
    assert_int(&r.get(), 10);
}

#[test]
fn test_unset_item() {
    let mut engine = Engine::new();
    let mut a = Array::new();
    a.set(ArrayKey::Int(0), Value::Int(1));
    a.set(ArrayKey::Int(1), Value::Int(2));
    let mut base = Value::Array(a);

    engine.unset_item(&mut base, &Value::Int(0));
    let a = array_of(&base);
    assert_eq!(a.len(), 1);
    assert!(a.get(&ArrayKey::Int(0)).is_none());

    // unsetting on an empty value is a no-op
    let mut null_base = Value::Null;
    engine.unset_item(&mut null_base, &Value::Int(0));
    assert!(engine.diagnostics().is_empty());

    // string offsets cannot be unset
    let mut text = Value::str("abc");
    engine.unset_item(&mut text, &Value::Int(0));
    let diags = engine.take_diagnostics();
    assert_eq!(diags[0].kind, DiagnosticKind::CannotUnsetStringOffset);
}

#[test]
fn test_misused_scalar_aborts_chain_and_recovers() {
    let mut engine = Engine::new();
    let slot = Reference::new(Value::Int(5));
    assert!(engine.ensure_array(&slot).is_none());
    let diags = engine.take_diagnostics();
    assert!(matches!(
        diags[0].kind,
        DiagnosticKind::VariableMisusedAsArray { found: "int" }
    ));
    // the slot is untouched and the engine keeps working
    assert_int(&slot.get(), 5);
    assert_int(&engine.add(&slot.get(), &Value::Int(1)), 6);
}

#[test]
fn test_set_item_ref_binds_existing_cell() {
    let mut engine = Engine::new();
    let shared = Reference::new(Value::Int(1));
    let slot = Reference::new(Value::Null);
    engine.set_item_ref(&slot, Some(&Value::Int(0)), shared.clone());

    // the element and the outside cell are the same storage
    shared.set(Value::Int(2));
    let a = array_of(&slot.get());
    assert_int(&a.get(&ArrayKey::Int(0)).unwrap().dereferenced(), 2);

    let step = engine.ensure_array(&slot).expect("array");
    engine.set_item(step, Some(&Value::Int(0)), Value::Int(3));
    assert_int(&shared.get(), 3);
}

#[test]
fn test_element_reference_survives_chain_writes() {
    let mut engine = Engine::new();
    let slot = Reference::new(Value::Null);
    let r = engine.get_item_ref(&slot, Some(&Value::str("k")));
    r.set(Value::Int(1));

    // writing the same key through a chain goes through the wrapper
    let step = engine.ensure_array(&slot).expect("array");
    engine.set_item(step, Some(&Value::str("k")), Value::Int(2));
    assert_int(&r.get(), 2);
}
