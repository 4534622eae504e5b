// Loose and strict equality

use std::rc::Rc;

use phlox::engine::Engine;
use phlox::value::{Array, ArrayKey, ClassDef, ObjectRef, StrBuf, Value, Visibility};

#[test]
fn test_loose_numeric_text() {
    let engine = Engine::new();
    assert!(engine.equal(&Value::Int(5), &Value::str("5")));
    assert!(engine.equal(&Value::str("10"), &Value::str("1e1")));
    assert!(engine.equal(&Value::Double(100.0), &Value::str("1e2")));
    assert!(engine.equal(&Value::str("1"), &Value::str("01")));
    // non-numeric text classifies as zero
    assert!(engine.equal(&Value::str("abc"), &Value::Int(0)));
    // but two texts compare as text
    assert!(!engine.equal(&Value::str("abc"), &Value::str("abd")));
    assert!(engine.equal(&Value::str("abc"), &Value::str("abc")));
}

#[test]
fn test_loose_null() {
    let engine = Engine::new();
    assert!(engine.equal(&Value::Null, &Value::Null));
    assert!(engine.equal(&Value::Null, &Value::Int(0)));
    assert!(engine.equal(&Value::Null, &Value::str("")));
    assert!(engine.equal(&Value::Null, &Value::Bool(false)));
    assert!(engine.equal(&Value::Null, &Value::Array(Array::new())));
    // "0" is falsy but not equal to null
    assert!(!engine.equal(&Value::Null, &Value::str("0")));
}

#[test]
fn test_loose_bool_dominates() {
    let engine = Engine::new();
    assert!(engine.equal(&Value::Bool(true), &Value::Int(7)));
    assert!(engine.equal(&Value::Bool(false), &Value::str("0")));
    assert!(engine.equal(&Value::Bool(true), &Value::str("abc")));
    let mut a = Array::new();
    a.set(ArrayKey::Int(0), Value::Int(1));
    assert!(engine.equal(&Value::Bool(true), &Value::Array(a)));
}

#[test]
fn test_loose_arrays_ignore_order() {
    let engine = Engine::new();
    let mut a = Array::new();
    a.set(ArrayKey::from("x"), Value::Int(1));
    a.set(ArrayKey::from("y"), Value::Int(2));
    let mut b = Array::new();
    b.set(ArrayKey::from("y"), Value::str("2"));
    b.set(ArrayKey::from("x"), Value::Int(1));

    assert!(engine.equal(&Value::Array(a.clone()), &Value::Array(b.clone())));
    // strict equality demands order and exact types
    assert!(!engine.strict_equal(&Value::Array(a), &Value::Array(b)));
}

#[test]
fn test_strict_arrays() {
    let engine = Engine::new();
    let mut a = Array::new();
    a.set(ArrayKey::Int(0), Value::Int(1));
    a.set(ArrayKey::Int(1), Value::Int(2));
    let mut b = Array::new();
    b.set(ArrayKey::Int(0), Value::Int(1));
    b.set(ArrayKey::Int(1), Value::Int(2));
    assert!(engine.strict_equal(&Value::Array(a.clone()), &Value::Array(b)));

    let mut c = Array::new();
    c.set(ArrayKey::Int(1), Value::Int(2));
    c.set(ArrayKey::Int(0), Value::Int(1));
    assert!(!engine.strict_equal(&Value::Array(a), &Value::Array(c)));
}

#[test]
fn test_strict_integer_widths_are_distinct() {
    let engine = Engine::new();
    assert!(engine.equal(&Value::Int(5), &Value::Long(5)));
    assert!(!engine.strict_equal(&Value::Int(5), &Value::Long(5)));
    assert!(engine.equal(&Value::Int(1), &Value::Double(1.0)));
    assert!(!engine.strict_equal(&Value::Int(1), &Value::Double(1.0)));
    // numeric text is loosely but never strictly a number
    assert!(engine.equal(&Value::str("123"), &Value::Int(123)));
    assert!(!engine.strict_equal(&Value::str("123"), &Value::Int(123)));
    assert!(!engine.strict_equal(&Value::str("1.5"), &Value::Double(1.5)));
}

#[test]
fn test_strict_text_representations_are_one_class() {
    let engine = Engine::new();
    let s = Value::str("abc");
    let buf = Value::Buf(StrBuf::new("abc"));
    let bytes = Value::bytes(b"abc".to_vec());
    assert!(engine.strict_equal(&s, &buf));
    assert!(engine.strict_equal(&s, &bytes));
    assert!(engine.strict_equal(&buf, &bytes));
    assert!(!engine.strict_equal(&s, &Value::str("abd")));
}

#[test]
fn test_objects() {
    let engine = Engine::new();
    let class = Rc::new(
        ClassDef::new("Point")
            .with_property("x", Visibility::Public, Value::Int(0)),
    );
    let a = ObjectRef::new(Rc::clone(&class));
    let b = ObjectRef::new(class);

    // same class, same fields: loosely equal, not identical
    assert!(engine.equal(&Value::Object(a.clone()), &Value::Object(b.clone())));
    assert!(!engine.strict_equal(&Value::Object(a.clone()), &Value::Object(b.clone())));
    // identity
    assert!(engine.strict_equal(&Value::Object(a.clone()), &Value::Object(a.clone())));

    // diverge a field
    b.field_or_insert("x").set(Value::Int(9));
    assert!(!engine.equal(&Value::Object(a), &Value::Object(b)));
}

#[test]
fn test_nan_never_equals() {
    let engine = Engine::new();
    let nan = Value::Double(f64::NAN);
    assert!(!engine.equal(&nan, &nan));
    assert!(!engine.strict_equal(&nan, &nan));
}

#[test]
fn test_references_compare_through() {
    let engine = Engine::new();
    let r = Value::Ref(phlox::value::Reference::new(Value::Int(5)));
    assert!(engine.equal(&r, &Value::Int(5)));
    assert!(engine.strict_equal(&r, &Value::Int(5)));
}
