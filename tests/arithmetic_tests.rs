// Numeric operator semantics: promotion ladder, narrowing, overflow

use phlox::engine::{Engine, Severity};
use phlox::value::{Array, ArrayKey, Value};

fn assert_int(v: &Value, expected: i32) {
    match v {
        Value::Int(i) => assert_eq!(*i, expected),
        other => panic!("expected Int({expected}), got {other:?}"),
    }
}

fn assert_long(v: &Value, expected: i64) {
    match v {
        Value::Long(l) => assert_eq!(*l, expected),
        other => panic!("expected Long({expected}), got {other:?}"),
    }
}

fn assert_double(v: &Value, expected: f64) {
    match v {
        Value::Double(d) => assert_eq!(*d, expected),
        other => panic!("expected Double({expected}), got {other:?}"),
    }
}

#[test]
fn test_add_narrows_to_int() {
    let mut engine = Engine::new();
    assert_int(&engine.add(&Value::Int(1), &Value::Int(2)), 3);
    // 64-bit operands narrow when the result fits 32 bits
    assert_int(&engine.add(&Value::Long(2), &Value::Long(3)), 5);
    assert!(engine.diagnostics().is_empty());
}

#[test]
fn test_add_promotes_on_overflow() {
    let mut engine = Engine::new();
    assert_long(
        &engine.add(&Value::Int(i32::MAX), &Value::Int(1)),
        i32::MAX as i64 + 1,
    );
    // 64-bit overflow promotes to doubles instead of wrapping
    match engine.add(&Value::Long(i64::MAX), &Value::Long(1)) {
        Value::Double(d) => assert!(d > 9.2e18),
        other => panic!("expected Double, got {other:?}"),
    }
}

#[test]
fn test_add_int_fast_path() {
    let engine = Engine::new();
    assert_int(&engine.add_int(40, 2), 42);
    assert_long(&engine.add_int(i32::MAX, 1), i32::MAX as i64 + 1);
    assert_long(&engine.add_int(i32::MIN, -1), i32::MIN as i64 - 1);
}

#[test]
fn test_add_parses_text_operands() {
    let mut engine = Engine::new();
    assert_int(&engine.add(&Value::str("5"), &Value::str("10")), 15);
    assert_double(&engine.add(&Value::str("3.5"), &Value::Int(1)), 4.5);
    // only the numeric prefix counts
    assert_int(&engine.add(&Value::str("5abc"), &Value::Int(1)), 6);
    assert_int(&engine.add(&Value::str("abc"), &Value::Int(1)), 1);
    assert_int(&engine.add(&Value::Null, &Value::Bool(true)), 1);
}

#[test]
fn test_add_unites_arrays() {
    let mut engine = Engine::new();
    let mut a = Array::new();
    a.set(ArrayKey::Int(0), Value::Int(1));
    let mut b = Array::new();
    b.set(ArrayKey::Int(0), Value::Int(9));
    b.set(ArrayKey::Int(1), Value::Int(2));

    let united = engine.add(&Value::Array(a.clone()), &Value::Array(b));
    let Value::Array(u) = united else {
        panic!("expected Array");
    };
    // left operand wins on collision
    assert_int(&u.get(&ArrayKey::Int(0)).unwrap(), 1);
    assert_int(&u.get(&ArrayKey::Int(1)).unwrap(), 2);
    // the left operand itself is untouched
    assert_eq!(a.len(), 1);
}

#[test]
fn test_add_array_to_scalar_reports() {
    let mut engine = Engine::new();
    let result = engine.add(&Value::Array(Array::new()), &Value::Int(1));
    assert_int(&result, 0);
    assert_eq!(engine.diagnostics().len(), 1);
    assert_eq!(engine.diagnostics()[0].severity(), Severity::Error);
}

#[test]
fn test_subtract_overflow() {
    let mut engine = Engine::new();
    assert_int(&engine.subtract(&Value::Int(5), &Value::Int(7)), -2);
    match engine.subtract(&Value::Long(i64::MIN), &Value::Long(1)) {
        Value::Double(d) => assert!(d < -9.2e18),
        other => panic!("expected Double, got {other:?}"),
    }
}

#[test]
fn test_multiply() {
    let mut engine = Engine::new();
    assert_int(&engine.multiply(&Value::Int(1000), &Value::Int(1000)), 1_000_000);
    assert_long(
        &engine.multiply(&Value::Int(1 << 20), &Value::Int(1 << 20)),
        1 << 40,
    );
    assert_long(
        &engine.multiply(&Value::Long(3_000_000_000), &Value::Long(3)),
        9_000_000_000,
    );
    match engine.multiply(&Value::Long(4_000_000_000), &Value::Long(4_000_000_000)) {
        Value::Double(d) => assert_eq!(d, 1.6e19),
        other => panic!("expected Double, got {other:?}"),
    }
}

#[test]
fn test_divide_exactness() {
    let mut engine = Engine::new();
    // exact quotient stays integral
    assert_int(&engine.divide(&Value::Int(10), &Value::Int(2)), 5);
    // inexact quotient promotes
    assert_double(&engine.divide(&Value::Int(7), &Value::Int(2)), 3.5);
    assert_double(&engine.divide(&Value::Double(1.0), &Value::Int(4)), 0.25);
}

#[test]
fn test_divide_by_zero() {
    let mut engine = Engine::new();
    let result = engine.divide(&Value::Int(1), &Value::Int(0));
    assert!(matches!(result, Value::Bool(false)));
    let diags = engine.take_diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].severity(), Severity::Warning);

    // the float path follows IEEE: no report, infinite quotient
    assert_double(&engine.divide(&Value::Double(1.0), &Value::Double(0.0)), f64::INFINITY);
    assert_double(&engine.divide(&Value::Double(-1.0), &Value::Double(0.0)), f64::NEG_INFINITY);
    match engine.divide(&Value::Double(0.0), &Value::Double(0.0)) {
        Value::Double(d) => assert!(d.is_nan()),
        other => panic!("expected Double, got {other:?}"),
    }
    assert!(engine.diagnostics().is_empty());
}

#[test]
fn test_divide_min_by_minus_one() {
    let mut engine = Engine::new();
    assert_double(
        &engine.divide(&Value::Long(i64::MIN), &Value::Long(-1)),
        -(i64::MIN as f64),
    );
}

#[test]
fn test_remainder() {
    let mut engine = Engine::new();
    assert_int(&engine.remainder(&Value::Int(7), &Value::Int(3)), 1);
    assert_int(&engine.remainder(&Value::Int(-7), &Value::Int(3)), -1);
    // modulo -1 short-circuits (hardware would fault on i64::MIN)
    assert_int(&engine.remainder(&Value::Long(i64::MIN), &Value::Int(-1)), 0);
    // doubles are taken at integral width
    assert_int(&engine.remainder(&Value::Double(7.9), &Value::Int(3)), 1);

    let result = engine.remainder(&Value::Int(7), &Value::Int(0));
    assert!(matches!(result, Value::Bool(false)));
    assert_eq!(engine.take_diagnostics().len(), 1);
}

#[test]
fn test_minus_promotions() {
    let mut engine = Engine::new();
    assert_int(&engine.minus(&Value::Int(5)), -5);
    assert_long(&engine.minus(&Value::Int(i32::MIN)), -(i32::MIN as i64));
    // the one long that negates back into 32-bit range narrows
    assert_int(&engine.minus(&Value::Long(-(i32::MIN as i64))), i32::MIN);
    // other longs keep their width
    assert_long(&engine.minus(&Value::Long(5)), -5);
    assert_double(&engine.minus(&Value::Long(i64::MIN)), -(i64::MIN as f64));
    assert_int(&engine.minus(&Value::str("3")), -3);
}

#[test]
fn test_unary_plus_coerces_without_negating() {
    let mut engine = Engine::new();
    assert_long(&engine.plus(&Value::Long(5)), 5);
    assert_int(&engine.plus(&Value::str("12abc")), 12);
    assert_double(&engine.plus(&Value::str("1.5")), 1.5);
    assert_int(&engine.plus(&Value::Bool(true)), 1);
}

#[test]
fn test_shifts() {
    let mut engine = Engine::new();
    assert_int(&engine.shift_left(&Value::Int(1), &Value::Int(4)), 16);
    assert_long(&engine.shift_left(&Value::Int(1), &Value::Int(33)), 1 << 33);
    assert_int(&engine.shift_right(&Value::Int(-16), &Value::Int(2)), -4);
    // counts are taken modulo 64
    assert_int(&engine.shift_left(&Value::Int(1), &Value::Int(64)), 1);
}
