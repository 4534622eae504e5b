//! Equality
//!
//! Loose equality converts operands toward a common ground (booleans
//! win, then numbers, with text classified through its numeric form);
//! strict equality demands the same type class first.  The three text
//! representations are one type class: strict equality between them
//! compares byte content.

use crate::engine::classify::{classify, NumberKind};
use crate::engine::Engine;
use crate::value::{Array, ObjectRef, Value};

impl Engine {
    /// Loose equality (`==`)
    pub fn equal(&self, x: &Value, y: &Value) -> bool {
        let x = x.dereferenced();
        let y = y.dereferenced();
        match (&x, &y) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(_), _) | (_, Value::Bool(_)) => self.to_bool(&x) == self.to_bool(&y),
            (Value::Null, other) | (other, Value::Null) => null_equals(other),
            (Value::Array(a), Value::Array(b)) => self.arrays_equal(a, b),
            (Value::Array(_), _) | (_, Value::Array(_)) => false,
            (Value::Object(a), Value::Object(b)) => self.objects_equal(a, b),
            (Value::Object(_), _) | (_, Value::Object(_)) => false,
            _ if x.is_string_like() && y.is_string_like() => self.texts_equal(&x, &y),
            // at least one numeric operand: compare numerically, text
            // through its numeric prefix
            _ => numbers_equal(&x, &y),
        }
    }

    /// Strict equality (`===`): same type class, same value.  `Int` and
    /// `Long` are distinct classes even when the values coincide.
    pub fn strict_equal(&self, x: &Value, y: &Value) -> bool {
        let x = x.dereferenced();
        let y = y.dereferenced();
        match (&x, &y) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => self.arrays_strict_equal(a, b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ if x.is_string_like() && y.is_string_like() => {
                text_bytes(&x) == text_bytes(&y)
            }
            _ => false,
        }
    }

    fn texts_equal(&self, x: &Value, y: &Value) -> bool {
        let ix = classify(x);
        let iy = classify(y);
        if ix.is_whole_number && iy.is_whole_number {
            if ix.kind == NumberKind::Double || iy.kind == NumberKind::Double {
                return ix.double == iy.double;
            }
            return ix.long == iy.long;
        }
        text_bytes(x) == text_bytes(y)
    }

    /// Loose array equality: same size, same keys, values pairwise
    /// loosely equal.  Order does not matter.
    fn arrays_equal(&self, a: &Array, b: &Array) -> bool {
        if a.shares_backing(b) {
            return true;
        }
        if a.len() != b.len() {
            return false;
        }
        a.entries()
            .iter()
            .all(|(k, v)| matches!(b.get(k), Some(w) if self.equal(v, &w.dereferenced())))
    }

    /// Strict array equality: same entries in the same order, values
    /// pairwise strictly equal
    fn arrays_strict_equal(&self, a: &Array, b: &Array) -> bool {
        if a.shares_backing(b) {
            return true;
        }
        let ea = a.entries();
        let eb = b.entries();
        ea.len() == eb.len()
            && ea
                .iter()
                .zip(&eb)
                .all(|((ka, va), (kb, vb))| ka == kb && self.strict_equal(va, vb))
    }

    /// Loose object equality: same class, set fields pairwise loosely
    /// equal
    fn objects_equal(&self, a: &ObjectRef, b: &ObjectRef) -> bool {
        if a.ptr_eq(b) {
            return true;
        }
        if a.class_name() != b.class_name() {
            return false;
        }
        let fa = a.fields_snapshot();
        let fb = b.fields_snapshot();
        fa.len() == fb.len()
            && fa.iter().all(|(name, v)| {
                fb.iter()
                    .any(|(other, w)| name == other && self.equal(v, w))
            })
    }
}

fn null_equals(other: &Value) -> bool {
    match other {
        Value::Int(i) => *i == 0,
        Value::Long(l) => *l == 0,
        Value::Double(d) => *d == 0.0,
        // only the truly empty string, not "0"
        Value::Str(s) => s.is_empty(),
        Value::Buf(b) => b.is_empty(),
        Value::Bytes(b) => b.is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

fn numbers_equal(x: &Value, y: &Value) -> bool {
    let ix = classify(x);
    let iy = classify(y);
    if ix.kind == NumberKind::Double || iy.kind == NumberKind::Double {
        return ix.double == iy.double;
    }
    ix.long == iy.long
}

fn text_bytes(v: &Value) -> Option<Vec<u8>> {
    match v {
        Value::Str(s) => Some(s.as_bytes().to_vec()),
        Value::Buf(b) => Some(b.with_str(|s| s.as_bytes().to_vec())),
        Value::Bytes(b) => Some(b.to_vec()),
        _ => None,
    }
}
