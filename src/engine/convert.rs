//! Conversions between value categories
//!
//! The numeric-prefix scanner for text, the double formatter, and the
//! engine's conversion methods.  Conversions that can report (array and
//! object fallbacks, illegal key types) are methods on
//! [`Engine`]; pure helpers are free functions.

use std::rc::Rc;

use crate::engine::classify::{classify, NumberInfo};
use crate::engine::errors::DiagnosticKind;
use crate::engine::Engine;
use crate::value::{ArrayKey, Value};

/// Scan the longest numeric prefix of `s`.
///
/// Leading ASCII whitespace and a sign are accepted; an integer prefix
/// accumulates into an `i64` and falls over to double on overflow; a
/// fraction or exponent makes the prefix a double.  Text with no
/// numeric prefix classifies as integer zero.
pub(crate) fn parse_str_number(s: &str) -> NumberInfo {
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut i = 0;
    while i < len && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    let start = i;

    let mut negative = false;
    if i < len && (bytes[i] == b'+' || bytes[i] == b'-') {
        negative = bytes[i] == b'-';
        i += 1;
    }

    let mut long: i64 = 0;
    let mut overflow = false;
    let mut saw_digits = false;
    while i < len && bytes[i].is_ascii_digit() {
        saw_digits = true;
        if !overflow {
            let d = (bytes[i] - b'0') as i64;
            let next = if negative {
                long.checked_mul(10).and_then(|v| v.checked_sub(d))
            } else {
                long.checked_mul(10).and_then(|v| v.checked_add(d))
            };
            match next {
                Some(v) => long = v,
                None => overflow = true,
            }
        }
        i += 1;
    }

    let mut is_double = overflow;
    if i < len && bytes[i] == b'.' {
        let frac_digit = i + 1 < len && bytes[i + 1].is_ascii_digit();
        if saw_digits || frac_digit {
            is_double = true;
            i += 1;
            while i < len && bytes[i].is_ascii_digit() {
                saw_digits = true;
                i += 1;
            }
        }
    }

    if saw_digits && i < len && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < len && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < len && bytes[j].is_ascii_digit() {
            is_double = true;
            i = j;
            while i < len && bytes[i].is_ascii_digit() {
                i += 1;
            }
        }
    }

    if !saw_digits {
        return NumberInfo {
            is_whole_number: false,
            ..NumberInfo::from_int(0)
        };
    }

    let whole = i == len;
    if is_double {
        let d = s[start..i].parse::<f64>().unwrap_or(0.0);
        return NumberInfo {
            is_whole_number: whole,
            ..NumberInfo::from_double(d)
        };
    }
    let info = if long == long as i32 as i64 {
        NumberInfo::from_int(long as i32)
    } else {
        NumberInfo::from_long(long)
    };
    NumberInfo {
        is_whole_number: whole,
        ..info
    }
}

/// Textual form of a double: shortest representation that round-trips,
/// with the non-finite spellings the language uses
pub(crate) fn fmt_double(d: f64) -> String {
    if d.is_nan() {
        return "NAN".to_string();
    }
    if d.is_infinite() {
        return if d > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    format!("{d}")
}

impl Engine {
    /// Truthiness.  Never reports: every value has a boolean form.
    pub fn to_bool(&self, value: &Value) -> bool {
        match value {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Long(l) => *l != 0,
            Value::Double(d) => *d != 0.0,
            Value::Str(s) => !s.is_empty() && &**s != "0",
            Value::Buf(b) => b.with_str(|s| !s.is_empty() && s != "0"),
            Value::Bytes(b) => b.with_bytes(|s| !s.is_empty() && s != b"0".as_slice()),
            Value::Array(a) => !a.is_empty(),
            Value::Object(_) => true,
            Value::Ref(r) => self.to_bool(&r.get()),
        }
    }

    /// 64-bit integral form.  Doubles truncate toward zero; text uses
    /// its numeric prefix; arrays collapse to emptiness; objects report
    /// and fall back to 1.
    pub fn to_long(&mut self, value: &Value) -> i64 {
        match value {
            Value::Null => 0,
            Value::Bool(b) => *b as i64,
            Value::Int(i) => *i as i64,
            Value::Long(l) => *l,
            Value::Double(d) => *d as i64,
            Value::Array(a) => !a.is_empty() as i64,
            Value::Object(o) => {
                self.report(DiagnosticKind::ObjectToNumberConversion {
                    class: o.class_name().to_string(),
                });
                1
            }
            Value::Ref(r) => self.to_long(&r.get()),
            text => classify(text).long,
        }
    }

    /// 32-bit integral form (the 64-bit form wrapped)
    pub fn to_int(&mut self, value: &Value) -> i32 {
        self.to_long(value) as i32
    }

    /// Floating form
    pub fn to_double(&mut self, value: &Value) -> f64 {
        match value {
            Value::Null => 0.0,
            Value::Bool(b) => *b as i32 as f64,
            Value::Int(i) => *i as f64,
            Value::Long(l) => *l as f64,
            Value::Double(d) => *d,
            Value::Array(a) => !a.is_empty() as i32 as f64,
            Value::Object(o) => {
                self.report(DiagnosticKind::ObjectToNumberConversion {
                    class: o.class_name().to_string(),
                });
                1.0
            }
            Value::Ref(r) => self.to_double(&r.get()),
            text => classify(text).double,
        }
    }

    /// Textual form.  Arrays flatten to `"Array"` with a notice; an
    /// object with no string form reports and flattens to `""`.
    pub fn stringify(&mut self, value: &Value) -> String {
        match value {
            Value::Null => String::new(),
            Value::Bool(b) => if *b { "1" } else { "" }.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Long(l) => l.to_string(),
            Value::Double(d) => fmt_double(*d),
            Value::Str(s) => s.to_string(),
            Value::Buf(b) => b.to_owned_string(),
            Value::Bytes(b) => b.with_bytes(|s| String::from_utf8_lossy(s).into_owned()),
            Value::Array(_) => {
                self.report(DiagnosticKind::ArrayToStringConversion);
                "Array".to_string()
            }
            Value::Object(o) => {
                self.report(DiagnosticKind::ObjectToStringConversion {
                    class: o.class_name().to_string(),
                });
                String::new()
            }
            Value::Ref(r) => self.stringify(&r.get()),
        }
    }

    /// Byte form; like [`Engine::stringify`] but lossless for `Bytes`
    pub fn to_byte_vec(&mut self, value: &Value) -> Vec<u8> {
        match value {
            Value::Bytes(b) => b.to_vec(),
            Value::Ref(r) => self.to_byte_vec(&r.get()),
            other => self.stringify(other).into_bytes(),
        }
    }

    /// Canonical array key for `value`, or `None` (with a report) for a
    /// value that cannot key an array
    pub fn to_array_key(&mut self, value: &Value) -> Option<ArrayKey> {
        match value {
            Value::Null => Some(ArrayKey::Str(Rc::from(""))),
            Value::Bool(b) => Some(ArrayKey::Int(*b as i64)),
            Value::Int(i) => Some(ArrayKey::Int(*i as i64)),
            Value::Long(l) => Some(ArrayKey::Int(*l)),
            Value::Double(d) => Some(ArrayKey::Int(*d as i64)),
            Value::Str(s) => Some(ArrayKey::canonical_from_str(s)),
            Value::Buf(b) => Some(b.with_str(ArrayKey::canonical_from_str)),
            Value::Bytes(b) => Some(b.with_bytes(|s| {
                ArrayKey::canonical_from_str(&String::from_utf8_lossy(s))
            })),
            Value::Array(_) | Value::Object(_) => {
                self.report(DiagnosticKind::IllegalOffsetType {
                    found: value.type_name(),
                });
                None
            }
            Value::Ref(r) => self.to_array_key(&r.get()),
        }
    }
}
