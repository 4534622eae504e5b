//! Numeric classification
//!
//! Every binary numeric operator starts by classifying its operands:
//! what numeric kind the value maps to and what it is worth in each of
//! the three numeric representations.  Classification never reports;
//! the operator decides whether an array or object operand is an error.

use crate::engine::convert::parse_str_number;
use crate::value::Value;

/// The numeric kind a value classifies as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Int,
    Long,
    Double,
}

/// Classification result: the kind plus the value in all three numeric
/// representations (the unused ones are truncations)
#[derive(Debug, Clone, Copy)]
pub struct NumberInfo {
    pub kind: NumberKind,
    pub int: i32,
    pub long: i64,
    pub double: f64,
    /// Operand was an array
    pub is_array: bool,
    /// Operand was an object; `long` carries the fallback `1`
    pub unconvertible: bool,
    /// The operand was a number, or text that is a number in its
    /// entirety (not merely a numeric prefix)
    pub is_whole_number: bool,
}

impl NumberInfo {
    pub fn from_int(i: i32) -> Self {
        NumberInfo {
            kind: NumberKind::Int,
            int: i,
            long: i as i64,
            double: i as f64,
            is_array: false,
            unconvertible: false,
            is_whole_number: true,
        }
    }

    pub fn from_long(l: i64) -> Self {
        NumberInfo {
            kind: NumberKind::Long,
            int: l as i32,
            long: l,
            double: l as f64,
            is_array: false,
            unconvertible: false,
            is_whole_number: true,
        }
    }

    pub fn from_double(d: f64) -> Self {
        NumberInfo {
            kind: NumberKind::Double,
            int: d as i32,
            long: d as i64,
            double: d,
            is_array: false,
            unconvertible: false,
            is_whole_number: true,
        }
    }
}

/// Classify a value for numeric use.  `Ref` operands are dereferenced
/// first by the caller.
pub fn classify(value: &Value) -> NumberInfo {
    match value {
        Value::Null => NumberInfo {
            is_whole_number: false,
            ..NumberInfo::from_int(0)
        },
        Value::Bool(b) => NumberInfo::from_int(*b as i32),
        Value::Int(i) => NumberInfo::from_int(*i),
        Value::Long(l) => NumberInfo::from_long(*l),
        Value::Double(d) => NumberInfo::from_double(*d),
        Value::Str(s) => parse_str_number(s),
        Value::Buf(b) => b.with_str(parse_str_number),
        Value::Bytes(b) => b.with_bytes(|bytes| {
            parse_str_number(&String::from_utf8_lossy(bytes))
        }),
        Value::Array(_) => NumberInfo {
            is_array: true,
            is_whole_number: false,
            ..NumberInfo::from_int(0)
        },
        Value::Object(_) => NumberInfo {
            unconvertible: true,
            is_whole_number: false,
            ..NumberInfo::from_long(1)
        },
        Value::Ref(r) => classify(&r.get()),
    }
}
