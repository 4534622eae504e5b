//! Increment and decrement
//!
//! The fast integer paths promote on overflow (`Int::MAX + 1` becomes
//! `Long`, `Long::MAX + 1` becomes `Double`) but never narrow.  Text
//! that is a number in its entirety increments numerically; other text
//! increments spreadsheet-style, column-wise from the right with carry.
//! Decrement is asymmetric: null decrements to null and non-numeric
//! text is left unchanged.

use crate::engine::classify::{classify, NumberKind};
use crate::engine::errors::DiagnosticKind;
use crate::engine::Engine;
use crate::value::Value;

impl Engine {
    pub fn increment(&mut self, x: &Value) -> Value {
        let x = x.dereferenced();
        match &x {
            Value::Null => Value::Int(1),
            Value::Bool(_) => x.clone(),
            Value::Int(i) => increment_int(*i),
            Value::Long(l) => increment_long(*l),
            Value::Double(d) => Value::Double(d + 1.0),
            Value::Str(s) => self.increment_textual(s, &x),
            Value::Buf(b) => {
                let s = b.to_owned_string();
                self.increment_textual(&s, &x)
            }
            Value::Bytes(b) => {
                let s = b.with_bytes(|bytes| String::from_utf8_lossy(bytes).into_owned());
                match classify(&x) {
                    info if info.is_whole_number => self.increment(&numeric_of(&x)),
                    _ => Value::bytes(increment_text(&s).into_bytes()),
                }
            }
            Value::Array(_) | Value::Object(_) => {
                self.report(DiagnosticKind::UnsupportedOperandTypes {
                    operation: "increment",
                    operand: x.type_name(),
                });
                Value::Int(0)
            }
            Value::Ref(_) => unreachable!("dereferenced above"),
        }
    }

    fn increment_textual(&mut self, s: &str, original: &Value) -> Value {
        let info = classify(original);
        if info.is_whole_number {
            return match info.kind {
                NumberKind::Int => increment_int(info.int),
                NumberKind::Long => increment_long(info.long),
                NumberKind::Double => Value::Double(info.double + 1.0),
            };
        }
        Value::str(increment_text(s))
    }

    pub fn decrement(&mut self, x: &Value) -> Value {
        let x = x.dereferenced();
        match &x {
            // unlike increment, null is left alone
            Value::Null => Value::Null,
            Value::Bool(_) => x.clone(),
            Value::Int(i) => decrement_int(*i),
            Value::Long(l) => decrement_long(*l),
            Value::Double(d) => Value::Double(d - 1.0),
            Value::Str(_) | Value::Buf(_) | Value::Bytes(_) => {
                let info = classify(&x);
                if !info.is_whole_number {
                    // non-numeric text does not decrement
                    return x.clone();
                }
                match info.kind {
                    NumberKind::Int => decrement_int(info.int),
                    NumberKind::Long => decrement_long(info.long),
                    NumberKind::Double => Value::Double(info.double - 1.0),
                }
            }
            Value::Array(_) | Value::Object(_) => {
                self.report(DiagnosticKind::UnsupportedOperandTypes {
                    operation: "decrement",
                    operand: x.type_name(),
                });
                Value::Int(0)
            }
            Value::Ref(_) => unreachable!("dereferenced above"),
        }
    }
}

#[inline]
fn increment_int(i: i32) -> Value {
    if i == i32::MAX {
        Value::Long(i32::MAX as i64 + 1)
    } else {
        Value::Int(i + 1)
    }
}

#[inline]
fn increment_long(l: i64) -> Value {
    if l == i64::MAX {
        Value::Double(i64::MAX as f64 + 1.0)
    } else {
        Value::Long(l + 1)
    }
}

#[inline]
fn decrement_int(i: i32) -> Value {
    if i == i32::MIN {
        Value::Long(i32::MIN as i64 - 1)
    } else {
        Value::Int(i - 1)
    }
}

#[inline]
fn decrement_long(l: i64) -> Value {
    if l == i64::MIN {
        Value::Double(i64::MIN as f64 - 1.0)
    } else {
        Value::Long(l - 1)
    }
}

fn numeric_of(x: &Value) -> Value {
    let info = classify(x);
    match info.kind {
        NumberKind::Int => Value::Int(info.int),
        NumberKind::Long => Value::Long(info.long),
        NumberKind::Double => Value::Double(info.double),
    }
}

/// Column-wise text increment: digits and letters carry rightmost-first
/// (`"a9" → "b0"`, `"Az" → "Ba"`, `"zz" → "aaa"`); a character outside
/// those ranges absorbs the carry and ends the walk.
pub(crate) fn increment_text(s: &str) -> String {
    if s.is_empty() {
        return "1".to_string();
    }
    let mut chars: Vec<char> = s.chars().collect();
    let mut pos = chars.len();
    loop {
        if pos == 0 {
            // carried off the left edge: prepend per the last column class
            let head = match chars[0] {
                '0'..='9' => '1',
                'a'..='z' => 'a',
                _ => 'A',
            };
            chars.insert(0, head);
            break;
        }
        pos -= 1;
        match chars[pos] {
            c @ ('0'..='8' | 'a'..='y' | 'A'..='Y') => {
                chars[pos] = (c as u8 + 1) as char;
                break;
            }
            '9' => chars[pos] = '0',
            'z' => chars[pos] = 'a',
            'Z' => chars[pos] = 'A',
            _ => break,
        }
    }
    chars.into_iter().collect()
}
