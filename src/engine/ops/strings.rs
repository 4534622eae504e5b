//! Concatenation
//!
//! Concatenation is text unless a byte buffer is involved, in which
//! case everything flattens to bytes and the result is a byte buffer.
//! The append form takes the slot's current value by move so a `Buf`
//! with a writable backing store can grow in place.

use crate::engine::Engine;
use crate::value::{StrBuf, Value};

impl Engine {
    /// Binary concatenation, producing an immutable result
    pub fn concat(&mut self, x: &Value, y: &Value) -> Value {
        let x = x.dereferenced();
        let y = y.dereferenced();
        if matches!(x, Value::Bytes(_)) || matches!(y, Value::Bytes(_)) {
            let mut out = self.to_byte_vec(&x);
            out.extend_from_slice(&self.to_byte_vec(&y));
            return Value::bytes(out);
        }
        let a = self.stringify(&x);
        let b = self.stringify(&y);
        let mut out = String::with_capacity(a.len() + b.len());
        out.push_str(&a);
        out.push_str(&b);
        Value::str(out)
    }

    /// Concatenation of two text operands (compiled fast path)
    #[inline]
    pub fn concat_str(&self, x: &str, y: &str) -> Value {
        let mut out = String::with_capacity(x.len() + y.len());
        out.push_str(x);
        out.push_str(y);
        Value::str(out)
    }

    /// N-ary concatenation, flattening each part once and presizing the
    /// output
    pub fn concat_many(&mut self, parts: &[Value]) -> Value {
        let any_bytes = parts
            .iter()
            .any(|p| matches!(p.dereferenced(), Value::Bytes(_)));
        if any_bytes {
            let flat: Vec<Vec<u8>> = parts
                .iter()
                .map(|p| self.to_byte_vec(&p.dereferenced()))
                .collect();
            let mut out = Vec::with_capacity(flat.iter().map(Vec::len).sum());
            for part in &flat {
                out.extend_from_slice(part);
            }
            return Value::bytes(out);
        }
        let flat: Vec<String> = parts
            .iter()
            .map(|p| self.stringify(&p.dereferenced()))
            .collect();
        let mut out = String::with_capacity(flat.iter().map(String::len).sum());
        for part in &flat {
            out.push_str(part);
        }
        Value::str(out)
    }

    /// `x .= y`: append to the slot's current value and return the new
    /// slot value.  A `Buf` grows in place (copy-on-write permitting)
    /// instead of reallocating the whole accumulated text.
    pub fn append(&mut self, x: Value, y: &Value) -> Value {
        let y = y.dereferenced();
        if matches!(x, Value::Bytes(_)) || matches!(y, Value::Bytes(_)) {
            let mut out = self.to_byte_vec(&x);
            out.extend_from_slice(&self.to_byte_vec(&y));
            return Value::bytes(out);
        }
        let suffix = self.stringify(&y);
        self.append_str(x, &suffix)
    }

    /// `x .= "literal"` (compiled fast path)
    pub fn append_str(&mut self, x: Value, suffix: &str) -> Value {
        match x {
            Value::Buf(mut b) => {
                b.append(suffix);
                Value::Buf(b)
            }
            other => {
                let head = self.stringify(&other);
                let mut buf = String::with_capacity(head.len() + suffix.len());
                buf.push_str(&head);
                buf.push_str(suffix);
                Value::Buf(StrBuf::new(buf))
            }
        }
    }

    /// `x = y . x` in place: prepend to the slot's current value and
    /// return the new slot value
    pub fn prepend(&mut self, x: Value, y: &Value) -> Value {
        let y = y.dereferenced();
        if matches!(x, Value::Bytes(_)) || matches!(y, Value::Bytes(_)) {
            let mut out = self.to_byte_vec(&y);
            out.extend_from_slice(&self.to_byte_vec(&x));
            return Value::bytes(out);
        }
        let prefix = self.stringify(&y);
        match x {
            Value::Buf(mut b) => {
                b.prepend(&prefix);
                Value::Buf(b)
            }
            other => {
                let tail = self.stringify(&other);
                let mut buf = String::with_capacity(prefix.len() + tail.len());
                buf.push_str(&prefix);
                buf.push_str(&tail);
                Value::Buf(StrBuf::new(buf))
            }
        }
    }
}
