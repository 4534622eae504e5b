//! Bitwise operators
//!
//! Integer operands work at 64-bit width with the result narrowed;
//! when *both* operands are text the operators work bytewise instead
//! and produce a fresh byte buffer.  Shift counts are taken modulo 64.

use crate::engine::errors::DiagnosticKind;
use crate::engine::ops::narrow_long;
use crate::engine::Engine;
use crate::value::Value;

#[derive(Clone, Copy)]
enum BitOp {
    And,
    Or,
    Xor,
}

impl Engine {
    pub fn bit_and(&mut self, x: &Value, y: &Value) -> Value {
        self.bit_binary(x, y, BitOp::And)
    }

    pub fn bit_or(&mut self, x: &Value, y: &Value) -> Value {
        self.bit_binary(x, y, BitOp::Or)
    }

    pub fn bit_xor(&mut self, x: &Value, y: &Value) -> Value {
        self.bit_binary(x, y, BitOp::Xor)
    }

    fn bit_binary(&mut self, x: &Value, y: &Value, op: BitOp) -> Value {
        let x = x.dereferenced();
        let y = y.dereferenced();
        if x.is_string_like() && y.is_string_like() {
            let a = self.to_byte_vec(&x);
            let b = self.to_byte_vec(&y);
            return Value::bytes(bytewise(&a, &b, op));
        }
        let xl = self.to_long(&x);
        let yl = self.to_long(&y);
        narrow_long(match op {
            BitOp::And => xl & yl,
            BitOp::Or => xl | yl,
            BitOp::Xor => xl ^ yl,
        })
    }

    /// Bitwise complement.  `~null` stays null; a 64-bit operand keeps
    /// its width; text complements bytewise into a fresh buffer.
    pub fn bit_not(&mut self, x: &Value) -> Value {
        let x = x.dereferenced();
        match &x {
            Value::Null => Value::Null,
            Value::Int(i) => Value::Int(!i),
            Value::Long(l) => Value::Long(!l),
            Value::Double(d) => Value::Long(!(*d as i64)),
            Value::Str(_) | Value::Buf(_) | Value::Bytes(_) => {
                let bytes = self.to_byte_vec(&x);
                Value::bytes(bytes.iter().map(|b| !b).collect::<Vec<u8>>())
            }
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
                self.report(DiagnosticKind::UnsupportedOperandTypes {
                    operation: "bitwise complement",
                    operand: x.type_name(),
                });
                Value::Null
            }
            Value::Ref(_) => unreachable!("dereferenced above"),
        }
    }

    pub fn shift_left(&mut self, x: &Value, y: &Value) -> Value {
        let xl = self.to_long(&x.dereferenced());
        let count = self.to_long(&y.dereferenced()) as u32;
        narrow_long(xl.wrapping_shl(count))
    }

    pub fn shift_right(&mut self, x: &Value, y: &Value) -> Value {
        let xl = self.to_long(&x.dereferenced());
        let count = self.to_long(&y.dereferenced()) as u32;
        narrow_long(xl.wrapping_shr(count))
    }
}

fn bytewise(a: &[u8], b: &[u8], op: BitOp) -> Vec<u8> {
    match op {
        // AND and XOR truncate to the shorter operand
        BitOp::And => a.iter().zip(b).map(|(x, y)| x & y).collect(),
        BitOp::Xor => a.iter().zip(b).map(|(x, y)| x ^ y).collect(),
        // OR keeps the longer operand's tail
        BitOp::Or => {
            let (longer, shorter) = if a.len() >= b.len() { (a, b) } else { (b, a) };
            let mut out = longer.to_vec();
            for (o, s) in out.iter_mut().zip(shorter) {
                *o |= s;
            }
            out
        }
    }
}
