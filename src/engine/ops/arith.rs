//! Numeric operators
//!
//! All binary operators classify both operands, resolve a common kind
//! along the `Int → Long → Double` ladder, compute at 64-bit width and
//! narrow the result back to `Int` when it fits 32 bits.  Integer
//! overflow is detected and promotes the computation to doubles rather
//! than wrapping.

use crate::engine::classify::{classify, NumberInfo, NumberKind};
use crate::engine::errors::DiagnosticKind;
use crate::engine::ops::narrow_long;
use crate::engine::Engine;
use crate::value::Value;

const SIGN: i64 = i64::MIN;

impl Engine {
    /// Addition.  Two arrays unite instead (left operand's entries win
    /// on key collision).
    pub fn add(&mut self, x: &Value, y: &Value) -> Value {
        let x = x.dereferenced();
        let y = y.dereferenced();
        if let (Value::Array(ax), Value::Array(ay)) = (&x, &y) {
            let mut result = ax.clone_shared();
            result.unite_missing_from(ay);
            return Value::Array(result);
        }
        let (ix, iy) = match (
            self.numeric_operand(&x, "addition"),
            self.numeric_operand(&y, "addition"),
        ) {
            (Some(ix), Some(iy)) => (ix, iy),
            _ => return Value::Int(0),
        };
        if ix.kind == NumberKind::Double || iy.kind == NumberKind::Double {
            return Value::Double(ix.double + iy.double);
        }
        let rl = ix.long.wrapping_add(iy.long);
        if (ix.long ^ rl) & (iy.long ^ rl) & SIGN != 0 {
            return Value::Double(ix.double + iy.double);
        }
        narrow_long(rl)
    }

    /// Addition of two 32-bit integers (compiled fast path)
    #[inline]
    pub fn add_int(&self, x: i32, y: i32) -> Value {
        narrow_long(x as i64 + y as i64)
    }

    /// Addition of two doubles (compiled fast path)
    #[inline]
    pub fn add_double(&self, x: f64, y: f64) -> Value {
        Value::Double(x + y)
    }

    /// Subtraction
    pub fn subtract(&mut self, x: &Value, y: &Value) -> Value {
        let x = x.dereferenced();
        let y = y.dereferenced();
        let (ix, iy) = match (
            self.numeric_operand(&x, "subtraction"),
            self.numeric_operand(&y, "subtraction"),
        ) {
            (Some(ix), Some(iy)) => (ix, iy),
            _ => return Value::Int(0),
        };
        if ix.kind == NumberKind::Double || iy.kind == NumberKind::Double {
            return Value::Double(ix.double - iy.double);
        }
        let rl = ix.long.wrapping_sub(iy.long);
        if (ix.long ^ iy.long) & (ix.long ^ rl) & SIGN != 0 {
            return Value::Double(ix.double - iy.double);
        }
        narrow_long(rl)
    }

    /// Subtraction of two 32-bit integers (compiled fast path)
    #[inline]
    pub fn subtract_int(&self, x: i32, y: i32) -> Value {
        narrow_long(x as i64 - y as i64)
    }

    /// Multiplication
    pub fn multiply(&mut self, x: &Value, y: &Value) -> Value {
        let x = x.dereferenced();
        let y = y.dereferenced();
        let (ix, iy) = match (
            self.numeric_operand(&x, "multiplication"),
            self.numeric_operand(&y, "multiplication"),
        ) {
            (Some(ix), Some(iy)) => (ix, iy),
            _ => return Value::Int(0),
        };
        if ix.kind == NumberKind::Double || iy.kind == NumberKind::Double {
            return Value::Double(ix.double * iy.double);
        }
        match ix.long.checked_mul(iy.long) {
            Some(rl) => narrow_long(rl),
            None => Value::Double(ix.double * iy.double),
        }
    }

    /// Multiplication of two 32-bit integers (compiled fast path)
    #[inline]
    pub fn multiply_int(&self, x: i32, y: i32) -> Value {
        narrow_long(x as i64 * y as i64)
    }

    /// Division.  Integer division with an exact quotient stays
    /// integral; any remainder promotes to doubles.  Integer division
    /// by zero reports and yields `false`; the float path follows
    /// IEEE 754.
    pub fn divide(&mut self, x: &Value, y: &Value) -> Value {
        let x = x.dereferenced();
        let y = y.dereferenced();
        let (ix, iy) = match (
            self.numeric_operand(&x, "division"),
            self.numeric_operand(&y, "division"),
        ) {
            (Some(ix), Some(iy)) => (ix, iy),
            _ => return Value::Double(0.0),
        };
        if ix.kind == NumberKind::Double || iy.kind == NumberKind::Double {
            // IEEE semantics on the float path: 1.0 / 0.0 is infinity,
            // only integer division by zero reports
            return Value::Double(ix.double / iy.double);
        }
        self.divide_long(ix.long, iy.long)
    }

    /// Division of two 32-bit integers (compiled fast path)
    pub fn divide_int(&mut self, x: i32, y: i32) -> Value {
        self.divide_long(x as i64, y as i64)
    }

    fn divide_long(&mut self, x: i64, y: i64) -> Value {
        if y == 0 {
            self.report(DiagnosticKind::DivisionByZero);
            return Value::Bool(false);
        }
        if x == i64::MIN && y == -1 {
            return Value::Double(-(i64::MIN as f64));
        }
        if x % y == 0 {
            narrow_long(x / y)
        } else {
            Value::Double(x as f64 / y as f64)
        }
    }

    /// Modulo.  Operands are taken at integral width; the divisor is
    /// inspected before the dividend so `x % 0` reports regardless of
    /// `x`.
    pub fn remainder(&mut self, x: &Value, y: &Value) -> Value {
        let y = y.dereferenced();
        let iy = match self.numeric_operand(&y, "modulo") {
            Some(iy) => iy,
            None => return Value::Bool(false),
        };
        if iy.long == 0 {
            self.report(DiagnosticKind::DivisionByZero);
            return Value::Bool(false);
        }
        let x = x.dereferenced();
        let ix = match self.numeric_operand(&x, "modulo") {
            Some(ix) => ix,
            None => return Value::Bool(false),
        };
        self.remainder_long(ix.long, iy.long)
    }

    /// Modulo of two 32-bit integers (compiled fast path)
    pub fn remainder_int(&mut self, x: i32, y: i32) -> Value {
        if y == 0 {
            self.report(DiagnosticKind::DivisionByZero);
            return Value::Bool(false);
        }
        self.remainder_long(x as i64, y as i64)
    }

    fn remainder_long(&self, x: i64, y: i64) -> Value {
        // i64::MIN % -1 would overflow in hardware
        if y == -1 {
            return Value::Int(0);
        }
        narrow_long(x % y)
    }

    /// Unary negation.  `Int::MIN` promotes to `Long`; `Long::MIN`
    /// promotes to `Double`; other `Long` results stay `Long` except
    /// the one that round-trips back into 32-bit range.
    pub fn minus(&mut self, x: &Value) -> Value {
        let x = x.dereferenced();
        match &x {
            Value::Int(i) => return Self::minus_int_value(*i),
            Value::Long(l) => return Self::minus_long_value(*l),
            Value::Double(d) => return Value::Double(-d),
            _ => {}
        }
        let info = match self.numeric_operand(&x, "negation") {
            Some(info) => info,
            None => return Value::Int(0),
        };
        match info.kind {
            NumberKind::Int => Self::minus_int_value(info.int),
            NumberKind::Long => Self::minus_long_value(info.long),
            NumberKind::Double => Value::Double(-info.double),
        }
    }

    /// Unary plus: pure numeric coercion, no sign change
    pub fn plus(&mut self, x: &Value) -> Value {
        let x = x.dereferenced();
        match &x {
            Value::Int(_) | Value::Long(_) | Value::Double(_) => return x.clone(),
            _ => {}
        }
        let info = match self.numeric_operand(&x, "unary plus") {
            Some(info) => info,
            None => return Value::Int(0),
        };
        match info.kind {
            NumberKind::Int => Value::Int(info.int),
            NumberKind::Long => Value::Long(info.long),
            NumberKind::Double => Value::Double(info.double),
        }
    }

    #[inline]
    fn minus_int_value(i: i32) -> Value {
        if i == i32::MIN {
            Value::Long(-(i32::MIN as i64))
        } else {
            Value::Int(-i)
        }
    }

    #[inline]
    fn minus_long_value(l: i64) -> Value {
        if l == i64::MIN {
            Value::Double(-(i64::MIN as f64))
        } else if l == -(i32::MIN as i64) {
            Value::Int(i32::MIN)
        } else {
            Value::Long(-l)
        }
    }

    /// Classify `value` for a numeric operator, reporting operands that
    /// have no numeric rule.  Objects fall back to 1 with a notice.
    pub(crate) fn numeric_operand(
        &mut self,
        value: &Value,
        operation: &'static str,
    ) -> Option<NumberInfo> {
        let info = classify(value);
        if info.is_array {
            self.report(DiagnosticKind::UnsupportedOperandTypes {
                operation,
                operand: "array",
            });
            return None;
        }
        if info.unconvertible {
            if let Value::Object(o) = value {
                self.report(DiagnosticKind::ObjectToNumberConversion {
                    class: o.class_name().to_string(),
                });
            }
        }
        Some(info)
    }
}
