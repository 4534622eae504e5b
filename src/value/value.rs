//! Runtime value representation
//!
//! This module defines the [`Value`] enum, which represents all possible
//! runtime values in the engine.  Values are tagged and type-safe; the
//! enum is closed, so operator dispatch is an exhaustive `match` rather
//! than a chain of capability checks.
//!
//! # Value categories
//!
//! - [`Value::Null`]: absence of value
//! - [`Value::Bool`]: boolean
//! - [`Value::Int`]: 32-bit signed integer, the default integral kind
//! - [`Value::Long`]: 64-bit signed integer, promotion target of `Int`
//! - [`Value::Double`]: IEEE 754 double, promotion target of `Long`
//! - [`Value::Str`]: immutable shared text
//! - [`Value::Buf`]: exclusively-owned mutable text builder
//! - [`Value::Bytes`]: raw byte buffer for encoding-unsafe data
//! - [`Value::Array`]: insertion-ordered map with copy-on-write backing
//! - [`Value::Object`]: handle into the object system
//! - [`Value::Ref`]: aliasable reference cell (storage form only)
//!
//! # The `Ref` invariant
//!
//! `Ref` exists so array elements and object fields can alias; a value
//! handed to an operator is never itself a `Ref` — callers dereference
//! first via [`Value::dereferenced`].  A `Reference` never wraps another
//! `Reference`.

use std::rc::Rc;

use crate::value::array::Array;
use crate::value::object::ObjectRef;
use crate::value::reference::Reference;
use crate::value::text::{Bytes, StrBuf};

/// Runtime values in the engine
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    Str(Rc<str>),
    Buf(StrBuf),
    Bytes(Bytes),
    Array(Array),
    Object(ObjectRef),
    Ref(Reference),
}

impl Value {
    /// Build an immutable text value
    pub fn str(s: impl AsRef<str>) -> Self {
        Value::Str(Rc::from(s.as_ref()))
    }

    /// Build a byte-buffer value
    pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(Bytes::new(b.into()))
    }

    /// Follow a `Ref` wrapper to the wrapped value; identity otherwise.
    /// An unset reference dereferences to `Null`.
    pub fn dereferenced(&self) -> Value {
        match self {
            Value::Ref(r) => r.get(),
            other => other.clone(),
        }
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is one of the three text representations
    pub fn is_string_like(&self) -> bool {
        matches!(self, Value::Str(_) | Value::Buf(_) | Value::Bytes(_))
    }

    /// Emptiness for auto-vivification: decides whether a variable may be
    /// silently replaced by a new array/object during a write chain.
    /// Deliberately narrower than `empty()`: the string `"0"` is NOT
    /// empty for ensure.
    pub fn is_empty_for_ensure(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Int(i) => *i == 0,
            Value::Long(l) => *l == 0,
            Value::Double(d) => *d == 0.0,
            Value::Str(s) => s.is_empty(),
            Value::Buf(b) => b.is_empty(),
            Value::Bytes(b) => b.is_empty(),
            _ => false,
        }
    }

    /// Emptiness in the sense of the language's `empty()`: includes the
    /// string `"0"` and empty arrays.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Int(i) => *i == 0,
            Value::Long(l) => *l == 0,
            Value::Double(d) => *d == 0.0,
            Value::Str(s) => s.is_empty() || &**s == "0",
            Value::Buf(b) => b.with_str(|s| s.is_empty() || s == "0"),
            Value::Bytes(b) => b.with_bytes(|s| s.is_empty() || s == b"0".as_slice()),
            Value::Array(a) => a.len() == 0,
            Value::Object(_) => false,
            Value::Ref(r) => r.get().is_empty(),
        }
    }

    /// Get the integer value, returns None if not an Int
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the array handle, returns None if not an Array
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get the object handle, returns None if not an Object
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Copy this value into another variable slot.  Containers are
    /// handed out as O(1) shared handles with the backing store marked
    /// shared; the first write through either handle clones (CoW).
    pub fn clone_for_assignment(&self) -> Value {
        match self {
            Value::Buf(b) => Value::Buf(b.clone_shared()),
            Value::Bytes(b) => Value::Bytes(b.clone_shared()),
            Value::Array(a) => Value::Array(a.clone_shared()),
            other => other.clone(),
        }
    }

    /// Short type tag used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::Long(_) => "int",
            Value::Double(_) => "float",
            Value::Str(_) | Value::Buf(_) | Value::Bytes(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Ref(_) => "reference",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i)
    }
}

impl From<i64> for Value {
    fn from(l: i64) -> Self {
        Value::Long(l)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}
