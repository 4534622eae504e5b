//! The operator set, grouped by family
//!
//! Each submodule holds one `impl Engine` block.  This module defines
//! the types the families share: the access modes of the read protocol
//! and the step values threaded through write chains.

pub mod arith;
pub mod bitwise;
pub mod compare;
pub mod incdec;
pub mod item;
pub mod property;
pub mod strings;

use crate::value::{Array, Bytes, ChainLink, ObjectRef, StrBuf, Value};

/// How a read was requested; decides which absences are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    /// Plain read: absences are reported
    Read,
    /// Suppressed read (`@`): absences stay silent
    Quiet,
    /// Existence probe: never reports, never runs interceptors fully
    Isset,
    /// Emptiness probe: never reports
    Empty,
}

/// A write chain intercepted by a magic setter.  The chain records the
/// intercepted property and every link applied after it; the final
/// assignment replays the whole suffix to the setter in one call.
#[derive(Debug, Clone)]
pub struct SetterChain {
    pub target: ObjectRef,
    pub property: String,
    pub links: Vec<ChainLink>,
}

impl SetterChain {
    pub(crate) fn new(target: ObjectRef, property: impl Into<String>) -> Self {
        SetterChain {
            target,
            property: property.into(),
            links: Vec::new(),
        }
    }

    pub(crate) fn pushed(mut self, link: ChainLink) -> Self {
        self.links.push(link);
        self
    }
}

/// Positions an item write can land on
#[derive(Debug, Clone)]
pub enum ArrayCursor {
    Array(Array),
    Text(StrBuf),
    Bytes(Bytes),
    Hooked(ObjectRef),
}

/// One step of a write chain through the item protocol
#[derive(Debug, Clone)]
pub enum ItemStep {
    Cursor(ArrayCursor),
    Chain(SetterChain),
}

/// One step of a write chain through the property protocol
#[derive(Debug, Clone)]
pub enum PropertyStep {
    Object(ObjectRef),
    Chain(SetterChain),
}

/// Narrow a 64-bit result to `Int` when it fits 32 bits
#[inline]
pub(crate) fn narrow_long(l: i64) -> Value {
    if l == l as i32 as i64 {
        Value::Int(l as i32)
    } else {
        Value::Long(l)
    }
}
