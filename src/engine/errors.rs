//! Script-level diagnostics
//!
//! Misuse of an operator at script level is reported, not fatal: the
//! operator emits a [`Diagnostic`] through the engine's sink and
//! continues with a documented fallback value.  Severity mirrors the
//! source language's notice / warning / error tiers, but even
//! `Severity::Error` does not unwind — callers embedding the engine
//! decide how loud each tier is.

use std::error::Error;
use std::fmt;

/// How serious a reported condition is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Notice,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Notice => write!(f, "notice"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Every condition the operator set can report
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    /// An operator was handed operand types it has no rule for
    UnsupportedOperandTypes {
        operation: &'static str,
        operand: &'static str,
    },
    /// Division or modulo by zero
    DivisionByZero,
    /// Negative index into a string
    IllegalStringOffset { index: i64 },
    /// Read past the end of a string
    UninitializedStringOffset { index: i64 },
    /// An array or object used where a key is expected
    IllegalOffsetType { found: &'static str },
    /// Append after the maximum integer key has been used
    IntegerKeyMaxReached,
    /// `unset` applied to a character of a string
    CannotUnsetStringOffset,
    /// A scalar written to through the item protocol
    VariableMisusedAsArray { found: &'static str },
    /// A non-object written to through the property protocol
    VariableMisusedAsObject { found: &'static str },
    /// Read of an absent array key
    UndefinedIndex { key: String },
    /// Read of an absent, un-intercepted property
    UndefinedProperty { class: String, property: String },
    /// Access to a property the caller's scope cannot see
    InaccessibleProperty {
        class: String,
        property: String,
        visibility: &'static str,
    },
    /// Array flattened to the literal string `"Array"`
    ArrayToStringConversion,
    /// Object without a string form used as text
    ObjectToStringConversion { class: String },
    /// Object used as a number
    ObjectToNumberConversion { class: String },
}

impl DiagnosticKind {
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::UnsupportedOperandTypes { .. } => Severity::Error,
            DiagnosticKind::DivisionByZero => Severity::Warning,
            DiagnosticKind::IllegalStringOffset { .. } => Severity::Warning,
            DiagnosticKind::UninitializedStringOffset { .. } => Severity::Notice,
            DiagnosticKind::IllegalOffsetType { .. } => Severity::Warning,
            DiagnosticKind::IntegerKeyMaxReached => Severity::Warning,
            DiagnosticKind::CannotUnsetStringOffset => Severity::Error,
            DiagnosticKind::VariableMisusedAsArray { .. } => Severity::Error,
            DiagnosticKind::VariableMisusedAsObject { .. } => Severity::Error,
            DiagnosticKind::UndefinedIndex { .. } => Severity::Notice,
            DiagnosticKind::UndefinedProperty { .. } => Severity::Notice,
            DiagnosticKind::InaccessibleProperty { .. } => Severity::Error,
            DiagnosticKind::ArrayToStringConversion => Severity::Notice,
            DiagnosticKind::ObjectToStringConversion { .. } => Severity::Warning,
            DiagnosticKind::ObjectToNumberConversion { .. } => Severity::Notice,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnsupportedOperandTypes { operation, operand } => {
                write!(f, "unsupported operand type {operand} for {operation}")
            }
            DiagnosticKind::DivisionByZero => write!(f, "division by zero"),
            DiagnosticKind::IllegalStringOffset { index } => {
                write!(f, "illegal string offset {index}")
            }
            DiagnosticKind::UninitializedStringOffset { index } => {
                write!(f, "uninitialized string offset {index}")
            }
            DiagnosticKind::IllegalOffsetType { found } => {
                write!(f, "illegal offset type {found}")
            }
            DiagnosticKind::IntegerKeyMaxReached => {
                write!(f, "cannot add element: next integer key is out of range")
            }
            DiagnosticKind::CannotUnsetStringOffset => {
                write!(f, "cannot unset string offsets")
            }
            DiagnosticKind::VariableMisusedAsArray { found } => {
                write!(f, "cannot use a value of type {found} as an array")
            }
            DiagnosticKind::VariableMisusedAsObject { found } => {
                write!(f, "cannot use a value of type {found} as an object")
            }
            DiagnosticKind::UndefinedIndex { key } => {
                write!(f, "undefined index: {key}")
            }
            DiagnosticKind::UndefinedProperty { class, property } => {
                write!(f, "undefined property: {class}::${property}")
            }
            DiagnosticKind::InaccessibleProperty {
                class,
                property,
                visibility,
            } => {
                write!(f, "cannot access {visibility} property {class}::${property}")
            }
            DiagnosticKind::ArrayToStringConversion => {
                write!(f, "array to string conversion")
            }
            DiagnosticKind::ObjectToStringConversion { class } => {
                write!(f, "object of class {class} could not be converted to string")
            }
            DiagnosticKind::ObjectToNumberConversion { class } => {
                write!(f, "object of class {class} could not be converted to number")
            }
        }
    }
}

/// A reported condition
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind) -> Self {
        Diagnostic { kind }
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity(), self.kind)
    }
}

impl Error for Diagnostic {}

/// Where reported diagnostics go.  The default engine collects them in
/// memory; embedders install their own sink to forward into their
/// runtime's error handling.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl<F: FnMut(Diagnostic)> DiagnosticSink for F {
    fn report(&mut self, diagnostic: Diagnostic) {
        self(diagnostic)
    }
}
