//! The operator evaluation engine
//!
//! [`Engine`] carries the state every operator may need: the diagnostic
//! sink and the class used when auto-vivification has to conjure an
//! object.  Operators are methods on `Engine`, grouped by family in the
//! [`ops`] submodules; conversions live in [`convert`] and the numeric
//! classifier in [`classify`].

pub mod classify;
pub mod convert;
pub mod errors;
pub mod ops;

use std::rc::Rc;

use crate::value::{ClassDef, ObjectRef};

pub use classify::{NumberInfo, NumberKind};
pub use errors::{Diagnostic, DiagnosticKind, DiagnosticSink, Severity};
pub use ops::{AccessKind, ArrayCursor, ItemStep, PropertyStep, SetterChain};

enum SinkKind {
    Collect(Vec<Diagnostic>),
    Custom(Box<dyn DiagnosticSink>),
}

/// Operator evaluation engine
///
/// One engine per interpreter thread; operators take `&mut self` so
/// they can report diagnostics and run object hooks.
pub struct Engine {
    sink: SinkKind,
    std_class: Rc<ClassDef>,
}

impl Engine {
    /// Engine that collects diagnostics in memory
    pub fn new() -> Self {
        Engine {
            sink: SinkKind::Collect(Vec::new()),
            std_class: Rc::new(ClassDef::new("stdClass")),
        }
    }

    /// Engine forwarding diagnostics to a custom sink
    pub fn with_sink(sink: impl DiagnosticSink + 'static) -> Self {
        Engine {
            sink: SinkKind::Custom(Box::new(sink)),
            std_class: Rc::new(ClassDef::new("stdClass")),
        }
    }

    /// Report a condition through the sink
    pub fn report(&mut self, kind: DiagnosticKind) {
        let diagnostic = Diagnostic::new(kind);
        match &mut self.sink {
            SinkKind::Collect(collected) => collected.push(diagnostic),
            SinkKind::Custom(sink) => sink.report(diagnostic),
        }
    }

    /// Diagnostics collected so far (empty under a custom sink)
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match &self.sink {
            SinkKind::Collect(collected) => collected,
            SinkKind::Custom(_) => &[],
        }
    }

    /// Drain the collected diagnostics
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        match &mut self.sink {
            SinkKind::Collect(collected) => std::mem::take(collected),
            SinkKind::Custom(_) => Vec::new(),
        }
    }

    /// The class auto-vivification instantiates
    pub fn std_class(&self) -> Rc<ClassDef> {
        Rc::clone(&self.std_class)
    }

    /// Fresh bare object of the vivification class
    pub fn new_std_object(&self) -> ObjectRef {
        ObjectRef::new(self.std_class())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}
