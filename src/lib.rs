//! # Introduction
//!
//! Phlox is the dynamic value model and operator evaluation engine of a
//! loosely-typed scripting runtime.  It gives every runtime value
//! (integers, floats, strings, byte buffers, arrays, objects, references)
//! its loose-typing arithmetic, string, container-access and
//! object-access behavior, while running on Rust's strict type system.
//!
//! ## Architecture
//!
//! ```text
//! Compiled expression / interpreter loop
//!         │
//!         ▼
//! [`engine::Engine`] ── operator methods (add, concat, get_item, …)
//!         │
//!         ▼
//! [`value`] — the tagged value model: [`value::Value`],
//! [`value::Array`], [`value::StrBuf`], [`value::Bytes`],
//! [`value::Reference`], [`value::ObjectRef`]
//! ```
//!
//! 1. [`value`] — the data model: a closed tagged union over the value
//!    categories, copy-on-write containers, aliasable reference cells,
//!    and the object handle with its capability hooks.
//! 2. [`engine`] — the operator set: numeric operators with an
//!    overflow-aware promotion ladder, string/bytes operators, the
//!    container-access protocol with auto-vivification, the object
//!    property protocol with deferred setter chains, and equality.
//!
//! ## Error model
//!
//! Script-level misuse is *reported, not fatal*: every operator reports a
//! [`engine::Diagnostic`] through the engine's sink and continues with a
//! documented fallback value (commonly `Null`, `false` or numeric zero).
//! No operator panics on script input and none returns `Err` for it.

pub mod engine;
pub mod value;
