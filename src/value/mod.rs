//! The runtime value model
//!
//! Tagged, type-safe representations of every value the engine operates
//! on, plus the copy-on-write container types and the aliasable
//! reference cell.

pub mod array;
pub mod object;
pub mod reference;
pub mod text;
#[allow(clippy::module_inception)]
pub mod value;

pub use array::{Array, ArrayKey};
pub use object::{
    ArrayAccessHooks, ChainLink, ClassDef, DictionaryHooks, ListHooks, MagicGet, MagicSet,
    ObjectRef, PropertyDef, Visibility,
};
pub use reference::Reference;
pub use text::{Bytes, StrBuf};
pub use value::Value;
