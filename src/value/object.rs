//! Object handles, class descriptors and capability hooks
//!
//! Objects have reference semantics: cloning an [`ObjectRef`] aliases
//! the same instance.  Each instance holds its fields as [`Reference`]
//! cells keyed by name, seeded from the declared properties of its
//! [`ClassDef`]; runtime (undeclared) fields are added on first write.
//!
//! A class may opt into engine protocols through hooks:
//!
//! - [`MagicGet`]/[`MagicSet`] intercept reads/writes of inaccessible or
//!   absent properties.  A magic setter receives the *chain suffix* (the
//!   [`ChainLink`]s applied after the intercepted property) so a whole
//!   deferred write chain can be replayed against the getter's result.
//! - [`ArrayAccessHooks`] let an instance stand in for an array in the
//!   item protocol.
//! - [`ListHooks`] and [`DictionaryHooks`] expose host-runtime
//!   collections to integer- and key-based item access.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::engine::Engine;
use crate::value::array::ArrayKey;
use crate::value::reference::Reference;
use crate::value::Value;

/// Property visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

/// A class-declared property
#[derive(Debug, Clone)]
pub struct PropertyDef {
    pub visibility: Visibility,
    pub default: Value,
}

/// One step of a deferred write chain, as replayed to a magic setter
#[derive(Debug, Clone)]
pub enum ChainLink {
    Property(String),
    Item(ArrayKey),
    Append,
}

/// Interceptor for reads of absent or inaccessible properties
pub type MagicGet = dyn Fn(&mut Engine, &ObjectRef, &str) -> Value;

/// Interceptor for writes of absent or inaccessible properties.  The
/// link slice is the chain suffix below the intercepted property; it is
/// empty for a direct assignment.
pub type MagicSet = dyn Fn(&mut Engine, &ObjectRef, &str, &[ChainLink], Value);

/// Instance stands in for an array in the item protocol
pub trait ArrayAccessHooks {
    fn offset_get(&self, engine: &mut Engine, instance: &ObjectRef, offset: &Value) -> Value;
    fn offset_set(&self, engine: &mut Engine, instance: &ObjectRef, offset: Option<&Value>, value: Value);
    fn offset_exists(&self, engine: &mut Engine, instance: &ObjectRef, offset: &Value) -> bool;
    fn offset_unset(&self, engine: &mut Engine, instance: &ObjectRef, offset: &Value);
}

/// Host-runtime integer-indexed collection
pub trait ListHooks {
    fn get(&self, instance: &ObjectRef, index: i64) -> Option<Value>;
    fn set(&self, instance: &ObjectRef, index: i64, value: Value) -> bool;
    fn add(&self, instance: &ObjectRef, value: Value);
}

/// Host-runtime keyed collection
pub trait DictionaryHooks {
    fn get(&self, instance: &ObjectRef, key: &ArrayKey) -> Option<Value>;
    fn set(&self, instance: &ObjectRef, key: ArrayKey, value: Value);
    fn contains(&self, instance: &ObjectRef, key: &ArrayKey) -> bool;
    fn remove(&self, instance: &ObjectRef, key: &ArrayKey) -> bool;
}

/// Class descriptor: declared properties plus opt-in hooks
pub struct ClassDef {
    pub name: String,
    pub declared: FxHashMap<String, PropertyDef>,
    pub magic_get: Option<Rc<MagicGet>>,
    pub magic_set: Option<Rc<MagicSet>>,
    pub array_access: Option<Rc<dyn ArrayAccessHooks>>,
    pub list: Option<Rc<dyn ListHooks>>,
    pub dictionary: Option<Rc<dyn DictionaryHooks>>,
}

impl ClassDef {
    pub fn new(name: impl Into<String>) -> Self {
        ClassDef {
            name: name.into(),
            declared: FxHashMap::default(),
            magic_get: None,
            magic_set: None,
            array_access: None,
            list: None,
            dictionary: None,
        }
    }

    pub fn with_property(
        mut self,
        name: impl Into<String>,
        visibility: Visibility,
        default: Value,
    ) -> Self {
        self.declared.insert(
            name.into(),
            PropertyDef {
                visibility,
                default,
            },
        );
        self
    }
}

impl fmt::Debug for ClassDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDef")
            .field("name", &self.name)
            .field("declared", &self.declared.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct ObjectData {
    class: Rc<ClassDef>,
    fields: RefCell<IndexMap<String, Reference>>,
}

/// Handle to an object instance (reference semantics)
#[derive(Debug, Clone)]
pub struct ObjectRef {
    data: Rc<ObjectData>,
}

impl ObjectRef {
    /// New instance with its declared properties seeded from defaults
    pub fn new(class: Rc<ClassDef>) -> Self {
        let mut fields = IndexMap::new();
        for (name, def) in &class.declared {
            fields.insert(name.clone(), Reference::new(def.default.clone_for_assignment()));
        }
        ObjectRef {
            data: Rc::new(ObjectData {
                class,
                fields: RefCell::new(fields),
            }),
        }
    }

    pub fn class(&self) -> &Rc<ClassDef> {
        &self.data.class
    }

    pub fn class_name(&self) -> &str {
        &self.data.class.name
    }

    /// Whether two handles alias the same instance
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// Declared-property descriptor, if `name` is declared by the class
    pub fn declared_def(&self, name: &str) -> Option<&PropertyDef> {
        self.data.class.declared.get(name)
    }

    /// The field cell for `name`, if the instance has one
    pub fn field(&self, name: &str) -> Option<Reference> {
        self.data.fields.borrow().get(name).cloned()
    }

    /// The field cell for `name`, creating an unset runtime cell if the
    /// instance has none
    pub fn field_or_insert(&self, name: &str) -> Reference {
        let mut fields = self.data.fields.borrow_mut();
        if let Some(r) = fields.get(name) {
            return r.clone();
        }
        let r = Reference::new_unset();
        fields.insert(name.to_string(), r.clone());
        r
    }

    /// Unset a field: declared cells stay (moved to the unset state) so
    /// their visibility survives; runtime fields are removed outright.
    pub fn unset_field(&self, name: &str) {
        if self.declared_def(name).is_some() {
            if let Some(r) = self.data.fields.borrow().get(name) {
                r.unset();
            }
            return;
        }
        self.data.fields.borrow_mut().shift_remove(name);
    }

    /// Snapshot of the set fields in insertion order
    pub fn fields_snapshot(&self) -> Vec<(String, Value)> {
        self.data
            .fields
            .borrow()
            .iter()
            .filter(|(_, r)| r.is_set())
            .map(|(name, r)| (name.clone(), r.get()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_defaults_are_seeded() {
        let class = Rc::new(
            ClassDef::new("Point").with_property("x", Visibility::Public, Value::Int(0)),
        );
        let obj = ObjectRef::new(class);
        assert_eq!(obj.field("x").unwrap().get().as_int(), Some(0));
    }

    #[test]
    fn unset_declared_field_keeps_cell() {
        let class = Rc::new(
            ClassDef::new("Point").with_property("x", Visibility::Public, Value::Int(0)),
        );
        let obj = ObjectRef::new(class);
        obj.unset_field("x");
        let cell = obj.field("x").unwrap();
        assert!(!cell.is_set());
    }

    #[test]
    fn unset_runtime_field_is_removed() {
        let obj = ObjectRef::new(Rc::new(ClassDef::new("stdClass")));
        obj.field_or_insert("y").set(Value::Int(1));
        obj.unset_field("y");
        assert!(obj.field("y").is_none());
    }
}
