//! The property protocol: `$x->name` reads, writes and write chains
//!
//! Fields live in per-instance reference cells, so aliases taken with
//! `=&` observe later writes.  Declared properties carry visibility;
//! a caller scope (`Some(class_name)`) sees that class's protected and
//! private members, `None` is global scope.
//!
//! Interceptors: a magic getter answers reads of absent or
//! inaccessible properties; a magic setter intercepts writes.  When a
//! *write chain* crosses an intercepted property the chain does not
//! call the setter immediately — it switches to a deferred
//! [`SetterChain`] that records every later link and replays them all
//! to the setter when the final assignment lands.

use std::rc::Rc;

use crate::engine::errors::DiagnosticKind;
use crate::engine::ops::item::ArraySlotPlan;
use crate::engine::ops::{AccessKind, ArrayCursor, ItemStep, PropertyStep, SetterChain};
use crate::engine::Engine;
use crate::value::{Array, ChainLink, ObjectRef, Reference, Value, Visibility};

/// What to do with a value occupying a position an object is needed at
pub(crate) enum ObjectSlotPlan {
    Object(ObjectRef),
    Store(Value, ObjectRef),
    Recurse(Reference),
    Fail,
}

enum Access {
    Allowed,
    Denied(&'static str),
    Undeclared,
}

fn accessibility(o: &ObjectRef, name: &str, caller: Option<&str>) -> Access {
    match o.declared_def(name) {
        None => Access::Undeclared,
        Some(def) => match def.visibility {
            Visibility::Public => Access::Allowed,
            Visibility::Protected => {
                if caller == Some(o.class_name()) {
                    Access::Allowed
                } else {
                    Access::Denied("protected")
                }
            }
            Visibility::Private => {
                if caller == Some(o.class_name()) {
                    Access::Allowed
                } else {
                    Access::Denied("private")
                }
            }
        },
    }
}

impl Engine {
    /// Open a write chain on a variable cell, vivifying an empty value
    /// into a bare object
    pub fn ensure_object(&mut self, slot: &Reference) -> Option<PropertyStep> {
        match self.plan_object_slot(slot.get()) {
            ObjectSlotPlan::Object(o) => Some(PropertyStep::Object(o)),
            ObjectSlotPlan::Store(v, o) => {
                slot.set(v);
                Some(PropertyStep::Object(o))
            }
            ObjectSlotPlan::Recurse(r) => self.ensure_object(&r),
            ObjectSlotPlan::Fail => None,
        }
    }

    pub(crate) fn plan_object_slot(&mut self, current: Value) -> ObjectSlotPlan {
        match current {
            Value::Ref(r) => ObjectSlotPlan::Recurse(r),
            Value::Object(o) => ObjectSlotPlan::Object(o),
            v if v.is_empty_for_ensure() => {
                let o = self.new_std_object();
                ObjectSlotPlan::Store(Value::Object(o.clone()), o)
            }
            v => {
                self.report(DiagnosticKind::VariableMisusedAsObject {
                    found: v.type_name(),
                });
                ObjectSlotPlan::Fail
            }
        }
    }

    /// Read `base->name`
    pub fn get_property(
        &mut self,
        base: &Value,
        name: &str,
        caller: Option<&str>,
        kind: AccessKind,
    ) -> Value {
        let base = base.dereferenced();
        let Value::Object(o) = &base else {
            if kind == AccessKind::Read {
                self.report(DiagnosticKind::VariableMisusedAsObject {
                    found: base.type_name(),
                });
            }
            return Value::Null;
        };
        match accessibility(o, name, caller) {
            Access::Denied(visibility) => {
                if let Some(v) = self.call_magic_get(o, name) {
                    return v;
                }
                if kind == AccessKind::Read {
                    self.report(DiagnosticKind::InaccessibleProperty {
                        class: o.class_name().to_string(),
                        property: name.to_string(),
                        visibility,
                    });
                }
                Value::Null
            }
            Access::Allowed | Access::Undeclared => {
                if let Some(cell) = o.field(name) {
                    if cell.is_set() {
                        return cell.get();
                    }
                }
                if let Some(v) = self.call_magic_get(o, name) {
                    return v;
                }
                if kind == AccessKind::Read {
                    self.report(DiagnosticKind::UndefinedProperty {
                        class: o.class_name().to_string(),
                        property: name.to_string(),
                    });
                }
                Value::Null
            }
        }
    }

    /// Alias a property: `$r = &$x->name`.  Vivifies both the object
    /// and the property cell.  A magic getter cannot hand out its
    /// backing store, so its result is wrapped in a detached cell.
    pub fn get_property_ref(
        &mut self,
        slot: &Reference,
        name: &str,
        caller: Option<&str>,
    ) -> Reference {
        let Some(PropertyStep::Object(o)) = self.ensure_object(slot) else {
            return Reference::new_unset();
        };
        match accessibility(&o, name, caller) {
            Access::Denied(visibility) => {
                if let Some(v) = self.call_magic_get(&o, name) {
                    return Reference::new(v);
                }
                self.report(DiagnosticKind::InaccessibleProperty {
                    class: o.class_name().to_string(),
                    property: name.to_string(),
                    visibility,
                });
                Reference::new_unset()
            }
            Access::Allowed | Access::Undeclared => {
                if let Some(cell) = o.field(name) {
                    if cell.is_set() {
                        return cell;
                    }
                }
                if let Some(v) = self.call_magic_get(&o, name) {
                    return Reference::new(v);
                }
                let cell = o.field_or_insert(name);
                if !cell.is_set() {
                    cell.set(Value::Null);
                }
                cell
            }
        }
    }

    /// Land a write chain: `step->name = value`
    pub fn set_property(
        &mut self,
        step: PropertyStep,
        name: &str,
        value: Value,
        caller: Option<&str>,
    ) {
        let o = match step {
            PropertyStep::Chain(chain) => {
                self.commit_chain(chain.pushed(ChainLink::Property(name.to_string())), value);
                return;
            }
            PropertyStep::Object(o) => o,
        };
        match accessibility(&o, name, caller) {
            Access::Denied(visibility) => {
                if self.call_magic_set(&o, name, &[], value) {
                    return;
                }
                self.report(DiagnosticKind::InaccessibleProperty {
                    class: o.class_name().to_string(),
                    property: name.to_string(),
                    visibility,
                });
            }
            Access::Allowed | Access::Undeclared => {
                if let Some(cell) = o.field(name) {
                    if cell.is_set() {
                        cell.set(value);
                        return;
                    }
                }
                if o.class().magic_set.is_some() {
                    self.call_magic_set(&o, name, &[], value);
                    return;
                }
                o.field_or_insert(name).set(value);
            }
        }
    }

    /// Walk one property step of a write chain, vivifying the property
    /// into an array.  Crossing a magic setter defers the whole
    /// remaining chain.
    pub fn ensure_property_is_array(
        &mut self,
        step: PropertyStep,
        name: &str,
        caller: Option<&str>,
    ) -> Option<ItemStep> {
        let o = match step {
            PropertyStep::Chain(chain) => {
                return Some(ItemStep::Chain(
                    chain.pushed(ChainLink::Property(name.to_string())),
                ));
            }
            PropertyStep::Object(o) => o,
        };
        match accessibility(&o, name, caller) {
            Access::Denied(visibility) => {
                self.intercepted_item_step(&o, name).or_else(|| {
                    self.report(DiagnosticKind::InaccessibleProperty {
                        class: o.class_name().to_string(),
                        property: name.to_string(),
                        visibility,
                    });
                    None
                })
            }
            Access::Allowed | Access::Undeclared => {
                if let Some(cell) = o.field(name) {
                    if cell.is_set() {
                        return match self.plan_array_slot(cell.get()) {
                            ArraySlotPlan::Cursor(c) => Some(ItemStep::Cursor(c)),
                            ArraySlotPlan::Store(v, c) => {
                                cell.set(v);
                                Some(ItemStep::Cursor(c))
                            }
                            ArraySlotPlan::Recurse(r) => self.ensure_array(&r),
                            ArraySlotPlan::Fail => None,
                        };
                    }
                }
                if let Some(step) = self.intercepted_item_step(&o, name) {
                    return Some(step);
                }
                let a = Array::new();
                o.field_or_insert(name).set(Value::Array(a.clone()));
                Some(ItemStep::Cursor(ArrayCursor::Array(a)))
            }
        }
    }

    /// Walk one property step of a write chain, vivifying the property
    /// into a bare object
    pub fn ensure_property_is_object(
        &mut self,
        step: PropertyStep,
        name: &str,
        caller: Option<&str>,
    ) -> Option<PropertyStep> {
        let o = match step {
            PropertyStep::Chain(chain) => {
                return Some(PropertyStep::Chain(
                    chain.pushed(ChainLink::Property(name.to_string())),
                ));
            }
            PropertyStep::Object(o) => o,
        };
        match accessibility(&o, name, caller) {
            Access::Denied(visibility) => {
                self.intercepted_property_step(&o, name).or_else(|| {
                    self.report(DiagnosticKind::InaccessibleProperty {
                        class: o.class_name().to_string(),
                        property: name.to_string(),
                        visibility,
                    });
                    None
                })
            }
            Access::Allowed | Access::Undeclared => {
                if let Some(cell) = o.field(name) {
                    if cell.is_set() {
                        return match self.plan_object_slot(cell.get()) {
                            ObjectSlotPlan::Object(inner) => Some(PropertyStep::Object(inner)),
                            ObjectSlotPlan::Store(v, inner) => {
                                cell.set(v);
                                Some(PropertyStep::Object(inner))
                            }
                            ObjectSlotPlan::Recurse(r) => self.ensure_object(&r),
                            ObjectSlotPlan::Fail => None,
                        };
                    }
                }
                if let Some(step) = self.intercepted_property_step(&o, name) {
                    return Some(step);
                }
                let inner = self.new_std_object();
                o.field_or_insert(name).set(Value::Object(inner.clone()));
                Some(PropertyStep::Object(inner))
            }
        }
    }

    /// Remove `target->name`.  Unsetting a property of an empty value
    /// is a no-op.
    pub fn unset_property(&mut self, target: &Value, name: &str, caller: Option<&str>) {
        let target = target.dereferenced();
        let Value::Object(o) = &target else {
            if !target.is_empty_for_ensure() {
                self.report(DiagnosticKind::VariableMisusedAsObject {
                    found: target.type_name(),
                });
            }
            return;
        };
        if let Access::Denied(visibility) = accessibility(o, name, caller) {
            self.report(DiagnosticKind::InaccessibleProperty {
                class: o.class_name().to_string(),
                property: name.to_string(),
                visibility,
            });
            return;
        }
        o.unset_field(name);
    }

    /// Replay a deferred chain into the magic setter of its target
    pub(crate) fn commit_chain(&mut self, chain: SetterChain, value: Value) {
        let class = Rc::clone(chain.target.class());
        if let Some(setter) = &class.magic_set {
            setter(self, &chain.target, &chain.property, &chain.links, value);
        }
    }

    /// Where a chain crosses an intercepted property: a magic setter
    /// defers the chain; failing that, a magic getter's result may
    /// serve as the cursor (writes reach whatever store the getter
    /// exposed).
    fn intercepted_item_step(&mut self, o: &ObjectRef, name: &str) -> Option<ItemStep> {
        let class = Rc::clone(o.class());
        if class.magic_set.is_some() {
            return Some(ItemStep::Chain(SetterChain::new(o.clone(), name)));
        }
        if class.magic_get.is_some() {
            let got = self.call_magic_get(o, name)?;
            return match self.plan_array_slot(got) {
                ArraySlotPlan::Cursor(c) | ArraySlotPlan::Store(_, c) => {
                    Some(ItemStep::Cursor(c))
                }
                ArraySlotPlan::Recurse(r) => self.ensure_array(&r),
                ArraySlotPlan::Fail => None,
            };
        }
        None
    }

    fn intercepted_property_step(&mut self, o: &ObjectRef, name: &str) -> Option<PropertyStep> {
        let class = Rc::clone(o.class());
        if class.magic_set.is_some() {
            return Some(PropertyStep::Chain(SetterChain::new(o.clone(), name)));
        }
        if class.magic_get.is_some() {
            let got = self.call_magic_get(o, name)?;
            return match self.plan_object_slot(got) {
                ObjectSlotPlan::Object(inner) | ObjectSlotPlan::Store(_, inner) => {
                    Some(PropertyStep::Object(inner))
                }
                ObjectSlotPlan::Recurse(r) => self.ensure_object(&r),
                ObjectSlotPlan::Fail => None,
            };
        }
        None
    }

    fn call_magic_get(&mut self, o: &ObjectRef, name: &str) -> Option<Value> {
        let getter = Rc::clone(o.class().magic_get.as_ref()?);
        Some(getter(self, o, name))
    }

    /// Returns whether a setter ran (and consumed `value`)
    fn call_magic_set(
        &mut self,
        o: &ObjectRef,
        name: &str,
        links: &[ChainLink],
        value: Value,
    ) -> bool {
        let Some(setter) = o.class().magic_set.clone() else {
            return false;
        };
        setter(self, o, name, links, value);
        true
    }
}
