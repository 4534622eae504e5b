//! The item protocol: `$x[key]` reads, writes and write chains
//!
//! Reads never vivify.  A read off a scalar silently yields `Null`; a
//! read off an array reports absent keys only in plain-read mode.
//!
//! Writes run as chains: the chain opens on a variable cell with
//! [`Engine::ensure_array`], walks inner positions with the
//! `ensure_item_is_*` steps (vivifying empty positions as it goes) and
//! lands with [`Engine::set_item`].  A step that finds a misused value
//! reports and aborts the chain; everything vivified up to that point
//! stays, so re-running the chain is idempotent.

use std::rc::Rc;

use crate::engine::errors::DiagnosticKind;
use crate::engine::ops::property::ObjectSlotPlan;
use crate::engine::ops::{AccessKind, ArrayCursor, ItemStep, PropertyStep};
use crate::engine::Engine;
use crate::value::{Array, ArrayKey, ChainLink, ObjectRef, Reference, StrBuf, Value};

/// What to do with a value occupying a position an array is needed at
pub(crate) enum ArraySlotPlan {
    /// Use as-is
    Cursor(ArrayCursor),
    /// Store the first value back into the slot, then use the cursor
    Store(Value, ArrayCursor),
    /// The slot holds a reference cell; continue inside it
    Recurse(Reference),
    /// Misuse was reported; abort the chain
    Fail,
}

impl Engine {
    /// Open a write chain on a variable cell, vivifying an empty value
    /// into a fresh array
    pub fn ensure_array(&mut self, slot: &Reference) -> Option<ItemStep> {
        match self.plan_array_slot(slot.get()) {
            ArraySlotPlan::Cursor(c) => Some(ItemStep::Cursor(c)),
            ArraySlotPlan::Store(v, c) => {
                slot.set(v);
                Some(ItemStep::Cursor(c))
            }
            ArraySlotPlan::Recurse(r) => self.ensure_array(&r),
            ArraySlotPlan::Fail => None,
        }
    }

    pub(crate) fn plan_array_slot(&mut self, current: Value) -> ArraySlotPlan {
        match current {
            Value::Ref(r) => ArraySlotPlan::Recurse(r),
            Value::Array(mut a) => {
                a.ensure_writable();
                ArraySlotPlan::Store(Value::Array(a.clone()), ArrayCursor::Array(a))
            }
            Value::Str(s) if !s.is_empty() => {
                // reshape the slot into its mutable string-backed view
                let b = StrBuf::new(&*s);
                ArraySlotPlan::Store(Value::Buf(b.clone()), ArrayCursor::Text(b))
            }
            Value::Buf(mut b) if !b.is_empty() => {
                b.ensure_writable();
                ArraySlotPlan::Store(Value::Buf(b.clone()), ArrayCursor::Text(b))
            }
            Value::Bytes(mut b) if !b.is_empty() => {
                b.ensure_writable();
                ArraySlotPlan::Store(Value::Bytes(b.clone()), ArrayCursor::Bytes(b))
            }
            Value::Object(o) => {
                let class = o.class();
                if class.array_access.is_some()
                    || class.list.is_some()
                    || class.dictionary.is_some()
                {
                    ArraySlotPlan::Cursor(ArrayCursor::Hooked(o))
                } else {
                    self.report(DiagnosticKind::VariableMisusedAsArray { found: "object" });
                    ArraySlotPlan::Fail
                }
            }
            v if v.is_empty_for_ensure() => {
                let a = Array::new();
                ArraySlotPlan::Store(Value::Array(a.clone()), ArrayCursor::Array(a))
            }
            v => {
                self.report(DiagnosticKind::VariableMisusedAsArray {
                    found: v.type_name(),
                });
                ArraySlotPlan::Fail
            }
        }
    }

    /// Walk one item step of a write chain, vivifying the element into
    /// an array when it is absent or empty.  `None` key is the append
    /// form.
    pub fn ensure_item_is_array(
        &mut self,
        step: ItemStep,
        key: Option<&Value>,
    ) -> Option<ItemStep> {
        match step {
            ItemStep::Chain(chain) => {
                let link = self.chain_link_for(key)?;
                Some(ItemStep::Chain(chain.pushed(link)))
            }
            ItemStep::Cursor(ArrayCursor::Array(mut a)) => {
                let key = match key {
                    None => {
                        let el = Array::new();
                        if !a.append(Value::Array(el.clone())) {
                            self.report(DiagnosticKind::IntegerKeyMaxReached);
                            return None;
                        }
                        return Some(ItemStep::Cursor(ArrayCursor::Array(el)));
                    }
                    Some(k) => self.to_array_key(&k.dereferenced())?,
                };
                match a.get(&key) {
                    None => {
                        let el = Array::new();
                        a.set(key, Value::Array(el.clone()));
                        Some(ItemStep::Cursor(ArrayCursor::Array(el)))
                    }
                    Some(v) => match self.plan_array_slot(v) {
                        ArraySlotPlan::Cursor(c) => Some(ItemStep::Cursor(c)),
                        ArraySlotPlan::Store(v2, c) => {
                            a.set(key, v2);
                            Some(ItemStep::Cursor(c))
                        }
                        ArraySlotPlan::Recurse(r) => self.ensure_array(&r),
                        ArraySlotPlan::Fail => None,
                    },
                }
            }
            ItemStep::Cursor(ArrayCursor::Text(_)) | ItemStep::Cursor(ArrayCursor::Bytes(_)) => {
                self.report(DiagnosticKind::VariableMisusedAsArray { found: "string" });
                None
            }
            ItemStep::Cursor(ArrayCursor::Hooked(_)) => {
                self.report(DiagnosticKind::VariableMisusedAsArray { found: "object" });
                None
            }
        }
    }

    /// Walk one item step of a write chain that continues into the
    /// property protocol, vivifying the element into a bare object
    pub fn ensure_item_is_object(
        &mut self,
        step: ItemStep,
        key: Option<&Value>,
    ) -> Option<PropertyStep> {
        match step {
            ItemStep::Chain(chain) => {
                let link = self.chain_link_for(key)?;
                Some(PropertyStep::Chain(chain.pushed(link)))
            }
            ItemStep::Cursor(ArrayCursor::Array(mut a)) => {
                let key = match key {
                    None => {
                        let obj = self.new_std_object();
                        if !a.append(Value::Object(obj.clone())) {
                            self.report(DiagnosticKind::IntegerKeyMaxReached);
                            return None;
                        }
                        return Some(PropertyStep::Object(obj));
                    }
                    Some(k) => self.to_array_key(&k.dereferenced())?,
                };
                match a.get(&key) {
                    None => {
                        let obj = self.new_std_object();
                        a.set(key, Value::Object(obj.clone()));
                        Some(PropertyStep::Object(obj))
                    }
                    Some(v) => match self.plan_object_slot(v) {
                        ObjectSlotPlan::Object(o) => Some(PropertyStep::Object(o)),
                        ObjectSlotPlan::Store(v2, o) => {
                            a.set(key, v2);
                            Some(PropertyStep::Object(o))
                        }
                        ObjectSlotPlan::Recurse(r) => self.ensure_object(&r),
                        ObjectSlotPlan::Fail => None,
                    },
                }
            }
            ItemStep::Cursor(ArrayCursor::Text(_)) | ItemStep::Cursor(ArrayCursor::Bytes(_)) => {
                self.report(DiagnosticKind::VariableMisusedAsObject { found: "string" });
                None
            }
            ItemStep::Cursor(ArrayCursor::Hooked(_)) => {
                self.report(DiagnosticKind::VariableMisusedAsObject { found: "object" });
                None
            }
        }
    }

    /// Land a write chain: `cursor[key] = value` (`None` key appends)
    pub fn set_item(&mut self, step: ItemStep, key: Option<&Value>, value: Value) {
        match step {
            ItemStep::Cursor(ArrayCursor::Array(mut a)) => match key {
                None => {
                    if !a.append(value) {
                        self.report(DiagnosticKind::IntegerKeyMaxReached);
                    }
                }
                Some(k) => {
                    if let Some(key) = self.to_array_key(&k.dereferenced()) {
                        a.set(key, value);
                    }
                }
            },
            ItemStep::Cursor(ArrayCursor::Text(mut b)) => {
                let Some(k) = key else {
                    self.report(DiagnosticKind::VariableMisusedAsArray { found: "string" });
                    return;
                };
                let index = self.to_long(&k.dereferenced());
                if index < 0 {
                    self.report(DiagnosticKind::IllegalStringOffset { index });
                    return;
                }
                let text = self.stringify(&value);
                if let Some(ch) = text.chars().next() {
                    b.set_char(index as usize, ch);
                }
            }
            ItemStep::Cursor(ArrayCursor::Bytes(mut b)) => {
                let Some(k) = key else {
                    self.report(DiagnosticKind::VariableMisusedAsArray { found: "string" });
                    return;
                };
                let index = self.to_long(&k.dereferenced());
                if index < 0 {
                    self.report(DiagnosticKind::IllegalStringOffset { index });
                    return;
                }
                let bytes = self.to_byte_vec(&value);
                if let Some(byte) = bytes.first() {
                    b.set_byte(index as usize, *byte);
                }
            }
            ItemStep::Cursor(ArrayCursor::Hooked(o)) => {
                self.set_hooked_item(&o, key, value);
            }
            ItemStep::Chain(chain) => {
                let Some(link) = self.chain_link_for(key) else {
                    return;
                };
                self.commit_chain(chain.pushed(link), value);
            }
        }
    }

    fn set_hooked_item(&mut self, o: &ObjectRef, key: Option<&Value>, value: Value) {
        let class = Rc::clone(o.class());
        if let Some(hooks) = &class.array_access {
            hooks.offset_set(self, o, key, value);
            return;
        }
        let key = match key {
            None => {
                if let Some(list) = &class.list {
                    list.add(o, value);
                } else {
                    self.report(DiagnosticKind::VariableMisusedAsArray { found: "object" });
                }
                return;
            }
            Some(k) => match self.to_array_key(&k.dereferenced()) {
                Some(key) => key,
                None => return,
            },
        };
        if let (ArrayKey::Int(i), Some(list)) = (&key, &class.list) {
            if list.set(o, *i, value) {
                return;
            }
            self.report(DiagnosticKind::UndefinedIndex {
                key: i.to_string(),
            });
            return;
        }
        if let Some(dict) = &class.dictionary {
            dict.set(o, key, value);
            return;
        }
        self.report(DiagnosticKind::VariableMisusedAsArray { found: "object" });
    }

    fn chain_link_for(&mut self, key: Option<&Value>) -> Option<ChainLink> {
        match key {
            None => Some(ChainLink::Append),
            Some(k) => self.to_array_key(&k.dereferenced()).map(ChainLink::Item),
        }
    }

    /// Read `base[key]`.  Never vivifies; scalars read as `Null`
    /// without a report.
    pub fn get_item(&mut self, base: &Value, key: &Value, kind: AccessKind) -> Value {
        let base = base.dereferenced();
        let key = key.dereferenced();
        match &base {
            Value::Array(a) => {
                let Some(k) = self.key_for(&key, kind) else {
                    return Value::Null;
                };
                match a.get(&k) {
                    Some(slot) => slot.dereferenced(),
                    None => {
                        if kind == AccessKind::Read {
                            self.report(DiagnosticKind::UndefinedIndex { key: k.to_string() });
                        }
                        Value::Null
                    }
                }
            }
            Value::Str(s) => match self.text_index(&key, s.chars().count(), kind) {
                Some(i) => match s.chars().nth(i) {
                    Some(c) => Value::str(c.to_string()),
                    None => Value::Null,
                },
                None => Value::Null,
            },
            Value::Buf(b) => match self.text_index(&key, b.char_len(), kind) {
                Some(i) => match b.char_at(i) {
                    Some(c) => Value::str(c.to_string()),
                    None => Value::Null,
                },
                None => Value::Null,
            },
            Value::Bytes(b) => match self.text_index(&key, b.len(), kind) {
                Some(i) => match b.byte_at(i) {
                    Some(byte) => Value::bytes(vec![byte]),
                    None => Value::Null,
                },
                None => Value::Null,
            },
            Value::Object(o) => self.get_hooked_item(o, &key, kind),
            // reading an element of a scalar is silently null
            _ => Value::Null,
        }
    }

    fn get_hooked_item(&mut self, o: &ObjectRef, key: &Value, kind: AccessKind) -> Value {
        let class = Rc::clone(o.class());
        if let Some(hooks) = &class.array_access {
            return match kind {
                AccessKind::Read | AccessKind::Quiet => hooks.offset_get(self, o, key),
                // a set offset probes as a non-null stand-in without
                // running the getter
                AccessKind::Isset => {
                    if hooks.offset_exists(self, o, key) {
                        Value::str("")
                    } else {
                        Value::Null
                    }
                }
                AccessKind::Empty => {
                    if hooks.offset_exists(self, o, key) {
                        hooks.offset_get(self, o, key)
                    } else {
                        Value::Null
                    }
                }
            };
        }
        let Some(k) = self.key_for(key, kind) else {
            return Value::Null;
        };
        let found = match (&k, &class.list, &class.dictionary) {
            (ArrayKey::Int(i), Some(list), _) => list.get(o, *i),
            (_, _, Some(dict)) => dict.get(o, &k),
            _ => {
                if kind == AccessKind::Read {
                    self.report(DiagnosticKind::VariableMisusedAsArray { found: "object" });
                }
                return Value::Null;
            }
        };
        match found {
            Some(v) => v,
            None => {
                if kind == AccessKind::Read {
                    self.report(DiagnosticKind::UndefinedIndex { key: k.to_string() });
                }
                Value::Null
            }
        }
    }

    /// Alias an element: `$r = &$x[key]` (`None` key appends).  The
    /// element slot is promoted to a reference cell; absent elements
    /// are created holding `Null`.
    pub fn get_item_ref(&mut self, slot: &Reference, key: Option<&Value>) -> Reference {
        let current = slot.get();
        let mut array = match current {
            Value::Array(mut a) => {
                a.ensure_writable();
                slot.set(Value::Array(a.clone()));
                a
            }
            v if v.is_empty_for_ensure() => {
                let a = Array::new();
                slot.set(Value::Array(a.clone()));
                a
            }
            Value::Str(_) | Value::Buf(_) | Value::Bytes(_) => {
                self.report(DiagnosticKind::VariableMisusedAsArray { found: "string" });
                return Reference::new_unset();
            }
            v => {
                self.report(DiagnosticKind::VariableMisusedAsArray {
                    found: v.type_name(),
                });
                return Reference::new_unset();
            }
        };
        match key {
            None => {
                let r = Reference::new(Value::Null);
                if !array.append(Value::Ref(r.clone())) {
                    self.report(DiagnosticKind::IntegerKeyMaxReached);
                    return Reference::new_unset();
                }
                r
            }
            Some(k) => match self.to_array_key(&k.dereferenced()) {
                Some(key) => array.get_ref(key),
                None => Reference::new_unset(),
            },
        }
    }

    /// Bind an element slot to an existing reference cell:
    /// `$x[key] =& $r` (`None` key appends)
    pub fn set_item_ref(&mut self, slot: &Reference, key: Option<&Value>, reference: Reference) {
        let mut array = match slot.get() {
            Value::Array(mut a) => {
                a.ensure_writable();
                slot.set(Value::Array(a.clone()));
                a
            }
            v if v.is_empty_for_ensure() => {
                let a = Array::new();
                slot.set(Value::Array(a.clone()));
                a
            }
            Value::Str(_) | Value::Buf(_) | Value::Bytes(_) => {
                self.report(DiagnosticKind::VariableMisusedAsArray { found: "string" });
                return;
            }
            v => {
                self.report(DiagnosticKind::VariableMisusedAsArray {
                    found: v.type_name(),
                });
                return;
            }
        };
        match key {
            None => {
                if !array.append(Value::Ref(reference)) {
                    self.report(DiagnosticKind::IntegerKeyMaxReached);
                }
            }
            Some(k) => {
                if let Some(key) = self.to_array_key(&k.dereferenced()) {
                    array.set_ref(key, reference);
                }
            }
        }
    }

    /// Remove `target[key]`.  Unsetting an element of an empty value is
    /// a no-op; string offsets cannot be unset.
    pub fn unset_item(&mut self, target: &mut Value, key: &Value) {
        match target {
            Value::Ref(r) => {
                let r = r.clone();
                let mut v = r.get();
                self.unset_item(&mut v, key);
                r.set(v);
            }
            Value::Array(a) => {
                if let Some(k) = self.to_array_key(&key.dereferenced()) {
                    a.remove(&k);
                }
            }
            Value::Str(_) | Value::Buf(_) | Value::Bytes(_) => {
                if !target.is_empty_for_ensure() {
                    self.report(DiagnosticKind::CannotUnsetStringOffset);
                }
            }
            Value::Object(o) => {
                let o = o.clone();
                let class = Rc::clone(o.class());
                if let Some(hooks) = &class.array_access {
                    hooks.offset_unset(self, &o, &key.dereferenced());
                } else if let Some(dict) = &class.dictionary {
                    if let Some(k) = self.to_array_key(&key.dereferenced()) {
                        dict.remove(&o, &k);
                    }
                } else {
                    self.report(DiagnosticKind::VariableMisusedAsArray { found: "object" });
                }
            }
            v if v.is_empty_for_ensure() => {}
            v => {
                self.report(DiagnosticKind::VariableMisusedAsArray {
                    found: v.type_name(),
                });
            }
        }
    }

    fn key_for(&mut self, key: &Value, kind: AccessKind) -> Option<ArrayKey> {
        if matches!(key, Value::Array(_) | Value::Object(_)) {
            if kind == AccessKind::Read {
                self.report(DiagnosticKind::IllegalOffsetType {
                    found: key.type_name(),
                });
            }
            return None;
        }
        self.to_array_key(key)
    }

    fn text_index(&mut self, key: &Value, len: usize, kind: AccessKind) -> Option<usize> {
        let index = self.to_long(key);
        if index < 0 {
            if kind == AccessKind::Read {
                self.report(DiagnosticKind::IllegalStringOffset { index });
            }
            return None;
        }
        if index as usize >= len {
            if kind == AccessKind::Read {
                self.report(DiagnosticKind::UninitializedStringOffset { index });
            }
            return None;
        }
        Some(index as usize)
    }
}
