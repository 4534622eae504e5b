//! Aliasable reference cells
//!
//! A [`Reference`] is the storage form behind `&`-aliased variables,
//! array elements and object fields.  Cloning the handle aliases the
//! same cell; writing through one handle is visible through all.
//!
//! The cell is tri-state aware: a reference can exist while its value is
//! *unset* (a declared-but-never-assigned property, or a slot handed out
//! by a write chain that was later aborted).  An unset cell reads as
//! `Null` but answers `false` to [`Reference::is_set`].

use std::cell::RefCell;
use std::rc::Rc;

use crate::value::Value;

#[derive(Debug)]
enum RefSlot {
    Unset,
    Set(Value),
}

/// Shared, aliasable value cell
#[derive(Debug, Clone)]
pub struct Reference {
    slot: Rc<RefCell<RefSlot>>,
}

impl Reference {
    /// New reference holding `value`
    pub fn new(value: Value) -> Self {
        debug_assert!(
            !matches!(value, Value::Ref(_)),
            "a reference never wraps another reference"
        );
        Reference {
            slot: Rc::new(RefCell::new(RefSlot::Set(value))),
        }
    }

    /// New reference in the unset state
    pub fn new_unset() -> Self {
        Reference {
            slot: Rc::new(RefCell::new(RefSlot::Unset)),
        }
    }

    /// Read the cell; an unset cell reads as `Null`
    pub fn get(&self) -> Value {
        match &*self.slot.borrow() {
            RefSlot::Unset => Value::Null,
            RefSlot::Set(v) => v.clone(),
        }
    }

    /// Write the cell, moving it to the set state
    pub fn set(&self, value: Value) {
        debug_assert!(
            !matches!(value, Value::Ref(_)),
            "a reference never wraps another reference"
        );
        *self.slot.borrow_mut() = RefSlot::Set(value);
    }

    /// Whether the cell holds a value (even `Null`)
    pub fn is_set(&self) -> bool {
        matches!(&*self.slot.borrow(), RefSlot::Set(_))
    }

    /// Return the cell to the unset state
    pub fn unset(&self) {
        *self.slot.borrow_mut() = RefSlot::Unset;
    }

    /// Whether two handles alias the same cell
    pub fn ptr_eq(&self, other: &Reference) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }

    /// Apply `f` to the stored value in place.  An unset cell is treated
    /// as holding `Null` and moves to the set state.
    pub fn update(&self, f: impl FnOnce(Value) -> Value) {
        let mut slot = self.slot.borrow_mut();
        let current = match std::mem::replace(&mut *slot, RefSlot::Unset) {
            RefSlot::Unset => Value::Null,
            RefSlot::Set(v) => v,
        };
        *slot = RefSlot::Set(f(current));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliased_handles_share_writes() {
        let a = Reference::new(Value::Int(1));
        let b = a.clone();
        b.set(Value::Int(2));
        assert_eq!(a.get().as_int(), Some(2));
    }

    #[test]
    fn update_treats_unset_as_null() {
        let r = Reference::new_unset();
        r.update(|v| {
            assert!(v.is_null());
            Value::Int(1)
        });
        assert!(r.is_set());
        assert_eq!(r.get().as_int(), Some(1));
    }

    #[test]
    fn unset_reads_as_null_but_is_not_set() {
        let r = Reference::new_unset();
        assert!(r.get().is_null());
        assert!(!r.is_set());
        r.set(Value::Null);
        assert!(r.is_set());
    }
}
