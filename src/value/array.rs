//! Insertion-ordered arrays
//!
//! The array is the language's one container: an insertion-ordered map
//! from integer-or-string keys to values, with an internal "next integer
//! key" counter driving the append (`$a[] = v`) form.  Backing storage
//! is an [`IndexMap`] behind the same copy-on-write protocol as the text
//! buffers: `clone_shared` marks the table shared, the first mutation
//! through any handle detaches.
//!
//! Elements may be stored wrapped in a [`Reference`]; writes through the
//! table write *through* such a wrapper so aliases observe them.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::value::reference::Reference;
use crate::value::Value;

/// Canonical array key: integer or string, never both for one value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrayKey {
    Int(i64),
    Str(Rc<str>),
}

impl ArrayKey {
    /// Canonicalize a string key: decimal text that round-trips exactly
    /// to an `i64` (no leading zeros, no `-0`) becomes an integer key.
    pub fn canonical_from_str(s: &str) -> ArrayKey {
        if s == "0" {
            return ArrayKey::Int(0);
        }
        let digits = s.strip_prefix('-').unwrap_or(s);
        let canonical = !digits.is_empty()
            && !digits.starts_with('0')
            && digits.bytes().all(|b| b.is_ascii_digit());
        if canonical {
            if let Ok(n) = s.parse::<i64>() {
                return ArrayKey::Int(n);
            }
        }
        ArrayKey::Str(Rc::from(s))
    }
}

impl fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayKey::Int(n) => write!(f, "{n}"),
            ArrayKey::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for ArrayKey {
    fn from(n: i64) -> Self {
        ArrayKey::Int(n)
    }
}

impl From<&str> for ArrayKey {
    fn from(s: &str) -> Self {
        ArrayKey::canonical_from_str(s)
    }
}

#[derive(Debug)]
struct Table {
    entries: IndexMap<ArrayKey, Value>,
    /// Next integer key for the append form; `None` once the maximum
    /// integer key has been used, after which appends fail.
    next_key: Option<i64>,
    shared: bool,
}

impl Table {
    fn bump_next_key(&mut self, inserted: i64) {
        if let Some(next) = self.next_key {
            if inserted >= next {
                self.next_key = inserted.checked_add(1);
            }
        }
    }
}

/// Ordered key-value container with copy-on-write sharing
#[derive(Debug, Clone)]
pub struct Array {
    table: Rc<RefCell<Table>>,
}

impl Default for Array {
    fn default() -> Self {
        Array::new()
    }
}

impl Array {
    pub fn new() -> Self {
        Array {
            table: Rc::new(RefCell::new(Table {
                entries: IndexMap::new(),
                next_key: Some(0),
                shared: false,
            })),
        }
    }

    pub fn len(&self) -> usize {
        self.table.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.borrow().entries.is_empty()
    }

    /// Clone for assignment into another variable slot: O(1), marks the
    /// table shared so the next write detaches.
    pub fn clone_shared(&self) -> Array {
        self.table.borrow_mut().shared = true;
        Array {
            table: Rc::clone(&self.table),
        }
    }

    /// Whether two handles currently share one table
    pub fn shares_backing(&self, other: &Array) -> bool {
        Rc::ptr_eq(&self.table, &other.table)
    }

    pub fn contains_key(&self, key: &ArrayKey) -> bool {
        self.table.borrow().entries.contains_key(key)
    }

    /// Read the stored slot for `key`.  The slot may be a `Ref` wrapper;
    /// callers that want the element value dereference it.
    pub fn get(&self, key: &ArrayKey) -> Option<Value> {
        self.table.borrow().entries.get(key).cloned()
    }

    /// Write `key`.  An existing `Ref` slot is written *through*, so
    /// aliases of the element observe the assignment.
    pub fn set(&mut self, key: ArrayKey, value: Value) {
        self.make_writable();
        let mut table = self.table.borrow_mut();
        if let ArrayKey::Int(n) = key {
            table.bump_next_key(n);
        }
        match table.entries.get(&key) {
            Some(Value::Ref(r)) => r.set(value),
            _ => {
                table.entries.insert(key, value);
            }
        }
    }

    /// Append under the next integer key.  Returns `false` (and leaves
    /// the array untouched) once the maximum integer key is exhausted.
    pub fn append(&mut self, value: Value) -> bool {
        self.make_writable();
        let mut table = self.table.borrow_mut();
        match table.next_key {
            Some(k) => {
                table.entries.insert(ArrayKey::Int(k), value);
                table.next_key = k.checked_add(1);
                true
            }
            None => false,
        }
    }

    /// Remove `key`, preserving the order of remaining entries
    pub fn remove(&mut self, key: &ArrayKey) -> Option<Value> {
        self.make_writable();
        self.table.borrow_mut().entries.shift_remove(key)
    }

    /// Alias the element at `key`.  A plain slot is promoted to a `Ref`
    /// wrapper in place; an absent key is created holding `Null`.
    pub fn get_ref(&mut self, key: ArrayKey) -> Reference {
        self.make_writable();
        let mut table = self.table.borrow_mut();
        if let ArrayKey::Int(n) = key {
            table.bump_next_key(n);
        }
        match table.entries.get(&key) {
            Some(Value::Ref(r)) => r.clone(),
            Some(v) => {
                let r = Reference::new(v.clone());
                table.entries.insert(key, Value::Ref(r.clone()));
                r
            }
            None => {
                let r = Reference::new(Value::Null);
                table.entries.insert(key, Value::Ref(r.clone()));
                r
            }
        }
    }

    /// Store a `Ref` wrapper at `key`, replacing any existing slot
    pub fn set_ref(&mut self, key: ArrayKey, reference: Reference) {
        self.make_writable();
        let mut table = self.table.borrow_mut();
        if let ArrayKey::Int(n) = key {
            table.bump_next_key(n);
        }
        table.entries.insert(key, Value::Ref(reference));
    }

    /// Insert every key of `other` missing from `self` (the array union
    /// operator; left operand wins on collision)
    pub fn unite_missing_from(&mut self, other: &Array) {
        self.make_writable();
        let other_table = other.table.borrow();
        let mut table = self.table.borrow_mut();
        for (key, value) in &other_table.entries {
            if !table.entries.contains_key(key) {
                if let ArrayKey::Int(n) = key {
                    table.bump_next_key(*n);
                }
                table.entries.insert(key.clone(), value.clone_for_assignment());
            }
        }
    }

    /// Snapshot of the entries in insertion order, slots dereferenced
    pub fn entries(&self) -> Vec<(ArrayKey, Value)> {
        self.table
            .borrow()
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.dereferenced()))
            .collect()
    }

    /// Force the copy-on-write check now.  Write chains call this once
    /// up front so a detached table can be stored back into the
    /// variable slot before the cursor starts writing.
    pub(crate) fn ensure_writable(&mut self) {
        self.make_writable();
    }

    fn make_writable(&mut self) {
        if !self.table.borrow().shared {
            return;
        }
        if Rc::strong_count(&self.table) == 1 {
            self.table.borrow_mut().shared = false;
        } else {
            let detached = {
                let table = self.table.borrow();
                Table {
                    entries: table
                        .entries
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone_for_assignment()))
                        .collect(),
                    next_key: table.next_key,
                    shared: false,
                }
            };
            self.table = Rc::new(RefCell::new(detached));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_tracks_highest_integer_key() {
        let mut a = Array::new();
        a.set(ArrayKey::Int(5), Value::Int(1));
        assert!(a.append(Value::Int(2)));
        assert_eq!(a.get(&ArrayKey::Int(6)).unwrap().as_int(), Some(2));
    }

    #[test]
    fn append_fails_past_max_key() {
        let mut a = Array::new();
        a.set(ArrayKey::Int(i64::MAX), Value::Int(1));
        assert!(!a.append(Value::Int(2)));
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn string_keys_canonicalize() {
        assert_eq!(ArrayKey::from("42"), ArrayKey::Int(42));
        assert_eq!(ArrayKey::from("-7"), ArrayKey::Int(-7));
        assert_eq!(ArrayKey::from("042"), ArrayKey::Str(Rc::from("042")));
        assert_eq!(ArrayKey::from("-0"), ArrayKey::Str(Rc::from("-0")));
        assert_eq!(ArrayKey::from("0"), ArrayKey::Int(0));
    }

    #[test]
    fn shared_tables_diverge_on_write() {
        let mut a = Array::new();
        a.set(ArrayKey::Int(0), Value::Int(1));
        let mut b = a.clone_shared();
        b.set(ArrayKey::Int(0), Value::Int(2));
        assert_eq!(a.get(&ArrayKey::Int(0)).unwrap().as_int(), Some(1));
        assert_eq!(b.get(&ArrayKey::Int(0)).unwrap().as_int(), Some(2));
    }

    #[test]
    fn ref_slot_written_through() {
        let mut a = Array::new();
        let r = a.get_ref(ArrayKey::Int(0));
        a.set(ArrayKey::Int(0), Value::Int(9));
        assert_eq!(r.get().as_int(), Some(9));
    }
}
