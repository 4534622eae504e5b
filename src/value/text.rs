//! Mutable text and byte-buffer representations
//!
//! [`StrBuf`] is the exclusively-owned "string builder" used to
//! accumulate text in place (the append fast path); [`Bytes`] holds raw
//! bytes for encoding-unsafe data.  Both follow the same copy-on-write
//! protocol as [`crate::value::Array`]: handle clones made for
//! *assignment* mark the backing store shared, and the first mutation
//! through any handle checks-and-clones.  Handle clones made while
//! chaining (`clone()`) keep identity, so a write through a chain cursor
//! is visible through the variable slot.

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug)]
struct BufCell {
    text: String,
    shared: bool,
}

/// Mutable text builder with copy-on-write sharing
#[derive(Debug, Clone)]
pub struct StrBuf {
    cell: Rc<RefCell<BufCell>>,
}

impl StrBuf {
    pub fn new(text: impl Into<String>) -> Self {
        StrBuf {
            cell: Rc::new(RefCell::new(BufCell {
                text: text.into(),
                shared: false,
            })),
        }
    }

    /// Number of characters (not bytes)
    pub fn char_len(&self) -> usize {
        self.cell.borrow().text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.cell.borrow().text.is_empty()
    }

    pub fn with_str<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        f(&self.cell.borrow().text)
    }

    pub fn to_owned_string(&self) -> String {
        self.cell.borrow().text.clone()
    }

    pub fn char_at(&self, index: usize) -> Option<char> {
        self.cell.borrow().text.chars().nth(index)
    }

    /// Clone for assignment into another variable slot: O(1), marks the
    /// backing store shared so the next write clones.
    pub fn clone_shared(&self) -> StrBuf {
        self.cell.borrow_mut().shared = true;
        StrBuf {
            cell: Rc::clone(&self.cell),
        }
    }

    /// Whether two handles currently share one backing store
    pub fn shares_backing(&self, other: &StrBuf) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }

    pub fn append(&mut self, s: &str) {
        self.make_writable();
        self.cell.borrow_mut().text.push_str(s);
    }

    pub fn prepend(&mut self, s: &str) {
        self.make_writable();
        self.cell.borrow_mut().text.insert_str(0, s);
    }

    /// Set the character at `index`, right-padding with spaces when the
    /// index is past the current end.
    pub fn set_char(&mut self, index: usize, ch: char) {
        self.make_writable();
        let mut cell = self.cell.borrow_mut();
        let mut chars: Vec<char> = cell.text.chars().collect();
        if index >= chars.len() {
            chars.resize(index, ' ');
            chars.push(ch);
        } else {
            chars[index] = ch;
        }
        cell.text = chars.into_iter().collect();
    }

    /// Force the copy-on-write check now (see `Array::ensure_writable`)
    pub(crate) fn ensure_writable(&mut self) {
        self.make_writable();
    }

    fn make_writable(&mut self) {
        if !self.cell.borrow().shared {
            return;
        }
        if Rc::strong_count(&self.cell) == 1 {
            self.cell.borrow_mut().shared = false;
        } else {
            let copy = self.cell.borrow().text.clone();
            self.cell = Rc::new(RefCell::new(BufCell {
                text: copy,
                shared: false,
            }));
        }
    }
}

#[derive(Debug)]
struct BytesCell {
    data: Vec<u8>,
    shared: bool,
}

/// Raw byte buffer with copy-on-write sharing
#[derive(Debug, Clone)]
pub struct Bytes {
    cell: Rc<RefCell<BytesCell>>,
}

impl Bytes {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Bytes {
            cell: Rc::new(RefCell::new(BytesCell {
                data: data.into(),
                shared: false,
            })),
        }
    }

    pub fn len(&self) -> usize {
        self.cell.borrow().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cell.borrow().data.is_empty()
    }

    pub fn with_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        f(&self.cell.borrow().data)
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.cell.borrow().data.clone()
    }

    pub fn byte_at(&self, index: usize) -> Option<u8> {
        self.cell.borrow().data.get(index).copied()
    }

    pub fn clone_shared(&self) -> Bytes {
        self.cell.borrow_mut().shared = true;
        Bytes {
            cell: Rc::clone(&self.cell),
        }
    }

    pub fn shares_backing(&self, other: &Bytes) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }

    /// Set the byte at `index`, right-padding with `0x20` when the index
    /// is past the current end.
    pub fn set_byte(&mut self, index: usize, byte: u8) {
        self.make_writable();
        let mut cell = self.cell.borrow_mut();
        if index >= cell.data.len() {
            cell.data.resize(index, 0x20);
            cell.data.push(byte);
        } else {
            cell.data[index] = byte;
        }
    }

    /// Force the copy-on-write check now (see `Array::ensure_writable`)
    pub(crate) fn ensure_writable(&mut self) {
        self.make_writable();
    }

    fn make_writable(&mut self) {
        if !self.cell.borrow().shared {
            return;
        }
        if Rc::strong_count(&self.cell) == 1 {
            self.cell.borrow_mut().shared = false;
        } else {
            let copy = self.cell.borrow().data.clone();
            self.cell = Rc::new(RefCell::new(BytesCell {
                data: copy,
                shared: false,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_buf_diverges_on_write() {
        let a = StrBuf::new("abc");
        let mut b = a.clone_shared();
        assert!(a.shares_backing(&b));

        b.append("def");
        assert!(!a.shares_backing(&b));
        assert_eq!(a.to_owned_string(), "abc");
        assert_eq!(b.to_owned_string(), "abcdef");
    }

    #[test]
    fn identity_clone_writes_through() {
        let a = StrBuf::new("abc");
        let mut cursor = a.clone();
        cursor.set_char(0, 'x');
        assert_eq!(a.to_owned_string(), "xbc");
    }

    #[test]
    fn set_byte_pads_with_spaces() {
        let mut b = Bytes::new(b"ab".to_vec());
        b.set_byte(4, b'!');
        assert_eq!(b.to_vec(), b"ab\x20\x20!".to_vec());
    }
}
