//! Bounded text buffers for mnemonics and operands.
//!
//! Every decoder builds its output into [`TextBuf`] values. A buffer has a
//! fixed byte capacity; an append that would cross it is refused with
//! [`fmt::Error`] so that `write!` call sites propagate the failure with `?`
//! instead of silently truncating.

use std::fmt;
use std::ops::Deref;

/// Default capacity, in bytes, of a mnemonic or operand buffer.
pub const OPERAND_CAPACITY: usize = 100;

/// A string with a hard upper bound on its length.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TextBuf {
    text: String,
    capacity: usize,
}

impl TextBuf {
    /// Creates an empty buffer with the default operand capacity.
    pub fn new() -> Self {
        Self::with_capacity(OPERAND_CAPACITY)
    }

    /// Creates an empty buffer that holds at most `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity.min(OPERAND_CAPACITY)),
            capacity,
        }
    }

    /// Returns the buffer contents.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the maximum number of bytes this buffer accepts.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of bytes that can still be appended.
    pub fn remaining(&self) -> usize {
        self.capacity - self.text.len()
    }

    /// Empties the buffer.
    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Appends `s`, or leaves the buffer untouched if it does not fit.
    pub fn push_str(&mut self, s: &str) -> fmt::Result {
        if s.len() > self.remaining() {
            return Err(fmt::Error);
        }
        self.text.push_str(s);
        Ok(())
    }

    /// Appends a single character.
    pub fn push(&mut self, c: char) -> fmt::Result {
        let mut utf8 = [0u8; 4];
        self.push_str(c.encode_utf8(&mut utf8))
    }

    /// Replaces the contents with `s`.
    pub fn set(&mut self, s: &str) -> fmt::Result {
        self.clear();
        self.push_str(s)
    }
}

impl Default for TextBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Write for TextBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s)
    }
}

impl Deref for TextBuf {
    type Target = str;

    fn deref(&self) -> &str {
        &self.text
    }
}

impl AsRef<str> for TextBuf {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for TextBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for TextBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.text, f)
    }
}

impl PartialEq<str> for TextBuf {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl PartialEq<&str> for TextBuf {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}
