//! Ordered mask/value decode tables.
//!
//! The ARM and Thumb decoders are built as trees of small tables. Each entry
//! pairs a bit pattern with the routine that decodes words carrying that
//! pattern. Tables are scanned front to back and the first matching entry
//! wins, so entry order is part of a table's meaning: a broad pattern placed
//! after a narrow one only sees the words the narrow one rejected.

use std::fmt;

/// A decode routine. It receives the decode context and the word to decode,
/// which is not necessarily the word stored in the context.
pub type Handler<C> = fn(&mut C, u32) -> fmt::Result;

/// One row of a decode table.
pub struct DecodeEntry<C> {
    /// Bits of the (shifted) word that take part in the comparison.
    pub mask: u32,
    /// Required value of the masked bits.
    pub value: u32,
    /// Left shift applied to both `mask` and `value` before comparing.
    pub shift: u32,
    /// Routine invoked when the entry matches.
    pub handler: Handler<C>,
}

impl<C> DecodeEntry<C> {
    /// Creates an entry that compares in place.
    pub const fn new(mask: u32, value: u32, handler: Handler<C>) -> Self {
        Self {
            mask,
            value,
            shift: 0,
            handler,
        }
    }

    /// Creates an entry whose mask and value are expressed `shift` bits down.
    pub const fn shifted(mask: u32, value: u32, shift: u32, handler: Handler<C>) -> Self {
        Self {
            mask,
            value,
            shift,
            handler,
        }
    }

    /// Returns whether `word` carries this entry's bit pattern.
    #[inline]
    pub fn matches(&self, word: u32) -> bool {
        let mask = self.mask.checked_shl(self.shift).unwrap_or(0);
        let value = self.value.checked_shl(self.shift).unwrap_or(0);
        (word & mask) == value
    }
}

impl<C> Clone for DecodeEntry<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for DecodeEntry<C> {}

impl<C> fmt::Debug for DecodeEntry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeEntry")
            .field("mask", &format_args!("{:#010x}", self.mask))
            .field("value", &format_args!("{:#010x}", self.value))
            .field("shift", &self.shift)
            .finish()
    }
}

/// Returns the index of the first entry in `table` that matches `word`.
pub fn find_entry<C>(table: &[DecodeEntry<C>], word: u32) -> Option<usize> {
    table.iter().position(|entry| entry.matches(word))
}

/// Runs the handler of the first entry in `table` that matches `word`.
///
/// Returns `Ok(true)` if an entry matched and its handler completed,
/// `Ok(false)` if nothing matched, and the handler's error if it ran out of
/// output space.
pub fn decode_with_table<C>(ctx: &mut C, word: u32, table: &[DecodeEntry<C>]) -> Result<bool, fmt::Error> {
    match find_entry(table, word) {
        Some(index) => {
            (table[index].handler)(ctx, word)?;
            Ok(true)
        }
        None => {
            log::trace!("no decode table entry matched {word:#010x}");
            Ok(false)
        }
    }
}
