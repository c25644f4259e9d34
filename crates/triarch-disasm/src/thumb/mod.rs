//! Thumb decoder covering 16-bit Thumb and 32-bit Thumb-2 encodings.
//!
//! The top five bits of the first halfword select the width: `0b11101`,
//! `0b11110` and `0b11111` start a 32-bit instruction, anything else is a
//! complete 16-bit one. Both widths decode into the same [`ArmContext`] as
//! ARM, with the PC running 4 bytes ahead instead of 8.

use std::fmt;

use triarch_core::{decode_with_table, MachineLanguage};

use crate::arm::ArmContext;
use crate::{DecodeError, DecodedInstruction, Disassembler};

mod narrow;
mod wide;

/// Size of a 16-bit Thumb instruction in bytes.
pub const THUMB_NARROW_SIZE: usize = 2;

/// Size of a 32-bit Thumb-2 instruction in bytes.
pub const THUMB_WIDE_SIZE: usize = 4;

const THUMB_PIPELINE: u64 = 4;

/// Returns whether `first` is the leading halfword of a 32-bit encoding.
#[inline]
pub fn is_wide(first: u16) -> bool {
    matches!(first >> 11, 0x1D..=0x1F)
}

/// Decodes a 16-bit instruction fetched from `ip`.
pub(crate) fn decode_narrow(ip: u64, halfword: u16) -> Result<DecodedInstruction, fmt::Error> {
    let mut ctx = ArmContext::with_pipeline(ip, THUMB_PIPELINE);
    ctx.set_mnemonic(&["Unknown"])?;
    decode_with_table(&mut ctx, u32::from(halfword), narrow::NARROW)?;
    ctx.finish(THUMB_NARROW_SIZE)
}

/// Decodes a 32-bit instruction, first halfword in the upper 16 bits.
pub(crate) fn decode_wide(ip: u64, word: u32) -> Result<DecodedInstruction, fmt::Error> {
    let mut ctx = ArmContext::with_pipeline(ip, THUMB_PIPELINE);
    ctx.set_mnemonic(&["Unknown"])?;
    decode_with_table(&mut ctx, word, wide::WIDE)?;
    ctx.finish(THUMB_WIDE_SIZE)
}

/// Thumb and Thumb-2 disassembler.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThumbDisassembler;

impl ThumbDisassembler {
    /// Creates a new Thumb disassembler.
    pub fn new() -> Self {
        Self
    }
}

impl Disassembler for ThumbDisassembler {
    fn decode_instruction(&self, bytes: &[u8], address: u64) -> Result<DecodedInstruction, DecodeError> {
        let Some(&[low, high]) = bytes.get(..THUMB_NARROW_SIZE) else {
            return Err(DecodeError::truncated(address, THUMB_NARROW_SIZE, bytes.len()));
        };
        let first = u16::from_le_bytes([low, high]);
        if !is_wide(first) {
            return decode_narrow(address, first).map_err(|_| DecodeError::overflow(address));
        }

        let Some(&[low, high]) = bytes.get(THUMB_NARROW_SIZE..THUMB_WIDE_SIZE) else {
            return Err(DecodeError::truncated(address, THUMB_WIDE_SIZE, bytes.len()));
        };
        let second = u16::from_le_bytes([low, high]);
        let word = (u32::from(first) << 16) | u32::from(second);
        decode_wide(address, word).map_err(|_| DecodeError::overflow(address))
    }

    fn machine_language(&self) -> MachineLanguage {
        MachineLanguage::Thumb2
    }
}
