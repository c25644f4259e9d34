//! x86 and x64 instruction decoder.
//!
//! Decoding runs in stages: legacy/REX/VEX prefixes, the opcode (one byte, or
//! escaped through 0F, 0F 38, 0F 3A or a VEX/XOP map), refinement through
//! the ModR/M byte for groups and x87 escapes, and finally the operands in
//! encoding order. Both modes share every table; they differ in REX
//! availability, default operand and address sizes, RIP-relative addressing
//! and the opcodes long mode retired.

use triarch_core::MachineLanguage;

use crate::{DecodeError, DecodedInstruction, Disassembler};

mod decoder;
mod modrm;
mod names;
mod opcodes;
mod opcodes_0f;
mod operand;
mod prefix;
mod reader;
mod x87;

pub use decoder::MAX_INSTRUCTION_SIZE;

/// x86 disassembler for 32-bit protected mode or 64-bit long mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct X86Disassembler {
    long_mode: bool,
}

impl X86Disassembler {
    /// Creates a 32-bit (IA-32) disassembler.
    pub fn new() -> Self {
        Self { long_mode: false }
    }

    /// Creates a 64-bit (x64) disassembler.
    pub fn x64() -> Self {
        Self { long_mode: true }
    }

    /// Returns the disassembler for `language`, if it is an x86 flavor.
    pub fn for_language(language: MachineLanguage) -> Option<Self> {
        match language {
            MachineLanguage::X86 => Some(Self::new()),
            MachineLanguage::X64 => Some(Self::x64()),
            MachineLanguage::Arm | MachineLanguage::Thumb2 => None,
        }
    }

    pub fn is_long_mode(&self) -> bool {
        self.long_mode
    }
}

impl Disassembler for X86Disassembler {
    fn decode_instruction(&self, bytes: &[u8], address: u64) -> Result<DecodedInstruction, DecodeError> {
        decoder::decode(bytes, address, self.long_mode)
    }

    fn machine_language(&self) -> MachineLanguage {
        if self.long_mode {
            MachineLanguage::X64
        } else {
            MachineLanguage::X86
        }
    }
}
