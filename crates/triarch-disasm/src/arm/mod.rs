//! ARM (A32) instruction decoder.
//!
//! Decoding walks a tree of ordered mask/value tables (see [`tables`]). The
//! leaf routines fill an [`ArmContext`]; the top level then appends the
//! condition code and any size/type suffix to the mnemonic.

use std::fmt;

use triarch_core::{decode_with_table, DecodeEntry, MachineLanguage, TextBuf, MAX_OPERANDS};

use crate::traits::OperandAddress;
use crate::{DecodeError, DecodedInstruction, Disassembler};

mod coproc;
pub(crate) mod format;
mod general;
pub(crate) mod imm;
mod media;
pub(crate) mod names;
mod simd;
pub(crate) mod tables;
mod vfp;

pub(crate) use coproc::*;
pub(crate) use general::*;
pub(crate) use media::*;
pub(crate) use simd::*;
pub(crate) use vfp::*;

use names::CONDITION_CODES;

/// Size of an A32 instruction in bytes.
pub const ARM_INSTRUCTION_SIZE: usize = 4;

/// Scratch state for one ARM or Thumb decode.
///
/// The mnemonic holds everything that precedes the condition code; `suffix`
/// holds the size/type qualifiers that follow it (`vadd` `eq` `.f32`).
#[derive(Debug, Clone)]
pub(crate) struct ArmContext {
    pub(crate) ip: u64,
    /// Distance the architectural PC runs ahead of `ip`: 8 in ARM state,
    /// 4 in Thumb state.
    pub(crate) pipeline: u64,
    pub(crate) mnemonic: TextBuf,
    pub(crate) suffix: TextBuf,
    pub(crate) operands: [TextBuf; MAX_OPERANDS],
    pub(crate) address: Option<OperandAddress>,
}

impl ArmContext {
    pub(crate) fn new(ip: u64) -> Self {
        Self::with_pipeline(ip, 8)
    }

    pub(crate) fn with_pipeline(ip: u64, pipeline: u64) -> Self {
        Self {
            ip,
            pipeline,
            mnemonic: TextBuf::new(),
            suffix: TextBuf::new(),
            operands: Default::default(),
            address: None,
        }
    }

    /// Replaces the mnemonic with the concatenation of `parts`.
    pub(crate) fn set_mnemonic(&mut self, parts: &[&str]) -> fmt::Result {
        self.mnemonic.clear();
        parts.iter().try_for_each(|part| self.mnemonic.push_str(part))
    }

    /// Replaces the post-condition suffix with the concatenation of `parts`.
    pub(crate) fn set_suffix(&mut self, parts: &[&str]) -> fmt::Result {
        self.suffix.clear();
        parts.iter().try_for_each(|part| self.suffix.push_str(part))
    }

    /// Clears operand `index` and returns it for writing.
    pub(crate) fn operand(&mut self, index: usize) -> &mut TextBuf {
        let operand = &mut self.operands[index];
        operand.clear();
        operand
    }

    pub(crate) fn set_operand(&mut self, index: usize, text: &str) -> fmt::Result {
        self.operands[index].set(text)
    }

    /// The PC value the instruction observes.
    pub(crate) fn pc(&self) -> u64 {
        self.ip.wrapping_add(self.pipeline)
    }

    /// Records a resolved PC-relative address.
    pub(crate) fn set_address(&mut self, address: u64, is_destination: bool) {
        self.address = Some(OperandAddress {
            address,
            is_destination,
        });
    }

    pub(crate) fn undefined(&mut self) -> fmt::Result {
        self.set_mnemonic(&["Undefined"])
    }

    pub(crate) fn unpredictable(&mut self) -> fmt::Result {
        self.set_mnemonic(&["Unpredictable"])
    }

    /// Folds the suffix into the mnemonic and produces the decoded record.
    pub(crate) fn finish(mut self, size: usize) -> Result<DecodedInstruction, fmt::Error> {
        let suffix = std::mem::take(&mut self.suffix);
        self.mnemonic.push_str(&suffix)?;
        Ok(DecodedInstruction {
            mnemonic: self.mnemonic,
            operands: self.operands,
            operand_address: self.address,
            size,
        })
    }
}

/// Runs the first matching entry of `table`. A miss leaves the context as
/// it was, which surfaces as the caller's placeholder mnemonic.
pub(crate) fn route(ctx: &mut ArmContext, insn: u32, table: &[DecodeEntry<ArmContext>]) -> fmt::Result {
    decode_with_table(ctx, insn, table).map(|_| ())
}

/// Decodes one A32 instruction word fetched from `ip`.
pub(crate) fn decode_word(ip: u64, insn: u32) -> Result<DecodedInstruction, fmt::Error> {
    let mut ctx = ArmContext::new(ip);
    ctx.set_mnemonic(&["Unknown"])?;
    if decode_with_table(&mut ctx, insn, tables::TOP_LEVEL)? {
        ctx.mnemonic.push_str(CONDITION_CODES[(insn >> 28) as usize])?;
    }
    ctx.finish(ARM_INSTRUCTION_SIZE)
}

/// ARM (A32) disassembler.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArmDisassembler;

impl ArmDisassembler {
    /// Creates a new ARM disassembler.
    pub fn new() -> Self {
        Self
    }
}

impl Disassembler for ArmDisassembler {
    fn decode_instruction(&self, bytes: &[u8], address: u64) -> Result<DecodedInstruction, DecodeError> {
        let Some(word) = bytes.get(..ARM_INSTRUCTION_SIZE) else {
            return Err(DecodeError::truncated(address, ARM_INSTRUCTION_SIZE, bytes.len()));
        };
        let insn = u32::from_le_bytes([word[0], word[1], word[2], word[3]]);
        decode_word(address, insn).map_err(|_| DecodeError::overflow(address))
    }

    fn machine_language(&self) -> MachineLanguage {
        MachineLanguage::Arm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn decode(insn: u32) -> DecodedInstruction {
        decode_at(0x1000, insn)
    }

    pub(crate) fn decode_at(ip: u64, insn: u32) -> DecodedInstruction {
        ArmDisassembler::new()
            .decode_instruction(&insn.to_le_bytes(), ip)
            .unwrap()
    }

    pub(crate) fn text(insn: u32) -> String {
        decode(insn).to_string()
    }

    #[test]
    fn test_mov_pc_lr() {
        let decoded = decode(0xE1A0_F00E);
        assert_eq!(decoded.mnemonic, "mov");
        assert_eq!(decoded.operands().collect::<Vec<_>>(), vec!["pc", "lr"]);
        assert_eq!(decoded.size, 4);
        assert!(decoded.operand_address.is_none());
    }

    #[test]
    fn test_mov_immediate_zero() {
        let decoded = decode(0xE3A0_0000);
        assert_eq!(decoded.mnemonic, "mov");
        assert_eq!(decoded.operands[0], "r0");
        assert_eq!(decoded.operands[1], "#0  ; 0x0");
    }

    #[test]
    fn test_condition_suffix() {
        assert_eq!(text(0x03A0_0001), "moveq r0, #1  ; 0x1");
        assert_eq!(text(0x11A0_0001), "movne r0, r1");
        // `al` adds nothing.
        assert_eq!(text(0xE1A0_0001), "mov r0, r1");
    }

    #[test]
    fn test_unconditional_class_has_no_suffix() {
        // pld [r1, #+4]
        assert_eq!(text(0xF5D1_F004), "pld [r1, #+4]");
        // clrex
        assert_eq!(text(0xF57F_F01F), "clrex");
    }

    #[test]
    fn test_suffix_follows_condition() {
        // vaddeq.f32 s0, s1, s2
        assert_eq!(text(0x0E30_0A81), "vaddeq.f32 s0, s1, s2");
    }

    #[test]
    fn test_short_input_is_truncated() {
        let err = ArmDisassembler::new()
            .decode_instruction(&[0x0E, 0xF0], 0)
            .unwrap_err();
        assert_eq!(err, DecodeError::truncated(0, 4, 2));
    }

    #[test]
    fn test_decode_is_deterministic() {
        for insn in [0xE1A0_F00E, 0xF57F_F04F, 0xEE30_0A81, 0xE92D_4010] {
            assert_eq!(decode(insn), decode(insn));
        }
    }

    #[test]
    fn test_disassemble_block() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0xE92D_4010u32.to_le_bytes());
        bytes.extend_from_slice(&0xE8BD_8010u32.to_le_bytes());
        let block = ArmDisassembler::new().disassemble_block(&bytes, 0x8000);
        assert_eq!(block.len(), 2);
        assert_eq!(block[0].0, 0x8000);
        assert_eq!(block[1].0, 0x8004);
        assert_eq!(block[1].1.as_ref().unwrap().to_string(), "pop {r4, pc}");
    }
}
