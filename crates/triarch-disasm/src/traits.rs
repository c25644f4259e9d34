//! Disassembler traits.

use std::fmt;

use crate::DecodeError;
use triarch_core::{MachineLanguage, TextBuf, MAX_OPERANDS};

/// An absolute address an instruction refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperandAddress {
    /// The resolved address.
    pub address: u64,
    /// Whether the address is a branch or call target.
    pub is_destination: bool,
}

/// Result of decoding an instruction, owned by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// Mnemonic including condition and size suffixes.
    pub mnemonic: TextBuf,
    /// Raw operand slots as the decoder filled them. Empty slots are skipped
    /// by [`DecodedInstruction::operands`].
    pub operands: [TextBuf; MAX_OPERANDS],
    /// Resolved PC-relative address, if the instruction has one.
    pub operand_address: Option<OperandAddress>,
    /// Number of bytes consumed.
    pub size: usize,
}

impl DecodedInstruction {
    /// Iterates over the non-empty operands in order.
    pub fn operands(&self) -> impl Iterator<Item = &str> + '_ {
        self.operands
            .iter()
            .map(TextBuf::as_str)
            .filter(|op| !op.is_empty())
    }

    /// Returns the number of bytes needed to store the mnemonic and every
    /// operand as NUL-terminated strings.
    pub fn required_buffer_len(&self) -> usize {
        self.mnemonic.len() + 1 + self.operands().map(|op| op.len() + 1).sum::<usize>()
    }
}

impl fmt::Display for DecodedInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mnemonic)?;
        for (index, operand) in self.operands().enumerate() {
            f.write_str(if index == 0 { " " } else { ", " })?;
            f.write_str(operand)?;
        }
        Ok(())
    }
}

/// Trait for architecture-specific instruction decoders.
pub trait Disassembler {
    /// Decode a single instruction starting at the given address.
    ///
    /// # Arguments
    /// * `bytes` - The raw bytes to decode
    /// * `address` - The virtual address of the first byte
    ///
    /// # Returns
    /// The decoded instruction, including the number of bytes consumed.
    fn decode_instruction(&self, bytes: &[u8], address: u64) -> Result<DecodedInstruction, DecodeError>;

    /// Returns the minimum instruction size for this decoder.
    fn min_instruction_size(&self) -> usize {
        self.machine_language().min_instruction_size()
    }

    /// Returns the maximum instruction size for this decoder.
    fn max_instruction_size(&self) -> usize {
        self.machine_language().max_instruction_size()
    }

    /// Returns whether instructions are fixed-width.
    fn is_fixed_width(&self) -> bool {
        self.machine_language().is_fixed_width()
    }

    /// Returns the machine language this decoder understands.
    fn machine_language(&self) -> MachineLanguage;

    /// Disassemble a block of code into instructions.
    fn disassemble_block(
        &self,
        bytes: &[u8],
        start_address: u64,
    ) -> Vec<(u64, Result<DecodedInstruction, DecodeError>)> {
        let mut instructions = Vec::new();
        let mut offset = 0;

        while offset < bytes.len() {
            let remaining = &bytes[offset..];
            let address = start_address.wrapping_add(offset as u64);

            match self.decode_instruction(remaining, address) {
                Ok(decoded) => {
                    offset += decoded.size.max(1);
                    instructions.push((address, Ok(decoded)));
                }
                Err(e) => {
                    // Skip the smallest instruction unit and keep going.
                    offset += self.min_instruction_size();
                    instructions.push((address, Err(e)));
                }
            }
        }

        instructions
    }
}
