//! The output record shared by every decoder.

use std::fmt;

/// Maximum number of operands an instruction can carry.
pub const MAX_OPERANDS: usize = 4;

/// A decoded instruction whose strings live in a caller-supplied buffer.
///
/// Operands are contiguous: if operand `n` is present, so is every operand
/// before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisassembledInstruction<'a> {
    /// Instruction mnemonic, including any condition and size suffixes.
    pub mnemonic: &'a str,
    /// Operand strings, destination first.
    pub operands: [Option<&'a str>; MAX_OPERANDS],
    /// Absolute address referenced by the instruction, if any.
    pub operand_address: u64,
    /// Whether `operand_address` holds a resolved address.
    pub address_is_valid: bool,
    /// Whether `operand_address` is a control-flow destination rather than
    /// a data reference.
    pub address_is_destination: bool,
    /// Number of instruction-stream bytes the instruction occupies.
    pub binary_length: u32,
}

impl<'a> DisassembledInstruction<'a> {
    /// Returns the destination (first) operand.
    pub fn destination_operand(&self) -> Option<&'a str> {
        self.operands[0]
    }

    /// Returns the source (second) operand.
    pub fn source_operand(&self) -> Option<&'a str> {
        self.operands[1]
    }

    /// Returns the third operand.
    pub fn third_operand(&self) -> Option<&'a str> {
        self.operands[2]
    }

    /// Returns the fourth operand.
    pub fn fourth_operand(&self) -> Option<&'a str> {
        self.operands[3]
    }

    /// Returns the number of operands present.
    pub fn operand_count(&self) -> usize {
        self.operands.iter().take_while(|op| op.is_some()).count()
    }

    /// Iterates over the present operands in order.
    pub fn operands(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.operands.iter().map_while(|op| *op)
    }

    /// Returns the resolved operand address, if one is valid.
    pub fn address(&self) -> Option<u64> {
        self.address_is_valid.then_some(self.operand_address)
    }
}

impl fmt::Display for DisassembledInstruction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic)?;
        for (index, operand) in self.operands().enumerate() {
            f.write_str(if index == 0 { " " } else { ", " })?;
            f.write_str(operand)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zeroed() {
        let insn = DisassembledInstruction::default();
        assert_eq!(insn.mnemonic, "");
        assert_eq!(insn.operand_count(), 0);
        assert_eq!(insn.address(), None);
        assert_eq!(insn.binary_length, 0);
    }

    #[test]
    fn test_display() {
        let insn = DisassembledInstruction {
            mnemonic: "mov",
            operands: [Some("pc"), Some("lr"), None, None],
            binary_length: 4,
            ..Default::default()
        };
        assert_eq!(insn.to_string(), "mov pc, lr");
        assert_eq!(insn.operand_count(), 2);
        assert_eq!(insn.source_operand(), Some("lr"));
    }

    #[test]
    fn test_address_requires_validity() {
        let mut insn = DisassembledInstruction {
            operand_address: 0x1000,
            ..Default::default()
        };
        assert_eq!(insn.address(), None);
        insn.address_is_valid = true;
        assert_eq!(insn.address(), Some(0x1000));
    }
}
