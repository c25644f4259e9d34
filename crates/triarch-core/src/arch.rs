//! Machine language identification and properties.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Instruction encodings understood by the disassembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MachineLanguage {
    /// 32-bit x86 (IA-32).
    X86,
    /// x86-64 / AMD64.
    X64,
    /// 32-bit ARM (A32).
    Arm,
    /// Thumb, both 16-bit and 32-bit Thumb-2 encodings.
    Thumb2,
}

impl MachineLanguage {
    /// All supported machine languages.
    pub const ALL: [MachineLanguage; 4] = [Self::X86, Self::X64, Self::Arm, Self::Thumb2];

    /// Returns the canonical short name of this language.
    pub fn name(&self) -> &'static str {
        match self {
            Self::X86 => "x86",
            Self::X64 => "x64",
            Self::Arm => "arm",
            Self::Thumb2 => "thumb2",
        }
    }

    /// Returns the smallest number of bytes an instruction can occupy.
    ///
    /// A caller handing the decoder fewer bytes than this violates the
    /// calling contract and is rejected before any decoding happens.
    pub fn min_instruction_size(&self) -> usize {
        match self {
            Self::X86 | Self::X64 => 1,
            Self::Arm => 4,
            Self::Thumb2 => 2,
        }
    }

    /// Returns the largest number of bytes an instruction can occupy.
    pub fn max_instruction_size(&self) -> usize {
        match self {
            Self::X86 | Self::X64 => 15,
            Self::Arm | Self::Thumb2 => 4,
        }
    }

    /// Returns whether every instruction has the same width.
    pub fn is_fixed_width(&self) -> bool {
        matches!(self, Self::Arm)
    }

    /// Returns whether this is one of the ARM family encodings.
    pub fn is_arm_family(&self) -> bool {
        matches!(self, Self::Arm | Self::Thumb2)
    }
}

impl fmt::Display for MachineLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MachineLanguage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x86" | "i386" | "ia32" => Ok(Self::X86),
            "x64" | "x86_64" | "amd64" => Ok(Self::X64),
            "arm" | "a32" => Ok(Self::Arm),
            "thumb" | "thumb2" | "t32" => Ok(Self::Thumb2),
            _ => Err(Error::UnknownLanguage(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("x86_64".parse::<MachineLanguage>().unwrap(), MachineLanguage::X64);
        assert_eq!("THUMB".parse::<MachineLanguage>().unwrap(), MachineLanguage::Thumb2);
        assert_eq!("arm".parse::<MachineLanguage>().unwrap(), MachineLanguage::Arm);
        assert!("mips".parse::<MachineLanguage>().is_err());
    }

    #[test]
    fn test_sizes() {
        assert_eq!(MachineLanguage::Arm.min_instruction_size(), 4);
        assert_eq!(MachineLanguage::Thumb2.min_instruction_size(), 2);
        assert_eq!(MachineLanguage::X64.max_instruction_size(), 15);
        assert!(MachineLanguage::Arm.is_fixed_width());
        assert!(!MachineLanguage::Thumb2.is_fixed_width());
    }

    #[test]
    fn test_name_round_trip() {
        for language in MachineLanguage::ALL {
            assert_eq!(language.name().parse::<MachineLanguage>().unwrap(), language);
        }
    }
}
