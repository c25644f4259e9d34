//! Disassembly error types.

use thiserror::Error;
use triarch_core::MachineLanguage;

/// Error type for instruction decoding.
///
/// Reserved, undefined and unpredictable encodings are not errors: they
/// decode to a placeholder mnemonic. These variants are the hard failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// No instruction definition exists for the opcode.
    #[error("unknown opcode at {address:#x}: {bytes:02x?}")]
    UnknownOpcode { address: u64, bytes: Vec<u8> },

    /// The instruction stream ended before the instruction did.
    #[error("truncated instruction at {address:#x}: need {needed} bytes, have {available}")]
    Truncated {
        address: u64,
        needed: usize,
        available: usize,
    },

    /// The bytes cannot form an instruction in the selected mode.
    #[error("invalid encoding at {address:#x}: {reason}")]
    InvalidEncoding { address: u64, reason: String },

    /// A mnemonic or operand outgrew its text buffer.
    #[error("operand text overflow at {address:#x}")]
    OperandOverflow { address: u64 },

    /// The caller's output buffer cannot hold the formatted instruction.
    #[error("output buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// Support for the machine language was compiled out.
    #[error("machine language {0} is not supported by this build")]
    Unsupported(MachineLanguage),
}

impl DecodeError {
    /// Create an unknown opcode error.
    pub fn unknown_opcode(address: u64, bytes: &[u8]) -> Self {
        Self::UnknownOpcode {
            address,
            bytes: bytes.to_vec(),
        }
    }

    /// Create a truncated instruction error.
    pub fn truncated(address: u64, needed: usize, available: usize) -> Self {
        Self::Truncated {
            address,
            needed,
            available,
        }
    }

    /// Create an invalid encoding error.
    pub fn invalid_encoding(address: u64, reason: impl Into<String>) -> Self {
        Self::InvalidEncoding {
            address,
            reason: reason.into(),
        }
    }

    /// Create an operand overflow error.
    pub fn overflow(address: u64) -> Self {
        Self::OperandOverflow { address }
    }

    /// Create an output buffer error.
    pub fn buffer_too_small(needed: usize, available: usize) -> Self {
        Self::BufferTooSmall { needed, available }
    }
}
