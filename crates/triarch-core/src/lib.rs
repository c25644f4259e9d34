//! # triarch-core
//!
//! Core abstractions for the triarch disassembler. This crate defines the
//! machine language selector, the output record handed back to callers,
//! bounded text buffers used while decoding, and the ordered mask/value
//! tables the ARM and Thumb decoders are built from.

pub mod arch;
pub mod dispatch;
pub mod error;
pub mod instruction;
pub mod text;

pub use arch::MachineLanguage;
pub use dispatch::{decode_with_table, find_entry, DecodeEntry, Handler};
pub use error::Error;
pub use instruction::{DisassembledInstruction, MAX_OPERANDS};
pub use text::{TextBuf, OPERAND_CAPACITY};
