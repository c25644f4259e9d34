//! # triarch-disasm
//!
//! Instruction decoders for the triarch disassembler.
//!
//! This crate provides decoding backends for:
//! - ARM (A32), including VFP and Advanced SIMD
//! - Thumb, 16-bit and 32-bit Thumb-2
//! - x86 and x64, including x87, SSE, AVX (VEX) and XOP
//!
//! Each backend implements [`Disassembler`] and produces an owned
//! [`DecodedInstruction`]. [`disassemble`] is the buffer-based entry point:
//! it writes the text into a caller-supplied byte buffer and hands back a
//! [`DisassembledInstruction`] borrowing from it.

pub mod error;
pub mod traits;

#[cfg(feature = "arm")]
pub mod arm;

#[cfg(feature = "thumb")]
pub mod thumb;

#[cfg(feature = "x86")]
pub mod x86;

pub use error::DecodeError;
pub use traits::{DecodedInstruction, Disassembler, OperandAddress};
pub use triarch_core::{DisassembledInstruction, MachineLanguage, MAX_OPERANDS};

#[cfg(feature = "arm")]
pub use arm::ArmDisassembler;

#[cfg(feature = "thumb")]
pub use thumb::ThumbDisassembler;

#[cfg(feature = "x86")]
pub use x86::X86Disassembler;

/// Decodes one instruction of `language` from `bytes`, which start at
/// `address`.
pub fn decode(language: MachineLanguage, bytes: &[u8], address: u64) -> Result<DecodedInstruction, DecodeError> {
    match language {
        #[cfg(feature = "arm")]
        MachineLanguage::Arm => ArmDisassembler::new().decode_instruction(bytes, address),
        #[cfg(feature = "thumb")]
        MachineLanguage::Thumb2 => ThumbDisassembler::new().decode_instruction(bytes, address),
        #[cfg(feature = "x86")]
        MachineLanguage::X86 => X86Disassembler::new().decode_instruction(bytes, address),
        #[cfg(feature = "x86")]
        MachineLanguage::X64 => X86Disassembler::x64().decode_instruction(bytes, address),
        #[allow(unreachable_patterns)]
        _ => Err(DecodeError::Unsupported(language)),
    }
}

/// Disassembles the instruction at the start of `instruction_stream`.
///
/// The mnemonic and operands are copied into `output_buffer` as
/// NUL-terminated strings and `result` borrows them from there. Nothing in
/// `result` changes unless the call succeeds.
///
/// # Errors
///
/// - [`DecodeError::Truncated`] if the stream is shorter than the smallest
///   instruction of `language`, or ends inside the instruction
/// - [`DecodeError::UnknownOpcode`] for an x86 opcode with no definition
/// - [`DecodeError::BufferTooSmall`] if the text does not fit
///
/// Reserved and undefined encodings are not errors; they decode to a
/// placeholder mnemonic.
pub fn disassemble<'a>(
    instruction_pointer: u64,
    instruction_stream: &[u8],
    output_buffer: &'a mut [u8],
    result: &mut DisassembledInstruction<'a>,
    language: MachineLanguage,
) -> Result<(), DecodeError> {
    let minimum = language.min_instruction_size();
    if instruction_stream.len() < minimum {
        return Err(DecodeError::truncated(instruction_pointer, minimum, instruction_stream.len()));
    }

    let decoded = decode(language, instruction_stream, instruction_pointer)?;
    let needed = decoded.required_buffer_len();
    if output_buffer.len() < needed {
        return Err(DecodeError::buffer_too_small(needed, output_buffer.len()));
    }

    // (start, length) of the mnemonic, then of each operand.
    let mut spans = [None; MAX_OPERANDS + 1];
    let mut offset = 0;
    let texts = std::iter::once(decoded.mnemonic.as_str()).chain(decoded.operands());
    for (span, text) in spans.iter_mut().zip(texts) {
        let end = offset + text.len();
        output_buffer[offset..end].copy_from_slice(text.as_bytes());
        output_buffer[end] = 0;
        *span = Some((offset, text.len()));
        offset = end + 1;
    }

    let buffer: &'a [u8] = output_buffer;
    let text = |span: Option<(usize, usize)>| -> Result<Option<&'a str>, DecodeError> {
        span.map(|(start, len)| {
            std::str::from_utf8(&buffer[start..start + len])
                .map_err(|_| DecodeError::invalid_encoding(instruction_pointer, "instruction text is not UTF-8"))
        })
        .transpose()
    };

    let mut operands = [None; MAX_OPERANDS];
    for (operand, span) in operands.iter_mut().zip(&spans[1..]) {
        *operand = text(*span)?;
    }
    *result = DisassembledInstruction {
        mnemonic: text(spans[0])?.unwrap_or_default(),
        operands,
        operand_address: decoded.operand_address.map_or(0, |address| address.address),
        address_is_valid: decoded.operand_address.is_some(),
        address_is_destination: decoded.operand_address.map_or(false, |address| address.is_destination),
        binary_length: decoded.size as u32,
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(language: MachineLanguage, bytes: &[u8], ip: u64) -> (String, DisassembledInstruction<'static>) {
        let buffer = Box::leak(vec![0u8; 256].into_boxed_slice());
        let mut result = DisassembledInstruction::default();
        disassemble(ip, bytes, buffer, &mut result, language).unwrap();
        (result.to_string(), result)
    }

    #[test]
    fn test_arm_vectors() {
        let (text, result) = run(MachineLanguage::Arm, &0xE1A0_F00Eu32.to_le_bytes(), 0x8000);
        assert_eq!(text, "mov pc, lr");
        assert_eq!(result.binary_length, 4);
        let (_, result) = run(MachineLanguage::Arm, &0xE3A0_0000u32.to_le_bytes(), 0x8000);
        assert_eq!(result.mnemonic, "mov");
        assert_eq!(result.destination_operand(), Some("r0"));
        assert!(result.source_operand().unwrap().contains('0'));
    }

    #[test]
    fn test_thumb_vector() {
        let (_, result) = run(MachineLanguage::Thumb2, &[0x70, 0x47], 0x1000);
        assert_eq!(result.mnemonic, "bx");
        assert_eq!(result.operands().collect::<Vec<_>>(), vec!["lr"]);
        assert_eq!(result.binary_length, 2);
    }

    #[test]
    fn test_x86_vectors() {
        let (_, ret) = run(MachineLanguage::X86, &[0xC3], 0);
        assert_eq!(ret.mnemonic, "ret");
        assert_eq!(ret.operand_count(), 0);
        assert_eq!(ret.binary_length, 1);

        let (_, nop) = run(MachineLanguage::X64, &[0x90], 0);
        assert_eq!(nop.mnemonic, "nop");
        assert_eq!(nop.binary_length, 1);

        let (_, mov) = run(MachineLanguage::X86, &[0xB8, 0x01, 0x00, 0x00, 0x00], 0);
        assert_eq!(mov.mnemonic, "mov");
        assert_eq!(mov.destination_operand(), Some("eax"));
        assert_eq!(mov.source_operand(), Some("0x1"));
        assert_eq!(mov.binary_length, 5);
    }

    #[test]
    fn test_strings_are_nul_terminated() {
        let mut buffer = [0xAAu8; 32];
        let mut result = DisassembledInstruction::default();
        disassemble(0, &[0x89, 0xE5], &mut buffer, &mut result, MachineLanguage::X86).unwrap();
        assert_eq!(result.to_string(), "mov ebp, esp");
        assert_eq!(&buffer[..15], b"mov\0ebp\0esp\0\xAA\xAA\xAA");
    }

    #[test]
    fn test_address_fields() {
        let (_, call) = run(MachineLanguage::X86, &[0xE8, 0x0B, 0x00, 0x00, 0x00], 0x1000);
        assert!(call.address_is_valid);
        assert!(call.address_is_destination);
        assert_eq!(call.address(), Some(0x1010));
        let (_, ret) = run(MachineLanguage::X86, &[0xC3], 0x1000);
        assert!(!ret.address_is_valid);
        assert_eq!(ret.address(), None);
    }

    #[test]
    fn test_buffer_one_byte_short_fails() {
        let cases: [(MachineLanguage, &[u8]); 4] = [
            (MachineLanguage::X86, &[0xB8, 0x01, 0x00, 0x00, 0x00]),
            (MachineLanguage::X64, &[0x48, 0x8B, 0x45, 0xF8]),
            (MachineLanguage::Arm, &[0x0E, 0xF0, 0xA0, 0xE1]),
            (MachineLanguage::Thumb2, &[0x70, 0x47]),
        ];
        for (language, bytes) in cases {
            let needed = decode(language, bytes, 0).unwrap().required_buffer_len();
            let mut exact = vec![0u8; needed];
            let mut result = DisassembledInstruction::default();
            assert!(disassemble(0, bytes, &mut exact, &mut result, language).is_ok());

            let mut short = vec![0u8; needed - 1];
            let mut result = DisassembledInstruction::default();
            assert_eq!(
                disassemble(0, bytes, &mut short, &mut result, language).unwrap_err(),
                DecodeError::buffer_too_small(needed, needed - 1)
            );
            assert_eq!(result, DisassembledInstruction::default());
        }
    }

    #[test]
    fn test_stream_shorter_than_minimum() {
        let mut buffer = [0u8; 64];
        let mut result = DisassembledInstruction::default();
        assert_eq!(
            disassemble(0x40, &[0x00, 0x00], &mut buffer, &mut result, MachineLanguage::Arm).unwrap_err(),
            DecodeError::truncated(0x40, 4, 2)
        );
        let mut result = DisassembledInstruction::default();
        assert!(disassemble(0x40, &[], &mut buffer, &mut result, MachineLanguage::X64).is_err());
    }

    #[test]
    fn test_unknown_opcode_is_reported() {
        let mut buffer = [0u8; 64];
        let mut result = DisassembledInstruction::default();
        assert!(matches!(
            disassemble(0, &[0x0F, 0x04], &mut buffer, &mut result, MachineLanguage::X86),
            Err(DecodeError::UnknownOpcode { .. })
        ));
    }
}
