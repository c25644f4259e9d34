//! Property-based tests for instruction decoders.
//!
//! These tests verify invariants that should hold for every decoder:
//! - Decoding never panics on arbitrary input
//! - Decoded instruction size is within the language's bounds
//! - Decoding is deterministic
//! - The buffer entry point never reports a truncated success

use proptest::prelude::*;

use triarch_disasm::{
    decode, disassemble, ArmDisassembler, DecodeError, Disassembler, DisassembledInstruction, MachineLanguage,
    ThumbDisassembler, X86Disassembler,
};

fn language() -> impl Strategy<Value = MachineLanguage> {
    prop::sample::select(MachineLanguage::ALL.to_vec())
}

// =============================================================================
// x86 / x64 Decoder Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10000))]

    #[test]
    fn x86_decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..32), long_mode in any::<bool>()) {
        let disasm = if long_mode { X86Disassembler::x64() } else { X86Disassembler::new() };
        let _ = disasm.decode_instruction(&bytes, 0x1000);
    }

    #[test]
    fn x86_decoded_size_is_valid(bytes in prop::collection::vec(any::<u8>(), 1..32), long_mode in any::<bool>()) {
        let disasm = if long_mode { X86Disassembler::x64() } else { X86Disassembler::new() };
        if let Ok(decoded) = disasm.decode_instruction(&bytes, 0x1000) {
            prop_assert!(decoded.size >= 1, "Instruction size must be at least 1");
            prop_assert!(decoded.size <= 15, "Instruction size must be at most 15");
            prop_assert!(decoded.size <= bytes.len(), "Instruction size cannot exceed input length");
            prop_assert!(!decoded.mnemonic.is_empty(), "Mnemonic should not be empty");
        }
    }

    /// Trailing bytes never change how an instruction decodes.
    #[test]
    fn x86_trailing_bytes_are_ignored(
        bytes in prop::collection::vec(any::<u8>(), 1..16),
        tail in prop::collection::vec(any::<u8>(), 1..16),
    ) {
        let disasm = X86Disassembler::x64();
        if let Ok(decoded) = disasm.decode_instruction(&bytes, 0x1000) {
            let mut longer = bytes[..decoded.size].to_vec();
            longer.extend_from_slice(&tail);
            let again = disasm.decode_instruction(&longer, 0x1000);
            prop_assert_eq!(again, Ok(decoded));
        }
    }

    #[test]
    fn x86_sequential_decode_covers_all_bytes(bytes in prop::collection::vec(any::<u8>(), 16..128)) {
        let disasm = X86Disassembler::new();
        let mut offset = 0;
        while offset < bytes.len() {
            match disasm.decode_instruction(&bytes[offset..], 0x1000 + offset as u64) {
                Ok(inst) => {
                    prop_assert!(inst.size > 0, "Decoded size must be positive");
                    offset += inst.size;
                }
                Err(_) => offset += 1,
            }
        }
        prop_assert_eq!(offset, bytes.len());
    }
}

// =============================================================================
// ARM / Thumb Decoder Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10000))]

    #[test]
    fn arm_size_is_always_four(word in any::<u32>()) {
        let decoded = ArmDisassembler::new().decode_instruction(&word.to_le_bytes(), 0x8000);
        prop_assert!(decoded.is_ok(), "ARM decoding should not fail: {:?}", decoded);
        if let Ok(decoded) = decoded {
            prop_assert_eq!(decoded.size, 4);
            prop_assert!(!decoded.mnemonic.is_empty());
        }
    }

    #[test]
    fn thumb_size_follows_width(first in any::<u16>(), second in any::<u16>()) {
        let mut bytes = first.to_le_bytes().to_vec();
        bytes.extend_from_slice(&second.to_le_bytes());
        let decoded = ThumbDisassembler::new().decode_instruction(&bytes, 0x8000);
        prop_assert!(decoded.is_ok(), "Thumb decoding should not fail: {:?}", decoded);
        if let Ok(decoded) = decoded {
            let expected = if triarch_disasm::thumb::is_wide(first) { 4 } else { 2 };
            prop_assert_eq!(decoded.size, expected);
        }
    }
}

// =============================================================================
// Entry Point Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    #[test]
    fn decode_is_deterministic(language in language(), bytes in prop::collection::vec(any::<u8>(), 0..16)) {
        prop_assert_eq!(decode(language, &bytes, 0x4000), decode(language, &bytes, 0x4000));
    }

    /// A buffer one byte short of the text always fails.
    #[test]
    fn short_buffer_never_succeeds(language in language(), bytes in prop::collection::vec(any::<u8>(), 4..16)) {
        if let Ok(decoded) = decode(language, &bytes, 0x4000) {
            let needed = decoded.required_buffer_len();
            let mut short = vec![0u8; needed - 1];
            let mut result = DisassembledInstruction::default();
            prop_assert_eq!(
                disassemble(0x4000, &bytes, &mut short, &mut result, language),
                Err(DecodeError::buffer_too_small(needed, needed - 1))
            );

            let mut exact = vec![0u8; needed];
            let mut result = DisassembledInstruction::default();
            prop_assert!(disassemble(0x4000, &bytes, &mut exact, &mut result, language).is_ok());
            prop_assert_eq!(result.binary_length as usize, decoded.size);
            prop_assert_eq!(result.to_string(), decoded.to_string());
        }
    }
}
