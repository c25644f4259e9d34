#![no_main]

use libfuzzer_sys::fuzz_target;
use triarch_disasm::traits::Disassembler;
use triarch_disasm::x86::X86Disassembler;

fuzz_target!(|data: &[u8]| {
    // The first byte picks the mode.
    let Some((&mode, code)) = data.split_first() else {
        return;
    };
    let disasm = if mode & 1 == 0 {
        X86Disassembler::new()
    } else {
        X86Disassembler::x64()
    };

    if let Ok(decoded) = disasm.decode_instruction(code, 0x1000) {
        assert!((1..=15).contains(&decoded.size));
        assert!(decoded.size <= code.len());
    }

    let mut offset = 0;
    let mut count = 0;
    while offset < code.len() && count < 100 {
        match disasm.decode_instruction(&code[offset..], 0x1000 + offset as u64) {
            Ok(decoded) => offset += decoded.size.max(1),
            Err(_) => offset += 1,
        }
        count += 1;
    }
});
