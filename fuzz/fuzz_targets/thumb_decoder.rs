#![no_main]

use libfuzzer_sys::fuzz_target;
use triarch_disasm::thumb::ThumbDisassembler;
use triarch_disasm::traits::Disassembler;

fuzz_target!(|data: &[u8]| {
    let disasm = ThumbDisassembler::new();
    let mut offset = 0;
    while offset + 1 < data.len() {
        match disasm.decode_instruction(&data[offset..], 0x8000 + offset as u64) {
            Ok(decoded) => {
                assert!(decoded.size == 2 || decoded.size == 4);
                offset += decoded.size;
            }
            // Only a 32-bit encoding cut short may fail.
            Err(_) => {
                assert!(data.len() - offset < 4);
                break;
            }
        }
    }
});
