#![no_main]

use libfuzzer_sys::fuzz_target;
use triarch_disasm::arm::ArmDisassembler;
use triarch_disasm::traits::Disassembler;

fuzz_target!(|data: &[u8]| {
    let disasm = ArmDisassembler::new();
    for (index, word) in data.chunks_exact(4).take(256).enumerate() {
        let address = 0x8000 + 4 * index as u64;
        // Every 32-bit word decodes to something.
        let decoded = disasm.decode_instruction(word, address);
        assert!(matches!(decoded, Ok(ref d) if d.size == 4), "{word:02x?}: {decoded:?}");
    }
});
