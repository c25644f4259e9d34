#![no_main]

use libfuzzer_sys::fuzz_target;
use triarch_core::{DisassembledInstruction, MachineLanguage};
use triarch_disasm::disassemble;

fuzz_target!(|data: &[u8]| {
    // First byte: language; second byte: output buffer size.
    let [selector, size, code @ ..] = data else {
        return;
    };
    let language = MachineLanguage::ALL[usize::from(*selector) % MachineLanguage::ALL.len()];
    let capacity = usize::from(*size);
    let mut buffer = vec![0u8; capacity];
    let mut result = DisassembledInstruction::default();
    if disassemble(0x1000, code, &mut buffer, &mut result, language).is_ok() {
        let used = result.mnemonic.len() + 1 + result.operands().map(|op| op.len() + 1).sum::<usize>();
        assert!(used <= capacity);
        assert!(result.binary_length as usize <= code.len());
    }
});
