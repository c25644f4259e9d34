//! Register and mnemonic name tables shared by the ARM and Thumb decoders.

/// Core register names, indexed by register number.
pub const REGISTER_NAMES: [&str; 16] = [
    "r0", "r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8", "r9", "r10", "fp", "ip", "sp", "lr", "pc",
];

/// VFP system register names used by `vmrs`/`vmsr`.
pub const SPECIAL_REGISTER_NAMES: [&str; 16] = [
    "fpsid", "fpscr", "<arch>", "<arch>", "<arch>", "<arch>", "mvfr1", "mvfr0", "fpexc", "fpinst",
    "fpinst2", "<arch>", "<arch>", "<arch>", "<arch>", "<arch>",
];

/// Condition code suffixes. `al` and the unconditional space print nothing.
pub const CONDITION_CODES: [&str; 16] = [
    "eq", "ne", "cs", "cc", "mi", "pl", "vs", "vc", "hi", "ls", "ge", "lt", "gt", "le", "", "",
];

/// Data-processing mnemonics, indexed by the 4-bit opcode.
pub const DATA_PROCESSING_MNEMONICS: [&str; 16] = [
    "and", "eor", "sub", "rsb", "add", "adc", "sbc", "rsc", "tst", "teq", "cmp", "cmn", "orr", "mov",
    "bic", "mvn",
];

/// Exclusive load/store mnemonics, indexed by op with the exclusive bit cleared.
pub const SYNCHRONIZATION_MNEMONICS: [&str; 8] = [
    "strex", "ldrex", "strexd", "ldrexd", "strexb", "ldrexb", "strexh", "ldrexh",
];

const UNPREDICTABLE: &str = "UNPREDICTABLE";

/// Banked register names for `mrs`/`msr` (banked), indexed by `R:M1:M`.
pub const BANKED_REGISTERS: [&str; 64] = [
    "r8_usr", "r9_usr", "r10_usr", "r11_usr", "r12_usr", "sp_usr", "lr_usr", UNPREDICTABLE,
    "r8_fiq", "r9_fiq", "r10_fiq", "r11_fiq", "r12_fiq", "sp_fiq", "lr_fiq", UNPREDICTABLE,
    "lr_irq", "sp_irq", "lr_svc", "sp_svc", "lr_abt", "sp_abt", "lr_und", "sp_und",
    UNPREDICTABLE, UNPREDICTABLE, UNPREDICTABLE, UNPREDICTABLE,
    "lr_mon", "sp_mon", "elr_hyp", "sp_hyp",
    UNPREDICTABLE, UNPREDICTABLE, UNPREDICTABLE, UNPREDICTABLE,
    UNPREDICTABLE, UNPREDICTABLE, UNPREDICTABLE, UNPREDICTABLE,
    UNPREDICTABLE, UNPREDICTABLE, UNPREDICTABLE, UNPREDICTABLE,
    UNPREDICTABLE, UNPREDICTABLE, "spsr_fiq", UNPREDICTABLE,
    "spsr_irq", UNPREDICTABLE, "spsr_svc", UNPREDICTABLE,
    "spsr_abt", UNPREDICTABLE, "spsr_und", UNPREDICTABLE,
    UNPREDICTABLE, UNPREDICTABLE, UNPREDICTABLE, UNPREDICTABLE,
    "spsr_mon", "spsr_hyp", UNPREDICTABLE, UNPREDICTABLE,
];

/// Parallel add/subtract mnemonics, indexed by `[unsigned][op2 - 1 : op1]`.
pub const PARALLEL_ARITHMETIC_MNEMONICS: [[Option<&str>; 24]; 2] = [
    [
        Some("sadd16"), Some("sasx"), Some("ssax"), Some("ssub16"),
        Some("sadd8"), None, None, Some("ssub8"),
        Some("qadd16"), Some("qasx"), Some("qsax"), Some("qsub16"),
        Some("qadd8"), None, None, Some("qsub8"),
        Some("shadd16"), Some("shasx"), Some("shsax"), Some("shsub16"),
        Some("shadd8"), None, None, Some("shsub8"),
    ],
    [
        Some("uadd16"), Some("uasx"), Some("usax"), Some("usub16"),
        Some("uadd8"), None, None, Some("usub8"),
        Some("uqadd16"), Some("uqasx"), Some("uqsax"), Some("uqsub16"),
        Some("uqadd8"), None, None, Some("uqsub8"),
        Some("uhadd16"), Some("uhasx"), Some("uhsax"), Some("uhsub16"),
        Some("uhadd8"), None, None, Some("uhsub8"),
    ],
];

/// Extend-with-rotate mnemonics, indexed by `[rn == pc][op1]`.
pub const EXTEND_ROTATE_MNEMONICS: [[Option<&str>; 8]; 2] = [
    [
        Some("sxtab16"), None, Some("sxtab"), Some("sxtah"),
        Some("uxtab16"), None, Some("uxtab"), Some("uxtah"),
    ],
    [
        Some("sxtb16"), None, Some("sxtb"), Some("sxth"),
        Some("uxtb16"), None, Some("uxtb"), Some("uxth"),
    ],
];

/// Byte reversal mnemonics.
pub const REVERSE_MNEMONICS: [&str; 4] = ["rev", "rbit", "rev16", "revsh"];

/// Element-count suffix for multiple-element SIMD load/store, indexed by type.
pub const SIMD_ELEMENT_MULTIPLE_SUFFIX: [&str; 11] = [
    "4", "4", "1", "2", "3", "3", "1", "1", "2", "2", "1",
];

/// Register count for multiple-element SIMD load/store, indexed by type.
pub const SIMD_ELEMENT_MULTIPLE_VECTOR_COUNT: [u32; 11] = [4, 4, 4, 4, 3, 3, 3, 1, 2, 2, 2];

/// Returns the name of core register `n`.
#[inline]
pub fn reg(n: u32) -> &'static str {
    REGISTER_NAMES[(n & 0xF) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_aliases() {
        assert_eq!(reg(11), "fp");
        assert_eq!(reg(13), "sp");
        assert_eq!(reg(15), "pc");
        assert_eq!(reg(0x1F), "pc");
    }

    #[test]
    fn test_banked_table_fully_populated() {
        assert_eq!(BANKED_REGISTERS[0x14], "lr_abt");
        assert_eq!(BANKED_REGISTERS[0x2E], "spsr_fiq");
        assert_eq!(BANKED_REGISTERS[0x3D], "spsr_hyp");
        assert_eq!(BANKED_REGISTERS[63], UNPREDICTABLE);
    }

    #[test]
    fn test_parallel_unsigned_saturating_names() {
        assert_eq!(PARALLEL_ARITHMETIC_MNEMONICS[1][9], Some("uqasx"));
        assert_eq!(PARALLEL_ARITHMETIC_MNEMONICS[1][10], Some("uqsax"));
        assert_eq!(PARALLEL_ARITHMETIC_MNEMONICS[0][5], None);
    }
}
