//! x86 register names.

/// 8-bit registers without a REX prefix: numbers 4-7 are the high bytes.
pub(crate) const REG8_LEGACY: [&str; 16] = [
    "al", "cl", "dl", "bl", "ah", "ch", "dh", "bh", "r8b", "r9b", "r10b", "r11b", "r12b", "r13b",
    "r14b", "r15b",
];

/// 8-bit registers once any REX prefix is present.
pub(crate) const REG8_REX: [&str; 16] = [
    "al", "cl", "dl", "bl", "spl", "bpl", "sil", "dil", "r8b", "r9b", "r10b", "r11b", "r12b",
    "r13b", "r14b", "r15b",
];

pub(crate) const REG16: [&str; 16] = [
    "ax", "cx", "dx", "bx", "sp", "bp", "si", "di", "r8w", "r9w", "r10w", "r11w", "r12w", "r13w",
    "r14w", "r15w",
];

pub(crate) const REG32: [&str; 16] = [
    "eax", "ecx", "edx", "ebx", "esp", "ebp", "esi", "edi", "r8d", "r9d", "r10d", "r11d", "r12d",
    "r13d", "r14d", "r15d",
];

pub(crate) const REG64: [&str; 16] = [
    "rax", "rcx", "rdx", "rbx", "rsp", "rbp", "rsi", "rdi", "r8", "r9", "r10", "r11", "r12", "r13",
    "r14", "r15",
];

/// Segment registers in ModR/M.reg order; 6 and 7 are reserved.
pub(crate) const SEGMENT: [Option<&str>; 8] = [
    Some("es"),
    Some("cs"),
    Some("ss"),
    Some("ds"),
    Some("fs"),
    Some("gs"),
    None,
    None,
];

pub(crate) const CONTROL: [&str; 16] = [
    "cr0", "cr1", "cr2", "cr3", "cr4", "cr5", "cr6", "cr7", "cr8", "cr9", "cr10", "cr11", "cr12",
    "cr13", "cr14", "cr15",
];

pub(crate) const DEBUG: [&str; 16] = [
    "dr0", "dr1", "dr2", "dr3", "dr4", "dr5", "dr6", "dr7", "dr8", "dr9", "dr10", "dr11", "dr12",
    "dr13", "dr14", "dr15",
];

pub(crate) const X87: [&str; 8] = [
    "st(0)", "st(1)", "st(2)", "st(3)", "st(4)", "st(5)", "st(6)", "st(7)",
];

pub(crate) const MMX: [&str; 8] = ["mm0", "mm1", "mm2", "mm3", "mm4", "mm5", "mm6", "mm7"];

pub(crate) const XMM: [&str; 16] = [
    "xmm0", "xmm1", "xmm2", "xmm3", "xmm4", "xmm5", "xmm6", "xmm7", "xmm8", "xmm9", "xmm10",
    "xmm11", "xmm12", "xmm13", "xmm14", "xmm15",
];

pub(crate) const YMM: [&str; 16] = [
    "ymm0", "ymm1", "ymm2", "ymm3", "ymm4", "ymm5", "ymm6", "ymm7", "ymm8", "ymm9", "ymm10",
    "ymm11", "ymm12", "ymm13", "ymm14", "ymm15",
];

/// Names a general-purpose register of the given width in bits.
pub(crate) fn gpr(number: u8, bits: u16, rex_present: bool) -> &'static str {
    let index = usize::from(number & 0xF);
    match bits {
        8 if rex_present => REG8_REX[index],
        8 => REG8_LEGACY[index],
        16 => REG16[index],
        64 => REG64[index],
        _ => REG32[index],
    }
}

/// Names a vector register, `ymm` when `wide` is set.
pub(crate) fn vector(number: u8, wide: bool) -> &'static str {
    let index = usize::from(number & 0xF);
    if wide {
        YMM[index]
    } else {
        XMM[index]
    }
}
