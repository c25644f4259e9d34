//! Escaped opcode maps: `0F xx`, `0F 38 xx`, `0F 3A xx` and XOP maps 8-10.
//!
//! These maps are sparse and keyed by `(mandatory prefix, opcode)`, so each
//! map is a list of slices searched in order. The packed integer and packed
//! float families are generated, since every member of a family has the
//! same shape under each prefix.

use super::operand::codes::*;
use super::operand::{find_exact, Definition, GroupEntry, Operand, SparseEntry};
use super::prefix::Mandatory;

const fn d(mnemonic: &'static str, operands: &'static [Operand]) -> Definition {
    Definition::new(mnemonic, operands)
}

const fn none(opcode: u8, definition: Definition) -> SparseEntry {
    SparseEntry::new(Mandatory::None, opcode, definition)
}

const fn osize(opcode: u8, definition: Definition) -> SparseEntry {
    SparseEntry::new(Mandatory::OperandSize, opcode, definition)
}

const fn rep(opcode: u8, definition: Definition) -> SparseEntry {
    SparseEntry::new(Mandatory::Rep, opcode, definition)
}

const fn repne(opcode: u8, definition: Definition) -> SparseEntry {
    SparseEntry::new(Mandatory::Repne, opcode, definition)
}

const M: Operand = Operand::M;
const P: Operand = Operand::P;
const Q: Operand = Operand::Q;
const N: Operand = Operand::N;

/// MMX form without a prefix, SSE/AVX form with 66.
macro_rules! packed_integer {
    ($($opcode:literal => $name:literal),* $(,)?) => {
        &[$(
            none($opcode, d($name, &[P, Q])),
            osize($opcode, d($name, &[Vx, Hx, Wx]).vex()),
        )*]
    };
}

/// `ps`, `pd`, `ss` and `sd` forms under no prefix, 66, F3 and F2.
macro_rules! packed_float {
    ($($opcode:literal => $name:literal),* $(,)?) => {
        &[$(
            none($opcode, d(concat!($name, "ps"), &[Vx, Hx, Wx]).vex()),
            osize($opcode, d(concat!($name, "pd"), &[Vx, Hx, Wx]).vex()),
            rep($opcode, d(concat!($name, "ss"), &[Vdq, Hdq, Wdq]).vex()),
            repne($opcode, d(concat!($name, "sd"), &[Vdq, Hdq, Wdq]).vex()),
        )*]
    };
}

/// cmovcc, jcc and setcc for one condition.
macro_rules! conditional {
    ($($cc:literal => $suffix:literal),* $(,)?) => {
        &[$(
            none(0x40 + $cc, d(concat!("cmov", $suffix), &[Gv, Ev])),
            none(0x80 + $cc, d(concat!("j", $suffix), &[Jz])),
            none(0x90 + $cc, d(concat!("set", $suffix), &[Eb])),
        )*]
    };
}

/// 66-only SSE4 forms, VEX encodable.
macro_rules! sse4 {
    ($operands:expr; $($opcode:literal => $name:literal),* $(,)?) => {
        &[$(osize($opcode, d($name, $operands).vex()),)*]
    };
}

static SYSTEM: &[SparseEntry] = &[
    none(0x00, Definition::group(GROUP_6, &[])),
    none(0x01, Definition::group(GROUP_7, &[])),
    none(0x02, d("lar", &[Gv, Ew])),
    none(0x03, d("lsl", &[Gv, Ew])),
    none(0x05, d("syscall", &[])),
    none(0x06, d("clts", &[])),
    none(0x07, d("sysret", &[])),
    none(0x08, d("invd", &[])),
    none(0x09, d("wbinvd", &[])),
    none(0x0B, d("ud2", &[])),
    none(0x0D, Definition::group(GROUP_PREFETCH_W, &[])),
    none(0x18, Definition::group(GROUP_16, &[])),
    none(0x19, d("nop", &[Ev])),
    none(0x1A, d("nop", &[Ev])),
    none(0x1B, d("nop", &[Ev])),
    none(0x1C, d("nop", &[Ev])),
    none(0x1D, d("nop", &[Ev])),
    none(0x1E, Definition::group(GROUP_BRANCH_HINT, &[])),
    none(0x1F, d("nop", &[Ev])),
    none(0x20, d("mov", &[Rn, Operand::C])),
    none(0x21, d("mov", &[Rn, Operand::D])),
    none(0x22, d("mov", &[Operand::C, Rn])),
    none(0x23, d("mov", &[Operand::D, Rn])),
    none(0x30, d("wrmsr", &[])),
    none(0x31, d("rdtsc", &[])),
    none(0x32, d("rdmsr", &[])),
    none(0x33, d("rdpmc", &[])),
    none(0x34, d("sysenter", &[])),
    none(0x35, d("sysexit", &[])),
    none(0x37, d("getsec", &[])),
    none(0xA0, d("push", &[Operand::Fixed("fs")])),
    none(0xA1, d("pop", &[Operand::Fixed("fs")])),
    none(0xA2, d("cpuid", &[])),
    none(0xA3, d("bt", &[Ev, Gv])),
    none(0xA4, d("shld", &[Ev, Gv, Ib])),
    none(0xA5, d("shld", &[Ev, Gv, CL])),
    none(0xA8, d("push", &[Operand::Fixed("gs")])),
    none(0xA9, d("pop", &[Operand::Fixed("gs")])),
    none(0xAA, d("rsm", &[])),
    none(0xAB, d("bts", &[Ev, Gv])),
    none(0xAC, d("shrd", &[Ev, Gv, Ib])),
    none(0xAD, d("shrd", &[Ev, Gv, CL])),
    none(0xAE, Definition::group(GROUP_15, &[]).vex()),
    none(0xAF, d("imul", &[Gv, Ev])),
    none(0xB0, d("cmpxchg", &[Eb, Gb])),
    none(0xB1, d("cmpxchg", &[Ev, Gv])),
    none(0xB2, d("lss", &[Gz, M])),
    none(0xB3, d("btr", &[Ev, Gv])),
    none(0xB4, d("lfs", &[Gz, M])),
    none(0xB5, d("lgs", &[Gz, M])),
    none(0xB6, d("movzx", &[Gv, Eb])),
    none(0xB7, d("movzx", &[Gv, Ew])),
    none(0xB8, d("jmpe", &[Jz])),
    rep(0xB8, d("popcnt", &[Gv, Ev])),
    none(0xB9, d("ud1", &[Gv, Ev])),
    none(0xBA, Definition::group(GROUP_8, &[Ev, Ib])),
    none(0xBB, d("btc", &[Ev, Gv])),
    none(0xBC, d("bsf", &[Gv, Ev])),
    rep(0xBC, d("tzcnt", &[Gv, Ev])),
    none(0xBD, d("bsr", &[Gv, Ev])),
    rep(0xBD, d("lzcnt", &[Gv, Ev])),
    none(0xBE, d("movsx", &[Gv, Eb])),
    none(0xBF, d("movsx", &[Gv, Ew])),
    none(0xC0, d("xadd", &[Eb, Gb])),
    none(0xC1, d("xadd", &[Ev, Gv])),
    none(0xC3, d("movnti", &[M, Gy])),
    none(0xC7, Definition::group(GROUP_9, &[])),
    none(0xC8, d("bswap", &[Zy])),
    none(0xC9, d("bswap", &[Zy])),
    none(0xCA, d("bswap", &[Zy])),
    none(0xCB, d("bswap", &[Zy])),
    none(0xCC, d("bswap", &[Zy])),
    none(0xCD, d("bswap", &[Zy])),
    none(0xCE, d("bswap", &[Zy])),
    none(0xCF, d("bswap", &[Zy])),
    none(0xFF, d("ud0", &[Gv, Ev])),
];

static CONDITIONAL: &[SparseEntry] = conditional![
    0x0 => "o", 0x1 => "no", 0x2 => "b", 0x3 => "ae",
    0x4 => "e", 0x5 => "ne", 0x6 => "be", 0x7 => "a",
    0x8 => "s", 0x9 => "ns", 0xA => "p", 0xB => "np",
    0xC => "l", 0xD => "ge", 0xE => "le", 0xF => "g",
];

static SSE_MOVES: &[SparseEntry] = &[
    none(0x10, d("movups", &[Vx, Wx]).vex()),
    osize(0x10, d("movupd", &[Vx, Wx]).vex()),
    rep(0x10, d("movss", &[Vdq, Hdq, Wdq]).vex()),
    repne(0x10, d("movsd", &[Vdq, Hdq, Wdq]).vex()),
    none(0x11, d("movups", &[Wx, Vx]).vex()),
    osize(0x11, d("movupd", &[Wx, Vx]).vex()),
    rep(0x11, d("movss", &[Wdq, Hdq, Vdq]).vex()),
    repne(0x11, d("movsd", &[Wdq, Hdq, Vdq]).vex()),
    none(0x12, d("movlps", &[Vdq, Hdq, Wdq]).vex()),
    osize(0x12, d("movlpd", &[Vdq, Hdq, M]).vex()),
    rep(0x12, d("movsldup", &[Vx, Wx]).vex()),
    repne(0x12, d("movddup", &[Vx, Wx]).vex()),
    none(0x13, d("movlps", &[M, Vdq]).vex()),
    osize(0x13, d("movlpd", &[M, Vdq]).vex()),
    none(0x14, d("unpcklps", &[Vx, Hx, Wx]).vex()),
    osize(0x14, d("unpcklpd", &[Vx, Hx, Wx]).vex()),
    none(0x15, d("unpckhps", &[Vx, Hx, Wx]).vex()),
    osize(0x15, d("unpckhpd", &[Vx, Hx, Wx]).vex()),
    none(0x16, d("movhps", &[Vdq, Hdq, Wdq]).vex()),
    osize(0x16, d("movhpd", &[Vdq, Hdq, M]).vex()),
    rep(0x16, d("movshdup", &[Vx, Wx]).vex()),
    none(0x17, d("movhps", &[M, Vdq]).vex()),
    osize(0x17, d("movhpd", &[M, Vdq]).vex()),
    none(0x28, d("movaps", &[Vx, Wx]).vex()),
    osize(0x28, d("movapd", &[Vx, Wx]).vex()),
    none(0x29, d("movaps", &[Wx, Vx]).vex()),
    osize(0x29, d("movapd", &[Wx, Vx]).vex()),
    none(0x2A, d("cvtpi2ps", &[Vdq, Q])),
    osize(0x2A, d("cvtpi2pd", &[Vdq, Q])),
    rep(0x2A, d("cvtsi2ss", &[Vdq, Hdq, Ey]).vex()),
    repne(0x2A, d("cvtsi2sd", &[Vdq, Hdq, Ey]).vex()),
    none(0x2B, d("movntps", &[M, Vx]).vex()),
    osize(0x2B, d("movntpd", &[M, Vx]).vex()),
    none(0x2C, d("cvttps2pi", &[P, Wdq])),
    osize(0x2C, d("cvttpd2pi", &[P, Wdq])),
    rep(0x2C, d("cvttss2si", &[Gy, Wdq]).vex()),
    repne(0x2C, d("cvttsd2si", &[Gy, Wdq]).vex()),
    none(0x2D, d("cvtps2pi", &[P, Wdq])),
    osize(0x2D, d("cvtpd2pi", &[P, Wdq])),
    rep(0x2D, d("cvtss2si", &[Gy, Wdq]).vex()),
    repne(0x2D, d("cvtsd2si", &[Gy, Wdq]).vex()),
    none(0x2E, d("ucomiss", &[Vdq, Wdq]).vex()),
    osize(0x2E, d("ucomisd", &[Vdq, Wdq]).vex()),
    none(0x2F, d("comiss", &[Vdq, Wdq]).vex()),
    osize(0x2F, d("comisd", &[Vdq, Wdq]).vex()),
    none(0x50, d("movmskps", &[Gd, Ux]).vex()),
    osize(0x50, d("movmskpd", &[Gd, Ux]).vex()),
    none(0x51, d("sqrtps", &[Vx, Wx]).vex()),
    osize(0x51, d("sqrtpd", &[Vx, Wx]).vex()),
    rep(0x51, d("sqrtss", &[Vdq, Hdq, Wdq]).vex()),
    repne(0x51, d("sqrtsd", &[Vdq, Hdq, Wdq]).vex()),
    none(0x52, d("rsqrtps", &[Vx, Wx]).vex()),
    rep(0x52, d("rsqrtss", &[Vdq, Hdq, Wdq]).vex()),
    none(0x53, d("rcpps", &[Vx, Wx]).vex()),
    rep(0x53, d("rcpss", &[Vdq, Hdq, Wdq]).vex()),
    none(0x54, d("andps", &[Vx, Hx, Wx]).vex()),
    osize(0x54, d("andpd", &[Vx, Hx, Wx]).vex()),
    none(0x55, d("andnps", &[Vx, Hx, Wx]).vex()),
    osize(0x55, d("andnpd", &[Vx, Hx, Wx]).vex()),
    none(0x56, d("orps", &[Vx, Hx, Wx]).vex()),
    osize(0x56, d("orpd", &[Vx, Hx, Wx]).vex()),
    none(0x57, d("xorps", &[Vx, Hx, Wx]).vex()),
    osize(0x57, d("xorpd", &[Vx, Hx, Wx]).vex()),
    none(0x5A, d("cvtps2pd", &[Vx, Wx]).vex()),
    osize(0x5A, d("cvtpd2ps", &[Vx, Wx]).vex()),
    rep(0x5A, d("cvtss2sd", &[Vdq, Hdq, Wdq]).vex()),
    repne(0x5A, d("cvtsd2ss", &[Vdq, Hdq, Wdq]).vex()),
    none(0x5B, d("cvtdq2ps", &[Vx, Wx]).vex()),
    osize(0x5B, d("cvtps2dq", &[Vx, Wx]).vex()),
    rep(0x5B, d("cvttps2dq", &[Vx, Wx]).vex()),
    osize(0x6C, d("punpcklqdq", &[Vx, Hx, Wx]).vex()),
    osize(0x6D, d("punpckhqdq", &[Vx, Hx, Wx]).vex()),
    none(0x6E, Definition::by_w(["movd", "movq"], &[P, Ey])),
    osize(0x6E, Definition::by_w(["movd", "movq"], &[Vdq, Ey]).vex()),
    none(0x6F, d("movq", &[P, Q])),
    osize(0x6F, d("movdqa", &[Vx, Wx]).vex()),
    rep(0x6F, d("movdqu", &[Vx, Wx]).vex()),
    none(0x70, d("pshufw", &[P, Q, Ib])),
    osize(0x70, d("pshufd", &[Vx, Wx, Ib]).vex()),
    rep(0x70, d("pshufhw", &[Vx, Wx, Ib]).vex()),
    repne(0x70, d("pshuflw", &[Vx, Wx, Ib]).vex()),
    none(0x71, Definition::group(GROUP_12, &[]).vex()),
    none(0x72, Definition::group(GROUP_13, &[]).vex()),
    none(0x73, Definition::group(GROUP_14, &[]).vex()),
    none(0x77, d("emms", &[])),
    none(0x77, d("vzeroupper", &[]).vex_only()),
    osize(0x7C, d("haddpd", &[Vx, Hx, Wx]).vex()),
    repne(0x7C, d("haddps", &[Vx, Hx, Wx]).vex()),
    osize(0x7D, d("hsubpd", &[Vx, Hx, Wx]).vex()),
    repne(0x7D, d("hsubps", &[Vx, Hx, Wx]).vex()),
    none(0x7E, Definition::by_w(["movd", "movq"], &[Ey, P])),
    osize(0x7E, Definition::by_w(["movd", "movq"], &[Ey, Vdq]).vex()),
    rep(0x7E, d("movq", &[Vdq, Wdq]).vex()),
    none(0x7F, d("movq", &[Q, P])),
    osize(0x7F, d("movdqa", &[Wx, Vx]).vex()),
    rep(0x7F, d("movdqu", &[Wx, Vx]).vex()),
    none(0xC2, d("cmpps", &[Vx, Hx, Wx, Ib]).vex()),
    osize(0xC2, d("cmppd", &[Vx, Hx, Wx, Ib]).vex()),
    rep(0xC2, d("cmpss", &[Vdq, Hdq, Wdq, Ib]).vex()),
    repne(0xC2, d("cmpsd", &[Vdq, Hdq, Wdq, Ib]).vex()),
    none(0xC4, d("pinsrw", &[P, Ed, Ib])),
    osize(0xC4, d("pinsrw", &[Vdq, Hdq, Ed, Ib]).vex()),
    none(0xC5, d("pextrw", &[Gd, N, Ib])),
    osize(0xC5, d("pextrw", &[Gd, Udq, Ib]).vex()),
    none(0xC6, d("shufps", &[Vx, Hx, Wx, Ib]).vex()),
    osize(0xC6, d("shufpd", &[Vx, Hx, Wx, Ib]).vex()),
    osize(0xD0, d("addsubpd", &[Vx, Hx, Wx]).vex()),
    repne(0xD0, d("addsubps", &[Vx, Hx, Wx]).vex()),
    osize(0xD6, d("movq", &[Wdq, Vdq]).vex()),
    rep(0xD6, d("movq2dq", &[Vdq, N])),
    repne(0xD6, d("movdq2q", &[P, Udq])),
    none(0xD7, d("pmovmskb", &[Gd, N])),
    osize(0xD7, d("pmovmskb", &[Gd, Ux]).vex()),
    osize(0xE6, d("cvttpd2dq", &[Vx, Wx]).vex()),
    rep(0xE6, d("cvtdq2pd", &[Vx, Wx]).vex()),
    repne(0xE6, d("cvtpd2dq", &[Vx, Wx]).vex()),
    none(0xE7, d("movntq", &[M, P])),
    osize(0xE7, d("movntdq", &[M, Vx]).vex()),
    repne(0xF0, d("lddqu", &[Vx, M]).vex()),
    none(0xF7, d("maskmovq", &[P, N])),
    osize(0xF7, d("maskmovdqu", &[Vdq, Udq]).vex()),
];

static PACKED_FLOAT: &[SparseEntry] = packed_float![
    0x58 => "add", 0x59 => "mul", 0x5C => "sub", 0x5D => "min", 0x5E => "div", 0x5F => "max",
];

static PACKED_INTEGER: &[SparseEntry] = packed_integer![
    0x60 => "punpcklbw", 0x61 => "punpcklwd", 0x62 => "punpckldq", 0x63 => "packsswb",
    0x64 => "pcmpgtb", 0x65 => "pcmpgtw", 0x66 => "pcmpgtd", 0x67 => "packuswb",
    0x68 => "punpckhbw", 0x69 => "punpckhwd", 0x6A => "punpckhdq", 0x6B => "packssdw",
    0x74 => "pcmpeqb", 0x75 => "pcmpeqw", 0x76 => "pcmpeqd",
    0xD1 => "psrlw", 0xD2 => "psrld", 0xD3 => "psrlq", 0xD4 => "paddq", 0xD5 => "pmullw",
    0xD8 => "psubusb", 0xD9 => "psubusw", 0xDA => "pminub", 0xDB => "pand",
    0xDC => "paddusb", 0xDD => "paddusw", 0xDE => "pmaxub", 0xDF => "pandn",
    0xE0 => "pavgb", 0xE1 => "psraw", 0xE2 => "psrad", 0xE3 => "pavgw",
    0xE4 => "pmulhuw", 0xE5 => "pmulhw",
    0xE8 => "psubsb", 0xE9 => "psubsw", 0xEA => "pminsw", 0xEB => "por",
    0xEC => "paddsb", 0xED => "paddsw", 0xEE => "pmaxsw", 0xEF => "pxor",
    0xF1 => "psllw", 0xF2 => "pslld", 0xF3 => "psllq", 0xF4 => "pmuludq",
    0xF5 => "pmaddwd", 0xF6 => "psadbw",
    0xF8 => "psubb", 0xF9 => "psubw", 0xFA => "psubd", 0xFB => "psubq",
    0xFC => "paddb", 0xFD => "paddw", 0xFE => "paddd",
];

/// The `0F xx` map, searched in order.
static TWO_BYTE: &[&[SparseEntry]] = &[SYSTEM, CONDITIONAL, SSE_MOVES, PACKED_FLOAT, PACKED_INTEGER];

static MAP_0F38_INTEGER: &[SparseEntry] = packed_integer![
    0x00 => "pshufb", 0x01 => "phaddw", 0x02 => "phaddd", 0x03 => "phaddsw",
    0x04 => "pmaddubsw", 0x05 => "phsubw", 0x06 => "phsubd", 0x07 => "phsubsw",
    0x08 => "psignb", 0x09 => "psignw", 0x0A => "psignd", 0x0B => "pmulhrsw",
];

static MAP_0F38_THREE: &[SparseEntry] = sse4![&[Vx, Hx, Wx];
    0x28 => "pmuldq", 0x29 => "pcmpeqq", 0x2B => "packusdw", 0x37 => "pcmpgtq",
    0x38 => "pminsb", 0x39 => "pminsd", 0x3A => "pminuw", 0x3B => "pminud",
    0x3C => "pmaxsb", 0x3D => "pmaxsd", 0x3E => "pmaxuw", 0x3F => "pmaxud",
    0x40 => "pmulld",
];

static MAP_0F38_EXTEND: &[SparseEntry] = sse4![&[Vx, Wdq];
    0x20 => "pmovsxbw", 0x21 => "pmovsxbd", 0x22 => "pmovsxbq",
    0x23 => "pmovsxwd", 0x24 => "pmovsxwq", 0x25 => "pmovsxdq",
    0x30 => "pmovzxbw", 0x31 => "pmovzxbd", 0x32 => "pmovzxbq",
    0x33 => "pmovzxwd", 0x34 => "pmovzxwq", 0x35 => "pmovzxdq",
];

static MAP_0F38_OTHER: &[SparseEntry] = &[
    osize(0x10, d("pblendvb", &[Vdq, Wdq, XMM0])),
    osize(0x14, d("blendvps", &[Vdq, Wdq, XMM0])),
    osize(0x15, d("blendvpd", &[Vdq, Wdq, XMM0])),
    osize(0x17, d("ptest", &[Vx, Wx]).vex()),
    osize(0x18, d("vbroadcastss", &[Vx, Wdq]).vex_only()),
    osize(0x19, d("vbroadcastsd", &[Vqq, Wdq]).vex_only()),
    osize(0x1A, d("vbroadcastf128", &[Vqq, M]).vex_only()),
    none(0x1C, d("pabsb", &[P, Q])),
    osize(0x1C, d("pabsb", &[Vx, Wx]).vex()),
    none(0x1D, d("pabsw", &[P, Q])),
    osize(0x1D, d("pabsw", &[Vx, Wx]).vex()),
    none(0x1E, d("pabsd", &[P, Q])),
    osize(0x1E, d("pabsd", &[Vx, Wx]).vex()),
    osize(0x2A, d("movntdqa", &[Vx, M]).vex()),
    osize(0x41, d("phminposuw", &[Vdq, Wdq]).vex()),
    osize(0x58, d("vpbroadcastd", &[Vx, Wdq]).vex_only()),
    osize(0x59, d("vpbroadcastq", &[Vx, Wdq]).vex_only()),
    osize(0x5A, d("vbroadcasti128", &[Vqq, M]).vex_only()),
    osize(0x78, d("vpbroadcastb", &[Vx, Wdq]).vex_only()),
    osize(0x79, d("vpbroadcastw", &[Vx, Wdq]).vex_only()),
    osize(0x98, Definition::by_w(["vfmadd132ps", "vfmadd132pd"], &[Vx, Hx, Wx]).vex_only()),
    osize(0x99, Definition::by_w(["vfmadd132ss", "vfmadd132sd"], &[Vdq, Hdq, Wdq]).vex_only()),
    osize(0x9A, Definition::by_w(["vfmsub132ps", "vfmsub132pd"], &[Vx, Hx, Wx]).vex_only()),
    osize(0x9C, Definition::by_w(["vfnmadd132ps", "vfnmadd132pd"], &[Vx, Hx, Wx]).vex_only()),
    osize(0x9E, Definition::by_w(["vfnmsub132ps", "vfnmsub132pd"], &[Vx, Hx, Wx]).vex_only()),
    osize(0xA8, Definition::by_w(["vfmadd213ps", "vfmadd213pd"], &[Vx, Hx, Wx]).vex_only()),
    osize(0xA9, Definition::by_w(["vfmadd213ss", "vfmadd213sd"], &[Vdq, Hdq, Wdq]).vex_only()),
    osize(0xAA, Definition::by_w(["vfmsub213ps", "vfmsub213pd"], &[Vx, Hx, Wx]).vex_only()),
    osize(0xAC, Definition::by_w(["vfnmadd213ps", "vfnmadd213pd"], &[Vx, Hx, Wx]).vex_only()),
    osize(0xAE, Definition::by_w(["vfnmsub213ps", "vfnmsub213pd"], &[Vx, Hx, Wx]).vex_only()),
    osize(0xB8, Definition::by_w(["vfmadd231ps", "vfmadd231pd"], &[Vx, Hx, Wx]).vex_only()),
    osize(0xB9, Definition::by_w(["vfmadd231ss", "vfmadd231sd"], &[Vdq, Hdq, Wdq]).vex_only()),
    osize(0xBA, Definition::by_w(["vfmsub231ps", "vfmsub231pd"], &[Vx, Hx, Wx]).vex_only()),
    osize(0xBC, Definition::by_w(["vfnmadd231ps", "vfnmadd231pd"], &[Vx, Hx, Wx]).vex_only()),
    osize(0xBE, Definition::by_w(["vfnmsub231ps", "vfnmsub231pd"], &[Vx, Hx, Wx]).vex_only()),
    osize(0xDB, d("aesimc", &[Vdq, Wdq]).vex()),
    osize(0xDC, d("aesenc", &[Vdq, Hdq, Wdq]).vex()),
    osize(0xDD, d("aesenclast", &[Vdq, Hdq, Wdq]).vex()),
    osize(0xDE, d("aesdec", &[Vdq, Hdq, Wdq]).vex()),
    osize(0xDF, d("aesdeclast", &[Vdq, Hdq, Wdq]).vex()),
    none(0xF0, d("movbe", &[Gv, M])),
    repne(0xF0, d("crc32", &[Gd, Eb])),
    none(0xF1, d("movbe", &[M, Gv])),
    repne(0xF1, d("crc32", &[Gd, Ev])),
    none(0xF2, d("andn", &[Gy, By, Ey]).vex_only()),
    none(0xF3, Definition::group(GROUP_17, &[By, Ey]).vex_only()),
    none(0xF5, d("bzhi", &[Gy, Ey, By]).vex_only()),
    rep(0xF5, d("pext", &[Gy, By, Ey]).vex_only()),
    repne(0xF5, d("pdep", &[Gy, By, Ey]).vex_only()),
    repne(0xF6, d("mulx", &[Gy, By, Ey]).vex_only()),
    none(0xF7, d("bextr", &[Gy, Ey, By]).vex_only()),
    osize(0xF7, d("shlx", &[Gy, Ey, By]).vex_only()),
    rep(0xF7, d("sarx", &[Gy, Ey, By]).vex_only()),
    repne(0xF7, d("shrx", &[Gy, Ey, By]).vex_only()),
];

/// The `0F 38 xx` map, VEX map 2.
static MAP_0F38: &[&[SparseEntry]] = &[MAP_0F38_INTEGER, MAP_0F38_THREE, MAP_0F38_EXTEND, MAP_0F38_OTHER];

static MAP_0F3A_ENTRIES: &[SparseEntry] = &[
    osize(0x06, d("vperm2f128", &[Vqq, Hqq, Wqq, Ib]).vex_only()),
    osize(0x08, d("roundps", &[Vx, Wx, Ib]).vex()),
    osize(0x09, d("roundpd", &[Vx, Wx, Ib]).vex()),
    osize(0x0A, d("roundss", &[Vdq, Hdq, Wdq, Ib]).vex()),
    osize(0x0B, d("roundsd", &[Vdq, Hdq, Wdq, Ib]).vex()),
    osize(0x0C, d("blendps", &[Vx, Hx, Wx, Ib]).vex()),
    osize(0x0D, d("blendpd", &[Vx, Hx, Wx, Ib]).vex()),
    osize(0x0E, d("pblendw", &[Vx, Hx, Wx, Ib]).vex()),
    none(0x0F, d("palignr", &[P, Q, Ib])),
    osize(0x0F, d("palignr", &[Vx, Hx, Wx, Ib]).vex()),
    osize(0x14, d("pextrb", &[Ed, Vdq, Ib]).vex()),
    osize(0x15, d("pextrw", &[Ed, Vdq, Ib]).vex()),
    osize(0x16, Definition::by_w(["pextrd", "pextrq"], &[Ey, Vdq, Ib]).vex()),
    osize(0x17, d("extractps", &[Ed, Vdq, Ib]).vex()),
    osize(0x18, d("vinsertf128", &[Vqq, Hqq, Wdq, Ib]).vex_only()),
    osize(0x19, d("vextractf128", &[Wdq, Vqq, Ib]).vex_only()),
    osize(0x20, d("pinsrb", &[Vdq, Hdq, Ed, Ib]).vex()),
    osize(0x21, d("insertps", &[Vdq, Hdq, Wdq, Ib]).vex()),
    osize(0x22, Definition::by_w(["pinsrd", "pinsrq"], &[Vdq, Hdq, Ey, Ib]).vex()),
    osize(0x38, d("vinserti128", &[Vqq, Hqq, Wdq, Ib]).vex_only()),
    osize(0x39, d("vextracti128", &[Wdq, Vqq, Ib]).vex_only()),
    osize(0x40, d("dpps", &[Vx, Hx, Wx, Ib]).vex()),
    osize(0x41, d("dppd", &[Vdq, Hdq, Wdq, Ib]).vex()),
    osize(0x42, d("mpsadbw", &[Vx, Hx, Wx, Ib]).vex()),
    osize(0x44, d("pclmulqdq", &[Vdq, Hdq, Wdq, Ib]).vex()),
    osize(0x46, d("vperm2i128", &[Vqq, Hqq, Wqq, Ib]).vex_only()),
    osize(0x4A, d("vblendvps", &[Vx, Hx, Wx, Lx]).vex_only()),
    osize(0x4B, d("vblendvpd", &[Vx, Hx, Wx, Lx]).vex_only()),
    osize(0x4C, d("vpblendvb", &[Vx, Hx, Wx, Lx]).vex_only()),
    osize(0x60, d("pcmpestrm", &[Vdq, Wdq, Ib]).vex()),
    osize(0x61, d("pcmpestri", &[Vdq, Wdq, Ib]).vex()),
    osize(0x62, d("pcmpistrm", &[Vdq, Wdq, Ib]).vex()),
    osize(0x63, d("pcmpistri", &[Vdq, Wdq, Ib]).vex()),
    osize(0xDF, d("aeskeygenassist", &[Vdq, Wdq, Ib]).vex()),
    repne(0xF0, d("rorx", &[Gy, Ey, Ib]).vex_only()),
];

/// The `0F 3A xx` map, VEX map 3.
static MAP_0F3A: &[&[SparseEntry]] = &[MAP_0F3A_ENTRIES];

static XOP_8_ENTRIES: &[SparseEntry] = &[
    none(0x85, d("vpmacssww", &[Vdq, Hdq, Wdq, Ldq]).vex_only()),
    none(0x86, d("vpmacsswd", &[Vdq, Hdq, Wdq, Ldq]).vex_only()),
    none(0x87, d("vpmacssdql", &[Vdq, Hdq, Wdq, Ldq]).vex_only()),
    none(0x8E, d("vpmacssdd", &[Vdq, Hdq, Wdq, Ldq]).vex_only()),
    none(0x8F, d("vpmacssdqh", &[Vdq, Hdq, Wdq, Ldq]).vex_only()),
    none(0x95, d("vpmacsww", &[Vdq, Hdq, Wdq, Ldq]).vex_only()),
    none(0x96, d("vpmacswd", &[Vdq, Hdq, Wdq, Ldq]).vex_only()),
    none(0x97, d("vpmacsdql", &[Vdq, Hdq, Wdq, Ldq]).vex_only()),
    none(0x9E, d("vpmacsdd", &[Vdq, Hdq, Wdq, Ldq]).vex_only()),
    none(0x9F, d("vpmacsdqh", &[Vdq, Hdq, Wdq, Ldq]).vex_only()),
    none(0xA2, d("vpcmov", &[Vx, Hx, Wx, Lx]).vex_only()),
    none(0xA3, d("vpperm", &[Vdq, Hdq, Wdq, Ldq]).vex_only()),
    none(0xA6, d("vpmadcsswd", &[Vdq, Hdq, Wdq, Ldq]).vex_only()),
    none(0xB6, d("vpmadcswd", &[Vdq, Hdq, Wdq, Ldq]).vex_only()),
    none(0xC0, d("vprotb", &[Vdq, Wdq, Ib]).vex_only()),
    none(0xC1, d("vprotw", &[Vdq, Wdq, Ib]).vex_only()),
    none(0xC2, d("vprotd", &[Vdq, Wdq, Ib]).vex_only()),
    none(0xC3, d("vprotq", &[Vdq, Wdq, Ib]).vex_only()),
    none(0xCC, d("vpcomb", &[Vdq, Hdq, Wdq, Ib]).vex_only()),
    none(0xCD, d("vpcomw", &[Vdq, Hdq, Wdq, Ib]).vex_only()),
    none(0xCE, d("vpcomd", &[Vdq, Hdq, Wdq, Ib]).vex_only()),
    none(0xCF, d("vpcomq", &[Vdq, Hdq, Wdq, Ib]).vex_only()),
    none(0xEC, d("vpcomub", &[Vdq, Hdq, Wdq, Ib]).vex_only()),
    none(0xED, d("vpcomuw", &[Vdq, Hdq, Wdq, Ib]).vex_only()),
    none(0xEE, d("vpcomud", &[Vdq, Hdq, Wdq, Ib]).vex_only()),
    none(0xEF, d("vpcomuq", &[Vdq, Hdq, Wdq, Ib]).vex_only()),
];

/// XOP map 8: four-operand and immediate forms.
static XOP_8: &[&[SparseEntry]] = &[XOP_8_ENTRIES];

static XOP_9_ENTRIES: &[SparseEntry] = &[
    none(0x80, d("vfrczps", &[Vx, Wx]).vex_only()),
    none(0x81, d("vfrczpd", &[Vx, Wx]).vex_only()),
    none(0x82, d("vfrczss", &[Vdq, Wdq]).vex_only()),
    none(0x83, d("vfrczsd", &[Vdq, Wdq]).vex_only()),
    none(0x90, d("vprotb", &[Vdq, Wdq, Hdq]).vex_only()),
    none(0x91, d("vprotw", &[Vdq, Wdq, Hdq]).vex_only()),
    none(0x92, d("vprotd", &[Vdq, Wdq, Hdq]).vex_only()),
    none(0x93, d("vprotq", &[Vdq, Wdq, Hdq]).vex_only()),
    none(0x94, d("vpshlb", &[Vdq, Wdq, Hdq]).vex_only()),
    none(0x95, d("vpshlw", &[Vdq, Wdq, Hdq]).vex_only()),
    none(0x96, d("vpshld", &[Vdq, Wdq, Hdq]).vex_only()),
    none(0x97, d("vpshlq", &[Vdq, Wdq, Hdq]).vex_only()),
    none(0x98, d("vpshab", &[Vdq, Wdq, Hdq]).vex_only()),
    none(0x99, d("vpshaw", &[Vdq, Wdq, Hdq]).vex_only()),
    none(0x9A, d("vpshad", &[Vdq, Wdq, Hdq]).vex_only()),
    none(0x9B, d("vpshaq", &[Vdq, Wdq, Hdq]).vex_only()),
];

/// XOP map 9.
static XOP_9: &[&[SparseEntry]] = &[XOP_9_ENTRIES];

static XOP_10_ENTRIES: &[SparseEntry] = &[none(0x10, d("bextr", &[Gy, Ey, Id]).vex_only())];

/// XOP map 10.
static XOP_10: &[&[SparseEntry]] = &[XOP_10_ENTRIES];

/// An escaped opcode map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Map {
    /// `0F xx`, VEX map 1.
    TwoByte,
    /// `0F 38 xx`, VEX map 2.
    Escape38,
    /// `0F 3A xx`, VEX map 3.
    Escape3A,
    /// XOP map 8.
    Xop8,
    /// XOP map 9.
    Xop9,
    /// XOP map 10.
    Xop10,
}

impl Map {
    /// Selects the map named by a VEX or XOP map-select field.
    pub(crate) fn from_select(select: u8) -> Option<Self> {
        Some(match select {
            1 => Self::TwoByte,
            2 => Self::Escape38,
            3 => Self::Escape3A,
            8 => Self::Xop8,
            9 => Self::Xop9,
            10 => Self::Xop10,
            _ => return None,
        })
    }

    fn tables(self) -> &'static [&'static [SparseEntry]] {
        match self {
            Self::TwoByte => TWO_BYTE,
            Self::Escape38 => MAP_0F38,
            Self::Escape3A => MAP_0F3A,
            Self::Xop8 => XOP_8,
            Self::Xop9 => XOP_9,
            Self::Xop10 => XOP_10,
        }
    }

    /// Looks up `opcode` under exactly one mandatory prefix.
    pub(crate) fn find(self, opcode: u8, prefix: Mandatory, accept: impl Fn(&Definition) -> bool) -> Option<Definition> {
        self.tables()
            .iter()
            .find_map(|&table| find_exact(table, opcode, prefix, &accept))
    }
}

const GROUP_6: &[GroupEntry] = &[
    GroupEntry::new(0, d("sldt", &[Ev])),
    GroupEntry::new(1, d("str", &[Ev])),
    GroupEntry::new(2, d("lldt", &[Ew])),
    GroupEntry::new(3, d("ltr", &[Ew])),
    GroupEntry::new(4, d("verr", &[Ew])),
    GroupEntry::new(5, d("verw", &[Ew])),
];

const GROUP_7: &[GroupEntry] = &[
    GroupEntry::new(0, d("sgdt", &[M])).memory(),
    GroupEntry::new(1, d("sidt", &[M])).memory(),
    GroupEntry::new(2, d("lgdt", &[M])).memory(),
    GroupEntry::new(3, d("lidt", &[M])).memory(),
    GroupEntry::new(4, d("smsw", &[Ev])),
    GroupEntry::new(6, d("lmsw", &[Ew])),
    GroupEntry::new(7, d("invlpg", &[M])).memory(),
    GroupEntry::exact(0xC1, d("vmcall", &[])),
    GroupEntry::exact(0xC2, d("vmlaunch", &[])),
    GroupEntry::exact(0xC3, d("vmresume", &[])),
    GroupEntry::exact(0xC4, d("vmxoff", &[])),
    GroupEntry::exact(0xC8, d("monitor", &[])),
    GroupEntry::exact(0xC9, d("mwait", &[])),
    GroupEntry::exact(0xCA, d("clac", &[])),
    GroupEntry::exact(0xCB, d("stac", &[])),
    GroupEntry::exact(0xCF, d("encls", &[])),
    GroupEntry::exact(0xD0, d("xgetbv", &[])),
    GroupEntry::exact(0xD1, d("xsetbv", &[])),
    GroupEntry::exact(0xD4, d("vmfunc", &[])),
    GroupEntry::exact(0xD5, d("xend", &[])),
    GroupEntry::exact(0xD6, d("xtest", &[])),
    GroupEntry::exact(0xD7, d("enclu", &[])),
    GroupEntry::exact(0xD8, d("vmrun", &[])),
    GroupEntry::exact(0xD9, d("vmmcall", &[])),
    GroupEntry::exact(0xDA, d("vmload", &[])),
    GroupEntry::exact(0xDB, d("vmsave", &[])),
    GroupEntry::exact(0xDC, d("stgi", &[])),
    GroupEntry::exact(0xDD, d("clgi", &[])),
    GroupEntry::exact(0xDE, d("skinit", &[])),
    GroupEntry::exact(0xDF, d("invlpga", &[])),
    GroupEntry::exact(0xEE, d("rdpkru", &[])),
    GroupEntry::exact(0xEF, d("wrpkru", &[])),
    GroupEntry::exact(0xF8, d("swapgs", &[])),
    GroupEntry::exact(0xF9, d("rdtscp", &[])),
    GroupEntry::exact(0xFA, d("monitorx", &[])),
    GroupEntry::exact(0xFB, d("mwaitx", &[])),
    GroupEntry::exact(0xFC, d("clzero", &[])),
];

const GROUP_8: &[GroupEntry] = &[
    GroupEntry::new(4, d("bt", &[])),
    GroupEntry::new(5, d("bts", &[])),
    GroupEntry::new(6, d("btr", &[])),
    GroupEntry::new(7, d("btc", &[])),
];

const GROUP_9: &[GroupEntry] = &[
    GroupEntry::new(1, Definition::by_w(["cmpxchg8b", "cmpxchg16b"], &[M])).memory(),
    GroupEntry::new(6, d("vmptrld", &[M])).memory(),
    GroupEntry::new(6, d("vmclear", &[M]))
        .memory()
        .prefixed(Mandatory::OperandSize),
    GroupEntry::new(6, d("vmxon", &[M])).memory().prefixed(Mandatory::Rep),
    GroupEntry::new(7, d("vmptrst", &[M])).memory(),
    GroupEntry::new(6, d("rdrand", &[Rv])).register(),
    GroupEntry::new(7, d("rdseed", &[Rv])).register(),
    GroupEntry::new(7, d("rdpid", &[Rn])).register().prefixed(Mandatory::Rep),
];

const GROUP_12: &[GroupEntry] = &[
    GroupEntry::new(2, d("psrlw", &[N, Ib])).register(),
    GroupEntry::new(4, d("psraw", &[N, Ib])).register(),
    GroupEntry::new(6, d("psllw", &[N, Ib])).register(),
    GroupEntry::new(2, d("psrlw", &[Hx, Ux, Ib]).vex())
        .register()
        .prefixed(Mandatory::OperandSize),
    GroupEntry::new(4, d("psraw", &[Hx, Ux, Ib]).vex())
        .register()
        .prefixed(Mandatory::OperandSize),
    GroupEntry::new(6, d("psllw", &[Hx, Ux, Ib]).vex())
        .register()
        .prefixed(Mandatory::OperandSize),
];

const GROUP_13: &[GroupEntry] = &[
    GroupEntry::new(2, d("psrld", &[N, Ib])).register(),
    GroupEntry::new(4, d("psrad", &[N, Ib])).register(),
    GroupEntry::new(6, d("pslld", &[N, Ib])).register(),
    GroupEntry::new(2, d("psrld", &[Hx, Ux, Ib]).vex())
        .register()
        .prefixed(Mandatory::OperandSize),
    GroupEntry::new(4, d("psrad", &[Hx, Ux, Ib]).vex())
        .register()
        .prefixed(Mandatory::OperandSize),
    GroupEntry::new(6, d("pslld", &[Hx, Ux, Ib]).vex())
        .register()
        .prefixed(Mandatory::OperandSize),
];

const GROUP_14: &[GroupEntry] = &[
    GroupEntry::new(2, d("psrlq", &[N, Ib])).register(),
    GroupEntry::new(6, d("psllq", &[N, Ib])).register(),
    GroupEntry::new(2, d("psrlq", &[Hx, Ux, Ib]).vex())
        .register()
        .prefixed(Mandatory::OperandSize),
    GroupEntry::new(3, d("psrldq", &[Hx, Ux, Ib]).vex())
        .register()
        .prefixed(Mandatory::OperandSize),
    GroupEntry::new(6, d("psllq", &[Hx, Ux, Ib]).vex())
        .register()
        .prefixed(Mandatory::OperandSize),
    GroupEntry::new(7, d("pslldq", &[Hx, Ux, Ib]).vex())
        .register()
        .prefixed(Mandatory::OperandSize),
];

const GROUP_15: &[GroupEntry] = &[
    GroupEntry::new(0, d("fxsave", &[M])).memory(),
    GroupEntry::new(1, d("fxrstor", &[M])).memory(),
    GroupEntry::new(2, d("ldmxcsr", &[M]).vex()).memory(),
    GroupEntry::new(3, d("stmxcsr", &[M]).vex()).memory(),
    GroupEntry::new(4, d("xsave", &[M])).memory(),
    GroupEntry::new(5, d("xrstor", &[M])).memory(),
    GroupEntry::new(6, d("xsaveopt", &[M])).memory(),
    GroupEntry::new(7, d("clflush", &[M])).memory(),
    GroupEntry::new(5, d("lfence", &[])).register(),
    GroupEntry::new(6, d("mfence", &[])).register(),
    GroupEntry::new(7, d("sfence", &[])).register(),
    GroupEntry::new(0, d("rdfsbase", &[Ry]))
        .register()
        .prefixed(Mandatory::Rep),
    GroupEntry::new(1, d("rdgsbase", &[Ry]))
        .register()
        .prefixed(Mandatory::Rep),
    GroupEntry::new(2, d("wrfsbase", &[Ry]))
        .register()
        .prefixed(Mandatory::Rep),
    GroupEntry::new(3, d("wrgsbase", &[Ry]))
        .register()
        .prefixed(Mandatory::Rep),
    GroupEntry::new(6, d("clwb", &[M]))
        .memory()
        .prefixed(Mandatory::OperandSize),
    GroupEntry::new(7, d("clflushopt", &[M]))
        .memory()
        .prefixed(Mandatory::OperandSize),
];

const GROUP_16: &[GroupEntry] = &[
    GroupEntry::new(0, d("prefetchnta", &[M])).memory(),
    GroupEntry::new(1, d("prefetcht0", &[M])).memory(),
    GroupEntry::new(2, d("prefetcht1", &[M])).memory(),
    GroupEntry::new(3, d("prefetcht2", &[M])).memory(),
    GroupEntry::every(d("nop", &[Ev])),
];

const GROUP_17: &[GroupEntry] = &[
    GroupEntry::new(1, d("blsr", &[]).vex_only()),
    GroupEntry::new(2, d("blsmsk", &[]).vex_only()),
    GroupEntry::new(3, d("blsi", &[]).vex_only()),
];

/// 0F 0D: AMD prefetch hints.
const GROUP_PREFETCH_W: &[GroupEntry] = &[
    GroupEntry::new(0, d("prefetch", &[M])).memory(),
    GroupEntry::new(1, d("prefetchw", &[M])).memory(),
    GroupEntry::new(2, d("prefetchwt1", &[M])).memory(),
];

/// 0F 1E: hint nops, with the CET end-branch markers under F3.
const GROUP_BRANCH_HINT: &[GroupEntry] = &[
    GroupEntry::exact(0xFA, d("endbr64", &[])).prefixed(Mandatory::Rep),
    GroupEntry::exact(0xFB, d("endbr32", &[])).prefixed(Mandatory::Rep),
    GroupEntry::every(d("nop", &[Ev])),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::x86::operand::{find_group, with_fallback, Kind, Mnemonic};

    fn name(definition: &Definition) -> &'static str {
        match definition.mnemonic {
            Mnemonic::Fixed(text) => text,
            Mnemonic::ByOperandSize(names) | Mnemonic::ByAddressSize(names) => names[1],
            Mnemonic::ByW(names) => names[0],
        }
    }

    fn legacy(map: Map, opcode: u8, prefixes: &[Mandatory]) -> Option<&'static str> {
        with_fallback(prefixes.iter().copied(), |prefix| {
            map.find(opcode, prefix, Definition::allows_legacy)
        })
        .map(|(definition, _)| name(&definition))
    }

    #[test]
    fn test_generated_conditionals() {
        assert_eq!(legacy(Map::TwoByte, 0x44, &[]), Some("cmove"));
        assert_eq!(legacy(Map::TwoByte, 0x85, &[]), Some("jne"));
        assert_eq!(legacy(Map::TwoByte, 0x9F, &[]), Some("setg"));
    }

    #[test]
    fn test_packed_float_by_prefix() {
        assert_eq!(legacy(Map::TwoByte, 0x58, &[]), Some("addps"));
        assert_eq!(legacy(Map::TwoByte, 0x58, &[Mandatory::OperandSize]), Some("addpd"));
        assert_eq!(legacy(Map::TwoByte, 0x58, &[Mandatory::Rep]), Some("addss"));
        assert_eq!(legacy(Map::TwoByte, 0x5E, &[Mandatory::Repne]), Some("divsd"));
    }

    #[test]
    fn test_packed_integer_mmx_and_sse() {
        let mmx = Map::TwoByte
            .find(0xEF, Mandatory::None, Definition::allows_legacy)
            .unwrap();
        assert_eq!(mmx.operands, &[P, Q]);
        let sse = Map::TwoByte
            .find(0xEF, Mandatory::OperandSize, Definition::allows_legacy)
            .unwrap();
        assert_eq!(sse.operands, &[Vx, Hx, Wx]);
        assert!(sse.allows_vex());
    }

    #[test]
    fn test_popcnt_needs_rep() {
        assert_eq!(legacy(Map::TwoByte, 0xB8, &[]), Some("jmpe"));
        assert_eq!(legacy(Map::TwoByte, 0xB8, &[Mandatory::Rep]), Some("popcnt"));
    }

    #[test]
    fn test_vex_only_entries_hidden_from_legacy() {
        assert_eq!(legacy(Map::Escape38, 0xF2, &[]), None);
        let andn = Map::Escape38.find(0xF2, Mandatory::None, Definition::allows_vex);
        assert_eq!(andn.map(|definition| name(&definition)), Some("andn"));
        assert_eq!(legacy(Map::TwoByte, 0x77, &[]), Some("emms"));
        let zero = Map::TwoByte.find(0x77, Mandatory::None, Definition::allows_vex);
        assert_eq!(zero.map(|definition| name(&definition)), Some("vzeroupper"));
    }

    #[test]
    fn test_map_select() {
        assert_eq!(Map::from_select(1), Some(Map::TwoByte));
        assert_eq!(Map::from_select(3), Some(Map::Escape3A));
        assert_eq!(Map::from_select(8), Some(Map::Xop8));
        assert_eq!(Map::from_select(9), Some(Map::Xop9));
        assert_eq!(Map::from_select(10), Some(Map::Xop10));
        assert_eq!(Map::from_select(4), None);
        assert_eq!(Map::from_select(11), None);
    }

    #[test]
    fn test_group_seven_alternates() {
        let Some(group) = Map::TwoByte.find(0x01, Mandatory::None, |_| true) else {
            panic!("0F 01 is defined");
        };
        let Kind::Group(table) = group.kind else {
            panic!("0F 01 is a group");
        };
        let member = |modrm| find_group(table, modrm, Mandatory::None, |_| true).map(|entry| name(&entry));
        assert_eq!(member(0xC1), Some("vmcall"));
        assert_eq!(member(0xF8), Some("swapgs"));
        assert_eq!(member(0xD0), Some("xgetbv"));
        assert_eq!(member(0x10), Some("lgdt"));
        // Register form of lgdt is not an instruction.
        assert_eq!(member(0xD2), None);
    }

    #[test]
    fn test_fences_share_group_fifteen() {
        let member = |modrm, prefix| find_group(GROUP_15, modrm, prefix, |_| true).map(|entry| name(&entry));
        assert_eq!(member(0xE8, Mandatory::None), Some("lfence"));
        assert_eq!(member(0xF0, Mandatory::None), Some("mfence"));
        assert_eq!(member(0x38, Mandatory::None), Some("clflush"));
        assert_eq!(member(0x38, Mandatory::OperandSize), Some("clflushopt"));
        assert_eq!(member(0xC0, Mandatory::Rep), Some("rdfsbase"));
    }

    #[test]
    fn test_end_branch() {
        let member = |modrm, prefix| find_group(GROUP_BRANCH_HINT, modrm, prefix, |_| true).map(|entry| name(&entry));
        assert_eq!(member(0xFA, Mandatory::Rep), Some("endbr64"));
        assert_eq!(member(0xFA, Mandatory::None), Some("nop"));
    }
}
