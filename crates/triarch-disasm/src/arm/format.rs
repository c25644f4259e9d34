//! Operand formatting shared by the ARM and Thumb decoders.
//!
//! Every routine writes into a [`fmt::Write`] sink, so callers format
//! straight into a bounded operand buffer and propagate overflow with `?`.

use std::fmt::{self, Write};

use super::names::{reg, BANKED_REGISTERS};

pub const SHIFT_LSL: u32 = 0x00;
pub const SHIFT_LSR: u32 = 0x20;
pub const SHIFT_ASR: u32 = 0x40;
pub const SHIFT_ROR: u32 = 0x60;

/// Lane annotation appended to each register of a vector list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lanes {
    /// Whole registers: `d0`.
    None,
    /// A single element: `d0[2]`.
    Index(u32),
    /// Every lane: `d0[]`.
    All,
}

/// Writes `#value  ; 0xvalue`, the usual immediate operand form.
pub fn immediate(out: &mut impl Write, value: u32) -> fmt::Result {
    write!(out, "#{}  ; 0x{:x}", value as i32, value)
}

/// Resolves an immediate shift to its mnemonic and effective amount.
///
/// `lsl #0` is no shift, `lsr #0` and `asr #0` shift by 32, and `ror #0`
/// is `rrx`.
pub fn decode_shift(shift_type: u32, amount: u32) -> (Option<&'static str>, u32) {
    match shift_type & 0x60 {
        SHIFT_LSL if amount == 0 => (None, 0),
        SHIFT_LSL => (Some("lsl"), amount),
        SHIFT_LSR => (Some("lsr"), if amount == 0 { 32 } else { amount }),
        SHIFT_ASR => (Some("asr"), if amount == 0 { 32 } else { amount }),
        SHIFT_ROR if amount == 0 => (Some("rrx"), 0),
        _ => (Some("ror"), amount),
    }
}

/// Writes a register with an immediate shift: `r1`, `r1, rrx` or `r1, lsl #2`.
pub fn immediate_shift(out: &mut impl Write, register: u32, shift_type: u32, amount: u32) -> fmt::Result {
    let name = reg(register);
    match decode_shift(shift_type, amount) {
        (Some(kind), amount) if amount != 0 => write!(out, "{name}, {kind} #{amount}"),
        (Some(kind), _) => write!(out, "{name}, {kind}"),
        (None, _) => out.write_str(name),
    }
}

/// Width of a VFP or Advanced SIMD register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorKind {
    Single,
    Double,
    Quad,
}

impl VectorKind {
    /// `Quad` when `quad` is set, `Double` otherwise.
    pub fn doubleword_or_quad(quad: bool) -> Self {
        if quad {
            Self::Quad
        } else {
            Self::Double
        }
    }

    /// `Double` when `double` is set, `Single` otherwise.
    pub fn single_or_double(double: bool) -> Self {
        if double {
            Self::Double
        } else {
            Self::Single
        }
    }

    pub fn prefix(self) -> char {
        match self {
            Self::Single => 's',
            Self::Double => 'd',
            Self::Quad => 'q',
        }
    }
}

/// A VFP or Advanced SIMD register operand.
///
/// Registers are encoded as a 4-bit field plus one extra bit. Single
/// precision registers put the extra bit at the bottom (`Vd:D`); doubleword
/// and quadword registers put it at the top (`D:Vd`), and quadwords are
/// numbered in pairs of doublewords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vector {
    pub kind: VectorKind,
    pub number: u32,
}

impl Vector {
    pub fn new(kind: VectorKind, field: u32, extra: bool) -> Self {
        let field = field & 0xF;
        let extra = u32::from(extra);
        let number = match kind {
            VectorKind::Single => (field << 1) | extra,
            VectorKind::Double => field | (extra << 4),
            VectorKind::Quad => (field | (extra << 4)) >> 1,
        };
        Self { kind, number }
    }

    /// The destination register, `Vd` with the D bit at 22.
    pub fn d(kind: VectorKind, insn: u32) -> Self {
        Self::new(kind, insn >> 12, insn & (1 << 22) != 0)
    }

    /// The first operand register, `Vn` with the N bit at 7.
    pub fn n(kind: VectorKind, insn: u32) -> Self {
        Self::new(kind, insn >> 16, insn & (1 << 7) != 0)
    }

    /// The second operand register, `Vm` with the M bit at 5.
    pub fn m(kind: VectorKind, insn: u32) -> Self {
        Self::new(kind, insn, insn & (1 << 5) != 0)
    }

    /// The register that follows this one, as in `s3, s4`.
    pub fn next(self) -> Self {
        Self {
            kind: self.kind,
            number: self.number + 1,
        }
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.number)
    }
}

/// Writes a core register list such as `{r4, r5, lr}`.
pub fn register_list(out: &mut impl Write, list: u32) -> fmt::Result {
    out.write_char('{')?;
    let mut separator = "";
    for register in (0..16).filter(|r| list & (1 << r) != 0) {
        out.write_str(separator)?;
        out.write_str(reg(register))?;
        separator = ", ";
    }
    out.write_char('}')
}

/// Writes a SIMD register list such as `{d0, d2}` or `{d4[1], d5[1]}`.
pub fn vector_list(
    out: &mut impl Write,
    start: u32,
    count: u32,
    increment: u32,
    kind: &str,
    lanes: Lanes,
) -> fmt::Result {
    out.write_char('{')?;
    for position in 0..count {
        let vector = start + position * increment;
        if position != 0 {
            out.write_str(", ")?;
        }
        match lanes {
            Lanes::None => write!(out, "{kind}{vector}")?,
            Lanes::Index(index) => write!(out, "{kind}{vector}[{index}]")?,
            Lanes::All => write!(out, "{kind}{vector}[]")?,
        }
    }
    out.write_char('}')
}

/// Writes `cpsr_fc`-style status register names for `msr`/`mrs`.
pub fn status_register(out: &mut impl Write, insn: u32) -> fmt::Result {
    out.write_str(if insn & (1 << 22) != 0 { "spsr" } else { "cpsr" })?;
    out.write_char('_')?;
    for (bit, flag) in [(0x0001_0000, 'c'), (0x0002_0000, 'x'), (0x0004_0000, 's'), (0x0008_0000, 'f')] {
        if insn & bit != 0 {
            out.write_char(flag)?;
        }
    }
    Ok(())
}

/// Returns the banked register selected by `R:M1:M` of a banked `mrs`/`msr`.
pub fn banked_register(insn: u32) -> &'static str {
    let index = ((insn >> 16) & 0xF) | ((insn >> 4) & 0x10) | ((insn >> 17) & 0x20);
    BANKED_REGISTERS[index as usize]
}

/// Returns the `ia`/`ib`/`da`/`db` suffix of a block transfer.
pub fn load_store_type(insn: u32) -> &'static str {
    match insn & 0x0180_0000 {
        0x0080_0000 => "ia",
        0x0180_0000 => "ib",
        0x0000_0000 => "da",
        _ => "db",
    }
}

/// Writes a processor mode operand, `#svc` for known modes.
pub fn mode(out: &mut impl Write, insn: u32) -> fmt::Result {
    let mode = insn & 0x1F;
    let name = match mode {
        0x10 => "usr",
        0x11 => "fiq",
        0x12 => "irq",
        0x13 => "svc",
        0x17 => "abt",
        0x1B => "undef",
        0x1F => "sys",
        _ => return write!(out, "{mode:02X}"),
    };
    write!(out, "#{name}")
}

/// Writes the barrier option of `dsb`/`dmb`/`isb`. `sy` prints nothing.
pub fn barrier(out: &mut impl Write, insn: u32) -> fmt::Result {
    let option = insn & 0xF;
    let name = match option {
        0xF => "",
        0xE => "st",
        0xB => "ish",
        0xA => "ishst",
        0x7 => "nsh",
        0x6 => "nshst",
        0x3 => "osh",
        0x2 => "oshst",
        _ => return write!(out, "#{option:02X}"),
    };
    out.write_str(name)
}

/// Writes a float the way C's `%g` does: six significant digits,
/// trailing zeros removed, exponent form outside `1e-4 ..= 1e6`.
pub fn general_float(out: &mut impl Write, value: f64) -> fmt::Result {
    if value.is_nan() {
        return out.write_str("nan");
    }
    if value.is_infinite() {
        return out.write_str(if value < 0.0 { "-inf" } else { "inf" });
    }
    if value == 0.0 {
        return out.write_str(if value.is_sign_negative() { "-0" } else { "0" });
    }

    let scientific = format!("{value:.5e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if !(-4..6).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(out, "{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let precision = (5 - exponent) as usize;
        let fixed = format!("{value:.precision$}");
        out.write_str(trim_fraction(&fixed))
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut String) -> fmt::Result) -> String {
        let mut out = String::new();
        f(&mut out).unwrap();
        out
    }

    #[test]
    fn test_immediate_shift_special_cases() {
        assert_eq!(render(|o| immediate_shift(o, 1, SHIFT_LSL, 0)), "r1");
        assert_eq!(render(|o| immediate_shift(o, 1, SHIFT_LSL, 2)), "r1, lsl #2");
        assert_eq!(render(|o| immediate_shift(o, 1, SHIFT_LSR, 0)), "r1, lsr #32");
        assert_eq!(render(|o| immediate_shift(o, 1, SHIFT_ASR, 0)), "r1, asr #32");
        assert_eq!(render(|o| immediate_shift(o, 1, SHIFT_ROR, 0)), "r1, rrx");
        assert_eq!(render(|o| immediate_shift(o, 1, SHIFT_ROR, 8)), "r1, ror #8");
    }

    #[test]
    fn test_register_list() {
        assert_eq!(render(|o| register_list(o, 0x4030)), "{r4, r5, lr}");
        assert_eq!(render(|o| register_list(o, 0)), "{}");
        assert_eq!(render(|o| register_list(o, 0x8001)), "{r0, pc}");
    }

    #[test]
    fn test_vector_list() {
        assert_eq!(render(|o| vector_list(o, 0, 2, 1, "d", Lanes::None)), "{d0, d1}");
        assert_eq!(render(|o| vector_list(o, 4, 4, 2, "d", Lanes::Index(1))), "{d4[1], d6[1], d8[1], d10[1]}");
        assert_eq!(render(|o| vector_list(o, 2, 1, 1, "d", Lanes::All)), "{d2[]}");
    }

    #[test]
    fn test_vector_register_numbering() {
        assert_eq!(Vector::new(VectorKind::Single, 3, true).to_string(), "s7");
        assert_eq!(Vector::new(VectorKind::Double, 3, true).to_string(), "d19");
        assert_eq!(Vector::new(VectorKind::Quad, 4, false).to_string(), "q2");
        assert_eq!(Vector::new(VectorKind::Quad, 0, true).to_string(), "q8");
        // vadd.f32 s0, s1, s2: Vn=0 N=1, Vm=1 M=0
        assert_eq!(Vector::n(VectorKind::Single, 0x0E30_0A81).to_string(), "s1");
        assert_eq!(Vector::m(VectorKind::Single, 0x0E30_0A81).to_string(), "s2");
    }

    #[test]
    fn test_status_register() {
        assert_eq!(render(|o| status_register(o, 0x0009_0000)), "cpsr_cf");
        assert_eq!(render(|o| status_register(o, 0x004F_0000)), "spsr_cxsf");
    }

    #[test]
    fn test_mode_and_barrier() {
        assert_eq!(render(|o| mode(o, 0x13)), "#svc");
        assert_eq!(render(|o| mode(o, 0x05)), "05");
        assert_eq!(render(|o| barrier(o, 0xF)), "");
        assert_eq!(render(|o| barrier(o, 0xB)), "ish");
        assert_eq!(render(|o| barrier(o, 0x4)), "#04");
    }

    #[test]
    fn test_immediate_prints_signed_decimal() {
        assert_eq!(render(|o| immediate(o, 255)), "#255  ; 0xff");
        assert_eq!(render(|o| immediate(o, 0xFF00_0000)), "#-16777216  ; 0xff000000");
    }

    #[test]
    fn test_general_float() {
        assert_eq!(render(|o| general_float(o, 1.0)), "1");
        assert_eq!(render(|o| general_float(o, 0.5)), "0.5");
        assert_eq!(render(|o| general_float(o, -31.0)), "-31");
        assert_eq!(render(|o| general_float(o, 1.9375)), "1.9375");
        assert_eq!(render(|o| general_float(o, 1.0e7)), "1e+07");
    }

    #[test]
    fn test_load_store_type() {
        assert_eq!(load_store_type(0x0080_0000), "ia");
        assert_eq!(load_store_type(0x0100_0000), "db");
    }
}
