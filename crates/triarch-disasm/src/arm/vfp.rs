//! VFP data processing: arithmetic, moves, conversions and compares.

use std::fmt::{self, Write};

use super::format::{general_float, Vector, VectorKind};
use super::imm::{vfp_expand_imm32, vfp_expand_imm64, vfp_imm8};
use super::ArmContext;

const SZ: u32 = 1 << 8;
const OP: u32 = 1 << 6;

fn precision(insn: u32) -> (VectorKind, &'static str) {
    if insn & SZ != 0 {
        (VectorKind::Double, ".f64")
    } else {
        (VectorKind::Single, ".f32")
    }
}

/// `vmov` (immediate and register), `vabs`, `vneg` and `vsqrt`.
pub(crate) fn fp_two_registers(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let (kind, suffix) = precision(insn);
    if insn & OP == 0 {
        ctx.set_mnemonic(&["vmov"])?;
        ctx.set_suffix(&[suffix])?;
        write!(ctx.operand(0), "{}", Vector::d(kind, insn))?;

        let imm8 = vfp_imm8(insn);
        let op = ctx.operand(1);
        if kind == VectorKind::Double {
            let bits = vfp_expand_imm64(imm8);
            write!(op, "#{imm8}  ; 0x{bits:x} ")?;
            return general_float(op, f64::from_bits(bits));
        }
        let bits = vfp_expand_imm32(imm8);
        write!(op, "#{imm8}  ; 0x{bits:x} ")?;
        return general_float(op, f64::from(f32::from_bits(bits)));
    }

    let mnemonic = match insn & 0x000F_00C0 {
        0x0000_0040 => "vmov",
        0x0000_00C0 => "vabs",
        0x0001_0040 => "vneg",
        0x0001_00C0 => "vsqrt",
        _ => return ctx.undefined(),
    };
    ctx.set_mnemonic(&[mnemonic])?;
    ctx.set_suffix(&[suffix])?;
    write!(ctx.operand(0), "{}", Vector::d(kind, insn))?;
    write!(ctx.operand(1), "{}", Vector::m(kind, insn))
}

/// Three-register arithmetic: multiply-accumulate, add, divide and fused
/// multiply-accumulate.
pub(crate) fn fp_three_registers(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let op = insn & OP != 0;
    let mnemonic = match (insn & 0x00B0_0000, op) {
        (0x0000_0000, false) => "vmla",
        (0x0000_0000, true) => "vmls",
        (0x0010_0000, false) => "vnmls",
        (0x0010_0000, true) => "vnmla",
        (0x0020_0000, false) => "vmul",
        (0x0020_0000, true) => "vnmul",
        (0x0030_0000, false) => "vadd",
        (0x0030_0000, true) => "vsub",
        (0x0080_0000, false) => "vdiv",
        (0x0090_0000, false) => "vfnms",
        (0x0090_0000, true) => "vfnma",
        (0x00A0_0000, false) => "vfma",
        (0x00A0_0000, true) => "vfms",
        _ => return ctx.undefined(),
    };

    let (kind, suffix) = precision(insn);
    ctx.set_mnemonic(&[mnemonic])?;
    ctx.set_suffix(&[suffix])?;
    write!(ctx.operand(0), "{}", Vector::d(kind, insn))?;
    write!(ctx.operand(1), "{}", Vector::n(kind, insn))?;
    write!(ctx.operand(2), "{}", Vector::m(kind, insn))
}

/// Conversion mode of a VFP `vcvt`.
#[derive(Debug, Clone, Copy)]
enum Conversion {
    /// Half to or from single precision, top (`vcvtt`) or bottom (`vcvtb`).
    Half { top: bool, to_half: bool },
    FloatToFloat,
    FloatToInteger,
    IntegerToFloat,
    FloatToFixed,
    FixedToFloat,
}

/// Every form of VFP `vcvt`.
pub(crate) fn fp_convert(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let double = insn & SZ != 0;
    let unsigned_fixed = insn & (1 << 16) != 0;
    let word_fixed = insn & (1 << 7) != 0;
    let fixed_suffix = match (word_fixed, unsigned_fixed) {
        (true, true) => ".u32",
        (true, false) => ".s32",
        (false, true) => ".u16",
        (false, false) => ".s16",
    };
    let size = if word_fixed { 32 } else { 16 };
    let fraction_bits = size - (((insn & 0xF) << 1) | ((insn >> 5) & 1)) as i32;

    let conversion = match insn & 0x000F_00C0 {
        0x0002_00C0 => Conversion::Half { top: true, to_half: false },
        0x0003_00C0 => Conversion::Half { top: true, to_half: true },
        0x0002_0040 => Conversion::Half { top: false, to_half: false },
        0x0003_0040 => Conversion::Half { top: false, to_half: true },
        0x0007_00C0 => Conversion::FloatToFloat,
        0x000C_0040 | 0x000C_00C0 | 0x000D_0040 | 0x000D_00C0 => Conversion::FloatToInteger,
        0x0008_0040 | 0x0008_00C0 => Conversion::IntegerToFloat,
        0x000E_0040 | 0x000E_00C0 | 0x000F_0040 | 0x000F_00C0 => Conversion::FloatToFixed,
        0x000A_0040 | 0x000A_00C0 | 0x000B_0040 | 0x000B_00C0 => Conversion::FixedToFloat,
        _ => return ctx.undefined(),
    };

    let float_suffix = if double { ".f64" } else { ".f32" };
    let precision = VectorKind::single_or_double(double);
    let (infix, destination, source, d_kind, m_kind) = match conversion {
        Conversion::Half { top, to_half } => {
            let infix = if top { "t" } else { "b" };
            let (destination, source) = if to_half { (".f16", ".f32") } else { (".f32", ".f16") };
            (infix, destination, source, VectorKind::Single, VectorKind::Single)
        }
        Conversion::FloatToFloat if double => ("", ".f32", ".f64", VectorKind::Single, VectorKind::Double),
        Conversion::FloatToFloat => ("", ".f64", ".f32", VectorKind::Double, VectorKind::Single),
        Conversion::FloatToInteger => {
            let destination = if insn & (1 << 16) != 0 { ".s32" } else { ".u32" };
            // Without the round-towards-zero bit the FPSCR rounding mode applies.
            let infix = if insn & (1 << 7) == 0 { "r" } else { "" };
            (infix, destination, float_suffix, VectorKind::Single, precision)
        }
        Conversion::IntegerToFloat => {
            let source = if insn & (1 << 7) != 0 { ".s32" } else { ".u32" };
            ("", float_suffix, source, precision, VectorKind::Single)
        }
        Conversion::FloatToFixed => ("", fixed_suffix, float_suffix, precision, precision),
        Conversion::FixedToFloat => ("", float_suffix, fixed_suffix, precision, precision),
    };

    ctx.set_mnemonic(&["vcvt", infix])?;
    ctx.set_suffix(&[destination, source])?;
    let vd = Vector::d(d_kind, insn);
    write!(ctx.operand(0), "{vd}")?;
    if matches!(conversion, Conversion::FloatToFixed | Conversion::FixedToFloat) {
        // Fixed-point conversions work in place.
        write!(ctx.operand(1), "{vd}")?;
        return write!(ctx.operand(2), "#{fraction_bits}");
    }
    write!(ctx.operand(1), "{}", Vector::m(m_kind, insn))
}

/// `vcmp` and `vcmpe`, against a register or zero.
pub(crate) fn fp_compare(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let (kind, suffix) = precision(insn);
    ctx.set_mnemonic(&[if insn & (1 << 7) != 0 { "vcmpe" } else { "vcmp" }])?;
    ctx.set_suffix(&[suffix])?;
    write!(ctx.operand(0), "{}", Vector::d(kind, insn))?;
    if insn & (1 << 16) != 0 {
        ctx.set_operand(1, "#0.0")
    } else {
        write!(ctx.operand(1), "{}", Vector::m(kind, insn))
    }
}
