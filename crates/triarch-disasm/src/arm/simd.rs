//! Advanced SIMD data processing and element load/store.

use std::fmt::{self, Write};

use super::format::{general_float, vector_list, Lanes, Vector, VectorKind};
use super::imm::{simd_expand_imm64, simd_imm8, vfp_expand_imm32};
use super::names::{reg, SIMD_ELEMENT_MULTIPLE_SUFFIX, SIMD_ELEMENT_MULTIPLE_VECTOR_COUNT};
use super::ArmContext;

/// The U bit, in its ARM position.
const U: u32 = 1 << 24;
const Q: u32 = 1 << 6;

const ELEMENT_SIZES: [&str; 4] = ["8", "16", "32", "64"];
const STRUCTURES: [&str; 4] = ["1", "2", "3", "4"];

fn element_size(size: u32) -> &'static str {
    ELEMENT_SIZES[(size & 0x3) as usize]
}

fn signedness(insn: u32) -> &'static str {
    if insn & U != 0 {
        ".u"
    } else {
        ".s"
    }
}

fn width(insn: u32) -> VectorKind {
    VectorKind::doubleword_or_quad(insn & Q != 0)
}

fn simd_immediate(out: &mut impl Write, value: u64) -> fmt::Result {
    write!(out, "#{value}  ; 0x{value:x}")
}

/// Three registers of the same length: integer, bitwise and float forms.
pub(crate) fn three_same(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let unsigned = insn & U != 0;
    let mut data = signedness(insn);
    let mut size = element_size(insn >> 20);
    let mut shift_order = false;
    let mut two_operands = false;

    let mnemonic = match insn & 0xF10 {
        0x000 => "vhadd",
        0x010 => "vqadd",
        0x100 => "vrhadd",
        0x110 => {
            data = "";
            size = "";
            match insn & 0x0130_0000 {
                0x0000_0000 => "vand",
                0x0010_0000 => "vbic",
                0x0020_0000 => {
                    let kind = width(insn);
                    if Vector::n(kind, insn) == Vector::m(kind, insn) {
                        two_operands = true;
                        "vmov"
                    } else {
                        "vorr"
                    }
                }
                0x0030_0000 => "vorn",
                0x0100_0000 => "veor",
                0x0110_0000 => "vbsl",
                0x0120_0000 => "vbit",
                _ => "vbif",
            }
        }
        0x200 => "vhsub",
        0x210 => "vqsub",
        0x300 => "vcgt",
        0x310 => "vcge",
        0x400 | 0x410 | 0x500 | 0x510 => {
            shift_order = true;
            match insn & 0xF10 {
                0x400 => "vshl",
                0x410 => "vqshl",
                0x500 => "vrshl",
                _ => "vqrshl",
            }
        }
        0x600 => "vmax",
        0x610 => "vmin",
        0x700 => "vabd",
        0x710 => "vaba",
        0x800 => {
            data = ".i";
            if unsigned {
                "vsub"
            } else {
                "vadd"
            }
        }
        0x810 if unsigned => {
            data = ".i";
            "vceq"
        }
        0x810 => {
            data = ".";
            "vtst"
        }
        0x900 => {
            data = ".i";
            if unsigned {
                "vmls"
            } else {
                "vmla"
            }
        }
        0x910 => {
            data = if unsigned { ".p" } else { ".i" };
            "vmul"
        }
        0xA00 => "vpmax",
        0xA10 => "vpmin",
        0xB00 => {
            data = ".s";
            if unsigned {
                "vqrdmulh"
            } else {
                "vqdmulh"
            }
        }
        0xB10 => {
            data = ".i";
            "vpadd"
        }
        op => {
            data = ".f";
            size = "32";
            let mnemonic = match (op, insn & 0x0120_0010) {
                (0xC10, _) if insn & (1 << 21) != 0 => Some("vfms"),
                (0xC10, _) => Some("vfma"),
                (0xD00 | 0xD10, 0x0000_0000) => Some("vadd"),
                (0xD00 | 0xD10, 0x0020_0000) => Some("vsub"),
                (0xD00 | 0xD10, 0x0100_0000) => Some("vpadd"),
                (0xD00 | 0xD10, 0x0120_0000) => Some("vabd"),
                (0xD00 | 0xD10, 0x0000_0010) => Some("vmla"),
                (0xD00 | 0xD10, 0x0020_0010) => Some("vmls"),
                (0xD00 | 0xD10, 0x0100_0010) => Some("vmul"),
                (0xE00 | 0xE10, 0x0000_0000) => Some("vceq"),
                (0xE00 | 0xE10, 0x0100_0000) => Some("vcge"),
                (0xE00 | 0xE10, 0x0120_0000) => Some("vcgt"),
                (0xE00 | 0xE10, 0x0100_0010) => Some("vacge"),
                (0xE00 | 0xE10, 0x0120_0010) => Some("vacgt"),
                (0xF00, 0x0000_0000) => Some("vmax"),
                (0xF00, 0x0020_0000) => Some("vmin"),
                (0xF00, 0x0100_0000) => Some("vpmax"),
                (0xF00, 0x0120_0000) => Some("vpmin"),
                (0xF10, _) if insn & U == 0 => {
                    Some(if insn & (1 << 21) != 0 { "vrsqrts" } else { "vrecps" })
                }
                _ => None,
            };
            match mnemonic {
                Some(mnemonic) => mnemonic,
                None => return ctx.undefined(),
            }
        }
    };

    let kind = width(insn);
    ctx.set_mnemonic(&[mnemonic])?;
    ctx.set_suffix(&[data, size])?;
    write!(ctx.operand(0), "{}", Vector::d(kind, insn))?;
    if two_operands {
        return write!(ctx.operand(1), "{}", Vector::m(kind, insn));
    }

    let (first, second) = if shift_order {
        (Vector::m(kind, insn), Vector::n(kind, insn))
    } else {
        (Vector::n(kind, insn), Vector::m(kind, insn))
    };
    write!(ctx.operand(1), "{first}")?;
    write!(ctx.operand(2), "{second}")
}

/// `vmov`, `vmvn`, `vorr` and `vbic` with a modified immediate.
pub(crate) fn one_register(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let cmode = (insn >> 8) & 0xF;
    let op = insn & (1 << 5) != 0;
    let imm8 = simd_imm8(insn);
    let value = u64::from(imm8);

    let mnemonic = match (op, cmode) {
        (false, cmode) if cmode < 0xC && cmode & 1 != 0 => "vorr",
        (false, _) => "vmov",
        (true, cmode) if cmode < 0xC && cmode & 1 != 0 => "vbic",
        (true, 0xE) => "vmov",
        (true, 0xF) => return ctx.undefined(),
        (true, _) => "vmvn",
    };

    let (suffix, value) = match cmode & 0xE {
        0x0 | 0x2 | 0x4 | 0x6 => (".i32", value << (8 * (cmode >> 1))),
        0x8 | 0xA => (".i16", value << (8 * ((cmode >> 1) & 1))),
        0xC if cmode & 1 != 0 => (".i32", (value << 16) | 0xFFFF),
        0xC => (".i32", (value << 8) | 0xFF),
        _ if op => (".i64", simd_expand_imm64(imm8)),
        _ if cmode & 1 != 0 => (".f32", u64::from(vfp_expand_imm32(imm8))),
        _ => (".i8", value),
    };

    ctx.set_mnemonic(&[mnemonic])?;
    ctx.set_suffix(&[suffix])?;
    write!(ctx.operand(0), "{}", Vector::d(width(insn), insn))?;
    let out = ctx.operand(1);
    if suffix == ".f32" {
        write!(out, "#{imm8}  ; 0x{value:x} ")?;
        return general_float(out, f64::from(f32::from_bits(value as u32)));
    }
    simd_immediate(out, value)
}

/// Shifts by immediate, narrowing and lengthening shifts and fixed-point
/// `vcvt`.
pub(crate) fn two_registers_shift(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let imm6 = (insn >> 16) & 0x3F;
    let long = insn & (1 << 7) != 0;
    let unsigned = insn & U != 0;

    // The position of the leading one in imm6 gives the element size; the
    // rest encodes the shift.
    let (size, right, left): (u32, u32, u32) = if long {
        (64, 64 - imm6, imm6)
    } else if imm6 & 0x20 != 0 {
        (32, 32 - (imm6 & 0x1F), imm6 & 0x1F)
    } else if imm6 & 0x10 != 0 {
        (16, 16 - (imm6 & 0xF), imm6 & 0xF)
    } else if imm6 & 0x08 != 0 {
        (8, 8 - (imm6 & 0x7), imm6 & 0x7)
    } else {
        return ctx.undefined();
    };

    let kind = width(insn);
    let mut data = signedness(insn);
    let mut size_text = element_size(size.trailing_zeros() - 3);
    let mut d_kind = kind;
    let mut m_kind = kind;
    let mut amount = Some(right);
    let narrow = || (element_size(size.trailing_zeros() - 2), VectorKind::Double, VectorKind::Quad);

    let mnemonic = match insn & 0xF00 {
        0x000 => "vshr",
        0x100 => "vsra",
        0x200 => "vrshr",
        0x300 => "vrsra",
        0x400 if unsigned => "vsri",
        0x500 if unsigned => {
            data = ".";
            amount = Some(left);
            "vsli"
        }
        0x500 => {
            data = ".i";
            amount = Some(left);
            "vshl"
        }
        0x600 if unsigned => {
            data = ".s";
            amount = Some(left);
            "vqshlu"
        }
        0x700 => {
            amount = Some(left);
            "vqshl"
        }
        0x800 | 0x900 if long => return ctx.undefined(),
        0x800 => {
            (size_text, d_kind, m_kind) = narrow();
            match insn & 0x0100_00C0 {
                0x0000_0000 => {
                    data = ".i";
                    "vshrn"
                }
                0x0000_0040 => {
                    data = ".i";
                    "vrshrn"
                }
                0x0100_0000 => {
                    data = ".s";
                    "vqshrun"
                }
                _ => {
                    data = ".s";
                    "vqrshrun"
                }
            }
        }
        0x900 => {
            (size_text, d_kind, m_kind) = narrow();
            if insn & 0xC0 == 0 {
                "vqshrn"
            } else if insn & 0xC0 == 0x40 {
                "vqrshrn"
            } else {
                return ctx.undefined();
            }
        }
        0xA00 if !long && insn & 0xC0 == 0 => {
            d_kind = VectorKind::Quad;
            m_kind = VectorKind::Double;
            if left == 0 {
                amount = None;
                "vmovl"
            } else {
                amount = Some(left);
                "vshll"
            }
        }
        0xE00 | 0xF00 if !long => {
            // Fixed-point conversions always count fraction bits from 64.
            amount = Some(64 - imm6);
            let integer = if unsigned { ".u32" } else { ".s32" };
            let (destination, source) = if insn & 0x100 == 0 {
                (".f32", integer)
            } else {
                (integer, ".f32")
            };
            data = destination;
            size_text = source;
            "vcvt"
        }
        _ => return ctx.undefined(),
    };

    ctx.set_mnemonic(&[mnemonic])?;
    ctx.set_suffix(&[data, size_text])?;
    write!(ctx.operand(0), "{}", Vector::d(d_kind, insn))?;
    write!(ctx.operand(1), "{}", Vector::m(m_kind, insn))?;
    match amount {
        Some(amount) => simd_immediate(ctx.operand(2), u64::from(amount)),
        None => Ok(()),
    }
}

/// Long, wide and narrow forms with operands of different lengths.
pub(crate) fn three_different(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let unsigned = insn & U != 0;
    let mut size = (insn >> 20) & 0x3;
    let mut data = signedness(insn);
    let (mut d_kind, mut n_kind, mut m_kind) = (VectorKind::Quad, VectorKind::Double, VectorKind::Double);

    let mnemonic = match insn & 0xF00 {
        0x000 => "vaddl",
        0x100 => {
            n_kind = VectorKind::Quad;
            "vaddw"
        }
        0x200 => "vsubl",
        0x300 => {
            n_kind = VectorKind::Quad;
            "vsubw"
        }
        op @ (0x400 | 0x600) => {
            size += 1;
            data = ".i";
            (d_kind, n_kind, m_kind) = (VectorKind::Double, VectorKind::Quad, VectorKind::Quad);
            match (op, unsigned) {
                (0x400, true) => "vraddhn",
                (0x400, false) => "vaddhn",
                (_, true) => "vrsubhn",
                (_, false) => "vsubhn",
            }
        }
        0x500 => "vabal",
        0x700 => "vabdl",
        0x800 => "vmlal",
        0x900 => "vqdmlal",
        0xA00 => "vmlsl",
        0xB00 => "vqdmlsl",
        0xC00 => "vmull",
        0xD00 => "vqdmull",
        0xE00 => {
            data = ".p";
            "vmull"
        }
        _ => return ctx.undefined(),
    };

    ctx.set_mnemonic(&[mnemonic])?;
    ctx.set_suffix(&[data, element_size(size)])?;
    write!(ctx.operand(0), "{}", Vector::d(d_kind, insn))?;
    write!(ctx.operand(1), "{}", Vector::n(n_kind, insn))?;
    write!(ctx.operand(2), "{}", Vector::m(m_kind, insn))
}

/// Multiplies by a scalar element: `vmla q0, q1, d2[1]`.
pub(crate) fn two_registers_scalar(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let field = (insn & 0xF) | ((insn >> 1) & 0x10);
    let (size, index, scalar) = match insn & 0x0030_0000 {
        0x0010_0000 => ("16", (field & 0x18) >> 3, field & 0x7),
        0x0020_0000 => ("32", (field & 0x10) >> 4, field & 0xF),
        _ => return ctx.undefined(),
    };

    let (mnemonic, float_valid, quad_valid) = match insn & 0xF00 {
        0x000 | 0x100 => ("vmla", true, true),
        0x200 => ("vmlal", false, false),
        0x300 => ("vqdmlal", false, false),
        0x400 | 0x500 => ("vmls", true, true),
        0x600 => ("vmlsl", false, false),
        0x700 => ("vqdmlsl", false, false),
        0x800 | 0x900 => ("vmul", true, true),
        0xA00 => ("vmull", false, false),
        0xB00 => ("vqdmull", false, false),
        0xC00 => ("vqdmulh", false, true),
        0xD00 => ("vqrdmulh", false, true),
        _ => return ctx.undefined(),
    };

    let mut data = signedness(insn);
    if float_valid {
        data = if insn & (1 << 8) != 0 { ".f" } else { ".i" };
    }
    let (d_kind, n_kind) = if !quad_valid {
        (VectorKind::Quad, VectorKind::Double)
    } else if insn & U != 0 {
        (VectorKind::Quad, VectorKind::Quad)
    } else {
        (VectorKind::Double, VectorKind::Double)
    };

    ctx.set_mnemonic(&[mnemonic])?;
    ctx.set_suffix(&[data, size])?;
    write!(ctx.operand(0), "{}", Vector::d(d_kind, insn))?;
    write!(ctx.operand(1), "{}", Vector::n(n_kind, insn))?;
    write!(ctx.operand(2), "d{scalar}[{index}]")
}

/// Two registers, miscellaneous: reversals, counts, compares against zero,
/// narrowing moves, zips and conversions.
pub(crate) fn two_registers_misc(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let mut size = (insn >> 18) & 0x3;
    let quad = width(insn);
    let (mut d_kind, mut m_kind) = (quad, quad);
    let mut data = ".";
    let mut size_text: Option<&str> = None;
    let mut amount: Option<u32> = None;

    let mnemonic = match (insn >> 16) & 0x3 {
        0 => match insn & 0x780 {
            0x000 => Some("vrev64"),
            0x080 => Some("vrev32"),
            0x100 => Some("vrev16"),
            0x200 | 0x280 => {
                data = if insn & 0x80 != 0 { ".u" } else { ".s" };
                Some("vpaddl")
            }
            0x400 => {
                data = ".s";
                Some("vcls")
            }
            0x480 => {
                data = ".i";
                Some("vclz")
            }
            0x500 => Some("vcnt"),
            0x580 => {
                data = "";
                size_text = Some("");
                Some("vmvn")
            }
            0x600 | 0x680 => {
                data = if insn & 0x80 != 0 { ".u" } else { ".s" };
                Some("vpadal")
            }
            0x700 => {
                data = ".s";
                Some("vqabs")
            }
            0x780 => {
                data = ".s";
                Some("vqneg")
            }
            _ => None,
        },
        1 => {
            data = if insn & (1 << 10) != 0 { ".f" } else { ".s" };
            amount = Some(0);
            match insn & 0x380 {
                0x000 => Some("vcgt"),
                0x080 => Some("vcge"),
                0x100 => {
                    if insn & (1 << 10) == 0 {
                        data = ".i";
                    }
                    Some("vceq")
                }
                0x180 => Some("vcle"),
                0x200 => Some("vclt"),
                0x300 => {
                    amount = None;
                    Some("vabs")
                }
                0x380 => {
                    amount = None;
                    Some("vneg")
                }
                _ => None,
            }
        }
        2 => match insn & 0x780 {
            0x000 => {
                data = "";
                size_text = Some("");
                Some("vswp")
            }
            0x080 => Some("vtrn"),
            0x100 => Some("vuzp"),
            0x180 => Some("vzip"),
            0x200 => {
                d_kind = VectorKind::Double;
                m_kind = VectorKind::Quad;
                size += 1;
                if insn & (1 << 6) != 0 {
                    data = ".s";
                    Some("vqmovun")
                } else {
                    data = ".i";
                    Some("vmovn")
                }
            }
            0x280 => {
                d_kind = VectorKind::Double;
                m_kind = VectorKind::Quad;
                size += 1;
                data = if insn & (1 << 6) != 0 { ".u" } else { ".s" };
                Some("vqmovn")
            }
            0x300 if insn & (1 << 6) == 0 => {
                d_kind = VectorKind::Quad;
                m_kind = VectorKind::Double;
                data = ".i";
                amount = Some(8 << size);
                Some("vshll")
            }
            0x600 => {
                d_kind = VectorKind::Double;
                m_kind = VectorKind::Quad;
                data = ".f16";
                size_text = Some(".f32");
                Some("vcvt")
            }
            0x700 => {
                d_kind = VectorKind::Quad;
                m_kind = VectorKind::Double;
                data = ".f32";
                size_text = Some(".f16");
                Some("vcvt")
            }
            _ => None,
        },
        _ => {
            let integer = if insn & 0x80 != 0 { ".u32" } else { ".s32" };
            match insn & 0x680 {
                0x400 | 0x480 => {
                    data = if insn & (1 << 8) != 0 { ".f" } else { ".u" };
                    Some(if insn & 0x80 != 0 { "vrsqrte" } else { "vrecpe" })
                }
                // Bit 8 converts to integer, bit 7 selects unsigned.
                0x600 | 0x680 if insn & (1 << 8) != 0 => {
                    data = integer;
                    size_text = Some(".f32");
                    Some("vcvt")
                }
                0x600 | 0x680 => {
                    data = ".f32";
                    size_text = Some(integer);
                    Some("vcvt")
                }
                _ => None,
            }
        }
    };

    let Some(mnemonic) = mnemonic else {
        return ctx.undefined();
    };
    ctx.set_mnemonic(&[mnemonic])?;
    ctx.set_suffix(&[data, size_text.unwrap_or_else(|| element_size(size))])?;
    write!(ctx.operand(0), "{}", Vector::d(d_kind, insn))?;
    write!(ctx.operand(1), "{}", Vector::m(m_kind, insn))?;
    match amount {
        Some(amount) => simd_immediate(ctx.operand(2), u64::from(amount)),
        None => Ok(()),
    }
}

pub(crate) fn vector_extract(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let kind = width(insn);
    let imm4 = (insn >> 8) & 0xF;
    ctx.set_mnemonic(&["vext"])?;
    ctx.set_suffix(&[".8"])?;
    write!(ctx.operand(0), "{}", Vector::d(kind, insn))?;
    write!(ctx.operand(1), "{}", Vector::n(kind, insn))?;
    write!(ctx.operand(2), "{}", Vector::m(kind, insn))?;
    simd_immediate(ctx.operand(3), u64::from(imm4))
}

/// `vtbl`/`vtbx`
pub(crate) fn table_lookup(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let length = ((insn >> 8) & 0x3) + 1;
    let table = Vector::n(VectorKind::Double, insn).number;
    ctx.set_mnemonic(&[if insn & (1 << 6) != 0 { "vtbx" } else { "vtbl" }])?;
    ctx.set_suffix(&[".8"])?;
    write!(ctx.operand(0), "{}", Vector::d(VectorKind::Double, insn))?;
    vector_list(ctx.operand(1), table, length, 1, "d", Lanes::None)?;
    write!(ctx.operand(2), "{}", Vector::m(VectorKind::Double, insn))
}

/// `vdup` from a scalar element.
pub(crate) fn duplicate_scalar(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let imm4 = (insn >> 16) & 0xF;
    let (suffix, index) = if imm4 & 0x1 != 0 {
        (".8", imm4 >> 1)
    } else if imm4 & 0x3 == 0x2 {
        (".16", imm4 >> 2)
    } else if imm4 & 0x7 == 0x4 {
        (".32", imm4 >> 3)
    } else {
        ("", 0)
    };

    ctx.set_mnemonic(&["vdup"])?;
    ctx.set_suffix(&[suffix])?;
    write!(ctx.operand(0), "{}", Vector::d(width(insn), insn))?;
    write!(ctx.operand(1), "{}[{index}]", Vector::m(VectorKind::Double, insn))
}

/// Writes the `[rn:align]!, rm` tail shared by the element load/stores.
fn element_address(ctx: &mut ArmContext, insn: u32, align: Option<u32>) -> fmt::Result {
    let rn = (insn >> 16) & 0xF;
    let rm = insn & 0xF;
    let out = ctx.operand(1);
    write!(out, "[{}", reg(rn))?;
    if let Some(align) = align {
        write!(out, ":{align}")?;
    }
    out.write_char(']')?;
    if rm == 13 {
        out.write_char('!')?;
    }
    if rm != 13 && rm != 15 {
        ctx.set_operand(2, reg(rm))?;
    }
    Ok(())
}

/// `vldN` of one element to all lanes: `vld1.16 {d0[]}, [r1]`.
pub(crate) fn element_all_lanes(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let structures = ((insn >> 8) & 0x3) + 1;
    let size = match insn & 0xC0 {
        0x00 => Some(8),
        0x40 => Some(16),
        0x80 => Some(32),
        _ => None,
    };
    let spaced = insn & (1 << 5) != 0;
    let (count, increment) = match (structures, spaced) {
        (1, true) => (2, 1),
        (1, false) => (1, 1),
        (n, true) => (n, 2),
        (n, false) => (n, 1),
    };
    let align = if insn & (1 << 4) == 0 {
        None
    } else {
        match (structures, size) {
            (1, Some(16)) => Some(16),
            (1, Some(32)) => Some(32),
            (2, Some(8)) => Some(16),
            (2, Some(16)) => Some(32),
            (2, Some(32)) => Some(64),
            (4, Some(8)) => Some(32),
            (4, Some(16 | 32)) => Some(64),
            (4, _) => Some(128),
            _ => None,
        }
    };

    let start = Vector::d(VectorKind::Double, insn).number;
    let digit = STRUCTURES[(structures - 1) as usize];
    ctx.set_mnemonic(&["vld", digit])?;
    match size {
        Some(size) => write!(ctx.suffix, ".{size}")?,
        None => ctx.set_suffix(&[])?,
    }
    vector_list(ctx.operand(0), start, count, increment, "d", Lanes::All)?;
    element_address(ctx, insn, align)
}

/// `vldN`/`vstN` of a single element: `vld1.32 {d0[1]}, [r1]`.
pub(crate) fn element_single(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let structures = ((insn >> 8) & 0x3) + 1;
    let (size, index, increment, align_bits) = match insn & 0xC00 {
        0x000 => (8, (insn >> 5) & 0x7, 1, (insn >> 4) & 0x1),
        0x400 => (16, (insn >> 6) & 0x3, if insn & (1 << 5) != 0 { 2 } else { 1 }, (insn >> 4) & 0x1),
        0x800 => (32, (insn >> 7) & 0x1, if insn & (1 << 6) != 0 { 2 } else { 1 }, (insn >> 4) & 0x3),
        _ => return ctx.undefined(),
    };
    let align = if align_bits == 0 {
        None
    } else {
        match (structures, size) {
            (1, 16) => Some(16),
            (1, 32) => Some(32),
            (2, 8) => Some(16),
            (2, 16) => Some(32),
            (2, 32) => Some(64),
            (4, 8) => Some(32),
            (4, 16) => Some(64),
            (4, 32) if align_bits == 1 => Some(64),
            (4, 32) => Some(128),
            _ => None,
        }
    };

    let start = Vector::d(VectorKind::Double, insn).number;
    let digit = STRUCTURES[(structures - 1) as usize];
    ctx.set_mnemonic(&[if insn & (1 << 21) != 0 { "vld" } else { "vst" }, digit])?;
    ctx.suffix.clear();
    write!(ctx.suffix, ".{size}")?;
    vector_list(ctx.operand(0), start, structures, increment, "d", Lanes::Index(index))?;
    element_address(ctx, insn, align)
}

/// `vldN`/`vstN` of multiple structures: `vld1.32 {d0, d1}, [r1]`.
pub(crate) fn element_multiple(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let kind = ((insn >> 8) & 0xF) as usize;
    let (Some(suffix), Some(&count)) = (
        SIMD_ELEMENT_MULTIPLE_SUFFIX.get(kind),
        SIMD_ELEMENT_MULTIPLE_VECTOR_COUNT.get(kind),
    ) else {
        return ctx.undefined();
    };
    let increment = if matches!(kind, 1 | 5 | 9) { 2 } else { 1 };
    let align = match insn & 0x30 {
        0x10 => Some(64),
        0x20 => Some(128),
        0x30 => Some(256),
        _ => None,
    };

    let start = Vector::d(VectorKind::Double, insn).number;
    ctx.set_mnemonic(&[if insn & (1 << 21) != 0 { "vld" } else { "vst" }, suffix])?;
    ctx.set_suffix(&[".", element_size(insn >> 6)])?;
    vector_list(ctx.operand(0), start, count, increment, "d", Lanes::None)?;
    element_address(ctx, insn, align)
}

#[cfg(test)]
mod tests {
    use super::super::tests::text;

    #[test]
    fn test_three_same_integer() {
        assert_eq!(text(0xF222_0844), "vadd.i32 q0, q1, q2");
        assert_eq!(text(0xF222_0401), "vshl.s32 d0, d1, d2");
        assert_eq!(text(0xF301_0112), "veor d0, d1, d2");
        // vorr with identical sources is a register move.
        assert_eq!(text(0xF221_0111), "vmov d0, d1");
    }

    #[test]
    fn test_three_same_float() {
        assert_eq!(text(0xF201_0D02), "vadd.f32 d0, d1, d2");
        assert_eq!(text(0xF221_0D02), "vsub.f32 d0, d1, d2");
        assert_eq!(text(0xF301_0D12), "vmul.f32 d0, d1, d2");
    }

    #[test]
    fn test_one_register() {
        assert_eq!(text(0xF280_0011), "vmov.i32 d0, #1  ; 0x1");
        assert_eq!(text(0xF387_0E1F), "vmov.i8 d0, #255  ; 0xff");
        assert_eq!(text(0xF287_0F50), "vmov.f32 q0, #112  ; 0x3f800000 1");
        assert_eq!(text(0xF280_0111), "vorr.i32 d0, #1  ; 0x1");
    }

    #[test]
    fn test_shift_immediate() {
        assert_eq!(text(0xF2BB_0011), "vshr.s32 d0, d1, #5  ; 0x5");
        assert_eq!(text(0xF2A5_0511), "vshl.i32 d0, d1, #5  ; 0x5");
        assert_eq!(text(0xF28D_0812), "vshrn.i16 d0, q1, #3  ; 0x3");
        assert_eq!(text(0xF3A5_0511), "vsli.32 d0, d1, #5  ; 0x5");
        assert_eq!(text(0xF388_0A11), "vmovl.u8 q0, d1");
    }

    #[test]
    fn test_three_different() {
        assert_eq!(text(0xF291_0002), "vaddl.s16 q0, d1, d2");
        assert_eq!(text(0xF292_0404), "vaddhn.i32 d0, q1, q2");
        assert_eq!(text(0xF281_0E02), "vmull.p8 q0, d1, d2");
    }

    #[test]
    fn test_scalar() {
        assert_eq!(text(0xF3A2_0962), "vmul.f32 q0, q1, d2[1]");
        assert_eq!(text(0xF291_026A), "vmlal.s16 q0, d1, d2[3]");
    }

    #[test]
    fn test_two_registers_misc() {
        assert_eq!(text(0xF3B0_0001), "vrev64.8 d0, d1");
        assert_eq!(text(0xF3B0_0501), "vcnt.8 d0, d1");
        assert_eq!(text(0xF3B0_05C2), "vmvn q0, q1");
        assert_eq!(text(0xF3B9_0101), "vceq.i32 d0, d1, #0  ; 0x0");
        assert_eq!(text(0xF3B9_0742), "vabs.f32 q0, q1");
        assert_eq!(text(0xF3B6_0202), "vmovn.i32 d0, q1");
        assert_eq!(text(0xF3B2_0001), "vswp d0, d1");
        assert_eq!(text(0xF3BB_0642), "vcvt.f32.s32 q0, q1");
        assert_eq!(text(0xF3B2_0301), "vshll.i8 q0, d1, #8  ; 0x8");
    }

    #[test]
    fn test_vector_convert_direction() {
        assert_eq!(text(0xF3BB_0642), "vcvt.f32.s32 q0, q1");
        assert_eq!(text(0xF3BB_06C2), "vcvt.f32.u32 q0, q1");
        assert_eq!(text(0xF3BB_0742), "vcvt.s32.f32 q0, q1");
        assert_eq!(text(0xF3BB_07C2), "vcvt.u32.f32 q0, q1");
    }

    #[test]
    fn test_permutes() {
        assert_eq!(text(0xF2B1_0302), "vext.8 d0, d1, d2, #3  ; 0x3");
        assert_eq!(text(0xF3B1_0903), "vtbl.8 d0, {d1, d2}, d3");
        assert_eq!(text(0xF3BA_0C01), "vdup.16 d0, d1[2]");
    }

    #[test]
    fn test_element_load_store() {
        assert_eq!(text(0xF421_0A8F), "vld1.32 {d0, d1}, [r1]");
        assert_eq!(text(0xF401_070D), "vst1.8 {d0}, [r1]!");
        assert_eq!(text(0xF4A1_088F), "vld1.32 {d0[1]}, [r1]");
        assert_eq!(text(0xF4A1_0C4F), "vld1.16 {d0[]}, [r1]");
        // Register post-increment.
        assert_eq!(text(0xF421_0A82), "vld1.32 {d0, d1}, [r1], r2");
    }
}
