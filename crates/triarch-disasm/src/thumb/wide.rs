//! 32-bit Thumb-2 encodings.
//!
//! The decoded word is the first halfword in bits 16-31 and the second in
//! bits 0-15. The coprocessor, VFP and Advanced SIMD spaces share their
//! leaf decoders with ARM.

use std::fmt::{self, Write};

use triarch_core::DecodeEntry;

use crate::arm::format::{
    banked_register, barrier, decode_shift, immediate, immediate_shift, mode, register_list,
    status_register,
};
use crate::arm::imm::{sign_extend, thumb_expand_immediate};
use crate::arm::names::{reg, CONDITION_CODES};
use crate::arm::tables::{self, floating_point, simd_load_store, simd_small_transfers};
use crate::arm::{
    change_processor_state, coprocessor_load_store, coprocessor_move, coprocessor_move_two,
    offset_sign, route, simd_64bit_transfer, undefined, ArmContext,
};

type Entry = DecodeEntry<ArmContext>;

const PC: u32 = 15;
const SP: u32 = 13;
const LOAD: u32 = 1 << 20;
const SET_FLAGS: u32 = 1 << 20;

pub(super) static WIDE: &[Entry] = &[
    Entry::new(0x1E40_0000, 0x0800_0000, load_store_multiple),
    Entry::new(0x1E40_0000, 0x0840_0000, load_store_dual_exclusive),
    Entry::new(0x1E00_0000, 0x0A00_0000, data_processing_shifted_register),
    Entry::new(0x1C00_0000, 0x0C00_0000, coprocessor),
    Entry::new(0x1A00_8000, 0x1000_0000, data_processing_modified_immediate),
    Entry::new(0x1A00_8000, 0x1200_0000, data_processing_plain_immediate),
    Entry::new(0x1800_8000, 0x1000_8000, branch_and_miscellaneous),
    Entry::new(0x1F10_0000, 0x1800_0000, load_store_single),
    Entry::new(0x1E70_0000, 0x1810_0000, load_store_single),
    Entry::new(0x1E70_0000, 0x1830_0000, load_store_single),
    Entry::new(0x1E70_0000, 0x1850_0000, load_store_single),
    Entry::new(0x1E70_0000, 0x1870_0000, undefined),
    Entry::new(0x1F10_0000, 0x1900_0000, simd_element_load_store),
    Entry::new(0x1F00_0000, 0x1A00_0000, data_processing_register),
    Entry::new(0x1F80_0000, 0x1B00_0000, multiply_accumulate),
    Entry::new(0x1F80_0000, 0x1B80_0000, long_multiply_divide),
    Entry::new(0x1C00_0000, 0x1C00_0000, coprocessor),
];

static LOAD_STORE_DUAL_EXCLUSIVE: &[Entry] = &[
    Entry::new(0x01B0_0000, 0x0000_0000, exclusive_word),
    Entry::new(0x01B0_0000, 0x0010_0000, exclusive_word),
    Entry::new(0x0120_0000, 0x0020_0000, load_store_dual),
    Entry::new(0x0100_0000, 0x0100_0000, load_store_dual),
    Entry::new(0x01B0_00F0, 0x0080_0040, exclusive_narrow),
    Entry::new(0x01B0_00F0, 0x0080_0050, exclusive_narrow),
    Entry::new(0x01B0_00F0, 0x0080_0070, exclusive_narrow),
    Entry::new(0x01B0_00F0, 0x0090_0000, table_branch),
    Entry::new(0x01B0_00F0, 0x0090_0010, table_branch),
    Entry::new(0x01B0_00F0, 0x0090_0040, exclusive_narrow),
    Entry::new(0x01B0_00F0, 0x0090_0050, exclusive_narrow),
    Entry::new(0x01B0_00F0, 0x0090_0070, exclusive_narrow),
];

/// Keyed on the same bits as the ARM coprocessor space; bit 28 plays the
/// part of the ARM condition's low bit for the `2` forms.
static COPROCESSOR: &[Entry] = &[
    Entry::new(0x03E0_0000, 0x0000_0000, undefined),
    Entry::new(0x0300_0000, 0x0300_0000, simd_data_processing),
    Entry::new(0x03E0_0E00, 0x0040_0A00, simd_64bit_transfer),
    Entry::new(0x0200_0E00, 0x0000_0A00, simd_load_store),
    Entry::new(0x0300_0E10, 0x0200_0A00, floating_point),
    Entry::new(0x0300_0E10, 0x0200_0A10, simd_small_transfers),
    Entry::new(0x03E0_0000, 0x0040_0000, coprocessor_move_two),
    Entry::new(0x0200_0000, 0x0000_0000, coprocessor_load_store),
    Entry::new(0x0300_0000, 0x0200_0000, coprocessor_move),
];

static BRANCH_AND_MISCELLANEOUS: &[Entry] = &[
    Entry::new(0x07E0_5000, 0x0380_0000, move_to_special_register),
    Entry::new(0x07F0_5000, 0x03A0_0000, change_state_and_hints),
    Entry::new(0x07F0_5000, 0x03B0_0000, miscellaneous_control),
    Entry::new(0x07F0_5000, 0x03C0_0000, branch_exchange_jazelle),
    Entry::new(0x07F0_5000, 0x03D0_0000, exception_return),
    Entry::new(0x07E0_5000, 0x03E0_0000, move_from_special_register),
    Entry::new(0x07F0_7000, 0x07E0_0000, hypervisor_call),
    Entry::new(0x07F0_7000, 0x07F0_0000, secure_monitor_call),
    Entry::new(0x07F0_7000, 0x07F0_2000, permanently_undefined),
    Entry::new(0x0380_5000, 0x0380_0000, undefined),
    Entry::new(0x0000_5000, 0x0000_1000, branch),
    Entry::new(0x0000_5000, 0x0000_0000, conditional_branch),
    Entry::new(0x0000_4000, 0x0000_4000, branch_with_link),
];

/// `and`..`rsb` by the 4-bit op of the data processing forms. Empty slots
/// are unallocated; `pkh` only exists as a shifted register form.
const DATA_PROCESSING_MNEMONICS: [&str; 16] = [
    "and", "bic", "orr", "orn", "eor", "", "pkh", "", "add", "", "adc", "sbc", "", "sub", "rsb", "",
];

#[inline]
fn field(insn: u32, shift: u32) -> u32 {
    (insn >> shift) & 0xF
}

/// The word-aligned PC used by literal, `adr` and `blx` addressing.
#[inline]
fn aligned_pc(ctx: &ArmContext) -> u64 {
    ctx.pc() & !0x3
}

fn write_target(ctx: &mut ArmContext, slot: usize, target: u64, is_destination: bool) -> fmt::Result {
    write!(ctx.operand(slot), "[0x{target:08x}]")?;
    ctx.set_address(target, is_destination);
    Ok(())
}

fn load_store_dual_exclusive(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    route(ctx, insn, LOAD_STORE_DUAL_EXCLUSIVE)
}

fn coprocessor(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    route(ctx, insn, COPROCESSOR)
}

fn branch_and_miscellaneous(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    route(ctx, insn, BRANCH_AND_MISCELLANEOUS)
}

/// Advanced SIMD data processing. Thumb keeps the U bit at bit 28; the
/// shared decoder expects it at bit 24.
fn simd_data_processing(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let word = (insn & !(1 << 24)) | ((insn >> 4) & (1 << 24));
    route(ctx, word, tables::SIMD_DATA_PROCESSING)
}

fn simd_element_load_store(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    route(ctx, insn, tables::SIMD_ELEMENT_LOAD_STORE)
}

// ---------------------------------------------------------------------------
// Load/store multiple, dual and exclusive
// ---------------------------------------------------------------------------

/// `ldm`/`stm`, `push.w`/`pop.w`, `srs` and `rfe`.
fn load_store_multiple(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let op = (insn >> 23) & 0x3;
    let load = insn & LOAD != 0;
    let writeback = insn & (1 << 21) != 0;
    let rn = field(insn, 16);
    let bang = if writeback { "!" } else { "" };
    let increment = op == 1 || op == 3;
    let kind = if increment { "ia" } else { "db" };

    if op == 0 || op == 3 {
        if load {
            ctx.set_mnemonic(&["rfe", kind])?;
            return write!(ctx.operand(0), "{}{bang}", reg(rn));
        }
        ctx.set_mnemonic(&["srs", kind])?;
        let operand = ctx.operand(0);
        write!(operand, "sp{bang}, ")?;
        return mode(operand, insn);
    }

    let list = insn & 0xFFFF;
    if rn == SP && writeback && load == increment {
        ctx.set_mnemonic(&[if load { "pop.w" } else { "push.w" }])?;
        return register_list(ctx.operand(0), list);
    }

    ctx.set_mnemonic(&[if load { "ldm" } else { "stm" }, kind, ".w"])?;
    write!(ctx.operand(0), "{}{bang}", reg(rn))?;
    register_list(ctx.operand(1), list)
}

/// `strex Rd, Rt, [Rn, #imm]` and `ldrex Rt, [Rn, #imm]`.
fn exclusive_word(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let rn = reg(field(insn, 16));
    let rt = reg(field(insn, 12));
    let offset = (insn & 0xFF) << 2;
    let slot = if insn & LOAD != 0 {
        ctx.set_mnemonic(&["ldrex"])?;
        ctx.set_operand(0, rt)?;
        1
    } else {
        ctx.set_mnemonic(&["strex"])?;
        ctx.set_operand(0, reg(field(insn, 8)))?;
        ctx.set_operand(1, rt)?;
        2
    };
    if offset == 0 {
        write!(ctx.operand(slot), "[{rn}]")
    } else {
        write!(ctx.operand(slot), "[{rn}, #{offset}]")
    }
}

/// The byte, halfword and doubleword exclusives.
fn exclusive_narrow(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let size = match (insn >> 4) & 0x3 {
        0 => "b",
        1 => "h",
        _ => "d",
    };
    let double = size == "d";
    let rt = reg(field(insn, 12));
    let rt2 = reg(field(insn, 8));

    let mut slot = 0;
    if insn & LOAD != 0 {
        ctx.set_mnemonic(&["ldrex", size])?;
    } else {
        ctx.set_mnemonic(&["strex", size])?;
        ctx.set_operand(slot, reg(insn & 0xF))?;
        slot += 1;
    }
    ctx.set_operand(slot, rt)?;
    slot += 1;
    if double {
        ctx.set_operand(slot, rt2)?;
        slot += 1;
    }
    write!(ctx.operand(slot), "[{}]", reg(field(insn, 16)))
}

/// `tbb [Rn, Rm]` and `tbh [Rn, Rm, lsl #1]`.
fn table_branch(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let rn = reg(field(insn, 16));
    let rm = reg(insn & 0xF);
    if insn & (1 << 4) != 0 {
        ctx.set_mnemonic(&["tbh"])?;
        write!(ctx.operand(0), "[{rn}, {rm}, lsl #1]")
    } else {
        ctx.set_mnemonic(&["tbb"])?;
        write!(ctx.operand(0), "[{rn}, {rm}]")
    }
}

/// `ldrd`/`strd Rt, Rt2, ...` in offset, pre-indexed, post-indexed and
/// literal forms.
fn load_store_dual(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let rn = field(insn, 16);
    let offset = (insn & 0xFF) << 2;
    let sign = offset_sign(insn);
    let pre_indexed = insn & (1 << 24) != 0;
    let writeback = insn & (1 << 21) != 0;

    ctx.set_mnemonic(&[if insn & LOAD != 0 { "ldrd" } else { "strd" }])?;
    ctx.set_operand(0, reg(field(insn, 12)))?;
    ctx.set_operand(1, reg(field(insn, 8)))?;

    if rn == PC {
        let base = aligned_pc(ctx);
        let target = if sign == "+" {
            base.wrapping_add(u64::from(offset))
        } else {
            base.wrapping_sub(u64::from(offset))
        };
        return write_target(ctx, 2, target, false);
    }

    let rn = reg(rn);
    let bang = if writeback { "!" } else { "" };
    if pre_indexed {
        write!(ctx.operand(2), "[{rn}, #{sign}{offset}]{bang}")
    } else {
        write!(ctx.operand(2), "[{rn}], #{sign}{offset}")
    }
}

// ---------------------------------------------------------------------------
// Data processing
// ---------------------------------------------------------------------------

/// What the Rd/Rn special cases of a data processing op turn it into.
enum Form {
    /// `op Rd, Rn, <operand>`
    Standard(&'static str),
    /// `tst`/`teq`/`cmn`/`cmp Rn, <operand>`
    Compare(&'static str),
    /// `mov`/`mvn Rd, <operand>`
    Move(&'static str),
}

/// Resolves the 4-bit op together with the Rd == pc and Rn == pc aliases.
fn data_processing_form(op: u32, rd: u32, rn: u32, set_flags: bool) -> Option<Form> {
    let form = match op {
        0x0 if rd == PC && set_flags => Form::Compare("tst"),
        0x4 if rd == PC && set_flags => Form::Compare("teq"),
        0x8 if rd == PC && set_flags => Form::Compare("cmn"),
        0xD if rd == PC && set_flags => Form::Compare("cmp"),
        0x2 if rn == PC => Form::Move("mov"),
        0x3 if rn == PC => Form::Move("mvn"),
        _ => match DATA_PROCESSING_MNEMONICS[op as usize] {
            "" => return None,
            name => Form::Standard(name),
        },
    };
    Some(form)
}

fn data_processing_shifted_register(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let op = (insn >> 21) & 0xF;
    let set_flags = insn & SET_FLAGS != 0;
    let rn = field(insn, 16);
    let rd = field(insn, 8);
    let rm = insn & 0xF;
    let shift_type = (insn >> 4) & 0x3;
    let amount = (((insn >> 12) & 0x7) << 2) | ((insn >> 6) & 0x3);
    let s = if set_flags { "s" } else { "" };

    if op == 0x6 {
        if set_flags || shift_type & 0x1 != 0 {
            return ctx.undefined();
        }
        let top_bottom = insn & (1 << 5) != 0;
        ctx.set_mnemonic(&[if top_bottom { "pkhtb" } else { "pkhbt" }])?;
        ctx.set_operand(0, reg(rd))?;
        ctx.set_operand(1, reg(rn))?;
        return immediate_shift(ctx.operand(2), rm, shift_type << 5, amount);
    }

    let Some(form) = data_processing_form(op, rd, rn, set_flags) else {
        return ctx.undefined();
    };
    match form {
        Form::Compare(name) => {
            ctx.set_mnemonic(&[name, ".w"])?;
            ctx.set_operand(0, reg(rn))?;
            immediate_shift(ctx.operand(1), rm, shift_type << 5, amount)
        }
        Form::Move("mov") => {
            // A shifted move is written as the shift itself.
            ctx.set_operand(0, reg(rd))?;
            ctx.set_operand(1, reg(rm))?;
            match decode_shift(shift_type << 5, amount) {
                (None, _) => ctx.set_mnemonic(&["mov", s, ".w"]),
                (Some("rrx"), _) => ctx.set_mnemonic(&["rrx", s, ".w"]),
                (Some(kind), amount) => {
                    ctx.set_mnemonic(&[kind, s, ".w"])?;
                    write!(ctx.operand(2), "#{amount}")
                }
            }
        }
        Form::Move(name) => {
            ctx.set_mnemonic(&[name, s, ".w"])?;
            ctx.set_operand(0, reg(rd))?;
            immediate_shift(ctx.operand(1), rm, shift_type << 5, amount)
        }
        Form::Standard(name) => {
            ctx.set_mnemonic(&[name, s, ".w"])?;
            ctx.set_operand(0, reg(rd))?;
            ctx.set_operand(1, reg(rn))?;
            immediate_shift(ctx.operand(2), rm, shift_type << 5, amount)
        }
    }
}

/// `i:imm3:imm8`
#[inline]
fn imm12(insn: u32) -> u32 {
    (((insn >> 26) & 0x1) << 11) | (((insn >> 12) & 0x7) << 8) | (insn & 0xFF)
}

fn data_processing_modified_immediate(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let op = (insn >> 21) & 0xF;
    let set_flags = insn & SET_FLAGS != 0;
    let rn = field(insn, 16);
    let rd = field(insn, 8);
    let value = thumb_expand_immediate(imm12(insn));
    let s = if set_flags { "s" } else { "" };

    let form = match data_processing_form(op, rd, rn, set_flags) {
        Some(Form::Standard("pkh")) | None => return ctx.undefined(),
        Some(form) => form,
    };
    match form {
        Form::Compare(name) => {
            ctx.set_mnemonic(&[name, ".w"])?;
            ctx.set_operand(0, reg(rn))?;
            immediate(ctx.operand(1), value)
        }
        Form::Move(name) => {
            ctx.set_mnemonic(&[name, s, ".w"])?;
            ctx.set_operand(0, reg(rd))?;
            immediate(ctx.operand(1), value)
        }
        Form::Standard(name) => {
            ctx.set_mnemonic(&[name, s, ".w"])?;
            ctx.set_operand(0, reg(rd))?;
            ctx.set_operand(1, reg(rn))?;
            immediate(ctx.operand(2), value)
        }
    }
}

/// Wide add/subtract, 16-bit moves, saturation and bit field operations.
fn data_processing_plain_immediate(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let op = (insn >> 20) & 0x1F;
    let rn = field(insn, 16);
    let rd = field(insn, 8);
    let imm12 = imm12(insn);
    let lsb = (((insn >> 12) & 0x7) << 2) | ((insn >> 6) & 0x3);
    let low5 = insn & 0x1F;

    match op {
        0b00000 | 0b01010 if rn == PC => {
            ctx.set_mnemonic(&["adr.w"])?;
            ctx.set_operand(0, reg(rd))?;
            let base = aligned_pc(ctx);
            let target = if op == 0 {
                base.wrapping_add(u64::from(imm12))
            } else {
                base.wrapping_sub(u64::from(imm12))
            };
            write_target(ctx, 1, target, false)
        }
        0b00000 | 0b01010 => {
            ctx.set_mnemonic(&[if op == 0 { "addw" } else { "subw" }])?;
            ctx.set_operand(0, reg(rd))?;
            ctx.set_operand(1, reg(rn))?;
            immediate(ctx.operand(2), imm12)
        }
        0b00100 | 0b01100 => {
            ctx.set_mnemonic(&[if op == 0b00100 { "movw" } else { "movt" }])?;
            ctx.set_operand(0, reg(rd))?;
            immediate(ctx.operand(1), (rn << 12) | imm12)
        }
        0b10010 | 0b11010 if lsb == 0 => {
            let signed = op == 0b10010;
            let saturate = (insn & 0xF) + u32::from(signed);
            ctx.set_mnemonic(&[if signed { "ssat16" } else { "usat16" }])?;
            ctx.set_operand(0, reg(rd))?;
            write!(ctx.operand(1), "#{saturate}")?;
            ctx.set_operand(2, reg(rn))
        }
        0b10000 | 0b10010 | 0b11000 | 0b11010 => {
            let signed = op & 0b01000 == 0;
            let saturate = low5 + u32::from(signed);
            ctx.set_mnemonic(&[if signed { "ssat" } else { "usat" }])?;
            ctx.set_operand(0, reg(rd))?;
            write!(ctx.operand(1), "#{saturate}")?;
            let operand = ctx.operand(2);
            operand.push_str(reg(rn))?;
            if insn & (1 << 21) != 0 {
                write!(operand, ", asr #{lsb}")
            } else if lsb != 0 {
                write!(operand, ", lsl #{lsb}")
            } else {
                Ok(())
            }
        }
        0b10100 | 0b11100 => {
            ctx.set_mnemonic(&[if op == 0b10100 { "sbfx" } else { "ubfx" }])?;
            ctx.set_operand(0, reg(rd))?;
            ctx.set_operand(1, reg(rn))?;
            write!(ctx.operand(2), "#{lsb}")?;
            write!(ctx.operand(3), "#{}", low5 + 1)
        }
        0b10110 => {
            if low5 < lsb {
                return ctx.unpredictable();
            }
            let width = low5 + 1 - lsb;
            ctx.set_operand(0, reg(rd))?;
            let mut slot = 1;
            if rn == PC {
                ctx.set_mnemonic(&["bfc"])?;
            } else {
                ctx.set_mnemonic(&["bfi"])?;
                ctx.set_operand(slot, reg(rn))?;
                slot += 1;
            }
            write!(ctx.operand(slot), "#{lsb}")?;
            write!(ctx.operand(slot + 1), "#{width}")
        }
        _ => ctx.undefined(),
    }
}

/// Register-controlled shifts, extends, parallel add/subtract and the
/// miscellaneous operations.
fn data_processing_register(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    if (insn >> 12) & 0xF != 0xF {
        return ctx.undefined();
    }
    let rn = field(insn, 16);
    let rd = reg(field(insn, 8));
    let rm = insn & 0xF;

    if insn & 0x0080_00F0 == 0 {
        let kind = ["lsl", "lsr", "asr", "ror"][((insn >> 21) & 0x3) as usize];
        let s = if insn & SET_FLAGS != 0 { "s" } else { "" };
        ctx.set_mnemonic(&[kind, s, ".w"])?;
        ctx.set_operand(0, rd)?;
        ctx.set_operand(1, reg(rn))?;
        return ctx.set_operand(2, reg(rm));
    }

    if insn & (1 << 23) == 0 {
        return extend(ctx, insn);
    }
    if insn & (1 << 7) == 0 {
        return parallel_arithmetic(ctx, insn);
    }
    if insn & 0x0040_00C0 != 0x0000_0080 {
        return ctx.undefined();
    }

    let index = ((insn >> 4) & 0x3) | (((insn >> 20) & 0x3) << 2);
    let mnemonic = match index {
        0x0 => "qadd",
        0x1 => "qdadd",
        0x2 => "qsub",
        0x3 => "qdsub",
        0x4 => "rev.w",
        0x5 => "rev16.w",
        0x6 => "rbit",
        0x7 => "revsh.w",
        0x8 => "sel",
        0xC => "clz",
        _ => return ctx.undefined(),
    };
    ctx.set_mnemonic(&[mnemonic])?;
    ctx.set_operand(0, rd)?;
    match index {
        // qadd Rd, Rm, Rn
        0x0..=0x3 => {
            ctx.set_operand(1, reg(rm))?;
            ctx.set_operand(2, reg(rn))
        }
        0x8 => {
            ctx.set_operand(1, reg(rn))?;
            ctx.set_operand(2, reg(rm))
        }
        _ => ctx.set_operand(1, reg(rm)),
    }
}

/// `sxtah` and friends; an Rn of pc drops the accumulate.
fn extend(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    if insn & (1 << 7) == 0 {
        return ctx.undefined();
    }
    let (signed, size) = match (insn >> 20) & 0x7 {
        0 => ("s", "h"),
        1 => ("u", "h"),
        2 => ("s", "b16"),
        3 => ("u", "b16"),
        4 => ("s", "b"),
        5 => ("u", "b"),
        _ => return ctx.undefined(),
    };
    let rn = field(insn, 16);
    let rotation = ((insn >> 4) & 0x3) * 8;

    ctx.set_operand(0, reg(field(insn, 8)))?;
    let mut slot = 1;
    if rn == PC {
        ctx.set_mnemonic(&[signed, "xt", size])?;
    } else {
        ctx.set_mnemonic(&[signed, "xta", size])?;
        ctx.set_operand(slot, reg(rn))?;
        slot += 1;
    }
    let operand = ctx.operand(slot);
    operand.push_str(reg(insn & 0xF))?;
    if rotation != 0 {
        write!(operand, ", ror #{rotation}")?;
    }
    Ok(())
}

/// Signed and unsigned parallel add/subtract, plain, saturating and
/// halving.
fn parallel_arithmetic(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let unsigned = insn & (1 << 6) != 0;
    let prefix = match ((insn >> 4) & 0x3, unsigned) {
        (0, false) => "s",
        (1, false) => "q",
        (2, false) => "sh",
        (0, true) => "u",
        (1, true) => "uq",
        (2, true) => "uh",
        _ => return ctx.undefined(),
    };
    let operation = match (insn >> 20) & 0x7 {
        0 => "add8",
        1 => "add16",
        2 => "asx",
        4 => "sub8",
        5 => "sub16",
        6 => "sax",
        _ => return ctx.undefined(),
    };
    ctx.set_mnemonic(&[prefix, operation])?;
    ctx.set_operand(0, reg(field(insn, 8)))?;
    ctx.set_operand(1, reg(field(insn, 16)))?;
    ctx.set_operand(2, reg(insn & 0xF))
}

// ---------------------------------------------------------------------------
// Multiplies
// ---------------------------------------------------------------------------

#[inline]
fn bottom_top(insn: u32, bit: u32) -> &'static str {
    if insn & (1 << bit) != 0 {
        "t"
    } else {
        "b"
    }
}

/// 32-bit multiplies and multiply-accumulates: `Rd, Rn, Rm{, Ra}`.
fn multiply_accumulate(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let op1 = (insn >> 20) & 0x7;
    let op2 = (insn >> 4) & 0x3;
    let ra = field(insn, 12);
    let accumulate = ra != PC;
    let exchange = if insn & (1 << 4) != 0 { "x" } else { "" };
    let round = if insn & (1 << 4) != 0 { "r" } else { "" };

    let accumulate = match (op1, op2) {
        (0, 0) => {
            ctx.set_mnemonic(&[if accumulate { "mla" } else { "mul" }])?;
            accumulate
        }
        (0, 1) => {
            ctx.set_mnemonic(&["mls"])?;
            true
        }
        (1, _) => {
            let base = if accumulate { "smla" } else { "smul" };
            ctx.set_mnemonic(&[base, bottom_top(insn, 5), bottom_top(insn, 4)])?;
            accumulate
        }
        (2, 0 | 1) => {
            ctx.set_mnemonic(&[if accumulate { "smlad" } else { "smuad" }, exchange])?;
            accumulate
        }
        (3, 0 | 1) => {
            ctx.set_mnemonic(&[if accumulate { "smlaw" } else { "smulw" }, bottom_top(insn, 4)])?;
            accumulate
        }
        (4, 0 | 1) => {
            ctx.set_mnemonic(&[if accumulate { "smlsd" } else { "smusd" }, exchange])?;
            accumulate
        }
        (5, 0 | 1) => {
            ctx.set_mnemonic(&[if accumulate { "smmla" } else { "smmul" }, round])?;
            accumulate
        }
        (6, 0 | 1) => {
            ctx.set_mnemonic(&["smmls", round])?;
            true
        }
        (7, 0) => {
            ctx.set_mnemonic(&[if accumulate { "usada8" } else { "usad8" }])?;
            accumulate
        }
        _ => return ctx.undefined(),
    };

    ctx.set_operand(0, reg(field(insn, 8)))?;
    ctx.set_operand(1, reg(field(insn, 16)))?;
    ctx.set_operand(2, reg(insn & 0xF))?;
    if accumulate {
        ctx.set_operand(3, reg(ra))?;
    }
    Ok(())
}

/// 64-bit multiplies `RdLo, RdHi, Rn, Rm` and the divides `Rd, Rn, Rm`.
fn long_multiply_divide(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let op1 = (insn >> 20) & 0x7;
    let op2 = (insn >> 4) & 0xF;
    let exchange = if insn & (1 << 4) != 0 { "x" } else { "" };
    let rn = reg(field(insn, 16));
    let rm = reg(insn & 0xF);

    match (op1, op2) {
        (1, 0xF) | (3, 0xF) => {
            ctx.set_mnemonic(&[if op1 == 1 { "sdiv" } else { "udiv" }])?;
            ctx.set_operand(0, reg(field(insn, 8)))?;
            ctx.set_operand(1, rn)?;
            return ctx.set_operand(2, rm);
        }
        (0, 0) => ctx.set_mnemonic(&["smull"])?,
        (2, 0) => ctx.set_mnemonic(&["umull"])?,
        (4, 0) => ctx.set_mnemonic(&["smlal"])?,
        (4, 0x8..=0xB) => ctx.set_mnemonic(&["smlal", bottom_top(insn, 5), bottom_top(insn, 4)])?,
        (4, 0xC | 0xD) => ctx.set_mnemonic(&["smlald", exchange])?,
        (5, 0xC | 0xD) => ctx.set_mnemonic(&["smlsld", exchange])?,
        (6, 0) => ctx.set_mnemonic(&["umlal"])?,
        (6, 0x6) => ctx.set_mnemonic(&["umaal"])?,
        _ => return ctx.undefined(),
    }

    ctx.set_operand(0, reg(field(insn, 12)))?;
    ctx.set_operand(1, reg(field(insn, 8)))?;
    ctx.set_operand(2, rn)?;
    ctx.set_operand(3, rm)
}

// ---------------------------------------------------------------------------
// Loads and stores
// ---------------------------------------------------------------------------

/// Byte, halfword and word loads and stores, and the preload hints that
/// occupy the loads with Rt == pc.
fn load_store_single(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let size = (insn >> 21) & 0x3;
    let signed = insn & (1 << 24) != 0;
    let load = insn & LOAD != 0;
    let rt = field(insn, 12);
    let rn = field(insn, 16);
    let preload = load && rt == PC && size != 2;

    let base = match (load, signed, size) {
        (true, false, 0) if preload => "pld",
        (true, false, 1) if preload => "pldw",
        (true, true, 0) if preload => "pli",
        (true, true, 1) if preload => return ctx.set_mnemonic(&["nop.w"]),
        (false, false, 0) => "strb",
        (false, false, 1) => "strh",
        (false, false, 2) => "str",
        (true, false, 0) => "ldrb",
        (true, false, 1) => "ldrh",
        (true, false, 2) => "ldr",
        (true, true, 0) => "ldrsb",
        (true, true, 1) => "ldrsh",
        _ => return ctx.undefined(),
    };

    let slot = if preload {
        0
    } else {
        ctx.set_operand(0, reg(rt))?;
        1
    };

    if load && rn == PC {
        let offset = u64::from(insn & 0xFFF);
        let target = if insn & (1 << 23) != 0 {
            aligned_pc(ctx).wrapping_add(offset)
        } else {
            aligned_pc(ctx).wrapping_sub(offset)
        };
        ctx.set_mnemonic(&[base, if preload { "" } else { ".w" }])?;
        return write_target(ctx, slot, target, false);
    }

    let rn = reg(rn);
    let wide = if preload { "" } else { ".w" };
    if insn & (1 << 23) != 0 {
        ctx.set_mnemonic(&[base, wide])?;
        let offset = insn & 0xFFF;
        return if offset == 0 {
            write!(ctx.operand(slot), "[{rn}]")
        } else {
            write!(ctx.operand(slot), "[{rn}, #{offset}]")
        };
    }

    if insn & 0x0000_0FC0 == 0 {
        ctx.set_mnemonic(&[base, wide])?;
        let rm = reg(insn & 0xF);
        let amount = (insn >> 4) & 0x3;
        return if amount == 0 {
            write!(ctx.operand(slot), "[{rn}, {rm}]")
        } else {
            write!(ctx.operand(slot), "[{rn}, {rm}, lsl #{amount}]")
        };
    }

    let puw = (insn >> 8) & 0xF;
    let offset = insn & 0xFF;
    let sign = if insn & (1 << 9) != 0 { "" } else { "-" };
    match puw {
        0b1110 if !preload => {
            ctx.set_mnemonic(&[base, "t"])?;
            write!(ctx.operand(slot), "[{rn}, #{offset}]")
        }
        0b1100 => {
            ctx.set_mnemonic(&[base, wide])?;
            write!(ctx.operand(slot), "[{rn}, #-{offset}]")
        }
        0b1101 | 0b1111 if !preload => {
            ctx.set_mnemonic(&[base, wide])?;
            write!(ctx.operand(slot), "[{rn}, #{sign}{offset}]!")
        }
        0b1001 | 0b1011 if !preload => {
            ctx.set_mnemonic(&[base, wide])?;
            write!(ctx.operand(slot), "[{rn}], #{sign}{offset}")
        }
        _ => ctx.undefined(),
    }
}

// ---------------------------------------------------------------------------
// Branches and miscellaneous control
// ---------------------------------------------------------------------------

/// Rebuilds the ARM `msr`/`mrs` layout the shared status and banked
/// register formatters read: R at bit 22, the mask or M1 at bits 16-19,
/// M at bit 8.
fn special_register_layout(insn: u32, mask_shift: u32) -> u32 {
    (((insn >> 20) & 0x1) << 22) | (((insn >> mask_shift) & 0xF) << 16) | (((insn >> 4) & 0x1) << 8)
}

fn move_to_special_register(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let layout = special_register_layout(insn, 8);
    ctx.set_mnemonic(&["msr"])?;
    if insn & (1 << 5) != 0 {
        ctx.set_operand(0, banked_register(layout))?;
    } else {
        status_register(ctx.operand(0), layout)?;
    }
    ctx.set_operand(1, reg(field(insn, 16)))
}

fn move_from_special_register(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&["mrs"])?;
    ctx.set_operand(0, reg(field(insn, 8)))?;
    if insn & (1 << 5) != 0 {
        ctx.set_operand(1, banked_register(special_register_layout(insn, 16)))
    } else {
        ctx.set_operand(1, if insn & (1 << 20) != 0 { "spsr" } else { "cpsr" })
    }
}

/// `cps{ie,id}.w` when any of imod or M is set, otherwise a hint.
fn change_state_and_hints(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    if (insn >> 8) & 0x7 != 0 {
        // Rebuild the ARM layout: imod at 18-19, A/I/F at 6-8, mode at 0-4.
        let mode = if insn & (1 << 8) != 0 { insn & 0x1F } else { 0 };
        let layout = (((insn >> 9) & 0x3) << 18) | (((insn >> 5) & 0x7) << 6) | mode;
        change_processor_state(ctx, layout)?;
        return ctx.mnemonic.push_str(".w");
    }

    let hint = insn & 0xFF;
    let mnemonic = match hint {
        0x00 => "nop.w",
        0x01 => "yield.w",
        0x02 => "wfe.w",
        0x03 => "wfi.w",
        0x04 => "sev.w",
        0xF0..=0xFF => {
            ctx.set_mnemonic(&["dbg"])?;
            return write!(ctx.operand(0), "#{}", hint & 0xF);
        }
        _ => "nop.w",
    };
    ctx.set_mnemonic(&[mnemonic])
}

fn miscellaneous_control(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let mnemonic = match (insn >> 4) & 0xF {
        0 => "leavex",
        1 => "enterx",
        2 => "clrex",
        4 => "dsb",
        5 => "dmb",
        6 => "isb",
        _ => return ctx.undefined(),
    };
    ctx.set_mnemonic(&[mnemonic])?;
    if matches!(mnemonic, "dsb" | "dmb" | "isb") {
        barrier(ctx.operand(0), insn)?;
    }
    Ok(())
}

fn branch_exchange_jazelle(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&["bxj"])?;
    ctx.set_operand(0, reg(field(insn, 16)))
}

/// `eret`, which is `subs pc, lr, #0`.
fn exception_return(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let imm8 = insn & 0xFF;
    if imm8 == 0 {
        return ctx.set_mnemonic(&["eret"]);
    }
    ctx.set_mnemonic(&["subs"])?;
    ctx.set_operand(0, reg(PC))?;
    ctx.set_operand(1, "lr")?;
    write!(ctx.operand(2), "#{imm8}")
}

/// `imm4:imm12` of `hvc` and `udf.w`.
#[inline]
fn imm16(insn: u32) -> u32 {
    (field(insn, 16) << 12) | (insn & 0xFFF)
}

fn hypervisor_call(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&["hvc"])?;
    write!(ctx.operand(0), "#{}", imm16(insn))
}

fn secure_monitor_call(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&["smc"])?;
    write!(ctx.operand(0), "#{}", field(insn, 16))
}

fn permanently_undefined(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&["udf.w"])?;
    write!(ctx.operand(0), "#{}", imm16(insn))
}

/// `S:I1:I2:imm10:imm11:0` with `I1 = NOT(J1 XOR S)` and
/// `I2 = NOT(J2 XOR S)`.
fn branch_offset(insn: u32) -> i64 {
    let s = (insn >> 26) & 0x1;
    let i1 = !((insn >> 13) ^ s) & 0x1;
    let i2 = !((insn >> 11) ^ s) & 0x1;
    let value = (s << 24) | (i1 << 23) | (i2 << 22) | (((insn >> 16) & 0x3FF) << 12) | ((insn & 0x7FF) << 1);
    i64::from(sign_extend(value, 25))
}

fn branch(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&["b.w"])?;
    let target = ctx.pc().wrapping_add_signed(branch_offset(insn));
    write_target(ctx, 0, target, true)
}

/// `b<cond>.w`: `S:J2:J1:imm6:imm11:0`.
fn conditional_branch(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let condition = (insn >> 22) & 0xF;
    let value = (((insn >> 26) & 0x1) << 20)
        | (((insn >> 11) & 0x1) << 19)
        | (((insn >> 13) & 0x1) << 18)
        | (((insn >> 16) & 0x3F) << 12)
        | ((insn & 0x7FF) << 1);
    ctx.set_mnemonic(&["b", CONDITION_CODES[condition as usize], ".w"])?;
    let target = ctx.pc().wrapping_add_signed(i64::from(sign_extend(value, 21)));
    write_target(ctx, 0, target, true)
}

/// `bl` and `blx`; `blx` switches to ARM state at a word-aligned target.
fn branch_with_link(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let offset = branch_offset(insn);
    let target = if insn & (1 << 12) != 0 {
        ctx.set_mnemonic(&["bl"])?;
        ctx.pc().wrapping_add_signed(offset)
    } else {
        ctx.set_mnemonic(&["blx"])?;
        aligned_pc(ctx).wrapping_add_signed(offset)
    };
    write_target(ctx, 0, target, true)
}

#[cfg(test)]
mod tests {
    use super::super::tests::{wide, wide_at};

    #[test]
    fn test_load_store_multiple() {
        assert_eq!(wide(0xE92D_4010), "push.w {r4, lr}");
        assert_eq!(wide(0xE8BD_8010), "pop.w {r4, pc}");
        assert_eq!(wide(0xE890_0006), "ldmia.w r0, {r1, r2}");
        assert_eq!(wide(0xE900_0006), "stmdb.w r0, {r1, r2}");
        assert_eq!(wide(0xE8AD_0006), "stmia.w sp!, {r1, r2}");
        assert_eq!(wide(0xE81D_C000), "rfedb sp");
        assert_eq!(wide(0xE9AD_C013), "srsia sp!, #svc");
    }

    #[test]
    fn test_exclusive_and_dual() {
        assert_eq!(wide(0xE851_0F01), "ldrex r0, [r1, #4]");
        assert_eq!(wide(0xE841_2000), "strex r0, r2, [r1]");
        assert_eq!(wide(0xE8D1_0F4F), "ldrexb r0, [r1]");
        assert_eq!(wide(0xE8C1_0F52), "strexh r2, r0, [r1]");
        assert_eq!(wide(0xE8D1_237F), "ldrexd r2, r3, [r1]");
        assert_eq!(wide(0xE9D1_2302), "ldrd r2, r3, [r1, #+8]");
        assert_eq!(wide(0xE941_2302), "strd r2, r3, [r1, #-8]");
        assert_eq!(wide(0xE9E1_2302), "strd r2, r3, [r1, #+8]!");
        assert_eq!(wide(0xE8F1_2302), "ldrd r2, r3, [r1], #+8");
    }

    #[test]
    fn test_table_branch() {
        assert_eq!(wide(0xE8D0_F001), "tbb [r0, r1]");
        assert_eq!(wide(0xE8D0_F011), "tbh [r0, r1, lsl #1]");
    }

    #[test]
    fn test_data_processing_shifted_register() {
        assert_eq!(wide(0xEA01_0002), "and.w r0, r1, r2");
        assert_eq!(wide(0xEB11_0082), "adds.w r0, r1, r2, lsl #2");
        assert_eq!(wide(0xEA4F_0001), "mov.w r0, r1");
        assert_eq!(wide(0xEA4F_0081), "lsl.w r0, r1, #2");
        assert_eq!(wide(0xEA4F_0031), "rrx.w r0, r1");
        assert_eq!(wide(0xEA6F_0001), "mvn.w r0, r1");
        assert_eq!(wide(0xEBB0_0F01), "cmp.w r0, r1");
        assert_eq!(wide(0xEA10_0F01), "tst.w r0, r1");
        assert_eq!(wide(0xEAC1_0002), "pkhbt r0, r1, r2");
        assert_eq!(wide(0xEAC1_4022), "pkhtb r0, r1, r2, asr #16");
    }

    #[test]
    fn test_modified_immediate() {
        assert_eq!(wide(0xF04F_0001), "mov.w r0, #1  ; 0x1");
        assert_eq!(wide(0xF101_30FF), "add.w r0, r1, #-1  ; 0xffffffff");
        assert_eq!(wide(0xF1B0_0F00), "cmp.w r0, #0  ; 0x0");
        assert_eq!(wide(0xF06F_0000), "mvn.w r0, #0  ; 0x0");
        assert_eq!(wide(0xF011_4F80), "tst.w r1, #1073741824  ; 0x40000000");
    }

    #[test]
    fn test_plain_immediate() {
        assert_eq!(wide(0xF201_1023), "addw r0, r1, #291  ; 0x123");
        assert_eq!(wide(0xF2A1_0004), "subw r0, r1, #4  ; 0x4");
        assert_eq!(wide(0xF241_2034), "movw r0, #4660  ; 0x1234");
        assert_eq!(wide(0xF2C1_2034), "movt r0, #4660  ; 0x1234");
        assert_eq!(wide_at(0x1000, 0xF20F_0004).to_string(), "adr.w r0, [0x00001008]");
        assert_eq!(wide(0xF301_0007), "ssat r0, #8, r1");
        assert_eq!(wide(0xF321_0007), "ssat16 r0, #8, r1");
        assert_eq!(wide(0xF381_0087), "usat r0, #7, r1, lsl #2");
        assert_eq!(wide(0xF341_0047), "sbfx r0, r1, #1, #8");
        assert_eq!(wide(0xF3C1_2007), "ubfx r0, r1, #8, #8");
        assert_eq!(wide(0xF3C1_0207), "ubfx r2, r1, #0, #8");
        assert_eq!(wide(0xF361_0047), "bfi r0, r1, #1, #7");
        assert_eq!(wide(0xF36F_0047), "bfc r0, #1, #7");
    }

    #[test]
    fn test_branches() {
        // bl to the next instruction
        let decoded = wide_at(0x1000, 0xF000_F800);
        assert_eq!(decoded.to_string(), "bl [0x00001004]");
        assert!(decoded.operand_address.unwrap().is_destination);
        // bl backwards by 4: S=1, J1=J2=1, imm10 and imm11 all ones minus one
        assert_eq!(wide_at(0x1000, 0xF7FF_FFFE).to_string(), "bl [0x00001000]");
        assert_eq!(wide_at(0x1002, 0xF000_E800).to_string(), "blx [0x00001004]");
        assert_eq!(wide_at(0x1000, 0xF000_B802).to_string(), "b.w [0x00001008]");
        assert_eq!(wide_at(0x1000, 0xF040_8002).to_string(), "bne.w [0x00001008]");
        assert_eq!(wide_at(0x1000, 0xF43F_AFFE).to_string(), "beq.w [0x00001000]");
    }

    #[test]
    fn test_miscellaneous_control() {
        assert_eq!(wide(0xF3BF_8F4F), "dsb");
        assert_eq!(wide(0xF3BF_8F5B), "dmb ish");
        assert_eq!(wide(0xF3BF_8F6F), "isb");
        assert_eq!(wide(0xF3BF_8F2F), "clrex");
        assert_eq!(wide(0xF3AF_8000), "nop.w");
        assert_eq!(wide(0xF3AF_8003), "wfi.w");
        assert_eq!(wide(0xF3AF_80F5), "dbg #5");
        assert_eq!(wide(0xF3AF_8640), "cpsid.w i");
        assert_eq!(wide(0xF3DE_8F00), "eret");
        assert_eq!(wide(0xF3DE_8F04), "subs pc, lr, #4");
        assert_eq!(wide(0xF3C0_8F00), "bxj r0");
    }

    #[test]
    fn test_special_registers() {
        assert_eq!(wide(0xF3EF_8000), "mrs r0, cpsr");
        assert_eq!(wide(0xF3FF_8000), "mrs r0, spsr");
        assert_eq!(wide(0xF380_8900), "msr cpsr_cf, r0");
        // Banked: SYSm 0b10001 is sp_irq
        assert_eq!(wide(0xF381_8130), "msr sp_irq, r1");
        assert_eq!(wide(0xF3E1_8030), "mrs r0, sp_irq");
    }

    #[test]
    fn test_service_calls() {
        assert_eq!(wide(0xF7E1_8234), "hvc #4660");
        assert_eq!(wide(0xF7F3_8000), "smc #3");
        assert_eq!(wide(0xF7F1_A234), "udf.w #4660");
    }

    #[test]
    fn test_load_store_single() {
        assert_eq!(wide(0xF8D1_0004), "ldr.w r0, [r1, #4]");
        assert_eq!(wide(0xF8C1_0004), "str.w r0, [r1, #4]");
        assert_eq!(wide(0xF851_0022), "ldr.w r0, [r1, r2, lsl #2]");
        assert_eq!(wide(0xF811_0002), "ldrb.w r0, [r1, r2]");
        assert_eq!(wide(0xF851_0F04), "ldr.w r0, [r1, #4]!");
        assert_eq!(wide(0xF851_0D04), "ldr.w r0, [r1, #-4]!");
        assert_eq!(wide(0xF851_0B04), "ldr.w r0, [r1], #4");
        assert_eq!(wide(0xF851_0904), "ldr.w r0, [r1], #-4");
        assert_eq!(wide(0xF851_0C04), "ldr.w r0, [r1, #-4]");
        assert_eq!(wide(0xF851_0E04), "ldrt r0, [r1, #4]");
        assert_eq!(wide(0xF991_0001), "ldrsb.w r0, [r1, #1]");
        assert_eq!(wide(0xF9B1_0002), "ldrsh.w r0, [r1, #2]");
        assert_eq!(wide_at(0x1000, 0xF8DF_0008).to_string(), "ldr.w r0, [0x0000100c]");
        assert_eq!(wide_at(0x1000, 0xF85F_0004).to_string(), "ldr.w r0, [0x00001000]");
        assert_eq!(wide(0xF891_F004), "pld [r1, #4]");
        assert_eq!(wide(0xF8B1_F004), "pldw [r1, #4]");
        assert_eq!(wide(0xF991_F004), "pli [r1, #4]");
    }

    #[test]
    fn test_data_processing_register() {
        assert_eq!(wide(0xFA01_F002), "lsl.w r0, r1, r2");
        assert_eq!(wide(0xFA31_F002), "lsrs.w r0, r1, r2");
        assert_eq!(wide(0xFA0F_F081), "sxth r0, r1");
        assert_eq!(wide(0xFA01_F092), "sxtah r0, r1, r2, ror #8");
        assert_eq!(wide(0xFA5F_F081), "uxtb r0, r1");
        assert_eq!(wide(0xFA91_F002), "sadd16 r0, r1, r2");
        assert_eq!(wide(0xFA91_F042), "uadd16 r0, r1, r2");
        assert_eq!(wide(0xFA81_F012), "qadd8 r0, r1, r2");
        assert_eq!(wide(0xFAE1_F022), "shsax r0, r1, r2");
        assert_eq!(wide(0xFA82_F081), "qadd r0, r1, r2");
        assert_eq!(wide(0xFA91_F081), "rev.w r0, r1");
        assert_eq!(wide(0xFA91_F0A1), "rbit r0, r1");
        assert_eq!(wide(0xFAA1_F082), "sel r0, r1, r2");
        assert_eq!(wide(0xFAB1_F081), "clz r0, r1");
        assert_eq!(wide(0xFA01_E002), "Undefined");
    }

    #[test]
    fn test_multiplies() {
        assert_eq!(wide(0xFB01_F002), "mul r0, r1, r2");
        assert_eq!(wide(0xFB01_3002), "mla r0, r1, r2, r3");
        assert_eq!(wide(0xFB01_3012), "mls r0, r1, r2, r3");
        assert_eq!(wide(0xFB11_F032), "smultt r0, r1, r2");
        assert_eq!(wide(0xFB11_3002), "smlabb r0, r1, r2, r3");
        assert_eq!(wide(0xFB21_F012), "smuadx r0, r1, r2");
        assert_eq!(wide(0xFB51_F002), "smmul r0, r1, r2");
        assert_eq!(wide(0xFB71_3002), "usada8 r0, r1, r2, r3");
        assert_eq!(wide(0xFB82_0103), "smull r0, r1, r2, r3");
        assert_eq!(wide(0xFBA2_0103), "umull r0, r1, r2, r3");
        assert_eq!(wide(0xFBE2_0163), "umaal r0, r1, r2, r3");
        assert_eq!(wide(0xFB91_F0F2), "sdiv r0, r1, r2");
        assert_eq!(wide(0xFBB1_F0F2), "udiv r0, r1, r2");
        assert_eq!(wide(0xFBC2_01A3), "smlaltb r0, r1, r2, r3");
    }

    #[test]
    fn test_shared_coprocessor_space() {
        // vadd.f32 s0, s1, s2
        assert_eq!(wide(0xEE30_0A81), "vadd.f32 s0, s1, s2");
        // vadd.i32 q0, q1, q2 (U at bit 28)
        assert_eq!(wide(0xEF22_0844), "vadd.i32 q0, q1, q2");
        // veor d0, d1, d2
        assert_eq!(wide(0xFF01_0112), "veor d0, d1, d2");
        // vld1.32 {d0, d1}, [r1]
        assert_eq!(wide(0xF921_0A8F), "vld1.32 {d0, d1}, [r1]");
        // mcr p15, 0, r0, c7, c5, 0 and the `2` form
        assert_eq!(wide(0xEE07_0F15), "mcr p15, 0, r0, c7, c5, 0");
        assert_eq!(wide(0xFE07_0F15), "mcr2 p15, 0, r0, c7, c5, 0");
    }

    #[test]
    fn test_vector_list_past_the_bank_is_unpredictable() {
        assert_eq!(wide(0xECD0_EB40), "Unpredictable");
        assert_eq!(wide(0xECBD_8B04), "vpop {d8, d9}");
    }
}
