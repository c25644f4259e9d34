//! Core integer instructions: data processing, loads and stores, multiplies,
//! branches, and the unconditional system instructions.

use std::fmt::{self, Write};

use triarch_core::TextBuf;

use super::format::{
    banked_register, barrier, decode_shift, immediate, immediate_shift, load_store_type, mode,
    register_list, status_register, SHIFT_ASR, SHIFT_LSL, SHIFT_LSR,
};
use super::imm::{rotated_immediate, service_immediate, sign_extend};
use super::names::{reg, DATA_PROCESSING_MNEMONICS, SYNCHRONIZATION_MNEMONICS};
use super::ArmContext;

const PC: u32 = 15;
const SP: u32 = 13;

/// Returns `+` or `-` for the U (add) bit.
#[inline]
pub(crate) fn offset_sign(insn: u32) -> &'static str {
    if insn & (1 << 23) != 0 {
        "+"
    } else {
        "-"
    }
}

/// Applies a signed offset to the PC value the instruction observes, which
/// runs `pipeline` bytes ahead of `ip`.
#[inline]
pub(crate) fn pc_relative(ip: u64, pipeline: u64, offset: i64) -> u64 {
    ip.wrapping_add(pipeline).wrapping_add_signed(offset)
}

// ---------------------------------------------------------------------------
// Unconditional space
// ---------------------------------------------------------------------------

/// `srs{type} sp{!}, #mode`
pub(crate) fn store_return_state(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&["srs", load_store_type(insn)])?;
    let op = ctx.operand(0);
    op.push_str(if insn & (1 << 21) != 0 { "sp!, " } else { "sp, " })?;
    mode(op, insn)
}

/// `rfe{type} Rn{!}`
pub(crate) fn return_from_exception(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&["rfe", load_store_type(insn)])?;
    let rn = (insn >> 16) & 0xF;
    let writeback = if insn & (1 << 21) != 0 { "!" } else { "" };
    write!(ctx.operand(0), "{}{}", reg(rn), writeback)
}

/// `b`, `bl` and `blx` (immediate).
pub(crate) fn branch(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let mut offset = (insn & 0x00FF_FFFF) << 2;
    let link = insn & (1 << 24) != 0;
    if insn >> 28 == 0xF {
        // blx switches to Thumb; H supplies bit 1 of the target.
        ctx.set_mnemonic(&["blx"])?;
        if link {
            offset |= 2;
        }
    } else if link {
        ctx.set_mnemonic(&["bl"])?;
    } else {
        ctx.set_mnemonic(&["b"])?;
    }

    let target = pc_relative(ctx.ip, 8, i64::from(sign_extend(offset, 26)));
    write!(ctx.operand(0), "[0x{target:08x}]")?;
    ctx.set_address(target, true);
    Ok(())
}

pub(crate) fn undefined(ctx: &mut ArmContext, _insn: u32) -> fmt::Result {
    ctx.undefined()
}

pub(crate) fn unpredictable(ctx: &mut ArmContext, _insn: u32) -> fmt::Result {
    ctx.unpredictable()
}

pub(crate) fn nop(ctx: &mut ArmContext, _insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&["NOP"])
}

/// `cpsie`/`cpsid` with the affected interrupt flags and an optional mode.
pub(crate) fn change_processor_state(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let mnemonic = match (insn >> 18) & 0x3 {
        0x2 => "cpsie",
        0x3 => "cpsid",
        _ => "cps",
    };
    ctx.set_mnemonic(&[mnemonic])?;
    let op = ctx.operand(0);
    for (bit, flag) in [(1 << 8, 'a'), (1 << 7, 'i'), (1 << 6, 'f')] {
        if insn & bit != 0 {
            op.push(flag)?;
        }
    }

    if insn & 0x1F != 0 {
        if !op.is_empty() {
            op.push_str(", ")?;
        }
        mode(op, insn)?;
    }

    Ok(())
}

pub(crate) fn set_endianness(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&["setend"])?;
    ctx.set_operand(0, if insn & (1 << 9) != 0 { "be" } else { "le" })
}

/// `pld`, `pldw` and `pli` in their immediate, literal and register forms.
pub(crate) fn preload(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    if insn & (1 << 24) != 0 {
        let write = if insn & (1 << 22) == 0 { "w" } else { "" };
        ctx.set_mnemonic(&["pld", write])?;
    } else {
        ctx.set_mnemonic(&["pli"])?;
    }

    let sign = offset_sign(insn);
    let rn = (insn >> 16) & 0xF;
    if insn & (1 << 25) != 0 {
        let rm = insn & 0xF;
        let amount = (insn >> 7) & 0x1F;
        let op = ctx.operand(0);
        write!(op, "[{}, {}", reg(rn), sign)?;
        immediate_shift(op, rm, insn, amount)?;
        return op.push(']');
    }

    let offset = insn & 0xFFF;
    if rn == PC {
        let signed = if sign == "+" { i64::from(offset) } else { -i64::from(offset) };
        let target = pc_relative(ctx.ip, 8, signed);
        write!(ctx.operand(0), "[0x{target:08x}]")?;
        ctx.set_address(target, true);
        return Ok(());
    }

    write!(ctx.operand(0), "[{}, #{}{}]", reg(rn), sign, offset)
}

pub(crate) fn clear_exclusive(ctx: &mut ArmContext, _insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&["clrex"])
}

pub(crate) fn data_synchronization_barrier(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&["dsb"])?;
    barrier(ctx.operand(0), insn)
}

pub(crate) fn data_memory_barrier(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&["dmb"])?;
    barrier(ctx.operand(0), insn)
}

pub(crate) fn instruction_synchronization_barrier(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&["isb"])?;
    barrier(ctx.operand(0), insn)
}

// ---------------------------------------------------------------------------
// Loads and stores
// ---------------------------------------------------------------------------

/// `ldr`/`str` with the byte and unprivileged variants.
pub(crate) fn load_store(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let load = insn & (1 << 20) != 0;
    let writeback = insn & (1 << 21) != 0;
    let byte = insn & (1 << 22) != 0;
    let pre_index = insn & (1 << 24) != 0;
    let width = match (byte, !pre_index && writeback) {
        (true, true) => "bt",
        (true, false) => "b",
        (false, true) => "t",
        (false, false) => "",
    };
    ctx.set_mnemonic(&[if load { "ldr" } else { "str" }, width])?;

    let rt = (insn >> 12) & 0xF;
    let rn = (insn >> 16) & 0xF;
    let sign = offset_sign(insn);
    let bang = if writeback { "!" } else { "" };
    ctx.set_operand(0, reg(rt))?;

    if insn & (1 << 25) == 0 {
        let offset = insn & 0xFFF;
        if rn == PC && pre_index && !writeback {
            let signed = if sign == "+" { i64::from(offset) } else { -i64::from(offset) };
            let target = pc_relative(ctx.ip, 8, signed);
            write!(ctx.operand(1), "[0x{target:08x}]")?;
            ctx.set_address(target, false);
            return Ok(());
        }

        let op = ctx.operand(1);
        return match (pre_index, offset) {
            (false, 0) => write!(op, "[{}]", reg(rn)),
            (false, _) => write!(op, "[{}], #{}{}", reg(rn), sign, offset),
            (true, 0) => write!(op, "[{}]{}", reg(rn), bang),
            (true, _) => write!(op, "[{}, #{}{}]{}", reg(rn), sign, offset, bang),
        };
    }

    let rm = insn & 0xF;
    let amount = (insn >> 7) & 0x1F;
    let op = ctx.operand(1);
    if pre_index {
        write!(op, "[{}, {}", reg(rn), sign)?;
        immediate_shift(op, rm, insn, amount)?;
        write!(op, "]{bang}")
    } else {
        write!(op, "[{}], {}", reg(rn), sign)?;
        immediate_shift(op, rm, insn, amount)
    }
}

/// Halfword, signed byte and doubleword loads and stores.
pub(crate) fn extra_load_store(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let (mnemonic, pair) = match insn & 0x0010_0060 {
        0x0000_0020 => ("strh", false),
        0x0000_0040 => ("ldrd", true),
        0x0000_0060 => ("strd", true),
        0x0010_0020 => ("ldrh", false),
        0x0010_0040 => ("ldrsb", false),
        0x0010_0060 => ("ldrsh", false),
        _ => return ctx.undefined(),
    };
    ctx.set_mnemonic(&[mnemonic])?;

    let rt = (insn >> 12) & 0xF;
    let rn = (insn >> 16) & 0xF;
    let sign = offset_sign(insn);
    let pre_index = insn & (1 << 24) != 0;
    let writeback = insn & (1 << 21) != 0;
    let bang = if writeback { "!" } else { "" };

    ctx.set_operand(0, reg(rt))?;
    let mut slot = 1;
    if pair {
        ctx.set_operand(1, reg(rt + 1))?;
        slot = 2;
    }

    let op = ctx.operand(slot);
    if insn & (1 << 22) == 0 {
        let rm = insn & 0xF;
        return if pre_index {
            write!(op, "[{}, {}{}]{}", reg(rn), sign, reg(rm), bang)
        } else {
            write!(op, "[{}], {}{}", reg(rn), sign, reg(rm))
        };
    }

    let offset = ((insn >> 4) & 0xF0) | (insn & 0xF);
    match (pre_index, offset) {
        (false, _) => write!(op, "[{}], #{}{}", reg(rn), sign, offset),
        (true, 0) if !writeback => write!(op, "[{}]", reg(rn)),
        (true, _) => write!(op, "[{}, #{}{}]{}", reg(rn), sign, offset, bang),
    }
}

/// `ldm`/`stm` in all four addressing modes, printed as `pop`/`push`
/// when they move several registers through a written-back `sp`.
pub(crate) fn load_store_multiple(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let load = insn & (1 << 20) != 0;
    let rn = (insn >> 16) & 0xF;
    let list = insn & 0xFFFF;
    let op = insn & 0x03F0_0000;

    let stack = rn == SP && list.count_ones() > 1 && (op == 0x00B0_0000 || op == 0x0120_0000);
    let slot = if stack {
        ctx.set_mnemonic(&[if load { "pop" } else { "push" }])?;
        0
    } else {
        ctx.set_mnemonic(&[if load { "ldm" } else { "stm" }, load_store_type(insn)])?;
        let bang = if insn & (1 << 21) != 0 { "!" } else { "" };
        write!(ctx.operand(0), "{}{}", reg(rn), bang)?;
        1
    };

    let out = ctx.operand(slot);
    register_list(out, list)?;
    if insn & (1 << 22) != 0 {
        out.push('^')?;
    }

    Ok(())
}

/// `swp{b}` and the exclusive loads and stores.
pub(crate) fn synchronization(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let op = (insn >> 20) & 0xF;
    let rn = (insn >> 16) & 0xF;
    let rt = (insn >> 12) & 0xF;
    let rt2 = insn & 0xF;

    if op & 0x8 == 0 {
        ctx.set_mnemonic(&[if insn & (1 << 22) != 0 { "swpb" } else { "swp" }])?;
        ctx.set_operand(0, reg(rt))?;
        ctx.set_operand(1, reg(rt2))?;
        return write!(ctx.operand(2), "[{}]", reg(rn));
    }

    ctx.set_mnemonic(&[SYNCHRONIZATION_MNEMONICS[(op & 0x7) as usize]])?;
    ctx.set_operand(0, reg(rt))?;
    if op & 0x1 != 0 {
        write!(ctx.operand(1), "[{}]", reg(rn))
    } else {
        ctx.set_operand(1, reg(rt2))?;
        write!(ctx.operand(2), "[{}]", reg(rn))
    }
}

// ---------------------------------------------------------------------------
// Data processing
// ---------------------------------------------------------------------------

/// The sixteen data-processing operations with immediate, immediate-shifted
/// register and register-shifted register operands.
pub(crate) fn data_processing(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let opcode = (insn >> 21) & 0xF;
    let compare = (8..=11).contains(&opcode);
    let is_move = opcode == 13;
    let set_flags = if insn & (1 << 20) != 0 && !compare { "s" } else { "" };
    let mut base = DATA_PROCESSING_MNEMONICS[opcode as usize];
    let mut shifter = TextBuf::new();

    if insn & (1 << 25) != 0 {
        let value = rotated_immediate(insn & 0xFF, (insn >> 8) & 0xF);
        immediate(&mut shifter, value)?;
    } else {
        let rm = insn & 0xF;
        if insn & (1 << 4) != 0 {
            let rs = (insn >> 8) & 0xF;
            let kind = match insn & 0x60 {
                SHIFT_LSL => "lsl",
                SHIFT_LSR => "lsr",
                SHIFT_ASR => "asr",
                _ => "ror",
            };
            if is_move {
                base = kind;
                write!(shifter, "{}, {}", reg(rm), reg(rs))?;
            } else {
                write!(shifter, "{}, {} {}", reg(rm), kind, reg(rs))?;
            }
        } else {
            let amount = (insn >> 7) & 0x1F;
            if is_move {
                // mov with a shift prints as the shift itself: `lsl r0, r1, #2`.
                let (kind, amount) = decode_shift(insn, amount);
                if let Some(kind) = kind {
                    base = kind;
                }
                if amount == 0 {
                    shifter.push_str(reg(rm))?;
                } else {
                    write!(shifter, "{}, #{}", reg(rm), amount)?;
                }
            } else {
                immediate_shift(&mut shifter, rm, insn, amount)?;
            }
        }
    }

    ctx.set_mnemonic(&[base, set_flags])?;
    let rd = (insn >> 12) & 0xF;
    let rn = (insn >> 16) & 0xF;
    if compare {
        ctx.set_operand(0, reg(rn))?;
        ctx.set_operand(1, &shifter)
    } else if is_move || opcode == 15 {
        ctx.set_operand(0, reg(rd))?;
        ctx.set_operand(1, &shifter)
    } else {
        ctx.set_operand(0, reg(rd))?;
        ctx.set_operand(1, reg(rn))?;
        ctx.set_operand(2, &shifter)
    }
}

/// `movw`/`movt` with a 16-bit immediate.
pub(crate) fn load_immediate(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let mnemonic = match insn & 0x00F0_0000 {
        0x0000_0000 => "movw",
        0x0040_0000 => "movt",
        _ => return Ok(()),
    };
    ctx.set_mnemonic(&[mnemonic])?;
    let value = ((insn >> 4) & 0xF000) | (insn & 0xFFF);
    ctx.set_operand(0, reg((insn >> 12) & 0xF))?;
    immediate(ctx.operand(1), value)
}

/// Status register moves, branch-and-exchange, `clz`, saturating
/// arithmetic, `eret` and the service calls.
pub(crate) fn miscellaneous(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let op2 = (insn >> 4) & 0x7;
    let op = (insn >> 21) & 0x3;
    let rm = insn & 0xF;
    let rd = (insn >> 12) & 0xF;
    let banked = insn & (1 << 9) != 0;

    match op2 {
        0 if op & 0x1 != 0 => {
            ctx.set_mnemonic(&["msr"])?;
            if banked {
                ctx.set_operand(0, banked_register(insn))?;
            } else {
                status_register(ctx.operand(0), insn)?;
            }
            ctx.set_operand(1, reg(rm))
        }
        0 => {
            ctx.set_mnemonic(&["mrs"])?;
            ctx.set_operand(0, reg(rd))?;
            if banked {
                ctx.set_operand(1, banked_register(insn))
            } else {
                ctx.set_operand(1, if insn & (1 << 22) != 0 { "spsr" } else { "cpsr" })
            }
        }
        1 if op == 1 => {
            ctx.set_mnemonic(&["bx"])?;
            ctx.set_operand(0, reg(rm))
        }
        1 if op == 3 => {
            ctx.set_mnemonic(&["clz"])?;
            ctx.set_operand(0, reg(rd))?;
            ctx.set_operand(1, reg(rm))
        }
        2 => {
            ctx.set_mnemonic(&["bxj"])?;
            ctx.set_operand(0, reg(rm))
        }
        3 => {
            ctx.set_mnemonic(&["blx"])?;
            ctx.set_operand(0, reg(rm))
        }
        5 => {
            ctx.set_mnemonic(&[["qadd", "qsub", "qdadd", "qdsub"][op as usize]])?;
            ctx.set_operand(0, reg(rd))?;
            ctx.set_operand(1, reg(rm))?;
            ctx.set_operand(2, reg((insn >> 16) & 0xF))
        }
        6 => ctx.set_mnemonic(&["eret"]),
        7 => {
            let value = sign_extend(service_immediate(insn), 16);
            let (mnemonic, value) = match op {
                1 => ("bkpt", value),
                2 => ("hvc", value),
                3 => ("smc", value & 0xF),
                _ => return ctx.undefined(),
            };
            ctx.set_mnemonic(&[mnemonic])?;
            write!(ctx.operand(0), "#{value}")
        }
        _ => ctx.undefined(),
    }
}

/// `msr` (immediate) and the architectural hints.
pub(crate) fn msr_immediate_and_hints(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    if (insn >> 16) & 0xF == 0 && insn & (1 << 22) == 0 {
        let op2 = insn & 0xFF;
        let mnemonic = match op2 {
            0x00 => "nop",
            0x01 => "yield",
            0x02 => "wfe",
            0x03 => "wfi",
            0x04 => "sev",
            _ if op2 & 0xF0 == 0xF0 => {
                ctx.set_mnemonic(&["dbg"])?;
                return write!(ctx.operand(0), "#{}", op2 & 0xF);
            }
            _ => return ctx.set_mnemonic(&["nop"]),
        };
        return ctx.set_mnemonic(&[mnemonic]);
    }

    ctx.set_mnemonic(&["msr"])?;
    status_register(ctx.operand(0), insn)?;
    let value = rotated_immediate(insn & 0xFF, (insn >> 8) & 0xF);
    immediate(ctx.operand(1), value)
}

/// `svc #imm24`
pub(crate) fn supervisor_call(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&["svc"])?;
    immediate(ctx.operand(0), insn & 0x00FF_FFFF)
}

// ---------------------------------------------------------------------------
// Multiplies
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq)]
enum MultiplyForm {
    /// `Rd, Rn, Rm`
    Three,
    /// `Rd, Rn, Rm, Ra`
    Accumulate,
    /// `RdLo, RdHi, Rn, Rm`
    Long,
}

/// The 32- and 64-bit multiplies, halfword and dual multiplies, and the
/// integer divides.
pub(crate) fn multiply(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let halves = match insn & 0x60 {
        0x00 => "bb",
        0x20 => "tb",
        0x40 => "bt",
        _ => "tt",
    };
    let top = if insn & 0x40 != 0 { "t" } else { "b" };
    let exchange = if insn & 0x20 != 0 { "x" } else { "" };
    let round = if insn & 0x20 != 0 { "r" } else { "" };
    let ra = (insn >> 12) & 0xF;
    let no_accumulate = ra == PC;

    use MultiplyForm::*;
    let (parts, form) = match insn & 0x0FF0_0000 {
        0x0000_0000 => (["mul", ""], Three),
        0x0010_0000 => (["muls", ""], Three),
        0x0020_0000 => (["mla", ""], Accumulate),
        0x0030_0000 => (["mlas", ""], Accumulate),
        0x0040_0000 => (["umaal", ""], Long),
        0x0060_0000 => (["mls", ""], Accumulate),
        0x0080_0000 => (["umull", ""], Long),
        0x0090_0000 => (["umulls", ""], Long),
        0x00A0_0000 => (["umlal", ""], Long),
        0x00B0_0000 => (["umlals", ""], Long),
        0x00C0_0000 => (["smull", ""], Long),
        0x00D0_0000 => (["smulls", ""], Long),
        0x00E0_0000 => (["smlal", ""], Long),
        0x00F0_0000 => (["smlals", ""], Long),
        0x0100_0000 => (["smla", halves], Accumulate),
        0x0120_0000 if insn & 0x20 != 0 => (["smulw", top], Three),
        0x0120_0000 => (["smlaw", top], Accumulate),
        0x0140_0000 => (["smlal", halves], Long),
        0x0160_0000 => (["smul", halves], Three),
        0x0700_0000 => match (insn & 0xD0, no_accumulate) {
            (0x10, true) => (["smuad", exchange], Three),
            (0x10, false) => (["smlad", exchange], Accumulate),
            (0x50, true) => (["smusd", exchange], Three),
            (0x50, false) => (["smlsd", exchange], Accumulate),
            _ => return ctx.undefined(),
        },
        0x0710_0000 => (["sdiv", ""], Three),
        0x0730_0000 => (["udiv", ""], Three),
        0x0740_0000 => match insn & 0xD0 {
            0x10 => (["smlald", exchange], Long),
            0x50 => (["smlsld", exchange], Long),
            _ => return ctx.undefined(),
        },
        0x0750_0000 => match (insn & 0xC0, no_accumulate) {
            (0x00, true) => (["smmul", round], Three),
            (0x00, false) => (["smmla", round], Accumulate),
            (0xC0, _) => (["smmls", round], Accumulate),
            _ => return ctx.undefined(),
        },
        _ => return ctx.undefined(),
    };
    ctx.set_mnemonic(&parts)?;

    // The multiply encodings keep Rd in bits 16-19 and Rn in bits 0-3.
    let rd = (insn >> 16) & 0xF;
    let rn = insn & 0xF;
    let rm = (insn >> 8) & 0xF;
    match form {
        Long => {
            ctx.set_operand(0, reg(ra))?;
            ctx.set_operand(1, reg(rd))?;
            ctx.set_operand(2, reg(rn))?;
            ctx.set_operand(3, reg(rm))
        }
        Three | Accumulate => {
            ctx.set_operand(0, reg(rd))?;
            ctx.set_operand(1, reg(rn))?;
            ctx.set_operand(2, reg(rm))?;
            if form == Accumulate {
                ctx.set_operand(3, reg(ra))?;
            }
            Ok(())
        }
    }
}
