//! Media instructions: parallel arithmetic, packing, saturation, bit
//! fields and sum of absolute differences.

use std::fmt::{self, Write};

use super::format::immediate;
use super::imm::service_immediate;
use super::names::{reg, EXTEND_ROTATE_MNEMONICS, PARALLEL_ARITHMETIC_MNEMONICS, REVERSE_MNEMONICS};
use super::{route, tables, ArmContext};

pub(crate) fn packing(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    route(ctx, insn, tables::PACKING)
}

/// Signed, saturating and halving SIMD-within-a-register add/subtract.
pub(crate) fn parallel_arithmetic(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let unsigned = usize::from(insn & (1 << 22) != 0);
    let op1 = (insn >> 20) & 0x3;
    let op2 = (insn >> 5) & 0x7;
    let mnemonic = op1
        .checked_sub(1)
        .map(|group| (group * 8 + op2) as usize)
        .and_then(|index| PARALLEL_ARITHMETIC_MNEMONICS[unsigned].get(index).copied().flatten());
    let Some(mnemonic) = mnemonic else {
        return ctx.undefined();
    };

    ctx.set_mnemonic(&[mnemonic])?;
    ctx.set_operand(0, reg((insn >> 12) & 0xF))?;
    ctx.set_operand(1, reg((insn >> 16) & 0xF))?;
    ctx.set_operand(2, reg(insn & 0xF))
}

/// `sxtb`, `uxtah` and the other extends, with an optional byte rotation.
pub(crate) fn extend_with_rotation(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let rn = (insn >> 16) & 0xF;
    let accumulate = rn != 15;
    let op1 = ((insn >> 20) & 0x7) as usize;
    let Some(mnemonic) = EXTEND_ROTATE_MNEMONICS[usize::from(!accumulate)][op1] else {
        return ctx.undefined();
    };

    ctx.set_mnemonic(&[mnemonic])?;
    ctx.set_operand(0, reg((insn >> 12) & 0xF))?;
    let mut slot = 1;
    if accumulate {
        ctx.set_operand(slot, reg(rn))?;
        slot += 1;
    }

    ctx.set_operand(slot, reg(insn & 0xF))?;
    let rotation = ((insn >> 10) & 0x3) << 3;
    if rotation != 0 {
        write!(ctx.operand(slot + 1), "ror #{rotation}")?;
    }

    Ok(())
}

pub(crate) fn select_bytes(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&["sel"])?;
    ctx.set_operand(0, reg((insn >> 12) & 0xF))?;
    ctx.set_operand(1, reg((insn >> 16) & 0xF))?;
    ctx.set_operand(2, reg(insn & 0xF))
}

/// `pkhbt`/`pkhtb`
pub(crate) fn pack_halfword(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let mut amount = (insn >> 7) & 0x1F;
    let (mnemonic, kind) = if insn & (1 << 6) != 0 {
        if amount == 0 {
            amount = 32;
        }
        ("pkhtb", "asr")
    } else {
        ("pkhbt", "lsl")
    };

    ctx.set_mnemonic(&[mnemonic])?;
    ctx.set_operand(0, reg((insn >> 12) & 0xF))?;
    ctx.set_operand(1, reg((insn >> 16) & 0xF))?;
    ctx.set_operand(2, reg(insn & 0xF))?;
    if amount != 0 {
        write!(ctx.operand(3), "{kind} #{amount}")?;
    }

    Ok(())
}

/// `rev`, `rev16`, `revsh` and `rbit`.
pub(crate) fn reverse(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let index = ((insn >> 22) & 0x1) | (((insn >> 7) & 0x1) << 1);
    ctx.set_mnemonic(&[REVERSE_MNEMONICS[index as usize]])?;
    ctx.set_operand(0, reg((insn >> 12) & 0xF))?;
    ctx.set_operand(1, reg(insn & 0xF))
}

/// `ssat`, `usat` and their halfword forms.
pub(crate) fn saturate(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let mut saturation = (insn >> 16) & 0x1F;
    let prefix = if insn & (1 << 22) == 0 {
        saturation += 1;
        "s"
    } else {
        "u"
    };

    let mut shift = None;
    let halfword = insn & (1 << 5) != 0;
    if !halfword {
        let amount = (insn >> 7) & 0x1F;
        shift = match (insn & (1 << 6) != 0, amount) {
            (true, 0) => Some(("asr", 32)),
            (true, amount) => Some(("asr", amount)),
            (false, 0) => None,
            (false, amount) => Some(("lsl", amount)),
        };
    }

    ctx.set_mnemonic(&[prefix, "sat", if halfword { "16" } else { "" }])?;
    ctx.set_operand(0, reg((insn >> 12) & 0xF))?;
    write!(ctx.operand(1), "#{saturation}")?;
    ctx.set_operand(2, reg(insn & 0xF))?;
    if let Some((kind, amount)) = shift {
        write!(ctx.operand(3), "{kind} #{amount}")?;
    }

    Ok(())
}

/// `usad8`/`usada8`
pub(crate) fn sum_of_absolute_differences(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let rd = (insn >> 16) & 0xF;
    let ra = (insn >> 12) & 0xF;
    let rm = (insn >> 8) & 0xF;
    let rn = insn & 0xF;
    ctx.set_mnemonic(&[if ra == 15 { "usad8" } else { "usada8" }])?;
    ctx.set_operand(0, reg(rd))?;
    ctx.set_operand(1, reg(rn))?;
    ctx.set_operand(2, reg(rm))?;
    if ra != 15 {
        ctx.set_operand(3, reg(ra))?;
    }

    Ok(())
}

/// `sbfx`, `ubfx`, `bfi` and `bfc`.
pub(crate) fn bit_field(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let rd = (insn >> 12) & 0xF;
    let rn = insn & 0xF;
    let lsb = (insn >> 7) & 0x1F;
    let high = (insn >> 16) & 0x1F;

    let width = if insn & (1 << 21) != 0 {
        ctx.set_mnemonic(&[if insn & (1 << 22) != 0 { "ubfx" } else { "sbfx" }])?;
        high + 1
    } else {
        // The field is given by its most significant bit.
        if high < lsb {
            return ctx.unpredictable();
        }
        ctx.set_mnemonic(&[if rn == 15 { "bfc" } else { "bfi" }])?;
        high - lsb + 1
    };

    ctx.set_operand(0, reg(rd))?;
    let slot = if ctx.mnemonic == "bfc" {
        1
    } else {
        ctx.set_operand(1, reg(rn))?;
        2
    };
    write!(ctx.operand(slot), "#{lsb}, #{width}")
}

pub(crate) fn permanently_undefined(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&["udf"])?;
    immediate(ctx.operand(0), service_immediate(insn))
}

#[cfg(test)]
mod tests {
    use super::super::tests::text;

    #[test]
    fn test_parallel_arithmetic() {
        assert_eq!(text(0xE611_0F12), "sadd16 r0, r1, r2");
        assert_eq!(text(0xE661_0FF2), "uqsub8 r0, r1, r2");
        assert_eq!(text(0xE631_0F92), "shadd8 r0, r1, r2");
        // op1 of zero is not allocated.
        assert_eq!(text(0xE601_0F12), "Undefined");
    }

    #[test]
    fn test_extend_with_rotation() {
        assert_eq!(text(0xE6AF_0071), "sxtb r0, r1");
        assert_eq!(text(0xE6F1_0472), "uxtah r0, r1, r2, ror #8");
    }

    #[test]
    fn test_packing() {
        assert_eq!(text(0xE681_0FB2), "sel r0, r1, r2");
        assert_eq!(text(0xE681_0412), "pkhbt r0, r1, r2, lsl #8");
        assert_eq!(text(0xE681_0052), "pkhtb r0, r1, r2, asr #32");
        assert_eq!(text(0xE6BF_0F31), "rev r0, r1");
        assert_eq!(text(0xE6FF_0F31), "rbit r0, r1");
        assert_eq!(text(0xE6BF_0FB1), "rev16 r0, r1");
    }

    #[test]
    fn test_saturate() {
        assert_eq!(text(0xE6A7_0011), "ssat r0, #8, r1");
        assert_eq!(text(0xE6E7_0011), "usat r0, #7, r1");
        assert_eq!(text(0xE6A7_0151), "ssat r0, #8, r1, asr #2");
    }

    #[test]
    fn test_sum_of_absolute_differences() {
        assert_eq!(text(0xE780_F211), "usad8 r0, r1, r2");
        assert_eq!(text(0xE780_3211), "usada8 r0, r1, r2, r3");
    }

    #[test]
    fn test_bit_field() {
        assert_eq!(text(0xE7E7_0251), "ubfx r0, r1, #4, #8");
        assert_eq!(text(0xE7A7_0251), "sbfx r0, r1, #4, #8");
        assert_eq!(text(0xE7CB_021F), "bfc r0, #4, #8");
        assert_eq!(text(0xE7CB_0211), "bfi r0, r1, #4, #8");
    }

    #[test]
    fn test_permanently_undefined() {
        assert_eq!(text(0xE7F0_00F0), "udf #0  ; 0x0");
    }
}
