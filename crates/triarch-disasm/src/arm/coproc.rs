//! Generic coprocessor instructions and the VFP/Advanced SIMD register
//! transfers and loads/stores that live in the coprocessor space.

use std::fmt::{self, Write};

use super::format::{load_store_type, vector_list, Lanes, Vector, VectorKind};
use super::general::offset_sign;
use super::names::{reg, SPECIAL_REGISTER_NAMES};
use super::ArmContext;

const PC: u32 = 15;
const SP: u32 = 13;
const LOAD: u32 = 1 << 20;
const TO_REGISTER: u32 = 1 << 20;

/// The `2` suffix of the unconditional coprocessor forms (`mcr2`, `ldc2`).
fn unconditional_suffix(insn: u32) -> &'static str {
    if insn >> 28 == 0xF {
        "2"
    } else {
        ""
    }
}

/// `cdp`, `mcr` and `mrc`.
pub(crate) fn coprocessor_move(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let coprocessor = (insn >> 8) & 0xF;
    let rd = (insn >> 12) & 0xF;
    let crn = (insn >> 16) & 0xF;
    let crm = insn & 0xF;
    let opc2 = (insn >> 5) & 0x7;

    let (mnemonic, opc1) = if insn & (1 << 4) == 0 {
        write!(ctx.operand(1), "c{rd}")?;
        ("cdp", (insn >> 20) & 0xF)
    } else {
        ctx.set_operand(1, reg(rd))?;
        (if insn & (1 << 20) != 0 { "mrc" } else { "mcr" }, (insn >> 21) & 0x7)
    };

    ctx.set_mnemonic(&[mnemonic, unconditional_suffix(insn)])?;
    write!(ctx.operand(0), "p{coprocessor}, {opc1}")?;
    write!(ctx.operand(2), "c{crn}, c{crm}, {opc2}")
}

/// `mcrr` and `mrrc`.
pub(crate) fn coprocessor_move_two(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let coprocessor = (insn >> 8) & 0xF;
    let opc1 = (insn >> 4) & 0xF;
    let rt = (insn >> 12) & 0xF;
    let rt2 = (insn >> 16) & 0xF;
    let crm = insn & 0xF;

    let mnemonic = if insn & (1 << 20) != 0 { "mrrc" } else { "mcrr" };
    ctx.set_mnemonic(&[mnemonic, unconditional_suffix(insn)])?;
    write!(ctx.operand(0), "p{coprocessor}, {opc1}")?;
    write!(ctx.operand(1), "{}, {}", reg(rt), reg(rt2))?;
    write!(ctx.operand(2), "c{crm}")
}

/// `ldc` and `stc`, including the long and unindexed forms.
pub(crate) fn coprocessor_load_store(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let long = if insn & (1 << 22) != 0 { "l" } else { "" };
    let base = if insn & LOAD != 0 { "ldc" } else { "stc" };
    ctx.set_mnemonic(&[base, unconditional_suffix(insn), long])?;

    let coprocessor = (insn >> 8) & 0xF;
    let crd = (insn >> 12) & 0xF;
    let rn = reg((insn >> 16) & 0xF);
    let imm8 = insn & 0xFF;
    let sign = offset_sign(insn);
    let writeback = insn & (1 << 21) != 0;
    write!(ctx.operand(0), "p{coprocessor}")?;
    write!(ctx.operand(1), "c{crd}")?;

    let op = ctx.operand(2);
    if insn & (1 << 24) != 0 {
        let bang = if writeback { "!" } else { "" };
        write!(op, "[{rn}, #{sign}{}]{bang}", imm8 * 4)
    } else if writeback {
        write!(op, "[{rn}], #{sign}{}", imm8 * 4)
    } else {
        // Unindexed: the byte is an option for the coprocessor.
        write!(op, "[{rn}], {{{imm8}}}")
    }
}

/// `vmov` between two core registers and a doubleword or a pair of
/// singles.
pub(crate) fn simd_64bit_transfer(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let rt = reg((insn >> 12) & 0xF);
    let rt2 = reg((insn >> 16) & 0xF);
    let (registers, vectors) = if insn & TO_REGISTER != 0 { (0, 1) } else { (1, 0) };

    ctx.set_mnemonic(&["vmov"])?;
    write!(ctx.operand(registers), "{rt}, {rt2}")?;
    if insn & (1 << 8) != 0 {
        write!(ctx.operand(vectors), "{}", Vector::m(VectorKind::Double, insn))
    } else {
        let first = Vector::m(VectorKind::Single, insn);
        write!(ctx.operand(vectors), "{}, {}", first, first.next())
    }
}

/// `vmov` between a core register and a single-precision register or a
/// doubleword scalar.
pub(crate) fn simd_small_move(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let to_register = insn & TO_REGISTER != 0;
    let unsigned = insn & (1 << 23) != 0;
    let (registers, vectors) = if to_register { (0, 1) } else { (1, 0) };
    ctx.set_mnemonic(&["vmov"])?;
    ctx.set_operand(registers, reg((insn >> 12) & 0xF))?;

    if insn & (1 << 8) == 0 {
        return write!(ctx.operand(vectors), "{}", Vector::n(VectorKind::Single, insn));
    }

    // opc1:opc2 selects the element size and the index within the doubleword.
    let encoding = ((insn >> 19) & 0xC) | ((insn >> 5) & 0x3);
    let (size, index) = if encoding & 0x8 == 0x8 {
        ("8", encoding & 0x7)
    } else if encoding & 0x9 == 0x1 {
        ("16", (encoding & 0x6) >> 1)
    } else if encoding & 0xB == 0 {
        if to_register && unsigned {
            return ctx.undefined();
        }
        ("32", (encoding & 0x4) >> 2)
    } else {
        return ctx.undefined();
    };

    let kind = match (to_register, unsigned) {
        (true, true) => ".u",
        (true, false) if size == "32" => ".",
        (true, false) => ".s",
        (false, _) => ".",
    };
    ctx.set_suffix(&[kind, size])?;
    write!(ctx.operand(vectors), "{}[{index}]", Vector::n(VectorKind::Double, insn))
}

/// `vmrs` and `vmsr`.
pub(crate) fn simd_special_move(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let rt = (insn >> 12) & 0xF;
    let special = (insn >> 16) & 0xF;
    let special_name = SPECIAL_REGISTER_NAMES[special as usize];
    if insn & TO_REGISTER != 0 {
        ctx.set_mnemonic(&["vmrs"])?;
        let target = if rt == PC && special == 1 { "APSR_nzcv" } else { reg(rt) };
        ctx.set_operand(0, target)?;
        ctx.set_operand(1, special_name)
    } else {
        ctx.set_mnemonic(&["vmsr"])?;
        ctx.set_operand(0, special_name)?;
        ctx.set_operand(1, reg(rt))
    }
}

/// `vdup` from a core register.
pub(crate) fn simd_duplicate(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let size = match ((insn >> 21) & 0x2) | ((insn >> 5) & 0x1) {
        0b10 => "8",
        0b01 => "16",
        0b00 => "32",
        _ => return ctx.undefined(),
    };
    let kind = VectorKind::doubleword_or_quad(insn & (1 << 21) != 0);
    ctx.set_mnemonic(&["vdup"])?;
    ctx.set_suffix(&[".", size])?;
    write!(ctx.operand(0), "{}", Vector::n(kind, insn))?;
    ctx.set_operand(1, reg((insn >> 12) & 0xF))
}

/// `vldr` and `vstr`.
pub(crate) fn simd_load_store_register(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let kind = VectorKind::single_or_double(insn & (1 << 8) != 0);
    ctx.set_mnemonic(&[if insn & LOAD != 0 { "vldr" } else { "vstr" }])?;
    write!(ctx.operand(0), "{}", Vector::d(kind, insn))?;

    let rn = (insn >> 16) & 0xF;
    let offset = (insn & 0xFF) << 2;
    let sign = offset_sign(insn);
    if rn == PC {
        let signed = if sign == "+" { i64::from(offset) } else { -i64::from(offset) };
        // The literal base is the word-aligned PC.
        let target = (ctx.pc() & !3).wrapping_add_signed(signed);
        write!(ctx.operand(1), "[0x{target:08x}]")?;
        ctx.set_address(target, false);
        return Ok(());
    }

    if offset == 0 {
        write!(ctx.operand(1), "[{}]", reg(rn))
    } else {
        write!(ctx.operand(1), "[{}, #{sign}{offset}]", reg(rn))
    }
}

/// `vldm`, `vstm`, `vpush` and `vpop`.
pub(crate) fn simd_load_store_multiple(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let rn = (insn >> 16) & 0xF;
    let load = insn & LOAD != 0;
    let operation = insn & 0x01B0_0000;
    let push_pop = rn == SP && (operation == 0x0120_0000 || operation == 0x00B0_0000);

    let double = insn & (1 << 8) != 0;
    let mut count = insn & 0xFF;
    if double {
        count >>= 1;
    }
    let first = Vector::d(VectorKind::single_or_double(double), insn);
    let prefix = if double { "d" } else { "s" };
    if count == 0 || (double && count > 16) || first.number + count > 32 {
        return ctx.unpredictable();
    }

    let list = if push_pop {
        ctx.set_mnemonic(&[if load { "vpop" } else { "vpush" }])?;
        0
    } else {
        ctx.set_mnemonic(&[if load { "vld" } else { "vst" }, "m", load_store_type(insn)])?;
        let bang = if insn & (1 << 21) != 0 { "!" } else { "" };
        write!(ctx.operand(0), "{}{bang}", reg(rn))?;
        1
    };
    vector_list(ctx.operand(list), first.number, count, 1, prefix, Lanes::None)
}

#[cfg(test)]
mod tests {
    use super::super::tests::{decode_at, text};

    #[test]
    fn test_coprocessor_register_transfer() {
        // mrc p15, 0, r0, c1, c0, 0
        assert_eq!(text(0xEE11_0F10), "mrc p15, 0, r0, c1, c0, 0");
        // mcr p15, 0, r1, c7, c5, 4
        assert_eq!(text(0xEE07_1F95), "mcr p15, 0, r1, c7, c5, 4");
        // cdp p3, 1, c2, c3, c4, 5
        assert_eq!(text(0xEE13_23A4), "cdp p3, 1, c2, c3, c4, 5");
        // mcr2 p14, 1, r2, c3, c4, 2
        assert_eq!(text(0xFE23_2E54), "mcr2 p14, 1, r2, c3, c4, 2");
    }

    #[test]
    fn test_coprocessor_two_register_transfer() {
        assert_eq!(text(0xEC41_0F32), "mcrr p15, 3, r0, r1, c2");
        assert_eq!(text(0xEC51_0F32), "mrrc p15, 3, r0, r1, c2");
    }

    #[test]
    fn test_coprocessor_load_store() {
        assert_eq!(text(0xED91_5E02), "ldc p14, c5, [r1, #+8]");
        assert_eq!(text(0xEDA1_5E02), "stc p14, c5, [r1, #+8]!");
        assert_eq!(text(0xECF1_5E02), "ldcl p14, c5, [r1], #+8");
        assert_eq!(text(0xEC91_5E02), "ldc p14, c5, [r1], {2}");
    }

    #[test]
    fn test_vmov_core_pair() {
        // vmov d0, r2, r3
        assert_eq!(text(0xEC43_2B10), "vmov d0, r2, r3");
        // vmov r2, r3, d0
        assert_eq!(text(0xEC53_2B10), "vmov r2, r3, d0");
        // vmov s2, s3, r2, r3
        assert_eq!(text(0xEC43_2A11), "vmov s2, s3, r2, r3");
    }

    #[test]
    fn test_vmov_core_single() {
        // vmov s1, r0
        assert_eq!(text(0xEE00_0A90), "vmov s1, r0");
        // vmov r0, s1
        assert_eq!(text(0xEE10_0A90), "vmov r0, s1");
    }

    #[test]
    fn test_vmov_scalar() {
        // vmov.32 d1[1], r0
        assert_eq!(text(0xEE21_0B10), "vmov.32 d1[1], r0");
        // vmov.u8 r0, d1[3]
        assert_eq!(text(0xEED1_0B70), "vmov.u8 r0, d1[3]");
        // vmov.s16 r0, d1[1]
        assert_eq!(text(0xEE11_0B70), "vmov.s16 r0, d1[1]");
    }

    #[test]
    fn test_special_register_moves() {
        assert_eq!(text(0xEEF1_FA10), "vmrs APSR_nzcv, fpscr");
        assert_eq!(text(0xEEF1_0A10), "vmrs r0, fpscr");
        assert_eq!(text(0xEEE1_0A10), "vmsr fpscr, r0");
        assert_eq!(text(0xEEF8_0A10), "vmrs r0, fpexc");
    }

    #[test]
    fn test_vdup_core_register() {
        assert_eq!(text(0xEE80_1B10), "vdup.32 d0, r1");
        assert_eq!(text(0xEEC0_1B10), "vdup.8 d0, r1");
        assert_eq!(text(0xEEA2_1B30), "vdup.16 q1, r1");
    }

    #[test]
    fn test_vldr_vstr() {
        assert_eq!(text(0xED91_0B02), "vldr d0, [r1, #+8]");
        assert_eq!(text(0xED01_0A01), "vstr s0, [r1, #-4]");
        assert_eq!(text(0xEDD1_0A00), "vldr s1, [r1]");
    }

    #[test]
    fn test_vldr_literal_resolves_address() {
        let decoded = decode_at(0x1002, 0xED9F_0B02);
        assert_eq!(decoded.to_string(), "vldr d0, [0x00001010]");
        let address = decoded.operand_address.unwrap();
        assert_eq!(address.address, 0x1010);
        assert!(!address.is_destination);
    }

    #[test]
    fn test_vpush_vpop_and_block_transfers() {
        assert_eq!(text(0xED2D_8B04), "vpush {d8, d9}");
        assert_eq!(text(0xECBD_8B04), "vpop {d8, d9}");
        assert_eq!(text(0xECA1_0A03), "vstmia r1!, {s0, s1, s2}");
        assert_eq!(text(0xEC91_0B04), "vldmia r1, {d0, d1}");
    }

    #[test]
    fn test_register_list_past_the_bank_is_unpredictable() {
        // d30 onwards for sixteen registers.
        assert_eq!(text(0xECD0_EB20), "Unpredictable");
        assert_eq!(text(0xECD0_EB40), "Unpredictable");
        // Empty and oversized lists.
        assert_eq!(text(0xEC91_0B00), "Unpredictable");
        assert_eq!(text(0xEC91_0B22), "Unpredictable");
        assert_eq!(text(0xECFD_FA02), "Unpredictable");
        assert_eq!(text(0xEC91_0B20), "vldmia r1, {d0, d1, d2, d3, d4, d5, d6, d7, d8, d9, d10, d11, d12, d13, d14, d15}");
        assert_eq!(text(0xECFD_FA01), "vpop {s31}");
    }
}
