//! 16-bit Thumb encodings.
//!
//! The halfword sits in the low 16 bits of the decoded word. Tables compare
//! the opcode field in place using shifted entries.

use std::fmt::{self, Write};

use triarch_core::DecodeEntry;

use crate::arm::format::register_list;
use crate::arm::imm::sign_extend;
use crate::arm::names::{reg, CONDITION_CODES};
use crate::arm::{route, ArmContext};

type Entry = DecodeEntry<ArmContext>;

const SP: u32 = 13;

/// Keyed on bits 10-15.
pub(super) static NARROW: &[Entry] = &[
    Entry::shifted(0x30, 0x00, 10, shift_add_subtract_move_compare),
    Entry::shifted(0x3F, 0x10, 10, data_processing),
    Entry::shifted(0x3F, 0x11, 10, special_data_and_branch_exchange),
    Entry::shifted(0x3E, 0x12, 10, load_literal),
    Entry::shifted(0x3C, 0x14, 10, load_store_single),
    Entry::shifted(0x38, 0x18, 10, load_store_single),
    Entry::shifted(0x38, 0x20, 10, load_store_single),
    Entry::shifted(0x3C, 0x28, 10, address_generation),
    Entry::shifted(0x3C, 0x2C, 10, miscellaneous),
    Entry::shifted(0x3C, 0x30, 10, load_store_multiple),
    Entry::shifted(0x3C, 0x34, 10, conditional_branch),
    Entry::shifted(0x3E, 0x38, 10, branch),
];

/// Keyed on bits 9-13.
static SHIFT_ADD_SUBTRACT_MOVE_COMPARE: &[Entry] = &[
    Entry::shifted(0x18, 0x00, 9, shift_immediate),
    Entry::shifted(0x1C, 0x08, 9, shift_immediate),
    Entry::shifted(0x1E, 0x0C, 9, add_subtract_register),
    Entry::shifted(0x1E, 0x0E, 9, add_subtract_immediate),
    Entry::shifted(0x10, 0x10, 9, move_compare_immediate),
];

/// Keyed on bits 12-15.
static LOAD_STORE_SINGLE: &[Entry] = &[
    Entry::shifted(0xF, 0x5, 12, load_store_register),
    Entry::shifted(0xF, 0x6, 12, load_store_immediate),
    Entry::shifted(0xF, 0x7, 12, load_store_immediate),
    Entry::shifted(0xF, 0x8, 12, load_store_immediate),
    Entry::shifted(0xF, 0x9, 12, load_store_stack),
];

/// Keyed on bits 8-11, or bits 4-11 for the processor state forms.
static MISCELLANEOUS: &[Entry] = &[
    Entry::shifted(0xF, 0x0, 8, adjust_stack),
    Entry::shifted(0x5, 0x1, 8, compare_and_branch),
    Entry::shifted(0xF, 0x2, 8, extend),
    Entry::shifted(0x6, 0x4, 8, push_pop),
    Entry::shifted(0xFF, 0x65, 4, set_endianness),
    Entry::shifted(0xFE, 0x66, 4, change_processor_state),
    Entry::shifted(0xF, 0xA, 8, reverse),
    Entry::shifted(0xF, 0xE, 8, breakpoint),
    Entry::shifted(0xF, 0xF, 8, if_then_and_hints),
];

const DATA_PROCESSING_MNEMONICS: [&str; 16] = [
    "ands", "eors", "lsls", "lsrs", "asrs", "adcs", "sbcs", "rors", "tst", "rsbs", "cmp", "cmns",
    "orrs", "muls", "bics", "mvns",
];

const LOAD_STORE_REGISTER_MNEMONICS: [&str; 8] =
    ["str", "strh", "strb", "ldrsb", "ldr", "ldrh", "ldrb", "ldrsh"];

#[inline]
fn low_register(insn: u32, shift: u32) -> &'static str {
    reg((insn >> shift) & 0x7)
}

/// The word-aligned PC used by literal and `adr` addressing.
#[inline]
fn aligned_pc(ctx: &ArmContext) -> u64 {
    ctx.pc() & !0x3
}

fn write_target(ctx: &mut ArmContext, slot: usize, target: u64, is_destination: bool) -> fmt::Result {
    write!(ctx.operand(slot), "[0x{target:08x}]")?;
    ctx.set_address(target, is_destination);
    Ok(())
}

fn shift_add_subtract_move_compare(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    route(ctx, insn, SHIFT_ADD_SUBTRACT_MOVE_COMPARE)
}

fn load_store_single(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    route(ctx, insn, LOAD_STORE_SINGLE)
}

fn miscellaneous(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    route(ctx, insn, MISCELLANEOUS)
}

/// `lsls`/`lsrs`/`asrs Rd, Rm, #imm5`, and `movs Rd, Rm` for a zero `lsl`.
fn shift_immediate(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let op = (insn >> 11) & 0x3;
    let imm5 = (insn >> 6) & 0x1F;
    ctx.set_operand(0, low_register(insn, 0))?;
    ctx.set_operand(1, low_register(insn, 3))?;
    if op == 0 && imm5 == 0 {
        return ctx.set_mnemonic(&["movs"]);
    }

    let (mnemonic, amount) = match op {
        0 => ("lsls", imm5),
        1 => ("lsrs", if imm5 == 0 { 32 } else { imm5 }),
        _ => ("asrs", if imm5 == 0 { 32 } else { imm5 }),
    };
    ctx.set_mnemonic(&[mnemonic])?;
    write!(ctx.operand(2), "#{amount}")
}

fn add_subtract_register(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&[if insn & (1 << 9) != 0 { "subs" } else { "adds" }])?;
    ctx.set_operand(0, low_register(insn, 0))?;
    ctx.set_operand(1, low_register(insn, 3))?;
    ctx.set_operand(2, low_register(insn, 6))
}

fn add_subtract_immediate(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&[if insn & (1 << 9) != 0 { "subs" } else { "adds" }])?;
    ctx.set_operand(0, low_register(insn, 0))?;
    ctx.set_operand(1, low_register(insn, 3))?;
    write!(ctx.operand(2), "#{}", (insn >> 6) & 0x7)
}

/// `movs`, `cmp`, `adds` and `subs` with an 8-bit immediate.
fn move_compare_immediate(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let mnemonic = ["movs", "cmp", "adds", "subs"][((insn >> 11) & 0x3) as usize];
    ctx.set_mnemonic(&[mnemonic])?;
    ctx.set_operand(0, low_register(insn, 8))?;
    write!(ctx.operand(1), "#{}", insn & 0xFF)
}

/// Two-register data processing on the low registers.
fn data_processing(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let op = (insn >> 6) & 0xF;
    let rd = low_register(insn, 0);
    ctx.set_mnemonic(&[DATA_PROCESSING_MNEMONICS[op as usize]])?;
    ctx.set_operand(0, rd)?;
    ctx.set_operand(1, low_register(insn, 3))?;
    match op {
        // rsbs Rd, Rn, #0
        0x9 => ctx.set_operand(2, "#0"),
        // muls Rdm, Rn, Rdm
        0xD => ctx.set_operand(2, rd),
        _ => Ok(()),
    }
}

/// High-register `add`, `cmp` and `mov`, plus `bx` and `blx`.
fn special_data_and_branch_exchange(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let rd = (insn & 0x7) | ((insn >> 4) & 0x8);
    let rm = (insn >> 3) & 0xF;
    let mnemonic = match (insn >> 8) & 0x3 {
        0 => "add",
        1 => "cmp",
        2 => "mov",
        _ => {
            ctx.set_mnemonic(&[if insn & (1 << 7) != 0 { "blx" } else { "bx" }])?;
            return ctx.set_operand(0, reg(rm));
        }
    };
    ctx.set_mnemonic(&[mnemonic])?;
    ctx.set_operand(0, reg(rd))?;
    ctx.set_operand(1, reg(rm))
}

/// `ldr Rt, [pc, #imm8*4]`, shown as the resolved address.
fn load_literal(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&["ldr"])?;
    ctx.set_operand(0, low_register(insn, 8))?;
    let target = aligned_pc(ctx).wrapping_add(u64::from((insn & 0xFF) << 2));
    write_target(ctx, 1, target, false)
}

fn load_store_register(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let op = (insn >> 9) & 0x7;
    ctx.set_mnemonic(&[LOAD_STORE_REGISTER_MNEMONICS[op as usize]])?;
    ctx.set_operand(0, low_register(insn, 0))?;
    write!(ctx.operand(1), "[{}, {}]", low_register(insn, 3), low_register(insn, 6))
}

/// Word, byte and halfword accesses with a scaled 5-bit offset.
fn load_store_immediate(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let load = insn & (1 << 11) != 0;
    let (mnemonic, scale) = match (insn >> 12, load) {
        (0x6, false) => ("str", 4),
        (0x6, true) => ("ldr", 4),
        (0x7, false) => ("strb", 1),
        (0x7, true) => ("ldrb", 1),
        (_, false) => ("strh", 2),
        (_, true) => ("ldrh", 2),
    };
    ctx.set_mnemonic(&[mnemonic])?;
    ctx.set_operand(0, low_register(insn, 0))?;

    let rn = low_register(insn, 3);
    let offset = ((insn >> 6) & 0x1F) * scale;
    if offset == 0 {
        write!(ctx.operand(1), "[{rn}]")
    } else {
        write!(ctx.operand(1), "[{rn}, #{offset}]")
    }
}

/// `ldr`/`str Rt, [sp, #imm8*4]`
fn load_store_stack(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&[if insn & (1 << 11) != 0 { "ldr" } else { "str" }])?;
    ctx.set_operand(0, low_register(insn, 8))?;
    let offset = (insn & 0xFF) << 2;
    if offset == 0 {
        ctx.set_operand(1, "[sp]")
    } else {
        write!(ctx.operand(1), "[sp, #{offset}]")
    }
}

/// `adr Rd, label` or `add Rd, sp, #imm8*4`.
fn address_generation(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let offset = (insn & 0xFF) << 2;
    ctx.set_operand(0, low_register(insn, 8))?;
    if insn & (1 << 11) != 0 {
        ctx.set_mnemonic(&["add"])?;
        ctx.set_operand(1, reg(SP))?;
        return write!(ctx.operand(2), "#{offset}");
    }

    ctx.set_mnemonic(&["adr"])?;
    let target = aligned_pc(ctx).wrapping_add(u64::from(offset));
    write_target(ctx, 1, target, false)
}

/// `add sp, #imm7*4` and `sub sp, #imm7*4`.
fn adjust_stack(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&[if insn & (1 << 7) != 0 { "sub" } else { "add" }])?;
    ctx.set_operand(0, reg(SP))?;
    write!(ctx.operand(1), "#{}", (insn & 0x7F) << 2)
}

/// `cbz`/`cbnz Rn, label`; the branch only runs forwards.
fn compare_and_branch(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&[if insn & (1 << 11) != 0 { "cbnz" } else { "cbz" }])?;
    ctx.set_operand(0, low_register(insn, 0))?;
    let offset = (((insn >> 9) & 0x1) << 6) | (((insn >> 3) & 0x1F) << 1);
    let target = ctx.pc().wrapping_add(u64::from(offset));
    write_target(ctx, 1, target, true)
}

fn extend(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let mnemonic = ["sxth", "sxtb", "uxth", "uxtb"][((insn >> 6) & 0x3) as usize];
    ctx.set_mnemonic(&[mnemonic])?;
    ctx.set_operand(0, low_register(insn, 0))?;
    ctx.set_operand(1, low_register(insn, 3))
}

/// `push {..., lr}` and `pop {..., pc}`.
fn push_pop(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let pop = insn & (1 << 11) != 0;
    let mut list = insn & 0xFF;
    if insn & (1 << 8) != 0 {
        list |= if pop { 1 << 15 } else { 1 << 14 };
    }
    ctx.set_mnemonic(&[if pop { "pop" } else { "push" }])?;
    register_list(ctx.operand(0), list)
}

fn set_endianness(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&["setend"])?;
    ctx.set_operand(0, if insn & (1 << 3) != 0 { "be" } else { "le" })
}

fn change_processor_state(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&[if insn & (1 << 4) != 0 { "cpsid" } else { "cpsie" }])?;
    let op = ctx.operand(0);
    for (bit, flag) in [(1 << 2, 'a'), (1 << 1, 'i'), (1 << 0, 'f')] {
        if insn & bit != 0 {
            op.push(flag)?;
        }
    }
    Ok(())
}

fn reverse(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let mnemonic = match (insn >> 6) & 0x3 {
        0 => "rev",
        1 => "rev16",
        3 => "revsh",
        _ => return ctx.undefined(),
    };
    ctx.set_mnemonic(&[mnemonic])?;
    ctx.set_operand(0, low_register(insn, 0))?;
    ctx.set_operand(1, low_register(insn, 3))
}

fn breakpoint(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&["bkpt"])?;
    write!(ctx.operand(0), "#{}", insn & 0xFF)
}

/// `it{x{y{z}}} cond` when the mask is non-zero, otherwise a hint.
fn if_then_and_hints(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let mask = insn & 0xF;
    let first_condition = (insn >> 4) & 0xF;
    if mask == 0 {
        let mnemonic = match first_condition {
            0 => "nop",
            1 => "yield",
            2 => "wfe",
            3 => "wfi",
            4 => "sev",
            _ => "nop",
        };
        return ctx.set_mnemonic(&[mnemonic]);
    }

    if first_condition == 0xF {
        return ctx.unpredictable();
    }

    // The lowest set bit terminates the mask; each bit above it is
    // `then` when it matches the low bit of the first condition.
    ctx.set_mnemonic(&["it"])?;
    for position in (mask.trailing_zeros() + 1..4).rev() {
        let then = (mask >> position) & 0x1 == first_condition & 0x1;
        ctx.mnemonic.push(if then { 't' } else { 'e' })?;
    }
    ctx.set_operand(0, condition_name(first_condition))
}

/// Condition name with `al` spelled out.
fn condition_name(condition: u32) -> &'static str {
    match condition {
        0xE => "al",
        _ => CONDITION_CODES[(condition & 0xF) as usize],
    }
}

/// `stm Rn!, {...}` and `ldm Rn{!}, {...}`; a load that includes its
/// base register does not write it back.
fn load_store_multiple(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let load = insn & (1 << 11) != 0;
    let rn = (insn >> 8) & 0x7;
    let list = insn & 0xFF;
    let writeback = !load || list & (1 << rn) == 0;
    ctx.set_mnemonic(&[if load { "ldm" } else { "stm" }])?;
    write!(ctx.operand(0), "{}{}", reg(rn), if writeback { "!" } else { "" })?;
    register_list(ctx.operand(1), list)
}

/// `b<cond>`, with `udf` and `svc` in the `al` and `nv` slots.
fn conditional_branch(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    let condition = (insn >> 8) & 0xF;
    let imm8 = insn & 0xFF;
    match condition {
        0xE => {
            ctx.set_mnemonic(&["udf"])?;
            write!(ctx.operand(0), "#{imm8}")
        }
        0xF => {
            ctx.set_mnemonic(&["svc"])?;
            write!(ctx.operand(0), "#{imm8}")
        }
        _ => {
            ctx.set_mnemonic(&["b", CONDITION_CODES[condition as usize]])?;
            let offset = sign_extend(imm8 << 1, 9);
            let target = ctx.pc().wrapping_add_signed(i64::from(offset));
            write_target(ctx, 0, target, true)
        }
    }
}

fn branch(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    ctx.set_mnemonic(&["b"])?;
    let offset = sign_extend((insn & 0x7FF) << 1, 12);
    let target = ctx.pc().wrapping_add_signed(i64::from(offset));
    write_target(ctx, 0, target, true)
}

#[cfg(test)]
mod tests {
    use super::super::tests::{narrow, narrow_at};

    #[test]
    fn test_shift_and_move() {
        assert_eq!(narrow(0x0008), "movs r0, r1");
        assert_eq!(narrow(0x0088), "lsls r0, r1, #2");
        assert_eq!(narrow(0x0808), "lsrs r0, r1, #32");
        assert_eq!(narrow(0x1108), "asrs r0, r1, #4");
    }

    #[test]
    fn test_add_subtract() {
        assert_eq!(narrow(0x1888), "adds r0, r1, r2");
        assert_eq!(narrow(0x1A88), "subs r0, r1, r2");
        assert_eq!(narrow(0x1C48), "adds r0, r1, #1");
        assert_eq!(narrow(0x1EC8), "subs r0, r1, #3");
        assert_eq!(narrow(0x2005), "movs r0, #5");
        assert_eq!(narrow(0x2A10), "cmp r2, #16");
        assert_eq!(narrow(0x3301), "adds r3, #1");
        assert_eq!(narrow(0x3C01), "subs r4, #1");
    }

    #[test]
    fn test_data_processing() {
        assert_eq!(narrow(0x4008), "ands r0, r1");
        assert_eq!(narrow(0x4248), "rsbs r0, r1, #0");
        assert_eq!(narrow(0x4348), "muls r0, r1, r0");
        assert_eq!(narrow(0x43C8), "mvns r0, r1");
        assert_eq!(narrow(0x4288), "cmp r0, r1");
    }

    #[test]
    fn test_special_data_and_branch_exchange() {
        let decoded = super::super::tests::decode(&[0x70, 0x47], 0x1000);
        assert_eq!(decoded.to_string(), "bx lr");
        assert_eq!(decoded.size, 2);
        assert_eq!(narrow(0x4788), "blx r1");
        assert_eq!(narrow(0x46C0), "mov r8, r8");
        assert_eq!(narrow(0x4468), "add r0, sp");
        assert_eq!(narrow(0x45A0), "cmp r8, r4");
    }

    #[test]
    fn test_literal_and_address_generation() {
        // ldr r0, [pc, #4] at 0x1002: Align(0x1006, 4) + 4
        let decoded = narrow_at(0x1002, 0x4801);
        assert_eq!(decoded.to_string(), "ldr r0, [0x00001008]");
        let address = decoded.operand_address.unwrap();
        assert_eq!(address.address, 0x1008);
        assert!(!address.is_destination);

        assert_eq!(narrow_at(0x1000, 0xA102).to_string(), "adr r1, [0x0000100c]");
        assert_eq!(narrow(0xAA04), "add r2, sp, #16");
    }

    #[test]
    fn test_load_store_single() {
        assert_eq!(narrow(0x5088), "str r0, [r1, r2]");
        assert_eq!(narrow(0x5E88), "ldrsh r0, [r1, r2]");
        assert_eq!(narrow(0x6848), "ldr r0, [r1, #4]");
        assert_eq!(narrow(0x6008), "str r0, [r1]");
        assert_eq!(narrow(0x7848), "ldrb r0, [r1, #1]");
        assert_eq!(narrow(0x8848), "ldrh r0, [r1, #2]");
        assert_eq!(narrow(0x9A01), "ldr r2, [sp, #4]");
        assert_eq!(narrow(0x9300), "str r3, [sp]");
    }

    #[test]
    fn test_miscellaneous() {
        assert_eq!(narrow(0xB082), "sub sp, #8");
        assert_eq!(narrow(0xB002), "add sp, #8");
        assert_eq!(narrow(0xB208), "sxth r0, r1");
        assert_eq!(narrow(0xB2C8), "uxtb r0, r1");
        assert_eq!(narrow(0xB510), "push {r4, lr}");
        assert_eq!(narrow(0xBD10), "pop {r4, pc}");
        assert_eq!(narrow(0xB658), "setend be");
        assert_eq!(narrow(0xB672), "cpsid i");
        assert_eq!(narrow(0xB662), "cpsie i");
        assert_eq!(narrow(0xBA08), "rev r0, r1");
        assert_eq!(narrow(0xBAC8), "revsh r0, r1");
        assert_eq!(narrow(0xBE01), "bkpt #1");
    }

    #[test]
    fn test_compare_and_branch() {
        // cbz r0, +4 from 0x1000
        let decoded = narrow_at(0x1000, 0xB110);
        assert_eq!(decoded.to_string(), "cbz r0, [0x00001008]");
        assert!(decoded.operand_address.unwrap().is_destination);
        assert_eq!(narrow_at(0x1000, 0xB910).to_string(), "cbnz r0, [0x00001008]");
    }

    #[test]
    fn test_if_then_and_hints() {
        assert_eq!(narrow(0xBF08), "it eq");
        assert_eq!(narrow(0xBF0C), "ite eq");
        assert_eq!(narrow(0xBF14), "ite ne");
        assert_eq!(narrow(0xBF04), "itt eq");
        assert_eq!(narrow(0xBF06), "itte eq");
        assert_eq!(narrow(0xBFE8), "it al");
        assert_eq!(narrow(0xBF00), "nop");
        assert_eq!(narrow(0xBF30), "wfi");
        assert_eq!(narrow(0xBF40), "sev");
    }

    #[test]
    fn test_load_store_multiple() {
        assert_eq!(narrow(0xC106), "stm r1!, {r1, r2}");
        assert_eq!(narrow(0xC906), "ldm r1, {r1, r2}");
        assert_eq!(narrow(0xC806), "ldm r0!, {r1, r2}");
    }

    #[test]
    fn test_branches() {
        // beq to 0x1000 + 4 + 8
        let decoded = narrow_at(0x1000, 0xD004);
        assert_eq!(decoded.to_string(), "beq [0x0000100c]");
        assert!(decoded.operand_address.unwrap().is_destination);
        // b . (offset -4)
        assert_eq!(narrow_at(0x1000, 0xE7FE).to_string(), "b [0x00001000]");
        assert_eq!(narrow(0xDF05), "svc #5");
        assert_eq!(narrow(0xDE01), "udf #1");
    }
}
