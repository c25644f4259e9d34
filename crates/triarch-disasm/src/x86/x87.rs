//! x87 FPU instruction decoding.
//!
//! The escape opcodes D8-DF select one of eight maps, and the ModR/M byte
//! selects within it:
//! - ModR/M below C0 is a memory operand and ModR/M.reg picks the mnemonic
//! - ModR/M C0 and up names a stack register, and each escape lays its
//!   register forms out differently

use super::operand::{Definition, Operand};

const MEMORY: &[Operand] = &[Operand::M];
const STI: &[Operand] = &[Operand::StI];
const ST0_STI: &[Operand] = &[Operand::St0, Operand::StI];
const STI_ST0: &[Operand] = &[Operand::StI, Operand::St0];
const STATUS: &[Operand] = &[Operand::Fixed("ax")];

/// Memory forms by escape and ModR/M.reg.
const MEMORY_FORMS: [[Option<&str>; 8]; 8] = [
    [
        Some("fadd"),
        Some("fmul"),
        Some("fcom"),
        Some("fcomp"),
        Some("fsub"),
        Some("fsubr"),
        Some("fdiv"),
        Some("fdivr"),
    ],
    [
        Some("fld"),
        None,
        Some("fst"),
        Some("fstp"),
        Some("fldenv"),
        Some("fldcw"),
        Some("fstenv"),
        Some("fstcw"),
    ],
    [
        Some("fiadd"),
        Some("fimul"),
        Some("ficom"),
        Some("ficomp"),
        Some("fisub"),
        Some("fisubr"),
        Some("fidiv"),
        Some("fidivr"),
    ],
    [
        Some("fild"),
        Some("fisttp"),
        Some("fist"),
        Some("fistp"),
        None,
        Some("fld"),
        None,
        Some("fstp"),
    ],
    [
        Some("fadd"),
        Some("fmul"),
        Some("fcom"),
        Some("fcomp"),
        Some("fsub"),
        Some("fsubr"),
        Some("fdiv"),
        Some("fdivr"),
    ],
    [
        Some("fld"),
        Some("fisttp"),
        Some("fst"),
        Some("fstp"),
        Some("frstor"),
        None,
        Some("fsave"),
        Some("fstsw"),
    ],
    [
        Some("fiadd"),
        Some("fimul"),
        Some("ficom"),
        Some("ficomp"),
        Some("fisub"),
        Some("fisubr"),
        Some("fidiv"),
        Some("fidivr"),
    ],
    [
        Some("fild"),
        Some("fisttp"),
        Some("fist"),
        Some("fistp"),
        Some("fbld"),
        Some("fild"),
        Some("fbstp"),
        Some("fistp"),
    ],
];

/// D9 E0-FF, operand-free.
const D9_CONSTANTS: [Option<&str>; 32] = [
    Some("fchs"),
    Some("fabs"),
    None,
    None,
    Some("ftst"),
    Some("fxam"),
    None,
    None,
    Some("fld1"),
    Some("fldl2t"),
    Some("fldl2e"),
    Some("fldpi"),
    Some("fldlg2"),
    Some("fldln2"),
    Some("fldz"),
    None,
    Some("f2xm1"),
    Some("fyl2x"),
    Some("fptan"),
    Some("fpatan"),
    Some("fxtract"),
    Some("fprem1"),
    Some("fdecstp"),
    Some("fincstp"),
    Some("fprem"),
    Some("fyl2xp1"),
    Some("fsqrt"),
    Some("fsincos"),
    Some("frndint"),
    Some("fscale"),
    Some("fsin"),
    Some("fcos"),
];

/// D8 register forms; DC swaps the reverse and forward subtract/divide.
const D8_REGISTER: [&str; 8] = ["fadd", "fmul", "fcom", "fcomp", "fsub", "fsubr", "fdiv", "fdivr"];
const DC_REGISTER: [&str; 8] = ["fadd", "fmul", "fcom", "fcomp", "fsubr", "fsub", "fdivr", "fdiv"];

const DA_REGISTER: [Option<&str>; 8] = [
    Some("fcmovb"),
    Some("fcmove"),
    Some("fcmovbe"),
    Some("fcmovu"),
    None,
    None,
    None,
    None,
];

const DB_REGISTER: [Option<&str>; 8] = [
    Some("fcmovnb"),
    Some("fcmovne"),
    Some("fcmovnbe"),
    Some("fcmovnu"),
    None,
    Some("fucomi"),
    Some("fcomi"),
    None,
];

/// DB E0-E7, operand-free.
const DB_CONTROL: [Option<&str>; 8] = [
    Some("feni"),
    Some("fdisi"),
    Some("fclex"),
    Some("finit"),
    Some("fsetpm"),
    Some("frstpm"),
    None,
    None,
];

const DD_REGISTER: [Option<&str>; 8] = [
    Some("ffree"),
    Some("fxch"),
    Some("fst"),
    Some("fstp"),
    Some("fucom"),
    Some("fucomp"),
    None,
    None,
];

const DE_REGISTER: [Option<&str>; 8] = [
    Some("faddp"),
    Some("fmulp"),
    Some("fcomp"),
    None,
    Some("fsubrp"),
    Some("fsubp"),
    Some("fdivrp"),
    Some("fdivp"),
];

const DF_REGISTER: [Option<&str>; 8] = [
    Some("ffreep"),
    Some("fxch"),
    Some("fstp"),
    Some("fstp"),
    None,
    Some("fucomip"),
    Some("fcomip"),
    None,
];

/// DF E0-E2, which store a status word into `ax`.
const DF_STATUS: [&str; 3] = ["fstsw", "fstdw", "fstsg"];

/// Decodes the x87 instruction selected by escape byte `opcode` (D8-DF)
/// and `modrm`. Returns `None` for the holes in the maps.
pub(crate) fn decode(opcode: u8, modrm: u8) -> Option<Definition> {
    let escape = usize::from(opcode.wrapping_sub(0xD8) & 0x7);
    let reg = usize::from((modrm >> 3) & 0x7);
    if modrm < 0xC0 {
        return MEMORY_FORMS[escape][reg].map(|name| Definition::new(name, MEMORY));
    }

    let (name, operands) = match escape {
        0 => (D8_REGISTER[reg], if matches!(reg, 2 | 3) { STI } else { ST0_STI }),
        1 => match reg {
            0 => ("fld", STI),
            1 => ("fxch", STI),
            2 if modrm == 0xD0 => ("fnop", &[][..]),
            2 => return None,
            3 => ("fstp1", STI),
            _ => (D9_CONSTANTS[usize::from(modrm - 0xE0)]?, &[][..]),
        },
        2 if modrm == 0xE9 => ("fucompp", &[][..]),
        2 => (DA_REGISTER[reg]?, ST0_STI),
        3 if reg == 4 => (DB_CONTROL[usize::from(modrm & 0x7)]?, &[][..]),
        3 => (DB_REGISTER[reg]?, ST0_STI),
        4 => (DC_REGISTER[reg], if matches!(reg, 2 | 3) { STI } else { STI_ST0 }),
        5 => (DD_REGISTER[reg]?, STI),
        6 if modrm == 0xD9 => ("fcompp", &[][..]),
        6 => (DE_REGISTER[reg]?, if reg == 2 { STI } else { STI_ST0 }),
        _ if reg == 4 => (*DF_STATUS.get(usize::from(modrm & 0x7))?, STATUS),
        _ => (DF_REGISTER[reg]?, if matches!(reg, 5 | 6) { ST0_STI } else { STI }),
    };
    Some(Definition::new(name, operands))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::x86::operand::Mnemonic;

    fn name(opcode: u8, modrm: u8) -> Option<&'static str> {
        decode(opcode, modrm).map(|definition| match definition.mnemonic {
            Mnemonic::Fixed(text) => text,
            _ => unreachable!(),
        })
    }

    #[test]
    fn test_memory_forms_follow_reg() {
        assert_eq!(name(0xD9, 0x00), Some("fld"));
        assert_eq!(name(0xDD, 0x18), Some("fstp"));
        assert_eq!(name(0xDF, 0x28), Some("fild"));
        assert_eq!(decode(0xD8, 0x45).unwrap().operands, MEMORY);
        // D9 /1 is a hole.
        assert_eq!(name(0xD9, 0x08), None);
    }

    #[test]
    fn test_d8_register_forms() {
        let fadd = decode(0xD8, 0xC1).unwrap();
        assert_eq!(fadd.operands, ST0_STI);
        assert_eq!(name(0xD8, 0xD1), Some("fcom"));
        assert_eq!(decode(0xD8, 0xD1).unwrap().operands, STI);
    }

    #[test]
    fn test_dc_swaps_subtract() {
        assert_eq!(name(0xD8, 0xE1), Some("fsub"));
        assert_eq!(name(0xDC, 0xE1), Some("fsubr"));
        assert_eq!(decode(0xDC, 0xE1).unwrap().operands, STI_ST0);
    }

    #[test]
    fn test_single_encodings() {
        assert_eq!(name(0xDA, 0xE9), Some("fucompp"));
        assert_eq!(name(0xDE, 0xD9), Some("fcompp"));
        assert_eq!(name(0xD9, 0xD0), Some("fnop"));
        assert_eq!(name(0xD9, 0xD1), None);
        assert_eq!(name(0xD9, 0xEE), Some("fldz"));
        assert_eq!(name(0xD9, 0xE2), None);
    }

    #[test]
    fn test_status_word_store() {
        let fstsw = decode(0xDF, 0xE0).unwrap();
        assert_eq!(fstsw.operands, STATUS);
        assert_eq!(name(0xDF, 0xE3), None);
    }

    #[test]
    fn test_db_control() {
        assert_eq!(name(0xDB, 0xE3), Some("finit"));
        assert_eq!(name(0xDB, 0xE8), Some("fucomi"));
        assert_eq!(name(0xDB, 0xE7), None);
    }
}
