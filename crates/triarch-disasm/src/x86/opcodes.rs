//! One-byte opcode map and its ModR/M groups.

use super::operand::codes::*;
use super::operand::{Definition, GroupEntry, Operand};

const fn d(mnemonic: &'static str, operands: &'static [Operand]) -> Definition {
    Definition::new(mnemonic, operands)
}

const fn sized(mnemonics: [&'static str; 3], operands: &'static [Operand]) -> Definition {
    Definition::sized(mnemonics, operands)
}

/// The six ALU forms shared by add, or, adc, sbb, and, sub, xor and cmp.
const ALU_FORMS: [&[Operand]; 6] = [&[Eb, Gb], &[Ev, Gv], &[Gb, Eb], &[Gv, Ev], &[AL, Ib], &[rAX, Iz]];

const ALU_MNEMONICS: [&str; 8] = ["add", "or", "adc", "sbb", "and", "sub", "xor", "cmp"];

const JCC: [&str; 16] = [
    "jo", "jno", "jb", "jae", "je", "jne", "jbe", "ja", "js", "jns", "jp", "jnp", "jl", "jge", "jle", "jg",
];

/// Opcodes 00-FF without an escape byte.
pub(crate) static PRIMARY: [Definition; 256] = {
    let mut table = [Definition::INVALID; 256];

    let mut alu = 0;
    while alu < 8 {
        let base = alu * 8;
        let mut form = 0;
        while form < 6 {
            table[base + form] = d(ALU_MNEMONICS[alu], ALU_FORMS[form]);
            form += 1;
        }
        alu += 1;
    }

    table[0x06] = d("push", &[Operand::Fixed("es")]).not_64();
    table[0x07] = d("pop", &[Operand::Fixed("es")]).not_64();
    table[0x0E] = d("push", &[Operand::Fixed("cs")]).not_64();
    table[0x16] = d("push", &[Operand::Fixed("ss")]).not_64();
    table[0x17] = d("pop", &[Operand::Fixed("ss")]).not_64();
    table[0x1E] = d("push", &[Operand::Fixed("ds")]).not_64();
    table[0x1F] = d("pop", &[Operand::Fixed("ds")]).not_64();
    table[0x26] = Definition::prefix();
    table[0x27] = d("daa", &[]).not_64();
    table[0x2E] = Definition::prefix();
    table[0x2F] = d("das", &[]).not_64();
    table[0x36] = Definition::prefix();
    table[0x37] = d("aaa", &[]).not_64();
    table[0x3E] = Definition::prefix();
    table[0x3F] = d("aas", &[]).not_64();

    let mut reg = 0;
    while reg < 8 {
        table[0x40 + reg] = d("inc", &[Zv]).not_64();
        table[0x48 + reg] = d("dec", &[Zv]).not_64();
        table[0x50 + reg] = d("push", &[Zv64]);
        table[0x58 + reg] = d("pop", &[Zv64]);
        table[0xB0 + reg] = d("mov", &[Zb, Ib]);
        table[0xB8 + reg] = d("mov", &[Zv, Iv]);
        reg += 1;
    }

    table[0x60] = sized(["pusha", "pushad", "pushad"], &[]).not_64();
    table[0x61] = sized(["popa", "popad", "popad"], &[]).not_64();
    table[0x62] = d("bound", &[Gv, Operand::M]).not_64();
    // Long mode reinterprets this as movsxd.
    table[0x63] = d("arpl", &[Ew, Gw]);
    table[0x64] = Definition::prefix();
    table[0x65] = Definition::prefix();
    table[0x66] = Definition::prefix();
    table[0x67] = Definition::prefix();
    table[0x68] = d("push", &[Iz]).default_64();
    table[0x69] = d("imul", &[Gv, Ev, Iz]);
    table[0x6A] = d("push", &[Operand::Ibs]).default_64();
    table[0x6B] = d("imul", &[Gv, Ev, Operand::Ibs]);
    table[0x6C] = d("insb", &[Operand::Y, DX]).string();
    table[0x6D] = sized(["insw", "insd", "insd"], &[Operand::Y, DX]).string();
    table[0x6E] = d("outsb", &[DX, Operand::X]).string();
    table[0x6F] = sized(["outsw", "outsd", "outsd"], &[DX, Operand::X]).string();

    let mut cc = 0;
    while cc < 16 {
        table[0x70 + cc] = d(JCC[cc], &[Jb]);
        cc += 1;
    }

    table[0x80] = Definition::group(GROUP_1, &[Eb, Ib]);
    table[0x81] = Definition::group(GROUP_1, &[Ev, Iz]);
    table[0x82] = Definition::group(GROUP_1, &[Eb, Ib]).not_64();
    table[0x83] = Definition::group(GROUP_1, &[Ev, Operand::Ibs]);
    table[0x84] = d("test", &[Eb, Gb]);
    table[0x85] = d("test", &[Ev, Gv]);
    table[0x86] = d("xchg", &[Eb, Gb]);
    table[0x87] = d("xchg", &[Ev, Gv]);
    table[0x88] = d("mov", &[Eb, Gb]);
    table[0x89] = d("mov", &[Ev, Gv]);
    table[0x8A] = d("mov", &[Gb, Eb]);
    table[0x8B] = d("mov", &[Gv, Ev]);
    table[0x8C] = d("mov", &[Ev, Operand::S]);
    table[0x8D] = d("lea", &[Gv, Operand::M]);
    table[0x8E] = d("mov", &[Operand::S, Ew]);
    table[0x8F] = Definition::group(GROUP_1A, &[Ev64]);

    table[0x90] = d("nop", &[]);
    let mut reg = 1;
    while reg < 8 {
        table[0x90 + reg] = d("xchg", &[Zv, rAX]);
        reg += 1;
    }
    table[0x98] = sized(["cbw", "cwde", "cdqe"], &[]);
    table[0x99] = sized(["cwd", "cdq", "cqo"], &[]);
    table[0x9A] = d("callf", &[Operand::A]).not_64();
    table[0x9B] = d("fwait", &[]);
    table[0x9C] = sized(["pushf", "pushfd", "pushfq"], &[]).default_64();
    table[0x9D] = sized(["popf", "popfd", "popfq"], &[]).default_64();
    table[0x9E] = d("sahf", &[]);
    table[0x9F] = d("lahf", &[]);

    table[0xA0] = d("mov", &[AL, Operand::O]);
    table[0xA1] = d("mov", &[rAX, Operand::O]);
    table[0xA2] = d("mov", &[Operand::O, AL]);
    table[0xA3] = d("mov", &[Operand::O, rAX]);
    table[0xA4] = d("movsb", &[Operand::Y, Operand::X]).string();
    table[0xA5] = sized(["movsw", "movsd", "movsq"], &[Operand::Y, Operand::X]).string();
    table[0xA6] = d("cmpsb", &[Operand::X, Operand::Y]).string();
    table[0xA7] = sized(["cmpsw", "cmpsd", "cmpsq"], &[Operand::X, Operand::Y]).string();
    table[0xA8] = d("test", &[AL, Ib]);
    table[0xA9] = d("test", &[rAX, Iz]);
    table[0xAA] = d("stosb", &[Operand::Y, AL]).string();
    table[0xAB] = sized(["stosw", "stosd", "stosq"], &[Operand::Y, rAX]).string();
    table[0xAC] = d("lodsb", &[AL, Operand::X]).string();
    table[0xAD] = sized(["lodsw", "lodsd", "lodsq"], &[rAX, Operand::X]).string();
    table[0xAE] = d("scasb", &[AL, Operand::Y]).string();
    table[0xAF] = sized(["scasw", "scasd", "scasq"], &[rAX, Operand::Y]).string();

    table[0xC0] = Definition::group(GROUP_2, &[Eb, Ib]);
    table[0xC1] = Definition::group(GROUP_2, &[Ev, Ib]);
    table[0xC2] = d("ret", &[Iw]);
    table[0xC3] = d("ret", &[]);
    table[0xC4] = d("les", &[Gz, Operand::M]).not_64();
    table[0xC5] = d("lds", &[Gz, Operand::M]).not_64();
    table[0xC6] = Definition::group(GROUP_11_BYTE, &[Eb, Ib]);
    table[0xC7] = Definition::group(GROUP_11, &[Ev, Iz]);
    table[0xC8] = d("enter", &[Iw, Ib]);
    table[0xC9] = d("leave", &[]);
    table[0xCA] = d("retf", &[Iw]);
    table[0xCB] = d("retf", &[]);
    table[0xCC] = d("int3", &[]);
    table[0xCD] = d("int", &[Ib]);
    table[0xCE] = d("into", &[]).not_64();
    table[0xCF] = sized(["iret", "iretd", "iretq"], &[]);

    table[0xD0] = Definition::group(GROUP_2, &[Eb, ONE]);
    table[0xD1] = Definition::group(GROUP_2, &[Ev, ONE]);
    table[0xD2] = Definition::group(GROUP_2, &[Eb, CL]);
    table[0xD3] = Definition::group(GROUP_2, &[Ev, CL]);
    table[0xD4] = d("aam", &[Ib]).not_64();
    table[0xD5] = d("aad", &[Ib]).not_64();
    table[0xD6] = d("salc", &[]).not_64();
    table[0xD7] = d("xlatb", &[]);
    let mut escape = 0;
    while escape < 8 {
        table[0xD8 + escape] = Definition::x87();
        escape += 1;
    }

    table[0xE0] = d("loopne", &[Jb]);
    table[0xE1] = d("loope", &[Jb]);
    table[0xE2] = d("loop", &[Jb]);
    table[0xE3] = d("jcxz", &[Jb]).by_address_size(["jcxz", "jecxz", "jrcxz"]);
    table[0xE4] = d("in", &[AL, Ib]);
    table[0xE5] = d("in", &[eAX, Ib]);
    table[0xE6] = d("out", &[Ib, AL]);
    table[0xE7] = d("out", &[Ib, eAX]);
    table[0xE8] = d("call", &[Jz]);
    table[0xE9] = d("jmp", &[Jz]);
    table[0xEA] = d("jmpf", &[Operand::A]).not_64();
    table[0xEB] = d("jmp", &[Jb]);
    table[0xEC] = d("in", &[AL, DX]);
    table[0xED] = d("in", &[eAX, DX]);
    table[0xEE] = d("out", &[DX, AL]);
    table[0xEF] = d("out", &[DX, eAX]);

    table[0xF0] = Definition::prefix();
    table[0xF1] = d("int1", &[]);
    table[0xF2] = Definition::prefix();
    table[0xF3] = Definition::prefix();
    table[0xF4] = d("hlt", &[]);
    table[0xF5] = d("cmc", &[]);
    table[0xF6] = Definition::group(GROUP_3_BYTE, &[]);
    table[0xF7] = Definition::group(GROUP_3, &[]);
    table[0xF8] = d("clc", &[]);
    table[0xF9] = d("stc", &[]);
    table[0xFA] = d("cli", &[]);
    table[0xFB] = d("sti", &[]);
    table[0xFC] = d("cld", &[]);
    table[0xFD] = d("std", &[]);
    table[0xFE] = Definition::group(GROUP_4, &[]);
    table[0xFF] = Definition::group(GROUP_5, &[]);

    table
};

/// The long mode reading of opcode 63.
pub(crate) const MOVSXD: Definition = d("movsxd", &[Gv, Ed]);

/// F3 90.
pub(crate) const PAUSE: Definition = d("pause", &[]);

/// 90 with REX.B names r8 and is a real exchange.
pub(crate) const XCHG_R8: Definition = d("xchg", &[Zv, rAX]);

const GROUP_1: &[GroupEntry] = &[
    GroupEntry::new(0, d("add", &[])),
    GroupEntry::new(1, d("or", &[])),
    GroupEntry::new(2, d("adc", &[])),
    GroupEntry::new(3, d("sbb", &[])),
    GroupEntry::new(4, d("and", &[])),
    GroupEntry::new(5, d("sub", &[])),
    GroupEntry::new(6, d("xor", &[])),
    GroupEntry::new(7, d("cmp", &[])),
];

const GROUP_1A: &[GroupEntry] = &[GroupEntry::new(0, d("pop", &[]).default_64())];

const GROUP_2: &[GroupEntry] = &[
    GroupEntry::new(0, d("rol", &[])),
    GroupEntry::new(1, d("ror", &[])),
    GroupEntry::new(2, d("rcl", &[])),
    GroupEntry::new(3, d("rcr", &[])),
    GroupEntry::new(4, d("shl", &[])),
    GroupEntry::new(5, d("shr", &[])),
    GroupEntry::new(6, d("sal", &[])),
    GroupEntry::new(7, d("sar", &[])),
];

const GROUP_3_BYTE: &[GroupEntry] = &[
    GroupEntry::new(0, d("test", &[Eb, Ib])),
    GroupEntry::new(1, d("test", &[Eb, Ib])),
    GroupEntry::new(2, d("not", &[Eb])),
    GroupEntry::new(3, d("neg", &[Eb])),
    GroupEntry::new(4, d("mul", &[Eb])),
    GroupEntry::new(5, d("imul", &[Eb])),
    GroupEntry::new(6, d("div", &[Eb])),
    GroupEntry::new(7, d("idiv", &[Eb])),
];

const GROUP_3: &[GroupEntry] = &[
    GroupEntry::new(0, d("test", &[Ev, Iz])),
    GroupEntry::new(1, d("test", &[Ev, Iz])),
    GroupEntry::new(2, d("not", &[Ev])),
    GroupEntry::new(3, d("neg", &[Ev])),
    GroupEntry::new(4, d("mul", &[Ev])),
    GroupEntry::new(5, d("imul", &[Ev])),
    GroupEntry::new(6, d("div", &[Ev])),
    GroupEntry::new(7, d("idiv", &[Ev])),
];

const GROUP_4: &[GroupEntry] = &[
    GroupEntry::new(0, d("inc", &[Eb])),
    GroupEntry::new(1, d("dec", &[Eb])),
];

const GROUP_5: &[GroupEntry] = &[
    GroupEntry::new(0, d("inc", &[Ev])),
    GroupEntry::new(1, d("dec", &[Ev])),
    GroupEntry::new(2, d("call", &[Ev64])),
    GroupEntry::new(3, d("callf", &[Operand::M])),
    GroupEntry::new(4, d("jmp", &[Ev64])),
    GroupEntry::new(5, d("jmpf", &[Operand::M])),
    GroupEntry::new(6, d("push", &[Ev64])),
];

const GROUP_11_BYTE: &[GroupEntry] = &[
    GroupEntry::new(0, d("mov", &[])),
    GroupEntry::exact(0xF8, d("xabort", &[Ib])),
];

const GROUP_11: &[GroupEntry] = &[
    GroupEntry::new(0, d("mov", &[])),
    GroupEntry::exact(0xF8, d("xbegin", &[Jz])),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::x86::operand::{find_group, Kind, Mnemonic};
    use crate::x86::prefix::Mandatory;

    fn mnemonic(definition: &Definition) -> &'static str {
        match definition.mnemonic {
            Mnemonic::Fixed(text) => text,
            Mnemonic::ByOperandSize(names) | Mnemonic::ByAddressSize(names) => names[1],
            Mnemonic::ByW(names) => names[0],
        }
    }

    #[test]
    fn test_alu_block() {
        assert_eq!(mnemonic(&PRIMARY[0x00]), "add");
        assert_eq!(PRIMARY[0x05].operands, &[rAX, Iz]);
        assert_eq!(mnemonic(&PRIMARY[0x3B]), "cmp");
        assert_eq!(PRIMARY[0x3B].operands, &[Gv, Ev]);
    }

    #[test]
    fn test_prefix_slots() {
        for byte in [0x26, 0x2E, 0x36, 0x3E, 0x64, 0x65, 0x66, 0x67, 0xF0, 0xF2, 0xF3] {
            assert_eq!(PRIMARY[byte].kind, Kind::Prefix, "{byte:#x}");
        }
    }

    #[test]
    fn test_legacy_only_opcodes() {
        assert!(PRIMARY[0x40].invalid_64);
        assert!(PRIMARY[0x27].invalid_64);
        assert!(!PRIMARY[0x50].invalid_64);
        assert!(PRIMARY[0xD6].invalid_64);
    }

    #[test]
    fn test_group_one_inherits_operands() {
        let Kind::Group(table) = PRIMARY[0x83].kind else {
            panic!("83 is a group");
        };
        let member = find_group(table, 0xF8, Mandatory::None, |_| true).unwrap();
        assert_eq!(mnemonic(&member), "cmp");
        assert!(member.operands.is_empty());
        assert_eq!(PRIMARY[0x83].operands, &[Ev, Operand::Ibs]);
    }

    #[test]
    fn test_group_eleven_alternates() {
        let member = find_group(GROUP_11, 0x00, Mandatory::None, |_| true).unwrap();
        assert_eq!(mnemonic(&member), "mov");
        assert!(find_group(GROUP_11, 0xC8, Mandatory::None, |_| true).is_none());
        let member = find_group(GROUP_11_BYTE, 0xF8, Mandatory::None, |_| true).unwrap();
        assert_eq!(mnemonic(&member), "xabort");
        let member = find_group(GROUP_11, 0xF8, Mandatory::None, |_| true).unwrap();
        assert_eq!(mnemonic(&member), "xbegin");
    }
}
