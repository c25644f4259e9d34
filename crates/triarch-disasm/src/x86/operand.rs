//! Instruction definitions and operand encoding codes.
//!
//! Operands follow the letter codes of the Intel opcode maps: the letter
//! says where the operand comes from (`E` ModR/M r/m, `G` ModR/M reg, `I`
//! immediate, `J` relative offset, ...) and the width says how big it is.
//! [`codes`] spells the common combinations the way the maps do, so the
//! tables read like the manual.

use super::prefix::Mandatory;

/// Operand width selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Width {
    Byte,
    Word,
    Dword,
    /// 16, 32 or 64 bits by operand size.
    V,
    /// Like `V`, but 64 bits by default in long mode.
    V64,
    /// 16 bits with an operand size override, 32 otherwise.
    Z,
    /// 64 bits with REX.W or VEX.W in long mode, 32 otherwise.
    Y,
    /// 64 bits in long mode, 32 otherwise.
    Native,
}

/// Vector register width selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Vector {
    /// `xmm`, or `ymm` when VEX.L is set.
    X,
    /// Always `xmm`.
    Xmm,
    /// Always `ymm`.
    Ymm,
}

/// Where an operand comes from and how it is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operand {
    /// ModR/M r/m: register or memory.
    E(Width),
    /// ModR/M reg: general register.
    G(Width),
    /// ModR/M r/m, memory only.
    M,
    /// ModR/M r/m, register only.
    R(Width),
    /// Immediate.
    I(Width),
    /// Byte immediate sign-extended to the operand size.
    Ibs,
    /// Relative branch offset.
    J(Width),
    /// Absolute memory offset with no ModR/M.
    O,
    /// Far pointer `selector:offset`.
    A,
    /// String source `ds:[rsi]`.
    X,
    /// String destination `es:[rdi]`.
    Y,
    /// ModR/M reg: control register.
    C,
    /// ModR/M reg: debug register.
    D,
    /// ModR/M reg: segment register.
    S,
    /// The accumulator at the given width.
    Acc(Width),
    /// Register in the low three opcode bits, extended by REX.B.
    Z(Width),
    /// Fixed text.
    Fixed(&'static str),
    /// ModR/M reg: vector register.
    V(Vector),
    /// ModR/M r/m: vector register or memory.
    W(Vector),
    /// ModR/M r/m: vector register only.
    U(Vector),
    /// VEX.vvvv vector register. Absent in legacy encodings.
    H(Vector),
    /// Vector register in bits 7-4 of a trailing immediate byte.
    L(Vector),
    /// VEX.vvvv general register.
    B(Width),
    /// ModR/M reg: MMX register.
    P,
    /// ModR/M r/m: MMX register or memory.
    Q,
    /// ModR/M r/m: MMX register only.
    N,
    /// x87 stack top.
    St0,
    /// x87 stack register from ModR/M r/m.
    StI,
}

impl Operand {
    /// Returns whether the operand is addressed through a ModR/M byte.
    pub(crate) fn needs_modrm(&self) -> bool {
        matches!(
            self,
            Self::E(_)
                | Self::G(_)
                | Self::M
                | Self::R(_)
                | Self::C
                | Self::D
                | Self::S
                | Self::V(_)
                | Self::W(_)
                | Self::U(_)
                | Self::P
                | Self::Q
                | Self::N
                | Self::StI
        )
    }

    /// Returns whether the operand requires ModR/M.mod to be 11.
    pub(crate) fn needs_register_form(&self) -> bool {
        matches!(self, Self::R(_) | Self::U(_) | Self::N | Self::StI)
    }

    /// Returns whether the operand requires a memory ModR/M form.
    pub(crate) fn needs_memory_form(&self) -> bool {
        matches!(self, Self::M)
    }
}

/// Mnemonic text, possibly chosen by operand or address size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mnemonic {
    Fixed(&'static str),
    /// Indexed by operand size: 16, 32, 64 bits.
    ByOperandSize([&'static str; 3]),
    /// Indexed by address size: 16, 32, 64 bits.
    ByAddressSize([&'static str; 3]),
    /// Chosen by REX.W or VEX.W.
    ByW([&'static str; 2]),
}

/// How a definition may be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Encoding {
    Legacy,
    /// Legacy, or VEX with a `v` added to the mnemonic.
    LegacyOrVex,
    /// VEX or XOP only, mnemonic used as written.
    VexOnly,
}

/// What kind of table slot a definition fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    Instruction,
    /// Re-index by ModR/M through a group table.
    Group(&'static [GroupEntry]),
    /// x87 escape, decoded by ModR/M.
    X87,
    /// A prefix byte that arrived where an opcode was expected.
    Prefix,
    /// No instruction.
    Invalid,
}

/// One opcode table slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Definition {
    pub mnemonic: Mnemonic,
    pub operands: &'static [Operand],
    pub kind: Kind,
    pub encoding: Encoding,
    /// Not encodable in long mode.
    pub invalid_64: bool,
    /// String instruction that honors REP/REPNE.
    pub string: bool,
    /// Operand size defaults to 64 bits in long mode.
    pub default_64: bool,
}

impl Definition {
    /// An empty slot.
    pub const INVALID: Self = Self {
        mnemonic: Mnemonic::Fixed(""),
        operands: &[],
        kind: Kind::Invalid,
        encoding: Encoding::Legacy,
        invalid_64: false,
        string: false,
        default_64: false,
    };

    pub const fn new(mnemonic: &'static str, operands: &'static [Operand]) -> Self {
        Self {
            mnemonic: Mnemonic::Fixed(mnemonic),
            ..Self::with_operands(operands)
        }
    }

    pub const fn sized(mnemonics: [&'static str; 3], operands: &'static [Operand]) -> Self {
        Self {
            mnemonic: Mnemonic::ByOperandSize(mnemonics),
            ..Self::with_operands(operands)
        }
    }

    pub const fn by_w(mnemonics: [&'static str; 2], operands: &'static [Operand]) -> Self {
        Self {
            mnemonic: Mnemonic::ByW(mnemonics),
            ..Self::with_operands(operands)
        }
    }

    pub const fn group(table: &'static [GroupEntry], operands: &'static [Operand]) -> Self {
        Self {
            kind: Kind::Group(table),
            ..Self::with_operands(operands)
        }
    }

    pub const fn x87() -> Self {
        Self {
            kind: Kind::X87,
            ..Self::with_operands(&[])
        }
    }

    pub const fn prefix() -> Self {
        Self {
            kind: Kind::Prefix,
            ..Self::INVALID
        }
    }

    const fn with_operands(operands: &'static [Operand]) -> Self {
        Self {
            operands,
            kind: Kind::Instruction,
            ..Self::INVALID
        }
    }

    pub const fn not_64(mut self) -> Self {
        self.invalid_64 = true;
        self
    }

    pub const fn string(mut self) -> Self {
        self.string = true;
        self
    }

    pub const fn default_64(mut self) -> Self {
        self.default_64 = true;
        self
    }

    pub const fn vex(mut self) -> Self {
        self.encoding = Encoding::LegacyOrVex;
        self
    }

    pub const fn vex_only(mut self) -> Self {
        self.encoding = Encoding::VexOnly;
        self
    }

    pub const fn by_address_size(mut self, mnemonics: [&'static str; 3]) -> Self {
        self.mnemonic = Mnemonic::ByAddressSize(mnemonics);
        self
    }

    /// Returns whether a ModR/M byte follows the opcode.
    pub(crate) fn needs_modrm(&self) -> bool {
        matches!(self.kind, Kind::Group(_) | Kind::X87) || self.operands.iter().any(Operand::needs_modrm)
    }

    /// Returns whether the definition applies to a VEX-encoded instruction.
    pub(crate) fn allows_vex(&self) -> bool {
        !matches!(self.encoding, Encoding::Legacy)
    }

    /// Returns whether the definition applies without a VEX prefix.
    pub(crate) fn allows_legacy(&self) -> bool {
        !matches!(self.encoding, Encoding::VexOnly)
    }
}

/// A definition in a table keyed by mandatory prefix and opcode.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SparseEntry {
    pub prefix: Mandatory,
    pub opcode: u8,
    pub definition: Definition,
}

impl SparseEntry {
    pub const fn new(prefix: Mandatory, opcode: u8, definition: Definition) -> Self {
        Self {
            prefix,
            opcode,
            definition,
        }
    }
}

/// Looks up `opcode` under exactly one mandatory prefix.
pub(crate) fn find_exact(
    table: &'static [SparseEntry],
    opcode: u8,
    prefix: Mandatory,
    accept: impl Fn(&Definition) -> bool,
) -> Option<Definition> {
    table
        .iter()
        .find(|entry| entry.opcode == opcode && entry.prefix == prefix && accept(&entry.definition))
        .map(|entry| entry.definition)
}

/// Tries `lookup` with each candidate prefix in turn, then with no prefix.
/// Returns the match and the prefix it consumed.
pub(crate) fn with_fallback<T>(
    candidates: impl IntoIterator<Item = Mandatory>,
    lookup: impl Fn(Mandatory) -> Option<T>,
) -> Option<(T, Mandatory)> {
    let attempt = |prefix: Mandatory| lookup(prefix).map(|found| (found, prefix));
    candidates
        .into_iter()
        .filter(|prefix| *prefix != Mandatory::None)
        .find_map(&attempt)
        .or_else(|| attempt(Mandatory::None))
}

/// Which ModR/M forms a group entry covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Form {
    Any,
    Memory,
    Register,
    /// One specific ModR/M byte.
    Exact(u8),
}

/// A group member selected by ModR/M and mandatory prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GroupEntry {
    pub prefix: Mandatory,
    /// ModR/M.reg, or `None` for every value.
    pub reg: Option<u8>,
    pub form: Form,
    /// Operands left empty inherit those of the group slot.
    pub definition: Definition,
}

impl GroupEntry {
    pub const fn new(reg: u8, definition: Definition) -> Self {
        Self {
            prefix: Mandatory::None,
            reg: Some(reg),
            form: Form::Any,
            definition,
        }
    }

    /// Matches every ModR/M byte.
    pub const fn every(definition: Definition) -> Self {
        Self {
            reg: None,
            ..Self::new(0, definition)
        }
    }

    /// Matches a single register-form ModR/M byte.
    pub const fn exact(modrm: u8, definition: Definition) -> Self {
        Self {
            reg: None,
            form: Form::Exact(modrm),
            ..Self::new(0, definition)
        }
    }

    pub const fn memory(mut self) -> Self {
        self.form = Form::Memory;
        self
    }

    pub const fn register(mut self) -> Self {
        self.form = Form::Register;
        self
    }

    pub const fn prefixed(mut self, prefix: Mandatory) -> Self {
        self.prefix = prefix;
        self
    }

    fn matches(&self, modrm: u8) -> bool {
        let reg_matches = self.reg.map_or(true, |reg| reg == (modrm >> 3) & 0x7);
        let form_matches = match self.form {
            Form::Any => true,
            Form::Memory => modrm < 0xC0,
            Form::Register => modrm >= 0xC0,
            Form::Exact(byte) => byte == modrm,
        };
        reg_matches && form_matches
    }
}

/// Looks up the group member for `modrm` under exactly one mandatory
/// prefix. Exact ModR/M matches win over ModR/M.reg matches.
pub(crate) fn find_group(
    table: &'static [GroupEntry],
    modrm: u8,
    prefix: Mandatory,
    accept: impl Fn(&Definition) -> bool,
) -> Option<Definition> {
    let candidates = || {
        table
            .iter()
            .filter(|entry| entry.prefix == prefix && entry.matches(modrm) && accept(&entry.definition))
    };
    candidates()
        .find(|entry| matches!(entry.form, Form::Exact(_)))
        .or_else(|| candidates().next())
        .map(|entry| entry.definition)
}

/// Letter-code shorthands.
#[allow(non_upper_case_globals)]
pub(crate) mod codes {
    use super::{Operand, Vector, Width};

    pub const Eb: Operand = Operand::E(Width::Byte);
    pub const Ew: Operand = Operand::E(Width::Word);
    pub const Ed: Operand = Operand::E(Width::Dword);
    pub const Ev: Operand = Operand::E(Width::V);
    pub const Ev64: Operand = Operand::E(Width::V64);
    pub const Ey: Operand = Operand::E(Width::Y);
    pub const Gb: Operand = Operand::G(Width::Byte);
    pub const Gw: Operand = Operand::G(Width::Word);
    pub const Gd: Operand = Operand::G(Width::Dword);
    pub const Gv: Operand = Operand::G(Width::V);
    pub const Gz: Operand = Operand::G(Width::Z);
    pub const Gy: Operand = Operand::G(Width::Y);
    pub const Rv: Operand = Operand::R(Width::V);
    pub const Rn: Operand = Operand::R(Width::Native);
    pub const Ry: Operand = Operand::R(Width::Y);
    pub const Ib: Operand = Operand::I(Width::Byte);
    pub const Iw: Operand = Operand::I(Width::Word);
    pub const Id: Operand = Operand::I(Width::Dword);
    pub const Iv: Operand = Operand::I(Width::V);
    pub const Iz: Operand = Operand::I(Width::Z);
    pub const Jb: Operand = Operand::J(Width::Byte);
    pub const Jz: Operand = Operand::J(Width::Z);
    pub const By: Operand = Operand::B(Width::Y);
    pub const AL: Operand = Operand::Acc(Width::Byte);
    pub const eAX: Operand = Operand::Acc(Width::Z);
    pub const rAX: Operand = Operand::Acc(Width::V);
    pub const Zb: Operand = Operand::Z(Width::Byte);
    pub const Zv: Operand = Operand::Z(Width::V);
    pub const Zv64: Operand = Operand::Z(Width::V64);
    pub const Zy: Operand = Operand::Z(Width::Y);
    pub const CL: Operand = Operand::Fixed("cl");
    pub const DX: Operand = Operand::Fixed("dx");
    pub const ONE: Operand = Operand::Fixed("1");

    pub const Vx: Operand = Operand::V(Vector::X);
    pub const Vdq: Operand = Operand::V(Vector::Xmm);
    pub const Vqq: Operand = Operand::V(Vector::Ymm);
    pub const Wx: Operand = Operand::W(Vector::X);
    pub const Wdq: Operand = Operand::W(Vector::Xmm);
    pub const Wqq: Operand = Operand::W(Vector::Ymm);
    pub const Ux: Operand = Operand::U(Vector::X);
    pub const Udq: Operand = Operand::U(Vector::Xmm);
    pub const Hx: Operand = Operand::H(Vector::X);
    pub const Hdq: Operand = Operand::H(Vector::Xmm);
    pub const Hqq: Operand = Operand::H(Vector::Ymm);
    pub const Lx: Operand = Operand::L(Vector::X);
    pub const Ldq: Operand = Operand::L(Vector::Xmm);
    pub const XMM0: Operand = Operand::Fixed("xmm0");
}
