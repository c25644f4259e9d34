//! x86 and x64 instruction decoding.

use std::fmt::{self, Write};

use log::trace;
use triarch_core::{TextBuf, MAX_OPERANDS};

use super::modrm::{AddressSize, Memory, ModRm};
use super::names::{self, CONTROL, DEBUG, MMX, SEGMENT, X87};
use super::opcodes::{MOVSXD, PAUSE, PRIMARY, XCHG_R8};
use super::opcodes_0f::Map;
use super::operand::{find_group, with_fallback, Definition, Encoding, Kind, Mnemonic, Operand, Vector, Width};
use super::prefix::{Mandatory, Prefixes, Rex};
use super::reader::Reader;
use super::x87;
use crate::traits::OperandAddress;
use crate::{DecodeError, DecodedInstruction};

/// Longest encoding the architecture allows.
pub const MAX_INSTRUCTION_SIZE: usize = 15;

/// Mnemonic for encodings that name no instruction.
const BAD: &str = "(bad)";

/// What the opcode lookup produced.
enum Lookup {
    Instruction(Definition),
    /// No instruction; decodes to the given placeholder.
    Placeholder(&'static str),
}

/// An operand once its bytes have been consumed, waiting for the final
/// instruction length.
#[derive(Debug, Clone, Copy)]
enum Value {
    /// Not encoded in this form, such as a VEX register in a legacy encoding.
    Absent,
    /// No such register; the encoding is reserved.
    Invalid,
    Text(&'static str),
    Memory(Memory),
    Immediate(u64),
    /// Branch displacement from the next instruction.
    Relative(i64),
    /// Absolute `moffs` address.
    Offset(u64),
    Far { selector: u16, offset: u64 },
    /// Implicit string operand.
    String { segment: &'static str, register: &'static str },
}

struct Decoder<'a> {
    reader: Reader<'a>,
    address: u64,
    long_mode: bool,
    prefixes: Prefixes,
    /// REX bits from REX or VEX.
    rex: Rex,
    /// The mandatory prefix the opcode lookup consumed.
    mandatory: Mandatory,
    opcode: u8,
    modrm: Option<ModRm>,
}

/// Decodes one instruction from `bytes`, which start at `address`.
pub(crate) fn decode(bytes: &[u8], address: u64, long_mode: bool) -> Result<DecodedInstruction, DecodeError> {
    let (prefixes, prefix_len) = Prefixes::parse(bytes, long_mode, address)?;
    let mut reader = Reader::new(bytes, address);
    reader.skip(prefix_len);
    let mut decoder = Decoder {
        reader,
        address,
        long_mode,
        rex: prefixes.effective_rex(),
        prefixes,
        mandatory: Mandatory::None,
        opcode: 0,
        modrm: None,
    };
    match decoder.lookup()? {
        Lookup::Instruction(definition) => decoder.finish(definition),
        Lookup::Placeholder(name) => decoder.placeholder(name),
    }
}

impl Decoder<'_> {
    fn lookup(&mut self) -> Result<Lookup, DecodeError> {
        if let Some(vex) = self.prefixes.vex {
            self.opcode = self.reader.u8()?;
            let prefix = Mandatory::from_pp(vex.pp);
            // Group slots sit under no prefix; pp then selects within the group.
            let definition = Map::from_select(vex.map)
                .and_then(|map| {
                    map.find(self.opcode, prefix, Definition::allows_vex).or_else(|| {
                        map.find(self.opcode, Mandatory::None, Definition::allows_vex)
                            .filter(|slot| matches!(slot.kind, Kind::Group(_)))
                    })
                })
                .ok_or_else(|| self.unknown())?;
            self.mandatory = prefix;
            return self.expand(definition);
        }

        let opcode = self.reader.u8()?;
        if opcode != 0x0F {
            return self.primary(opcode);
        }

        let second = self.reader.u8()?;
        let (map, opcode) = match second {
            0x38 => (Map::Escape38, self.reader.u8()?),
            0x3A => (Map::Escape3A, self.reader.u8()?),
            _ => (Map::TwoByte, second),
        };
        self.opcode = opcode;
        let found = with_fallback(self.prefixes.mandatory_candidates(), |prefix| {
            map.find(opcode, prefix, Definition::allows_legacy)
        });
        let Some((definition, prefix)) = found else {
            return Err(self.unknown());
        };
        self.mandatory = prefix;
        self.expand(definition)
    }

    fn primary(&mut self, opcode: u8) -> Result<Lookup, DecodeError> {
        self.opcode = opcode;
        let mut definition = PRIMARY[usize::from(opcode)];
        match opcode {
            0x63 if self.long_mode => definition = MOVSXD,
            0x90 if self.rex.b => definition = XCHG_R8,
            0x90 if self.prefixes.repeat == Some(Mandatory::Rep) => {
                definition = PAUSE;
                self.mandatory = Mandatory::Rep;
            }
            _ => {}
        }
        if self.long_mode && definition.invalid_64 {
            trace!("opcode {opcode:#04x} is not encodable in long mode");
            return Ok(Lookup::Placeholder(BAD));
        }
        if definition.kind == Kind::Prefix {
            return Ok(Lookup::Placeholder(stray_prefix(opcode)));
        }
        self.expand(definition)
    }

    /// Resolves groups and x87 escapes through the ModR/M byte.
    fn expand(&mut self, definition: Definition) -> Result<Lookup, DecodeError> {
        match definition.kind {
            Kind::Instruction => Ok(Lookup::Instruction(definition)),
            Kind::Group(table) => {
                let modrm = self.modrm()?.byte;
                let member = if self.prefixes.vex.is_some() {
                    find_group(table, modrm, self.mandatory, Definition::allows_vex).map(|found| (found, self.mandatory))
                } else {
                    with_fallback(self.prefixes.mandatory_candidates(), |prefix| {
                        find_group(table, modrm, prefix, Definition::allows_legacy)
                    })
                };
                let Some((member, prefix)) = member else {
                    trace!("no member for ModR/M {modrm:#04x} in group at opcode {:#04x}", self.opcode);
                    return Ok(Lookup::Placeholder(BAD));
                };
                if prefix != Mandatory::None {
                    self.mandatory = prefix;
                }
                Ok(Lookup::Instruction(inherit(definition, member)))
            }
            Kind::X87 => {
                let modrm = self.modrm()?.byte;
                Ok(x87::decode(self.opcode, modrm).map_or(Lookup::Placeholder(BAD), Lookup::Instruction))
            }
            Kind::Prefix | Kind::Invalid => Ok(Lookup::Placeholder(BAD)),
        }
    }

    fn modrm(&mut self) -> Result<ModRm, DecodeError> {
        if let Some(modrm) = self.modrm {
            return Ok(modrm);
        }
        let modrm = ModRm::parse(self.reader.u8()?, self.rex);
        self.modrm = Some(modrm);
        Ok(modrm)
    }

    fn unknown(&self) -> DecodeError {
        trace!("unknown opcode {:02x?}", self.reader.consumed());
        DecodeError::unknown_opcode(self.address, self.reader.consumed())
    }

    /// Whether 66 changes the operand size rather than selecting an opcode.
    fn operand_override(&self) -> bool {
        self.prefixes.operand_size && self.mandatory != Mandatory::OperandSize
    }

    fn operand_bits(&self, definition: &Definition) -> u16 {
        if self.long_mode && self.rex.w {
            64
        } else if self.operand_override() {
            16
        } else if self.long_mode && definition.default_64 {
            64
        } else {
            32
        }
    }

    fn address_size(&self) -> AddressSize {
        match (self.long_mode, self.prefixes.address_size) {
            (true, false) => AddressSize::Bits64,
            (true, true) | (false, false) => AddressSize::Bits32,
            (false, true) => AddressSize::Bits16,
        }
    }

    fn width_bits(&self, width: Width, operand_bits: u16) -> u16 {
        match width {
            Width::Byte => 8,
            Width::Word => 16,
            Width::Dword => 32,
            Width::V => operand_bits,
            Width::V64 if self.long_mode => {
                if self.operand_override() {
                    16
                } else {
                    64
                }
            }
            Width::V64 => operand_bits,
            Width::Z if operand_bits == 16 => 16,
            Width::Z => 32,
            Width::Y if self.long_mode && self.rex.w => 64,
            Width::Y => 32,
            Width::Native if self.long_mode => 64,
            Width::Native => 32,
        }
    }

    fn is_wide(&self, vector: Vector) -> bool {
        match vector {
            Vector::X => self.prefixes.vex.map_or(false, |vex| vex.l),
            Vector::Xmm => false,
            Vector::Ymm => true,
        }
    }

    fn segment(&self) -> &'static str {
        self.prefixes
            .segment
            .map_or("", |segment| segment.prefix_text(self.long_mode))
    }

    fn gpr(&self, number: u8, bits: u16) -> &'static str {
        names::gpr(number, bits, self.prefixes.has_rex())
    }

    /// Reads an immediate of `size` bytes, sign-extended and then cut to
    /// `bits`.
    fn immediate(&mut self, size: usize, bits: u16) -> Result<Value, DecodeError> {
        let value = self.reader.signed(size)? as u64;
        Ok(Value::Immediate(value & mask(bits)))
    }

    fn read_operand(
        &mut self,
        operand: Operand,
        memory: Option<Memory>,
        operand_bits: u16,
        address_size: AddressSize,
    ) -> Result<Value, DecodeError> {
        let value = match operand {
            Operand::I(width) => {
                let bits = self.width_bits(width, operand_bits);
                let size = match width {
                    Width::Z | Width::Y => usize::from(bits.min(32) / 8),
                    _ => usize::from(bits / 8),
                };
                // Iz sign-extends to a 64-bit operand.
                let extended = if matches!(width, Width::Z) { operand_bits } else { bits };
                return self.immediate(size, extended);
            }
            Operand::Ibs => return self.immediate(1, operand_bits),
            Operand::J(width) => {
                let size = match width {
                    Width::Byte => 1,
                    _ if operand_bits == 16 && !self.long_mode => 2,
                    _ => 4,
                };
                Value::Relative(self.reader.signed(size)?)
            }
            Operand::O => {
                let size = usize::from(address_size.bits() / 8);
                Value::Offset(self.reader.unsigned(size)?)
            }
            Operand::A => {
                let size = if operand_bits == 16 { 2 } else { 4 };
                let offset = self.reader.unsigned(size)?;
                let selector = self.reader.u16()?;
                Value::Far { selector, offset }
            }
            Operand::X => Value::String {
                segment: match self.segment() {
                    "" => "ds:",
                    segment => segment,
                },
                register: address_size.register(6),
            },
            Operand::Y => Value::String {
                segment: "es:",
                register: address_size.register(7),
            },
            Operand::Acc(width) => Value::Text(self.gpr(0, self.width_bits(width, operand_bits))),
            Operand::Z(width) => {
                let number = (self.opcode & 0x7) | (u8::from(self.rex.b) << 3);
                Value::Text(self.gpr(number, self.width_bits(width, operand_bits)))
            }
            Operand::Fixed(text) => Value::Text(text),
            Operand::St0 => Value::Text("st"),
            Operand::H(vector) => match self.prefixes.vex {
                Some(vex) => Value::Text(names::vector(vex.vvvv, self.is_wide(vector))),
                None => Value::Absent,
            },
            Operand::B(width) => match self.prefixes.vex {
                Some(vex) => Value::Text(names::gpr(vex.vvvv, self.width_bits(width, operand_bits), true)),
                None => Value::Absent,
            },
            Operand::L(vector) => {
                let register = self.reader.u8()? >> 4;
                let register = if self.long_mode { register } else { register & 0x7 };
                Value::Text(names::vector(register, self.is_wide(vector)))
            }
            _ => {
                let Some(modrm) = self.modrm else {
                    return Ok(Value::Invalid);
                };
                self.modrm_operand(operand, modrm, memory, operand_bits)
            }
        };
        Ok(value)
    }

    /// Operands addressed through ModR/M.
    fn modrm_operand(&self, operand: Operand, modrm: ModRm, memory: Option<Memory>, operand_bits: u16) -> Value {
        let rm_or_memory = |register: &'static str| memory.map_or(Value::Text(register), Value::Memory);
        match operand {
            Operand::E(width) => rm_or_memory(self.gpr(modrm.rm, self.width_bits(width, operand_bits))),
            Operand::G(width) => Value::Text(self.gpr(modrm.reg, self.width_bits(width, operand_bits))),
            Operand::R(width) => Value::Text(self.gpr(modrm.rm, self.width_bits(width, operand_bits))),
            Operand::M => memory.map_or(Value::Invalid, Value::Memory),
            Operand::C => Value::Text(CONTROL[usize::from(modrm.reg & 0xF)]),
            Operand::D => Value::Text(DEBUG[usize::from(modrm.reg & 0xF)]),
            Operand::S => SEGMENT[usize::from(modrm.reg & 0x7)].map_or(Value::Invalid, Value::Text),
            Operand::V(vector) => Value::Text(names::vector(modrm.reg, self.is_wide(vector))),
            Operand::W(vector) => rm_or_memory(names::vector(modrm.rm, self.is_wide(vector))),
            Operand::U(vector) => Value::Text(names::vector(modrm.rm, self.is_wide(vector))),
            Operand::P => Value::Text(MMX[usize::from(modrm.reg & 0x7)]),
            Operand::Q => rm_or_memory(MMX[usize::from(modrm.rm & 0x7)]),
            Operand::N => Value::Text(MMX[usize::from(modrm.rm & 0x7)]),
            Operand::StI => Value::Text(X87[usize::from(modrm.rm & 0x7)]),
            _ => Value::Invalid,
        }
    }

    fn mnemonic_text(&self, definition: &Definition, operand_bits: u16, address_size: AddressSize) -> &'static str {
        match definition.mnemonic {
            Mnemonic::Fixed(text) => text,
            Mnemonic::ByOperandSize(names) => names[size_index(operand_bits)],
            Mnemonic::ByAddressSize(names) => names[size_index(address_size.bits())],
            Mnemonic::ByW(names) => names[usize::from(self.rex.w)],
        }
    }

    fn finish(mut self, definition: Definition) -> Result<DecodedInstruction, DecodeError> {
        let operand_bits = self.operand_bits(&definition);
        let address_size = self.address_size();

        let memory = if definition.needs_modrm() {
            let modrm = self.modrm()?;
            if modrm.is_register() {
                None
            } else {
                Some(Memory::decode(&mut self.reader, modrm, self.rex, address_size, self.long_mode)?)
            }
        } else {
            None
        };
        let form_matches = definition.operands.iter().all(|operand| {
            !(operand.needs_register_form() && memory.is_some()) && !(operand.needs_memory_form() && memory.is_none())
        });
        if !form_matches {
            trace!("ModR/M form does not fit opcode {:#04x}", self.opcode);
            return self.placeholder(BAD);
        }

        let mut values = [Value::Absent; MAX_OPERANDS];
        for (value, operand) in values.iter_mut().zip(definition.operands) {
            *value = self.read_operand(*operand, memory, operand_bits, address_size)?;
        }
        if values.iter().any(|value| matches!(value, Value::Invalid)) {
            return self.placeholder(BAD);
        }

        let size = self.reader.position();
        if size > MAX_INSTRUCTION_SIZE {
            return Err(DecodeError::invalid_encoding(
                self.address,
                format!("instruction is {size} bytes long"),
            ));
        }

        self.render(&definition, &values, operand_bits, address_size, size)
            .map_err(|_| DecodeError::overflow(self.address))
    }

    fn render(
        &self,
        definition: &Definition,
        values: &[Value],
        operand_bits: u16,
        address_size: AddressSize,
        size: usize,
    ) -> Result<DecodedInstruction, fmt::Error> {
        let mut decoded = DecodedInstruction {
            size,
            ..Default::default()
        };

        let mnemonic = &mut decoded.mnemonic;
        if self.prefixes.lock {
            mnemonic.push_str("lock ")?;
        }
        // F2/F3 on anything but a string instruction is a hint, or was
        // consumed as part of the opcode.
        match self.prefixes.repeat {
            Some(repeat) if !definition.string || repeat == self.mandatory => {}
            Some(Mandatory::Repne) => mnemonic.push_str("repne ")?,
            Some(_) => mnemonic.push_str("rep ")?,
            None => {}
        }
        if self.prefixes.vex.is_some() && definition.encoding == Encoding::LegacyOrVex {
            mnemonic.push('v')?;
        }
        mnemonic.push_str(self.mnemonic_text(definition, operand_bits, address_size))?;

        let next_ip = self.address.wrapping_add(size as u64);
        let present = values.iter().filter(|value| !matches!(value, Value::Absent));
        for (index, value) in present.enumerate() {
            let out = &mut decoded.operands[index];
            if let Some(address) = self.write_value(out, *value, next_ip, operand_bits)? {
                decoded.operand_address = Some(OperandAddress {
                    address,
                    is_destination: index == 0,
                });
            }
        }
        Ok(decoded)
    }

    /// Writes one operand and returns the absolute address it names, if any.
    fn write_value(&self, out: &mut TextBuf, value: Value, next_ip: u64, operand_bits: u16) -> Result<Option<u64>, fmt::Error> {
        let segment = self.segment();
        let address = match value {
            Value::Absent | Value::Invalid => None,
            Value::Text(text) => {
                out.push_str(text)?;
                None
            }
            Value::Memory(memory) => {
                memory.write(out, segment)?;
                memory.absolute().or_else(|| memory.relative_to(next_ip))
            }
            Value::Immediate(immediate) => {
                write!(out, "{immediate:#x}")?;
                None
            }
            Value::Relative(displacement) => {
                let target = next_ip.wrapping_add(displacement as u64);
                let target = match (self.long_mode, operand_bits) {
                    (true, _) => target,
                    (false, 16) => target & mask(16),
                    (false, _) => target & mask(32),
                };
                write!(out, "{segment}[{target:#x}]")?;
                Some(target)
            }
            Value::Offset(offset) => {
                write!(out, "{segment}[{offset:#x}]")?;
                Some(offset)
            }
            Value::Far { selector, offset } => {
                write!(out, "{selector:#x}:{offset:#x}")?;
                Some(offset)
            }
            Value::String { segment, register } => {
                write!(out, "{segment}[{register}]")?;
                None
            }
        };
        Ok(address)
    }

    /// Produces a placeholder covering the bytes consumed so far.
    fn placeholder(self, name: &str) -> Result<DecodedInstruction, DecodeError> {
        let mut decoded = DecodedInstruction {
            size: self.reader.position(),
            ..Default::default()
        };
        decoded
            .mnemonic
            .set(name)
            .map_err(|_| DecodeError::overflow(self.address))?;
        Ok(decoded)
    }
}

/// Group members without operands of their own take the group slot's.
fn inherit(slot: Definition, member: Definition) -> Definition {
    Definition {
        operands: if member.operands.is_empty() {
            slot.operands
        } else {
            member.operands
        },
        default_64: slot.default_64 || member.default_64,
        ..member
    }
}

/// Names a prefix byte found where an opcode belongs.
fn stray_prefix(byte: u8) -> &'static str {
    match byte {
        0xF0 => "lock",
        0xF2 => "repne",
        0xF3 => "rep",
        0x66 => "data16",
        0x67 => "addr16",
        0x26 => "es",
        0x2E => "cs",
        0x36 => "ss",
        0x3E => "ds",
        0x64 => "fs",
        0x65 => "gs",
        _ => BAD,
    }
}

fn size_index(bits: u16) -> usize {
    match bits {
        16 => 0,
        64 => 2,
        _ => 1,
    }
}

fn mask(bits: u16) -> u64 {
    match bits {
        bits if bits >= 64 => u64::MAX,
        bits => (1u64 << bits) - 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x86(bytes: &[u8]) -> DecodedInstruction {
        decode(bytes, 0x1000, false).unwrap()
    }

    fn x64(bytes: &[u8]) -> DecodedInstruction {
        decode(bytes, 0x1000, true).unwrap()
    }

    fn text32(bytes: &[u8]) -> String {
        x86(bytes).to_string()
    }

    fn text64(bytes: &[u8]) -> String {
        x64(bytes).to_string()
    }

    #[test]
    fn test_ret_and_nop() {
        let ret = x86(&[0xC3]);
        assert_eq!(ret.mnemonic, "ret");
        assert_eq!(ret.operands().count(), 0);
        assert_eq!(ret.size, 1);
        let nop = x64(&[0x90]);
        assert_eq!(nop.mnemonic, "nop");
        assert_eq!(nop.size, 1);
    }

    #[test]
    fn test_mov_immediate() {
        let mov = x86(&[0xB8, 0x01, 0x00, 0x00, 0x00]);
        assert_eq!(mov.mnemonic, "mov");
        assert_eq!(mov.operands().collect::<Vec<_>>(), vec!["eax", "0x1"]);
        assert_eq!(mov.size, 5);
        // REX.W widens the immediate to eight bytes.
        let mov = x64(&[0x48, 0xB8, 0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11]);
        assert_eq!(mov.to_string(), "mov rax, 0x1122334455667788");
        assert_eq!(mov.size, 10);
    }

    #[test]
    fn test_register_forms() {
        assert_eq!(text32(&[0x89, 0xE5]), "mov ebp, esp");
        assert_eq!(text64(&[0x48, 0x89, 0xE5]), "mov rbp, rsp");
        assert_eq!(text64(&[0x4C, 0x89, 0xC0]), "mov rax, r8");
        assert_eq!(text64(&[0x66, 0x89, 0xC8]), "mov ax, cx");
        assert_eq!(text32(&[0x88, 0xE0]), "mov al, ah");
        assert_eq!(text64(&[0x40, 0x88, 0xE0]), "mov al, spl");
    }

    #[test]
    fn test_memory_operands() {
        assert_eq!(text64(&[0x48, 0x8B, 0x45, 0xF8]), "mov rax, [rbp-0x8]");
        assert_eq!(text32(&[0x8B, 0x44, 0x88, 0x10]), "mov eax, [eax+ecx*4+0x10]");
        assert_eq!(text32(&[0x64, 0x8B, 0x00]), "mov eax, fs:[eax]");
    }

    #[test]
    fn test_absolute_address_is_reported() {
        let mov = x86(&[0xA1, 0x00, 0x20, 0x40, 0x00]);
        assert_eq!(mov.to_string(), "mov eax, [0x402000]");
        assert_eq!(
            mov.operand_address,
            Some(OperandAddress {
                address: 0x402000,
                is_destination: false
            })
        );
        let store = x86(&[0x89, 0x05, 0x00, 0x20, 0x40, 0x00]);
        assert_eq!(store.to_string(), "mov [0x402000], eax");
        assert_eq!(store.operand_address.unwrap().is_destination, true);
    }

    #[test]
    fn test_rip_relative() {
        // lea rax, [rip+0x10]
        let lea = x64(&[0x48, 0x8D, 0x05, 0x10, 0x00, 0x00, 0x00]);
        assert_eq!(lea.to_string(), "lea rax, [rip+0x10]");
        assert_eq!(lea.size, 7);
        assert_eq!(lea.operand_address.unwrap().address, 0x1000 + 7 + 0x10);
    }

    #[test]
    fn test_relative_branches() {
        let call = x86(&[0xE8, 0x0B, 0x00, 0x00, 0x00]);
        assert_eq!(call.to_string(), "call [0x1010]");
        assert_eq!(
            call.operand_address,
            Some(OperandAddress {
                address: 0x1010,
                is_destination: true
            })
        );
        // jmp $-2 spins in place
        assert_eq!(text64(&[0xEB, 0xFE]), "jmp [0x1000]");
        assert_eq!(text32(&[0x0F, 0x84, 0x00, 0x01, 0x00, 0x00]), "je [0x1106]");
        // Wraps in 32-bit mode.
        let back = decode(&[0xE9, 0x00, 0xF0, 0xFF, 0xFF], 0x10, false).unwrap();
        assert_eq!(back.operand_address.unwrap().address, 0xFFFF_F015);
    }

    #[test]
    fn test_immediates_follow_operand_size() {
        assert_eq!(text32(&[0x83, 0xC0, 0xFF]), "add eax, 0xffffffff");
        assert_eq!(text64(&[0x48, 0x83, 0xC4, 0x08]), "add rsp, 0x8");
        assert_eq!(text64(&[0x48, 0xC7, 0xC0, 0xFF, 0xFF, 0xFF, 0xFF]), "mov rax, 0xffffffffffffffff");
        assert_eq!(text32(&[0x6B, 0xC1, 0x03]), "imul eax, ecx, 0x3");
        assert_eq!(text32(&[0xC2, 0x08, 0x00]), "ret 0x8");
        assert_eq!(text32(&[0xC8, 0x10, 0x00, 0x01]), "enter 0x10, 0x1");
    }

    #[test]
    fn test_long_mode_defaults() {
        assert_eq!(text64(&[0x55]), "push rbp");
        assert_eq!(text32(&[0x55]), "push ebp");
        assert_eq!(text64(&[0x41, 0x5F]), "pop r15");
        assert_eq!(text64(&[0xFF, 0xD0]), "call rax");
        assert_eq!(text64(&[0x9C]), "pushfq");
        assert_eq!(text64(&[0x48, 0x63, 0xC1]), "movsxd rax, ecx");
        assert_eq!(text32(&[0x63, 0xC8]), "arpl ax, cx");
    }

    #[test]
    fn test_legacy_only_opcodes_in_long_mode() {
        let bad = x64(&[0x06]);
        assert_eq!(bad.mnemonic, BAD);
        assert_eq!(bad.size, 1);
        assert_eq!(text32(&[0x06]), "push es");
        assert_eq!(text32(&[0x40]), "inc eax");
    }

    #[test]
    fn test_nop_variants() {
        assert_eq!(text64(&[0xF3, 0x90]), "pause");
        assert_eq!(text64(&[0x41, 0x90]), "xchg r8d, eax");
        assert_eq!(text64(&[0x0F, 0x1F, 0x44, 0x00, 0x00]), "nop [rax+rax]");
        assert_eq!(text64(&[0xF3, 0x0F, 0x1E, 0xFA]), "endbr64");
    }

    #[test]
    fn test_prefix_mnemonics() {
        assert_eq!(text32(&[0xF3, 0xA4]), "rep movsb es:[edi], ds:[esi]");
        assert_eq!(text64(&[0xF3, 0x48, 0xAB]), "rep stosq es:[rdi], rax");
        assert_eq!(text32(&[0xF0, 0x0F, 0xB1, 0x0A]), "lock cmpxchg [edx], ecx");
        assert_eq!(text64(&[0xF3, 0x0F, 0xB8, 0xC1]), "popcnt eax, ecx");
        // F3 on a non-string instruction is dropped.
        assert_eq!(text64(&[0xF3, 0xC3]), "ret");
    }

    #[test]
    fn test_groups() {
        assert_eq!(text32(&[0xF7, 0xD8]), "neg eax");
        assert_eq!(text32(&[0xF6, 0xC1, 0x01]), "test cl, 0x1");
        assert_eq!(text32(&[0xC1, 0xE0, 0x04]), "shl eax, 0x4");
        assert_eq!(text32(&[0xD1, 0xF8]), "sar eax, 1");
        assert_eq!(text32(&[0xD3, 0xE8]), "shr eax, cl");
        assert_eq!(text64(&[0x0F, 0x01, 0xF8]), "swapgs");
        assert_eq!(text64(&[0x0F, 0x01, 0xC1]), "vmcall");
        assert_eq!(text64(&[0x0F, 0xAE, 0xF0]), "mfence");
        assert_eq!(text64(&[0x0F, 0xBA, 0xE0, 0x03]), "bt eax, 0x3");
    }

    #[test]
    fn test_group_holes_are_placeholders() {
        // FF /7
        let bad = x86(&[0xFF, 0xF8]);
        assert_eq!(bad.mnemonic, BAD);
        assert_eq!(bad.size, 2);
        // C6 /1
        assert_eq!(x86(&[0xC6, 0xC8, 0x00]).mnemonic, BAD);
        // lea with a register operand
        assert_eq!(x86(&[0x8D, 0xC0]).mnemonic, BAD);
    }

    #[test]
    fn test_unknown_two_byte_opcode_fails() {
        let err = decode(&[0x0F, 0x04], 0x2000, false).unwrap_err();
        assert_eq!(err, DecodeError::unknown_opcode(0x2000, &[0x0F, 0x04]));
    }

    #[test]
    fn test_truncated_instruction() {
        assert_eq!(
            decode(&[0xB8, 0x01], 0x10, false).unwrap_err(),
            DecodeError::truncated(0x10, 5, 2)
        );
        assert_eq!(decode(&[], 0x10, false).unwrap_err(), DecodeError::truncated(0x10, 1, 0));
        assert_eq!(decode(&[0x0F], 0x10, true).unwrap_err(), DecodeError::truncated(0x10, 2, 1));
    }

    #[test]
    fn test_x87() {
        assert_eq!(text32(&[0xD9, 0xE8]), "fld1");
        assert_eq!(text32(&[0xD8, 0xC1]), "fadd st, st(1)");
        assert_eq!(text32(&[0xDC, 0xE9]), "fsub st(1), st");
        assert_eq!(text32(&[0xDD, 0x45, 0x08]), "fld [ebp+0x8]");
        assert_eq!(text32(&[0xDF, 0xE0]), "fstsw ax");
        assert_eq!(text32(&[0xDA, 0xE9]), "fucompp");
        assert_eq!(x86(&[0xD9, 0xD2]).mnemonic, BAD);
    }

    #[test]
    fn test_sse() {
        assert_eq!(text64(&[0x0F, 0x28, 0xC1]), "movaps xmm0, xmm1");
        assert_eq!(text64(&[0x66, 0x0F, 0xEF, 0xC0]), "pxor xmm0, xmm0");
        assert_eq!(text64(&[0x0F, 0xEF, 0xC0]), "pxor mm0, mm0");
        assert_eq!(text64(&[0xF2, 0x0F, 0x58, 0xC1]), "addsd xmm0, xmm1");
        assert_eq!(text64(&[0x66, 0x48, 0x0F, 0x6E, 0xC0]), "movq xmm0, rax");
        assert_eq!(text64(&[0x66, 0x0F, 0x3A, 0x0F, 0xC1, 0x08]), "palignr xmm0, xmm1, 0x8");
        assert_eq!(text64(&[0x66, 0x0F, 0x38, 0x00, 0xC1]), "pshufb xmm0, xmm1");
        assert_eq!(text64(&[0x66, 0x0F, 0x73, 0xD8, 0x04]), "psrldq xmm0, 0x4");
    }

    #[test]
    fn test_mandatory_prefix_is_not_operand_size() {
        // 66 selects movapd; the operands stay xmm.
        assert_eq!(text64(&[0x66, 0x0F, 0x28, 0xC1]), "movapd xmm0, xmm1");
        // 66 without an SSE form shrinks the operand.
        assert_eq!(text64(&[0x66, 0x0F, 0xAF, 0xC1]), "imul ax, cx");
    }

    #[test]
    fn test_vex() {
        // vaddps ymm0, ymm1, ymm2
        assert_eq!(text64(&[0xC5, 0xF4, 0x58, 0xC2]), "vaddps ymm0, ymm1, ymm2");
        // vpxor xmm0, xmm0, xmm0
        assert_eq!(text64(&[0xC5, 0xF9, 0xEF, 0xC0]), "vpxor xmm0, xmm0, xmm0");
        // vzeroupper
        assert_eq!(text64(&[0xC5, 0xF8, 0x77]), "vzeroupper");
        // andn eax, ebx, ecx
        assert_eq!(text64(&[0xC4, 0xE2, 0x60, 0xF2, 0xC1]), "andn eax, ebx, ecx");
        // vblendvps xmm0, xmm1, xmm2, xmm3
        assert_eq!(
            text64(&[0xC4, 0xE3, 0x71, 0x4A, 0xC2, 0x30]),
            "vblendvps xmm0, xmm1, xmm2, xmm3"
        );
    }

    #[test]
    fn test_vex_map_without_entry_fails() {
        assert!(matches!(
            decode(&[0xC4, 0xE2, 0x79, 0xFF, 0xC0], 0, true),
            Err(DecodeError::UnknownOpcode { .. })
        ));
    }

    #[test]
    fn test_xop() {
        assert_eq!(text64(&[0x8F, 0xE9, 0x78, 0x90, 0xC1]), "vprotb xmm0, xmm1, xmm0");
        // Map 8: immediate rotate, compare predicate and a register in imm8[7:4].
        let rotate = x64(&[0x8F, 0xE8, 0x78, 0xC0, 0xC1, 0x05]);
        assert_eq!(rotate.to_string(), "vprotb xmm0, xmm1, 0x5");
        assert_eq!(rotate.size, 6);
        assert_eq!(text32(&[0x8F, 0xE8, 0x78, 0xC0, 0xC1, 0x05]), "vprotb xmm0, xmm1, 0x5");
        assert_eq!(text64(&[0x8F, 0xE8, 0x70, 0xCC, 0xC2, 0x04]), "vpcomb xmm0, xmm1, xmm2, 0x4");
        assert_eq!(text64(&[0x8F, 0xE8, 0x70, 0xA3, 0xC2, 0x30]), "vpperm xmm0, xmm1, xmm2, xmm3");
        // Map 10: bextr with a 32-bit control immediate.
        let bextr = x64(&[0x8F, 0xEA, 0xF8, 0x10, 0xC1, 0x04, 0x03, 0x00, 0x00]);
        assert_eq!(bextr.to_string(), "bextr rax, rcx, 0x304");
        assert_eq!(bextr.size, 9);
    }

    #[test]
    fn test_superseded_rex_is_dropped() {
        // Only the REX next to the opcode applies.
        let cmp = x64(&[0x4B, 0x49, 0x38, 0x48, 0xBA]);
        assert_eq!(cmp.to_string(), "cmp [r8-0x46], cl");
        assert_eq!(cmp.size, 5);
    }

    #[test]
    fn test_les_outside_long_mode() {
        assert_eq!(text32(&[0xC4, 0x01]), "les eax, [ecx]");
    }

    #[test]
    fn test_control_and_segment_registers() {
        assert_eq!(text64(&[0x0F, 0x20, 0xD8]), "mov rax, cr3");
        assert_eq!(text32(&[0x0F, 0x22, 0xD8]), "mov cr3, eax");
        assert_eq!(text32(&[0x8E, 0xD8]), "mov ds, ax");
        // Segment register 6 does not exist.
        assert_eq!(x86(&[0x8E, 0xF0]).mnemonic, BAD);
    }

    #[test]
    fn test_sixteen_bit_addressing() {
        assert_eq!(text32(&[0x67, 0x8B, 0x00]), "mov eax, [bx+si]");
        assert_eq!(text32(&[0x67, 0xE3, 0x00]), "jcxz [0x1003]");
        assert_eq!(text32(&[0xE3, 0x00]), "jecxz [0x1002]");
        assert_eq!(text64(&[0xE3, 0x00]), "jrcxz [0x1002]");
    }

    #[test]
    fn test_far_pointer() {
        let call = x86(&[0x9A, 0x78, 0x56, 0x34, 0x12, 0x08, 0x00]);
        assert_eq!(call.to_string(), "callf 0x8:0x12345678");
        assert_eq!(call.size, 7);
    }

    #[test]
    fn test_stray_prefix() {
        // Six operand-size prefixes: the sixth is left over.
        let stray = x86(&[0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x90]);
        assert_eq!(stray.mnemonic, "data16");
        assert_eq!(stray.size, 6);
    }

    #[test]
    fn test_overlong_instruction() {
        // Five segment overrides, REX.W, then mov with SIB, disp32 and imm32.
        let long = [0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x48, 0xC7, 0x84, 0x00, 0, 0, 0, 0, 1, 0, 0, 0];
        assert!(matches!(decode(&long, 0, true), Err(DecodeError::InvalidEncoding { .. })));
    }
}
