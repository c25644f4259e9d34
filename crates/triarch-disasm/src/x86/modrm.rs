//! ModR/M and SIB byte decoding.

use std::fmt;

use super::names::{REG16, REG32, REG64};
use super::prefix::Rex;
use super::reader::Reader;
use crate::DecodeError;

/// Decoded ModR/M byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ModRm {
    /// The raw byte.
    pub byte: u8,
    /// Mod field (2 bits)
    pub mode: u8,
    /// Reg field (3 bits, extended by REX.R)
    pub reg: u8,
    /// R/M field (3 bits, extended by REX.B)
    pub rm: u8,
}

impl ModRm {
    /// Parse a ModR/M byte with REX extension.
    pub fn parse(byte: u8, rex: Rex) -> Self {
        Self {
            byte,
            mode: (byte >> 6) & 0x3,
            reg: ((byte >> 3) & 0x7) | (u8::from(rex.r) << 3),
            rm: (byte & 0x7) | (u8::from(rex.b) << 3),
        }
    }

    /// Returns true if this ModR/M encodes a register operand (mod=11).
    pub fn is_register(&self) -> bool {
        self.mode == 0b11
    }
}

/// Decoded SIB byte.
#[derive(Debug, Clone, Copy)]
struct Sib {
    /// Scale (2 bits) - actual scale is 1 << scale
    scale: u8,
    /// Index register (3 bits, extended by REX.X)
    index: u8,
    /// Base register (3 bits, extended by REX.B)
    base: u8,
}

impl Sib {
    fn parse(byte: u8, rex: Rex) -> Self {
        Self {
            scale: (byte >> 6) & 0x3,
            index: ((byte >> 3) & 0x7) | (u8::from(rex.x) << 3),
            base: (byte & 0x7) | (u8::from(rex.b) << 3),
        }
    }
}

/// Effective address width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AddressSize {
    Bits16,
    Bits32,
    Bits64,
}

impl AddressSize {
    pub(crate) fn bits(self) -> u16 {
        match self {
            Self::Bits16 => 16,
            Self::Bits32 => 32,
            Self::Bits64 => 64,
        }
    }

    /// Names a base or index register at this width.
    pub(crate) fn register(self, number: u8) -> &'static str {
        let index = usize::from(number & 0xF);
        match self {
            Self::Bits16 => REG16[index],
            Self::Bits32 => REG32[index],
            Self::Bits64 => REG64[index],
        }
    }

    fn mask(self) -> u64 {
        match self {
            Self::Bits16 => 0xFFFF,
            Self::Bits32 => 0xFFFF_FFFF,
            Self::Bits64 => u64::MAX,
        }
    }
}

/// 16-bit base/index pairs by ModR/M.rm.
const PAIRS_16: [(&str, Option<&str>); 8] = [
    ("bx", Some("si")),
    ("bx", Some("di")),
    ("bp", Some("si")),
    ("bp", Some("di")),
    ("si", None),
    ("di", None),
    ("bp", None),
    ("bx", None),
];

/// A memory operand addressed through ModR/M.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Memory {
    pub base: Option<&'static str>,
    /// Index register and scale factor.
    pub index: Option<(&'static str, u8)>,
    pub displacement: i64,
    /// Displacement is relative to the next instruction.
    pub rip_relative: bool,
    size: AddressSize,
}

impl Memory {
    /// Decodes the memory form of `modrm`, consuming any SIB byte and
    /// displacement.
    pub(crate) fn decode(
        reader: &mut Reader<'_>,
        modrm: ModRm,
        rex: Rex,
        size: AddressSize,
        long_mode: bool,
    ) -> Result<Self, DecodeError> {
        if size == AddressSize::Bits16 {
            return Self::decode_16(reader, modrm, size);
        }

        let mut memory = Self {
            base: None,
            index: None,
            displacement: 0,
            rip_relative: false,
            size,
        };
        let mut disp_size = match modrm.mode {
            0b01 => 1,
            0b10 => 4,
            _ => 0,
        };

        if modrm.rm & 0x7 == 0x4 {
            let sib = Sib::parse(reader.u8()?, rex);
            if sib.index != 0x4 {
                memory.index = Some((size.register(sib.index), 1 << sib.scale));
            }
            if sib.base & 0x7 == 0x5 && modrm.mode == 0b00 {
                disp_size = 4;
            } else {
                memory.base = Some(size.register(sib.base));
            }
        } else if modrm.rm & 0x7 == 0x5 && modrm.mode == 0b00 {
            // Long mode turns the absolute form into RIP-relative.
            memory.rip_relative = long_mode;
            disp_size = 4;
        } else {
            memory.base = Some(size.register(modrm.rm));
        }

        if disp_size > 0 {
            memory.displacement = reader.signed(disp_size)?;
        }
        Ok(memory)
    }

    fn decode_16(reader: &mut Reader<'_>, modrm: ModRm, size: AddressSize) -> Result<Self, DecodeError> {
        let (base, index) = PAIRS_16[usize::from(modrm.rm & 0x7)];
        let mut memory = Self {
            base: Some(base),
            index: index.map(|index| (index, 1)),
            displacement: 0,
            rip_relative: false,
            size,
        };
        match modrm.mode {
            0b00 if modrm.rm & 0x7 == 0x6 => {
                memory.base = None;
                memory.displacement = i64::from(reader.u16()?);
            }
            0b01 => memory.displacement = reader.signed(1)?,
            0b10 => memory.displacement = reader.signed(2)?,
            _ => {}
        }
        Ok(memory)
    }

    /// Returns the absolute address for a base- and index-free operand.
    pub(crate) fn absolute(&self) -> Option<u64> {
        (self.base.is_none() && self.index.is_none() && !self.rip_relative)
            .then(|| self.displacement as u64 & self.size.mask())
    }

    /// Returns the address a RIP-relative operand names once the
    /// instruction length is known.
    pub(crate) fn relative_to(&self, next_ip: u64) -> Option<u64> {
        self.rip_relative
            .then(|| next_ip.wrapping_add(self.displacement as u64) & self.size.mask())
    }

    /// Writes the operand with the given segment override text.
    pub(crate) fn write(&self, out: &mut impl fmt::Write, segment: &str) -> fmt::Result {
        write!(out, "{segment}[")?;
        if let Some(address) = self.absolute() {
            return write!(out, "{address:#x}]");
        }

        let mut empty = true;
        if self.rip_relative {
            out.write_str(if self.size == AddressSize::Bits64 { "rip" } else { "eip" })?;
            empty = false;
        }
        if let Some(base) = self.base {
            out.write_str(base)?;
            empty = false;
        }
        if let Some((index, scale)) = self.index {
            if !empty {
                out.write_char('+')?;
            }
            out.write_str(index)?;
            if scale > 1 {
                write!(out, "*{scale}")?;
            }
            empty = false;
        }
        match self.displacement {
            0 if !empty => {}
            disp if disp < 0 => write!(out, "-{:#x}", disp.unsigned_abs())?,
            disp if empty => write!(out, "{disp:#x}")?,
            disp => write!(out, "+{disp:#x}")?,
        }
        out.write_char(']')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory(bytes: &[u8], rex: Rex, size: AddressSize, long_mode: bool) -> (String, Memory, usize) {
        let mut reader = Reader::new(bytes, 0);
        let modrm = ModRm::parse(reader.u8().unwrap(), rex);
        let memory = Memory::decode(&mut reader, modrm, rex, size, long_mode).unwrap();
        let mut text = String::new();
        memory.write(&mut text, "").unwrap();
        (text, memory, reader.position())
    }

    #[test]
    fn test_modrm_fields() {
        let modrm = ModRm::parse(0xD8, Rex { r: true, ..Rex::default() });
        assert_eq!(modrm.mode, 3);
        assert_eq!(modrm.reg, 11);
        assert_eq!(modrm.rm, 0);
        assert!(modrm.is_register());
    }

    #[test]
    fn test_base_plus_disp8() {
        // [rbp-0x8]
        let (text, _, len) = memory(&[0x45, 0xF8], Rex::default(), AddressSize::Bits64, true);
        assert_eq!(text, "[rbp-0x8]");
        assert_eq!(len, 2);
    }

    #[test]
    fn test_sib_with_scale() {
        // [rax+rcx*4+0x10]
        let (text, _, len) = memory(&[0x44, 0x88, 0x10], Rex::default(), AddressSize::Bits64, true);
        assert_eq!(text, "[rax+rcx*4+0x10]");
        assert_eq!(len, 3);
    }

    #[test]
    fn test_sib_rex_extensions() {
        let rex = Rex { x: true, b: true, ..Rex::default() };
        let (text, _, _) = memory(&[0x04, 0x0C], rex, AddressSize::Bits64, true);
        assert_eq!(text, "[r12+r9]");
    }

    #[test]
    fn test_sib_without_base() {
        // [rcx*8+0x1000]
        let (text, memory, len) =
            memory(&[0x04, 0xCD, 0x00, 0x10, 0x00, 0x00], Rex::default(), AddressSize::Bits64, true);
        assert_eq!(text, "[rcx*8+0x1000]");
        assert_eq!(memory.absolute(), None);
        assert_eq!(len, 6);
    }

    #[test]
    fn test_rip_relative() {
        let (text, memory, _) = memory(&[0x05, 0x10, 0x00, 0x00, 0x00], Rex::default(), AddressSize::Bits64, true);
        assert_eq!(text, "[rip+0x10]");
        assert_eq!(memory.relative_to(0x1006), Some(0x1016));
        assert_eq!(memory.absolute(), None);
    }

    #[test]
    fn test_absolute_outside_long_mode() {
        let (text, memory, _) = memory(&[0x05, 0x00, 0x20, 0x40, 0x00], Rex::default(), AddressSize::Bits32, false);
        assert_eq!(text, "[0x402000]");
        assert_eq!(memory.absolute(), Some(0x402000));
    }

    #[test]
    fn test_sixteen_bit_pairs() {
        let (text, _, len) = memory(&[0x40, 0x02], Rex::default(), AddressSize::Bits16, false);
        assert_eq!(text, "[bx+si+0x2]");
        assert_eq!(len, 2);
        let (text, memory, len) = memory(&[0x06, 0x34, 0x12], Rex::default(), AddressSize::Bits16, false);
        assert_eq!(text, "[0x1234]");
        assert_eq!(memory.absolute(), Some(0x1234));
        assert_eq!(len, 3);
    }

    #[test]
    fn test_segment_text() {
        let mut reader = Reader::new(&[0x00], 0);
        let modrm = ModRm::parse(reader.u8().unwrap(), Rex::default());
        let memory = Memory::decode(&mut reader, modrm, Rex::default(), AddressSize::Bits32, false).unwrap();
        let mut text = String::new();
        memory.write(&mut text, "fs:").unwrap();
        assert_eq!(text, "fs:[eax]");
    }

    #[test]
    fn test_truncated_displacement() {
        let mut reader = Reader::new(&[0x80, 0x00], 0x20);
        let modrm = ModRm::parse(reader.u8().unwrap(), Rex::default());
        assert_eq!(
            Memory::decode(&mut reader, modrm, Rex::default(), AddressSize::Bits32, false).unwrap_err(),
            DecodeError::truncated(0x20, 5, 2)
        );
    }
}
