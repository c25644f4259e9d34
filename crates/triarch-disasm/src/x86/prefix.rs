//! x86 prefix parsing.

use crate::DecodeError;

/// Most legacy prefixes accepted in front of one instruction.
pub(crate) const MAX_LEGACY_PREFIXES: usize = 5;

/// Segment override prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment {
    Es,
    Cs,
    Ss,
    Ds,
    Fs,
    Gs,
}

impl Segment {
    fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0x26 => Self::Es,
            0x2E => Self::Cs,
            0x36 => Self::Ss,
            0x3E => Self::Ds,
            0x64 => Self::Fs,
            0x65 => Self::Gs,
            _ => return None,
        })
    }

    /// Override text printed before a memory operand. Long mode ignores
    /// every override except `fs` and `gs`.
    pub(crate) fn prefix_text(self, long_mode: bool) -> &'static str {
        match self {
            Self::Fs => "fs:",
            Self::Gs => "gs:",
            _ if long_mode => "",
            Self::Es => "es:",
            Self::Cs => "cs:",
            Self::Ss => "ss:",
            Self::Ds => "ds:",
        }
    }
}

/// The prefix that selects between encodings sharing an escaped opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mandatory {
    None,
    OperandSize,
    Rep,
    Repne,
}

impl Mandatory {
    fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0x66 => Self::OperandSize,
            0xF3 => Self::Rep,
            0xF2 => Self::Repne,
            _ => return None,
        })
    }

    /// Decodes the two-bit `pp` field of a VEX or XOP prefix.
    pub(crate) fn from_pp(pp: u8) -> Self {
        match pp & 0x3 {
            0 => Self::None,
            1 => Self::OperandSize,
            2 => Self::Rep,
            _ => Self::Repne,
        }
    }
}

/// REX prefix fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Rex {
    /// REX.W - 64-bit operand size
    pub w: bool,
    /// REX.R - extends ModR/M reg field
    pub r: bool,
    /// REX.X - extends SIB index field
    pub x: bool,
    /// REX.B - extends ModR/M r/m, SIB base, or opcode reg
    pub b: bool,
}

impl Rex {
    /// Parse a REX byte.
    pub fn from_byte(byte: u8) -> Self {
        Self {
            w: byte & 0x08 != 0,
            r: byte & 0x04 != 0,
            x: byte & 0x02 != 0,
            b: byte & 0x01 != 0,
        }
    }
}

/// A VEX or XOP prefix, normalized to one shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Vex {
    /// Register extension bits, already un-inverted.
    pub rex: Rex,
    /// Extra source register, already un-inverted.
    pub vvvv: u8,
    /// 256-bit vector length.
    pub l: bool,
    /// Implied mandatory prefix.
    pub pp: u8,
    /// Opcode map: 1-3 for VEX (0F, 0F38, 0F3A), 8-10 for XOP.
    pub map: u8,
}

impl Vex {
    /// Parse a 2-byte VEX prefix (0xC5 pp).
    pub fn from_2byte(byte1: u8) -> Self {
        // C5 RvvvvLpp
        Self {
            rex: Rex {
                r: byte1 & 0x80 == 0,
                ..Rex::default()
            },
            vvvv: (!byte1 >> 3) & 0x0F,
            l: byte1 & 0x04 != 0,
            pp: byte1 & 0x03,
            map: 1,
        }
    }

    /// Parse a 3-byte VEX (0xC4) or XOP (0x8F) prefix.
    pub fn from_3byte(byte1: u8, byte2: u8) -> Self {
        // C4 RXBmmmmm WvvvvLpp
        Self {
            rex: Rex {
                w: byte2 & 0x80 != 0,
                r: byte1 & 0x80 == 0,
                x: byte1 & 0x40 == 0,
                b: byte1 & 0x20 == 0,
            },
            vvvv: (!byte2 >> 3) & 0x0F,
            l: byte2 & 0x04 != 0,
            pp: byte2 & 0x03,
            map: byte1 & 0x1F,
        }
    }
}

/// Everything in front of the opcode byte.
#[derive(Debug, Clone, Default)]
pub(crate) struct Prefixes {
    /// Legacy prefix bytes in stream order.
    legacy: [u8; MAX_LEGACY_PREFIXES],
    legacy_count: usize,
    /// LOCK prefix (0xF0)
    pub lock: bool,
    /// Last of REP (0xF3) or REPNE (0xF2), if any.
    pub repeat: Option<Mandatory>,
    /// Segment override
    pub segment: Option<Segment>,
    /// Operand size override (0x66)
    pub operand_size: bool,
    /// Address size override (0x67)
    pub address_size: bool,
    /// REX prefix, x64 only
    pub rex: Option<Rex>,
    /// VEX or XOP prefix
    pub vex: Option<Vex>,
}

impl Prefixes {
    /// Parses the prefix run at the start of `bytes`. Returns the prefixes
    /// and the number of bytes consumed.
    pub fn parse(bytes: &[u8], long_mode: bool, address: u64) -> Result<(Self, usize), DecodeError> {
        let mut prefixes = Self::default();
        let mut offset = 0;

        while prefixes.legacy_count < MAX_LEGACY_PREFIXES {
            let Some(&byte) = bytes.get(offset) else {
                break;
            };
            match byte {
                0xF0 => prefixes.lock = true,
                0xF2 => prefixes.repeat = Some(Mandatory::Repne),
                0xF3 => prefixes.repeat = Some(Mandatory::Rep),
                0x66 => prefixes.operand_size = true,
                0x67 => prefixes.address_size = true,
                _ => match Segment::from_byte(byte) {
                    Some(segment) => prefixes.segment = Some(segment),
                    None => break,
                },
            }
            prefixes.legacy[prefixes.legacy_count] = byte;
            prefixes.legacy_count += 1;
            offset += 1;
        }

        // REX must immediately precede the opcode; an earlier REX is ignored.
        if long_mode {
            while let Some(&byte) = bytes.get(offset).filter(|&&byte| byte & 0xF0 == 0x40) {
                prefixes.rex = Some(Rex::from_byte(byte));
                offset += 1;
            }
            if prefixes.rex.is_some() {
                return Ok((prefixes, offset));
            }
        }

        let Some(&lead) = bytes.get(offset) else {
            return Ok((prefixes, offset));
        };
        let next = bytes.get(offset + 1).copied();
        let is_vex = match (lead, next) {
            // Outside long mode these are les/lds unless ModR/M.mod is 11.
            (0xC4 | 0xC5, Some(next)) => long_mode || next >= 0xC0,
            (0xC4 | 0xC5, None) => long_mode,
            // pop Ev only uses map-select values below 8.
            (0x8F, Some(next)) => next & 0x1F >= 8,
            _ => false,
        };
        if !is_vex {
            return Ok((prefixes, offset));
        }

        let needed = if lead == 0xC5 { 2 } else { 3 };
        let Some(body) = bytes.get(offset + 1..offset + needed) else {
            return Err(DecodeError::truncated(address, offset + needed, bytes.len()));
        };
        let mut vex = match body {
            [byte1] => Vex::from_2byte(*byte1),
            [byte1, byte2, ..] => Vex::from_3byte(*byte1, *byte2),
            [] => return Err(DecodeError::truncated(address, offset + needed, bytes.len())),
        };
        if !long_mode {
            // Only W survives outside long mode.
            vex.rex = Rex {
                w: vex.rex.w,
                ..Rex::default()
            };
            vex.vvvv &= 0x7;
        }
        prefixes.vex = Some(vex);
        offset += needed;
        Ok((prefixes, offset))
    }

    /// Candidate mandatory prefixes for an escaped opcode, in stream order.
    pub fn mandatory_candidates(&self) -> impl Iterator<Item = Mandatory> + '_ {
        self.legacy[..self.legacy_count]
            .iter()
            .filter_map(|&byte| Mandatory::from_byte(byte))
    }

    /// Returns the REX bits in effect, from REX or VEX.
    pub fn effective_rex(&self) -> Rex {
        match self.vex {
            Some(vex) => vex.rex,
            None => self.rex.unwrap_or_default(),
        }
    }

    /// Returns whether a REX byte was present (this renames the 8-bit
    /// registers 4-7).
    pub fn has_rex(&self) -> bool {
        self.rex.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(bytes: &[u8], long_mode: bool) -> (Prefixes, usize) {
        Prefixes::parse(bytes, long_mode, 0).unwrap()
    }

    #[test]
    fn test_legacy_prefixes() {
        let (prefixes, len) = parse(&[0xF0, 0x66, 0x64, 0x01, 0x00], false);
        assert_eq!(len, 3);
        assert!(prefixes.lock);
        assert!(prefixes.operand_size);
        assert_eq!(prefixes.segment, Some(Segment::Fs));
        assert_eq!(prefixes.mandatory_candidates().collect::<Vec<_>>(), vec![Mandatory::OperandSize]);
    }

    #[test]
    fn test_prefix_run_is_capped() {
        let (prefixes, len) = parse(&[0x66; 8], false);
        assert_eq!(len, MAX_LEGACY_PREFIXES);
        assert!(prefixes.operand_size);
    }

    #[test]
    fn test_rex_only_in_long_mode() {
        let (prefixes, len) = parse(&[0x48, 0x89, 0xC8], true);
        assert_eq!(len, 1);
        assert!(prefixes.effective_rex().w);

        let (prefixes, len) = parse(&[0x48, 0x89, 0xC8], false);
        assert_eq!(len, 0);
        assert!(prefixes.rex.is_none());
    }

    #[test]
    fn test_two_byte_vex() {
        // vaddps ymm0, ymm1, ymm2: C5 F4 58 C2
        let (prefixes, len) = parse(&[0xC5, 0xF4, 0x58, 0xC2], true);
        assert_eq!(len, 2);
        let vex = prefixes.vex.unwrap();
        assert_eq!(vex.vvvv, 1);
        assert!(vex.l);
        assert_eq!(vex.map, 1);
        assert!(!vex.rex.r);
    }

    #[test]
    fn test_three_byte_vex() {
        // C4 62 7D ..: R inverted clear (REX.R), map 2, W0, vvvv 0, L1, pp 66
        let (prefixes, len) = parse(&[0xC4, 0x62, 0x7D, 0x18, 0x00], true);
        assert_eq!(len, 3);
        let vex = prefixes.vex.unwrap();
        assert!(vex.rex.r);
        assert!(!vex.rex.b);
        assert_eq!(vex.map, 2);
        assert_eq!(Mandatory::from_pp(vex.pp), Mandatory::OperandSize);
    }

    #[test]
    fn test_les_outside_long_mode() {
        // les eax, [ecx]: ModR/M.mod is not 11
        let (prefixes, len) = parse(&[0xC4, 0x01], false);
        assert_eq!(len, 0);
        assert!(prefixes.vex.is_none());
    }

    #[test]
    fn test_last_rex_wins() {
        let (prefixes, len) = parse(&[0x4B, 0x49, 0x38, 0x48, 0xBA], true);
        assert_eq!(len, 2);
        let rex = prefixes.rex.unwrap();
        assert!(rex.w && rex.b);
        assert!(!rex.x);
    }

    #[test]
    fn test_xop_versus_pop() {
        let (prefixes, _) = parse(&[0x8F, 0xC0], true);
        assert!(prefixes.vex.is_none());
        let (prefixes, len) = parse(&[0x8F, 0xE9, 0x78, 0x90, 0xC1], true);
        assert_eq!(len, 3);
        assert_eq!(prefixes.vex.unwrap().map, 9);
    }

    #[test]
    fn test_lone_vex_lead_in_long_mode() {
        assert_eq!(
            Prefixes::parse(&[0xC5], true, 0x10).unwrap_err(),
            DecodeError::truncated(0x10, 2, 1)
        );
        let (prefixes, len) = parse(&[0xC5], false);
        assert_eq!(len, 0);
        assert!(prefixes.vex.is_none());
    }

    #[test]
    fn test_truncated_vex() {
        assert_eq!(
            Prefixes::parse(&[0xC4, 0xE2], true, 0x10).unwrap_err(),
            DecodeError::truncated(0x10, 3, 2)
        );
    }
}
