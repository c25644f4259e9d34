//! Immediate field assembly and expansion.

/// Sign-extends the low `bits` bits of `value`.
#[inline]
pub fn sign_extend(value: u32, bits: u32) -> i32 {
    let shift = 32 - bits;
    ((value << shift) as i32) >> shift
}

/// Rotates an 8-bit data-processing immediate right by twice `rotate`.
#[inline]
pub fn rotated_immediate(imm8: u32, rotate: u32) -> u32 {
    imm8.rotate_right(rotate * 2)
}

/// `imm12:imm4` as used by `bkpt`, `hvc`, `smc` and `udf`.
#[inline]
pub fn service_immediate(insn: u32) -> u32 {
    ((insn & 0x000F_FF00) >> 4) | (insn & 0x0000_000F)
}

/// The split 8-bit immediate of a VFP `vmov` (immediate).
#[inline]
pub fn vfp_imm8(insn: u32) -> u32 {
    ((insn & 0x000F_0000) >> 12) | (insn & 0x0000_000F)
}

/// Expands a VFP immediate to single precision bits.
///
/// `a:NOT(b):bbbbb:cdefgh:Zeros(19)`
pub fn vfp_expand_imm32(imm8: u32) -> u32 {
    let a = (imm8 >> 7) & 1;
    let b = (imm8 >> 6) & 1;
    let cdefgh = imm8 & 0x3F;
    let b5 = if b != 0 { 0x1F } else { 0 };
    (a << 31) | ((b ^ 1) << 30) | (b5 << 25) | (cdefgh << 19)
}

/// Expands a VFP immediate to double precision bits.
///
/// `a:NOT(b):bbbbbbbb:cdefgh:Zeros(48)`
pub fn vfp_expand_imm64(imm8: u32) -> u64 {
    let a = u64::from((imm8 >> 7) & 1);
    let b = u64::from((imm8 >> 6) & 1);
    let cdefgh = u64::from(imm8 & 0x3F);
    let b8 = if b != 0 { 0xFF } else { 0 };
    (a << 63) | ((b ^ 1) << 62) | (b8 << 54) | (cdefgh << 48)
}

/// The scattered `i:imm3:imm4` immediate of an ARM Advanced SIMD
/// one-register instruction.
#[inline]
pub fn simd_imm8(insn: u32) -> u32 {
    ((insn & 0x0100_0000) >> 17) | ((insn & 0x0007_0000) >> 12) | (insn & 0x0000_000F)
}

/// Replicates each bit of `imm8` across a byte of a 64-bit value.
pub fn simd_expand_imm64(imm8: u32) -> u64 {
    (0..8)
        .filter(|bit| imm8 & (1 << bit) != 0)
        .fold(0u64, |acc, bit| acc | (0xFFu64 << (bit * 8)))
}

/// Expands the `i:imm3:imm8` modified immediate of a Thumb-2 data
/// processing instruction.
///
/// With the top two bits clear the byte is replicated into the pattern
/// `imm12<9:8>` selects; otherwise `1:imm12<6:0>` is rotated right by
/// `imm12<11:7>`.
pub fn thumb_expand_immediate(imm12: u32) -> u32 {
    let imm8 = imm12 & 0xFF;
    if imm12 >> 10 == 0 {
        match (imm12 >> 8) & 0x3 {
            0 => imm8,
            1 => (imm8 << 16) | imm8,
            2 => (imm8 << 24) | (imm8 << 8),
            _ => imm8 * 0x0101_0101,
        }
    } else {
        (0x80 | (imm12 & 0x7F)).rotate_right(imm12 >> 7)
    }
}
