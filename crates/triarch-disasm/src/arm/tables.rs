//! The ARM decode tree.
//!
//! Each table is scanned in order and the first match wins, so narrow
//! patterns sit ahead of the broader ones they carve out of.

use std::fmt;

use triarch_core::DecodeEntry;

use super::*;

type Entry = DecodeEntry<ArmContext>;

pub(super) static TOP_LEVEL: &[Entry] = &[
    Entry::new(0xF000_0000, 0xF000_0000, unconditional),
    Entry::new(0x0C00_0000, 0x0000_0000, data_processing_and_misc),
    Entry::new(0x0E00_0010, 0x0600_0010, media_instructions),
    Entry::new(0x0C00_0000, 0x0400_0000, load_store),
    Entry::new(0x0C00_0000, 0x0800_0000, branch_and_block),
    Entry::new(0x0C00_0000, 0x0C00_0000, coprocessor_and_supervisor),
];

fn unconditional(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    route(ctx, insn, UNCONDITIONAL)
}

fn data_processing_and_misc(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    route(ctx, insn, DATA_PROCESSING_AND_MISC)
}

fn media_instructions(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    route(ctx, insn, MEDIA)
}

fn branch_and_block(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    route(ctx, insn, BRANCH_AND_BLOCK)
}

fn coprocessor_and_supervisor(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    route(ctx, insn, COPROCESSOR_AND_SUPERVISOR)
}

fn memory_hints(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    route(ctx, insn, MEMORY_HINTS)
}

fn simd_data_processing(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    route(ctx, insn, SIMD_DATA_PROCESSING)
}

fn simd_element_load_store(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    route(ctx, insn, SIMD_ELEMENT_LOAD_STORE)
}

pub(crate) fn floating_point(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    route(ctx, insn, FLOATING_POINT)
}

pub(crate) fn simd_small_transfers(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    route(ctx, insn, SIMD_SMALL_TRANSFERS)
}

pub(crate) fn simd_load_store(ctx: &mut ArmContext, insn: u32) -> fmt::Result {
    route(ctx, insn, SIMD_LOAD_STORE)
}

/// Condition field `0b1111`.
static UNCONDITIONAL: &[Entry] = &[
    Entry::new(0x0800_0000, 0x0000_0000, memory_hints),
    Entry::new(0x0E50_0000, 0x0840_0000, store_return_state),
    Entry::new(0x0E50_0000, 0x0810_0000, return_from_exception),
    Entry::new(0x0E00_0000, 0x0A00_0000, branch),
    Entry::new(0x0F00_0010, 0x0E00_0000, coprocessor_move),
    Entry::new(0x0000_00E0, 0x0000_00A0, undefined),
    Entry::new(0x0FE0_0000, 0x0C40_0000, coprocessor_move_two),
    Entry::new(0x0FA0_0000, 0x0C00_0000, undefined),
    Entry::new(0x0E00_0000, 0x0C00_0000, coprocessor_load_store),
    Entry::new(0x0F10_0010, 0x0E00_0010, coprocessor_move),
    Entry::new(0x0F10_0010, 0x0E10_0010, coprocessor_move),
];

/// Memory hints, barriers and the Advanced SIMD space.
pub(super) static MEMORY_HINTS: &[Entry] = &[
    Entry::new(0x07F1_0020, 0x0100_0000, change_processor_state),
    Entry::new(0x07F1_00F0, 0x0101_0000, set_endianness),
    Entry::new(0x0600_0000, 0x0200_0000, simd_data_processing),
    Entry::new(0x0710_0000, 0x0400_0000, simd_element_load_store),
    Entry::new(0x0770_0000, 0x0410_0000, nop),
    Entry::new(0x0770_0000, 0x0450_0000, preload),
    Entry::new(0x0730_0000, 0x0430_0000, unpredictable),
    Entry::new(0x077F_0000, 0x051F_0000, unpredictable),
    Entry::new(0x0730_0000, 0x0510_0000, preload),
    Entry::new(0x07F0_0000, 0x0530_0000, unpredictable),
    Entry::new(0x07F0_00F0, 0x0570_0000, unpredictable),
    Entry::new(0x07F0_00E0, 0x0570_0020, unpredictable),
    Entry::new(0x07F0_00F0, 0x0570_0070, unpredictable),
    Entry::new(0x07F0_0080, 0x0570_0080, unpredictable),
    Entry::new(0x07F0_00F0, 0x0570_0010, clear_exclusive),
    Entry::new(0x07F0_00F0, 0x0570_0040, data_synchronization_barrier),
    Entry::new(0x07F0_00F0, 0x0570_0050, data_memory_barrier),
    Entry::new(0x07F0_00F0, 0x0570_0060, instruction_synchronization_barrier),
    Entry::new(0x07B0_0000, 0x05B0_0000, unpredictable),
    Entry::new(0x0770_0010, 0x0610_0000, nop),
    Entry::new(0x0770_0010, 0x0650_0000, preload),
    Entry::new(0x0730_0010, 0x0710_0000, preload),
    Entry::new(0x0630_0010, 0x0630_0000, unpredictable),
    Entry::new(0x07F0_00F0, 0x07F0_00F0, undefined),
];

pub(crate) static SIMD_DATA_PROCESSING: &[Entry] = &[
    Entry::new(0x0080_0000, 0x0000_0000, three_same),
    Entry::new(0x00B8_0090, 0x0080_0010, one_register),
    Entry::new(0x0080_0010, 0x0080_0010, two_registers_shift),
    Entry::new(0x00A0_0050, 0x0080_0000, three_different),
    Entry::new(0x00B0_0050, 0x00A0_0000, three_different),
    Entry::new(0x00A0_0050, 0x0080_0040, two_registers_scalar),
    Entry::new(0x00B0_0050, 0x00A0_0040, two_registers_scalar),
    Entry::new(0x01B0_0010, 0x00B0_0000, vector_extract),
    Entry::new(0x01B0_0810, 0x01B0_0000, two_registers_misc),
    Entry::new(0x01B0_0C10, 0x01B0_0800, table_lookup),
    Entry::new(0x01B0_0F90, 0x01B0_0C00, duplicate_scalar),
];

pub(crate) static SIMD_ELEMENT_LOAD_STORE: &[Entry] = &[
    Entry::new(0x00A0_0C00, 0x00A0_0C00, element_all_lanes),
    Entry::new(0x0080_0000, 0x0080_0000, element_single),
    Entry::new(0x0080_0000, 0x0000_0000, element_multiple),
];

/// Data processing, multiplies, synchronization, extra load/stores and
/// the miscellaneous space.
static DATA_PROCESSING_AND_MISC: &[Entry] = &[
    Entry::new(0x0390_0080, 0x0100_0000, miscellaneous),
    Entry::new(0x0390_0090, 0x0100_0080, multiply),
    Entry::new(0x0200_0010, 0x0000_0000, data_processing),
    Entry::new(0x0200_0090, 0x0000_0010, data_processing),
    Entry::new(0x0300_00F0, 0x0000_0090, multiply),
    Entry::new(0x0300_00F0, 0x0100_0090, synchronization),
    Entry::new(0x0320_00F0, 0x0020_00B0, extra_load_store),
    Entry::new(0x0320_00D0, 0x0020_00D0, extra_load_store),
    Entry::new(0x0200_00F0, 0x0000_00B0, extra_load_store),
    Entry::new(0x0200_00D0, 0x0000_00D0, extra_load_store),
    Entry::new(0x03F0_0000, 0x0300_0000, load_immediate),
    Entry::new(0x03F0_0000, 0x0340_0000, load_immediate),
    Entry::new(0x03B0_0000, 0x0320_0000, msr_immediate_and_hints),
    Entry::new(0x0200_0000, 0x0200_0000, data_processing),
];

static MEDIA: &[Entry] = &[
    Entry::new(0x0180_0000, 0x0000_0000, parallel_arithmetic),
    Entry::new(0x0180_0000, 0x0080_0000, packing),
    Entry::new(0x0180_0000, 0x0100_0000, multiply),
    Entry::new(0x01F0_00E0, 0x0180_0000, sum_of_absolute_differences),
    Entry::new(0x01A0_0060, 0x01A0_0040, bit_field),
    Entry::new(0x01E0_0060, 0x01C0_0000, bit_field),
    Entry::new(0xF1F0_00E0, 0xE1F0_00E0, permanently_undefined),
];

pub(super) static PACKING: &[Entry] = &[
    Entry::new(0x0000_00E0, 0x0000_0060, extend_with_rotation),
    Entry::new(0x0070_00E0, 0x0000_00A0, select_bytes),
    Entry::new(0x0070_0020, 0x0000_0000, pack_halfword),
    Entry::new(0x0030_0060, 0x0030_0020, reverse),
    Entry::new(0x0030_00E0, 0x0020_0020, saturate),
    Entry::new(0x0020_0020, 0x0020_0000, saturate),
];

static BRANCH_AND_BLOCK: &[Entry] = &[
    Entry::new(0x0200_0000, 0x0200_0000, branch),
    Entry::new(0x0200_0000, 0x0000_0000, load_store_multiple),
];

/// Coprocessor transfers, VFP and Advanced SIMD register transfers and
/// `svc`.
pub(super) static COPROCESSOR_AND_SUPERVISOR: &[Entry] = &[
    Entry::new(0x03E0_0000, 0x0000_0000, undefined),
    Entry::new(0x0300_0000, 0x0300_0000, supervisor_call),
    Entry::new(0x03E0_0E00, 0x0040_0A00, simd_64bit_transfer),
    Entry::new(0x0200_0E00, 0x0000_0A00, simd_load_store),
    Entry::new(0x0300_0E10, 0x0200_0A00, floating_point),
    Entry::new(0x0300_0E10, 0x0200_0A10, simd_small_transfers),
    Entry::new(0x03E0_0000, 0x0040_0000, coprocessor_move_two),
    Entry::new(0x0200_0000, 0x0000_0000, coprocessor_load_store),
    Entry::new(0x0300_0000, 0x0200_0000, coprocessor_move),
];

static FLOATING_POINT: &[Entry] = &[
    Entry::new(0x00B0_0040, 0x00B0_0000, fp_two_registers),
    Entry::new(0x00BE_0040, 0x00B0_0040, fp_two_registers),
    Entry::new(0x00BE_0040, 0x00B2_0040, fp_convert),
    Entry::new(0x00BE_0040, 0x00B4_0040, fp_compare),
    Entry::new(0x00BF_00C0, 0x00B7_00C0, fp_convert),
    Entry::new(0x00BF_0040, 0x00B8_0040, fp_convert),
    Entry::new(0x00BE_0040, 0x00BA_0040, fp_convert),
    Entry::new(0x00BE_0040, 0x00BC_0040, fp_convert),
    Entry::new(0x00BE_0040, 0x00BE_0040, fp_convert),
    Entry::new(0x00B0_0000, 0x00B0_0000, undefined),
    Entry::new(0x00B0_0040, 0x0080_0040, undefined),
    Entry::new(0x0000_0000, 0x0000_0000, fp_three_registers),
];

static SIMD_SMALL_TRANSFERS: &[Entry] = &[
    Entry::new(0x00F0_0100, 0x0000_0000, simd_small_move),
    Entry::new(0x00F0_0100, 0x00E0_0000, simd_special_move),
    Entry::new(0x0090_0100, 0x0000_0100, simd_small_move),
    Entry::new(0x0090_0140, 0x0080_0100, simd_duplicate),
    Entry::new(0x00F0_0100, 0x0010_0000, simd_small_move),
    Entry::new(0x00F0_0100, 0x00F0_0000, simd_special_move),
    Entry::new(0x0010_0100, 0x0010_0100, simd_small_move),
];

static SIMD_LOAD_STORE: &[Entry] = &[
    Entry::new(0x0120_0000, 0x0100_0000, simd_load_store_register),
    Entry::new(0x0180_0000, 0x0080_0000, simd_load_store_multiple),
    Entry::new(0x0180_0000, 0x0100_0000, simd_load_store_multiple),
];

#[cfg(test)]
mod tests {
    use triarch_core::find_entry;

    use super::*;

    #[test]
    fn test_top_level_classes() {
        assert_eq!(find_entry(TOP_LEVEL, 0xF57F_F01F), Some(0));
        assert_eq!(find_entry(TOP_LEVEL, 0xE1A0_F00E), Some(1));
        assert_eq!(find_entry(TOP_LEVEL, 0xE611_0F12), Some(2));
        assert_eq!(find_entry(TOP_LEVEL, 0xE591_0004), Some(3));
        assert_eq!(find_entry(TOP_LEVEL, 0xEB00_0000), Some(4));
        assert_eq!(find_entry(TOP_LEVEL, 0xEF00_0000), Some(5));
    }

    #[test]
    fn test_floating_point_falls_through_to_three_registers() {
        let last = FLOATING_POINT.len() - 1;
        // vadd.f32 matches nothing but the catch-all.
        assert_eq!(find_entry(FLOATING_POINT, 0xEE30_0A81), Some(last));
        assert_eq!(find_entry(FLOATING_POINT, 0xEEB4_0A60), Some(3));
    }

    #[test]
    fn test_simd_data_processing_classes() {
        assert_eq!(find_entry(SIMD_DATA_PROCESSING, 0xF222_0844), Some(0));
        assert_eq!(find_entry(SIMD_DATA_PROCESSING, 0xF280_0011), Some(1));
        assert_eq!(find_entry(SIMD_DATA_PROCESSING, 0xF2BB_0011), Some(2));
        assert_eq!(find_entry(SIMD_DATA_PROCESSING, 0xF3BA_0C01), Some(10));
    }

    #[test]
    fn test_every_table_is_nonempty() {
        for table in [
            TOP_LEVEL,
            UNCONDITIONAL,
            MEMORY_HINTS,
            SIMD_DATA_PROCESSING,
            SIMD_ELEMENT_LOAD_STORE,
            DATA_PROCESSING_AND_MISC,
            MEDIA,
            PACKING,
            BRANCH_AND_BLOCK,
            COPROCESSOR_AND_SUPERVISOR,
            FLOATING_POINT,
            SIMD_SMALL_TRANSFERS,
            SIMD_LOAD_STORE,
        ] {
            assert!(!table.is_empty());
        }
    }
}
