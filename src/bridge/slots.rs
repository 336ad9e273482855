// Lane → parameter-slot remap tables
//
// The 74 controller parameters interleave primary and modulation lanes in
// three contiguous blocks with gaps. These tables are the single source of
// that mapping; nothing else in the crate does slot offset arithmetic.

use crate::surface::param;

pub const PRIMARY_LANES: usize = 38;
pub const MOD_LANES: usize = 36;
pub const MOD_SOURCES: usize = 4;
pub const BUTTON_LANES: usize = 8;
pub const BUTTON_SETTINGS: usize = 7;

/// Controller-parameter slot for each primary lane: 0..28 direct, then the
/// reverb block (56..60), the LFO2 block (64..68), mod wheel and volume
/// (72..74).
pub const PRIMARY_SLOTS: [usize; PRIMARY_LANES] = build_primary_slots();

/// Controller-parameter slot for each modulation lane: 28..56 direct+28,
/// then the reverb-mod block (60..64) and the LFO2-mod block (68..72).
pub const MOD_SLOTS: [usize; MOD_LANES] = build_mod_slots();

const fn build_primary_slots() -> [usize; PRIMARY_LANES] {
    let mut table = [0usize; PRIMARY_LANES];
    let mut j = 0;
    while j < PRIMARY_LANES {
        table[j] = if j < 28 {
            j
        } else if j < 32 {
            j + 28
        } else if j < 36 {
            j + 32
        } else {
            j + 36
        };
        j += 1;
    }
    table
}

const fn build_mod_slots() -> [usize; MOD_LANES] {
    let mut table = [0usize; MOD_LANES];
    let mut i = 0;
    while i < MOD_LANES {
        table[i] = if i < 28 {
            i + 28
        } else if i < 32 {
            i + 32
        } else {
            i + 36
        };
        i += 1;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_slot_blocks() {
        assert_eq!(PRIMARY_SLOTS[0], 0);
        assert_eq!(PRIMARY_SLOTS[27], 27);
        assert_eq!(&PRIMARY_SLOTS[28..32], &[56, 57, 58, 59]); // reverb
        assert_eq!(&PRIMARY_SLOTS[32..36], &[64, 65, 66, 67]); // lfo2
        assert_eq!(&PRIMARY_SLOTS[36..38], &[72, 73]); // mod wheel, volume
    }

    #[test]
    fn test_mod_slot_blocks() {
        assert_eq!(MOD_SLOTS[0], 28);
        assert_eq!(MOD_SLOTS[27], 55);
        assert_eq!(&MOD_SLOTS[28..32], &[60, 61, 62, 63]); // reverb mod
        assert_eq!(&MOD_SLOTS[32..36], &[68, 69, 70, 71]); // lfo2 mod
    }

    #[test]
    fn test_tables_partition_the_controllers() {
        // Every controller slot belongs to exactly one lane
        let mut seen = [0u8; param::CONTROLLER_COUNT];
        for &slot in PRIMARY_SLOTS.iter().chain(MOD_SLOTS.iter()) {
            assert!(slot < param::CONTROLLER_COUNT);
            seen[slot] += 1;
        }
        assert!(seen.iter().all(|&n| n == 1));
    }
}
