// CC address map - logical control index to physical MIDI CC number
//
// 82 entries in fixed order: 8 button lanes, 36 modulation lanes, 38
// primary lanes. The default table is the device's factory CC assignment;
// a learned map restored from session state overrides it verbatim.

pub const LEARNED_CCS: usize = 82;

const BUTTON_BASE: usize = 0;
const MOD_BASE: usize = 8;
const PRIMARY_BASE: usize = 44;

/// Factory CC assignment for the remote synth.
const DEFAULT_CC_MAP: [u8; LEARNED_CCS] = [
    22, // 0-3 lfo1 type
    28, // 0-3 lfo2 type
    30, // 0-3 mod source selector
    23, // 0-1 lfo1 sync
    29, // 0-1 lfo2 sync
    64, // 0-1 sustain pedal
    68, // 0-1 legato
    17, // 0-5 playmode
    36, 37, 39, 40, 41, 45, 46, 47, 52, 53, 54, 55, 58, 59, // mod shift
    31, 32, 33, 34, 35, 42, 43, 44, 48, 49, 50, 51, 56, 57, // mod normal
    86, 87, 88, 89, // reverb mod
    60, 61, 62, 63, // lfo2 mod
    12, 5, 15, 16, 14, 81, 4, 8, 73, 84, 85, 72, 20, 21, // shift
    70, 9, 10, 11, 13, 74, 71, 3, 79, 80, 82, 83, 18, 19, // normal
    75, 76, 77, 78, // reverb
    24, 25, 26, 27, // lfo2
    1,  // mod wheel
    7,  // volume
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CcAddressMap {
    ccs: [u8; LEARNED_CCS],
}

impl Default for CcAddressMap {
    fn default() -> Self {
        Self {
            ccs: DEFAULT_CC_MAP,
        }
    }
}

impl CcAddressMap {
    /// CC number of a button lane (0..8; lane 7 is playmode).
    #[inline]
    pub fn button(&self, lane: usize) -> u8 {
        self.ccs[BUTTON_BASE + lane]
    }

    /// CC number of a modulation lane (0..36).
    #[inline]
    pub fn mod_lane(&self, lane: usize) -> u8 {
        self.ccs[MOD_BASE + lane]
    }

    /// CC number of a primary lane (0..38).
    #[inline]
    pub fn primary(&self, lane: usize) -> u8 {
        self.ccs[PRIMARY_BASE + lane]
    }

    /// Raw table, in persisted order.
    pub fn entries(&self) -> &[u8; LEARNED_CCS] {
        &self.ccs
    }

    /// Override one entry (session restore / CC learn).
    pub fn set_entry(&mut self, index: usize, cc: u8) {
        self.ccs[index] = cc & 0x7F;
    }
}
