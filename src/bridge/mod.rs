// Module bridge - per-cycle reconciliation between surface and device
//
// The bridge owns all per-lane state: smoothing filters, last-seen caches
// for the three value sources (inbound MIDI, external voltage, local
// parameter edits), the modulation bank, the program-change state machine
// and the group throttles. One call to `process` runs one control cycle.

pub mod cc_map;
pub mod filter;
pub mod lanes;
pub mod program;
pub mod slots;
pub mod trigger;

pub(crate) mod buttons;

pub use cc_map::CcAddressMap;
pub use lanes::GroupThrottle;
pub use program::ProgramState;

use crate::midi::event::MidiEvent;
use crate::midi::output::CcOutput;
use crate::midi::queue::MidiInbound;
use crate::surface::{Surface, param};
use filter::{ExponentialFilter, LANE_TAU};
use slots::{BUTTON_LANES, BUTTON_SETTINGS, MOD_LANES, MOD_SOURCES, PRIMARY_LANES};
use trigger::RisingEdge;

/// Merge/emit passes for the continuous lanes run once per this period,
/// regardless of the host's control-rate cadence.
pub const RATE_LIMITER_PERIOD: f32 = 0.0005;

/// Default group throttle window, in gated cycles.
pub const DEFAULT_THROTTLE_WINDOW: u32 = 20;

/// Patch file action requested from the surface; the host resolves the
/// path (dialog, fixed location) and calls back into `load_patch` /
/// `save_patch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRequest {
    LoadPatch,
    SavePatch,
}

pub struct Bridge {
    pub cc_map: CcAddressMap,

    /// Raw last-seen value per inbound CC number. `None` = nothing observed
    /// since reset.
    pub(crate) values_in: [Option<i8>; 128],

    // Primary lanes
    pub(crate) primary_filters: [ExponentialFilter; PRIMARY_LANES],
    pub(crate) primary_driven: [bool; PRIMARY_LANES],
    pub(crate) primary_filter_last: [Option<i32>; PRIMARY_LANES],
    pub(crate) primary_param_last: [Option<i32>; PRIMARY_LANES],
    pub(crate) primary_sent_last: [Option<i32>; PRIMARY_LANES],
    /// Display values for the primary lanes.
    pub current_values: [i32; PRIMARY_LANES],

    /// Last rounded voltage per controller slot, shared by the primary and
    /// modulation groups (their slots are disjoint).
    pub(crate) voltage_last: [Option<i32>; param::CONTROLLER_COUNT],

    // Modulation lanes, per source
    pub(crate) mod_filters: [[ExponentialFilter; MOD_LANES]; MOD_SOURCES],
    pub(crate) mod_driven: [[bool; MOD_LANES]; MOD_SOURCES],
    pub(crate) mod_filter_last: [[Option<i32>; MOD_LANES]; MOD_SOURCES],
    pub(crate) mod_param_last: [[Option<i32>; MOD_LANES]; MOD_SOURCES],
    pub(crate) mod_sent_last: [[Option<i32>; MOD_LANES]; MOD_SOURCES],
    pub(crate) mod_current: [[i32; MOD_LANES]; MOD_SOURCES],
    /// Display values for the active modulation source.
    pub mod_display: [i32; MOD_LANES],
    pub(crate) mod_src: usize,
    pub(crate) mod_src_last: Option<usize>,
    /// Set when a mod-type button was pressed locally; blocks mod-filter
    /// advancement until the device echoes the selector CC.
    pub(crate) mod_select_pending: bool,

    // Button lanes (7 cycling settings + playmode)
    pub(crate) button_out: [f32; BUTTON_LANES],
    pub(crate) button_driven: [bool; BUTTON_LANES],
    pub(crate) button_filter_last: [Option<i32>; BUTTON_LANES],
    pub(crate) button_sent_last: [Option<i32>; BUTTON_LANES],
    pub(crate) button_settings: [i32; BUTTON_SETTINGS],
    pub(crate) button_edges: [RisingEdge; BUTTON_SETTINGS],
    pub(crate) mod_type_edges: [RisingEdge; MOD_SOURCES],

    pub(crate) primary_throttle: GroupThrottle,
    pub(crate) mod_throttle: GroupThrottle,
    rate_limiter_phase: f32,

    pub program: ProgramState,

    load_edge: RisingEdge,
    save_edge: RisingEdge,
    pending_file: Option<FileRequest>,

    pub midi_out: CcOutput,
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}

impl Bridge {
    pub fn new() -> Self {
        Self {
            cc_map: CcAddressMap::default(),
            values_in: [None; 128],
            primary_filters: [ExponentialFilter::new(LANE_TAU); PRIMARY_LANES],
            primary_driven: [false; PRIMARY_LANES],
            primary_filter_last: [None; PRIMARY_LANES],
            primary_param_last: [None; PRIMARY_LANES],
            primary_sent_last: [None; PRIMARY_LANES],
            current_values: [0; PRIMARY_LANES],
            voltage_last: [None; param::CONTROLLER_COUNT],
            mod_filters: [[ExponentialFilter::new(LANE_TAU); MOD_LANES]; MOD_SOURCES],
            mod_driven: [[false; MOD_LANES]; MOD_SOURCES],
            mod_filter_last: [[None; MOD_LANES]; MOD_SOURCES],
            mod_param_last: [[None; MOD_LANES]; MOD_SOURCES],
            mod_sent_last: [[None; MOD_LANES]; MOD_SOURCES],
            mod_current: [[0; MOD_LANES]; MOD_SOURCES],
            mod_display: [0; MOD_LANES],
            mod_src: 0,
            mod_src_last: None,
            mod_select_pending: false,
            button_out: [0.0; BUTTON_LANES],
            button_driven: [false; BUTTON_LANES],
            button_filter_last: [None; BUTTON_LANES],
            button_sent_last: [None; BUTTON_LANES],
            button_settings: [0; BUTTON_SETTINGS],
            button_edges: [RisingEdge::new(); BUTTON_SETTINGS],
            mod_type_edges: [RisingEdge::new(); MOD_SOURCES],
            primary_throttle: GroupThrottle::new(DEFAULT_THROTTLE_WINDOW),
            mod_throttle: GroupThrottle::new(DEFAULT_THROTTLE_WINDOW),
            rate_limiter_phase: 0.0,
            program: ProgramState::new(),
            load_edge: RisingEdge::new(),
            save_edge: RisingEdge::new(),
            pending_file: None,
            midi_out: CcOutput::new(),
        }
    }

    /// Back to post-construction state: caches forgotten, filters zeroed,
    /// CC map back to the factory table, output dedup cleared. The inbound
    /// channel is external and not touched here.
    pub fn reset(&mut self) {
        let window = self.primary_throttle.window();
        *self = Self::new();
        self.set_throttle_window(window);
    }

    /// Shared emission window for both lane groups (`slow_control`).
    pub fn set_throttle_window(&mut self, window: u32) {
        self.primary_throttle = GroupThrottle::new(window);
        self.mod_throttle = GroupThrottle::new(window);
    }

    pub fn mod_source(&self) -> usize {
        self.mod_src
    }

    pub fn button_setting(&self, index: usize) -> i32 {
        self.button_settings[index]
    }

    pub fn take_file_request(&mut self) -> Option<FileRequest> {
        self.pending_file.take()
    }

    /// One control cycle. `sample_time` is the host's per-cycle dt in
    /// seconds, `frame` its logical time for gating the inbound drain.
    pub fn process(
        &mut self,
        surface: &mut Surface,
        midi_in: &mut MidiInbound,
        sample_time: f32,
        frame: u64,
    ) {
        while let Some(msg) = midi_in.pop_before(frame) {
            self.handle_event(msg.event, surface);
        }

        // Every cycle: buttons, mod-source selection, mod filters
        self.jump_button_filters();
        self.select_mod_type(surface);
        self.process_buttons(surface);
        self.process_playmode(surface);
        self.advance_mod_filters(sample_time);

        // Coarse rate limiter: the merge/emit passes below run once per
        // RATE_LIMITER_PERIOD of accumulated host time
        self.rate_limiter_phase += sample_time / RATE_LIMITER_PERIOD;
        if self.rate_limiter_phase >= 1.0 {
            self.rate_limiter_phase -= 1.0;
        } else {
            return;
        }

        self.reconcile_mod_lanes(surface);
        self.advance_primary_filters(sample_time);
        self.reconcile_primary_lanes(surface);
        self.process_program(surface);

        if self.load_edge.process(surface.param(param::LOAD) > 0.5) {
            self.pending_file = Some(FileRequest::LoadPatch);
        }
        if self.save_edge.process(surface.param(param::SAVE) > 0.5) {
            self.pending_file = Some(FileRequest::SavePatch);
        }
    }

    /// Route one inbound message into the raw value table.
    pub(crate) fn handle_event(&mut self, event: MidiEvent, surface: &mut Surface) {
        match event {
            MidiEvent::ControlChange { controller, value } => {
                // Two's-complement read of the value byte, clamped so the
                // table never holds i8::MIN
                let signed = (value as i8).max(-127);
                self.values_in[controller as usize] = Some(signed);
            }
            MidiEvent::ProgramChange { program } => {
                surface.set_param(param::PROGRAM_KNOB, program as f32);
            }
        }
    }
}
