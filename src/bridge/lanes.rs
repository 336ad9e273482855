// Continuous lane reconciliation - the core merge/emit pass
//
// Each lane merges up to three independently detected deltas into one
// 0..127 output per gated cycle:
//   1. filter delta  - the smoothed MIDI value's rounded output changed;
//                      becomes the authoritative base.
//   2. voltage delta - the jack's rounded value changed; added to the
//                      filter's rounded value (additive modulation).
//   3. param delta   - the live parameter moved (a local edit); added on
//                      top.
// No delta, no work: the lane's parameter, light and caches stay untouched.
// When a delta fired, the clamped result is always written back to the
// parameter and light, but reaches the wire only if it differs from the
// lane's last emission AND the group's shared throttle window is open.

use crate::bridge::Bridge;
use crate::bridge::slots::{MOD_LANES, MOD_SLOTS, PRIMARY_LANES, PRIMARY_SLOTS};
use crate::surface::{Surface, jack, light, param};

/// Shared emission counter for one lane group. All lanes in the group
/// compete for the same window: one MIDI message per satisfied window
/// across the whole group, so simultaneous multi-lane changes drain
/// serially in ascending lane order. This is deliberate wire bandwidth
/// limiting, not a per-lane debounce.
#[derive(Debug, Clone, Copy)]
pub struct GroupThrottle {
    count: u32,
    window: u32,
}

impl GroupThrottle {
    pub fn new(window: u32) -> Self {
        Self { count: 0, window }
    }

    pub fn window(&self) -> u32 {
        self.window
    }

    #[inline]
    pub fn tick(&mut self) {
        self.count += 1;
    }

    #[inline]
    pub fn ready(&self) -> bool {
        self.count > self.window
    }

    #[inline]
    pub fn consume(&mut self) {
        self.count = 0;
    }
}

#[inline]
fn rounded_jack_value(surface: &Surface, slot: usize) -> i32 {
    // -5..+5 V maps to roughly -63..+63 steps
    (surface.jack(jack::CC_INPUTS + slot).level() / 10.0 * 127.0).round() as i32
}

impl Bridge {
    /// Advance the active source's mod filters toward the observed MIDI
    /// values. Frozen while a locally selected source change awaits its
    /// device echo.
    pub(crate) fn advance_mod_filters(&mut self, sample_time: f32) {
        if self.mod_select_pending {
            return;
        }
        let src = self.mod_src;
        for i in 0..MOD_LANES {
            let cc = self.cc_map.mod_lane(i);
            if let Some(v) = self.values_in[cc as usize] {
                self.mod_filters[src][i].drive(sample_time, v as f32 / 127.0);
                self.mod_driven[src][i] = true;
            }
        }
    }

    pub(crate) fn advance_primary_filters(&mut self, sample_time: f32) {
        for j in 0..PRIMARY_LANES {
            let cc = self.cc_map.primary(j);
            if let Some(v) = self.values_in[cc as usize] {
                self.primary_filters[j].drive(sample_time, v as f32 / 127.0);
                self.primary_driven[j] = true;
            }
        }
    }

    pub(crate) fn reconcile_mod_lanes(&mut self, surface: &mut Surface) {
        self.mod_throttle.tick();
        let src = self.mod_src;

        for i in 0..MOD_LANES {
            let slot = MOD_SLOTS[i];
            let mut value_out = 0;
            let mut changed = false;

            let rounded = self.mod_filters[src][i].rounded();
            if self.mod_driven[src][i] && self.mod_filter_last[src][i] != Some(rounded) {
                value_out = rounded;
                surface.set_param(param::CONTROLLERS + slot, rounded as f32);
                self.mod_param_last[src][i] = Some(rounded);
                self.mod_filter_last[src][i] = Some(rounded);
                changed = true;
            }

            let volts = rounded_jack_value(surface, slot);
            if self.voltage_last[slot] != Some(volts) {
                value_out = rounded + volts;
                self.voltage_last[slot] = Some(volts);
                changed = true;
            }

            let live = surface.param(param::CONTROLLERS + slot) as i32;
            if self.mod_param_last[src][i] != Some(live) {
                value_out += live;
                self.mod_param_last[src][i] = Some(live);
                changed = true;
            }

            let value_out = value_out.clamp(0, 127);
            if changed
                && self.mod_sent_last[src][i] != Some(value_out)
                && self.mod_throttle.ready()
            {
                self.mod_throttle.consume();
                self.midi_out.set_value(value_out, self.cc_map.mod_lane(i));
                self.mod_sent_last[src][i] = Some(value_out);
            }
            if changed {
                surface.set_param(param::CONTROLLERS + slot, value_out as f32);
                surface.set_light(light::CTRL + slot, (value_out as f32 + 1.0) / 128.0);
                self.mod_current[src][i] = value_out;
            }
            self.mod_display[i] = self.mod_current[src][i];
        }
    }

    pub(crate) fn reconcile_primary_lanes(&mut self, surface: &mut Surface) {
        self.primary_throttle.tick();

        for j in 0..PRIMARY_LANES {
            let slot = PRIMARY_SLOTS[j];
            let mut value_out = 0;
            let mut changed = false;

            let rounded = self.primary_filters[j].rounded();
            if self.primary_driven[j] && self.primary_filter_last[j] != Some(rounded) {
                value_out = rounded;
                surface.set_param(param::CONTROLLERS + slot, rounded as f32);
                // Cache keyed by lane index, not slot index
                self.primary_param_last[j] = Some(rounded);
                self.primary_filter_last[j] = Some(rounded);
                changed = true;
            }

            let volts = rounded_jack_value(surface, slot);
            if self.voltage_last[slot] != Some(volts) {
                value_out = rounded + volts;
                self.voltage_last[slot] = Some(volts);
                changed = true;
            }

            let live = surface.param(param::CONTROLLERS + slot) as i32;
            if self.primary_param_last[j] != Some(live) {
                value_out += live;
                self.primary_param_last[j] = Some(live);
                changed = true;
            }

            let value_out = value_out.clamp(0, 127);
            if changed
                && self.primary_sent_last[j] != Some(value_out)
                && self.primary_throttle.ready()
            {
                self.primary_throttle.consume();
                self.midi_out.set_value(value_out, self.cc_map.primary(j));
                self.primary_sent_last[j] = Some(value_out);
            }
            if changed {
                surface.set_param(param::CONTROLLERS + slot, value_out as f32);
                surface.set_light(light::CTRL + slot, (value_out as f32 + 1.0) / 128.0);
                self.current_values[j] = value_out;
            }
        }
    }
}
