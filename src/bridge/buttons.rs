// Button lanes - two-way merge, mod-source selection, lights
//
// Buttons use a simpler merge than the continuous lanes: a MIDI-observed
// value wins outright (jump, no smoothing, no additive combination),
// otherwise the locally cycled setting holds. Button emission is not
// throttled; the output sink's dedup is the only gate.

use crate::bridge::Bridge;
use crate::bridge::slots::{BUTTON_SETTINGS, MOD_LANES, MOD_SLOTS, MOD_SOURCES};
use crate::surface::{Surface, light, param};

/// Highest setting each cycling button reaches before wrapping to 0.
const BUTTON_RANGE: [i32; BUTTON_SETTINGS] = [3, 3, 3, 1, 1, 1, 1];

/// Index of the button lane that selects the modulation source.
pub(crate) const MOD_SOURCE_BUTTON: usize = 2;

impl Bridge {
    /// Buttons jump straight to the observed MIDI value; hardware buttons
    /// send hard values, never sweeps.
    pub(crate) fn jump_button_filters(&mut self) {
        for i in 0..self.button_out.len() {
            let cc = self.cc_map.button(i);
            if let Some(v) = self.values_in[cc as usize] {
                self.button_out[i] = v as f32 / 127.0;
                self.button_driven[i] = true;
            }
        }
    }

    /// The four mod-type buttons select a source directly. A local press
    /// raises `mod_select_pending`, which freezes the mod filters until the
    /// device echoes the selector CC back.
    pub(crate) fn select_mod_type(&mut self, surface: &Surface) {
        for i in 0..MOD_SOURCES {
            let pressed = surface.param(param::MOD_TYPE + i) > 0.5;
            if self.mod_type_edges[i].process(pressed) {
                self.button_settings[MOD_SOURCE_BUTTON] = i as i32;
                self.mod_select_pending = true;
            }
        }
    }

    pub(crate) fn process_buttons(&mut self, surface: &mut Surface) {
        for j in 0..BUTTON_SETTINGS {
            // Local cycling on a rising edge (the mod-source button is
            // driven by the mod-type buttons instead)
            if j != MOD_SOURCE_BUTTON {
                let pressed = surface.param(param::BUTTONS + j) > 0.5;
                if self.button_edges[j].process(pressed) {
                    self.button_settings[j] += 1;
                    if self.button_settings[j] > BUTTON_RANGE[j] {
                        self.button_settings[j] = 0;
                    }
                }
            }

            // MIDI-observed value wins outright
            let rounded = (self.button_out[j] * 127.0).round() as i32;
            let value_out = if self.button_driven[j] && self.button_filter_last[j] != Some(rounded)
            {
                self.button_filter_last[j] = Some(rounded);
                if j == MOD_SOURCE_BUTTON {
                    self.mod_select_pending = false;
                }
                rounded
            } else {
                self.button_settings[j]
            };
            let value_out = value_out.clamp(0, 127);

            if self.button_sent_last[j] != Some(value_out) {
                self.midi_out.set_value(value_out, self.cc_map.button(j));
                self.button_sent_last[j] = Some(value_out);
            }
            self.button_settings[j] = value_out;

            if j == MOD_SOURCE_BUTTON {
                self.switch_mod_source(value_out, surface);
            }

            if j < 3 {
                // 4-light radio banks for the multi-state buttons
                for k in 0..4 {
                    let on = self.button_settings[j] == k as i32;
                    surface.set_light(light::RADIO + 4 * j + k, if on { 1.0 } else { 0.0 });
                }
            } else {
                surface.set_light(light::TOGGLE + j - 3, self.button_settings[j] as f32);
            }
        }
    }

    /// Playmode behaves like a button lane but its local value lives in a
    /// dedicated parameter (a 0..5 snap knob on the surface).
    pub(crate) fn process_playmode(&mut self, surface: &mut Surface) {
        let j = self.button_out.len() - 1;
        let rounded = (self.button_out[j] * 127.0).round() as i32;
        let value_out = if self.button_driven[j] && self.button_filter_last[j] != Some(rounded) {
            self.button_filter_last[j] = Some(rounded);
            rounded
        } else {
            surface.param(param::PLAYMODE) as i32
        };
        let value_out = value_out.clamp(0, 127);

        if self.button_sent_last[j] != Some(value_out) {
            self.midi_out.set_value(value_out, self.cc_map.button(j));
            self.button_sent_last[j] = Some(value_out);
        }

        let selected = surface.param(param::PLAYMODE) as i32;
        for k in 0..light::PLAYMODE_COUNT {
            let on = selected == k as i32;
            surface.set_light(light::PLAYMODE + k, if on { 1.0 } else { 0.0 });
        }
        surface.set_param(param::PLAYMODE, value_out as f32);
    }

    fn switch_mod_source(&mut self, value: i32, surface: &mut Surface) {
        self.mod_src = (value.max(0) as usize).min(MOD_SOURCES - 1);
        if self.mod_src_last != Some(self.mod_src) {
            self.mod_src_last = Some(self.mod_src);
            self.project_mod_source(surface);
        }
    }

    /// Copy all 36 values of the active source into the parameter store and
    /// mirror their lights. Runs inside the cycle, so the reconciliation
    /// pass never sees a partial lane set.
    pub(crate) fn project_mod_source(&mut self, surface: &mut Surface) {
        for lane in 0..MOD_LANES {
            let slot = MOD_SLOTS[lane];
            let v = self.mod_current[self.mod_src][lane];
            surface.set_param(param::CONTROLLERS + slot, v as f32);
            surface.set_light(light::CTRL + slot, (v as f32 + 1.0) / 128.0);
        }
    }
}
