// Control surface stores - parameters, input jacks, lights
//
// These are the host-owned stores the bridge reconciles against: a float per
// indexed control, a voltage per indexed jack, a brightness per indexed
// light. The host (UI or CV rig) mutates params and jacks between cycles;
// the bridge is the only writer during its own pass.

/// Parameter indices.
pub mod param {
    /// 74 continuous control lanes (sliders/knobs).
    pub const CONTROLLERS: usize = 0;
    pub const CONTROLLER_COUNT: usize = 74;

    /// Seven multi-state buttons, in fixed order: LFO1 type, LFO2 type,
    /// mod source, LFO1 sync, LFO2 sync, sustain, legato.
    pub const BUTTONS: usize = 74;
    pub const BUTTON_COUNT: usize = 7;

    pub const PLAYMODE: usize = 81;
    pub const LOAD: usize = 82;
    pub const SAVE: usize = 83;

    /// Four direct-select buttons for the modulation source.
    pub const MOD_TYPE: usize = 84;
    pub const MOD_TYPE_COUNT: usize = 4;

    pub const PROGRAM_BANK: usize = 88;
    pub const PROGRAM_KNOB: usize = 89;
    pub const PROGRAM_SEND: usize = 90;

    pub const COUNT: usize = 91;
}

/// Input jack indices.
pub mod jack {
    /// One modulation voltage input per control lane.
    pub const CC_INPUTS: usize = 0;
    pub const CC_INPUT_COUNT: usize = 74;

    pub const CV_PROGRAM: usize = 74;
    pub const CV_PROGRAM_SEND: usize = 75;

    pub const COUNT: usize = 76;
}

/// Light indices.
pub mod light {
    pub const CTRL: usize = 0;
    pub const CTRL_COUNT: usize = 74;

    /// Three 4-light radio banks: LFO1 type, LFO2 type, mod source.
    pub const RADIO: usize = 74;

    /// Four single toggle lights: LFO1 sync, LFO2 sync, sustain, legato.
    pub const TOGGLE: usize = 86;

    pub const PLAYMODE: usize = 90;
    pub const PLAYMODE_COUNT: usize = 6;

    /// Two lights: user bank, factory bank.
    pub const PC_BANK: usize = 96;

    pub const COUNT: usize = 98;
}

/// One external voltage input. A disconnected jack reads 0 V.
#[derive(Debug, Clone, Copy, Default)]
pub struct Jack {
    pub voltage: f32,
    pub connected: bool,
}

impl Jack {
    pub fn level(&self) -> f32 {
        if self.connected { self.voltage } else { 0.0 }
    }
}

pub struct Surface {
    params: [f32; param::COUNT],
    jacks: [Jack; jack::COUNT],
    lights: [f32; light::COUNT],
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    pub fn new() -> Self {
        Self {
            params: [0.0; param::COUNT],
            jacks: [Jack::default(); jack::COUNT],
            lights: [0.0; light::COUNT],
        }
    }

    #[inline]
    pub fn param(&self, index: usize) -> f32 {
        self.params[index]
    }

    #[inline]
    pub fn set_param(&mut self, index: usize, value: f32) {
        self.params[index] = value;
    }

    #[inline]
    pub fn jack(&self, index: usize) -> Jack {
        self.jacks[index]
    }

    /// Patch a voltage into a jack (marks it connected).
    pub fn connect_jack(&mut self, index: usize, voltage: f32) {
        self.jacks[index] = Jack {
            voltage,
            connected: true,
        };
    }

    pub fn disconnect_jack(&mut self, index: usize) {
        self.jacks[index] = Jack::default();
    }

    #[inline]
    pub fn light(&self, index: usize) -> f32 {
        self.lights[index]
    }

    #[inline]
    pub fn set_light(&mut self, index: usize, brightness: f32) {
        self.lights[index] = brightness;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_layout_is_contiguous() {
        assert_eq!(param::BUTTONS, param::CONTROLLERS + param::CONTROLLER_COUNT);
        assert_eq!(param::PLAYMODE, param::BUTTONS + param::BUTTON_COUNT);
        assert_eq!(param::PROGRAM_BANK, param::MOD_TYPE + param::MOD_TYPE_COUNT);
        assert_eq!(param::COUNT, param::PROGRAM_SEND + 1);
        assert_eq!(jack::COUNT, jack::CV_PROGRAM_SEND + 1);
        assert_eq!(light::PC_BANK, light::PLAYMODE + light::PLAYMODE_COUNT);
    }

    #[test]
    fn test_disconnected_jack_reads_zero() {
        let mut surface = Surface::new();
        surface.connect_jack(jack::CV_PROGRAM, 5.0);
        assert_eq!(surface.jack(jack::CV_PROGRAM).level(), 5.0);

        surface.disconnect_jack(jack::CV_PROGRAM);
        assert_eq!(surface.jack(jack::CV_PROGRAM).level(), 0.0);
        assert!(!surface.jack(jack::CV_PROGRAM).connected);
    }
}
