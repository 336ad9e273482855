// Edge detectors for button-style params and CV triggers

/// Rising-edge detector over a boolean signal. Fires once per low→high
/// transition; a sustained high level does not retrigger.
#[derive(Debug, Clone, Copy, Default)]
pub struct RisingEdge {
    last: bool,
}

impl RisingEdge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.last = false;
    }

    #[inline]
    pub fn process(&mut self, high: bool) -> bool {
        let fired = high && !self.last;
        self.last = high;
        fired
    }
}

/// Schmitt trigger over an analog signal: fires when the input crosses the
/// high threshold (1.0) from a rearmed state; rearms only once the input
/// falls back to the low threshold (0.0). Noise between the thresholds
/// neither fires nor rearms.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchmittTrigger {
    armed: bool,
}

impl SchmittTrigger {
    pub fn new() -> Self {
        Self { armed: true }
    }

    pub fn reset(&mut self) {
        self.armed = true;
    }

    #[inline]
    pub fn process(&mut self, value: f32) -> bool {
        if self.armed {
            if value >= 1.0 {
                self.armed = false;
                return true;
            }
        } else if value <= 0.0 {
            self.armed = true;
        }
        false
    }
}
