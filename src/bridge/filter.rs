// Exponential smoothing filter - one per control lane
//
// Converts a stepped incoming MIDI value into a continuously interpolated
// output. A large input delta (a hard MIDI value or a physical jump, as
// opposed to a knob sweep) bypasses the interpolation and snaps.

/// One-pole exponential filter on a 0..1 normalized scale.
///
/// y += (target - y) * lambda * dt, with lambda = 1/tau.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialFilter {
    pub out: f32,
    lambda: f32,
}

/// Time constant shared by every lane filter: tau = 2 ms.
pub const LANE_TAU: f32 = 1.0 / 500.0;

/// Input deltas at or above one full-scale unit snap instead of smoothing.
pub const SNAP_THRESHOLD: f32 = 1.0;

impl ExponentialFilter {
    pub fn new(tau: f32) -> Self {
        Self {
            out: 0.0,
            lambda: 1.0 / tau,
        }
    }

    pub fn set_tau(&mut self, tau: f32) {
        self.lambda = 1.0 / tau;
    }

    pub fn reset(&mut self) {
        self.out = 0.0;
    }

    /// Advance toward `target` by `dt` seconds.
    #[inline]
    pub fn process(&mut self, dt: f32, target: f32) -> f32 {
        let next = self.out + (target - self.out) * self.lambda * dt;
        // Once the increment falls below f32 resolution, finish the move
        if next == self.out {
            self.out = target;
        } else {
            self.out = next;
        }
        self.out
    }

    /// Smoothing policy for lane values: snap on a large delta, otherwise
    /// integrate.
    #[inline]
    pub fn drive(&mut self, dt: f32, target: f32) {
        if (self.out - target).abs() >= SNAP_THRESHOLD {
            self.out = target;
        } else {
            self.process(dt, target);
        }
    }

    /// Current state rounded to the 0..127 MIDI scale (unclamped).
    #[inline]
    pub fn rounded(&self) -> i32 {
        (self.out * 127.0).round() as i32
    }
}
