//! Simulation time: a fixed-step accumulator fed by animation frames and
//! the virtual clock every scheduler deadline is measured against.

/// Steps run for a single frame at most. Time beyond that is discarded
/// so a stalled tab does not replay seconds of catch-up at once.
pub const MAX_STEPS_PER_FRAME: u32 = 10;

/// Turns variable frame deltas into a whole number of fixed steps.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimestep {
    dt: f32,
    carry: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self { dt, carry: 0.0 }
    }

    /// Add a frame delta in seconds; returns how many steps to run now.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if !(self.dt > 0.0) {
            return 0;
        }
        let budget = (self.carry + frame_dt.max(0.0)).min(self.dt * MAX_STEPS_PER_FRAME as f32);
        let steps = (budget / self.dt) as u32;
        self.carry = budget - steps as f32 * self.dt;
        steps
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// Monotonic simulation clock in milliseconds.
///
/// Advanced only by the runner or by tests, never from the wall clock.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VirtualClock {
    now_ms: f64,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Elapsed time in seconds, for animation phases.
    pub fn seconds(&self) -> f32 {
        (self.now_ms / 1000.0) as f32
    }

    /// Advance by `dt` seconds. Negative input is ignored.
    pub fn advance(&mut self, dt: f32) {
        if dt > 0.0 {
            self.now_ms += dt as f64 * 1000.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn exact_frame_is_one_step() {
        assert_eq!(FixedTimestep::new(DT).accumulate(DT), 1);
    }

    #[test]
    fn partial_frames_carry_over() {
        let mut ts = FixedTimestep::new(DT);
        assert_eq!(ts.accumulate(0.008), 0);
        assert_eq!(ts.accumulate(0.010), 1);
    }

    #[test]
    fn stalls_are_capped() {
        let mut ts = FixedTimestep::new(DT);
        assert_eq!(ts.accumulate(1.0), MAX_STEPS_PER_FRAME);
        assert_eq!(ts.accumulate(0.0), 0);
        assert_eq!(ts.accumulate(-5.0), 0);
    }

    #[test]
    fn clock_advances_in_ms() {
        let mut clock = VirtualClock::new();
        clock.advance(0.25);
        clock.advance(-1.0);
        assert!((clock.now_ms() - 250.0).abs() < 1e-6);
        assert!((clock.seconds() - 0.25).abs() < 1e-6);
    }
}
