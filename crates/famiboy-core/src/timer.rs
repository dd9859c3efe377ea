use crate::hardware::UPDATE_RATE_HZ;

/// One "true" clock tick in 8.8 fixed point.
pub const FIXED_ONE: u16 = 256;

/// Per-update 8.8 increment for a clock running at `clock_hz` when the engine
/// is stepped at [`UPDATE_RATE_HZ`].
pub const fn fixed_increment(clock_hz: u32) -> u16 {
    (clock_hz * FIXED_ONE as u32 / UPDATE_RATE_HZ) as u16
}

/// Envelope clock (64 Hz) advance per update: 273/256 ticks.
pub const ENVELOPE_INCREMENT: u16 = fixed_increment(64);

/// Sweep clock (128 Hz) advance per update: 546/256 ticks.
pub const SWEEP_INCREMENT: u16 = fixed_increment(128);

/// Fractional accumulator used to run a clock that is not an integer
/// multiple of the update rate without drifting.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedTimer {
    counter: u16,
}

impl FixedTimer {
    pub fn reset(&mut self) {
        self.counter = 0;
    }

    pub fn counter(&self) -> u16 {
        self.counter
    }

    pub fn advance(&mut self, increment: u16) {
        self.counter = self.counter.saturating_add(increment);
    }

    /// Consume `threshold` units if the accumulator has reached it.
    pub fn take(&mut self, threshold: u16) -> bool {
        if self.counter >= threshold {
            self.counter -= threshold;
            true
        } else {
            false
        }
    }
}
