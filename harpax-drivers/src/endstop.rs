//! Limit switch sampling
//!
//! One [`SwitchPair`] covers both travel ends of a single axis. The
//! switches are wired normally-open to ground with pull-ups, so the pressed
//! state reads low.

use harpax_core::safety::LimitSwitches;
use harpax_core::traits::EndstopInput;

use crate::gpio::InputPin;

/// Min/max limit switch pair for one axis
pub struct SwitchPair<P> {
    min: P,
    max: P,
    /// Pressed switch pulls the pin low
    active_low: bool,
}

impl<P: InputPin> SwitchPair<P> {
    /// Create a pair with the given polarity
    pub fn new(min: P, max: P, active_low: bool) -> Self {
        Self {
            min,
            max,
            active_low,
        }
    }

    /// Create an active-low pair (pull-up wiring, the default hardware)
    pub fn active_low(min: P, max: P) -> Self {
        Self::new(min, max, true)
    }
}

impl<P: InputPin> EndstopInput for SwitchPair<P> {
    fn sample(&mut self) -> LimitSwitches {
        LimitSwitches {
            min: self.min.is_high() != self.active_low,
            max: self.max.is_high() != self.active_low,
        }
    }
}
