//! Physical-unit to pulse-rate conversion
//!
//! The host commands in metres; the steppers only understand pulse rates.
//! One empirically calibrated constant links the two.

use crate::motion::AXIS_COUNT;

/// Converts physical setpoints (m/s or m/s²) to native pulse rates
///
/// Pure scaling — no rounding and no clamping. Bounding the result against
/// the per-axis speed limit is the regulator's job.
#[derive(Debug, Clone, Copy)]
pub struct UnitConverter {
    steps_per_unit: f32,
}

impl UnitConverter {
    /// Create a converter for the given calibration constant
    pub const fn new(steps_per_unit: f32) -> Self {
        Self { steps_per_unit }
    }

    /// Convert one setpoint per axis into native units
    pub fn to_native(&self, physical: [f32; AXIS_COUNT]) -> [f32; AXIS_COUNT] {
        physical.map(|value| value * self.steps_per_unit)
    }

    /// The calibration constant in use
    pub fn steps_per_unit(&self) -> f32 {
        self.steps_per_unit
    }
}
