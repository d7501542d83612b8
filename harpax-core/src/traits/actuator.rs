//! Step actuator trait
//!
//! This trait abstracts over the low-level pulse generation for one axis
//! (software-timed GPIO stepping, timer capture/compare, PIO, etc.)

/// Trait for per-axis step-pulse actuators
///
/// Speeds are signed, in native pulse-rate units (steps per second);
/// positive speed moves the axis toward its max endstop. The actuator paces
/// pulse emission against the timestamps handed to [`run`](Self::run) — the
/// caller supplies no other timing.
pub trait StepActuator {
    /// Set the current speed in steps/s
    ///
    /// Implementations clamp to ±[`max_speed`](Self::max_speed). Takes
    /// effect on the next [`run`](Self::run).
    fn set_speed(&mut self, sps: f32);

    /// Set the target acceleration in steps/s²
    ///
    /// While non-zero, the actuator integrates its own speed from this
    /// value on every [`run`](Self::run), saturating at the speed bound.
    fn set_acceleration(&mut self, sps2: f32);

    /// Get the current speed in steps/s
    fn current_speed(&self) -> f32;

    /// Get the configured speed bound in steps/s (always positive)
    fn max_speed(&self) -> f32;

    /// Emit the pulses owed for the interval since the previous call
    ///
    /// `now_us` is a monotonic microsecond timestamp.
    fn run(&mut self, now_us: u64);

    /// Enable or disable the motor output stage
    ///
    /// When disabled, the motor is free to rotate and does not hold position.
    fn set_enabled(&mut self, enabled: bool);

    /// Check if the output stage is enabled
    fn is_enabled(&self) -> bool;

    /// Check if the axis is commanded to stand still
    fn is_stopped(&self) -> bool {
        self.current_speed() == 0.0
    }
}
