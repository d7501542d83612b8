//! Configuration type definitions
//!
//! All configuration is resolved at build time — there is no flash storage
//! and no runtime parsing. Values live here as constants and `Default`
//! impls, and the firmware constructs one [`PortalConfig`] at startup.

use crate::motion::regulator::DEFAULT_RATE_STEP_SPS;
use crate::motion::AXIS_COUNT;

/// Steps per metre derived from the drivetrain math of the oldest board
/// revision (200 full steps × 40:1 gear × 300 rev/m)
pub const STEPS_PER_METER_GEARED: f32 = 2_400_000.0;

/// Steps per metre as nominally computed for the current drivetrain
pub const STEPS_PER_METER_NOMINAL: f32 = 321_436.0;

/// Steps per metre as measured on the current drivetrain
///
/// The three constants disagree across hardware revisions; nothing in the
/// history says which boards still exist, so all three stay selectable and
/// the measured value is the default.
pub const STEPS_PER_METER_MEASURED: f32 = 324_577.0;

/// Default per-axis speed bound in steps/s
pub const DEFAULT_MAX_SPEED_SPS: f32 = 4000.0;

/// Interpretation of the command setpoints, fixed per build
///
/// Both variants shipped on real hardware at different times, so both are
/// supported behind one switch.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlMode {
    /// Setpoints are velocities (m/s); the regulator ramps the actuator
    /// speed toward the target by at most `step_sps` per tick
    Velocity {
        /// Largest per-tick speed change in steps/s
        step_sps: f32,
    },
    /// Setpoints are accelerations (m/s²); the actuator integrates speed
    /// itself and the regulator only clamps the demand at the speed bound
    Acceleration,
}

impl Default for ControlMode {
    fn default() -> Self {
        ControlMode::Velocity {
            step_sps: DEFAULT_RATE_STEP_SPS,
        }
    }
}

/// Per-axis tuning
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisConfig {
    /// Speed bound in steps/s (positive)
    pub max_speed_sps: f32,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            max_speed_sps: DEFAULT_MAX_SPEED_SPS,
        }
    }
}

/// Complete portal configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortalConfig {
    /// Calibration constant: native steps per physical unit
    pub steps_per_unit: f32,
    /// Command interpretation and tracking policy
    pub mode: ControlMode,
    /// Per-axis tuning, indexed by [`Axis`](crate::motion::Axis)
    pub axes: [AxisConfig; AXIS_COUNT],
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            steps_per_unit: STEPS_PER_METER_MEASURED,
            mode: ControlMode::default(),
            axes: [AxisConfig::default(); AXIS_COUNT],
        }
    }
}
