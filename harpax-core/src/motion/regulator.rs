//! Per-axis motion regulator
//!
//! Runs once per control tick. The active tracking policy turns the latest
//! commanded setpoint into an actuator drive, then the endstop gate gets the
//! last word: motion into a pressed limit switch is replaced by a geometric
//! soft stop, decaying the speed tick over tick instead of slamming the
//! gantry to a halt.

use micromath::F32Ext;

use crate::config::ControlMode;
use crate::safety::LimitSwitches;

/// Default per-tick speed change in the rate-limited velocity policy (steps/s)
pub const DEFAULT_RATE_STEP_SPS: f32 = 5.0;

/// Per-tick decay factor applied to the speed while an endstop blocks the axis
pub const SOFT_STOP_DECAY: f32 = 0.99;

/// Decayed speed magnitudes below this snap to exactly zero (steps/s)
pub const SOFT_STOP_FLOOR_SPS: f32 = 1000.0;

/// Regulation state of one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisState {
    /// Speed zero, no active target
    Idle,
    /// Driving the speed or acceleration toward the commanded target
    Tracking,
    /// An endstop blocks the motion direction; speed is forced toward zero
    LimitStop,
}

/// Drive handed to the actuator for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisDrive {
    /// Set the actuator speed directly (rate-limited velocity policy)
    Speed(f32),
    /// Hand the actuator an acceleration to integrate (acceleration policy)
    Accel(f32),
    /// Endstop override: force this speed and zero the acceleration
    Brake(f32),
}

/// Per-axis regulation state
///
/// Owns the commanded target and the bounded current speed for one axis.
/// The speed bound holds unconditionally: after every tick
/// `|current_speed| <= max_speed`.
#[derive(Debug, Clone)]
pub struct AxisRegulator {
    mode: ControlMode,
    max_speed: f32,
    /// Native setpoint: steps/s in velocity mode, steps/s² in acceleration mode
    target: f32,
    current: f32,
    state: AxisState,
}

impl AxisRegulator {
    /// Create a regulator at rest
    pub fn new(max_speed: f32, mode: ControlMode) -> Self {
        Self {
            mode,
            max_speed,
            target: 0.0,
            current: 0.0,
            state: AxisState::Idle,
        }
    }

    /// Replace the target with the latest command's native setpoint
    ///
    /// Velocity targets are bounded to ±max speed here; there is no other
    /// range validation anywhere on the command path.
    pub fn set_target(&mut self, native: f32) {
        self.target = match self.mode {
            ControlMode::Velocity { .. } => native.clamp(-self.max_speed, self.max_speed),
            ControlMode::Acceleration => native,
        };
        if self.state == AxisState::Idle && self.target != 0.0 {
            self.state = AxisState::Tracking;
        }
    }

    /// Current target in native units
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Current speed in steps/s
    pub fn current_speed(&self) -> f32 {
        self.current
    }

    /// Speed bound in steps/s
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Current regulation state
    pub fn state(&self) -> AxisState {
        self.state
    }

    /// Run one regulation tick
    ///
    /// `measured_sps` is the actuator-reported speed; the acceleration
    /// policy adopts it as the current speed (the actuator integrates on its
    /// own), while the velocity policy tracks speed itself. `limits` is this
    /// tick's fresh endstop sample.
    pub fn tick(&mut self, measured_sps: f32, limits: LimitSwitches) -> AxisDrive {
        match self.mode {
            ControlMode::Velocity { step_sps } => {
                let delta = self.target - self.current;
                let candidate = if delta.abs() > step_sps {
                    if delta > 0.0 {
                        self.current + step_sps
                    } else {
                        self.current - step_sps
                    }
                } else {
                    self.target
                };

                // Gate against the speed about to be applied, so a blocked
                // axis cannot creep into the switch one step at a time
                if limits.blocks(candidate) {
                    self.soft_stop()
                } else {
                    self.current = self.clamp_speed(candidate);
                    self.settle_state();
                    AxisDrive::Speed(self.current)
                }
            }
            ControlMode::Acceleration => {
                self.current = self.clamp_speed(measured_sps);

                if limits.blocks(self.current) {
                    self.soft_stop()
                } else {
                    // Saturation clamp: once the actuator sits at the speed
                    // bound, demanding more acceleration in that direction
                    // is dead weight
                    let saturated = (self.current >= self.max_speed && self.target > 0.0)
                        || (self.current <= -self.max_speed && self.target < 0.0);
                    let accel = if saturated { 0.0 } else { self.target };
                    self.settle_state();
                    AxisDrive::Accel(accel)
                }
            }
        }
    }

    /// Geometric soft stop while an endstop blocks the axis
    fn soft_stop(&mut self) -> AxisDrive {
        let decayed = self.current * SOFT_STOP_DECAY;
        self.current = if decayed.abs() < SOFT_STOP_FLOOR_SPS {
            0.0
        } else {
            decayed
        };
        self.state = AxisState::LimitStop;
        AxisDrive::Brake(self.current)
    }

    fn clamp_speed(&self, sps: f32) -> f32 {
        sps.clamp(-self.max_speed, self.max_speed)
    }

    fn settle_state(&mut self) {
        self.state = if self.target == 0.0 && self.current == 0.0 {
            AxisState::Idle
        } else {
            AxisState::Tracking
        };
    }
}
