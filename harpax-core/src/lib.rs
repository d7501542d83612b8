//! Board-agnostic core logic for the portal pick-robot firmware
//!
//! This crate contains all control logic that does not depend on specific
//! hardware implementations:
//!
//! - Hardware abstraction traits (step actuator, endstop input, gripper valve)
//! - Per-axis motion regulation (tracking policies, endstop soft stop)
//! - Physical-unit to pulse-rate conversion
//! - Fault latching for link errors
//! - Build-time configuration types
//! - The portal controller that owns the axis actuators and runs the
//!   fixed-order control tick

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod motion;
pub mod portal;
pub mod safety;
pub mod traits;
