//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined in
//! harpax-core over plain GPIO:
//!
//! - Software-timed step/dir/enable pulse driver ([`stepper::PulseStepper`])
//! - Vacuum gripper valve output ([`valve::VacuumValve`])
//! - Active-low limit switch pair ([`endstop::SwitchPair`])
//!
//! Everything is generic over the pin traits in [`gpio`], so the drivers
//! run unchanged against mock pins on the host.

#![no_std]
#![deny(unsafe_code)]

pub mod endstop;
pub mod gpio;
pub mod stepper;
pub mod valve;
