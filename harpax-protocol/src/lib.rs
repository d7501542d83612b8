//! Host-link command protocol for the Harpax portal robot
//!
//! This crate defines the point-to-point serial protocol between the host PC
//! and the controller board. The link is fire-and-forget: the host streams
//! motion commands, the controller applies the most recent one, and nothing
//! is ever acknowledged.
//!
//! # Protocol Overview
//!
//! Packets are COBS byte-stuffed and separated by a zero delimiter. Each
//! decoded packet carries exactly one command frame:
//! ```text
//! ┌──────────┬──────────┬──────────┬─────────┐
//! │ AXIS 1   │ AXIS 2   │ AXIS 3   │ GRIPPER │
//! │ f32 LE   │ f32 LE   │ f32 LE   │ 1B      │
//! └──────────┴──────────┴──────────┴─────────┘
//! ```
//!
//! The axis values are physical setpoints (m/s or m/s² depending on the
//! build's control mode); unit conversion and clamping happen on the
//! controller side, never here.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod transport;

pub use command::{Command, FrameError, COMMAND_FRAME_LEN};
pub use transport::{PacketAssembler, TransportError, MAX_PACKET_SIZE, PACKET_DELIMITER};
