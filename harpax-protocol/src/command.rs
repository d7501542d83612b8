//! Command frame encoding and decoding.
//!
//! Frame format (13 bytes, fixed):
//! - Bytes 0-3: axis 1 setpoint (f32, little-endian)
//! - Bytes 4-7: axis 2 setpoint (f32, little-endian)
//! - Bytes 8-11: axis 3 setpoint (f32, little-endian)
//! - Byte 12: gripper flag (0 = release, non-zero = grip)

/// Exact length of a command frame in bytes
pub const COMMAND_FRAME_LEN: usize = 13;

/// Errors that can occur while decoding a command frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Frame is not exactly [`COMMAND_FRAME_LEN`] bytes
    BadLength {
        /// Length of the rejected frame
        len: usize,
    },
}

/// A decoded motion command
///
/// The three axis setpoints are physical units as sent by the host; the
/// controller converts them to native pulse rates. A command fully replaces
/// the previous one — there is no merging of individual fields.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    /// Per-axis setpoint (m/s or m/s², build-time choice)
    pub axis: [f32; 3],
    /// Vacuum gripper activation
    pub activate_gripper: bool,
}

impl Command {
    /// All axes stopped, gripper released
    pub const STOP: Self = Self {
        axis: [0.0; 3],
        activate_gripper: false,
    };

    /// Decode a de-framed packet into a command
    ///
    /// Only a frame of exactly [`COMMAND_FRAME_LEN`] bytes is accepted; the
    /// caller keeps its previous command on error.
    pub fn decode(frame: &[u8]) -> Result<Self, FrameError> {
        if frame.len() != COMMAND_FRAME_LEN {
            return Err(FrameError::BadLength { len: frame.len() });
        }

        let mut axis = [0.0f32; 3];
        for (i, value) in axis.iter_mut().enumerate() {
            let start = i * 4;
            let mut raw = [0u8; 4];
            raw.copy_from_slice(&frame[start..start + 4]);
            *value = f32::from_le_bytes(raw);
        }

        Ok(Self {
            axis,
            activate_gripper: frame[COMMAND_FRAME_LEN - 1] != 0,
        })
    }

    /// Encode this command into its 13-byte frame image
    pub fn encode(&self) -> [u8; COMMAND_FRAME_LEN] {
        let mut frame = [0u8; COMMAND_FRAME_LEN];
        for (i, value) in self.axis.iter().enumerate() {
            frame[i * 4..i * 4 + 4].copy_from_slice(&value.to_le_bytes());
        }
        frame[COMMAND_FRAME_LEN - 1] = u8::from(self.activate_gripper);
        frame
    }
}
