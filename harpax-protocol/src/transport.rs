//! Serial packet layer: COBS byte stuffing over a zero delimiter.
//!
//! The UART link carries consecutive packets separated by a `0x00` byte;
//! COBS stuffing guarantees the delimiter never appears inside a packet.
//! [`PacketAssembler`] is fed one received byte at a time and yields the
//! unstuffed payload whenever a delimiter arrives.
//!
//! There is no checksum on the link — a corrupted packet surfaces as a
//! malformed stuffing sequence or as a wrong-length command frame, both of
//! which the caller reports on the fault indicator.

use heapless::Vec;

/// Packet separator on the wire
pub const PACKET_DELIMITER: u8 = 0x00;

/// Maximum unstuffed packet size accepted from the link
pub const MAX_PACKET_SIZE: usize = 32;

/// Raw receive accumulator size (stuffed bytes between delimiters)
const RX_ACCUMULATOR_SIZE: usize = 64;

/// Errors that can occur on the packet layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// More bytes arrived between delimiters than the accumulator holds
    Overflow,
    /// Stuffing sequence is inconsistent (truncated or corrupted packet)
    Malformed,
    /// Destination buffer too small for encoding
    BufferTooSmall,
}

/// Unstuff a COBS-encoded packet (delimiter already stripped)
///
/// Returns the number of payload bytes written to `dst`.
fn unstuff(src: &[u8], dst: &mut [u8]) -> Result<usize, TransportError> {
    let mut read = 0;
    let mut write = 0;

    while read < src.len() {
        let code = src[read] as usize;
        if code == 0 {
            return Err(TransportError::Malformed);
        }
        read += 1;
        if read + code - 1 > src.len() {
            return Err(TransportError::Malformed);
        }
        for _ in 0..code - 1 {
            if write >= dst.len() {
                return Err(TransportError::Overflow);
            }
            dst[write] = src[read];
            write += 1;
            read += 1;
        }
        // A non-maximal block implies a zero byte, except at packet end
        if code != 0xFF && read < src.len() {
            if write >= dst.len() {
                return Err(TransportError::Overflow);
            }
            dst[write] = 0;
            write += 1;
        }
    }

    Ok(write)
}

/// COBS-stuff `src` into `dst`, appending the packet delimiter
///
/// Returns the number of bytes written. Intended for host-side senders and
/// tests; the controller itself only receives.
pub fn stuff(src: &[u8], dst: &mut [u8]) -> Result<usize, TransportError> {
    // Worst case: one code byte per 254 payload bytes, plus the delimiter
    let needed = src.len() + src.len() / 254 + 2;
    if dst.len() < needed {
        return Err(TransportError::BufferTooSmall);
    }

    let mut code_idx = 0;
    let mut write = 1;
    let mut code: u8 = 1;

    for &byte in src {
        if byte == 0 {
            dst[code_idx] = code;
            code_idx = write;
            write += 1;
            code = 1;
        } else {
            dst[write] = byte;
            write += 1;
            code += 1;
            if code == 0xFF {
                dst[code_idx] = code;
                code_idx = write;
                write += 1;
                code = 1;
            }
        }
    }

    dst[code_idx] = code;
    dst[write] = PACKET_DELIMITER;
    Ok(write + 1)
}

/// Accumulates received bytes into de-framed packets
///
/// Feed every byte read from the UART; a packet is returned when its
/// delimiter arrives. After an overflow the assembler keeps discarding
/// input until the next delimiter, then reports the overflow once, so a
/// single oversized packet cannot poison the ones after it.
#[derive(Debug, Clone, Default)]
pub struct PacketAssembler {
    buf: Vec<u8, RX_ACCUMULATOR_SIZE>,
    overflowed: bool,
}

impl PacketAssembler {
    /// Create an empty assembler
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            overflowed: false,
        }
    }

    /// Drop any partial packet and clear the overflow flag
    pub fn reset(&mut self) {
        self.buf.clear();
        self.overflowed = false;
    }

    /// Feed a single received byte
    ///
    /// Returns `Ok(Some(packet))` when a delimiter completes a packet,
    /// `Ok(None)` while accumulating, or `Err` when the delimiter closes a
    /// packet that overflowed or fails to unstuff.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Vec<u8, MAX_PACKET_SIZE>>, TransportError> {
        if byte != PACKET_DELIMITER {
            if !self.overflowed && self.buf.push(byte).is_err() {
                self.overflowed = true;
            }
            return Ok(None);
        }

        if self.overflowed {
            self.reset();
            return Err(TransportError::Overflow);
        }

        // Idle line or back-to-back delimiters
        if self.buf.is_empty() {
            return Ok(None);
        }

        let mut scratch = [0u8; MAX_PACKET_SIZE];
        let result = unstuff(&self.buf, &mut scratch);
        self.buf.clear();
        let len = result?;

        let mut packet = Vec::new();
        packet
            .extend_from_slice(&scratch[..len])
            .map_err(|_| TransportError::Overflow)?;
        Ok(Some(packet))
    }

    /// Feed multiple bytes, returning the first complete packet found
    ///
    /// Remaining bytes after a complete packet are not consumed.
    pub fn feed_bytes(
        &mut self,
        bytes: &[u8],
    ) -> Result<Option<Vec<u8, MAX_PACKET_SIZE>>, TransportError> {
        for &byte in bytes {
            if let Some(packet) = self.feed(byte)? {
                return Ok(Some(packet));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Command, COMMAND_FRAME_LEN};

    fn stuffed(payload: &[u8]) -> Vec<u8, 64> {
        let mut buf = [0u8; 64];
        let len = stuff(payload, &mut buf).unwrap();
        let mut out = Vec::new();
        out.extend_from_slice(&buf[..len]).unwrap();
        out
    }

    #[test]
    fn test_roundtrip_simple_payload() {
        let payload = [0x11, 0x22, 0x00, 0x33];
        let mut assembler = PacketAssembler::new();
        let packet = assembler.feed_bytes(&stuffed(&payload)).unwrap().unwrap();
        assert_eq!(&packet[..], &payload);
    }

    #[test]
    fn test_roundtrip_command_frame() {
        let cmd = Command {
            axis: [0.004, -0.0125, 0.0],
            activate_gripper: true,
        };
        let mut assembler = PacketAssembler::new();
        let packet = assembler.feed_bytes(&stuffed(&cmd.encode())).unwrap().unwrap();

        assert_eq!(packet.len(), COMMAND_FRAME_LEN);
        assert_eq!(Command::decode(&packet), Ok(cmd));
    }

    #[test]
    fn test_idle_delimiters_ignored() {
        let mut assembler = PacketAssembler::new();
        assert_eq!(assembler.feed(PACKET_DELIMITER), Ok(None));
        assert_eq!(assembler.feed(PACKET_DELIMITER), Ok(None));

        let packet = assembler.feed_bytes(&stuffed(&[0xAB])).unwrap().unwrap();
        assert_eq!(&packet[..], &[0xAB]);
    }

    #[test]
    fn test_overflow_reported_once_then_resyncs() {
        let mut assembler = PacketAssembler::new();

        // More stuffed bytes than the accumulator holds, no delimiter
        for _ in 0..200 {
            assert_eq!(assembler.feed(0x55), Ok(None));
        }
        assert_eq!(assembler.feed(PACKET_DELIMITER), Err(TransportError::Overflow));

        // The next packet goes through untouched
        let packet = assembler.feed_bytes(&stuffed(&[1, 2, 3])).unwrap().unwrap();
        assert_eq!(&packet[..], &[1, 2, 3]);
    }

    #[test]
    fn test_truncated_packet_is_malformed() {
        // Code byte promises 4 payload bytes, only 2 follow
        let mut assembler = PacketAssembler::new();
        for byte in [0x05, 0x11, 0x22] {
            assert_eq!(assembler.feed(byte), Ok(None));
        }
        assert_eq!(
            assembler.feed(PACKET_DELIMITER),
            Err(TransportError::Malformed)
        );
    }

    #[test]
    fn test_oversized_payload_is_overflow() {
        // Unstuffs to more than MAX_PACKET_SIZE bytes
        let payload = [0x42u8; MAX_PACKET_SIZE + 1];
        let mut assembler = PacketAssembler::new();
        assert_eq!(
            assembler.feed_bytes(&stuffed(&payload)),
            Err(TransportError::Overflow)
        );
    }

    #[test]
    fn test_stuff_rejects_small_buffer() {
        let mut buf = [0u8; 4];
        assert_eq!(
            stuff(&[1, 2, 3, 4, 5], &mut buf),
            Err(TransportError::BufferTooSmall)
        );
    }
}
