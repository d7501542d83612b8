//! Host-link receive task
//!
//! Reads raw bytes from the UART, assembles and decodes command packets,
//! and publishes each good command to the latest-command slot. Any receive
//! fault lights the indicator LED, which stays lit until power-off.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use harpax_core::safety::{FaultKind, FaultLatch};
use harpax_protocol::{Command, PacketAssembler, TransportError};

use crate::channels::COMMAND;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Serial RX task - receives and decodes commands from the host
#[embassy_executor::task]
pub async fn serial_rx_task(mut rx: BufferedUartRx, mut fault_led: Output<'static>) {
    info!("Serial RX task started");

    let mut assembler = PacketAssembler::new();
    let mut faults = FaultLatch::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                for &byte in &buf[..n] {
                    match assembler.feed(byte) {
                        Ok(Some(packet)) => match Command::decode(&packet) {
                            Ok(cmd) => {
                                trace!("Command: {:?}", cmd);
                                COMMAND.signal(cmd);
                            }
                            Err(e) => {
                                // Keep the previous command; only flag the fault
                                warn!("Bad command frame: {:?}", e);
                                raise(&mut faults, &mut fault_led, FaultKind::FrameLength);
                            }
                        },
                        Ok(None) => {
                            // Packet still accumulating
                        }
                        Err(TransportError::Overflow) => {
                            warn!("Receive overflow");
                            raise(&mut faults, &mut fault_led, FaultKind::ReceiveOverflow);
                        }
                        Err(e) => {
                            warn!("Transport error: {:?}", e);
                            raise(&mut faults, &mut fault_led, FaultKind::FrameLength);
                        }
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Latch the fault and assert the indicator; nothing clears it
fn raise(faults: &mut FaultLatch, led: &mut Output<'static>, kind: FaultKind) {
    faults.raise(kind);
    led.set_high();
}
