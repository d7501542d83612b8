//! Inter-task communication channels
//!
//! Uses embassy-sync primitives for safe async communication between the
//! receive path and the control loop.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use harpax_protocol::Command;

/// Latest decoded command from the host
///
/// A `Signal` holds exactly one value and overwrites it on every send —
/// the wire protocol's last-write-wins slot, with no queue to drain.
pub static COMMAND: Signal<CriticalSectionRawMutex, Command> = Signal::new();
