//! Embassy task definitions

pub mod control;
pub mod serial;

pub use control::{control_task, PickPortal};
pub use serial::serial_rx_task;
