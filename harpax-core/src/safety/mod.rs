//! Safety-relevant predicates and fault state
//!
//! End-of-travel gating for the motion regulator and the sticky fault
//! indicator for link errors.

pub mod endstop;
pub mod fault;

pub use endstop::LimitSwitches;
pub use fault::{FaultKind, FaultLatch};
