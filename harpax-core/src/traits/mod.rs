//! Hardware abstraction traits
//!
//! These traits define the interface between the control logic and
//! hardware-specific implementations.

pub mod actuator;
pub mod endstop;
pub mod gripper;

pub use actuator::StepActuator;
pub use endstop::EndstopInput;
pub use gripper::GripperValve;
