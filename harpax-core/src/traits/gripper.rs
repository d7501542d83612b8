//! Gripper valve trait

/// Trait for the vacuum end-effector output
///
/// The gripper has no intermediate states: the valve is either energized or
/// released, directly mirroring the latest command.
pub trait GripperValve {
    /// Energize or release the valve
    fn set_active(&mut self, active: bool);

    /// Check the last commanded valve state
    fn is_active(&self) -> bool;
}
