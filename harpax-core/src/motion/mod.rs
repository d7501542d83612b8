//! Motion regulation and unit conversion

pub mod regulator;
pub mod units;

pub use regulator::{AxisDrive, AxisRegulator, AxisState};
pub use units::UnitConverter;

/// Number of gantry axes
pub const AXIS_COUNT: usize = 3;

/// Gantry axis identifiers
///
/// Discriminants double as array indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    /// All axes in index order
    pub const ALL: [Axis; AXIS_COUNT] = [Axis::X, Axis::Y, Axis::Z];

    /// Array index of this axis
    pub fn index(self) -> usize {
        self as usize
    }
}
