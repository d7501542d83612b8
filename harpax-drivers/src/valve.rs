//! Vacuum gripper valve output
//!
//! Drives the suction valve (directly or via a MOSFET stage) from a single
//! GPIO pin.

use harpax_core::traits::GripperValve;

use crate::gpio::OutputPin;

/// GPIO vacuum valve
///
/// The pin can be configured as active-high (default) or active-low.
pub struct VacuumValve<P> {
    pin: P,
    /// If true, valve ON = pin LOW
    inverted: bool,
    /// Current logical state (true = gripping)
    active: bool,
}

impl<P: OutputPin> VacuumValve<P> {
    /// Create a valve output, released
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin to control
    /// - `inverted`: If true, the valve is ON when the pin is LOW
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut valve = Self {
            pin,
            inverted,
            active: false,
        };
        // Ensure the gripper starts released
        valve.set_active(false);
        valve
    }

    /// Create a valve with active-high output
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Create a valve with active-low output
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }
}

impl<P: OutputPin> GripperValve for VacuumValve<P> {
    fn set_active(&mut self, active: bool) {
        self.active = active;
        self.pin.set_state(active != self.inverted);
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
