//! Adapters from embassy-rp GPIO to the driver pin traits

use embassy_rp::gpio::{Input, Output};

use harpax_drivers::gpio::{InputPin, OutputPin};

/// Owned push-pull output pin
pub struct BoardOutput(pub Output<'static>);

impl OutputPin for BoardOutput {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }
}

/// Owned input pin
pub struct BoardInput(pub Input<'static>);

impl InputPin for BoardInput {
    fn is_high(&mut self) -> bool {
        self.0.is_high()
    }
}
