//! Control loop task
//!
//! One iteration per tick, in fixed order: take the newest command if one
//! arrived, then run the portal tick (per-axis regulation with endstop
//! override, gripper mirror, pulse emission).

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};

use harpax_core::portal::Portal;
use harpax_drivers::endstop::SwitchPair;
use harpax_drivers::stepper::PulseStepper;
use harpax_drivers::valve::VacuumValve;

use crate::channels::COMMAND;
use crate::gpio::{BoardInput, BoardOutput};

/// Control tick interval in microseconds
///
/// The regulator's per-tick constants (rate step, soft-stop decay) are
/// calibrated against this cadence.
pub const TICK_INTERVAL_US: u64 = 1000;

/// Concrete portal type wired to the board's GPIO
pub type PickPortal =
    Portal<PulseStepper<BoardOutput>, SwitchPair<BoardInput>, VacuumValve<BoardOutput>>;

/// Control task - the machine's single regulation loop
#[embassy_executor::task]
pub async fn control_task(mut portal: PickPortal) {
    info!("Control task started");

    let mut ticker = Ticker::every(Duration::from_micros(TICK_INTERVAL_US));

    loop {
        ticker.next().await;

        if let Some(cmd) = COMMAND.try_take() {
            portal.apply(&cmd);
        }

        portal.tick(Instant::now().as_micros());
    }
}
