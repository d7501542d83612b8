//! Harpax - Portal Pick-Robot Firmware
//!
//! Main firmware binary for RP2040-based pick-robot controllers. Drives a
//! 3-axis gantry with stepper motors and a vacuum gripper, open loop, from
//! commands arriving over a point-to-point serial link.
//!
//! Named after the Greek "harpax" (ἅρπαξ) meaning "snatcher".

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use harpax_core::config::PortalConfig;
use harpax_core::portal::Portal;
use harpax_drivers::endstop::SwitchPair;
use harpax_drivers::stepper::{PulseStepper, PulseStepperConfig};
use harpax_drivers::valve::VacuumValve;

use crate::gpio::{BoardInput, BoardOutput};

mod channels;
mod gpio;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Harpax firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Host link on UART0 (GPIO0 TX, GPIO1 RX), 115200 baud default
    let uart_config = UartConfig::default();
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (_tx, rx) = uart.split();
    info!("UART initialized for host link");

    // Pin map:
    //   X axis: STEP=GPIO2  DIR=GPIO3  EN=GPIO4   endstops min=GPIO11 max=GPIO12
    //   Y axis: STEP=GPIO5  DIR=GPIO6  EN=GPIO7   endstops min=GPIO13 max=GPIO14
    //   Z axis: STEP=GPIO8  DIR=GPIO9  EN=GPIO10  endstops min=GPIO15 max=GPIO16
    //   Vacuum valve: GPIO17, fault indicator: GPIO25 (onboard LED)
    let stepper_config = PulseStepperConfig::default();

    let x_axis = PulseStepper::new(
        BoardOutput(Output::new(p.PIN_2, Level::Low)),
        BoardOutput(Output::new(p.PIN_3, Level::Low)),
        BoardOutput(Output::new(p.PIN_4, Level::High)),
        stepper_config,
    );
    let y_axis = PulseStepper::new(
        BoardOutput(Output::new(p.PIN_5, Level::Low)),
        BoardOutput(Output::new(p.PIN_6, Level::Low)),
        BoardOutput(Output::new(p.PIN_7, Level::High)),
        stepper_config,
    );
    let z_axis = PulseStepper::new(
        BoardOutput(Output::new(p.PIN_8, Level::Low)),
        BoardOutput(Output::new(p.PIN_9, Level::Low)),
        BoardOutput(Output::new(p.PIN_10, Level::High)),
        stepper_config,
    );

    // Limit switches are normally-open to ground, so pull up and read
    // active-low
    let endstops = [
        SwitchPair::active_low(
            BoardInput(Input::new(p.PIN_11, Pull::Up)),
            BoardInput(Input::new(p.PIN_12, Pull::Up)),
        ),
        SwitchPair::active_low(
            BoardInput(Input::new(p.PIN_13, Pull::Up)),
            BoardInput(Input::new(p.PIN_14, Pull::Up)),
        ),
        SwitchPair::active_low(
            BoardInput(Input::new(p.PIN_15, Pull::Up)),
            BoardInput(Input::new(p.PIN_16, Pull::Up)),
        ),
    ];

    let valve = VacuumValve::new_active_high(BoardOutput(Output::new(p.PIN_17, Level::Low)));
    let fault_led = Output::new(p.PIN_25, Level::Low);

    let portal = Portal::new(
        [x_axis, y_axis, z_axis],
        endstops,
        valve,
        &PortalConfig::default(),
    );
    info!("Portal initialized");

    // Spawn tasks
    spawner.spawn(tasks::serial_rx_task(rx, fault_led)).unwrap();
    spawner.spawn(tasks::control_task(portal)).unwrap();

    info!("Harpax ready");
}
