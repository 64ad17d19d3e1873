//! Dashpanel - Instrument Cluster Test Panel Firmware
//!
//! Main firmware binary for the RP2040 panel board. Reads 35 switches and
//! three rotary encoders through MCP23S17 expanders, mirrors them on a
//! MAX7221 LED matrix and drives a CAN instrument cluster through an
//! MCP2515.
//!
//! Board wiring (SPI0 shared by all chips):
//!
//! | Signal | GPIO |
//! |--------|------|
//! | SCK / MOSI / MISO | 18 / 19 / 16 |
//! | Expander CS | 17 |
//! | LED chain CS | 20 |
//! | CAN CS | 21 |
//! | Expander reset (active-low) | 22 |
//! | Expander INT (active-high) | 15 |

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::spi::Spi;
use embassy_sync::blocking_mutex::CriticalSectionMutex;
use embassy_time::{Delay, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use dashpanel_core::panel::Panel;
use dashpanel_drivers::can::Mcp2515;
use dashpanel_drivers::display::Max7221Chain;
use dashpanel_drivers::expander::Mcp23s17Bank;
use dashpanel_hal::SpiConfig;
use dashpanel_hal_rp2040::{bus_config, RpOutput, SharedBus, SharedSpiDevice};

use crate::channels::TICKS;
use crate::config::load_config;
use crate::tasks::panel::Bus;

mod channels;
mod config;
mod tasks;

/// Embedded configuration (compiled into firmware)
/// Edit panel.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../panel.toml");

/// Settle time after the LED drivers come up
const LED_SETTLE_MS: u64 = 300;

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

static SPI_BUS: StaticCell<SharedBus<Bus>> = StaticCell::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Dashpanel firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config(EMBEDDED_CONFIG);
    channels::configure(&config.panel);
    info!("Configuration loaded: {}", config);

    // Tick and input tasks preempt the blocking control loop
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    high.spawn(tasks::tick_task()).unwrap();

    // Shared SPI bus
    let spi = Spi::new_blocking(
        p.SPI0,
        p.PIN_18,
        p.PIN_19,
        p.PIN_16,
        bus_config(&SpiConfig::default()),
    );
    let bus: &'static SharedBus<Bus> = SPI_BUS.init(CriticalSectionMutex::new(RefCell::new(spi)));

    let expander_cs = Output::new(p.PIN_17, Level::High);
    let led_cs = Output::new(p.PIN_20, Level::High);
    let can_cs = Output::new(p.PIN_21, Level::High);
    let expander_reset = RpOutput::new(Output::new(p.PIN_22, Level::High));

    let mut delay = Delay;

    // Input expanders
    let mut expanders = Mcp23s17Bank::new(SharedSpiDevice::new(bus, expander_cs), expander_reset);
    expanders.reset(&mut delay);
    if let Err(e) = expanders.init() {
        error!("Expander init failed: {}", e);
    }
    match expanders.verify() {
        Ok(None) => info!("Expanders initialized"),
        Ok(Some(chip)) => warn!("Expander {} did not take its configuration", chip),
        Err(e) => warn!("Expander readback failed: {}", e),
    }

    // LED drivers
    let mut leds = Max7221Chain::new(SharedSpiDevice::new(bus, led_cs));
    if let Err(e) = leds.init_all(&mut delay) {
        error!("LED chain init failed: {}", e);
    }
    Timer::after_millis(LED_SETTLE_MS).await;
    info!("LED chain initialized");

    // CAN controller
    let mut can = Mcp2515::new(SharedSpiDevice::new(bus, can_cs), Delay);
    if let Err(e) = can.init(config.bit_timing()) {
        error!("CAN controller init failed: {}", e);
    }
    match can.is_normal_mode() {
        Ok(true) => info!("CAN controller in normal mode"),
        Ok(false) => warn!("CAN controller did not enter normal mode"),
        Err(e) => warn!("CAN controller readback failed: {}", e),
    }

    // Expander interrupt line
    let int = Input::new(p.PIN_15, Pull::Down);
    high.spawn(tasks::input_irq_task(int)).unwrap();

    let mut panel = Panel::new(expanders, leds, can, Delay, config.panel);
    if config.panel.boot_demo {
        info!("Running boot demonstration");
    }
    if let Err(e) = panel.start(&TICKS) {
        error!("Panel start failed: {}", e);
    }

    spawner.spawn(tasks::panel_task(panel)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
