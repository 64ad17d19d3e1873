//! RP2040-specific HAL for the panel firmware
//!
//! This crate provides RP2040 implementations of the shared
//! `dashpanel-hal` traits:
//!
//! - GPIO outputs (expander reset line)
//! - Chip-select devices on one shared blocking SPI bus

#![no_std]

pub mod gpio;
pub mod spi;

pub use gpio::RpOutput;
pub use spi::{bus_config, SharedBus, SharedSpiDevice, SpiDeviceError};
