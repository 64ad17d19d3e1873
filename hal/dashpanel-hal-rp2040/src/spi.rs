//! Shared SPI bus with per-device chip selects
//!
//! The expanders, the LED chain and the CAN controller sit on one SPI bus.
//! Each [`SharedSpiDevice`] owns its chip select and borrows the bus for
//! the length of one transaction.

use core::cell::RefCell;

use dashpanel_hal::spi::{Mode, SpiConfig};
use dashpanel_hal::SpiDevice;
use embassy_rp::gpio::Output;
use embassy_rp::spi::{Config, Phase, Polarity};
use embassy_sync::blocking_mutex::CriticalSectionMutex;
use embedded_hal::spi::SpiBus;

/// Bus shared between the chip-select devices
pub type SharedBus<B> = CriticalSectionMutex<RefCell<B>>;

/// SPI device errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiDeviceError {
    /// The bus driver reported an error
    Bus,
    /// Another device is mid-transaction
    Busy,
}

/// Convert the board-agnostic bus settings into the RP2040 SPI config
pub fn bus_config(config: &SpiConfig) -> Config {
    let (polarity, phase) = match config.mode {
        Mode::Mode0 => (Polarity::IdleLow, Phase::CaptureOnFirstTransition),
        Mode::Mode1 => (Polarity::IdleLow, Phase::CaptureOnSecondTransition),
        Mode::Mode2 => (Polarity::IdleHigh, Phase::CaptureOnFirstTransition),
        Mode::Mode3 => (Polarity::IdleHigh, Phase::CaptureOnSecondTransition),
    };

    let mut bus = Config::default();
    bus.frequency = config.frequency;
    bus.polarity = polarity;
    bus.phase = phase;
    bus
}

/// One chip select on the shared bus
pub struct SharedSpiDevice<'a, B> {
    bus: &'a SharedBus<B>,
    cs: Output<'a>,
}

impl<'a, B> SharedSpiDevice<'a, B>
where
    B: SpiBus<u8>,
{
    /// `cs` must start out high
    pub fn new(bus: &'a SharedBus<B>, cs: Output<'a>) -> Self {
        Self { bus, cs }
    }

    fn transaction(
        &mut self,
        op: impl FnOnce(&mut B) -> Result<(), B::Error>,
    ) -> Result<(), SpiDeviceError> {
        let cs = &mut self.cs;
        self.bus.lock(|cell| {
            let mut bus = cell.try_borrow_mut().map_err(|_| SpiDeviceError::Busy)?;
            cs.set_low();
            let result = op(&mut bus).and_then(|_| bus.flush());
            cs.set_high();
            result.map_err(|_| SpiDeviceError::Bus)
        })
    }
}

impl<B> SpiDevice for SharedSpiDevice<'_, B>
where
    B: SpiBus<u8>,
{
    type Error = SpiDeviceError;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.transaction(|bus| bus.write(data))
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.transaction(|bus| bus.transfer(read, write))
    }
}
