//! MCP23S17 16-bit SPI I/O expander bank
//!
//! Three expanders share one chip select and are told apart by their
//! hardware address pins (0x20, 0x21, 0x22). Every register access is a
//! three-byte transaction:
//!
//! - Opcode: `0100 A2 A1 A0 R/W` (the address shifted left, read bit last)
//! - Register address
//! - Data (write) or a dummy byte clocked out while the chip answers (read)
//!
//! # Configuration
//!
//! All 16 pins of each chip are inputs with interrupt-on-change against the
//! previous value, except the high nibble of chip 3 port B, which drives the
//! four activity LEDs. IOCON mirrors INTA/INTB onto one active-high line and
//! enables hardware addressing; until HAEN is set every chip answers every
//! address, so the first chip's IOCON write reaches all three.

use dashpanel_core::input::{PortSample, PORT_COUNT};
use dashpanel_core::traits::PortSampler;
use dashpanel_hal::{OutputPin, SpiDevice};
use embedded_hal::delay::DelayNs;

/// MCP23S17 register addresses (IOCON.BANK = 0)
pub mod reg {
    /// Port A direction (1 = input)
    pub const IODIRA: u8 = 0x00;
    /// Port B direction
    pub const IODIRB: u8 = 0x01;
    /// Port A input polarity
    pub const IOPOLA: u8 = 0x02;
    /// Port B input polarity
    pub const IOPOLB: u8 = 0x03;
    /// Port A interrupt-on-change enable
    pub const GPINTENA: u8 = 0x04;
    /// Port B interrupt-on-change enable
    pub const GPINTENB: u8 = 0x05;
    /// Port A default compare value
    pub const DEFVALA: u8 = 0x06;
    /// Port B default compare value
    pub const DEFVALB: u8 = 0x07;
    /// Port A interrupt control (0 = compare with previous value)
    pub const INTCONA: u8 = 0x08;
    /// Port B interrupt control
    pub const INTCONB: u8 = 0x09;
    /// Expander configuration
    pub const IOCON: u8 = 0x0A;
    /// Port A pull-ups
    pub const GPPUA: u8 = 0x0C;
    /// Port B pull-ups
    pub const GPPUB: u8 = 0x0D;
    /// Port A pin levels
    pub const GPIOA: u8 = 0x12;
    /// Port B pin levels
    pub const GPIOB: u8 = 0x13;
}

/// Hardware addresses of the three chips, in sampling order
pub const ADDRESSES: [u8; 3] = [0x20, 0x21, 0x22];

/// IOCON: MIRROR | SEQOP | HAEN | INTPOL
pub const IOCON_VALUE: u8 = 0x6A;

/// Reset line low time
pub const RESET_PULSE_MS: u32 = 150;

/// Chip whose port B carries the activity LEDs
pub const ACTIVITY_CHIP: usize = 2;

/// Port B direction of the activity chip: low nibble in, high nibble out
const ACTIVITY_PORT_INPUTS: u8 = 0x0F;

/// Expander errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mcp23s17Error {
    /// SPI transaction failed
    Spi,
    /// Chip index outside the bank
    InvalidChip(u8),
}

/// Build the opcode byte for a chip
fn opcode(chip: usize, read: bool) -> u8 {
    (ADDRESSES[chip] << 1) | u8::from(read)
}

/// Register writes that configure one chip, in bring-up order
pub fn init_sequence(chip: usize) -> [(u8, u8); 13] {
    let port_b_inputs = if chip == ACTIVITY_CHIP {
        ACTIVITY_PORT_INPUTS
    } else {
        0xFF
    };

    [
        (reg::IODIRA, 0xFF),
        (reg::IODIRB, port_b_inputs),
        (reg::IOPOLA, 0x00),
        (reg::IOPOLB, 0x00),
        (reg::GPINTENA, 0xFF),
        (reg::GPINTENB, port_b_inputs),
        (reg::DEFVALA, 0x00),
        (reg::DEFVALB, 0x00),
        (reg::INTCONA, 0x00),
        (reg::INTCONB, 0x00),
        (reg::IOCON, IOCON_VALUE),
        (reg::GPPUA, 0x00),
        (reg::GPPUB, 0x00),
    ]
}

/// Bank of three MCP23S17 expanders behind one chip select
pub struct Mcp23s17Bank<S, R> {
    spi: S,
    reset: R,
}

impl<S, R> Mcp23s17Bank<S, R>
where
    S: SpiDevice,
    R: OutputPin,
{
    pub fn new(spi: S, reset: R) -> Self {
        Self { spi, reset }
    }

    /// Pulse the shared active-low reset line
    pub fn reset(&mut self, delay: &mut impl DelayNs) {
        self.reset.set_low();
        delay.delay_ms(RESET_PULSE_MS);
        self.reset.set_high();
    }

    /// Configure every chip in the bank
    pub fn init(&mut self) -> Result<(), Mcp23s17Error> {
        for chip in 0..ADDRESSES.len() {
            for (register, value) in init_sequence(chip) {
                self.write_register(chip, register, value)?;
            }
        }
        Ok(())
    }

    /// Check that every chip reads back the expected IOCON value
    ///
    /// Returns the index of the first chip that does not.
    pub fn verify(&mut self) -> Result<Option<usize>, Mcp23s17Error> {
        for chip in 0..ADDRESSES.len() {
            if self.read_register(chip, reg::IOCON)? != IOCON_VALUE {
                return Ok(Some(chip));
            }
        }
        Ok(None)
    }

    pub fn write_register(
        &mut self,
        chip: usize,
        register: u8,
        value: u8,
    ) -> Result<(), Mcp23s17Error> {
        check_chip(chip)?;
        self.spi
            .write(&[opcode(chip, false), register, value])
            .map_err(|_| Mcp23s17Error::Spi)
    }

    pub fn read_register(&mut self, chip: usize, register: u8) -> Result<u8, Mcp23s17Error> {
        check_chip(chip)?;
        let mut read = [0u8; 3];
        self.spi
            .transfer(&mut read, &[opcode(chip, true), register, 0x00])
            .map_err(|_| Mcp23s17Error::Spi)?;
        Ok(read[2])
    }
}

fn check_chip(chip: usize) -> Result<(), Mcp23s17Error> {
    if chip < ADDRESSES.len() {
        Ok(())
    } else {
        Err(Mcp23s17Error::InvalidChip(chip as u8))
    }
}

impl<S, R> PortSampler for Mcp23s17Bank<S, R>
where
    S: SpiDevice,
    R: OutputPin,
{
    type Error = Mcp23s17Error;

    fn sample(&mut self) -> Result<PortSample, Self::Error> {
        let mut ports = [0u8; PORT_COUNT];
        for (i, port) in ports.iter_mut().enumerate() {
            let register = if i % 2 == 0 { reg::GPIOA } else { reg::GPIOB };
            *port = self.read_register(i / 2, register)?;
        }
        Ok(PortSample::new(ports))
    }

    fn write_activity(&mut self, value: u8) -> Result<(), Self::Error> {
        self.write_register(ACTIVITY_CHIP, reg::GPIOB, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{self, Event, MockDelay, MockPin, MockSpi};
    use std::vec;

    fn bank(log: &mock::Log) -> Mcp23s17Bank<MockSpi, MockPin> {
        Mcp23s17Bank::new(
            MockSpi::new(log),
            MockPin {
                log: log.clone(),
                high: true,
            },
        )
    }

    #[test]
    fn test_opcodes() {
        assert_eq!(opcode(0, false), 0x40);
        assert_eq!(opcode(1, false), 0x42);
        assert_eq!(opcode(2, true), 0x45);
    }

    #[test]
    fn test_reset_pulse() {
        let log = mock::log();
        let mut bank = bank(&log);
        let mut delay = MockDelay { log: log.clone() };

        bank.reset(&mut delay);
        assert_eq!(
            mock::events(&log),
            vec![Event::Pin(false), Event::DelayMs(150), Event::Pin(true)]
        );
    }

    #[test]
    fn test_init_configures_every_chip() {
        let log = mock::log();
        let mut bank = bank(&log);
        bank.init().unwrap();

        let writes = mock::writes(&log);
        assert_eq!(writes.len(), 39);
        assert_eq!(writes[0], vec![0x40, reg::IODIRA, 0xFF]);
        assert_eq!(writes[10], vec![0x40, reg::IOCON, 0x6A]);
        assert_eq!(writes[13], vec![0x42, reg::IODIRA, 0xFF]);
        // activity chip: upper nibble of port B is output, no interrupts there
        assert_eq!(writes[27], vec![0x44, reg::IODIRB, 0x0F]);
        assert_eq!(writes[31], vec![0x44, reg::GPINTENB, 0x0F]);
        assert_eq!(writes[38], vec![0x44, reg::GPPUB, 0x00]);
    }

    #[test]
    fn test_sample_reads_ports_in_order() {
        let log = mock::log();
        let mut bank = bank(&log);
        bank.spi.responses.extend([0x11, 0x22, 0x33, 0x44, 0x55, 0x06]);

        let sample = bank.sample().unwrap();
        assert_eq!(sample.ports, [0x11, 0x22, 0x33, 0x44, 0x55, 0x06]);
        assert_eq!(
            mock::events(&log),
            vec![
                Event::Transfer(vec![0x41, reg::GPIOA, 0]),
                Event::Transfer(vec![0x41, reg::GPIOB, 0]),
                Event::Transfer(vec![0x43, reg::GPIOA, 0]),
                Event::Transfer(vec![0x43, reg::GPIOB, 0]),
                Event::Transfer(vec![0x45, reg::GPIOA, 0]),
                Event::Transfer(vec![0x45, reg::GPIOB, 0]),
            ]
        );
    }

    #[test]
    fn test_activity_goes_to_chip_three_port_b() {
        let log = mock::log();
        let mut bank = bank(&log);
        bank.write_activity(0xB0).unwrap();
        assert_eq!(mock::writes(&log), vec![vec![0x44, reg::GPIOB, 0xB0]]);
    }

    #[test]
    fn test_verify_reports_first_bad_chip() {
        let log = mock::log();
        let mut bank = bank(&log);
        bank.spi.responses.extend([IOCON_VALUE, 0x00]);
        assert_eq!(bank.verify(), Ok(Some(1)));

        bank.spi.responses.extend([IOCON_VALUE; 3]);
        assert_eq!(bank.verify(), Ok(None));
    }

    #[test]
    fn test_errors() {
        let log = mock::log();
        let mut bank = bank(&log);
        assert_eq!(
            bank.write_register(3, reg::GPIOA, 0),
            Err(Mcp23s17Error::InvalidChip(3))
        );

        bank.spi.fail = true;
        assert_eq!(bank.sample(), Err(Mcp23s17Error::Spi));
    }
}
