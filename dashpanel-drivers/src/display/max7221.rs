//! MAX7221 LED driver daisy chain
//!
//! The three drivers are chained on one chip select: DOUT of each feeds DIN
//! of the next, so one command is a 6-byte frame with a 16-bit word per
//! chip. The word for the last chip in the chain is clocked out first:
//!
//! ```text
//!   byte:  0      1     2      3     4      5
//!        [ op2 ][ d2 ][ op1 ][ d1 ][ op0 ][ d0 ]
//! ```
//!
//! Chips that are not addressed get a NO-OP word.

use dashpanel_core::traits::LedChain;
use dashpanel_hal::SpiDevice;
use embedded_hal::delay::DelayNs;

/// MAX7221 register addresses
pub mod reg {
    pub const NO_OP: u8 = 0x00;
    /// Digit 0; digits 1..=7 follow consecutively
    pub const DIGIT0: u8 = 0x01;
    pub const DECODE_MODE: u8 = 0x09;
    pub const INTENSITY: u8 = 0x0A;
    pub const SCAN_LIMIT: u8 = 0x0B;
    pub const SHUTDOWN: u8 = 0x0C;
    pub const DISPLAY_TEST: u8 = 0x0F;
}

/// Chips in the chain
pub const CHAIN_LEN: usize = 3;

/// Bytes per chain command
pub const FRAME_LEN: usize = 2 * CHAIN_LEN;

/// Digits per chip
pub const DIGIT_COUNT: u8 = 8;

/// Brightness programmed at bring-up
pub const DEFAULT_INTENSITY: u8 = 5;

/// Highest brightness level
pub const MAX_INTENSITY: u8 = 15;

/// Scan all eight digits
const SCAN_ALL_DIGITS: u8 = 0x07;

/// Time in shutdown before the registers are programmed
pub const SHUTDOWN_SETTLE_MS: u32 = 10;

/// LED chain errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Max7221Error {
    /// SPI transaction failed
    Spi,
    /// Chip index outside the chain
    InvalidChip(u8),
    /// Digit outside 0..=7
    InvalidDigit(u8),
    /// Intensity above 15
    InvalidIntensity(u8),
}

/// Build a chain frame addressing one chip
pub fn command_frame(chip: u8, opcode: u8, data: u8) -> Result<[u8; FRAME_LEN], Max7221Error> {
    if chip as usize >= CHAIN_LEN {
        return Err(Max7221Error::InvalidChip(chip));
    }

    let mut frame = [reg::NO_OP; FRAME_LEN];
    let offset = FRAME_LEN - 2 - 2 * chip as usize;
    frame[offset] = opcode;
    frame[offset + 1] = data;
    Ok(frame)
}

/// Chain of three MAX7221 drivers behind one chip select
pub struct Max7221Chain<S> {
    spi: S,
}

impl<S: SpiDevice> Max7221Chain<S> {
    pub fn new(spi: S) -> Self {
        Self { spi }
    }

    /// Bring one chip up with all digits blank, no decoding and
    /// the default brightness
    pub fn init(&mut self, chip: u8, delay: &mut impl DelayNs) -> Result<(), Max7221Error> {
        self.set_shutdown(chip, true)?;
        delay.delay_ms(SHUTDOWN_SETTLE_MS);

        for digit in 0..DIGIT_COUNT {
            self.write_digit(chip, digit, 0x00)?;
        }
        self.command(chip, reg::DECODE_MODE, 0x00)?;
        self.command(chip, reg::INTENSITY, DEFAULT_INTENSITY)?;
        self.command(chip, reg::SCAN_LIMIT, SCAN_ALL_DIGITS)?;
        self.set_display_test(chip, false)?;
        self.set_shutdown(chip, false)
    }

    /// Bring every chip in the chain up
    pub fn init_all(&mut self, delay: &mut impl DelayNs) -> Result<(), Max7221Error> {
        for chip in 0..CHAIN_LEN as u8 {
            self.init(chip, delay)?;
        }
        Ok(())
    }

    pub fn set_shutdown(&mut self, chip: u8, shutdown: bool) -> Result<(), Max7221Error> {
        self.command(chip, reg::SHUTDOWN, u8::from(!shutdown))
    }

    pub fn set_display_test(&mut self, chip: u8, on: bool) -> Result<(), Max7221Error> {
        self.command(chip, reg::DISPLAY_TEST, u8::from(on))
    }

    /// Send one register write to one chip
    pub fn command(&mut self, chip: u8, opcode: u8, data: u8) -> Result<(), Max7221Error> {
        let frame = command_frame(chip, opcode, data)?;
        self.spi.write(&frame).map_err(|_| Max7221Error::Spi)
    }
}

impl<S: SpiDevice> LedChain for Max7221Chain<S> {
    type Error = Max7221Error;

    fn write_digit(&mut self, chip: u8, digit: u8, value: u8) -> Result<(), Self::Error> {
        if digit >= DIGIT_COUNT {
            return Err(Max7221Error::InvalidDigit(digit));
        }
        self.command(chip, reg::DIGIT0 + digit, value)
    }

    fn set_decode_mode(&mut self, chip: u8, mask: u8) -> Result<(), Self::Error> {
        self.command(chip, reg::DECODE_MODE, mask)
    }

    fn set_intensity(&mut self, chip: u8, level: u8) -> Result<(), Self::Error> {
        if level > MAX_INTENSITY {
            return Err(Max7221Error::InvalidIntensity(level));
        }
        self.command(chip, reg::INTENSITY, level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{self, Event, MockDelay, MockSpi};
    use std::vec;

    #[test]
    fn test_frame_layout() {
        assert_eq!(command_frame(0, 0x01, 0xAA), Ok([0, 0, 0, 0, 0x01, 0xAA]));
        assert_eq!(command_frame(1, 0x02, 0xBB), Ok([0, 0, 0x02, 0xBB, 0, 0]));
        assert_eq!(command_frame(2, 0x0C, 0x01), Ok([0x0C, 0x01, 0, 0, 0, 0]));
        assert_eq!(
            command_frame(3, 0x01, 0x00),
            Err(Max7221Error::InvalidChip(3))
        );
    }

    #[test]
    fn test_init_sequence() {
        let log = mock::log();
        let mut chain = Max7221Chain::new(MockSpi::new(&log));
        let mut delay = MockDelay { log: log.clone() };

        chain.init(1, &mut delay).unwrap();

        let events = mock::events(&log);
        assert_eq!(events.len(), 15);
        assert_eq!(events[0], Event::Write(vec![0, 0, 0x0C, 0x00, 0, 0]));
        assert_eq!(events[1], Event::DelayMs(10));
        assert_eq!(events[2], Event::Write(vec![0, 0, 0x01, 0x00, 0, 0]));
        assert_eq!(events[9], Event::Write(vec![0, 0, 0x08, 0x00, 0, 0]));
        assert_eq!(events[10], Event::Write(vec![0, 0, 0x09, 0x00, 0, 0]));
        assert_eq!(events[11], Event::Write(vec![0, 0, 0x0A, 0x05, 0, 0]));
        assert_eq!(events[12], Event::Write(vec![0, 0, 0x0B, 0x07, 0, 0]));
        assert_eq!(events[13], Event::Write(vec![0, 0, 0x0F, 0x00, 0, 0]));
        assert_eq!(events[14], Event::Write(vec![0, 0, 0x0C, 0x01, 0, 0]));
    }

    #[test]
    fn test_led_chain_commands() {
        let log = mock::log();
        let mut chain = Max7221Chain::new(MockSpi::new(&log));

        chain.write_digit(0, 7, 0x85).unwrap();
        chain.set_decode_mode(2, 0xF0).unwrap();
        chain.set_intensity(1, 8).unwrap();

        assert_eq!(
            mock::writes(&log),
            vec![
                vec![0, 0, 0, 0, 0x08, 0x85],
                vec![0x09, 0xF0, 0, 0, 0, 0],
                vec![0, 0, 0x0A, 0x08, 0, 0],
            ]
        );
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let log = mock::log();
        let mut chain = Max7221Chain::new(MockSpi::new(&log));

        assert_eq!(
            chain.write_digit(0, 8, 0),
            Err(Max7221Error::InvalidDigit(8))
        );
        assert_eq!(
            chain.set_intensity(0, 16),
            Err(Max7221Error::InvalidIntensity(16))
        );
        assert!(mock::writes(&log).is_empty());

        chain.spi.fail = true;
        assert_eq!(chain.write_digit(0, 0, 0), Err(Max7221Error::Spi));
    }
}
