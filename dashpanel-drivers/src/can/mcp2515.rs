//! MCP2515 stand-alone CAN controller (transmit only)
//!
//! The panel only ever sends, so the driver uses transmit buffer 0 and
//! leaves the receive side at its reset defaults.
//!
//! # SPI Protocol
//!
//! - `RESET` (0xC0): single byte, the chip needs time to come back up
//! - `WRITE` (0x02): address, then any number of sequential data bytes
//! - `READ` (0x03): address, then one dummy byte per register
//! - `BIT MODIFY` (0x05): address, mask, data
//! - `RTS TXB0` (0x81): request transmission of buffer 0
//!
//! The controller is given a millisecond after every register write and
//! command before the next transaction.

use dashpanel_core::traits::FrameTransmit;
use dashpanel_hal::SpiDevice;
use dashpanel_protocol::{CanFrame, FrameError, TX_BUFFER_LEN};
use embedded_hal::delay::DelayNs;

/// SPI instructions
pub mod instruction {
    pub const RESET: u8 = 0xC0;
    pub const WRITE: u8 = 0x02;
    pub const READ: u8 = 0x03;
    pub const BIT_MODIFY: u8 = 0x05;
    pub const RTS_TXB0: u8 = 0x81;
}

/// Register addresses
pub mod reg {
    /// Operation mode status
    pub const CANSTAT: u8 = 0x0E;
    /// Operation mode request and one-shot control
    pub const CANCTRL: u8 = 0x0F;
    pub const CNF3: u8 = 0x28;
    pub const CNF2: u8 = 0x29;
    pub const CNF1: u8 = 0x2A;
    /// Transmit buffer 0 control
    pub const TXB0CTRL: u8 = 0x30;
    /// First byte of the transmit buffer 0 image (SIDH)
    pub const TXB0SIDH: u8 = 0x31;
}

/// CANCTRL / CANSTAT fields
pub mod canctrl {
    /// Requested (CANCTRL) or current (CANSTAT) operation mode
    pub const MODE_MASK: u8 = 0xE0;
    pub const MODE_NORMAL: u8 = 0x00;
    pub const MODE_CONFIG: u8 = 0x80;
    /// One-shot mode: frames are not retransmitted on error
    pub const OSM: u8 = 0x08;
}

/// Time for the oscillator and registers to settle after `RESET`
pub const RESET_SETTLE_MS: u32 = 200;

/// Pause after every register write or command
pub const WRITE_SETTLE_MS: u32 = 1;

/// Bit timing registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitTiming {
    pub cnf1: u8,
    pub cnf2: u8,
    pub cnf3: u8,
}

impl BitTiming {
    /// 33.333 kbps single-wire bus with a 20 MHz crystal
    pub const KBPS_33_AT_20MHZ: Self = Self {
        cnf1: 0x0B,
        cnf2: 0xFF,
        cnf3: 0x87,
    };

    /// 33.333 kbps single-wire bus with a 16 MHz crystal
    pub const KBPS_33_AT_16MHZ: Self = Self {
        cnf1: 0x4E,
        cnf2: 0xF1,
        cnf3: 0x85,
    };

    /// Timing for the cluster bus given the controller crystal
    pub fn for_crystal_mhz(mhz: u8) -> Option<Self> {
        match mhz {
            20 => Some(Self::KBPS_33_AT_20MHZ),
            16 => Some(Self::KBPS_33_AT_16MHZ),
            _ => None,
        }
    }
}

impl Default for BitTiming {
    fn default() -> Self {
        Self::KBPS_33_AT_20MHZ
    }
}

/// CAN controller errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mcp2515Error {
    /// SPI transaction failed
    Spi,
    /// Frame could not be encoded into the buffer image
    Frame(FrameError),
}

impl From<FrameError> for Mcp2515Error {
    fn from(e: FrameError) -> Self {
        Mcp2515Error::Frame(e)
    }
}

/// MCP2515 on its own chip select
pub struct Mcp2515<S, D> {
    spi: S,
    delay: D,
}

impl<S, D> Mcp2515<S, D>
where
    S: SpiDevice,
    D: DelayNs,
{
    pub fn new(spi: S, delay: D) -> Self {
        Self { spi, delay }
    }

    /// Reset, program the bit timing and enter normal mode with
    /// automatic retransmission
    pub fn init(&mut self, timing: BitTiming) -> Result<(), Mcp2515Error> {
        self.reset()?;

        self.write_register(reg::CNF1, timing.cnf1)?;
        self.write_register(reg::CNF2, timing.cnf2)?;
        self.write_register(reg::CNF3, timing.cnf3)?;

        self.set_mode(canctrl::MODE_NORMAL)?;
        self.set_mode(canctrl::MODE_CONFIG)?;
        self.modify_register(reg::CANCTRL, canctrl::OSM, 0x00)?;
        self.set_mode(canctrl::MODE_NORMAL)
    }

    pub fn reset(&mut self) -> Result<(), Mcp2515Error> {
        self.spi
            .write(&[instruction::RESET])
            .map_err(|_| Mcp2515Error::Spi)?;
        self.delay.delay_ms(RESET_SETTLE_MS);
        Ok(())
    }

    /// Whether the controller reports normal operation
    pub fn is_normal_mode(&mut self) -> Result<bool, Mcp2515Error> {
        let status = self.read_register(reg::CANSTAT)?;
        Ok(status & canctrl::MODE_MASK == canctrl::MODE_NORMAL)
    }

    fn set_mode(&mut self, mode: u8) -> Result<(), Mcp2515Error> {
        self.modify_register(reg::CANCTRL, canctrl::MODE_MASK, mode)
    }

    pub fn write_register(&mut self, address: u8, value: u8) -> Result<(), Mcp2515Error> {
        self.command(&[instruction::WRITE, address, value])
    }

    pub fn modify_register(&mut self, address: u8, mask: u8, value: u8) -> Result<(), Mcp2515Error> {
        self.command(&[instruction::BIT_MODIFY, address, mask, value])
    }

    pub fn read_register(&mut self, address: u8) -> Result<u8, Mcp2515Error> {
        let mut read = [0u8; 3];
        self.spi
            .transfer(&mut read, &[instruction::READ, address, 0x00])
            .map_err(|_| Mcp2515Error::Spi)?;
        Ok(read[2])
    }

    fn command(&mut self, bytes: &[u8]) -> Result<(), Mcp2515Error> {
        self.spi.write(bytes).map_err(|_| Mcp2515Error::Spi)?;
        self.delay.delay_ms(WRITE_SETTLE_MS);
        Ok(())
    }
}

impl<S, D> FrameTransmit for Mcp2515<S, D>
where
    S: SpiDevice,
    D: DelayNs,
{
    type Error = Mcp2515Error;

    /// Load TXB0 with one sequential write and request transmission
    fn transmit(&mut self, frame: &CanFrame) -> Result<(), Self::Error> {
        let mut buffer = [0u8; 2 + TX_BUFFER_LEN];
        buffer[0] = instruction::WRITE;
        buffer[1] = reg::TXB0SIDH;
        frame.encode_tx_buffer(&mut buffer[2..])?;

        self.command(&buffer)?;
        self.command(&[instruction::RTS_TXB0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{self, Event, MockDelay, MockSpi};
    use dashpanel_protocol::ClusterMessage;
    use std::vec;

    fn controller(log: &mock::Log) -> Mcp2515<MockSpi, MockDelay> {
        Mcp2515::new(MockSpi::new(log), MockDelay { log: log.clone() })
    }

    #[test]
    fn test_timing_for_crystal() {
        assert_eq!(
            BitTiming::for_crystal_mhz(20),
            Some(BitTiming::KBPS_33_AT_20MHZ)
        );
        assert_eq!(BitTiming::for_crystal_mhz(8), None);
        assert_eq!(BitTiming::default().cnf1, 0x0B);
    }

    #[test]
    fn test_init_sequence() {
        let log = mock::log();
        let mut can = controller(&log);
        can.init(BitTiming::default()).unwrap();

        let events = mock::events(&log);
        assert_eq!(events[0], Event::Write(vec![0xC0]));
        assert_eq!(events[1], Event::DelayMs(200));
        assert_eq!(
            mock::writes(&log)[1..],
            [
                vec![0x02, reg::CNF1, 0x0B],
                vec![0x02, reg::CNF2, 0xFF],
                vec![0x02, reg::CNF3, 0x87],
                vec![0x05, reg::CANCTRL, 0xE0, 0x00],
                vec![0x05, reg::CANCTRL, 0xE0, 0x80],
                vec![0x05, reg::CANCTRL, 0x08, 0x00],
                vec![0x05, reg::CANCTRL, 0xE0, 0x00],
            ]
        );
        // every write is followed by the settle pause
        assert!(events[2..]
            .chunks(2)
            .all(|pair| pair[1] == Event::DelayMs(WRITE_SETTLE_MS)));
    }

    #[test]
    fn test_transmit_loads_txb0_then_requests_send() {
        let log = mock::log();
        let mut can = controller(&log);
        let frame = ClusterMessage::HazardLights(true).to_frame().unwrap();

        can.transmit(&frame).unwrap();

        assert_eq!(
            mock::events(&log),
            vec![
                Event::Write(vec![
                    0x02, 0x31, 0x4C, 0x00, 0x00, 0x00, 0x03, 0x7F, 0x32, 0x80, 0, 0, 0, 0, 0,
                ]),
                Event::DelayMs(1),
                Event::Write(vec![0x81]),
                Event::DelayMs(1),
            ]
        );
    }

    #[test]
    fn test_normal_mode_readback() {
        let log = mock::log();
        let mut can = controller(&log);

        can.spi.responses.extend([0x00, 0x80]);
        assert_eq!(can.is_normal_mode(), Ok(true));
        assert_eq!(can.is_normal_mode(), Ok(false));
        assert_eq!(
            mock::events(&log)[0],
            Event::Transfer(vec![0x03, reg::CANSTAT, 0x00])
        );
    }

    #[test]
    fn test_transmit_failure_is_reported() {
        let log = mock::log();
        let mut can = controller(&log);
        can.spi.fail = true;

        let frame = ClusterMessage::Wakeup.to_frame().unwrap();
        assert_eq!(can.transmit(&frame), Err(Mcp2515Error::Spi));
    }
}
