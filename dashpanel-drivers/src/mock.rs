//! Recording bus mocks shared by the driver tests

use core::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use dashpanel_hal::{OutputPin, SpiDevice};
use embedded_hal::delay::DelayNs;

/// One observable bus or timing event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Write(Vec<u8>),
    Transfer(Vec<u8>),
    DelayMs(u32),
    Pin(bool),
}

pub type Log = Rc<RefCell<Vec<Event>>>;

pub fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn events(log: &Log) -> Vec<Event> {
    log.borrow().clone()
}

pub fn writes(log: &Log) -> Vec<Vec<u8>> {
    log.borrow()
        .iter()
        .filter_map(|e| match e {
            Event::Write(bytes) => Some(bytes.clone()),
            _ => None,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

/// SPI device that records every transaction
///
/// Transfers answer with zeros except the last byte, which is taken from
/// the queued responses.
pub struct MockSpi {
    pub log: Log,
    pub responses: VecDeque<u8>,
    pub fail: bool,
}

impl MockSpi {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            responses: VecDeque::new(),
            fail: false,
        }
    }
}

impl SpiDevice for MockSpi {
    type Error = BusFault;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if self.fail {
            return Err(BusFault);
        }
        self.log.borrow_mut().push(Event::Write(data.to_vec()));
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        if self.fail {
            return Err(BusFault);
        }
        self.log.borrow_mut().push(Event::Transfer(write.to_vec()));
        read.fill(0);
        if let Some(last) = read.last_mut() {
            *last = self.responses.pop_front().unwrap_or(0);
        }
        Ok(())
    }
}

pub struct MockDelay {
    pub log: Log,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Event::DelayMs(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Event::DelayMs(ms));
    }
}

pub struct MockPin {
    pub log: Log,
    pub high: bool,
}

impl OutputPin for MockPin {
    fn set_high(&mut self) {
        self.high = true;
        self.log.borrow_mut().push(Event::Pin(true));
    }

    fn set_low(&mut self) {
        self.high = false;
        self.log.borrow_mut().push(Event::Pin(false));
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}
