//! Dashpanel Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the chip drivers are written
//! against, so the same drivers run on the RP2040 board and in host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  dashpanel-drivers (MCP23S17, MAX7221,  │
//! │  MCP2515)                               │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  dashpanel-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ dashpanel-hal-│
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital output (reset lines)
//! - [`spi::SpiDevice`] - Chip-select framed SPI transactions

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use gpio::OutputPin;
pub use spi::{Mode, SpiConfig, SpiDevice};
