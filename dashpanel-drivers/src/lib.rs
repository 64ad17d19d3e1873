//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the collaborator traits
//! defined in dashpanel-core, written against the dashpanel-hal SPI and GPIO
//! traits:
//!
//! - Input expanders (MCP23S17 bank of three)
//! - LED drivers (MAX7221 daisy chain of three)
//! - CAN controller (MCP2515)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod can;
pub mod display;
pub mod expander;

#[cfg(test)]
mod mock;
