//! Board-agnostic core logic for the instrument cluster test panel
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Collaborator traits (port sampler, LED driver chain, frame transmit)
//! - Tick clock and interrupt-shared signal flags
//! - Switch and rotary encoder decoding
//! - Dial model with bar/dot rendering and calibration tables
//! - LED matrix compiler and seven-segment readouts
//! - Indicator groups and per-switch policy dispatch
//! - Control loop state machine with keepalive/resync countdown
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod clock;
pub mod cluster;
pub mod config;
pub mod dial;
pub mod input;
pub mod led;
pub mod panel;
pub mod state;
pub mod traits;
