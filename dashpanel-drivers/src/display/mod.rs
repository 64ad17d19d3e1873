//! LED display drivers

pub mod max7221;

pub use max7221::{Max7221Chain, Max7221Error};
