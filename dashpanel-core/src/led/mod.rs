//! LED output synthesis
//!
//! - `matrix`: discrete switch/dial LEDs packed into the MAX7221 rows
//! - `segments`: seven-segment readout digits and raw patterns
//! - `activity`: the four status LEDs on the expander

pub mod activity;
pub mod matrix;
pub mod segments;

pub use activity::{Activity, ActivityLeds};
pub use matrix::{LedMatrix, LedSource, LED_LAYOUT, MATRIX_ROWS};
pub use segments::Readout;
