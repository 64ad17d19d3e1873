//! I/O expanders

pub mod mcp23s17;

pub use mcp23s17::{Mcp23s17Bank, Mcp23s17Error};
