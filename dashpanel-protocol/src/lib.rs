//! Instrument Cluster CAN Protocol
//!
//! This crate defines the frames the panel sends to the instrument cluster
//! over a 33.333 kbps single-wire CAN link. Every frame uses an 11-bit
//! standard identifier and a payload of at most 8 bytes.
//!
//! # Frame families
//!
//! ```text
//! ┌───────┬─────┬──────────────────────────┬──────────────────────────┐
//! │ ID    │ LEN │ PAYLOAD                  │ MEANING                  │
//! ├───────┼─────┼──────────────────────────┼──────────────────────────┤
//! │ 0x632 │ 8   │ 00 48 50 00 00 00 00 00  │ wake-up / heartbeat      │
//! │ 0x255 │ 8   │ 04 AE TT 01 CC 00 00 00  │ dial needle position     │
//! │ 0x255 │ 8   │ 04 AE GG SS SS 00 00 00  │ indicator group status   │
//! │ 0x255 │ 8   │ 04 AE 0D xx xx 00 00 00  │ odometer LCD test        │
//! │ 0x260 │ 3   │ 7F 32 80 / 00 00 00      │ hazard lights on / off   │
//! │ 0x281 │ 5   │ 60 05 1E 02 33           │ chime                    │
//! └───────┴─────┴──────────────────────────┴──────────────────────────┘
//! ```
//!
//! The panel never waits for an acknowledgement; frames are built, handed
//! to the transmit primitive and dropped.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod frame;
pub mod messages;

pub use frame::{CanFrame, FrameError, MAX_DATA_LEN, MAX_STANDARD_ID, TX_BUFFER_LEN};
pub use messages::{ClusterMessage, DialTarget};
