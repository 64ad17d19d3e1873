//! Configuration type definitions
//!
//! The panel configuration is embedded in the firmware image as TOML and
//! parsed at boot. Defaults reproduce the timing the cluster was tuned to.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::state::keepalive::DEFAULT_RESYNC_HEARTBEATS;

/// Lowest MAX7221 intensity the panel accepts
pub const MIN_INTENSITY: u8 = 1;

/// Highest MAX7221 intensity
pub const MAX_INTENSITY: u8 = 15;

/// Panel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelConfig {
    /// LED driver brightness (1..=15)
    pub intensity: u8,
    /// Gap between dependent cluster frames (ms)
    pub frame_gap_ms: u32,
    /// How long the lamp test keeps everything lit (ms)
    pub lamp_test_hold_ms: u32,
    /// Heartbeats without a switch change before a resync
    pub resync_heartbeats: u8,
    /// Heartbeat / wake-up frame period (ms)
    pub heartbeat_period_ms: u32,
    /// Run the LED demonstration at boot
    pub boot_demo: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            intensity: 8,
            frame_gap_ms: 30,
            lamp_test_hold_ms: 2000,
            resync_heartbeats: DEFAULT_RESYNC_HEARTBEATS,
            heartbeat_period_ms: 1000,
            boot_demo: true,
        }
    }
}
