//! Configuration loading
//!
//! The configuration is compiled into the firmware from `panel.toml` and
//! parsed at boot by a small no_std TOML-subset parser. A file that does
//! not parse or validate is replaced by the defaults.

pub mod toml;

use defmt::*;
use dashpanel_core::config::PanelConfig;
use dashpanel_drivers::can::mcp2515::BitTiming;

pub use toml::{parse_config, ParseError};

/// Default MCP2515 crystal
pub const DEFAULT_CRYSTAL_MHZ: u8 = 20;

/// Everything read from `panel.toml`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardConfig {
    /// Control loop settings
    pub panel: PanelConfig,
    /// MCP2515 crystal frequency
    pub can_crystal_mhz: u8,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            panel: PanelConfig::default(),
            can_crystal_mhz: DEFAULT_CRYSTAL_MHZ,
        }
    }
}

impl BoardConfig {
    /// CAN bit timing for the configured crystal
    pub fn bit_timing(&self) -> BitTiming {
        BitTiming::for_crystal_mhz(self.can_crystal_mhz).unwrap_or_else(|| {
            warn!(
                "No bit timing for a {} MHz crystal, assuming {} MHz",
                self.can_crystal_mhz, DEFAULT_CRYSTAL_MHZ
            );
            BitTiming::default()
        })
    }
}

/// Parse and validate the embedded configuration, falling back to defaults
pub fn load_config(input: &str) -> BoardConfig {
    let config = match parse_config(input) {
        Ok(config) => config,
        Err(e) => {
            warn!("panel.toml could not be parsed ({}), using defaults", e);
            return BoardConfig::default();
        }
    };

    match config.panel.validate() {
        Ok(()) => config,
        Err(e) => {
            warn!("panel.toml rejected ({}), using defaults", e);
            BoardConfig::default()
        }
    }
}
