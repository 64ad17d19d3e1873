//! Configuration types
//!
//! Board-agnostic panel settings and their validation.

pub mod types;

pub use types::*;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Intensity outside 1..=15
    IntensityOutOfRange(u8),
    /// Resync countdown of zero heartbeats
    ZeroResyncHeartbeats,
    /// Heartbeat period of zero
    ZeroHeartbeatPeriod,
}

impl PanelConfig {
    /// Check every field is within the range the hardware accepts
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_INTENSITY..=MAX_INTENSITY).contains(&self.intensity) {
            return Err(ConfigError::IntensityOutOfRange(self.intensity));
        }
        if self.resync_heartbeats == 0 {
            return Err(ConfigError::ZeroResyncHeartbeats);
        }
        if self.heartbeat_period_ms == 0 {
            return Err(ConfigError::ZeroHeartbeatPeriod);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PanelConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.frame_gap_ms, 30);
        assert_eq!(config.resync_heartbeats, 4);
    }

    #[test]
    fn test_rejects_out_of_range() {
        let config = PanelConfig {
            intensity: 16,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::IntensityOutOfRange(16)));

        let config = PanelConfig {
            intensity: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::IntensityOutOfRange(0)));

        let config = PanelConfig {
            resync_heartbeats: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroResyncHeartbeats));

        let config = PanelConfig {
            heartbeat_period_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroHeartbeatPeriod));
    }
}
