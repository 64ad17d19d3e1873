//! State shared between tasks
//!
//! Only two flags and a millisecond counter cross task boundaries. The tick
//! and input tasks are their only writers; the panel task drains them.

use dashpanel_core::clock::{PanelSignals, TickCounter};
use dashpanel_core::config::PanelConfig;

/// Input-changed and heartbeat flags
pub static SIGNALS: PanelSignals = PanelSignals::new();

/// Milliseconds since boot, advanced by the tick task
///
/// Starts with the default heartbeat period; `main` applies the configured
/// one before the tick task is spawned.
pub static TICKS: TickCounter = TickCounter::new(DEFAULT_HEARTBEAT_MS);

const DEFAULT_HEARTBEAT_MS: u32 = 1000;

/// Apply the configured heartbeat period
pub fn configure(config: &PanelConfig) {
    TICKS.set_heartbeat_period(config.heartbeat_period_ms);
}
