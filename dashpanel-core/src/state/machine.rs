//! Control loop state machine
//!
//! The loop is idle until an input change or the keepalive countdown wakes
//! it, runs exactly one processing pass, then goes back to idle. Passes that
//! ended in a bespoke frame sequence settle for one frame gap first.

use super::events::LoopEvent;

/// Control loop states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoopState {
    /// Waiting for an input change or an elapsed countdown
    #[default]
    Idle,
    /// Running one sample/decode/transmit pass
    Process,
    /// Pausing after a special frame sequence
    Settle,
}

impl LoopState {
    /// Process an event and return the next state
    pub fn transition(self, event: LoopEvent) -> Self {
        use LoopEvent::*;
        use LoopState::*;

        match (self, event) {
            (Idle, Wake) => Process,

            (Process, PassComplete) => Idle,
            (Process, SequenceSent) => Settle,

            (Settle, Settled) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}
