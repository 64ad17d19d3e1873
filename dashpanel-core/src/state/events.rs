//! Events that drive the control loop

/// Control loop events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoopEvent {
    /// Input change signalled or keepalive countdown elapsed
    Wake,
    /// A processing pass finished with no bespoke sequence
    PassComplete,
    /// A processing pass finished with a bespoke frame sequence
    SequenceSent,
    /// The settle gap has passed
    Settled,
}
