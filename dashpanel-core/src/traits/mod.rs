//! Collaborator traits
//!
//! These traits define the interface between the panel logic and the chip
//! drivers underneath it. Real-time pacing uses `embedded_hal::delay::DelayNs`.

pub mod leds;
pub mod sampler;
pub mod transmit;

pub use leds::LedChain;
pub use sampler::PortSampler;
pub use transmit::FrameTransmit;
