//! Expander port sampling

use crate::input::PortSample;

/// Source of raw switch/encoder port samples
///
/// Implemented by the expander bank driver. Also drives the activity LEDs,
/// which share an expander port with switch inputs.
pub trait PortSampler {
    type Error;

    /// Read all six input ports (1A, 1B, 2A, 2B, 3A, 3B)
    fn sample(&mut self) -> Result<PortSample, Self::Error>;

    /// Write the activity LED byte (upper nibble of port 3B)
    fn write_activity(&mut self, value: u8) -> Result<(), Self::Error>;
}
