//! Cluster frame transmission

use dashpanel_protocol::CanFrame;

/// Fire-and-forget frame transmit primitive
///
/// Returns once the frame has been handed to the controller. Delivery is
/// never acknowledged.
pub trait FrameTransmit {
    type Error;

    fn transmit(&mut self, frame: &CanFrame) -> Result<(), Self::Error>;
}
