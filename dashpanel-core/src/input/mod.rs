//! Input decoding
//!
//! Turns raw expander port samples into switch LED changes, encoder clicks
//! and encoder button edges.

pub mod encoder;
pub mod ports;
pub mod switches;

pub use encoder::{EncoderBank, EncoderId, QuadratureDecoder, Rotation, KNOB_DIRECTION};
pub use ports::{Port, PortSample, PORT_COUNT};
pub use switches::{BiColorPhase, SwitchDecoder, SwitchId};

/// Press-edge detector for the three encoder push-buttons
#[derive(Debug, Clone, Default)]
pub struct ButtonEdges {
    pressed: [bool; EncoderId::COUNT],
}

impl ButtonEdges {
    /// Create a detector with all buttons released
    pub const fn new() -> Self {
        Self {
            pressed: [false; EncoderId::COUNT],
        }
    }

    /// Feed the current button levels; returns which buttons were just pressed
    pub fn update(&mut self, sample: &PortSample) -> [bool; EncoderId::COUNT] {
        let mut edges = [false; EncoderId::COUNT];
        for id in EncoderId::ALL {
            let level = sample.encoder_button(id);
            edges[id.index()] = level && !self.pressed[id.index()];
            self.pressed[id.index()] = level;
        }
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_edge_fires_once_per_press() {
        let mut buttons = ButtonEdges::new();
        let held = PortSample::default().with_encoder_button(EncoderId::Third);

        assert_eq!(buttons.update(&held), [false, false, true]);
        assert_eq!(buttons.update(&held), [false, false, false]);
        assert_eq!(buttons.update(&PortSample::default()), [false; 3]);
        assert_eq!(buttons.update(&held), [false, false, true]);
    }
}
