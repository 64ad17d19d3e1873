//! Raw expander port samples and the fixed pin map
//!
//! Three MCP23S17 expanders deliver six 8-bit ports, always sampled in the
//! order 1A, 1B, 2A, 2B, 3A, 3B. A pin reads 1 while its switch is pressed.

use super::switches::SwitchId;
use super::encoder::EncoderId;

/// Number of 8-bit ports in one sample
pub const PORT_COUNT: usize = 6;

/// Expander port, in sampling order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    /// Expander 1 (address 0x20), port A
    Exp1A = 0,
    /// Expander 1, port B
    Exp1B = 1,
    /// Expander 2 (address 0x21), port A
    Exp2A = 2,
    /// Expander 2, port B
    Exp2B = 3,
    /// Expander 3 (address 0x22), port A
    Exp3A = 4,
    /// Expander 3, port B (low nibble inputs, high nibble activity LEDs)
    Exp3B = 5,
}

/// A single input pin: one bit of one port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinRef {
    pub port: Port,
    pub mask: u8,
}

const fn pin(port: Port, bit: u8) -> PinRef {
    PinRef {
        port,
        mask: 1 << bit,
    }
}

/// Pin of each switch, indexed by `SwitchId::index()` (switch 1 at index 0)
pub const SWITCH_PINS: [PinRef; SwitchId::COUNT] = [
    // 1..=8
    pin(Port::Exp1A, 0),
    pin(Port::Exp1A, 1),
    pin(Port::Exp1A, 2),
    pin(Port::Exp1A, 3),
    pin(Port::Exp1A, 4),
    pin(Port::Exp1A, 5),
    pin(Port::Exp1A, 6),
    pin(Port::Exp1A, 7),
    // 9..=13 (1B bits 1..3 belong to encoder 1)
    pin(Port::Exp1B, 0),
    pin(Port::Exp1B, 4),
    pin(Port::Exp1B, 5),
    pin(Port::Exp1B, 6),
    pin(Port::Exp1B, 7),
    // 14..=18 (2A bits 3..5 belong to encoder 2)
    pin(Port::Exp2A, 0),
    pin(Port::Exp2A, 1),
    pin(Port::Exp2A, 2),
    pin(Port::Exp2A, 6),
    pin(Port::Exp2A, 7),
    // 19..=25
    pin(Port::Exp2B, 0),
    pin(Port::Exp2B, 1),
    pin(Port::Exp2B, 2),
    pin(Port::Exp2B, 3),
    pin(Port::Exp2B, 4),
    pin(Port::Exp2B, 5),
    pin(Port::Exp2B, 6),
    // 26..=30 (3A bits 0..2 belong to encoder 3)
    pin(Port::Exp3A, 3),
    pin(Port::Exp3A, 4),
    pin(Port::Exp3A, 5),
    pin(Port::Exp3A, 6),
    pin(Port::Exp3A, 7),
    // 31..=34
    pin(Port::Exp3B, 0),
    pin(Port::Exp3B, 1),
    pin(Port::Exp3B, 2),
    pin(Port::Exp3B, 3),
    // 35
    pin(Port::Exp2B, 7),
];

/// Push-button pin of each encoder, indexed by `EncoderId::index()`
pub const ENCODER_BUTTON_PINS: [PinRef; EncoderId::COUNT] = [
    pin(Port::Exp1B, 3),
    pin(Port::Exp2A, 5),
    pin(Port::Exp3A, 2),
];

/// Location of an encoder's 2-bit gray code within a port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodePins {
    pub port: Port,
    pub shift: u8,
}

/// Gray-code pins of each encoder, indexed by `EncoderId::index()`
pub const ENCODER_CODE_PINS: [CodePins; EncoderId::COUNT] = [
    CodePins {
        port: Port::Exp1B,
        shift: 1,
    },
    CodePins {
        port: Port::Exp2A,
        shift: 3,
    },
    CodePins {
        port: Port::Exp3A,
        shift: 0,
    },
];

/// One snapshot of all six expander ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortSample {
    /// Port bytes in sampling order (1A, 1B, 2A, 2B, 3A, 3B)
    pub ports: [u8; PORT_COUNT],
}

impl PortSample {
    /// Create a sample from raw port bytes
    pub const fn new(ports: [u8; PORT_COUNT]) -> Self {
        Self { ports }
    }

    /// Raw byte of one port
    pub fn port(&self, port: Port) -> u8 {
        self.ports[port as usize]
    }

    /// Read a single pin
    pub fn is_set(&self, pin: PinRef) -> bool {
        self.port(pin.port) & pin.mask != 0
    }

    /// Whether a switch is currently held down
    pub fn switch_pressed(&self, id: SwitchId) -> bool {
        self.is_set(SWITCH_PINS[id.index()])
    }

    /// Whether an encoder push-button is currently held down
    pub fn encoder_button(&self, id: EncoderId) -> bool {
        self.is_set(ENCODER_BUTTON_PINS[id.index()])
    }

    /// Current 2-bit gray code of an encoder
    pub fn encoder_code(&self, id: EncoderId) -> u8 {
        let pins = ENCODER_CODE_PINS[id.index()];
        (self.port(pins.port) >> pins.shift) & 0x03
    }

    /// Set or clear a single pin (used to build samples in tests and tools)
    pub fn with_pin(mut self, pin: PinRef, level: bool) -> Self {
        let byte = &mut self.ports[pin.port as usize];
        if level {
            *byte |= pin.mask;
        } else {
            *byte &= !pin.mask;
        }
        self
    }

    /// Sample with one switch held down
    pub fn with_switch(self, id: SwitchId) -> Self {
        self.with_pin(SWITCH_PINS[id.index()], true)
    }

    /// Sample with one encoder button held down
    pub fn with_encoder_button(self, id: EncoderId) -> Self {
        self.with_pin(ENCODER_BUTTON_PINS[id.index()], true)
    }

    /// Sample with one encoder's gray code replaced
    pub fn with_encoder_code(mut self, id: EncoderId, code: u8) -> Self {
        let pins = ENCODER_CODE_PINS[id.index()];
        let byte = &mut self.ports[pins.port as usize];
        *byte = (*byte & !(0x03 << pins.shift)) | ((code & 0x03) << pins.shift);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_input_pin_is_distinct() {
        let mut seen = [0u8; PORT_COUNT];
        let mut claim = |port: Port, mask: u8| {
            assert_eq!(seen[port as usize] & mask, 0, "pin claimed twice");
            seen[port as usize] |= mask;
        };

        for pin in SWITCH_PINS.iter().chain(ENCODER_BUTTON_PINS.iter()) {
            claim(pin.port, pin.mask);
        }
        for code in ENCODER_CODE_PINS {
            claim(code.port, 0x03 << code.shift);
        }

        // 35 switches + 3 buttons + 3 x 2 code bits; 3B high nibble is output
        assert_eq!(seen, [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
    }

    #[test]
    fn test_switch_pin_lookup() {
        let sample = PortSample::new([0, 0x10, 0, 0x80, 0, 0x08]);
        assert!(sample.switch_pressed(SwitchId::new(10).unwrap()));
        assert!(sample.switch_pressed(SwitchId::new(35).unwrap()));
        assert!(sample.switch_pressed(SwitchId::new(34).unwrap()));
        assert!(!sample.switch_pressed(SwitchId::new(1).unwrap()));
    }

    #[test]
    fn test_encoder_code_extraction() {
        let sample = PortSample::new([0, 0x06, 0x18, 0, 0x03, 0]);
        for id in EncoderId::ALL {
            assert_eq!(sample.encoder_code(id), 0x03);
        }

        let sample = PortSample::default().with_encoder_code(EncoderId::Second, 0b10);
        assert_eq!(sample.ports[Port::Exp2A as usize], 0x10);
        assert_eq!(sample.encoder_code(EncoderId::Second), 0b10);
    }

    #[test]
    fn test_encoder_buttons() {
        let sample = PortSample::new([0, 0x08, 0x20, 0, 0x04, 0]);
        for id in EncoderId::ALL {
            assert!(sample.encoder_button(id));
        }
    }
}
