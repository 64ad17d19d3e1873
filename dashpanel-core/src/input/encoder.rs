//! Rotary encoder quadrature decoding
//!
//! Each detent of the panel encoders walks the 2-bit gray code through four
//! transitions. A lookup of `current | previous << 2` gives the step
//! direction; four consistent steps complete one click.
//!
//! ```text
//! CW:   00 → 01 → 11 → 10 → 00     accumulator 0 → 1 → 2 → 3 → 4 (= click)
//! CCW:  00 → 10 → 11 → 01 → 00     accumulator 0 → -1 → -2 → -3 → -4 (= click)
//! ```

/// Direction delta for each `current | previous << 2` transition
///
/// No-change and invalid (two-bit) transitions contribute 0.
pub const KNOB_DIRECTION: [i8; 16] = [
    0, 1, -1, 0, //
    -1, 0, 0, 1, //
    1, 0, 0, -1, //
    0, -1, 1, 0,
];

/// Transitions per mechanical click
pub const STEPS_PER_CLICK: i8 = 4;

/// Encoder identifier (1..=3 on the panel, 0-based internally)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderId {
    /// Encoder 1, bound to the RPM dial
    First,
    /// Encoder 2, bound to the fuel dial
    Second,
    /// Encoder 3, bound to the speed dial
    Third,
}

impl EncoderId {
    /// Number of encoders on the panel
    pub const COUNT: usize = 3;

    /// All encoders in panel order
    pub const ALL: [EncoderId; Self::COUNT] =
        [EncoderId::First, EncoderId::Second, EncoderId::Third];

    /// 0-based index (encoder 1 at index 0)
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Completed click direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

/// Quadrature state machine for a single encoder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuadratureDecoder {
    current: u8,
    previous: u8,
    position: i8,
    moving: bool,
}

impl QuadratureDecoder {
    /// Create a decoder at rest
    pub const fn new() -> Self {
        Self {
            current: 0,
            previous: 0,
            position: 0,
            moving: false,
        }
    }

    /// Feed one 2-bit gray code sample
    ///
    /// Returns a completed click, if this sample finished one.
    pub fn update(&mut self, code: u8) -> Option<Rotation> {
        self.previous = self.current;
        self.current = code & 0x03;

        let index = (self.current | (self.previous << 2)) as usize;
        self.position += KNOB_DIRECTION[index];

        if self.position >= STEPS_PER_CLICK {
            self.position = 0;
            self.moving = false;
            Some(Rotation::Clockwise)
        } else if self.position <= -STEPS_PER_CLICK {
            self.position = 0;
            self.moving = false;
            Some(Rotation::CounterClockwise)
        } else {
            None
        }
    }

    /// Mark the encoder as in motion (a code bit was seen set)
    pub fn mark_moving(&mut self) {
        self.moving = true;
    }

    /// Whether a click is in progress
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Partial-click accumulator, always within [-4, 4]
    pub fn position(&self) -> i8 {
        self.position
    }
}

/// The three panel encoders
#[derive(Debug, Clone, Default)]
pub struct EncoderBank {
    decoders: [QuadratureDecoder; EncoderId::COUNT],
}

impl EncoderBank {
    /// Create a bank with all encoders at rest
    pub const fn new() -> Self {
        Self {
            decoders: [QuadratureDecoder::new(); EncoderId::COUNT],
        }
    }

    /// Whether the decode path needs to run for these codes
    ///
    /// True while any code bit is set or any encoder is mid-click, so the
    /// final transition back to 00 is still observed.
    pub fn needs_decode(&self, codes: [u8; EncoderId::COUNT]) -> bool {
        codes.iter().any(|&c| c != 0) || self.decoders.iter().any(|d| d.is_moving())
    }

    /// Feed one sample to every encoder
    ///
    /// Returns the completed click of each encoder, in panel order.
    pub fn update(
        &mut self,
        codes: [u8; EncoderId::COUNT],
    ) -> [Option<Rotation>; EncoderId::COUNT] {
        let mut clicks = [None; EncoderId::COUNT];
        for ((decoder, &code), click) in self
            .decoders
            .iter_mut()
            .zip(codes.iter())
            .zip(clicks.iter_mut())
        {
            if code != 0 {
                decoder.mark_moving();
            }
            *click = decoder.update(code);
        }
        clicks
    }

    /// Access one encoder's decoder
    pub fn decoder(&self, id: EncoderId) -> &QuadratureDecoder {
        &self.decoders[id.index()]
    }
}
