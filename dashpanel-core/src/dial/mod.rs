//! Dial model
//!
//! Three bounded positions (RPM, fuel, speed), each with its LED arc and a
//! rendering mode. The LED arc is regenerated on every mutation so it is
//! always a pure function of position and mode.

pub mod calibration;

use dashpanel_protocol::DialTarget;

use crate::input::{EncoderId, Rotation};
use calibration::{FUEL_CODES, RPM_CODES, SPEED_CODES};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Longest LED arc (speed dial, positions 0..=24)
pub const MAX_DIAL_LEDS: usize = 25;

/// Which dial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DialKind {
    Rpm,
    Fuel,
    Speed,
}

impl DialKind {
    /// All dials in panel order
    pub const ALL: [DialKind; 3] = [DialKind::Rpm, DialKind::Fuel, DialKind::Speed];

    /// Highest position
    pub const fn bound(self) -> u8 {
        match self {
            DialKind::Rpm => 16,
            DialKind::Fuel => 8,
            DialKind::Speed => 24,
        }
    }

    /// Gauge addressed in dial frames
    pub const fn target(self) -> DialTarget {
        match self {
            DialKind::Rpm => DialTarget::Rpm,
            DialKind::Fuel => DialTarget::Fuel,
            DialKind::Speed => DialTarget::Speed,
        }
    }

    /// Calibration table, indexed by position
    pub const fn calibration(self) -> &'static [u8] {
        match self {
            DialKind::Rpm => &RPM_CODES,
            DialKind::Fuel => &FUEL_CODES,
            DialKind::Speed => &SPEED_CODES,
        }
    }

    /// Encoder bound to this dial
    pub const fn encoder(self) -> EncoderId {
        match self {
            DialKind::Rpm => EncoderId::First,
            DialKind::Fuel => EncoderId::Second,
            DialKind::Speed => EncoderId::Third,
        }
    }

    /// Dial driven by an encoder
    pub const fn for_encoder(id: EncoderId) -> Self {
        match id {
            EncoderId::First => DialKind::Rpm,
            EncoderId::Second => DialKind::Fuel,
            EncoderId::Third => DialKind::Speed,
        }
    }

    /// LED driver chip that carries this dial's seven-segment readout
    pub const fn readout_chip(self) -> u8 {
        match self {
            DialKind::Rpm => 0,
            DialKind::Fuel => 1,
            DialKind::Speed => 2,
        }
    }

    /// Value shown on the readout for a position
    ///
    /// RPM in rpm, fuel in litres (shown as `XX.00`), speed in km/h.
    pub const fn readout_value(self, position: u8) -> u16 {
        let position = position as u16;
        match self {
            DialKind::Rpm => position * 500,
            DialKind::Fuel => position * 6,
            DialKind::Speed => position * 10,
        }
    }
}

/// LED arc rendering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DialMode {
    /// Every LED from 0 up to the position is lit
    #[default]
    Bar,
    /// Only the LED at the position is lit
    Dot,
}

impl DialMode {
    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            DialMode::Bar => DialMode::Dot,
            DialMode::Dot => DialMode::Bar,
        }
    }
}

/// One dial: position, mode and rendered LED arc
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dial {
    kind: DialKind,
    position: u8,
    mode: DialMode,
    leds: [bool; MAX_DIAL_LEDS],
}

impl Dial {
    /// Create a dial at position 0 in bar mode
    pub fn new(kind: DialKind) -> Self {
        let mut dial = Self {
            kind,
            position: 0,
            mode: DialMode::Bar,
            leds: [false; MAX_DIAL_LEDS],
        };
        dial.render();
        dial
    }

    pub fn kind(&self) -> DialKind {
        self.kind
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    pub fn mode(&self) -> DialMode {
        self.mode
    }

    /// LED arc, one entry per position (bound + 1 entries)
    pub fn leds(&self) -> &[bool] {
        &self.leds[..=self.kind.bound() as usize]
    }

    /// Move to a position (clamped to the bound) and re-render
    pub fn set_position(&mut self, position: u8) {
        self.position = position.min(self.kind.bound());
        self.render();
    }

    /// Apply one encoder click, saturating at the bounds
    ///
    /// Returns true if the position changed.
    pub fn step(&mut self, rotation: Rotation) -> bool {
        let next = match rotation {
            Rotation::Clockwise if self.position < self.kind.bound() => self.position + 1,
            Rotation::CounterClockwise if self.position > 0 => self.position - 1,
            _ => return false,
        };
        self.set_position(next);
        true
    }

    /// Switch between bar and dot rendering, keeping the position
    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    /// Set the rendering mode and re-render
    pub fn set_mode(&mut self, mode: DialMode) {
        self.mode = mode;
        self.render();
    }

    /// Calibrated code for the current position
    pub fn calibrated_code(&self) -> u8 {
        self.kind.calibration()[self.position as usize]
    }

    fn render(&mut self) {
        let p = self.position as usize;
        for (i, led) in self.leds.iter_mut().enumerate() {
            *led = match self.mode {
                DialMode::Bar => i <= p,
                DialMode::Dot => i == p,
            };
        }
    }
}

/// All three dials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialState {
    dials: [Dial; 3],
}

impl Default for DialState {
    fn default() -> Self {
        Self::new()
    }
}

impl DialState {
    /// All dials at position 0 in bar mode
    pub fn new() -> Self {
        Self {
            dials: DialKind::ALL.map(Dial::new),
        }
    }

    pub fn get(&self, kind: DialKind) -> &Dial {
        &self.dials[kind as usize]
    }

    pub fn get_mut(&mut self, kind: DialKind) -> &mut Dial {
        &mut self.dials[kind as usize]
    }

    /// Dials in panel order
    pub fn iter(&self) -> impl Iterator<Item = &Dial> {
        self.dials.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lit(dial: &Dial) -> usize {
        dial.leds().iter().filter(|&&on| on).count()
    }

    #[test]
    fn test_new_dial_lights_zero_in_bar_mode() {
        let dial = Dial::new(DialKind::Fuel);
        assert_eq!(dial.leds().len(), 9);
        assert_eq!(lit(&dial), 1);
        assert!(dial.leds()[0]);
    }

    #[test]
    fn test_step_saturates() {
        let mut dial = Dial::new(DialKind::Fuel);
        assert!(!dial.step(Rotation::CounterClockwise));
        assert_eq!(dial.position(), 0);

        for _ in 0..8 {
            assert!(dial.step(Rotation::Clockwise));
        }
        assert_eq!(dial.position(), 8);
        assert!(!dial.step(Rotation::Clockwise));
        assert_eq!(dial.calibrated_code(), 245);
    }

    #[test]
    fn test_toggle_mode_keeps_position() {
        let mut dial = Dial::new(DialKind::Rpm);
        dial.set_position(5);
        dial.toggle_mode();
        assert_eq!(dial.position(), 5);
        assert_eq!(dial.mode(), DialMode::Dot);
        assert_eq!(lit(&dial), 1);
        assert!(dial.leds()[5]);

        dial.toggle_mode();
        assert_eq!(lit(&dial), 6);
    }

    #[test]
    fn test_set_position_clamps() {
        let mut dial = Dial::new(DialKind::Rpm);
        dial.set_position(200);
        assert_eq!(dial.position(), 16);
        assert_eq!(dial.calibrated_code(), 158);
    }

    #[test]
    fn test_readout_values() {
        assert_eq!(DialKind::Rpm.readout_value(16), 8000);
        assert_eq!(DialKind::Fuel.readout_value(8), 48);
        assert_eq!(DialKind::Speed.readout_value(24), 240);
    }

    #[test]
    fn test_encoder_binding_round_trips() {
        for kind in DialKind::ALL {
            assert_eq!(DialKind::for_encoder(kind.encoder()), kind);
        }
    }

    fn any_kind() -> impl Strategy<Value = DialKind> {
        prop_oneof![
            Just(DialKind::Rpm),
            Just(DialKind::Fuel),
            Just(DialKind::Speed)
        ]
    }

    proptest! {
        #[test]
        fn prop_set_position_is_idempotent(kind in any_kind(), p in 0u8..=24, dot in any::<bool>()) {
            let mut dial = Dial::new(kind);
            if dot {
                dial.set_mode(DialMode::Dot);
            }
            dial.set_position(p);
            let once = dial.clone();
            dial.set_position(p);
            prop_assert_eq!(dial, once);
        }

        #[test]
        fn prop_lit_count_matches_mode(kind in any_kind(), p in 0u8..=24) {
            let mut dial = Dial::new(kind);
            dial.set_position(p);
            let p = dial.position() as usize;

            prop_assert_eq!(lit(&dial), p + 1);
            prop_assert!(dial.leds()[..=p].iter().all(|&on| on));

            dial.set_mode(DialMode::Dot);
            prop_assert_eq!(lit(&dial), 1);
            prop_assert!(dial.leds()[p]);
        }
    }
}
