//! Switch decoding and switch LED state
//!
//! Switches are numbered 1..=35 on the panel silkscreen, in the cluster
//! tables and in the LED layout. Internally every per-switch array is
//! 0-based: switch `n` lives at index `n - 1`. `SwitchId` is the only place
//! that converts between the two.

/// Panel switch identifier (1..=35)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchId(u8);

impl SwitchId {
    /// Number of switches on the panel
    pub const COUNT: usize = 35;

    /// Turn-signal tell-tale with yellow/red bi-color LED
    pub const BI_COLOR: SwitchId = SwitchId(11);
    /// Odometer LCD segment test
    pub const ODOMETER_TEST: SwitchId = SwitchId(22);
    /// Hazard lights
    pub const HAZARD: SwitchId = SwitchId(24);
    /// Chime (momentary, LED self-clears on the next heartbeat)
    pub const CHIME: SwitchId = SwitchId(25);
    /// All-LEDs lamp test
    pub const LAMP_TEST: SwitchId = SwitchId(35);

    /// Create from the 1-based panel number
    pub const fn new(number: u8) -> Option<Self> {
        if number >= 1 && number as usize <= Self::COUNT {
            Some(Self(number))
        } else {
            None
        }
    }

    /// 1-based panel number
    pub const fn number(self) -> u8 {
        self.0
    }

    /// 0-based index into per-switch arrays
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }

    /// Switches that survive the clear cascade (hazard, chime, lamp test)
    pub const fn survives_clear(self) -> bool {
        matches!(self.0, 24 | 25 | 35)
    }

    /// All switches in ascending order
    pub fn all() -> impl Iterator<Item = SwitchId> {
        (1..=Self::COUNT as u8).map(SwitchId)
    }
}

/// Bi-color LED phase of switch 11
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BiColorPhase {
    #[default]
    Off,
    Yellow,
    Red,
}

impl BiColorPhase {
    /// Phase after one press
    pub fn next(self) -> Self {
        match self {
            BiColorPhase::Off => BiColorPhase::Yellow,
            BiColorPhase::Yellow => BiColorPhase::Red,
            BiColorPhase::Red => BiColorPhase::Off,
        }
    }

    /// Whether either color is lit
    pub fn is_lit(self) -> bool {
        self != BiColorPhase::Off
    }
}

/// Switch decoder
///
/// Tracks the pin level of every switch (for edge detection) and the LED
/// state it drives, plus the LED state last acknowledged by the control
/// loop. A switch "changed" when its LED differs from the acknowledged one.
#[derive(Debug, Clone)]
pub struct SwitchDecoder {
    pressed: [bool; SwitchId::COUNT],
    leds: [bool; SwitchId::COUNT],
    prev_leds: [bool; SwitchId::COUNT],
    bicolor: BiColorPhase,
    prev_bicolor: BiColorPhase,
}

impl Default for SwitchDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SwitchDecoder {
    /// Create a decoder with every switch released and every LED off
    pub const fn new() -> Self {
        Self {
            pressed: [false; SwitchId::COUNT],
            leds: [false; SwitchId::COUNT],
            prev_leds: [false; SwitchId::COUNT],
            bicolor: BiColorPhase::Off,
            prev_bicolor: BiColorPhase::Off,
        }
    }

    /// Feed the current pin level of one switch
    ///
    /// A press edge toggles the switch LED; for the bi-color switch it
    /// advances the phase instead. Holding the switch has no further effect.
    /// Returns true if the LED now differs from the acknowledged state.
    pub fn step(&mut self, id: SwitchId, pressed: bool) -> bool {
        let i = id.index();
        let edge = pressed && !self.pressed[i];
        self.pressed[i] = pressed;

        if edge {
            if id == SwitchId::BI_COLOR {
                self.bicolor = self.bicolor.next();
                self.leds[i] = self.bicolor.is_lit();
            } else {
                self.leds[i] = !self.leds[i];
            }
        }

        self.changed(id)
    }

    /// Whether the LED differs from the acknowledged state
    pub fn changed(&self, id: SwitchId) -> bool {
        if id == SwitchId::BI_COLOR {
            self.bicolor != self.prev_bicolor
        } else {
            self.leds[id.index()] != self.prev_leds[id.index()]
        }
    }

    /// Acknowledge the current LED state of one switch
    pub fn commit(&mut self, id: SwitchId) {
        self.prev_leds[id.index()] = self.leds[id.index()];
        if id == SwitchId::BI_COLOR {
            self.prev_bicolor = self.bicolor;
        }
    }

    /// Whether a switch LED is lit
    pub fn is_lit(&self, id: SwitchId) -> bool {
        self.leds[id.index()]
    }

    /// Current bi-color phase
    pub fn bicolor(&self) -> BiColorPhase {
        self.bicolor
    }

    /// Force a switch LED off, acknowledged (no change is reported)
    pub fn clear(&mut self, id: SwitchId) {
        self.leds[id.index()] = false;
        self.prev_leds[id.index()] = false;
        if id == SwitchId::BI_COLOR {
            self.bicolor = BiColorPhase::Off;
            self.prev_bicolor = BiColorPhase::Off;
        }
    }

    /// Clear cascade: every LED except hazard, chime and lamp test
    pub fn clear_cascade(&mut self) {
        for id in SwitchId::all().filter(|id| !id.survives_clear()) {
            self.clear(id);
        }
    }

    /// Turn every switch LED off
    pub fn clear_all(&mut self) {
        for id in SwitchId::all() {
            self.clear(id);
        }
    }

    /// Light a switch LED directly (boot demonstration)
    pub fn light(&mut self, id: SwitchId, on: bool) {
        self.leds[id.index()] = on;
        self.prev_leds[id.index()] = on;
    }

    /// Set the bi-color phase directly (boot demonstration)
    pub fn set_bicolor(&mut self, phase: BiColorPhase) {
        self.bicolor = phase;
        self.prev_bicolor = phase;
        self.leds[SwitchId::BI_COLOR.index()] = phase.is_lit();
        self.prev_leds[SwitchId::BI_COLOR.index()] = phase.is_lit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u8) -> SwitchId {
        SwitchId::new(n).unwrap()
    }

    /// Press and release once, acknowledging after each pass
    fn click(decoder: &mut SwitchDecoder, sw: SwitchId) -> bool {
        let changed = decoder.step(sw, true);
        decoder.commit(sw);
        decoder.step(sw, false);
        decoder.commit(sw);
        changed
    }

    #[test]
    fn test_id_bounds_and_remap() {
        assert!(SwitchId::new(0).is_none());
        assert!(SwitchId::new(36).is_none());
        // switch 1 is stored at index 0
        assert_eq!(id(1).index(), 0);
        assert_eq!(id(35).index(), 34);
        assert_eq!(SwitchId::all().count(), 35);
    }

    #[test]
    fn test_press_edge_toggles_once() {
        let mut decoder = SwitchDecoder::new();
        let sw = id(5);

        assert!(decoder.step(sw, true));
        decoder.commit(sw);
        assert!(decoder.is_lit(sw));

        // Held: no further toggles
        for _ in 0..5 {
            assert!(!decoder.step(sw, true));
            decoder.commit(sw);
        }
        assert!(decoder.is_lit(sw));

        // Release does nothing, next press toggles off
        assert!(!decoder.step(sw, false));
        assert!(decoder.step(sw, true));
        decoder.commit(sw);
        assert!(!decoder.is_lit(sw));
    }

    #[test]
    fn test_bicolor_cycles_through_three_phases() {
        let mut decoder = SwitchDecoder::new();
        let sw = SwitchId::BI_COLOR;

        let expected = [
            BiColorPhase::Yellow,
            BiColorPhase::Red,
            BiColorPhase::Off,
            BiColorPhase::Yellow,
        ];
        for phase in expected {
            assert!(click(&mut decoder, sw));
            assert_eq!(decoder.bicolor(), phase);
            assert_eq!(decoder.is_lit(sw), phase.is_lit());
        }
    }

    #[test]
    fn test_bicolor_hold_is_one_shot() {
        let mut decoder = SwitchDecoder::new();
        let sw = SwitchId::BI_COLOR;

        decoder.step(sw, true);
        decoder.commit(sw);
        decoder.step(sw, true);
        decoder.commit(sw);
        assert_eq!(decoder.bicolor(), BiColorPhase::Yellow);
    }

    #[test]
    fn test_uncommitted_change_stays_visible() {
        let mut decoder = SwitchDecoder::new();
        let sw = id(3);
        decoder.step(sw, true);
        assert!(decoder.changed(sw));
        decoder.step(sw, false);
        assert!(decoder.changed(sw));
        decoder.commit(sw);
        assert!(!decoder.changed(sw));
    }

    #[test]
    fn test_clear_cascade_keeps_special_switches() {
        let mut decoder = SwitchDecoder::new();
        for sw in SwitchId::all() {
            click(&mut decoder, sw);
        }

        decoder.clear_cascade();

        for sw in SwitchId::all() {
            assert_eq!(decoder.is_lit(sw), sw.survives_clear(), "switch {}", sw.number());
            assert!(!decoder.changed(sw));
        }
        assert_eq!(decoder.bicolor(), BiColorPhase::Off);

        decoder.clear_all();
        assert!(SwitchId::all().all(|sw| !decoder.is_lit(sw)));
    }
}
