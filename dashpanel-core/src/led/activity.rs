//! Activity indicator LEDs
//!
//! Four active-low LEDs on the upper nibble of expander port 3B. A bit is
//! cleared to light its LED; the heartbeat resets them all to off. The low
//! nibble carries switch inputs and is always written as 0.

/// All four activity LEDs off
pub const ACTIVITY_IDLE: u8 = 0xF0;

/// Activity source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Activity {
    /// Seven-segment readout written (bit 4)
    Segments,
    /// Encoder movement (bit 5)
    Encoder,
    /// Switch LED change (bit 6)
    Switch,
    /// LED matrix refresh (bit 7)
    Leds,
}

impl Activity {
    /// Bit driving this LED
    pub const fn mask(self) -> u8 {
        match self {
            Activity::Segments => 0x10,
            Activity::Encoder => 0x20,
            Activity::Switch => 0x40,
            Activity::Leds => 0x80,
        }
    }
}

/// Activity LED byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActivityLeds(u8);

impl Default for ActivityLeds {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityLeds {
    pub const fn new() -> Self {
        Self(ACTIVITY_IDLE)
    }

    /// Light the LED for an activity
    pub fn mark(&mut self, activity: Activity) {
        self.0 &= !activity.mask() & ACTIVITY_IDLE;
    }

    pub fn is_lit(&self, activity: Activity) -> bool {
        self.0 & activity.mask() == 0
    }

    /// Turn every LED off
    pub fn reset(&mut self) {
        self.0 = ACTIVITY_IDLE;
    }

    /// Byte to write to port 3B
    pub fn value(&self) -> u8 {
        self.0
    }
}
