//! Per-switch dispatch
//!
//! Most switches map to one indicator bit. A handful drive their own frame
//! sequences; the table below is the only place that knows which.

use super::indicators::group_of;
use crate::input::SwitchId;

/// What a switch LED change does on the cluster side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwitchPolicy {
    /// Flip one group bit and send the group
    Indicator { group: u8, bit: u8 },
    /// Set the turn-signal yellow/red bits and send group 2
    BiColor,
    /// Odometer LCD segment test on/off
    OdometerTest,
    /// Hazard lights, with a full clear when turned on
    HazardLights,
    /// One-shot chime, with a full clear
    Chime,
    /// All-LEDs lamp test, ending in a full clear
    LampTest,
}

impl SwitchPolicy {
    /// Policy for a switch
    pub fn for_switch(id: SwitchId) -> Self {
        match (id, group_of(id)) {
            (_, Some((group, bit))) => SwitchPolicy::Indicator { group, bit },
            (SwitchId::ODOMETER_TEST, None) => SwitchPolicy::OdometerTest,
            (SwitchId::HAZARD, None) => SwitchPolicy::HazardLights,
            (SwitchId::CHIME, None) => SwitchPolicy::Chime,
            (SwitchId::LAMP_TEST, None) => SwitchPolicy::LampTest,
            _ => SwitchPolicy::BiColor,
        }
    }

    /// Whether the LED change runs a bespoke frame sequence
    ///
    /// `lit` is the switch LED state after the change. Chime and lamp test
    /// only act when turned on.
    pub fn runs_sequence(&self, lit: bool) -> bool {
        match self {
            SwitchPolicy::Indicator { .. } | SwitchPolicy::BiColor => false,
            SwitchPolicy::OdometerTest | SwitchPolicy::HazardLights => true,
            SwitchPolicy::Chime | SwitchPolicy::LampTest => lit,
        }
    }
}
