//! Cluster indicator groups
//!
//! The cluster exposes its tell-tales as five status bytes ("groups"). Each
//! panel switch with a plain on/off tell-tale owns one bit of one group.
//! The panel keeps its own copy of every group byte and always sends the
//! whole byte, so a missed frame is corrected by the next one.

use dashpanel_protocol::ClusterMessage;

use crate::input::{BiColorPhase, SwitchId};

/// Number of indicator groups (1..=5)
pub const GROUP_COUNT: u8 = 5;

/// Group holding the bi-color turn-signal bits
pub const BI_COLOR_GROUP: u8 = 2;

/// Bi-color yellow bit within `BI_COLOR_GROUP`
pub const BI_COLOR_YELLOW: u8 = 0x08;

/// Bi-color red bit within `BI_COLOR_GROUP`
pub const BI_COLOR_RED: u8 = 0x10;

/// Switch number → (group, bit), index 0 unused
///
/// Switches 11, 22, 24, 25 and 35 drive bespoke frames and have no entry.
pub const SWITCH_GROUPS: [Option<(u8, u8)>; SwitchId::COUNT + 1] = [
    None,         // 0
    Some((1, 1)), // 1
    Some((1, 2)),
    Some((1, 0)),
    Some((1, 7)),
    Some((4, 7)), // 5
    Some((1, 3)),
    Some((1, 4)),
    Some((5, 0)),
    Some((1, 5)),
    Some((4, 3)), // 10
    None,
    Some((4, 2)),
    Some((4, 4)),
    Some((2, 7)),
    Some((3, 4)), // 15
    Some((3, 7)),
    Some((3, 1)),
    Some((4, 0)),
    Some((3, 5)),
    Some((2, 1)), // 20
    Some((2, 2)),
    None,
    Some((4, 5)),
    None,
    None, // 25
    Some((3, 0)),
    Some((3, 2)),
    Some((2, 6)),
    Some((2, 5)),
    Some((3, 3)), // 30
    Some((3, 6)),
    Some((1, 6)),
    Some((2, 0)),
    Some((4, 1)),
    None, // 35
];

/// Group and bit for a switch, if it has a plain tell-tale
pub fn group_of(id: SwitchId) -> Option<(u8, u8)> {
    SWITCH_GROUPS[id.number() as usize]
}

/// Panel-side copy of the cluster group bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndicatorStatus {
    // index 0 unused
    groups: [u8; GROUP_COUNT as usize + 1],
}

impl IndicatorStatus {
    pub const fn new() -> Self {
        Self {
            groups: [0; GROUP_COUNT as usize + 1],
        }
    }

    /// Flip one bit and return the updated group message
    pub fn toggle(&mut self, group: u8, bit: u8) -> ClusterMessage {
        self.groups[group as usize] ^= 1 << bit;
        self.message(group)
    }

    /// Set the bi-color bits for a phase and return the group message
    pub fn set_bicolor(&mut self, phase: BiColorPhase) -> ClusterMessage {
        let status = &mut self.groups[BI_COLOR_GROUP as usize];
        *status &= !(BI_COLOR_YELLOW | BI_COLOR_RED);
        *status |= match phase {
            BiColorPhase::Off => 0,
            BiColorPhase::Yellow => BI_COLOR_YELLOW,
            BiColorPhase::Red => BI_COLOR_RED,
        };
        self.message(BI_COLOR_GROUP)
    }

    /// Zero one group and return its message
    pub fn clear(&mut self, group: u8) -> ClusterMessage {
        self.groups[group as usize] = 0;
        self.message(group)
    }

    pub fn status(&self, group: u8) -> u8 {
        self.groups[group as usize]
    }

    /// Current message for one group
    pub fn message(&self, group: u8) -> ClusterMessage {
        ClusterMessage::IndicatorGroup {
            group,
            status: self.status(group),
        }
    }

    /// Group numbers in send order
    pub fn groups() -> impl Iterator<Item = u8> {
        1..=GROUP_COUNT
    }
}
