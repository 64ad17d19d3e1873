//! Message catalogue for the instrument cluster link
//!
//! Every message the panel emits maps to exactly one fixed-layout frame.
//! Panel-status messages share identifier 0x255 and are told apart by the
//! selector byte at offset 2:
//! - 0x01..=0x05: indicator group status
//! - 0x08..=0x0A: dial needle target
//! - 0x0D: odometer LCD test

use crate::frame::{CanFrame, FrameError};

// Frame identifiers
pub const ID_WAKEUP: u16 = 0x632;
pub const ID_PANEL: u16 = 0x255;
pub const ID_HAZARD: u16 = 0x260;
pub const ID_CHIME: u16 = 0x281;

/// Leading bytes of every 0x255 panel-status frame
pub const PANEL_HEADER: [u8; 2] = [0x04, 0xAE];

/// Selector byte of the odometer LCD test frame
pub const ODOMETER_TEST_SELECTOR: u8 = 0x0D;

/// Wake-up payload (also serves as heartbeat)
pub const WAKEUP_PAYLOAD: [u8; 8] = [0x00, 0x48, 0x50, 0x00, 0x00, 0x00, 0x00, 0x00];

/// Hazard lights payload when switched on
pub const HAZARD_ON_PAYLOAD: [u8; 3] = [0x7F, 0x32, 0x80];

/// Hazard lights payload when switched off
pub const HAZARD_OFF_PAYLOAD: [u8; 3] = [0x00, 0x00, 0x00];

/// One-shot chime payload
pub const CHIME_PAYLOAD: [u8; 5] = [0x60, 0x05, 0x1E, 0x02, 0x33];

/// Gauge addressed by a dial frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DialTarget {
    /// Tachometer
    Rpm,
    /// Fuel gauge
    Fuel,
    /// Speedometer
    Speed,
}

impl DialTarget {
    /// Selector byte carried at payload offset 2
    pub const fn selector(self) -> u8 {
        match self {
            DialTarget::Rpm => 0x09,
            DialTarget::Fuel => 0x0A,
            DialTarget::Speed => 0x08,
        }
    }

    /// Look up a target from its selector byte
    pub fn from_selector(byte: u8) -> Option<Self> {
        match byte {
            0x09 => Some(DialTarget::Rpm),
            0x0A => Some(DialTarget::Fuel),
            0x08 => Some(DialTarget::Speed),
            _ => None,
        }
    }
}

/// Messages from the panel to the instrument cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClusterMessage {
    /// Periodic wake-up, keeps the cluster out of sleep
    Wakeup,
    /// Move a gauge needle to a calibrated position
    Dial { target: DialTarget, code: u8 },
    /// Indicator group status byte (sent twice in the payload)
    IndicatorGroup { group: u8, status: u8 },
    /// Odometer LCD segment test on/off
    OdometerTest(bool),
    /// Hazard lights on/off
    HazardLights(bool),
    /// Single chime
    Chime,
}

impl ClusterMessage {
    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<CanFrame, FrameError> {
        let [h0, h1] = PANEL_HEADER;
        match *self {
            ClusterMessage::Wakeup => CanFrame::new(ID_WAKEUP, &WAKEUP_PAYLOAD),
            ClusterMessage::Dial { target, code } => CanFrame::new(
                ID_PANEL,
                &[h0, h1, target.selector(), 0x01, code, 0x00, 0x00, 0x00],
            ),
            ClusterMessage::IndicatorGroup { group, status } => CanFrame::new(
                ID_PANEL,
                &[h0, h1, group, status, status, 0x00, 0x00, 0x00],
            ),
            ClusterMessage::OdometerTest(on) => {
                let flag = on as u8;
                CanFrame::new(
                    ID_PANEL,
                    &[h0, h1, ODOMETER_TEST_SELECTOR, flag, flag, 0x00, 0x00, 0x00],
                )
            }
            ClusterMessage::HazardLights(true) => CanFrame::new(ID_HAZARD, &HAZARD_ON_PAYLOAD),
            ClusterMessage::HazardLights(false) => CanFrame::new(ID_HAZARD, &HAZARD_OFF_PAYLOAD),
            ClusterMessage::Chime => CanFrame::new(ID_CHIME, &CHIME_PAYLOAD),
        }
    }

    /// Classify a frame (for testing or bus monitoring)
    pub fn from_frame(frame: &CanFrame) -> Result<Self, FrameError> {
        let data = frame.data.as_slice();
        match frame.id {
            ID_WAKEUP if data == WAKEUP_PAYLOAD => Ok(ClusterMessage::Wakeup),
            ID_HAZARD if data == HAZARD_ON_PAYLOAD => Ok(ClusterMessage::HazardLights(true)),
            ID_HAZARD if data == HAZARD_OFF_PAYLOAD => Ok(ClusterMessage::HazardLights(false)),
            ID_CHIME if data == CHIME_PAYLOAD => Ok(ClusterMessage::Chime),
            ID_PANEL => Self::from_panel_payload(data),
            _ => Err(FrameError::InvalidFrame),
        }
    }

    fn from_panel_payload(data: &[u8]) -> Result<Self, FrameError> {
        if data.len() != 8 || data[..2] != PANEL_HEADER {
            return Err(FrameError::InvalidFrame);
        }

        let selector = data[2];
        if let Some(target) = DialTarget::from_selector(selector) {
            return Ok(ClusterMessage::Dial {
                target,
                code: data[4],
            });
        }

        // Both status copies must agree
        if data[3] != data[4] {
            return Err(FrameError::InvalidFrame);
        }

        match selector {
            ODOMETER_TEST_SELECTOR => Ok(ClusterMessage::OdometerTest(data[3] != 0)),
            0x01..=0x05 => Ok(ClusterMessage::IndicatorGroup {
                group: selector,
                status: data[3],
            }),
            _ => Err(FrameError::InvalidFrame),
        }
    }
}
