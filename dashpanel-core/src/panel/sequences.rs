//! Bespoke frame sequences
//!
//! The cluster drops frames that arrive too close together, so every frame
//! another one depends on is followed by the frame gap.

use dashpanel_protocol::ClusterMessage;
use embedded_hal::delay::DelayNs;

use super::{Panel, PanelError};
use crate::cluster::IndicatorStatus;
use crate::dial::DialKind;
use crate::input::SwitchId;
use crate::led::matrix::CHIP_COUNT;
use crate::led::{LedMatrix, Readout};
use crate::traits::{FrameTransmit, LedChain, PortSampler};

impl<P, L, F, D> Panel<P, L, F, D>
where
    P: PortSampler,
    L: LedChain,
    F: FrameTransmit,
    D: DelayNs,
{
    /// Hazard lights on: odometer test off, clear everything, hazard frame
    pub(super) fn hazard_on(&mut self) -> Result<(), PanelError> {
        let result = self.send(ClusterMessage::OdometerTest(false));
        self.gap();
        result
            .and(self.clear_cascade())
            .and(self.send(ClusterMessage::HazardLights(true)))
    }

    /// Chime: clear everything, latch the chime LED until the next heartbeat
    pub(super) fn chime(&mut self) -> Result<(), PanelError> {
        let result = self.odometer_off_if_active().and(self.clear_cascade());
        self.chime_latched = true;
        result.and(self.send(ClusterMessage::Chime))
    }

    /// Lamp test: everything on for the hold time, then clear everything
    pub(super) fn lamp_test(&mut self) -> Result<(), PanelError> {
        let mut result = self.odometer_off_if_active();
        if self.switches.is_lit(SwitchId::HAZARD) {
            result = result.and(self.send(ClusterMessage::HazardLights(false)));
        }

        result = result.and(self.write_matrix(&LedMatrix::lamp_test()));
        for chip in 0..CHIP_COUNT as u8 {
            result = result.and(self.write_readout(&Readout::lamp_test(chip)));
        }
        self.delay.delay_ms(self.config.lamp_test_hold_ms);

        self.switches.clear_all();
        result.and(self.clear_cascade())
    }

    /// Turn off every switch LED except hazard, chime and lamp test, zero
    /// every indicator group and return every dial to 0
    ///
    /// Runs to the end even if a frame fails; the first error is returned.
    pub(super) fn clear_cascade(&mut self) -> Result<(), PanelError> {
        self.switches.clear_cascade();

        let mut result = Ok(());
        for group in IndicatorStatus::groups() {
            let message = self.indicators.clear(group);
            result = result.and(self.send(message));
            self.gap();
        }

        for kind in DialKind::ALL {
            self.dials.get_mut(kind).set_position(0);
            result = result.and(self.show_readout(kind));
            result = result.and(self.send(ClusterMessage::Dial {
                target: kind.target(),
                code: self.dials.get(kind).calibrated_code(),
            }));
            self.gap();
        }
        result
    }

    /// Restart the keepalive countdown and resend every indicator group
    ///
    /// The countdown restarts even when a group fails to send, so a failed
    /// resync waits for the next elapsed countdown like any other.
    pub(super) fn resync(&mut self) -> Result<(), PanelError> {
        self.countdown.reset();

        let mut result = Ok(());
        for group in IndicatorStatus::groups() {
            if group > 1 {
                self.gap();
            }
            let message = self.indicators.message(group);
            result = result.and(self.send(message));
        }
        result
    }

    fn odometer_off_if_active(&mut self) -> Result<(), PanelError> {
        if !self.switches.is_lit(SwitchId::ODOMETER_TEST) {
            return Ok(());
        }
        let result = self.send(ClusterMessage::OdometerTest(false));
        self.gap();
        result
    }
}
