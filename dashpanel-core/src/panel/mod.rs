//! Panel control loop
//!
//! `Panel` owns every piece of decoded state and the three collaborators
//! (port sampler, LED chain, frame transmitter). The firmware calls `poll`
//! in a loop; each call does at most one unit of work:
//!
//! ```text
//!   heartbeat pending? ──► heartbeat(): countdown++, wake-up frame
//!
//!   Idle ──(change | countdown elapsed)──► Process ──► Idle
//!                                            │
//!                                            └─(special sequence)─► Settle ──(frame gap)──► Idle
//! ```
//!
//! A processing pass always runs in the same order: sample, encoders,
//! switches, resync, encoder buttons, activity LEDs, LED refresh.

mod demo;
mod sequences;


use dashpanel_protocol::{ClusterMessage, FrameError};
use embedded_hal::delay::DelayNs;

use crate::clock::{PanelSignals, TickClock};
use crate::cluster::{IndicatorStatus, SwitchPolicy};
use crate::config::PanelConfig;
use crate::dial::{DialKind, DialState};
use crate::input::{ButtonEdges, EncoderBank, EncoderId, PortSample, SwitchDecoder, SwitchId};
use crate::led::matrix::CHIP_COUNT;
use crate::led::segments::CODE_B_DIGITS;
use crate::led::{Activity, ActivityLeds, LedMatrix, Readout};
use crate::state::{Countdown, LoopEvent, LoopState};
use crate::traits::{FrameTransmit, LedChain, PortSampler};

pub use demo::{DemoKeyframe, DEMO_KEYFRAMES, DEMO_SWEEP};

/// Control loop errors
///
/// Collaborator errors are reduced to the stage that failed; the drivers
/// underneath keep their own error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError {
    /// Expander read or activity LED write failed
    Sample,
    /// LED chain write failed
    LedTransmit,
    /// Frame transmit failed
    FrameTransmit,
    /// Frame could not be built
    Frame(FrameError),
}

impl From<FrameError> for PanelError {
    fn from(e: FrameError) -> Self {
        PanelError::Frame(e)
    }
}

/// Summary of one processing pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PassReport {
    /// Completed encoder clicks
    pub clicks: u8,
    /// Dial frames sent for clicks that moved a dial
    pub dial_frames: u8,
    /// Switch LEDs that changed
    pub switch_changes: u8,
    /// All indicator groups were resent
    pub resynced: bool,
    /// Last bespoke sequence that ran, if any
    pub special: Option<SwitchPolicy>,
}

/// Panel controller
pub struct Panel<P, L, F, D> {
    sampler: P,
    leds: L,
    transmit: F,
    delay: D,
    config: PanelConfig,
    state: LoopState,
    switches: SwitchDecoder,
    encoders: EncoderBank,
    buttons: ButtonEdges,
    dials: DialState,
    indicators: IndicatorStatus,
    countdown: Countdown,
    activity: ActivityLeds,
    chime_latched: bool,
}

impl<P, L, F, D> Panel<P, L, F, D>
where
    P: PortSampler,
    L: LedChain,
    F: FrameTransmit,
    D: DelayNs,
{
    pub fn new(sampler: P, leds: L, transmit: F, delay: D, config: PanelConfig) -> Self {
        Self {
            sampler,
            leds,
            transmit,
            delay,
            config,
            state: LoopState::Idle,
            switches: SwitchDecoder::new(),
            encoders: EncoderBank::new(),
            buttons: ButtonEdges::new(),
            dials: DialState::new(),
            indicators: IndicatorStatus::new(),
            countdown: Countdown::new(config.resync_heartbeats),
            activity: ActivityLeds::new(),
            chime_latched: false,
        }
    }

    /// Bring the displays up: intensity, optional demo, Code-B digits,
    /// initial readouts and LED image
    ///
    /// The chips must already be initialized by their drivers.
    pub fn start(&mut self, clock: &impl TickClock) -> Result<(), PanelError> {
        for chip in 0..CHIP_COUNT as u8 {
            self.leds
                .set_intensity(chip, self.config.intensity)
                .map_err(|_| PanelError::LedTransmit)?;
        }

        if self.config.boot_demo {
            self.run_demo(clock)?;
        }

        self.set_decode_mode(CODE_B_DIGITS)?;
        for kind in DialKind::ALL {
            self.show_readout(kind)?;
        }
        self.refresh_leds()
    }

    /// One non-blocking step of the control loop
    ///
    /// Returns the pass report when a processing pass ran.
    pub fn poll(&mut self, signals: &PanelSignals) -> Result<Option<PassReport>, PanelError> {
        if signals.take_heartbeat() {
            self.heartbeat()?;
        }

        match self.state {
            LoopState::Idle => {
                let woken = signals.take_change() || self.countdown.elapsed();
                if !woken {
                    return Ok(None);
                }
                self.state = self.state.transition(LoopEvent::Wake);

                let result = self.process();
                let event = match &result {
                    Ok(report) if report.special.is_some() => LoopEvent::SequenceSent,
                    _ => LoopEvent::PassComplete,
                };
                self.state = self.state.transition(event);
                result.map(Some)
            }
            LoopState::Settle => {
                self.gap();
                self.state = self.state.transition(LoopEvent::Settled);
                Ok(None)
            }
            LoopState::Process => {
                // A pass never stays in Process across polls
                self.state = self.state.transition(LoopEvent::PassComplete);
                Ok(None)
            }
        }
    }

    /// Run one full processing pass
    ///
    /// A failed transmit does not cut the pass short: every changed input
    /// is still decoded, the activity and LED outputs are still written,
    /// and the first error is returned at the end.
    pub fn process(&mut self) -> Result<PassReport, PanelError> {
        let sample = self.sampler.sample().map_err(|_| PanelError::Sample)?;
        let mut report = PassReport::default();

        let mut result = self.process_encoders(&sample, &mut report);
        result = result.and(self.process_switches(&sample, &mut report));

        if report.switch_changes == 0 && self.countdown.elapsed() {
            result = result.and(self.resync());
            report.resynced = true;
        }

        let edges = self.buttons.update(&sample);
        for id in EncoderId::ALL {
            if edges[id.index()] {
                self.dials.get_mut(DialKind::for_encoder(id)).toggle_mode();
            }
        }

        let activity = self
            .sampler
            .write_activity(self.activity.value())
            .map_err(|_| PanelError::Sample);
        result = result.and(activity).and(self.refresh_leds());

        result.map(|_| report)
    }

    /// Handle one heartbeat pulse
    pub fn heartbeat(&mut self) -> Result<(), PanelError> {
        self.countdown.tick();
        self.activity.reset();

        let mut result = Ok(());
        if self.chime_latched {
            self.chime_latched = false;
            self.switches.clear(SwitchId::CHIME);
            result = self.refresh_leds();
        }

        result.and(self.send(ClusterMessage::Wakeup))
    }

    fn process_encoders(
        &mut self,
        sample: &PortSample,
        report: &mut PassReport,
    ) -> Result<(), PanelError> {
        let codes = EncoderId::ALL.map(|id| sample.encoder_code(id));
        if !self.encoders.needs_decode(codes) {
            return Ok(());
        }
        self.activity.mark(Activity::Encoder);

        let mut result = Ok(());
        let clicks = self.encoders.update(codes);
        for (id, click) in EncoderId::ALL.into_iter().zip(clicks) {
            let Some(rotation) = click else {
                continue;
            };
            report.clicks += 1;

            let kind = DialKind::for_encoder(id);
            if !self.dials.get_mut(kind).step(rotation) {
                continue;
            }
            let shown = self.show_readout(kind);
            let sent = self.send(ClusterMessage::Dial {
                target: kind.target(),
                code: self.dials.get(kind).calibrated_code(),
            });
            if sent.is_ok() {
                report.dial_frames += 1;
            }
            result = result.and(shown).and(sent);
        }
        result
    }

    fn process_switches(
        &mut self,
        sample: &PortSample,
        report: &mut PassReport,
    ) -> Result<(), PanelError> {
        let mut result = Ok(());
        for id in SwitchId::all() {
            if !self.switches.step(id, sample.switch_pressed(id)) {
                self.switches.commit(id);
                continue;
            }

            self.activity.mark(Activity::Switch);
            self.countdown.reset();
            report.switch_changes += 1;

            let policy = SwitchPolicy::for_switch(id);
            let lit = self.switches.is_lit(id);
            let sent = self.dispatch(policy, lit);
            // acknowledged even on failure; frames are never retried
            self.switches.commit(id);
            if policy.runs_sequence(lit) {
                report.special = Some(policy);
            }
            result = result.and(sent);
        }
        result
    }

    /// Send the cluster side of one switch LED change
    fn dispatch(&mut self, policy: SwitchPolicy, lit: bool) -> Result<(), PanelError> {
        match policy {
            SwitchPolicy::Indicator { group, bit } => {
                let message = self.indicators.toggle(group, bit);
                self.send(message)
            }
            SwitchPolicy::BiColor => {
                let message = self.indicators.set_bicolor(self.switches.bicolor());
                self.send(message)
            }
            SwitchPolicy::OdometerTest => self.send(ClusterMessage::OdometerTest(lit)),
            SwitchPolicy::HazardLights if lit => self.hazard_on(),
            SwitchPolicy::HazardLights => self.send(ClusterMessage::HazardLights(false)),
            SwitchPolicy::Chime if lit => self.chime(),
            SwitchPolicy::LampTest if lit => self.lamp_test(),
            SwitchPolicy::Chime | SwitchPolicy::LampTest => Ok(()),
        }
    }

    /// Current control loop state
    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn switches(&self) -> &SwitchDecoder {
        &self.switches
    }

    pub fn dials(&self) -> &DialState {
        &self.dials
    }

    pub fn indicators(&self) -> &IndicatorStatus {
        &self.indicators
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn activity(&self) -> ActivityLeds {
        self.activity
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Compile and transmit the LED matrix from the current state
    fn refresh_leds(&mut self) -> Result<(), PanelError> {
        let matrix = LedMatrix::compile(&self.switches, &self.dials);
        self.write_matrix(&matrix)
    }

    fn write_matrix(&mut self, matrix: &LedMatrix) -> Result<(), PanelError> {
        for (chip, row, value) in matrix.wired_rows() {
            self.leds
                .write_digit(chip, row, value)
                .map_err(|_| PanelError::LedTransmit)?;
        }
        self.activity.mark(Activity::Leds);
        Ok(())
    }

    fn show_readout(&mut self, kind: DialKind) -> Result<(), PanelError> {
        let readout = Readout::for_dial(kind, self.dials.get(kind).position());
        self.write_readout(&readout)
    }

    fn write_readout(&mut self, readout: &Readout) -> Result<(), PanelError> {
        for (digit, value) in readout.writes() {
            self.leds
                .write_digit(readout.chip, digit, value)
                .map_err(|_| PanelError::LedTransmit)?;
        }
        self.activity.mark(Activity::Segments);
        Ok(())
    }

    fn set_decode_mode(&mut self, mask: u8) -> Result<(), PanelError> {
        for chip in 0..CHIP_COUNT as u8 {
            self.leds
                .set_decode_mode(chip, mask)
                .map_err(|_| PanelError::LedTransmit)?;
        }
        Ok(())
    }

    fn send(&mut self, message: ClusterMessage) -> Result<(), PanelError> {
        let frame = message.to_frame()?;
        self.transmit
            .transmit(&frame)
            .map_err(|_| PanelError::FrameTransmit)
    }

    /// Pause between dependent frames
    fn gap(&mut self) {
        self.delay.delay_ms(self.config.frame_gap_ms);
    }
}
