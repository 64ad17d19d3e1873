//! Boot demonstration
//!
//! Exercises every LED on the panel once at power-up: a segment snake on
//! the readouts, a sweep through the switch LEDs, then the three dial arcs
//! moving together, so a dead LED is obvious before the panel is used.

use embedded_hal::delay::DelayNs;

use super::{Panel, PanelError};
use crate::clock::TickClock;
use crate::dial::{DialKind, DialMode, DialState};
use crate::input::{BiColorPhase, SwitchId};
use crate::led::matrix::CHIP_COUNT;
use crate::led::segments::{CODE_B_DIGITS, DECIMAL_POINT, LABELS, READOUT_DIGITS, SNAKE};
use crate::led::{LedMatrix, Readout};
use crate::traits::{FrameTransmit, LedChain, PortSampler};

const SNAKE_STEP_MS: u32 = 100;
const SEGMENT_HOLD_MS: u32 = 600;
const SWEEP_STEP_MS: u32 = 150;
const SWEEP_HOLD_MS: u32 = 600;
const DIAL_PAUSE_MS: u32 = 200;

/// Switch LED sweep order
pub const DEMO_SWEEP: [u8; SwitchId::COUNT] = [
    4, 3, 2, 1, 10, 11, 12, 13, 8, 7, 6, 5, 9, 14, 15, 16, 17, 18, 19, 34, 33, 32, 31, 27, 28, 29,
    30, 26, 20, 21, 22, 23, 24, 25, 35,
];

/// Dial sweep keyframe: all three dials reach full scale together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoKeyframe {
    /// Offset from the start of the sweep
    pub at_ms: u32,
    pub rpm: u8,
    pub fuel: u8,
    pub speed: u8,
}

const fn kf(at_ms: u32, rpm: u8, fuel: u8, speed: u8) -> DemoKeyframe {
    DemoKeyframe {
        at_ms,
        rpm,
        fuel,
        speed,
    }
}

/// Dial sweep timeline, 0 to full scale in 1.2 s
pub const DEMO_KEYFRAMES: [DemoKeyframe; 33] = [
    kf(0, 0, 0, 0),
    kf(50, 0, 0, 1),
    kf(75, 1, 0, 1),
    kf(100, 1, 0, 2),
    kf(150, 2, 1, 3),
    kf(200, 2, 1, 4),
    kf(225, 3, 1, 4),
    kf(250, 3, 1, 5),
    kf(300, 4, 2, 6),
    kf(350, 4, 2, 7),
    kf(375, 5, 2, 7),
    kf(400, 5, 2, 8),
    kf(450, 6, 3, 9),
    kf(500, 6, 3, 10),
    kf(525, 7, 3, 10),
    kf(550, 7, 3, 11),
    kf(600, 8, 4, 12),
    kf(650, 8, 4, 13),
    kf(675, 9, 4, 13),
    kf(700, 9, 4, 14),
    kf(750, 10, 5, 15),
    kf(800, 10, 5, 16),
    kf(825, 11, 5, 16),
    kf(850, 11, 5, 17),
    kf(900, 12, 6, 18),
    kf(950, 12, 6, 19),
    kf(975, 13, 6, 19),
    kf(1000, 13, 6, 20),
    kf(1050, 14, 7, 21),
    kf(1100, 14, 7, 22),
    kf(1125, 15, 7, 22),
    kf(1150, 15, 7, 23),
    kf(1200, 16, 8, 24),
];

impl DemoKeyframe {
    fn position(&self, kind: DialKind) -> u8 {
        match kind {
            DialKind::Rpm => self.rpm,
            DialKind::Fuel => self.fuel,
            DialKind::Speed => self.speed,
        }
    }
}

impl<P, L, F, D> Panel<P, L, F, D>
where
    P: PortSampler,
    L: LedChain,
    F: FrameTransmit,
    D: DelayNs,
{
    /// Run the full boot demonstration
    ///
    /// Leaves the readouts in Code-B mode and every switch LED off. The
    /// panel's own dials are not touched.
    pub fn run_demo(&mut self, clock: &impl TickClock) -> Result<(), PanelError> {
        self.demo_segments()?;
        self.demo_switches()?;
        self.set_decode_mode(CODE_B_DIGITS)?;
        self.demo_dials(clock)
    }

    fn fill_readouts(
        &mut self,
        mut segments: impl FnMut(u8, usize) -> u8,
    ) -> Result<(), PanelError> {
        for chip in 0..CHIP_COUNT as u8 {
            for (i, &digit) in READOUT_DIGITS.iter().enumerate() {
                self.leds
                    .write_digit(chip, digit, segments(chip, i))
                    .map_err(|_| PanelError::LedTransmit)?;
            }
        }
        Ok(())
    }

    fn demo_segments(&mut self) -> Result<(), PanelError> {
        for dp in [0, DECIMAL_POINT] {
            for step in SNAKE {
                self.fill_readouts(|_, _| step | dp)?;
                self.delay.delay_ms(SNAKE_STEP_MS);
            }
        }

        self.fill_readouts(|_, _| 0xFF)?;
        self.delay.delay_ms(SEGMENT_HOLD_MS);
        self.fill_readouts(|_, _| 0x00)?;
        self.delay.delay_ms(SEGMENT_HOLD_MS);

        self.fill_readouts(|chip, i| LABELS[chip as usize][i])?;
        self.delay.delay_ms(SEGMENT_HOLD_MS);
        Ok(())
    }

    fn demo_switches(&mut self) -> Result<(), PanelError> {
        for id in DEMO_SWEEP.iter().filter_map(|&n| SwitchId::new(n)) {
            if id == SwitchId::BI_COLOR {
                self.switches.set_bicolor(BiColorPhase::Yellow);
            } else {
                self.switches.light(id, true);
            }
            self.refresh_leds()?;
            self.delay.delay_ms(SWEEP_STEP_MS);

            if id == SwitchId::BI_COLOR {
                self.delay.delay_ms(2 * SWEEP_STEP_MS);
                self.switches.set_bicolor(BiColorPhase::Red);
                self.refresh_leds()?;
                self.delay.delay_ms(SWEEP_STEP_MS);
            }
        }

        self.delay.delay_ms(SWEEP_HOLD_MS);
        self.switches.clear_all();
        self.refresh_leds()
    }

    fn demo_dials(&mut self, clock: &impl TickClock) -> Result<(), PanelError> {
        let mut dials = DialState::new();
        // forces the first keyframe to render
        let mut shown = [u8::MAX; 3];

        for mode in [DialMode::Dot, DialMode::Bar] {
            for kind in DialKind::ALL {
                dials.get_mut(kind).set_mode(mode);
            }
            for backward in [false, true] {
                let start = clock.now_ms();
                for (i, frame) in DEMO_KEYFRAMES.iter().enumerate() {
                    let target = if backward {
                        &DEMO_KEYFRAMES[DEMO_KEYFRAMES.len() - 1 - i]
                    } else {
                        frame
                    };
                    while clock.elapsed_since(start) < frame.at_ms {
                        core::hint::spin_loop();
                    }
                    self.demo_dial_frame(&mut dials, &mut shown, target)?;
                }
                self.delay.delay_ms(DIAL_PAUSE_MS);
            }
        }
        Ok(())
    }

    fn demo_dial_frame(
        &mut self,
        dials: &mut DialState,
        shown: &mut [u8; 3],
        frame: &DemoKeyframe,
    ) -> Result<(), PanelError> {
        let mut changed = false;
        for kind in DialKind::ALL {
            let position = frame.position(kind);
            if shown[kind as usize] == position {
                continue;
            }
            dials.get_mut(kind).set_position(position);
            self.write_readout(&Readout::for_dial(kind, position))?;
            shown[kind as usize] = position;
            changed = true;
        }

        if changed {
            let matrix = LedMatrix::compile(&self.switches, dials);
            self.write_matrix(&matrix)?;
        }
        Ok(())
    }
}
