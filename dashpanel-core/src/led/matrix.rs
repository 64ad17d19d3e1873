//! LED matrix compiler
//!
//! The three MAX7221 chips drive an 8×8 matrix each. Rows 0..3 carry the
//! discrete switch and dial LEDs, rows 4..7 the seven-segment digits
//! (written separately in Code-B mode). Only 11 of the 12 low rows are wired.
//!
//! ```text
//!          bit0   bit1   bit2   bit3   bit4   bit5   bit6   bit7
//! c0 r0    sw1    sw2    sw3    sw4    sw5    sw6    sw7    sw8
//! c0 r1    sw9    sw10   11red  11yel  sw12   sw13   sw14   rpm0
//! c0 r2    rpm1 ..                                          rpm8
//! c0 r3    rpm9 ..                                          rpm16
//! c1 r1    sw23   sw22   sw21   sw20   sw24   sw25   sw35   spd0
//! c1 r2    sw15   sw16   sw17   sw18   sw19   sw26   -      fuel0
//! c1 r3    fuel1 ..                                         fuel8
//! c2 r0    sw27 ..                                          sw34
//! c2 r1    spd1 ..                                          spd8
//! c2 r2    spd9 ..                                          spd16
//! c2 r3    spd17 ..                                         spd24
//! ```
//!
//! The bit layout is a physical wiring contract: `LED_LAYOUT` is the single
//! source of truth and `compile` is a pure table walk.

use crate::dial::{DialKind, DialState};
use crate::input::{BiColorPhase, SwitchDecoder, SwitchId};

/// Chips in the MAX7221 chain
pub const CHIP_COUNT: usize = 3;

/// Rows (digit registers) per chip
pub const ROWS_PER_CHIP: usize = 8;

/// Wired discrete-LED rows
pub const MATRIX_ROW_COUNT: usize = 11;

/// Wired discrete-LED rows as (chip, row), in transmit order
pub const MATRIX_ROWS: [(u8, u8); MATRIX_ROW_COUNT] = [
    (0, 0),
    (0, 1),
    (0, 2),
    (0, 3),
    (1, 1),
    (1, 2),
    (1, 3),
    (2, 0),
    (2, 1),
    (2, 2),
    (2, 3),
];

/// Logical LED driven by one matrix bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedSource {
    /// Switch LED by 1-based panel number (not 11)
    Switch(u8),
    /// Red half of the switch 11 bi-color LED
    BiColorRed,
    /// Yellow half of the switch 11 bi-color LED
    BiColorYellow,
    /// RPM arc LED by position
    Rpm(u8),
    /// Fuel arc LED by position
    Fuel(u8),
    /// Speed arc LED by position
    Speed(u8),
    /// Not wired
    Unused,
}

use LedSource::{BiColorRed, BiColorYellow, Fuel, Rpm, Speed, Switch, Unused};

/// Bit-to-LED table, rows in `MATRIX_ROWS` order, bit 0 first
pub const LED_LAYOUT: [[LedSource; 8]; MATRIX_ROW_COUNT] = [
    // chip 0
    [
        Switch(1),
        Switch(2),
        Switch(3),
        Switch(4),
        Switch(5),
        Switch(6),
        Switch(7),
        Switch(8),
    ],
    [
        Switch(9),
        Switch(10),
        BiColorRed,
        BiColorYellow,
        Switch(12),
        Switch(13),
        Switch(14),
        Rpm(0),
    ],
    [Rpm(1), Rpm(2), Rpm(3), Rpm(4), Rpm(5), Rpm(6), Rpm(7), Rpm(8)],
    [
        Rpm(9),
        Rpm(10),
        Rpm(11),
        Rpm(12),
        Rpm(13),
        Rpm(14),
        Rpm(15),
        Rpm(16),
    ],
    // chip 1
    [
        Switch(23),
        Switch(22),
        Switch(21),
        Switch(20),
        Switch(24),
        Switch(25),
        Switch(35),
        Speed(0),
    ],
    [
        Switch(15),
        Switch(16),
        Switch(17),
        Switch(18),
        Switch(19),
        Switch(26),
        Unused,
        Fuel(0),
    ],
    [
        Fuel(1),
        Fuel(2),
        Fuel(3),
        Fuel(4),
        Fuel(5),
        Fuel(6),
        Fuel(7),
        Fuel(8),
    ],
    // chip 2
    [
        Switch(27),
        Switch(28),
        Switch(29),
        Switch(30),
        Switch(31),
        Switch(32),
        Switch(33),
        Switch(34),
    ],
    [
        Speed(1),
        Speed(2),
        Speed(3),
        Speed(4),
        Speed(5),
        Speed(6),
        Speed(7),
        Speed(8),
    ],
    [
        Speed(9),
        Speed(10),
        Speed(11),
        Speed(12),
        Speed(13),
        Speed(14),
        Speed(15),
        Speed(16),
    ],
    [
        Speed(17),
        Speed(18),
        Speed(19),
        Speed(20),
        Speed(21),
        Speed(22),
        Speed(23),
        Speed(24),
    ],
];

/// Compiled matrix image, one byte per (chip, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedMatrix {
    rows: [[u8; ROWS_PER_CHIP]; CHIP_COUNT],
}

impl LedMatrix {
    /// All LEDs off
    pub const fn new() -> Self {
        Self {
            rows: [[0; ROWS_PER_CHIP]; CHIP_COUNT],
        }
    }

    /// Pack switch and dial LED state into the matrix image
    pub fn compile(switches: &SwitchDecoder, dials: &DialState) -> Self {
        Self::from_sources(|source| match source {
            Switch(n) => SwitchId::new(n).is_some_and(|id| switches.is_lit(id)),
            BiColorRed => switches.bicolor() == BiColorPhase::Red,
            BiColorYellow => switches.bicolor() == BiColorPhase::Yellow,
            Rpm(i) => dial_led(dials, DialKind::Rpm, i),
            Fuel(i) => dial_led(dials, DialKind::Fuel, i),
            Speed(i) => dial_led(dials, DialKind::Speed, i),
            Unused => false,
        })
    }

    /// Lamp-test image: every wired LED on, bi-color in red only
    pub fn lamp_test() -> Self {
        Self::from_sources(|source| !matches!(source, BiColorYellow | Unused))
    }

    fn from_sources(mut lit: impl FnMut(LedSource) -> bool) -> Self {
        let mut matrix = Self::new();
        for (&(chip, row), sources) in MATRIX_ROWS.iter().zip(LED_LAYOUT.iter()) {
            let byte = sources
                .iter()
                .enumerate()
                .filter(|&(_, &source)| lit(source))
                .fold(0u8, |acc, (bit, _)| acc | (1 << bit));
            matrix.rows[chip as usize][row as usize] = byte;
        }
        matrix
    }

    /// One row byte
    pub fn row(&self, chip: u8, row: u8) -> u8 {
        self.rows[chip as usize][row as usize]
    }

    /// Wired rows as (chip, row, byte), in transmit order
    pub fn wired_rows(&self) -> impl Iterator<Item = (u8, u8, u8)> + '_ {
        MATRIX_ROWS
            .iter()
            .map(move |&(chip, row)| (chip, row, self.row(chip, row)))
    }
}

fn dial_led(dials: &DialState, kind: DialKind, index: u8) -> bool {
    dials
        .get(kind)
        .leds()
        .get(index as usize)
        .copied()
        .unwrap_or(false)
}
