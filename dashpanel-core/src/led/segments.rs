//! Seven-segment readouts
//!
//! Each chip drives a 4-digit display on digit registers 7..4. In Code-B
//! mode a register takes a decimal digit, with bit 7 as the decimal point.
//! In raw mode a register takes segments `DP A B C D E F G` (bit 7..0).

use crate::dial::DialKind;

/// Digit registers wired to the displays, most significant first
pub const READOUT_DIGITS: [u8; 4] = [7, 6, 5, 4];

/// Decode mask enabling Code-B on the display digits only
pub const CODE_B_DIGITS: u8 = 0xF0;

/// Decimal point bit
pub const DECIMAL_POINT: u8 = 0x80;

/// "8." in Code-B, every segment lit
pub const LAMP_TEST_DIGIT: u8 = DECIMAL_POINT | 8;

/// Raw segment snake: F, A, B, G, E, D, C, G
pub const SNAKE: [u8; 8] = [0x02, 0x40, 0x20, 0x01, 0x04, 0x08, 0x10, 0x01];

/// Raw segment labels "rPri", "FuEL", "SPEE", one per chip
pub const LABELS: [[u8; 4]; 3] = [
    [0x05, 0x67, 0x15, 0x11],
    [0x47, 0x3E, 0x4F, 0x0E],
    [0x5B, 0x67, 0x4F, 0x4F],
];

/// Code-B digits for one display, in `READOUT_DIGITS` order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Readout {
    pub chip: u8,
    pub digits: [u8; 4],
}

impl Readout {
    /// Readout for a dial at a position
    ///
    /// RPM and speed show four decimal digits; fuel shows `XX.00`.
    pub fn for_dial(kind: DialKind, position: u8) -> Self {
        let value = kind.readout_value(position);
        let digits = match kind {
            DialKind::Fuel => [
                ((value / 10) % 10) as u8,
                DECIMAL_POINT | (value % 10) as u8,
                0,
                0,
            ],
            DialKind::Rpm | DialKind::Speed => [
                ((value / 1000) % 10) as u8,
                ((value / 100) % 10) as u8,
                ((value / 10) % 10) as u8,
                (value % 10) as u8,
            ],
        };
        Self {
            chip: kind.readout_chip(),
            digits,
        }
    }

    /// Every digit "8." on one chip
    pub fn lamp_test(chip: u8) -> Self {
        Self {
            chip,
            digits: [LAMP_TEST_DIGIT; 4],
        }
    }

    /// (digit register index, value) pairs in transmit order
    pub fn writes(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        READOUT_DIGITS.iter().copied().zip(self.digits.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpm_readout() {
        let readout = Readout::for_dial(DialKind::Rpm, 15);
        assert_eq!(readout.chip, 0);
        assert_eq!(readout.digits, [7, 5, 0, 0]);
    }

    #[test]
    fn test_fuel_readout_has_decimal_point() {
        let readout = Readout::for_dial(DialKind::Fuel, 7);
        assert_eq!(readout.chip, 1);
        assert_eq!(readout.digits, [4, 0x82, 0, 0]);

        let empty = Readout::for_dial(DialKind::Fuel, 0);
        assert_eq!(empty.digits, [0, 0x80, 0, 0]);
    }

    #[test]
    fn test_speed_readout() {
        let readout = Readout::for_dial(DialKind::Speed, 24);
        assert_eq!(readout.chip, 2);
        assert_eq!(readout.digits, [0, 2, 4, 0]);
    }

    #[test]
    fn test_writes_are_most_significant_first() {
        let readout = Readout::for_dial(DialKind::Rpm, 16);
        let writes: std::vec::Vec<_> = readout.writes().collect();
        assert_eq!(writes, [(7, 8), (6, 0), (5, 0), (4, 0)]);
    }

    #[test]
    fn test_lamp_test_digit() {
        assert_eq!(LAMP_TEST_DIGIT, 136);
        assert!(Readout::lamp_test(2).digits.iter().all(|&d| d == 136));
    }
}
