//! Gauge calibration tables
//!
//! Each entry is the code the cluster expects for a logical dial position,
//! measured so the physical needle lands on the matching scale mark.
//! Index = dial position.

/// Tachometer codes, positions 0..=16 (0 to 8000 rpm in 500 rpm steps)
pub const RPM_CODES: [u8; 17] = [
    0, 10, 21, 30, 41, 50, 60, 70, 79, 89, 99, 109, 118, 128, 138, 148, 158,
];

/// Fuel gauge codes, positions 0..=8 (empty to full in eighths)
pub const FUEL_CODES: [u8; 9] = [0, 29, 61, 90, 122, 153, 183, 214, 245];

/// Speedometer codes, positions 0..=24 (0 to 240 km/h in 10 km/h steps)
pub const SPEED_CODES: [u8; 25] = [
    0, 6, 12, 19, 25, 31, 37, 43, 49, 55, 61, 68, 74, 80, 86, 92, 98, 104, 110, 116, 123, 129,
    136, 142, 149,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_start_at_zero_and_increase() {
        for table in [&RPM_CODES[..], &FUEL_CODES[..], &SPEED_CODES[..]] {
            assert_eq!(table[0], 0);
            assert!(table.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
