//! LED driver chain

/// Chain of LED matrix / seven-segment driver chips
///
/// Chips are addressed 0..3 from the controller end of the chain. Each call
/// is one complete chain command; the other chips see a no-op.
pub trait LedChain {
    type Error;

    /// Write one digit register (0..=7) of one chip
    fn write_digit(&mut self, chip: u8, digit: u8, value: u8) -> Result<(), Self::Error>;

    /// Set which digits use Code-B decoding (bit n = digit n)
    fn set_decode_mode(&mut self, chip: u8, mask: u8) -> Result<(), Self::Error>;

    /// Set the display brightness (1..=15)
    fn set_intensity(&mut self, chip: u8, level: u8) -> Result<(), Self::Error>;
}
