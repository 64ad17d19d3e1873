//! CAN frame representation and the MCP2515 transmit-buffer image.
//!
//! Frame format (standard data frame):
//! - ID (11 bits): 0x000-0x7FF
//! - DLC (4 bits): payload length (0-8)
//! - DATA (0-8 bytes)
//!
//! The transmit-buffer image mirrors the controller register block starting
//! at TXBnSIDH so a driver can load it with a single sequential write:
//! - SIDH: ID bits 10..3
//! - SIDL: ID bits 2..0 in bits 7..5, extended-id flag clear
//! - EID8, EID0: always zero (standard frames only)
//! - DLC: length in the low nibble, RTR clear
//! - D0..D7: payload, zero padded

use heapless::Vec;

/// Highest valid 11-bit identifier
pub const MAX_STANDARD_ID: u16 = 0x7FF;

/// Maximum payload size in bytes
pub const MAX_DATA_LEN: usize = 8;

/// Size of the register image (SIDH + SIDL + EID8 + EID0 + DLC + 8 data bytes)
pub const TX_BUFFER_LEN: usize = 5 + MAX_DATA_LEN;

/// Errors that can occur while building or decoding a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Identifier does not fit in 11 bits
    InvalidId,
    /// Payload exceeds 8 bytes
    PayloadTooLarge,
    /// Buffer too small for encoding
    BufferTooSmall,
    /// Register image is truncated or describes an extended/remote frame
    InvalidFrame,
}

/// A standard CAN data frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanFrame {
    /// 11-bit identifier
    pub id: u16,
    /// Payload data
    pub data: Vec<u8, MAX_DATA_LEN>,
}

impl CanFrame {
    /// Create a new frame with the given identifier and payload
    pub fn new(id: u16, data: &[u8]) -> Result<Self, FrameError> {
        if id > MAX_STANDARD_ID {
            return Err(FrameError::InvalidId);
        }

        let mut payload = Vec::new();
        payload
            .extend_from_slice(data)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self { id, data: payload })
    }

    /// Payload length (DLC)
    pub fn len(&self) -> u8 {
        self.data.len() as u8
    }

    /// Check if the frame carries no payload
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Encode this frame as a TXBn register image
    ///
    /// Always writes the full image (unused data bytes zeroed) and returns
    /// the number of bytes written.
    pub fn encode_tx_buffer(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        if buffer.len() < TX_BUFFER_LEN {
            return Err(FrameError::BufferTooSmall);
        }

        buffer[0] = (self.id >> 3) as u8;
        buffer[1] = ((self.id << 5) & 0xE0) as u8;
        buffer[2] = 0;
        buffer[3] = 0;
        buffer[4] = self.len() & 0x0F;
        buffer[5..TX_BUFFER_LEN].fill(0);
        buffer[5..5 + self.data.len()].copy_from_slice(&self.data);

        Ok(TX_BUFFER_LEN)
    }

    /// Encode this frame as a TXBn register image in a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, TX_BUFFER_LEN>, FrameError> {
        let mut buffer = [0u8; TX_BUFFER_LEN];
        let len = self.encode_tx_buffer(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }

    /// Decode a TXBn/RXBn register image back into a frame
    pub fn decode_tx_buffer(image: &[u8]) -> Result<Self, FrameError> {
        if image.len() < 5 {
            return Err(FrameError::InvalidFrame);
        }

        // EXIDE set means an extended frame
        if image[1] & 0x08 != 0 {
            return Err(FrameError::InvalidFrame);
        }

        // RTR set means a remote frame
        if image[4] & 0x40 != 0 {
            return Err(FrameError::InvalidFrame);
        }

        let len = (image[4] & 0x0F) as usize;
        if len > MAX_DATA_LEN {
            return Err(FrameError::PayloadTooLarge);
        }
        if image.len() < 5 + len {
            return Err(FrameError::InvalidFrame);
        }

        let id = ((image[0] as u16) << 3) | ((image[1] as u16) >> 5);
        Self::new(id, &image[5..5 + len])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_frame_rejects_wide_id() {
        assert_eq!(CanFrame::new(0x800, &[]), Err(FrameError::InvalidId));
        assert!(CanFrame::new(MAX_STANDARD_ID, &[]).is_ok());
    }

    #[test]
    fn test_payload_too_large() {
        let result = CanFrame::new(0x255, &[0u8; MAX_DATA_LEN + 1]);
        assert_eq!(result, Err(FrameError::PayloadTooLarge));
    }

    #[test]
    fn test_encode_wakeup_image() {
        let frame = CanFrame::new(0x632, &[0x00, 0x48, 0x50, 0, 0, 0, 0, 0]).unwrap();
        let mut buffer = [0xFFu8; TX_BUFFER_LEN];
        let len = frame.encode_tx_buffer(&mut buffer).unwrap();

        assert_eq!(len, TX_BUFFER_LEN);
        assert_eq!(buffer[0], 0xC6); // 0x632 >> 3
        assert_eq!(buffer[1], 0x40); // (0x632 << 5) & 0xE0
        assert_eq!(buffer[2], 0x00);
        assert_eq!(buffer[3], 0x00);
        assert_eq!(buffer[4], 8);
        assert_eq!(&buffer[5..8], &[0x00, 0x48, 0x50]);
    }

    #[test]
    fn test_encode_short_frame_pads_data() {
        let frame = CanFrame::new(0x260, &[0x7F, 0x32, 0x80]).unwrap();
        let image = frame.encode_to_vec().unwrap();

        assert_eq!(image[0], 0x4C);
        assert_eq!(image[1], 0x00);
        assert_eq!(image[4], 3);
        assert_eq!(&image[5..8], &[0x7F, 0x32, 0x80]);
        assert!(image[8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let frame = CanFrame::new(0x281, &[0x60]).unwrap();
        let mut buffer = [0u8; 4];
        assert_eq!(
            frame.encode_tx_buffer(&mut buffer),
            Err(FrameError::BufferTooSmall)
        );
    }

    #[test]
    fn test_decode_rejects_extended_and_remote() {
        let mut image = [0u8; TX_BUFFER_LEN];
        image[1] = 0x08;
        assert_eq!(
            CanFrame::decode_tx_buffer(&image),
            Err(FrameError::InvalidFrame)
        );

        image[1] = 0;
        image[4] = 0x40;
        assert_eq!(
            CanFrame::decode_tx_buffer(&image),
            Err(FrameError::InvalidFrame)
        );
    }

    #[test]
    fn test_decode_rejects_oversized_dlc() {
        let mut image = [0u8; TX_BUFFER_LEN];
        image[4] = 9;
        assert_eq!(
            CanFrame::decode_tx_buffer(&image),
            Err(FrameError::PayloadTooLarge)
        );
    }

    proptest! {
        #[test]
        fn prop_image_preserves_frame(
            id in 0u16..=MAX_STANDARD_ID,
            data in proptest::collection::vec(any::<u8>(), 0..=MAX_DATA_LEN),
        ) {
            let frame = CanFrame::new(id, &data).unwrap();
            let image = frame.encode_to_vec().unwrap();
            prop_assert_eq!(CanFrame::decode_tx_buffer(&image).unwrap(), frame);
        }
    }
}
