//! Inbound CCID response frame parsing
//!
//! Responses share the command frame shape: a 10-byte header with a
//! little-endian `dwLength` at offset 1 and the slot status byte at
//! offset 7, followed by `dwLength` payload bytes.

use bytes::Bytes;
use tracing::warn;

use crate::command::HEADER_SIZE;
use crate::error::Error;

/// Status byte value meaning the command succeeded and the card is active
pub const STATUS_OK: u8 = 0x00;

/// A decoded CCID response frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFrame {
    message_type: u8,
    status: u8,
    payload: Bytes,
}

impl ResponseFrame {
    /// Parse a response from the raw bytes returned by the transport
    ///
    /// Fails on any buffer shorter than the 10-byte header. A declared
    /// payload length that runs past the end of the buffer is treated as
    /// an empty payload; the parser never reads out of bounds.
    pub fn parse(data: &[u8]) -> Result<Self, Error> {
        if data.len() < HEADER_SIZE {
            return Err(Error::ResponseTooShort(data.len()));
        }

        let declared = u32::from_le_bytes([data[1], data[2], data[3], data[4]]) as usize;
        let status = data[7];

        // len >= HEADER_SIZE was checked above, so the subtraction holds
        let payload = if declared == 0 || data.len() - HEADER_SIZE < declared {
            if declared != 0 {
                warn!(
                    declared,
                    available = data.len() - HEADER_SIZE,
                    "Declared payload length exceeds received buffer"
                );
            }
            Bytes::new()
        } else {
            Bytes::copy_from_slice(&data[HEADER_SIZE..HEADER_SIZE + declared])
        };

        Ok(Self {
            message_type: data[0],
            status,
            payload,
        })
    }

    /// Message type byte
    pub const fn message_type(&self) -> u8 {
        self.message_type
    }

    /// Slot status byte (offset 7 of the header)
    pub const fn status(&self) -> u8 {
        self.status
    }

    /// Whether the status byte indicates success
    pub const fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }

    /// The payload bytes following the header
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Consume the frame, returning its payload
    pub fn into_payload(self) -> Bytes {
        self.payload
    }

    /// The payload with the trailing SW1/SW2 status words stripped
    ///
    /// APDU responses carry two status-word bytes after the data; when the
    /// payload is too short to contain them the full payload is returned.
    pub fn data_without_status_words(&self) -> &[u8] {
        if self.payload.len() > 2 {
            &self.payload[..self.payload.len() - 2]
        } else {
            &self.payload
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(declared_len: u32, status: u8) -> Vec<u8> {
        let mut buf = vec![0x80, 0, 0, 0, 0, 0x00, 0x00, status, 0x00, 0x00];
        buf[1..5].copy_from_slice(&declared_len.to_le_bytes());
        buf
    }

    #[test]
    fn test_short_buffer_is_invalid() {
        for len in 0..HEADER_SIZE {
            let buf = vec![0u8; len];
            assert!(matches!(
                ResponseFrame::parse(&buf),
                Err(Error::ResponseTooShort(n)) if n == len
            ));
        }
    }

    #[test]
    fn test_payload_extraction() {
        let mut buf = header(4, STATUS_OK);
        buf.extend_from_slice(&[0x3B, 0x8F, 0x80, 0x01]);
        let frame = ResponseFrame::parse(&buf).unwrap();
        assert!(frame.is_success());
        assert_eq!(frame.payload(), &[0x3B, 0x8F, 0x80, 0x01]);
    }

    #[test]
    fn test_overlong_declared_length_yields_empty_payload() {
        let mut buf = header(64, STATUS_OK);
        buf.extend_from_slice(&[0x01, 0x02]); // only 2 bytes actually present
        let frame = ResponseFrame::parse(&buf).unwrap();
        assert!(frame.payload().is_empty());
    }

    #[test]
    fn test_maximal_declared_length_yields_empty_payload() {
        let mut buf = header(u32::MAX, STATUS_OK);
        buf.extend_from_slice(&[0x01, 0x02]);
        let frame = ResponseFrame::parse(&buf).unwrap();
        assert!(frame.payload().is_empty());
    }

    #[test]
    fn test_declared_length_clamped_to_exact_buffer() {
        let mut buf = header(3, 0x42);
        buf.extend_from_slice(&[0xAA, 0xBB, 0xCC]);
        let frame = ResponseFrame::parse(&buf).unwrap();
        assert!(!frame.is_success());
        assert_eq!(frame.status(), 0x42);
        assert_eq!(frame.payload(), &[0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn test_status_word_stripping() {
        let mut buf = header(6, STATUS_OK);
        buf.extend_from_slice(&[0x04, 0xA1, 0xB2, 0xC3, 0x90, 0x00]);
        let frame = ResponseFrame::parse(&buf).unwrap();
        assert_eq!(frame.data_without_status_words(), &[0x04, 0xA1, 0xB2, 0xC3]);

        // A payload of exactly two bytes is returned whole
        let mut buf = header(2, STATUS_OK);
        buf.extend_from_slice(&[0x90, 0x00]);
        let frame = ResponseFrame::parse(&buf).unwrap();
        assert_eq!(frame.data_without_status_words(), &[0x90, 0x00]);
    }
}
