//! Outbound CCID command frame construction
//!
//! Every command sent to a reader is a fixed 10-byte header followed by an
//! optional payload:
//!
//! ```text
//! Offset  Size  Description
//! 0       1     bMessageType
//! 1       4     dwLength (little-endian payload length)
//! 5       1     bSlot
//! 6       1     bSeq
//! 7       3     message-specific control bytes
//! 10      N     payload
//! ```

use bytes::{BufMut, Bytes, BytesMut};

/// Size of the fixed CCID message header in bytes
pub const HEADER_SIZE: usize = 10;

/// CCID message types
pub mod message_type {
    /// PC to Reader: ICC power on
    pub const ICC_POWER_ON: u8 = 0x62;
    /// PC to Reader: transfer block (send APDU)
    pub const XFR_BLOCK: u8 = 0x6F;
    /// Reader to PC: data block (response to power on / transfer)
    pub const DATA_BLOCK: u8 = 0x80;
}

/// ISO 14443-3 Get Data APDU requesting the card UID (`FF CA 00 00 00`)
pub const GET_UID_APDU: [u8; 5] = [0xFF, 0xCA, 0x00, 0x00, 0x00];

/// bPowerSelect value activating the card at 5 V
const POWER_SELECT_5V: u8 = 0x01;

/// An outbound CCID command frame
///
/// The `dwLength` field always equals the payload length by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFrame {
    message_type: u8,
    slot: u8,
    sequence: u8,
    /// The three message-specific bytes at offsets 7..10
    control: [u8; 3],
    payload: Bytes,
}

impl CommandFrame {
    /// Create a frame with the given header fields and payload
    pub fn new<T: Into<Bytes>>(
        message_type: u8,
        slot: u8,
        sequence: u8,
        control: [u8; 3],
        payload: T,
    ) -> Self {
        Self {
            message_type,
            slot,
            sequence,
            control,
            payload: payload.into(),
        }
    }

    /// `PC_to_RDR_IccPowerOn`: activate the card at 5 V, slot 0
    pub fn icc_power_on() -> Self {
        Self::new(
            message_type::ICC_POWER_ON,
            0,
            0,
            [POWER_SELECT_5V, 0x00, 0x00],
            Bytes::new(),
        )
    }

    /// `PC_to_RDR_XfrBlock`: wrap an APDU for transmission to the card
    ///
    /// bBWI and wLevelParameter are zero; the reader uses its default
    /// block waiting time and the APDU fits in a single block.
    pub fn xfr_block<T: Into<Bytes>>(apdu: T) -> Self {
        Self::new(message_type::XFR_BLOCK, 0, 1, [0x00, 0x00, 0x00], apdu)
    }

    /// The Get Data (UID) command used for contactless cards
    pub fn get_uid() -> Self {
        Self::xfr_block(Bytes::from_static(&GET_UID_APDU))
    }

    /// Message type byte
    pub const fn message_type(&self) -> u8 {
        self.message_type
    }

    /// Slot index
    pub const fn slot(&self) -> u8 {
        self.slot
    }

    /// Sequence number
    pub const fn sequence(&self) -> u8 {
        self.sequence
    }

    /// Command payload
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Serialize the frame: header plus payload
    pub fn to_bytes(&self) -> Bytes {
        let mut buffer = BytesMut::with_capacity(HEADER_SIZE + self.payload.len());

        buffer.put_u8(self.message_type);
        buffer.put_u32_le(self.payload.len() as u32);
        buffer.put_u8(self.slot);
        buffer.put_u8(self.sequence);
        buffer.put_slice(&self.control);
        buffer.put_slice(&self.payload);

        buffer.freeze()
    }
}
