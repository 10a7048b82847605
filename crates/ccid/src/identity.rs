//! The result of a successful card read transaction

use chrono::{DateTime, Utc};

use crate::atr::{Atr, CardType};

/// Identity data captured from a card during one read transaction
///
/// Constructed once per transaction and handed to the caller by value;
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardIdentity {
    uid: Vec<u8>,
    card_type: CardType,
    atr_hex: String,
    valid: bool,
    timestamp: DateTime<Utc>,
}

impl CardIdentity {
    /// Assemble an identity from the transaction's captured data
    pub fn new(uid: Vec<u8>, card_type: CardType, atr: &Atr) -> Self {
        Self {
            uid,
            card_type,
            atr_hex: atr.to_hex(),
            valid: true,
            timestamp: Utc::now(),
        }
    }

    /// Raw UID bytes; empty means the UID is unknown
    pub fn uid(&self) -> &[u8] {
        &self.uid
    }

    /// Colon-delimited upper-hex UID, or `"Unknown"` when empty
    pub fn uid_string(&self) -> String {
        if self.uid.is_empty() {
            return "Unknown".to_string();
        }
        self.uid
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(":")
    }

    /// Classified card type
    pub const fn card_type(&self) -> CardType {
        self.card_type
    }

    /// Human-readable card type label
    pub const fn type_label(&self) -> &'static str {
        self.card_type.label()
    }

    /// Nominal storage capacity label
    pub const fn capacity(&self) -> &'static str {
        self.card_type.capacity()
    }

    /// Upper-hex ATR captured at power-on
    pub fn atr_hex(&self) -> &str {
        &self.atr_hex
    }

    /// Whether the read produced a valid identity
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Capture timestamp
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uid_formatting() {
        let atr = Atr::from_bytes(&[0x3B, 0x8F, 0x80, 0x01]);
        let identity = CardIdentity::new(vec![0x04, 0xA1, 0xB2, 0xC3], CardType::MifareClassic1K, &atr);
        assert_eq!(identity.uid_string(), "04:A1:B2:C3");
        assert_eq!(identity.atr_hex(), "3B8F8001");
        assert!(identity.is_valid());
    }

    #[test]
    fn test_empty_uid_is_unknown() {
        let atr = Atr::from_bytes(&[0x3B]);
        let identity = CardIdentity::new(Vec::new(), CardType::Iso14443TypeA, &atr);
        assert_eq!(identity.uid_string(), "Unknown");
    }
}
