//! ATR (Answer To Reset) interpretation and card classification
//!
//! The ATR is the byte sequence a card emits on power-up. Contactless
//! reader firmware encodes the detected card technology into it, which is
//! what the classification rules below key on.

use std::fmt;

/// Card technologies recognized from the ATR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardType {
    /// Mifare Classic with 1 KB of EEPROM
    MifareClassic1K,
    /// Mifare Classic with 4 KB of EEPROM
    MifareClassic4K,
    /// Mifare Ultralight
    MifareUltralight,
    /// Mifare DESFire
    MifareDesfire,
    /// Generic ISO 14443 Type A card
    Iso14443TypeA,
    /// Generic ISO 14443 Type B card
    Iso14443TypeB,
    /// Unrecognized but non-empty ATR
    SmartCard,
    /// Empty ATR, nothing to classify
    Unknown,
}

impl CardType {
    /// Human-readable label for the card type
    pub const fn label(&self) -> &'static str {
        match self {
            Self::MifareClassic1K => "Mifare Classic 1K",
            Self::MifareClassic4K => "Mifare Classic 4K",
            Self::MifareUltralight => "Mifare Ultralight",
            Self::MifareDesfire => "Mifare DESFire",
            Self::Iso14443TypeA => "ISO 14443 Type A",
            Self::Iso14443TypeB => "ISO 14443 Type B",
            Self::SmartCard => "Smart Card",
            Self::Unknown => "Unknown",
        }
    }

    /// Nominal storage capacity for the card type
    pub const fn capacity(&self) -> &'static str {
        match self {
            Self::MifareClassic1K => "1KB",
            Self::MifareClassic4K => "4KB",
            Self::MifareUltralight => "512 bytes",
            Self::MifareDesfire => "2KB-8KB",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Answer To Reset captured from a power-on response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atr {
    bytes: Vec<u8>,
}

impl Atr {
    /// Create an ATR from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Raw ATR bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether the ATR is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Upper-case hex rendering of the ATR
    pub fn to_hex(&self) -> String {
        hex::encode_upper(&self.bytes)
    }

    /// Classify the card technology from the ATR
    ///
    /// Ordered rules, first match wins: known Mifare markers in the hex
    /// form, then the initial character (0x3B direct / 0x3F inverse
    /// convention) for the generic ISO 14443 types. Total over all
    /// inputs; an empty ATR classifies as [`CardType::Unknown`].
    pub fn card_type(&self) -> CardType {
        if self.bytes.is_empty() {
            return CardType::Unknown;
        }

        let hex = self.to_hex();
        if hex.contains("3B8F80") {
            CardType::MifareClassic1K
        } else if hex.contains("3B8B80") {
            CardType::MifareClassic4K
        } else if hex.contains("3B8980") {
            CardType::MifareUltralight
        } else if hex.contains("3B8A80") {
            CardType::MifareDesfire
        } else if self.bytes[0] == 0x3B {
            CardType::Iso14443TypeA
        } else if self.bytes[0] == 0x3F {
            CardType::Iso14443TypeB
        } else {
            CardType::SmartCard
        }
    }

    /// Derive a stand-in UID from the leading ATR bytes
    ///
    /// Used when the Get Data (UID) command fails. This truncation is a
    /// compatibility heuristic with no backing in the CCID or ISO 14443
    /// specifications; the result identifies the card session, not the
    /// card, and must not be treated as a reliable UID.
    pub fn derived_uid(&self) -> Vec<u8> {
        if self.bytes.len() >= 4 {
            self.bytes[..self.bytes.len().min(7)].to_vec()
        } else {
            self.bytes.clone()
        }
    }
}

impl fmt::Display for Atr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mifare_markers() {
        let cases: &[(&[u8], CardType)] = &[
            (&[0x3B, 0x8F, 0x80, 0x01], CardType::MifareClassic1K),
            (&[0x3B, 0x8B, 0x80, 0x01], CardType::MifareClassic4K),
            (&[0x3B, 0x89, 0x80, 0x01], CardType::MifareUltralight),
            (&[0x3B, 0x8A, 0x80, 0x01], CardType::MifareDesfire),
        ];
        for (bytes, expected) in cases {
            assert_eq!(Atr::from_bytes(bytes).card_type(), *expected);
        }
    }

    #[test]
    fn test_initial_character_fallback() {
        assert_eq!(
            Atr::from_bytes(&[0x3B, 0x00]).card_type(),
            CardType::Iso14443TypeA
        );
        assert_eq!(
            Atr::from_bytes(&[0x3F, 0x12, 0x34]).card_type(),
            CardType::Iso14443TypeB
        );
    }

    #[test]
    fn test_classification_is_total() {
        assert_eq!(Atr::from_bytes(&[]).card_type(), CardType::Unknown);
        assert_eq!(Atr::from_bytes(&[0x00]).card_type(), CardType::SmartCard);
        assert_eq!(
            Atr::from_bytes(&[0xFF, 0xFF, 0xFF]).card_type(),
            CardType::SmartCard
        );
    }

    #[test]
    fn test_capacity_table() {
        assert_eq!(CardType::MifareClassic1K.capacity(), "1KB");
        assert_eq!(CardType::MifareClassic4K.capacity(), "4KB");
        assert_eq!(CardType::MifareUltralight.capacity(), "512 bytes");
        assert_eq!(CardType::MifareDesfire.capacity(), "2KB-8KB");
        assert_eq!(CardType::Iso14443TypeA.capacity(), "Unknown");
        assert_eq!(CardType::SmartCard.capacity(), "Unknown");
        assert_eq!(CardType::Unknown.capacity(), "Unknown");
    }

    #[test]
    fn test_derived_uid_truncation() {
        // Long ATR: first seven bytes
        let atr = Atr::from_bytes(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(atr.derived_uid(), vec![1, 2, 3, 4, 5, 6, 7]);

        // Four bytes is the threshold for truncation
        let atr = Atr::from_bytes(&[1, 2, 3, 4]);
        assert_eq!(atr.derived_uid(), vec![1, 2, 3, 4]);

        // Shorter ATRs are passed through whole
        let atr = Atr::from_bytes(&[1, 2, 3]);
        assert_eq!(atr.derived_uid(), vec![1, 2, 3]);
    }
}
