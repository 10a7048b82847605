//! Card reader classification heuristics
//!
//! Real-world readers are inconsistent about advertising themselves: some
//! carry the smart-card class at the device level, some only on an
//! interface, and vendor-specific firmware often carries neither. The
//! classifier is an ordered list of tagged rules evaluated against a
//! [`DeviceProfile`]; the first rule that fires decides, and later rules
//! are never consulted.

use tracing::debug;

use crate::device::{DeviceProfile, ReaderDevice};

/// USB class code for smart-card (CCID) devices
pub const USB_CLASS_SMART_CARD: u8 = 11;

/// Vendor ids of manufacturers known to ship card readers
///
/// A heuristic hint only, never authoritative: plenty of these vendors
/// also ship devices that are not readers.
pub const KNOWN_READER_VENDORS: &[u16] = &[
    0x072f, // Advanced Card Systems (ACS)
    0x04e6, // SCM Microsystems
    0x0b97, // O2 Micro
    0x076b, // OmniKey (HID Global)
    0x08e6, // Gemalto (Thales)
    0x0403, // FTDI (serial-bridge readers)
    0x1a86, // QinHeng
    0x0483, // STMicroelectronics
    0x1fc9, // NXP Semiconductors
];

/// Product-name fragments that suggest a card reader
const PRODUCT_KEYWORDS: &[&str] = &[
    "card",
    "reader",
    "rfid",
    "nfc",
    "smartcard",
    "ccid",
    "mifare",
];

/// Which classification rule identified a device as a candidate reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Device-level class code is the smart-card class
    DeviceClass,
    /// An interface declares the smart-card class
    InterfaceClass,
    /// Vendor id appears in the known-vendor allow-list
    KnownVendor,
    /// Product name contains a reader-related keyword
    ProductKeyword,
}

/// Classify a device, reporting the rule that matched
///
/// Rules are evaluated in fixed order with short-circuiting; `None` means
/// the device is not a candidate reader.
pub fn classify(profile: &DeviceProfile) -> Option<MatchRule> {
    let rule = if profile.device_class == USB_CLASS_SMART_CARD {
        MatchRule::DeviceClass
    } else if profile
        .interface_classes
        .iter()
        .any(|&class| class == USB_CLASS_SMART_CARD)
    {
        MatchRule::InterfaceClass
    } else if KNOWN_READER_VENDORS.contains(&profile.vendor_id) {
        MatchRule::KnownVendor
    } else {
        let product = profile.product_lowercase();
        if PRODUCT_KEYWORDS.iter().any(|kw| product.contains(kw)) {
            MatchRule::ProductKeyword
        } else {
            return None;
        }
    };

    debug!(
        device = %profile.name,
        vendor = %format_args!("{:04x}", profile.vendor_id),
        ?rule,
        "Device classified as card reader"
    );
    Some(rule)
}

/// Whether a device is a candidate card reader
pub fn is_candidate(profile: &DeviceProfile) -> bool {
    classify(profile).is_some()
}

/// Build the reader description for a classified device
///
/// Model and specification strings come from a vendor lookup with a
/// generic fallback for vendors outside the table. Absent string
/// descriptors become the literal `"Unknown"`.
pub fn describe(profile: &DeviceProfile, has_permission: bool) -> ReaderDevice {
    let product = profile
        .product
        .clone()
        .unwrap_or_else(|| "Unknown".to_string());
    let manufacturer = profile
        .manufacturer
        .clone()
        .unwrap_or_else(|| "Unknown".to_string());

    let (model, specifications) = match profile.vendor_id {
        0x072f => (
            format!("ACS {product}"),
            "ISO 14443 Type A/B, Mifare".to_string(),
        ),
        0x04e6 => (
            format!("SCM {product}"),
            "ISO 14443, ISO 7816".to_string(),
        ),
        0x076b => (
            format!("OmniKey {product}"),
            "ISO 14443, Mifare, DESFire".to_string(),
        ),
        _ => (product.clone(), "Smart Card Reader".to_string()),
    };

    ReaderDevice {
        device_id: profile.device_id,
        name: profile.name.clone(),
        manufacturer,
        product,
        vendor_id: profile.vendor_id,
        product_id: profile.product_id,
        serial: profile.serial.clone(),
        model,
        specifications,
        has_permission,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> DeviceProfile {
        DeviceProfile {
            device_id: 1,
            name: "Bus 001 Device 002".to_string(),
            device_class: 0,
            interface_classes: vec![],
            vendor_id: 0x1234,
            product_id: 0x5678,
            manufacturer: None,
            product: None,
            serial: None,
        }
    }

    #[test]
    fn test_device_class_wins_regardless_of_other_fields() {
        let p = DeviceProfile {
            device_class: USB_CLASS_SMART_CARD,
            vendor_id: 0xdead,
            product: Some("Widget".to_string()),
            ..profile()
        };
        assert_eq!(classify(&p), Some(MatchRule::DeviceClass));
    }

    #[test]
    fn test_interface_class_match() {
        let p = DeviceProfile {
            interface_classes: vec![3, USB_CLASS_SMART_CARD],
            ..profile()
        };
        assert_eq!(classify(&p), Some(MatchRule::InterfaceClass));
    }

    #[test]
    fn test_known_vendor_match() {
        let p = DeviceProfile {
            vendor_id: 0x08e6,
            ..profile()
        };
        assert_eq!(classify(&p), Some(MatchRule::KnownVendor));
    }

    #[test]
    fn test_product_keyword_any_case() {
        let p = DeviceProfile {
            product: Some("ACME NFC Thing".to_string()),
            ..profile()
        };
        assert_eq!(classify(&p), Some(MatchRule::ProductKeyword));

        let p = DeviceProfile {
            product: Some("MIFARE terminal".to_string()),
            ..profile()
        };
        assert_eq!(classify(&p), Some(MatchRule::ProductKeyword));
    }

    #[test]
    fn test_unrelated_device_excluded() {
        let p = DeviceProfile {
            product: Some("USB Keyboard".to_string()),
            manufacturer: Some("Vendor".to_string()),
            ..profile()
        };
        assert_eq!(classify(&p), None);
        assert!(!is_candidate(&p));
    }

    #[test]
    fn test_describe_acs_vendor_table() {
        let p = DeviceProfile {
            device_class: USB_CLASS_SMART_CARD,
            vendor_id: 0x072f,
            product: Some("ACS Reader".to_string()),
            manufacturer: Some("ACS".to_string()),
            ..profile()
        };
        let reader = describe(&p, true);
        assert_eq!(reader.model, "ACS ACS Reader");
        assert_eq!(reader.specifications, "ISO 14443 Type A/B, Mifare");
        assert!(reader.has_permission);
    }

    #[test]
    fn test_describe_generic_fallback_and_unknown_strings() {
        let p = profile();
        let reader = describe(&p, false);
        assert_eq!(reader.product, "Unknown");
        assert_eq!(reader.manufacturer, "Unknown");
        assert_eq!(reader.model, "Unknown");
        assert_eq!(reader.specifications, "Smart Card Reader");
        assert!(!reader.has_permission);
    }
}
