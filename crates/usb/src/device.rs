//! Device descriptor snapshots and reader descriptions

/// Raw descriptor snapshot of an attached USB device
///
/// This is everything the classifier needs, captured once at enumeration
/// time. A rescan produces a fresh set of profiles; profiles are never
/// updated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProfile {
    /// Stable identifier for the attachment (bus number and address)
    pub device_id: u32,
    /// System-level device name, e.g. `Bus 001 Device 004`
    pub name: String,
    /// Device-level USB class code
    pub device_class: u8,
    /// Class codes of every declared interface
    pub interface_classes: Vec<u8>,
    /// USB vendor identifier
    pub vendor_id: u16,
    /// USB product identifier
    pub product_id: u16,
    /// Manufacturer string descriptor, when readable
    pub manufacturer: Option<String>,
    /// Product string descriptor, when readable
    pub product: Option<String>,
    /// Serial number string descriptor, when readable
    pub serial: Option<String>,
}

impl DeviceProfile {
    /// Product name lower-cased for keyword matching, empty when absent
    pub(crate) fn product_lowercase(&self) -> String {
        self.product
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default()
    }
}

/// Identity record for a candidate card reader
///
/// Immutable snapshot built by [`describe`](crate::classifier::describe);
/// not updated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderDevice {
    /// Stable identifier for the attachment
    pub device_id: u32,
    /// System-level device name
    pub name: String,
    /// Manufacturer string, `"Unknown"` when the descriptor is absent
    pub manufacturer: String,
    /// Product string, `"Unknown"` when the descriptor is absent
    pub product: String,
    /// USB vendor identifier
    pub vendor_id: u16,
    /// USB product identifier
    pub product_id: u16,
    /// Serial number, when readable
    pub serial: Option<String>,
    /// Model string inferred from the vendor table
    pub model: String,
    /// Specification summary inferred from the vendor table
    pub specifications: String,
    /// Whether the host currently grants access to this device
    pub has_permission: bool,
}
