//! Error types for the USB transport layer

use thiserror::Error;

/// Result type for USB transport operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for USB transport operations
#[derive(Debug, Error)]
pub enum Error {
    /// Error reported by the underlying USB stack
    #[error("USB error: {0}")]
    Usb(#[from] rusb::Error),

    /// No device with the requested identifier is attached
    #[error("Device {0} not found")]
    DeviceNotFound(u32),

    /// The device exposes no claimable interface
    #[error("Device has no claimable interface")]
    NoInterface,

    /// The claimed interface lacks a bulk IN/OUT endpoint pair
    #[error("Missing bulk endpoints on claimed interface")]
    MissingEndpoints,

    /// Bulk write transferred fewer bytes than the command frame
    #[error("Incomplete bulk write: {sent}/{expected} bytes")]
    IncompleteWrite {
        /// Bytes actually transferred
        sent: usize,
        /// Length of the command frame
        expected: usize,
    },

    /// Hotplug callbacks are not available on this platform
    #[error("USB hotplug is not supported on this platform")]
    HotplugUnsupported,
}

impl From<Error> for cardlink_ccid::Error {
    fn from(err: Error) -> Self {
        Self::Transport(err.to_string())
    }
}
