//! Error types for the reader service

use thiserror::Error;

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors surfaced to the caller of the reader service
///
/// Transport and protocol failures inside a running transaction do not
/// appear here; they degrade to a no-card outcome instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// A required argument was missing or malformed
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// No attached device carries the given identifier
    #[error("Device not found: {0}")]
    DeviceNotFound(u32),

    /// The host has not granted access to the device
    #[error("No permission for device {0}")]
    NoPermission(u32),

    /// Issuing the permission request itself failed
    #[error("Permission request failed: {0}")]
    Permission(String),

    /// The device could not be opened before any exchange took place
    #[error("Card read failed: {0}")]
    Read(String),

    /// The read worker has shut down
    #[error("Read worker is no longer running")]
    WorkerGone,
}
