//! Event types and handling for reader attachment and permissions

pub mod channel;
pub use channel::*;

pub mod handler;
pub use handler::*;

use crate::device::ReaderDevice;

/// Events for reader devices appearing and disappearing
///
/// Only classifier-positive devices produce these events; unrelated USB
/// traffic is filtered at the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderEvent {
    /// A candidate card reader was attached
    Attached(ReaderDevice),
    /// A candidate card reader was detached
    Detached(ReaderDevice),
}

impl ReaderEvent {
    /// The device the event concerns
    pub const fn device(&self) -> &ReaderDevice {
        match self {
            Self::Attached(device) | Self::Detached(device) => device,
        }
    }
}

/// Resolution of an asynchronous permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionEvent {
    /// Access to the device was granted
    Granted {
        /// Identifier of the device the grant applies to
        device_id: u32,
    },
    /// Access to the device was denied
    Denied {
        /// Identifier of the device the denial applies to
        device_id: u32,
    },
}
