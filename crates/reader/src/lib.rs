//! Card reader service for USB CCID devices
//!
//! The caller-facing layer of the cardlink stack. It ties the protocol
//! engine (`cardlink-ccid`) and the USB transport
//! (`cardlink-transport-usb`) together behind three operations:
//!
//! - [`ReaderService::scan`] — list attached devices that classify as
//!   card readers
//! - [`ReaderService::request_permission`] — negotiate device access,
//!   with asynchronous grant/deny resolution
//! - [`ReaderService::read_card`] — run one serialized read transaction
//!   and return the classified card identity
//!
//! Reads execute on a single dedicated worker thread, so at most one
//! transaction touches a reader at a time. Attach/detach and permission
//! notifications are delivered out-of-band over channels.
//!
//! ```no_run
//! use cardlink_reader::{ReaderService, UsbConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = ReaderService::new(UsbConfig::default())?;
//! for reader in service.scan() {
//!     println!("{} ({})", reader.model, reader.specifications);
//! }
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod outcome;
pub mod registry;
pub mod service;
mod worker;

pub use error::{Result, ServiceError};
pub use outcome::{NO_CARD, ReadOutcome};
pub use registry::{DeviceRegistry, PermissionGate, UsbRegistry};
pub use service::ReaderService;

// Re-export the types callers see in the service surface
pub use cardlink_ccid::{Atr, CardIdentity, CardType, CcidTransport};
pub use cardlink_transport_usb::{
    DeviceProfile, PermissionEvent, ReaderDevice, ReaderEvent, UsbConfig,
};
