//! USB transport layer for CCID card readers
//!
//! Talks to readers directly over USB bulk endpoints with `rusb`, without
//! any smart-card middleware in between. Provides:
//!
//! - Device classification: layered heuristics deciding whether an
//!   arbitrary USB device is a candidate card reader
//! - [`ReaderDevice`] descriptions with inferred model/specification data
//! - [`UsbBulkTransport`], the blocking bulk write/read exchange behind
//!   the `cardlink-ccid` transport trait
//! - Hotplug monitoring with attach/detach events filtered to
//!   classifier-positive devices

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

pub mod classifier;
pub mod config;
pub mod device;
pub mod error;
pub mod event;
pub mod manager;
pub mod monitor;
pub mod transport;

pub use classifier::{MatchRule, classify, describe, is_candidate};
pub use config::UsbConfig;
pub use device::{DeviceProfile, ReaderDevice};
pub use error::{Error, Result};
pub use event::{PermissionEvent, ReaderEvent};
pub use manager::UsbDeviceManager;
pub use monitor::UsbMonitor;
pub use transport::UsbBulkTransport;
