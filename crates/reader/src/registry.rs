//! Seams to the host's device registry and permission gate
//!
//! The service core talks to the host operating system only through these
//! traits. [`UsbRegistry`] backs them with libusb for desktop hosts;
//! tests substitute in-memory doubles.

use std::sync::Arc;

use tracing::debug;

use cardlink_ccid::CcidTransport;
use cardlink_transport_usb::event::{
    PermissionEventReceiver, PermissionEventSender, ReaderEventReceiver, permission_event_channel,
    reader_event_channel,
};
use cardlink_transport_usb::{
    DeviceProfile, PermissionEvent, UsbConfig, UsbDeviceManager, UsbMonitor,
};

use crate::error::{Result, ServiceError};

/// Supplies the device list and opens connections
///
/// Implementations must be callable from both the caller's thread (scan)
/// and the read worker (open), hence `Send + Sync`.
pub trait DeviceRegistry: Send + Sync {
    /// Snapshot of every attached device, unfiltered
    fn devices(&self) -> Vec<DeviceProfile>;

    /// Open a CCID transport to the device
    ///
    /// The returned transport owns the connection; dropping it releases
    /// the device.
    fn open(&self, device_id: u32) -> Result<Box<dyn CcidTransport + Send>>;

    /// Drop any idle connection state held for the device
    ///
    /// Called when the device detaches. An in-flight bulk transfer cannot
    /// be interrupted; it fails on its own and the worker's transport is
    /// released by ownership when the transaction unwinds.
    fn release(&self, device_id: u32);

    /// Subscribe to attach/detach events, filtered to candidate readers
    fn subscribe(&self) -> ReaderEventReceiver;
}

/// Queries and requests device access permission
pub trait PermissionGate: Send + Sync {
    /// Whether the host currently grants access to the device
    fn has_permission(&self, device_id: u32) -> bool;

    /// Issue the asynchronous permission prompt
    ///
    /// Resolution arrives later as a [`PermissionEvent`]; callers must not
    /// assume it resolves synchronously.
    fn request(&self, device_id: u32) -> Result<()>;

    /// Subscribe to permission grant/deny events
    fn subscribe_permissions(&self) -> PermissionEventReceiver;
}

/// libusb-backed registry and permission gate for desktop hosts
///
/// Desktop platforms have no interactive permission prompt; access is
/// governed by udev rules or equivalent. `has_permission` probes with an
/// open attempt and `request` resolves immediately with the probe result,
/// delivered through the event channel to honor the asynchronous
/// contract.
pub struct UsbRegistry {
    manager: Arc<UsbDeviceManager>,
    config: UsbConfig,
    reader_rx: ReaderEventReceiver,
    _monitor: Option<UsbMonitor>,
    permission_tx: PermissionEventSender,
    permission_rx: PermissionEventReceiver,
}

impl std::fmt::Debug for UsbRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsbRegistry").finish_non_exhaustive()
    }
}

impl UsbRegistry {
    /// Create a registry with the given transport configuration
    ///
    /// Hotplug monitoring starts here when the platform supports it;
    /// otherwise the event stream simply stays silent.
    pub fn new(config: UsbConfig) -> Result<Self> {
        let manager = UsbDeviceManager::new()
            .map_err(|e| ServiceError::Read(format!("USB context unavailable: {e}")))?;

        let (reader_tx, reader_rx) = reader_event_channel();
        let monitor = match UsbMonitor::create(reader_tx) {
            Ok(monitor) => Some(monitor),
            Err(err) => {
                debug!(error = %err, "Hotplug monitoring unavailable");
                None
            }
        };

        let (permission_tx, permission_rx) = permission_event_channel();
        Ok(Self {
            manager: Arc::new(manager),
            config,
            reader_rx,
            _monitor: monitor,
            permission_tx,
            permission_rx,
        })
    }
}

impl DeviceRegistry for UsbRegistry {
    fn devices(&self) -> Vec<DeviceProfile> {
        self.manager.list_devices().unwrap_or_default()
    }

    fn open(&self, device_id: u32) -> Result<Box<dyn CcidTransport + Send>> {
        let transport = self
            .manager
            .open_device(device_id, self.config.clone())
            .map_err(|e| ServiceError::Read(format!("Failed to open device {device_id}: {e}")))?;
        Ok(Box::new(transport))
    }

    fn release(&self, device_id: u32) {
        // Connections are owned per transaction; nothing is cached here.
        debug!(device_id, "Release requested for detached device");
    }

    fn subscribe(&self) -> ReaderEventReceiver {
        // Cloned receivers compete for messages; the service is the single
        // consumer and fans out to its own subscribers.
        self.reader_rx.clone()
    }
}

impl PermissionGate for UsbRegistry {
    fn has_permission(&self, device_id: u32) -> bool {
        self.manager.can_open(device_id)
    }

    fn request(&self, device_id: u32) -> Result<()> {
        let event = if self.manager.can_open(device_id) {
            PermissionEvent::Granted { device_id }
        } else {
            PermissionEvent::Denied { device_id }
        };
        self.permission_tx
            .send(event)
            .map_err(|e| ServiceError::Permission(e.to_string()))
    }

    fn subscribe_permissions(&self) -> PermissionEventReceiver {
        self.permission_rx.clone()
    }
}
