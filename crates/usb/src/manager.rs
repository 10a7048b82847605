//! USB device enumeration and connection management

use std::time::Duration;

use rusb::{Context, Device, UsbContext};
use tracing::{debug, trace};

use crate::config::UsbConfig;
use crate::device::DeviceProfile;
use crate::error::{Error, Result};
use crate::transport::UsbBulkTransport;

/// Timeout for reading string descriptors during enumeration
const STRING_TIMEOUT: Duration = Duration::from_millis(500);

/// Enumerates USB devices and opens bulk transports to them
#[derive(Debug)]
pub struct UsbDeviceManager {
    context: Context,
}

impl UsbDeviceManager {
    /// Create a manager with a fresh USB context
    pub fn new() -> Result<Self> {
        Ok(Self {
            context: Context::new()?,
        })
    }

    /// Snapshot every attached device as a [`DeviceProfile`]
    ///
    /// Devices whose descriptors cannot be read are skipped. String
    /// descriptors require opening the device and may be absent when the
    /// host denies access; the profile then carries `None` for them.
    pub fn list_devices(&self) -> Result<Vec<DeviceProfile>> {
        let devices = self.context.devices()?;
        let mut profiles = Vec::new();

        for device in devices.iter() {
            match profile_for(&device) {
                Some(profile) => profiles.push(profile),
                None => trace!(
                    bus = device.bus_number(),
                    address = device.address(),
                    "Skipping device with unreadable descriptors"
                ),
            }
        }

        debug!(count = profiles.len(), "Enumerated USB devices");
        Ok(profiles)
    }

    /// Open a bulk transport to the device with the given identifier
    pub fn open_device(&self, device_id: u32, config: UsbConfig) -> Result<UsbBulkTransport> {
        let devices = self.context.devices()?;
        let device = devices
            .iter()
            .find(|d| id_for(d) == device_id)
            .ok_or(Error::DeviceNotFound(device_id))?;
        UsbBulkTransport::open(&device, config)
    }

    /// Whether the host currently allows opening the device
    ///
    /// There is no separate permission query in libusb; an open attempt is
    /// the probe. The handle is dropped immediately.
    pub fn can_open(&self, device_id: u32) -> bool {
        let Ok(devices) = self.context.devices() else {
            return false;
        };
        devices
            .iter()
            .find(|d| id_for(d) == device_id)
            .is_some_and(|d| d.open().is_ok())
    }
}

/// Stable identifier for a device attachment: bus number and address
pub(crate) fn id_for<T: UsbContext>(device: &Device<T>) -> u32 {
    (u32::from(device.bus_number()) << 8) | u32::from(device.address())
}

/// Build a profile from a device's descriptors, `None` when unreadable
pub(crate) fn profile_for<T: UsbContext>(device: &Device<T>) -> Option<DeviceProfile> {
    let descriptor = device.device_descriptor().ok()?;

    let interface_classes = device
        .active_config_descriptor()
        .map(|config| {
            config
                .interfaces()
                .flat_map(|iface| iface.descriptors())
                .map(|desc| desc.class_code())
                .collect()
        })
        .unwrap_or_default();

    // String descriptors need an open handle, which may be denied
    let (manufacturer, product, serial) = match device.open() {
        Ok(handle) => {
            let language = handle
                .read_languages(STRING_TIMEOUT)
                .ok()
                .and_then(|langs| langs.first().copied());
            match language {
                Some(language) => (
                    handle
                        .read_manufacturer_string(language, &descriptor, STRING_TIMEOUT)
                        .ok(),
                    handle
                        .read_product_string(language, &descriptor, STRING_TIMEOUT)
                        .ok(),
                    handle
                        .read_serial_number_string(language, &descriptor, STRING_TIMEOUT)
                        .ok(),
                ),
                None => (None, None, None),
            }
        }
        Err(_) => (None, None, None),
    };

    Some(DeviceProfile {
        device_id: id_for(device),
        name: format!(
            "Bus {:03} Device {:03}",
            device.bus_number(),
            device.address()
        ),
        device_class: descriptor.class_code(),
        interface_classes,
        vendor_id: descriptor.vendor_id(),
        product_id: descriptor.product_id(),
        manufacturer,
        product,
        serial,
    })
}
