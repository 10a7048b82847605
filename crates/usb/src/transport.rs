//! Blocking USB bulk transport for CCID frames
//!
//! One [`UsbBulkTransport`] owns one open, claimed connection to a reader.
//! It is pure byte transport: a bulk OUT write of the command frame, a
//! bulk IN read of the response, nothing in between looks at the bytes.
//! Dropping the transport releases the claimed interface, so the
//! connection is freed on every exit path.

use rusb::{Context, Device, DeviceHandle, Direction, TransferType, UsbContext};
use tracing::{debug, trace, warn};

use cardlink_ccid::{Bytes, CcidTransport};

use crate::classifier::USB_CLASS_SMART_CARD;
use crate::config::UsbConfig;
use crate::error::{Error, Result};

/// An open, claimed bulk connection to a card reader
#[derive(Debug)]
pub struct UsbBulkTransport {
    handle: DeviceHandle<Context>,
    interface_number: u8,
    endpoint_out: u8,
    endpoint_in: u8,
    config: UsbConfig,
}

impl UsbBulkTransport {
    /// Open the device, claim its CCID interface and locate the endpoints
    ///
    /// Prefers the interface declaring the smart-card class; vendor-specific
    /// readers that omit the class code fall back to the first declared
    /// interface. Fails when no interface exists or the chosen interface
    /// lacks a bulk IN/OUT endpoint pair.
    pub fn open(device: &Device<Context>, config: UsbConfig) -> Result<Self> {
        let descriptor = device.active_config_descriptor()?;

        let interface = descriptor
            .interfaces()
            .flat_map(|iface| iface.descriptors())
            .find(|desc| desc.class_code() == USB_CLASS_SMART_CARD)
            .or_else(|| {
                descriptor
                    .interfaces()
                    .flat_map(|iface| iface.descriptors())
                    .next()
            })
            .ok_or(Error::NoInterface)?;

        let interface_number = interface.interface_number();

        let mut endpoint_out = None;
        let mut endpoint_in = None;
        for endpoint in interface.endpoint_descriptors() {
            if endpoint.transfer_type() == TransferType::Bulk {
                match endpoint.direction() {
                    Direction::In => endpoint_in = Some(endpoint.address()),
                    Direction::Out => endpoint_out = Some(endpoint.address()),
                }
            }
        }
        let (endpoint_out, endpoint_in) = match (endpoint_out, endpoint_in) {
            (Some(out), Some(inp)) => (out, inp),
            _ => return Err(Error::MissingEndpoints),
        };

        let handle = device.open()?;

        #[cfg(target_os = "linux")]
        if handle.kernel_driver_active(interface_number).unwrap_or(false) {
            handle.detach_kernel_driver(interface_number)?;
        }

        handle.claim_interface(interface_number)?;

        debug!(
            interface = interface_number,
            out = %format_args!("0x{endpoint_out:02x}"),
            r#in = %format_args!("0x{endpoint_in:02x}"),
            "Claimed CCID interface"
        );

        Ok(Self {
            handle,
            interface_number,
            endpoint_out,
            endpoint_in,
            config,
        })
    }

    /// One blocking bulk write followed by one blocking bulk read
    ///
    /// Returns exactly the bytes received, not the whole receive buffer.
    pub fn exchange_raw(&mut self, frame: &[u8]) -> Result<Vec<u8>> {
        let sent = self
            .handle
            .write_bulk(self.endpoint_out, frame, self.config.timeout)?;
        if sent != frame.len() {
            return Err(Error::IncompleteWrite {
                sent,
                expected: frame.len(),
            });
        }
        trace!(bytes = sent, "Bulk OUT complete");

        let mut buffer = vec![0u8; self.config.read_buffer_size];
        let received = self
            .handle
            .read_bulk(self.endpoint_in, &mut buffer, self.config.timeout)?;
        trace!(bytes = received, "Bulk IN complete");

        buffer.truncate(received);
        Ok(buffer)
    }
}

impl CcidTransport for UsbBulkTransport {
    fn exchange(&mut self, frame: &[u8]) -> std::result::Result<Bytes, cardlink_ccid::Error> {
        self.exchange_raw(frame)
            .map(Bytes::from)
            .map_err(Into::into)
    }
}

impl Drop for UsbBulkTransport {
    fn drop(&mut self) {
        if let Err(err) = self.handle.release_interface(self.interface_number) {
            warn!(error = %err, "Failed to release USB interface");
        }
    }
}
