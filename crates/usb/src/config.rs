//! Configuration options for the USB bulk transport

use std::time::Duration;

/// Configuration options for the USB bulk transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbConfig {
    /// Timeout applied to each bulk transfer, in either direction
    pub timeout: Duration,

    /// Size of the bulk IN receive buffer
    pub read_buffer_size: usize,
}

impl Default for UsbConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            read_buffer_size: 1024,
        }
    }
}

impl UsbConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-transfer timeout
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the receive buffer size
    pub const fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }
}
