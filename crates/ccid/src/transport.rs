//! Transport abstraction for CCID byte exchange
//!
//! The protocol engine is written against this trait; the USB bulk
//! implementation lives in the `cardlink-transport-usb` crate and test
//! doubles script their responses in memory.

use bytes::Bytes;

use crate::error::Error;

/// One blocking command/response exchange with a reader
///
/// Implementations are pure byte transport: they must not inspect or
/// alter frame contents. Releasing the underlying connection is the
/// implementation's responsibility, normally in `Drop`, so it happens on
/// every exit path.
pub trait CcidTransport {
    /// Send a serialized command frame and return the raw response bytes
    ///
    /// Returns exactly the bytes received, not the full receive buffer.
    fn exchange(&mut self, frame: &[u8]) -> Result<Bytes, Error>;
}

impl<T: CcidTransport + ?Sized> CcidTransport for Box<T> {
    fn exchange(&mut self, frame: &[u8]) -> Result<Bytes, Error> {
        (**self).exchange(frame)
    }
}

impl<T: CcidTransport + ?Sized> CcidTransport for &mut T {
    fn exchange(&mut self, frame: &[u8]) -> Result<Bytes, Error> {
        (**self).exchange(frame)
    }
}
