//! Channel-based event delivery

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::event::{PermissionEvent, ReaderEvent};

/// Sender for reader events
pub type ReaderEventSender = Sender<ReaderEvent>;
/// Receiver for reader events
pub type ReaderEventReceiver = Receiver<ReaderEvent>;

/// Sender for permission events
pub type PermissionEventSender = Sender<PermissionEvent>;
/// Receiver for permission events
pub type PermissionEventReceiver = Receiver<PermissionEvent>;

/// Create an unbounded channel for reader events
pub fn reader_event_channel() -> (ReaderEventSender, ReaderEventReceiver) {
    unbounded()
}

/// Create an unbounded channel for permission events
pub fn permission_event_channel() -> (PermissionEventSender, PermissionEventReceiver) {
    unbounded()
}
