//! In-memory device host double for service tests

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use cardlink_ccid::{Bytes, CcidTransport};
use cardlink_reader::{DeviceRegistry, PermissionGate, Result, ServiceError};
use cardlink_transport_usb::event::{
    PermissionEventReceiver, PermissionEventSender, ReaderEventReceiver, ReaderEventSender,
    permission_event_channel, reader_event_channel,
};
use cardlink_transport_usb::{DeviceProfile, PermissionEvent, ReaderEvent};

/// Builds a CCID data block response with the given status and payload
pub fn data_block(status: u8, payload: &[u8]) -> Vec<u8> {
    let mut buf = vec![0x80, 0, 0, 0, 0, 0x00, 0x00, status, 0x00, 0x00];
    buf[1..5].copy_from_slice(&(payload.len() as u32).to_le_bytes());
    buf.extend_from_slice(payload);
    buf
}

/// A device profile that classifies as an ACS contactless reader
pub fn acs_profile(device_id: u32) -> DeviceProfile {
    DeviceProfile {
        device_id,
        name: format!("Bus 001 Device {device_id:03}"),
        device_class: 11,
        interface_classes: vec![11],
        vendor_id: 0x072f,
        product_id: 0x2200,
        manufacturer: Some("ACS".to_string()),
        product: Some("ACS Reader".to_string()),
        serial: Some("AB1234".to_string()),
    }
}

/// Scripted transport handed out by the mock host
pub struct ScriptedTransport {
    responses: VecDeque<std::result::Result<Vec<u8>, cardlink_ccid::Error>>,
    journal: Arc<Mutex<Vec<String>>>,
}

impl CcidTransport for ScriptedTransport {
    fn exchange(&mut self, _frame: &[u8]) -> std::result::Result<Bytes, cardlink_ccid::Error> {
        self.responses
            .pop_front()
            .unwrap_or_else(|| Err(cardlink_ccid::Error::transport("script exhausted")))
            .map(Bytes::from)
    }
}

impl Drop for ScriptedTransport {
    fn drop(&mut self) {
        self.journal
            .lock()
            .unwrap()
            .push("transport_dropped".to_string());
    }
}

/// In-memory registry and permission gate with an operation journal
///
/// The journal records device-list snapshots, opens, releases and
/// transport drops in call order, so tests can assert ordering
/// guarantees such as release-before-scan on detach.
pub struct MockHost {
    devices: Mutex<Vec<DeviceProfile>>,
    granted: Mutex<HashSet<u32>>,
    grant_on_request: Mutex<HashSet<u32>>,
    scripts: Mutex<HashMap<u32, VecDeque<std::result::Result<Vec<u8>, cardlink_ccid::Error>>>>,
    fail_open: Mutex<HashSet<u32>>,
    pub journal: Arc<Mutex<Vec<String>>>,
    reader_tx: ReaderEventSender,
    reader_rx: ReaderEventReceiver,
    permission_tx: PermissionEventSender,
    permission_rx: PermissionEventReceiver,
}

impl MockHost {
    pub fn new() -> Self {
        let (reader_tx, reader_rx) = reader_event_channel();
        let (permission_tx, permission_rx) = permission_event_channel();
        Self {
            devices: Mutex::new(Vec::new()),
            granted: Mutex::new(HashSet::new()),
            grant_on_request: Mutex::new(HashSet::new()),
            scripts: Mutex::new(HashMap::new()),
            fail_open: Mutex::new(HashSet::new()),
            journal: Arc::new(Mutex::new(Vec::new())),
            reader_tx,
            reader_rx,
            permission_tx,
            permission_rx,
        }
    }

    pub fn attach(&self, profile: DeviceProfile) {
        self.devices.lock().unwrap().push(profile);
    }

    pub fn grant(&self, device_id: u32) {
        self.granted.lock().unwrap().insert(device_id);
    }

    pub fn grant_on_request(&self, device_id: u32) {
        self.grant_on_request.lock().unwrap().insert(device_id);
    }

    pub fn fail_open(&self, device_id: u32) {
        self.fail_open.lock().unwrap().insert(device_id);
    }

    /// Script the responses the device's transport will replay
    pub fn script(&self, device_id: u32, responses: Vec<std::result::Result<Vec<u8>, cardlink_ccid::Error>>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(device_id, responses.into());
    }

    /// Emit a detach event as the host OS would
    pub fn emit_detach(&self, device: cardlink_transport_usb::ReaderDevice) {
        self.devices
            .lock()
            .unwrap()
            .retain(|p| p.device_id != device.device_id);
        self.reader_tx.send(ReaderEvent::Detached(device)).unwrap();
    }

    pub fn journal_entries(&self) -> Vec<String> {
        self.journal.lock().unwrap().clone()
    }
}

impl DeviceRegistry for MockHost {
    fn devices(&self) -> Vec<DeviceProfile> {
        self.journal.lock().unwrap().push("devices".to_string());
        self.devices.lock().unwrap().clone()
    }

    fn open(&self, device_id: u32) -> Result<Box<dyn CcidTransport + Send>> {
        if self.fail_open.lock().unwrap().contains(&device_id) {
            return Err(ServiceError::Read(format!(
                "Failed to open device {device_id}: access denied"
            )));
        }
        self.journal.lock().unwrap().push(format!("open:{device_id}"));
        let responses = self
            .scripts
            .lock()
            .unwrap()
            .remove(&device_id)
            .unwrap_or_default();
        Ok(Box::new(ScriptedTransport {
            responses,
            journal: Arc::clone(&self.journal),
        }))
    }

    fn release(&self, device_id: u32) {
        self.journal
            .lock()
            .unwrap()
            .push(format!("release:{device_id}"));
    }

    fn subscribe(&self) -> ReaderEventReceiver {
        self.reader_rx.clone()
    }
}

impl PermissionGate for MockHost {
    fn has_permission(&self, device_id: u32) -> bool {
        self.granted.lock().unwrap().contains(&device_id)
    }

    fn request(&self, device_id: u32) -> Result<()> {
        self.journal
            .lock()
            .unwrap()
            .push(format!("request:{device_id}"));
        let event = if self.grant_on_request.lock().unwrap().contains(&device_id) {
            self.granted.lock().unwrap().insert(device_id);
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
