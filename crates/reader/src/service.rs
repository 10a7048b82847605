//! The caller-facing reader service

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, bounded, never, select, unbounded};
use parking_lot::Mutex;
use tracing::{debug, instrument};

use cardlink_transport_usb::event::{
    PermissionEventReceiver, ReaderEventDispatcher, ReaderEventReceiver, reader_event_channel,
};
use cardlink_transport_usb::{ReaderDevice, ReaderEvent, UsbConfig, classifier};

use crate::error::{Result, ServiceError};
use crate::outcome::ReadOutcome;
use crate::registry::{DeviceRegistry, PermissionGate, UsbRegistry};
use crate::worker::ReadWorker;

/// Control messages for the event pump thread
enum Control {
    /// Process every pending device event, then acknowledge
    Barrier(Sender<()>),
}

/// Card reader service: scan, permission negotiation, serialized reads
///
/// One instance owns the read worker and the event pump. Scans and
/// permission calls are synchronous and never touch the worker; reads
/// are queued and complete in FIFO order.
pub struct ReaderService {
    registry: Arc<dyn DeviceRegistry>,
    gate: Arc<dyn PermissionGate>,
    worker: ReadWorker,
    subscribers: Arc<Mutex<ReaderEventDispatcher>>,
    control: Option<Sender<Control>>,
    pump: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for ReaderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderService").finish_non_exhaustive()
    }
}

impl ReaderService {
    /// Create a service over the host's USB stack
    pub fn new(config: UsbConfig) -> Result<Self> {
        let registry = Arc::new(UsbRegistry::new(config)?);
        Ok(Self::with_registry(registry.clone(), registry))
    }

    /// Create a service over explicit registry and permission-gate seams
    pub fn with_registry(
        registry: Arc<dyn DeviceRegistry>,
        gate: Arc<dyn PermissionGate>,
    ) -> Self {
        let worker = ReadWorker::spawn(Arc::clone(&registry));
        let subscribers = Arc::new(Mutex::new(ReaderEventDispatcher::new()));
        let (control_tx, control_rx) = unbounded();

        let pump = spawn_pump(
            Arc::clone(&registry),
            registry.subscribe(),
            control_rx,
            Arc::clone(&subscribers),
        );

        Self {
            registry,
            gate,
            worker,
            subscribers,
            control: Some(control_tx),
            pump: Some(pump),
        }
    }

    /// List attached devices that classify as card readers
    ///
    /// Pending detach events are processed first, so a device that just
    /// disappeared never shows up with a stale connection behind it.
    #[instrument(level = "debug", skip(self))]
    pub fn scan(&self) -> Vec<ReaderDevice> {
        self.flush_events();

        let readers: Vec<_> = self
            .registry
            .devices()
            .iter()
            .filter(|profile| classifier::is_candidate(profile))
            .map(|profile| {
                classifier::describe(profile, self.gate.has_permission(profile.device_id))
            })
            .collect();

        debug!(count = readers.len(), "Scan complete");
        readers
    }

    /// Request access to a device
    ///
    /// Returns `true` immediately when access is already granted.
    /// Otherwise the asynchronous prompt is issued and `true` means
    /// "request sent"; the grant or denial arrives later on
    /// [`permission_events`](Self::permission_events).
    pub fn request_permission(&self, device_id: u32) -> Result<bool> {
        self.ensure_known(device_id)?;

        if self.gate.has_permission(device_id) {
            debug!(device_id, "Permission already granted");
            return Ok(true);
        }

        self.gate.request(device_id)?;
        debug!(device_id, "Permission request issued");
        Ok(true)
    }

    /// Read a card on the given device
    ///
    /// Blocks until the worker completes the transaction. A reachable
    /// reader without a card yields [`ReadOutcome::NoCard`], not an
    /// error; identity and permission problems fail before the worker is
    /// involved.
    #[instrument(level = "debug", skip(self))]
    pub fn read_card(&self, device_id: u32) -> Result<ReadOutcome> {
        self.ensure_known(device_id)?;
        if !self.gate.has_permission(device_id) {
            return Err(ServiceError::NoPermission(device_id));
        }

        let reply = self.worker.submit(device_id)?;
        reply.recv().map_err(|_| ServiceError::WorkerGone)?
    }

    /// Subscribe to attach/detach events for candidate readers
    pub fn events(&self) -> ReaderEventReceiver {
        let (sender, receiver) = reader_event_channel();
        self.subscribers.lock().add_handler(move |event: ReaderEvent| {
            // A dropped receiver just stops listening
            let _ = sender.send(event);
        });
        receiver
    }

    /// Subscribe to permission grant/deny events
    pub fn permission_events(&self) -> PermissionEventReceiver {
        self.gate.subscribe_permissions()
    }

    /// Fail unless the device is currently attached
    fn ensure_known(&self, device_id: u32) -> Result<()> {
        self.flush_events();
        if self
            .registry
            .devices()
            .iter()
            .any(|profile| profile.device_id == device_id)
        {
            Ok(())
        } else {
            Err(ServiceError::DeviceNotFound(device_id))
        }
    }

    /// Block until the pump has handled every already-queued device event
    fn flush_events(&self) {
        let Some(control) = &self.control else {
            return;
        };
        let (ack_tx, ack_rx) = bounded(0);
        if control.send(Control::Barrier(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
    }
}

impl Drop for ReaderService {
    fn drop(&mut self) {
        // Closing the control channel stops the pump
        self.control.take();
        if let Some(pump) = self.pump.take() {
            let _ = pump.join();
        }
    }
}

/// Start the event pump: the single consumer of the registry's event
/// stream. Detaches release any held connection state before the event is
/// fanned out, keeping scan results ahead of stale handles.
fn spawn_pump(
    registry: Arc<dyn DeviceRegistry>,
    events: ReaderEventReceiver,
    control: Receiver<Control>,
    subscribers: Arc<Mutex<ReaderEventDispatcher>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut events = events;
        let handle = |event: ReaderEvent| {
            if let ReaderEvent::Detached(device) = &event {
                registry.release(device.device_id);
            }
            subscribers.lock().dispatch(event);
        };

        loop {
            select! {
                recv(events) -> msg => match msg {
                    Ok(event) => handle(event),
                    Err(_) => {
                        // Event source gone; keep serving barriers so
                        // scans do not block
                        events = never();
                    }
                },
                recv(control) -> msg => match msg {
                    Ok(Control::Barrier(ack)) => {
                        while let Ok(event) = events.try_recv() {
                            handle(event);
                        }
                        let _ = ack.send(());
                    }
                    Err(_) => break,
                },
            }
        }
        debug!("Event pump shutting down");
    })
}
