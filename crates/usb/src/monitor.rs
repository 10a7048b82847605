//! Hotplug monitoring for reader attach/detach events
//!
//! Wraps libusb hotplug callbacks and forwards events for devices the
//! classifier accepts; everything else on the bus is ignored. Events are
//! delivered over a crossbeam channel so consumers decide their own
//! threading.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rusb::{Context, Device, Hotplug, HotplugBuilder, Registration, UsbContext};
use tracing::{debug, warn};

use crate::classifier;
use crate::error::{Error, Result};
use crate::event::{ReaderEvent, ReaderEventSender};
use crate::manager::profile_for;

/// Poll interval for the libusb event loop
const EVENT_LOOP_TICK: Duration = Duration::from_millis(200);

/// Forwards hotplug callbacks as classified reader events
struct HotplugForwarder {
    sender: ReaderEventSender,
}

impl HotplugForwarder {
    fn forward(&mut self, device: &Device<Context>, attached: bool) {
        let Some(profile) = profile_for(device) else {
            return;
        };
        if !classifier::is_candidate(&profile) {
            return;
        }

        let has_permission = attached && device.open().is_ok();
        let reader = classifier::describe(&profile, has_permission);
        debug!(device = %reader.name, attached, "Reader hotplug event");

        let event = if attached {
            ReaderEvent::Attached(reader)
        } else {
            ReaderEvent::Detached(reader)
        };
        // A send failure means the receiver is gone and the monitor is
        // about to be dropped
        let _ = self.sender.send(event);
    }
}

impl Hotplug<Context> for HotplugForwarder {
    fn device_arrived(&mut self, device: Device<Context>) {
        self.forward(&device, true);
    }

    fn device_left(&mut self, device: Device<Context>) {
        self.forward(&device, false);
    }
}

/// Background monitor delivering reader attach/detach events
pub struct UsbMonitor {
    context: Context,
    registration: Option<Registration<Context>>,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for UsbMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsbMonitor").finish_non_exhaustive()
    }
}

impl UsbMonitor {
    /// Register for hotplug events and start the event loop thread
    ///
    /// Fails with [`Error::HotplugUnsupported`] on platforms where libusb
    /// has no hotplug support (notably Windows).
    pub fn create(sender: ReaderEventSender) -> Result<Self> {
        if !rusb::has_hotplug() {
            return Err(Error::HotplugUnsupported);
        }

        let context = Context::new()?;
        let registration = HotplugBuilder::new()
            .enumerate(false)
            .register(context.clone(), Box::new(HotplugForwarder { sender }))?;

        let stop = Arc::new(AtomicBool::new(false));
        let thread = {
            let context = context.clone();
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    if let Err(err) = context.handle_events(Some(EVENT_LOOP_TICK)) {
                        warn!(error = %err, "USB event loop terminated");
                        break;
                    }
                }
            })
        };

        Ok(Self {
            context,
            registration: Some(registration),
            stop,
            thread: Some(thread),
        })
    }
}

impl Drop for UsbMonitor {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(registration) = self.registration.take() {
            self.context.unregister_callback(registration);
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
