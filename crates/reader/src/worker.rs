//! The single read worker
//!
//! All card transactions run on one dedicated thread, which is what
//! guarantees at most one physical transaction in flight: a claimed USB
//! interface cannot be shared, and serializing on the worker enforces
//! that by construction rather than by locking a shared handle.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use tracing::{debug, info};

use cardlink_ccid::CardSession;

use crate::error::{Result, ServiceError};
use crate::outcome::ReadOutcome;
use crate::registry::DeviceRegistry;

/// One queued read transaction and the channel its result goes back on
struct Job {
    device_id: u32,
    reply: Sender<Result<ReadOutcome>>,
}

/// Handle to the dedicated read worker thread
///
/// Dropping the worker closes the job queue and joins the thread; a
/// transaction already in flight finishes first.
pub(crate) struct ReadWorker {
    jobs: Option<Sender<Job>>,
    thread: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for ReadWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadWorker").finish_non_exhaustive()
    }
}

impl ReadWorker {
    /// Start the worker thread
    pub(crate) fn spawn(registry: Arc<dyn DeviceRegistry>) -> Self {
        let (jobs, queue) = unbounded::<Job>();
        let thread = thread::spawn(move || {
            for job in queue.iter() {
                let result = run_transaction(registry.as_ref(), job.device_id);
                // A closed reply channel means the caller abandoned the
                // read; the transaction itself already completed
                let _ = job.reply.send(result);
            }
            debug!("Read worker shutting down");
        });

        Self {
            jobs: Some(jobs),
            thread: Some(thread),
        }
    }

    /// Queue a transaction, returning the channel its result arrives on
    pub(crate) fn submit(&self, device_id: u32) -> Result<Receiver<Result<ReadOutcome>>> {
        let (reply, receiver) = bounded(1);
        self.jobs
            .as_ref()
            .ok_or(ServiceError::WorkerGone)?
            .send(Job { device_id, reply })
            .map_err(|_| ServiceError::WorkerGone)?;
        Ok(receiver)
    }
}

impl Drop for ReadWorker {
    fn drop(&mut self) {
        self.jobs.take();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Run one complete transaction: open, read, release
///
/// Opening the device is the only hard failure here; once a connection
/// exists, protocol and transport failures degrade to a `NoCard` outcome.
/// The transport is owned by the session and dropped on every path, which
/// releases the claimed interface exactly once.
fn run_transaction(registry: &dyn DeviceRegistry, device_id: u32) -> Result<ReadOutcome> {
    let transport = registry.open(device_id)?;
    let mut session = CardSession::new(transport);

    match session.read() {
        Ok(card) => {
            info!(
                device_id,
                uid = %card.uid_string(),
                card_type = card.type_label(),
                "Card read complete"
            );
            Ok(ReadOutcome::Success { card })
        }
        Err(err) => {
            debug!(device_id, error = %err, "Read degraded to no-card outcome");
            Ok(ReadOutcome::NoCard {
                message: "No card detected or read failed".to_string(),
            })
        }
    }
}
