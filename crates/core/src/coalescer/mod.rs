//! Debounced settings write coalescer
//!
//! Collapses rapid local settings mutations into a single remote merge
//! write after a quiescence window. The coalescer owns a single background
//! task; callers hand it patches through a channel and never share mutable
//! state with it.
//!
//! Guarantees:
//! - A new `notify` inside the window replaces the timer and merges into
//!   the pending payload (field-wise, latest value wins).
//! - At most one flush is in flight. Patches arriving during a flush queue
//!   up and open a new window only after the flush resolves.
//! - A flush failure is surfaced on the error channel and the payload is
//!   dropped; the remote copy stays stale until the next mutation or
//!   explicit save. Not retried.
//! - Teardown cancels a pending timer without flushing; an in-flight flush
//!   completes on its own.
//!
//! A debounced flush racing an explicit settings-confirm save is resolved
//! by the document store as last-writer-wins; the coalescer makes no
//! ordering promise across the two paths.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use profilesync_domain::constants::{COALESCER_JOIN_TIMEOUT_SECS, SETTINGS_DEBOUNCE_MS};
use profilesync_domain::{PendingWrite, ProfileSyncError, SettingsPatch};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::store::ports::DocumentStore;

/// Configuration for the settings coalescer.
#[derive(Debug, Clone)]
pub struct CoalescerConfig {
    /// Quiescence window after the latest mutation
    pub window: Duration,
    /// Join timeout when shutting down
    pub join_timeout: Duration,
}

impl Default for CoalescerConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_millis(SETTINGS_DEBOUNCE_MS),
            join_timeout: Duration::from_secs(COALESCER_JOIN_TIMEOUT_SECS),
        }
    }
}

/// Handle to the per-session coalescer task.
pub struct SettingsCoalescer {
    tx: mpsc::UnboundedSender<SettingsPatch>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
    join_timeout: Duration,
}

impl SettingsCoalescer {
    /// Spawn the coalescer task for one user. Flush failures arrive on the
    /// returned error channel.
    pub fn spawn(
        store: Arc<dyn DocumentStore>,
        collection: impl Into<String>,
        uid: impl Into<String>,
        config: CoalescerConfig,
    ) -> (Self, mpsc::UnboundedReceiver<ProfileSyncError>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (error_tx, error_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let worker_cancel = cancel.clone();
        let collection = collection.into();
        let uid = uid.into();
        let window = config.window;
        let task = tokio::spawn(async move {
            run(store, collection, uid, window, rx, worker_cancel, error_tx).await;
        });

        let coalescer =
            Self { tx, cancel, task: Some(task), join_timeout: config.join_timeout };
        (coalescer, error_rx)
    }

    /// Record a settings mutation and (re)schedule the flush.
    pub fn notify(&self, patch: SettingsPatch) {
        if patch.is_empty() {
            return;
        }
        if self.tx.send(patch).is_err() {
            debug!("coalescer already shut down, dropping settings patch");
        }
    }

    /// Cancel any pending timer without flushing and stop the task. An
    /// in-flight flush is allowed to complete first.
    pub async fn shutdown(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.task.take() {
            match tokio::time::timeout(self.join_timeout, handle).await {
                Ok(Ok(())) => debug!("settings coalescer stopped"),
                Ok(Err(e)) => warn!(error = %e, "settings coalescer task panicked"),
                Err(_) => warn!("settings coalescer did not stop within timeout"),
            }
        }
    }
}

impl Drop for SettingsCoalescer {
    fn drop(&mut self) {
        // Pending work must not outlive the session.
        self.cancel.cancel();
    }
}

async fn run(
    store: Arc<dyn DocumentStore>,
    collection: String,
    uid: String,
    window: Duration,
    mut rx: mpsc::UnboundedReceiver<SettingsPatch>,
    cancel: CancellationToken,
    errors: mpsc::UnboundedSender<ProfileSyncError>,
) {
    let mut pending: Option<PendingWrite> = None;
    let mut deadline: Option<Instant> = None;

    loop {
        let timer_armed = deadline.is_some();
        let wake_at = deadline.unwrap_or_else(Instant::now);

        tokio::select! {
            _ = cancel.cancelled() => {
                if pending.is_some() {
                    debug!(%uid, "discarding pending settings write on teardown");
                }
                break;
            }
            received = rx.recv() => match received {
                Some(patch) => {
                    match pending.as_mut() {
                        Some(write) => write.payload.merge(patch),
                        None => {
                            pending = Some(PendingWrite { payload: patch, scheduled_at: Utc::now() });
                        }
                    }
                    // Restart the quiescence window from the latest mutation.
                    deadline = Some(Instant::now() + window);
                }
                None => break,
            },
            _ = tokio::time::sleep_until(wake_at), if timer_armed => {
                deadline = None;
                if let Some(write) = pending.take() {
                    // Awaiting the flush inline keeps it singular: patches
                    // arriving now queue in the channel and are picked up,
                    // with a fresh window, once the flush resolves.
                    flush(&store, &collection, &uid, write, &errors).await;
                }
            }
        }
    }
}

async fn flush(
    store: &Arc<dyn DocumentStore>,
    collection: &str,
    uid: &str,
    write: PendingWrite,
    errors: &mpsc::UnboundedSender<ProfileSyncError>,
) {
    let payload = write.payload.to_document();
    debug!(%uid, scheduled_at = %write.scheduled_at, "flushing coalesced settings write");

    match store.merge_write(collection, uid, &payload).await {
        Ok(()) => debug!(%uid, "settings flush complete"),
        Err(err) => {
            warn!(%uid, error = %err, "settings flush failed, payload dropped");
            let _ = errors.send(err);
        }
    }
}
