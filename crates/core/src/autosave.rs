//! Debounced autosave of session progress.
//!
//! Every mutation re-arms a single [`CancellableTimer`]. Only a quiet period
//! of `delay` lets the timer fire, at which point the snapshot captured when
//! the timer was armed is handed to the [`ProgressSink`]. Failures are
//! reported through the [`Notifier`] and are not retried.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::CoreError;
use crate::notify::Notifier;
use crate::progress::ProgressSnapshot;
use crate::store::SessionStore;
use crate::types::DbId;

/// Default quiet period before progress is persisted.
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 30_000;

/// Message shown to the user when an autosave write fails.
pub const AUTOSAVE_FAILED_MESSAGE: &str = "Failed to autosave workout progress";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveConfig {
    pub delay: Duration,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(DEFAULT_AUTOSAVE_DELAY_MS),
        }
    }
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// Destination of autosaved snapshots.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn save_progress(&self, snapshot: ProgressSnapshot) -> Result<(), CoreError>;
}

/// [`ProgressSink`] writing one session's progress through a [`SessionStore`].
pub struct StoreProgressSink {
    store: Arc<dyn SessionStore>,
    user_id: DbId,
    session_id: DbId,
}

impl StoreProgressSink {
    pub fn new(store: Arc<dyn SessionStore>, user_id: DbId, session_id: DbId) -> Self {
        Self {
            store,
            user_id,
            session_id,
        }
    }
}

#[async_trait]
impl ProgressSink for StoreProgressSink {
    async fn save_progress(&self, snapshot: ProgressSnapshot) -> Result<(), CoreError> {
        self.store
            .save_session_progress(self.user_id, self.session_id, &snapshot.exercises)
            .await
    }
}

// ---------------------------------------------------------------------------
// CancellableTimer
// ---------------------------------------------------------------------------

/// One-shot timer running `on_fire` after a delay unless cancelled first.
///
/// Dropping the timer cancels it. Cancelling after the timer has fired does
/// not interrupt the `on_fire` future that is already running.
pub struct CancellableTimer {
    token: CancellationToken,
    fired: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl CancellableTimer {
    /// Arm a timer on the current tokio runtime.
    pub fn arm<F>(delay: Duration, on_fire: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let fired = Arc::new(AtomicBool::new(false));

        let task_token = token.clone();
        let task_fired = Arc::clone(&fired);
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = task_token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
            task_fired.store(true, Ordering::SeqCst);
            on_fire.await;
        });

        Self {
            token,
            fired,
            handle,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Armed, not cancelled, not yet fired.
    pub fn is_pending(&self) -> bool {
        !self.token.is_cancelled() && !self.fired.load(Ordering::SeqCst)
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Whether the timer task (including any fired callback) has finished.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for CancellableTimer {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

// ---------------------------------------------------------------------------
// AutosaveScheduler
// ---------------------------------------------------------------------------

/// Debounces progress writes for one live session.
pub struct AutosaveScheduler {
    config: AutosaveConfig,
    sink: Arc<dyn ProgressSink>,
    notifier: Arc<dyn Notifier>,
    pending: Option<CancellableTimer>,
}

impl AutosaveScheduler {
    pub fn new(
        config: AutosaveConfig,
        sink: Arc<dyn ProgressSink>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            sink,
            notifier,
            pending: None,
        }
    }

    pub fn config(&self) -> AutosaveConfig {
        self.config
    }

    /// (Re)start the quiet-period timer with `snapshot` as the payload.
    ///
    /// Any previously armed timer is cancelled; its snapshot is discarded.
    pub fn schedule(&mut self, snapshot: ProgressSnapshot) {
        self.cancel();

        let sink = Arc::clone(&self.sink);
        let notifier = Arc::clone(&self.notifier);
        let revision = snapshot.revision;

        self.pending = Some(CancellableTimer::arm(self.config.delay, async move {
            match sink.save_progress(snapshot).await {
                Ok(()) => tracing::debug!(revision, "Autosave completed"),
                Err(e) => {
                    tracing::warn!(error = %e, revision, "Autosave failed");
                    notifier.notify_error(AUTOSAVE_FAILED_MESSAGE);
                }
            }
        }));

        tracing::trace!(
            revision,
            delay_ms = self.config.delay.as_millis() as u64,
            "Autosave armed"
        );
    }

    /// Cancel the pending timer, if any. Returns `true` if an unfired timer
    /// was discarded.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(timer) => {
                let was_pending = timer.is_pending();
                timer.cancel();
                was_pending
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(CancellableTimer::is_pending)
    }

    /// Tear the scheduler down. A pending save never fires afterwards.
    pub fn teardown(mut self) {
        if self.cancel() {
            tracing::debug!("Autosave torn down with unsaved changes pending");
        }
    }
}
