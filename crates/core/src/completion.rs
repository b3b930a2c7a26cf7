//! Session completion and deletion.
//!
//! [`CompletionController::complete`] moves a [`LiveSession`] from
//! `in-progress` to `completed`. The transition is confirmed first, persisted
//! second and only then applied locally; a failed write leaves the session
//! `in-progress` so the caller can retry.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::live::LiveSession;
use crate::notify::{session_detail_path, Navigator, Notifier};
use crate::store::SessionStore;
use crate::types::DbId;
use crate::workout::SessionStatus;

pub const COMPLETE_PROMPT: &str = "Finish this workout? Completed sessions can no longer be logged.";
pub const DELETE_PROMPT: &str = "Delete this workout session? This cannot be undone.";

pub const COMPLETED_MESSAGE: &str = "Workout completed";
pub const COMPLETE_FAILED_MESSAGE: &str = "Failed to complete workout. Please try again.";
pub const DELETED_MESSAGE: &str = "Workout session deleted";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete workout session";

/// Path of the session list view, shown after a deletion.
pub const SESSION_LIST_PATH: &str = "/sessions";

/// Blocking yes/no confirmation before an irreversible action.
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// A confirmation answer known up front (e.g. a `confirmed` request flag).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation(pub bool);

#[async_trait]
impl Confirmer for Confirmation {
    async fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    Completed { redirect_to: String },
    Declined,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    Deleted { redirect_to: String },
    Declined,
}

pub struct CompletionController {
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl CompletionController {
    pub fn new(
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            store,
            notifier,
            navigator,
        }
    }

    /// Complete a live session.
    ///
    /// Already-completed sessions are rejected with [`CoreError::Conflict`]
    /// without touching storage. On confirmation, any pending autosave is
    /// superseded by a final progress write, followed by the status update.
    pub async fn complete(
        &self,
        live: &mut LiveSession,
        confirmer: &dyn Confirmer,
    ) -> Result<CompletionOutcome, CoreError> {
        let session_id = live.session_id();

        if live.status().is_terminal() {
            return Err(CoreError::Conflict(format!(
                "Session {session_id} is already completed"
            )));
        }
        live.status()
            .validate_transition(SessionStatus::Completed)
            .map_err(CoreError::Conflict)?;

        if !confirmer.confirm(COMPLETE_PROMPT).await {
            tracing::debug!(session_id, "Completion declined");
            return Ok(CompletionOutcome::Declined);
        }

        live.autosave.cancel();
        let snapshot = live.snapshot();

        let result = async {
            self.store
                .save_session_progress(live.user_id(), session_id, &snapshot.exercises)
                .await?;
            self.store
                .update_session_status(live.user_id(), session_id, SessionStatus::Completed)
                .await
        }
        .await;

        if let Err(e) = result {
            tracing::error!(session_id, error = %e, "Failed to complete session");
            self.notifier.notify_error(COMPLETE_FAILED_MESSAGE);
            return Err(into_persistence(e));
        }

        live.set_status(SessionStatus::Completed);
        tracing::info!(
            session_id,
            revision = snapshot.revision,
            "Session completed"
        );

        let redirect_to = session_detail_path(session_id);
        self.notifier.notify_success(COMPLETED_MESSAGE);
        self.navigator.navigate(&redirect_to);
        self.navigator.refresh();

        Ok(CompletionOutcome::Completed { redirect_to })
    }

    /// Delete a session of any status after its own confirmation.
    ///
    /// Tearing down a live context for the session is the caller's job.
    pub async fn delete(
        &self,
        user_id: DbId,
        session_id: DbId,
        confirmer: &dyn Confirmer,
    ) -> Result<DeletionOutcome, CoreError> {
        if !confirmer.confirm(DELETE_PROMPT).await {
            tracing::debug!(session_id, "Deletion declined");
            return Ok(DeletionOutcome::Declined);
        }

        if let Err(e) = self.store.delete_session(user_id, session_id).await {
            if matches!(e, CoreError::NotFound { .. }) {
                return Err(e);
            }
            tracing::error!(session_id, error = %e, "Failed to delete session");
            self.notifier.notify_error(DELETE_FAILED_MESSAGE);
            return Err(into_persistence(e));
        }

        tracing::info!(session_id, "Session deleted");
        self.notifier.notify_success(DELETED_MESSAGE);
        self.navigator.navigate(SESSION_LIST_PATH);
        self.navigator.refresh();

        Ok(DeletionOutcome::Deleted {
            redirect_to: SESSION_LIST_PATH.to_string(),
        })
    }
}

fn into_persistence(err: CoreError) -> CoreError {
    match err {
        CoreError::Persistence(_) => err,
        other => CoreError::Persistence(other.to_string()),
    }
}
