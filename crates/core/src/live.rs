//! A session currently being performed.
//!
//! [`LiveSession`] is the explicit context object for one running workout:
//! it is opened when the session starts, owns the [`ProgressModel`] and the
//! [`AutosaveScheduler`], and is torn down when the user leaves or the
//! session ends. Every successful mutation re-arms the autosave timer with a
//! fresh snapshot.

use std::time::Duration;

use tokio::time::Instant;

use crate::autosave::AutosaveScheduler;
use crate::error::CoreError;
use crate::progress::{ProgressModel, ProgressSnapshot};
use crate::types::DbId;
use crate::workout::{ActualSet, SessionExercise, SessionStatus, WorkoutSession};

pub struct LiveSession {
    user_id: DbId,
    session_id: DbId,
    status: SessionStatus,
    progress: ProgressModel,
    pub(crate) autosave: AutosaveScheduler,
    closed: bool,
    last_activity: Instant,
}

impl std::fmt::Debug for LiveSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveSession")
            .field("user_id", &self.user_id)
            .field("session_id", &self.session_id)
            .field("status", &self.status)
            .field("progress", &self.progress)
            .field("closed", &self.closed)
            .field("last_activity", &self.last_activity)
            .finish_non_exhaustive()
    }
}

impl LiveSession {
    /// Open a live context over a stored session.
    pub fn open(session: &WorkoutSession, autosave: AutosaveScheduler) -> Self {
        Self {
            user_id: session.user_id,
            session_id: session.id,
            status: session.status,
            progress: ProgressModel::new(session.exercises.clone()),
            autosave,
            closed: false,
            last_activity: Instant::now(),
        }
    }

    /// Owner of the session.
    pub fn user_id(&self) -> DbId {
        self.user_id
    }

    pub fn session_id(&self) -> DbId {
        self.session_id
    }

    /// Status as seen by this context. Becomes `Completed` only after the
    /// completion write succeeded.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
    }

    /// Exercises including edits the autosave has not written yet.
    pub fn exercises(&self) -> &[SessionExercise] {
        self.progress.exercises()
    }

    /// Current progress as an immutable copy.
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.progress.to_persistable()
    }

    /// Whether an autosave is armed and has not fired.
    pub fn has_pending_save(&self) -> bool {
        self.autosave.is_pending()
    }

    /// Record reps and weight for a set. Every mutation below re-arms the
    /// autosave with the updated progress and fails once the context is
    /// closed or completed.
    pub fn record_set(
        &mut self,
        exercise_index: usize,
        set_index: usize,
        reps: Option<u32>,
        weight: Option<f64>,
    ) -> Result<ActualSet, CoreError> {
        self.ensure_editable()?;
        let set = self
            .progress
            .record_set(exercise_index, set_index, reps, weight)?
            .clone();
        self.touch();
        Ok(set)
    }

    pub fn set_set_completed(
        &mut self,
        exercise_index: usize,
        set_index: usize,
        completed: bool,
    ) -> Result<(), CoreError> {
        self.ensure_editable()?;
        self.progress
            .set_set_completed(exercise_index, set_index, completed)?;
        self.touch();
        Ok(())
    }

    pub fn mark_exercise_complete(&mut self, exercise_index: usize) -> Result<(), CoreError> {
        self.ensure_editable()?;
        self.progress.mark_exercise_complete(exercise_index)?;
        self.touch();
        Ok(())
    }

    pub fn set_effort(
        &mut self,
        exercise_index: usize,
        effort: Option<f64>,
    ) -> Result<(), CoreError> {
        self.ensure_editable()?;
        self.progress.set_effort(exercise_index, effort)?;
        self.touch();
        Ok(())
    }

    pub fn set_notes(&mut self, exercise_index: usize, notes: String) -> Result<(), CoreError> {
        self.ensure_editable()?;
        self.progress.set_notes(exercise_index, notes)?;
        self.touch();
        Ok(())
    }

    /// Hold back the pending autosave while an explicit write to the same
    /// session runs. Returns `true` if a save was pending.
    pub fn hold_autosave(&mut self) -> bool {
        self.autosave.cancel()
    }

    /// Re-arm the autosave with the current progress, typically after a held
    /// write failed. A closed context stays quiet.
    pub fn resume_autosave(&mut self) {
        if !self.closed {
            self.touch();
        }
    }

    /// Time since the context was opened or last mutated.
    pub fn idle_for(&self) -> Duration {
        self.last_activity.elapsed()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Close the context in place for holders that only have `&mut` access.
    ///
    /// Unsaved changes inside the quiet period are dropped and every later
    /// mutation is rejected. Returns `true` if a pending save was discarded.
    pub fn close(&mut self) -> bool {
        self.closed = true;
        let discarded = self.autosave.cancel();
        tracing::debug!(
            session_id = self.session_id,
            revision = self.progress.revision(),
            discarded,
            "Live session closed"
        );
        discarded
    }

    /// Leave the session. Unsaved changes inside the quiet period are dropped.
    pub fn teardown(mut self) {
        self.close();
        self.autosave.teardown();
    }

    fn ensure_editable(&self) -> Result<(), CoreError> {
        if self.closed {
            return Err(CoreError::Conflict(format!(
                "Session {} is no longer live",
                self.session_id
            )));
        }
        match self.status {
            SessionStatus::InProgress => Ok(()),
            SessionStatus::Planned => Err(CoreError::Conflict(format!(
                "Session {} has not been started",
                self.session_id
            ))),
            SessionStatus::Completed => Err(CoreError::Conflict(format!(
                "Session {} is completed and can only be changed by an explicit edit",
                self.session_id
            ))),
        }
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
        self.autosave.schedule(self.progress.to_persistable());
    }
}
