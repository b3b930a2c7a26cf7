//! In-memory fakes for the collaborator traits, shared by unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::autosave::ProgressSink;
use crate::error::CoreError;
use crate::notify::{Navigator, Notifier};
use crate::progress::ProgressSnapshot;
use crate::store::{SessionStore, UserRef};
use crate::types::DbId;
use crate::workout::{
    ActualSet, SessionExercise, SessionStatus, StatusFilter, WorkoutSession,
};

pub fn exercise(name: &str, target_sets: u32) -> SessionExercise {
    SessionExercise {
        exercise_id: None,
        name: name.to_string(),
        order: 0,
        target_sets,
        target_reps: 10,
        target_weight: None,
        rest_secs: 60,
        effort: None,
        notes: String::new(),
        completed: false,
        actual_sets: Vec::new(),
    }
}

/// Snapshot of a single exercise whose sets carry the given reps.
pub fn snapshot_with_reps(revision: u64, reps: &[u32]) -> ProgressSnapshot {
    let mut ex = exercise("Squat", 3);
    ex.actual_sets = reps
        .iter()
        .map(|r| ActualSet {
            reps: Some(*r),
            weight: None,
            completed: true,
        })
        .collect();
    ProgressSnapshot {
        revision,
        exercises: vec![ex],
    }
}

pub fn session(id: DbId, status: SessionStatus) -> WorkoutSession {
    let created = Utc.with_ymd_and_hms(2026, 3, 2, 18, 0, 0).unwrap();
    WorkoutSession {
        id,
        user_id: 1,
        template_id: Some(1),
        name: format!("Session {id}"),
        status,
        exercises: vec![exercise("Squat", 3)],
        scheduled_for: None,
        started_at: None,
        completed_at: None,
        notes: None,
        created_at: created,
        updated_at: created,
    }
}

// ---------------------------------------------------------------------------
// Sink / notifier / navigator
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingSink {
    calls: Mutex<Vec<ProgressSnapshot>>,
    fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<ProgressSnapshot> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ProgressSink for RecordingSink {
    async fn save_progress(&self, snapshot: ProgressSnapshot) -> Result<(), CoreError> {
        self.calls.lock().unwrap().push(snapshot);
        if self.fail {
            return Err(CoreError::Persistence("disk on fire".into()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    errors: Mutex<Vec<String>>,
    successes: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn notify_success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
    refreshes: Mutex<usize>,
}

impl RecordingNavigator {
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }

    pub fn refreshes(&self) -> usize {
        *self.refreshes.lock().unwrap()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }

    fn refresh(&self) {
        *self.refreshes.lock().unwrap() += 1;
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Calls observed by [`InMemoryStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    UpdateStatus(DbId, SessionStatus),
    SaveProgress(DbId, Vec<SessionExercise>),
    Delete(DbId),
}

#[derive(Default)]
pub struct InMemoryStore {
    pub sessions: Mutex<Vec<WorkoutSession>>,
    calls: Mutex<Vec<StoreCall>>,
    fail_writes: Mutex<bool>,
}

impl InMemoryStore {
    pub fn with_sessions(sessions: Vec<WorkoutSession>) -> Self {
        Self {
            sessions: Mutex::new(sessions),
            ..Default::default()
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn status_updates(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, StoreCall::UpdateStatus(..)))
            .count()
    }

    fn check_writable(&self) -> Result<(), CoreError> {
        if *self.fail_writes.lock().unwrap() {
            Err(CoreError::Persistence("connection reset".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn find_user_by_id(&self, user_id: DbId) -> Result<Option<UserRef>, CoreError> {
        Ok((user_id == 1).then(|| UserRef {
            id: 1,
            username: "lifter".to_string(),
        }))
    }

    async fn find_session(
        &self,
        user_id: DbId,
        session_id: DbId,
    ) -> Result<Option<WorkoutSession>, CoreError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == session_id && s.user_id == user_id)
            .cloned())
    }

    async fn update_session_status(
        &self,
        _user_id: DbId,
        session_id: DbId,
        status: SessionStatus,
    ) -> Result<(), CoreError> {
        self.calls
            .lock()
            .unwrap()
            .push(StoreCall::UpdateStatus(session_id, status));
        self.check_writable()?;
        if let Some(s) = self
            .sessions
            .lock()
            .unwrap()
            .iter_mut()
            .find(|s| s.id == session_id)
        {
            s.status = status;
        }
        Ok(())
    }

    async fn save_session_progress(
        &self,
        _user_id: DbId,
        session_id: DbId,
        exercises: &[SessionExercise],
    ) -> Result<(), CoreError> {
        self.calls
            .lock()
            .unwrap()
            .push(StoreCall::SaveProgress(session_id, exercises.to_vec()));
        self.check_writable()
    }

    async fn list_sessions(
        &self,
        user_id: DbId,
        filter: StatusFilter,
    ) -> Result<Vec<WorkoutSession>, CoreError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id && filter.matches(s.status))
            .cloned()
            .collect())
    }

    async fn delete_session(&self, _user_id: DbId, session_id: DbId) -> Result<(), CoreError> {
        self.calls.lock().unwrap().push(StoreCall::Delete(session_id));
        self.check_writable()?;
        self.sessions.lock().unwrap().retain(|s| s.id != session_id);
        Ok(())
    }
}
