//! Persistence collaborator used by the autosave and completion logic.
//!
//! The core depends only on these signatures; the PostgreSQL implementation
//! lives in the `db` crate.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::types::DbId;
use crate::workout::{SessionExercise, SessionStatus, StatusFilter, WorkoutSession};

/// Minimal user view needed by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: DbId,
    pub username: String,
}

/// Storage operations on a user's workout sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn find_user_by_id(&self, user_id: DbId) -> Result<Option<UserRef>, CoreError>;

    /// A session owned by `user_id`. Someone else's session is `None`.
    async fn find_session(
        &self,
        user_id: DbId,
        session_id: DbId,
    ) -> Result<Option<WorkoutSession>, CoreError>;

    async fn update_session_status(
        &self,
        user_id: DbId,
        session_id: DbId,
        status: SessionStatus,
    ) -> Result<(), CoreError>;

    async fn save_session_progress(
        &self,
        user_id: DbId,
        session_id: DbId,
        exercises: &[SessionExercise],
    ) -> Result<(), CoreError>;

    async fn list_sessions(
        &self,
        user_id: DbId,
        filter: StatusFilter,
    ) -> Result<Vec<WorkoutSession>, CoreError>;

    async fn delete_session(&self, user_id: DbId, session_id: DbId) -> Result<(), CoreError>;
}
