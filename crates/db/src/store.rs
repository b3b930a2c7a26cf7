//! PostgreSQL implementation of the core [`SessionStore`] trait.

use async_trait::async_trait;
use forgefit_core::error::CoreError;
use forgefit_core::store::{SessionStore, UserRef};
use forgefit_core::types::DbId;
use forgefit_core::workout::{SessionExercise, SessionStatus, StatusFilter, WorkoutSession};

use crate::repositories::{UserRepo, WorkoutSessionRepo};
use crate::DbPool;

const SESSION_ENTITY: &str = "WorkoutSession";

#[derive(Clone)]
pub struct PgSessionStore {
    pool: DbPool,
}

impl PgSessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn persistence(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Session store query failed");
    CoreError::Persistence(err.to_string())
}

fn found_or_missing(updated: bool, session_id: DbId) -> Result<(), CoreError> {
    if updated {
        Ok(())
    } else {
        Err(CoreError::NotFound {
            entity: SESSION_ENTITY,
            id: session_id,
        })
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn find_user_by_id(&self, user_id: DbId) -> Result<Option<UserRef>, CoreError> {
        let user = UserRepo::find_by_id(&self.pool, user_id)
            .await
            .map_err(persistence)?;
        Ok(user.map(|u| UserRef {
            id: u.id,
            username: u.username,
        }))
    }

    async fn find_session(
        &self,
        user_id: DbId,
        session_id: DbId,
    ) -> Result<Option<WorkoutSession>, CoreError> {
        WorkoutSessionRepo::find_by_id(&self.pool, user_id, session_id)
            .await
            .map_err(persistence)?
            .map(|row| row.into_domain())
            .transpose()
    }

    async fn update_session_status(
        &self,
        user_id: DbId,
        session_id: DbId,
        status: SessionStatus,
    ) -> Result<(), CoreError> {
        let updated = WorkoutSessionRepo::update_status(&self.pool, user_id, session_id, status)
            .await
            .map_err(persistence)?;
        found_or_missing(updated, session_id)
    }

    async fn save_session_progress(
        &self,
        user_id: DbId,
        session_id: DbId,
        exercises: &[SessionExercise],
    ) -> Result<(), CoreError> {
        let updated = WorkoutSessionRepo::save_progress(&self.pool, user_id, session_id, exercises)
            .await
            .map_err(persistence)?;
        found_or_missing(updated, session_id)
    }

    async fn list_sessions(
        &self,
        user_id: DbId,
        filter: StatusFilter,
    ) -> Result<Vec<WorkoutSession>, CoreError> {
        WorkoutSessionRepo::list(&self.pool, user_id, filter.status())
            .await
            .map_err(persistence)?
            .into_iter()
            .map(|row| row.into_domain())
            .collect()
    }

    async fn delete_session(&self, user_id: DbId, session_id: DbId) -> Result<(), CoreError> {
        let deleted = WorkoutSessionRepo::delete(&self.pool, user_id, session_id)
            .await
            .map_err(persistence)?;
        found_or_missing(deleted, session_id)
    }
}
