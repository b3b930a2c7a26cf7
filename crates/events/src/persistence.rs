//! Durable notification persistence service.
//!
//! [`NotificationPersistence`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! and writes every event carrying a [`UserNotification`] to the
//! `notifications` table. Other events are only traced. The loop ends when
//! the bus is dropped.

use forgefit_core::types::DbId;
use forgefit_db::models::notification::CreateNotification;
use forgefit_db::repositories::NotificationRepo;
use forgefit_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::{UserNotification, WorkoutEvent};

pub struct NotificationPersistence;

impl NotificationPersistence {
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<WorkoutEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    tracing::debug!(
                        event_type = %event.event_type,
                        user_id = event.user_id,
                        session_id = ?event.session_id,
                        "Workout event"
                    );
                    let Some(notification) = event.notification.as_ref() else {
                        continue;
                    };
                    if let Err(e) = Self::persist(&pool, event.user_id, notification).await {
                        tracing::error!(
                            error = %e,
                            user_id = event.user_id,
                            "Failed to persist notification"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification persistence lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification persistence shutting down");
                    break;
                }
            }
        }
    }

    async fn persist(
        pool: &DbPool,
        user_id: DbId,
        notification: &UserNotification,
    ) -> Result<DbId, sqlx::Error> {
        NotificationRepo::create(
            pool,
            &CreateNotification {
                user_id,
                level: notification.level.as_str(),
                message: notification.message.clone(),
            },
        )
        .await
    }
}
