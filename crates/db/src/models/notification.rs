//! In-app notification model.

use forgefit_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

pub const LEVEL_SUCCESS: &str = "success";
pub const LEVEL_ERROR: &str = "error";

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub level: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}

/// DTO for inserting a notification.
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: DbId,
    pub level: &'static str,
    pub message: String,
}
