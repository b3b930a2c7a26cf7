//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod auth_session;
pub mod exercise;
pub mod notification;
pub mod template;
pub mod user;
pub mod workout_session;
