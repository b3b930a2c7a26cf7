//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod auth_session_repo;
pub mod exercise_repo;
pub mod notification_repo;
pub mod template_repo;
pub mod user_repo;
pub mod workout_session_repo;

pub use auth_session_repo::AuthSessionRepo;
pub use exercise_repo::ExerciseRepo;
pub use notification_repo::NotificationRepo;
pub use template_repo::TemplateRepo;
pub use user_repo::UserRepo;
pub use workout_session_repo::WorkoutSessionRepo;
