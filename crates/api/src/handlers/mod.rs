pub mod auth;
pub mod calendar;
pub mod exercises;
pub mod notifications;
pub mod sessions;
pub mod templates;
pub mod user;
