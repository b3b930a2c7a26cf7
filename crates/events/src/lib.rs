//! forgefit event bus and notification persistence.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`WorkoutEvent`] -- the event envelope carried on the bus.
//! - [`NotificationPersistence`] -- background service writing user-facing
//!   notifications to the `notifications` table.

pub mod bus;
pub mod persistence;

pub use bus::{EventBus, NotificationLevel, UserNotification, WorkoutEvent};
pub use persistence::NotificationPersistence;
