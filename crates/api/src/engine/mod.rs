//! Server-side workout engine.
//!
//! - [`live_sessions`] -- registry of live sessions held in `AppState`.
//! - [`notifier`] -- event-bus backed [`Notifier`](forgefit_core::notify::Notifier)
//!   and the navigator that turns redirects into response fields.

pub mod live_sessions;
pub mod notifier;

pub use live_sessions::{LiveSessionRegistry, SharedLiveSession};
pub use notifier::{BusNotifier, ResponseNavigator};
