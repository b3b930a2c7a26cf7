//! Domain core for forgefit.
//!
//! Pure types and logic shared by the database, event and API crates. Has
//! zero internal dependencies.
//!
//! - [`progress`] -- in-memory exercise/set progress of a running session.
//! - [`autosave`] -- debounced persistence of progress snapshots.
//! - [`live`] -- the explicit per-session context tying the two together.
//! - [`completion`] -- the in-progress -> completed transition.
//! - [`calendar`] -- projection of sessions into calendar events.

pub mod autosave;
pub mod calendar;
pub mod completion;
pub mod error;
pub mod live;
pub mod notify;
pub mod progress;
pub mod store;
pub mod types;
pub mod workout;

#[cfg(test)]
mod testing;
