use std::sync::Arc;

use forgefit_core::store::SessionStore;
use forgefit_events::EventBus;

use crate::config::ServerConfig;
use crate::engine::LiveSessionRegistry;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone; everything heavy sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: forgefit_db::DbPool,
    pub config: Arc<ServerConfig>,
    pub event_bus: Arc<EventBus>,
    /// Session persistence used by the core engine.
    pub store: Arc<dyn SessionStore>,
    pub live_sessions: Arc<LiveSessionRegistry>,
}

impl AppState {
    /// Wire the PostgreSQL session store and an empty live-session registry.
    pub fn new(pool: forgefit_db::DbPool, config: ServerConfig, event_bus: Arc<EventBus>) -> Self {
        let store: Arc<dyn SessionStore> = Arc::new(forgefit_db::PgSessionStore::new(pool.clone()));
        let live_sessions = Arc::new(LiveSessionRegistry::new(
            Arc::clone(&store),
            Arc::clone(&event_bus),
            config.autosave,
        ));

        Self {
            pool,
            config: Arc::new(config),
            event_bus,
            store,
            live_sessions,
        }
    }
}
