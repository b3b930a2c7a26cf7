//! Registry of live workout sessions.
//!
//! A session becomes live when it is started (or on the first mutation after
//! a restart) and stops being live on completion, deletion, explicit
//! abandon or server shutdown. Each entry owns the session's progress model
//! and its autosave timer.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use forgefit_core::autosave::{AutosaveConfig, AutosaveScheduler, ProgressSink, StoreProgressSink};
use forgefit_core::error::CoreError;
use forgefit_core::live::LiveSession;
use forgefit_core::notify::Notifier;
use forgefit_core::store::SessionStore;
use forgefit_core::types::DbId;
use forgefit_core::workout::{SessionStatus, WorkoutSession};
use forgefit_events::EventBus;
use tokio::sync::{Mutex, RwLock};

use crate::engine::notifier::BusNotifier;

pub type SharedLiveSession = Arc<Mutex<LiveSession>>;

const SESSION_ENTITY: &str = "WorkoutSession";

struct LiveEntry {
    user_id: DbId,
    session: SharedLiveSession,
}

pub struct LiveSessionRegistry {
    sessions: RwLock<HashMap<DbId, LiveEntry>>,
    store: Arc<dyn SessionStore>,
    event_bus: Arc<EventBus>,
    autosave: AutosaveConfig,
}

impl LiveSessionRegistry {
    pub fn new(
        store: Arc<dyn SessionStore>,
        event_bus: Arc<EventBus>,
        autosave: AutosaveConfig,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            store,
            event_bus,
            autosave,
        }
    }

    /// Register an in-progress session. An existing entry is returned as is.
    pub async fn open(&self, session: &WorkoutSession) -> Result<SharedLiveSession, CoreError> {
        ensure_in_progress(session)?;

        let mut sessions = self.sessions.write().await;
        let entry = sessions.entry(session.id).or_insert_with(|| {
            tracing::info!(
                user_id = session.user_id,
                session_id = session.id,
                "Live session opened"
            );
            LiveEntry {
                user_id: session.user_id,
                session: Arc::new(Mutex::new(self.build(session))),
            }
        });
        Ok(Arc::clone(&entry.session))
    }

    /// The live session for `session_id` if it is already registered.
    pub async fn get(&self, user_id: DbId, session_id: DbId) -> Option<SharedLiveSession> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| Arc::clone(&entry.session))
    }

    /// The live session for `session_id`, loading it from storage if needed.
    ///
    /// A session owned by another user is reported as not found.
    pub async fn get_or_load(
        &self,
        user_id: DbId,
        session_id: DbId,
    ) -> Result<SharedLiveSession, CoreError> {
        if let Some(entry) = self.sessions.read().await.get(&session_id) {
            return if entry.user_id == user_id {
                Ok(Arc::clone(&entry.session))
            } else {
                Err(not_found(session_id))
            };
        }

        let session = self
            .store
            .find_session(user_id, session_id)
            .await?
            .ok_or_else(|| not_found(session_id))?;

        tracing::debug!(user_id, session_id, "Loading session into registry");
        self.open(&session).await
    }

    /// Drop the live context without saving. Returns `true` if one existed.
    pub async fn teardown(&self, user_id: DbId, session_id: DbId) -> bool {
        let entry = {
            let mut sessions = self.sessions.write().await;
            let owned = sessions
                .get(&session_id)
                .is_some_and(|entry| entry.user_id == user_id);
            if owned {
                sessions.remove(&session_id)
            } else {
                None
            }
        };

        match entry {
            Some(entry) => {
                let discarded = entry.session.lock().await.close();
                tracing::info!(user_id, session_id, discarded, "Live session torn down");
                true
            }
            None => false,
        }
    }

    /// Run an explicit write that supersedes the live context, then tear the
    /// context down only if the write succeeded.
    ///
    /// The pending autosave is held for the duration of `write` so it cannot
    /// race it. On failure the context stays live and a held save is re-armed,
    /// so unsaved progress survives for a retry. Sessions that are not live
    /// just run `write`.
    pub async fn teardown_after<F, Fut, T, E>(
        &self,
        user_id: DbId,
        session_id: DbId,
        write: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let Some(live) = self.get(user_id, session_id).await else {
            return write().await;
        };

        let mut guard = live.lock().await;
        let held = guard.hold_autosave();
        let result = write().await;

        if result.is_ok() {
            drop(guard);
            self.teardown(user_id, session_id).await;
        } else {
            if held {
                guard.resume_autosave();
            }
            tracing::warn!(user_id, session_id, held, "Write failed, live session kept");
        }
        result
    }

    /// Tear down sessions that have not been mutated for `max_idle`.
    ///
    /// Sessions with a pending save, or currently held by a request, are left
    /// alone until a later sweep.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let idle: Vec<DbId> = sessions
            .iter()
            .filter(|(_, entry)| Arc::strong_count(&entry.session) == 1)
            .filter(|(_, entry)| match entry.session.try_lock() {
                Ok(live) => !live.has_pending_save() && live.idle_for() >= max_idle,
                Err(_) => false,
            })
            .map(|(id, _)| *id)
            .collect();

        for session_id in &idle {
            if let Some(entry) = sessions.remove(session_id) {
                if let Ok(mut live) = entry.session.try_lock() {
                    live.close();
                }
                tracing::info!(
                    user_id = entry.user_id,
                    session_id = *session_id,
                    "Idle live session evicted"
                );
            }
        }
        idle.len()
    }

    /// Tear down every live session. Used on server shutdown.
    pub async fn teardown_all(&self) -> usize {
        let entries: Vec<LiveEntry> = self.sessions.write().await.drain().map(|(_, e)| e).collect();
        let count = entries.len();
        for entry in entries {
            entry.session.lock().await.close();
        }
        if count > 0 {
            tracing::info!(count, "Live sessions torn down");
        }
        count
    }

    pub async fn is_live(&self, session_id: DbId) -> bool {
        self.sessions.read().await.contains_key(&session_id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    fn build(&self, session: &WorkoutSession) -> LiveSession {
        let sink: Arc<dyn ProgressSink> = Arc::new(StoreProgressSink::new(
            Arc::clone(&self.store),
            session.user_id,
            session.id,
        ));
        let notifier: Arc<dyn Notifier> = Arc::new(
            BusNotifier::new(Arc::clone(&self.event_bus), session.user_id).for_session(session.id),
        );
        LiveSession::open(session, AutosaveScheduler::new(self.autosave, sink, notifier))
    }
}

fn not_found(session_id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: SESSION_ENTITY,
        id: session_id,
    }
}

fn ensure_in_progress(session: &WorkoutSession) -> Result<(), CoreError> {
    match session.status {
        SessionStatus::InProgress => Ok(()),
        SessionStatus::Planned => Err(CoreError::Conflict(format!(
            "Session {} has not been started",
            session.id
        ))),
        SessionStatus::Completed => Err(CoreError::Conflict(format!(
            "Session {} is already completed",
            session.id
        ))),
    }
}
