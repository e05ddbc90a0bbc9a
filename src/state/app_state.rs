//! Shared state of the HTTP host

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Instant,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::{
    recipe::Catalog,
    runner::{notifier::ChannelNotifier, StepRunner},
};

/// Events emitted by running sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    Started { session_id: u64, recipe_id: String },
    StepExpired { session_id: u64, step_index: usize },
    Completed { session_id: u64 },
    Ended { session_id: u64 },
}

/// The cooking session currently driven through the API
#[derive(Debug)]
pub struct ActiveSession {
    pub id: u64,
    pub recipe_id: String,
    pub runner: StepRunner,
    pub started_at: DateTime<Utc>,
}

/// Main application state: catalog, active session and server metadata
#[derive(Debug)]
pub struct AppState {
    pub catalog: Catalog,
    /// At most one session at a time; replacing it tears the old one down
    pub session: Mutex<Option<ActiveSession>>,
    next_session_id: AtomicU64,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Channel for session lifecycle notifications
    pub event_tx: broadcast::Sender<SessionEvent>,
}

impl AppState {
    /// Create a new AppState serving the given catalog
    pub fn new(port: u16, host: String, catalog: Catalog) -> Self {
        let (event_tx, _) = broadcast::channel(100);

        Self {
            catalog,
            session: Mutex::new(None),
            next_session_id: AtomicU64::new(1),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            event_tx,
        }
    }

    /// Begin a session for `recipe_id`, tearing down any previous one.
    /// Returns `Ok(None)` when the recipe does not exist.
    pub fn begin_session(&self, recipe_id: &str) -> Result<Option<u64>, String> {
        self.begin_session_with(recipe_id, |session| session.id)
    }

    /// Like [`begin_session`](Self::begin_session), reading the new session
    /// with `f` before anything else can end it
    pub fn begin_session_with<F, R>(&self, recipe_id: &str, f: F) -> Result<Option<R>, String>
    where
        F: FnOnce(&ActiveSession) -> R,
    {
        let Some(entry) = self.catalog.get(recipe_id) else {
            warn!("Unknown recipe requested: {}", recipe_id);
            return Ok(None);
        };

        let mut slot = self.session.lock()
            .map_err(|e| format!("Failed to lock session: {}", e))?;

        if let Some(previous) = slot.take() {
            info!("Replacing session {} ({})", previous.id, previous.recipe_id);
            self.emit(SessionEvent::Ended { session_id: previous.id });
        }

        let session_id = self.next_session_id.fetch_add(1, Ordering::SeqCst);
        // Announced before the runner exists: an empty recipe completes during construction
        self.emit(SessionEvent::Started {
            session_id,
            recipe_id: recipe_id.to_string(),
        });

        let notifier = Arc::new(ChannelNotifier::new(session_id, self.event_tx.clone()));
        let tx = self.event_tx.clone();
        let runner = StepRunner::new(
            entry.recipe.clone(),
            notifier,
            Box::new(move || {
                // Receivers may be gone during shutdown
                let _ = tx.send(SessionEvent::Completed { session_id });
            }),
        );

        let session = slot.insert(ActiveSession {
            id: session_id,
            recipe_id: recipe_id.to_string(),
            runner,
            started_at: Utc::now(),
        });
        let result = f(&*session);
        drop(slot);

        info!("Session {} started for recipe {}", session_id, recipe_id);
        self.record_action("begin");
        Ok(Some(result))
    }

    /// Apply a user intent to the active session and record it as the
    /// last action. Returns `Ok(None)` when there is no session.
    pub fn with_session<F, R>(&self, action: &str, f: F) -> Result<Option<R>, String>
    where
        F: FnOnce(&ActiveSession) -> R,
    {
        let result = self.inspect_session(f)?;
        if result.is_some() {
            self.record_action(action);
        }
        Ok(result)
    }

    /// Read the active session without recording an action
    pub fn inspect_session<F, R>(&self, f: F) -> Result<Option<R>, String>
    where
        F: FnOnce(&ActiveSession) -> R,
    {
        let slot = self.session.lock()
            .map_err(|e| format!("Failed to lock session: {}", e))?;

        Ok(slot.as_ref().map(f))
    }

    /// End the active session, if any. Dropping its runner cancels all schedules.
    pub fn end_session(&self) -> Result<Option<u64>, String> {
        let ended = self.session.lock()
            .map_err(|e| format!("Failed to lock session: {}", e))?
            .take();

        Ok(ended.map(|session| {
            info!("Session {} ended", session.id);
            self.record_action("exit");
            self.emit(SessionEvent::Ended { session_id: session.id });
            session.id
        }))
    }

    /// End the active session only if it is still `session_id`
    pub fn end_session_if(&self, session_id: u64) -> Result<bool, String> {
        let mut slot = self.session.lock()
            .map_err(|e| format!("Failed to lock session: {}", e))?;

        if slot.as_ref().map(|session| session.id) != Some(session_id) {
            return Ok(false);
        }
        let ended = slot.take();
        drop(slot);
        drop(ended);

        info!("Session {} finished and was cleared", session_id);
        self.emit(SessionEvent::Ended { session_id });
        Ok(true)
    }

    /// Current session id, if any
    pub fn active_session_id(&self) -> Option<u64> {
        self.session.lock().ok().and_then(|slot| slot.as_ref().map(|session| session.id))
    }

    fn emit(&self, event: SessionEvent) {
        if let Err(e) = self.event_tx.send(event) {
            warn!("Failed to send session event: {}", e);
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
