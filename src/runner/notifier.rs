//! Notification surface for expiry and completion alerts

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::state::SessionEvent;

/// Receives the runner's alerts. Calls are fire-and-forget and are never
/// made while the session lock is held.
pub trait Notifier: Send + Sync {
    /// A running countdown reached zero. Called once per expiry.
    fn step_expired(&self, step_index: usize);

    /// One pulse of the repeated expiry alert, once per second until silenced
    fn alert_pulse(&self, step_index: usize);

    /// The user finished the last step
    fn recipe_complete(&self, title: &str);
}

/// Notifier that only writes log lines
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn step_expired(&self, step_index: usize) {
        warn!("Time's up for step {}! Tap next to continue", step_index + 1);
    }

    fn alert_pulse(&self, step_index: usize) {
        warn!("Step {} timer expired (alert pulse)", step_index + 1);
    }

    fn recipe_complete(&self, title: &str) {
        info!("Recipe complete: {}. Well done!", title);
    }
}

/// Notifier for API sessions: logs alerts and forwards expiries as
/// [`SessionEvent`]s on the host's broadcast channel
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    session_id: u64,
    tx: broadcast::Sender<SessionEvent>,
}

impl ChannelNotifier {
    pub fn new(session_id: u64, tx: broadcast::Sender<SessionEvent>) -> Self {
        Self { session_id, tx }
    }
}

impl Notifier for ChannelNotifier {
    fn step_expired(&self, step_index: usize) {
        LogNotifier.step_expired(step_index);
        let event = SessionEvent::StepExpired {
            session_id: self.session_id,
            step_index,
        };
        if self.tx.send(event).is_err() {
            debug!("No listeners for expiry of session {}", self.session_id);
        }
    }

    fn alert_pulse(&self, step_index: usize) {
        LogNotifier.alert_pulse(step_index);
    }

    fn recipe_complete(&self, title: &str) {
        LogNotifier.recipe_complete(title);
    }
}
