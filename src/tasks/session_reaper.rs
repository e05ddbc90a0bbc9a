//! Session reaper background task

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};

use crate::state::{AppState, SessionEvent};

/// Background task that clears sessions whose last step was finished.
///
/// The completion callback only emits an event; the session is dropped
/// here, outside of any runner call, which cancels its schedules.
pub async fn session_reaper_task(state: Arc<AppState>) {
    info!("Starting session reaper task");

    let mut event_rx = state.event_tx.subscribe();

    loop {
        match event_rx.recv().await {
            Ok(SessionEvent::Completed { session_id }) => {
                match state.end_session_if(session_id) {
                    Ok(true) => info!("Cleared completed session {}", session_id),
                    Ok(false) => debug!("Completed session {} was already replaced", session_id),
                    Err(e) => error!("Failed to clear session {}: {}", session_id, e),
                }
            }
            Ok(SessionEvent::StepExpired { session_id, step_index }) => {
                debug!("Session {} step {} expired", session_id, step_index + 1);
            }
            Ok(event) => {
                debug!("Reaper received session event: {:?}", event);
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Reaper lagged behind, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Session event channel closed, stopping reaper");
                break;
            }
        }
    }
}
