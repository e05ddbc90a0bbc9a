//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use tracing::{error, info, warn};

use crate::{
    recipe::CatalogEntry,
    runner::StepRunner,
    state::{AppState, TimerState},
};
use super::responses::{
    BeginSessionRequest, EndSessionResponse, HealthResponse, RecipeQuery, RecipeSummary, SessionStatus,
};

type SessionResult = Result<Json<SessionStatus>, StatusCode>;

/// Handle GET /recipes - List recipes, optionally searched and filtered by category
pub async fn list_recipes_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecipeQuery>,
) -> Json<Vec<RecipeSummary>> {
    let matches = state.catalog.search(
        query.q.as_deref().unwrap_or_default(),
        query.category.as_deref().unwrap_or_default(),
    );
    Json(matches.into_iter().map(RecipeSummary::from).collect())
}

/// Handle GET /categories - Category names for the listing filter
pub async fn list_categories_handler(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.catalog.categories())
}

/// Handle GET /recipes/:id - One recipe with all its steps
pub async fn get_recipe_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CatalogEntry>, StatusCode> {
    state.catalog.get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Handle POST /session - Begin a session, replacing any active one
pub async fn begin_session_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BeginSessionRequest>,
) -> SessionResult {
    match state.begin_session_with(&request.recipe_id, SessionStatus::from_session) {
        Ok(Some(status)) => {
            info!("Session {} begun for {}", status.session_id, request.recipe_id);
            Ok(Json(status))
        }
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to begin session: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /session - Current session status
pub async fn session_status_handler(State(state): State<Arc<AppState>>) -> SessionResult {
    session_status(&state)
}

/// Handle DELETE /session - Exit the session and cancel its timers
pub async fn end_session_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<EndSessionResponse>, StatusCode> {
    match state.end_session() {
        Ok(Some(session_id)) => Ok(Json(EndSessionResponse::ended(session_id))),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to end session: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /session/next - Next step, or finish on the last one
pub async fn next_handler(State(state): State<Arc<AppState>>) -> SessionResult {
    drive(&state, "next", StepRunner::next)
}

/// Handle POST /session/previous - Previous step
pub async fn previous_handler(State(state): State<Arc<AppState>>) -> SessionResult {
    drive(&state, "previous", StepRunner::previous)
}

/// Handle POST /session/timer/start
pub async fn start_timer_handler(State(state): State<Arc<AppState>>) -> SessionResult {
    drive(&state, "start", StepRunner::start)
}

/// Handle POST /session/timer/pause
pub async fn pause_timer_handler(State(state): State<Arc<AppState>>) -> SessionResult {
    drive(&state, "pause", StepRunner::pause)
}

/// Handle POST /session/timer/toggle - Start or pause
pub async fn toggle_timer_handler(State(state): State<Arc<AppState>>) -> SessionResult {
    drive(&state, "toggle", StepRunner::toggle)
}

/// Handle POST /session/timer/reset
pub async fn reset_timer_handler(State(state): State<Arc<AppState>>) -> SessionResult {
    drive(&state, "reset", StepRunner::reset)
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.get_uptime(),
        active_session: state.active_session_id(),
        last_action,
        last_action_time,
    })
}

/// Forward a user intent to the active runner and report the result
fn drive(state: &AppState, action: &str, intent: fn(&StepRunner) -> TimerState) -> SessionResult {
    let result = state.with_session(action, |session| {
        intent(&session.runner);
        SessionStatus::from_session(session)
    });

    match result {
        Ok(Some(status)) => Ok(Json(status)),
        Ok(None) => {
            warn!("'{}' requested without an active session", action);
            Err(StatusCode::NOT_FOUND)
        }
        Err(e) => {
            error!("Failed to apply '{}': {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn session_status(state: &AppState) -> SessionResult {
    match state.inspect_session(SessionStatus::from_session) {
        Ok(Some(status)) => Ok(Json(status)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to read session: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
