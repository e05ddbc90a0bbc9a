//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/recipes", get(list_recipes_handler))
        .route("/recipes/:id", get(get_recipe_handler))
        .route("/categories", get(list_categories_handler))
        .route(
            "/session",
            get(session_status_handler)
                .post(begin_session_handler)
                .delete(end_session_handler),
        )
        .route("/session/next", post(next_handler))
        .route("/session/previous", post(previous_handler))
        .route("/session/timer/start", post(start_timer_handler))
        .route("/session/timer/pause", post(pause_timer_handler))
        .route("/session/timer/toggle", post(toggle_timer_handler))
        .route("/session/timer/reset", post(reset_timer_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
