//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    recipe::{CatalogEntry, Step},
    state::{ActiveSession, TimerState},
};

/// Catalog listing item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub color: String,
    pub step_count: usize,
    pub total_seconds: u64,
}

impl From<&CatalogEntry> for RecipeSummary {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.id.clone(),
            title: entry.recipe.title.clone(),
            category: entry.category.clone(),
            description: entry.description.clone(),
            color: entry.recipe.color.clone(),
            step_count: entry.recipe.step_count(),
            total_seconds: entry.recipe.total_seconds(),
        }
    }
}

/// Body of `POST /session`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeginSessionRequest {
    pub recipe_id: String,
}

/// Query of `GET /recipes`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeQuery {
    #[serde(default)]
    pub q: Option<String>,
    /// Blank or `All` lists every category
    #[serde(default)]
    pub category: Option<String>,
}

/// Everything a host screen needs to render the current step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    pub session_id: u64,
    pub recipe_id: String,
    pub title: String,
    pub color: String,
    pub step: Option<Step>,
    /// Remaining time as `MM:SS`
    pub clock: String,
    /// The next action finishes the recipe
    pub last_step: bool,
    pub timer: TimerState,
    pub started_at: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}

impl SessionStatus {
    pub fn from_session(session: &ActiveSession) -> Self {
        let runner = &session.runner;
        let timer = runner.state();

        Self {
            session_id: session.id,
            recipe_id: session.recipe_id.clone(),
            title: runner.recipe().title.clone(),
            color: runner.recipe().color.clone(),
            step: runner.current_step().cloned(),
            clock: timer.clock(),
            last_step: timer.is_last_step(),
            timer,
            started_at: session.started_at,
            timestamp: Utc::now(),
        }
    }
}

/// Response to `DELETE /session`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndSessionResponse {
    pub status: String,
    pub session_id: u64,
    pub timestamp: DateTime<Utc>,
}

impl EndSessionResponse {
    pub fn ended(session_id: u64) -> Self {
        Self {
            status: "ended".to_string(),
            session_id,
            timestamp: Utc::now(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime: String,
    pub active_session: Option<u64>,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}
