//! Cook Flow - step-by-step recipe runner with per-step countdown timers
//!
//! This is the main entry point for the cook-flow server.

use std::sync::Arc;
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use cook_flow::{
    api::create_router,
    config::Config,
    recipe::Catalog,
    state::AppState,
    tasks::session_reaper_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("cook_flow={},tower_http=info", config.log_level()))
        .init();

    info!("Starting cook-flow server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, recipes={:?}",
          config.host, config.port, config.recipes);

    let catalog = Catalog::load(config.recipes.as_deref())
        .context("failed to load recipe catalog")?;
    info!("Serving {} recipes", catalog.len());

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), catalog));

    // Clear sessions once their last step is finished
    let reaper_state = Arc::clone(&state);
    tokio::spawn(async move {
        session_reaper_task(reaper_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /recipes?q=            - List or search recipes");
    info!("  GET    /recipes/:id           - Recipe with steps");
    info!("  POST   /session               - Begin a session {{\"recipe_id\"}}");
    info!("  GET    /session               - Current step and timer");
    info!("  DELETE /session               - Exit the session");
    info!("  POST   /session/next          - Next step / finish");
    info!("  POST   /session/previous      - Previous step");
    info!("  POST   /session/timer/start   - Start the countdown");
    info!("  POST   /session/timer/pause   - Pause the countdown");
    info!("  POST   /session/timer/toggle  - Start or pause");
    info!("  POST   /session/timer/reset   - Reset the countdown");
    info!("  GET    /health                - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Cancel any running timers before exiting
    if let Ok(Some(session_id)) = state.end_session() {
        info!("Ended session {} on shutdown", session_id);
    }

    info!("Server shutdown complete");
    Ok(())
}
