//! Cook Flow - step-by-step recipe runner with per-step countdown timers
//!
//! The core is [`runner::StepRunner`], which walks a user through a
//! recipe's steps, counts each one down, alerts on expiry and signals
//! completion. The HTTP API and recipe catalog host it.

pub mod config;
pub mod recipe;
pub mod state;
pub mod runner;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use recipe::{Catalog, Recipe, Step};
pub use runner::{Notifier, StepRunner};
pub use state::{AppState, TimerState};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
