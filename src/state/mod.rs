//! State management module
//!
//! This module contains the timer state, the pure step transitions, and
//! the shared state of the HTTP host.

pub mod app_state;
pub mod step_machine;
pub mod timer_state;

// Re-export main types
pub use app_state::{ActiveSession, AppState, SessionEvent};
pub use step_machine::{Effect, StepMachine};
pub use timer_state::{format_clock, Phase, TimerState};
