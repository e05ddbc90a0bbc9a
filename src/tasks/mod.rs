//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod session_reaper;

// Re-export main functions
pub use session_reaper::session_reaper_task;
