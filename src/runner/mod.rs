//! Step runner module
//!
//! This module drives a cooking session: the runner itself, the owned
//! schedules it ticks with, and the notification surface it alerts through.

pub mod notifier;
pub mod schedule;
pub mod step_runner;

// Re-export main types
pub use notifier::{ChannelNotifier, LogNotifier, Notifier};
pub use schedule::Schedule;
pub use step_runner::{CompletionCallback, StepRunner, TICK_PERIOD};
