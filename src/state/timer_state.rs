//! Timer state structure and display helpers

use serde::{Deserialize, Serialize};

/// Lifecycle phase of the current step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Timer stopped with the full duration remaining
    Idle,
    Running,
    /// Stopped mid-countdown, time preserved
    Paused,
    /// Countdown reached zero (or the step has no duration)
    Expired,
    /// Terminal: the last step was finished
    Completed,
}

/// Display state published to the host on every change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    pub step_index: usize,
    pub step_count: usize,
    pub remaining_seconds: u64,
    pub is_running: bool,
    pub is_expired: bool,
    /// The repeated expiry alert is active
    pub alerting: bool,
    pub completed: bool,
}

impl TimerState {
    /// Remaining time as `MM:SS`
    pub fn clock(&self) -> String {
        format_clock(self.remaining_seconds)
    }

    pub fn is_last_step(&self) -> bool {
        self.step_index + 1 >= self.step_count
    }
}

/// Format seconds as zero-padded `MM:SS`; minutes grow past 99 as needed
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
