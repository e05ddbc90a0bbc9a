//! Pure step/timer transitions
//!
//! `StepMachine` holds the session's timer state and turns every user
//! intent or tick into a list of [`Effect`]s. It never touches a clock or
//! a notifier; the step runner executes the effects in order.

use tracing::debug;

use super::timer_state::{Phase, TimerState};

/// Side effect requested by a transition, executed in order by the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Begin the one-second countdown schedule
    StartTicking,
    /// Cancel the countdown schedule if any
    StopTicking,
    /// Begin the repeated expiry alert
    StartAlert,
    /// Cancel the repeated expiry alert if any
    StopAlert,
    /// A running countdown reached zero on this step
    StepExpired { step_index: usize },
    /// The step index changed and the new step was initialized
    StepChanged { step_index: usize },
    /// The last step was finished
    RecipeComplete,
}

/// Timer and navigation state for one recipe session
#[derive(Debug, Clone)]
pub struct StepMachine {
    durations: Vec<u64>,
    index: usize,
    remaining: u64,
    phase: Phase,
    alerting: bool,
}

impl StepMachine {
    /// Create a machine positioned on the first step.
    /// An empty duration list starts out `Completed`.
    pub fn new(durations: Vec<u64>) -> Self {
        let mut machine = Self {
            durations,
            index: 0,
            remaining: 0,
            phase: Phase::Completed,
            alerting: false,
        };
        if !machine.durations.is_empty() {
            machine.enter_step(0);
        }
        machine
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn step_index(&self) -> usize {
        self.index
    }

    pub fn step_count(&self) -> usize {
        self.durations.len()
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining
    }

    pub fn is_alerting(&self) -> bool {
        self.alerting
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    /// Snapshot for display
    pub fn timer_state(&self) -> TimerState {
        TimerState {
            phase: self.phase,
            step_index: self.index,
            step_count: self.step_count(),
            remaining_seconds: self.remaining,
            is_running: self.phase == Phase::Running,
            is_expired: self.phase == Phase::Expired,
            alerting: self.alerting,
            completed: self.phase == Phase::Completed,
        }
    }

    /// Begin or resume the countdown. From `Expired` this only silences the alert.
    pub fn start(&mut self) -> Vec<Effect> {
        match self.phase {
            Phase::Idle | Phase::Paused if self.remaining > 0 => {
                self.phase = Phase::Running;
                vec![Effect::StartTicking]
            }
            Phase::Expired => self.silence(),
            _ => Vec::new(),
        }
    }

    /// Stop the countdown keeping the remaining time. From `Expired` this silences the alert.
    pub fn pause(&mut self) -> Vec<Effect> {
        match self.phase {
            Phase::Running => {
                self.phase = Phase::Paused;
                vec![Effect::StopTicking]
            }
            Phase::Expired => self.silence(),
            _ => Vec::new(),
        }
    }

    pub fn toggle(&mut self) -> Vec<Effect> {
        if self.phase == Phase::Running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Restore the full duration of the current step and stop everything
    pub fn reset(&mut self) -> Vec<Effect> {
        if self.is_completed() {
            return Vec::new();
        }
        self.enter_step(self.index);
        vec![Effect::StopTicking, Effect::StopAlert]
    }

    /// Advance one step, or complete the recipe from the last step
    pub fn next(&mut self) -> Vec<Effect> {
        if self.is_completed() {
            return Vec::new();
        }

        let mut effects = vec![Effect::StopTicking, Effect::StopAlert];
        if self.index + 1 >= self.durations.len() {
            self.phase = Phase::Completed;
            self.alerting = false;
            effects.push(Effect::RecipeComplete);
        } else {
            self.enter_step(self.index + 1);
            effects.push(Effect::StepChanged { step_index: self.index });
        }
        effects
    }

    /// Go back one step. On the first step this only silences the alert.
    pub fn previous(&mut self) -> Vec<Effect> {
        if self.is_completed() {
            return Vec::new();
        }
        if self.index == 0 {
            return self.silence();
        }

        self.enter_step(self.index - 1);
        vec![
            Effect::StopTicking,
            Effect::StopAlert,
            Effect::StepChanged { step_index: self.index },
        ]
    }

    /// One second elapsed on the countdown. Ignored unless running.
    pub fn tick(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Running {
            return Vec::new();
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return Vec::new();
        }

        self.phase = Phase::Expired;
        let mut effects = vec![Effect::StopTicking, Effect::StepExpired { step_index: self.index }];
        if !self.alerting {
            self.alerting = true;
            effects.push(Effect::StartAlert);
        }
        effects
    }

    fn silence(&mut self) -> Vec<Effect> {
        if self.alerting {
            self.alerting = false;
            vec![Effect::StopAlert]
        } else {
            Vec::new()
        }
    }

    /// Zero-duration steps are expired on entry without alerting
    fn enter_step(&mut self, index: usize) {
        self.index = index;
        self.remaining = self.durations[index];
        self.alerting = false;
        self.phase = if self.remaining == 0 { Phase::Expired } else { Phase::Idle };
        debug!("Entered step {} with {}s ({:?})", index, self.remaining, self.phase);
    }
}
