//! End-to-end behaviour of a step runner on Tokio's paused clock
//!
//! Every test runs with `start_paused = true`, so sleeping advances the
//! virtual clock straight to the next scheduled tick.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use cook_flow::{Notifier, Recipe, Step, StepRunner};
use tokio::time::sleep;

// ─── Test Notifier ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Alert {
    Expired(usize),
    Pulse(usize),
    Complete(String),
    Finished,
}

/// Records every alert and the completion callback in order
#[derive(Default)]
struct Recorder {
    alerts: Mutex<Vec<Alert>>,
}

impl Recorder {
    fn push(&self, alert: Alert) {
        self.alerts.lock().unwrap().push(alert);
    }

    fn count(&self, wanted: fn(&Alert) -> bool) -> usize {
        self.alerts.lock().unwrap().iter().filter(|a| wanted(a)).count()
    }

    fn expiries(&self) -> usize {
        self.count(|a| matches!(a, Alert::Expired(_)))
    }

    fn pulses(&self) -> usize {
        self.count(|a| matches!(a, Alert::Pulse(_)))
    }

    fn finishes(&self) -> usize {
        self.count(|a| matches!(a, Alert::Finished))
    }
}

impl Notifier for Recorder {
    fn step_expired(&self, step_index: usize) {
        self.push(Alert::Expired(step_index));
    }

    fn alert_pulse(&self, step_index: usize) {
        self.push(Alert::Pulse(step_index));
    }

    fn recipe_complete(&self, title: &str) {
        self.push(Alert::Complete(title.to_string()));
    }
}

fn recipe(durations: &[u64]) -> Recipe {
    let steps = durations
        .iter()
        .enumerate()
        .map(|(i, secs)| Step::new(i as u32 + 1, format!("Step {}", i + 1), "https://example.com/step.png", *secs))
        .collect();
    Recipe::new("Scenario", steps, "#f96163")
}

fn runner_for(durations: &[u64]) -> (StepRunner, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let on_complete = Arc::clone(&recorder);
    let runner = StepRunner::new(
        recipe(durations),
        Arc::clone(&recorder) as Arc<dyn Notifier>,
        Box::new(move || on_complete.push(Alert::Finished)),
    );
    (runner, recorder)
}

async fn advance(millis: u64) {
    sleep(Duration::from_millis(millis)).await;
}

// ─── Navigation ───────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn visits_every_step_in_order_before_completing() {
    for n in 1..=6usize {
        let durations: Vec<u64> = (0..n as u64).map(|i| i * 2).collect();
        let (runner, recorder) = runner_for(&durations);

        let mut visited = vec![runner.state().step_index];
        for _ in 0..n {
            let state = runner.next();
            if !state.completed {
                visited.push(state.step_index);
            }
        }

        assert_eq!(visited, (0..n).collect::<Vec<_>>());
        assert_eq!(recorder.finishes(), 1);
        assert!(runner.state().step_index < n);
    }
}

#[tokio::test(start_paused = true)]
async fn previous_at_first_step_is_noop() {
    let (runner, recorder) = runner_for(&[4, 4]);
    let before = runner.state();
    let after = runner.previous();
    assert_eq!(before, after);
    assert!(recorder.alerts.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn previous_at_first_step_stops_the_alert() {
    let (runner, recorder) = runner_for(&[1, 4]);
    runner.start();
    sleep(Duration::from_millis(2_500)).await;
    assert!(runner.state().alerting);
    let pulses = recorder.pulses();

    let state = runner.previous();
    assert_eq!(state.step_index, 0);
    assert!(state.is_expired);
    assert!(!state.alerting);
    assert!(!runner.has_active_schedules());

    sleep(Duration::from_secs(5)).await;
    assert_eq!(recorder.pulses(), pulses);
    assert_eq!(recorder.expiries(), 1);
}

#[tokio::test(start_paused = true)]
async fn next_after_completion_does_not_call_back_again() {
    let (runner, recorder) = runner_for(&[1]);
    runner.next();
    runner.next();
    runner.previous();
    assert_eq!(recorder.finishes(), 1);
    assert_eq!(recorder.count(|a| matches!(a, Alert::Complete(_))), 1);
    assert_eq!(runner.state().step_index, 0);
}

// ─── Countdown ────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn two_step_recipe_scenario() {
    let (runner, recorder) = runner_for(&[3, 5]);

    runner.start();
    advance(3_100).await;
    let state = runner.state();
    assert_eq!(state.remaining_seconds, 0);
    assert!(!state.is_running);
    assert_eq!(recorder.expiries(), 1);

    let state = runner.next();
    assert_eq!(state.step_index, 1);
    assert_eq!(state.remaining_seconds, 5);
    assert!(!state.is_running);

    runner.next();
    assert_eq!(recorder.finishes(), 1);
    assert_eq!(recorder.expiries(), 1);
}

#[tokio::test(start_paused = true)]
async fn zero_duration_single_step_scenario() {
    let (runner, recorder) = runner_for(&[0]);

    runner.start();
    advance(1_000).await;
    assert_eq!(runner.state().remaining_seconds, 0);
    assert_eq!(recorder.expiries(), 0);
    assert_eq!(recorder.pulses(), 0);

    runner.next();
    assert_eq!(recorder.finishes(), 1);
}

#[tokio::test(start_paused = true)]
async fn retreating_while_running_applies_no_leftover_ticks() {
    let (runner, recorder) = runner_for(&[4, 10]);
    runner.next();
    runner.start();
    advance(2_500).await;
    assert_eq!(runner.state().remaining_seconds, 8);

    let state = runner.previous();
    assert_eq!(state.step_index, 0);
    assert_eq!(state.remaining_seconds, 4);

    advance(3_000).await;
    assert_eq!(runner.state().remaining_seconds, 4);

    runner.start();
    advance(1_100).await;
    assert_eq!(runner.state().remaining_seconds, 3);
    advance(1_000).await;
    assert_eq!(runner.state().remaining_seconds, 2);
    assert_eq!(recorder.expiries(), 0);
}

#[tokio::test(start_paused = true)]
async fn repeated_start_does_not_double_tick() {
    let (runner, _) = runner_for(&[10]);
    runner.start();
    runner.start();
    runner.toggle();
    runner.toggle();
    advance(3_100).await;
    assert_eq!(runner.state().remaining_seconds, 7);
}

// ─── Expiry alert ─────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn alert_stops_when_advancing() {
    let (runner, recorder) = runner_for(&[2, 3]);
    runner.start();
    advance(4_100).await;
    // expired at 2s, pulses at 2s, 3s, 4s
    assert_eq!(recorder.pulses(), 3);

    runner.next();
    assert!(!runner.has_active_schedules());
    advance(5_000).await;
    assert_eq!(recorder.pulses(), 3);
}

#[tokio::test(start_paused = true)]
async fn alert_stops_on_reset_and_countdown_can_rerun() {
    let (runner, recorder) = runner_for(&[2]);
    runner.start();
    advance(2_100).await;
    assert!(runner.state().alerting);

    let state = runner.reset();
    assert_eq!(state.remaining_seconds, 2);
    assert!(!state.alerting && !state.is_expired);
    let pulses = recorder.pulses();
    advance(3_000).await;
    assert_eq!(recorder.pulses(), pulses);

    runner.start();
    advance(2_100).await;
    assert_eq!(recorder.expiries(), 2);
}

#[tokio::test(start_paused = true)]
async fn teardown_leaves_no_background_work() {
    let (runner, recorder) = runner_for(&[1, 1]);
    runner.start();
    advance(1_500).await;
    runner.teardown();
    assert!(!runner.has_active_schedules());

    let seen = recorder.alerts.lock().unwrap().len();
    advance(10_000).await;
    assert_eq!(recorder.alerts.lock().unwrap().len(), seen);
}
