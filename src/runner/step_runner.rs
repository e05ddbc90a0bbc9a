//! Step runner: drives one recipe session with a per-step countdown

use std::{
    ops::ControlFlow,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    recipe::{Recipe, Step},
    state::{Effect, Phase, StepMachine, TimerState},
};
use super::{notifier::Notifier, schedule::Schedule};

/// Countdown tick and alert pulse period
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Invoked with no arguments when the user finishes the last step
pub type CompletionCallback = Box<dyn FnOnce() + Send + 'static>;

/// Owns one cooking session: current step, countdown and alerts.
///
/// All transitions go through the session lock. Schedules capture the
/// epoch they were created in and drop out as soon as it changes, so a
/// tick from a previous step can never touch the current one. Dropping
/// the runner cancels every schedule.
pub struct StepRunner {
    inner: Arc<Inner>,
}

struct Inner {
    recipe: Recipe,
    notifier: Arc<dyn Notifier>,
    session: Mutex<Session>,
    state_tx: watch::Sender<TimerState>,
}

struct Session {
    machine: StepMachine,
    tick: Option<Schedule>,
    alert: Option<Schedule>,
    tick_epoch: u64,
    alert_epoch: u64,
    on_complete: Option<CompletionCallback>,
}

/// Side effects run after the session lock is released
enum Notice {
    StepExpired(usize),
    RecipeComplete,
    Finished(CompletionCallback),
}

impl StepRunner {
    /// Create a runner positioned on the first step.
    ///
    /// A recipe without steps signals completion immediately.
    pub fn new(recipe: Recipe, notifier: Arc<dyn Notifier>, on_complete: CompletionCallback) -> Self {
        let machine = StepMachine::new(recipe.durations());
        let (state_tx, _) = watch::channel(machine.timer_state());
        let empty = machine.is_completed();

        info!("Starting step runner for '{}' ({} steps)", recipe.title, recipe.step_count());

        let inner = Arc::new(Inner {
            recipe,
            notifier,
            session: Mutex::new(Session {
                machine,
                tick: None,
                alert: None,
                tick_epoch: 0,
                alert_epoch: 0,
                on_complete: Some(on_complete),
            }),
            state_tx,
        });

        if empty {
            warn!("Recipe '{}' has no steps, completing immediately", inner.recipe.title);
            let callback = inner.lock().on_complete.take();
            if let Some(callback) = callback {
                callback();
            }
        }

        Self { inner }
    }

    pub fn recipe(&self) -> &Recipe {
        &self.inner.recipe
    }

    /// Step currently displayed, if the recipe has any
    pub fn current_step(&self) -> Option<&Step> {
        let index = self.inner.lock().machine.step_index();
        self.inner.recipe.step(index)
    }

    /// Current display state
    pub fn state(&self) -> TimerState {
        self.inner.lock().machine.timer_state()
    }

    pub fn phase(&self) -> Phase {
        self.inner.lock().machine.phase()
    }

    /// Watch every display state change
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.inner.state_tx.subscribe()
    }

    /// Start or resume the countdown. Outside a Tokio runtime no countdown
    /// can be scheduled and the step is left paused with its time intact.
    pub fn start(&self) -> TimerState {
        self.inner.apply("start", StepMachine::start)
    }

    pub fn pause(&self) -> TimerState {
        self.inner.apply("pause", StepMachine::pause)
    }

    /// Pause when running, otherwise behave like [`start`](Self::start)
    pub fn toggle(&self) -> TimerState {
        self.inner.apply("toggle", StepMachine::toggle)
    }

    pub fn reset(&self) -> TimerState {
        self.inner.apply("reset", StepMachine::reset)
    }

    pub fn next(&self) -> TimerState {
        self.inner.apply("next", StepMachine::next)
    }

    pub fn previous(&self) -> TimerState {
        self.inner.apply("previous", StepMachine::previous)
    }

    /// Whether a countdown or alert schedule is currently held
    pub fn has_active_schedules(&self) -> bool {
        let session = self.inner.lock();
        session.tick.is_some() || session.alert.is_some()
    }

    /// Cancel every schedule. The session stays readable afterwards.
    pub fn teardown(&self) {
        let mut session = self.inner.lock();
        let had_work = session.tick.is_some() || session.alert.is_some();
        Inner::stop_ticking(&mut session);
        Inner::stop_alert(&mut session);
        if had_work {
            debug!("Step runner for '{}' torn down", self.inner.recipe.title);
        }
    }
}

impl Drop for StepRunner {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for StepRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepRunner")
            .field("recipe", &self.inner.recipe.title)
            .field("state", &self.state())
            .finish()
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Single dispatch point: run a transition, apply its effects, then
    /// publish the new state and fire notifications outside the lock.
    fn apply<F>(self: &Arc<Self>, action: &str, transition: F) -> TimerState
    where
        F: FnOnce(&mut StepMachine) -> Vec<Effect>,
    {
        let (state, notices) = {
            let mut session = self.lock();
            let effects = transition(&mut session.machine);
            if !effects.is_empty() {
                debug!("{} -> {:?}", action, effects);
            }
            let notices = self.run_effects(&mut session, effects);
            (session.machine.timer_state(), notices)
        };

        self.publish(&state);
        self.deliver(notices);
        state
    }

    fn run_effects(self: &Arc<Self>, session: &mut Session, effects: Vec<Effect>) -> Vec<Notice> {
        let mut notices = Vec::new();
        for effect in effects {
            match effect {
                Effect::StartTicking => {
                    if !self.start_ticking(session) {
                        // Nothing would count down; keep the remaining time instead
                        session.machine.pause();
                    }
                }
                Effect::StopTicking => Self::stop_ticking(session),
                Effect::StartAlert => self.start_alert(session),
                Effect::StopAlert => Self::stop_alert(session),
                Effect::StepExpired { step_index } => notices.push(Notice::StepExpired(step_index)),
                Effect::StepChanged { step_index } => {
                    info!("Now on step {} of {}", step_index + 1, self.recipe.step_count());
                }
                Effect::RecipeComplete => {
                    notices.push(Notice::RecipeComplete);
                    if let Some(callback) = session.on_complete.take() {
                        notices.push(Notice::Finished(callback));
                    }
                }
            }
        }
        notices
    }

    fn start_ticking(self: &Arc<Self>, session: &mut Session) -> bool {
        Self::stop_ticking(session);
        let epoch = session.tick_epoch;
        let weak = Arc::downgrade(self);
        session.tick = Schedule::every("countdown", TICK_PERIOD, TICK_PERIOD, move || {
            Self::on_tick(&weak, epoch)
        });
        session.tick.is_some()
    }

    fn stop_ticking(session: &mut Session) {
        session.tick_epoch += 1;
        if let Some(schedule) = session.tick.take() {
            schedule.cancel();
        }
    }

    fn start_alert(self: &Arc<Self>, session: &mut Session) {
        if session.alert.is_some() {
            return;
        }
        let epoch = session.alert_epoch;
        let weak = Arc::downgrade(self);
        session.alert = Schedule::every("expiry alert", Duration::ZERO, TICK_PERIOD, move || {
            Self::on_alert_pulse(&weak, epoch)
        });
    }

    fn stop_alert(session: &mut Session) {
        session.alert_epoch += 1;
        if let Some(schedule) = session.alert.take() {
            schedule.cancel();
        }
    }

    fn on_tick(weak: &Weak<Self>, epoch: u64) -> ControlFlow<()> {
        let Some(inner) = weak.upgrade() else {
            return ControlFlow::Break(());
        };

        let (state, notices, keep_going) = {
            let mut session = inner.lock();
            if session.tick_epoch != epoch {
                debug!("Discarding stale tick from epoch {}", epoch);
                return ControlFlow::Break(());
            }
            let effects = session.machine.tick();
            let notices = inner.run_effects(&mut session, effects);
            let keep_going = session.tick_epoch == epoch;
            (session.machine.timer_state(), notices, keep_going)
        };

        debug!("Tick: step {} has {}s left", state.step_index + 1, state.remaining_seconds);
        inner.publish(&state);
        inner.deliver(notices);

        if keep_going {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    }

    fn on_alert_pulse(weak: &Weak<Self>, epoch: u64) -> ControlFlow<()> {
        let Some(inner) = weak.upgrade() else {
            return ControlFlow::Break(());
        };

        let step_index = {
            let session = inner.lock();
            if session.alert_epoch != epoch {
                return ControlFlow::Break(());
            }
            session.machine.step_index()
        };

        inner.notifier.alert_pulse(step_index);
        ControlFlow::Continue(())
    }

    fn publish(&self, state: &TimerState) {
        self.state_tx.send_if_modified(|current| {
            if current == state {
                false
            } else {
                *current = state.clone();
                true
            }
        });
    }

    fn deliver(&self, notices: Vec<Notice>) {
        for notice in notices {
            match notice {
                Notice::StepExpired(step_index) => self.notifier.step_expired(step_index),
                Notice::RecipeComplete => self.notifier.recipe_complete(&self.recipe.title),
                Notice::Finished(callback) => callback(),
            }
        }
    }
}
