//! Cancellable repeating schedules

use std::{ops::ControlFlow, time::Duration};
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, warn};

/// Owned handle to a task that runs an action every `period` until
/// cancelled. Dropping the handle cancels the task.
#[derive(Debug)]
pub struct Schedule {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl Schedule {
    /// Spawn a schedule on the current Tokio runtime whose first run
    /// happens after `first_delay`. The action stops the schedule by
    /// returning `ControlFlow::Break`.
    ///
    /// Returns `None` when called outside a runtime.
    pub fn every<F>(name: &'static str, first_delay: Duration, period: Duration, mut action: F) -> Option<Self>
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!("Cannot schedule {}: {}", name, e);
                return None;
            }
        };

        debug!("Scheduling {} every {:?}", name, period);
        let handle = runtime.spawn(async move {
            let mut interval = interval_at(Instant::now() + first_delay, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if action().is_break() {
                    debug!("{} schedule finished", name);
                    break;
                }
            }
        });

        Some(Self { name, handle })
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop the schedule; it will not run its action again
    pub fn cancel(self) {
        debug!("Cancelling {} schedule", self.name);
    }
}

impl Drop for Schedule {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use tokio::time::sleep;

    fn counting(counter: &Arc<AtomicUsize>) -> impl FnMut() -> ControlFlow<()> + Send + 'static {
        let counter = Arc::clone(counter);
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            ControlFlow::Continue(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn runs_once_per_period_after_first_delay() {
        let counter = Arc::new(AtomicUsize::new(0));
        let _schedule = Schedule::every("test", Duration::from_secs(1), Duration::from_secs(1), counting(&counter));

        sleep(Duration::from_millis(500)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        sleep(Duration::from_millis(3000)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_first_delay_runs_immediately() {
        let counter = Arc::new(AtomicUsize::new(0));
        let _schedule = Schedule::every("test", Duration::ZERO, Duration::from_secs(1), counting(&counter));

        sleep(Duration::from_millis(100)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_further_runs() {
        let counter = Arc::new(AtomicUsize::new(0));
        let schedule = Schedule::every("test", Duration::from_secs(1), Duration::from_secs(1), counting(&counter)).unwrap();

        sleep(Duration::from_millis(1500)).await;
        schedule.cancel();
        sleep(Duration::from_secs(5)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn break_ends_the_task() {
        let counter = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&counter);
        let schedule = Schedule::every("test", Duration::ZERO, Duration::from_secs(1), move || {
            if inner.fetch_add(1, Ordering::SeqCst) == 1 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap();

        sleep(Duration::from_secs(5)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert!(schedule.is_finished());
    }

    #[test]
    fn nothing_is_scheduled_without_a_runtime() {
        let counter = Arc::new(AtomicUsize::new(0));
        let schedule = Schedule::every("test", Duration::ZERO, Duration::from_secs(1), counting(&counter));
        assert!(schedule.is_none());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
