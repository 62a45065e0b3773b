//! Fire-once completion timers
//!
//! Each armed job gets its own tokio task which sleeps on the shared clock
//! and then invokes its completion callback exactly once. Arming never
//! blocks and there is no way to cancel an armed timer; outstanding timers
//! are abandoned when the runtime shuts down.

use crate::clock::Clock;
use crate::models::JobId;
use chrono::{DateTime, Duration, Utc};
use std::future::Future;
use std::sync::Arc;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

/// Arranges delayed completion callbacks for jobs
#[derive(Clone)]
pub struct CompletionScheduler {
    clock: Arc<dyn Clock>,
    timers: TaskTracker,
}

impl CompletionScheduler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            timers: TaskTracker::new(),
        }
    }

    /// Arm a timer that calls `on_fire(job_id, fired_at)` once `delay` has
    /// elapsed
    ///
    /// The deadline is fixed at arm time, so `fired_at` is never earlier than
    /// arm time plus `delay`. Must be called from within a tokio runtime.
    pub fn arm<F, Fut>(&self, job_id: JobId, delay: std::time::Duration, on_fire: F)
    where
        F: FnOnce(JobId, DateTime<Utc>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let delay = Duration::from_std(delay).unwrap_or(Duration::MAX);
        let deadline = self
            .clock
            .now()
            .checked_add_signed(delay)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let clock = self.clock.clone();

        debug!("Armed completion timer for job {} (due {})", job_id, deadline);

        self.timers.spawn(async move {
            clock.sleep_until(deadline).await;
            let fired_at = clock.now();
            on_fire(job_id, fired_at).await;
        });
    }

    /// Number of timers armed but not yet finished
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Report the timers left behind at shutdown
    ///
    /// Nothing is cancelled; timers keep running until the runtime itself
    /// goes away.
    pub fn abandon(&self) -> usize {
        self.timers.close();
        let pending = self.timers.len();
        if pending > 0 {
            info!("Abandoning {} pending completion timer(s) on shutdown", pending);
        }
        pending
    }

    /// Wait until every armed timer has fired
    ///
    /// Only meaningful once the caller knows no further timers will be armed.
    pub async fn wait_idle(&self) {
        self.timers.close();
        self.timers.wait().await;
        self.timers.reopen();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::Mutex;
    use std::time::Duration as StdDuration;

    async fn settle(scheduler: &CompletionScheduler) {
        for _ in 0..100 {
            if scheduler.pending() == 0 {
                return;
            }
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_fires_once_at_or_after_deadline() {
        let clock = Arc::new(ManualClock::default());
        let scheduler = CompletionScheduler::new(clock.clone());
        let fired: Arc<Mutex<Vec<(JobId, DateTime<Utc>)>>> = Arc::default();
        let armed_at = clock.now();

        let sink = fired.clone();
        scheduler.arm(JobId(1), StdDuration::from_secs(2), move |id, at| async move {
            sink.lock().unwrap().push((id, at));
        });
        assert_eq!(scheduler.pending(), 1);

        clock.advance(Duration::seconds(1));
        settle(&scheduler).await;
        assert!(fired.lock().unwrap().is_empty());

        clock.advance(Duration::seconds(1));
        settle(&scheduler).await;
        assert_eq!(scheduler.pending(), 0);

        let fired = fired.lock().unwrap();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].0, JobId(1));
        assert!(fired[0].1 >= armed_at + Duration::seconds(2));
    }

    #[tokio::test]
    async fn test_many_timers_fire_independently() {
        let clock = Arc::new(ManualClock::default());
        let scheduler = CompletionScheduler::new(clock.clone());
        let fired: Arc<Mutex<Vec<JobId>>> = Arc::default();

        for (id, delay) in [(1, 30), (2, 10), (3, 20)] {
            let sink = fired.clone();
            scheduler.arm(JobId(id), StdDuration::from_secs(delay), move |id, _| async move {
                sink.lock().unwrap().push(id);
            });
        }

        for step in [10, 10, 10] {
            clock.advance(Duration::seconds(step));
            for _ in 0..20 {
                tokio::task::yield_now().await;
            }
        }
        settle(&scheduler).await;

        assert_eq!(*fired.lock().unwrap(), vec![JobId(2), JobId(3), JobId(1)]);
    }

    #[tokio::test]
    async fn test_wait_idle_with_system_clock() {
        let scheduler = CompletionScheduler::new(Arc::new(crate::clock::SystemClock::new()));
        let fired: Arc<Mutex<u32>> = Arc::default();

        let sink = fired.clone();
        scheduler.arm(JobId(5), StdDuration::from_millis(20), move |_, _| async move {
            *sink.lock().unwrap() += 1;
        });

        scheduler.wait_idle().await;
        assert_eq!(*fired.lock().unwrap(), 1);
        assert_eq!(scheduler.pending(), 0);
    }
}
