//! Time source shared by the registry, the completion scheduler and the
//! status views.
//!
//! Production code uses [`SystemClock`]. Tests drive time explicitly with
//! [`ManualClock`], which only moves when advanced and wakes any sleeper whose
//! deadline has been reached.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;

/// Wall-clock reads plus delayed wake-ups
#[async_trait]
pub trait Clock: Send + Sync + 'static {
    /// Current wall-clock time
    fn now(&self) -> DateTime<Utc>;

    /// Suspend the calling task until `deadline` has been reached
    async fn sleep_until(&self, deadline: DateTime<Utc>);
}

/// Clock backed by `Utc::now` and tokio timers
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep_until(&self, deadline: DateTime<Utc>) {
        // A deadline already in the past yields a zero-length sleep.
        let remaining = (deadline - Utc::now()).to_std().unwrap_or_default();
        tokio::time::sleep(remaining).await;
    }
}

/// Clock whose time only changes through [`ManualClock::advance`] or
/// [`ManualClock::set`]
#[derive(Debug)]
pub struct ManualClock {
    now: watch::Sender<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`
    pub fn new(start: DateTime<Utc>) -> Self {
        let (now, _) = watch::channel(start);
        Self { now }
    }

    /// Move time forward, waking every sleeper whose deadline is now due
    pub fn advance(&self, by: Duration) {
        self.now.send_modify(|now| *now += by);
    }

    /// Jump to an absolute instant
    pub fn set(&self, at: DateTime<Utc>) {
        self.now.send_replace(at);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.borrow()
    }

    async fn sleep_until(&self, deadline: DateTime<Utc>) {
        let mut rx = self.now.subscribe();
        loop {
            if *rx.borrow_and_update() >= deadline {
                return;
            }
            // The sender lives as long as the clock, which outlives its sleepers.
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}
