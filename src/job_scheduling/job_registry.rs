//! Bounded in-memory job registry with sequential ID issuance

use crate::clock::Clock;
use crate::errors::{JobError, JobResult};
use crate::models::{Job, JobId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Table, insertion order and ID counter, always mutated together
#[derive(Debug)]
struct RegistryState {
    jobs: HashMap<JobId, Job>,
    /// IDs in creation order; the front is the oldest surviving job
    order: VecDeque<JobId>,
    next_id: u64,
}

/// Authoritative store of retained jobs and issuer of job IDs
///
/// Every operation holds the single registry lock for its full duration, so
/// callers never observe a half-applied create or completion.
pub struct JobRegistry {
    state: Mutex<RegistryState>,
    max_history: usize,
    max_delay_seconds: Option<u64>,
    clock: Arc<dyn Clock>,
}

impl JobRegistry {
    /// Create an empty registry retaining at most `max_history` jobs
    ///
    /// `max_delay_seconds` optionally caps the accepted delay.
    pub fn new(max_history: usize, max_delay_seconds: Option<u64>, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(RegistryState {
                jobs: HashMap::new(),
                order: VecDeque::new(),
                next_id: 1,
            }),
            max_history: max_history.max(1),
            max_delay_seconds,
            clock,
        }
    }

    /// Register a new job and return its ID
    ///
    /// Rejects delays below one second, or above the configured cap when one
    /// is set, before touching any state. Creating past capacity evicts the oldest
    /// jobs by creation order.
    pub async fn create(&self, name: impl Into<String>, delay_seconds: i64) -> JobResult<JobId> {
        let total_delay_seconds = u64::try_from(delay_seconds)
            .ok()
            .filter(|delay| *delay >= 1)
            .filter(|delay| self.max_delay_seconds.is_none_or(|max| *delay <= max))
            .ok_or(JobError::InvalidDelay { delay_seconds })?;
        let name = name.into();

        let mut state = self.state.lock().await;
        let id = JobId(state.next_id);
        state.next_id += 1;

        let job = Job::new(id, name, self.clock.now(), total_delay_seconds);
        state.jobs.insert(id, job);
        state.order.push_back(id);

        while state.order.len() > self.max_history {
            if let Some(oldest) = state.order.pop_front() {
                state.jobs.remove(&oldest);
                debug!("Evicted job {} from history", oldest);
            }
        }

        Ok(id)
    }

    /// Snapshot of a single job
    pub async fn get(&self, id: JobId) -> JobResult<Job> {
        self.state
            .lock()
            .await
            .jobs
            .get(&id)
            .cloned()
            .ok_or(JobError::NotFound { id })
    }

    /// Snapshot of every retained job, oldest first
    pub async fn list(&self) -> Vec<Job> {
        let state = self.state.lock().await;
        state
            .order
            .iter()
            .filter_map(|id| state.jobs.get(id).cloned())
            .collect()
    }

    /// The last `limit` retained jobs in creation order
    pub async fn recent(&self, limit: usize) -> Vec<Job> {
        let state = self.state.lock().await;
        let skip = state.order.len().saturating_sub(limit);
        state
            .order
            .iter()
            .skip(skip)
            .filter_map(|id| state.jobs.get(id).cloned())
            .collect()
    }

    /// Record completion of a job
    ///
    /// Returns `false` without changing anything when the job is unknown,
    /// evicted, or already completed; the first completion time sticks.
    pub async fn mark_completed(&self, id: JobId, completed_at: DateTime<Utc>) -> bool {
        let mut state = self.state.lock().await;
        match state.jobs.get_mut(&id) {
            Some(job) if !job.completed => {
                job.completed = true;
                job.completed_at = Some(completed_at);
                true
            }
            _ => false,
        }
    }

    pub async fn stats(&self) -> RegistryStats {
        let state = self.state.lock().await;
        RegistryStats {
            retained: state.jobs.len(),
            completed: state.jobs.values().filter(|job| job.completed).count(),
            next_id: state.next_id,
            max_history: self.max_history,
        }
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }
}

/// Counters describing the registry state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    /// Jobs currently held in history
    pub retained: usize,
    /// Retained jobs whose completion callback has fired
    pub completed: usize,
    /// ID the next created job will receive
    pub next_id: u64,
    pub max_history: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::Duration;

    fn registry_with_clock(max_history: usize) -> (JobRegistry, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let registry = JobRegistry::new(max_history, None, clock.clone());
        (registry, clock)
    }

    #[tokio::test]
    async fn test_create_issues_sequential_ids() {
        let (registry, clock) = registry_with_clock(10);

        let first = registry.create("first", 5).await.unwrap();
        let second = registry.create("second", 5).await.unwrap();
        assert_eq!(first, JobId(1));
        assert_eq!(second, JobId(2));

        let job = registry.get(first).await.unwrap();
        assert_eq!(job.name, "first");
        assert_eq!(job.total_delay_seconds, 5);
        assert_eq!(job.created_at, clock.now());
        assert!(!job.completed);
        assert!(job.completed_at.is_none());
    }

    #[tokio::test]
    async fn test_invalid_delay_leaves_state_untouched() {
        let (registry, _clock) = registry_with_clock(10);

        for delay in [0, -1, i64::MIN] {
            let err = registry.create("bad", delay).await.unwrap_err();
            assert_eq!(err, JobError::InvalidDelay { delay_seconds: delay });
        }

        let stats = registry.stats().await;
        assert_eq!(stats.retained, 0);
        assert_eq!(stats.next_id, 1);
        assert_eq!(registry.create("good", 1).await.unwrap(), JobId(1));
    }

    #[tokio::test]
    async fn test_long_delays_accepted_without_cap() {
        let (registry, _clock) = registry_with_clock(10);

        let id = registry.create("long", 400 * 86_400).await.unwrap();
        assert_eq!(registry.get(id).await.unwrap().total_delay_seconds, 34_560_000);

        let id = registry.create("forever", i64::MAX).await.unwrap();
        assert_eq!(
            registry.get(id).await.unwrap().total_delay_seconds,
            i64::MAX as u64
        );
    }

    #[tokio::test]
    async fn test_configured_cap_rejects_longer_delays() {
        let registry = JobRegistry::new(10, Some(60), Arc::new(ManualClock::default()));

        assert!(registry.create("at cap", 60).await.is_ok());
        assert_eq!(
            registry.create("over cap", 61).await.unwrap_err(),
            JobError::InvalidDelay { delay_seconds: 61 }
        );
        assert_eq!(registry.stats().await.retained, 1);
    }

    #[tokio::test]
    async fn test_eviction_keeps_most_recent_jobs() {
        let (registry, _clock) = registry_with_clock(10);

        for i in 0..12 {
            registry.create(format!("job-{i}"), 30).await.unwrap();
        }

        let ids: Vec<u64> = registry.list().await.iter().map(|job| job.id.get()).collect();
        assert_eq!(ids, (3..=12).collect::<Vec<_>>());

        assert_eq!(
            registry.get(JobId(1)).await.unwrap_err(),
            JobError::NotFound { id: JobId(1) }
        );
        assert!(registry.get(JobId(2)).await.is_err());
        assert!(registry.get(JobId(3)).await.is_ok());

        // Eviction never rewinds the counter
        assert_eq!(registry.create("next", 30).await.unwrap(), JobId(13));
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let (registry, _clock) = registry_with_clock(10);
        assert_eq!(
            registry.get(JobId(99)).await.unwrap_err(),
            JobError::NotFound { id: JobId(99) }
        );
    }

    #[tokio::test]
    async fn test_recent_returns_tail_in_creation_order() {
        let (registry, _clock) = registry_with_clock(10);
        for i in 0..5 {
            registry.create(format!("job-{i}"), 30).await.unwrap();
        }

        let recent: Vec<u64> = registry.recent(3).await.iter().map(|job| job.id.get()).collect();
        assert_eq!(recent, vec![3, 4, 5]);
        assert_eq!(registry.recent(50).await.len(), 5);
    }

    #[tokio::test]
    async fn test_mark_completed_is_idempotent() {
        let (registry, clock) = registry_with_clock(10);
        let id = registry.create("tea", 2).await.unwrap();

        let first = clock.now() + Duration::seconds(2);
        let later = first + Duration::seconds(10);
        assert!(registry.mark_completed(id, first).await);
        assert!(!registry.mark_completed(id, later).await);

        let job = registry.get(id).await.unwrap();
        assert!(job.completed);
        assert_eq!(job.completed_at, Some(first));
        assert_eq!(registry.stats().await.completed, 1);
    }

    #[tokio::test]
    async fn test_mark_completed_on_evicted_job_does_not_resurrect() {
        let (registry, clock) = registry_with_clock(1);
        let evicted = registry.create("old", 5).await.unwrap();
        registry.create("new", 5).await.unwrap();

        assert!(!registry.mark_completed(evicted, clock.now()).await);
        assert!(registry.get(evicted).await.is_err());
        assert_eq!(registry.stats().await.retained, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_never_share_ids() {
        let clock = Arc::new(ManualClock::default());
        let registry = Arc::new(JobRegistry::new(1000, None, clock));

        let handles: Vec<_> = (0..200)
            .map(|i| {
                let registry = registry.clone();
                tokio::spawn(async move { registry.create(format!("job-{i}"), 10).await.unwrap() })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().get());
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=200).collect::<Vec<_>>());
    }
}
