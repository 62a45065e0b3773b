//! Countdown service
//!
//! Composes the registry, the completion scheduler and the clock into the
//! single stateful component handed to the web layer.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    clock::Clock,
    config::JobsConfig,
    errors::AppResult,
    job_scheduling::{CompletionScheduler, JobRegistry, RegistryStats, derive_status},
    models::{Job, JobId, StatusView},
};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

/// Entry point for creating and inspecting countdown jobs
#[derive(Clone)]
pub struct CountdownService {
    registry: Arc<JobRegistry>,
    scheduler: CompletionScheduler,
    clock: Arc<dyn Clock>,
}

impl CountdownService {
    pub fn new(config: &JobsConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            registry: Arc::new(JobRegistry::new(
                config.max_history,
                config.max_delay_seconds(),
                clock.clone(),
            )),
            scheduler: CompletionScheduler::new(clock.clone()),
            clock,
        }
    }

    /// Register a job and arm its completion timer
    ///
    /// Returns as soon as the job is visible; the countdown runs in the
    /// background.
    pub async fn create_job(&self, name: &str, delay_seconds: i64) -> AppResult<JobId> {
        let id = self.registry.create(name, delay_seconds).await?;
        info!(
            "Timer job {} created. Delay: {} seconds, Name: {:?}",
            id, delay_seconds, name
        );

        let registry = self.registry.clone();
        // create() has already validated the delay as positive
        let delay = Duration::from_secs(delay_seconds.unsigned_abs());
        self.scheduler.arm(id, delay, move |id, fired_at| async move {
            complete_job(&registry, id, fired_at).await;
        });

        Ok(id)
    }

    pub async fn get_job(&self, id: JobId) -> AppResult<Job> {
        Ok(self.registry.get(id).await?)
    }

    /// Every retained job, oldest first
    pub async fn list_jobs(&self) -> Vec<Job> {
        self.registry.list().await
    }

    /// The last `max_history` jobs in creation order
    pub async fn recent_jobs(&self) -> Vec<Job> {
        self.registry.recent(self.registry.max_history()).await
    }

    /// A job together with its status as of now
    pub async fn job_status(&self, id: JobId) -> AppResult<(Job, StatusView)> {
        let job = self.get_job(id).await?;
        let view = derive_status(&job, self.clock.now());
        Ok((job, view))
    }

    /// Every retained job with its status, derived against a single instant
    pub async fn list_statuses(&self) -> Vec<(Job, StatusView)> {
        let jobs = self.list_jobs().await;
        let now = self.clock.now();
        jobs.into_iter()
            .map(|job| {
                let view = derive_status(&job, now);
                (job, view)
            })
            .collect()
    }

    pub async fn stats(&self) -> ServiceStats {
        ServiceStats {
            registry: self.registry.stats().await,
            pending_timers: self.scheduler.pending(),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn max_history(&self) -> usize {
        self.registry.max_history()
    }

    pub fn scheduler(&self) -> &CompletionScheduler {
        &self.scheduler
    }

    /// Log and forget any timers still pending
    pub fn shutdown(&self) {
        self.scheduler.abandon();
    }
}

async fn complete_job(registry: &JobRegistry, id: JobId, fired_at: DateTime<Utc>) {
    if registry.mark_completed(id, fired_at).await {
        info!(
            "Timer job {} completed at {}.",
            id,
            fired_at.format(TIME_FORMAT)
        );
    } else {
        debug!("Completion for job {} ignored (evicted or already completed)", id);
    }
}

/// Snapshot of the service counters
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ServiceStats {
    pub registry: RegistryStats,
    pub pending_timers: usize,
}
