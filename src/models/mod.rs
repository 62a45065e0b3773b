use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Identifier of a countdown job, issued sequentially from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl JobId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(JobId)
    }
}

/// A single countdown instance
///
/// Only the completion callback ever mutates a stored job, and only once:
/// `completed` flips to true and `completed_at` is recorded alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub total_delay_seconds: u64,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn new(id: JobId, name: String, created_at: DateTime<Utc>, total_delay_seconds: u64) -> Self {
        Self {
            id,
            name,
            created_at,
            total_delay_seconds,
            completed: false,
            completed_at: None,
        }
    }
}

/// Status label shown for a job at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    InProgress,
    Completed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::InProgress => "in-progress",
            JobStatus::Completed => "completed",
        }
    }

    /// CSS class used by the HTML views
    pub fn css_class(&self) -> &'static str {
        match self {
            JobStatus::InProgress => "status-progress",
            JobStatus::Completed => "status-complete",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time projection of a job's progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusView {
    pub status: JobStatus,
    pub elapsed_seconds: u64,
    pub remaining_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_parse_and_display() {
        let id: JobId = "42".parse().unwrap();
        assert_eq!(id, JobId(42));
        assert_eq!(id.to_string(), "42");
        assert!("abc".parse::<JobId>().is_err());
        assert!("-1".parse::<JobId>().is_err());
    }

    #[test]
    fn test_job_status_serializes_as_kebab_case() {
        assert_eq!(
            serde_json::to_string(&JobStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            serde_json::to_string(&JobStatus::Completed).unwrap(),
            "\"completed\""
        );
    }

    #[test]
    fn test_new_job_is_not_completed() {
        let job = Job::new(JobId(1), "tea".to_string(), Utc::now(), 30);
        assert!(!job.completed);
        assert!(job.completed_at.is_none());
    }
}
