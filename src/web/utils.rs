//! Web utility functions

use std::num::ParseIntError;

use crate::models::JobId;

/// A job ID taken from a URL path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobIdParam {
    /// Could have been issued by the registry
    Id(JobId),
    /// A negative integer; never issued, always not found
    Unissued(i64),
}

impl JobIdParam {
    /// Message for a lookup that found nothing
    pub fn not_found_message(&self) -> String {
        match self {
            JobIdParam::Id(id) => format!("Job ID {} not found.", id),
            JobIdParam::Unissued(raw) => format!("Job ID {} not found.", raw),
        }
    }
}

/// Parse a job ID path segment
///
/// Any integer is well-formed; anything else is a malformed URL.
pub fn parse_job_id(param: &str) -> Result<JobIdParam, ParseIntError> {
    let raw: i64 = param.parse()?;
    Ok(match u64::try_from(raw) {
        Ok(id) => JobIdParam::Id(JobId(id)),
        Err(_) => JobIdParam::Unissued(raw),
    })
}
