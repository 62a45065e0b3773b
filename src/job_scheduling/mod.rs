//! Countdown job subsystem
//!
//! The system is built around three components sharing one [`Clock`]:
//! - `JobRegistry`: bounded, lock-guarded store of jobs and issuer of IDs
//! - `CompletionScheduler`: one fire-once timer per created job
//! - `status`: pure derivation of a job's progress at a given instant
//!
//! [`Clock`]: crate::clock::Clock

pub mod completion_scheduler;
pub mod job_registry;
pub mod status;

pub use completion_scheduler::CompletionScheduler;
pub use job_registry::{JobRegistry, RegistryStats};
pub use status::{derive_status, expected_completion};
