//! Scheduled notification detection for ShopNotify.
//!
//! This crate provides:
//! - One [`DetectionJob`] per notification category, each scanning
//!   commerce state, applying a dedup rule, and dispatching
//! - A [`JobRegistry`] naming every job by [`JobKind`]
//! - A [`JobRunner`] that retries failed runs a bounded number of times
//! - A [`CronScheduler`] that triggers each job on its own cadence

pub mod dedup;
pub mod error;
pub mod job;
pub mod jobs;
pub mod kind;
pub mod outcome;
pub mod registry;
pub mod runner;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testing;

pub use dedup::{DedupRule, Horizon};
pub use error::JobExecutionError;
pub use job::{Candidate, DetectionJob, JobContext};
pub use kind::JobKind;
pub use outcome::{CandidateOutcome, JobReport, SkipReason};
pub use registry::JobRegistry;
pub use runner::JobRunner;
pub use scheduler::CronScheduler;
