//! Per-candidate outcomes and the per-run report.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use shopnotify_core::error::AppError;
use shopnotify_core::types::id::NotificationId;

use crate::error::JobExecutionError;
use crate::kind::JobKind;

/// Why a candidate was not notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// A matching notification already exists within the dedup horizon.
    Duplicate,
}

/// Result of processing one candidate.
#[derive(Debug, Clone)]
pub enum CandidateOutcome {
    Dispatched(NotificationId),
    Skipped(SkipReason),
    Failed(AppError),
}

/// Aggregate of one job run.
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub job: JobKind,
    pub started_at: DateTime<Utc>,
    pub candidates: usize,
    pub dispatched: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Messages of the failed candidates.
    pub errors: Vec<String>,
}

impl JobReport {
    /// A run that found nothing to do.
    pub fn empty(job: JobKind, started_at: DateTime<Utc>) -> Self {
        Self {
            job,
            started_at,
            candidates: 0,
            dispatched: 0,
            skipped: 0,
            failed: 0,
            errors: Vec::new(),
        }
    }

    pub fn from_outcomes(
        job: JobKind,
        started_at: DateTime<Utc>,
        outcomes: impl IntoIterator<Item = CandidateOutcome>,
    ) -> Self {
        let mut report = Self::empty(job, started_at);
        for outcome in outcomes {
            report.record(outcome);
        }
        report
    }

    pub fn record(&mut self, outcome: CandidateOutcome) {
        self.candidates += 1;
        match outcome {
            CandidateOutcome::Dispatched(_) => self.dispatched += 1,
            CandidateOutcome::Skipped(_) => self.skipped += 1,
            CandidateOutcome::Failed(e) => {
                self.failed += 1;
                self.errors.push(e.to_string());
            }
        }
    }

    /// Treat a run where every candidate failed as a failed run, so the
    /// runner retries it. Partial failures are reported, not raised.
    pub fn into_result(self) -> Result<Self, JobExecutionError> {
        if self.candidates > 0 && self.failed == self.candidates {
            let first = self.errors.first().cloned().unwrap_or_default();
            return Err(JobExecutionError::Transient(format!(
                "all {} candidates failed, first error: {first}",
                self.candidates
            )));
        }
        Ok(self)
    }

    /// Emit the run summary.
    pub fn log(&self) {
        if self.failed > 0 {
            warn!(
                job = %self.job,
                candidates = self.candidates,
                dispatched = self.dispatched,
                skipped = self.skipped,
                failed = self.failed,
                "Detection job finished with failures"
            );
        } else {
            info!(
                job = %self.job,
                candidates = self.candidates,
                dispatched = self.dispatched,
                skipped = self.skipped,
                "Detection job finished"
            );
        }
    }
}

impl fmt::Display for JobReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} candidates, {} dispatched, {} skipped, {} failed",
            self.job, self.candidates, self.dispatched, self.skipped, self.failed
        )
    }
}
