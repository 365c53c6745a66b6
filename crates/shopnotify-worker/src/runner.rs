//! Bounded retry and timeout around a single job run.

use std::time::Duration;

use tokio::time;
use tracing::{Instrument, error, info, info_span, warn};

use shopnotify_core::config::WorkerConfig;

use crate::error::JobExecutionError;
use crate::job::DetectionJob;
use crate::outcome::JobReport;

/// Runs a job, retrying transient failures.
#[derive(Debug, Clone)]
pub struct JobRunner {
    /// Total attempts, first included.
    max_attempts: u32,
    retry_delay: Duration,
    timeout: Duration,
}

impl JobRunner {
    pub fn new(max_attempts: u32, retry_delay: Duration, timeout: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            retry_delay,
            timeout,
        }
    }

    pub fn from_config(config: &WorkerConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_secs(config.retry_delay_seconds),
            Duration::from_secs(config.job_timeout_seconds),
        )
    }

    /// Run until the job succeeds or fails permanently, at most `max_attempts` times.
    ///
    /// Each attempt re-queries commerce state, so candidates dispatched by
    /// an earlier partial attempt are skipped as duplicates.
    pub async fn run_with_retry(
        &self,
        job: &dyn DetectionJob,
    ) -> Result<JobReport, JobExecutionError> {
        let kind = job.kind();
        let mut attempt = 1;
        loop {
            let span = info_span!("detection_job", job = %kind, attempt);
            let result = match time::timeout(self.timeout, job.run().instrument(span)).await {
                Ok(result) => result,
                Err(_) => Err(JobExecutionError::Transient(format!(
                    "timed out after {}s",
                    self.timeout.as_secs()
                ))),
            };

            match result {
                Ok(report) => return Ok(report),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    warn!(
                        job = %kind,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Detection job failed, retrying in {}s",
                        self.retry_delay.as_secs()
                    );
                    time::sleep(self.retry_delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!(job = %kind, attempt, error = %e, "Detection job failed");
                    return Err(e);
                }
            }
        }
    }

    /// Like [`run_with_retry`](Self::run_with_retry) but only logs the outcome.
    pub async fn run_logged(&self, job: &dyn DetectionJob) {
        if let Ok(report) = self.run_with_retry(job).await {
            info!(job = %report.job, "{report}");
        }
    }
}
