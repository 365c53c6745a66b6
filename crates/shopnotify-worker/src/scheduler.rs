//! Cron scheduler that triggers each detection job on its own cadence.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use shopnotify_core::config::JobSchedules;
use shopnotify_core::config::worker::SCHEDULE_OFF;
use shopnotify_core::error::AppError;

use crate::job::DetectionJob;
use crate::kind::JobKind;
use crate::registry::JobRegistry;
use crate::runner::JobRunner;

/// Cron-based scheduler for the detection jobs
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    registry: Arc<JobRegistry>,
    runner: Arc<JobRunner>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(registry: Arc<JobRegistry>, runner: Arc<JobRunner>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            registry,
            runner,
        })
    }

    /// Register every job whose schedule is not `off`. Returns the number registered.
    pub async fn register_all(&self, schedules: &JobSchedules) -> Result<usize, AppError> {
        let mut registered = 0;
        for kind in self.registry.kinds() {
            let Some(expr) = schedules.get(kind.as_str()) else {
                continue;
            };
            if expr.trim().eq_ignore_ascii_case(SCHEDULE_OFF) {
                tracing::info!("Skipped: {} (schedule off)", kind);
                continue;
            }
            let Some(job) = self.registry.get(kind) else {
                continue;
            };
            self.register(kind, expr, job).await?;
            registered += 1;
        }

        tracing::info!("{} detection jobs scheduled", registered);
        Ok(registered)
    }

    async fn register(
        &self,
        kind: JobKind,
        expr: &str,
        job: Arc<dyn DetectionJob>,
    ) -> Result<(), AppError> {
        let runner = Arc::clone(&self.runner);
        let cron = CronJob::new_async(expr, move |_uuid, _lock| {
            let runner = Arc::clone(&runner);
            let job = Arc::clone(&job);
            Box::pin(async move {
                tracing::debug!("Triggering detection job {}", kind);
                runner.run_logged(job.as_ref()).await;
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid schedule '{}' for {}: {}", expr, kind, e))
        })?;

        self.scheduler
            .add(cron)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add {} schedule: {}", kind, e)))?;

        tracing::info!("Registered: {} ({})", kind, expr);
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::Fixture;

    async fn scheduler() -> CronScheduler {
        let registry = Arc::new(JobRegistry::new(Fixture::new().ctx));
        let runner = Arc::new(JobRunner::new(1, Duration::from_secs(1), Duration::from_secs(5)));
        CronScheduler::new(registry, runner).await.unwrap()
    }

    #[tokio::test]
    async fn test_off_schedules_are_skipped() {
        let mut schedules = JobSchedules::default();
        schedules.birthday = "off".into();
        schedules.restock = "OFF".into();
        let scheduler = scheduler().await;
        let registered = scheduler.register_all(&schedules).await.unwrap();
        assert_eq!(registered, JobKind::ALL.len() - 2);
    }

    #[tokio::test]
    async fn test_invalid_expression_is_a_configuration_error() {
        let mut schedules = JobSchedules::default();
        schedules.flash_sale = "every now and then".into();
        let err = scheduler().await.register_all(&schedules).await.unwrap_err();
        assert_eq!(err.kind, shopnotify_core::error::ErrorKind::Configuration);
    }
}
