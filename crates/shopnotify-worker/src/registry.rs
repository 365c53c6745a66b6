//! Lookup of every detection job by name.

use std::collections::BTreeMap;
use std::sync::Arc;

use shopnotify_core::error::AppError;

use crate::error::JobExecutionError;
use crate::job::{DetectionJob, JobContext};
use crate::jobs::{
    CartAbandonmentJob, FlashSaleJob, GroupAlmostCompleteJob, GroupJoinJob, InactivityJob,
    OrderStatusJob, PlaceholderJob, PriceDropJob, RecommendationsJob, ReturnReminderJob,
    WeeklyReportJob,
};
use crate::kind::JobKind;
use crate::outcome::JobReport;

/// Every detection job, built once and shared by the scheduler and the CLI.
#[derive(Debug, Clone)]
pub struct JobRegistry {
    jobs: BTreeMap<JobKind, Arc<dyn DetectionJob>>,
}

impl JobRegistry {
    /// Build one instance of every job over a shared context.
    pub fn new(ctx: JobContext) -> Self {
        let jobs = JobKind::ALL
            .into_iter()
            .map(|kind| (kind, build(kind, &ctx)))
            .collect();
        Self { jobs }
    }

    /// The job registered under a name.
    pub fn get(&self, kind: JobKind) -> Option<Arc<dyn DetectionJob>> {
        self.jobs.get(&kind).cloned()
    }

    /// Registered job names in order.
    pub fn kinds(&self) -> impl Iterator<Item = JobKind> + '_ {
        self.jobs.keys().copied()
    }

    /// Run one job once, without retries.
    pub async fn run(&self, kind: JobKind) -> Result<JobReport, JobExecutionError> {
        let job = self
            .get(kind)
            .ok_or_else(|| AppError::not_found(format!("Job '{kind}' is not registered")))?;
        job.run().await
    }
}

fn build(kind: JobKind, ctx: &JobContext) -> Arc<dyn DetectionJob> {
    let ctx = ctx.clone();
    match kind {
        JobKind::CartAbandonment => Arc::new(CartAbandonmentJob::new(ctx)),
        JobKind::OrderStatus => Arc::new(OrderStatusJob::new(ctx)),
        JobKind::GroupJoin => Arc::new(GroupJoinJob::new(ctx)),
        JobKind::GroupAlmostComplete => Arc::new(GroupAlmostCompleteJob::new(ctx)),
        JobKind::Recommendations => Arc::new(RecommendationsJob::new(ctx)),
        JobKind::PriceDrop => Arc::new(PriceDropJob::new(ctx)),
        JobKind::FlashSale => Arc::new(FlashSaleJob::new(ctx)),
        JobKind::ReturnReminder => Arc::new(ReturnReminderJob::new(ctx)),
        JobKind::Inactivity => Arc::new(InactivityJob::new(ctx)),
        JobKind::WeeklyReport => Arc::new(WeeklyReportJob::new(ctx)),
        JobKind::Birthday => Arc::new(PlaceholderJob::birthday()),
        JobKind::Restock => Arc::new(PlaceholderJob::restock()),
        JobKind::LowStock => Arc::new(PlaceholderJob::low_stock()),
    }
}
