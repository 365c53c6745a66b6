//! Weekly order summary for users who ordered in the past week.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use shopnotify_entity::commerce::WeeklyStats;
use shopnotify_entity::money::format_cents;
use shopnotify_entity::notification::{NewNotification, NotificationTag};

use crate::dedup::{DedupRule, Horizon};
use crate::error::JobExecutionError;
use crate::job::{Candidate, DetectionJob, JobContext};
use crate::kind::JobKind;
use crate::outcome::JobReport;

pub const TITLE: &str = "📊 Your weekly summary";

/// Must stay shorter than the weekly cadence.
const DEDUP_DAYS: i64 = 6;

#[derive(Debug, Clone)]
pub struct WeeklyReportJob {
    ctx: JobContext,
}

impl WeeklyReportJob {
    pub fn new(ctx: JobContext) -> Self {
        Self { ctx }
    }
}

/// Summary line for a week's stats.
pub fn summary(stats: &WeeklyStats) -> String {
    let noun = if stats.order_count == 1 { "order" } else { "orders" };
    format!(
        "This week you placed {} {noun} totalling {}. Thanks for shopping with us!",
        stats.order_count,
        format_cents(stats.total_spent_cents)
    )
}

#[async_trait]
impl DetectionJob for WeeklyReportJob {
    fn kind(&self) -> JobKind {
        JobKind::WeeklyReport
    }

    async fn run_at(&self, now: DateTime<Utc>) -> Result<JobReport, JobExecutionError> {
        let since = now - Duration::days(7);
        let users = self
            .ctx
            .commerce
            .users_with_orders_since(since)
            .await
            .map_err(|e| JobExecutionError::query("loading ordering users", e))?;
        info!(users = users.len(), "Building weekly reports");

        let rule = DedupRule::new(
            NotificationTag::Reports,
            Horizon::Window(Duration::days(DEDUP_DAYS)),
        )
        .title_contains("weekly summary");

        let mut candidates = Vec::with_capacity(users.len());
        for user_id in users {
            let stats = match self.ctx.commerce.weekly_stats(user_id, since).await {
                Ok(stats) => stats,
                Err(e) => {
                    warn!(user_id = %user_id, error = %e, "Failed to compute weekly stats");
                    continue;
                }
            };
            if stats.order_count == 0 {
                continue;
            }
            candidates.push(Candidate::new(
                NewNotification::new(user_id, TITLE, summary(&stats), NotificationTag::Reports),
                rule.clone(),
            ));
        }
        self.ctx.process(self.kind(), now, candidates).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, order, user};

    #[test]
    fn test_summary_wording() {
        let stats = WeeklyStats {
            order_count: 1,
            total_spent_cents: 1_999,
        };
        assert_eq!(
            summary(&stats),
            "This week you placed 1 order totalling $19.99. Thanks for shopping with us!"
        );
    }

    #[tokio::test]
    async fn test_reports_users_with_recent_orders() {
        let f = Fixture::new();
        let now = Utc::now();
        f.commerce.add_user(user(1, now));
        f.commerce.add_user(user(2, now));
        f.commerce.add_order(order(1, 1, now - Duration::days(1)));
        f.commerce.add_order(order(2, 1, now - Duration::days(3)));
        f.commerce.add_order(order(3, 2, now - Duration::days(9)));

        let job = WeeklyReportJob::new(f.ctx.clone());
        assert_eq!(job.run_at(now).await.unwrap().dispatched, 1);
        assert_eq!(
            f.sent_to(1)[0].message.as_deref(),
            Some("This week you placed 2 orders totalling $85.00. Thanks for shopping with us!")
        );
        assert_eq!(job.run_at(now).await.unwrap().skipped, 1);
    }
}
