//! Announces ongoing sales to every active user.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use shopnotify_entity::notification::{NewNotification, NotificationTag};

use crate::dedup::{DedupRule, Horizon};
use crate::error::JobExecutionError;
use crate::job::{Candidate, DetectionJob, JobContext};
use crate::kind::JobKind;
use crate::outcome::JobReport;

pub const TITLE: &str = "⚡ Flash sale";

#[derive(Debug, Clone)]
pub struct FlashSaleJob {
    ctx: JobContext,
}

impl FlashSaleJob {
    pub fn new(ctx: JobContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl DetectionJob for FlashSaleJob {
    fn kind(&self) -> JobKind {
        JobKind::FlashSale
    }

    async fn run_at(&self, now: DateTime<Utc>) -> Result<JobReport, JobExecutionError> {
        let products = self
            .ctx
            .commerce
            .discounted_products()
            .await
            .map_err(|e| JobExecutionError::query("loading discounted products", e))?;
        let Some(first) = products.first() else {
            return Ok(JobReport::empty(self.kind(), Utc::now()));
        };

        let users = self
            .ctx
            .commerce
            .active_users()
            .await
            .map_err(|e| JobExecutionError::query("loading active users", e))?;
        info!(products = products.len(), users = users.len(), "Announcing flash sale");

        let message = match products.len() {
            1 => format!("{} is on sale right now. Don't miss out!", first.name),
            n => format!(
                "{n} products are on sale right now, including {}. Don't miss out!",
                first.name
            ),
        };
        let rule = DedupRule::new(NotificationTag::Deals, Horizon::Window(Duration::hours(1)))
            .title_contains("Flash sale");

        let candidates = users
            .iter()
            .map(|user| {
                Candidate::new(
                    NewNotification::new(user.id, TITLE, message.clone(), NotificationTag::Deals),
                    rule.clone(),
                )
            })
            .collect();
        self.ctx.process(self.kind(), now, candidates).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, product, user};

    #[tokio::test]
    async fn test_hourly_announcement_per_user() {
        let f = Fixture::new();
        let now = Utc::now();
        f.commerce.add_user(user(1, now));
        f.commerce.add_user(user(2, now));
        f.commerce.add_product(product(1, 1_000, Some(800)));
        f.commerce.add_product(product(2, 1_000, Some(700)));

        let job = FlashSaleJob::new(f.ctx.clone());
        assert_eq!(job.run_at(now).await.unwrap().dispatched, 2);
        assert_eq!(
            f.sent_to(1)[0].message.as_deref(),
            Some("2 products are on sale right now, including Product 1. Don't miss out!")
        );

        assert_eq!(job.run_at(now + Duration::minutes(30)).await.unwrap().skipped, 2);
        assert_eq!(job.run_at(now + Duration::minutes(61)).await.unwrap().dispatched, 2);
    }

    #[tokio::test]
    async fn test_no_sale_no_candidates() {
        let f = Fixture::new();
        f.commerce.add_user(user(1, Utc::now()));
        f.commerce.add_product(product(1, 1_000, None));
        let report = FlashSaleJob::new(f.ctx.clone()).run_at(Utc::now()).await.unwrap();
        assert_eq!(report.candidates, 0);
    }
}
