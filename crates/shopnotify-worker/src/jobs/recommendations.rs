//! Featured product picks for active users.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use shopnotify_entity::commerce::Product;
use shopnotify_entity::notification::{NewNotification, NotificationTag};

use crate::dedup::{DedupRule, Horizon};
use crate::error::JobExecutionError;
use crate::job::{Candidate, DetectionJob, JobContext};
use crate::kind::JobKind;
use crate::outcome::JobReport;

pub const TITLE: &str = "✨ Recommended for you";

/// Products named in one message.
const PICKS: i64 = 3;

#[derive(Debug, Clone)]
pub struct RecommendationsJob {
    ctx: JobContext,
}

impl RecommendationsJob {
    pub fn new(ctx: JobContext) -> Self {
        Self { ctx }
    }
}

fn join_names(products: &[Product]) -> String {
    let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
    match names.as_slice() {
        [] => String::new(),
        [one] => one.to_string(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

#[async_trait]
impl DetectionJob for RecommendationsJob {
    fn kind(&self) -> JobKind {
        JobKind::Recommendations
    }

    async fn run_at(&self, now: DateTime<Utc>) -> Result<JobReport, JobExecutionError> {
        let products = self
            .ctx
            .commerce
            .featured_products(PICKS)
            .await
            .map_err(|e| JobExecutionError::query("loading featured products", e))?;
        if products.is_empty() {
            info!("No products to recommend");
            return Ok(JobReport::empty(self.kind(), Utc::now()));
        }

        let users = self
            .ctx
            .commerce
            .active_users()
            .await
            .map_err(|e| JobExecutionError::query("loading active users", e))?;

        let message = format!("Picked for you: {}. Take a look!", join_names(&products));
        let rule = DedupRule::new(
            NotificationTag::Recommendations,
            Horizon::Window(Duration::days(3)),
        )
        .title_contains("Recommended");

        let candidates = users
            .iter()
            .map(|user| {
                Candidate::new(
                    NewNotification::new(
                        user.id,
                        TITLE,
                        message.clone(),
                        NotificationTag::Recommendations,
                    ),
                    rule.clone(),
                )
            })
            .collect();
        self.ctx.process(self.kind(), now, candidates).await
    }
}
