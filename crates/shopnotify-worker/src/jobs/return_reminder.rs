//! Reminds buyers that the return window of a recent delivery is closing.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use shopnotify_entity::commerce::Order;
use shopnotify_entity::notification::{NewNotification, NotificationTag};

use crate::dedup::{DedupRule, Horizon};
use crate::error::JobExecutionError;
use crate::job::{Candidate, DetectionJob, JobContext};
use crate::kind::JobKind;
use crate::outcome::JobReport;

pub const TITLE: &str = "↩️ Return window closing";

#[derive(Debug, Clone)]
pub struct ReturnReminderJob {
    ctx: JobContext,
}

impl ReturnReminderJob {
    pub fn new(ctx: JobContext) -> Self {
        Self { ctx }
    }

    fn candidate(order: &Order) -> Candidate {
        let message = format!(
            "Not happy with order {}? You can still request a return for a few more days. {}",
            order.track_id,
            order.reference()
        );
        Candidate::new(
            NewNotification::new(order.user_id, TITLE, message, NotificationTag::Orders),
            DedupRule::new(NotificationTag::Orders, Horizon::Window(Duration::days(1)))
                .title_contains("Return")
                .message_contains(order.reference()),
        )
    }
}

#[async_trait]
impl DetectionJob for ReturnReminderJob {
    fn kind(&self) -> JobKind {
        JobKind::ReturnReminder
    }

    async fn run_at(&self, now: DateTime<Utc>) -> Result<JobReport, JobExecutionError> {
        let orders = self
            .ctx
            .commerce
            .orders_delivered_between(now - Duration::days(7), now - Duration::days(3))
            .await
            .map_err(|e| JobExecutionError::query("loading delivered orders", e))?;
        info!(orders = orders.len(), "Found orders inside the return window");

        let candidates = orders.iter().map(Self::candidate).collect();
        self.ctx.process(self.kind(), now, candidates).await
    }
}
