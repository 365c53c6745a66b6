//! Tells users when their order moves to a new stage.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use shopnotify_entity::commerce::{Order, OrderStage};
use shopnotify_entity::notification::{NewNotification, NotificationTag};

use crate::dedup::{DedupRule, Horizon};
use crate::error::JobExecutionError;
use crate::job::{Candidate, DetectionJob, JobContext};
use crate::kind::JobKind;
use crate::outcome::JobReport;

const LOOKBACK_HOURS: i64 = 1;
const DEDUP_HOURS: i64 = 2;

/// One notification per (order, stage) for stages set within the last hour.
#[derive(Debug, Clone)]
pub struct OrderStatusJob {
    ctx: JobContext,
}

impl OrderStatusJob {
    pub fn new(ctx: JobContext) -> Self {
        Self { ctx }
    }

    /// Dedup key: the stage's title word plus the delimited order reference.
    pub fn dedup_rule(order: &Order, stage: OrderStage) -> DedupRule {
        DedupRule::new(
            NotificationTag::Orders,
            Horizon::Window(Duration::hours(DEDUP_HOURS)),
        )
        .title_contains(format!("Order {}", stage.label()))
        .message_contains(order.reference())
    }

    /// Stage message followed by the order reference.
    pub fn message(order: &Order, stage: OrderStage) -> String {
        format!("{} {}", stage.message(&order.track_id), order.reference())
    }
}

#[async_trait]
impl DetectionJob for OrderStatusJob {
    fn kind(&self) -> JobKind {
        JobKind::OrderStatus
    }

    async fn run_at(&self, now: DateTime<Utc>) -> Result<JobReport, JobExecutionError> {
        let since = now - Duration::hours(LOOKBACK_HOURS);
        let orders = self
            .ctx
            .commerce
            .orders_with_stage_change_since(since)
            .await
            .map_err(|e| JobExecutionError::query("loading order updates", e))?;
        info!(orders = orders.len(), "Found orders with stage changes");

        let candidates = orders
            .iter()
            .flat_map(|order| {
                order
                    .stages_changed_between(since, now)
                    .into_iter()
                    .map(move |stage| {
                        Candidate::new(
                            NewNotification::new(
                                order.user_id,
                                stage.title(),
                                Self::message(order, stage),
                                NotificationTag::Orders,
                            ),
                            Self::dedup_rule(order, stage),
                        )
                    })
            })
            .collect();
        self.ctx.process(self.kind(), now, candidates).await
    }
}
