//! Reminds users about items left in their cart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use shopnotify_core::types::id::UserId;
use shopnotify_entity::commerce::CartItem;
use shopnotify_entity::money::format_cents;
use shopnotify_entity::notification::{NewNotification, NotificationTag};

use crate::dedup::{DedupRule, Horizon};
use crate::error::JobExecutionError;
use crate::job::{Candidate, DetectionJob, JobContext};
use crate::kind::JobKind;
use crate::outcome::JobReport;

pub const TITLE: &str = "🛒 You have items waiting!";

/// Items younger than this are still being shopped.
const MIN_AGE_HOURS: i64 = 3;
/// Items older than this are considered forgotten.
const MAX_AGE_HOURS: i64 = 24;

/// One reminder per user per day for carts idle 3-24h.
#[derive(Debug, Clone)]
pub struct CartAbandonmentJob {
    ctx: JobContext,
}

impl CartAbandonmentJob {
    pub fn new(ctx: JobContext) -> Self {
        Self { ctx }
    }

    fn candidate(user_id: UserId, items: &[CartItem]) -> Candidate {
        let count: i64 = items.iter().map(|i| i64::from(i.quantity)).sum();
        let total: i64 = items.iter().map(CartItem::line_total_cents).sum();
        let noun = if count == 1 { "item" } else { "items" };
        let message = format!(
            "You left {count} {noun} worth {} in your cart. Complete your order before they sell out!",
            format_cents(total)
        );
        Candidate::new(
            NewNotification::new(user_id, TITLE, message, NotificationTag::Cart),
            DedupRule::new(NotificationTag::Cart, Horizon::CalendarDay).title_contains("items waiting"),
        )
    }
}

#[async_trait]
impl DetectionJob for CartAbandonmentJob {
    fn kind(&self) -> JobKind {
        JobKind::CartAbandonment
    }

    async fn run_at(&self, now: DateTime<Utc>) -> Result<JobReport, JobExecutionError> {
        let from = now - Duration::hours(MAX_AGE_HOURS);
        let to = now - Duration::hours(MIN_AGE_HOURS);
        let items = self
            .ctx
            .commerce
            .pending_cart_items_added_between(from, to)
            .await
            .map_err(|e| JobExecutionError::query("loading abandoned carts", e))?;

        let mut by_user: BTreeMap<UserId, Vec<CartItem>> = BTreeMap::new();
        for item in items {
            by_user.entry(item.user_id).or_default().push(item);
        }
        info!(users = by_user.len(), "Found abandoned carts");

        let candidates = by_user
            .iter()
            .map(|(user_id, items)| Self::candidate(*user_id, items))
            .collect();
        self.ctx.process(self.kind(), now, candidates).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, cart_item, product};

    #[tokio::test]
    async fn test_groups_items_per_user_and_totals_them() {
        let f = Fixture::new();
        let now = Utc::now();
        let mug = product(1, 1_250, None);
        let lamp = product(2, 3_999, None);
        f.commerce.add_product(mug.clone());
        f.commerce.add_product(lamp.clone());
        f.commerce.add_cart_item(cart_item(1, 7, &mug, 2, now - Duration::hours(4)));
        f.commerce.add_cart_item(cart_item(2, 7, &lamp, 1, now - Duration::hours(5)));
        // too fresh, too old
        f.commerce.add_cart_item(cart_item(3, 8, &mug, 1, now - Duration::hours(1)));
        f.commerce.add_cart_item(cart_item(4, 9, &mug, 1, now - Duration::hours(30)));

        let job = CartAbandonmentJob::new(f.ctx.clone());
        let report = job.run_at(now).await.unwrap();

        assert_eq!(report.dispatched, 1);
        let sent = f.sent_to(7);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, TITLE);
        assert_eq!(
            sent[0].message.as_deref(),
            Some("You left 3 items worth $64.99 in your cart. Complete your order before they sell out!")
        );
        assert!(f.sent_to(8).is_empty());
        assert!(f.sent_to(9).is_empty());
    }

    #[tokio::test]
    async fn test_checked_out_items_are_ignored() {
        let f = Fixture::new();
        let now = Utc::now();
        let mug = product(1, 1_250, None);
        f.commerce.add_product(mug.clone());
        let mut item = cart_item(1, 7, &mug, 1, now - Duration::hours(4));
        item.checked_out = true;
        f.commerce.add_cart_item(item);

        let report = CartAbandonmentJob::new(f.ctx.clone()).run_at(now).await.unwrap();
        assert_eq!(report.candidates, 0);
    }
}
