//! Tells users when a product in their cart goes on sale.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use shopnotify_core::types::id::{ProductId, UserId};
use shopnotify_entity::commerce::Product;
use shopnotify_entity::money::format_cents;
use shopnotify_entity::notification::{NewNotification, NotificationTag};

use crate::dedup::{DedupRule, Horizon};
use crate::error::JobExecutionError;
use crate::job::{Candidate, DetectionJob, JobContext};
use crate::kind::JobKind;
use crate::outcome::JobReport;

pub const TITLE: &str = "💰 Price drop!";

/// One alert per (user, product) per day.
#[derive(Debug, Clone)]
pub struct PriceDropJob {
    ctx: JobContext,
}

impl PriceDropJob {
    pub fn new(ctx: JobContext) -> Self {
        Self { ctx }
    }

    fn product_token(product: &Product) -> String {
        format!("(product #{})", product.id)
    }

    fn candidate(user_id: UserId, product: &Product, sale_cents: i64) -> Candidate {
        let message = format!(
            "{} in your cart is now {} (was {}). {}",
            product.name,
            format_cents(sale_cents),
            format_cents(product.price_cents),
            Self::product_token(product)
        );
        Candidate::new(
            NewNotification::new(user_id, TITLE, message, NotificationTag::Deals),
            DedupRule::new(NotificationTag::Deals, Horizon::Window(Duration::days(1)))
                .title_contains("Price drop")
                .message_contains(Self::product_token(product)),
        )
    }
}

#[async_trait]
impl DetectionJob for PriceDropJob {
    fn kind(&self) -> JobKind {
        JobKind::PriceDrop
    }

    async fn run_at(&self, now: DateTime<Utc>) -> Result<JobReport, JobExecutionError> {
        let products: BTreeMap<ProductId, Product> = self
            .ctx
            .commerce
            .discounted_products()
            .await
            .map_err(|e| JobExecutionError::query("loading discounted products", e))?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        if products.is_empty() {
            return Ok(JobReport::empty(self.kind(), Utc::now()));
        }

        let ids: Vec<ProductId> = products.keys().copied().collect();
        let items = self
            .ctx
            .commerce
            .pending_cart_items_for_products(&ids)
            .await
            .map_err(|e| JobExecutionError::query("loading carts", e))?;

        let pairs: BTreeSet<(UserId, ProductId)> = items
            .iter()
            .map(|item| (item.user_id, item.product_id))
            .collect();
        info!(pairs = pairs.len(), "Found carts holding discounted products");

        let candidates = pairs
            .iter()
            .filter_map(|(user_id, product_id)| {
                let product = products.get(product_id)?;
                let sale = product.discount_price_cents?;
                Some(Self::candidate(*user_id, product, sale))
            })
            .collect();
        self.ctx.process(self.kind(), now, candidates).await
    }
}
