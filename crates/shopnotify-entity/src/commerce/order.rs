//! Order entity and lifecycle stages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use shopnotify_core::types::id::{OrderId, UserId};

/// An order with one timestamp column per lifecycle stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Order {
    /// Order identifier.
    pub id: OrderId,
    /// Buyer.
    pub user_id: UserId,
    /// Customer-facing tracking number.
    pub track_id: String,
    /// Order total in cents.
    pub total_cents: i64,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub packed_at: Option<DateTime<Utc>>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub out_for_delivery_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Set once a return has been requested.
    pub returned_at: Option<DateTime<Utc>>,
    /// Soft-delete marker.
    pub is_deleted: bool,
}

/// Order lifecycle stage that triggers a status notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStage {
    Confirmed,
    Packed,
    Shipped,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStage {
    /// All stages in lifecycle order.
    pub const ALL: [OrderStage; 6] = [
        Self::Confirmed,
        Self::Packed,
        Self::Shipped,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Status word used in titles and dedup matching.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Confirmed => "Confirmed",
            Self::Packed => "Packed",
            Self::Shipped => "Shipped",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Notification title for the stage.
    pub fn title(&self) -> String {
        let icon = match self {
            Self::Confirmed => "📦",
            Self::Packed => "🎁",
            Self::Shipped => "🚚",
            Self::OutForDelivery => "🛵",
            Self::Delivered => "✅",
            Self::Cancelled => "❌",
        };
        format!("{icon} Order {}", self.label())
    }

    /// Notification body for the stage.
    pub fn message(&self, track_id: &str) -> String {
        match self {
            Self::Confirmed => format!("Your order {track_id} has been confirmed."),
            Self::Packed => format!("Your order {track_id} has been packed and is ready to ship."),
            Self::Shipped => format!("Your order {track_id} is on its way."),
            Self::OutForDelivery => {
                format!("Your order {track_id} is out for delivery and will arrive today.")
            }
            Self::Delivered => format!("Your order {track_id} has been delivered. Enjoy!"),
            Self::Cancelled => format!("Your order {track_id} has been cancelled."),
        }
    }
}

impl std::fmt::Display for OrderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Order {
    /// Delimited tracking reference appended to order notifications.
    ///
    /// The closing parenthesis keeps `TRK-1` from matching inside `TRK-10`.
    pub fn reference(&self) -> String {
        format!("(order {})", self.track_id)
    }

    /// Timestamp recorded for a stage.
    pub fn stage_time(&self, stage: OrderStage) -> Option<DateTime<Utc>> {
        match stage {
            OrderStage::Confirmed => self.confirmed_at,
            OrderStage::Packed => self.packed_at,
            OrderStage::Shipped => self.shipped_at,
            OrderStage::OutForDelivery => self.out_for_delivery_at,
            OrderStage::Delivered => self.delivered_at,
            OrderStage::Cancelled => self.cancelled_at,
        }
    }

    /// Stages whose timestamp falls in `(since, until]`.
    pub fn stages_changed_between(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Vec<OrderStage> {
        OrderStage::ALL
            .into_iter()
            .filter(|stage| {
                self.stage_time(*stage)
                    .is_some_and(|at| at > since && at <= until)
            })
            .collect()
    }
}
