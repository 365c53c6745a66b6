//! Shopping cart line entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use shopnotify_core::types::id::{CartItemId, ProductId, UserId};

/// One product line in a user's cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CartItem {
    /// Line identifier.
    pub id: CartItemId,
    /// Cart owner.
    pub user_id: UserId,
    /// Product in the line.
    pub product_id: ProductId,
    /// Product display name.
    pub product_name: String,
    /// Unit price in cents at the time it was added.
    pub unit_price_cents: i64,
    /// Units in the line.
    pub quantity: i32,
    /// When the line was added.
    pub added_at: DateTime<Utc>,
    /// Whether the line has been checked out.
    pub checked_out: bool,
    /// Soft-delete marker.
    pub is_deleted: bool,
}

impl CartItem {
    /// Line total in cents.
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * i64::from(self.quantity)
    }

    /// Still sitting in the cart.
    pub fn is_pending(&self) -> bool {
        !self.checked_out && !self.is_deleted
    }
}
