//! Product entity.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use shopnotify_core::types::id::ProductId;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// List price in cents.
    pub price_cents: i64,
    /// Sale price in cents, when discounted.
    pub discount_price_cents: Option<i64>,
    /// Whether the product is listed.
    pub is_active: bool,
    /// Soft-delete marker.
    pub is_deleted: bool,
}

impl Product {
    /// A product counts as discounted when it carries a positive sale price.
    pub fn is_discounted(&self) -> bool {
        self.discount_price_cents.is_some_and(|p| p > 0)
    }

    /// Listed and not deleted.
    pub fn is_available(&self) -> bool {
        self.is_active && !self.is_deleted
    }
}
