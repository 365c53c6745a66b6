//! Aggregated per-user statistics.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user's order activity over the past week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct WeeklyStats {
    /// Orders placed in the period.
    pub order_count: i64,
    /// Sum of order totals in cents.
    pub total_spent_cents: i64,
}
