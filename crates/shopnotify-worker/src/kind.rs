//! Names of the detection jobs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Every detection job the worker knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    CartAbandonment,
    OrderStatus,
    GroupJoin,
    GroupAlmostComplete,
    Recommendations,
    PriceDrop,
    FlashSale,
    ReturnReminder,
    Inactivity,
    WeeklyReport,
    Birthday,
    Restock,
    LowStock,
}

impl JobKind {
    /// All jobs in registration order.
    pub const ALL: [JobKind; 13] = [
        Self::CartAbandonment,
        Self::OrderStatus,
        Self::GroupJoin,
        Self::GroupAlmostComplete,
        Self::Recommendations,
        Self::PriceDrop,
        Self::FlashSale,
        Self::ReturnReminder,
        Self::Inactivity,
        Self::WeeklyReport,
        Self::Birthday,
        Self::Restock,
        Self::LowStock,
    ];

    /// Stable name used in configuration, logs, and the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CartAbandonment => "cart_abandonment",
            Self::OrderStatus => "order_status",
            Self::GroupJoin => "group_join",
            Self::GroupAlmostComplete => "group_almost_complete",
            Self::Recommendations => "recommendations",
            Self::PriceDrop => "price_drop",
            Self::FlashSale => "flash_sale",
            Self::ReturnReminder => "return_reminder",
            Self::Inactivity => "inactivity",
            Self::WeeklyReport => "weekly_report",
            Self::Birthday => "birthday",
            Self::Restock => "restock",
            Self::LowStock => "low_stock",
        }
    }

    /// One-line description for listings.
    pub fn description(&self) -> &'static str {
        match self {
            Self::CartAbandonment => "Items left in the cart 3-24h ago",
            Self::OrderStatus => "Order stage changes in the last hour",
            Self::GroupJoin => "New members joining a user's group buy",
            Self::GroupAlmostComplete => "Group buys with one or two open slots",
            Self::Recommendations => "Featured products for active users",
            Self::PriceDrop => "Discounts on products sitting in carts",
            Self::FlashSale => "Any product currently on sale",
            Self::ReturnReminder => "Orders delivered 3-7 days ago",
            Self::Inactivity => "Accounts untouched for a week",
            Self::WeeklyReport => "Weekly order summary",
            Self::Birthday => "Birthday greetings (not yet wired)",
            Self::Restock => "Restocked products (not yet wired)",
            Self::LowStock => "Low stock on wanted products (not yet wired)",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == needle)
            .ok_or_else(|| format!("Unknown job: '{s}'"))
    }
}
