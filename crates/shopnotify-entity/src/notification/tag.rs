//! Notification category tag enumeration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Category tag stored with every notification.
///
/// The tag doubles as the client-side deep link target, so its string
/// form is part of the persisted data and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationTag {
    /// Shopping cart reminders.
    Cart,
    /// Order lifecycle updates.
    Orders,
    /// Group purchase progress.
    Group,
    /// Personalised product picks.
    Recommendations,
    /// Price drops and sales.
    Deals,
    /// Account-level nudges (inactivity, birthday).
    Account,
    /// Periodic summaries.
    Reports,
    /// Stock availability.
    Stock,
    /// Operational and test messages.
    System,
}

impl NotificationTag {
    /// Return the tag as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::Orders => "orders",
            Self::Group => "group",
            Self::Recommendations => "recommendations",
            Self::Deals => "deals",
            Self::Account => "account",
            Self::Reports => "reports",
            Self::Stock => "stock",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for NotificationTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cart" => Ok(Self::Cart),
            "orders" => Ok(Self::Orders),
            "group" => Ok(Self::Group),
            "recommendations" => Ok(Self::Recommendations),
            "deals" => Ok(Self::Deals),
            "account" => Ok(Self::Account),
            "reports" => Ok(Self::Reports),
            "stock" => Ok(Self::Stock),
            "system" => Ok(Self::System),
            other => Err(format!("unknown notification tag '{other}'")),
        }
    }
}
