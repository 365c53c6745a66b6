//! Customer entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use shopnotify_core::types::id::UserId;

/// A customer account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Phone number used for verification.
    pub phone: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// Last time the account record changed; used as the activity signal.
    pub modified_at: DateTime<Utc>,
    /// Whether the account is enabled.
    pub is_active: bool,
    /// Soft-delete marker.
    pub is_deleted: bool,
}

impl User {
    /// First word of the display name, for greetings.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("there")
    }
}
