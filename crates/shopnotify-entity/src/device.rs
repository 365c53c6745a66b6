//! Push device registration entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use shopnotify_core::types::id::UserId;

/// The push token a user's device most recently registered.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeviceRegistration {
    /// Owning user.
    pub user_id: UserId,
    /// Push provider token.
    pub token: String,
    /// Client platform, e.g. `"android"` or `"ios"`.
    pub platform: Option<String>,
    /// When the token was last refreshed.
    pub updated_at: DateTime<Utc>,
}
