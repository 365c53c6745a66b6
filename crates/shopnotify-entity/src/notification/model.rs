//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use shopnotify_core::types::id::{GroupId, NotificationId, UserId};

use super::tag::NotificationTag;

/// A notification persisted for a user.
///
/// `acknowledged` and `is_active` are nullable in storage; `None` reads as
/// unread and active respectively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The recipient user.
    pub user_id: UserId,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: Option<String>,
    /// Category tag (see [`NotificationTag`]).
    pub url: String,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
    /// Whether the user has read this notification.
    pub acknowledged: Option<bool>,
    /// Whether the notification is live.
    pub is_active: Option<bool>,
    /// Soft-delete marker.
    pub is_deleted: bool,
    /// Group purchase the notification refers to, if any.
    pub group_context_id: Option<GroupId>,
    /// Last time the record changed.
    pub modified_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Check if the notification has not been read.
    pub fn is_unread(&self) -> bool {
        !self.acknowledged.unwrap_or(false)
    }

    /// Whether list and count queries should include this record.
    pub fn is_visible(&self) -> bool {
        !self.is_deleted && self.is_active.unwrap_or(true)
    }

    /// Parse the stored tag.
    pub fn tag(&self) -> Option<NotificationTag> {
        self.url.parse().ok()
    }
}

/// Input for creating a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotification {
    /// The recipient user.
    pub user_id: UserId,
    /// Short title.
    pub title: String,
    /// Category tag.
    pub tag: NotificationTag,
    /// Body text.
    pub message: Option<String>,
    /// Group purchase context.
    pub group_context_id: Option<GroupId>,
}

impl NewNotification {
    /// Create a notification input with a message body.
    pub fn new(
        user_id: UserId,
        title: impl Into<String>,
        message: impl Into<String>,
        tag: NotificationTag,
    ) -> Self {
        Self {
            user_id,
            title: title.into(),
            tag,
            message: Some(message.into()),
            group_context_id: None,
        }
    }

    /// Attach a group purchase context.
    pub fn with_group(mut self, group_id: GroupId) -> Self {
        self.group_context_id = Some(group_id);
        self
    }
}
