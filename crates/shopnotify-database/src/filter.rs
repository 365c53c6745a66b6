//! Predicate used for notification existence checks.

use chrono::{DateTime, Utc};

use shopnotify_core::types::id::UserId;
use shopnotify_entity::notification::{Notification, NotificationTag};

/// Matches a user's non-deleted notifications created strictly after
/// `created_after`, optionally narrowed by tag and substrings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationFilter {
    /// Owning user.
    pub user_id: UserId,
    /// Exclusive lower bound on `created_at`.
    pub created_after: DateTime<Utc>,
    /// Required tag.
    pub tag: Option<NotificationTag>,
    /// Substring the title must contain.
    pub title_contains: Option<String>,
    /// Substring the message must contain.
    pub message_contains: Option<String>,
}

impl NotificationFilter {
    /// Match any notification of the user after `created_after`.
    pub fn new(user_id: UserId, created_after: DateTime<Utc>) -> Self {
        Self {
            user_id,
            created_after,
            tag: None,
            title_contains: None,
            message_contains: None,
        }
    }

    /// Require a tag.
    pub fn tag(mut self, tag: NotificationTag) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Require a title substring.
    pub fn title_contains(mut self, needle: impl Into<String>) -> Self {
        self.title_contains = Some(needle.into());
        self
    }

    /// Require a message substring.
    pub fn message_contains(mut self, needle: impl Into<String>) -> Self {
        self.message_contains = Some(needle.into());
        self
    }

    /// Evaluate the filter against a record.
    pub fn matches(&self, n: &Notification) -> bool {
        if n.is_deleted || n.user_id != self.user_id || n.created_at <= self.created_after {
            return false;
        }
        if let Some(tag) = self.tag {
            if n.url != tag.as_str() {
                return false;
            }
        }
        if let Some(needle) = &self.title_contains {
            if !n.title.contains(needle.as_str()) {
                return false;
            }
        }
        if let Some(needle) = &self.message_contains {
            if !n.message.as_deref().unwrap_or("").contains(needle.as_str()) {
                return false;
            }
        }
        true
    }
}
