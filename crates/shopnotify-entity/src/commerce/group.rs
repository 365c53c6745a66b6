//! Group purchase entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use shopnotify_core::types::id::{GroupId, ProductId, UserId};

/// A group-buy event that completes once enough members join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct GroupPurchase {
    /// Group identifier.
    pub id: GroupId,
    /// User who opened the group.
    pub creator_id: UserId,
    /// Product being bought together.
    pub product_id: ProductId,
    /// Product display name.
    pub product_name: String,
    /// Members needed to complete.
    pub required_members: i32,
    /// Members joined so far, creator included.
    pub joined_members: i32,
    /// When the event closes.
    pub ends_at: DateTime<Utc>,
    /// Closed early (completed or cancelled).
    pub is_closed: bool,
    /// Soft-delete marker.
    pub is_deleted: bool,
}

impl GroupPurchase {
    /// Slots still open.
    pub fn open_slots(&self) -> i32 {
        (self.required_members - self.joined_members).max(0)
    }

    /// Whether the event still accepts members at `now`.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        !self.is_closed && !self.is_deleted && self.ends_at > now
    }

    /// One or two slots left on an open event.
    pub fn is_almost_complete(&self, now: DateTime<Utc>) -> bool {
        self.is_open(now) && (1..=2).contains(&self.open_slots())
    }
}

/// A user joining someone's group purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct GroupJoin {
    /// Group joined.
    pub group_id: GroupId,
    /// Member who joined.
    pub user_id: UserId,
    /// Creator of the group.
    pub creator_id: UserId,
    /// Product display name.
    pub product_name: String,
    /// When the member joined.
    pub joined_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn group(required: i32, joined: i32) -> GroupPurchase {
        GroupPurchase {
            id: GroupId(1),
            creator_id: UserId(1),
            product_id: ProductId(1),
            product_name: "Air Fryer".into(),
            required_members: required,
            joined_members: joined,
            ends_at: Utc::now() + Duration::hours(6),
            is_closed: false,
            is_deleted: false,
        }
    }

    #[test]
    fn test_almost_complete_range() {
        let now = Utc::now();
        assert!(!group(5, 2).is_almost_complete(now));
        assert!(group(5, 3).is_almost_complete(now));
        assert!(group(5, 4).is_almost_complete(now));
        assert!(!group(5, 5).is_almost_complete(now));
    }

    #[test]
    fn test_closed_or_ended_group_is_not_almost_complete() {
        let now = Utc::now();
        let closed = GroupPurchase {
            is_closed: true,
            ..group(5, 4)
        };
        assert!(!closed.is_almost_complete(now));

        let ended = GroupPurchase {
            ends_at: now - Duration::minutes(1),
            ..group(5, 4)
        };
        assert!(!ended.is_almost_complete(now));
    }
}
