//! Store and query traits consumed by the service and worker crates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use shopnotify_core::result::AppResult;
use shopnotify_core::types::id::{GroupId, NotificationId, ProductId, UserId};
use shopnotify_core::types::pagination::{PageRequest, PageResponse};
use shopnotify_entity::commerce::{
    CartItem, GroupJoin, GroupPurchase, Order, Product, User, WeeklyStats,
};
use shopnotify_entity::notification::{NewNotification, Notification};

use crate::filter::NotificationFilter;

/// Persisted notification records.
///
/// Soft-deleted records are invisible to every read, count, and
/// existence check. Implementations must be read-after-write consistent:
/// a successful `create` is observed by the next `exists_matching`.
#[async_trait]
pub trait NotificationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a new unread, active notification stamped with the current time.
    async fn create(&self, new: &NewNotification) -> AppResult<Notification>;

    /// Whether any non-deleted notification matches the filter.
    async fn exists_matching(&self, filter: &NotificationFilter) -> AppResult<bool>;

    /// A user's visible notifications, newest first.
    async fn list_page(
        &self,
        user_id: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>>;

    /// Acknowledge one notification. `false` when no such record belongs to the user.
    async fn mark_read(&self, id: NotificationId, user_id: UserId) -> AppResult<bool>;

    /// Acknowledge every unread notification of a user. Always `true`.
    async fn mark_all_read(&self, user_id: UserId) -> AppResult<bool>;

    /// Visible, unacknowledged notifications of a user.
    async fn unread_count(&self, user_id: UserId) -> AppResult<i64>;

    /// Soft-delete one notification. `false` when no such record belongs to the user.
    async fn soft_delete(&self, id: NotificationId, user_id: UserId) -> AppResult<bool>;
}

/// Read-only access to commerce state.
///
/// Every method already excludes soft-deleted and inactive rows.
#[async_trait]
pub trait CommerceQuery: Send + Sync + std::fmt::Debug + 'static {
    /// Cart lines still pending checkout, added within `[from, to]`.
    async fn pending_cart_items_added_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<CartItem>>;

    /// Cart lines still pending checkout for any of the given products.
    async fn pending_cart_items_for_products(
        &self,
        product_ids: &[ProductId],
    ) -> AppResult<Vec<CartItem>>;

    /// Orders with any stage timestamp after `since`.
    async fn orders_with_stage_change_since(&self, since: DateTime<Utc>) -> AppResult<Vec<Order>>;

    /// Delivered, not returned, not cancelled orders with `delivered_at` in `[from, to]`.
    async fn orders_delivered_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Order>>;

    /// Members (other than the creator) who joined a group after `since`.
    async fn group_joins_since(&self, since: DateTime<Utc>) -> AppResult<Vec<GroupJoin>>;

    /// Group purchases still accepting members at `now`.
    async fn open_groups(&self, now: DateTime<Utc>) -> AppResult<Vec<GroupPurchase>>;

    /// Every member of a group, creator included.
    async fn group_member_ids(&self, group_id: GroupId) -> AppResult<Vec<UserId>>;

    /// Listed products with a positive discount price.
    async fn discounted_products(&self) -> AppResult<Vec<Product>>;

    /// Listed products to feature in recommendations.
    async fn featured_products(&self, limit: i64) -> AppResult<Vec<Product>>;

    /// Enabled accounts.
    async fn active_users(&self) -> AppResult<Vec<User>>;

    /// Enabled accounts whose record has not changed since `cutoff`.
    async fn users_inactive_since(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<User>>;

    /// Users who placed at least one order after `since`.
    async fn users_with_orders_since(&self, since: DateTime<Utc>) -> AppResult<Vec<UserId>>;

    /// Order count and spend of a user after `since`.
    async fn weekly_stats(&self, user_id: UserId, since: DateTime<Utc>) -> AppResult<WeeklyStats>;
}

/// Lookup of the push token currently registered for a user.
#[async_trait]
pub trait DeviceTokenLookup: Send + Sync + std::fmt::Debug + 'static {
    /// The user's current device token, if any.
    async fn device_token(&self, user_id: UserId) -> AppResult<Option<String>>;
}
