//! Read-only commerce queries backing the detection jobs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shopnotify_core::error::{AppError, ErrorKind};
use shopnotify_core::result::AppResult;
use shopnotify_core::types::id::{GroupId, ProductId, UserId};
use shopnotify_entity::commerce::{
    CartItem, GroupJoin, GroupPurchase, Order, Product, User, WeeklyStats,
};

use crate::traits::CommerceQuery;

const CART_SELECT: &str = "SELECT c.id, c.user_id, c.product_id, p.name AS product_name, \
     c.unit_price_cents, c.quantity, c.added_at, c.checked_out, c.is_deleted \
     FROM cart_items c JOIN products p ON p.id = c.product_id \
     WHERE c.checked_out = FALSE AND c.is_deleted = FALSE \
     AND p.is_deleted = FALSE AND p.is_active = TRUE";

const GROUP_SELECT: &str = "SELECT g.id, g.creator_id, g.product_id, p.name AS product_name, \
     g.required_members, g.joined_members, g.ends_at, g.is_closed, g.is_deleted \
     FROM group_purchases g JOIN products p ON p.id = g.product_id";

const ACTIVE_USER: &str = "is_active = TRUE AND is_deleted = FALSE";

fn query_error(what: &str, e: sqlx::Error) -> AppError {
    AppError::with_source(ErrorKind::Persistence, format!("Failed to query {what}"), e)
}

/// Repository over carts, orders, group purchases, products, and users.
#[derive(Debug, Clone)]
pub struct CommerceRepository {
    pool: PgPool,
}

impl CommerceRepository {
    /// Create a new commerce repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommerceQuery for CommerceRepository {
    async fn pending_cart_items_added_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<CartItem>> {
        sqlx::query_as::<_, CartItem>(&format!(
            "{CART_SELECT} AND c.added_at >= $1 AND c.added_at <= $2 ORDER BY c.user_id, c.added_at"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_error("cart items", e))
    }

    async fn pending_cart_items_for_products(
        &self,
        product_ids: &[ProductId],
    ) -> AppResult<Vec<CartItem>> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = product_ids.iter().map(|id| id.get()).collect();
        sqlx::query_as::<_, CartItem>(&format!(
            "{CART_SELECT} AND c.product_id = ANY($1) ORDER BY c.user_id, c.product_id"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_error("cart items", e))
    }

    async fn orders_with_stage_change_since(&self, since: DateTime<Utc>) -> AppResult<Vec<Order>> {
        sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE is_deleted = FALSE AND ( \
             confirmed_at > $1 OR packed_at > $1 OR shipped_at > $1 \
             OR out_for_delivery_at > $1 OR delivered_at > $1 OR cancelled_at > $1) \
             ORDER BY id",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_error("orders", e))
    }

    async fn orders_delivered_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Order>> {
        sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE is_deleted = FALSE \
             AND cancelled_at IS NULL AND returned_at IS NULL \
             AND delivered_at >= $1 AND delivered_at <= $2 ORDER BY id",
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_error("delivered orders", e))
    }

    async fn group_joins_since(&self, since: DateTime<Utc>) -> AppResult<Vec<GroupJoin>> {
        sqlx::query_as::<_, GroupJoin>(
            "SELECT m.group_id, m.user_id, g.creator_id, p.name AS product_name, m.joined_at \
             FROM group_members m \
             JOIN group_purchases g ON g.id = m.group_id \
             JOIN products p ON p.id = g.product_id \
             WHERE m.joined_at > $1 AND m.user_id <> g.creator_id AND g.is_deleted = FALSE \
             ORDER BY m.joined_at",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_error("group joins", e))
    }

    async fn open_groups(&self, now: DateTime<Utc>) -> AppResult<Vec<GroupPurchase>> {
        sqlx::query_as::<_, GroupPurchase>(&format!(
            "{GROUP_SELECT} WHERE g.is_closed = FALSE AND g.is_deleted = FALSE AND g.ends_at > $1 \
             ORDER BY g.id"
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_error("open groups", e))
    }

    async fn group_member_ids(&self, group_id: GroupId) -> AppResult<Vec<UserId>> {
        sqlx::query_scalar::<_, UserId>(
            "SELECT creator_id AS user_id FROM group_purchases WHERE id = $1 \
             UNION SELECT user_id FROM group_members WHERE group_id = $1 \
             ORDER BY user_id",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_error("group members", e))
    }

    async fn discounted_products(&self) -> AppResult<Vec<Product>> {
        sqlx::query_as::<_, Product>(
            "SELECT id, name, price_cents, discount_price_cents, is_active, is_deleted \
             FROM products WHERE is_active = TRUE AND is_deleted = FALSE \
             AND discount_price_cents > 0 ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_error("discounted products", e))
    }

    async fn featured_products(&self, limit: i64) -> AppResult<Vec<Product>> {
        sqlx::query_as::<_, Product>(
            "SELECT id, name, price_cents, discount_price_cents, is_active, is_deleted \
             FROM products WHERE is_active = TRUE AND is_deleted = FALSE \
             ORDER BY created_at DESC, id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_error("featured products", e))
    }

    async fn active_users(&self) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT * FROM users WHERE {ACTIVE_USER} ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_error("users", e))
    }

    async fn users_inactive_since(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT * FROM users WHERE {ACTIVE_USER} AND modified_at <= $1 ORDER BY id"
        ))
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_error("inactive users", e))
    }

    async fn users_with_orders_since(&self, since: DateTime<Utc>) -> AppResult<Vec<UserId>> {
        sqlx::query_scalar::<_, UserId>(
            "SELECT DISTINCT o.user_id FROM orders o JOIN users u ON u.id = o.user_id \
             WHERE o.is_deleted = FALSE AND o.created_at > $1 \
             AND u.is_active = TRUE AND u.is_deleted = FALSE ORDER BY o.user_id",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_error("ordering users", e))
    }

    async fn weekly_stats(&self, user_id: UserId, since: DateTime<Utc>) -> AppResult<WeeklyStats> {
        sqlx::query_as::<_, WeeklyStats>(
            "SELECT COUNT(*) AS order_count, COALESCE(SUM(total_cents), 0)::BIGINT AS total_spent_cents \
             FROM orders WHERE user_id = $1 AND is_deleted = FALSE \
             AND cancelled_at IS NULL AND created_at > $2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| query_error("weekly stats", e))
    }
}
