//! In-memory commerce state.

use std::collections::BTreeSet;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use shopnotify_core::error::AppError;
use shopnotify_core::result::AppResult;
use shopnotify_core::types::id::{GroupId, ProductId, UserId};
use shopnotify_entity::commerce::{
    CartItem, GroupJoin, GroupPurchase, Order, OrderStage, Product, User, WeeklyStats,
};

use crate::traits::CommerceQuery;

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    products: Vec<Product>,
    cart_items: Vec<CartItem>,
    orders: Vec<Order>,
    groups: Vec<GroupPurchase>,
    members: Vec<(GroupId, UserId, DateTime<Utc>)>,
}

/// Seedable [`CommerceQuery`] used by tests and local runs.
#[derive(Debug, Default)]
pub struct MemoryCommerceStore {
    state: RwLock<State>,
    failing: AtomicBool,
}

impl MemoryCommerceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every query fail with a persistence error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn add_user(&self, user: User) {
        self.write().users.push(user);
    }

    pub fn add_product(&self, product: Product) {
        self.write().products.push(product);
    }

    pub fn add_cart_item(&self, item: CartItem) {
        self.write().cart_items.push(item);
    }

    pub fn add_order(&self, order: Order) {
        self.write().orders.push(order);
    }

    pub fn add_group(&self, group: GroupPurchase) {
        self.write().groups.push(group);
    }

    pub fn add_group_member(&self, group_id: GroupId, user_id: UserId, joined_at: DateTime<Utc>) {
        self.write().members.push((group_id, user_id, joined_at));
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn read(&self) -> AppResult<std::sync::RwLockReadGuard<'_, State>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::persistence("commerce store unavailable"));
        }
        Ok(self.state.read().unwrap_or_else(|e| e.into_inner()))
    }
}

impl State {
    fn product_listed(&self, id: ProductId) -> bool {
        self.products
            .iter()
            .any(|p| p.id == id && p.is_available())
    }

    fn user_active(&self, id: UserId) -> bool {
        self.users
            .iter()
            .any(|u| u.id == id && u.is_active && !u.is_deleted)
    }
}

#[async_trait]
impl CommerceQuery for MemoryCommerceStore {
    async fn pending_cart_items_added_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<CartItem>> {
        let state = self.read()?;
        Ok(state
            .cart_items
            .iter()
            .filter(|c| c.is_pending() && c.added_at >= from && c.added_at <= to)
            .filter(|c| state.product_listed(c.product_id))
            .cloned()
            .collect())
    }

    async fn pending_cart_items_for_products(
        &self,
        product_ids: &[ProductId],
    ) -> AppResult<Vec<CartItem>> {
        let state = self.read()?;
        Ok(state
            .cart_items
            .iter()
            .filter(|c| c.is_pending() && product_ids.contains(&c.product_id))
            .filter(|c| state.product_listed(c.product_id))
            .cloned()
            .collect())
    }

    async fn orders_with_stage_change_since(&self, since: DateTime<Utc>) -> AppResult<Vec<Order>> {
        let state = self.read()?;
        Ok(state
            .orders
            .iter()
            .filter(|o| !o.is_deleted)
            .filter(|o| {
                OrderStage::ALL
                    .iter()
                    .any(|stage| o.stage_time(*stage).is_some_and(|at| at > since))
            })
            .cloned()
            .collect())
    }

    async fn orders_delivered_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Order>> {
        let state = self.read()?;
        Ok(state
            .orders
            .iter()
            .filter(|o| !o.is_deleted && o.cancelled_at.is_none() && o.returned_at.is_none())
            .filter(|o| o.delivered_at.is_some_and(|at| at >= from && at <= to))
            .cloned()
            .collect())
    }

    async fn group_joins_since(&self, since: DateTime<Utc>) -> AppResult<Vec<GroupJoin>> {
        let state = self.read()?;
        let mut joins: Vec<GroupJoin> = state
            .members
            .iter()
            .filter(|(_, _, joined_at)| *joined_at > since)
            .filter_map(|(group_id, user_id, joined_at)| {
                let group = state
                    .groups
                    .iter()
                    .find(|g| g.id == *group_id && !g.is_deleted)?;
                (group.creator_id != *user_id).then(|| GroupJoin {
                    group_id: *group_id,
                    user_id: *user_id,
                    creator_id: group.creator_id,
                    product_name: group.product_name.clone(),
                    joined_at: *joined_at,
                })
            })
            .collect();
        joins.sort_by_key(|j| j.joined_at);
        Ok(joins)
    }

    async fn open_groups(&self, now: DateTime<Utc>) -> AppResult<Vec<GroupPurchase>> {
        let state = self.read()?;
        Ok(state
            .groups
            .iter()
            .filter(|g| g.is_open(now))
            .cloned()
            .collect())
    }

    async fn group_member_ids(&self, group_id: GroupId) -> AppResult<Vec<UserId>> {
        let state = self.read()?;
        let mut ids: BTreeSet<UserId> = state
            .members
            .iter()
            .filter(|(g, _, _)| *g == group_id)
            .map(|(_, u, _)| *u)
            .collect();
        if let Some(group) = state.groups.iter().find(|g| g.id == group_id) {
            ids.insert(group.creator_id);
        }
        Ok(ids.into_iter().collect())
    }

    async fn discounted_products(&self) -> AppResult<Vec<Product>> {
        let state = self.read()?;
        Ok(state
            .products
            .iter()
            .filter(|p| p.is_available() && p.is_discounted())
            .cloned()
            .collect())
    }

    async fn featured_products(&self, limit: i64) -> AppResult<Vec<Product>> {
        let state = self.read()?;
        Ok(state
            .products
            .iter()
            .rev()
            .filter(|p| p.is_available())
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn active_users(&self) -> AppResult<Vec<User>> {
        let state = self.read()?;
        Ok(state
            .users
            .iter()
            .filter(|u| u.is_active && !u.is_deleted)
            .cloned()
            .collect())
    }

    async fn users_inactive_since(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<User>> {
        let state = self.read()?;
        Ok(state
            .users
            .iter()
            .filter(|u| u.is_active && !u.is_deleted && u.modified_at <= cutoff)
            .cloned()
            .collect())
    }

    async fn users_with_orders_since(&self, since: DateTime<Utc>) -> AppResult<Vec<UserId>> {
        let state = self.read()?;
        let ids: BTreeSet<UserId> = state
            .orders
            .iter()
            .filter(|o| !o.is_deleted && o.created_at > since && state.user_active(o.user_id))
            .map(|o| o.user_id)
            .collect();
        Ok(ids.into_iter().collect())
    }

    async fn weekly_stats(&self, user_id: UserId, since: DateTime<Utc>) -> AppResult<WeeklyStats> {
        let state = self.read()?;
        Ok(state
            .orders
            .iter()
            .filter(|o| o.user_id == user_id && !o.is_deleted && o.cancelled_at.is_none())
            .filter(|o| o.created_at > since)
            .fold(WeeklyStats::default(), |acc, o| WeeklyStats {
                order_count: acc.order_count + 1,
                total_spent_cents: acc.total_spent_cents + o.total_cents,
            }))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn product(id: i64, discount: Option<i64>) -> Product {
        Product {
            id: ProductId(id),
            name: format!("Product {id}"),
            price_cents: 2500,
            discount_price_cents: discount,
            is_active: true,
            is_deleted: false,
        }
    }

    #[tokio::test]
    async fn test_discounted_products_require_positive_price() {
        let store = MemoryCommerceStore::new();
        store.add_product(product(1, Some(1999)));
        store.add_product(product(2, Some(0)));
        store.add_product(product(3, None));
        store.add_product(Product {
            is_deleted: true,
            ..product(4, Some(999))
        });

        let found = store.discounted_products().await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, ProductId(1));
    }

    #[tokio::test]
    async fn test_group_member_ids_include_creator_once() {
        let store = MemoryCommerceStore::new();
        let now = Utc::now();
        store.add_group(GroupPurchase {
            id: GroupId(9),
            creator_id: UserId(1),
            product_id: ProductId(1),
            product_name: "Kettle".into(),
            required_members: 4,
            joined_members: 3,
            ends_at: now + Duration::days(1),
            is_closed: false,
            is_deleted: false,
        });
        store.add_group_member(GroupId(9), UserId(1), now);
        store.add_group_member(GroupId(9), UserId(4), now);
        store.add_group_member(GroupId(9), UserId(2), now);

        let ids = store.group_member_ids(GroupId(9)).await.unwrap();
        assert_eq!(ids, vec![UserId(1), UserId(2), UserId(4)]);

        let joins = store.group_joins_since(now - Duration::hours(1)).await.unwrap();
        assert_eq!(joins.len(), 2);
        assert!(joins.iter().all(|j| j.creator_id == UserId(1)));
    }

    #[tokio::test]
    async fn test_failing_store_rejects_queries() {
        let store = MemoryCommerceStore::new();
        store.set_failing(true);
        let err = store.active_users().await.unwrap_err();
        assert!(err.is_persistence());
    }
}
