//! Fixtures for job unit tests.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use shopnotify_core::types::id::{CartItemId, OrderId, ProductId, UserId};
use shopnotify_database::memory::{
    MemoryCommerceStore, MemoryDeviceRegistry, MemoryNotificationStore,
};
use shopnotify_entity::commerce::{CartItem, Order, Product, User};
use shopnotify_entity::notification::Notification;
use shopnotify_push::LoggingPushChannel;
use shopnotify_realtime::RealtimeHub;
use shopnotify_service::notification::NotificationDispatcher;

use crate::job::JobContext;

pub struct Fixture {
    pub commerce: Arc<MemoryCommerceStore>,
    pub store: Arc<MemoryNotificationStore>,
    pub ctx: JobContext,
}

impl Fixture {
    pub fn new() -> Self {
        let commerce = Arc::new(MemoryCommerceStore::new());
        let store = Arc::new(MemoryNotificationStore::new());
        let dispatcher = Arc::new(NotificationDispatcher::new(
            store.clone(),
            Arc::new(MemoryDeviceRegistry::new()),
            Arc::new(LoggingPushChannel::new()),
            Arc::new(RealtimeHub::new(8)),
            "notification.created",
        ));
        let ctx = JobContext::new(commerce.clone(), dispatcher, 4);
        Self {
            commerce,
            store,
            ctx,
        }
    }

    /// Non-deleted notifications of a user.
    pub fn sent_to(&self, user: i64) -> Vec<Notification> {
        self.store
            .all()
            .into_iter()
            .filter(|n| n.user_id == UserId(user) && !n.is_deleted)
            .collect()
    }
}

pub fn user(id: i64, modified_at: DateTime<Utc>) -> User {
    User {
        id: UserId(id),
        name: format!("Customer {id}"),
        phone: None,
        created_at: modified_at - Duration::days(30),
        modified_at,
        is_active: true,
        is_deleted: false,
    }
}

pub fn product(id: i64, price_cents: i64, discount_price_cents: Option<i64>) -> Product {
    Product {
        id: ProductId(id),
        name: format!("Product {id}"),
        price_cents,
        discount_price_cents,
        is_active: true,
        is_deleted: false,
    }
}

pub fn cart_item(
    id: i64,
    user: i64,
    product: &Product,
    quantity: i32,
    added_at: DateTime<Utc>,
) -> CartItem {
    CartItem {
        id: CartItemId(id),
        user_id: UserId(user),
        product_id: product.id,
        product_name: product.name.clone(),
        unit_price_cents: product.price_cents,
        quantity,
        added_at,
        checked_out: false,
        is_deleted: false,
    }
}

pub fn order(id: i64, user: i64, created_at: DateTime<Utc>) -> Order {
    Order {
        id: OrderId(id),
        user_id: UserId(user),
        track_id: format!("TRK-{id:05}"),
        total_cents: 4_250,
        created_at,
        confirmed_at: None,
        packed_at: None,
        shipped_at: None,
        out_for_delivery_at: None,
        delivered_at: None,
        cancelled_at: None,
        returned_at: None,
        is_deleted: false,
    }
}
