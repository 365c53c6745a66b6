//! Shared test helpers for integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use shopnotify_core::error::AppError;
use shopnotify_core::result::AppResult;
use shopnotify_core::traits::{PushChannel, PushResult, RealtimeChannel};
use shopnotify_core::types::id::{CartItemId, OrderId, ProductId, UserId};
use shopnotify_database::memory::{
    MemoryCommerceStore, MemoryDeviceRegistry, MemoryNotificationStore,
};
use shopnotify_entity::commerce::{CartItem, Order, Product, User};
use shopnotify_entity::notification::Notification;
use shopnotify_realtime::RealtimeHub;
use shopnotify_service::{NotificationDispatcher, NotificationService};
use shopnotify_worker::{JobContext, JobRegistry};

pub const EVENT: &str = "notification.created";

/// Push channel that records every send and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingPush {
    pub sent: Mutex<Vec<(String, String, String)>>,
    pub fail: bool,
}

impl RecordingPush {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl PushChannel for RecordingPush {
    async fn send(&self, device_token: &str, title: &str, body: &str) -> PushResult {
        self.sent
            .lock()
            .unwrap()
            .push((device_token.into(), title.into(), body.into()));
        if self.fail {
            PushResult::failed("HTTP 503 from push provider")
        } else {
            PushResult::delivered(Some("projects/test/messages/1".into()))
        }
    }
}

/// Realtime channel that always fails.
#[derive(Debug, Default)]
pub struct FailingRealtime;

#[async_trait]
impl RealtimeChannel for FailingRealtime {
    async fn broadcast(
        &self,
        group: &str,
        _event: &str,
        _payload: serde_json::Value,
    ) -> AppResult<()> {
        Err(AppError::channel(format!("realtime down for {group}")))
    }
}

/// The whole engine wired over in-memory stores.
pub struct TestHarness {
    pub commerce: Arc<MemoryCommerceStore>,
    pub store: Arc<MemoryNotificationStore>,
    pub devices: Arc<MemoryDeviceRegistry>,
    pub push: Arc<RecordingPush>,
    pub hub: Arc<RealtimeHub>,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub registry: JobRegistry,
}

impl TestHarness {
    pub fn new() -> Self {
        let hub = Arc::new(RealtimeHub::new(16));
        Self::build(Arc::new(RecordingPush::default()), hub.clone(), hub)
    }

    /// Push and realtime both fail on every call.
    pub fn with_failing_channels() -> Self {
        Self::build(
            Arc::new(RecordingPush::failing()),
            Arc::new(FailingRealtime),
            Arc::new(RealtimeHub::new(16)),
        )
    }

    fn build(
        push: Arc<RecordingPush>,
        realtime: Arc<dyn RealtimeChannel>,
        hub: Arc<RealtimeHub>,
    ) -> Self {
        let commerce = Arc::new(MemoryCommerceStore::new());
        let store = Arc::new(MemoryNotificationStore::new());
        let devices = Arc::new(MemoryDeviceRegistry::new());
        let dispatcher = Arc::new(NotificationDispatcher::new(
            store.clone(),
            devices.clone(),
            push.clone(),
            realtime,
            EVENT,
        ));
        let registry = JobRegistry::new(JobContext::new(commerce.clone(), dispatcher.clone(), 4));
        Self {
            commerce,
            store,
            devices,
            push,
            hub,
            dispatcher,
            registry,
        }
    }

    pub fn service(&self) -> NotificationService {
        NotificationService::new(self.store.clone())
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

pub fn user(id: i64, name: &str, modified_at: DateTime<Utc>) -> User {
    User {
        id: UserId(id),
        name: name.to_string(),
        phone: None,
        created_at: modified_at - Duration::days(90),
        modified_at,
        is_active: true,
        is_deleted: false,
    }
}

pub fn product(id: i64, name: &str, price_cents: i64) -> Product {
    Product {
        id: ProductId(id),
        name: name.to_string(),
        price_cents,
        discount_price_cents: None,
        is_active: true,
        is_deleted: false,
    }
}

pub fn cart_item(id: i64, user: i64, product: &Product, quantity: i32, added_at: DateTime<Utc>) -> CartItem {
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

pub fn order(id: i64, user: i64, track_id: &str, created_at: DateTime<Utc>) -> Order {
    Order {
        id: OrderId(id),
        user_id: UserId(user),
        track_id: track_id.to_string(),
        total_cents: 5_000,
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
