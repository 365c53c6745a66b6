//! Notification dispatcher: persist first, then fan out.

use std::sync::Arc;

use tracing::{debug, info, warn};

use shopnotify_core::error::AppError;
use shopnotify_core::traits::{PushChannel, RealtimeChannel, user_group};
use shopnotify_core::types::id::UserId;
use shopnotify_database::traits::{DeviceTokenLookup, NotificationStore};
use shopnotify_entity::notification::{NewNotification, Notification, NotificationTag};

/// Title of the operator-triggered test notification.
pub const TEST_TITLE: &str = "🔔 Test notification";

/// Persists notifications and pushes them out over both channels.
///
/// The store write is the durability point. Push and realtime delivery
/// are best-effort and never fail a dispatch.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    store: Arc<dyn NotificationStore>,
    devices: Arc<dyn DeviceTokenLookup>,
    push: Arc<dyn PushChannel>,
    realtime: Arc<dyn RealtimeChannel>,
    /// Realtime event name for a newly created notification.
    event_name: String,
}

impl NotificationDispatcher {
    /// Create a new dispatcher
    pub fn new(
        store: Arc<dyn NotificationStore>,
        devices: Arc<dyn DeviceTokenLookup>,
        push: Arc<dyn PushChannel>,
        realtime: Arc<dyn RealtimeChannel>,
        event_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            devices,
            push,
            realtime,
            event_name: event_name.into(),
        }
    }

    /// The store records are written to.
    pub fn store(&self) -> &Arc<dyn NotificationStore> {
        &self.store
    }

    /// Dispatch a notification to a user.
    pub async fn dispatch(
        &self,
        user_id: UserId,
        title: &str,
        message: &str,
        tag: NotificationTag,
    ) -> Result<Notification, AppError> {
        self.dispatch_new(&NewNotification::new(user_id, title, message, tag))
            .await
    }

    /// Dispatch a prepared notification, e.g. one carrying a group context.
    pub async fn dispatch_new(&self, new: &NewNotification) -> Result<Notification, AppError> {
        let notification = self.store.create(new).await?;
        debug!(
            user_id = %notification.user_id,
            notification_id = %notification.id,
            tag = %new.tag,
            "Notification stored"
        );

        self.send_push(&notification).await;
        self.send_realtime(&notification).await;
        Ok(notification)
    }

    /// Send a test notification to a user, bypassing every dedup rule.
    pub async fn send_test(&self, user_id: UserId) -> Result<Notification, AppError> {
        info!(user_id = %user_id, "Sending test notification");
        self.dispatch(
            user_id,
            TEST_TITLE,
            "If you can read this, notifications are working.",
            NotificationTag::System,
        )
        .await
    }

    async fn send_push(&self, notification: &Notification) {
        let token = match self.devices.device_token(notification.user_id).await {
            Ok(Some(token)) if !token.trim().is_empty() => token,
            Ok(_) => {
                debug!(user_id = %notification.user_id, "No device token, push skipped");
                return;
            }
            Err(e) => {
                warn!(user_id = %notification.user_id, error = %e, "Device token lookup failed, push skipped");
                return;
            }
        };

        let body = notification.message.as_deref().unwrap_or_default();
        let result = self.push.send(&token, &notification.title, body).await;
        if !result.success {
            warn!(
                user_id = %notification.user_id,
                notification_id = %notification.id,
                error = result.error.as_deref().unwrap_or("unknown"),
                "Push delivery failed"
            );
        }
    }

    async fn send_realtime(&self, notification: &Notification) {
        let payload = match serde_json::to_value(notification) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(notification_id = %notification.id, error = %e, "Failed to serialize notification");
                return;
            }
        };
        let group = user_group(notification.user_id);
        if let Err(e) = self
            .realtime
            .broadcast(&group, &self.event_name, payload)
            .await
        {
            warn!(group = %group, error = %e, "Realtime broadcast failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use shopnotify_core::result::AppResult;
    use shopnotify_core::traits::PushResult;
    use shopnotify_database::memory::{MemoryDeviceRegistry, MemoryNotificationStore};

    use super::*;

    #[derive(Debug, Default)]
    struct RecordingPush {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl PushChannel for RecordingPush {
        async fn send(&self, device_token: &str, title: &str, _body: &str) -> PushResult {
            self.sent
                .lock()
                .unwrap()
                .push((device_token.to_string(), title.to_string()));
            PushResult::delivered(None)
        }
    }

    #[derive(Debug, Default)]
    struct RecordingRealtime {
        events: Mutex<Vec<(String, serde_json::Value)>>,
    }

    #[async_trait]
    impl RealtimeChannel for RecordingRealtime {
        async fn broadcast(
            &self,
            group: &str,
            _event: &str,
            payload: serde_json::Value,
        ) -> AppResult<()> {
            self.events
                .lock()
                .unwrap()
                .push((group.to_string(), payload));
            Ok(())
        }
    }

    struct Fixture {
        store: Arc<MemoryNotificationStore>,
        devices: Arc<MemoryDeviceRegistry>,
        push: Arc<RecordingPush>,
        realtime: Arc<RecordingRealtime>,
        dispatcher: NotificationDispatcher,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryNotificationStore::new());
        let devices = Arc::new(MemoryDeviceRegistry::new());
        let push = Arc::new(RecordingPush::default());
        let realtime = Arc::new(RecordingRealtime::default());
        let dispatcher = NotificationDispatcher::new(
            store.clone(),
            devices.clone(),
            push.clone(),
            realtime.clone(),
            "notification.created",
        );
        Fixture {
            store,
            devices,
            push,
            realtime,
            dispatcher,
        }
    }

    #[tokio::test]
    async fn test_dispatch_fans_out_to_both_channels() {
        let f = fixture();
        f.devices.register(UserId(3), "tok-3");

        let n = f
            .dispatcher
            .dispatch(UserId(3), "Hi", "There", NotificationTag::Deals)
            .await
            .unwrap();

        assert_eq!(f.store.all().len(), 1);
        assert_eq!(
            f.push.sent.lock().unwrap().as_slice(),
            &[("tok-3".to_string(), "Hi".to_string())]
        );
        let events = f.realtime.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "user_3");
        assert_eq!(events[0].1["id"], serde_json::json!(n.id.get()));
        assert_eq!(events[0].1["url"], "deals");
    }

    #[tokio::test]
    async fn test_missing_or_blank_token_skips_push() {
        let f = fixture();
        f.devices.register(UserId(4), "  ");

        f.dispatcher
            .dispatch(UserId(3), "a", "b", NotificationTag::Cart)
            .await
            .unwrap();
        f.dispatcher
            .dispatch(UserId(4), "a", "b", NotificationTag::Cart)
            .await
            .unwrap();

        assert!(f.push.sent.lock().unwrap().is_empty());
        assert_eq!(f.realtime.events.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_store_failure_sends_nothing() {
        let f = fixture();
        f.devices.register(UserId(3), "tok-3");
        f.store.set_failing(true);

        let err = f
            .dispatcher
            .dispatch(UserId(3), "a", "b", NotificationTag::Cart)
            .await
            .unwrap_err();

        assert!(err.is_persistence());
        assert!(f.push.sent.lock().unwrap().is_empty());
        assert!(f.realtime.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_test_uses_system_tag() {
        let f = fixture();
        let n = f.dispatcher.send_test(UserId(1)).await.unwrap();
        assert_eq!(n.title, TEST_TITLE);
        assert_eq!(n.tag(), Some(NotificationTag::System));
    }
}
