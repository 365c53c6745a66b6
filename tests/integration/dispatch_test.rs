//! Dispatcher durability and fan-out.

use shopnotify_core::types::id::UserId;
use shopnotify_core::types::pagination::PageRequest;
use shopnotify_entity::notification::NotificationTag;
use shopnotify_realtime::MessageEnvelope;

use crate::helpers::{EVENT, TestHarness};

#[tokio::test]
async fn test_record_survives_failing_channels() {
    let h = TestHarness::with_failing_channels();
    h.devices.register(UserId(7), "device-token-7");

    let notification = h
        .dispatcher
        .dispatch(UserId(7), "⚡ Flash sale", "Everything is 20% off", NotificationTag::Deals)
        .await
        .unwrap();

    assert_eq!(h.push.count(), 1);
    let page = h
        .service()
        .list_notifications(UserId(7), &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, notification.id);
    assert!(page.items[0].is_unread());
}

#[tokio::test]
async fn test_store_failure_sends_nothing() {
    let h = TestHarness::new();
    h.devices.register(UserId(7), "device-token-7");
    let mut rx = h.hub.join("user_7");
    h.store.set_failing(true);

    let result = h
        .dispatcher
        .dispatch(UserId(7), "title", "body", NotificationTag::System)
        .await;

    assert!(result.unwrap_err().is_persistence());
    assert_eq!(h.push.count(), 0);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_fans_out_to_push_and_user_group() {
    let h = TestHarness::new();
    h.devices.register(UserId(7), "device-token-7");
    let mut own = h.hub.join("user_7");
    let mut other = h.hub.join("user_8");

    let notification = h.dispatcher.send_test(UserId(7)).await.unwrap();

    let sent = h.push.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "device-token-7");
    assert_eq!(sent[0].1, notification.title);

    let raw = own.try_recv().unwrap();
    let envelope: MessageEnvelope = serde_json::from_str(&raw).unwrap();
    assert_eq!(envelope.event, EVENT);
    assert_eq!(envelope.group, "user_7");
    assert_eq!(envelope.payload["id"], notification.id.get());
    assert!(other.try_recv().is_err());
}

#[tokio::test]
async fn test_no_device_token_skips_push_only() {
    let h = TestHarness::new();
    let mut rx = h.hub.join("user_9");

    h.dispatcher
        .dispatch(UserId(9), "title", "body", NotificationTag::System)
        .await
        .unwrap();

    assert_eq!(h.push.count(), 0);
    assert!(rx.try_recv().is_ok());
}
