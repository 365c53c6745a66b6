//! Read side of the notification store through the service.

use chrono::{Duration, Utc};

use shopnotify_core::types::id::{NotificationId, UserId};
use shopnotify_core::types::pagination::PageRequest;
use shopnotify_database::NotificationStore;
use shopnotify_entity::notification::{NewNotification, NotificationTag};

use crate::helpers::TestHarness;

async fn seed(h: &TestHarness, user: i64, count: i64) -> Vec<NotificationId> {
    let base = Utc::now() - Duration::hours(count);
    let mut ids = Vec::new();
    for i in 0..count {
        let n = h
            .store
            .create(&NewNotification::new(
                UserId(user),
                format!("Notification {i}"),
                "body",
                NotificationTag::System,
            ))
            .await
            .unwrap();
        h.store.set_created_at(n.id, base + Duration::hours(i));
        ids.push(n.id);
    }
    ids
}

#[tokio::test]
async fn test_pagination_of_23_in_pages_of_10() {
    let h = TestHarness::new();
    seed(&h, 3, 23).await;
    let service = h.service();

    let first = service
        .list_notifications(UserId(3), &PageRequest::new(1, 10))
        .await
        .unwrap();
    assert_eq!(first.items.len(), 10);
    assert!(first.has_more);
    assert_eq!(first.total_items, 23);
    assert_eq!(first.items[0].title, "Notification 22");
    assert!(
        first
            .items
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at)
    );

    let second = service
        .list_notifications(UserId(3), &PageRequest::new(2, 10))
        .await
        .unwrap();
    assert_eq!(second.items.len(), 10);
    assert!(second.has_more);

    let third = service
        .list_notifications(UserId(3), &PageRequest::new(3, 10))
        .await
        .unwrap();
    assert_eq!(third.items.len(), 3);
    assert!(!third.has_more);
    assert_eq!(third.items[2].title, "Notification 0");
}

#[tokio::test]
async fn test_mark_all_read_zeroes_unread_and_ignores_deleted() {
    let h = TestHarness::new();
    let ids = seed(&h, 5, 4).await;
    let service = h.service();

    assert!(service.delete(UserId(5), ids[0]).await.unwrap());
    assert_eq!(service.unread_count(UserId(5)).await.unwrap(), 3);

    assert!(service.mark_all_read(UserId(5)).await.unwrap());
    assert_eq!(service.unread_count(UserId(5)).await.unwrap(), 0);

    let page = service
        .list_notifications(UserId(5), &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 3);
    assert!(page.items.iter().all(|n| n.acknowledged == Some(true)));
}

#[tokio::test]
async fn test_foreign_and_missing_records_return_false() {
    let h = TestHarness::new();
    let ids = seed(&h, 5, 1).await;
    let service = h.service();

    assert!(!service.mark_read(UserId(6), ids[0]).await.unwrap());
    assert!(!service.delete(UserId(6), ids[0]).await.unwrap());
    assert!(!service.mark_read(UserId(5), NotificationId(999)).await.unwrap());
    assert!(service.mark_read(UserId(5), ids[0]).await.unwrap());
}
