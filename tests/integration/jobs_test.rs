//! Detection jobs end to end over the in-memory stores.

use chrono::{Duration, Utc};

use shopnotify_core::types::id::UserId;
use shopnotify_database::NotificationStore;
use shopnotify_entity::commerce::OrderStage;
use shopnotify_entity::notification::{NewNotification, NotificationTag};
use shopnotify_worker::JobKind;
use shopnotify_worker::jobs::OrderStatusJob;

use crate::helpers::{TestHarness, cart_item, order, product, user};

#[tokio::test]
async fn test_cart_abandonment_notifies_once_per_day() {
    let h = TestHarness::new();
    let now = Utc::now();
    let headphones = product(1, "Headphones", 2_450);
    h.commerce.add_user(user(7, "Dana Reyes", now));
    h.commerce.add_product(headphones.clone());
    h.commerce
        .add_cart_item(cart_item(1, 7, &headphones, 2, now - Duration::hours(4)));

    let job = h.registry.get(JobKind::CartAbandonment).unwrap();
    let first = job.run_at(now).await.unwrap();
    assert_eq!(first.dispatched, 1);

    let sent = h.sent_to(7);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].title, "🛒 You have items waiting!");
    let message = sent[0].message.as_deref().unwrap();
    assert!(message.contains("2 items"));
    assert!(message.contains("$49.00"));

    let second = job.run_at(now + Duration::minutes(5)).await.unwrap();
    assert_eq!((second.dispatched, second.skipped), (0, 1));
    assert_eq!(h.sent_to(7).len(), 1);
}

#[tokio::test]
async fn test_order_delivered_notifies_once_within_two_hours() {
    let h = TestHarness::new();
    let now = Utc::now();
    let mut o = order(1, 7, "TRK-7731", now - Duration::days(3));
    o.delivered_at = Some(now - Duration::minutes(10));
    h.commerce.add_order(o);

    let job = h.registry.get(JobKind::OrderStatus).unwrap();
    assert_eq!(job.run_at(now).await.unwrap().dispatched, 1);
    let sent = h.sent_to(7);
    assert_eq!(sent[0].title, "✅ Order Delivered");
    assert!(sent[0].message.as_deref().unwrap().contains("TRK-7731"));

    let again = job.run_at(now + Duration::minutes(15)).await.unwrap();
    assert_eq!(again.dispatched, 0);
    assert_eq!(h.sent_to(7).len(), 1);
}

async fn delivered_with_prior(age: Duration) -> usize {
    let h = TestHarness::new();
    let now = Utc::now();
    let mut o = order(1, 7, "TRK-0042", now - Duration::days(1));
    o.delivered_at = Some(now - Duration::minutes(10));
    let message = OrderStatusJob::message(&o, OrderStage::Delivered);
    h.commerce.add_order(o);

    let prior = h
        .store
        .create(&NewNotification::new(
            UserId(7),
            "✅ Order Delivered",
            message,
            NotificationTag::Orders,
        ))
        .await
        .unwrap();
    h.store.set_created_at(prior.id, now - age);

    let job = h.registry.get(JobKind::OrderStatus).unwrap();
    job.run_at(now).await.unwrap().dispatched
}

#[tokio::test]
async fn test_prior_exactly_at_horizon_no_longer_blocks() {
    assert_eq!(delivered_with_prior(Duration::hours(2)).await, 1);
}

#[tokio::test]
async fn test_prior_one_second_inside_horizon_blocks() {
    assert_eq!(
        delivered_with_prior(Duration::hours(2) - Duration::seconds(1)).await,
        0
    );
}

#[tokio::test]
async fn test_prefix_sharing_keys_are_distinct() {
    let h = TestHarness::new();
    let now = Utc::now();
    for (id, track) in [(1, "TRK-10"), (2, "TRK-1")] {
        let mut o = order(id, 7, track, now - Duration::days(1));
        o.delivered_at = Some(now - Duration::minutes(10));
        h.commerce.add_order(o);
    }
    for (id, name, price) in [(1, "Mug Set", 3_000), (2, "Mug", 1_200)] {
        let mut p = product(id, name, price);
        p.discount_price_cents = Some(price / 2);
        h.commerce.add_product(p.clone());
        h.commerce
            .add_cart_item(cart_item(id, 7, &p, 1, now - Duration::hours(2)));
    }

    let orders = h.registry.get(JobKind::OrderStatus).unwrap();
    assert_eq!(orders.run_at(now).await.unwrap().dispatched, 2);
    let deals = h.registry.get(JobKind::PriceDrop).unwrap();
    assert_eq!(deals.run_at(now).await.unwrap().dispatched, 2);

    let again = deals.run_at(now + Duration::minutes(5)).await.unwrap();
    assert_eq!((again.dispatched, again.skipped), (0, 2));
}

#[tokio::test]
async fn test_every_job_is_idempotent_on_unchanged_state() {
    let h = TestHarness::new();
    let now = Utc::now();
    let mut sale = product(2, "Blender", 8_000);
    sale.discount_price_cents = Some(6_000);
    h.commerce.add_user(user(7, "Dana Reyes", now - Duration::days(10)));
    h.commerce.add_product(sale.clone());
    h.commerce
        .add_cart_item(cart_item(1, 7, &sale, 1, now - Duration::hours(5)));
    let mut o = order(1, 7, "TRK-1000", now - Duration::days(5));
    o.shipped_at = Some(now - Duration::minutes(30));
    o.delivered_at = Some(now - Duration::days(4));
    h.commerce.add_order(o);

    for kind in JobKind::ALL {
        h.registry.run(kind).await.unwrap();
    }
    let after_first = h.sent_to(7).len();
    assert!(after_first >= 5, "expected several categories, got {after_first}");

    for kind in JobKind::ALL {
        let report = h.registry.run(kind).await.unwrap();
        assert_eq!(report.dispatched, 0, "{kind} dispatched twice");
    }
    assert_eq!(h.sent_to(7).len(), after_first);
}

#[tokio::test]
async fn test_failing_commerce_query_is_retryable() {
    let h = TestHarness::new();
    h.commerce.set_failing(true);

    let err = h.registry.run(JobKind::FlashSale).await.unwrap_err();
    assert!(err.is_retryable());
    assert!(h.store.all().is_empty());
}
