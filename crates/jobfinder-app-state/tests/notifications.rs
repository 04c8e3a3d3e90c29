use std::time::Duration;

use jobfinder_app_state::{NewNotification, NotificationKind, NotificationStore};
use pretty_assertions::assert_eq;
use tokio::time::sleep;

#[tokio::test(start_paused = true)]
async fn default_duration_expires_after_five_seconds() {
    let store = NotificationStore::new();
    let id = store.success("Profile saved");

    sleep(Duration::from_millis(4999)).await;
    assert!(store.contains(id));

    sleep(Duration::from_millis(2)).await;
    assert!(!store.contains(id));
    assert!(store.is_empty());
}

#[tokio::test(start_paused = true)]
async fn zero_duration_behaves_like_default() {
    let store = NotificationStore::new();
    let id = store.add(
        NewNotification::new(NotificationKind::Warning, "Check your email").with_duration(Duration::ZERO),
    );

    sleep(Duration::from_millis(4999)).await;
    assert!(store.contains(id));

    sleep(Duration::from_millis(2)).await;
    assert!(!store.contains(id));
}

#[tokio::test(start_paused = true)]
async fn each_notification_expires_on_its_own_schedule() {
    let store = NotificationStore::new();
    let quick = store.add(
        NewNotification::new(NotificationKind::Info, "Copied").with_duration(Duration::from_millis(1000)),
    );
    let slow = store.error("Login failed");

    sleep(Duration::from_millis(1001)).await;
    assert!(!store.contains(quick));
    assert!(store.contains(slow));

    sleep(Duration::from_millis(4000)).await;
    assert!(store.is_empty());
}

#[tokio::test(start_paused = true)]
async fn manual_removal_before_expiry_is_harmless() {
    let store = NotificationStore::new();
    let first = store.info("first");
    let second = store.info("second");

    assert!(store.remove(first));
    sleep(Duration::from_millis(5001)).await;

    assert!(!store.contains(first));
    assert!(!store.contains(second));
}

#[tokio::test(start_paused = true)]
async fn listeners_observe_add_and_expiry() {
    let store = NotificationStore::new();
    let lengths = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = lengths.clone();
    store.state().subscribe(move |items| sink.lock().push(items.len()));

    store.info("hello");
    sleep(Duration::from_millis(5001)).await;

    assert_eq!(*lengths.lock(), vec![0, 1, 0]);
}

#[tokio::test(start_paused = true)]
async fn dropped_store_ends_pending_removals() {
    let store = NotificationStore::new();
    store.info("bye");
    drop(store);

    sleep(Duration::from_millis(5001)).await;
}
