use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::json;

use super::*;
use crate::net::Method;
use crate::net::testing::{MockTransport, error_reply, notification_json, ok_reply};

fn bell_transport() -> Arc<MockTransport> {
    MockTransport::new(|req| match (req.method, req.path.as_str()) {
        (Method::Get, "/notifications") => Ok(ok_reply(&json!({
            "notifications": [notification_json("n1", false), notification_json("n2", false), notification_json("n3", true)],
            "unreadCount": 2
        }))),
        (Method::Get, "/notifications/unread-count") => Ok(ok_reply(&json!({ "unreadCount": 2 }))),
        _ => Ok(ok_reply(&json!({}))),
    })
}

// =============================================================================
// POLLER
// =============================================================================

#[tokio::test(start_paused = true)]
async fn polls_immediately_then_on_interval() {
    let counter = Arc::new(AtomicU64::new(3));
    let served = counter.clone();
    let transport = MockTransport::new(move |_| {
        Ok(ok_reply(&json!({ "unreadCount": served.load(Ordering::SeqCst) })))
    });
    let poller = UnreadPoller::spawn(transport.client(), Duration::from_secs(30));
    let mut rx = poller.subscribe();

    rx.wait_for(|n| *n == 3).await.unwrap();
    assert_eq!(transport.count(Method::Get, "/notifications/unread-count"), 1);

    counter.store(5, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_secs(29)).await;
    assert_eq!(poller.unread(), 3, "no poll before the interval elapses");

    rx.wait_for(|n| *n == 5).await.unwrap();
    assert_eq!(transport.count(Method::Get, "/notifications/unread-count"), 2);
}

#[tokio::test(start_paused = true)]
async fn failed_poll_keeps_last_count() {
    let fail = Arc::new(AtomicU64::new(0));
    let flag = fail.clone();
    let transport = MockTransport::new(move |_| {
        if flag.load(Ordering::SeqCst) == 1 {
            Ok(error_reply(500, "boom"))
        } else {
            Ok(ok_reply(&json!({ "unreadCount": 4 })))
        }
    });
    let poller = UnreadPoller::spawn(transport.client(), Duration::from_secs(30));
    poller.subscribe().wait_for(|n| *n == 4).await.unwrap();

    fail.store(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_secs(65)).await;

    assert_eq!(transport.count(Method::Get, "/notifications/unread-count"), 3);
    assert_eq!(poller.unread(), 4);
}

#[tokio::test(start_paused = true)]
async fn dropping_poller_stops_polling() {
    let transport = bell_transport();
    let poller = UnreadPoller::spawn(transport.client(), Duration::from_secs(30));
    poller.subscribe().wait_for(|n| *n == 2).await.unwrap();

    drop(poller);
    tokio::time::sleep(Duration::from_secs(120)).await;

    assert_eq!(transport.count(Method::Get, "/notifications/unread-count"), 1);
}

// =============================================================================
// BELL
// =============================================================================

#[tokio::test]
async fn opening_loads_recent_with_limit() {
    let transport = bell_transport();
    let mut bell = NotificationBell::new(transport.client());

    bell.toggle().await.unwrap();

    assert!(bell.is_open());
    assert_eq!(bell.recent().len(), 3);
    assert_eq!(bell.unread(), 2);
    assert_eq!(transport.requests()[0].query_value("limit"), Some("8"));

    bell.toggle().await.unwrap();
    assert!(!bell.is_open());
    assert_eq!(transport.requests().len(), 1, "closing does not fetch");
}

#[tokio::test]
async fn mark_read_decrements_and_never_underflows() {
    let transport = bell_transport();
    let mut bell = NotificationBell::new(transport.client());
    bell.load_recent().await.unwrap();

    bell.mark_read("n1").await.unwrap();
    assert_eq!(bell.unread(), 1);
    assert!(bell.recent()[0].is_read);

    bell.set_unread(0);
    bell.mark_read("n2").await.unwrap();
    assert_eq!(bell.unread(), 0);
    assert_eq!(transport.count(Method::Put, "/notifications/n2/read"), 1);
}

#[tokio::test]
async fn mark_all_read_twice_leaves_zero() {
    let transport = bell_transport();
    let mut bell = NotificationBell::new(transport.client());
    bell.load_recent().await.unwrap();

    bell.mark_all_read().await.unwrap();
    bell.mark_all_read().await.unwrap();

    assert_eq!(bell.unread(), 0);
    assert!(bell.recent().iter().all(|n| n.is_read));
    assert_eq!(transport.count(Method::Put, "/notifications/read-all"), 2);
}

#[tokio::test]
async fn failed_mark_read_changes_nothing() {
    let transport = MockTransport::new(|req| match req.method {
        Method::Get => Ok(ok_reply(&json!({ "notifications": [notification_json("n1", false)], "unreadCount": 1 }))),
        _ => Ok(error_reply(404, "Notification not found")),
    });
    let mut bell = NotificationBell::new(transport.client());
    bell.load_recent().await.unwrap();

    let err = bell.mark_read("n1").await.unwrap_err();

    assert_eq!(err.to_string(), "Notification not found");
    assert_eq!(bell.unread(), 1);
    assert!(!bell.recent()[0].is_read);
}

#[tokio::test]
async fn refresh_count_ignores_failures() {
    let transport = MockTransport::unreachable();
    let mut bell = NotificationBell::new(transport.client());
    bell.set_unread(7);
    bell.refresh_count().await;
    assert_eq!(bell.unread(), 7);
}

#[tokio::test]
async fn poll_reloads_list_only_while_open() {
    let transport = bell_transport();
    let mut bell = NotificationBell::new(transport.client());

    bell.poll().await;
    assert_eq!(bell.unread(), 2);
    assert!(bell.recent().is_empty());
    assert_eq!(transport.count(Method::Get, "/notifications"), 0);

    bell.toggle().await.unwrap();
    bell.poll().await;
    assert_eq!(transport.count(Method::Get, "/notifications"), 2);
    assert_eq!(bell.recent().len(), 3);
}

#[tokio::test]
async fn failed_poll_keeps_open_list() {
    let fail = Arc::new(AtomicU64::new(0));
    let flag = Arc::clone(&fail);
    let transport = MockTransport::new(move |req| {
        if flag.load(Ordering::SeqCst) == 1 {
            return Ok(error_reply(500, "Database unavailable"));
        }
        match req.path.as_str() {
            "/notifications" => Ok(ok_reply(&json!({ "notifications": [notification_json("n1", false)], "unreadCount": 1 }))),
            _ => Ok(ok_reply(&json!({ "unreadCount": 1 }))),
        }
    });
    let mut bell = NotificationBell::new(transport.client());
    bell.toggle().await.unwrap();

    fail.store(1, Ordering::SeqCst);
    bell.poll().await;

    assert_eq!(bell.recent().len(), 1);
    assert_eq!(bell.unread(), 1);
    assert_eq!(transport.count(Method::Get, "/notifications/unread-count"), 1);
}
