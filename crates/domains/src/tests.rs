//! End-to-end dashboard scenarios over the in-memory feed.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::time::sleep;

use lodgeboard_realtime::events::{Operation, Scope};
use lodgeboard_realtime::feed::{InMemoryFeedSource, RawChange};
use lodgeboard_realtime::notifications::Severity;
use lodgeboard_realtime::sinks::{MockCacheSink, MockNotificationSink};
use lodgeboard_realtime::SyncEngine;

use crate::{dashboard, folios, housekeeping, maintenance, pos, rooms};

pub mod support {
    use chrono::Utc;
    use lodgeboard_realtime::events::{ChangeEvent, Operation, Scope, Snapshot};

    fn snapshot(value: serde_json::Value) -> Snapshot {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    fn event(
        entity: &str,
        operation: Operation,
        before: Option<serde_json::Value>,
        after: Option<serde_json::Value>,
    ) -> ChangeEvent {
        ChangeEvent {
            entity: entity.to_string(),
            operation,
            before: before.map(snapshot),
            after: after.map(snapshot),
            scope: Scope::property("t-1", "p-1"),
            received_at: Utc::now(),
        }
    }

    pub fn created(entity: &str, after: serde_json::Value) -> ChangeEvent {
        event(entity, Operation::Created, None, Some(after))
    }

    pub fn updated(
        entity: &str,
        before: serde_json::Value,
        after: serde_json::Value,
    ) -> ChangeEvent {
        event(entity, Operation::Updated, Some(before), Some(after))
    }

    pub fn deleted(entity: &str, before: serde_json::Value) -> ChangeEvent {
        event(entity, Operation::Deleted, Some(before), None)
    }
}

struct Dashboard {
    feed: Arc<InMemoryFeedSource>,
    cache: MockCacheSink,
    notifications: MockNotificationSink,
    engine: SyncEngine,
    scope: Scope,
}

async fn mounted_dashboard() -> Dashboard {
    let feed = Arc::new(InMemoryFeedSource::new());
    let cache = MockCacheSink::new();
    let notifications = MockNotificationSink::new();
    let mut engine = SyncEngine::new(
        dashboard::channels(),
        feed.clone(),
        Arc::new(cache.clone()),
        Arc::new(notifications.clone()),
    )
    .unwrap();

    let scope = Scope::property("tenant-1", "property-1");
    engine.start(scope.clone()).await.unwrap();

    Dashboard {
        feed,
        cache,
        notifications,
        engine,
        scope,
    }
}

fn insert(after: serde_json::Value) -> RawChange {
    RawChange {
        operation: Operation::Created,
        before: None,
        after: Some(after),
    }
}

fn update(before: serde_json::Value, after: serde_json::Value) -> RawChange {
    RawChange {
        operation: Operation::Updated,
        before: Some(before),
        after: Some(after),
    }
}

#[tokio::test]
async fn test_pos_order_insert_notifies_and_invalidates_kitchen_views() {
    let mut board = mounted_dashboard().await;

    board.feed.push(
        &board.scope,
        "pos_orders",
        insert(json!({"order_number": "ORD-042", "table_number": "7", "status": "open"})),
    );
    sleep(Duration::from_millis(50)).await;

    let transitions = board.notifications.transitions();
    assert_eq!(transitions.len(), 1);
    assert!(transitions[0].body.contains("ORD-042"));
    assert!(transitions[0].body.contains("7"));

    assert!(board.cache.contains(pos::POS_ORDERS));
    assert!(board.cache.contains(pos::KITCHEN_ORDERS));
    assert!(board.cache.contains(pos::WAITER_ORDERS));

    board.engine.stop().await;
}

#[tokio::test]
async fn test_resolved_ticket_notifies_success_and_refreshes_rooms() {
    let mut board = mounted_dashboard().await;

    board.feed.push(
        &board.scope,
        "maintenance_tickets",
        update(
            json!({"title": "Leaking faucet", "status": "open"}),
            json!({"title": "Leaking faucet", "status": "resolved"}),
        ),
    );
    sleep(Duration::from_millis(50)).await;

    let transitions = board.notifications.transitions();
    assert_eq!(transitions.len(), 1);
    assert_eq!(transitions[0].severity, Severity::Success);

    assert!(board.cache.contains(maintenance::MAINTENANCE_TICKETS));
    assert!(board.cache.contains(maintenance::MAINTENANCE_STATS));
    assert!(board.cache.contains(rooms::ROOMS));

    board.engine.stop().await;
}

#[tokio::test]
async fn test_room_note_edit_invalidates_without_notifying() {
    let mut board = mounted_dashboard().await;

    board.feed.push(
        &board.scope,
        "rooms",
        update(
            json!({"room_number": "101", "status": "occupied", "notes": "old"}),
            json!({"room_number": "101", "status": "occupied", "notes": "new"}),
        ),
    );
    sleep(Duration::from_millis(50)).await;

    assert!(board.notifications.is_empty());
    assert!(board.cache.contains(rooms::ROOMS));
    assert!(board.cache.contains(rooms::ROOM_STATS));

    board.engine.stop().await;
}

#[tokio::test]
async fn test_housekeeping_completion_fans_out_to_rooms() {
    let mut board = mounted_dashboard().await;

    board.feed.push(
        &board.scope,
        "housekeeping_tasks",
        update(
            json!({"room_number": "305", "status": "in_progress"}),
            json!({"room_number": "305", "status": "completed"}),
        ),
    );
    sleep(Duration::from_millis(50)).await;

    assert_eq!(board.notifications.len(), 1);
    assert!(board.cache.contains(housekeeping::HOUSEKEEPING_TASKS));
    assert!(board.cache.contains(rooms::ROOMS));

    board.engine.stop().await;
}

#[tokio::test]
async fn test_payment_insert_notifies_and_refreshes_folios() {
    let mut board = mounted_dashboard().await;

    board.feed.push(
        &board.scope,
        "payments",
        insert(json!({"amount": 240, "currency": "USD"})),
    );
    sleep(Duration::from_millis(50)).await;

    let transitions = board.notifications.transitions();
    assert_eq!(transitions.len(), 1);
    assert_eq!(transitions[0].severity, Severity::Success);
    assert!(board.cache.contains(folios::FOLIOS));
    assert!(board.cache.contains(folios::PAYMENTS));

    board.engine.stop().await;
}
