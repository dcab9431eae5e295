//! Integration tests for the in-memory realtime engine: subscriptions,
//! comment fanout, presence, and typing relay. No database required.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc::error::TryRecvError;
use uuid::Uuid;

use learnhub_core::config::RealtimeConfig;
use learnhub_core::types::{ChapterId, UserId};
use learnhub_entity::comment::model::Comment;
use learnhub_realtime::message::OutboundMessage;
use learnhub_realtime::{ChannelPublisher, EventPublisher, RealtimeEngine};

fn engine() -> Arc<RealtimeEngine> {
    Arc::new(RealtimeEngine::new(RealtimeConfig::default()))
}

async fn subscribe(
    engine: &RealtimeEngine,
    conn_id: &learnhub_realtime::connection::ConnectionId,
    channel: &str,
) {
    let frame = format!(r#"{{"type":"subscribe","channel":"{channel}"}}"#);
    engine.connections.handle_inbound(conn_id, &frame).await;
}

fn sample_comment(chapter: ChapterId, body: &str) -> Comment {
    Comment {
        id: Uuid::new_v4(),
        course_id: Uuid::new_v4(),
        chapter_id: Some(chapter.into_uuid()),
        parent_id: None,
        author_id: Uuid::new_v4(),
        body: body.to_string(),
        report: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_comment_event_reaches_subscribers() {
    let engine = engine();
    let publisher = EventPublisher::new(engine.clone() as Arc<dyn ChannelPublisher>);

    let chapter = ChapterId::new();
    let channel = format!("chapter-{chapter}-comments");

    let (listener, mut rx) = engine.connections.register(UserId::new());
    subscribe(&engine, &listener.id, &channel).await;

    match rx.try_recv() {
        Ok(OutboundMessage::Subscribed { channel: c }) => assert_eq!(c, channel),
        other => panic!("expected subscription ack, got {other:?}"),
    }

    let comment = sample_comment(chapter, "hello from the test");
    publisher.comment_created(chapter, &comment).await;

    match rx.try_recv() {
        Ok(OutboundMessage::Event {
            channel: c,
            event,
            data,
        }) => {
            assert_eq!(c, channel);
            assert_eq!(event, "comment:new");
            assert_eq!(data["body"], "hello from the test");
            assert_eq!(data["id"], serde_json::json!(comment.id));
            assert_eq!(data["author_id"], serde_json::json!(comment.author_id));
        }
        other => panic!("expected comment event, got {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_event_carries_id_and_chapter() {
    let engine = engine();
    let publisher = EventPublisher::new(engine.clone() as Arc<dyn ChannelPublisher>);

    let chapter = ChapterId::new();
    let channel = format!("chapter-{chapter}-comments");

    let (listener, mut rx) = engine.connections.register(UserId::new());
    subscribe(&engine, &listener.id, &channel).await;
    let _ = rx.try_recv(); // subscription ack

    let comment_id = Uuid::new_v4();
    publisher.comment_deleted(chapter, comment_id).await;

    match rx.try_recv() {
        Ok(OutboundMessage::Event { event, data, .. }) => {
            assert_eq!(event, "comment:delete");
            assert_eq!(data["id"], serde_json::json!(comment_id));
            assert_eq!(data["chapter_id"], serde_json::json!(chapter));
        }
        other => panic!("expected delete event, got {other:?}"),
    }
}

#[tokio::test]
async fn test_events_do_not_cross_chapters() {
    let engine = engine();
    let publisher = EventPublisher::new(engine.clone() as Arc<dyn ChannelPublisher>);

    let watched = ChapterId::new();
    let other = ChapterId::new();

    let (listener, mut rx) = engine.connections.register(UserId::new());
    subscribe(&engine, &listener.id, &format!("chapter-{watched}-comments")).await;
    let _ = rx.try_recv(); // subscription ack

    let comment = sample_comment(other, "elsewhere");
    publisher.comment_created(other, &comment).await;

    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_presence_snapshot_and_member_events() {
    let engine = engine();
    let chapter = ChapterId::new();
    let channel = format!("presence-chapter-{chapter}");

    let user_a = UserId::new();
    let user_b = UserId::new();

    let (conn_a, mut rx_a) = engine.connections.register(user_a);
    subscribe(&engine, &conn_a.id, &channel).await;
    let _ = rx_a.try_recv(); // subscription ack

    // The joiner's snapshot contains themselves.
    match rx_a.try_recv() {
        Ok(OutboundMessage::Event { event, data, .. }) => {
            assert_eq!(event, "presence:subscription_succeeded");
            assert_eq!(data["count"], 1);
            assert_eq!(data["members"], serde_json::json!([user_a]));
        }
        other => panic!("expected snapshot, got {other:?}"),
    }

    let (conn_b, mut rx_b) = engine.connections.register(user_b);
    subscribe(&engine, &conn_b.id, &channel).await;
    let _ = rx_b.try_recv(); // subscription ack

    match rx_b.try_recv() {
        Ok(OutboundMessage::Event { event, data, .. }) => {
            assert_eq!(event, "presence:subscription_succeeded");
            assert_eq!(data["count"], 2);
        }
        other => panic!("expected snapshot, got {other:?}"),
    }

    // The earlier subscriber hears the join.
    match rx_a.try_recv() {
        Ok(OutboundMessage::Event { event, data, .. }) => {
            assert_eq!(event, "presence:member_added");
            assert_eq!(data["user_id"], serde_json::json!(user_b));
        }
        other => panic!("expected member_added, got {other:?}"),
    }
}

#[tokio::test]
async fn test_second_connection_of_same_user_is_not_announced() {
    let engine = engine();
    let chapter = ChapterId::new();
    let channel = format!("presence-chapter-{chapter}");

    let user_a = UserId::new();
    let watcher = UserId::new();

    let (conn_w, mut rx_w) = engine.connections.register(watcher);
    subscribe(&engine, &conn_w.id, &channel).await;
    let _ = rx_w.try_recv(); // ack
    let _ = rx_w.try_recv(); // snapshot

    let (conn_a1, _rx_a1) = engine.connections.register(user_a);
    subscribe(&engine, &conn_a1.id, &channel).await;

    match rx_w.try_recv() {
        Ok(OutboundMessage::Event { event, .. }) => {
            assert_eq!(event, "presence:member_added");
        }
        other => panic!("expected member_added, got {other:?}"),
    }

    // A second tab of the same user joins silently.
    let (conn_a2, _rx_a2) = engine.connections.register(user_a);
    subscribe(&engine, &conn_a2.id, &channel).await;
    assert!(matches!(rx_w.try_recv(), Err(TryRecvError::Empty)));

    // Presence counts users, not connections.
    let (members, count) = engine.presence_members(&channel);
    assert_eq!(count, 2);
    assert!(members.contains(&user_a));
    assert!(members.contains(&watcher));
}

#[tokio::test]
async fn test_member_removed_only_after_last_connection_leaves() {
    let engine = engine();
    let chapter = ChapterId::new();
    let channel = format!("presence-chapter-{chapter}");

    let user_a = UserId::new();
    let watcher = UserId::new();

    let (conn_w, mut rx_w) = engine.connections.register(watcher);
    subscribe(&engine, &conn_w.id, &channel).await;

    let (conn_a1, _rx_a1) = engine.connections.register(user_a);
    subscribe(&engine, &conn_a1.id, &channel).await;
    let (conn_a2, _rx_a2) = engine.connections.register(user_a);
    subscribe(&engine, &conn_a2.id, &channel).await;

    // Drain the watcher's ack, snapshot, and the single member_added.
    let _ = rx_w.try_recv();
    let _ = rx_w.try_recv();
    let _ = rx_w.try_recv();

    engine.connections.unregister(&conn_a1.id);
    assert!(matches!(rx_w.try_recv(), Err(TryRecvError::Empty)));

    engine.connections.unregister(&conn_a2.id);
    match rx_w.try_recv() {
        Ok(OutboundMessage::Event { event, data, .. }) => {
            assert_eq!(event, "presence:member_removed");
            assert_eq!(data["user_id"], serde_json::json!(user_a));
        }
        other => panic!("expected member_removed, got {other:?}"),
    }

    let (_, count) = engine.presence_members(&channel);
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_typing_relay_excludes_the_sender() {
    let engine = engine();
    let chapter = ChapterId::new();
    let channel = format!("chapter-{chapter}-typing");

    let typist = UserId::new();
    let reader = UserId::new();

    let (conn_t, mut rx_t) = engine.connections.register(typist);
    subscribe(&engine, &conn_t.id, &channel).await;
    let _ = rx_t.try_recv(); // ack

    let (conn_r, mut rx_r) = engine.connections.register(reader);
    subscribe(&engine, &conn_r.id, &channel).await;
    let _ = rx_r.try_recv(); // ack

    let frame = format!(r#"{{"type":"typing","chapter_id":"{chapter}"}}"#);
    engine.connections.handle_inbound(&conn_t.id, &frame).await;

    match rx_r.try_recv() {
        Ok(OutboundMessage::Event { event, data, .. }) => {
            assert_eq!(event, "user:typing");
            assert_eq!(data["user_id"], serde_json::json!(typist));
            assert_eq!(data["chapter_id"], serde_json::json!(chapter));
        }
        other => panic!("expected typing event, got {other:?}"),
    }

    assert!(matches!(rx_t.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_typing_requires_subscription() {
    let engine = engine();
    let chapter = ChapterId::new();

    let (conn, _rx) = engine.connections.register(UserId::new());

    let (listener, mut rx_l) = engine.connections.register(UserId::new());
    subscribe(&engine, &listener.id, &format!("chapter-{chapter}-typing")).await;
    let _ = rx_l.try_recv(); // ack

    // The sender never subscribed, so nothing is relayed.
    let frame = format!(r#"{{"type":"typing","chapter_id":"{chapter}"}}"#);
    engine.connections.handle_inbound(&conn.id, &frame).await;

    assert!(matches!(rx_l.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_unsubscribe_leaves_presence() {
    let engine = engine();
    let channel = "presence-global";

    let user = UserId::new();
    let (conn, _rx) = engine.connections.register(user);
    subscribe(&engine, &conn.id, channel).await;

    let (_, count) = engine.presence_members(channel);
    assert_eq!(count, 1);

    let frame = format!(r#"{{"type":"unsubscribe","channel":"{channel}"}}"#);
    engine.connections.handle_inbound(&conn.id, &frame).await;

    let (members, count) = engine.presence_members(channel);
    assert_eq!(count, 0);
    assert!(members.is_empty());
}

#[tokio::test]
async fn test_shutdown_closes_all_connections() {
    let engine = engine();
    let mut shutdown_rx = engine.shutdown_receiver();

    let (_conn_a, _rx_a) = engine.connections.register(UserId::new());
    let (_conn_b, _rx_b) = engine.connections.register(UserId::new());
    assert_eq!(engine.connections.connection_count(), 2);

    engine.shutdown();

    assert!(shutdown_rx.recv().await.is_ok());
    assert_eq!(engine.connections.connection_count(), 0);
}
