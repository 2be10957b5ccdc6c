/**
 * Change-Event Broadcasting
 *
 * Events are broadcast using `tokio::sync::broadcast`, a multi-producer
 * multi-consumer channel: every subscriber receives a copy of each
 * event. An event names the table, the scope row (channel id, group id,
 * or DM peer pair key), and the operation; clients respond by
 * re-fetching the full message list, so no payload or ordering is
 * carried here.
 */

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Kind of row mutation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

/// A row-change notification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Table the change happened in (e.g. "channel_messages")
    pub table: String,
    /// Conversation scope the change belongs to
    pub scope_id: Uuid,
    /// What happened
    pub op: ChangeOp,
}

impl ChangeEvent {
    pub fn new(table: impl Into<String>, scope_id: Uuid, op: ChangeOp) -> Self {
        Self {
            table: table.into(),
            scope_id,
            op,
        }
    }
}

/// Broadcast channel for change events
///
/// Cloneable; shared across all handlers through `AppState`.
pub type ChangeBroadcast = broadcast::Sender<ChangeEvent>;

/// Broadcast a change event to all subscribers
///
/// Returns the number of active subscribers that received the event.
/// Having no subscribers is normal and not an error.
pub fn broadcast_change(tx: &ChangeBroadcast, event: ChangeEvent) -> usize {
    match tx.send(event) {
        Ok(subscriber_count) => {
            tracing::debug!("[Realtime] Event broadcast to {} subscribers", subscriber_count);
            subscriber_count
        }
        Err(_) => {
            // No subscribers listening right now
            tracing::debug!("[Realtime] No subscribers to receive event");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_broadcast_with_subscriber() {
        let (tx, mut rx) = broadcast::channel::<ChangeEvent>(16);
        let scope = Uuid::new_v4();

        let count = broadcast_change(&tx, ChangeEvent::new("group_messages", scope, ChangeOp::Insert));
        assert_eq!(count, 1);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.table, "group_messages");
        assert_eq!(received.scope_id, scope);
        assert_eq!(received.op, ChangeOp::Insert);
    }

    #[tokio::test]
    async fn test_broadcast_no_subscribers() {
        let (tx, rx) = broadcast::channel::<ChangeEvent>(16);
        drop(rx);

        let count = broadcast_change(
            &tx,
            ChangeEvent::new("channel_messages", Uuid::new_v4(), ChangeOp::Delete),
        );
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_broadcast_multiple_subscribers() {
        let (tx, _rx) = broadcast::channel::<ChangeEvent>(16);
        let mut sub1 = tx.subscribe();
        let mut sub2 = tx.subscribe();

        let event = ChangeEvent::new("direct_messages", Uuid::new_v4(), ChangeOp::Update);
        let count = broadcast_change(&tx, event.clone());
        assert!(count >= 2);

        assert_eq!(sub1.recv().await.unwrap(), event);
        assert_eq!(sub2.recv().await.unwrap(), event);
    }
}
