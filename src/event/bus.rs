use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use super::events::SessionEvent;

/// Event bus distributing session change notifications
#[derive(Debug, Clone)]
pub struct EventBus {
    /// Session-specific event channels: session_id -> sender
    session_channels: Arc<RwLock<HashMap<i64, broadcast::Sender<SessionEvent>>>>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new event bus; each session channel buffers `capacity` events
    pub fn new(capacity: usize) -> Self {
        Self {
            session_channels: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Emits an event to all subscribers of the event's session.
    /// A channel whose receivers have all gone is dropped here.
    pub async fn emit(&self, event: SessionEvent) {
        let session_id = event.session_id();
        {
            let session_channels = self.session_channels.read().await;
            match session_channels.get(&session_id) {
                Some(sender) => match sender.send(event) {
                    Ok(receiver_count) => {
                        debug!(
                            session_id,
                            receivers = receiver_count,
                            "Session event emitted"
                        );
                        return;
                    }
                    Err(_) => debug!(session_id, "Session event emitted with no receivers"),
                },
                None => {
                    debug!(session_id, "No subscribers for session, event dropped");
                    return;
                }
            }
        }

        let mut session_channels = self.session_channels.write().await;
        // a subscriber may have arrived between the two locks
        if session_channels
            .get(&session_id)
            .is_some_and(|sender| sender.receiver_count() == 0)
        {
            session_channels.remove(&session_id);
            debug!(session_id, "Idle session channel pruned");
        }
    }

    /// Subscribe to events for a specific session
    pub async fn subscribe(&self, session_id: i64) -> broadcast::Receiver<SessionEvent> {
        {
            let session_channels = self.session_channels.read().await;
            if let Some(sender) = session_channels.get(&session_id) {
                return sender.subscribe();
            }
        }

        debug!(session_id, "Creating new session channel for subscription");
        let mut session_channels = self.session_channels.write().await;
        session_channels
            .entry(session_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Drops the session channel; subscribers observe the stream closing
    pub async fn close(&self, session_id: i64) {
        let mut session_channels = self.session_channels.write().await;
        if session_channels.remove(&session_id).is_some() {
            debug!(session_id, "Session channel closed");
        }
    }

    pub async fn subscriber_count(&self, session_id: i64) -> usize {
        let session_channels = self.session_channels.read().await;
        session_channels
            .get(&session_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or_default()
    }

    /// Number of sessions that currently hold a channel
    pub async fn open_channels(&self) -> usize {
        self.session_channels.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::RecvError;

    #[tokio::test]
    async fn delivers_events_to_session_subscribers_only() {
        let bus = EventBus::new(8);
        let mut first = bus.subscribe(1).await;
        let mut second = bus.subscribe(2).await;

        bus.emit(SessionEvent::SessionValidated { session_id: 1 })
            .await;

        assert_eq!(
            first.recv().await.unwrap(),
            SessionEvent::SessionValidated { session_id: 1 }
        );
        assert!(second.try_recv().is_err());
    }

    #[tokio::test]
    async fn emit_without_subscribers_is_a_no_op() {
        let bus = EventBus::new(8);
        bus.emit(SessionEvent::SessionDeleted { session_id: 5 }).await;
        assert_eq!(bus.subscriber_count(5).await, 0);
    }

    #[tokio::test]
    async fn emit_prunes_channel_after_last_receiver_drops() {
        let bus = EventBus::new(8);
        let receiver = bus.subscribe(4).await;
        let _other = bus.subscribe(6).await;
        assert_eq!(bus.open_channels().await, 2);

        drop(receiver);
        bus.emit(SessionEvent::HoleDeleted {
            session_id: 4,
            played_hole_id: 1,
        })
        .await;

        assert_eq!(bus.open_channels().await, 1);
        assert_eq!(bus.subscriber_count(4).await, 0);

        // a later subscriber gets a fresh channel
        let mut again = bus.subscribe(4).await;
        bus.emit(SessionEvent::SessionValidated { session_id: 4 })
            .await;
        assert_eq!(
            again.recv().await.unwrap(),
            SessionEvent::SessionValidated { session_id: 4 }
        );
    }

    #[tokio::test]
    async fn close_ends_subscriptions() {
        let bus = EventBus::new(8);
        let mut receiver = bus.subscribe(3).await;
        assert_eq!(bus.subscriber_count(3).await, 1);

        bus.close(3).await;

        assert!(matches!(receiver.recv().await, Err(RecvError::Closed)));
        assert_eq!(bus.open_channels().await, 0);
    }
}
