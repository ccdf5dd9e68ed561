//! Room-scoped delivery helpers shared by the session use cases.

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, OutboundEvent, RoomName, SessionState, UserId};

/// Resolves rooms and users to connections and hands events to the `MessagePusher`.
///
/// Delivery is fire-and-forget: failures are logged, never returned.
#[derive(Clone)]
pub struct RoomBroadcaster {
    message_pusher: Arc<dyn MessagePusher>,
}

impl RoomBroadcaster {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    pub fn message_pusher(&self) -> &Arc<dyn MessagePusher> {
        &self.message_pusher
    }

    /// Send to every connection of every user present in `room`.
    pub async fn to_room(&self, state: &SessionState, room: &RoomName, event: &OutboundEvent) {
        let targets = state.room_connections(room);
        self.to_connections(&targets, event).await;
    }

    /// Send to the room, skipping the connection that triggered the event.
    pub async fn to_room_except(
        &self,
        state: &SessionState,
        room: &RoomName,
        except: &ConnectionId,
        event: &OutboundEvent,
    ) {
        let targets = state.room_connections_except(room, except);
        self.to_connections(&targets, event).await;
    }

    /// Send to every live connection of `user`.
    pub async fn to_user(&self, state: &SessionState, user: &UserId, event: &OutboundEvent) {
        let targets = state.user_connections(user);
        self.to_connections(&targets, event).await;
    }

    pub async fn to_connection(&self, connection: &ConnectionId, event: &OutboundEvent) {
        if let Err(e) = self.message_pusher.push_to(connection, event).await {
            tracing::warn!(
                "Failed to push '{}' to connection '{}': {}",
                event.name(),
                connection,
                e
            );
        }
    }

    pub async fn to_connections(&self, targets: &[ConnectionId], event: &OutboundEvent) {
        if targets.is_empty() {
            return;
        }
        if let Err(e) = self.message_pusher.broadcast(targets, event).await {
            tracing::warn!("Failed to broadcast '{}': {}", event.name(), e);
        }
    }

    /// Send the current `roomData` snapshot to the whole room.
    pub async fn room_data(&self, state: &SessionState, room: &RoomName) {
        let snapshot = state.presence.snapshot(room);
        let event = OutboundEvent::RoomData {
            users: snapshot.users,
            count: snapshot.count,
        };
        self.to_room(state, room, &event).await;
    }
}
