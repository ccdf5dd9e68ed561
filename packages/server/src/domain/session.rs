//! Shared session state: Connection Registry + Presence Table.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::{ConnectionId, ConnectionRegistry, PresenceTable, RoomName, UserId};

/// Both in-memory tables, always mutated together under one lock.
#[derive(Debug, Default)]
pub struct SessionState {
    pub registry: ConnectionRegistry,
    pub presence: PresenceTable,
}

/// Process-wide handle to the session state
pub type SharedSessionState = Arc<Mutex<SessionState>>;

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedSessionState {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Every live connection of every user present in `room`.
    pub fn room_connections(&self, room: &RoomName) -> Vec<ConnectionId> {
        self.presence
            .snapshot(room)
            .users
            .iter()
            .flat_map(|user| self.registry.connections(user))
            .collect()
    }

    /// Same as `room_connections`, minus `except`.
    pub fn room_connections_except(
        &self,
        room: &RoomName,
        except: &ConnectionId,
    ) -> Vec<ConnectionId> {
        self.room_connections(room)
            .into_iter()
            .filter(|connection| connection != except)
            .collect()
    }

    pub fn user_connections(&self, user: &UserId) -> Vec<ConnectionId> {
        self.registry.connections(user)
    }
}
