//! Test helpers shared by the use case tests.

use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;

use crate::{
    domain::{
        ConnectionId, MessagePushError, MessagePusher, OutboundEvent, PersistedRoom,
        PusherChannel, RoomAccess, RoomName, RoomRepository, SessionState, SharedSessionState,
        Timestamp, UserId,
    },
    infrastructure::repository::InMemoryRoomRepository,
};
use zemi_shared::time::{Clock, FixedClock};

pub const NOW: i64 = 1_700_000_000_000;

pub fn user(id: &str) -> UserId {
    UserId::new(id.to_string()).unwrap()
}

pub fn room(name: &str) -> RoomName {
    RoomName::new(name.to_string()).unwrap()
}

pub fn users(ids: &[&str]) -> Vec<UserId> {
    ids.iter().map(|id| user(id)).collect()
}

pub fn persisted_room(name: &str, owner: &str, members: &[&str]) -> PersistedRoom {
    let mut persisted = PersistedRoom::new(
        room(name),
        user(owner),
        4,
        RoomAccess::Public,
        Timestamp::new(NOW),
    )
    .unwrap();
    persisted.members = users(members);
    persisted
}

pub fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock::new(NOW))
}

pub fn shared_state() -> SharedSessionState {
    SessionState::shared()
}

pub async fn repository_with(rooms: Vec<PersistedRoom>) -> Arc<InMemoryRoomRepository> {
    let repository = InMemoryRoomRepository::new();
    for persisted in rooms {
        repository.save(&persisted).await.unwrap();
    }
    Arc::new(repository)
}

/// MessagePusher that records every delivery instead of sending it
#[derive(Default)]
pub struct RecordingMessagePusher {
    deliveries: StdMutex<Vec<(ConnectionId, OutboundEvent)>>,
}

impl RecordingMessagePusher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Everything delivered so far, in delivery order
    pub fn deliveries(&self) -> Vec<(ConnectionId, OutboundEvent)> {
        self.deliveries.lock().unwrap().clone()
    }

    /// Events delivered to one connection, in delivery order
    pub fn events_for(&self, connection: &ConnectionId) -> Vec<OutboundEvent> {
        self.deliveries()
            .into_iter()
            .filter(|(target, _)| target == connection)
            .map(|(_, event)| event)
            .collect()
    }

    /// Names of the events delivered to one connection
    pub fn names_for(&self, connection: &ConnectionId) -> Vec<&'static str> {
        self.events_for(connection)
            .iter()
            .map(OutboundEvent::name)
            .collect()
    }

    /// How many times an event named `name` was delivered, across all connections
    pub fn count_named(&self, name: &str) -> usize {
        self.deliveries()
            .iter()
            .filter(|(_, event)| event.name() == name)
            .count()
    }

    pub fn clear(&self) {
        self.deliveries.lock().unwrap().clear();
    }
}

#[async_trait]
impl MessagePusher for RecordingMessagePusher {
    async fn register_connection(&self, _connection: ConnectionId, _sender: PusherChannel) {
        // No-op for mock
    }

    async fn unregister_connection(&self, _connection: &ConnectionId) {
        // No-op for mock
    }

    async fn push_to(
        &self,
        connection: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError> {
        self.deliveries
            .lock()
            .unwrap()
            .push((*connection, event.clone()));
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError> {
        let mut deliveries = self.deliveries.lock().unwrap();
        for target in targets {
            deliveries.push((*target, event.clone()));
        }
        Ok(())
    }
}
