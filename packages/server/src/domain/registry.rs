//! Connection Registry
//!
//! ユーザー（論理的な ID）と、そのユーザーが開いている接続（タブ・デバイス）の
//! 対応を管理します。ユーザーは 1 つ以上の接続を持つ間だけ登録されています。

use std::collections::HashMap;

use super::{ConnectionId, RoomName, Timestamp, UserId, UserSession};

/// Result of removing a connection from the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unregistered {
    /// The identity was not registered, or the connection was not one of its handles
    Unknown,
    /// Other connections of the identity are still live
    StillOnline,
    /// That was the last connection; the session has been removed
    Offline { last_room: Option<RoomName> },
}

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    sessions: HashMap<UserId, UserSession>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `connection` to `user`'s handles, creating the session if needed.
    ///
    /// Registering a handle twice is a no-op.
    pub fn register_connection(&mut self, user: &UserId, connection: ConnectionId, now: Timestamp) {
        match self.sessions.get_mut(user) {
            Some(session) => {
                session.connections.insert(connection);
            }
            None => {
                self.sessions
                    .insert(user.clone(), UserSession::new(user.clone(), connection, now));
            }
        }
    }

    /// Remove `connection` from `user`'s handles, dropping the session when it was the last.
    pub fn unregister_connection(&mut self, user: &UserId, connection: &ConnectionId) -> Unregistered {
        let Some(session) = self.sessions.get_mut(user) else {
            return Unregistered::Unknown;
        };
        if !session.connections.remove(connection) {
            return Unregistered::Unknown;
        }
        if !session.connections.is_empty() {
            return Unregistered::StillOnline;
        }
        let last_room = self
            .sessions
            .remove(user)
            .and_then(|session| session.current_room);
        Unregistered::Offline { last_room }
    }

    /// Set (or clear) the user's current room. No-op for unknown users.
    pub fn set_current_room(&mut self, user: &UserId, room: Option<RoomName>) {
        if let Some(session) = self.sessions.get_mut(user) {
            session.current_room = room;
        }
    }

    pub fn current_room(&self, user: &UserId) -> Option<&RoomName> {
        self.sessions
            .get(user)
            .and_then(|session| session.current_room.as_ref())
    }

    /// Clear the user's room association only if it is `room`.
    pub fn leave_room(&mut self, user: &UserId, room: &RoomName) -> bool {
        match self.sessions.get_mut(user) {
            Some(session) if session.is_in(room) => {
                session.current_room = None;
                true
            }
            _ => false,
        }
    }

    /// Live handles of `user`, in a stable order.
    pub fn connections(&self, user: &UserId) -> Vec<ConnectionId> {
        self.sessions
            .get(user)
            .map(|session| session.connections.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Find which identity owns `connection`.
    ///
    /// Linear in the number of registered users.
    pub fn find_identity(&self, connection: &ConnectionId) -> Option<UserId> {
        self.sessions
            .values()
            .find(|session| session.connections.contains(connection))
            .map(|session| session.user.clone())
    }

    pub fn session(&self, user: &UserId) -> Option<&UserSession> {
        self.sessions.get(user)
    }

    pub fn contains(&self, user: &UserId) -> bool {
        self.sessions.contains_key(user)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConnectionIdFactory;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn room(name: &str) -> RoomName {
        RoomName::new(name.to_string()).unwrap()
    }

    #[test]
    fn test_register_creates_session() {
        // テスト項目: 初めての接続でセッションが作成される
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        let connection = ConnectionIdFactory::generate();

        // when (操作):
        registry.register_connection(&user("alice"), connection, Timestamp::new(1000));

        // then (期待する結果):
        assert!(registry.contains(&user("alice")));
        assert_eq!(registry.connections(&user("alice")), vec![connection]);
        let session = registry.session(&user("alice")).unwrap();
        assert_eq!(session.connected_at, Timestamp::new(1000));
        assert_eq!(session.current_room, None);
    }

    #[test]
    fn test_register_same_connection_twice_is_idempotent() {
        // テスト項目: 同じ接続を二重に登録しても 1 つとして扱われる
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        let connection = ConnectionIdFactory::generate();
        registry.register_connection(&user("alice"), connection, Timestamp::new(1000));

        // when (操作):
        registry.register_connection(&user("alice"), connection, Timestamp::new(2000));

        // then (期待する結果):
        assert_eq!(registry.connections(&user("alice")).len(), 1);
        assert_eq!(
            registry.session(&user("alice")).unwrap().connected_at,
            Timestamp::new(1000)
        );
    }

    #[test]
    fn test_unregister_keeps_session_while_other_connections_live() {
        // テスト項目: 他の接続が残っている間はセッションが維持される
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        let tab1 = ConnectionIdFactory::generate();
        let tab2 = ConnectionIdFactory::generate();
        registry.register_connection(&user("alice"), tab1, Timestamp::new(0));
        registry.register_connection(&user("alice"), tab2, Timestamp::new(0));
        registry.set_current_room(&user("alice"), Some(room("math")));

        // when (操作):
        let first = registry.unregister_connection(&user("alice"), &tab1);
        let second = registry.unregister_connection(&user("alice"), &tab2);

        // then (期待する結果):
        assert_eq!(first, Unregistered::StillOnline);
        assert_eq!(
            second,
            Unregistered::Offline {
                last_room: Some(room("math"))
            }
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unregister_unknown_identity_is_noop() {
        // テスト項目: 未登録ユーザーの接続解除は何もしない
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        let connection = ConnectionIdFactory::generate();

        // when (操作):
        let result = registry.unregister_connection(&user("ghost"), &connection);

        // then (期待する結果):
        assert_eq!(result, Unregistered::Unknown);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unregister_foreign_connection_is_noop() {
        // テスト項目: 他人の接続を指定した解除ではセッションが変化しない
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        let alice_tab = ConnectionIdFactory::generate();
        let bob_tab = ConnectionIdFactory::generate();
        registry.register_connection(&user("alice"), alice_tab, Timestamp::new(0));
        registry.register_connection(&user("bob"), bob_tab, Timestamp::new(0));

        // when (操作):
        let result = registry.unregister_connection(&user("alice"), &bob_tab);

        // then (期待する結果):
        assert_eq!(result, Unregistered::Unknown);
        assert_eq!(registry.connections(&user("alice")), vec![alice_tab]);
    }

    #[test]
    fn test_find_identity_by_connection() {
        // テスト項目: 接続からその所有ユーザーを特定できる
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        let alice_tab = ConnectionIdFactory::generate();
        let bob_tab = ConnectionIdFactory::generate();
        registry.register_connection(&user("alice"), alice_tab, Timestamp::new(0));
        registry.register_connection(&user("bob"), bob_tab, Timestamp::new(0));

        // when (操作):
        let owner = registry.find_identity(&bob_tab);
        let nobody = registry.find_identity(&ConnectionIdFactory::generate());

        // then (期待する結果):
        assert_eq!(owner, Some(user("bob")));
        assert_eq!(nobody, None);
    }

    #[test]
    fn test_leave_room_only_clears_matching_room() {
        // テスト項目: 指定したルームにいる場合のみ所属ルームがクリアされる
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.register_connection(&user("alice"), ConnectionIdFactory::generate(), Timestamp::new(0));
        registry.set_current_room(&user("alice"), Some(room("math")));

        // when (操作):
        let other = registry.leave_room(&user("alice"), &room("art"));
        let same = registry.leave_room(&user("alice"), &room("math"));

        // then (期待する結果):
        assert!(!other);
        assert!(same);
        assert_eq!(registry.current_room(&user("alice")), None);
    }
}
