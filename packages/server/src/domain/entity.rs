//! Entities
//!
//! - `UserSession`: 接続中ユーザーのセッション（Connection Registry が所有）
//! - `PresenceSnapshot`: ルームの在室者一覧のコピー（ブロードキャスト用）
//! - `PersistedRoom`: 永続化されたルーム（外部のルームストアが所有）

use std::collections::BTreeSet;

use super::{ConnectionId, RoomName, Timestamp, UserId, ValidationError};

/// Live session of one user across all of their open connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    pub user: UserId,
    pub connections: BTreeSet<ConnectionId>,
    pub current_room: Option<RoomName>,
    /// When the first of the current connections was registered
    pub connected_at: Timestamp,
}

impl UserSession {
    pub fn new(user: UserId, connection: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            user,
            connections: BTreeSet::from([connection]),
            current_room: None,
            connected_at,
        }
    }

    pub fn is_in(&self, room: &RoomName) -> bool {
        self.current_room.as_ref() == Some(room)
    }
}

/// Defensive copy of a room's present users, in join order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceSnapshot {
    pub room: RoomName,
    pub users: Vec<UserId>,
    pub count: usize,
}

impl PresenceSnapshot {
    pub fn empty(room: RoomName) -> Self {
        Self {
            room,
            users: Vec::new(),
            count: 0,
        }
    }

    pub fn contains(&self, user: &UserId) -> bool {
        self.users.contains(user)
    }
}

/// Lower bound of `max_participants`
pub const MIN_PARTICIPANTS: usize = 2;
/// Upper bound of `max_participants`
pub const MAX_PARTICIPANTS: usize = 10;
/// Capacity assigned when a room document does not specify one
pub const DEFAULT_MAX_PARTICIPANTS: usize = 4;

/// How a room may be entered through the roster routes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomAccess {
    Public,
    Private { access_code: String },
}

/// Durable room record held by the room store.
///
/// `members` is the roster of users who joined and did not leave; it is not the
/// set of users currently connected (see `PresenceTable`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedRoom {
    pub name: RoomName,
    pub owner: UserId,
    pub members: Vec<UserId>,
    pub max_participants: usize,
    pub access: RoomAccess,
    pub created_at: Timestamp,
}

impl PersistedRoom {
    /// Create a room whose roster starts with its owner.
    pub fn new(
        name: RoomName,
        owner: UserId,
        max_participants: usize,
        access: RoomAccess,
        created_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        if !(MIN_PARTICIPANTS..=MAX_PARTICIPANTS).contains(&max_participants) {
            return Err(ValidationError::Invalid {
                field: "maxParticipants",
                reason: format!(
                    "must be between {} and {} (got {})",
                    MIN_PARTICIPANTS, MAX_PARTICIPANTS, max_participants
                ),
            });
        }
        Ok(Self {
            name,
            members: vec![owner.clone()],
            owner,
            max_participants,
            access,
            created_at,
        })
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner == user
    }

    pub fn has_member(&self, user: &UserId) -> bool {
        self.members.contains(user)
    }

    /// Remove `user` from the roster, returning whether they were on it.
    pub fn remove_member(&mut self, user: &UserId) -> bool {
        let before = self.members.len();
        self.members.retain(|member| member != user);
        self.members.len() != before
    }
}
