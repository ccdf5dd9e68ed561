//! Room Presence Table
//!
//! ルーム名 → 現在在室しているユーザーの対応表です。接続イベントから再構築できる
//! 一時的な状態であり、永続化されたルームのメンバー一覧とは別物です。

use std::collections::HashMap;

use super::{PresenceSnapshot, RoomName, UserId};

#[derive(Debug, Default)]
pub struct PresenceTable {
    /// Present users per room, in join order. Never holds an empty entry.
    rooms: HashMap<RoomName, Vec<UserId>>,
}

impl PresenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `user` present in `room`.
    ///
    /// Returns `true` only when the user was not already present.
    pub fn add_user(&mut self, room: &RoomName, user: &UserId) -> bool {
        let users = self.rooms.entry(room.clone()).or_default();
        if users.contains(user) {
            return false;
        }
        users.push(user.clone());
        true
    }

    /// Remove `user` from `room`, returning how many users remain.
    pub fn remove_user(&mut self, room: &RoomName, user: &UserId) -> usize {
        let Some(users) = self.rooms.get_mut(room) else {
            return 0;
        };
        users.retain(|present| present != user);
        let remaining = users.len();
        if remaining == 0 {
            self.rooms.remove(room);
        }
        remaining
    }

    /// Remove every user from `room`, returning who was present.
    pub fn clear_room(&mut self, room: &RoomName) -> Vec<UserId> {
        self.rooms.remove(room).unwrap_or_default()
    }

    pub fn snapshot(&self, room: &RoomName) -> PresenceSnapshot {
        match self.rooms.get(room) {
            Some(users) => PresenceSnapshot {
                room: room.clone(),
                users: users.clone(),
                count: users.len(),
            },
            None => PresenceSnapshot::empty(room.clone()),
        }
    }

    /// Snapshots of every live room, sorted by room name.
    pub fn snapshots(&self) -> Vec<PresenceSnapshot> {
        let mut rooms: Vec<&RoomName> = self.rooms.keys().collect();
        rooms.sort();
        rooms.into_iter().map(|room| self.snapshot(room)).collect()
    }

    pub fn contains(&self, room: &RoomName, user: &UserId) -> bool {
        self.rooms
            .get(room)
            .is_some_and(|users| users.contains(user))
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
