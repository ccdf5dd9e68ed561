//! UseCase: 在室状況の取得（読み取り専用）

use crate::domain::{PresenceSnapshot, RoomName, SharedSessionState, Timestamp, UserId};

use super::error::GetPresenceError;

/// 在室ユーザーの詳細
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentUser {
    pub user: UserId,
    /// 開いている接続の数
    pub connections: usize,
    pub connected_at: Timestamp,
}

/// ルームの在室状況の詳細
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomPresenceDetail {
    pub room: RoomName,
    pub users: Vec<PresentUser>,
}

/// 在室状況取得のユースケース
pub struct GetPresenceUseCase {
    state: SharedSessionState,
}

impl GetPresenceUseCase {
    /// 新しい GetPresenceUseCase を作成
    pub fn new(state: SharedSessionState) -> Self {
        Self { state }
    }

    /// 在室者のいる全てのルーム（ルーム名順）
    pub async fn list(&self) -> Vec<PresenceSnapshot> {
        self.state.lock().await.presence.snapshots()
    }

    /// 1 つのルームの在室状況
    pub async fn detail(&self, room: &RoomName) -> Result<RoomPresenceDetail, GetPresenceError> {
        let state = self.state.lock().await;
        let snapshot = state.presence.snapshot(room);
        if snapshot.count == 0 {
            return Err(GetPresenceError::RoomNotFound(room.as_str().to_string()));
        }

        let users = snapshot
            .users
            .into_iter()
            .filter_map(|user| {
                state.registry.session(&user).map(|session| PresentUser {
                    connections: session.connections.len(),
                    connected_at: session.connected_at,
                    user,
                })
            })
            .collect();

        Ok(RoomPresenceDetail {
            room: room.clone(),
            users,
        })
    }
}
