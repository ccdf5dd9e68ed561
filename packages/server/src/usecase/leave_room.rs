//! UseCase: ルーム退室処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//! - 接続単位の登録解除と、ユーザー単位の退室通知
//!
//! ### なぜこのテストが必要か
//! - 複数タブを開いたユーザーが 1 つのタブを閉じただけで退室扱いにならないことを保証
//! - 最後の接続が閉じたときにだけ userLeft / roomData が送られることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：唯一の接続からの退室
//! - エッジケース：複数接続のうち 1 つだけの退室
//! - 異常系：未登録ユーザーからの退室

use crate::domain::{
    ConnectionId, OutboundEvent, PresenceSnapshot, RoomName, SessionState, SharedSessionState,
    Unregistered, UserId,
};

use super::broadcast::RoomBroadcaster;

/// 退室処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// 接続が登録されていなかった（何もしない）
    NotRegistered,
    /// 他の接続が残っているため在室のまま
    StillOnline,
    /// 最後の接続が閉じ、ルームから退室した
    Left { snapshot: PresenceSnapshot },
    /// 最後の接続が閉じたが、どのルームにも在室していなかった
    Offline,
}

/// Remove `user` from `room`'s presence and tell the remaining users.
///
/// Nothing is broadcast when the user was not present.
pub(crate) async fn depart(
    state: &mut SessionState,
    broadcaster: &RoomBroadcaster,
    room: &RoomName,
    user: &UserId,
) -> Option<PresenceSnapshot> {
    if !state.presence.contains(room, user) {
        return None;
    }
    state.presence.remove_user(room, user);
    let snapshot = state.presence.snapshot(room);

    let left = OutboundEvent::UserLeft {
        user: user.clone(),
        users: snapshot.users.clone(),
    };
    broadcaster.to_room(state, room, &left).await;
    broadcaster.room_data(state, room).await;
    tracing::info!(
        "User '{}' left room '{}' ({} remaining)",
        user,
        room,
        snapshot.count
    );

    Some(snapshot)
}

/// Drop one connection of `user`, running the leave effects if it was the last one.
pub(crate) async fn release_connection(
    state: &mut SessionState,
    broadcaster: &RoomBroadcaster,
    user: &UserId,
    connection: &ConnectionId,
) -> LeaveOutcome {
    match state.registry.unregister_connection(user, connection) {
        Unregistered::Unknown => LeaveOutcome::NotRegistered,
        Unregistered::StillOnline => {
            tracing::debug!(
                "Connection '{}' of '{}' closed; other connections remain",
                connection,
                user
            );
            LeaveOutcome::StillOnline
        }
        Unregistered::Offline { last_room: None } => LeaveOutcome::Offline,
        Unregistered::Offline {
            last_room: Some(room),
        } => match depart(state, broadcaster, &room, user).await {
            Some(snapshot) => LeaveOutcome::Left { snapshot },
            None => LeaveOutcome::Offline,
        },
    }
}

/// ルーム退室のユースケース
pub struct LeaveRoomUseCase {
    state: SharedSessionState,
    broadcaster: RoomBroadcaster,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(state: SharedSessionState, broadcaster: RoomBroadcaster) -> Self {
        Self { state, broadcaster }
    }

    /// ルーム退室を実行
    ///
    /// # Arguments
    ///
    /// * `connection` - 退室イベントを送った接続
    /// * `room` - ペイロードで指定されたルーム
    /// * `user` - 退室するユーザー
    pub async fn execute(
        &self,
        connection: ConnectionId,
        room: RoomName,
        user: UserId,
    ) -> LeaveOutcome {
        let mut state = self.state.lock().await;

        if let Some(current) = state.registry.current_room(&user) {
            if current != &room {
                tracing::debug!(
                    "'{}' asked to leave '{}' but is in '{}'; leaving '{}'",
                    user,
                    room,
                    current,
                    current
                );
            }
        }

        let outcome = release_connection(&mut state, &self.broadcaster, &user, &connection).await;
        if outcome == LeaveOutcome::NotRegistered {
            tracing::warn!(
                "Ignoring leaveRoom for '{}' from unregistered connection '{}'",
                user,
                connection
            );
        }
        outcome
    }
}
