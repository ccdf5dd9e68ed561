//! UseCase: 会議終了処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - EndMeetingUseCase::execute() メソッド
//! - オーナーによる会議終了：ルームの削除 → 全在室者の強制退室 → 通知
//! - 在室していないオーナーにも meetingEnded が届くこと
//!
//! ### なぜこのテストが必要か
//! - 在室していた全ユーザーの全接続に youWereKicked が 1 回ずつ届くことを保証
//! - 削除に失敗した場合にメモリ上の状態が変更されないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：オーナーによる会議終了
//! - 正常系：在室していないオーナーによる会議終了
//! - 異常系：オーナー以外による会議終了
//! - 異常系：ルームの削除失敗

use std::sync::Arc;

use crate::domain::{
    ConnectionId, OutboundEvent, RoomName, RoomRepository, SessionState, SharedSessionState,
    UserId,
};

use super::{
    authorize::PrivilegedActionGuard, broadcast::RoomBroadcaster, error::EndMeetingError,
};

/// 会議終了のユースケース
pub struct EndMeetingUseCase {
    state: SharedSessionState,
    repository: Arc<dyn RoomRepository>,
    guard: PrivilegedActionGuard,
    broadcaster: RoomBroadcaster,
}

impl EndMeetingUseCase {
    /// 新しい EndMeetingUseCase を作成
    pub fn new(
        state: SharedSessionState,
        repository: Arc<dyn RoomRepository>,
        broadcaster: RoomBroadcaster,
    ) -> Self {
        Self {
            state,
            guard: PrivilegedActionGuard::new(repository.clone()),
            repository,
            broadcaster,
        }
    }

    /// 会議終了を実行
    ///
    /// 失敗した場合は `endMeetingError` を呼び出し元の接続にだけ送り、状態は変更しない。
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<UserId>)` - 強制退室させたユーザー
    /// * `Err(EndMeetingError)` - 認可失敗またはストア障害
    pub async fn execute(
        &self,
        connection: ConnectionId,
        room: RoomName,
        admin: UserId,
    ) -> Result<Vec<UserId>, EndMeetingError> {
        let mut state = self.state.lock().await;

        match self.end(&mut state, &connection, &room, &admin).await {
            Ok(removed) => Ok(removed),
            Err(e) => {
                let rejected = OutboundEvent::EndMeetingError {
                    error: e.to_string(),
                };
                self.broadcaster.to_connection(&connection, &rejected).await;
                Err(e)
            }
        }
    }

    async fn end(
        &self,
        state: &mut SessionState,
        connection: &ConnectionId,
        room: &RoomName,
        admin: &UserId,
    ) -> Result<Vec<UserId>, EndMeetingError> {
        // 1. 認可
        self.guard.authorize(room, admin).await?;

        // 2. ルームを削除（成功するまでメモリ上の状態は変更しない）
        self.repository
            .delete_by_name(room)
            .await
            .map_err(EndMeetingError::Storage)?;

        // 3. ルーム全体と呼び出し元に終了を通知
        let mut announce_to = state.room_connections(room);
        if !announce_to.contains(connection) {
            announce_to.push(*connection);
        }
        let ended = OutboundEvent::MeetingEnded { room: room.clone() };
        self.broadcaster.to_connections(&announce_to, &ended).await;

        // 4. 全在室者を強制退室させ、それぞれの全接続に通知
        let removed = state.presence.clear_room(room);
        let kicked = OutboundEvent::YouWereKicked { room: room.clone() };
        for user in &removed {
            state.registry.leave_room(user, room);
            self.broadcaster.to_user(state, user, &kicked).await;
        }

        tracing::info!(
            "'{}' ended the meeting in '{}' ({} user(s) removed)",
            admin,
            room,
            removed.len()
        );
        Ok(removed)
    }
}
