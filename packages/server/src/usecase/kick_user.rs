//! UseCase: ユーザーのキック処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - KickUserUseCase::execute() メソッド
//! - オーナーによるキック：メンバー一覧の永続化 → 在室者から削除 → 通知
//!
//! ### なぜこのテストが必要か
//! - オーナー以外のキックでは状態が一切変わらず、呼び出し元にのみ kickError が届くことを保証
//! - ストア障害時にメモリ上の状態が変更されないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：オーナーによるキック
//! - 正常系：在室していないオーナーによるキック（本人の接続にも userKicked が届く）
//! - 異常系：オーナー以外によるキック
//! - 異常系：ルームが存在しない
//! - 異常系：メンバー一覧の保存失敗

use std::sync::Arc;

use crate::domain::{
    ConnectionId, OutboundEvent, PresenceSnapshot, RoomName, RoomRepository, SessionState,
    SharedSessionState, UserId,
};

use super::{authorize::PrivilegedActionGuard, broadcast::RoomBroadcaster, error::KickError};

/// ユーザーキックのユースケース
pub struct KickUserUseCase {
    state: SharedSessionState,
    repository: Arc<dyn RoomRepository>,
    guard: PrivilegedActionGuard,
    broadcaster: RoomBroadcaster,
}

impl KickUserUseCase {
    /// 新しい KickUserUseCase を作成
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

    /// キックを実行
    ///
    /// 失敗した場合は `kickError` を呼び出し元の接続にだけ送り、状態は変更しない。
    ///
    /// # Returns
    ///
    /// * `Ok(PresenceSnapshot)` - キック後のルームのスナップショット
    /// * `Err(KickError)` - 認可失敗またはストア障害
    pub async fn execute(
        &self,
        connection: ConnectionId,
        room: RoomName,
        admin: UserId,
        target: UserId,
    ) -> Result<PresenceSnapshot, KickError> {
        let mut state = self.state.lock().await;

        match self
            .kick(&mut state, &connection, &room, &admin, &target)
            .await
        {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                let rejected = OutboundEvent::KickError {
                    error: e.to_string(),
                };
                self.broadcaster.to_connection(&connection, &rejected).await;
                Err(e)
            }
        }
    }

    async fn kick(
        &self,
        state: &mut SessionState,
        connection: &ConnectionId,
        room: &RoomName,
        admin: &UserId,
        target: &UserId,
    ) -> Result<PresenceSnapshot, KickError> {
        // 1. 認可（ここで失敗したら何も変更しない）
        let mut persisted = self.guard.authorize(room, admin).await?;

        // 2. メンバー一覧を更新して永続化（成功するまでメモリ上の状態は変更しない）
        if !persisted.remove_member(target) {
            tracing::debug!("'{}' was not on the roster of '{}'", target, room);
        }
        self.repository
            .save(&persisted)
            .await
            .map_err(KickError::Storage)?;

        // 3. userKicked の配信先は削除前の在室者の全接続と呼び出し元
        let mut announce_to = state.room_connections(room);
        if !announce_to.contains(connection) {
            announce_to.push(*connection);
        }

        // 4. 在室者から削除し、所属ルームの関連を外す
        state.presence.remove_user(room, target);
        state.registry.leave_room(target, room);
        let snapshot = state.presence.snapshot(room);

        // 5. 通知（本人の全接続 → ルーム全体）
        let kicked = OutboundEvent::YouWereKicked { room: room.clone() };
        self.broadcaster.to_user(state, target, &kicked).await;

        let announced = OutboundEvent::UserKicked {
            user: target.clone(),
            users: snapshot.users.clone(),
        };
        self.broadcaster.to_connections(&announce_to, &announced).await;
        self.broadcaster.room_data(state, room).await;

        tracing::info!("'{}' kicked '{}' from room '{}'", admin, target, room);
        Ok(snapshot)
    }
}
