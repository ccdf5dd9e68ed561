//! UseCase: 接続切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 切断された接続の所有ユーザーを探し、暗黙の退室として処理する
//!
//! ### なぜこのテストが必要か
//! - タブを閉じただけで、別のタブを開いているユーザーが退室扱いにならないことを保証
//! - 最後の接続が切れたときに userLeft が送られることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：唯一の接続の切断
//! - エッジケース：複数接続のうち 1 つの切断
//! - エッジケース：入室前の接続の切断（何もしない）

use crate::domain::{ConnectionId, SharedSessionState, UserId};

use super::{
    broadcast::RoomBroadcaster,
    leave_room::{LeaveOutcome, release_connection},
};

/// 接続切断のユースケース
pub struct DisconnectParticipantUseCase {
    state: SharedSessionState,
    broadcaster: RoomBroadcaster,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(state: SharedSessionState, broadcaster: RoomBroadcaster) -> Self {
        Self { state, broadcaster }
    }

    /// 接続切断を実行
    ///
    /// 接続の送信チャンネルは、登録の有無に関わらず MessagePusher から外す。
    ///
    /// # Returns
    ///
    /// * `Some((UserId, LeaveOutcome))` - 接続を所有していたユーザーと退室処理の結果
    /// * `None` - どのユーザーにも登録されていない接続だった
    pub async fn execute(&self, connection: ConnectionId) -> Option<(UserId, LeaveOutcome)> {
        let result = {
            let mut state = self.state.lock().await;
            match state.registry.find_identity(&connection) {
                Some(user) => {
                    let outcome =
                        release_connection(&mut state, &self.broadcaster, &user, &connection)
                            .await;
                    Some((user, outcome))
                }
                None => None,
            }
        };

        self.broadcaster
            .message_pusher()
            .unregister_connection(&connection)
            .await;

        match &result {
            Some((user, outcome)) => tracing::info!(
                "Connection '{}' of '{}' disconnected ({:?})",
                connection,
                user,
                outcome
            ),
            None => tracing::debug!("Unregistered connection '{}' disconnected", connection),
        }
        result
    }
}
