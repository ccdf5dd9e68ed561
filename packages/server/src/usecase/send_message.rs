//! UseCase: メッセージ・ファイル送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - ルーム全体（送信者を含む）への receiveMessage の中継
//!
//! ### なぜこのテストが必要か
//! - サーバー側で付与したタイムスタンプ付きで全在室者に届くことを保証
//! - ファイル送信も同じ receiveMessage として届くことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：テキストメッセージの中継
//! - 正常系：ファイルの中継
//! - エッジケース：在室していない送信者からの中継（ベストエフォートで中継する）

use std::sync::Arc;

use zemi_shared::time::Clock;

use crate::domain::{
    MessageBody, OutboundEvent, RoomName, SharedSessionState, Timestamp, UserId,
};

use super::broadcast::RoomBroadcaster;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    state: SharedSessionState,
    broadcaster: RoomBroadcaster,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        state: SharedSessionState,
        broadcaster: RoomBroadcaster,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state,
            broadcaster,
            clock,
        }
    }

    /// メッセージ（テキストまたはファイル）をルームに中継する
    ///
    /// 状態は変更しない。送信者がルームに在室しているかは検証しない。
    ///
    /// # Returns
    ///
    /// 配信先の接続数
    pub async fn execute(&self, room: RoomName, user: UserId, body: MessageBody) -> usize {
        let state = self.state.lock().await;

        if !state.presence.contains(&room, &user) {
            tracing::debug!(
                "Relaying message from '{}' who is not present in room '{}'",
                user,
                room
            );
        }

        let targets = state.room_connections(&room);
        let event = OutboundEvent::ReceiveMessage {
            user,
            body,
            timestamp: Timestamp::new(self.clock.now_millis()),
        };
        self.broadcaster.to_connections(&targets, &event).await;
        tracing::debug!("Relayed message to {} connection(s) in '{}'", targets.len(), room);

        targets.len()
    }
}
