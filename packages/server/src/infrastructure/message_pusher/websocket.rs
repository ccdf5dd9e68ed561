//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - `OutboundEvent` を JSON フレームにエンコードして送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の受付と送信チャンネルの生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を ConnectionId と対応付けて保持し、送信に使用します。
//! チャンネルへの送信はブロックしないため、セッション状態のロックを保持したまま呼び出せます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, OutboundEvent, PusherChannel},
    infrastructure::dto::conversion::encode_event,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## フィールド
///
/// - `connections`: 接続中の ConnectionId と対応する WebSocket sender のマップ
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中の WebSocket sender
    ///
    /// Key: ConnectionId
    /// Value: PusherChannel
    connections: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 登録中の接続数
    pub async fn connection_count(&self) -> usize {
        self.connections.lock().await.len()
    }
}

fn encode(event: &OutboundEvent) -> Result<String, MessagePushError> {
    encode_event(event).map_err(|e| MessagePushError::Encode(e.to_string()))
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_connection(&self, connection: ConnectionId, sender: PusherChannel) {
        let mut connections = self.connections.lock().await;
        connections.insert(connection, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection);
    }

    async fn unregister_connection(&self, connection: &ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections.remove(connection);
        tracing::debug!("Connection '{}' unregistered from MessagePusher", connection);
    }

    async fn push_to(
        &self,
        connection: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError> {
        let frame = encode(event)?;
        let connections = self.connections.lock().await;

        if let Some(sender) = connections.get(connection) {
            sender
                .send(frame)
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed '{}' to connection '{}'", event.name(), connection);
            Ok(())
        } else {
            Err(MessagePushError::ConnectionNotFound(connection.to_string()))
        }
    }

    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError> {
        let frame = encode(event)?;
        let connections = self.connections.lock().await;

        for target in targets {
            if let Some(sender) = connections.get(target) {
                // ブロードキャストでは一部の送信失敗を許容
                if let Err(e) = sender.send(frame.clone()) {
                    tracing::warn!("Failed to push '{}' to connection '{}': {}", event.name(), target, e);
                } else {
                    tracing::debug!("Broadcasted '{}' to connection '{}'", event.name(), target);
                }
            } else {
                tracing::warn!("Connection '{}' not found during broadcast, skipping", target);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionIdFactory, RoomName, UserId};
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - WebSocketMessagePusher の基本的な送信機能
    // - push_to: 特定の接続への送信
    // - broadcast: 複数接続への送信
    // - エラーハンドリング（存在しない接続・閉じたチャンネル）
    //
    // 【なぜこのテストが必要か】
    // - MessagePusher は UseCase から呼ばれる通信層の中核
    // - 1 つの接続の失敗が他の接続への配信を妨げないことを保証する
    //
    // 【どのようなシナリオをテストするか】
    // 1. push_to の成功ケース（JSON フレームが届く）
    // 2. push_to の失敗ケース（接続が存在しない）
    // 3. broadcast の成功ケース（複数接続）
    // 4. broadcast の部分失敗ケース（一部の接続が存在しない・閉じている）
    // 5. 登録解除後は送信されない
    // ========================================

    fn kicked() -> OutboundEvent {
        OutboundEvent::YouWereKicked {
            room: RoomName::new("math".to_string()).unwrap(),
        }
    }

    fn room_data() -> OutboundEvent {
        OutboundEvent::RoomData {
            users: vec![UserId::new("alice".to_string()).unwrap()],
            count: 1,
        }
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続に JSON フレームを送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let connection = ConnectionIdFactory::generate();
        pusher.register_connection(connection, tx).await;

        // when (操作):
        let result = pusher.push_to(&connection, &kicked()).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            rx.recv().await,
            Some(r#"{"type":"youWereKicked","roomName":"math"}"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_push_to_connection_not_found() {
        // テスト項目: 存在しない接続への送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let connection = ConnectionIdFactory::generate();

        // when (操作):
        let result = pusher.push_to(&connection, &kicked()).await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(MessagePushError::ConnectionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_push_to_closed_channel_fails() {
        // テスト項目: 受信側が閉じた接続への送信は PushFailed になる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let connection = ConnectionIdFactory::generate();
        pusher.register_connection(connection, tx).await;
        drop(rx);

        // when (操作):
        let result = pusher.push_to(&connection, &kicked()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::PushFailed(_))));
    }

    #[tokio::test]
    async fn test_broadcast_success() {
        // テスト項目: 複数の接続に同じフレームをブロードキャストできる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let tab1 = ConnectionIdFactory::generate();
        let tab2 = ConnectionIdFactory::generate();
        pusher.register_connection(tab1, tx1).await;
        pusher.register_connection(tab2, tx2).await;

        // when (操作):
        let result = pusher.broadcast(&[tab1, tab2], &room_data()).await;

        // then (期待する結果):
        assert!(result.is_ok());
        let expected = r#"{"type":"roomData","users":["alice"],"count":1}"#.to_string();
        assert_eq!(rx1.recv().await, Some(expected.clone()));
        assert_eq!(rx2.recv().await, Some(expected));
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: 一部の接続が存在しない・閉じていても、残りの接続には届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel();
        let alive = ConnectionIdFactory::generate();
        let closed = ConnectionIdFactory::generate();
        let unknown = ConnectionIdFactory::generate();
        pusher.register_connection(alive, tx1).await;
        pusher.register_connection(closed, tx2).await;
        drop(rx2);

        // when (操作):
        let result = pusher
            .broadcast(&[closed, unknown, alive], &room_data())
            .await;

        // then (期待する結果):
        assert!(result.is_ok()); // ブロードキャストは部分失敗を許容
        assert!(rx1.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_unregister_connection() {
        // テスト項目: 登録解除した接続には送信されない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let connection = ConnectionIdFactory::generate();
        pusher.register_connection(connection, tx).await;

        // when (操作):
        pusher.unregister_connection(&connection).await;

        // then (期待する結果):
        assert_eq!(pusher.connection_count().await, 0);
        assert!(matches!(
            pusher.push_to(&connection, &kicked()).await,
            Err(MessagePushError::ConnectionNotFound(_))
        ));
    }
}
