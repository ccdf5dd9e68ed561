//! Server state shared by the handlers.

use std::sync::Arc;

use crate::{
    domain::{IdentityResolver, MessagePusher},
    usecase::{EventDispatcher, GetPresenceUseCase},
};

/// Shared application state
pub struct AppState {
    /// EventDispatcher（受信イベントの振り分け）
    pub dispatcher: Arc<EventDispatcher>,
    /// MessagePusher（接続ごとの送信チャンネルの登録先）
    pub message_pusher: Arc<dyn MessagePusher>,
    /// IdentityResolver（接続時の本人確認）
    pub identity_resolver: Arc<dyn IdentityResolver>,
    /// GetPresenceUseCase（在室状況の取得）
    pub get_presence_usecase: Arc<GetPresenceUseCase>,
}
