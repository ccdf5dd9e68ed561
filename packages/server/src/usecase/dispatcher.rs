//! Event Dispatcher
//!
//! 検証済みの `InboundEvent` を対応するユースケースに振り分けます。
//! 全てのユースケースは同じ `SessionState` のロックを 1 イベントにつき 1 回だけ取得し、
//! イベントの処理が終わるまで保持します。これにより、1 つのイベントによる
//! Connection Registry と Presence Table の更新は他のイベントから不可分に見え、
//! 同じルームへのブロードキャストは処理順に送られます。

use std::sync::Arc;

use zemi_shared::time::Clock;

use crate::domain::{
    ConnectionId, InboundEvent, MessageBody, MessagePusher, RoomRepository, SharedSessionState,
    UserId, ValidationError,
};

use super::{
    broadcast::RoomBroadcaster, disconnect_participant::DisconnectParticipantUseCase,
    end_meeting::EndMeetingUseCase, error::DispatchError, join_room::JoinRoomUseCase,
    kick_user::KickUserUseCase, leave_room::LeaveRoomUseCase, send_message::SendMessageUseCase,
};

/// セッションイベントの振り分け
pub struct EventDispatcher {
    join_room_usecase: JoinRoomUseCase,
    send_message_usecase: SendMessageUseCase,
    leave_room_usecase: LeaveRoomUseCase,
    kick_user_usecase: KickUserUseCase,
    end_meeting_usecase: EndMeetingUseCase,
    disconnect_participant_usecase: DisconnectParticipantUseCase,
}

impl EventDispatcher {
    /// 新しい EventDispatcher を作成
    ///
    /// # Arguments
    ///
    /// * `state` - Connection Registry と Presence Table（テストごとに独立したものを渡せる）
    /// * `repository` - ルームストア
    /// * `message_pusher` - 接続へのイベント送信
    /// * `clock` - メッセージのタイムスタンプ・接続時刻の取得元
    pub fn new(
        state: SharedSessionState,
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let broadcaster = RoomBroadcaster::new(message_pusher);
        Self {
            join_room_usecase: JoinRoomUseCase::new(
                state.clone(),
                broadcaster.clone(),
                clock.clone(),
            ),
            send_message_usecase: SendMessageUseCase::new(
                state.clone(),
                broadcaster.clone(),
                clock,
            ),
            leave_room_usecase: LeaveRoomUseCase::new(state.clone(), broadcaster.clone()),
            kick_user_usecase: KickUserUseCase::new(
                state.clone(),
                repository.clone(),
                broadcaster.clone(),
            ),
            end_meeting_usecase: EndMeetingUseCase::new(
                state.clone(),
                repository,
                broadcaster.clone(),
            ),
            disconnect_participant_usecase: DisconnectParticipantUseCase::new(state, broadcaster),
        }
    }

    /// イベントを処理する
    ///
    /// # Arguments
    ///
    /// * `connection` - イベントを受信した接続
    /// * `caller` - 接続に紐づく本人確認済みの ID（匿名接続なら `None`）
    /// * `event` - 検証済みのイベント
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 処理完了
    /// * `Err(DispatchError)` - イベントは破棄または拒否された（拒否は呼び出し元に通知済み）
    pub async fn dispatch(
        &self,
        connection: ConnectionId,
        caller: Option<&UserId>,
        event: InboundEvent,
    ) -> Result<(), DispatchError> {
        if let (Some(resolved), Some(claimed)) = (caller, event.claimed_identity()) {
            if resolved != claimed {
                return Err(ValidationError::IdentityMismatch {
                    claimed: claimed.as_str().to_string(),
                    resolved: resolved.as_str().to_string(),
                }
                .into());
            }
        }

        tracing::debug!("Dispatching '{}' from connection '{}'", event.name(), connection);

        match event {
            InboundEvent::JoinRoom { room, user } => {
                self.join_room_usecase.execute(connection, room, user).await;
            }
            InboundEvent::SendMessage {
                room,
                user,
                message,
            } => {
                self.send_message_usecase
                    .execute(room, user, MessageBody::Text(message))
                    .await;
            }
            InboundEvent::SendFile { room, user, file } => {
                self.send_message_usecase
                    .execute(room, user, MessageBody::File(file))
                    .await;
            }
            InboundEvent::LeaveRoom { room, user } => {
                self.leave_room_usecase.execute(connection, room, user).await;
            }
            InboundEvent::KickUser {
                room,
                admin,
                target,
            } => {
                self.kick_user_usecase
                    .execute(connection, room, admin, target)
                    .await?;
            }
            InboundEvent::EndMeeting { room, admin } => {
                self.end_meeting_usecase
                    .execute(connection, room, admin)
                    .await?;
            }
            InboundEvent::Disconnect => {
                self.disconnect_participant_usecase.execute(connection).await;
            }
        }

        Ok(())
    }
}
