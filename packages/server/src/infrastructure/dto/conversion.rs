//! Conversion logic between DTOs and domain entities.

use chrono::DateTime;
use zemi_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    FileAttachment, InboundEvent, MessageBody, MessageText, OutboundEvent, PersistedRoom,
    PresenceSnapshot, RoomAccess, RoomName, Timestamp, UserId, ValidationError,
    DEFAULT_MAX_PARTICIPANTS,
};
use crate::infrastructure::dto::{http, record, websocket as dto};
use crate::usecase::RoomPresenceDetail;

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    value.ok_or(ValidationError::MissingField(field))
}

fn room_name(value: Option<String>) -> Result<RoomName, ValidationError> {
    RoomName::new(required(value, "roomName")?)
}

fn user_id(value: Option<String>, field: &'static str) -> Result<UserId, ValidationError> {
    UserId::new(required(value, field)?)
}

fn names(users: &[UserId]) -> Vec<String> {
    users.iter().map(|user| user.as_str().to_string()).collect()
}

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<dto::ClientMessage> for InboundEvent {
    type Error = ValidationError;

    fn try_from(message: dto::ClientMessage) -> Result<Self, Self::Error> {
        let event = match message {
            dto::ClientMessage::JoinRoom(payload) => InboundEvent::JoinRoom {
                room: room_name(payload.room_name)?,
                user: user_id(payload.user, "user")?,
            },
            dto::ClientMessage::SendMessage(payload) => InboundEvent::SendMessage {
                room: room_name(payload.room_name)?,
                user: user_id(payload.user, "user")?,
                message: MessageText::new(required(payload.message, "message")?)?,
            },
            dto::ClientMessage::SendFile(payload) => InboundEvent::SendFile {
                room: room_name(payload.room_name)?,
                user: user_id(payload.user, "user")?,
                file: FileAttachment::new(
                    required(payload.file, "file")?,
                    required(payload.file_name, "fileName")?,
                    required(payload.file_type, "fileType")?,
                )?,
            },
            dto::ClientMessage::LeaveRoom(payload) => InboundEvent::LeaveRoom {
                room: room_name(payload.room_name)?,
                user: user_id(payload.user, "user")?,
            },
            dto::ClientMessage::KickUser(payload) => InboundEvent::KickUser {
                room: room_name(payload.room_name)?,
                admin: user_id(payload.admin_id, "adminId")?,
                target: user_id(payload.user_id_to_kick, "userIdToKick")?,
            },
            dto::ClientMessage::EndMeeting(payload) => InboundEvent::EndMeeting {
                room: room_name(payload.room_name)?,
                admin: user_id(payload.admin_id, "adminId")?,
            },
        };
        Ok(event)
    }
}

impl record::RoomRecord {
    /// Map a stored document onto a room.
    ///
    /// `fallback_created_at` is used when the document has no `createdAt`.
    pub fn into_persisted(
        self,
        fallback_created_at: Timestamp,
    ) -> Result<PersistedRoom, ValidationError> {
        let access = match self.r#type {
            record::RoomTypeRecord::Public => RoomAccess::Public,
            record::RoomTypeRecord::Private => RoomAccess::Private {
                access_code: self
                    .access_code
                    .filter(|code| !code.trim().is_empty())
                    .ok_or_else(|| ValidationError::Invalid {
                        field: "accessCode",
                        reason: "required for private rooms".to_string(),
                    })?,
            },
        };
        let created_at = match self.created_at {
            Some(raw) => DateTime::parse_from_rfc3339(&raw)
                .map(|parsed| Timestamp::new(parsed.timestamp_millis()))
                .map_err(|e| ValidationError::Invalid {
                    field: "createdAt",
                    reason: e.to_string(),
                })?,
            None => fallback_created_at,
        };

        let mut room = PersistedRoom::new(
            RoomName::new(self.name)?,
            UserId::new(self.owner)?,
            self.max_participants.unwrap_or(DEFAULT_MAX_PARTICIPANTS),
            access,
            created_at,
        )?;
        for member in self.members {
            let member = UserId::new(member)?;
            if !room.has_member(&member) {
                room.members.push(member);
            }
        }
        Ok(room)
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

/// Encode an outbound event as a JSON text frame.
pub fn encode_event(event: &OutboundEvent) -> Result<String, serde_json::Error> {
    match event {
        OutboundEvent::UserJoined { user, users } => serde_json::to_string(&dto::UserJoinedMessage {
            r#type: dto::MessageType::UserJoined,
            user: user.as_str().to_string(),
            users: names(users),
        }),
        OutboundEvent::RoomData { users, count } => serde_json::to_string(&dto::RoomDataMessage {
            r#type: dto::MessageType::RoomData,
            users: names(users),
            count: *count,
        }),
        OutboundEvent::ReceiveMessage {
            user,
            body,
            timestamp,
        } => {
            let mut message = dto::ReceiveMessageMessage {
                r#type: dto::MessageType::ReceiveMessage,
                user: user.as_str().to_string(),
                message: None,
                timestamp: timestamp.value(),
                file: None,
                file_name: None,
                file_type: None,
            };
            match body {
                MessageBody::Text(text) => message.message = Some(text.as_str().to_string()),
                MessageBody::File(file) => {
                    message.file = Some(file.data().to_string());
                    message.file_name = Some(file.name().to_string());
                    message.file_type = Some(file.mime_type().to_string());
                }
            }
            serde_json::to_string(&message)
        }
        OutboundEvent::UserLeft { user, users } => serde_json::to_string(&dto::UserLeftMessage {
            r#type: dto::MessageType::UserLeft,
            user: user.as_str().to_string(),
            users: names(users),
        }),
        OutboundEvent::UserKicked { user, users } => {
            serde_json::to_string(&dto::UserKickedMessage {
                r#type: dto::MessageType::UserKicked,
                user_id: user.as_str().to_string(),
                users: names(users),
            })
        }
        OutboundEvent::KickError { error } => serde_json::to_string(&dto::ErrorMessage {
            r#type: dto::MessageType::KickError,
            error: error.clone(),
        }),
        OutboundEvent::EndMeetingError { error } => serde_json::to_string(&dto::ErrorMessage {
            r#type: dto::MessageType::EndMeetingError,
            error: error.clone(),
        }),
        OutboundEvent::MeetingEnded { room } => serde_json::to_string(&dto::RoomClosedMessage {
            r#type: dto::MessageType::MeetingEnded,
            room_name: room.as_str().to_string(),
        }),
        OutboundEvent::YouWereKicked { room } => {
            serde_json::to_string(&dto::RoomClosedMessage {
                r#type: dto::MessageType::YouWereKicked,
                room_name: room.as_str().to_string(),
            })
        }
    }
}

impl From<PresenceSnapshot> for http::RoomPresenceDto {
    fn from(snapshot: PresenceSnapshot) -> Self {
        Self {
            room_name: snapshot.room.into_string(),
            users: names(&snapshot.users),
            count: snapshot.count,
        }
    }
}

impl From<RoomPresenceDetail> for http::RoomPresenceDetailDto {
    fn from(detail: RoomPresenceDetail) -> Self {
        let users: Vec<http::PresentUserDto> = detail
            .users
            .into_iter()
            .map(|present| http::PresentUserDto {
                user: present.user.into_string(),
                connections: present.connections,
                connected_at: timestamp_to_rfc3339(present.connected_at.value()),
            })
            .collect();
        Self {
            room_name: detail.room.into_string(),
            count: users.len(),
            users,
        }
    }
}

impl From<&PersistedRoom> for record::RoomRecord {
    fn from(room: &PersistedRoom) -> Self {
        let (r#type, access_code) = match &room.access {
            RoomAccess::Public => (record::RoomTypeRecord::Public, None),
            RoomAccess::Private { access_code } => {
                (record::RoomTypeRecord::Private, Some(access_code.clone()))
            }
        };
        Self {
            name: room.name.as_str().to_string(),
            r#type,
            access_code,
            owner: room.owner.as_str().to_string(),
            max_participants: Some(room.max_participants),
            members: names(&room.members),
            created_at: Some(timestamp_to_rfc3339(room.created_at.value())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MAX_PARTICIPANTS;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn room(name: &str) -> RoomName {
        RoomName::new(name.to_string()).unwrap()
    }

    fn parse(json: &str) -> Result<InboundEvent, ValidationError> {
        let message: dto::ClientMessage = serde_json::from_str(json).unwrap();
        InboundEvent::try_from(message)
    }

    fn record(json: serde_json::Value) -> record::RoomRecord {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_kick_user_frame_to_domain() {
        // テスト項目: kickUser フレームがドメインイベントに変換される
        // given (前提条件):
        let json = r#"{"type":"kickUser","roomName":"math","adminId":"bob","userIdToKick":"alice"}"#;

        // when (操作):
        let event = parse(json);

        // then (期待する結果):
        assert_eq!(
            event,
            Ok(InboundEvent::KickUser {
                room: room("math"),
                admin: user("bob"),
                target: user("alice"),
            })
        );
    }

    #[test]
    fn test_send_file_frame_to_domain() {
        // テスト項目: sendFile フレームがファイル付きのドメインイベントに変換される
        // given (前提条件):
        let json = r#"{"type":"sendFile","roomName":"math","user":"alice","file":"data:image/png;base64,AAAA","fileName":"graph.png","fileType":"image/png"}"#;

        // when (操作):
        let event = parse(json).unwrap();

        // then (期待する結果):
        let InboundEvent::SendFile { file, .. } = event else {
            panic!("expected sendFile, got {:?}", event);
        };
        assert_eq!(file.data(), "data:image/png;base64,AAAA");
        assert_eq!(file.name(), "graph.png");
        assert_eq!(file.mime_type(), "image/png");
    }

    #[test]
    fn test_missing_room_name_is_validation_error() {
        // テスト項目: roomName が欠けたフレームは MissingField になる
        // given (前提条件):
        let json = r#"{"type":"joinRoom","user":"alice"}"#;

        // when (操作):
        let event = parse(json);

        // then (期待する結果):
        assert_eq!(event, Err(ValidationError::MissingField("roomName")));
    }

    #[test]
    fn test_missing_kick_target_is_validation_error() {
        // テスト項目: userIdToKick が欠けた kickUser フレームは MissingField になる
        // given (前提条件):
        let json = r#"{"type":"kickUser","roomName":"math","adminId":"bob"}"#;

        // when (操作):
        let event = parse(json);

        // then (期待する結果):
        assert_eq!(event, Err(ValidationError::MissingField("userIdToKick")));
    }

    #[test]
    fn test_blank_message_is_validation_error() {
        // テスト項目: 空白のみのメッセージは Blank になる
        // given (前提条件):
        let json = r#"{"type":"sendMessage","roomName":"math","user":"alice","message":"   "}"#;

        // when (操作):
        let event = parse(json);

        // then (期待する結果):
        assert_eq!(event, Err(ValidationError::Blank("message")));
    }

    #[test]
    fn test_encode_user_kicked() {
        // テスト項目: userKicked は userId フィールドでエンコードされる
        // given (前提条件):
        let event = OutboundEvent::UserKicked {
            user: user("alice"),
            users: vec![],
        };

        // when (操作):
        let json: serde_json::Value =
            serde_json::from_str(&encode_event(&event).unwrap()).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({"type": "userKicked", "userId": "alice", "users": []})
        );
    }

    #[test]
    fn test_encode_file_message() {
        // テスト項目: ファイルの receiveMessage には file / fileName / fileType が含まれる
        // given (前提条件):
        let file = FileAttachment::new(
            "data:text/plain;base64,aGk=".to_string(),
            "notes.txt".to_string(),
            "text/plain".to_string(),
        )
        .unwrap();
        let event = OutboundEvent::ReceiveMessage {
            user: user("alice"),
            body: MessageBody::File(file),
            timestamp: Timestamp::new(1000),
        };

        // when (操作):
        let json: serde_json::Value =
            serde_json::from_str(&encode_event(&event).unwrap()).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({
                "type": "receiveMessage",
                "user": "alice",
                "timestamp": 1000,
                "file": "data:text/plain;base64,aGk=",
                "fileName": "notes.txt",
                "fileType": "text/plain"
            })
        );
    }

    #[test]
    fn test_encode_you_were_kicked() {
        // テスト項目: youWereKicked は roomName フィールドでエンコードされる
        // given (前提条件):
        let event = OutboundEvent::YouWereKicked { room: room("math") };

        // when (操作):
        let json: serde_json::Value =
            serde_json::from_str(&encode_event(&event).unwrap()).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({"type": "youWereKicked", "roomName": "math"})
        );
    }

    #[test]
    fn test_record_to_domain_puts_owner_first() {
        // テスト項目: ルーム文書の変換でオーナーがメンバーの先頭に入り、重複は除かれる
        // given (前提条件):
        let document = record(serde_json::json!({
            "name": " math ",
            "type": "public",
            "owner": "bob",
            "members": ["alice", "bob", "alice"]
        }));

        // when (操作):
        let room = document.into_persisted(Timestamp::new(5)).unwrap();

        // then (期待する結果):
        assert_eq!(room.name.as_str(), "math");
        assert_eq!(room.members, vec![user("bob"), user("alice")]);
        assert_eq!(room.max_participants, DEFAULT_MAX_PARTICIPANTS);
        assert_eq!(room.access, RoomAccess::Public);
        assert_eq!(room.created_at, Timestamp::new(5));
    }

    #[test]
    fn test_private_record_requires_access_code() {
        // テスト項目: アクセスコードのない非公開ルームは変換できない
        // given (前提条件):
        let document = record(serde_json::json!({
            "name": "secret",
            "type": "private",
            "owner": "bob"
        }));

        // when (操作):
        let result = document.into_persisted(Timestamp::new(0));

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(ValidationError::Invalid {
                field: "accessCode",
                ..
            })
        ));
    }

    #[test]
    fn test_record_capacity_out_of_range_is_rejected() {
        // テスト項目: 定員が範囲外のルーム文書は変換できない
        // given (前提条件):
        let document = record(serde_json::json!({
            "name": "math",
            "owner": "bob",
            "maxParticipants": MAX_PARTICIPANTS + 1
        }));

        // when (操作):
        let result = document.into_persisted(Timestamp::new(0));

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(ValidationError::Invalid {
                field: "maxParticipants",
                ..
            })
        ));
    }

    #[test]
    fn test_record_created_at_is_parsed() {
        // テスト項目: createdAt が RFC 3339 として読み込まれる
        // given (前提条件):
        let document = record(serde_json::json!({
            "name": "math",
            "owner": "bob",
            "createdAt": "2024-01-01T00:00:00Z"
        }));

        // when (操作):
        let room = document.into_persisted(Timestamp::new(0)).unwrap();

        // then (期待する結果):
        assert_eq!(room.created_at, Timestamp::new(1_704_067_200_000));
    }
}
