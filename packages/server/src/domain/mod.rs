//! Domain layer
//!
//! 値オブジェクト・エンティティ・イベント、そしてインメモリの 2 つの表
//! （Connection Registry と Presence Table）を定義します。
//! 外部の協調者（ルームストア・メッセージ送信・本人確認）は trait として定義し、
//! 実装は Infrastructure 層が提供します。

pub mod entity;
pub mod error;
pub mod event;
pub mod identity;
pub mod message_pusher;
pub mod presence;
pub mod registry;
pub mod repository;
pub mod session;
pub mod value_object;

pub use entity::{
    DEFAULT_MAX_PARTICIPANTS, MAX_PARTICIPANTS, MIN_PARTICIPANTS, PersistedRoom,
    PresenceSnapshot, RoomAccess, UserSession,
};
pub use error::{IdentityError, MessagePushError, RepositoryError, ValidationError};
pub use event::{InboundEvent, MessageBody, OutboundEvent};
pub use identity::IdentityResolver;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use presence::PresenceTable;
pub use registry::{ConnectionRegistry, Unregistered};
pub use repository::RoomRepository;
#[cfg(test)]
pub use repository::MockRoomRepository;
pub use session::{SessionState, SharedSessionState};
pub use value_object::{
    ConnectionId, ConnectionIdFactory, FileAttachment, MessageText, RoomName, Timestamp, UserId,
};
