//! WebSocket frame DTOs.
//!
//! Every frame is a JSON text object carrying a `type` discriminator.

use serde::{Deserialize, Serialize};

/// Outbound frame type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageType {
    UserJoined,
    RoomData,
    ReceiveMessage,
    UserLeft,
    UserKicked,
    KickError,
    MeetingEnded,
    YouWereKicked,
    EndMeetingError,
}

// ========================================
// Server → Client
// ========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserJoinedMessage {
    pub r#type: MessageType,
    pub user: String,
    pub users: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDataMessage {
    pub r#type: MessageType,
    pub users: Vec<String>,
    pub count: usize,
}

/// `receiveMessage` frame: text messages carry `message`, files carry
/// `file` / `fileName` / `fileType`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveMessageMessage {
    pub r#type: MessageType,
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLeftMessage {
    pub r#type: MessageType,
    pub user: String,
    pub users: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserKickedMessage {
    pub r#type: MessageType,
    pub user_id: String,
    pub users: Vec<String>,
}

/// `kickError` / `endMeetingError` frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub r#type: MessageType,
    pub error: String,
}

/// `meetingEnded` / `youWereKicked` frame
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomClosedMessage {
    pub r#type: MessageType,
    pub room_name: String,
}

// ========================================
// Client → Server
// ========================================

/// Inbound frame.
///
/// Every payload field is optional at this level; missing fields are reported
/// as validation errors when the frame is converted into a domain event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    JoinRoom(RoomPayload),
    SendMessage(SendMessagePayload),
    SendFile(SendFilePayload),
    LeaveRoom(RoomPayload),
    KickUser(KickUserPayload),
    EndMeeting(EndMeetingPayload),
}

/// `joinRoom` / `leaveRoom` payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPayload {
    pub room_name: Option<String>,
    pub user: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    pub room_name: Option<String>,
    pub user: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendFilePayload {
    pub room_name: Option<String>,
    pub user: Option<String>,
    pub file: Option<String>,
    pub file_name: Option<String>,
    pub file_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KickUserPayload {
    pub room_name: Option<String>,
    pub admin_id: Option<String>,
    pub user_id_to_kick: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndMeetingPayload {
    pub room_name: Option<String>,
    pub admin_id: Option<String>,
}
