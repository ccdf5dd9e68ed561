//! Session events
//!
//! `InboundEvent` はクライアントから届くイベント、`OutboundEvent` はサーバーから
//! 送り出すイベントです。ワイヤ形式（JSON）への変換は Infrastructure 層が担当します。

use super::{FileAttachment, MessageText, RoomName, Timestamp, UserId};

/// Validated inbound session event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    JoinRoom {
        room: RoomName,
        user: UserId,
    },
    SendMessage {
        room: RoomName,
        user: UserId,
        message: MessageText,
    },
    SendFile {
        room: RoomName,
        user: UserId,
        file: FileAttachment,
    },
    LeaveRoom {
        room: RoomName,
        user: UserId,
    },
    KickUser {
        room: RoomName,
        admin: UserId,
        target: UserId,
    },
    EndMeeting {
        room: RoomName,
        admin: UserId,
    },
    /// The transport connection closed
    Disconnect,
}

impl InboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            InboundEvent::JoinRoom { .. } => "joinRoom",
            InboundEvent::SendMessage { .. } => "sendMessage",
            InboundEvent::SendFile { .. } => "sendFile",
            InboundEvent::LeaveRoom { .. } => "leaveRoom",
            InboundEvent::KickUser { .. } => "kickUser",
            InboundEvent::EndMeeting { .. } => "endMeeting",
            InboundEvent::Disconnect => "disconnect",
        }
    }

    /// The identity the payload claims to act as, if any.
    pub fn claimed_identity(&self) -> Option<&UserId> {
        match self {
            InboundEvent::JoinRoom { user, .. }
            | InboundEvent::SendMessage { user, .. }
            | InboundEvent::SendFile { user, .. }
            | InboundEvent::LeaveRoom { user, .. } => Some(user),
            InboundEvent::KickUser { admin, .. } | InboundEvent::EndMeeting { admin, .. } => {
                Some(admin)
            }
            InboundEvent::Disconnect => None,
        }
    }
}

/// Body of a relayed `receiveMessage`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    Text(MessageText),
    File(FileAttachment),
}

/// Outbound event delivered to one or more connections
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    UserJoined {
        user: UserId,
        users: Vec<UserId>,
    },
    RoomData {
        users: Vec<UserId>,
        count: usize,
    },
    ReceiveMessage {
        user: UserId,
        body: MessageBody,
        timestamp: Timestamp,
    },
    UserLeft {
        user: UserId,
        users: Vec<UserId>,
    },
    UserKicked {
        user: UserId,
        users: Vec<UserId>,
    },
    KickError {
        error: String,
    },
    MeetingEnded {
        room: RoomName,
    },
    YouWereKicked {
        room: RoomName,
    },
    EndMeetingError {
        error: String,
    },
}

impl OutboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            OutboundEvent::UserJoined { .. } => "userJoined",
            OutboundEvent::RoomData { .. } => "roomData",
            OutboundEvent::ReceiveMessage { .. } => "receiveMessage",
            OutboundEvent::UserLeft { .. } => "userLeft",
            OutboundEvent::UserKicked { .. } => "userKicked",
            OutboundEvent::KickError { .. } => "kickError",
            OutboundEvent::MeetingEnded { .. } => "meetingEnded",
            OutboundEvent::YouWereKicked { .. } => "youWereKicked",
            OutboundEvent::EndMeetingError { .. } => "endMeetingError",
        }
    }
}
