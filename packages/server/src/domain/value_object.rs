//! Value objects
//!
//! 生の文字列をそのまま扱わず、検証済みの型としてドメイン層に持ち込みます。

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use super::ValidationError;

/// Maximum length of a user identity
pub const USER_ID_MAX_LEN: usize = 128;
/// Maximum length of a room name
pub const ROOM_NAME_MAX_LEN: usize = 100;
/// Maximum length of a chat message
pub const MESSAGE_TEXT_MAX_LEN: usize = 10_000;
/// Maximum length of an encoded file payload (data URL)
pub const FILE_PAYLOAD_MAX_LEN: usize = 16 * 1024 * 1024;
/// Maximum length of a file name or MIME type
pub const FILE_META_MAX_LEN: usize = 255;

fn validate_text(
    field: &'static str,
    value: String,
    max: usize,
    trim: bool,
) -> Result<String, ValidationError> {
    let value = if trim {
        value.trim().to_string()
    } else {
        value
    };
    if value.trim().is_empty() {
        return Err(ValidationError::Blank(field));
    }
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(value)
}

/// Stable identity of a logical user (one user may hold many connections)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        validate_text("user", value, USER_ID_MAX_LEN, true).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique room name (trimmed, as stored by the room store)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RoomName(String);

impl RoomName {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        validate_text("roomName", value, ROOM_NAME_MAX_LEN, true).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle of one live transport connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Generates fresh connection handles
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    pub fn generate() -> ConnectionId {
        ConnectionId(Uuid::new_v4())
    }
}

/// Chat message body (kept verbatim, not trimmed)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        validate_text("message", value, MESSAGE_TEXT_MAX_LEN, false).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageText {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// File shared into a room: encoded payload plus its name and MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    data: String,
    name: String,
    mime_type: String,
}

impl FileAttachment {
    pub fn new(data: String, name: String, mime_type: String) -> Result<Self, ValidationError> {
        Ok(Self {
            data: validate_text("file", data, FILE_PAYLOAD_MAX_LEN, false)?,
            name: validate_text("fileName", name, FILE_META_MAX_LEN, true)?,
            mime_type: validate_text("fileType", mime_type, FILE_META_MAX_LEN, true)?,
        })
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
