//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Entry of `GET /api/presence`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPresenceDto {
    pub room_name: String,
    pub users: Vec<String>,
    pub count: usize,
}

/// Response of `GET /api/presence/{room_name}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPresenceDetailDto {
    pub room_name: String,
    pub users: Vec<PresentUserDto>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentUserDto {
    pub user: String,
    pub connections: usize,
    /// RFC 3339
    pub connected_at: String,
}
