//! HTTP API endpoint handlers.
//!
//! 在室状況の参照のみ（ルームの作成・更新は扱わない）。

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::RoomName,
    infrastructure::dto::http::{RoomPresenceDetailDto, RoomPresenceDto},
    ui::state::AppState,
    usecase::GetPresenceError,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Presence of every room with at least one present user
pub async fn list_presence(State(state): State<Arc<AppState>>) -> Json<Vec<RoomPresenceDto>> {
    let snapshots = state.get_presence_usecase.list().await;

    // Domain Model から DTO への変換
    Json(snapshots.into_iter().map(RoomPresenceDto::from).collect())
}

/// Presence of one room, with per-user connection counts
pub async fn get_room_presence(
    State(state): State<Arc<AppState>>,
    Path(room_name): Path<String>,
) -> Result<Json<RoomPresenceDetailDto>, StatusCode> {
    let room = match RoomName::new(room_name) {
        Ok(room) => room,
        Err(e) => {
            tracing::warn!("Invalid room name in presence request: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    match state.get_presence_usecase.detail(&room).await {
        // Domain Model から DTO への変換
        Ok(detail) => Ok(Json(detail.into())),
        Err(GetPresenceError::RoomNotFound(_)) => Err(StatusCode::NOT_FOUND),
    }
}
