//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{RepositoryError, ValidationError};

/// 特権操作（キック・会議終了）の認可エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizeError {
    /// ルームが存在しない
    #[error("Room not found")]
    RoomNotFound(String),

    /// 呼び出し元がルームのオーナーではない
    #[error("Only the room owner can perform this action")]
    NotOwner { room: String, caller: String },

    /// ルームストアの参照に失敗
    #[error("Room store unavailable")]
    Storage(#[source] RepositoryError),
}

/// キック処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KickError {
    #[error(transparent)]
    Authorize(#[from] AuthorizeError),

    /// メンバー一覧の保存に失敗
    #[error("Failed to kick user")]
    Storage(#[source] RepositoryError),
}

/// 会議終了処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndMeetingError {
    #[error(transparent)]
    Authorize(#[from] AuthorizeError),

    /// ルームの削除に失敗
    #[error("Failed to end meeting")]
    Storage(#[source] RepositoryError),
}

/// 在室状況取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetPresenceError {
    #[error("nobody is present in room '{0}'")]
    RoomNotFound(String),
}

/// イベント処理のエラー（1 イベント単位。接続やプロセスを終了させない）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// ペイロードの欠落・不正（破棄してログに残す）
    #[error("invalid event: {0}")]
    Validation(#[from] ValidationError),

    /// 特権操作の認可失敗（呼び出し元にのみ通知済み）
    #[error("unauthorized: {0}")]
    Authorization(AuthorizeError),

    /// ルームストア障害（呼び出し元にのみ通知済み、メモリ上の状態は未変更）
    #[error("storage failure: {0}")]
    Storage(RepositoryError),

    /// 想定外の失敗
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<AuthorizeError> for DispatchError {
    fn from(error: AuthorizeError) -> Self {
        match error {
            AuthorizeError::Storage(e) => DispatchError::Storage(e),
            other => DispatchError::Authorization(other),
        }
    }
}

impl From<KickError> for DispatchError {
    fn from(error: KickError) -> Self {
        match error {
            KickError::Authorize(e) => e.into(),
            KickError::Storage(e) => DispatchError::Storage(e),
        }
    }
}

impl From<EndMeetingError> for DispatchError {
    fn from(error: EndMeetingError) -> Self {
        match error {
            EndMeetingError::Authorize(e) => e.into(),
            EndMeetingError::Storage(e) => DispatchError::Storage(e),
        }
    }
}
