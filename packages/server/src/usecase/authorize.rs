//! UseCase: 特権操作の認可（Privileged Action Guard）
//!
//! キック・会議終了の前に、ルームストアからルームを取得し、呼び出し元が
//! オーナーであることを確認します。失敗した場合、状態の変更もブロードキャストも
//! 行ってはいけません。

use std::sync::Arc;

use crate::domain::{PersistedRoom, RoomName, RoomRepository, UserId};

use super::error::AuthorizeError;

/// 特権操作の認可
#[derive(Clone)]
pub struct PrivilegedActionGuard {
    /// Repository（ルームストアの抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl PrivilegedActionGuard {
    /// 新しい PrivilegedActionGuard を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 呼び出し元がルームのオーナーであることを確認する
    ///
    /// # Returns
    ///
    /// * `Ok(PersistedRoom)` - 認可成功（取得したルームを返す）
    /// * `Err(AuthorizeError::RoomNotFound)` - ルームが存在しない
    /// * `Err(AuthorizeError::NotOwner)` - 呼び出し元がオーナーではない
    /// * `Err(AuthorizeError::Storage)` - ルームストアの障害
    pub async fn authorize(
        &self,
        room: &RoomName,
        caller: &UserId,
    ) -> Result<PersistedRoom, AuthorizeError> {
        let persisted = self
            .repository
            .find_by_name(room)
            .await
            .map_err(AuthorizeError::Storage)?
            .ok_or_else(|| AuthorizeError::RoomNotFound(room.as_str().to_string()))?;

        if !persisted.is_owned_by(caller) {
            return Err(AuthorizeError::NotOwner {
                room: room.as_str().to_string(),
                caller: caller.as_str().to_string(),
            });
        }

        Ok(persisted)
    }
}
