//! Repository trait 定義
//!
//! ドメイン層が必要とするルームストアのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{PersistedRoom, RepositoryError, RoomName};

/// Room Repository trait
///
/// 永続化されたルーム（オーナー・メンバー一覧・定員・アクセスコード）への
/// インターフェース。全ての操作は非同期かつ失敗し得る（ネットワーク・ストア障害）。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// ルーム名でルームを取得
    async fn find_by_name(&self, name: &RoomName) -> Result<Option<PersistedRoom>, RepositoryError>;

    /// ルーム名でルームを削除（存在しない場合も成功）
    async fn delete_by_name(&self, name: &RoomName) -> Result<(), RepositoryError>;

    /// ルームを保存（同名のルームは上書き）
    async fn save(&self, room: &PersistedRoom) -> Result<(), RepositoryError>;

    /// 全てのルームを取得
    async fn list(&self) -> Result<Vec<PersistedRoom>, RepositoryError>;
}
