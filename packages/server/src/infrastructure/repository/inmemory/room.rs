//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリのルームストアとして使用します。
//!
//! 起動時に `--rooms-file` で指定された JSON ファイル（ルーム文書の配列）から
//! ルームを読み込めます。読み込みに失敗した場合は起動を中止します。

use std::{collections::HashMap, path::Path};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::{
    domain::{PersistedRoom, RepositoryError, RoomName, RoomRepository, Timestamp, ValidationError},
    infrastructure::dto::record::RoomRecord,
};

/// シードファイル読み込みのエラー
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read rooms file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rooms file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid room #{index} in rooms file: {source}")]
    InvalidRoom {
        index: usize,
        #[source]
        source: ValidationError,
    },

    #[error("room '{0}' appears more than once in rooms file")]
    DuplicateRoom(String),
}

/// インメモリ Room Repository 実装
///
/// ルーム名をキーに PersistedRoom を保持し、ドメイン層の RoomRepository trait を実装します（依存性の逆転）。
#[derive(Default)]
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<RoomName, PersistedRoom>>,
}

impl InMemoryRoomRepository {
    /// 空の InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// ルーム一覧から InMemoryRoomRepository を作成
    ///
    /// 同じ名前のルームが複数ある場合はエラー。
    pub fn with_rooms(rooms: Vec<PersistedRoom>) -> Result<Self, SeedError> {
        let mut table = HashMap::with_capacity(rooms.len());
        for room in rooms {
            if table.contains_key(&room.name) {
                return Err(SeedError::DuplicateRoom(room.name.into_string()));
            }
            table.insert(room.name.clone(), room);
        }
        Ok(Self {
            rooms: Mutex::new(table),
        })
    }

    /// JSON 文字列（ルーム文書の配列）から InMemoryRoomRepository を作成
    ///
    /// # Arguments
    ///
    /// * `json` - ルーム文書の配列
    /// * `source` - エラーメッセージに使う読み込み元の名前
    /// * `loaded_at` - `createdAt` のない文書に使う作成時刻
    pub fn from_seed_json(json: &str, source: &str, loaded_at: Timestamp) -> Result<Self, SeedError> {
        let records: Vec<RoomRecord> =
            serde_json::from_str(json).map_err(|source_error| SeedError::Parse {
                path: source.to_string(),
                source: source_error,
            })?;

        let rooms = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                record
                    .into_persisted(loaded_at)
                    .map_err(|source| SeedError::InvalidRoom { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::with_rooms(rooms)
    }

    /// シードファイルから InMemoryRoomRepository を作成
    pub async fn from_seed_file(path: &Path, loaded_at: Timestamp) -> Result<Self, SeedError> {
        let source_name = path.display().to_string();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SeedError::Io {
                path: source_name.clone(),
                source,
            })?;
        let repository = Self::from_seed_json(&json, &source_name, loaded_at)?;
        tracing::info!(
            "Loaded {} room(s) from '{}'",
            repository.rooms.lock().await.len(),
            source_name
        );
        Ok(repository)
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn find_by_name(&self, name: &RoomName) -> Result<Option<PersistedRoom>, RepositoryError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms.get(name).cloned())
    }

    async fn delete_by_name(&self, name: &RoomName) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        if rooms.remove(name).is_none() {
            tracing::debug!("Room '{}' was already deleted", name);
        }
        Ok(())
    }

    async fn save(&self, room: &PersistedRoom) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        rooms.insert(room.name.clone(), room.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<PersistedRoom>, RepositoryError> {
        let rooms = self.rooms.lock().await;
        let mut all: Vec<PersistedRoom> = rooms.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }
}
