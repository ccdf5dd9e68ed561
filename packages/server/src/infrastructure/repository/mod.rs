//! Repository implementations.
//!
//! - `inmemory`: HashMap を使ったインメモリ実装（シードファイルから初期化可能）

pub mod inmemory;

pub use inmemory::{InMemoryRoomRepository, SeedError};
