//! InMemory implementations of the domain repositories.

mod room;

pub use room::{InMemoryRoomRepository, SeedError};
