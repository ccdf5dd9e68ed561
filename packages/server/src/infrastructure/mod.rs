//! Infrastructure layer
//!
//! ドメイン層の trait（RoomRepository / MessagePusher / IdentityResolver）の実装と、
//! ワイヤ形式（JSON）の DTO を提供します。

pub mod dto;
pub mod identity;
pub mod message_pusher;
pub mod repository;
