//! Data Transfer Objects (DTOs) for the presence server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket frame DTOs
//! - `http`: HTTP API response DTOs
//! - `record`: room documents read from the seed file

pub mod conversion;
pub mod http;
pub mod record;
pub mod websocket;
