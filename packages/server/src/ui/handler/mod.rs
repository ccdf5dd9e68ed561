//! HTTP and WebSocket handlers.

mod http;
mod websocket;

pub use http::{get_room_presence, health_check, list_presence};
pub use websocket::websocket_handler;
