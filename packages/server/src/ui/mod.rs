//! Study-room presence server: HTTP / WebSocket surface.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
