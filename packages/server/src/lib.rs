//! Zemi study-room presence server.
//!
//! Tracks which users are present in which study room across their open
//! WebSocket connections, relays chat messages and files to the room, and
//! lets room owners kick participants or end the meeting.

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
