//! Utilities shared between Zemi packages.

pub mod logger;
pub mod time;
