//! Domain layer errors.

use thiserror::Error;

/// Value object / inbound payload validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was absent from the payload
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// A field was present but blank
    #[error("field '{0}' must not be blank")]
    Blank(&'static str),

    /// A field exceeded its maximum length
    #[error("field '{field}' exceeds {max} characters (got {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    /// A field had a value outside the accepted set or range
    #[error("field '{field}' has an invalid value: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// The payload identity disagrees with the identity bound to the connection
    #[error("payload identity '{claimed}' does not match connection identity '{resolved}'")]
    IdentityMismatch { claimed: String, resolved: String },
}

/// Room store error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The backing store could not be reached or refused the operation
    #[error("room store unavailable: {0}")]
    Unavailable(String),

    /// The stored document could not be mapped onto a room
    #[error("corrupted room record '{name}': {reason}")]
    Corrupted { name: String, reason: String },
}

/// Outbound delivery error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// No channel registered for the connection
    #[error("connection '{0}' not found")]
    ConnectionNotFound(String),

    /// The connection's channel is closed
    #[error("failed to push message: {0}")]
    PushFailed(String),

    /// The event could not be encoded for the wire
    #[error("failed to encode event: {0}")]
    Encode(String),
}

/// Identity resolution error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// No credential supplied while one is required
    #[error("an identity is required to connect")]
    Missing,

    /// Credential supplied but unusable
    #[error("invalid identity: {0}")]
    Invalid(#[from] ValidationError),
}
