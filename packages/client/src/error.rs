//! Error types for the Kaiwa chat client.

use thiserror::Error;

use crate::domain::ValidationError;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// A form field failed validation before anything was sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Login rejected the email/password pair
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The stored token was rejected by the server
    #[error("Session expired, please log in again")]
    Unauthorized,

    /// No token is available for an operation that needs one
    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Name or email already taken (HTTP 409)
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Any other non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Request could not be sent or the response could not be read
    #[error("Network error: {0}")]
    Network(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Malformed socket frame
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Token storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// The line editor failed or input was cancelled
    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("No room is open, use /open <room> first")]
    NoActiveRoom,

    #[error("Only room admins can do that")]
    NotAdmin,

    #[error("Password is incorrect")]
    InvalidPassword,

    #[error("Room '{0}' not found")]
    RoomNotFound(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Protocol(e.to_string())
    }
}
