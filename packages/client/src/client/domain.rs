//! Reconnect policy for the chat session.
//!
//! Pure functions so the runner's decisions can be tested without a socket.

use crate::error::ClientError;

/// Check if the client should stop immediately instead of reconnecting.
///
/// A rejected token cannot be fixed by retrying; the user has to log in again.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::Unauthorized | ClientError::NotAuthenticated
    )
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The error that ended the session
/// * `current_attempt` - Reconnection attempts made so far
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}
