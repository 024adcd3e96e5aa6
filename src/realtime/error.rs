//! Real-time channel error types.

use thiserror::Error;

/// Errors raised by the match subscription.
#[derive(Debug, Error)]
pub enum RealtimeError {
    /// The configured URL cannot be used for a Socket.IO connection.
    #[error("Invalid realtime URL: {0}")]
    InvalidUrl(String),

    /// The Socket.IO client failed to connect or lost the connection.
    #[error("Socket.IO error: {0}")]
    Client(#[from] rust_socketio::Error),

    /// No connection within the connect timeout.
    #[error("Timed out connecting to the realtime server")]
    ConnectTimeout,
}

/// Result type for realtime operations.
pub type Result<T> = std::result::Result<T, RealtimeError>;

impl RealtimeError {
    /// Whether reconnecting could help.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, RealtimeError::InvalidUrl(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_url_is_not_retryable() {
        assert!(!RealtimeError::InvalidUrl("x".to_string()).is_retryable());
        assert!(RealtimeError::ConnectTimeout.is_retryable());
    }
}
