//! Error types for the RCON client
//!
//! Provides a unified error type for all operations.

use std::io;

use thiserror::Error;

/// Result type alias using RconError
pub type Result<T> = std::result::Result<T, RconError>;

/// Unified error type for RCON operations
#[derive(Debug, Error)]
pub enum RconError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    /// TCP connect failure, or the socket was closed/reset mid-operation
    #[error("Connection error: {0}")]
    Connection(String),

    /// Connect or read exceeded its configured bound
    #[error("Timed out: {0}")]
    Timeout(String),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    /// The server rejected the password
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Malformed frame on the wire
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Caller Errors
    // -------------------------------------------------------------------------
    /// Operation attempted in the wrong lifecycle state
    #[error("Invalid state: {0}")]
    State(String),

    /// Payload text that cannot be framed (embedded NUL)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RconError {
    /// Classify an I/O error, prefixing the message with `context`
    pub fn from_io(err: io::Error, context: &str) -> Self {
        match err.kind() {
            // Unix reports an expired SO_RCVTIMEO as WouldBlock
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => {
                RconError::Timeout(format!("{}: {}", context, err))
            }
            _ => RconError::Connection(format!("{}: {}", context, err)),
        }
    }

    /// True for errors after which the connection can no longer be used
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RconError::Connection(_)
                | RconError::Timeout(_)
                | RconError::Authentication(_)
                | RconError::Protocol(_)
        )
    }
}

impl From<io::Error> for RconError {
    fn from(err: io::Error) -> Self {
        RconError::from_io(err, "socket I/O failed")
    }
}
