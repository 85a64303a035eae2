//! Error types for the SKKServ client
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::network::{ConnectionEvent, ConnectionState, FailureReason};

/// Result type alias using SkkError
pub type Result<T> = std::result::Result<T, SkkError>;

/// Unified error type for SKKServ client operations
#[derive(Debug, Error)]
pub enum SkkError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("Failed to connect to {addr}: {reason}")]
    ConnectFailed { addr: String, reason: FailureReason },

    #[error("Connection closed by server")]
    ConnectionClosed,

    #[error("Connection closed with {pending} bytes of an unterminated response")]
    IncompleteFrame { pending: usize },

    #[error("Response exceeds {limit} bytes without a terminator")]
    FrameTooLarge { limit: usize },

    #[error("Invalid connection transition: {event:?} in state {from:?}")]
    InvalidTransition {
        from: ConnectionState,
        event: ConnectionEvent,
    },

    // -------------------------------------------------------------------------
    // Message Errors
    // -------------------------------------------------------------------------
    #[error("Malformed lookup key: {0}")]
    MalformedKey(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Failed to decode response: {}", hex(.raw))]
    Decode { raw: Vec<u8> },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SkkError {
    /// Whether the session can keep using the connection after this error.
    ///
    /// Encode/decode problems only affect one message; everything else
    /// leaves the connection unusable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SkkError::MalformedKey(_) | SkkError::Encode(_) | SkkError::Decode { .. }
        )
    }
}

fn hex(raw: &[u8]) -> String {
    raw.iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
