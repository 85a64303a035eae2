//! Request definitions
//!
//! Represents requests sent to the server.

use crate::error::{Result, SkkError};

use super::framer::Terminator;

/// Request tags as they appear on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RequestType {
    End = b'0',
    Lookup = b'1',
    Version = b'2',
    Host = b'3',
}

/// A request to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Ask the server to close the session
    End,

    /// Look up the candidates of an encoded headword
    Lookup { key: Vec<u8> },

    /// Query the server version string
    Version,

    /// Query the server host name and addresses
    Host,
}

impl Request {
    /// Build a lookup request, rejecting keys that would break framing.
    pub fn lookup(key: impl Into<Vec<u8>>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(SkkError::MalformedKey("empty key".to_string()));
        }
        if let Some(b) = key.iter().find(|b| **b == b' ' || **b == b'\n') {
            return Err(SkkError::MalformedKey(format!(
                "key contains 0x{:02x}: {:?}",
                b,
                String::from_utf8_lossy(&key)
            )));
        }
        Ok(Request::Lookup { key })
    }

    /// Get the request type
    pub fn request_type(&self) -> RequestType {
        match self {
            Request::End => RequestType::End,
            Request::Lookup { .. } => RequestType::Lookup,
            Request::Version => RequestType::Version,
            Request::Host => RequestType::Host,
        }
    }

    /// How the server terminates its reply, or `None` when it sends none
    pub fn reply_terminator(&self) -> Option<Terminator> {
        match self {
            Request::End => None,
            Request::Lookup { .. } => Some(Terminator::LineFeed),
            Request::Version | Request::Host => Some(Terminator::TrailingSpace),
        }
    }
}
