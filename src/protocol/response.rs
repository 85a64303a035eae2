//! Response definitions
//!
//! Represents replies from the server.

use bytes::Bytes;

/// One server reply with its terminator stripped.
///
/// The bytes are left undecoded; see [`crate::encoding::decode_response`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    payload: Bytes,
}

impl Response {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.payload
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

impl AsRef<[u8]> for Response {
    fn as_ref(&self) -> &[u8] {
        &self.payload
    }
}
