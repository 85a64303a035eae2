//! Protocol codec
//!
//! Encoding of requests and stream helpers for both directions.
//!
//! ## Wire Format
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────────────────┬──────────┬──────────┐
//! │ Tag (1)  │  Key (Lookup only)   │ ' ' (1)  │ LF (1)   │
//! └──────────┴──────────────────────┴──────────┴──────────┘
//! ```
//!
//! ### Response Format
//! ```text
//! ┌────────────────────────────────┬──────────────────┐
//! │           Payload              │ LF (or ' ')      │
//! └────────────────────────────────┴──────────────────┘
//! ```

use std::io::{ErrorKind, Read, Write};

use crate::error::{Result, SkkError};

use super::framer::{Terminator, LF, SPACE};
use super::{Request, ResponseFramer, Response};

/// Size of a single read from the stream
pub const READ_CHUNK_SIZE: usize = 4096;

// =============================================================================
// Request Encoding
// =============================================================================

/// Encode a request to bytes
///
/// Format: tag (1) + key (lookup only) + space + LF
pub fn encode_request(request: &Request) -> Vec<u8> {
    let tag = request.request_type() as u8;

    match request {
        Request::Lookup { key } => {
            let mut message = Vec::with_capacity(key.len() + 3);
            message.push(tag);
            message.extend_from_slice(key);
            message.extend_from_slice(&[SPACE, LF]);
            message
        }
        Request::End | Request::Version | Request::Host => vec![tag, SPACE, LF],
    }
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Write a request to a stream as a single write, then flush
pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> Result<()> {
    let bytes = encode_request(request);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read one complete response from a stream
///
/// Blocks until `framer` holds a full response ending in `terminator`.
/// Bytes past that response stay in `framer`.
pub fn read_response<R: Read>(
    reader: &mut R,
    framer: &mut ResponseFramer,
    terminator: Terminator,
) -> Result<Response> {
    let mut chunk = [0u8; READ_CHUNK_SIZE];

    loop {
        if let Some(response) = framer.next_response(terminator) {
            return Ok(response);
        }

        let n = match reader.read(&mut chunk) {
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        if n == 0 {
            return match framer.pending() {
                0 => Err(SkkError::ConnectionClosed),
                pending => Err(SkkError::IncompleteFrame { pending }),
            };
        }
        tracing::trace!("Read {} bytes", n);
        framer.extend(&chunk[..n])?;
    }
}
