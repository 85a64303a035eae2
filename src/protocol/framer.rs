//! Response framer
//!
//! Splits the byte stream coming back from the server into responses.
//! A single read may carry part of a response, exactly one, or several;
//! whatever follows the last terminator stays buffered for the next read.

use bytes::{Buf, BytesMut};

use crate::error::{Result, SkkError};

use super::Response;

/// Line feed, ends lookup replies
pub const LF: u8 = 0x0a;

/// Space, ends version and host replies
pub const SPACE: u8 = 0x20;

/// Default limit on a buffered, unterminated response (1 MiB)
pub const MAX_RESPONSE_SIZE: usize = 1024 * 1024;

/// How a response ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// `0x0A`
    LineFeed,

    /// A space as the last byte received so far, or a line feed.
    ///
    /// Version and host replies may contain spaces themselves; since only one
    /// request is outstanding, the reply is complete once the data stops on a
    /// space. A line feed sent right after that space is discarded.
    TrailingSpace,
}

/// Accumulates received bytes and cuts complete responses out of them
#[derive(Debug)]
pub struct ResponseFramer {
    /// Bytes received but not yet part of a returned response
    buffer: BytesMut,

    /// Prefix of `buffer` already searched without finding a line feed
    scanned: usize,

    /// Drop a line feed if it is the next byte to arrive
    skip_line_feed: bool,

    /// Largest unterminated response accepted
    max_size: usize,
}

impl Default for ResponseFramer {
    fn default() -> Self {
        Self::new(MAX_RESPONSE_SIZE)
    }
}

impl ResponseFramer {
    pub fn new(max_size: usize) -> Self {
        Self {
            buffer: BytesMut::new(),
            scanned: 0,
            skip_line_feed: false,
            max_size,
        }
    }

    /// Append received bytes and return every line-feed terminated response
    /// they complete, in stream order.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<Vec<Response>> {
        self.extend(bytes)?;

        let mut responses = Vec::new();
        while let Some(response) = self.next_response(Terminator::LineFeed) {
            responses.push(response);
        }
        Ok(responses)
    }

    /// Append received bytes without extracting anything.
    ///
    /// Fails, discarding the buffer, when the data still lacks a line feed
    /// after growing past the size limit.
    pub fn extend(&mut self, bytes: &[u8]) -> Result<()> {
        self.buffer.extend_from_slice(bytes);

        if self.buffer.len() > self.max_size && self.find_line_feed().is_none() {
            tracing::warn!(
                "Discarding {} buffered bytes without a terminator",
                self.buffer.len()
            );
            self.buffer.clear();
            self.scanned = 0;
            return Err(SkkError::FrameTooLarge {
                limit: self.max_size,
            });
        }
        Ok(())
    }

    /// Cut the next response ending in `terminator` off the buffer.
    pub fn next_response(&mut self, terminator: Terminator) -> Option<Response> {
        if self.skip_line_feed && !self.buffer.is_empty() {
            self.skip_line_feed = false;
            if self.buffer[0] == LF {
                self.consume(1);
            }
        }

        if let Some(index) = self.find_line_feed() {
            tracing::trace!("Found line feed at {}", index);
            let mut payload = self.take(index);
            self.consume(1);
            if terminator == Terminator::TrailingSpace && payload.last() == Some(&SPACE) {
                payload.truncate(payload.len() - 1);
            }
            return Some(Response::new(payload.freeze()));
        }

        if terminator == Terminator::TrailingSpace && self.buffer.last() == Some(&SPACE) {
            tracing::trace!("Reply ends with a space after {} bytes", self.buffer.len() - 1);
            let payload = self.take(self.buffer.len() - 1).freeze();
            self.consume(1);
            self.skip_line_feed = true;
            return Some(Response::new(payload));
        }

        None
    }

    /// Number of buffered bytes not yet returned
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Buffered bytes not yet returned
    pub fn leftover(&self) -> &[u8] {
        &self.buffer
    }

    /// Position of the first line feed, searching only bytes not seen before
    fn find_line_feed(&mut self) -> Option<usize> {
        match self.buffer[self.scanned..].iter().position(|b| *b == LF) {
            Some(offset) => {
                self.scanned += offset;
                Some(self.scanned)
            }
            None => {
                self.scanned = self.buffer.len();
                None
            }
        }
    }

    /// Split `n` bytes off the front of the buffer
    fn take(&mut self, n: usize) -> BytesMut {
        self.scanned = self.scanned.saturating_sub(n);
        self.buffer.split_to(n)
    }

    /// Drop `n` bytes from the front of the buffer
    fn consume(&mut self, n: usize) {
        self.buffer.advance(n);
        self.scanned = self.scanned.saturating_sub(n);
    }
}
