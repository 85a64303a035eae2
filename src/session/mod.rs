//! Session Module
//!
//! Drives the request/response loop over one connection.
//!
//! ## Responsibilities
//! - Turn input lines into requests according to the input policy
//! - Send one request and wait for its reply before reading the next line
//! - Decode replies and hand them to the reporter
//! - Recover from per-line errors, stop on connection errors

mod reporter;

pub use reporter::{ConsoleReporter, Reporter};

use std::io::{BufRead, Read, Write};

use crate::config::{ClientConfig, InputPolicy};
use crate::encoding::{decode_response, TextEncoding};
use crate::error::{Result, SkkError};
use crate::protocol::{read_response, write_request, Request, Response, ResponseFramer};

/// Counters returned when a session ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Requests written to the server
    pub requests: usize,

    /// Replies received
    pub responses: usize,

    /// Per-line errors reported and skipped
    pub errors: usize,
}

/// Interactive session over a connected stream
///
/// ## Ordering
/// Exactly one request is outstanding at a time: a line is only read after
/// the reply to the previous request arrived, so replies always belong to the
/// request sent right before them.
pub struct Session<S: Read + Write, R: Reporter> {
    /// Connected stream
    stream: S,

    /// Bytes received but not yet returned as a reply
    framer: ResponseFramer,

    /// Output collaborator
    reporter: R,

    input_policy: InputPolicy,
    request_encoding: TextEncoding,
    response_encoding: TextEncoding,

    stats: SessionStats,
}

impl<S: Read + Write, R: Reporter> Session<S, R> {
    pub fn new(stream: S, reporter: R, config: &ClientConfig) -> Self {
        Self {
            stream,
            framer: ResponseFramer::new(config.max_response_size),
            reporter,
            input_policy: config.input_policy,
            request_encoding: config.request_encoding,
            response_encoding: config.response_encoding,
            stats: SessionStats::default(),
        }
    }

    /// Run until end of input, an `end` request, or a connection error.
    pub fn run<I: BufRead>(&mut self, mut input: I) -> Result<SessionStats> {
        let mut line = Vec::new();

        loop {
            line.clear();
            if input.read_until(b'\n', &mut line)? == 0 {
                tracing::debug!("End of input");
                break;
            }

            let request = match self.parse_line(&line) {
                Ok(Some(request)) => request,
                Ok(None) => continue,
                Err(e) => {
                    self.recover(e)?;
                    continue;
                }
            };

            match self.exchange(&request)? {
                Some(response) => match decode_response(response.as_bytes(), self.response_encoding) {
                    Ok(text) => self.reporter.response(&text),
                    Err(e) => self.recover(e)?,
                },
                None => {
                    tracing::info!("Session closed by end request");
                    break;
                }
            }
        }

        Ok(self.stats)
    }

    /// Map one raw input line to a request.
    ///
    /// Returns `None` for blank lines.
    pub fn parse_line(&self, line: &[u8]) -> Result<Option<Request>> {
        let line = line.strip_suffix(b"\n").unwrap_or(line);
        let line = line.strip_suffix(b"\r").unwrap_or(line);

        let text = std::str::from_utf8(line)
            .map_err(|e| SkkError::Encode(format!("input is not valid UTF-8: {}", e)))?;
        if text.is_empty() {
            return Ok(None);
        }

        if self.input_policy == InputPolicy::ControlCommands {
            match text {
                "version" => return Ok(Some(Request::Version)),
                "host" => return Ok(Some(Request::Host)),
                "end" => return Ok(Some(Request::End)),
                _ => {}
            }
        }

        let key = self.request_encoding.encode(text)?;
        Request::lookup(key).map(Some)
    }

    /// Send a request and wait for its reply.
    ///
    /// `End` has no reply and yields `None`.
    pub fn exchange(&mut self, request: &Request) -> Result<Option<Response>> {
        tracing::debug!("Send {:?}", request);
        write_request(&mut self.stream, request)?;
        self.stats.requests += 1;

        let Some(terminator) = request.reply_terminator() else {
            return Ok(None);
        };

        tracing::debug!("Receiving");
        let response = read_response(&mut self.stream, &mut self.framer, terminator)?;
        tracing::debug!("Received {} bytes", response.len());
        self.stats.responses += 1;
        Ok(Some(response))
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Give back the stream and reporter
    pub fn into_parts(self) -> (S, R) {
        (self.stream, self.reporter)
    }

    /// Report a recoverable error, hand back anything else.
    fn recover(&mut self, error: SkkError) -> Result<()> {
        if !error.is_recoverable() {
            return Err(error);
        }
        tracing::warn!("{}", error);
        self.stats.errors += 1;
        self.reporter.error(&error);
        Ok(())
    }
}
