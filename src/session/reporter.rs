//! Reporter
//!
//! Where the session sends what the user should see.

use std::io::{self, Stderr, Stdout, Write};

use crate::error::SkkError;

/// Output collaborator of a session
pub trait Reporter {
    /// A decoded server reply
    fn response(&mut self, text: &str);

    /// A per-line error the session recovered from
    fn error(&mut self, error: &SkkError);
}

/// Writes replies to one stream and errors to another
pub struct ConsoleReporter<O: Write, E: Write> {
    out: O,
    err: E,
}

impl ConsoleReporter<Stdout, Stderr> {
    /// Replies on stdout, errors on stderr
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> ConsoleReporter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> Reporter for ConsoleReporter<O, E> {
    fn response(&mut self, text: &str) {
        // a closed stdout is not worth aborting the session for
        let _ = writeln!(self.out, "{}", text);
        let _ = self.out.flush();
    }

    fn error(&mut self, error: &SkkError) {
        let _ = writeln!(self.err, "Error: {}", error);
    }
}
