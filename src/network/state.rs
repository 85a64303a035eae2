//! Connection state machine
//!
//! Tracks one connection attempt from the first transport notification to a
//! single terminal outcome.
//!
//! ```text
//!  Setup ──begin──▶ Preparing ──usable──▶ Ready
//!                      │  ▲
//!          still waiting  │ still waiting
//!                      ▼  │
//!                    Waiting ──usable──▶ Ready
//!
//!  any non-terminal ──error──▶ Failed
//!  any non-terminal ──cancel─▶ Cancelled
//! ```

use std::fmt;
use std::io;

use crate::error::{Result, SkkError};

/// Why a connection attempt failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The remote end refused the connection
    Refused,

    /// The connect deadline passed
    TimedOut,

    /// The host name did not resolve to any address
    Resolve(String),

    /// Any other transport failure
    Transport(String),
}

impl From<&io::Error> for FailureReason {
    fn from(e: &io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::ConnectionRefused => FailureReason::Refused,
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => FailureReason::TimedOut,
            _ => FailureReason::Transport(e.to_string()),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Refused => write!(f, "connection refused"),
            FailureReason::TimedOut => write!(f, "timed out"),
            FailureReason::Resolve(msg) => write!(f, "cannot resolve address: {}", msg),
            FailureReason::Transport(msg) => write!(f, "{}", msg),
        }
    }
}

/// Lifecycle states of a connection attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Attempt created, nothing happened yet
    Setup,

    /// Transport is negotiating
    Preparing,

    /// Transport cannot proceed yet (e.g. an address was unreachable)
    Waiting(String),

    /// Connection is usable (terminal)
    Ready,

    /// Connection is unusable (terminal)
    Failed(FailureReason),

    /// Caller gave up before completion (terminal)
    Cancelled,
}

impl ConnectionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConnectionState::Ready | ConnectionState::Failed(_) | ConnectionState::Cancelled
        )
    }
}

/// Notifications that drive the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    BeginNegotiation,
    StillWaiting(String),
    Usable,
    Error(FailureReason),
    Cancel,
}

/// State machine for a single connection attempt
#[derive(Debug)]
pub struct ConnectionStateMachine {
    state: ConnectionState,
}

impl Default for ConnectionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionStateMachine {
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Setup,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Apply an event and return the new state.
    ///
    /// Transitions outside the table, including any event after a terminal
    /// state, fail with `InvalidTransition` and leave the state untouched.
    pub fn apply(&mut self, event: ConnectionEvent) -> Result<&ConnectionState> {
        use ConnectionEvent as E;
        use ConnectionState as S;

        let next = match (&self.state, event) {
            (S::Setup, E::BeginNegotiation) => S::Preparing,
            (S::Preparing | S::Waiting(_), E::StillWaiting(reason)) => S::Waiting(reason),
            (S::Preparing | S::Waiting(_), E::Usable) => S::Ready,
            (from, E::Error(reason)) if !from.is_terminal() => S::Failed(reason),
            (from, E::Cancel) if !from.is_terminal() => S::Cancelled,
            (from, event) => {
                return Err(SkkError::InvalidTransition {
                    from: from.clone(),
                    event,
                })
            }
        };

        tracing::debug!("Connection state {:?} -> {:?}", self.state, next);
        self.state = next;
        Ok(&self.state)
    }
}
