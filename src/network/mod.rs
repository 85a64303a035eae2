//! Network Module
//!
//! TCP connection handling.
//!
//! ## Architecture
//! - `Connector` runs one connect attempt through the state machine
//! - Connect worker thread reports progress over a channel
//! - `Connection` is the stream the session reads and writes

mod state;
mod connection;
mod connector;

pub use state::{ConnectionEvent, ConnectionState, ConnectionStateMachine, FailureReason};
pub use connection::Connection;
pub use connector::{
    cancellation, CancelHandle, CancelToken, ConnectFn, ConnectOutcome, Connector,
};
