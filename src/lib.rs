//! # skkserv
//!
//! A client for SKKServ, the line-oriented TCP protocol spoken by Japanese
//! input-method dictionary servers:
//! - Request encoding for lookup, version, host and end requests
//! - Streaming response framing over fragmented reads
//! - Bounded, cancellable connect driven by an explicit state machine
//! - Interactive session with EUC-JP fallback decoding
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Input lines                              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Session                                 │
//! │          (one outstanding request at a time)                 │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │ encode                           │ decode
//!            ▼                                  ▲
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │  Request codec  │                │ Response framer │
//!   └────────┬────────┘                └────────▲────────┘
//!            │                                  │
//!            ▼                                  │
//!   ┌─────────────────────────────────────────────────────┐
//!   │       Connection (established by Connector)         │
//!   └─────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod encoding;
pub mod protocol;
pub mod network;
pub mod session;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{SkkError, Result};
pub use config::{ClientConfig, InputPolicy};
pub use encoding::TextEncoding;
pub use session::Session;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
