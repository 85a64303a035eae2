//! Protocol Module
//!
//! The SKKServ wire protocol.
//!
//! ## Request Format
//! ```text
//! ┌──────────┬──────────────────────┬──────────┬──────────┐
//! │ Tag (1)  │  Key (Lookup only)   │ ' ' (1)  │ LF (1)   │
//! └──────────┴──────────────────────┴──────────┴──────────┘
//! ```
//!
//! ### Tags
//! - '0': END     - close the session, no reply
//! - '1': LOOKUP  - key is the encoded headword
//! - '2': VERSION - server version string
//! - '3': HOST    - server host name and addresses
//!
//! ## Responses
//! Lookup replies end with LF (`1/cand1/cand2/` found, `4key` not found).
//! Version and host replies end with a single space.

mod request;
mod response;
mod framer;
mod codec;

pub use request::{Request, RequestType};
pub use response::Response;
pub use framer::{ResponseFramer, Terminator, MAX_RESPONSE_SIZE};
pub use codec::{encode_request, write_request, read_response};
