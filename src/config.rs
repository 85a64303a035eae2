//! Configuration for the SKKServ client
//!
//! Centralized configuration with sensible defaults.

use crate::encoding::TextEncoding;
use crate::protocol::MAX_RESPONSE_SIZE;

/// Default SKKServ port
pub const DEFAULT_PORT: u16 = 1178;

/// Main client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Server host name or address
    pub host: String,

    /// Server TCP port
    pub port: u16,

    /// Upper bound on the whole connect attempt (milliseconds)
    pub connect_timeout_ms: u64,

    /// Read timeout once connected (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Write timeout once connected (milliseconds, 0 = none)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// Encoding the server answers in. EUC-JP is always tried as fallback.
    pub response_encoding: TextEncoding,

    /// Encoding lookup keys are sent in
    pub request_encoding: TextEncoding,

    /// Largest response the framer buffers before giving up
    pub max_response_size: usize,

    // -------------------------------------------------------------------------
    // Session Configuration
    // -------------------------------------------------------------------------
    /// How input lines map to requests
    pub input_policy: InputPolicy,
}

/// How the interactive session turns input lines into requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPolicy {
    /// `version`, `host` and `end` are control requests, anything else is a lookup
    ControlCommands,

    /// Every line is a lookup
    LookupOnly,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            connect_timeout_ms: 5000,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            response_encoding: TextEncoding::EucJp,
            request_encoding: TextEncoding::Utf8,
            max_response_size: MAX_RESPONSE_SIZE,
            input_policy: InputPolicy::ControlCommands,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// `host:port` string used for resolution and logging
    pub fn addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            // bare IPv6 literal
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the server host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the encoding the server answers in
    pub fn response_encoding(mut self, encoding: TextEncoding) -> Self {
        self.config.response_encoding = encoding;
        self
    }

    /// Set the encoding lookup keys are sent in
    pub fn request_encoding(mut self, encoding: TextEncoding) -> Self {
        self.config.request_encoding = encoding;
        self
    }

    /// Set the maximum buffered response size (in bytes)
    pub fn max_response_size(mut self, size: usize) -> Self {
        self.config.max_response_size = size;
        self
    }

    /// Set the input policy
    pub fn input_policy(mut self, policy: InputPolicy) -> Self {
        self.config.input_policy = policy;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
