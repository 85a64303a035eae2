//! Text encodings
//!
//! SKKServ dictionaries are served either in EUC-JP or UTF-8. Servers answer
//! "not found" lookups in EUC-JP no matter how they are configured, so every
//! decode falls back to EUC-JP.

use encoding_rs::{Encoding, EUC_JP, UTF_8};

use crate::error::{Result, SkkError};

/// Encodings understood by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    EucJp,
    Utf8,
}

impl TextEncoding {
    fn codec(self) -> &'static Encoding {
        match self {
            TextEncoding::EucJp => EUC_JP,
            TextEncoding::Utf8 => UTF_8,
        }
    }

    /// Human readable label
    pub fn name(self) -> &'static str {
        self.codec().name()
    }

    /// Strict decode: malformed input yields `None` instead of replacement characters
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        self.codec()
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
    }

    /// Strict encode: characters the encoding cannot represent are an error
    pub fn encode(self, text: &str) -> Result<Vec<u8>> {
        let (bytes, _, unmappable) = self.codec().encode(text);
        if unmappable {
            return Err(SkkError::Encode(format!(
                "{:?} cannot be represented in {}",
                text,
                self.name()
            )));
        }
        Ok(bytes.into_owned())
    }
}

/// Decode a response, trying `preferred` first and EUC-JP second.
///
/// Fails with the raw bytes when neither encoding accepts them.
pub fn decode_response(bytes: &[u8], preferred: TextEncoding) -> Result<String> {
    if let Some(text) = preferred.decode(bytes) {
        return Ok(text);
    }

    if preferred != TextEncoding::EucJp {
        if let Some(text) = TextEncoding::EucJp.decode(bytes) {
            tracing::debug!(
                "Response is not valid {}, decoded as EUC-JP instead",
                preferred.name()
            );
            return Ok(text);
        }
    }

    Err(SkkError::Decode {
        raw: bytes.to_vec(),
    })
}
