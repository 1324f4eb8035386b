//! Audio payload envelope
//!
//! Payloads travel as base64 data URIs (`data:audio/mpeg;base64,...`), the
//! same form the track records embed inline. Anything else is refused before
//! it reaches the substrate.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

const DATA_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// Why a payload was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("payload is not valid UTF-8")]
    NotUtf8,
    #[error("payload is not a data URI")]
    NotDataUri,
    #[error("media type {0:?} is not audio")]
    NotAudio(String),
    #[error("data URI is not base64 encoded")]
    NotBase64Encoded,
    #[error("data URI carries no audio bytes")]
    EmptyBody,
    #[error("invalid base64 body: {0}")]
    InvalidBase64(String),
}

/// A validated data-URI payload borrowed from its encoded bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioPayload<'a> {
    raw: &'a str,
    mime: &'a str,
    body: &'a str,
}

impl<'a> AudioPayload<'a> {
    /// Check that `bytes` is a base64 `data:audio/...` URI
    pub fn parse(bytes: &'a [u8]) -> Result<Self, PayloadError> {
        let raw = std::str::from_utf8(bytes).map_err(|_| PayloadError::NotUtf8)?;
        let rest = raw.strip_prefix(DATA_SCHEME).ok_or(PayloadError::NotDataUri)?;
        let (header, body) = rest.split_once(',').ok_or(PayloadError::NotDataUri)?;

        let mime = header.split(';').next().unwrap_or_default();
        if !mime.to_ascii_lowercase().starts_with("audio/") || mime.len() <= "audio/".len() {
            return Err(PayloadError::NotAudio(mime.to_string()));
        }
        if !header.ends_with(BASE64_MARKER) {
            return Err(PayloadError::NotBase64Encoded);
        }
        if body.is_empty() {
            return Err(PayloadError::EmptyBody);
        }
        STANDARD
            .decode(body)
            .map_err(|e| PayloadError::InvalidBase64(e.to_string()))?;

        Ok(Self { raw, mime, body })
    }

    /// Media type, e.g. `audio/mpeg`
    pub fn mime(&self) -> &'a str {
        self.mime
    }

    /// Encoded size, the figure charged against the budget
    pub fn encoded_len(&self) -> u64 {
        self.raw.len() as u64
    }

    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Decode the audio bytes
    pub fn decode(&self) -> Result<Vec<u8>, PayloadError> {
        STANDARD
            .decode(self.body)
            .map_err(|e| PayloadError::InvalidBase64(e.to_string()))
    }
}

/// Wrap raw audio bytes into a data URI
pub fn encode_data_uri(mime: &str, audio: &[u8]) -> String {
    format!("{}{}{},{}", DATA_SCHEME, mime, BASE64_MARKER, STANDARD.encode(audio))
}

/// Whether a reference string looks like an inline data URI of any kind
pub fn is_data_uri(reference: &str) -> bool {
    reference.starts_with(DATA_SCHEME)
}
