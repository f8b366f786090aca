//! Transport encoding of file contents.
//!
//! Reads arrive base64-encoded (with embedded line breaks) and must decode to
//! valid UTF-8; invalid sequences are an error, never replaced. Writes send
//! raw text tagged as `utf-8`, so they need no encoding step.

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::error::SyncError;

/// Encoding tag sent with raw-text blob uploads.
pub const UTF8_ENCODING: &str = "utf-8";

/// Encoding tag of base64 payloads.
pub const BASE64_ENCODING: &str = "base64";

/// Decode a base64 payload into text. `path` is only used in diagnostics.
pub fn decode_content(payload: &str, path: &str) -> Result<String, SyncError> {
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| SyncError::malformed(path, format!("invalid base64: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| SyncError::malformed(path, format!("invalid UTF-8: {}", e.utf8_error())))
}

/// Encode text as base64, the inverse of [`decode_content`].
pub fn encode_content(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}
