//! Packaging of raw signature bytes into header-safe text.

use crate::{Error, Result};
use base64::prelude::BASE64_STANDARD;
use base64::Engine;

/// Base64 encode signature bytes.
pub fn base64_encode(content: &[u8]) -> String {
    BASE64_STANDARD.encode(content)
}

/// Base64 decode a packaged signature.
pub fn base64_decode(content: &str) -> Result<Vec<u8>> {
    BASE64_STANDARD
        .decode(content)
        .map_err(|e| Error::encoding_failed("base64 decode failed").with_source(e))
}
