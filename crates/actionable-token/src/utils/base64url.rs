//! Base64URL decoding (RFC 4648 §5, unpadded) with decoded-size limits

use crate::error::{Error, Result};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

/// Decode one Base64URL segment, rejecting output larger than `max_size`
///
/// `segment` names the input in error messages ("header", "signature", "n", ...).
pub(crate) fn decode_bytes(segment: &str, input: &str, max_size: usize) -> Result<Vec<u8>> {
    // Base64 expands 3 bytes into 4 characters; reject before allocating.
    if input.len() / 4 * 3 > max_size.saturating_add(3) {
        return Err(Error::FormatInvalidBase64(format!(
            "{segment}: encoded length {} exceeds limit of {max_size} decoded bytes",
            input.len()
        )));
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| Error::FormatInvalidBase64(format!("{segment}: {e}")))?;

    if bytes.len() > max_size {
        return Err(Error::FormatInvalidBase64(format!(
            "{segment}: decoded size {} exceeds limit of {max_size} bytes",
            bytes.len()
        )));
    }

    Ok(bytes)
}

/// Decode one Base64URL segment into UTF-8 text
pub(crate) fn decode_string(segment: &str, input: &str, max_size: usize) -> Result<String> {
    let bytes = decode_bytes(segment, input, max_size)?;
    String::from_utf8(bytes)
        .map_err(|e| Error::FormatInvalidBase64(format!("{segment}: invalid UTF-8: {e}")))
}
