//! Base64URL decoding per RFC 4648
//!
//! Thin wrapper around the `base64` crate that bounds the decoded size.
//! Errors are plain strings; callers decide which rejection they map to.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

/// Decode Base64URL string to bytes with maximum size limit
pub(crate) fn decode_bytes(input: &str, max_size: usize) -> Result<Vec<u8>, String> {
    // Reject before decoding when the encoded form alone is already too long
    if input.len() / 4 * 3 > max_size + 3 {
        return Err(format!(
            "encoded size {} exceeds limit of {max_size} decoded bytes",
            input.len()
        ));
    }

    let result = URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| format!("Base64URL decode failed: {e}"))?;

    if result.len() > max_size {
        return Err(format!(
            "decoded size exceeds limit: {} bytes (max: {max_size})",
            result.len()
        ));
    }

    Ok(result)
}

/// Decode Base64URL string to UTF-8 string with size limit
pub(crate) fn decode_string(input: &str, max_size: usize) -> Result<String, String> {
    decode_bytes(input, max_size)
        .and_then(|bytes| String::from_utf8(bytes).map_err(|e| format!("invalid UTF-8: {e}")))
}
