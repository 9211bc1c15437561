//! URL validation utilities
//!
//! The JWKS URL is derived from configuration, never from a token, but it is
//! still bounded and checked before any request is made.

use crate::error::{Error, Result};
use crate::limits::MAX_URL_LENGTH;

fn validate_url_common(url: &str, name: &str) -> Result<url::Url> {
    if url.trim().is_empty() {
        return Err(Error::ConfigurationInvalid(format!("{name} cannot be empty")));
    }

    if url.len() > MAX_URL_LENGTH {
        return Err(Error::ConfigurationInvalid(format!(
            "{name} too long: {} characters (maximum: {MAX_URL_LENGTH})",
            url.len()
        )));
    }

    let parsed = url
        .parse::<url::Url>()
        .map_err(|e| Error::ConfigurationInvalid(format!("invalid {name}: {e}")))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(Error::ConfigurationInvalid(format!(
            "{name} must use http or https scheme"
        )));
    }

    if parsed.host_str().is_none() {
        return Err(Error::ConfigurationInvalid(format!(
            "{name} must have a valid host"
        )));
    }

    Ok(parsed)
}

/// Validate issuer URL format and size
pub(crate) fn validate_issuer_url(issuer: &str) -> Result<()> {
    validate_url_common(issuer, "issuer URL")?;

    // The `iss` claim never carries a trailing slash
    if issuer.ends_with('/') {
        return Err(Error::ConfigurationInvalid(
            "issuer URL must not end with trailing slash".into(),
        ));
    }

    Ok(())
}

/// Validate JWKS URL format and size
pub(crate) fn validate_jwks_url(url: &str) -> Result<()> {
    validate_url_common(url, "JWKS URL")?;
    Ok(())
}
