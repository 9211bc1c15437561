//! Structural decoding of a compact JWS token

use crate::claims::ClaimSet;
use crate::error::{Error, Result};
use crate::limits::{
    MAX_DECODED_HEADER_SIZE, MAX_DECODED_PAYLOAD_SIZE, MAX_DECODED_SIGNATURE_SIZE, MAX_KID_LENGTH,
    MAX_TOKEN_LENGTH,
};
use crate::utils::base64url;
use miniserde::Deserialize;

/// JOSE header of a token
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct TokenHeader {
    /// Algorithm used for signing
    pub alg: String,

    /// Key ID (for JWKS key selection)
    pub kid: Option<String>,

    /// Token type (typically "JWT")
    pub typ: Option<String>,
}

/// A token split and decoded, not yet trusted
///
/// Nothing in here has been verified. The claims may be read for
/// validity-window checks but must not be handed out before the signature
/// has been checked.
#[derive(Debug, Clone)]
pub(crate) struct DecodedToken {
    pub(crate) header: TokenHeader,
    pub(crate) claims: ClaimSet,
    /// `header.payload` exactly as received
    pub(crate) signing_input: String,
    pub(crate) signature: Vec<u8>,
}

impl DecodedToken {
    pub(crate) fn parse(token: &str) -> Result<Self> {
        if token.len() > MAX_TOKEN_LENGTH {
            return Err(Error::MalformedToken(format!(
                "token too long: {} bytes (maximum: {MAX_TOKEN_LENGTH} bytes)",
                token.len()
            )));
        }

        let mut segments = token.split('.');
        let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(Error::MalformedToken(
                "expected three dot-separated segments".into(),
            ));
        };

        // An empty signature is structurally fine; it can never verify
        if header_b64.is_empty() || payload_b64.is_empty() {
            return Err(Error::MalformedToken("empty token segment".into()));
        }

        let header_json = base64url::decode_string(header_b64, MAX_DECODED_HEADER_SIZE)
            .map_err(|e| Error::MalformedToken(format!("header: {e}")))?;
        let header: TokenHeader = miniserde::json::from_str(&header_json)
            .map_err(|_| Error::MalformedToken("header is not a valid JOSE header".into()))?;

        if let Some(kid) = &header.kid {
            if kid.len() > MAX_KID_LENGTH {
                return Err(Error::MalformedToken(format!(
                    "kid too long: {} bytes (maximum: {MAX_KID_LENGTH} bytes)",
                    kid.len()
                )));
            }
        }

        let payload_json = base64url::decode_string(payload_b64, MAX_DECODED_PAYLOAD_SIZE)
            .map_err(|e| Error::MalformedToken(format!("payload: {e}")))?;
        let claims = ClaimSet::from_json(&payload_json)?;

        let signature = base64url::decode_bytes(signature_b64, MAX_DECODED_SIGNATURE_SIZE)
            .map_err(|e| Error::MalformedToken(format!("signature: {e}")))?;

        Ok(Self {
            header,
            claims,
            signing_input: format!("{header_b64}.{payload_b64}"),
            signature,
        })
    }
}
