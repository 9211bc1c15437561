//! JSON Web Key Set (JWKS) module
//!
//! A [`KeySet`] is the parsed form of a provider's published
//! `.well-known/jwks.json` document. Key sets are immutable: the
//! [`KeySetCache`] swaps whole `Arc<KeySet>` values on refresh, so a reader
//! never sees keys from two different fetches.

pub(crate) mod cache;
pub(crate) mod jwk;
pub(crate) mod resolver;
pub(crate) mod source;

pub use cache::{DEFAULT_JWKS_TTL, KeySetCache};
pub use jwk::SigningKey;
pub use resolver::{KeyResolver, PublicKey};
pub use source::{DEFAULT_HTTP_TIMEOUT, FetchFuture, HttpKeySetSource, KeySetSource};

use crate::error::{Error, Result};
use crate::limits::{MAX_JWK_SET_SIZE, MAX_JWKS_RESPONSE_SIZE};
use miniserde::Deserialize;
use std::time::Instant;

/// Wire shape of a JWKS document
#[derive(Debug, Deserialize)]
struct JwkDocument {
    keys: Vec<SigningKey>,
}

/// Published signing keys of one provider, as returned by a single fetch
#[derive(Debug, Clone)]
pub struct KeySet {
    keys: Vec<SigningKey>,
    source: String,
    fetched_at: Instant,
    generation: u64,
}

impl KeySet {
    /// Parse a JWKS document body fetched from `source`
    pub(crate) fn from_json(body: &[u8], source: &str, generation: u64) -> Result<Self> {
        if body.len() > MAX_JWKS_RESPONSE_SIZE {
            return Err(Error::FetchError(format!(
                "jwks: response too large: {} bytes (maximum: {MAX_JWKS_RESPONSE_SIZE} bytes)",
                body.len()
            )));
        }

        let body = std::str::from_utf8(body)
            .map_err(|e| Error::FetchError(format!("jwks: utf8 decode failed: {e}")))?;

        let document: JwkDocument = miniserde::json::from_str(body)
            .map_err(|_| Error::FetchError("jwks: invalid jwks json".into()))?;

        if document.keys.len() > MAX_JWK_SET_SIZE {
            return Err(Error::FetchError(format!(
                "jwks: too many keys: {} (maximum: {MAX_JWK_SET_SIZE})",
                document.keys.len()
            )));
        }

        Ok(Self {
            keys: document.keys,
            source: source.to_string(),
            fetched_at: Instant::now(),
            generation,
        })
    }

    /// Keys in document order
    pub fn keys(&self) -> &[SigningKey] {
        &self.keys
    }

    /// First key whose `kid` equals `kid`
    pub fn find(&self, kid: &str) -> Option<&SigningKey> {
        self.keys.iter().find(|key| key.kid() == Some(kid))
    }

    /// URL the set was fetched from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// When the fetch completed
    pub fn fetched_at(&self) -> Instant {
        self.fetched_at
    }

    /// Fetch generation, strictly increasing per cache
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
