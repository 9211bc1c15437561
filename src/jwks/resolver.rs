//! Selecting a key from a key set and turning it into a verification key

use crate::algorithm::AlgorithmType;
use crate::error::{Error, Result};
use crate::jwks::KeySet;

/// A key ready for signature verification
///
/// Holds the DER-encoded SubjectPublicKeyInfo built from the JWK, bound to
/// the algorithm it was materialized for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    kid: String,
    algorithm: AlgorithmType,
    spki_der: Vec<u8>,
}

impl PublicKey {
    pub fn kid(&self) -> &str {
        &self.kid
    }

    pub fn algorithm(&self) -> AlgorithmType {
        self.algorithm
    }

    /// DER SubjectPublicKeyInfo bytes
    pub fn spki_der(&self) -> &[u8] {
        &self.spki_der
    }

    pub(crate) fn verify(&self, signing_input: &[u8], signature: &[u8]) -> Result<()> {
        self.algorithm
            .verify_signature(signing_input, signature, &self.spki_der)
    }
}

/// Finds the key a token names and materializes it
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyResolver {
    require_key_alg: bool,
}

impl KeyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject keys that do not declare an `alg`
    ///
    /// Cognito always publishes `alg`, so pools can turn this on to refuse
    /// keys whose intended algorithm is unknown.
    pub fn require_key_alg(mut self, require: bool) -> Self {
        self.require_key_alg = require;
        self
    }

    /// Resolve `kid` in `key_set` into a key usable with `algorithm`
    ///
    /// The first key with a matching `kid` is used; later duplicates are
    /// never consulted.
    pub fn resolve(&self, kid: &str, key_set: &KeySet, algorithm: AlgorithmType) -> Result<PublicKey> {
        let key = key_set.find(kid).ok_or_else(|| Error::KeyNotFound {
            kid: kid.to_string(),
        })?;

        let spki_der = key
            .to_spki(algorithm, self.require_key_alg)
            .map_err(|reason| Error::MaterializationError {
                kid: kid.to_string(),
                reason,
            })?;

        Ok(PublicKey {
            kid: kid.to_string(),
            algorithm,
            spki_der,
        })
    }
}
