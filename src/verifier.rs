//! Token verification against a cached key set

use crate::algorithm::{AlgorithmPolicy, AlgorithmType};
use crate::claims::{ClaimSet, TemporalValidation, unix_now};
use crate::error::{Error, Result};
use crate::jwks::{KeyResolver, KeySetCache, PublicKey};
use crate::token::DecodedToken;
use tracing::{debug, warn};

/// Verifies token signatures and validity windows
///
/// A verifier holds no key material; keys come from the [`KeySetCache`]
/// passed to each call. Audience and issuer are left to
/// [`ClaimPolicy`](crate::ClaimPolicy).
///
/// Checks run in this order, and the first failure is returned:
///
/// 1. structure (three base64url segments, JSON header, JSON object payload)
/// 2. `alg` against the algorithm policy
/// 3. `exp`, `nbf` and `iat` against the current time
/// 4. presence of `kid`
/// 5. key lookup, refreshing the key set once when `kid` is unknown or the
///    first fetch fails
/// 6. signature over `header.payload`
///
/// The validity window is checked before any key is fetched, so an expired
/// token is rejected as expired whatever its signature.
#[derive(Debug, Clone, Default)]
pub struct TokenVerifier {
    algorithms: AlgorithmPolicy,
    temporal: TemporalValidation,
    resolver: KeyResolver,
}

impl TokenVerifier {
    /// RS256 only, no clock skew
    pub fn new() -> Self {
        Self::default()
    }

    pub fn algorithms(mut self, policy: AlgorithmPolicy) -> Self {
        self.algorithms = policy;
        self
    }

    pub fn temporal(mut self, temporal: TemporalValidation) -> Self {
        self.temporal = temporal;
        self
    }

    pub fn resolver(mut self, resolver: KeyResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Verify `token` at the current time
    pub async fn verify(&self, token: &str, cache: &KeySetCache) -> Result<ClaimSet> {
        self.verify_at(token, cache, unix_now()).await
    }

    /// Verify `token` as of `now` (Unix seconds)
    pub async fn verify_at(&self, token: &str, cache: &KeySetCache, now: i64) -> Result<ClaimSet> {
        let decoded = DecodedToken::parse(token)?;

        let algorithm = AlgorithmType::parse(&decoded.header.alg)?;
        self.algorithms.validate(algorithm)?;

        self.temporal.check(&decoded.claims, now)?;

        let kid = decoded.header.kid.as_deref().ok_or(Error::MissingKeyId)?;
        let key = self.resolve_key(kid, algorithm, cache).await?;

        key.verify(decoded.signing_input.as_bytes(), &decoded.signature)?;

        debug!(kid, alg = %algorithm, "token signature verified");
        Ok(decoded.claims)
    }

    /// Resolve `kid`, refreshing the key set exactly once if it is unknown
    async fn resolve_key(
        &self,
        kid: &str,
        algorithm: AlgorithmType,
        cache: &KeySetCache,
    ) -> Result<PublicKey> {
        let key_set = match cache.get().await {
            Ok(key_set) => key_set,
            Err(e) if e.is_fetch_failure() => {
                warn!(error = %e, "key set fetch failed, retrying once");
                // Generation 0 is never assigned; a set cached meanwhile is reused
                cache.refresh(0).await?
            }
            Err(e) => return Err(e),
        };

        match self.resolver.resolve(kid, &key_set, algorithm) {
            Err(Error::KeyNotFound { .. }) => {
                warn!(
                    kid,
                    generation = key_set.generation(),
                    "kid not in cached key set, refreshing"
                );
                let refreshed = cache.refresh(key_set.generation()).await?;
                self.resolver.resolve(kid, &refreshed, algorithm)
            }
            other => other,
        }
    }
}
