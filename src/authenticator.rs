//! Request-boundary authentication
//!
//! [`Authenticator`] bundles everything needed to accept or refuse a request:
//! the key set cache, the verifier, the claim policy and the expected
//! audience. Its [`authorize`](Authenticator::authorize) method is the only
//! place where detailed rejection reasons are reduced to [`Unauthorized`].

use crate::algorithm::AlgorithmPolicy;
use crate::claims::{ClaimPolicy, ClaimSet, TemporalValidation};
use crate::config::VerifierConfig;
use crate::error::{Error, Result};
use crate::jwks::{KeyResolver, KeySetCache};
use crate::verifier::TokenVerifier;
use std::sync::Arc;
use tracing::{debug, warn};

/// Rejection returned to callers outside the trust boundary
///
/// Carries no detail; the reason is logged where it is produced.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Unauthorized")]
pub struct Unauthorized;

/// Token from an `Authorization` header value
///
/// The scheme is matched case-insensitively and must be followed by a
/// single space and a non-empty token.
pub fn bearer_token(header: &str) -> Result<&str> {
    const SCHEME: &str = "Bearer ";

    let token = header
        .get(..SCHEME.len())
        .filter(|scheme| scheme.eq_ignore_ascii_case(SCHEME))
        .and_then(|_| header.get(SCHEME.len()..))
        .ok_or_else(|| Error::MalformedToken("authorization header is not a bearer token".into()))?
        .trim();

    if token.is_empty() {
        return Err(Error::MalformedToken(
            "authorization header carries an empty token".into(),
        ));
    }

    Ok(token)
}

/// Authenticates bearer tokens for one app client of one user pool
#[derive(Debug, Clone)]
pub struct Authenticator {
    cache: Arc<KeySetCache>,
    verifier: TokenVerifier,
    policy: ClaimPolicy,
    audience: String,
}

impl Authenticator {
    pub fn new(
        cache: Arc<KeySetCache>,
        verifier: TokenVerifier,
        policy: ClaimPolicy,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            verifier,
            policy,
            audience: audience.into(),
        }
    }

    /// Build from configuration, fetching keys over HTTP
    pub fn from_config(config: &VerifierConfig) -> Result<Self> {
        config.validate()?;

        let pool = config.user_pool();
        let cache = KeySetCache::for_user_pool(&pool, config.http_timeout())?
            .with_ttl(config.jwks_ttl());

        let verifier = TokenVerifier::new()
            .algorithms(AlgorithmPolicy::rs256_only())
            .temporal(TemporalValidation::with_clock_skew(config.clock_skew_secs)?)
            .resolver(KeyResolver::new().require_key_alg(config.require_key_alg));

        let mut policy = ClaimPolicy::for_user_pool(&pool);
        if let Some(token_use) = config.token_use {
            policy = policy.with_token_use(token_use);
        }

        Ok(Self::new(
            Arc::new(cache),
            verifier,
            policy,
            config.app_client_id.clone(),
        ))
    }

    pub fn cache(&self) -> &Arc<KeySetCache> {
        &self.cache
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Verify `token` and apply the claim policy, keeping the failure reason
    pub async fn authenticate(&self, token: &str) -> Result<ClaimSet> {
        let claims = self.verifier.verify(token, &self.cache).await?;
        self.policy.check(&claims, &self.audience)?;
        Ok(claims)
    }

    /// Authenticate the bearer token in an `Authorization` header value
    ///
    /// Every failure becomes [`Unauthorized`]; the reason is logged.
    pub async fn authorize(&self, authorization: &str) -> std::result::Result<ClaimSet, Unauthorized> {
        let outcome = match bearer_token(authorization) {
            Ok(token) => self.authenticate(token).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(claims) => {
                debug!(
                    sub = claims.subject().ok().flatten().unwrap_or_default(),
                    "request authorized"
                );
                Ok(claims)
            }
            Err(e) => {
                warn!(reason = e.reason(), error = %e, "rejected bearer token");
                Err(Unauthorized)
            }
        }
    }
}
