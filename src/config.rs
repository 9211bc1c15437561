//! Verifier configuration
//!
//! Loaded from `COGNITO_`-prefixed environment variables:
//!
//! | Variable                     | Field               | Default     |
//! |------------------------------|---------------------|-------------|
//! | `COGNITO_REGION`             | `region`            | `eu-west-1` |
//! | `COGNITO_USER_POOL_ID`       | `user_pool_id`      | required    |
//! | `COGNITO_APP_CLIENT_ID`      | `app_client_id`     | required    |
//! | `COGNITO_ISSUER_BASE`        | `issuer_base`       | none        |
//! | `COGNITO_JWKS_TTL_SECS`      | `jwks_ttl_secs`     | `3600`      |
//! | `COGNITO_HTTP_TIMEOUT_SECS`  | `http_timeout_secs` | `5`         |
//! | `COGNITO_CLOCK_SKEW_SECS`    | `clock_skew_secs`   | `0`         |
//! | `COGNITO_TOKEN_USE`          | `token_use`         | any         |
//! | `COGNITO_REQUIRE_KEY_ALG`    | `require_key_alg`   | `false`     |

use crate::claims::TokenUse;
use crate::error::{Error, Result};
use crate::jwks::{DEFAULT_HTTP_TIMEOUT, DEFAULT_JWKS_TTL};
use crate::limits::MAX_CLOCK_SKEW_SECONDS;
use crate::pool::UserPool;
use figment::{Figment, providers::Env};
use serde::Deserialize;
use std::time::Duration;

/// Settings for an [`Authenticator`](crate::Authenticator)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// AWS region of the user pool
    pub region: String,
    pub user_pool_id: String,
    /// App client id tokens must be issued to; the expected audience
    pub app_client_id: String,
    /// Replaces `https://cognito-idp.<region>.amazonaws.com`
    pub issuer_base: Option<String>,
    pub jwks_ttl_secs: u64,
    pub http_timeout_secs: u64,
    pub clock_skew_secs: u64,
    /// Accept only id or only access tokens
    pub token_use: Option<TokenUse>,
    pub require_key_alg: bool,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            region: "eu-west-1".to_string(),
            user_pool_id: String::new(),
            app_client_id: String::new(),
            issuer_base: None,
            jwks_ttl_secs: DEFAULT_JWKS_TTL.as_secs(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT.as_secs(),
            clock_skew_secs: 0,
            token_use: None,
            require_key_alg: false,
        }
    }
}

impl VerifierConfig {
    /// Load from `COGNITO_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_figment(Figment::from(Env::prefixed("COGNITO_")))
    }

    /// Load from any figment, then validate
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment
            .extract()
            .map_err(|e| Error::ConfigurationInvalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.app_client_id.trim().is_empty() {
            return Err(Error::ConfigurationInvalid(
                "app client id cannot be empty".into(),
            ));
        }

        if self.clock_skew_secs > MAX_CLOCK_SKEW_SECONDS {
            return Err(Error::ConfigurationInvalid(format!(
                "clock skew {}s exceeds maximum of {MAX_CLOCK_SKEW_SECONDS}s",
                self.clock_skew_secs
            )));
        }

        if self.jwks_ttl_secs == 0 {
            return Err(Error::ConfigurationInvalid(
                "jwks ttl must be at least one second".into(),
            ));
        }

        if self.http_timeout_secs == 0 {
            return Err(Error::ConfigurationInvalid(
                "http timeout must be at least one second".into(),
            ));
        }

        self.user_pool().validate()
    }

    pub fn user_pool(&self) -> UserPool {
        let pool = UserPool::new(&self.region, &self.user_pool_id);
        match &self.issuer_base {
            Some(base) => pool.with_issuer_base(base),
            None => pool,
        }
    }

    pub fn jwks_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_ttl_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
