//! Cognito user pool addressing

use crate::error::{Error, Result};
use crate::url::validate_issuer_url;

/// A Cognito user pool, identified by region and pool id
///
/// The pool determines both the expected `iss` claim and the location of
/// the published key set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPool {
    region: String,
    pool_id: String,
    issuer_base: Option<String>,
}

impl UserPool {
    pub fn new(region: impl Into<String>, pool_id: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            pool_id: pool_id.into(),
            issuer_base: None,
        }
    }

    /// Serve the pool from `base` instead of `cognito-idp.<region>.amazonaws.com`
    ///
    /// Used for local identity provider emulators and tests. A trailing
    /// slash on `base` is ignored.
    pub fn with_issuer_base(mut self, base: impl Into<String>) -> Self {
        self.issuer_base = Some(base.into().trim_end_matches('/').to_string());
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn pool_id(&self) -> &str {
        &self.pool_id
    }

    /// Issuer URL, the exact value of the `iss` claim in pool tokens
    pub fn issuer(&self) -> String {
        match &self.issuer_base {
            Some(base) => format!("{base}/{}", self.pool_id),
            None => format!(
                "https://cognito-idp.{}.amazonaws.com/{}",
                self.region, self.pool_id
            ),
        }
    }

    /// Location of the pool's public signing keys
    pub fn jwks_url(&self) -> String {
        format!("{}/.well-known/jwks.json", self.issuer())
    }

    pub fn validate(&self) -> Result<()> {
        if self.region.trim().is_empty() {
            return Err(Error::ConfigurationInvalid("region cannot be empty".into()));
        }
        if self.pool_id.trim().is_empty() {
            return Err(Error::ConfigurationInvalid(
                "user pool id cannot be empty".into(),
            ));
        }
        if self.pool_id.contains('/') {
            return Err(Error::ConfigurationInvalid(format!(
                "user pool id '{}' must not contain '/'",
                self.pool_id
            )));
        }
        validate_issuer_url(&self.issuer())
    }
}
