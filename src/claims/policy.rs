use crate::claims::ClaimSet;
use crate::error::{Error, Result};
use crate::pool::UserPool;
use serde::Deserialize;

/// Kind of Cognito token a caller accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUse {
    Id,
    Access,
}

impl TokenUse {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TokenUse::Id => "id",
            TokenUse::Access => "access",
        }
    }
}

impl std::fmt::Display for TokenUse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TokenUse {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "id" => Ok(TokenUse::Id),
            "access" => Ok(TokenUse::Access),
            other => Err(Error::ConfigurationInvalid(format!(
                "token use must be 'id' or 'access', got '{other}'"
            ))),
        }
    }
}

/// Who a verified token must be for and who must have issued it
///
/// The audience is passed to [`check`](Self::check) per call; the issuer and
/// token use are fixed per deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimPolicy {
    issuer: Option<String>,
    token_use: Option<TokenUse>,
}

impl ClaimPolicy {
    /// Policy that checks the audience only
    pub fn new() -> Self {
        Self::default()
    }

    /// Require tokens issued by `pool`
    pub fn for_user_pool(pool: &UserPool) -> Self {
        Self::new().with_issuer(pool.issuer())
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_token_use(mut self, token_use: TokenUse) -> Self {
        self.token_use = Some(token_use);
        self
    }

    pub fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }

    pub fn token_use(&self) -> Option<TokenUse> {
        self.token_use
    }

    /// Check issuer, token use and audience, in that order
    ///
    /// Cognito access tokens carry no `aud`; for those the `client_id` claim
    /// is compared against `expected_audience` instead.
    pub fn check(&self, claims: &ClaimSet, expected_audience: &str) -> Result<()> {
        if let Some(expected) = &self.issuer {
            let found = claims.issuer()?;
            if found != Some(expected.as_str()) {
                return Err(Error::IssuerMismatch {
                    expected: expected.clone(),
                    found: found.map(str::to_string),
                });
            }
        }

        if let Some(expected) = self.token_use {
            let token_use = claims.token_use()?;
            if token_use != Some(expected.as_str()) {
                return Err(Error::TokenUseMismatch {
                    expected: expected.as_str().to_string(),
                    found: token_use.map(str::to_string),
                });
            }
        }

        let found = match claims.audience()? {
            Some(audience) if audience.contains(expected_audience) => return Ok(()),
            Some(audience) => audience.values(),
            None if claims.token_use()? == Some(TokenUse::Access.as_str()) => {
                match claims.client_id()? {
                    Some(client_id) if client_id == expected_audience => return Ok(()),
                    Some(client_id) => vec![client_id.to_string()],
                    None => Vec::new(),
                }
            }
            None => Vec::new(),
        };

        Err(Error::AudienceMismatch {
            expected: expected_audience.to_string(),
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISSUER: &str = "https://cognito-idp.eu-west-1.amazonaws.com/eu-west-1_pool";

    fn claims(json: &str) -> ClaimSet {
        ClaimSet::from_json(json).unwrap()
    }

    #[test]
    fn test_audience_match() {
        let set = claims(r#"{"aud":"client-123"}"#);
        assert!(ClaimPolicy::new().check(&set, "client-123").is_ok());

        let set = claims(r#"{"aud":["other","client-123"]}"#);
        assert!(ClaimPolicy::new().check(&set, "client-123").is_ok());
    }

    #[test]
    fn test_audience_mismatch() {
        let set = claims(r#"{"aud":"client-123"}"#);
        assert_eq!(
            ClaimPolicy::new().check(&set, "client-999"),
            Err(Error::AudienceMismatch {
                expected: "client-999".into(),
                found: vec!["client-123".into()],
            })
        );
    }

    #[test]
    fn test_missing_audience_is_mismatch() {
        let set = claims(r#"{"sub":"user-1"}"#);
        assert_eq!(
            ClaimPolicy::new().check(&set, "client-123"),
            Err(Error::AudienceMismatch {
                expected: "client-123".into(),
                found: vec![],
            })
        );
    }

    #[test]
    fn test_access_token_uses_client_id() {
        let set = claims(r#"{"token_use":"access","client_id":"client-123"}"#);
        assert!(ClaimPolicy::new().check(&set, "client-123").is_ok());
        assert!(matches!(
            ClaimPolicy::new().check(&set, "client-999"),
            Err(Error::AudienceMismatch { found, .. }) if found == vec!["client-123".to_string()]
        ));

        // client_id is not consulted for id tokens
        let set = claims(r#"{"token_use":"id","client_id":"client-123"}"#);
        assert!(ClaimPolicy::new().check(&set, "client-123").is_err());
    }

    #[test]
    fn test_issuer() {
        let pool = UserPool::new("eu-west-1", "eu-west-1_pool");
        let policy = ClaimPolicy::for_user_pool(&pool);
        assert_eq!(policy.issuer(), Some(ISSUER));

        let set = claims(&format!(r#"{{"iss":"{ISSUER}","aud":"client-123"}}"#));
        assert!(policy.check(&set, "client-123").is_ok());

        let set = claims(r#"{"iss":"https://evil.example.com","aud":"client-123"}"#);
        assert!(matches!(
            policy.check(&set, "client-123"),
            Err(Error::IssuerMismatch { found: Some(found), .. }) if found == "https://evil.example.com"
        ));

        let set = claims(r#"{"aud":"client-123"}"#);
        assert!(matches!(
            policy.check(&set, "client-123"),
            Err(Error::IssuerMismatch { found: None, .. })
        ));
    }

    #[test]
    fn test_token_use() {
        let policy = ClaimPolicy::new().with_token_use(TokenUse::Id);

        let set = claims(r#"{"token_use":"id","aud":"client-123"}"#);
        assert!(policy.check(&set, "client-123").is_ok());

        let set = claims(r#"{"token_use":"access","client_id":"client-123"}"#);
        assert_eq!(
            policy.check(&set, "client-123"),
            Err(Error::TokenUseMismatch {
                expected: "id".into(),
                found: Some("access".into()),
            })
        );

        let set = claims(r#"{"token_use":7,"aud":"client-123"}"#);
        assert!(matches!(
            policy.check(&set, "client-123"),
            Err(Error::ClaimTypeError { .. })
        ));
    }

    #[test]
    fn test_token_use_ignored_without_policy() {
        let set = claims(r#"{"token_use":["id"],"aud":"client-123"}"#);
        assert!(ClaimPolicy::new().check(&set, "client-123").is_ok());

        // Still read for the client_id fallback when aud is absent
        let set = claims(r#"{"token_use":["access"],"client_id":"client-123"}"#);
        assert!(matches!(
            ClaimPolicy::new().check(&set, "client-123"),
            Err(Error::ClaimTypeError { .. })
        ));
    }

    #[test]
    fn test_token_use_from_str() {
        assert_eq!("id".parse::<TokenUse>().unwrap(), TokenUse::Id);
        assert_eq!("access".parse::<TokenUse>().unwrap(), TokenUse::Access);
        assert!("refresh".parse::<TokenUse>().is_err());
    }
}
