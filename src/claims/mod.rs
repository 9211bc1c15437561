//! Token claims with typed access
//!
//! Claims are kept as the JSON object the provider signed, so a verified
//! token hands back exactly what was issued. Accessors check the shape of
//! each registered claim and report [`Error::ClaimTypeError`] instead of
//! coercing.

mod policy;
mod temporal;

pub use policy::{ClaimPolicy, TokenUse};
pub use temporal::TemporalValidation;
pub(crate) use temporal::unix_now;

use crate::error::{Error, Result};
use crate::utils::bounds::timestamp_in_bounds;
use miniserde::json::{Number, Object, Value};

/// Claims of a token, keyed by claim name
#[derive(Debug, Clone)]
pub struct ClaimSet {
    claims: Object,
}

impl ClaimSet {
    /// Parse a decoded payload; anything but a JSON object is malformed
    pub(crate) fn from_json(payload: &str) -> Result<Self> {
        let value: Value = miniserde::json::from_str(payload)
            .map_err(|_| Error::MalformedToken("payload is not valid JSON".into()))?;

        match value {
            Value::Object(claims) => Ok(Self { claims }),
            _ => Err(Error::MalformedToken(
                "payload is not a JSON object".into(),
            )),
        }
    }

    /// Raw value of any claim, including private ones
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.claims.contains_key(name)
    }

    /// Claim names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.claims.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// String claim; `Ok(None)` when absent
    pub fn get_str(&self, name: &str) -> Result<Option<&str>> {
        match self.claims.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(type_error(name, "string")),
        }
    }

    /// NumericDate claim in seconds since the epoch; `Ok(None)` when absent
    ///
    /// Fractional values are truncated. Values outside 1970..2100 are
    /// rejected.
    pub fn get_timestamp(&self, name: &str) -> Result<Option<i64>> {
        let number = match self.claims.get(name) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Number(number)) => number,
            Some(_) => return Err(type_error(name, "numeric date")),
        };

        let seconds = match *number {
            Number::U64(n) => i64::try_from(n).ok(),
            Number::I64(n) => Some(n),
            Number::F64(f) if f.is_finite() => Some(f.trunc() as i64),
            Number::F64(_) => None,
        };

        match seconds {
            Some(seconds) if timestamp_in_bounds(seconds) => Ok(Some(seconds)),
            _ => Err(type_error(name, "numeric date within 1970..2100")),
        }
    }

    /// `exp`, which every accepted token must carry
    pub fn expiration(&self) -> Result<i64> {
        self.get_timestamp("exp")?
            .ok_or_else(|| Error::MissingClaim("exp".into()))
    }

    pub fn not_before(&self) -> Result<Option<i64>> {
        self.get_timestamp("nbf")
    }

    pub fn issued_at(&self) -> Result<Option<i64>> {
        self.get_timestamp("iat")
    }

    pub fn issuer(&self) -> Result<Option<&str>> {
        self.get_str("iss")
    }

    pub fn subject(&self) -> Result<Option<&str>> {
        self.get_str("sub")
    }

    /// `token_use`: "id" or "access" on Cognito tokens
    pub fn token_use(&self) -> Result<Option<&str>> {
        self.get_str("token_use")
    }

    /// `client_id`, which Cognito access tokens carry instead of `aud`
    pub fn client_id(&self) -> Result<Option<&str>> {
        self.get_str("client_id")
    }

    pub fn username(&self) -> Result<Option<&str>> {
        self.get_str("cognito:username")
    }

    /// `aud` as a single string or a list of strings
    pub fn audience(&self) -> Result<Option<Audience>> {
        const EXPECTED: &str = "string or array of strings";

        match self.claims.get("aud") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(Audience::Single(s.clone()))),
            Some(Value::Array(values)) => values
                .iter()
                .map(|value| match value {
                    Value::String(s) => Ok(s.clone()),
                    _ => Err(type_error("aud", EXPECTED)),
                })
                .collect::<Result<Vec<_>>>()
                .map(|values| Some(Audience::Many(values))),
            Some(_) => Err(type_error("aud", EXPECTED)),
        }
    }

    /// The claims re-serialized as a JSON object
    pub fn to_json(&self) -> String {
        miniserde::json::to_string(&Value::Object(self.claims.clone()))
    }
}

fn type_error(claim: &str, expected: &'static str) -> Error {
    Error::ClaimTypeError {
        claim: claim.to_string(),
        expected,
    }
}

/// The `aud` claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    Single(String),
    Many(Vec<String>),
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::Single(value) => value == audience,
            Audience::Many(values) => values.iter().any(|value| value == audience),
        }
    }

    pub fn values(&self) -> Vec<String> {
        match self {
            Audience::Single(value) => vec![value.clone()],
            Audience::Many(values) => values.clone(),
        }
    }
}
