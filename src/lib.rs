//! # cognito-verifier
//!
//! Verification of bearer tokens issued by an AWS Cognito user pool.
//!
//! A request handler holds one [`Authenticator`]. For every request it
//! parses the token, checks the algorithm and the validity window, finds the
//! signing key in the pool's published key set, verifies the signature and
//! finally checks issuer and audience. The result is either the token's
//! [`ClaimSet`] or a rejection reason.
//!
//! ## Quick Start
//!
//! ```ignore
//! use cognito_verifier::{Authenticator, VerifierConfig};
//!
//! let authenticator = Authenticator::from_config(&VerifierConfig::from_env()?)?;
//!
//! match authenticator.authorize(authorization_header).await {
//!     Ok(claims) => println!("subject: {:?}", claims.subject()?),
//!     Err(unauthorized) => return respond(401, unauthorized.to_string()),
//! }
//! ```
//!
//! ## Verification Flow
//!
//! ```text
//! token
//!   │ parse           MalformedToken
//!   │ algorithm       SignatureInvalid
//!   │ exp / nbf / iat TokenExpired, TokenNotYetValid
//!   │ kid             MissingKeyId
//!   │ key lookup      KeyNotFound (after one refresh), FetchError, MaterializationError
//!   │ signature       SignatureInvalid
//!   ▼
//! ClaimSet
//!   │ ClaimPolicy     IssuerMismatch, TokenUseMismatch, AudienceMismatch
//!   ▼
//! authenticated claims
//! ```
//!
//! ## Key Set Caching
//!
//! The [`KeySetCache`] fetches `<issuer>/.well-known/jwks.json` on first use
//! and keeps it for an hour. A token naming an unknown `kid` causes exactly
//! one refresh per verification, which picks up rotated keys without
//! letting unknown key ids trigger unbounded fetching.
//!
//! ## Algorithm Support
//!
//! - **RSA**: RS256 (default, the algorithm Cognito uses), RS384, RS512
//! - **ECDSA**: ES256, ES384, ES512
//!
//! `none` and the HMAC algorithms are always rejected.

mod authenticator;
mod config;
mod error;
mod jwks;
mod pool;
mod token;
mod verifier;

// Internal modules
pub(crate) mod algorithm;
pub(crate) mod claims;
pub(crate) mod limits;
pub(crate) mod url;
pub(crate) mod utils;

// Public Interface
pub use algorithm::{AlgorithmPolicy, AlgorithmType};
pub use authenticator::{Authenticator, Unauthorized, bearer_token};
pub use claims::{Audience, ClaimPolicy, ClaimSet, TemporalValidation, TokenUse};
pub use config::VerifierConfig;
pub use error::{Error, Result};
pub use jwks::{
    DEFAULT_HTTP_TIMEOUT, DEFAULT_JWKS_TTL, FetchFuture, HttpKeySetSource, KeyResolver, KeySet,
    KeySetCache, KeySetSource, PublicKey, SigningKey,
};
pub use pool::UserPool;
pub use verifier::TokenVerifier;
