//! Errors for cognito-verifier

use thiserror::Error;

/// Reasons a token, or the key material needed to check it, is rejected
///
/// Every variant is terminal for the verification call that produced it.
/// Callers facing an external client should collapse all of them into
/// [`Unauthorized`](crate::Unauthorized) and log the detail instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Key Set Errors
    // ============================================================================
    #[error("Key set fetch failed: {0}")]
    FetchError(String),

    #[error("No key with kid '{kid}' in the key set")]
    KeyNotFound { kid: String },

    #[error("Key '{kid}' could not be materialized: {reason}")]
    MaterializationError { kid: String, reason: String },

    // ============================================================================
    // Token Structure Errors
    // ============================================================================
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Token header has no key id (kid)")]
    MissingKeyId,

    // ============================================================================
    // Signature Errors
    // ============================================================================
    #[error("Signature rejected: {0}")]
    SignatureInvalid(String),

    // ============================================================================
    // Temporal Errors
    // ============================================================================
    #[error("Token expired at {expired_at} (now: {now}, skew: {skew}s)")]
    TokenExpired {
        expired_at: i64,
        now: i64,
        skew: u64,
    },

    #[error("Token not valid before {not_before} (now: {now}, skew: {skew}s)")]
    TokenNotYetValid {
        not_before: i64,
        now: i64,
        skew: u64,
    },

    // ============================================================================
    // Claim Policy Errors
    // ============================================================================
    #[error("Token audience mismatch: expected '{expected}', found {found:?}")]
    AudienceMismatch {
        expected: String,
        found: Vec<String>,
    },

    #[error("Token issuer mismatch: expected '{expected}', found {found:?}")]
    IssuerMismatch {
        expected: String,
        found: Option<String>,
    },

    #[error("Token use mismatch: expected '{expected}', found {found:?}")]
    TokenUseMismatch {
        expected: String,
        found: Option<String>,
    },

    #[error("Claim '{claim}' has unexpected type: expected {expected}")]
    ClaimTypeError {
        claim: String,
        expected: &'static str,
    },

    #[error("Required claim '{0}' is missing")]
    MissingClaim(String),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),
}

impl Error {
    /// Whether the failure came from reaching or reading the key set endpoint
    ///
    /// These are the only errors where retrying the same token later can
    /// produce a different outcome.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Error::FetchError(_))
    }

    /// Short, stable label for the rejection reason, suitable for log fields
    pub fn reason(&self) -> &'static str {
        match self {
            Error::FetchError(_) => "fetch_error",
            Error::KeyNotFound { .. } => "key_not_found",
            Error::MaterializationError { .. } => "materialization_error",
            Error::MalformedToken(_) => "malformed_token",
            Error::MissingKeyId => "missing_key_id",
            Error::SignatureInvalid(_) => "signature_invalid",
            Error::TokenExpired { .. } => "token_expired",
            Error::TokenNotYetValid { .. } => "token_not_yet_valid",
            Error::AudienceMismatch { .. } => "audience_mismatch",
            Error::IssuerMismatch { .. } => "issuer_mismatch",
            Error::TokenUseMismatch { .. } => "token_use_mismatch",
            Error::ClaimTypeError { .. } => "claim_type_error",
            Error::MissingClaim(_) => "missing_claim",
            Error::ConfigurationInvalid(_) => "configuration_invalid",
        }
    }
}

/// Result type alias for cognito-verifier operations
pub type Result<T> = std::result::Result<T, Error>;
