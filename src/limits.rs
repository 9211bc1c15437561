//! Size limit constants for input validation

/// Maximum length for a token string (64KB)
pub(crate) const MAX_TOKEN_LENGTH: usize = 64 * 1024;

/// Maximum length for issuer URLs and JWKS URLs (2048 characters)
pub(crate) const MAX_URL_LENGTH: usize = 2048;

/// Maximum size for a JWKS response (512KB)
pub(crate) const MAX_JWKS_RESPONSE_SIZE: usize = 512 * 1024;

/// Maximum number of keys in a JWK set
pub(crate) const MAX_JWK_SET_SIZE: usize = 100;

// ============================================================================
// Decoded segment size limits
// ============================================================================

/// Maximum size for the decoded header JSON (8KB)
pub(crate) const MAX_DECODED_HEADER_SIZE: usize = 8 * 1024;

/// Maximum size for the decoded payload JSON (64KB)
pub(crate) const MAX_DECODED_PAYLOAD_SIZE: usize = 64 * 1024;

/// Maximum size for decoded signature bytes (1KB)
/// RSA-8192 signatures are 1024 bytes
pub(crate) const MAX_DECODED_SIGNATURE_SIZE: usize = 1024;

// ============================================================================
// Header field size limits
// ============================================================================

/// Maximum length for the `alg` header field
pub(crate) const MAX_ALG_LENGTH: usize = 16;

/// Maximum length for the `kid` header field and JWK `kid`
pub(crate) const MAX_KID_LENGTH: usize = 256;

// ============================================================================
// JWK field size limits
// ============================================================================

/// Maximum size for Base64URL-encoded RSA modulus (n) field (12KB)
pub(crate) const MAX_JWK_N_SIZE: usize = 12 * 1024;

/// Maximum size for Base64URL-encoded RSA exponent (e) field
pub(crate) const MAX_JWK_E_SIZE: usize = 64;

/// Maximum size for Base64URL-encoded EC coordinates (P-521 needs 88)
pub(crate) const MAX_JWK_COORDINATE_SIZE: usize = 128;

// ============================================================================
// Timestamp bounds
// ============================================================================

/// Minimum valid Unix timestamp (1970-01-01 00:00:00 UTC)
pub(crate) const MIN_TIMESTAMP: i64 = 0;

/// Maximum valid Unix timestamp (2100-01-01 00:00:00 UTC)
pub(crate) const MAX_TIMESTAMP: i64 = 4_102_444_800;

/// Maximum clock skew tolerance (5 minutes)
pub(crate) const MAX_CLOCK_SKEW_SECONDS: u64 = 300;
