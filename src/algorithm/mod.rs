//! Signing algorithms accepted for token verification
//!
//! Only asymmetric algorithms exist here. A token declaring `none`, an HMAC
//! algorithm, or anything unknown never reaches key resolution.

use crate::error::{Error, Result};
use crate::limits::MAX_ALG_LENGTH;
use crate::utils::der::EcdsaCurve;

use aws_lc_rs::signature::{self, UnparsedPublicKey};

/// Algorithm identifier from a token header or JWK `alg` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmType {
    RS256,
    RS384,
    RS512,
    ES256,
    ES384,
    ES512,
}

/// Key family an algorithm verifies with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyFamily {
    Rsa,
    Ec(EcdsaCurve),
}

impl AlgorithmType {
    /// Parse the `alg` header value
    ///
    /// Every rejection is reported as [`Error::SignatureInvalid`]: a token
    /// whose algorithm is unacceptable cannot carry a valid signature.
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() > MAX_ALG_LENGTH {
            return Err(Error::SignatureInvalid(format!(
                "algorithm string too long: {} bytes (maximum: {MAX_ALG_LENGTH} bytes)",
                s.len()
            )));
        }

        match s {
            "RS256" => Ok(AlgorithmType::RS256),
            "RS384" => Ok(AlgorithmType::RS384),
            "RS512" => Ok(AlgorithmType::RS512),
            "ES256" => Ok(AlgorithmType::ES256),
            "ES384" => Ok(AlgorithmType::ES384),
            "ES512" => Ok(AlgorithmType::ES512),
            "none" => Err(Error::SignatureInvalid(
                "the 'none' algorithm is rejected".into(),
            )),
            "HS256" | "HS384" | "HS512" => Err(Error::SignatureInvalid(format!(
                "symmetric algorithm '{s}' is rejected"
            ))),
            _ => Err(Error::SignatureInvalid(format!(
                "algorithm '{s}' is not supported"
            ))),
        }
    }

    /// Convert to string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            AlgorithmType::RS256 => "RS256",
            AlgorithmType::RS384 => "RS384",
            AlgorithmType::RS512 => "RS512",
            AlgorithmType::ES256 => "ES256",
            AlgorithmType::ES384 => "ES384",
            AlgorithmType::ES512 => "ES512",
        }
    }

    pub(crate) const fn key_family(&self) -> KeyFamily {
        match self {
            AlgorithmType::RS256 | AlgorithmType::RS384 | AlgorithmType::RS512 => KeyFamily::Rsa,
            AlgorithmType::ES256 => KeyFamily::Ec(EcdsaCurve::P256),
            AlgorithmType::ES384 => KeyFamily::Ec(EcdsaCurve::P384),
            AlgorithmType::ES512 => KeyFamily::Ec(EcdsaCurve::P521),
        }
    }

    /// JWT ECDSA signatures use the fixed-length R||S encoding (RFC 7518 3.4),
    /// not ASN.1 DER.
    fn verification_algorithm(&self) -> &'static dyn signature::VerificationAlgorithm {
        match self {
            AlgorithmType::RS256 => &signature::RSA_PKCS1_2048_8192_SHA256,
            AlgorithmType::RS384 => &signature::RSA_PKCS1_2048_8192_SHA384,
            AlgorithmType::RS512 => &signature::RSA_PKCS1_2048_8192_SHA512,
            AlgorithmType::ES256 => &signature::ECDSA_P256_SHA256_FIXED,
            AlgorithmType::ES384 => &signature::ECDSA_P384_SHA384_FIXED,
            AlgorithmType::ES512 => &signature::ECDSA_P521_SHA512_FIXED,
        }
    }

    /// Verify `signature` over `signing_input` with a DER SubjectPublicKeyInfo
    pub(crate) fn verify_signature(
        &self,
        signing_input: &[u8],
        signature: &[u8],
        key_der: &[u8],
    ) -> Result<()> {
        UnparsedPublicKey::new(self.verification_algorithm(), key_der)
            .verify(signing_input, signature)
            .map_err(|_| Error::SignatureInvalid("signature does not match key".into()))
    }
}

impl std::fmt::Display for AlgorithmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy for allowed algorithms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmPolicy {
    allowed: Vec<AlgorithmType>,
}

impl AlgorithmPolicy {
    /// Policy that allows only RS256, the algorithm Cognito signs with
    pub fn rs256_only() -> Self {
        Self::allow_only(vec![AlgorithmType::RS256])
    }

    /// Policy that allows all RSA algorithms (RS256, RS384, RS512)
    pub fn rsa_all() -> Self {
        Self::allow_only(vec![
            AlgorithmType::RS256,
            AlgorithmType::RS384,
            AlgorithmType::RS512,
        ])
    }

    /// Policy that allows all ECDSA algorithms (ES256, ES384, ES512)
    pub fn ecdsa_all() -> Self {
        Self::allow_only(vec![
            AlgorithmType::ES256,
            AlgorithmType::ES384,
            AlgorithmType::ES512,
        ])
    }

    /// Create a policy that allows only specific algorithms
    pub fn allow_only(algorithms: Vec<AlgorithmType>) -> Self {
        Self {
            allowed: algorithms,
        }
    }

    /// Validate algorithm against policy
    pub(crate) fn validate(&self, algorithm: AlgorithmType) -> Result<()> {
        if self.allowed.contains(&algorithm) {
            Ok(())
        } else {
            let allowed: Vec<&str> = self.allowed.iter().map(AlgorithmType::as_str).collect();
            Err(Error::SignatureInvalid(format!(
                "algorithm '{algorithm}' not allowed (allowed: {allowed:?})"
            )))
        }
    }
}

impl Default for AlgorithmPolicy {
    fn default() -> Self {
        Self::rs256_only()
    }
}
