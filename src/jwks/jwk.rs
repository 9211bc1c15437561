//! JWK (JSON Web Key) struct and conversion

use crate::algorithm::{AlgorithmType, KeyFamily};
use crate::limits::{MAX_JWK_COORDINATE_SIZE, MAX_JWK_E_SIZE, MAX_JWK_N_SIZE, MAX_KID_LENGTH};
use crate::utils::base64url;
use crate::utils::der::{EcdsaCurve, ecdsa_spki_from_x_y, rsa_spki_from_n_e};
use miniserde::Deserialize;

/// One published key of a key set (RFC 7517)
///
/// Every field is optional on the wire; which ones are required depends on
/// the algorithm the key is materialized for.
#[derive(Debug, Clone, Deserialize)]
pub struct SigningKey {
    /// Key type ("RSA" or "EC")
    pub(crate) kty: Option<String>,
    pub(crate) kid: Option<String>,
    /// Advisory algorithm; when present it must match the token's
    pub(crate) alg: Option<String>,
    /// "sig" or "enc"; absent means any use
    #[serde(rename = "use")]
    pub(crate) key_use: Option<String>,
    // RSA fields
    pub(crate) n: Option<String>,
    pub(crate) e: Option<String>,
    // ECDSA fields
    pub(crate) crv: Option<String>,
    pub(crate) x: Option<String>,
    pub(crate) y: Option<String>,
}

impl SigningKey {
    pub fn kid(&self) -> Option<&str> {
        self.kid.as_deref()
    }

    pub fn kty(&self) -> Option<&str> {
        self.kty.as_deref()
    }

    pub fn alg(&self) -> Option<&str> {
        self.alg.as_deref()
    }

    /// Convert the key to a DER SubjectPublicKeyInfo usable with `algorithm`
    ///
    /// With `require_alg` set the JWK must carry an `alg` field. Errors are
    /// plain descriptions; [`KeyResolver`](crate::KeyResolver) wraps them.
    pub(crate) fn to_spki(
        &self,
        algorithm: AlgorithmType,
        require_alg: bool,
    ) -> Result<Vec<u8>, String> {
        self.validate_structure(algorithm)?;
        self.validate_algorithm(algorithm, require_alg)?;

        match algorithm.key_family() {
            KeyFamily::Rsa => self.to_rsa_spki(),
            KeyFamily::Ec(curve) => self.to_ecdsa_spki(curve),
        }
    }

    /// Key type and key use
    fn validate_structure(&self, algorithm: AlgorithmType) -> Result<(), String> {
        let expected_kty = match algorithm.key_family() {
            KeyFamily::Rsa => "RSA",
            KeyFamily::Ec(_) => "EC",
        };

        match self.kty.as_deref() {
            Some(kty) if kty == expected_kty => {}
            Some(kty) => {
                return Err(format!(
                    "key type mismatch: {algorithm} requires {expected_kty}, found {kty}"
                ));
            }
            None => return Err("missing key type (kty)".into()),
        }

        if let Some(use_val) = &self.key_use {
            if use_val != "sig" {
                return Err(format!(
                    "key use mismatch: expected 'sig' for signature verification, found '{use_val}'"
                ));
            }
        }

        if let Some(kid) = &self.kid {
            if kid.len() > MAX_KID_LENGTH {
                return Err(format!(
                    "kid too large: {} bytes (maximum: {MAX_KID_LENGTH} bytes)",
                    kid.len()
                ));
            }
        }

        Ok(())
    }

    fn validate_algorithm(&self, algorithm: AlgorithmType, require_alg: bool) -> Result<(), String> {
        match self.alg.as_deref() {
            Some(jwk_alg) if jwk_alg != algorithm.as_str() => Err(format!(
                "algorithm mismatch: key declares '{jwk_alg}', token uses '{algorithm}'"
            )),
            None if require_alg => Err("key has no alg field".into()),
            _ => Ok(()),
        }
    }

    fn to_rsa_spki(&self) -> Result<Vec<u8>, String> {
        const MAX_DECODED_JWK_N: usize = (MAX_JWK_N_SIZE * 3) / 4;
        const MAX_DECODED_JWK_E: usize = (MAX_JWK_E_SIZE * 3) / 4;

        let n = required_field(self.n.as_deref(), "n (modulus)", MAX_JWK_N_SIZE)?;
        let e = required_field(self.e.as_deref(), "e (exponent)", MAX_JWK_E_SIZE)?;

        let n_bytes = base64url::decode_bytes(n, MAX_DECODED_JWK_N)
            .map_err(|e| format!("failed to decode n: {e}"))?;
        let e_bytes = base64url::decode_bytes(e, MAX_DECODED_JWK_E)
            .map_err(|e| format!("failed to decode e: {e}"))?;

        rsa_spki_from_n_e(&n_bytes, &e_bytes)
    }

    fn to_ecdsa_spki(&self, curve: EcdsaCurve) -> Result<Vec<u8>, String> {
        const MAX_DECODED_COORDINATE: usize = (MAX_JWK_COORDINATE_SIZE * 3) / 4;

        match self.crv.as_deref() {
            Some(crv) if crv == curve.name() => {}
            Some(crv) => {
                return Err(format!(
                    "curve mismatch: expected {}, found {crv}",
                    curve.name()
                ));
            }
            None => return Err("missing curve (crv)".into()),
        }

        let x = required_field(self.x.as_deref(), "x coordinate", MAX_JWK_COORDINATE_SIZE)?;
        let y = required_field(self.y.as_deref(), "y coordinate", MAX_JWK_COORDINATE_SIZE)?;

        let x_bytes = base64url::decode_bytes(x, MAX_DECODED_COORDINATE)
            .map_err(|e| format!("failed to decode x: {e}"))?;
        let y_bytes = base64url::decode_bytes(y, MAX_DECODED_COORDINATE)
            .map_err(|e| format!("failed to decode y: {e}"))?;

        ecdsa_spki_from_x_y(&x_bytes, &y_bytes, curve)
    }
}

fn required_field<'a>(value: Option<&'a str>, name: &str, max: usize) -> Result<&'a str, String> {
    let value = value.ok_or_else(|| format!("missing {name}"))?;
    if value.len() > max {
        return Err(format!(
            "{name} too large: {} bytes (maximum: {max} bytes)",
            value.len()
        ));
    }
    Ok(value)
}
