//! DER encoding of JWK key material into SubjectPublicKeyInfo
//!
//! `aws-lc-rs` parses public keys from SPKI, so every materialized key goes
//! through one of the two builders here. Errors are returned as plain
//! descriptions; the caller attaches the `kid`.

use der::{Encode, Sequence, asn1::BitString, asn1::UintRef};
use spki::{AlgorithmIdentifierOwned, ObjectIdentifier, SubjectPublicKeyInfoOwned};

const RSA_ENCRYPTION_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
const EC_PUBLIC_KEY_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

/// Largest accepted RSA modulus in bytes (65536 bits)
const MAX_RSA_MODULUS_SIZE: usize = 8192;

/// Named curves supported for ECDSA keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EcdsaCurve {
    P256,
    P384,
    P521,
}

impl EcdsaCurve {
    /// JWK `crv` name
    pub(crate) const fn name(self) -> &'static str {
        match self {
            EcdsaCurve::P256 => "P-256",
            EcdsaCurve::P384 => "P-384",
            EcdsaCurve::P521 => "P-521",
        }
    }

    /// Byte length of one affine coordinate
    const fn coordinate_len(self) -> usize {
        match self {
            EcdsaCurve::P256 => 32,
            EcdsaCurve::P384 => 48,
            EcdsaCurve::P521 => 66,
        }
    }

    const fn oid(self) -> ObjectIdentifier {
        match self {
            EcdsaCurve::P256 => ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7"),
            EcdsaCurve::P384 => ObjectIdentifier::new_unwrap("1.3.132.0.34"),
            EcdsaCurve::P521 => ObjectIdentifier::new_unwrap("1.3.132.0.35"),
        }
    }
}

/// RSAPublicKey as defined in RFC 3447:
/// RSAPublicKey ::= SEQUENCE {
///     modulus           INTEGER,  -- n
///     publicExponent    INTEGER   -- e
/// }
#[derive(Sequence)]
struct RsaPublicKey<'a> {
    modulus: UintRef<'a>,
    public_exponent: UintRef<'a>,
}

/// Build DER-encoded SPKI from RSA modulus (n) and exponent (e) bytes
pub(crate) fn rsa_spki_from_n_e(n: &[u8], e: &[u8]) -> Result<Vec<u8>, String> {
    if n.is_empty() || e.is_empty() {
        return Err("rsa key has empty n or e".into());
    }

    if n.len() > MAX_RSA_MODULUS_SIZE {
        return Err(format!(
            "RSA modulus too large: {} bytes (maximum: {MAX_RSA_MODULUS_SIZE} bytes)",
            n.len()
        ));
    }

    let rsa_pubkey = RsaPublicKey {
        modulus: UintRef::new(n).map_err(|e| format!("failed to encode RSA modulus: {e}"))?,
        public_exponent: UintRef::new(e)
            .map_err(|e| format!("failed to encode RSA exponent: {e}"))?,
    };

    let rsa_pubkey_der = rsa_pubkey
        .to_der()
        .map_err(|e| format!("failed to encode RSA public key: {e}"))?;

    let algorithm = AlgorithmIdentifierOwned {
        oid: RSA_ENCRYPTION_OID,
        parameters: Some(der::asn1::AnyRef::NULL.into()),
    };

    encode_spki(algorithm, rsa_pubkey_der)
}

/// Build DER-encoded SPKI from ECDSA affine coordinates
pub(crate) fn ecdsa_spki_from_x_y(x: &[u8], y: &[u8], curve: EcdsaCurve) -> Result<Vec<u8>, String> {
    let expected = curve.coordinate_len();
    if x.len() != expected || y.len() != expected {
        return Err(format!(
            "{} coordinates must be {expected} bytes (x: {}, y: {})",
            curve.name(),
            x.len(),
            y.len()
        ));
    }

    // Uncompressed point: 0x04 || x || y
    let mut point = Vec::with_capacity(1 + 2 * expected);
    point.push(0x04);
    point.extend_from_slice(x);
    point.extend_from_slice(y);

    let curve_oid = curve.oid();
    let algorithm = AlgorithmIdentifierOwned {
        oid: EC_PUBLIC_KEY_OID,
        parameters: Some(der::asn1::AnyRef::from(&curve_oid).into()),
    };

    encode_spki(algorithm, point)
}

fn encode_spki(algorithm: AlgorithmIdentifierOwned, key_bytes: Vec<u8>) -> Result<Vec<u8>, String> {
    let subject_public_key =
        BitString::new(0, key_bytes).map_err(|e| format!("failed to create bit string: {e}"))?;

    SubjectPublicKeyInfoOwned {
        algorithm,
        subject_public_key,
    }
    .to_der()
    .map_err(|e| format!("failed to encode SPKI: {e}"))
}
