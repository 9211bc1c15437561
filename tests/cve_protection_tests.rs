//! Tests verifying protection against known JWT CVEs and attack vectors
//!
//! Every attack here is rejected before a key set is fetched, except where
//! the attack depends on the published keys themselves.

mod common;

use aws_lc_rs::hmac;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use cognito_verifier::{AlgorithmPolicy, Error, TokenVerifier};
use common::*;
use serde_json::json;

// ============================================================================
// CVE-2015-9235 / CVE-2018-1000531: "none" Algorithm Attack
// ============================================================================

#[tokio::test]
async fn test_cve_none_algorithm_variants() {
    let (cache, source) = memory_cache(jwks(&[key_a().jwk("K1", Some("RS256"))]));
    let claims = id_token_claims(CLIENT_ID);

    for alg in ["none", "None", "NONE", "nOnE"] {
        let header = json!({ "alg": alg, "typ": "JWT", "kid": "K1" });
        let token = format!(
            "{}.{}.",
            URL_SAFE_NO_PAD.encode(header.to_string()),
            URL_SAFE_NO_PAD.encode(claims.to_string())
        );

        let result = TokenVerifier::new().verify(&token, &cache).await;
        assert!(
            matches!(result, Err(Error::SignatureInvalid(_))),
            "'{alg}' must be rejected, got {result:?}"
        );
    }

    assert_eq!(source.calls(), 0);
}

// ============================================================================
// CVE-2016-10555: Algorithm Confusion (RSA public key used as HMAC secret)
// ============================================================================

#[tokio::test]
async fn test_cve_algorithm_confusion_rsa_to_hmac() {
    let (cache, source) = memory_cache(jwks(&[key_a().jwk("K1", Some("RS256"))]));

    // The attacker knows the published key and uses it as an HMAC secret
    let secret = key_a().jwk("K1", Some("RS256")).to_string();
    let header = json!({ "alg": "HS256", "typ": "JWT", "kid": "K1" });
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(id_token_claims(CLIENT_ID).to_string())
    );
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    let tag = hmac::sign(&key, signing_input.as_bytes());
    let token = format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(tag.as_ref()));

    for verifier in [
        TokenVerifier::new(),
        TokenVerifier::new().algorithms(AlgorithmPolicy::rsa_all()),
    ] {
        assert!(matches!(
            verifier.verify(&token, &cache).await,
            Err(Error::SignatureInvalid(msg)) if msg.contains("HS256")
        ));
    }

    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn test_algorithm_outside_policy_rejected() {
    let (cache, source) = memory_cache(jwks(&[key_a().jwk("K1", Some("RS256"))]));

    for alg in ["ES256", "PS256", "EdDSA", "rs256", ""] {
        let header = json!({ "alg": alg, "kid": "K1" });
        let token = unsigned_token(&header, &id_token_claims(CLIENT_ID), b"signature");

        assert!(
            matches!(
                TokenVerifier::new().verify(&token, &cache).await,
                Err(Error::SignatureInvalid(_))
            ),
            "'{alg}' must be rejected"
        );
    }

    assert_eq!(source.calls(), 0);
}

// ============================================================================
// Algorithm downgrade between asymmetric families
// ============================================================================

#[tokio::test]
async fn test_rsa_key_cannot_verify_ecdsa_token() {
    let (cache, _) = memory_cache(jwks(&[key_a().jwk("K1", None)]));
    let header = json!({ "alg": "ES256", "kid": "K1" });
    let token = unsigned_token(&header, &id_token_claims(CLIENT_ID), &[0u8; 64]);

    let verifier = TokenVerifier::new().algorithms(AlgorithmPolicy::ecdsa_all());
    assert!(matches!(
        verifier.verify(&token, &cache).await,
        Err(Error::MaterializationError { reason, .. }) if reason.contains("key type mismatch")
    ));
}

#[tokio::test]
async fn test_encryption_key_not_used_for_signatures() {
    let mut jwk = key_a().jwk("K1", Some("RS256"));
    jwk["use"] = json!("enc");
    let (cache, _) = memory_cache(jwks(&[jwk]));

    let token = sign_token(key_a(), Some("K1"), &id_token_claims(CLIENT_ID));
    assert!(matches!(
        TokenVerifier::new().verify(&token, &cache).await,
        Err(Error::MaterializationError { .. })
    ));
}

// ============================================================================
// Key ID injection: kid is only ever compared, never used as a path or query
// ============================================================================

#[tokio::test]
async fn test_kid_injection_is_plain_lookup() {
    let (cache, _) = memory_cache(jwks(&[key_a().jwk("K1", Some("RS256"))]));

    for kid in ["../../../etc/passwd", "K1' OR '1'='1", "K1; rm -rf /", "K1\u{0000}"] {
        let token = sign_token(key_a(), Some(kid), &id_token_claims(CLIENT_ID));
        assert!(
            matches!(
                TokenVerifier::new().verify(&token, &cache).await,
                Err(Error::KeyNotFound { kid: found }) if found == kid
            ),
            "kid {kid:?} must not resolve"
        );
    }
}

// ============================================================================
// Header-embedded keys (jwk / jku / x5u) are ignored
// ============================================================================

#[tokio::test]
async fn test_embedded_jwk_header_ignored() {
    let (cache, _) = memory_cache(jwks(&[key_a().jwk("K1", Some("RS256"))]));

    // Signed by the attacker's key, which is embedded in the header
    let header = json!({
        "alg": "RS256",
        "kid": "K1",
        "jwk": key_b().jwk("K1", Some("RS256")),
        "jku": "https://attacker.example.com/jwks.json",
        "x5u": "https://attacker.example.com/cert.pem",
    });
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(id_token_claims(CLIENT_ID).to_string())
    );
    let forged = sign_token(key_b(), Some("K1"), &id_token_claims(CLIENT_ID));
    let attacker_signature = forged.rsplit('.').next().unwrap();
    let token = format!("{signing_input}.{attacker_signature}");

    assert!(matches!(
        TokenVerifier::new().verify(&token, &cache).await,
        Err(Error::SignatureInvalid(_))
    ));
}

// ============================================================================
// Resource limits
// ============================================================================

#[tokio::test]
async fn test_oversized_token_rejected() {
    let (cache, source) = memory_cache(jwks(&[key_a().jwk("K1", Some("RS256"))]));
    let mut claims = id_token_claims(CLIENT_ID);
    claims["padding"] = json!("x".repeat(70 * 1024));
    let token = sign_token(key_a(), Some("K1"), &claims);

    assert!(matches!(
        TokenVerifier::new().verify(&token, &cache).await,
        Err(Error::MalformedToken(msg)) if msg.contains("too long")
    ));
    assert_eq!(source.calls(), 0);
}
