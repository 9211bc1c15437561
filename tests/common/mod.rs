//! Shared fixtures: RSA signing keys, token signing and in-memory key sets

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{RSA_PKCS1_SHA256, RSA_PKCS1_SHA384, RsaEncoding, RsaKeyPair};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use cognito_verifier::{Error, FetchFuture, KeySetCache, KeySetSource, Result};
use rsa::RsaPrivateKey;
use rsa::pkcs8::EncodePrivateKey;
use rsa::traits::PublicKeyParts;
use serde_json::{Value, json};

pub const JWKS_URL: &str = "https://cognito-idp.eu-west-1.amazonaws.com/eu-west-1_test/.well-known/jwks.json";
pub const ISSUER: &str = "https://cognito-idp.eu-west-1.amazonaws.com/eu-west-1_test";
pub const CLIENT_ID: &str = "client-123";

/// An RSA key pair able to sign tokens and publish itself as a JWK
pub struct TestKey {
    keypair: RsaKeyPair,
    n: Vec<u8>,
    e: Vec<u8>,
}

impl TestKey {
    fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let private_key = RsaPrivateKey::new(&mut rng, 2048).expect("failed to generate key");
        let public_key = private_key.to_public_key();

        let pkcs8_doc = private_key
            .to_pkcs8_der()
            .expect("failed to serialize private key");
        let keypair =
            RsaKeyPair::from_pkcs8(pkcs8_doc.as_bytes()).expect("failed to load RsaKeyPair");

        Self {
            keypair,
            n: public_key.n().to_bytes_be(),
            e: public_key.e().to_bytes_be(),
        }
    }

    /// JWK for this key under `kid`
    pub fn jwk(&self, kid: &str, alg: Option<&str>) -> Value {
        let mut jwk = json!({
            "kty": "RSA",
            "kid": kid,
            "use": "sig",
            "n": URL_SAFE_NO_PAD.encode(&self.n),
            "e": URL_SAFE_NO_PAD.encode(&self.e),
        });
        if let Some(alg) = alg {
            jwk["alg"] = json!(alg);
        }
        jwk
    }

    fn sign(&self, encoding: &'static dyn RsaEncoding, message: &[u8]) -> Vec<u8> {
        let mut signature = vec![0u8; self.keypair.public_modulus_len()];
        self.keypair
            .sign(encoding, &SystemRandom::new(), message, &mut signature)
            .expect("failed to sign");
        signature
    }
}

/// First signing key, generated once per test binary
pub fn key_a() -> &'static TestKey {
    static KEY: OnceLock<TestKey> = OnceLock::new();
    KEY.get_or_init(TestKey::generate)
}

/// Second, unrelated signing key
pub fn key_b() -> &'static TestKey {
    static KEY: OnceLock<TestKey> = OnceLock::new();
    KEY.get_or_init(TestKey::generate)
}

pub fn now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Cognito-shaped id token claims, valid for an hour
pub fn id_token_claims(audience: &str) -> Value {
    let now = now();
    json!({
        "sub": "aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee",
        "aud": audience,
        "iss": ISSUER,
        "token_use": "id",
        "auth_time": now - 60,
        "iat": now - 60,
        "exp": now + 3600,
        "cognito:username": "alice",
        "email": "alice@example.com",
        "email_verified": true,
    })
}

/// Sign `claims` with RS256 under `kid` (omitted from the header when `None`)
pub fn sign_token(key: &TestKey, kid: Option<&str>, claims: &Value) -> String {
    sign_token_with(key, "RS256", kid, claims)
}

pub fn sign_token_with(key: &TestKey, alg: &str, kid: Option<&str>, claims: &Value) -> String {
    let mut header = json!({ "alg": alg, "typ": "JWT" });
    if let Some(kid) = kid {
        header["kid"] = json!(kid);
    }

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    );

    let encoding: &'static dyn RsaEncoding = match alg {
        "RS384" => &RSA_PKCS1_SHA384,
        _ => &RSA_PKCS1_SHA256,
    };
    let signature = key.sign(encoding, signing_input.as_bytes());

    format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature))
}

/// Token with arbitrary header and an arbitrary signature segment
pub fn unsigned_token(header: &Value, claims: &Value, signature: &[u8]) -> String {
    format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(claims.to_string()),
        URL_SAFE_NO_PAD.encode(signature)
    )
}

/// JWKS document containing `keys`
pub fn jwks(keys: &[Value]) -> String {
    json!({ "keys": keys }).to_string()
}

/// In-memory key set endpoint that counts fetches
pub struct MemorySource {
    body: Mutex<Result<String>>,
    fail_next: Mutex<Option<Error>>,
    calls: AtomicUsize,
}

impl MemorySource {
    pub fn new(body: String) -> Arc<Self> {
        Arc::new(Self {
            body: Mutex::new(Ok(body)),
            fail_next: Mutex::new(None),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(error: Error) -> Arc<Self> {
        Arc::new(Self {
            body: Mutex::new(Err(error)),
            fail_next: Mutex::new(None),
            calls: AtomicUsize::new(0),
        })
    }

    /// Publish a new document
    pub fn publish(&self, body: String) {
        *self.body.lock().unwrap() = Ok(body);
    }

    /// Fail the next fetch only, then serve the published document again
    pub fn fail_next(&self, error: Error) {
        *self.fail_next.lock().unwrap() = Some(error);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl KeySetSource for MemorySource {
    fn fetch<'a>(&'a self, _url: &'a str) -> FetchFuture<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let body = match self.fail_next.lock().unwrap().take() {
            Some(error) => Err(error),
            None => self.body.lock().unwrap().clone(),
        };
        Box::pin(async move {
            tokio::task::yield_now().await;
            body.map(String::into_bytes)
        })
    }
}

/// Cache over a [`MemorySource`] publishing `document`
pub fn memory_cache(document: String) -> (Arc<KeySetCache>, Arc<MemorySource>) {
    let source = MemorySource::new(document);
    let cache = KeySetCache::new(JWKS_URL, source.clone()).expect("valid url");
    (Arc::new(cache), source)
}
