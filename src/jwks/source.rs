//! Where key set documents come from

use crate::error::{Error, Result};
use crate::limits::MAX_JWKS_RESPONSE_SIZE;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Default timeout for a key set fetch
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Future returned by [`KeySetSource::fetch`]
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>>;

/// Fetches the raw bytes of a key set document
///
/// Implementations report every failure as [`Error::FetchError`] with a
/// component prefix (`"network: ..."`, `"http: status 404"`).
pub trait KeySetSource: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a str) -> FetchFuture<'a>;
}

/// [`KeySetSource`] backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpKeySetSource {
    client: reqwest::Client,
}

impl HttpKeySetSource {
    /// Build a client whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::ConfigurationInvalid(format!("http client: {e}")))?;
        Ok(Self { client })
    }

    /// Use an existing client, keeping its connection pool and settings
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl KeySetSource for HttpKeySetSource {
    fn fetch<'a>(&'a self, url: &'a str) -> FetchFuture<'a> {
        Box::pin(async move {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| Error::FetchError(format!("network: {e}")))?;

            if !response.status().is_success() {
                return Err(Error::FetchError(format!(
                    "http: status {}",
                    response.status().as_u16()
                )));
            }

            if let Some(length) = response.content_length() {
                if length > MAX_JWKS_RESPONSE_SIZE as u64 {
                    return Err(Error::FetchError(format!(
                        "jwks: response too large: {length} bytes (maximum: {MAX_JWKS_RESPONSE_SIZE} bytes)"
                    )));
                }
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| Error::FetchError(format!("network: {e}")))?;

            Ok(bytes.to_vec())
        })
    }
}
