//! HTTP fetch with retry, backoff, empty-body handling and caching.
//!
//! [`FetchClient::fetch`] returns the *decompressed* bytes of one
//! remote resource, or a typed error. It never decodes records.
//!
//! Status semantics of the remote: a missing period is published as
//! 404 and surfaces as empty bytes (a data gap, not an error); an empty
//! 200 body is retried only when the policy asks for it; any other
//! status and any transport or decompression failure is retryable.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::cache::FileCache;
use crate::decompress::{decompress_bi5, DecompressError};

/// Configuration for the HTTP client itself (connection behavior, not
/// per-fetch policy).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout, applied per attempt.
    pub timeout: Duration,
    /// Connection timeout (separate from the request timeout).
    pub connect_timeout: Duration,
    /// Maximum idle pooled connections per host.
    pub pool_max_idle_per_host: usize,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 16,
            user_agent: format!("humboldt/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Delay policy between retry attempts.
///
/// `attempt` starts at 0 for the delay preceding the first retry.
#[derive(Clone)]
pub enum RetryDelay {
    /// `base_ms * 2^attempt` milliseconds.
    Exponential {
        /// Delay before the first retry, in milliseconds.
        base_ms: u64,
    },
    /// The same delay before every retry, in milliseconds.
    Fixed(u64),
    /// A caller-supplied `attempt -> milliseconds` function.
    Custom(Arc<dyn Fn(u32) -> u64 + Send + Sync>),
}

impl RetryDelay {
    /// Returns the delay in milliseconds before retry number `attempt`.
    #[must_use]
    pub fn delay_ms(&self, attempt: u32) -> u64 {
        match self {
            Self::Exponential { base_ms } => base_ms.saturating_mul(1u64 << attempt.min(20)),
            Self::Fixed(ms) => *ms,
            Self::Custom(f) => f(attempt),
        }
    }
}

impl Default for RetryDelay {
    fn default() -> Self {
        Self::Exponential { base_ms: 200 }
    }
}

impl std::fmt::Debug for RetryDelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exponential { base_ms } => {
                f.debug_struct("Exponential").field("base_ms", base_ms).finish()
            }
            Self::Fixed(ms) => f.debug_tuple("Fixed").field(ms).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Per-fetch behavior: retries, empty-body handling and caching.
#[derive(Debug, Clone, Default)]
pub struct FetchPolicy {
    /// Retries after the first attempt (`1 + max_retries` tries total).
    pub max_retries: u32,
    /// Delay policy between retries.
    pub retry_delay: RetryDelay,
    /// Whether an empty 200 body is retried instead of accepted.
    pub retry_on_empty: bool,
    /// Whether retry exhaustion is an error; if false the fetch
    /// degrades to empty bytes.
    pub fail_after_retries: bool,
    /// Optional read-through/write-through cache.
    pub cache: Option<FileCache>,
}

/// Errors that can occur during a fetch.
#[derive(Error, Debug)]
pub enum FetchError {
    /// All attempts failed and the policy demands failure.
    #[error("retries exhausted after {attempts} attempt(s): {cause}")]
    RetryExhausted {
        /// Total attempts made.
        attempts: u32,
        /// The failure of the final attempt.
        cause: Box<FetchError>,
    },

    /// The remote answered with an unexpected status.
    #[error("HTTP status {status}")]
    Http {
        /// The status code.
        status: u16,
    },

    /// The request itself failed (timeout, connect, transfer).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body was not a valid LZMA stream.
    #[error(transparent)]
    Decompress(#[from] DecompressError),

    /// The remote answered 200 with an empty body.
    #[error("empty response body")]
    EmptyBody,
}

/// A transport-level failure. All transport failures are retryable.
#[derive(Error, Debug, Clone)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

/// A raw HTTP response as seen by the fetch loop.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Bytes,
}

/// The wire seam: issues a single GET and returns status plus body.
///
/// The production implementation is [`HttpTransport`]; tests substitute
/// stubs to drive the fetch loop deterministically.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues a single GET request.
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

/// [`Transport`] over a pooled reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}

/// Outcome of a single attempt.
enum Attempt {
    /// 200 with a body that decompressed cleanly.
    Bytes(Bytes),
    /// 404: the remote has no file for this period.
    Missing,
    /// 200 with an empty body.
    Empty,
}

/// Fetches remote resources through a [`Transport`].
///
/// Cheap to clone; clones share the underlying transport.
#[derive(Clone)]
pub struct FetchClient {
    transport: Arc<dyn Transport>,
}

impl FetchClient {
    /// Creates a client over a pooled HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new(config)?)))
    }

    /// Creates a client with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(&ClientConfig::default())
    }

    /// Creates a client over an arbitrary transport.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetches one resource, returning its decompressed bytes.
    ///
    /// Empty bytes mean a data gap (404, accepted empty body, or
    /// exhausted retries with `fail_after_retries` off). Cache I/O is
    /// best-effort on both sides: a failed read logs and falls through
    /// to the network, a failed write logs and is ignored; neither is
    /// ever a [`FetchError`].
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::RetryExhausted`] when every attempt failed
    /// and the policy demands failure.
    pub async fn fetch(&self, url: &str, policy: &FetchPolicy) -> Result<Bytes, FetchError> {
        if let Some(cache) = &policy.cache {
            match cache.read(url) {
                Ok(Some(bytes)) => {
                    tracing::debug!(url, "cache hit");
                    return Ok(bytes);
                }
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(url, %error, "cache read failed, falling through to network");
                }
            }
        }

        let mut attempt: u32 = 0;
        loop {
            let failure = match self.attempt(url).await {
                Ok(Attempt::Bytes(bytes)) => {
                    self.write_through(url, &bytes, policy);
                    return Ok(bytes);
                }
                Ok(Attempt::Missing) => return Ok(Bytes::new()),
                Ok(Attempt::Empty) if !policy.retry_on_empty => return Ok(Bytes::new()),
                Ok(Attempt::Empty) => FetchError::EmptyBody,
                Err(error) => error,
            };

            if attempt >= policy.max_retries {
                if policy.fail_after_retries {
                    return Err(FetchError::RetryExhausted {
                        attempts: attempt + 1,
                        cause: Box::new(failure),
                    });
                }
                tracing::debug!(url, error = %failure, "retries exhausted, treating as gap");
                return Ok(Bytes::new());
            }

            let delay = policy.retry_delay.delay_ms(attempt);
            tracing::debug!(url, attempt, delay_ms = delay, error = %failure, "retrying fetch");
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            attempt += 1;
        }
    }

    /// One network attempt: GET, classify the status, decompress.
    async fn attempt(&self, url: &str) -> Result<Attempt, FetchError> {
        let response = self.transport.get(url).await?;
        match response.status {
            404 => Ok(Attempt::Missing),
            200 if response.body.is_empty() => Ok(Attempt::Empty),
            200 => {
                let decompressed = decompress_bi5(&response.body)?;
                Ok(Attempt::Bytes(decompressed.into()))
            }
            status => Err(FetchError::Http { status }),
        }
    }

    /// Best-effort cache write of non-empty network-origin bytes.
    fn write_through(&self, url: &str, bytes: &Bytes, policy: &FetchPolicy) {
        if bytes.is_empty() {
            return;
        }
        if let Some(cache) = &policy.cache {
            if let Err(error) = cache.write(url, bytes) {
                tracing::warn!(url, %error, "cache write failed");
            }
        }
    }
}

impl std::fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchClient").finish_non_exhaustive()
    }
}
