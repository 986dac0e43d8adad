/// HTTP client for the Moltbook read API.
///
/// The client owns a [`Transport`] (how bytes move) and a [`Sleeper`] (how
/// waiting happens). Both are traits so the retry loop can be driven without
/// a network or a clock.
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::errors::ApiError;
use super::models::{
    Comment, CommentList, ErrorEnvelope, Post, PostEnvelope, PostPage, SearchResult,
    SearchResults, SubmoltList,
};
use super::payload::Fetched;
use super::query::{ApiRequest, CommentSort, Operation, PostSort, SearchType};
use crate::config::Settings;

/// Statuses retried with backoff.
const RETRY_STATUSES: [u16; 4] = [500, 502, 503, 504];

/// Status for "too many requests".
const STATUS_RATE_LIMITED: u16 = 429;

/// Status for "not found".
const STATUS_NOT_FOUND: u16 = 404;

/// A response as seen by the retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    /// Raw `Retry-After` header value, if the server sent one.
    pub retry_after: Option<String>,
    pub body: String,
}

/// Transport-level failure, before any HTTP status exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request exceeded its timeout.
    Timeout,
    /// The host could not be reached.
    Connect(String),
    /// Anything else the HTTP stack reported (body read, redirect loop, ...).
    Other(String),
}

/// Sends one GET and returns whatever came back.
pub trait Transport {
    /// # Errors
    ///
    /// Returns `TransportError` when no HTTP response was obtained.
    fn get(&self, url: &Url) -> Result<RawResponse, TransportError>;
}

/// Blocks the current thread.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Real sleeping.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Blocking `reqwest` transport.
#[derive(Debug)]
pub struct HttpTransport {
    inner: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Build a transport with the configured timeout.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialised.
    pub fn new(settings: &Settings) -> reqwest::Result<Self> {
        let inner = reqwest::blocking::Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("moltbook-reader/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { inner })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &Url) -> Result<RawResponse, TransportError> {
        let resp = self
            .inner
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(classify_reqwest)?;
        let status = resp.status().as_u16();
        let retry_after = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = resp.text().map_err(classify_reqwest)?;
        Ok(RawResponse {
            status,
            retry_after,
            body,
        })
    }
}

fn classify_reqwest(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

/// Retry constants.
///
/// Timeouts and 5xx responses get `max_attempts` tries in total, waiting
/// `base_delay * 2^(n-1)` after the n-th failure (1s, 2s). A 429 is honored
/// `rate_limit_retries` times, waiting `Retry-After` (capped) or the
/// backoff delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub rate_limit_retries: u32,
    pub max_retry_after: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            rate_limit_retries: 1,
            max_retry_after: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Delay after the `attempt`-th failure (1-based).
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(1u32 << attempt.saturating_sub(1).min(16))
    }

    fn rate_limit_wait(&self, retry_after: Option<u64>, attempt: u32) -> Duration {
        retry_after.map_or_else(
            || self.backoff(attempt),
            |secs| Duration::from_secs(secs).min(self.max_retry_after),
        )
    }
}

/// Parse a `Retry-After` header given in delta-seconds. HTTP-date values
/// are not supported and fall back to backoff.
fn parse_retry_after(value: Option<&str>) -> Option<u64> {
    value.and_then(|v| v.trim().parse::<u64>().ok())
}

/// Moltbook API client. Construct one per invocation; it holds no state
/// between requests beyond its transport.
pub struct Client<T: Transport = HttpTransport, S: Sleeper = ThreadSleeper> {
    base_url: Url,
    transport: T,
    sleeper: S,
    policy: RetryPolicy,
}

impl Client {
    /// Client with the real transport and sleeper.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP stack cannot be initialised.
    pub fn from_settings(settings: &Settings) -> reqwest::Result<Self> {
        Ok(Self::with_parts(
            settings.base_url.clone(),
            HttpTransport::new(settings)?,
            ThreadSleeper,
            RetryPolicy::default(),
        ))
    }
}

impl<T: Transport, S: Sleeper> Client<T, S> {
    #[must_use]
    pub fn with_parts(base_url: Url, transport: T, sleeper: S, policy: RetryPolicy) -> Self {
        Self {
            base_url,
            transport,
            sleeper,
            policy,
        }
    }

    /// `GET /posts`.
    ///
    /// # Errors
    ///
    /// `Validation` for an out-of-range limit, otherwise any request failure.
    pub fn list_posts(
        &self,
        sort: PostSort,
        limit: u32,
        offset: u64,
    ) -> Result<Fetched<PostPage>, ApiError> {
        self.get(&ApiRequest::list_posts(sort, limit, offset)?)
    }

    /// `GET /submolts`.
    ///
    /// # Errors
    ///
    /// Any request failure.
    pub fn list_submolts(&self) -> Result<Fetched<SubmoltList>, ApiError> {
        self.get(&ApiRequest::list_submolts())
    }

    /// `GET /search`.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank query or bad limit, otherwise any request failure.
    pub fn search(
        &self,
        query: &str,
        limit: u32,
        kind: Option<SearchType>,
    ) -> Result<Fetched<Vec<SearchResult>>, ApiError> {
        let fetched: Fetched<SearchResults> = self.get(&ApiRequest::search(query, limit, kind)?)?;
        Ok(fetched.map(|r| r.results))
    }

    /// `GET /posts/{id}`.
    ///
    /// # Errors
    ///
    /// `NotFound` when the post does not exist, otherwise any request failure.
    pub fn fetch_post(&self, id: &str) -> Result<Fetched<Post>, ApiError> {
        let request = ApiRequest::fetch_post(id)?;
        let fetched: Fetched<PostEnvelope> = self.get(&request)?;
        fetched.try_map(|env| {
            env.post.ok_or_else(|| ApiError::NotFound {
                resource: request.operation.resource().to_owned(),
            })
        })
    }

    /// `GET /posts/{id}/comments`.
    ///
    /// # Errors
    ///
    /// `NotFound` when the post does not exist, otherwise any request failure.
    pub fn fetch_comments(
        &self,
        id: &str,
        sort: CommentSort,
    ) -> Result<Fetched<Vec<Comment>>, ApiError> {
        let fetched: Fetched<CommentList> = self.get(&ApiRequest::fetch_comments(id, sort)?)?;
        Ok(fetched.map(CommentList::into_vec))
    }

    /// Send `request`, then validate the body against the envelope and
    /// the shape `D`.
    fn get<D: DeserializeOwned>(&self, request: &ApiRequest) -> Result<Fetched<D>, ApiError> {
        let url = request.url(&self.base_url)?;
        let resp = self.send_with_retry(&url)?;
        let raw = decode_envelope(&resp, request.operation)?;
        let data = D::deserialize(&raw)
            .map_err(|e| ApiError::InvalidResponse(format!("unexpected shape: {e}")))?;
        Ok(Fetched { raw, data })
    }

    /// The bounded retry loop. Returns the first response that is neither
    /// retryable nor out of retries; classification of its status happens
    /// in [`decode_envelope`].
    fn send_with_retry(&self, url: &Url) -> Result<RawResponse, ApiError> {
        let mut attempt: u32 = 0;
        let mut rate_limit_waits: u32 = 0;

        loop {
            attempt += 1;
            let started = Instant::now();
            tracing::debug!(%url, attempt, "GET");

            match self.transport.get(url) {
                Ok(resp) if resp.status == STATUS_RATE_LIMITED => {
                    let retry_after = parse_retry_after(resp.retry_after.as_deref());
                    if rate_limit_waits >= self.policy.rate_limit_retries {
                        return Err(ApiError::RateLimited { retry_after });
                    }
                    rate_limit_waits += 1;
                    // A rate-limit wait is not a failed attempt.
                    attempt -= 1;
                    let wait = self.policy.rate_limit_wait(retry_after, rate_limit_waits);
                    tracing::warn!(?wait, "rate limited, waiting before retry");
                    self.sleeper.sleep(wait);
                }
                Ok(resp)
                    if RETRY_STATUSES.contains(&resp.status)
                        && attempt < self.policy.max_attempts =>
                {
                    let wait = self.policy.backoff(attempt);
                    tracing::warn!(status = resp.status, attempt, ?wait, "server error, retrying");
                    self.sleeper.sleep(wait);
                }
                Ok(resp) => {
                    tracing::debug!(
                        status = resp.status,
                        bytes = resp.body.len(),
                        elapsed = ?started.elapsed(),
                        "response"
                    );
                    return Ok(resp);
                }
                Err(TransportError::Timeout) if attempt < self.policy.max_attempts => {
                    let wait = self.policy.backoff(attempt);
                    tracing::warn!(attempt, ?wait, "request timed out, retrying");
                    self.sleeper.sleep(wait);
                }
                Err(TransportError::Timeout) => {
                    return Err(ApiError::NetworkTimeout { attempts: attempt });
                }
                Err(TransportError::Connect(msg)) => return Err(ApiError::Connection(msg)),
                Err(TransportError::Other(msg)) => {
                    return Err(ApiError::InvalidResponse(msg));
                }
            }
        }
    }
}

/// Turn a final response into the validated JSON body, or the error its
/// status and envelope describe.
fn decode_envelope(resp: &RawResponse, operation: Operation) -> Result<Value, ApiError> {
    if resp.status == STATUS_NOT_FOUND {
        return Err(ApiError::NotFound {
            resource: operation.resource().to_owned(),
        });
    }

    let parsed: Result<Value, _> = serde_json::from_str(&resp.body);

    let value = match parsed {
        Ok(v) => v,
        Err(e) if (200..300).contains(&resp.status) => {
            return Err(ApiError::InvalidResponse(format!("body is not JSON: {e}")));
        }
        Err(_) => return Err(ApiError::Http { status: resp.status }),
    };

    if value.get("success").and_then(Value::as_bool) == Some(false) {
        let env: ErrorEnvelope = serde_json::from_value(value).unwrap_or(ErrorEnvelope {
            error: None,
            hint: None,
        });
        let says_not_found = env
            .error
            .as_deref()
            .is_some_and(|e| e.to_ascii_lowercase().contains("not found"));
        if operation.is_lookup() && says_not_found {
            return Err(ApiError::NotFound {
                resource: operation.resource().to_owned(),
            });
        }
        return Err(ApiError::Api {
            message: env
                .error
                .unwrap_or_else(|| format!("request failed (HTTP {})", resp.status)),
            hint: env.hint,
        });
    }

    if !(200..300).contains(&resp.status) {
        return Err(ApiError::Http { status: resp.status });
    }

    Ok(value)
}
