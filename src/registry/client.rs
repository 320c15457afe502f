//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - A fixed 15 second timeout per request and a bump User-Agent
//! - Retry with backoff (3 attempts total)
//! - Rate-limit aware delays that honour a numeric `Retry-After` header

use crate::error::RegistryError;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

/// Timeout for a single HTTP request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("bump/", env!("CARGO_PKG_VERSION"));

/// Total attempts per request, including the first
const MAX_ATTEMPTS: u32 = 3;

/// Delay state before the first failure
const INITIAL_DELAY: Duration = Duration::from_millis(1000);

/// Upper bound for computed (non Retry-After) delays
const MAX_DELAY: Duration = Duration::from_secs(10);

/// Backoff schedule for registry requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            initial_delay: INITIAL_DELAY,
            max_delay: MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            max_delay,
        }
    }

    /// Delay to wait after `attempt` (1-based) failed with `error`
    ///
    /// Returns `None` once all attempts are used. Rate limits use the
    /// server's `Retry-After` verbatim, or double the delay; any other error
    /// grows the delay by half. Computed delays are capped at `max_delay`.
    pub fn next_delay(
        &self,
        attempt: u32,
        delay: Duration,
        error: &RegistryError,
    ) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }

        if error.is_rate_limit() {
            Some(
                error
                    .retry_after()
                    .unwrap_or_else(|| (delay * 2).min(self.max_delay)),
            )
        } else {
            Some(delay.mul_f64(1.5).min(self.max_delay))
        }
    }

    /// Runs `op` until it succeeds or the attempts are exhausted
    pub async fn run<T, F, Fut>(&self, package: &str, mut op: F) -> Result<T, RegistryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RegistryError>>,
    {
        let mut attempt = 0;
        let mut delay = self.initial_delay;

        loop {
            let error = match op().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };
            attempt += 1;

            let Some(next) = self.next_delay(attempt, delay, &error) else {
                return Err(error);
            };

            tracing::warn!(
                package,
                attempt,
                max_attempts = self.max_attempts,
                delay_ms = next.as_millis() as u64,
                rate_limited = error.is_rate_limit(),
                "request failed, retrying: {}",
                error
            );
            tokio::time::sleep(next).await;
            delay = next;
        }
    }
}

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    retry: RetryPolicy,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_config(REQUEST_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                RegistryError::network_error(
                    "",
                    "HTTP client",
                    format!("failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            client,
            retry: RetryPolicy::default(),
        })
    }

    /// Replace the backoff schedule
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// GET `url` and decode the JSON body, retrying per the policy
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        package: &str,
        registry: &str,
    ) -> Result<T, RegistryError> {
        self.retry
            .run(package, || self.get_json_once(url, package, registry))
            .await
    }

    async fn get_json_once<T: DeserializeOwned>(
        &self,
        url: &Url,
        package: &str,
        registry: &str,
    ) -> Result<T, RegistryError> {
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                RegistryError::timeout(package, registry)
            } else {
                RegistryError::network_error(package, registry, e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(RegistryError::rate_limited(package, registry, retry_after));
        }
        if status == StatusCode::NOT_FOUND {
            return Err(RegistryError::package_not_found(package, registry));
        }
        if !status.is_success() {
            return Err(RegistryError::network_error(
                package,
                registry,
                format!("HTTP {}", status),
            ));
        }

        response.json::<T>().await.map_err(|e| {
            RegistryError::invalid_response(package, registry, format!("failed to parse JSON: {}", e))
        })
    }
}
