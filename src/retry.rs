//! Retry and backoff policy for document downloads.
//!
//! Encapsulates error classification (timeouts, throttling, connection
//! failures, retryable server statuses) and exponential backoff decisions
//! so the fetch loop can stay small.

use std::time::Duration;

/// High-level classification of a failure for retry purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Request timed out (connect/read)
    Timeout,
    /// Server asked us to slow down (429, 503)
    Throttled,
    /// Network-level failure (connection refused, reset, DNS)
    Connection,
    /// Transient server status that is retryable (500, 502, 504)
    ServerError(u16),
    /// Anything else — permanent HTTP statuses, filesystem errors,
    /// malformed URLs. Never retried.
    Other,
}

/// Decision returned by the retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error
    NoRetry,
    /// Retry after the given delay
    RetryAfter(Duration),
}

/// Exponential backoff policy with caps
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first)
    pub max_attempts: u32,
    /// Base delay for backoff
    pub base_delay: Duration,
    /// Upper bound on backoff delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Compute the backoff decision for a given attempt and error kind.
    ///
    /// `attempt` is 1-based (1 = first attempt). Returns
    /// `RetryDecision::NoRetry` once `max_attempts` have been used up or the
    /// error is not transient.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }

        match kind {
            ErrorKind::Other => RetryDecision::NoRetry,
            ErrorKind::Timeout
            | ErrorKind::Throttled
            | ErrorKind::Connection
            | ErrorKind::ServerError(_) => {
                // base * 2^(attempt-1), capped
                let exp = 1u32 << attempt.saturating_sub(1).min(8);
                let raw = self.base_delay.saturating_mul(exp);
                RetryDecision::RetryAfter(raw.min(self.max_delay))
            }
        }
    }
}

/// Classify an HTTP status code for retry decisions.
///
/// The transient set is exactly {429, 500, 502, 503, 504}; every other
/// status (404 included) is permanent.
pub fn classify_status(status: u16) -> ErrorKind {
    match status {
        429 | 503 => ErrorKind::Throttled,
        500 | 502 | 504 => ErrorKind::ServerError(status),
        _ => ErrorKind::Other,
    }
}

/// Classify a reqwest transport error for retry decisions
pub fn classify_reqwest(e: &reqwest::Error) -> ErrorKind {
    if e.is_timeout() {
        return ErrorKind::Timeout;
    }
    if e.is_builder() || e.is_redirect() {
        // Malformed URL or redirect policy violation — retrying cannot help
        return ErrorKind::Other;
    }
    if e.is_connect() || e.is_request() || e.is_body() || e.is_decode() {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}
