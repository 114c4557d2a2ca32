//! Retrying transport: re-executes transient failures with quadratic backoff.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use super::transport::{HttpRequest, HttpResponse, Transport};
use crate::error::TransportError;

/// Unit of the backoff delay; attempt `i` waits `i² × BACKOFF_UNIT_MS`.
pub const BACKOFF_UNIT_MS: u64 = 100;

/// Delay slept after the failed attempt with the given 0-based index.
pub fn backoff_delay(attempt: u32) -> Duration {
    let attempt = u64::from(attempt);
    Duration::from_millis(attempt.saturating_mul(attempt).saturating_mul(BACKOFF_UNIT_MS))
}

/// Whether an attempt's outcome ends the retry loop.
///
/// Any response below 500 is terminal, client errors included.
fn is_terminal(outcome: &Result<HttpResponse, TransportError>) -> bool {
    matches!(outcome, Ok(response) if response.status.as_u16() < 500)
}

/// Wraps a [`Transport`] and retries transport errors and 5xx responses.
///
/// The request body is detached once before the first attempt and a copy of
/// the same bytes is installed on every attempt. When attempts run out the
/// last outcome is returned as-is: a 5xx response stays a response, a
/// transport error stays that error.
pub struct RetryingTransport<T> {
    inner: T,
    retries: u32,
}

impl<T: Transport> RetryingTransport<T> {
    pub fn new(inner: T, retries: u32) -> Self {
        Self { inner, retries }
    }
}

#[async_trait]
impl<T: Transport> Transport for RetryingTransport<T> {
    async fn execute(&self, mut request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let body = request.body.take();
        let mut attempt: u32 = 0;

        loop {
            let mut current = request.clone();
            current.body = body.clone();

            let outcome = self.inner.execute(current).await;
            if is_terminal(&outcome) || attempt >= self.retries {
                return outcome;
            }

            let delay = backoff_delay(attempt);
            match &outcome {
                Ok(response) => debug!(
                    "{} {}: attempt {}/{} returned {}, retrying in {}ms...",
                    request.method,
                    request.url,
                    attempt + 1,
                    self.retries.saturating_add(1),
                    response.status,
                    delay.as_millis()
                ),
                Err(e) => debug!(
                    "{} {}: attempt {}/{} failed ({}), retrying in {}ms...",
                    request.method,
                    request.url,
                    attempt + 1,
                    self.retries.saturating_add(1),
                    e,
                    delay.as_millis()
                ),
            }

            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
