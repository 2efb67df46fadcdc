//! Exponential back-off with jitter for completion requests.
//!
//! Only transport failures, 429 and 5xx are retried. Anything the model said
//! (empty or malformed output) is returned immediately: asking again costs a
//! full generation and rarely fixes it.

use std::future::Future;
use std::time::Duration;

use crate::error::LlmError;

const MAX_DELAY_MS: u64 = 30_000;

pub(crate) fn is_retriable(err: &LlmError) -> bool {
    match err {
        LlmError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        LlmError::RateLimited { .. } => true,
        LlmError::UnexpectedStatus { status, .. } => *status >= 500,
        LlmError::InvalidApiKey
        | LlmError::EmptyResponse
        | LlmError::InvalidJson { .. }
        | LlmError::Validation { .. }
        | LlmError::TooFewPrompts { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The n-th retry waits `backoff_base_ms * 2^(n-1)` ms ±25 %, capped at 30 s.
/// A `RateLimited` error's `retry_after_secs` is used instead when it is longer.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let floor_ms = match &err {
                    LlmError::RateLimited { retry_after_secs } if backoff_base_ms > 0 => {
                        retry_after_secs.saturating_mul(1_000)
                    }
                    _ => 0,
                };
                let capped = computed.max(floor_ms).min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "completion request failed, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
