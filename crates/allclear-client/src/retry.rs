//! Retry with exponential back-off and jitter for the facility client.
//!
//! Off by default: with `max_retries = 0` the first failure is returned and
//! the caller decides whether to offer a manual retry.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

const MAX_DELAY_MS: u64 = 30_000;

/// Whether a failed search is worth sending again automatically.
pub(crate) fn is_retriable(err: &ClientError) -> bool {
    err.is_transient()
}

/// Back-off schedule: `base_ms × 2^(n-1)` for the n-th retry, capped at
/// [`MAX_DELAY_MS`] before jitter.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Backoff {
    pub(crate) max_retries: u32,
    pub(crate) base_ms: u64,
}

impl Backoff {
    /// Un-jittered delay before retry number `retry` (1-based).
    fn nominal_ms(self, retry: u32) -> u64 {
        let exponent = retry.saturating_sub(1).min(10);
        self.base_ms.saturating_mul(1 << exponent).min(MAX_DELAY_MS)
    }

    /// Nominal delay scaled by a random factor in `[0.75, 1.25)`.
    fn jittered(self, retry: u32) -> Duration {
        let factor = 0.75 + rand::random::<f64>() * 0.5;
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let ms = (self.nominal_ms(retry) as f64 * factor) as u64;
        Duration::from_millis(ms)
    }
}

/// Runs `operation`, sending it again on retriable errors until
/// `policy.max_retries` extra attempts are used up.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: Backoff,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut retry = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if retry == policy.max_retries || !is_retriable(&err) {
            return Err(err);
        }

        retry += 1;
        let delay = policy.jittered(retry);
        tracing::warn!(
            retry,
            max_retries = policy.max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "retrying facility search"
        );
        tokio::time::sleep(delay).await;
    }
}
