use std::time::Duration;

use client::ApiError;

/// Retry policy for cached reads.
///
/// The decision is a pure function of the attempt number and the error, so
/// it can be tested without any network in play. Mutations never consult it;
/// replaying a write blindly is never safe.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// `attempt` counts completed tries, starting at 0.
    ///
    /// 4xx responses are the caller's fault and are never retried. Local
    /// storage failures are not network conditions, retrying cannot fix
    /// them. Everything else (timeout, transport, 5xx) retries until the
    /// budget runs out.
    pub fn should_retry(&self, attempt: u32, error: &ApiError) -> bool {
        if attempt >= self.max_retries {
            return false;
        }
        match error {
            ApiError::Server { status, .. } => !status.is_client_error(),
            ApiError::Storage(_) | ApiError::InvalidBaseUrl(_) => false,
            ApiError::Timeout | ApiError::Network(_) => true,
        }
    }

    /// Exponential backoff, doubling per attempt, capped at `max_delay`.
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}
