use super::{CompletionRequest, TextOracle};
use crate::config::OracleConfig;
use crate::error::OracleError;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &OracleConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
        }
    }

    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (0-based), doubling each time.
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry.min(31)).unwrap_or(u32::MAX);
        self.initial_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }
}

/// Retries retryable oracle failures with exponential backoff.
pub struct RetryingOracle<O> {
    inner: O,
    policy: RetryPolicy,
}

impl<O: TextOracle> RetryingOracle<O> {
    pub fn new(inner: O, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }
}

impl<O: TextOracle> TextOracle for RetryingOracle<O> {
    fn complete(&self, request: &CompletionRequest) -> Result<String, OracleError> {
        let mut retry = 0;
        loop {
            match self.inner.complete(request) {
                Ok(text) => return Ok(text),
                Err(err) if err.is_retryable() && retry < self.policy.max_retries => {
                    let delay = self.policy.backoff_for(retry);
                    log::warn!(
                        "Oracle call failed ({}), retry {}/{} in {:?}",
                        err,
                        retry + 1,
                        self.policy.max_retries,
                        delay
                    );
                    std::thread::sleep(delay);
                    retry += 1;
                }
                Err(err) => {
                    log::error!("Oracle call failed: {}", err);
                    return Err(err);
                }
            }
        }
    }
}
