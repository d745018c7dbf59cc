//! Retry logic with exponential backoff
//!
//! Only transport-level failures are retried:
//! - Exponential backoff with up to 10% jitter: 500ms, 1s, 2s, capped at 4s
//! - Per-attempt timeout (30s) and a total budget across attempts (2m)
//!
//! A response with any status code ends the retry loop. Creation calls are
//! not idempotent and go through [`RetryExecutor::execute_once`] instead:
//! a timed-out or reset POST may already have created a pet.

use crate::error::{ApiError, ApiResult};
use crate::logging::{log_debug, log_error};

use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Retry policy configuration for PetFriends requests
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Initial delay before first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Maximum total operation time
    pub total_timeout: Duration,
    /// Request timeout for individual attempts
    pub request_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(4),
            backoff_multiplier: 2.0,
            total_timeout: Duration::from_secs(120),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Policy that makes exactly one attempt
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }
}

/// Retry executor that applies backoff between failed attempts
#[derive(Debug)]
pub(crate) struct RetryExecutor {
    pub(crate) policy: RetryPolicy,
}

impl Default for RetryExecutor {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Execute an operation, retrying transient failures
    pub async fn execute<F, Fut, T>(&self, operation: F) -> ApiResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = ApiResult<T>>,
    {
        let start_time = Instant::now();
        let mut attempt = 0;
        let mut last_error = None;

        while attempt < self.policy.max_attempts.max(1) {
            self.check_total_timeout(&start_time)?;

            attempt += 1;

            match self
                .execute_single_attempt(&operation, attempt, &mut last_error)
                .await
            {
                Ok(response) => return Ok(response),
                Err(should_continue) => {
                    if !should_continue {
                        break;
                    }
                }
            }
        }

        self.handle_exhausted_retries(attempt, last_error, &start_time)
    }

    /// Execute an operation exactly once under the per-attempt timeout
    pub async fn execute_once<F, Fut, T>(&self, operation: F) -> ApiResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = ApiResult<T>>,
    {
        match tokio::time::timeout(self.policy.request_timeout, operation()).await {
            Ok(result) => result,
            Err(_elapsed) => Err(ApiError::timeout(self.policy.request_timeout.as_secs())),
        }
    }

    /// Execute a single attempt and return whether to continue retrying
    async fn execute_single_attempt<F, Fut, T>(
        &self,
        operation: &F,
        attempt: u32,
        last_error: &mut Option<ApiError>,
    ) -> Result<T, bool>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = ApiResult<T>>,
    {
        log_debug!(
            attempt = attempt,
            max_attempts = self.policy.max_attempts,
            "Executing request with retry logic"
        );

        let operation_start = Instant::now();
        let result = tokio::time::timeout(self.policy.request_timeout, operation()).await;

        match result {
            Ok(Ok(response)) => {
                log_debug!(
                    attempt = attempt,
                    duration_ms = operation_start.elapsed().as_millis(),
                    "Request succeeded"
                );
                Ok(response)
            }
            Ok(Err(error)) => {
                let should_retry = error.is_retryable();
                *last_error = Some(error);
                Err(self.backoff_if_allowed(should_retry, attempt, last_error).await)
            }
            Err(_elapsed) => {
                *last_error = Some(ApiError::timeout(self.policy.request_timeout.as_secs()));
                Err(self.backoff_if_allowed(true, attempt, last_error).await)
            }
        }
    }

    async fn backoff_if_allowed(
        &self,
        should_retry: bool,
        attempt: u32,
        last_error: &Option<ApiError>,
    ) -> bool {
        if !should_retry || attempt >= self.policy.max_attempts {
            return false;
        }

        let delay = self.calculate_delay(attempt);
        log_debug!(
            attempt = attempt,
            max_attempts = self.policy.max_attempts,
            delay_ms = delay.as_millis(),
            error = ?last_error.as_ref(),
            "Request failed, retrying after delay"
        );
        sleep(delay).await;
        true
    }

    fn check_total_timeout(&self, start_time: &Instant) -> ApiResult<()> {
        if start_time.elapsed() >= self.policy.total_timeout {
            return Err(ApiError::timeout(self.policy.total_timeout.as_secs()));
        }
        Ok(())
    }

    fn handle_exhausted_retries<T>(
        &self,
        attempt: u32,
        last_error: Option<ApiError>,
        start_time: &Instant,
    ) -> ApiResult<T> {
        let final_error = last_error.unwrap_or_else(|| {
            ApiError::request_failed("Maximum retry attempts exceeded".to_string(), None)
        });

        log_error!(
            attempts = attempt,
            total_duration_ms = start_time.elapsed().as_millis(),
            error = %final_error,
            "Request failed after all retry attempts"
        );

        Err(final_error)
    }

    /// Calculate delay for exponential backoff
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let delay_seconds =
            self.policy.initial_delay.as_secs_f64() * self.policy.backoff_multiplier.powi(exponent);

        let delay = Duration::from_secs_f64(delay_seconds.min(self.policy.max_delay.as_secs_f64()));

        // Up to 10% jitter
        let jitter = fastrand::f64() * 0.1;
        Duration::from_secs_f64(delay.as_secs_f64() * (1.0 + jitter))
    }
}
