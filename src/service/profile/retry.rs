//! Retry policy for model calls
//!
//! Only the call itself is retried. A call that returns a response is final even if
//! the response later fails to parse.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::Instant;

use crate::service::llm::ModelError;

/// Waits between attempts; injectable so tests do not sleep for real
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Model call failed on every attempt the policy allowed
#[derive(Debug, Error)]
#[error("model call failed after {attempts} attempt(s): {source}")]
pub struct RetryError {
    pub attempts: u32,
    #[source]
    pub source: ModelError,
}

/// Bounded fixed-backoff retry over transient model errors
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
    call_timeout: Option<Duration>,
    deadline: Option<Duration>,
    retry_on: fn(&ModelError) -> bool,
}

impl Default for RetryPolicy {
    /// Two attempts, one second apart
    fn default() -> Self {
        Self::new(2, Duration::from_secs(1))
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
            call_timeout: None,
            deadline: None,
            retry_on: ModelError::is_transient,
        }
    }

    /// Single attempt, no backoff
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Bound each individual call
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Bound all attempts and backoffs together
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Override which errors are worth another attempt
    pub fn with_retry_on(mut self, retry_on: fn(&ModelError) -> bool) -> Self {
        self.retry_on = retry_on;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Run `call` until it succeeds, fails permanently, or the policy is exhausted.
    ///
    /// Returns the value with the number of attempts made.
    pub async fn run<T, F, Fut>(&self, sleeper: &dyn Sleeper, mut call: F) -> Result<(T, u32), RetryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ModelError>>,
    {
        let started = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let error = match self.time_limit(started) {
                Some(limit) if limit.is_zero() => ModelError::DeadlineExceeded,
                Some(limit) => match tokio::time::timeout(limit, call()).await {
                    Ok(Ok(value)) => return Ok((value, attempt)),
                    Ok(Err(e)) => e,
                    Err(_) => ModelError::Timeout(limit),
                },
                None => match call().await {
                    Ok(value) => return Ok((value, attempt)),
                    Err(e) => e,
                },
            };

            if attempt >= self.max_attempts || !(self.retry_on)(&error) {
                return Err(RetryError {
                    attempts: attempt,
                    source: error,
                });
            }

            if let Some(deadline) = self.deadline
                && started.elapsed() + self.backoff >= deadline
            {
                tracing::warn!(
                    attempt = attempt,
                    deadline_ms = deadline.as_millis(),
                    error = %error,
                    "Model call failed and no time is left for another attempt"
                );
                return Err(RetryError {
                    attempts: attempt,
                    source: error,
                });
            }

            tracing::warn!(
                attempt = attempt,
                max_attempts = self.max_attempts,
                backoff_ms = self.backoff.as_millis(),
                error = %error,
                "Model call failed, retrying"
            );
            sleeper.sleep(self.backoff).await;
        }
    }

    /// Time allowed for the next call: the per-call timeout, clipped by what is left
    /// of the deadline
    fn time_limit(&self, started: Instant) -> Option<Duration> {
        let remaining = self
            .deadline
            .map(|deadline| deadline.saturating_sub(started.elapsed()));
        match (self.call_timeout, remaining) {
            (Some(timeout), Some(remaining)) => Some(timeout.min(remaining)),
            (timeout, remaining) => timeout.or(remaining),
        }
    }
}
