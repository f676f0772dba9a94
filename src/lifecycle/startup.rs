//! Startup orchestration: connect to the store before serving.
//!
//! # State Transitions
//! ```text
//! attempt 0 ──fail──▶ sleep 2s ──▶ attempt 1 ──fail──▶ sleep 4s ──▶ ...
//!     │                                 │
//!   success                           success ──▶ handle returned
//!
//! attempt MAX_RETRIES ──fail──▶ StartupError::Exhausted ──▶ exit(1)
//! ```
//!
//! # Design Decisions
//! - Fail fast: exhausting the retries is fatal to the process
//! - Attempts are strictly sequential; the listener is bound only afterwards
//! - No jitter and no delay cap, so the delay sequence is exact

use std::time::Duration;

use crate::config::StartupConfig;
use crate::observability::metrics;
use crate::resilience::calculate_backoff;
use crate::store::{Connector, StoreError};

/// Retries allowed after the initial attempt.
pub const MAX_RETRIES: u32 = 5;
/// Delay before the first retry, in milliseconds.
pub const BASE_DELAY_MS: u64 = 2000;

/// Exit code used when the store stays unreachable.
pub const EXIT_STORE_UNAVAILABLE: i32 = 1;

/// Bounds of the boot-time retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            base_delay: Duration::from_millis(BASE_DELAY_MS),
        }
    }
}

impl From<&StartupConfig> for RetryPolicy {
    fn from(config: &StartupConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after a failure at `attempt_number`.
    pub fn delay(&self, attempt_number: u32) -> Duration {
        calculate_backoff(attempt_number, self.base_delay)
    }

    /// Upper bound on connection attempts (initial + retries).
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Result of a single connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Pending,
    Success,
    Failure,
}

impl AttemptOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptOutcome::Pending => "pending",
            AttemptOutcome::Success => "success",
            AttemptOutcome::Failure => "failure",
        }
    }
}

/// One connection attempt and the delay that follows it if it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionAttempt {
    pub attempt_number: u32,
    pub delay: Duration,
    pub outcome: AttemptOutcome,
}

impl ConnectionAttempt {
    pub fn new(attempt_number: u32, policy: &RetryPolicy) -> Self {
        Self {
            attempt_number,
            delay: policy.delay(attempt_number),
            outcome: AttemptOutcome::Pending,
        }
    }

    /// The attempt that follows this one.
    pub fn next(&self, policy: &RetryPolicy) -> Self {
        Self::new(self.attempt_number + 1, policy)
    }

    pub fn delay_ms(&self) -> u128 {
        self.delay.as_millis()
    }

    /// Whether a failure at this attempt ends the loop.
    pub fn is_last(&self, policy: &RetryPolicy) -> bool {
        self.attempt_number >= policy.max_retries
    }

    fn resolve(&mut self, outcome: AttemptOutcome) {
        self.outcome = outcome;
        metrics::record_connect_attempt(outcome.as_str());
    }
}

/// Fatal startup failure.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Failed to connect after {retries} retries")]
    Exhausted {
        retries: u32,
        #[source]
        last_error: StoreError,
    },
}

impl StartupError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            StartupError::Exhausted { .. } => EXIT_STORE_UNAVAILABLE,
        }
    }
}

/// Connect to the store, retrying with exponential backoff.
///
/// Makes at most `policy.max_retries + 1` attempts. After a failed attempt
/// `n` (0-based) it sleeps `base_delay * 2^n`. Returns the handle on the
/// first success; after the last failure it logs an error and returns
/// [`StartupError::Exhausted`], which the entry point turns into exit code 1.
pub async fn connect_with_retry<C>(
    connector: &C,
    policy: &RetryPolicy,
) -> Result<C::Handle, StartupError>
where
    C: Connector,
{
    let mut attempt = ConnectionAttempt::new(0, policy);

    loop {
        match connector.connect().await {
            Ok(handle) => {
                attempt.resolve(AttemptOutcome::Success);
                tracing::info!(
                    attempt = attempt.attempt_number + 1,
                    "Connected to the database!"
                );
                return Ok(handle);
            }
            Err(e) if attempt.is_last(policy) => {
                attempt.resolve(AttemptOutcome::Failure);
                tracing::error!(
                    retries = policy.max_retries,
                    error = %e,
                    "Failed to connect after {} retries. Exiting.",
                    policy.max_retries
                );
                return Err(StartupError::Exhausted {
                    retries: policy.max_retries,
                    last_error: e,
                });
            }
            Err(e) => {
                attempt.resolve(AttemptOutcome::Failure);
                tracing::warn!(
                    attempt = attempt.attempt_number + 1,
                    delay_ms = attempt.delay_ms() as u64,
                    error = %e,
                    "Store connection attempt {} failed. Retrying in {}s...",
                    attempt.attempt_number + 1,
                    attempt.delay.as_secs_f64()
                );
                tokio::time::sleep(attempt.delay).await;
                attempt = attempt.next(policy);
            }
        }
    }
}
