//! Exponential backoff without jitter.
//!
//! The delay doubles on every retry and is never capped; the retry limit is
//! the only bound on how long a caller waits.

use std::time::Duration;

/// Calculate the delay to wait after failed retry number `retries` (0-based).
///
/// `delay = base * 2^retries`, saturating instead of overflowing.
pub fn calculate_backoff(retries: u32, base: Duration) -> Duration {
    let factor = 2u32.saturating_pow(retries);
    base.saturating_mul(factor)
}
