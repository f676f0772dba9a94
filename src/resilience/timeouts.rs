//! Timeout enforcement.
//!
//! Every call that leaves the process (store connection attempts) runs under
//! a deadline. A timeout is reported as its own error so callers can log it
//! distinctly from a refused connection.

use std::future::Future;
use std::time::Duration;

/// Returned when an operation exceeds its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("operation timed out after {0:?}")]
pub struct Elapsed(pub Duration);

/// Run `fut` with a deadline.
pub async fn with_timeout<F, T>(deadline: Duration, fut: F) -> Result<T, Elapsed>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(deadline, fut)
        .await
        .map_err(|_| Elapsed(deadline))
}
