//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Store connection at boot:
//!     → timeouts.rs (deadline on each attempt)
//!     → On failure: backoff.rs (doubling delay before the next attempt)
//!     → lifecycle::startup (bounded retry loop, fatal on exhaustion)
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline
//! - Backoff is deterministic: no jitter, no cap
//! - The retry count is the only bound on total wait

pub mod backoff;
pub mod timeouts;

pub use backoff::calculate_backoff;
pub use timeouts::{with_timeout, Elapsed};
