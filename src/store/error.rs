//! Store error types.

use thiserror::Error;

/// Errors produced while reaching the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached (refused, unresolvable, timed out).
    #[error("store at {endpoint} unavailable: {source}")]
    Unavailable {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    /// The configured connection string cannot be used.
    #[error("invalid store URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::Unavailable {
            endpoint: "localhost:27017".into(),
            source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
        };
        assert!(err.to_string().starts_with("store at localhost:27017 unavailable"));

        let err = StoreError::InvalidUrl {
            url: "mongodb://".into(),
            reason: "missing host".into(),
        };
        assert_eq!(err.to_string(), "invalid store URL 'mongodb://': missing host");
    }
}
