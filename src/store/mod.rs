//! Document store subsystem.
//!
//! # Data Flow
//! ```text
//! StoreConfig.url
//!     → connector.rs (parse URL, single connection attempt)
//!     → lifecycle::startup (retry with backoff)
//!     → Database handle (returned once, cloned into HTTP state)
//!     → collection.rs (concurrent document access from handlers)
//! ```
//!
//! # Design Decisions
//! - No global handle: the connector returns it and callers pass it on
//! - A connector makes exactly one attempt; it never retries itself
//! - Remote targets are probed over TCP within a connect deadline

pub mod collection;
pub mod connector;
pub mod error;

pub use collection::{Collection, Document};
pub use connector::{connect_within, Connector, StoreConnector, StoreTarget};
pub use error::{StoreError, StoreResult};

use crate::models::Tutorial;

/// Handle to a connected database.
#[derive(Clone)]
pub struct Database {
    name: String,
    endpoint: String,
    /// The `tutorials` collection.
    pub tutorials: Collection<Tutorial>,
}

impl Database {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            tutorials: Collection::new("tutorials"),
        }
    }

    /// An in-process database, used by tests and `memory://` URLs.
    pub fn in_memory(name: impl Into<String>) -> Self {
        let name = name.into();
        let endpoint = format!("memory://{}", name);
        Self::new(name, endpoint)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("tutorials", &self.tutorials.len())
            .finish()
    }
}
