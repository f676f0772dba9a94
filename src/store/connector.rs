//! Store connectors.
//!
//! A connector performs one connection attempt and yields a handle. Retrying
//! is the caller's business (see `lifecycle::startup`).

use std::future::Future;
use std::time::Duration;
use tokio::net::TcpStream;
use url::Url;

use crate::config::StoreConfig;
use crate::resilience::with_timeout;
use crate::store::error::{StoreError, StoreResult};
use crate::store::Database;

/// Port assumed when the connection string has none.
pub const DEFAULT_STORE_PORT: u16 = 27017;
/// Database name assumed when the connection string has no path.
pub const DEFAULT_DATABASE: &str = "test_db";

/// Something that can open a connection to a store.
pub trait Connector {
    type Handle;

    /// Make a single connection attempt.
    fn connect(&self) -> impl Future<Output = StoreResult<Self::Handle>> + Send;
}

/// Where a [`StoreConnector`] connects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    /// In-process store, always reachable.
    Memory,
    /// Remote store reached over TCP.
    Tcp { host: String, port: u16 },
}

/// Connector built from the `[store]` configuration section.
#[derive(Debug, Clone)]
pub struct StoreConnector {
    target: StoreTarget,
    database: String,
    connect_timeout: Duration,
}

impl StoreConnector {
    /// Parse the configured connection string.
    pub fn from_config(config: &StoreConfig) -> StoreResult<Self> {
        let invalid = |reason: &str| StoreError::InvalidUrl {
            url: config.url.clone(),
            reason: reason.to_string(),
        };

        let url = Url::parse(&config.url).map_err(|e| invalid(&e.to_string()))?;
        let path_name = url
            .path_segments()
            .and_then(|mut segments| segments.next())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let (target, database) = if url.scheme() == "memory" {
            let name = path_name
                .or_else(|| url.host_str().map(str::to_string))
                .unwrap_or_else(|| DEFAULT_DATABASE.to_string());
            (StoreTarget::Memory, name)
        } else {
            let host = url
                .host_str()
                .filter(|h| !h.is_empty())
                .ok_or_else(|| invalid("missing host"))?
                .to_string();
            let port = url.port().unwrap_or(DEFAULT_STORE_PORT);
            let name = path_name.unwrap_or_else(|| DEFAULT_DATABASE.to_string());
            (StoreTarget::Tcp { host, port }, name)
        };

        Ok(Self {
            target,
            database,
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
        })
    }

    pub fn target(&self) -> &StoreTarget {
        &self.target
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Human-readable endpoint for logs.
    pub fn endpoint(&self) -> String {
        match &self.target {
            StoreTarget::Memory => format!("memory://{}", self.database),
            StoreTarget::Tcp { host, port } => format!("{}:{}", host, port),
        }
    }

    async fn probe(&self, host: &str, port: u16) -> StoreResult<()> {
        let stream = connect_within(
            &self.endpoint(),
            self.connect_timeout,
            TcpStream::connect((host, port)),
        )
        .await?;

        tracing::debug!(
            endpoint = %self.endpoint(),
            peer = ?stream.peer_addr().ok(),
            "Store endpoint reachable"
        );
        Ok(())
    }
}

/// Await `connect` for at most `deadline`.
///
/// Both an IO error and an expired deadline become
/// [`StoreError::Unavailable`]; the latter carries `ErrorKind::TimedOut`.
pub async fn connect_within<F, T>(endpoint: &str, deadline: Duration, connect: F) -> StoreResult<T>
where
    F: Future<Output = std::io::Result<T>>,
{
    let unavailable = |source| StoreError::Unavailable {
        endpoint: endpoint.to_string(),
        source,
    };

    with_timeout(deadline, connect)
        .await
        .map_err(|elapsed| unavailable(std::io::Error::new(std::io::ErrorKind::TimedOut, elapsed)))?
        .map_err(unavailable)
}

// Reaching the endpoint is all a connection proves: documents live in the
// handle's in-process collection and are never written to the remote store.
impl Connector for StoreConnector {
    type Handle = Database;

    async fn connect(&self) -> StoreResult<Database> {
        if let StoreTarget::Tcp { host, port } = &self.target {
            self.probe(host, *port).await?;
        }
        Ok(Database::new(self.database.clone(), self.endpoint()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> StoreConfig {
        StoreConfig {
            url: url.to_string(),
            connect_timeout_secs: 1,
        }
    }

    #[test]
    fn test_parse_mongodb_url() {
        let c = StoreConnector::from_config(&config("mongodb://db.internal:27018/tutorials")).unwrap();
        assert_eq!(
            c.target(),
            &StoreTarget::Tcp {
                host: "db.internal".into(),
                port: 27018
            }
        );
        assert_eq!(c.database(), "tutorials");
        assert_eq!(c.endpoint(), "db.internal:27018");
    }

    #[test]
    fn test_parse_defaults() {
        let c = StoreConnector::from_config(&config("mongodb://localhost")).unwrap();
        assert_eq!(
            c.target(),
            &StoreTarget::Tcp {
                host: "localhost".into(),
                port: DEFAULT_STORE_PORT
            }
        );
        assert_eq!(c.database(), DEFAULT_DATABASE);
    }

    #[test]
    fn test_parse_memory_url() {
        let c = StoreConnector::from_config(&config("memory://scratch")).unwrap();
        assert_eq!(c.target(), &StoreTarget::Memory);
        assert_eq!(c.database(), "scratch");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = StoreConnector::from_config(&config("::nope")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidUrl { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_within_times_out() {
        let res = connect_within(
            "stalled:27017",
            Duration::from_secs(1),
            std::future::pending::<std::io::Result<()>>(),
        )
        .await;

        match res {
            Err(StoreError::Unavailable { endpoint, source }) => {
                assert_eq!(endpoint, "stalled:27017");
                assert_eq!(source.kind(), std::io::ErrorKind::TimedOut);
            }
            other => panic!("expected timeout, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_connect_within_passes_io_error() {
        let res = connect_within("refused:1", Duration::from_secs(1), async {
            Err::<(), _>(std::io::Error::from(std::io::ErrorKind::ConnectionRefused))
        })
        .await;

        match res {
            Err(StoreError::Unavailable { source, .. }) => {
                assert_eq!(source.kind(), std::io::ErrorKind::ConnectionRefused);
            }
            other => panic!("expected refusal, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_memory_connects() {
        let c = StoreConnector::from_config(&config("memory://scratch")).unwrap();
        let db = c.connect().await.unwrap();
        assert_eq!(db.name(), "scratch");
    }
}
