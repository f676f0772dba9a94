//! Tutorial CRUD server library.
//!
//! The server refuses to accept traffic until its document store is
//! reachable: [`lifecycle::startup::connect_with_retry`] retries with a
//! doubling delay and yields the [`store::Database`] handle that the
//! [`http::HttpServer`] is built from.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod models;
pub mod observability;
pub mod resilience;
pub mod store;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use store::Database;
