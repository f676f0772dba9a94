//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, span, JSON body)
//!     → tutorials.rs (CRUD over the tutorials collection)
//!     → response.rs (JSON bodies, error → status mapping)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod tutorials;

pub use request::X_REQUEST_ID;
pub use response::{ApiError, Message};
pub use server::{build_router, AppState, HttpServer};
