//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum router, middleware)
//!     → request.rs (x-request-id assigned and echoed)
//!     → /proxy/* → proxy subsystem
//!     → everything else → site subsystem
//!     → response.rs (proxy errors → status + message)
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
