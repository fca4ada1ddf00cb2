//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Plain HTTP: tokio TcpListener → axum::serve (http/server.rs)
//! HTTPS:      tls.rs (PEM cert + key) → axum-server rustls acceptor
//!             → same Router as plain HTTP
//! ```
//!
//! # Design Decisions
//! - TLS is optional and runs beside the plain listener, not instead of it
//! - Both listeners stop on the same shutdown broadcast

pub mod tls;
