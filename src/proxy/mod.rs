//! Bounded-concurrency streaming asset proxy.
//!
//! # Data Flow
//! ```text
//! GET /proxy/{path...}
//!     → handler.rs (method check, deadline starts)
//!     → upstream.rs (origin + suffix, forwarded headers)
//!     → gate.rs (wait for one of N upstream slots)
//!     → upstream.rs (single outbound GET, no retry)
//!     → relay.rs + decode.rs (gzip / deflate / identity → identity)
//!     → client
//! ```
//!
//! # Design Decisions
//! - The admission token lives inside the response body stream, so a slot is
//!   held until the body is fully relayed or the client goes away
//! - All waits share one per-request deadline measured from acceptance
//! - The proxy never emits `Content-Encoding`; clients always get plain bytes

pub mod decode;
pub mod error;
pub mod gate;
pub mod handler;
pub mod relay;
pub mod upstream;

pub use decode::{ContentEncoding, Decoder};
pub use error::ProxyError;
pub use gate::{AdmissionToken, ConcurrencyGate, GateError};
pub use handler::{proxy_handler, Proxy, ROUTE_PREFIX};
pub use upstream::{UpstreamClient, UpstreamRequest};
