//! Web front end for a 3D model viewer.
//!
//! Serves the viewer page and its static assets, a couple of small JSON
//! APIs, and a bounded-concurrency streaming proxy to the asset origin that
//! strips transport compression before relaying.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod proxy;
pub mod resilience;
pub mod site;

pub use config::ViewerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
