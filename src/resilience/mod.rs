//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Proxied request:
//!     → timeouts.rs (one deadline from acceptance: admission, call, streaming)
//!     → On expiry: 504, admission token released
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries: an upstream failure is surfaced once

pub mod timeouts;

pub use timeouts::Deadline;
