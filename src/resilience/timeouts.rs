//! Timeout enforcement.
//!
//! # Responsibilities
//! - Carry one per-request deadline through every suspension point
//! - Cancel operations cleanly on expiry
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - The deadline is absolute, so time spent queueing counts against it
//! - Timed-out requests return 504 Gateway Timeout

use std::future::Future;
use std::time::Duration;

use tokio::time::{error::Elapsed, Instant};

/// An absolute point in time after which a request is abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// A deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now() + timeout,
        }
    }

    /// A deadline `timeout` after `start`.
    pub fn from_start(start: Instant, timeout: Duration) -> Self {
        Self { at: start + timeout }
    }

    pub fn instant(&self) -> Instant {
        self.at
    }

    /// Time left before expiry; zero once expired.
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Drive `future` to completion unless the deadline passes first.
    pub async fn run<F: Future>(self, future: F) -> Result<F::Output, Elapsed> {
        tokio::time::timeout_at(self.at, future).await
    }
}
