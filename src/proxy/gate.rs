//! Admission control for upstream calls.
//!
//! A counting gate shared by every proxy request. Each upstream call holds
//! one [`AdmissionToken`] from before the call starts until its response body
//! has been relayed or dropped. Waiting is FIFO (Tokio's semaphore is fair)
//! and bounded by the request [`Deadline`].

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::observability::metrics;
use crate::resilience::Deadline;

/// Why a token was not granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("deadline passed while waiting for a slot")]
    Timeout,
    #[error("gate closed")]
    Closed,
}

/// Bounds the number of simultaneous upstream calls.
#[derive(Debug)]
pub struct ConcurrencyGate {
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl ConcurrencyGate {
    pub fn new(capacity: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait for a free slot.
    ///
    /// Fails with [`GateError::Timeout`] if `deadline` passes first; a token is
    /// never granted after that. Dropping the returned future (client went
    /// away) abandons the wait without taking a slot.
    pub async fn acquire(&self, deadline: Deadline) -> Result<AdmissionToken, GateError> {
        let permit = deadline
            .run(self.permits.clone().acquire_owned())
            .await
            .map_err(|_| GateError::Timeout)?
            .map_err(|_| GateError::Closed)?;

        metrics::gate_acquired();
        tracing::trace!(in_flight = self.in_flight(), "Admission token granted");

        Ok(AdmissionToken { _permit: permit })
    }

    /// Stop admitting. Waiters and later callers get [`GateError::Closed`];
    /// tokens already granted stay valid until dropped.
    pub fn close(&self) {
        self.permits.close();
    }

    pub fn is_closed(&self) -> bool {
        self.permits.is_closed()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently free.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Tokens currently held.
    pub fn in_flight(&self) -> usize {
        self.capacity.saturating_sub(self.available())
    }
}

/// One slot in the gate. Released when dropped.
#[derive(Debug)]
pub struct AdmissionToken {
    _permit: OwnedSemaphorePermit,
}

impl Drop for AdmissionToken {
    fn drop(&mut self) {
        metrics::gate_released();
        tracing::trace!("Admission token released");
    }
}
