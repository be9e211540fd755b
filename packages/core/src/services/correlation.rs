//! Request Correlation Engine
//!
//! Matches asynchronous responses from the editor UI to the calls that
//! produced them. Every outbound request gets a fresh correlation identifier
//! and a pending entry; the entry is destroyed on resolution, rejection, or
//! deadline expiry, whichever comes first. Identifiers are never reused.
//!
//! The deadline is not a separate timer object: it lives in the caller's
//! `wait()` future, and the timeout arm removes the pending entry before
//! reporting the failure. A late response therefore finds no entry and is
//! dropped as a no-op, and a resolved request can never fire a stale timeout.

use crate::services::error::CorrelationError;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::debug;
use uuid::Uuid;

/// Terminal state delivered to a waiting caller.
enum Outcome {
    Resolved(Value),
    Rejected(String),
}

type PendingMap = Arc<Mutex<HashMap<String, oneshot::Sender<Outcome>>>>;

/// Tracks in-flight correlated requests.
///
/// Cheap to clone; all clones share one pending-request map. Interleaved
/// concurrent requests cannot cross-resolve because every issued identifier
/// is unique.
#[derive(Clone, Default)]
pub struct RequestCorrelator {
    pending: PendingMap,
}

impl RequestCorrelator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new pending request with the given deadline.
    ///
    /// Returns the handle to await; its correlation identifier goes into the
    /// outbound message payload.
    pub fn issue(&self, timeout: Duration) -> PendingRequest {
        let id = next_correlation_id();
        let (tx, rx) = oneshot::channel();

        self.pending.lock().unwrap().insert(id.clone(), tx);
        debug!("📮 Issued correlation id {}", id);

        PendingRequest {
            id,
            rx,
            timeout,
            pending: Arc::clone(&self.pending),
        }
    }

    /// Deliver a successful response for `request_id`.
    ///
    /// A no-op when the identifier is unknown - already resolved, rejected,
    /// or timed out. Duplicate and late responses are tolerated safely.
    pub fn resolve(&self, request_id: &str, value: Value) {
        match self.pending.lock().unwrap().remove(request_id) {
            Some(tx) => {
                // Receiver may have been dropped; nothing left to notify.
                let _ = tx.send(Outcome::Resolved(value));
            }
            None => debug!("Ignoring late or unknown response for {}", request_id),
        }
    }

    /// Deliver an explicit failure for `request_id`. Same no-op semantics as
    /// [`resolve`](Self::resolve) for unknown identifiers.
    pub fn reject(&self, request_id: &str, reason: String) {
        match self.pending.lock().unwrap().remove(request_id) {
            Some(tx) => {
                let _ = tx.send(Outcome::Rejected(reason));
            }
            None => debug!("Ignoring late or unknown rejection for {}", request_id),
        }
    }

    /// Discard a pending entry without notifying the waiter.
    ///
    /// Used when the outbound send fails before a response could ever
    /// arrive, so the entry does not outlive its request.
    pub fn forget(&self, request_id: &str) {
        self.pending.lock().unwrap().remove(request_id);
    }

    /// Number of requests currently awaiting a response.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}

/// Handle for one in-flight request.
pub struct PendingRequest {
    id: String,
    rx: oneshot::Receiver<Outcome>,
    timeout: Duration,
    pending: PendingMap,
}

impl PendingRequest {
    /// The correlation identifier to embed in the outbound message.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Await resolution, rejection, or the deadline.
    pub async fn wait(self) -> Result<Value, CorrelationError> {
        match tokio::time::timeout(self.timeout, self.rx).await {
            Ok(Ok(Outcome::Resolved(value))) => Ok(value),
            Ok(Ok(Outcome::Rejected(reason))) => Err(CorrelationError::Rejected(reason)),
            Ok(Err(_)) => Err(CorrelationError::Abandoned),
            Err(_) => {
                // Deadline fired: remove the entry so a late response is a
                // no-op instead of resolving a request nobody awaits.
                self.pending.lock().unwrap().remove(&self.id);
                debug!("⏰ Correlation id {} timed out", self.id);
                Err(CorrelationError::Timeout {
                    waited_ms: self.timeout.as_millis() as u64,
                })
            }
        }
    }
}

/// Fresh process-unique correlation identifier: timestamp for ordering and
/// debuggability, UUID for uniqueness.
fn next_correlation_id() -> String {
    format!(
        "req-{}-{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}

// Include tests
#[cfg(test)]
#[path = "correlation_test.rs"]
mod correlation_test;
