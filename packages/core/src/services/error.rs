//! Service Layer Error Types
//!
//! Error types for the correlation engine, the dual-mode bridge, the headless
//! provider contract, and the server lifecycle. Validation and parse problems
//! in tool inputs are NOT represented here - those travel inside tool result
//! envelopes so the calling agent can react to them programmatically.

use crate::transport::TransportError;
use thiserror::Error;

/// Failure of a single correlated cross-boundary request.
#[derive(Error, Debug)]
pub enum CorrelationError {
    /// The deadline elapsed before a matching response arrived
    #[error("Timed out after {waited_ms}ms waiting for a response")]
    Timeout { waited_ms: u64 },

    /// The responder explicitly rejected the request
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// The pending entry was dropped without ever being resolved
    #[error("Pending request dropped before a response arrived")]
    Abandoned,
}

/// Headless workflow provider failures.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Workflow storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored workflow document is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Dual-mode bridge failures.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Neither a UI transport nor a headless provider is bound
    #[error("No active workflow editor or headless provider")]
    NoActiveEditor,

    /// A UI round trip hit its deadline (and, for fetches, no cache existed)
    #[error("Timed out after {waited_ms}ms waiting for the editor")]
    Timeout { waited_ms: u64 },

    /// The UI explicitly failed the request
    #[error("The editor rejected the request: {0}")]
    Rejected(String),

    /// Outbound delivery to the UI failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The headless provider failed
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A response arrived but its payload did not deserialize to the
    /// expected shape
    #[error("Malformed response payload: {0}")]
    Protocol(String),
}

/// Server lifecycle errors.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("MCP server is already listening on port {port}")]
    AlreadyRunning { port: u16 },

    #[error("Failed to bind MCP listener: {0}")]
    Bind(#[from] std::io::Error),
}
