//! FlowSpace Core
//!
//! This crate provides the workflow bridge and built-in MCP server for the
//! FlowSpace visual workflow editor: the subsystem that lets external AI
//! agents discover and invoke operations against the workflow document,
//! whether or not a live UI session is attached.
//!
//! # Architecture
//!
//! - **Dual-mode bridge**: one fetch/apply contract over three paths - a
//!   live UI transport (correlation ids + deadlines), a headless storage
//!   provider, or the in-memory fallback cache (marked stale)
//! - **Per-request protocol sessions**: the HTTP server creates a fresh
//!   session for every inbound MCP request
//! - **Injected collaborators**: transports, providers, and trackers are
//!   passed in at construction; no process-wide singletons
//!
//! # Modules
//!
//! - [`models`] - workflow document structures and shape validation
//! - [`transport`] - the UI message channel abstraction and wire messages
//! - [`services`] - bridge, correlation engine, lifecycle, bookkeeping
//! - [`mcp`] - JSON-RPC types, HTTP server, and tool handlers

pub mod mcp;
pub mod models;
pub mod services;
pub mod transport;

// Re-export commonly used types
pub use models::*;
pub use services::*;
pub use transport::{TransportError, TransportMessage, UiTransport};
