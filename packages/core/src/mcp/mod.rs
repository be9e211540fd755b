//! Model Context Protocol (MCP) Integration
//!
//! JSON-RPC 2.0 server over the streamable HTTP transport, exposing the
//! workflow bridge to external AI agents as a small set of typed tools.
//!
//! # Architecture
//!
//! - **Pure protocol layer**: no host-platform dependencies; collaborators
//!   (bridge, config tracker) are injected at construction
//! - **One route**: a single `/mcp` path; everything else is a JSON 404/405
//! - **Per-request sessions**: each inbound request gets a fresh
//!   [`server::McpSession`], so concurrent callers never share state
//!
//! # Usage
//!
//! AI agents connect over HTTP and speak JSON-RPC:
//!
//! ```json
//! {
//!   "jsonrpc": "2.0",
//!   "id": 1,
//!   "method": "tools/call",
//!   "params": {
//!     "name": "get_current_workflow",
//!     "arguments": {}
//!   }
//! }
//! ```
//!
//! Lifecycle (bind, port, shutdown) is owned by
//! [`crate::services::McpServerService`].

pub mod handlers;
pub mod server;
pub mod types;

pub use server::{create_router, McpSession, McpState, MCP_ENDPOINT};
pub use types::{MCPError, MCPRequest, MCPResponse};
