//! MCP Request Handlers
//!
//! Handler modules for the MCP operations this server exposes:
//!
//! - `initialize` - handshake and capability discovery
//! - `tools` - tools/list and tools/call routing
//! - `workflow` - the workflow tool operations (fetch, apply, validate)
//! - `schema` - the workflow schema document and its variants

pub mod initialize;
pub mod schema;
pub mod tools;
pub mod workflow;
