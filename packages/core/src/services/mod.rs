//! Business Services
//!
//! This module contains the core services of the workflow bridge:
//!
//! - `WorkflowBridge` - dual-mode routing between a live UI, a headless
//!   provider, and the in-memory fallback cache
//! - `RequestCorrelator` - correlation identifiers and pending-request
//!   tracking for UI round trips
//! - `McpServerService` - HTTP listener lifecycle for the MCP server
//! - `ConfigTargetTracker` - session-scoped downstream tool bookkeeping
//! - `FileWorkflowProvider` - file-backed provider for headless deployments
//!
//! Services coordinate between the transport/protocol layers and the
//! workflow document model; collaborators are injected at construction.

pub mod config_targets;
pub mod correlation;
pub mod error;
pub mod file_provider;
pub mod mcp_server_service;
pub mod workflow_bridge;

pub use config_targets::{ConfigTarget, ConfigTargetTracker, SchemaVariant};
pub use correlation::{PendingRequest, RequestCorrelator};
pub use error::{BridgeError, CorrelationError, ProviderError, ServerError};
pub use file_provider::FileWorkflowProvider;
pub use mcp_server_service::McpServerService;
pub use workflow_bridge::{BridgeTimeouts, ProviderBinding, WorkflowBridge, WorkflowProvider};
