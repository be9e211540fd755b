//! Headless MCP Server
//!
//! Standalone MCP server for batch and development use: no editor UI, the
//! workflow document lives in a JSON file on disk. External AI agents get
//! the same four workflow tools the desktop app exposes.
//!
//! Architecture:
//!   AI Agent (Claude Code) → HTTP (ephemeral port) → MCP server
//!       → WorkflowBridge (headless mode) → workflow.json
//!
//! # Usage
//!
//! ```bash
//! # Serve the workflow document in the current directory
//! cargo run --bin dev-mcp
//!
//! # Or point at a specific document
//! FLOWSPACE_WORKFLOW=demo/workflow.json cargo run --bin dev-mcp
//! ```
//!
//! The bound port is printed on startup; the server runs until Ctrl-C.

use flowspace_core::services::{
    ConfigTargetTracker, FileWorkflowProvider, McpServerService, WorkflowBridge,
};
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("dev_mcp=debug,flowspace_core=debug")),
        )
        .init();

    println!("🔧 Initializing dev-mcp (headless MCP server)...");

    let workflow_path = std::env::var("FLOWSPACE_WORKFLOW")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("workflow.json"));
    let context_path = workflow_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    println!("📂 Workflow document: {}", workflow_path.display());

    let bridge = Arc::new(WorkflowBridge::new());
    bridge.set_workflow_provider(Arc::new(FileWorkflowProvider::new(&workflow_path)));

    let service = McpServerService::new(bridge, Arc::new(ConfigTargetTracker::new()));
    let port = match service.start(&context_path).await {
        Ok(port) => port,
        Err(e) => {
            eprintln!("❌ Failed to start MCP server: {}", e);
            return Err(e.into());
        }
    };

    println!("✅ MCP server ready at http://127.0.0.1:{}/mcp", port);
    println!("   Press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;

    println!("\n🛑 Shutting down...");
    service.stop().await;
    println!("✅ Stopped");

    Ok(())
}
