//! MCP Server Service
//!
//! Managed lifecycle for the MCP (Model Context Protocol) server: binds an
//! ephemeral loopback port, serves the protocol router, and tears everything
//! down on stop - force-terminating connections that outlive the grace
//! deadline instead of hanging.
//!
//! This service can be used in:
//! - a desktop host (UI mode, with a live transport bound to the bridge)
//! - headless deployments (file-backed provider, see `dev-tools`)
//!
//! Collaborators (bridge, config target tracker) are injected at
//! construction; the service owns no ambient global state.
//!
//! # Example
//!
//! ```ignore
//! let bridge = Arc::new(WorkflowBridge::new());
//! let targets = Arc::new(ConfigTargetTracker::new());
//! let service = McpServerService::new(bridge, targets);
//!
//! let port = service.start("/path/to/workspace").await?;
//! // ... external agents call http://127.0.0.1:{port}/mcp ...
//! service.stop().await;
//! ```

use crate::mcp::server::{create_router, McpState};
use crate::services::config_targets::ConfigTargetTracker;
use crate::services::error::ServerError;
use crate::services::workflow_bridge::WorkflowBridge;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// How long open connections get to finish after stop before being
/// force-terminated.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

/// State held only while the listener is up.
struct RunningServer {
    port: u16,
    context_path: PathBuf,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// MCP Server Service
///
/// `Clone`-free by design: share it behind an `Arc`. Only one listener may
/// exist per instance; starting while already listening is an error, while
/// stop is always safe to call.
pub struct McpServerService {
    bridge: Arc<WorkflowBridge>,
    config_targets: Arc<ConfigTargetTracker>,
    running: Mutex<Option<RunningServer>>,
}

impl McpServerService {
    /// Create a new MCP server service.
    ///
    /// # Arguments
    ///
    /// * `bridge` - the dual-mode workflow bridge requests route through
    /// * `config_targets` - session-scoped downstream tool bookkeeping
    pub fn new(bridge: Arc<WorkflowBridge>, config_targets: Arc<ConfigTargetTracker>) -> Self {
        Self {
            bridge,
            config_targets,
            running: Mutex::new(None),
        }
    }

    /// Start the HTTP listener on an OS-assigned loopback port.
    ///
    /// `context_path` is the host workspace/storage root the platform layer
    /// writes MCP config files into; this core only retains it for status
    /// queries. Resolves with the bound port once the OS confirms it.
    ///
    /// # Errors
    ///
    /// Fails when already listening, or when the bind itself fails.
    pub async fn start(&self, context_path: impl AsRef<Path>) -> Result<u16, ServerError> {
        if let Some(running) = self.running.lock().unwrap().as_ref() {
            return Err(ServerError::AlreadyRunning { port: running.port });
        }

        // Loopback only: external agents run on this machine.
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();

        let app = create_router(McpState {
            bridge: self.bridge.clone(),
            config_targets: self.config_targets.clone(),
        });

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = serve.await {
                error!("❌ MCP server error: {}", e);
            }
        });

        let mut running = self.running.lock().unwrap();
        if let Some(existing) = running.as_ref() {
            // Lost a start race while binding; tear down the extra listener.
            task.abort();
            return Err(ServerError::AlreadyRunning {
                port: existing.port,
            });
        }
        *running = Some(RunningServer {
            port,
            context_path: context_path.as_ref().to_path_buf(),
            shutdown_tx,
            task,
        });

        info!("🚀 MCP server listening on http://127.0.0.1:{}/mcp", port);
        Ok(port)
    }

    /// Stop the server. Idempotent - safe to call when not running.
    ///
    /// Signals graceful shutdown, waits up to the grace deadline for open
    /// connections to drain, then force-terminates whatever is left. Session
    /// tracking state (config targets, active downstream tool) is cleared on
    /// every stop regardless of how shutdown completes. Pending bridge
    /// correlations are untouched - they resolve or time out on their own
    /// deadlines, independent of the listener.
    pub async fn stop(&self) {
        let running = self.running.lock().unwrap().take();
        let Some(RunningServer {
            port,
            shutdown_tx,
            mut task,
            ..
        }) = running
        else {
            self.config_targets.clear();
            return;
        };

        info!("🛑 Stopping MCP server on port {}...", port);
        let _ = shutdown_tx.send(());

        match tokio::time::timeout(SHUTDOWN_GRACE, &mut task).await {
            Ok(_) => info!("✅ MCP server on port {} stopped", port),
            Err(_) => {
                warn!(
                    "⚠️  Graceful shutdown timed out after {:?}; force-terminating connections",
                    SHUTDOWN_GRACE
                );
                task.abort();
            }
        }

        self.config_targets.clear();
    }

    /// Whether the HTTP listener is currently up.
    pub fn is_running(&self) -> bool {
        self.running.lock().unwrap().is_some()
    }

    /// The bound port while running.
    pub fn port(&self) -> Option<u16> {
        self.running.lock().unwrap().as_ref().map(|r| r.port)
    }

    /// The context path passed to the running `start`, if any.
    pub fn context_path(&self) -> Option<PathBuf> {
        self.running
            .lock()
            .unwrap()
            .as_ref()
            .map(|r| r.context_path.clone())
    }
}

// Include tests
#[cfg(test)]
#[path = "mcp_server_service_test.rs"]
mod mcp_server_service_test;
