//! MCP HTTP Server
//!
//! Serves MCP JSON-RPC 2.0 over the streamable HTTP transport on a single
//! route. Every inbound request gets a fresh protocol session bound to that
//! request/response pair, so concurrent callers never share session state;
//! the session is dropped as soon as the response is built.
//!
//! Route behavior:
//! - `POST /mcp` - JSON-RPC request (or notification, answered with 202)
//! - `DELETE /mcp` - session termination, acknowledged with 200 (sessions
//!   are per-request, so there is nothing to tear down)
//! - `GET /mcp` - 405; this server offers no server-initiated event stream,
//!   which the streamable HTTP revision of the protocol permits
//! - any other method on the route - 405 JSON envelope
//! - any other path - 404 JSON envelope

use crate::mcp::handlers::{initialize, tools};
use crate::mcp::types::{MCPError, MCPRequest, MCPResponse};
use crate::services::{ConfigTargetTracker, WorkflowBridge};
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    routing::any,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

/// The single protocol path this server exposes.
pub const MCP_ENDPOINT: &str = "/mcp";

/// Shared collaborators handed to every protocol session.
#[derive(Clone)]
pub struct McpState {
    pub bridge: Arc<WorkflowBridge>,
    pub config_targets: Arc<ConfigTargetTracker>,
}

/// Build the application router: one protocol route plus a JSON 404
/// fallback, with request tracing layered on.
pub fn create_router(state: McpState) -> Router {
    Router::new()
        .route(MCP_ENDPOINT, any(handle_protocol))
        .fallback(handle_not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_protocol(State(state): State<McpState>, method: Method, body: Bytes) -> Response {
    match method {
        Method::POST => handle_post(state, body).await,
        Method::DELETE => {
            debug!("📴 Session termination acknowledged");
            (StatusCode::OK, Json(json!({}))).into_response()
        }
        // No server-initiated event stream is offered.
        _ => method_not_allowed(&method),
    }
}

async fn handle_post(state: McpState, body: Bytes) -> Response {
    // Parse JSON-RPC request
    let request: MCPRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("❌ Failed to parse JSON-RPC request: {}", e);
            let response = MCPResponse::error(
                Value::Null, // Unknown id since parsing failed
                MCPError::parse_error(format!("Invalid JSON: {}", e)),
            );
            return match serde_json::to_value(&response) {
                Ok(value) => (StatusCode::BAD_REQUEST, Json(value)).into_response(),
                Err(_) => internal_error(),
            };
        }
    };

    // One fresh protocol session per inbound request.
    let session = McpSession::new(state.bridge, state.config_targets);
    match session.handle(request).await {
        Some(response) => match serde_json::to_value(&response) {
            Ok(value) => (StatusCode::OK, Json(value)).into_response(),
            Err(e) => {
                error!("❌ Failed to serialize MCP response: {}", e);
                internal_error()
            }
        },
        // Notifications get no response body.
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn handle_not_found(uri: Uri) -> Response {
    debug!("Unknown path requested: {}", uri.path());
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}

fn method_not_allowed(method: &Method) -> Response {
    debug!("Unsupported method on protocol path: {}", method);
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

/// Server-side protocol object for a single request/response pair.
pub struct McpSession {
    bridge: Arc<WorkflowBridge>,
    config_targets: Arc<ConfigTargetTracker>,
}

impl McpSession {
    pub fn new(bridge: Arc<WorkflowBridge>, config_targets: Arc<ConfigTargetTracker>) -> Self {
        Self {
            bridge,
            config_targets,
        }
    }

    /// Handle one JSON-RPC message. Returns `None` for notifications.
    pub async fn handle(&self, request: MCPRequest) -> Option<MCPResponse> {
        let method = request.method.clone();

        if request.is_notification() {
            debug!("🔔 Notification received: {}", method);
            return None;
        }
        let id = request.id.unwrap_or(Value::Null);

        let result = match method.as_str() {
            "initialize" => initialize::handle_initialize(request.params),
            "ping" => Ok(json!({})),
            "tools/list" => tools::handle_tools_list(request.params),
            "tools/call" => {
                tools::handle_tools_call(&self.bridge, &self.config_targets, request.params).await
            }
            _ => {
                warn!("⚠️  Unknown MCP method: {}", method);
                Err(MCPError::method_not_found(&method))
            }
        };

        Some(match result {
            Ok(result) => {
                debug!("✅ MCP request '{}' succeeded", method);
                MCPResponse::success(id, result)
            }
            Err(error) => {
                error!(
                    "❌ MCP request '{}' failed: {} (code: {})",
                    method, error.message, error.code
                );
                MCPResponse::error(id, error)
            }
        })
    }
}
