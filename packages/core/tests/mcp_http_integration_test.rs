//! HTTP protocol integration tests
//!
//! Drives the real axum router in-process (no socket) and checks the
//! envelope behavior of the single protocol route: method/path handling,
//! JSON-RPC parse failures, and full tool flows against a headless provider.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use flowspace_core::mcp::{create_router, McpState, MCP_ENDPOINT};
use flowspace_core::services::{ConfigTargetTracker, FileWorkflowProvider, WorkflowBridge};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn router() -> axum::Router {
    router_with_bridge(Arc::new(WorkflowBridge::new()))
}

fn router_with_bridge(bridge: Arc<WorkflowBridge>) -> axum::Router {
    create_router(McpState {
        bridge,
        config_targets: Arc::new(ConfigTargetTracker::new()),
    })
}

async fn send(
    app: axum::Router,
    method: &str,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .header("content-type", "application/json")
        .body(match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn rpc(id: u64, method: &str, params: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params })
}

fn tool_call(id: u64, name: &str, arguments: Value) -> Value {
    rpc(id, "tools/call", json!({ "name": name, "arguments": arguments }))
}

/// Tool results wrap an inner envelope as pretty JSON text; unwrap it.
fn tool_envelope(response: &Value) -> Value {
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap()
}

#[tokio::test]
async fn unknown_path_is_json_404() {
    let (status, body) = send(router(), "POST", "/other", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not found" }));
}

#[tokio::test]
async fn unsupported_method_is_json_405() {
    for method in ["PUT", "PATCH", "GET"] {
        let (status, body) = send(router(), method, MCP_ENDPOINT, None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "method {}", method);
        assert_eq!(body, json!({ "error": "Method not allowed" }));
    }
}

#[tokio::test]
async fn delete_acknowledges_session_termination() {
    let (status, body) = send(router(), "DELETE", MCP_ENDPOINT, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn malformed_body_is_a_parse_error_not_a_fault() {
    let request = Request::builder()
        .method("POST")
        .uri(MCP_ENDPOINT)
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], -32700);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid JSON"));
    assert_eq!(body["id"], Value::Null);
}

#[tokio::test]
async fn initialize_negotiates_protocol_version() {
    let (status, body) = send(
        router(),
        "POST",
        MCP_ENDPOINT,
        Some(rpc(
            1,
            "initialize",
            json!({ "protocolVersion": "2025-03-26", "clientInfo": { "name": "test" } }),
        )),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["result"]["protocolVersion"], "2025-03-26");
    assert_eq!(body["result"]["serverInfo"]["name"], "flowspace-mcp-server");
}

#[tokio::test]
async fn initialized_notification_gets_202_and_no_body() {
    let (status, body) = send(
        router(),
        "POST",
        MCP_ENDPOINT,
        Some(json!({ "jsonrpc": "2.0", "method": "notifications/initialized" })),
    )
    .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn unknown_rpc_method_is_method_not_found() {
    let (status, body) = send(
        router(),
        "POST",
        MCP_ENDPOINT,
        Some(rpc(7, "bogus/method", json!({}))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 7);
    assert_eq!(body["error"]["code"], -32601);
}

#[tokio::test]
async fn tools_list_exposes_the_four_workflow_tools() {
    let (_, body) = send(
        router(),
        "POST",
        MCP_ENDPOINT,
        Some(rpc(2, "tools/list", json!({}))),
    )
    .await;

    let tools = body["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "get_current_workflow",
            "get_workflow_schema",
            "apply_workflow",
            "validate_workflow"
        ]
    );
}

#[tokio::test]
async fn get_current_workflow_with_no_binding_reports_structured_failure() {
    let (status, body) = send(
        router(),
        "POST",
        MCP_ENDPOINT,
        Some(tool_call(3, "get_current_workflow", json!({}))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let envelope = tool_envelope(&body);
    assert_eq!(envelope["success"], false);
    assert!(envelope["error"]
        .as_str()
        .unwrap()
        .starts_with("No active workflow"));
}

#[tokio::test]
async fn apply_then_fetch_round_trips_through_headless_provider() {
    let dir = tempfile::tempdir().unwrap();
    let bridge = Arc::new(WorkflowBridge::new());
    bridge.set_workflow_provider(Arc::new(FileWorkflowProvider::new(
        dir.path().join("workflow.json"),
    )));
    let app = router_with_bridge(bridge);

    let workflow = json!({
        "name": "Nightly sync",
        "nodes": [
            { "id": "cron", "type": "trigger" },
            { "id": "sync", "type": "action" }
        ],
        "edges": [ { "source": "cron", "target": "sync" } ]
    });

    let (_, body) = send(
        app.clone(),
        "POST",
        MCP_ENDPOINT,
        Some(tool_call(
            4,
            "apply_workflow",
            json!({ "workflow": workflow.to_string(), "description": "seed" }),
        )),
    )
    .await;
    assert_eq!(tool_envelope(&body), json!({ "success": true }));

    let (_, body) = send(
        app,
        "POST",
        MCP_ENDPOINT,
        Some(tool_call(5, "get_current_workflow", json!({}))),
    )
    .await;
    let envelope = tool_envelope(&body);
    assert_eq!(envelope["success"], true);
    assert_eq!(envelope["isStale"], false);
    assert_eq!(envelope["workflow"]["name"], "Nightly sync");
}

#[tokio::test]
async fn malformed_apply_input_round_trips_as_structured_error() {
    let (status, body) = send(
        router(),
        "POST",
        MCP_ENDPOINT,
        Some(tool_call(
            6,
            "apply_workflow",
            json!({ "workflow": "{not json" }),
        )),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let envelope = tool_envelope(&body);
    assert_eq!(envelope["success"], false);
    assert!(envelope["error"].as_str().unwrap().starts_with("Invalid JSON"));
}

#[tokio::test]
async fn validate_workflow_tool_reports_diagnostics() {
    let invalid = json!({
        "nodes": [ { "id": "a", "type": "trigger" } ],
        "edges": [ { "source": "a", "target": "ghost" } ]
    });

    let (_, body) = send(
        router(),
        "POST",
        MCP_ENDPOINT,
        Some(tool_call(
            8,
            "validate_workflow",
            json!({ "workflow": invalid.to_string() }),
        )),
    )
    .await;

    let envelope = tool_envelope(&body);
    assert_eq!(envelope["valid"], false);
    assert!(envelope["errors"][0]
        .as_str()
        .unwrap()
        .contains("unknown target node"));
}

#[tokio::test]
async fn string_request_ids_are_echoed_back() {
    let (_, body) = send(
        router(),
        "POST",
        MCP_ENDPOINT,
        Some(json!({
            "jsonrpc": "2.0",
            "id": "client-abc",
            "method": "ping",
            "params": {}
        })),
    )
    .await;

    assert_eq!(body["id"], "client-abc");
    assert_eq!(body["result"], json!({}));
}
