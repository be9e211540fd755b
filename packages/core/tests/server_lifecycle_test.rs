//! Server lifecycle integration tests
//!
//! Exercises the real HTTP listener over loopback sockets: ephemeral port
//! assignment, restart behavior, and a full agent-style round trip against a
//! running server.

use flowspace_core::services::{
    ConfigTargetTracker, FileWorkflowProvider, McpServerService, WorkflowBridge,
};
use serde_json::{json, Value};
use std::sync::Arc;

fn service_with_bridge(bridge: Arc<WorkflowBridge>) -> McpServerService {
    McpServerService::new(bridge, Arc::new(ConfigTargetTracker::new()))
}

async fn post_rpc(port: u16, body: Value) -> Value {
    let client = reqwest::Client::new();
    client
        .post(format!("http://127.0.0.1:{}/mcp", port))
        .json(&body)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn full_round_trip_against_a_live_server() {
    let dir = tempfile::tempdir().unwrap();
    let bridge = Arc::new(WorkflowBridge::new());
    bridge.set_workflow_provider(Arc::new(FileWorkflowProvider::new(
        dir.path().join("workflow.json"),
    )));
    let service = service_with_bridge(bridge);

    let port = service.start(dir.path()).await.unwrap();

    // Handshake
    let response = post_rpc(
        port,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": { "protocolVersion": "2025-03-26", "clientInfo": { "name": "it" } }
        }),
    )
    .await;
    assert_eq!(response["result"]["serverInfo"]["name"], "flowspace-mcp-server");

    // Apply a workflow through the headless provider
    let workflow = json!({
        "nodes": [ { "id": "start", "type": "trigger" } ],
        "edges": []
    });
    let response = post_rpc(
        port,
        json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/call",
            "params": {
                "name": "apply_workflow",
                "arguments": { "workflow": workflow.to_string() }
            }
        }),
    )
    .await;
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    let envelope: Value = serde_json::from_str(text).unwrap();
    assert_eq!(envelope, json!({ "success": true }));

    // The document landed on disk.
    assert!(dir.path().join("workflow.json").exists());

    service.stop().await;
    assert!(!service.is_running());
}

#[tokio::test]
async fn unknown_paths_and_methods_over_a_real_socket() {
    let service = service_with_bridge(Arc::new(WorkflowBridge::new()));
    let port = service.start("/tmp/flowspace").await.unwrap();
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://127.0.0.1:{}/nope", port))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Not found" }));

    let response = client
        .put(format!("http://127.0.0.1:{}/mcp", port))
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 405);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Method not allowed" }));

    service.stop().await;
}

#[tokio::test]
async fn restart_serves_on_a_fresh_listener() {
    let service = service_with_bridge(Arc::new(WorkflowBridge::new()));

    let first_port = service.start("/tmp/flowspace").await.unwrap();
    service.stop().await;

    let second_port = service.start("/tmp/flowspace").await.unwrap();

    // The second listener answers even though the first was torn down.
    let response = post_rpc(
        second_port,
        json!({ "jsonrpc": "2.0", "id": 1, "method": "ping", "params": {} }),
    )
    .await;
    assert_eq!(response["result"], json!({}));

    // The old port no longer accepts connections (unless the OS happened to
    // hand the same port out again, in which case the new listener answers).
    if first_port != second_port {
        let client = reqwest::Client::new();
        assert!(client
            .post(format!("http://127.0.0.1:{}/mcp", first_port))
            .json(&json!({ "jsonrpc": "2.0", "id": 2, "method": "ping", "params": {} }))
            .send()
            .await
            .is_err());
    }

    service.stop().await;
}

#[tokio::test]
async fn concurrent_requests_get_independent_sessions() {
    let service = service_with_bridge(Arc::new(WorkflowBridge::new()));
    let port = service.start("/tmp/flowspace").await.unwrap();

    let mut handles = Vec::new();
    for id in 0..8u64 {
        handles.push(tokio::spawn(async move {
            post_rpc(
                port,
                json!({ "jsonrpc": "2.0", "id": id, "method": "ping", "params": {} }),
            )
            .await
        }));
    }

    for (id, handle) in handles.into_iter().enumerate() {
        let response = handle.await.unwrap();
        assert_eq!(response["id"], id as u64);
        assert_eq!(response["result"], json!({}));
    }

    service.stop().await;
}
