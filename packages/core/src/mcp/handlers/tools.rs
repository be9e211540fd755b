//! MCP Tools Handler
//!
//! Implements MCP-compliant tools/list and tools/call methods.
//! This module centralizes tool discovery and execution according to the
//! MCP 2024-11-05 specification.
//!
//! The server exposes four workflow tools. Expected failures (bad JSON
//! input, validation errors, no active editor) travel inside the tool result
//! envelope with `isError: false` - they are structured outcomes the agent
//! reacts to, not protocol faults.

use crate::mcp::handlers::{schema, workflow};
use crate::mcp::types::MCPError;
use crate::services::{ConfigTargetTracker, WorkflowBridge};
use serde_json::{json, Value};
use std::sync::Arc;

/// Handle tools/list MCP request
///
/// Returns the tool schemas. This is called after initialize to discover
/// what tools the server provides.
///
/// # MCP Spec Compliance
///
/// Response format:
/// ```json
/// {
///   "tools": [
///     {
///       "name": "tool_name",
///       "description": "...",
///       "inputSchema": { ... }
///     }
///   ]
/// }
/// ```
pub fn handle_tools_list(_params: Value) -> Result<Value, MCPError> {
    Ok(json!({
        "tools": get_tool_schemas()
    }))
}

/// Handle tools/call MCP request
///
/// Executes a tool by name with provided arguments.
/// This is the unified entry point for all tool execution.
///
/// # MCP Spec Compliance (2024-11-05)
///
/// Request format:
/// ```json
/// {
///   "name": "tool_name",
///   "arguments": { ... }
/// }
/// ```
///
/// Response format:
/// ```json
/// {
///   "content": [{
///     "type": "text",
///     "text": "..."
///   }],
///   "isError": false
/// }
/// ```
pub async fn handle_tools_call(
    bridge: &Arc<WorkflowBridge>,
    config_targets: &Arc<ConfigTargetTracker>,
    params: Value,
) -> Result<Value, MCPError> {
    // Extract tool name from params
    let tool_name = params["name"]
        .as_str()
        .ok_or_else(|| MCPError::invalid_params("Missing 'name' parameter".to_string()))?;

    // Extract arguments (defaults to empty object if missing)
    let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

    // Route to appropriate handler based on tool name
    let result = match tool_name {
        "get_current_workflow" => workflow::handle_get_current_workflow(bridge).await,
        "get_workflow_schema" => schema::handle_get_workflow_schema(config_targets),
        "apply_workflow" => workflow::handle_apply_workflow(bridge, arguments).await,
        "validate_workflow" => workflow::handle_validate_workflow(arguments),
        _ => {
            return Err(MCPError::invalid_params(format!(
                "Unknown tool: {}",
                tool_name
            )))
        }
    };

    // Format response per MCP spec with content array and isError flag
    match result {
        Ok(data) => {
            // Success: Serialize result as pretty JSON text in content array
            let text = serde_json::to_string_pretty(&data).map_err(|e| {
                MCPError::internal_error(format!("JSON serialization failed: {}", e))
            })?;

            Ok(json!({
                "content": [{
                    "type": "text",
                    "text": text
                }],
                "isError": false
            }))
        }
        Err(e) => {
            // Error: Return error message in content array with isError=true
            // Per MCP spec, tool execution errors are returned as successful
            // responses with isError=true, not as JSON-RPC errors
            Ok(json!({
                "content": [{
                    "type": "text",
                    "text": e.message
                }],
                "isError": true
            }))
        }
    }
}

/// Generate JSON schemas for all available MCP tools
///
/// Schemas are manually maintained to provide high-quality descriptions and
/// precise control over the API surface.
fn get_tool_schemas() -> Value {
    json!([
        {
            "name": "get_current_workflow",
            "description": "Get the workflow currently open in the editor (or the last-known workflow when no editor is attached). The response carries an isStale flag: a stale workflow was served from cache because no live editor answered, so treat it as a best-effort view.",
            "inputSchema": {
                "type": "object",
                "properties": {},
                "required": []
            }
        },
        {
            "name": "get_workflow_schema",
            "description": "Get the JSON Schema describing a valid workflow document. Call this before building or editing a workflow so the structure you produce matches what apply_workflow accepts.",
            "inputSchema": {
                "type": "object",
                "properties": {},
                "required": []
            }
        },
        {
            "name": "apply_workflow",
            "description": "Replace the current workflow document. Pass the full workflow serialized as a JSON string - it is parsed and validated before anything is applied. When an editor is attached the user may be asked to confirm, so this call can take a while; a timeout means the change was NOT applied.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "workflow": {
                        "type": "string",
                        "description": "The workflow document serialized as a JSON string (see get_workflow_schema for its structure)"
                    },
                    "description": {
                        "type": "string",
                        "description": "Optional one-line summary of the change, shown to the user in the confirmation dialog"
                    }
                },
                "required": ["workflow"]
            }
        },
        {
            "name": "validate_workflow",
            "description": "Check a workflow document against the workflow-shape rules without applying it. Returns {valid, errors}; malformed JSON is reported as a validation error. Use this to pre-flight a document before apply_workflow.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "workflow": {
                        "type": "string",
                        "description": "The workflow document serialized as a JSON string"
                    }
                },
                "required": ["workflow"]
            }
        }
    ])
}

// Include tests
#[cfg(test)]
#[path = "tools_test.rs"]
mod tools_test;
