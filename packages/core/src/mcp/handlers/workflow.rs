//! Workflow Tool Handlers
//!
//! Implements the workflow operations exposed over MCP. Every handler
//! returns a structured envelope - parse failures, validation failures, and
//! bridge errors all come back as `{"success": false, ...}` (or
//! `{"valid": false, ...}` for validation) rather than protocol faults, so
//! the calling agent gets actionable diagnostics it can react to.

use crate::mcp::types::MCPError;
use crate::models::Workflow;
use crate::services::WorkflowBridge;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Parameters for apply_workflow
#[derive(Debug, Deserialize)]
pub struct ApplyWorkflowParams {
    /// The workflow document serialized as a JSON string
    pub workflow: String,

    /// Optional human-readable summary of the change, shown in the editor's
    /// confirmation dialog
    #[serde(default)]
    pub description: Option<String>,
}

/// Parameters for validate_workflow
#[derive(Debug, Deserialize)]
pub struct ValidateWorkflowParams {
    /// The workflow document serialized as a JSON string
    pub workflow: String,
}

/// Handle get_current_workflow tool call
///
/// No input, no side effects. Returns the current document plus its
/// staleness flag, or `success: false` when no workflow is available from
/// any path.
pub async fn handle_get_current_workflow(
    bridge: &Arc<WorkflowBridge>,
) -> Result<Value, MCPError> {
    match bridge.request_current_workflow().await {
        Ok(snapshot) => match snapshot.workflow {
            Some(workflow) => Ok(json!({
                "success": true,
                "isStale": snapshot.is_stale,
                "workflow": workflow
            })),
            None => Ok(json!({
                "success": false,
                "error": "No active workflow editor and no cached workflow available"
            })),
        },
        Err(e) => {
            warn!("⚠️  Workflow fetch failed: {}", e);
            Ok(json!({ "success": false, "error": e.to_string() }))
        }
    }
}

/// Handle apply_workflow tool call
///
/// Input: the workflow serialized as a JSON string. Parsed, validated
/// against workflow-shape rules, then delegated to the bridge. The bridge is
/// never invoked for input that fails to parse or validate.
pub async fn handle_apply_workflow(
    bridge: &Arc<WorkflowBridge>,
    params: Value,
) -> Result<Value, MCPError> {
    let params: ApplyWorkflowParams = serde_json::from_value(params)
        .map_err(|e| MCPError::invalid_params(format!("Invalid parameters: {}", e)))?;

    let workflow: Workflow = match serde_json::from_str(&params.workflow) {
        Ok(workflow) => workflow,
        Err(e) => {
            return Ok(json!({
                "success": false,
                "error": format!("Invalid JSON: {}", e)
            }))
        }
    };

    let validation_errors = workflow.validate();
    if !validation_errors.is_empty() {
        return Ok(json!({
            "success": false,
            "error": "Workflow validation failed",
            "validationErrors": validation_errors
        }));
    }

    match bridge.apply_workflow(workflow, params.description).await {
        Ok(true) => {
            debug!("✅ Workflow applied");
            Ok(json!({ "success": true }))
        }
        Ok(false) => Ok(json!({
            "success": false,
            "error": "The editor declined to apply the workflow"
        })),
        Err(e) => {
            warn!("⚠️  Workflow apply failed: {}", e);
            Ok(json!({ "success": false, "error": e.to_string() }))
        }
    }
}

/// Handle validate_workflow tool call
///
/// Parses and validates only - never applies. Parse failure is reported as a
/// validation error, not a thrown exception.
pub fn handle_validate_workflow(params: Value) -> Result<Value, MCPError> {
    let params: ValidateWorkflowParams = serde_json::from_value(params)
        .map_err(|e| MCPError::invalid_params(format!("Invalid parameters: {}", e)))?;

    let workflow: Workflow = match serde_json::from_str(&params.workflow) {
        Ok(workflow) => workflow,
        Err(e) => {
            return Ok(json!({
                "valid": false,
                "errors": [format!("Invalid JSON: {}", e)]
            }))
        }
    };

    let errors = workflow.validate();
    Ok(json!({
        "valid": errors.is_empty(),
        "errors": errors
    }))
}

// Include tests
#[cfg(test)]
#[path = "workflow_handler_test.rs"]
mod workflow_handler_test;
