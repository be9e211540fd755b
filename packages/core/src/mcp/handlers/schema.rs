//! Workflow Schema Handler
//!
//! Serves the JSON Schema describing a valid workflow document. Two variants
//! exist: the full document with per-field descriptions, and a reduced
//! "basic" variant for downstream tools running with tight context budgets.
//! The variant is selected from the currently active config target.

use crate::mcp::types::MCPError;
use crate::services::{ConfigTargetTracker, SchemaVariant};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// Handle get_workflow_schema tool call
///
/// No input. Pure read of a static resource - the only dynamic part is the
/// variant selection based on which downstream tool is currently active.
pub fn handle_get_workflow_schema(
    config_targets: &Arc<ConfigTargetTracker>,
) -> Result<Value, MCPError> {
    let variant = config_targets
        .active_target()
        .map(|target| target.schema_variant())
        .unwrap_or(SchemaVariant::Full);

    debug!("📐 Serving {:?} workflow schema variant", variant);

    Ok(json!({
        "success": true,
        "variant": match variant {
            SchemaVariant::Full => "full",
            SchemaVariant::Basic => "basic",
        },
        "schema": workflow_schema_document(variant)
    }))
}

/// The JSON Schema for a workflow document.
///
/// Maintained by hand (not derived from the Rust types) so descriptions can
/// be written for AI consumption and the exposed surface stays deliberate.
pub fn workflow_schema_document(variant: SchemaVariant) -> Value {
    match variant {
        SchemaVariant::Full => full_schema(),
        SchemaVariant::Basic => basic_schema(),
    }
}

fn full_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "Workflow",
        "description": "A visually-edited workflow: nodes are steps on the canvas, edges are the directed connections between them.",
        "type": "object",
        "properties": {
            "name": {
                "type": "string",
                "description": "Workflow display name"
            },
            "description": {
                "type": "string",
                "description": "What this workflow does, in a sentence or two"
            },
            "nodes": {
                "type": "array",
                "description": "Steps on the canvas",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": {
                            "type": "string",
                            "description": "Unique identifier within the document"
                        },
                        "type": {
                            "type": "string",
                            "description": "Step type, e.g. 'trigger', 'action', 'condition'"
                        },
                        "label": {
                            "type": "string",
                            "description": "Display label shown on the canvas"
                        },
                        "position": {
                            "type": "object",
                            "description": "Canvas placement; may be omitted for headless documents",
                            "properties": {
                                "x": { "type": "number" },
                                "y": { "type": "number" }
                            },
                            "required": ["x", "y"]
                        },
                        "config": {
                            "type": "object",
                            "description": "Type-specific configuration (free-form JSON object)"
                        }
                    },
                    "required": ["id", "type"]
                }
            },
            "edges": {
                "type": "array",
                "description": "Directed connections between nodes",
                "items": {
                    "type": "object",
                    "properties": {
                        "source": {
                            "type": "string",
                            "description": "Id of the node the edge leaves from"
                        },
                        "target": {
                            "type": "string",
                            "description": "Id of the node the edge points at"
                        },
                        "label": {
                            "type": "string",
                            "description": "Optional edge label, e.g. a condition branch name"
                        }
                    },
                    "required": ["source", "target"]
                }
            }
        },
        "required": ["nodes", "edges"]
    })
}

/// Reduced variant: same structural rules, no prose. Saves tokens for tools
/// with tight context budgets.
fn basic_schema() -> Value {
    json!({
        "title": "Workflow",
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "description": { "type": "string" },
            "nodes": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "type": { "type": "string" },
                        "label": { "type": "string" },
                        "position": {
                            "type": "object",
                            "properties": {
                                "x": { "type": "number" },
                                "y": { "type": "number" }
                            }
                        },
                        "config": { "type": "object" }
                    },
                    "required": ["id", "type"]
                }
            },
            "edges": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "source": { "type": "string" },
                        "target": { "type": "string" },
                        "label": { "type": "string" }
                    },
                    "required": ["source", "target"]
                }
            }
        },
        "required": ["nodes", "edges"]
    })
}

// Include tests
#[cfg(test)]
#[path = "schema_test.rs"]
mod schema_test;
