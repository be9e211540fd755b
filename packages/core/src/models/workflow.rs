//! Workflow Document Model
//!
//! Data structures for the visually-edited workflow document: nodes on a
//! canvas plus the directed edges between them. The bridge and MCP layers
//! move these documents around; they never interpret node semantics.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Canvas coordinates of a node in the visual editor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasPosition {
    pub x: f64,
    pub y: f64,
}

/// A single step on the workflow canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    /// Unique identifier within the document
    pub id: String,

    /// Step type (e.g. "trigger", "action", "condition")
    #[serde(rename = "type")]
    pub node_type: String,

    /// Display label shown on the canvas
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Canvas placement; absent for documents produced headlessly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<CanvasPosition>,

    /// Type-specific configuration. Opaque at this layer - the editor and
    /// downstream tools interpret it.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub config: Value,
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowEdge {
    /// Id of the node the edge leaves from
    pub source: String,

    /// Id of the node the edge points at
    pub target: String,

    /// Optional edge label (e.g. a condition branch name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// The workflow document as edited on the canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,

    #[serde(default)]
    pub edges: Vec<WorkflowEdge>,
}

impl Workflow {
    /// Validate document shape.
    ///
    /// Returns one message per violation; an empty vector means the workflow
    /// is structurally valid. Checks cover node identity (empty or duplicate
    /// ids, empty types) and edge integrity (unknown endpoints, duplicate
    /// connections). Node semantics are not checked here.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let mut node_ids: HashSet<&str> = HashSet::new();
        for (index, node) in self.nodes.iter().enumerate() {
            if node.id.trim().is_empty() {
                errors.push(format!("Node at index {} has an empty id", index));
                continue;
            }
            if !node_ids.insert(node.id.as_str()) {
                errors.push(format!("Duplicate node id: '{}'", node.id));
            }
            if node.node_type.trim().is_empty() {
                errors.push(format!("Node '{}' has an empty type", node.id));
            }
        }

        let mut edge_pairs: HashSet<(&str, &str)> = HashSet::new();
        for (index, edge) in self.edges.iter().enumerate() {
            if !node_ids.contains(edge.source.as_str()) {
                errors.push(format!(
                    "Edge at index {} references unknown source node '{}'",
                    index, edge.source
                ));
            }
            if !node_ids.contains(edge.target.as_str()) {
                errors.push(format!(
                    "Edge at index {} references unknown target node '{}'",
                    index, edge.target
                ));
            }
            if !edge_pairs.insert((edge.source.as_str(), edge.target.as_str())) {
                errors.push(format!(
                    "Duplicate edge from '{}' to '{}'",
                    edge.source, edge.target
                ));
            }
        }

        errors
    }
}

/// Last-known workflow plus a trust flag.
///
/// `is_stale` marks a document that was served from the in-memory fallback
/// cache rather than fetched from an authoritative live source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSnapshot {
    pub workflow: Option<Workflow>,

    #[serde(rename = "isStale")]
    pub is_stale: bool,
}

impl WorkflowSnapshot {
    /// Snapshot freshly obtained from an authoritative source (live UI or
    /// headless provider).
    pub fn fresh(workflow: Workflow) -> Self {
        Self {
            workflow: Some(workflow),
            is_stale: false,
        }
    }

    /// Snapshot served from the fallback cache; `None` means no workflow has
    /// been observed yet.
    pub fn stale(workflow: Option<Workflow>) -> Self {
        Self {
            workflow,
            is_stale: true,
        }
    }
}

// Include tests
#[cfg(test)]
#[path = "workflow_test.rs"]
mod workflow_test;
