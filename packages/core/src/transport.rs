//! UI Transport Abstraction
//!
//! Bidirectional message channel between the bridge and a live editor UI,
//! decoupled from the hosting platform (VSCode IPC, Electron IPC, WebSocket).
//! Outbound traffic goes through [`UiTransport::send`]; inbound messages must
//! be forwarded by the host glue to
//! [`crate::services::WorkflowBridge::handle_transport_message`].
//!
//! Messages are adjacently tagged (`type` + `payload`) so every payload is
//! narrowed to a concrete shape the moment it crosses the boundary - internal
//! code never touches untyped JSON.

use crate::models::Workflow;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by a transport implementation.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The channel to the UI is gone (window closed, socket dropped)
    #[error("Transport channel is closed")]
    Closed,

    /// The platform layer failed to deliver the message
    #[error("Failed to send transport message: {0}")]
    Send(String),
}

/// Message channel to a live editor UI.
///
/// Implementations wrap whatever the host platform provides. `send` must not
/// block on the UI answering - replies come back asynchronously as inbound
/// `TransportMessage`s carrying the same correlation identifier.
pub trait UiTransport: Send + Sync {
    fn send(&self, message: TransportMessage) -> Result<(), TransportError>;
}

/// Wire messages exchanged with the editor UI.
///
/// Each payload carries the correlation identifier that ties a response back
/// to the request that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum TransportMessage {
    /// Bridge -> UI: send back the current canvas document
    #[serde(rename = "workflow:fetch")]
    FetchRequest(FetchRequest),

    /// UI -> bridge: the current canvas document (or none if the editor is
    /// empty)
    #[serde(rename = "workflow:fetch-result")]
    FetchResponse(FetchResponse),

    /// Bridge -> UI: replace the canvas document, possibly after human
    /// confirmation
    #[serde(rename = "workflow:apply")]
    ApplyRequest(ApplyRequest),

    /// UI -> bridge: outcome of an apply request
    #[serde(rename = "workflow:apply-result")]
    ApplyResponse(ApplyResponse),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest {
    pub request_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResponse {
    pub request_id: String,

    #[serde(default)]
    pub workflow: Option<Workflow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub request_id: String,

    pub workflow: Workflow,

    /// When true the UI shows a review dialog before applying, and the bridge
    /// waits on the long deadline
    pub require_confirmation: bool,

    /// Human-readable summary of the change, shown in the review dialog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResponse {
    pub request_id: String,

    pub applied: bool,

    /// Present when the UI explicitly failed the apply (e.g. the user
    /// rejected it)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// Include tests
#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;
