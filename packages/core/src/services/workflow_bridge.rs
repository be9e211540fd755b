//! Dual-Mode Workflow Bridge
//!
//! Routes every workflow operation through exactly one of three paths and
//! normalizes them behind a single contract (fetch current workflow / apply
//! a workflow):
//!
//! 1. **UI mode** - a live editor is attached; requests travel over the
//!    transport with a correlation identifier and await the matching reply.
//! 2. **Headless mode** - no editor; a provider reads/writes the document
//!    directly from storage.
//! 3. **Degraded mode** - neither is bound; fetches fall back to the
//!    in-memory cache (marked stale), applies fail explicitly.
//!
//! The cache is only ever replaced by a non-stale result, so staleness can
//! never compound. Binding switches are explicit and last-write-wins;
//! in-flight correlations stay tied to whichever transport existed when they
//! were issued.

use crate::models::{Workflow, WorkflowSnapshot};
use crate::services::correlation::RequestCorrelator;
use crate::services::error::{BridgeError, CorrelationError, ProviderError};
use crate::transport::{ApplyRequest, FetchRequest, TransportMessage, UiTransport};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Direct document access for deployments with no attached UI.
#[async_trait]
pub trait WorkflowProvider: Send + Sync {
    /// Read the current workflow document; `None` when none exists yet.
    async fn current_workflow(&self) -> Result<Option<Workflow>, ProviderError>;

    /// Write `workflow` as the current document. Returns false when the
    /// provider declined the write without it being an error.
    async fn apply_workflow(
        &self,
        workflow: &Workflow,
        description: Option<&str>,
    ) -> Result<bool, ProviderError>;
}

/// The collaborator the bridge currently routes through.
///
/// Exactly one binding is active at a time; switching happens only through
/// [`WorkflowBridge::set_transport`] / [`WorkflowBridge::set_workflow_provider`].
#[derive(Clone, Default)]
pub enum ProviderBinding {
    Ui(Arc<dyn UiTransport>),
    Headless(Arc<dyn WorkflowProvider>),
    #[default]
    None,
}

impl ProviderBinding {
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderBinding::Ui(_) => "ui",
            ProviderBinding::Headless(_) => "headless",
            ProviderBinding::None => "none",
        }
    }
}

/// Round-trip deadlines.
///
/// `apply_confirm` must accommodate a human reviewing the change in the
/// editor, not just network latency; it applies whenever the deployment
/// requires confirmation before applies.
#[derive(Debug, Clone, Copy)]
pub struct BridgeTimeouts {
    pub fetch: Duration,
    pub apply: Duration,
    pub apply_confirm: Duration,
}

impl Default for BridgeTimeouts {
    fn default() -> Self {
        Self {
            fetch: Duration::from_secs(5),
            apply: Duration::from_secs(5),
            apply_confirm: Duration::from_secs(300),
        }
    }
}

/// Shape the UI reports back for an apply request.
#[derive(Debug, Deserialize)]
struct ApplyOutcome {
    applied: bool,
}

/// Dual-mode workflow bridge.
///
/// Thread-safe behind `Arc`; all shared state (binding, cache, pending
/// correlations) is touched only in short non-awaiting critical sections.
pub struct WorkflowBridge {
    binding: Mutex<ProviderBinding>,
    correlator: RequestCorrelator,
    cache: Mutex<Option<Workflow>>,
    timeouts: BridgeTimeouts,
    require_confirmation: bool,
}

impl Default for WorkflowBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowBridge {
    /// Bridge with default deadlines, requiring human confirmation for
    /// UI-mode applies.
    pub fn new() -> Self {
        Self::with_timeouts(BridgeTimeouts::default(), true)
    }

    pub fn with_timeouts(timeouts: BridgeTimeouts, require_confirmation: bool) -> Self {
        Self {
            binding: Mutex::new(ProviderBinding::None),
            correlator: RequestCorrelator::new(),
            cache: Mutex::new(None),
            timeouts,
            require_confirmation,
        }
    }

    /// Bind a live UI transport, replacing any previous binding.
    pub fn set_transport(&self, transport: Arc<dyn UiTransport>) {
        info!("🔗 Workflow bridge bound to UI transport");
        *self.binding.lock().unwrap() = ProviderBinding::Ui(transport);
    }

    /// Bind a headless provider, replacing any previous binding.
    pub fn set_workflow_provider(&self, provider: Arc<dyn WorkflowProvider>) {
        info!("🔗 Workflow bridge bound to headless provider");
        *self.binding.lock().unwrap() = ProviderBinding::Headless(provider);
    }

    /// Drop the current binding; subsequent calls run in degraded mode.
    pub fn clear_binding(&self) {
        info!("🔗 Workflow bridge binding cleared");
        *self.binding.lock().unwrap() = ProviderBinding::None;
    }

    /// Which mode the next call will route through.
    pub fn binding_kind(&self) -> &'static str {
        self.binding.lock().unwrap().kind()
    }

    /// Last workflow observed via a non-stale path, if any.
    pub fn cached_workflow(&self) -> Option<Workflow> {
        self.cache.lock().unwrap().clone()
    }

    /// Record a freshly-obtained workflow as the fallback cache content.
    ///
    /// Callers must only pass non-stale documents (a live fetch result or a
    /// successfully applied workflow) - never a value that itself came from
    /// the cache.
    pub fn update_workflow_cache(&self, workflow: Workflow) {
        *self.cache.lock().unwrap() = Some(workflow);
    }

    /// Fetch the current workflow through the active binding.
    ///
    /// Never fails for "no data": an empty editor or absent cache comes back
    /// as a `None` workflow with `is_stale` communicating trust. The only
    /// error paths are a UI timeout with an empty cache, an explicit UI
    /// rejection, or a provider failure.
    pub async fn request_current_workflow(&self) -> Result<WorkflowSnapshot, BridgeError> {
        let binding = self.binding.lock().unwrap().clone();
        debug!("📥 Workflow fetch via {} binding", binding.kind());

        match binding {
            ProviderBinding::Ui(transport) => {
                let pending = self.correlator.issue(self.timeouts.fetch);
                let request_id = pending.id().to_string();

                let dispatch = transport.send(TransportMessage::FetchRequest(FetchRequest {
                    request_id,
                }));
                if let Err(e) = dispatch {
                    warn!("⚠️  Fetch dispatch to UI failed: {}", e);
                    self.correlator.forget(pending.id());
                    return match self.cached_workflow() {
                        Some(workflow) => Ok(WorkflowSnapshot::stale(Some(workflow))),
                        None => Err(e.into()),
                    };
                }

                match pending.wait().await {
                    Ok(value) => {
                        let workflow: Option<Workflow> = serde_json::from_value(value)
                            .map_err(|e| BridgeError::Protocol(e.to_string()))?;
                        if let Some(workflow) = &workflow {
                            self.update_workflow_cache(workflow.clone());
                        }
                        Ok(WorkflowSnapshot {
                            workflow,
                            is_stale: false,
                        })
                    }
                    Err(CorrelationError::Timeout { waited_ms }) => {
                        match self.cached_workflow() {
                            Some(workflow) => {
                                warn!(
                                    "⚠️  Fetch timed out after {}ms; serving cached workflow",
                                    waited_ms
                                );
                                Ok(WorkflowSnapshot::stale(Some(workflow)))
                            }
                            None => Err(BridgeError::Timeout { waited_ms }),
                        }
                    }
                    Err(CorrelationError::Rejected(reason)) => Err(BridgeError::Rejected(reason)),
                    Err(CorrelationError::Abandoned) => Err(BridgeError::Protocol(
                        "pending fetch dropped before a response arrived".to_string(),
                    )),
                }
            }

            ProviderBinding::Headless(provider) => {
                let workflow = provider.current_workflow().await?;
                if let Some(workflow) = &workflow {
                    self.update_workflow_cache(workflow.clone());
                }
                Ok(WorkflowSnapshot {
                    workflow,
                    is_stale: false,
                })
            }

            ProviderBinding::None => Ok(WorkflowSnapshot::stale(self.cached_workflow())),
        }
    }

    /// Apply `workflow` as the current document through the active binding.
    ///
    /// Writes never fall back silently: no binding is an error, a UI timeout
    /// is an error, and a UI-side explicit failure is an error. `Ok(false)`
    /// means the responder declined without failing.
    pub async fn apply_workflow(
        &self,
        workflow: Workflow,
        description: Option<String>,
    ) -> Result<bool, BridgeError> {
        let binding = self.binding.lock().unwrap().clone();
        debug!("📤 Workflow apply via {} binding", binding.kind());

        match binding {
            ProviderBinding::Ui(transport) => {
                let timeout = if self.require_confirmation {
                    self.timeouts.apply_confirm
                } else {
                    self.timeouts.apply
                };
                let pending = self.correlator.issue(timeout);

                let dispatch = transport.send(TransportMessage::ApplyRequest(ApplyRequest {
                    request_id: pending.id().to_string(),
                    workflow: workflow.clone(),
                    require_confirmation: self.require_confirmation,
                    description,
                }));
                if let Err(e) = dispatch {
                    // Writes never fall back; drop the entry with the request.
                    self.correlator.forget(pending.id());
                    return Err(e.into());
                }

                match pending.wait().await {
                    Ok(value) => {
                        let outcome: ApplyOutcome = serde_json::from_value(value)
                            .map_err(|e| BridgeError::Protocol(e.to_string()))?;
                        if outcome.applied {
                            self.update_workflow_cache(workflow);
                        }
                        Ok(outcome.applied)
                    }
                    Err(CorrelationError::Timeout { waited_ms }) => {
                        Err(BridgeError::Timeout { waited_ms })
                    }
                    Err(CorrelationError::Rejected(reason)) => Err(BridgeError::Rejected(reason)),
                    Err(CorrelationError::Abandoned) => Err(BridgeError::Protocol(
                        "pending apply dropped before a response arrived".to_string(),
                    )),
                }
            }

            ProviderBinding::Headless(provider) => {
                let applied = provider
                    .apply_workflow(&workflow, description.as_deref())
                    .await?;
                if applied {
                    self.update_workflow_cache(workflow);
                }
                Ok(applied)
            }

            ProviderBinding::None => Err(BridgeError::NoActiveEditor),
        }
    }

    /// Feed an inbound UI message into the correlation engine.
    ///
    /// The host glue calls this for every message the transport receives.
    /// Responses for unknown correlation identifiers (late, duplicate, or
    /// timed out) are dropped silently; request-type messages are not
    /// expected inbound and are logged.
    pub fn handle_transport_message(&self, message: TransportMessage) {
        match message {
            TransportMessage::FetchResponse(response) => {
                let value = serde_json::to_value(&response.workflow).unwrap_or(Value::Null);
                self.correlator.resolve(&response.request_id, value);
            }
            TransportMessage::ApplyResponse(response) => match response.error {
                Some(error) => self.correlator.reject(&response.request_id, error),
                None => self
                    .correlator
                    .resolve(&response.request_id, json!({ "applied": response.applied })),
            },
            TransportMessage::FetchRequest(_) | TransportMessage::ApplyRequest(_) => {
                warn!("⚠️  Ignoring unexpected request-type message from UI");
            }
        }
    }

    /// Requests currently awaiting a UI response.
    pub fn pending_requests(&self) -> usize {
        self.correlator.pending_count()
    }
}

// Include tests
#[cfg(test)]
#[path = "workflow_bridge_test.rs"]
mod workflow_bridge_test;
