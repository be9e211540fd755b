//! Config Target Tracker
//!
//! Per-session bookkeeping of which downstream AI tool integrations have had
//! their local MCP configuration written to point at this server instance.
//! The platform layer does the actual file writes; this tracker only prevents
//! redundant writes and answers "currently configured for: [...]" queries.
//! The set is append-only while the server runs and is cleared on stop, since
//! a restarted server gets a new ephemeral port and must not be assumed to
//! still be configured anywhere.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Mutex;

/// Downstream AI tool integrations that can call this server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigTarget {
    ClaudeCode,
    Codex,
    GeminiCli,
}

impl ConfigTarget {
    /// Identifier used in configuration files and status output.
    pub fn id(&self) -> &'static str {
        match self {
            ConfigTarget::ClaudeCode => "claude-code",
            ConfigTarget::Codex => "codex",
            ConfigTarget::GeminiCli => "gemini-cli",
        }
    }

    /// Which workflow schema document this tool should receive.
    ///
    /// gemini-cli runs with a tighter context budget, so it gets the reduced
    /// schema; everything else gets the full document.
    pub fn schema_variant(&self) -> SchemaVariant {
        match self {
            ConfigTarget::GeminiCli => SchemaVariant::Basic,
            _ => SchemaVariant::Full,
        }
    }
}

/// Workflow schema document flavor served by `get_workflow_schema`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVariant {
    Full,
    Basic,
}

/// Session-scoped record of configured downstream tools and the identity of
/// the one currently driving the server.
#[derive(Default)]
pub struct ConfigTargetTracker {
    configured: Mutex<HashSet<ConfigTarget>>,
    active: Mutex<Option<ConfigTarget>>,
}

impl ConfigTargetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `target` has been configured. Returns true when this is
    /// the first time in the session, so the caller knows a config write is
    /// actually needed.
    pub fn mark_configured(&self, target: ConfigTarget) -> bool {
        self.configured.lock().unwrap().insert(target)
    }

    pub fn is_configured(&self, target: ConfigTarget) -> bool {
        self.configured.lock().unwrap().contains(&target)
    }

    /// All targets configured this session, in stable id order.
    pub fn configured(&self) -> Vec<ConfigTarget> {
        let mut targets: Vec<ConfigTarget> =
            self.configured.lock().unwrap().iter().copied().collect();
        targets.sort_by_key(|t| t.id());
        targets
    }

    /// Set which downstream tool is currently driving the server.
    pub fn set_active_target(&self, target: Option<ConfigTarget>) {
        *self.active.lock().unwrap() = target;
    }

    pub fn active_target(&self) -> Option<ConfigTarget> {
        *self.active.lock().unwrap()
    }

    /// Forget everything session-scoped. Called on server stop.
    pub fn clear(&self) {
        self.configured.lock().unwrap().clear();
        *self.active.lock().unwrap() = None;
    }
}

// Include tests
#[cfg(test)]
#[path = "config_targets_test.rs"]
mod config_targets_test;
