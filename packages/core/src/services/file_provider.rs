//! File-Backed Workflow Provider
//!
//! Headless [`WorkflowProvider`] over a JSON document on disk, for batch and
//! server deployments with no attached editor. A missing file reads as "no
//! workflow yet" rather than an error; writes go through a temp file and a
//! rename so a crash mid-write never leaves a torn document.

use crate::models::Workflow;
use crate::services::error::ProviderError;
use crate::services::workflow_bridge::WorkflowProvider;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct FileWorkflowProvider {
    path: PathBuf,
}

impl FileWorkflowProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the workflow document.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl WorkflowProvider for FileWorkflowProvider {
    async fn current_workflow(&self) -> Result<Option<Workflow>, ProviderError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let workflow: Workflow = serde_json::from_slice(&bytes)?;
                debug!("📂 Read workflow from {}", self.path.display());
                Ok(Some(workflow))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn apply_workflow(
        &self,
        workflow: &Workflow,
        description: Option<&str>,
    ) -> Result<bool, ProviderError> {
        let json = serde_json::to_vec_pretty(workflow)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        info!(
            "💾 Applied workflow to {} ({})",
            self.path.display(),
            description.unwrap_or("no description")
        );
        Ok(true)
    }
}

// Include tests
#[cfg(test)]
#[path = "file_provider_test.rs"]
mod file_provider_test;
