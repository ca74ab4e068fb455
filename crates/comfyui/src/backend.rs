//! The delegated backend: patch, submit, await.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use v2v_core::backend::{GenerationBackend, JobContext};
use v2v_core::error::GenerationError;

use crate::client::ComfyUIClient;
use crate::watcher;
use crate::workflow::{self, NodeIds};

/// Configuration for one ComfyUI instance.
#[derive(Debug, Clone)]
pub struct ComfyUIConfig {
    /// Base HTTP URL, e.g. `http://127.0.0.1:8188`.
    pub api_url: String,
    /// The engine's output directory (shared filesystem).
    pub output_dir: PathBuf,
    /// Path of the image-to-video workflow template.
    pub workflow_path: PathBuf,
    /// Delay between output-directory scans.
    pub poll_interval: Duration,
    /// Wall-clock bound on the total wait for engine output.
    pub poll_timeout: Duration,
    /// Node-id mapping for template patching.
    pub nodes: NodeIds,
}

/// Generation backend that delegates to an external ComfyUI instance.
///
/// Assumes the staging root is visible to the engine as its image input
/// directory, so only the staged *filename* is placed in the workflow.
pub struct ComfyUIBackend {
    client: ComfyUIClient,
    config: ComfyUIConfig,
}

impl ComfyUIBackend {
    pub fn new(config: ComfyUIConfig) -> Self {
        Self {
            client: ComfyUIClient::new(config.api_url.clone()),
            config,
        }
    }
}

#[async_trait]
impl GenerationBackend for ComfyUIBackend {
    async fn generate(&self, ctx: &JobContext) -> Result<PathBuf, GenerationError> {
        let mut graph = workflow::load_template(&self.config.workflow_path).await?;

        let image_filename = ctx
            .input_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                GenerationError::Input(format!(
                    "Staged input {} has no filename",
                    ctx.input_path.display()
                ))
            })?;

        workflow::patch_workflow(
            &mut graph,
            &self.config.nodes,
            &image_filename,
            &ctx.prompt,
            ctx.job_id,
        )?;

        let client_id = uuid::Uuid::new_v4().to_string();
        let queued = self.client.queue_prompt(&graph, &client_id).await?;
        tracing::info!(
            job_id = %ctx.job_id,
            prompt_id = %queued.prompt_id,
            queue_position = queued.number,
            "Workflow submitted to ComfyUI",
        );

        watcher::await_output(
            &self.config.output_dir,
            ctx.job_id,
            self.config.poll_interval,
            self.config.poll_timeout,
        )
        .await
    }
}
