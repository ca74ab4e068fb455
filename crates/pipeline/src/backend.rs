//! Async adapter from the blocking pipeline to the backend seam.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use v2v_core::artifacts::ArtifactStore;
use v2v_core::backend::{GenerationBackend, JobContext};
use v2v_core::error::GenerationError;

use crate::command::VideoPipeline;

/// InProcess generation backend.
///
/// Runs the model pipeline on a blocking thread and writes the result to
/// a scratch path in the staging root; delivery to the output root is
/// the orchestrator's job.  The pipeline call occupies its thread for
/// the whole run -- there is no timeout (a known design gap shared with
/// the original service).
pub struct LocalBackend {
    pipeline: Arc<dyn VideoPipeline>,
    store: Arc<ArtifactStore>,
}

impl LocalBackend {
    pub fn new(pipeline: Arc<dyn VideoPipeline>, store: Arc<ArtifactStore>) -> Self {
        Self { pipeline, store }
    }
}

#[async_trait]
impl GenerationBackend for LocalBackend {
    async fn generate(&self, ctx: &JobContext) -> Result<PathBuf, GenerationError> {
        let output = self.store.scratch_output(ctx.job_id);

        let pipeline = Arc::clone(&self.pipeline);
        let input = ctx.input_path.clone();
        let scratch = output.clone();
        let params = ctx.params.clone();

        tokio::task::spawn_blocking(move || pipeline.generate(&input, &scratch, &params))
            .await
            .map_err(|e| GenerationError::Pipeline(format!("Generation task panicked: {e}")))??;

        Ok(output)
    }
}
