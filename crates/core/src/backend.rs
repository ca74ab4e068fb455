//! The generation backend seam.
//!
//! The orchestrator drives generation through [`GenerationBackend`]
//! without knowing which strategy is configured: the in-process model
//! pipeline (`v2v-pipeline`) or delegation to an external workflow
//! engine (`v2v-comfyui`).

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::job::JobId;
use crate::params::GenerationParams;

/// Everything a backend needs to run one job.
#[derive(Debug, Clone)]
pub struct JobContext {
    /// The job being generated.
    pub job_id: JobId,
    /// Staged input image.
    pub input_path: PathBuf,
    /// Effective prompt (caller-supplied or the configured default).
    pub prompt: String,
    /// Generation knobs, forwarded verbatim to the pipeline.
    pub params: GenerationParams,
}

/// A strategy that turns a staged input image into a video file.
///
/// `generate` makes a single attempt and returns the path of the
/// produced (pre-delivery) artifact; the orchestrator then moves it into
/// the delivery root.  Implementations must not touch the job registry
/// -- lifecycle bookkeeping belongs to the orchestrator.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, ctx: &JobContext) -> Result<PathBuf, GenerationError>;
}
