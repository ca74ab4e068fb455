//! Job orchestration: identity allocation, staging, background dispatch.
//!
//! Each submission becomes one independently scheduled Tokio task.  The
//! request-handling context never blocks on generation: it returns the
//! job id as soon as the record is registered and the task is spawned.
//! Completion is observed only through the task's side effect on the
//! job registry.

use std::sync::Arc;

use v2v_core::artifacts::{delivered_filename, ArtifactStore};
use v2v_core::backend::{GenerationBackend, JobContext};
use v2v_core::job::{Job, JobId};
use v2v_core::params::GenerationParams;
use v2v_core::registry::JobRegistry;

/// Accepts new jobs and drives their lifecycle through the registry.
pub struct JobOrchestrator {
    registry: Arc<JobRegistry>,
    store: Arc<ArtifactStore>,
    backend: Arc<dyn GenerationBackend>,
    default_prompt: String,
    params: GenerationParams,
}

impl JobOrchestrator {
    pub fn new(
        registry: Arc<JobRegistry>,
        store: Arc<ArtifactStore>,
        backend: Arc<dyn GenerationBackend>,
        default_prompt: String,
    ) -> Self {
        Self {
            registry,
            store,
            backend,
            default_prompt,
            params: GenerationParams::default(),
        }
    }

    /// Accept a submission: allocate an id, stage the upload, register
    /// the `processing` record, spawn the generation task, and return.
    ///
    /// The record is inserted *before* the task is spawned, so a status
    /// query issued immediately after submission never sees "not found".
    /// Only a staging failure is surfaced to the caller; everything
    /// after the spawn is reported through the registry.
    pub async fn submit(
        &self,
        filename: &str,
        bytes: &[u8],
        prompt: Option<String>,
    ) -> std::io::Result<JobId> {
        let job_id = JobId::new();
        let input_path = self.store.stage_input(job_id, filename, bytes).await?;
        let prompt = effective_prompt(prompt, &self.default_prompt);

        self.registry.insert(Job::processing(
            job_id,
            input_path.clone(),
            Some(prompt.clone()),
        ));

        let ctx = JobContext {
            job_id,
            input_path,
            prompt,
            params: self.params.clone(),
        };
        tokio::spawn(run_job(
            Arc::clone(&self.registry),
            Arc::clone(&self.store),
            Arc::clone(&self.backend),
            ctx,
        ));

        tracing::info!(%job_id, filename, "Job submitted");
        Ok(job_id)
    }
}

/// The caller's prompt if non-empty, otherwise the configured default.
fn effective_prompt(supplied: Option<String>, default: &str) -> String {
    supplied
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// One job's background execution unit.
///
/// Every failure is folded into a terminal `failed` record -- nothing
/// escapes to crash the task or the process.  The staged input is
/// discarded exactly once, after the backend has finished with it.
async fn run_job(
    registry: Arc<JobRegistry>,
    store: Arc<ArtifactStore>,
    backend: Arc<dyn GenerationBackend>,
    ctx: JobContext,
) {
    let job_id = ctx.job_id;

    match backend.generate(&ctx).await {
        Ok(produced) => match store.deliver_output(job_id, &produced).await {
            Ok(delivered) => {
                let video_path = format!("outputs/{}", delivered_filename(job_id));
                registry.mark_completed(job_id, video_path);
                tracing::info!(%job_id, path = %delivered.display(), "Job completed");
            }
            Err(e) => {
                tracing::error!(%job_id, error = %e, "Job failed during delivery");
                registry.mark_failed(job_id, e.to_string());
            }
        },
        Err(e) => {
            tracing::error!(%job_id, error = %e, "Job failed");
            registry.mark_failed(job_id, e.to_string());
        }
    }

    store.discard_input(&ctx.input_path).await;
}
