//! Error taxonomy for the generation path.
//!
//! Every failure a background job can hit is folded into one of these
//! variants.  They never propagate out of the job task -- the orchestrator
//! catches them and records a terminal `failed` status carrying the
//! variant's message.  There is no retry anywhere: each variant is
//! terminal for its job.

/// Errors produced while generating or delivering a video.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The uploaded input image is missing or not a readable image.
    #[error("Invalid input image: {0}")]
    Input(String),

    /// The model pipeline or workflow template failed to initialize.
    #[error("Generation backend failed to load: {0}")]
    BackendLoad(String),

    /// The model pipeline started but failed during execution.
    #[error("Generation pipeline failed: {0}")]
    Pipeline(String),

    /// The external workflow engine rejected the job-graph submission or
    /// was unreachable.
    #[error("Workflow submission failed: {0}")]
    Submission(String),

    /// No matching output appeared in the engine's output directory
    /// within the configured bound.
    #[error("Timed out after {waited_secs}s waiting for generated output")]
    Timeout {
        /// Total wall-clock seconds waited before giving up.
        waited_secs: u64,
    },

    /// Copying or moving the finished artifact failed.
    #[error("Output delivery failed: {0}")]
    DeliveryIo(String),
}
