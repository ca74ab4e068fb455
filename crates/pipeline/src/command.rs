//! Blocking pipeline trait and the command-invoking implementation.
//!
//! [`SvdCommandPipeline`] shells out to the configured Stable Video
//! Diffusion generator, forwarding the generation knobs as CLI flags and
//! translating the failure modes into the uniform
//! [`GenerationError`] taxonomy: unreadable input image, generator
//! startup failure, and generator execution failure.

use std::path::{Path, PathBuf};
use std::process::Command;

use v2v_core::error::GenerationError;
use v2v_core::params::GenerationParams;

/// Maximum stderr lines carried into an error message.
const STDERR_TAIL_LINES: usize = 8;

/// A synchronous, single-attempt image-to-video pipeline.
///
/// `generate` blocks its thread for the full model run -- callers are
/// expected to dispatch it to a blocking task.  There is no timeout and
/// no retry: the call runs until the pipeline returns or the process is
/// terminated externally.
pub trait VideoPipeline: Send + Sync {
    fn generate(
        &self,
        input: &Path,
        output: &Path,
        params: &GenerationParams,
    ) -> Result<(), GenerationError>;
}

/// Pipeline implementation that invokes an external generator command.
#[derive(Debug)]
pub struct SvdCommandPipeline {
    program: PathBuf,
    base_args: Vec<String>,
}

impl SvdCommandPipeline {
    /// Create a pipeline around `program`, invoked with `base_args`
    /// followed by the per-job input/output paths and knob flags.
    pub fn new(program: impl Into<PathBuf>, base_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            base_args,
        }
    }
}

impl VideoPipeline for SvdCommandPipeline {
    fn generate(
        &self,
        input: &Path,
        output: &Path,
        params: &GenerationParams,
    ) -> Result<(), GenerationError> {
        // Reject missing or undecodable images before paying for a model
        // run.  Header-only: decodes dimensions, not pixels.
        image::image_dimensions(input).map_err(|e| {
            GenerationError::Input(format!(
                "Cannot read input image {}: {e}",
                input.display()
            ))
        })?;

        tracing::info!(
            program = %self.program.display(),
            input = %input.display(),
            output = %output.display(),
            "Running generation pipeline",
        );

        let result = Command::new(&self.program)
            .args(&self.base_args)
            .arg("--image-path")
            .arg(input)
            .arg("--output-path")
            .arg(output)
            .args(knob_flags(params))
            .output()
            .map_err(|e| {
                GenerationError::BackendLoad(format!(
                    "Failed to launch generator {}: {e}",
                    self.program.display()
                ))
            })?;

        if !result.status.success() {
            return Err(GenerationError::Pipeline(format!(
                "Generator exited with {}: {}",
                result.status,
                stderr_tail(&result.stderr)
            )));
        }

        if !output.exists() {
            return Err(GenerationError::Pipeline(
                "Generator exited successfully but produced no output file".to_string(),
            ));
        }

        Ok(())
    }
}

/// Render the generation knobs as CLI flags, forwarded verbatim.
fn knob_flags(params: &GenerationParams) -> Vec<String> {
    vec![
        "--width".into(),
        params.width.to_string(),
        "--height".into(),
        params.height.to_string(),
        "--num-frames".into(),
        params.num_frames.to_string(),
        "--num-inference-steps".into(),
        params.num_inference_steps.to_string(),
        "--motion-bucket-id".into(),
        params.motion_bucket_id.to_string(),
        "--noise-aug-strength".into(),
        params.noise_aug_strength.to_string(),
        "--decode-chunk-size".into(),
        params.decode_chunk_size.to_string(),
        "--seed".into(),
        params.seed.to_string(),
        "--fps".into(),
        params.fps.to_string(),
    ]
}

/// Last few lines of stderr, flattened for an error message.
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    let tail = lines[start..].join(" | ");
    if tail.is_empty() {
        "<no stderr output>".to_string()
    } else {
        tail
    }
}
