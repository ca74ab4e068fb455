//! Job-graph template loading and per-job patching.
//!
//! A ComfyUI workflow is a JSON mapping keyed by node identifiers.
//! Before submission, three known nodes are patched in place: the image
//! loader's file reference, the text-prompt value, and the output
//! node's filename prefix.  The prefix carries the job id -- it is the
//! only way the engine's output is correlated back to a job, so it must
//! exactly match the watcher's polling predicate.

use std::path::Path;

use serde_json::Value;
use v2v_core::error::GenerationError;
use v2v_core::job::JobId;

/// Node-id mapping for the three patched entries of the template.
#[derive(Debug, Clone)]
pub struct NodeIds {
    /// LoadImage node: `inputs.image` receives the staged filename.
    pub image: String,
    /// Text-encode node: `inputs.text` receives the prompt.
    pub prompt: String,
    /// Video-output node: `inputs.filename_prefix` receives the job id.
    pub output: String,
}

impl Default for NodeIds {
    fn default() -> Self {
        Self {
            image: "10".to_string(),
            prompt: "6".to_string(),
            output: "9".to_string(),
        }
    }
}

/// Load a workflow template from disk.
///
/// An unreadable or unparseable template is a backend initialization
/// failure, not a submission failure -- the engine was never reached.
pub async fn load_template(path: &Path) -> Result<Value, GenerationError> {
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        GenerationError::BackendLoad(format!(
            "Cannot read workflow template {}: {e}",
            path.display()
        ))
    })?;
    serde_json::from_str(&text).map_err(|e| {
        GenerationError::BackendLoad(format!(
            "Workflow template {} is not valid JSON: {e}",
            path.display()
        ))
    })
}

/// Patch the three per-job entries of a workflow in place.
///
/// The output node's `filename_prefix` is set to the job id itself;
/// ComfyUI appends `_{counter}{ext}` when writing, which is what the
/// watcher's `"{job_id}_"` prefix test relies on.
pub fn patch_workflow(
    workflow: &mut Value,
    nodes: &NodeIds,
    image_filename: &str,
    prompt: &str,
    job_id: JobId,
) -> Result<(), GenerationError> {
    set_input(workflow, &nodes.image, "image", Value::from(image_filename))?;
    set_input(workflow, &nodes.prompt, "text", Value::from(prompt))?;
    set_input(
        workflow,
        &nodes.output,
        "filename_prefix",
        Value::from(job_id.to_string()),
    )?;
    Ok(())
}

/// Set `workflow[node_id].inputs[key] = value`, failing when the node or
/// its `inputs` object is missing from the template.
fn set_input(
    workflow: &mut Value,
    node_id: &str,
    key: &str,
    value: Value,
) -> Result<(), GenerationError> {
    let inputs = workflow
        .get_mut(node_id)
        .and_then(|node| node.get_mut("inputs"))
        .and_then(Value::as_object_mut)
        .ok_or_else(|| {
            GenerationError::Submission(format!(
                "Workflow template has no patchable node '{node_id}' (expected an object with 'inputs')"
            ))
        })?;
    inputs.insert(key.to_string(), value);
    Ok(())
}
