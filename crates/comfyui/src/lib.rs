//! Delegated generation backend for a ComfyUI workflow engine.
//!
//! Submits a patched job-graph over the HTTP API and detects completion
//! by polling the engine's output directory for a file whose name is
//! prefixed with the job id -- the only linkage between submission and
//! result.  Provides the REST client, workflow template patching, the
//! directory watcher, and the [`GenerationBackend`] implementation tying
//! them together.
//!
//! [`GenerationBackend`]: v2v_core::backend::GenerationBackend

pub mod backend;
pub mod client;
pub mod watcher;
pub mod workflow;

pub use backend::{ComfyUIBackend, ComfyUIConfig};
