//! In-process generation backend.
//!
//! Wraps the Stable Video Diffusion generator as a blocking
//! [`VideoPipeline`](command::VideoPipeline) call and adapts it to the
//! async [`GenerationBackend`](v2v_core::backend::GenerationBackend)
//! seam via a dedicated blocking task.

pub mod backend;
pub mod command;

pub use backend::LocalBackend;
pub use command::{SvdCommandPipeline, VideoPipeline};
