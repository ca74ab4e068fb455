//! Generation knobs forwarded verbatim to the model pipeline.
//!
//! Defaults mirror the tuned Stable Video Diffusion settings: a fixed
//! seed for reproducibility, a reduced frame and step count for speed,
//! and a motion bucket / noise pairing that favors visible movement.

use serde::{Deserialize, Serialize};

/// Parameter set for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Target frame width the input image is resized to.
    pub width: u32,
    /// Target frame height the input image is resized to.
    pub height: u32,
    /// Number of frames to generate.
    pub num_frames: u32,
    /// Diffusion inference steps.
    pub num_inference_steps: u32,
    /// Motion amount control (0-255).
    pub motion_bucket_id: u32,
    /// Noise augmentation strength; a little noise yields more motion.
    pub noise_aug_strength: f32,
    /// Frames decoded per VAE chunk (memory/speed trade-off).
    pub decode_chunk_size: u32,
    /// Deterministic seed.
    pub seed: u64,
    /// Frame rate of the exported container.
    pub fps: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 576,
            num_frames: 14,
            num_inference_steps: 20,
            motion_bucket_id: 127,
            noise_aug_strength: 0.1,
            decode_chunk_size: 4,
            seed: 42,
            fps: 7,
        }
    }
}
