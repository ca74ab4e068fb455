//! Route modules for the public HTTP surface.
//!
//! ```text
//! GET  /                       welcome
//! GET  /health                 service health
//! POST /generate_video         submit an image, returns 202 + job id
//! GET  /status/{job_id}        job status record (404 for unknown ids)
//! GET  /outputs/{job_id}.mp4   delivered video (static, see router.rs)
//! ```

pub mod generate;
pub mod health;
pub mod status;
