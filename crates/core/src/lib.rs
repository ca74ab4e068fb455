//! Domain core for the vision-to-video service.
//!
//! Holds the job data model and registry, the on-disk artifact store,
//! generation parameters, the error taxonomy, and the backend trait that
//! the generation strategies (`v2v-pipeline`, `v2v-comfyui`) implement.
//! No HTTP or framework code lives here.

pub mod artifacts;
pub mod backend;
pub mod error;
pub mod job;
pub mod params;
pub mod registry;
