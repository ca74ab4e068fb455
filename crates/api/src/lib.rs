//! HTTP façade and job orchestration for the vision-to-video service.
//!
//! Exposes the submission/status/retrieval surface over axum and owns
//! the [`engine::JobOrchestrator`] that dispatches each submission to a
//! background generation task.  Library form so integration tests drive
//! the exact router the binary serves.

pub mod config;
pub mod engine;
pub mod error;
pub mod router;
pub mod routes;
pub mod state;
