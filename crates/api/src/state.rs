use std::sync::Arc;

use v2v_core::registry::JobRegistry;

use crate::config::ServerConfig;
use crate::engine::JobOrchestrator;

/// Shared application state available to all axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Process-wide job registry, read by status queries.
    pub registry: Arc<JobRegistry>,
    /// Submission entry point; owns the background task dispatch.
    pub orchestrator: Arc<JobOrchestrator>,
}
