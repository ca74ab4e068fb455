use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use v2v_core::artifacts::ArtifactStore;
use v2v_core::backend::GenerationBackend;
use v2v_core::registry::JobRegistry;
use v2v_pipeline::{LocalBackend, SvdCommandPipeline};

use v2v_api::config::{BackendConfig, ServerConfig};
use v2v_api::engine::JobOrchestrator;
use v2v_api::router;
use v2v_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "v2v_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        backend = config.backend.label(),
        "Loaded server configuration",
    );

    // --- Artifact directories ---
    let store = Arc::new(ArtifactStore::new(
        config.upload_dir.clone(),
        config.output_dir.clone(),
    ));
    store
        .ensure_dirs()
        .await
        .expect("Failed to create upload/output directories");
    tracing::info!(
        uploads = %config.upload_dir.display(),
        outputs = %config.output_dir.display(),
        "Artifact directories ready",
    );

    // --- Generation backend ---
    let backend: Arc<dyn GenerationBackend> = match &config.backend {
        BackendConfig::Local(pipeline) => {
            let pipeline = SvdCommandPipeline::new(pipeline.command.clone(), pipeline.args.clone());
            Arc::new(LocalBackend::new(Arc::new(pipeline), Arc::clone(&store)))
        }
        BackendConfig::ComfyUI(comfyui) => {
            Arc::new(v2v_comfyui::ComfyUIBackend::new(comfyui.clone()))
        }
    };

    // --- Orchestrator ---
    let registry = Arc::new(JobRegistry::new());
    let orchestrator = Arc::new(JobOrchestrator::new(
        Arc::clone(&registry),
        Arc::clone(&store),
        backend,
        config.default_prompt.clone(),
    ));

    // --- App state / router ---
    let state = AppState {
        config: Arc::new(config.clone()),
        registry,
        orchestrator,
    };
    let app = router::build_app(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // In-flight generation tasks are abandoned at exit; the registry is
    // process-local, so there is nothing to flush.
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
