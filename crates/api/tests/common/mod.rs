//! Shared helpers for integration tests.
//!
//! Builds the real application router over temporary artifact
//! directories with an injected stub backend, so tests exercise the
//! full HTTP surface without a model or an external engine.

// Compiled separately into each test binary; not every helper is used
// by every suite.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use v2v_api::config::{BackendConfig, PipelineConfig, ServerConfig};
use v2v_api::engine::JobOrchestrator;
use v2v_api::router::build_app;
use v2v_api::state::AppState;
use v2v_core::artifacts::ArtifactStore;
use v2v_core::backend::{GenerationBackend, JobContext};
use v2v_core::error::GenerationError;
use v2v_core::registry::JobRegistry;

pub const DEFAULT_TEST_PROMPT: &str = "test default prompt";

/// Everything a test needs to drive the app and observe side effects.
pub struct TestApp {
    pub app: Router,
    pub registry: Arc<JobRegistry>,
    pub store: Arc<ArtifactStore>,
    // Held so the artifact directories outlive the test.
    _dir: tempfile::TempDir,
}

fn test_config(upload_dir: PathBuf, output_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 5,
        upload_dir,
        output_dir,
        default_prompt: DEFAULT_TEST_PROMPT.to_string(),
        backend: BackendConfig::Local(PipelineConfig {
            command: "true".into(),
            args: vec![],
        }),
    }
}

/// Build the full app over temp directories with the given backend.
pub async fn build_test_app(backend: Arc<dyn GenerationBackend>) -> TestApp {
    build_test_app_with(move |_| backend).await
}

/// Like [`build_test_app`], but the backend is constructed from the
/// app's own [`ArtifactStore`], for stubs that write real artifacts.
pub async fn build_test_app_with<F>(make_backend: F) -> TestApp
where
    F: FnOnce(Arc<ArtifactStore>) -> Arc<dyn GenerationBackend>,
{
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path().join("uploads"), dir.path().join("outputs"));

    let store = Arc::new(ArtifactStore::new(
        config.upload_dir.clone(),
        config.output_dir.clone(),
    ));
    store.ensure_dirs().await.unwrap();
    let backend = make_backend(Arc::clone(&store));

    let registry = Arc::new(JobRegistry::new());
    let orchestrator = Arc::new(JobOrchestrator::new(
        Arc::clone(&registry),
        Arc::clone(&store),
        backend,
        config.default_prompt.clone(),
    ));

    let state = AppState {
        config: Arc::new(config.clone()),
        registry: Arc::clone(&registry),
        orchestrator,
    };

    TestApp {
        app: build_app(state, &config),
        registry,
        store,
        _dir: dir,
    }
}

// ---- Stub backends ----------------------------------------------------------

/// Writes a fake video to the scratch path and succeeds.
pub struct OkBackend {
    pub store: Arc<ArtifactStore>,
}

#[async_trait]
impl GenerationBackend for OkBackend {
    async fn generate(&self, ctx: &JobContext) -> Result<PathBuf, GenerationError> {
        let out = self.store.scratch_output(ctx.job_id);
        tokio::fs::write(&out, b"fake mp4 bytes")
            .await
            .map_err(|e| GenerationError::Pipeline(e.to_string()))?;
        Ok(out)
    }
}

/// Always fails with a pipeline error.
pub struct FailBackend;

#[async_trait]
impl GenerationBackend for FailBackend {
    async fn generate(&self, _ctx: &JobContext) -> Result<PathBuf, GenerationError> {
        Err(GenerationError::Pipeline("synthetic failure".to_string()))
    }
}

/// Never resolves; jobs stay `processing` for the test's lifetime.
pub struct PendingBackend;

#[async_trait]
impl GenerationBackend for PendingBackend {
    async fn generate(&self, _ctx: &JobContext) -> Result<PathBuf, GenerationError> {
        std::future::pending().await
    }
}

// ---- Request helpers --------------------------------------------------------

const BOUNDARY: &str = "testboundary7MA4YWxkTrZu0gW";

/// Build a multipart `POST /generate_video` request body.
///
/// `image` adds the file field; `prompt` adds the text field.
pub fn multipart_request(image: Option<(&str, &[u8])>, prompt: Option<&str>) -> Request<Body> {
    let mut body = Vec::new();

    if let Some((filename, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    if let Some(prompt) = prompt {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"prompt\"\r\n\r\n{prompt}\r\n")
                .as_bytes(),
        );
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/generate_video")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Issue a GET request against the app.
pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Poll `/status/{job_id}` until the job reaches a terminal state.
///
/// Panics if the job is still `processing` after ~2 seconds; stub
/// backends finish far faster than that.
pub async fn wait_for_terminal(app: &Router, job_id: &str) -> serde_json::Value {
    for _ in 0..200 {
        let response = get(app, &format!("/status/{job_id}")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        match json["status"].as_str() {
            Some("completed") | Some("failed") => return json,
            _ => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }
    panic!("job {job_id} never reached a terminal state");
}

/// Submit an upload and return the allocated job id.
pub async fn submit_job(
    app: &Router,
    image: Option<(&str, &[u8])>,
    prompt: Option<&str>,
) -> String {
    let response = app
        .clone()
        .oneshot(multipart_request(image, prompt))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_json(response).await;
    json["job_id"].as_str().expect("job_id in response").to_string()
}
