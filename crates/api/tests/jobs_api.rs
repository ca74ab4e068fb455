//! Integration tests for the job lifecycle endpoints.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, get, multipart_request, submit_job, wait_for_terminal, FailBackend,
    OkBackend, PendingBackend,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

// ---- Submission -------------------------------------------------------------

#[tokio::test]
async fn submit_returns_202_with_job_id() {
    let t = build_test_app(Arc::new(PendingBackend)).await;

    let response = t
        .app
        .clone()
        .oneshot(multipart_request(Some(("cat.png", b"png-bytes")), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_json(response).await;
    let job_id = json["job_id"].as_str().unwrap();
    // The id is a UUID the client can poll with.
    assert!(job_id.parse::<uuid::Uuid>().is_ok());
}

#[tokio::test]
async fn submit_without_image_is_rejected() {
    let t = build_test_app(Arc::new(PendingBackend)).await;

    let response = t
        .app
        .clone()
        .oneshot(multipart_request(None, Some("a prompt but no image")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("image"));
}

#[tokio::test]
async fn submit_with_empty_image_is_rejected() {
    let t = build_test_app(Arc::new(PendingBackend)).await;

    let response = t
        .app
        .clone()
        .oneshot(multipart_request(Some(("cat.png", b"")), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_is_queryable_immediately_after_submission() {
    let t = build_test_app(Arc::new(PendingBackend)).await;

    let job_id = submit_job(&t.app, Some(("cat.png", b"png-bytes")), None).await;

    let response = get(&t.app, &format!("/status/{job_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "processing");
    assert!(json.get("video_path").is_none());
    assert!(json.get("error").is_none());
}

#[tokio::test]
async fn submitted_prompt_is_recorded_on_the_job() {
    let t = build_test_app(Arc::new(PendingBackend)).await;

    let job_id = submit_job(
        &t.app,
        Some(("cat.png", b"png-bytes")),
        Some("a cat surfing"),
    )
    .await;

    let response = get(&t.app, &format!("/status/{job_id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["prompt"], "a cat surfing");
}

#[tokio::test]
async fn missing_prompt_falls_back_to_default() {
    let t = build_test_app(Arc::new(PendingBackend)).await;

    let job_id = submit_job(&t.app, Some(("cat.png", b"png-bytes")), None).await;

    let response = get(&t.app, &format!("/status/{job_id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["prompt"], common::DEFAULT_TEST_PROMPT);
}

// ---- Status lookup ----------------------------------------------------------

#[tokio::test]
async fn unknown_job_id_is_404() {
    let t = build_test_app(Arc::new(PendingBackend)).await;

    let id = uuid::Uuid::new_v4();
    let response = get(&t.app, &format!("/status/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_job_id_is_404() {
    let t = build_test_app(Arc::new(PendingBackend)).await;

    let response = get(&t.app, "/status/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---- Completion -------------------------------------------------------------

#[tokio::test]
async fn completed_job_exposes_video_path() {
    let t = common::build_test_app_with(|store| Arc::new(OkBackend { store })).await;

    let job_id = submit_job(&t.app, Some(("cat.png", b"png-bytes")), None).await;
    let json = wait_for_terminal(&t.app, &job_id).await;

    assert_eq!(json["status"], "completed");
    assert_eq!(
        json["video_path"].as_str().unwrap(),
        format!("outputs/{job_id}.mp4")
    );
    assert!(json.get("error").is_none());
    assert!(json["finished_at"].is_string());

    // The delivered file exists on disk and is non-empty.
    let delivered = t.store.delivery_root().join(format!("{job_id}.mp4"));
    let meta = tokio::fs::metadata(&delivered).await.unwrap();
    assert!(meta.len() > 0);
}

#[tokio::test]
async fn completed_video_is_served_from_outputs() {
    let t = common::build_test_app_with(|store| Arc::new(OkBackend { store })).await;

    let job_id = submit_job(&t.app, Some(("cat.png", b"png-bytes")), None).await;
    let json = wait_for_terminal(&t.app, &job_id).await;
    assert_eq!(json["status"], "completed");

    let response = get(&t.app, &format!("/outputs/{job_id}.mp4")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"fake mp4 bytes");
}

// ---- Failure ----------------------------------------------------------------

#[tokio::test]
async fn failed_job_exposes_error_and_no_video() {
    let t = build_test_app(Arc::new(FailBackend)).await;

    let job_id = submit_job(&t.app, Some(("cat.png", b"png-bytes")), None).await;
    let json = wait_for_terminal(&t.app, &job_id).await;

    assert_eq!(json["status"], "failed");
    assert!(!json["error"].as_str().unwrap().is_empty());
    assert!(json.get("video_path").is_none());
}

#[tokio::test]
async fn staged_input_is_discarded_after_failure() {
    let t = build_test_app(Arc::new(FailBackend)).await;

    let job_id = submit_job(&t.app, Some(("cat.png", b"png-bytes")), None).await;
    wait_for_terminal(&t.app, &job_id).await;

    // Cleanup runs just after the terminal transition, so allow it a
    // moment to land.
    let staged = t.store.staging_root().join(format!("{job_id}_cat.png"));
    for _ in 0..100 {
        if !staged.exists() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("staged input {} was never discarded", staged.display());
}

// ---- Concurrency ------------------------------------------------------------

#[tokio::test]
async fn concurrent_jobs_do_not_cross_contaminate() {
    let t = build_test_app(Arc::new(FailBackend)).await;

    let mut ids = Vec::new();
    for i in 0..5 {
        let prompt = format!("prompt {i}");
        let id = submit_job(&t.app, Some(("cat.png", b"png-bytes")), Some(&prompt)).await;
        ids.push((id, prompt));
    }

    for (id, prompt) in &ids {
        let json = wait_for_terminal(&t.app, id).await;
        assert_eq!(json["prompt"].as_str().unwrap(), prompt);
        assert_eq!(json["id"].as_str().unwrap(), id);
    }
}
