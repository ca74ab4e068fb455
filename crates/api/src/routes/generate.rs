//! Submission endpoint.
//!
//! Accepts a multipart form with an `image` file field and an optional
//! `prompt` text field, and returns `202 Accepted` with the allocated
//! job id.  The response never waits on generation.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::{routing::post, Json, Router};
use serde::Serialize;
use v2v_core::job::JobId;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Response body for an accepted submission.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub job_id: JobId,
}

/// POST /generate_video
async fn generate_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<SubmitResponse>)> {
    let mut image: Option<(String, axum::body::Bytes)> = None;
    let mut prompt: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") => {
                let filename = field.file_name().unwrap_or("upload.png").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read image field: {e}")))?;
                image = Some((filename, data));
            }
            Some("prompt") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read prompt field: {e}")))?;
                prompt = Some(text);
            }
            // Unknown fields are ignored rather than rejected.
            _ => {}
        }
    }

    let (filename, data) =
        image.ok_or_else(|| AppError::BadRequest("Missing 'image' file field".to_string()))?;
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded image is empty".to_string()));
    }

    let job_id = state
        .orchestrator
        .submit(&filename, &data, prompt)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to stage upload: {e}")))?;

    Ok((StatusCode::ACCEPTED, Json(SubmitResponse { job_id })))
}

/// Mount the submission route.
pub fn router() -> Router<AppState> {
    Router::new().route("/generate_video", post(generate_video))
}
