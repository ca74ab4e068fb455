//! Status query endpoint.

use axum::extract::{Path, State};
use axum::{routing::get, Json, Router};
use v2v_core::job::{Job, JobId};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /status/{job_id}
///
/// Returns the job record as a flat JSON object.  An id that does not
/// parse is treated the same as one that was never submitted: 404.
async fn job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<Json<Job>> {
    let not_found = || AppError::NotFound {
        entity: "Job",
        id: job_id.clone(),
    };

    let id: JobId = job_id.parse().map_err(|_| not_found())?;
    let job = state.registry.get(&id).ok_or_else(not_found)?;

    Ok(Json(job))
}

/// Mount the status route.
pub fn router() -> Router<AppState> {
    Router::new().route("/status/{job_id}", get(job_status))
}
