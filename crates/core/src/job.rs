//! Job identity and status record.
//!
//! A [`Job`] tracks one submitted request through its full lifecycle.
//! The record is created with status `processing` during request
//! handling and mutated exactly once more when the background task
//! reaches a terminal state.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque unique job identifier, allocated at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Allocate a fresh random id (UUID v4).
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Lifecycle state of a job.
///
/// Transitions are monotonic along
/// `pending -> processing -> {completed | failed}`; a job never regresses
/// to an earlier state.  The registry enforces this on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether this status is terminal (no further transitions allowed).
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// The tracked record for one submitted generation request.
///
/// Serializes to the client-facing status payload: `video_path` is
/// present iff completed, `error` iff failed, and the staged input path
/// is never exposed.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    /// Unique job identifier.
    pub id: JobId,
    /// Current lifecycle state.
    pub status: JobStatus,
    /// Generation prompt attached to this job, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Staged input artifact (internal, removed after the job finishes).
    #[serde(skip)]
    pub input_path: PathBuf,
    /// Client-relative path of the delivered video, set iff completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_path: Option<String>,
    /// Human-readable failure description, set iff failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the job was accepted.
    pub submitted_at: DateTime<Utc>,
    /// When the job reached a terminal state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Create a record in the `processing` state, as inserted by the
    /// orchestrator before the background task starts.
    pub fn processing(id: JobId, input_path: PathBuf, prompt: Option<String>) -> Self {
        Self {
            id,
            status: JobStatus::Processing,
            prompt,
            input_path,
            video_path: None,
            error: None,
            submitted_at: Utc::now(),
            finished_at: None,
        }
    }
}
