//! In-memory job registry.
//!
//! A process-wide mapping from job id to [`Job`] record, the single
//! source of truth for status queries.  Each record is written by the
//! one background task that owns its job id and read by any number of
//! concurrent status queries, so the mutex is held only for the
//! duration of a single insert or lookup -- never across an await point
//! and never across a generation call.
//!
//! The registry lives for the process lifetime only; records are never
//! persisted and never deleted.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::job::{Job, JobId, JobStatus};

/// Shared mapping from job id to status record.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: Mutex<HashMap<JobId, Job>>,
}

impl JobRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly created record.  Job ids are unique for the
    /// process lifetime, so this never observes an existing entry.
    pub fn insert(&self, job: Job) {
        self.lock().insert(job.id, job);
    }

    /// Look up a record by id, cloning it out so the lock is released
    /// before the caller serializes or inspects it.
    pub fn get(&self, id: &JobId) -> Option<Job> {
        self.lock().get(id).cloned()
    }

    /// Transition a job to `completed` with its delivered video path.
    ///
    /// Returns `false` (and leaves the record untouched) when the job is
    /// unknown or already terminal -- terminal states are final.
    pub fn mark_completed(&self, id: JobId, video_path: String) -> bool {
        self.finish(id, |job| {
            job.status = JobStatus::Completed;
            job.video_path = Some(video_path);
        })
    }

    /// Transition a job to `failed` with a human-readable description.
    ///
    /// Same monotonicity rules as [`mark_completed`](Self::mark_completed).
    pub fn mark_failed(&self, id: JobId, error: String) -> bool {
        self.finish(id, |job| {
            job.status = JobStatus::Failed;
            job.error = Some(error);
        })
    }

    /// Apply a terminal transition under the lock, enforcing that no job
    /// regresses out of a terminal state.
    fn finish(&self, id: JobId, apply: impl FnOnce(&mut Job)) -> bool {
        let mut jobs = self.lock();
        let Some(job) = jobs.get_mut(&id) else {
            tracing::warn!(job_id = %id, "Terminal transition for unknown job ignored");
            return false;
        };
        if job.status.is_terminal() {
            tracing::warn!(
                job_id = %id,
                status = ?job.status,
                "Terminal transition for already-finished job ignored",
            );
            return false;
        }
        apply(job);
        job.finished_at = Some(chrono::Utc::now());
        true
    }

    /// Take the map lock.  A poisoned lock is recovered rather than
    /// propagated: a panicking writer cannot leave a record half-written
    /// because every mutation is a single assignment batch.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<JobId, Job>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
