//! Output-directory watcher.
//!
//! The workflow engine offers no completion callback, so the watcher
//! polls the engine's output directory on a fixed interval, testing
//! each entry for a filename starting with `"{job_id}_"`.  The loop is
//! bounded by a wall-clock timeout: a job never waits forever.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::Instant;
use v2v_core::error::GenerationError;
use v2v_core::job::JobId;

/// Poll `dir` until a file prefixed with `"{job_id}_"` appears.
///
/// Polls immediately, then every `interval`, giving up `timeout` after
/// the first scan.  In the worst case the watcher returns
/// [`GenerationError::Timeout`] no later than `timeout + interval`
/// after submission.  If several files match, the first encountered in
/// the directory listing wins -- the engine is expected to produce
/// exactly one match per job id (documented assumption, not enforced).
pub async fn await_output(
    dir: &Path,
    job_id: JobId,
    interval: Duration,
    timeout: Duration,
) -> Result<PathBuf, GenerationError> {
    let prefix = format!("{job_id}_");
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(found) = scan_for_prefix(dir, &prefix).await? {
            tracing::info!(%job_id, path = %found.display(), "Engine output detected");
            return Ok(found);
        }

        if Instant::now() >= deadline {
            tracing::warn!(%job_id, dir = %dir.display(), "Gave up waiting for engine output");
            return Err(GenerationError::Timeout {
                waited_secs: timeout.as_secs(),
            });
        }

        tokio::time::sleep(interval).await;
    }
}

/// Single scan of `dir` for an entry whose filename starts with `prefix`.
async fn scan_for_prefix(dir: &Path, prefix: &str) -> Result<Option<PathBuf>, GenerationError> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| {
        GenerationError::DeliveryIo(format!(
            "Cannot list engine output directory {}: {e}",
            dir.display()
        ))
    })?;

    while let Some(entry) = entries.next_entry().await.map_err(|e| {
        GenerationError::DeliveryIo(format!(
            "Cannot read engine output directory {}: {e}",
            dir.display()
        ))
    })? {
        if entry.file_name().to_string_lossy().starts_with(prefix) {
            return Ok(Some(entry.path()));
        }
    }

    Ok(None)
}
