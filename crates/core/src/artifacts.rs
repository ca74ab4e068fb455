//! On-disk artifact staging and delivery.
//!
//! Two roots: an inbound staging area for uploaded images and an
//! outbound delivery area for finished videos.  All filenames embed the
//! job id, which is the sole mechanism preventing cross-job collisions
//! -- no directory-level locking is used.

use std::path::{Path, PathBuf};

use crate::error::GenerationError;
use crate::job::JobId;

/// Fallback name for uploads whose filename sanitizes to nothing.
const FALLBACK_UPLOAD_NAME: &str = "upload.bin";

/// Staged filename convention: `{job_id}_{original}`.
///
/// The original name is reduced to its final path component so a crafted
/// filename cannot escape the staging root.
pub fn staged_filename(job_id: JobId, original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original)
        .trim();
    let base = if base.is_empty() { FALLBACK_UPLOAD_NAME } else { base };
    format!("{job_id}_{base}")
}

/// Delivered filename convention: `{job_id}.mp4`.
pub fn delivered_filename(job_id: JobId) -> String {
    format!("{job_id}.mp4")
}

/// Manages the staging and delivery roots.
#[derive(Debug)]
pub struct ArtifactStore {
    staging_root: PathBuf,
    delivery_root: PathBuf,
}

impl ArtifactStore {
    /// Create a store over the given roots.  Call
    /// [`ensure_dirs`](Self::ensure_dirs) at startup before use.
    pub fn new(staging_root: impl Into<PathBuf>, delivery_root: impl Into<PathBuf>) -> Self {
        Self {
            staging_root: staging_root.into(),
            delivery_root: delivery_root.into(),
        }
    }

    /// Create both roots if absent.
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.staging_root).await?;
        tokio::fs::create_dir_all(&self.delivery_root).await?;
        Ok(())
    }

    /// Inbound staging root (`uploads/` by default).
    pub fn staging_root(&self) -> &Path {
        &self.staging_root
    }

    /// Outbound delivery root (`outputs/` by default).
    pub fn delivery_root(&self) -> &Path {
        &self.delivery_root
    }

    /// Write an uploaded image into the staging root under
    /// `{job_id}_{filename}`.  The write completes before returning, so
    /// the background task always sees the full file.
    pub async fn stage_input(
        &self,
        job_id: JobId,
        filename: &str,
        bytes: &[u8],
    ) -> std::io::Result<PathBuf> {
        let path = self.staging_root.join(staged_filename(job_id, filename));
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(%job_id, path = %path.display(), size = bytes.len(), "Staged input");
        Ok(path)
    }

    /// Scratch path for a backend that produces its output locally
    /// before delivery.
    pub fn scratch_output(&self, job_id: JobId) -> PathBuf {
        self.staging_root.join(format!("{job_id}_raw.mp4"))
    }

    /// Move (or copy, across filesystems) a produced artifact into the
    /// delivery root under the canonical `{job_id}.mp4` name.
    pub async fn deliver_output(
        &self,
        job_id: JobId,
        source: &Path,
    ) -> Result<PathBuf, GenerationError> {
        let dest = self.delivery_root.join(delivered_filename(job_id));
        if source == dest {
            return Ok(dest);
        }

        if tokio::fs::rename(source, &dest).await.is_err() {
            // Rename fails across devices (e.g. a shared engine output
            // mount); fall back to a plain copy.
            tokio::fs::copy(source, &dest).await.map_err(|e| {
                GenerationError::DeliveryIo(format!(
                    "Failed to copy {} to {}: {e}",
                    source.display(),
                    dest.display()
                ))
            })?;
        }

        tracing::debug!(%job_id, dest = %dest.display(), "Delivered output");
        Ok(dest)
    }

    /// Remove a staged input.  Idempotent: a missing file is a no-op,
    /// which guards against double-cleanup races.  Other I/O errors are
    /// logged and swallowed -- a leftover upload never fails a job.
    pub async fn discard_input(&self, path: &Path) {
        match tokio::fs::remove_file(path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "Discarded staged input"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to discard staged input");
            }
        }
    }
}
