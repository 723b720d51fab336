use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use crate::error::Result;
use crate::utils::validation::UploadKind;

/// A file written to the staging area, remembering where it will land once
/// the owning database row commits.
#[derive(Debug, Clone)]
pub struct StagedUpload {
    staging_path: PathBuf,
    final_path: PathBuf,
    pub public_url: String,
}

/// Two-phase upload store. Files are first written under
/// `{root}/staging/`, invisible to the static file server, and renamed into
/// their category directory only after the application row exists. Staged
/// files orphaned by failed submissions are reclaimed by `sweep_stale`.
#[derive(Clone)]
pub struct UploadService {
    root: PathBuf,
}

impl UploadService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn staging_dir(&self) -> PathBuf {
        self.root.join("staging")
    }

    pub async fn stage(
        &self,
        kind: UploadKind,
        filename: &str,
        bytes: &[u8],
    ) -> Result<StagedUpload> {
        let staging_dir = self.staging_dir();
        tokio::fs::create_dir_all(&staging_dir).await?;

        // Prefix with the category so staged names cannot collide across
        // directories that share a filename scheme.
        let staged_name = format!("{}_{}", kind.dir_name(), filename);
        let staging_path = staging_dir.join(staged_name);
        tokio::fs::write(&staging_path, bytes).await?;

        Ok(StagedUpload {
            staging_path,
            final_path: self.root.join(kind.dir_name()).join(filename),
            public_url: format!("/uploads/{}/{}", kind.dir_name(), filename),
        })
    }

    /// Renames staged files into the public tree. Only called after the
    /// application row referencing their URLs has committed.
    pub async fn promote(&self, staged: &[StagedUpload]) -> Result<()> {
        for upload in staged {
            if let Some(parent) = upload.final_path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::rename(&upload.staging_path, &upload.final_path).await?;
        }
        Ok(())
    }

    /// Best-effort cleanup when a submission fails after staging. Anything
    /// left behind is picked up by the sweeper.
    pub async fn discard(&self, staged: &[StagedUpload]) {
        for upload in staged {
            if let Err(err) = tokio::fs::remove_file(&upload.staging_path).await {
                tracing::warn!(
                    path = %upload.staging_path.display(),
                    error = %err,
                    "could not remove staged upload"
                );
            }
        }
    }

    /// Deletes staged files older than `max_age`, returning how many went.
    pub async fn sweep_stale(&self, max_age: Duration) -> Result<u64> {
        let staging_dir = self.staging_dir();
        if !staging_dir.is_dir() {
            return Ok(0);
        }

        let mut removed = 0u64;
        let now = SystemTime::now();
        let mut entries = tokio::fs::read_dir(&staging_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let Ok(modified) = metadata.modified() else {
                continue;
            };
            let expired = now
                .duration_since(modified)
                .map(|age| age >= max_age)
                .unwrap_or(false);
            if !expired {
                continue;
            }
            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(err) => {
                    tracing::warn!(
                        path = %entry.path().display(),
                        error = %err,
                        "could not sweep staged upload"
                    );
                }
            }
        }

        if removed > 0 {
            tracing::info!(removed, "swept stale staged uploads");
        }
        Ok(removed)
    }
}
