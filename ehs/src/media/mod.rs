use crate::error::EhsError;
use anyhow::Result;
use async_trait::async_trait;
use log::{debug, error};
use std::path::{Path, PathBuf};

/// Keeps the files workers attach to their reports
#[async_trait]
pub trait MediaStore {
    /// Where the media of (task, worker) ends up, the same pair always maps to the same path
    fn destination(&self, task_id: i32, worker_id: i32) -> PathBuf;
    async fn has_media(&self, task_id: i32, worker_id: i32) -> Result<bool>;
    /// Copy `source` to its destination, replacing an older upload. Returns the stored path.
    async fn store_media(&self, task_id: i32, worker_id: i32, source: PathBuf) -> Result<String>;
    /// Drop a stored upload whose report never made it into the ledger
    async fn discard_media(&self, task_id: i32, worker_id: i32) -> Result<()>;
}

/// Use a local directory to persist media
pub struct FileMedia {
    root: PathBuf,
}

impl FileMedia {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileMedia { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn copy_error(path: &Path, err: impl ToString) -> anyhow::Error {
    EhsError::MediaCopy {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
    .into()
}

#[async_trait]
impl MediaStore for FileMedia {
    fn destination(&self, task_id: i32, worker_id: i32) -> PathBuf {
        self.root.join(format!("task_{}_user_{}", task_id, worker_id))
    }

    async fn has_media(&self, task_id: i32, worker_id: i32) -> Result<bool> {
        Ok(self.destination(task_id, worker_id).is_file())
    }

    async fn store_media(&self, task_id: i32, worker_id: i32, source: PathBuf) -> Result<String> {
        let dest = self.destination(task_id, worker_id);
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| copy_error(&self.root, e))?;

        match tokio::fs::copy(&source, &dest).await {
            Ok(size) => {
                debug!("copy {} to {} ({} bytes)", source.display(), dest.display(), size);
                Ok(dest.display().to_string())
            }
            Err(e) => {
                error!("failed to save media {}: {}", source.display(), e);
                Err(copy_error(&source, e))
            }
        }
    }

    async fn discard_media(&self, task_id: i32, worker_id: i32) -> Result<()> {
        let dest = self.destination(task_id, worker_id);
        match tokio::fs::remove_file(&dest).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(copy_error(&dest, e)),
        }
    }
}
