use std::sync::Arc;

use futures_util::future::join_all;
use thiserror::Error;
use tracing::{info, warn};

use crate::application::ports::{BlobRepository, BlobStore, RepositoryError, StorageError};
use crate::domain::entities::Blob;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Deferred reaper for blobs whose reference count has reached zero.
///
/// The upload path only ever adds references; this sweep is the hook that
/// eventually removes content nothing points at anymore (crash leftovers,
/// or rows a delete could not fully reap). File first, ledger row second:
/// a sweep interrupted between the two leaves a row the next cycle retries.
pub struct OrphanSweeper {
    blob_repo: Arc<dyn BlobRepository>,
    blob_store: Arc<dyn BlobStore>,
    batch_size: i64,
}

impl OrphanSweeper {
    pub fn new(
        blob_repo: Arc<dyn BlobRepository>,
        blob_store: Arc<dyn BlobStore>,
        batch_size: i64,
    ) -> Self {
        Self {
            blob_repo,
            blob_store,
            batch_size,
        }
    }

    /// Collect one batch of orphaned blobs. Returns how many were reaped.
    pub async fn sweep(&self) -> Result<usize, SweepError> {
        let orphaned = self.blob_repo.find_orphaned(self.batch_size).await?;
        if orphaned.is_empty() {
            return Ok(0);
        }

        let results = join_all(orphaned.iter().map(|blob| self.reap(blob))).await;
        let reaped = results.iter().filter(|outcome| **outcome).count();

        info!(reaped, candidates = orphaned.len(), "orphaned blob sweep finished");
        Ok(reaped)
    }

    async fn reap(&self, blob: &Blob) -> bool {
        let digest = blob.digest();

        match self.blob_store.remove(digest).await {
            Ok(()) | Err(StorageError::NotFound(_)) => {}
            Err(e) => {
                warn!(%digest, error = %e, "failed to remove orphaned blob file");
                return false;
            }
        }

        if let Err(e) = self.blob_repo.delete(digest).await {
            warn!(%digest, error = %e, "failed to delete orphaned ledger row");
            return false;
        }

        true
    }
}
