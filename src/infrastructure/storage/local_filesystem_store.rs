use std::collections::HashSet;
use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::fs::{self, File};
use tokio::io::BufReader;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::ports::{BlobReader, BlobStore, StorageError};
use crate::domain::value_objects::ContentDigest;
use crate::infrastructure::storage::{ContentHasher, PathBuilder};

/// Content-addressed blob store on the local filesystem.
///
/// Writes go to a temp file first and are renamed into their final
/// content-addressed location, so readers never observe partial blobs.
/// A write for a digest that already has a file is a no-op returning the
/// existing path; concurrent writers of the same digest converge on one file
/// because the rename target is identical and the temp copy of the loser is
/// discarded.
pub struct LocalFilesystemStore {
    path_builder: PathBuilder,
    durable_writes: bool,
    precreate_dirs: bool,
    // Prefix directories already known to exist; avoids a create_dir_all per write
    created_dirs: RwLock<HashSet<PathBuf>>,
}

impl LocalFilesystemStore {
    pub fn new(root: PathBuf) -> Self {
        Self::with_options(root, true, true)
    }

    pub fn with_options(root: PathBuf, durable_writes: bool, precreate_dirs: bool) -> Self {
        Self {
            path_builder: PathBuilder::new(root),
            durable_writes,
            precreate_dirs,
            created_dirs: RwLock::new(HashSet::new()),
        }
    }

    /// Initialize storage directories
    pub async fn init(&self) -> Result<(), StorageError> {
        let root = self.path_builder.root();
        fs::create_dir_all(root.join("temp")).await?;

        let sha256_root = root.join("sha256");
        fs::create_dir_all(&sha256_root).await?;

        // Pre-create the 256 hex prefix directories so writes skip the
        // per-call create_dir_all; a one-time cost at startup
        if self.precreate_dirs {
            for i in 0..=255 {
                let prefix = format!("{:02x}", i);
                fs::create_dir_all(sha256_root.join(prefix)).await?;
            }
        }

        Ok(())
    }

    async fn ensure_parent_dir(&self, final_path: &std::path::Path) -> Result<(), StorageError> {
        let Some(parent) = final_path.parent() else {
            return Ok(());
        };

        let parent = parent.to_path_buf();
        if self.created_dirs.read().contains(&parent) {
            return Ok(());
        }

        // Idempotent; another writer may have created it in the meantime
        fs::create_dir_all(&parent).await?;
        self.created_dirs.write().insert(parent);
        Ok(())
    }
}

#[async_trait]
impl BlobStore for LocalFilesystemStore {
    async fn write(
        &self,
        digest: &ContentDigest,
        payload: &[u8],
    ) -> Result<PathBuf, StorageError> {
        let final_path = self.path_builder.final_path(digest);

        // Content already stored: no new bytes are written
        if fs::metadata(&final_path).await.is_ok() {
            debug!(%digest, "blob already exists, skipping write");
            return Ok(final_path);
        }

        // Write to temp, hashing in the same pass to verify the declared digest
        let temp_path = self.path_builder.temp_path(Uuid::new_v4());
        debug!(%digest, temp = %temp_path.display(), "writing blob to temp file");

        let (actual_digest, size_bytes) =
            match ContentHasher::write_and_hash(&temp_path, payload, self.durable_writes).await {
                Ok(result) => result,
                Err(e) => {
                    warn!(%digest, error = %e, "failed to write blob to temp file");
                    let _ = fs::remove_file(&temp_path).await;
                    return Err(e);
                }
            };

        // The store never files bytes under a key they do not hash to
        if actual_digest != *digest {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::Inconsistent(format!(
                "payload hashes to {} but was declared as {}",
                actual_digest, digest
            )));
        }

        if let Err(e) = self.ensure_parent_dir(&final_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        // A concurrent writer of the same content may have landed first
        if fs::metadata(&final_path).await.is_ok() {
            debug!(%digest, "blob appeared concurrently, discarding temp copy");
            let _ = fs::remove_file(&temp_path).await;
            return Ok(final_path);
        }

        debug!(%digest, size_bytes, "moving blob to final location");
        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::Io(e));
        }

        // Persist the rename itself
        if self.durable_writes {
            if let Some(parent) = final_path.parent() {
                match File::open(parent).await {
                    Ok(parent_file) => {
                        if let Err(e) = parent_file.sync_all().await {
                            warn!(error = %e, "failed to sync parent directory after rename");
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to open parent directory for sync");
                    }
                }
            }
        }

        Ok(final_path)
    }

    async fn read(&self, digest: &ContentDigest) -> Result<BlobReader, StorageError> {
        let path = self.path_builder.final_path(digest);

        let file = File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(digest.to_string())
            } else {
                StorageError::Io(e)
            }
        })?;

        Ok(Box::pin(BufReader::new(file)))
    }

    async fn remove(&self, digest: &ContentDigest) -> Result<(), StorageError> {
        let path = self.path_builder.final_path(digest);

        fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(digest.to_string())
            } else {
                StorageError::Io(e)
            }
        })?;

        Ok(())
    }

    async fn exists(&self, digest: &ContentDigest) -> Result<bool, StorageError> {
        let path = self.path_builder.final_path(digest);
        Ok(fs::metadata(&path).await.is_ok())
    }

    fn locate(&self, digest: &ContentDigest) -> PathBuf {
        self.path_builder.final_path(digest)
    }
}
