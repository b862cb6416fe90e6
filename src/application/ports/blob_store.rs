use std::path::PathBuf;
use std::pin::Pin;

use async_trait::async_trait;
#[cfg(test)]
use mockall::{automock, predicate::*};
use thiserror::Error;
use tokio::io::AsyncRead;

use crate::domain::value_objects::ContentDigest;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Storage inconsistency: {0}")]
    Inconsistent(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Type alias for async reader
pub type BlobReader = Pin<Box<dyn AsyncRead + Send>>;

/// Port for physical blob storage.
///
/// Storage is keyed by content digest: one location per distinct content,
/// regardless of how many document records reference it. The store is the
/// only component that creates or removes physical files.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write the payload under its digest and return the storage path.
    /// Idempotent: if a file for this digest already exists, no new bytes are
    /// written and the existing path is returned.
    async fn write(&self, digest: &ContentDigest, payload: &[u8])
        -> Result<PathBuf, StorageError>;

    /// Open the blob for reading
    async fn read(&self, digest: &ContentDigest) -> Result<BlobReader, StorageError>;

    /// Remove the physical file
    async fn remove(&self, digest: &ContentDigest) -> Result<(), StorageError>;

    /// Check if the physical file exists
    async fn exists(&self, digest: &ContentDigest) -> Result<bool, StorageError>;

    /// Deterministic storage location for a digest
    fn locate(&self, digest: &ContentDigest) -> PathBuf;
}
