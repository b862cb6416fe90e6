use std::path::Path;

use async_trait::async_trait;

use crate::domain::entities::Blob;
use crate::domain::value_objects::ContentDigest;
#[cfg(test)]
use mockall::{automock, predicate::*};

use super::RepositoryError;

/// Port for the blob ledger: reference counting keyed by content digest.
///
/// This is the only component allowed to mutate reference counts. The
/// lookup-then-create-or-increment sequence for one digest is a single atomic
/// operation (`acquire`); two concurrent acquires of the same digest never
/// both observe "absent".
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BlobRepository: Send + Sync {
    /// Atomic insert-or-increment: creates the ledger row with `ref_count = 1`
    /// on first sight of a digest, otherwise increments the existing count.
    /// Returns the row as it stands after this call.
    async fn acquire(
        &self,
        digest: &ContentDigest,
        storage_path: &Path,
        size_bytes: u64,
    ) -> Result<Blob, RepositoryError>;

    /// Decrement the reference count, saturating at zero.
    /// Returns the new count; a blob at zero is eligible for removal.
    async fn release(&self, digest: &ContentDigest) -> Result<i64, RepositoryError>;

    /// Find ledger row by digest
    async fn find(&self, digest: &ContentDigest) -> Result<Option<Blob>, RepositoryError>;

    /// Find blobs with zero references for GC
    async fn find_orphaned(&self, limit: i64) -> Result<Vec<Blob>, RepositoryError>;

    /// Delete ledger row (hard delete)
    async fn delete(&self, digest: &ContentDigest) -> Result<(), RepositoryError>;
}
