use std::path::Path;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::application::dto::DocumentFilter;
use crate::application::ports::{
    BlobRepository, DocumentRepository, RepositoryError,
};
use crate::domain::entities::{Blob, Document};
use crate::domain::value_objects::{ContentDigest, DocumentId};

/// In-memory blob ledger.
///
/// `acquire` relies on the map's `entry` API: the shard lock it takes is the
/// per-digest critical section, so insert-or-increment is atomic and two
/// concurrent acquires of one digest can never both observe "absent".
#[derive(Default)]
pub struct InMemoryBlobRepository {
    blobs: DashMap<String, Blob>,
}

impl InMemoryBlobRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobRepository for InMemoryBlobRepository {
    async fn acquire(
        &self,
        digest: &ContentDigest,
        storage_path: &Path,
        size_bytes: u64,
    ) -> Result<Blob, RepositoryError> {
        let entry = self
            .blobs
            .entry(digest.as_hex().to_string())
            .and_modify(|blob| blob.increment_ref())
            .or_insert_with(|| Blob::new(digest.clone(), storage_path.to_path_buf(), size_bytes));

        Ok(entry.value().clone())
    }

    async fn release(&self, digest: &ContentDigest) -> Result<i64, RepositoryError> {
        match self.blobs.get_mut(digest.as_hex()) {
            Some(mut blob) => {
                blob.decrement_ref();
                Ok(blob.ref_count())
            }
            None => Err(RepositoryError::NotFound(digest.to_string())),
        }
    }

    async fn find(&self, digest: &ContentDigest) -> Result<Option<Blob>, RepositoryError> {
        Ok(self.blobs.get(digest.as_hex()).map(|blob| blob.clone()))
    }

    async fn find_orphaned(&self, limit: i64) -> Result<Vec<Blob>, RepositoryError> {
        Ok(self
            .blobs
            .iter()
            .filter(|entry| entry.value().can_gc())
            .take(limit.max(0) as usize)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn delete(&self, digest: &ContentDigest) -> Result<(), RepositoryError> {
        self.blobs.remove(digest.as_hex());
        Ok(())
    }
}

/// In-memory document catalog
#[derive(Default)]
pub struct InMemoryDocumentRepository {
    documents: DashMap<String, Document>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot in the catalog's listing order: descending `uploaded_at`,
    /// id as tie-break
    fn snapshot(&self) -> Vec<Document> {
        let mut documents: Vec<Document> = self
            .documents
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        documents.sort_by(|a, b| {
            b.uploaded_at()
                .cmp(&a.uploaded_at())
                .then_with(|| b.id().to_string().cmp(&a.id().to_string()))
        });

        documents
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn insert(&self, document: &Document) -> Result<(), RepositoryError> {
        let key = document.id().to_string();
        if self.documents.contains_key(&key) {
            return Err(RepositoryError::Conflict(format!(
                "duplicate document id: {key}"
            )));
        }

        self.documents.insert(key, document.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, RepositoryError> {
        Ok(self
            .documents
            .get(&id.to_string())
            .map(|entry| entry.value().clone()))
    }

    async fn list(&self) -> Result<Vec<Document>, RepositoryError> {
        Ok(self.snapshot())
    }

    async fn search(&self, filter: &DocumentFilter) -> Result<Vec<Document>, RepositoryError> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|doc| {
                filter
                    .reference_number
                    .as_deref()
                    .map_or(true, |reference| doc.reference_number().as_str() == reference)
                    && filter
                        .category
                        .as_deref()
                        .map_or(true, |category| doc.category().as_str() == category)
            })
            .collect())
    }

    async fn delete(&self, id: &DocumentId) -> Result<(), RepositoryError> {
        match self.documents.remove(&id.to_string()) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound(id.to_string())),
        }
    }
}
