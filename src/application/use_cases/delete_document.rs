use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::application::ports::{
    BlobRepository, BlobStore, DocumentRepository, RepositoryError, StorageError,
};
use crate::domain::value_objects::DocumentId;

#[derive(Debug, Error)]
pub enum DeleteError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Document not found: {0}")]
    NotFound(String),
}

/// Use case: Delete a document record and release its blob reference.
///
/// The physical file is removed only when the released reference was the
/// last one; other records sharing the content keep reading the same blob.
pub struct DeleteDocumentUseCase {
    document_repo: Arc<dyn DocumentRepository>,
    blob_repo: Arc<dyn BlobRepository>,
    blob_store: Arc<dyn BlobStore>,
}

impl DeleteDocumentUseCase {
    pub fn new(
        document_repo: Arc<dyn DocumentRepository>,
        blob_repo: Arc<dyn BlobRepository>,
        blob_store: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            document_repo,
            blob_repo,
            blob_store,
        }
    }

    /// Execute delete workflow
    pub async fn execute(&self, id: &DocumentId) -> Result<(), DeleteError> {
        // 1. Find the record
        let document = match self.document_repo.find_by_id(id).await? {
            Some(doc) => doc,
            None => return Err(DeleteError::NotFound(id.to_string())),
        };

        // 2. Remove the catalog row first: once it is gone the reference
        //    release below can never under-count a live record
        self.document_repo.delete(id).await?;

        // 3. Release the blob reference
        let digest = document.content_digest();
        let ref_count = self.blob_repo.release(digest).await?;
        debug!(%digest, ref_count, "released blob reference");

        // 4. Last reference gone: reap the physical file and the ledger row
        if ref_count == 0 {
            match self.blob_store.remove(digest).await {
                Ok(()) => {}
                // Already gone: nothing left to reap
                Err(StorageError::NotFound(_)) => {}
                Err(e) => return Err(e.into()),
            }
            self.blob_repo.delete(digest).await?;
            info!(%digest, "blob fully released and removed");
        }

        Ok(())
    }
}
