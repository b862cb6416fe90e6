use std::sync::Arc;

use crate::application::dto::ResolvedDocument;
use crate::application::errors::ResolveError;
use crate::application::ports::{BlobRepository, BlobStore, DocumentRepository};
use crate::domain::value_objects::DocumentId;

/// Use case: Resolve a document id to the physical location of its bytes.
///
/// A live record whose physical file has gone missing is a divergence between
/// the ledger and the filesystem and is surfaced as its own error, distinct
/// from an ordinary not-found.
pub struct ResolveDocumentUseCase {
    document_repo: Arc<dyn DocumentRepository>,
    blob_repo: Arc<dyn BlobRepository>,
    blob_store: Arc<dyn BlobStore>,
}

impl ResolveDocumentUseCase {
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

    pub async fn execute(&self, id: &DocumentId) -> Result<ResolvedDocument, ResolveError> {
        let document = match self.document_repo.find_by_id(id).await? {
            Some(doc) => doc,
            None => return Err(ResolveError::NotFound(id.to_string())),
        };

        let digest = document.content_digest();
        let blob = match self.blob_repo.find(digest).await? {
            Some(blob) => blob,
            None => return Err(ResolveError::NotFound(digest.to_string())),
        };

        if !self.blob_store.exists(digest).await? {
            return Err(ResolveError::Inconsistent {
                digest: digest.to_string(),
                path: blob.storage_path().display().to_string(),
            });
        }

        Ok(ResolvedDocument {
            path: blob.storage_path().to_path_buf(),
            extension: document.extension(),
        })
    }
}
