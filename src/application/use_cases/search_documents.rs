use std::sync::Arc;

use crate::application::dto::{DocumentDto, DocumentFilter};
use crate::application::errors::CatalogError;
use crate::application::ports::DocumentRepository;

/// Use case: Search documents by exact-equality filters.
///
/// Supplying no filter fields is equivalent to listing everything.
pub struct SearchDocumentsUseCase {
    document_repo: Arc<dyn DocumentRepository>,
}

impl SearchDocumentsUseCase {
    pub fn new(document_repo: Arc<dyn DocumentRepository>) -> Self {
        Self { document_repo }
    }

    pub async fn execute(&self, filter: DocumentFilter) -> Result<Vec<DocumentDto>, CatalogError> {
        let documents = if filter.is_empty() {
            self.document_repo.list().await?
        } else {
            self.document_repo.search(&filter).await?
        };

        Ok(documents.into_iter().map(DocumentDto::from).collect())
    }
}
