use std::sync::Arc;

use crate::application::dto::DocumentDto;
use crate::application::errors::CatalogError;
use crate::application::ports::DocumentRepository;

/// Use case: List all documents.
///
/// Ordering follows the repository contract: descending `uploaded_at`,
/// stable within a snapshot.
pub struct ListDocumentsUseCase {
    document_repo: Arc<dyn DocumentRepository>,
}

impl ListDocumentsUseCase {
    pub fn new(document_repo: Arc<dyn DocumentRepository>) -> Self {
        Self { document_repo }
    }

    pub async fn execute(&self) -> Result<Vec<DocumentDto>, CatalogError> {
        let documents = self.document_repo.list().await?;
        Ok(documents.into_iter().map(DocumentDto::from).collect())
    }
}
