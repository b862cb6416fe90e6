use async_trait::async_trait;
use thiserror::Error;

use crate::application::dto::DocumentFilter;
use crate::domain::entities::Document;
use crate::domain::value_objects::DocumentId;
#[cfg(test)]
use mockall::{automock, predicate::*};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Persistence conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Port for document catalog persistence.
///
/// The catalog is append-only and never deduplicates: every insert produces a
/// new logical record even when the content digest repeats.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Persist a new document record
    async fn insert(&self, document: &Document) -> Result<(), RepositoryError>;

    /// Find document by id
    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, RepositoryError>;

    /// All records, ordered by descending `uploaded_at` (id as tie-break)
    async fn list(&self) -> Result<Vec<Document>, RepositoryError>;

    /// Records matching every supplied filter field by exact equality.
    /// An empty filter is equivalent to `list`. Same ordering as `list`.
    async fn search(&self, filter: &DocumentFilter) -> Result<Vec<Document>, RepositoryError>;

    /// Remove a record (hard delete)
    async fn delete(&self, id: &DocumentId) -> Result<(), RepositoryError>;
}
