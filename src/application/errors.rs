//! Common error types for use cases to reduce duplication

use thiserror::Error;

use crate::application::ports::{RepositoryError, StorageError};

/// Common error type for catalog read use cases (list, search, get)
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Document not found: {0}")]
    NotFound(String),
}

/// Common error type for the resolve use case
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Storage inconsistency: blob {digest} has a live record but no file at {path}")]
    Inconsistent { digest: String, path: String },
}
