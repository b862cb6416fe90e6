mod memory;
mod postgres_blob_repository;
mod postgres_document_repository;

pub use memory::{InMemoryBlobRepository, InMemoryDocumentRepository};
pub use postgres_blob_repository::PostgresBlobRepository;
pub use postgres_document_repository::PostgresDocumentRepository;
