mod blob_repository;
mod blob_store;
mod document_repository;
mod page_counter;

pub use blob_repository::BlobRepository;
pub use blob_store::{BlobReader, BlobStore, StorageError};
pub use document_repository::{DocumentRepository, RepositoryError};
pub use page_counter::{InspectError, PageCounter};

#[cfg(test)]
pub use blob_repository::MockBlobRepository;
#[cfg(test)]
pub use blob_store::MockBlobStore;
#[cfg(test)]
pub use document_repository::MockDocumentRepository;
#[cfg(test)]
pub use page_counter::MockPageCounter;
