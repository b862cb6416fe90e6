mod delete_document;
mod get_document;
mod ingest_document;
mod list_documents;
mod resolve_document;
mod search_documents;

pub use delete_document::{DeleteDocumentUseCase, DeleteError};
pub use get_document::GetDocumentUseCase;
pub use ingest_document::{IngestDocumentUseCase, IngestError};
pub use list_documents::ListDocumentsUseCase;
pub use resolve_document::ResolveDocumentUseCase;
pub use search_documents::SearchDocumentsUseCase;
