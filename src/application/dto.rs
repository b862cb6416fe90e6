use serde::{Deserialize, Serialize};

use crate::domain::entities::Document;

/// Format a megabyte size the way the listing endpoints expose it
pub fn format_filesize(megabytes: f64) -> String {
    format!("{:.2} Mo", megabytes)
}

/// DTO for document metadata responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentDto {
    pub id: String,
    pub reference_number: String,
    pub category: String,
    pub filename: String,
    pub page_count: u32,
    pub size_bytes: u64,
    pub filesize: String,
    pub uploaded_at: String,
    pub content_digest: String,
}

impl From<Document> for DocumentDto {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id().to_string(),
            reference_number: doc.reference_number().to_string(),
            category: doc.category().to_string(),
            filename: doc.filename().to_string(),
            page_count: doc.page_count(),
            size_bytes: doc.size_bytes(),
            filesize: format_filesize(doc.size_megabytes()),
            uploaded_at: doc.uploaded_at().to_rfc3339(),
            content_digest: doc.content_digest().to_string(),
        }
    }
}

/// DTO for ingest request metadata (the payload travels separately)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRequest {
    pub reference_number: String,
    pub category: String,
    pub filename: String,
}

/// Result of an ingest. `deduplicated` is observability metadata for the
/// caller; downstream behavior does not branch on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReceipt {
    pub document: DocumentDto,
    pub deduplicated: bool,
    pub message: String,
}

/// Equality filter for catalog searches; empty fields are ignored
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentFilter {
    pub reference_number: Option<String>,
    pub category: Option<String>,
}

impl DocumentFilter {
    pub fn is_empty(&self) -> bool {
        self.reference_number.is_none() && self.category.is_none()
    }
}

/// Physical location of a document's bytes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedDocument {
    pub path: std::path::PathBuf,
    pub extension: String,
}
