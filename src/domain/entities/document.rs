use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Category, ContentDigest, DocumentId, ReferenceNumber};

const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

/// Document record - one logical upload event.
///
/// Distinct from content: many documents may point at the same blob. A record
/// is never mutated after creation; `size_bytes` is stored per record even
/// when several records share one blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    id: DocumentId,
    reference_number: ReferenceNumber,
    category: Category,
    filename: String,
    page_count: u32,
    size_bytes: u64,
    uploaded_at: DateTime<Utc>,
    content_digest: ContentDigest,
}

impl Document {
    /// Create a new record with a fresh id and `uploaded_at` stamped now
    pub fn new(
        reference_number: ReferenceNumber,
        category: Category,
        filename: String,
        page_count: u32,
        size_bytes: u64,
        content_digest: ContentDigest,
    ) -> Self {
        Self {
            id: DocumentId::new(),
            reference_number,
            category,
            filename,
            page_count,
            size_bytes,
            uploaded_at: Utc::now(),
            content_digest,
        }
    }

    /// Reconstruct from storage
    #[allow(clippy::too_many_arguments)]
    pub fn reconstruct(
        id: DocumentId,
        reference_number: ReferenceNumber,
        category: Category,
        filename: String,
        page_count: u32,
        size_bytes: u64,
        uploaded_at: DateTime<Utc>,
        content_digest: ContentDigest,
    ) -> Self {
        Self {
            id,
            reference_number,
            category,
            filename,
            page_count,
            size_bytes,
            uploaded_at,
            content_digest,
        }
    }

    /// Lowercased extension of the original filename, dot included
    pub fn extension(&self) -> String {
        match self.filename.rfind('.') {
            Some(pos) => self.filename[pos..].to_lowercase(),
            None => String::new(),
        }
    }

    pub fn size_megabytes(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_MEGABYTE
    }

    // Getters
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn reference_number(&self) -> &ReferenceNumber {
        &self.reference_number
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }

    pub fn content_digest(&self) -> &ContentDigest {
        &self.content_digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::CategorySet;
    use std::str::FromStr;

    fn create_test_document() -> Document {
        Document::new(
            ReferenceNumber::new("BSC-001".to_string()).unwrap(),
            Category::new("INV".to_string(), &CategorySet::default()).unwrap(),
            "fileA.pdf".to_string(),
            3,
            2_202_009,
            ContentDigest::from_str(&"a".repeat(64)).unwrap(),
        )
    }

    #[test]
    fn test_document_new_generates_unique_ids() {
        let doc1 = create_test_document();
        let doc2 = create_test_document();
        assert_ne!(doc1.id(), doc2.id());
    }

    #[test]
    fn test_document_extension_lowercased() {
        let mut doc = create_test_document();
        doc.filename = "Scan.JPEG".to_string();
        assert_eq!(doc.extension(), ".jpeg");
    }

    #[test]
    fn test_document_extension_missing() {
        let mut doc = create_test_document();
        doc.filename = "noextension".to_string();
        assert_eq!(doc.extension(), "");
    }

    #[test]
    fn test_document_size_megabytes() {
        let doc = create_test_document();
        assert!((doc.size_megabytes() - 2.1).abs() < 0.01);
    }
}
