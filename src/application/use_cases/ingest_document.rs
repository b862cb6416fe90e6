use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::application::dto::{DocumentDto, IngestReceipt, IngestRequest};
use crate::application::ports::{
    BlobRepository, BlobStore, DocumentRepository, InspectError, PageCounter, RepositoryError,
    StorageError,
};
use crate::domain::entities::{Blob, Document};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{Category, CategorySet, ContentDigest, FileKind, ReferenceNumber};

/// Bounded retries for persistence-layer contention on the ledger upsert
const ACQUIRE_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Invalid input: {0}")]
    Domain(#[from] DomainError),

    #[error("Corrupt document: {0}")]
    Corrupt(#[from] InspectError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Use case: Ingest a document with content deduplication.
///
/// Validation, hashing, and page counting all run before the first storage
/// mutation, so a failure there leaves no partial state. The physical write
/// is idempotent per digest and the ledger acquire is atomic, so concurrent
/// ingests of identical bytes converge on one file and an exact count.
pub struct IngestDocumentUseCase {
    document_repo: Arc<dyn DocumentRepository>,
    blob_repo: Arc<dyn BlobRepository>,
    blob_store: Arc<dyn BlobStore>,
    page_counter: Arc<dyn PageCounter>,
    categories: CategorySet,
    max_payload_bytes: u64,
}

impl IngestDocumentUseCase {
    pub fn new(
        document_repo: Arc<dyn DocumentRepository>,
        blob_repo: Arc<dyn BlobRepository>,
        blob_store: Arc<dyn BlobStore>,
        page_counter: Arc<dyn PageCounter>,
        categories: CategorySet,
        max_payload_bytes: u64,
    ) -> Self {
        Self {
            document_repo,
            blob_repo,
            blob_store,
            page_counter,
            categories,
            max_payload_bytes,
        }
    }

    /// Execute ingest workflow
    pub async fn execute(
        &self,
        request: IngestRequest,
        payload: Bytes,
    ) -> Result<IngestReceipt, IngestError> {
        // 1. Validate filename extension and metadata
        let kind = FileKind::from_filename(&request.filename)?;
        let reference_number = ReferenceNumber::new(request.reference_number)?;
        let category = Category::new(request.category, &self.categories)?;

        let size_bytes = payload.len() as u64;
        if size_bytes > self.max_payload_bytes {
            return Err(DomainError::PayloadTooLarge {
                size: size_bytes,
                max: self.max_payload_bytes,
            }
            .into());
        }

        // 2. Content identity
        let digest = ContentDigest::of(&payload);

        // 3. Page count; a corrupt payload aborts before any storage mutation
        let page_count = self.page_counter.count_pages(kind, &payload).await?;

        // 4. Physical write (idempotent per digest), then the atomic
        //    insert-or-increment on the ledger
        let storage_path = self.blob_store.write(&digest, &payload).await?;
        let blob = self
            .acquire_with_retry(&digest, &storage_path, size_bytes)
            .await?;

        let deduplicated = !blob.is_sole_reference();
        if deduplicated {
            debug!(%digest, ref_count = blob.ref_count(), "content already stored, reusing blob");
        }

        // 5. Catalog record, one per upload event even on duplicate content.
        //    An insert failure releases the reference acquired in step 4 so no
        //    orphaned increment survives.
        let document = Document::new(
            reference_number,
            category,
            request.filename,
            page_count,
            size_bytes,
            digest.clone(),
        );

        if let Err(e) = self.document_repo.insert(&document).await {
            warn!(%digest, error = %e, "catalog insert failed, releasing blob reference");
            if let Err(release_err) = self.blob_repo.release(&digest).await {
                error!(%digest, error = %release_err, "rollback of blob reference failed");
            }
            return Err(e.into());
        }

        let message = if deduplicated {
            "Document uploaded successfully (deduplicated)"
        } else {
            "Document uploaded successfully"
        };

        Ok(IngestReceipt {
            document: DocumentDto::from(document),
            deduplicated,
            message: message.to_string(),
        })
    }

    async fn acquire_with_retry(
        &self,
        digest: &ContentDigest,
        storage_path: &std::path::Path,
        size_bytes: u64,
    ) -> Result<Blob, RepositoryError> {
        let mut attempt = 0;
        loop {
            match self.blob_repo.acquire(digest, storage_path, size_bytes).await {
                Err(RepositoryError::Conflict(reason)) if attempt < ACQUIRE_RETRIES => {
                    attempt += 1;
                    warn!(%digest, attempt, %reason, "blob acquire conflict, retrying");
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        MockBlobRepository, MockBlobStore, MockDocumentRepository, MockPageCounter,
    };
    use std::path::PathBuf;
    use std::sync::Arc;

    fn request(filename: &str) -> IngestRequest {
        IngestRequest {
            reference_number: "BSC-001".to_string(),
            category: "INV".to_string(),
            filename: filename.to_string(),
        }
    }

    fn use_case(
        document_repo: MockDocumentRepository,
        blob_repo: MockBlobRepository,
        blob_store: MockBlobStore,
        page_counter: MockPageCounter,
    ) -> IngestDocumentUseCase {
        IngestDocumentUseCase::new(
            Arc::new(document_repo),
            Arc::new(blob_repo),
            Arc::new(blob_store),
            Arc::new(page_counter),
            CategorySet::default(),
            64 * 1024 * 1024,
        )
    }

    fn stored_blob(digest: &ContentDigest, ref_count: i64, size: u64) -> Blob {
        Blob::reconstruct(
            digest.clone(),
            PathBuf::from("/data/sha256/xx/blob"),
            size,
            ref_count,
            chrono::Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_ingest_happy_path() {
        let payload = Bytes::from_static(b"%PDF-1.4 pretend");
        let digest = ContentDigest::of(&payload);
        let expected_size = payload.len() as u64;

        let mut document_repo = MockDocumentRepository::new();
        let mut blob_repo = MockBlobRepository::new();
        let mut blob_store = MockBlobStore::new();
        let mut page_counter = MockPageCounter::new();

        page_counter
            .expect_count_pages()
            .times(1)
            .returning(|_, _| Ok(3));
        blob_store
            .expect_write()
            .times(1)
            .returning(|_, _| Ok(PathBuf::from("/data/sha256/xx/blob")));
        {
            let digest = digest.clone();
            blob_repo
                .expect_acquire()
                .times(1)
                .returning(move |_, _, size| Ok(stored_blob(&digest, 1, size)));
        }
        document_repo.expect_insert().times(1).returning(|_| Ok(()));

        let use_case = use_case(document_repo, blob_repo, blob_store, page_counter);
        let receipt = use_case
            .execute(request("fileA.pdf"), payload)
            .await
            .unwrap();

        assert!(!receipt.deduplicated);
        assert_eq!(receipt.message, "Document uploaded successfully");
        assert_eq!(receipt.document.page_count, 3);
        assert_eq!(receipt.document.size_bytes, expected_size);
        assert_eq!(receipt.document.content_digest, digest.to_string());
    }

    #[tokio::test]
    async fn test_ingest_duplicate_content_reports_deduplication() {
        let payload = Bytes::from_static(b"identical bytes");
        let digest = ContentDigest::of(&payload);

        let mut document_repo = MockDocumentRepository::new();
        let mut blob_repo = MockBlobRepository::new();
        let mut blob_store = MockBlobStore::new();
        let mut page_counter = MockPageCounter::new();

        page_counter
            .expect_count_pages()
            .times(1)
            .returning(|_, _| Ok(1));
        blob_store
            .expect_write()
            .times(1)
            .returning(|_, _| Ok(PathBuf::from("/data/sha256/xx/blob")));
        {
            let digest = digest.clone();
            blob_repo
                .expect_acquire()
                .times(1)
                .returning(move |_, _, size| Ok(stored_blob(&digest, 2, size)));
        }
        document_repo.expect_insert().times(1).returning(|_| Ok(()));

        let use_case = use_case(document_repo, blob_repo, blob_store, page_counter);
        let receipt = use_case
            .execute(request("copy.jpg"), payload)
            .await
            .unwrap();

        assert!(receipt.deduplicated);
        assert_eq!(
            receipt.message,
            "Document uploaded successfully (deduplicated)"
        );
    }

    #[tokio::test]
    async fn test_ingest_rejects_bad_extension_before_any_mutation() {
        // No expectations set: any call on a collaborator would panic
        let use_case = use_case(
            MockDocumentRepository::new(),
            MockBlobRepository::new(),
            MockBlobStore::new(),
            MockPageCounter::new(),
        );

        let err = use_case
            .execute(request("notes.txt"), Bytes::from_static(b"data"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            IngestError::Domain(DomainError::UnsupportedExtension(_))
        ));
    }

    #[tokio::test]
    async fn test_ingest_rejects_unknown_category() {
        let use_case = use_case(
            MockDocumentRepository::new(),
            MockBlobRepository::new(),
            MockBlobStore::new(),
            MockPageCounter::new(),
        );

        let mut req = request("fileA.pdf");
        req.category = "NOPE".to_string();
        let err = use_case
            .execute(req, Bytes::from_static(b"data"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            IngestError::Domain(DomainError::UnknownCategory { .. })
        ));
    }

    #[tokio::test]
    async fn test_ingest_rejects_oversized_payload() {
        let mut use_case = use_case(
            MockDocumentRepository::new(),
            MockBlobRepository::new(),
            MockBlobStore::new(),
            MockPageCounter::new(),
        );
        use_case.max_payload_bytes = 4;

        let err = use_case
            .execute(request("fileA.pdf"), Bytes::from_static(b"five!"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            IngestError::Domain(DomainError::PayloadTooLarge { .. })
        ));
    }

    #[tokio::test]
    async fn test_ingest_corrupt_document_aborts_before_storage() {
        let mut page_counter = MockPageCounter::new();
        page_counter
            .expect_count_pages()
            .times(1)
            .returning(|_, _| Err(InspectError::Corrupt("not a pdf".to_string())));

        // Store and repositories get no expectations: any touch panics
        let use_case = use_case(
            MockDocumentRepository::new(),
            MockBlobRepository::new(),
            MockBlobStore::new(),
            page_counter,
        );

        let err = use_case
            .execute(request("broken.pdf"), Bytes::from_static(b"garbage"))
            .await
            .unwrap_err();

        assert!(matches!(err, IngestError::Corrupt(_)));
    }

    #[tokio::test]
    async fn test_ingest_catalog_failure_releases_acquired_reference() {
        let payload = Bytes::from_static(b"payload");
        let digest = ContentDigest::of(&payload);

        let mut document_repo = MockDocumentRepository::new();
        let mut blob_repo = MockBlobRepository::new();
        let mut blob_store = MockBlobStore::new();
        let mut page_counter = MockPageCounter::new();

        page_counter
            .expect_count_pages()
            .times(1)
            .returning(|_, _| Ok(1));
        blob_store
            .expect_write()
            .times(1)
            .returning(|_, _| Ok(PathBuf::from("/data/sha256/xx/blob")));
        {
            let digest = digest.clone();
            blob_repo
                .expect_acquire()
                .times(1)
                .returning(move |_, _, size| Ok(stored_blob(&digest, 1, size)));
        }
        document_repo
            .expect_insert()
            .times(1)
            .returning(|_| Err(RepositoryError::Internal("insert failed".to_string())));
        // The compensating release must run exactly once
        blob_repo.expect_release().times(1).returning(|_| Ok(0));

        let use_case = use_case(document_repo, blob_repo, blob_store, page_counter);
        let err = use_case
            .execute(request("fileA.pdf"), payload)
            .await
            .unwrap_err();

        assert!(matches!(err, IngestError::Repository(_)));
    }

    #[tokio::test]
    async fn test_ingest_retries_acquire_on_conflict() {
        let payload = Bytes::from_static(b"contended");
        let digest = ContentDigest::of(&payload);

        let mut document_repo = MockDocumentRepository::new();
        let mut blob_repo = MockBlobRepository::new();
        let mut blob_store = MockBlobStore::new();
        let mut page_counter = MockPageCounter::new();

        page_counter
            .expect_count_pages()
            .times(1)
            .returning(|_, _| Ok(1));
        blob_store
            .expect_write()
            .times(1)
            .returning(|_, _| Ok(PathBuf::from("/data/sha256/xx/blob")));

        let mut attempts = 0;
        {
            let digest = digest.clone();
            blob_repo
                .expect_acquire()
                .times(3)
                .returning(move |_, _, size| {
                    attempts += 1;
                    if attempts < 3 {
                        Err(RepositoryError::Conflict("serialization failure".to_string()))
                    } else {
                        Ok(stored_blob(&digest, 1, size))
                    }
                });
        }
        document_repo.expect_insert().times(1).returning(|_| Ok(()));

        let use_case = use_case(document_repo, blob_repo, blob_store, page_counter);
        let receipt = use_case
            .execute(request("fileA.pdf"), payload)
            .await
            .unwrap();

        assert!(!receipt.deduplicated);
    }
}
