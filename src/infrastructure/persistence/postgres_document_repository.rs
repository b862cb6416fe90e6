use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::application::dto::DocumentFilter;
use crate::application::ports::{DocumentRepository, RepositoryError};
use crate::domain::entities::Document;
use crate::domain::value_objects::{Category, ContentDigest, DocumentId, ReferenceNumber};

pub struct PostgresDocumentRepository {
    pool: PgPool,
}

impl PostgresDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn insert(&self, document: &Document) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO documents
                (id, reference_number, category, filename, page_count, size_bytes, uploaded_at, digest)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(document.id().as_uuid())
        .bind(document.reference_number().as_str())
        .bind(document.category().as_str())
        .bind(document.filename())
        .bind(document.page_count() as i32)
        .bind(document.size_bytes() as i64)
        .bind(document.uploaded_at())
        .bind(document.content_digest().as_hex())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, RepositoryError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, reference_number, category, filename, page_count, size_bytes, uploaded_at, digest
            FROM documents
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_domain()).transpose()
    }

    async fn list(&self) -> Result<Vec<Document>, RepositoryError> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, reference_number, category, filename, page_count, size_bytes, uploaded_at, digest
            FROM documents
            ORDER BY uploaded_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_domain()).collect()
    }

    async fn search(&self, filter: &DocumentFilter) -> Result<Vec<Document>, RepositoryError> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, reference_number, category, filename, page_count, size_bytes, uploaded_at, digest
            FROM documents
            WHERE ($1::text IS NULL OR reference_number = $1)
              AND ($2::text IS NULL OR category = $2)
            ORDER BY uploaded_at DESC, id DESC
            "#,
        )
        .bind(filter.reference_number.as_deref())
        .bind(filter.category.as_deref())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_domain()).collect()
    }

    async fn delete(&self, id: &DocumentId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    reference_number: String,
    category: String,
    filename: String,
    page_count: i32,
    size_bytes: i64,
    uploaded_at: chrono::DateTime<chrono::Utc>,
    digest: String,
}

impl DocumentRow {
    fn into_domain(self) -> Result<Document, RepositoryError> {
        let digest = ContentDigest::from_hex(self.digest)
            .map_err(|e| RepositoryError::Internal(e.to_string()))?;

        Ok(Document::reconstruct(
            DocumentId::from_uuid(self.id),
            ReferenceNumber::reconstruct(self.reference_number),
            Category::reconstruct(self.category),
            self.filename,
            self.page_count as u32,
            self.size_bytes as u64,
            self.uploaded_at,
            digest,
        ))
    }
}
