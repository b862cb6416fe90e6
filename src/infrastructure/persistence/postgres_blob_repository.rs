use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sqlx::PgPool;

use crate::application::ports::{BlobRepository, RepositoryError};
use crate::domain::entities::Blob;
use crate::domain::value_objects::ContentDigest;

// Postgres class 40 errors: serialization failure / deadlock detected.
// Both are transient contention and retried by the ingest pipeline.
const RETRYABLE_SQLSTATES: [&str; 2] = ["40001", "40P01"];

pub struct PostgresBlobRepository {
    pool: PgPool,
}

impl PostgresBlobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_db_error(e: sqlx::Error) -> RepositoryError {
    if let Some(code) = e.as_database_error().and_then(|db| db.code()) {
        if RETRYABLE_SQLSTATES.contains(&code.as_ref()) {
            return RepositoryError::Conflict(e.to_string());
        }
    }
    RepositoryError::Database(e)
}

#[async_trait]
impl BlobRepository for PostgresBlobRepository {
    async fn acquire(
        &self,
        digest: &ContentDigest,
        storage_path: &Path,
        size_bytes: u64,
    ) -> Result<Blob, RepositoryError> {
        // Insert-or-increment as one statement: the upsert is the serialized
        // critical section per digest, so two concurrent acquires can never
        // both initialize ref_count = 1
        let row = sqlx::query_as::<_, BlobRow>(
            r#"
            INSERT INTO blobs (digest, storage_path, size_bytes, ref_count)
            VALUES ($1, $2, $3, 1)
            ON CONFLICT (digest) DO UPDATE SET ref_count = blobs.ref_count + 1
            RETURNING digest, storage_path, size_bytes, ref_count, created_at
            "#,
        )
        .bind(digest.as_hex())
        .bind(storage_path.to_string_lossy().into_owned())
        .bind(size_bytes as i64)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.into_domain()
    }

    async fn release(&self, digest: &ContentDigest) -> Result<i64, RepositoryError> {
        let row = sqlx::query_as::<_, (i64,)>(
            r#"
            UPDATE blobs
            SET ref_count = GREATEST(ref_count - 1, 0)
            WHERE digest = $1
            RETURNING ref_count
            "#,
        )
        .bind(digest.as_hex())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        match row {
            Some((ref_count,)) => Ok(ref_count),
            None => Err(RepositoryError::NotFound(digest.to_string())),
        }
    }

    async fn find(&self, digest: &ContentDigest) -> Result<Option<Blob>, RepositoryError> {
        let row = sqlx::query_as::<_, BlobRow>(
            r#"
            SELECT digest, storage_path, size_bytes, ref_count, created_at
            FROM blobs
            WHERE digest = $1
            "#,
        )
        .bind(digest.as_hex())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_domain()).transpose()
    }

    async fn find_orphaned(&self, limit: i64) -> Result<Vec<Blob>, RepositoryError> {
        let rows = sqlx::query_as::<_, BlobRow>(
            r#"
            SELECT digest, storage_path, size_bytes, ref_count, created_at
            FROM blobs
            WHERE ref_count = 0
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_domain()).collect()
    }

    async fn delete(&self, digest: &ContentDigest) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM blobs WHERE digest = $1")
            .bind(digest.as_hex())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct BlobRow {
    digest: String,
    storage_path: String,
    size_bytes: i64,
    ref_count: i64,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl BlobRow {
    fn into_domain(self) -> Result<Blob, RepositoryError> {
        let digest = ContentDigest::from_hex(self.digest)
            .map_err(|e| RepositoryError::Internal(e.to_string()))?;

        Ok(Blob::reconstruct(
            digest,
            PathBuf::from(self.storage_path),
            self.size_bytes as u64,
            self.ref_count,
            self.created_at,
        ))
    }
}
