use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::application::dto::{
    DocumentDto, DocumentFilter, IngestReceipt, IngestRequest, ResolvedDocument,
};
use crate::application::errors::{CatalogError, ResolveError};
use crate::application::gc::{OrphanSweeper, SweepError};
use crate::application::ports::{BlobRepository, BlobStore, DocumentRepository, PageCounter};
use crate::application::use_cases::{
    DeleteDocumentUseCase, DeleteError, GetDocumentUseCase, IngestDocumentUseCase, IngestError,
    ListDocumentsUseCase, ResolveDocumentUseCase, SearchDocumentsUseCase,
};
use crate::config::Config;
use crate::domain::value_objects::{CategorySet, DocumentId};
use crate::infrastructure::inspect::DocumentProbe;
use crate::infrastructure::persistence::{
    InMemoryBlobRepository, InMemoryDocumentRepository, PostgresBlobRepository,
    PostgresDocumentRepository,
};
use crate::infrastructure::storage::LocalFilesystemStore;

const SCHEMA_SQL: &str = include_str!("../../migrations/0001_init.sql");

/// The assembled store: the one ingest operation plus the read paths,
/// delete, and the orphan sweep hook
pub struct DocumentStore {
    ingest: Arc<IngestDocumentUseCase>,
    list: Arc<ListDocumentsUseCase>,
    search: Arc<SearchDocumentsUseCase>,
    get: Arc<GetDocumentUseCase>,
    resolve: Arc<ResolveDocumentUseCase>,
    delete: Arc<DeleteDocumentUseCase>,
    sweeper: Arc<OrphanSweeper>,
}

impl DocumentStore {
    pub async fn ingest(
        &self,
        request: IngestRequest,
        payload: Bytes,
    ) -> Result<IngestReceipt, IngestError> {
        self.ingest.execute(request, payload).await
    }

    pub async fn list(&self) -> Result<Vec<DocumentDto>, CatalogError> {
        self.list.execute().await
    }

    pub async fn find(&self, filter: DocumentFilter) -> Result<Vec<DocumentDto>, CatalogError> {
        self.search.execute(filter).await
    }

    pub async fn get(&self, id: &DocumentId) -> Result<DocumentDto, CatalogError> {
        self.get.execute(id).await
    }

    pub async fn resolve_physical_location(
        &self,
        id: &DocumentId,
    ) -> Result<ResolvedDocument, ResolveError> {
        self.resolve.execute(id).await
    }

    pub async fn delete(&self, id: &DocumentId) -> Result<(), DeleteError> {
        self.delete.execute(id).await
    }

    pub async fn sweep_orphaned(&self) -> Result<usize, SweepError> {
        self.sweeper.sweep().await
    }
}

/// Application builder for clean dependency injection and setup
pub struct ApplicationBuilder {
    config: Config,
    pool: Option<sqlx::PgPool>,
    document_repo: Option<Arc<dyn DocumentRepository>>,
    blob_repo: Option<Arc<dyn BlobRepository>>,
    blob_store: Option<Arc<dyn BlobStore>>,
    page_counter: Option<Arc<dyn PageCounter>>,
}

impl ApplicationBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            pool: None,
            document_repo: None,
            blob_repo: None,
            blob_store: None,
            page_counter: None,
        }
    }

    /// Initialize database connection pool with retry logic and apply the schema
    pub async fn with_database(mut self) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Connecting to database: {}", self.config.database_url);

        let mut retries = 3;
        let mut delay = Duration::from_secs(1);
        let pool = loop {
            match PgPoolOptions::new()
                .max_connections(self.config.db_max_connections)
                .min_connections(self.config.db_min_connections)
                .acquire_timeout(Duration::from_secs(self.config.db_acquire_timeout_secs))
                .connect(&self.config.database_url)
                .await
            {
                Ok(pool) => break pool,
                Err(e) if retries > 0 => {
                    retries -= 1;
                    tracing::warn!(
                        "Database connection failed, retrying in {:?} ({} retries left): {}",
                        delay,
                        retries,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => {
                    tracing::error!("Failed to connect to database after retries: {}", e);
                    return Err(Box::new(e));
                }
            }
        };

        info!("Applying database schema");
        sqlx::raw_sql(SCHEMA_SQL).execute(&pool).await?;

        self.pool = Some(pool);
        Ok(self)
    }

    /// Initialize infrastructure backed by Postgres and the local filesystem
    pub async fn with_infrastructure(mut self) -> Result<Self, Box<dyn std::error::Error>> {
        let pool = self.pool.as_ref().ok_or("Database pool not initialized")?;

        self.document_repo = Some(Arc::new(PostgresDocumentRepository::new(pool.clone())));
        self.blob_repo = Some(Arc::new(PostgresBlobRepository::new(pool.clone())));
        self.init_storage().await?;

        info!("Infrastructure layer initialized");
        Ok(self)
    }

    /// Initialize infrastructure with in-memory repositories (embedded and
    /// test setups; no database required)
    pub async fn with_in_memory_persistence(mut self) -> Result<Self, Box<dyn std::error::Error>> {
        self.document_repo = Some(Arc::new(InMemoryDocumentRepository::new()));
        self.blob_repo = Some(Arc::new(InMemoryBlobRepository::new()));
        self.init_storage().await?;

        info!("In-memory persistence initialized");
        Ok(self)
    }

    async fn init_storage(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let blob_store = Arc::new(LocalFilesystemStore::new(self.config.storage_root.clone()));
        blob_store.init().await?;
        self.blob_store = Some(blob_store);
        self.page_counter = Some(Arc::new(DocumentProbe));
        Ok(())
    }

    /// Build the assembled store with all use cases
    pub fn build(self) -> Result<DocumentStore, Box<dyn std::error::Error>> {
        let document_repo = self
            .document_repo
            .ok_or("Document repository not initialized")?;
        let blob_repo = self.blob_repo.ok_or("Blob repository not initialized")?;
        let blob_store = self.blob_store.ok_or("Blob store not initialized")?;
        let page_counter = self.page_counter.ok_or("Page counter not initialized")?;

        let categories = CategorySet::new(self.config.allowed_categories.clone());

        let ingest = Arc::new(IngestDocumentUseCase::new(
            Arc::clone(&document_repo),
            Arc::clone(&blob_repo),
            Arc::clone(&blob_store),
            Arc::clone(&page_counter),
            categories,
            self.config.max_upload_bytes,
        ));

        let list = Arc::new(ListDocumentsUseCase::new(Arc::clone(&document_repo)));
        let search = Arc::new(SearchDocumentsUseCase::new(Arc::clone(&document_repo)));
        let get = Arc::new(GetDocumentUseCase::new(Arc::clone(&document_repo)));

        let resolve = Arc::new(ResolveDocumentUseCase::new(
            Arc::clone(&document_repo),
            Arc::clone(&blob_repo),
            Arc::clone(&blob_store),
        ));

        let delete = Arc::new(DeleteDocumentUseCase::new(
            Arc::clone(&document_repo),
            Arc::clone(&blob_repo),
            Arc::clone(&blob_store),
        ));

        let sweeper = Arc::new(OrphanSweeper::new(
            Arc::clone(&blob_repo),
            Arc::clone(&blob_store),
            self.config.gc_batch_size,
        ));

        info!("Application layer initialized");

        Ok(DocumentStore {
            ingest,
            list,
            search,
            get,
            resolve,
            delete,
            sweeper,
        })
    }

    /// Get configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
