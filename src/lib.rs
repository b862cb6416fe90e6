//! # docstore - Deduplicating Document Store
//!
//! A content-addressed document store with reference-counted physical
//! storage, built on Clean Architecture principles. Every upload produces its
//! own catalog record; identical bytes collapse to a single physical blob.
//!
//! ## Architecture Layers
//!
//! - **Domain**: Core business logic (entities, value objects, domain errors)
//! - **Application**: Use cases and ports (interfaces)
//! - **Infrastructure**: Adapters for storage, inspection, and persistence
//!
//! ## Key Features
//!
//! - Content-addressed storage with automatic deduplication
//! - Atomic insert-or-increment reference counting, safe under concurrent
//!   uploads of identical content
//! - Per-upload catalog records with equality-filtered search
//! - Deferred garbage collection of unreferenced blobs
//!
//! ## Example Usage
//!
//! ```no_run
//! use bytes::Bytes;
//! use docstore::{ApplicationBuilder, Config, dto::IngestRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ApplicationBuilder::new(Config::from_env())
//!     .with_database()
//!     .await?
//!     .with_infrastructure()
//!     .await?
//!     .build()?;
//!
//! let receipt = store
//!     .ingest(
//!         IngestRequest {
//!             reference_number: "BSC-001".to_string(),
//!             category: "INV".to_string(),
//!             filename: "invoice.pdf".to_string(),
//!         },
//!         Bytes::from(std::fs::read("invoice.pdf")?),
//!     )
//!     .await?;
//! println!("{} ({})", receipt.document.id, receipt.message);
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export key types explicitly to avoid ambiguity
pub use application::{dto, ports, use_cases, ApplicationBuilder, DocumentStore};
pub use config::Config;
pub use domain::errors as domain_errors;
pub use domain::{entities, value_objects};
