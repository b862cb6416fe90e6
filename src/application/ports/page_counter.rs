use async_trait::async_trait;
#[cfg(test)]
use mockall::{automock, predicate::*};
use thiserror::Error;

use crate::domain::value_objects::FileKind;

#[derive(Debug, Error)]
pub enum InspectError {
    #[error("Corrupt document: {0}")]
    Corrupt(String),
}

/// Port for the page-counting collaborator.
///
/// Returns the number of pages in the payload (always >= 1), or
/// [`InspectError::Corrupt`] when the bytes do not parse as the declared kind.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PageCounter: Send + Sync {
    async fn count_pages(&self, kind: FileKind, payload: &[u8]) -> Result<u32, InspectError>;
}
