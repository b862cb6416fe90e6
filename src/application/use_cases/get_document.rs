use std::sync::Arc;

use crate::application::dto::DocumentDto;
use crate::application::errors::CatalogError;
use crate::application::ports::DocumentRepository;
use crate::domain::value_objects::DocumentId;

/// Use case: Fetch a single document by id
pub struct GetDocumentUseCase {
    document_repo: Arc<dyn DocumentRepository>,
}

impl GetDocumentUseCase {
    pub fn new(document_repo: Arc<dyn DocumentRepository>) -> Self {
        Self { document_repo }
    }

    pub async fn execute(&self, id: &DocumentId) -> Result<DocumentDto, CatalogError> {
        match self.document_repo.find_by_id(id).await? {
            Some(document) => Ok(DocumentDto::from(document)),
            None => Err(CatalogError::NotFound(id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockDocumentRepository;
    use crate::domain::entities::Document;
    use crate::domain::value_objects::{
        Category, CategorySet, ContentDigest, ReferenceNumber,
    };
    use std::str::FromStr;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_document_found() {
        let document = Document::new(
            ReferenceNumber::new("BSC-001".to_string()).unwrap(),
            Category::new("OTH".to_string(), &CategorySet::default()).unwrap(),
            "scan.jpg".to_string(),
            1,
            512,
            ContentDigest::from_str(&"c".repeat(64)).unwrap(),
        );
        let id = *document.id();

        let mut document_repo = MockDocumentRepository::new();
        document_repo
            .expect_find_by_id()
            .withf(move |candidate| candidate == &id)
            .times(1)
            .returning(move |_| Ok(Some(document.clone())));

        let use_case = GetDocumentUseCase::new(Arc::new(document_repo));
        let dto = use_case.execute(&id).await.unwrap();
        assert_eq!(dto.id, id.to_string());
    }

    #[tokio::test]
    async fn test_get_document_not_found() {
        let mut document_repo = MockDocumentRepository::new();
        document_repo
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let use_case = GetDocumentUseCase::new(Arc::new(document_repo));
        let err = use_case.execute(&DocumentId::new()).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }
}
