use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Default category codes, matching the deployed collaborators.
///
/// The effective set is configuration (`Config::allowed_categories`), not a
/// constant baked into the core.
pub static DEFAULT_CATEGORY_CODES: Lazy<Vec<String>> = Lazy::new(|| {
    ["DED", "INV", "BIL", "PKL", "DAU", "DOM", "BSC", "OTH"]
        .iter()
        .map(|c| c.to_string())
        .collect()
});

/// The set of category codes accepted at ingest time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet(Vec<String>);

impl CategorySet {
    pub fn new(codes: Vec<String>) -> Self {
        Self(codes)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.iter().any(|c| c == code)
    }

    pub fn codes(&self) -> &[String] {
        &self.0
    }

    fn joined(&self) -> String {
        self.0.join(", ")
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self(DEFAULT_CATEGORY_CODES.clone())
    }
}

/// Document category code, validated against a [`CategorySet`] at creation.
///
/// Rows loaded back from storage are reconstructed without re-validation so a
/// narrowed configured set cannot make existing records unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category(String);

impl Category {
    pub fn new(code: String, allowed: &CategorySet) -> Result<Self, DomainError> {
        if !allowed.contains(&code) {
            return Err(DomainError::UnknownCategory {
                code,
                allowed: allowed.joined(),
            });
        }

        Ok(Self(code))
    }

    /// Reconstruct from storage without re-validation
    pub fn reconstruct(code: String) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_valid() {
        let category = Category::new("INV".to_string(), &CategorySet::default()).unwrap();
        assert_eq!(category.as_str(), "INV");
    }

    #[test]
    fn test_category_unknown() {
        let err = Category::new("XXX".to_string(), &CategorySet::default()).unwrap_err();
        assert!(matches!(err, DomainError::UnknownCategory { .. }));
    }

    #[test]
    fn test_category_set_is_configurable() {
        let set = CategorySet::new(vec!["PCK".to_string(), "INV".to_string()]);
        assert!(Category::new("PCK".to_string(), &set).is_ok());
        // Default codes are not implicitly allowed once a custom set is supplied
        assert!(Category::new("DED".to_string(), &set).is_err());
    }

    #[test]
    fn test_category_reconstruct_skips_validation() {
        let category = Category::reconstruct("LEGACY".to_string());
        assert_eq!(category.as_str(), "LEGACY");
    }

    #[test]
    fn test_default_set_has_eight_codes() {
        assert_eq!(CategorySet::default().codes().len(), 8);
    }
}
