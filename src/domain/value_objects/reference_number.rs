use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Caller-supplied business key (e.g., "BSC-001").
///
/// Not unique: many documents may carry the same reference number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceNumber(String);

impl ReferenceNumber {
    const MAX_LENGTH: usize = 128;

    pub fn new(value: String) -> Result<Self, DomainError> {
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidReferenceNumber(
                "Reference number cannot be empty".to_string(),
            ));
        }

        if trimmed.len() > Self::MAX_LENGTH {
            return Err(DomainError::InvalidReferenceNumber(format!(
                "Reference number too long: {} > {}",
                trimmed.len(),
                Self::MAX_LENGTH
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Reconstruct from storage without re-validation
    pub fn reconstruct(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReferenceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ReferenceNumber {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}
