use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Declared document type, derived from the uploaded filename's extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Jpeg,
}

impl FileKind {
    /// Resolve the kind from a filename; the extension check is case-insensitive.
    pub fn from_filename(filename: &str) -> Result<Self, DomainError> {
        let lowered = filename.to_lowercase();

        if lowered.ends_with(".pdf") {
            Ok(Self::Pdf)
        } else if lowered.ends_with(".jpg") || lowered.ends_with(".jpeg") {
            Ok(Self::Jpeg)
        } else {
            Err(DomainError::UnsupportedExtension(filename.to_string()))
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pdf => write!(f, "pdf"),
            Self::Jpeg => write!(f, "jpeg"),
        }
    }
}
