use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Unsupported file extension: {0} (allowed: .pdf, .jpg, .jpeg)")]
    UnsupportedExtension(String),

    #[error("Unknown category: {code} (allowed: {allowed})")]
    UnknownCategory { code: String, allowed: String },

    #[error("Invalid reference number: {0}")]
    InvalidReferenceNumber(String),

    #[error("Invalid content digest: expected {expected}, got {actual}")]
    InvalidDigest { expected: String, actual: String },

    #[error("Invalid page count: {0} (must be at least 1)")]
    InvalidPageCount(u32),

    #[error("Payload size exceeds maximum allowed: {size} > {max}")]
    PayloadTooLarge { size: u64, max: u64 },
}
