mod category;
mod content_digest;
mod document_id;
mod file_kind;
mod reference_number;

pub use category::{Category, CategorySet, DEFAULT_CATEGORY_CODES};
pub use content_digest::ContentDigest;
pub use document_id::DocumentId;
pub use file_kind::FileKind;
pub use reference_number::ReferenceNumber;
