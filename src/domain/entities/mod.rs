mod blob;
mod document;

pub use blob::Blob;
pub use document::Document;
