use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ContentDigest;

/// Blob entity - one row per distinct content digest.
///
/// Owns the reference count: `ref_count` equals the number of live document
/// records pointing at this digest, and reaches 0 only when the last one is
/// released. Exactly one physical file exists per blob, at `storage_path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blob {
    digest: ContentDigest,
    storage_path: PathBuf,
    size_bytes: u64,
    ref_count: i64,
    created_at: DateTime<Utc>,
}

impl Blob {
    /// Create new blob with ref_count = 1
    pub fn new(digest: ContentDigest, storage_path: PathBuf, size_bytes: u64) -> Self {
        Self {
            digest,
            storage_path,
            size_bytes,
            ref_count: 1,
            created_at: Utc::now(),
        }
    }

    /// Reconstruct from storage
    pub fn reconstruct(
        digest: ContentDigest,
        storage_path: PathBuf,
        size_bytes: u64,
        ref_count: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            digest,
            storage_path,
            size_bytes,
            ref_count,
            created_at,
        }
    }

    /// Increment reference count
    pub fn increment_ref(&mut self) {
        self.ref_count += 1;
    }

    /// Decrement reference count, saturating at zero
    pub fn decrement_ref(&mut self) {
        if self.ref_count > 0 {
            self.ref_count -= 1;
        }
    }

    /// Check if blob can be garbage collected
    pub fn can_gc(&self) -> bool {
        self.ref_count == 0
    }

    /// True when this acquire created the blob rather than reusing it
    pub fn is_sole_reference(&self) -> bool {
        self.ref_count == 1
    }

    // Getters
    pub fn digest(&self) -> &ContentDigest {
        &self.digest
    }

    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn ref_count(&self) -> i64 {
        self.ref_count
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn create_test_blob() -> Blob {
        let digest = ContentDigest::from_str(&"a".repeat(64)).unwrap();
        Blob::new(digest, PathBuf::from("/data/sha256/aa/test"), 123)
    }

    #[test]
    fn test_blob_new() {
        let blob = create_test_blob();
        assert_eq!(blob.ref_count(), 1);
        assert!(blob.is_sole_reference());
        assert!(!blob.can_gc());
    }

    #[test]
    fn test_blob_increment_ref() {
        let mut blob = create_test_blob();
        blob.increment_ref();
        assert_eq!(blob.ref_count(), 2);
        assert!(!blob.is_sole_reference());
    }

    #[test]
    fn test_blob_decrement_ref_never_negative() {
        let mut blob = create_test_blob();
        blob.decrement_ref();
        assert_eq!(blob.ref_count(), 0);
        assert!(blob.can_gc());

        // Saturates at zero
        blob.decrement_ref();
        assert_eq!(blob.ref_count(), 0);
    }
}
