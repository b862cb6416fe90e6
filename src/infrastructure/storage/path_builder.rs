use std::path::{Path, PathBuf};

use crate::domain::value_objects::ContentDigest;

/// Utility for generating storage paths.
///
/// Layout is content-addressed: one location per distinct digest, no matter
/// how many document records point at it.
pub struct PathBuilder {
    root: PathBuf,
}

impl PathBuilder {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Generate temp upload path: /root/temp/{uuid}
    pub fn temp_path(&self, id: uuid::Uuid) -> PathBuf {
        self.root.join("temp").join(id.to_string())
    }

    /// Generate final content-addressable path: /root/sha256/{prefix}/{digest}
    pub fn final_path(&self, digest: &ContentDigest) -> PathBuf {
        self.root
            .join("sha256")
            .join(digest.prefix())
            .join(digest.as_hex())
    }
}
