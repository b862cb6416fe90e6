use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// SHA-256 content digest (32 bytes = 64 hex chars).
///
/// Two byte sequences are considered identical content exactly when their
/// digests are equal; accidental collision is treated as impossible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Compute the digest of a byte sequence.
    ///
    /// Deterministic and side-effect free; the empty input is valid and
    /// produces the digest of the empty string.
    pub fn of(payload: &[u8]) -> Self {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        hasher.update(payload);
        Self(hex::encode(hasher.finalize()))
    }

    /// Create from validated hex string
    pub fn from_hex(hex: String) -> Result<Self, DomainError> {
        if hex.len() != 64 {
            return Err(DomainError::InvalidDigest {
                expected: "64 hex characters".to_string(),
                actual: format!("{} characters", hex.len()),
            });
        }

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DomainError::InvalidDigest {
                expected: "hex characters only".to_string(),
                actual: hex,
            });
        }

        Ok(Self(hex.to_lowercase()))
    }

    /// Get hex string representation
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// Get first 2 characters for directory fan-out
    pub fn prefix(&self) -> &str {
        &self.0[0..2]
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ContentDigest {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_content_digest_from_hex_valid() {
        let hex = "a".repeat(64);
        let digest = ContentDigest::from_hex(hex.clone()).unwrap();
        assert_eq!(digest.as_hex(), hex);
    }

    #[test]
    fn test_content_digest_from_hex_invalid_length() {
        let hex = "a".repeat(63);
        let err = ContentDigest::from_hex(hex).unwrap_err();
        assert!(matches!(err, DomainError::InvalidDigest { .. }));
    }

    #[test]
    fn test_content_digest_from_hex_invalid_chars() {
        let hex = "g".repeat(64);
        let err = ContentDigest::from_hex(hex).unwrap_err();
        assert!(matches!(err, DomainError::InvalidDigest { .. }));
    }

    #[test]
    fn test_content_digest_lowercases() {
        let hex = "AB".to_string() + &"c".repeat(62);
        let digest = ContentDigest::from_hex(hex).unwrap();
        assert_eq!(digest.prefix(), "ab");
    }

    #[test]
    fn test_content_digest_of_is_deterministic() {
        let payload = b"identical bytes";
        assert_eq!(ContentDigest::of(payload), ContentDigest::of(payload));
    }

    #[test]
    fn test_content_digest_of_empty_input() {
        // SHA-256 of the empty string
        assert_eq!(
            ContentDigest::of(b"").as_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_content_digest_of_distinguishes_content() {
        assert_ne!(ContentDigest::of(b"a"), ContentDigest::of(b"b"));
    }

    #[test]
    fn test_content_digest_display() {
        let hex = "c".repeat(64);
        let digest = ContentDigest::from_str(&hex).unwrap();
        assert_eq!(format!("{}", digest), hex);
    }
}
