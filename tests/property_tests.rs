//! Property-based tests using proptest
//!
//! These tests generate many random inputs to check invariants that should
//! hold for all possible payloads and identifiers.

use std::collections::HashSet;

use proptest::prelude::*;

use docstore::domain::value_objects::{
    Category, CategorySet, ContentDigest, DocumentId, FileKind, ReferenceNumber,
};

/// Strategy for arbitrary payloads, including the empty one
fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..2048)
}

/// Strategy for valid digest hex strings
fn digest_hex_strategy() -> impl Strategy<Value = String> {
    "[0-9a-f]{64}"
}

proptest! {
    /// Hashing is deterministic: the same bytes always produce the same digest
    #[test]
    fn digest_is_deterministic(payload in payload_strategy()) {
        prop_assert_eq!(ContentDigest::of(&payload), ContentDigest::of(&payload));
    }

    /// Distinct payloads produce distinct digests across the sampled corpus
    #[test]
    fn digest_distinguishes_distinct_payloads(
        a in payload_strategy(),
        b in payload_strategy(),
    ) {
        if a != b {
            prop_assert_ne!(ContentDigest::of(&a), ContentDigest::of(&b));
        }
    }

    /// A digest always renders as 64 lowercase hex characters
    #[test]
    fn digest_format_is_stable(payload in payload_strategy()) {
        let hex = ContentDigest::of(&payload).as_hex().to_string();
        prop_assert_eq!(hex.len(), 64);
        prop_assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    /// Hex round trip preserves the digest
    #[test]
    fn digest_hex_round_trip(hex in digest_hex_strategy()) {
        let digest = ContentDigest::from_hex(hex.clone()).unwrap();
        prop_assert_eq!(digest.as_hex(), hex.as_str());

        let reparsed = ContentDigest::from_hex(digest.as_hex().to_string()).unwrap();
        prop_assert_eq!(reparsed, digest);
    }

    /// The fan-out prefix is always the first two hex characters
    #[test]
    fn digest_prefix_matches_hex(hex in digest_hex_strategy()) {
        let digest = ContentDigest::from_hex(hex.clone()).unwrap();
        prop_assert_eq!(digest.prefix(), &hex[0..2]);
    }

    /// Document id generation stays unique
    #[test]
    fn document_id_uniqueness(iterations in 1..500usize) {
        let mut ids = HashSet::new();
        for _ in 0..iterations {
            let id = DocumentId::new();
            prop_assert!(ids.insert(id), "DocumentId should be unique");
        }
    }

    /// Reference numbers survive a trim round trip
    #[test]
    fn reference_number_trims_and_preserves(core in "[a-zA-Z0-9-]{1,32}") {
        let padded = format!("  {core}  ");
        let reference = ReferenceNumber::new(padded).unwrap();
        prop_assert_eq!(reference.as_str(), core.as_str());
    }

    /// Extension parsing accepts exactly the allowed set, any casing
    #[test]
    fn file_kind_accepts_allowed_extensions(
        stem in "[a-zA-Z0-9_]{1,16}",
        ext_index in 0..3usize,
        uppercase in any::<bool>(),
    ) {
        let ext = ["pdf", "jpg", "jpeg"][ext_index];
        let ext = if uppercase { ext.to_uppercase() } else { ext.to_string() };
        let kind = FileKind::from_filename(&format!("{stem}.{ext}")).unwrap();

        match ext_index {
            0 => prop_assert_eq!(kind, FileKind::Pdf),
            _ => prop_assert_eq!(kind, FileKind::Jpeg),
        }
    }

    /// Category validation admits exactly the configured codes
    #[test]
    fn category_validation_is_consistent(code in "[A-Z]{3}") {
        let set = CategorySet::default();
        let result = Category::new(code.clone(), &set);
        prop_assert_eq!(result.is_ok(), set.contains(&code));
    }
}
