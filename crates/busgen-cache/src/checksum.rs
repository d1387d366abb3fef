//! Content checksums for cached sources.

use sha2::{Digest, Sha256};

/// Prefix marking the checksum algorithm in metadata files.
pub const CHECKSUM_PREFIX: &str = "sha256:";

/// Compute SHA256 hash of data and return as hex string.
pub fn compute_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Checksum in the form stored in metadata (`sha256:<hex>`).
pub fn checksum_of(data: &[u8]) -> String {
    format!("{CHECKSUM_PREFIX}{}", compute_sha256(data))
}

/// Verify SHA256 checksum of data.
///
/// Accepts both `sha256:<hex>` and bare hex.
pub fn verify_sha256(data: &[u8], expected: &str) -> bool {
    let expected_hex = expected.strip_prefix(CHECKSUM_PREFIX).unwrap_or(expected);
    compute_sha256(data).eq_ignore_ascii_case(expected_hex)
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn compute_sha256___returns_consistent_hash() {
        let data = b"public class Foo {}";

        assert_eq!(compute_sha256(data), compute_sha256(data));
        assert_eq!(compute_sha256(data).len(), 64);
    }

    #[test]
    fn compute_sha256___empty_input___matches_known_digest() {
        assert_eq!(
            compute_sha256(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn checksum_of___has_prefix() {
        assert!(checksum_of(b"x").starts_with("sha256:"));
    }

    #[test]
    fn verify_sha256___accepts_valid_checksum() {
        let data = b"package a;";
        let checksum = compute_sha256(data);

        assert!(verify_sha256(data, &checksum));
        assert!(verify_sha256(data, &checksum_of(data)));
        assert!(verify_sha256(data, &checksum.to_uppercase()));
    }

    #[test]
    fn verify_sha256___rejects_invalid_checksum() {
        let data = b"package a;";

        assert!(!verify_sha256(data, "invalid"));
        assert!(!verify_sha256(data, "sha256:invalid"));
        assert!(!verify_sha256(b"package b;", &checksum_of(data)));
    }
}
