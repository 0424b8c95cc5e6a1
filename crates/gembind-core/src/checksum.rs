//! Blake3 checksum utilities for generated files.
//!
//! Checksums are stored in the format `"blake3:<hex>"` for easy
//! identification and future algorithm upgrades. They key the incremental
//! write step: identical content always yields an identical checksum.

/// Calculates Blake3 checksum for the given data.
///
/// Returns checksum in the format `"blake3:<hex>"` where `<hex>` is the
/// Blake3 hash in lowercase hexadecimal.
///
/// # Examples
///
/// ```
/// use gembind_core::checksum::calculate_checksum;
///
/// let checksum = calculate_checksum(b"namespace O3DE.Core {}");
///
/// assert!(checksum.starts_with("blake3:"));
/// assert_eq!(checksum.len(), 71); // "blake3:" + 64 hex chars
/// ```
#[must_use]
pub fn calculate_checksum(data: &[u8]) -> String {
    let hash = blake3::hash(data);
    format!("blake3:{}", hash.to_hex())
}

/// Returns `true` when `data` hashes to `expected`.
///
/// # Examples
///
/// ```
/// use gembind_core::checksum::{calculate_checksum, matches_checksum};
///
/// let checksum = calculate_checksum(b"content");
/// assert!(matches_checksum(b"content", &checksum));
/// assert!(!matches_checksum(b"changed", &checksum));
/// ```
#[must_use]
pub fn matches_checksum(data: &[u8], expected: &str) -> bool {
    calculate_checksum(data) == expected
}

/// Derives 16 stable bytes from a name.
///
/// Used to build identifiers that must stay the same across runs for the
/// same input, such as project GUIDs in solution files.
#[must_use]
pub fn name_digest(name: &str) -> [u8; 16] {
    let hash = blake3::hash(name.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hash.as_bytes()[..16]);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_stable() {
        assert_eq!(calculate_checksum(b"abc"), calculate_checksum(b"abc"));
    }

    #[test]
    fn test_checksum_differs_for_different_content() {
        assert_ne!(calculate_checksum(b"abc"), calculate_checksum(b"abd"));
    }

    #[test]
    fn test_checksum_format() {
        let checksum = calculate_checksum(b"");
        let hex = checksum.strip_prefix("blake3:").unwrap();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_name_digest_deterministic() {
        assert_eq!(name_digest("PhysX"), name_digest("PhysX"));
        assert_ne!(name_digest("PhysX"), name_digest("Atom"));
    }
}
