//! Cache fingerprint derivation

use sha2::{Digest, Sha256};

use crate::domain::identity::RequestIdentity;

/// Namespace prefix shared by every insight cache key
pub const FINGERPRINT_NAMESPACE: &str = "horoscope";

/// Delimiter for the canonical field concatenation. Fixed; changing it would
/// invalidate every existing cache entry.
const FIELD_DELIMITER: &str = "|";

/// Derives deterministic, collision-resistant cache fingerprints from request
/// identities.
///
/// The identity space is unbounded free text, so a cryptographic digest is
/// required rather than a weak checksum. Missing optional fields normalize to
/// the empty string, keeping `{time: None}` and `{time: Some("")}` distinct
/// from a differently-filled identity but identical to each other.
#[derive(Debug, Clone, Copy, Default)]
pub struct FingerprintGenerator;

impl FingerprintGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Derives the fingerprint for an identity: `horoscope:<sha256-hex>`.
    /// Pure, total and deterministic.
    pub fn derive(&self, identity: &RequestIdentity) -> String {
        let canonical = [
            identity.name.as_str(),
            &identity.birth_date_str(),
            identity.birth_time.as_deref().unwrap_or(""),
            identity.birth_place.as_deref().unwrap_or(""),
        ]
        .join(FIELD_DELIMITER);

        let digest = Sha256::digest(canonical.as_bytes());
        format!("{}:{}", FINGERPRINT_NAMESPACE, hex::encode(digest))
    }

    /// Pattern matching every key in the fingerprint namespace
    pub fn namespace_pattern(&self) -> String {
        format!("{}:*", FINGERPRINT_NAMESPACE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn identity() -> RequestIdentity {
        RequestIdentity::new("Priya", NaiveDate::from_ymd_opt(1995, 8, 20).unwrap())
            .with_birth_time("06:30")
            .with_birth_place("Mumbai")
    }

    #[test]
    fn test_derive_is_deterministic() {
        let generator = FingerprintGenerator::new();
        assert_eq!(generator.derive(&identity()), generator.derive(&identity()));
    }

    #[test]
    fn test_fingerprint_format() {
        let key = FingerprintGenerator::new().derive(&identity());
        let (namespace, digest) = key.split_once(':').unwrap();

        assert_eq!(namespace, FINGERPRINT_NAMESPACE);
        assert_eq!(digest.len(), 64); // sha256 hex
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_any_field_change_changes_fingerprint() {
        let generator = FingerprintGenerator::new();
        let base = generator.derive(&identity());

        let mut renamed = identity();
        renamed.name = "Priyanka".to_string();
        assert_ne!(generator.derive(&renamed), base);

        let mut redated = identity();
        redated.birth_date = NaiveDate::from_ymd_opt(1995, 8, 21).unwrap();
        assert_ne!(generator.derive(&redated), base);

        let mut retimed = identity();
        retimed.birth_time = Some("07:30".to_string());
        assert_ne!(generator.derive(&retimed), base);

        let mut replaced = identity();
        replaced.birth_place = Some("Pune".to_string());
        assert_ne!(generator.derive(&replaced), base);
    }

    #[test]
    fn test_absent_optionals_normalize_to_empty() {
        let generator = FingerprintGenerator::new();

        let none = RequestIdentity::new("Priya", NaiveDate::from_ymd_opt(1995, 8, 20).unwrap());
        let empty = RequestIdentity::new("Priya", NaiveDate::from_ymd_opt(1995, 8, 20).unwrap())
            .with_birth_time("")
            .with_birth_place("");

        assert_eq!(generator.derive(&none), generator.derive(&empty));
    }
}
