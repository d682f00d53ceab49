//! Card Fingerprints - SHA-256 over Card Content
//!
//! The REV line changes on every run, so it is left out of the fingerprint.

use sha2::{Digest, Sha256};

use crate::encoder::{EncodedCard, LINE_SEPARATOR};

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Fingerprint of everything in the card except its revision timestamp.
pub fn card_fingerprint(card: &EncodedCard) -> String {
    let content: Vec<&str> = card.lines_without_revision().collect();
    sha256_hex(content.join(LINE_SEPARATOR).as_bytes())
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::ContactRecord;
    use crate::encoder::CardEncoder;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_sha256_known_value() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_fingerprint_ignores_revision() {
        let contact = ContactRecord::new("Grace", "Hopper");
        let encoder = CardEncoder::default();
        let a = encoder.encode_at(&contact, None, None, None, Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
        let b = encoder.encode_at(&contact, None, None, None, Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap());

        assert_ne!(a.to_vcf(), b.to_vcf());
        assert_eq!(card_fingerprint(&a), card_fingerprint(&b));
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let encoder = CardEncoder::default();
        let a = encoder.encode(&ContactRecord::new("Grace", "Hopper"), None, None, None);
        let b = encoder.encode(&ContactRecord::new("Grace", "Hopper").with_phone("1"), None, None, None);

        assert_ne!(card_fingerprint(&a), card_fingerprint(&b));
    }
}
