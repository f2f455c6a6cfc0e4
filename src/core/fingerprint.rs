//! Deterministic fingerprints used as cache keys.
//!
//! A fingerprint is the first 16 hex chars of a SHA256 over the input
//! fields. Fields are fed through the hasher with a separator byte so
//! that ("ab", "c") and ("a", "bc") hash differently.

use sha2::{Digest, Sha256};

use crate::domain::Topic;

/// Hash an ordered tuple of fields into a cache key
pub fn fingerprint(fields: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for field in fields {
        hasher.update(field.as_bytes());
        hasher.update([0x1f]);
    }
    let digest = hasher.finalize();
    hex::encode(&digest[..8])
}

/// Cache key for a topic's generated content.
///
/// Covers (topic, primary keywords, additional keywords) only — not
/// the target word count or outline, so content cached under one
/// length target is reused verbatim for another. Callers that depend
/// on an exact length must re-validate what they get back.
pub fn content_fingerprint(topic: &Topic) -> String {
    fingerprint(&[
        &topic.topic,
        &topic.primary_keywords,
        &topic.additional_keywords,
    ])
}

/// Cache key for fetched media bytes, keyed by source URL
pub fn media_fingerprint(url: &str) -> String {
    fingerprint(&[url])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_deterministic() {
        let a = fingerprint(&["X", "a,b", "c"]);
        let b = fingerprint(&["X", "a,b", "c"]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn test_fingerprint_sensitive_to_each_field() {
        let base = fingerprint(&["X", "a,b", "c"]);
        assert_ne!(base, fingerprint(&["Y", "a,b", "c"]));
        assert_ne!(base, fingerprint(&["X", "a", "c"]));
        assert_ne!(base, fingerprint(&["X", "a,b", "d"]));
    }

    #[test]
    fn test_fingerprint_field_boundaries_matter() {
        assert_ne!(fingerprint(&["ab", "c"]), fingerprint(&["a", "bc"]));
    }

    #[test]
    fn test_content_fingerprint_ignores_word_count() {
        let mut topic = Topic {
            topic: "X".to_string(),
            primary_keywords: "a,b".to_string(),
            additional_keywords: "c".to_string(),
            ..Default::default()
        };

        let before = content_fingerprint(&topic);
        topic.word_count = Some(500);
        assert_eq!(before, content_fingerprint(&topic));
    }
}
