//! Generated article content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Allowed deviation from the target word count (fraction of target)
pub const WORD_COUNT_TOLERANCE: f64 = 0.05;

/// An article produced by the generation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedContent {
    /// Article title, taken from the first line of the raw text
    pub title: String,

    /// Full article text as returned by the generator
    pub body: String,

    /// Whitespace token count of the full text
    pub word_count: usize,

    /// Word count that was requested
    pub target_word_count: usize,

    /// When this content was generated
    pub generated_at: DateTime<Utc>,

    /// Crate version that produced this payload
    pub schema_version: String,
}

impl GeneratedContent {
    /// Parse raw generator output into structured content.
    ///
    /// The title is the first line with leading `#` markup stripped;
    /// the word count is a whitespace tokenization of the whole text.
    pub fn from_raw(raw: &str, target_word_count: usize) -> Self {
        let title = raw
            .lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches('#')
            .trim()
            .to_string();

        Self {
            title,
            body: raw.to_string(),
            word_count: raw.split_whitespace().count(),
            target_word_count,
            generated_at: Utc::now(),
            schema_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Whether the word count landed within tolerance of the target
    pub fn within_tolerance(&self) -> bool {
        let margin = self.target_word_count as f64 * WORD_COUNT_TOLERANCE;
        let diff = self.word_count.abs_diff(self.target_word_count) as f64;
        diff <= margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_first_line() {
        let raw = "# Organic Gardening Basics\n\nGardening is rewarding.";
        let content = GeneratedContent::from_raw(raw, 6);
        assert_eq!(content.title, "Organic Gardening Basics");
    }

    #[test]
    fn test_word_count_is_whitespace_tokens() {
        let raw = "Title line\n\none  two\tthree\nfour";
        let content = GeneratedContent::from_raw(raw, 6);
        assert_eq!(content.word_count, 6);
    }

    #[test]
    fn test_tolerance_bounds() {
        // 5% of 200 is 10 words either way
        let make = |words: usize| {
            let raw = vec!["word"; words].join(" ");
            GeneratedContent::from_raw(&raw, 200)
        };

        assert!(make(200).within_tolerance());
        assert!(make(190).within_tolerance());
        assert!(make(210).within_tolerance());
        assert!(!make(189).within_tolerance());
        assert!(!make(211).within_tolerance());
    }

    #[test]
    fn test_roundtrip_serialization() {
        let content = GeneratedContent::from_raw("# Title\n\nbody text here", 4);
        let json = serde_json::to_string(&content).unwrap();
        let back: GeneratedContent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, content);
    }
}
