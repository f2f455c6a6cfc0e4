//! Topic input records.
//!
//! A Topic is one row of the input file. Required fields are validated
//! before the topic enters the pipeline; optional fields carry their
//! documented defaults.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Default article length when a row does not specify one
pub const DEFAULT_WORD_COUNT: usize = 3200;

/// A single article request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Topic {
    /// Main subject of the article
    pub topic: String,

    /// Comma-delimited primary keywords
    pub primary_keywords: String,

    /// Comma-delimited supporting keywords
    pub additional_keywords: String,

    /// Who the article is written for
    pub target_audience: String,

    /// Requested tone and style
    pub tone_style: String,

    /// Target article length in words
    pub word_count: Option<usize>,

    /// Optional custom article outline
    pub custom_outline: Option<Outline>,

    /// Post categories (defaults applied at publish time)
    #[serde(default)]
    pub categories: Vec<String>,

    /// Post tags (defaults applied at publish time)
    #[serde(default)]
    pub tags: Vec<String>,

    /// Whether to look up a video embed for this article
    #[serde(default)]
    pub video_required: bool,
}

impl Topic {
    /// Check that all required fields are present and non-empty
    pub fn validate(&self) -> Result<(), PipelineError> {
        let required = [
            ("topic", &self.topic),
            ("primary_keywords", &self.primary_keywords),
            ("additional_keywords", &self.additional_keywords),
            ("target_audience", &self.target_audience),
            ("tone_style", &self.tone_style),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }

    /// Target word count with the default applied
    pub fn target_word_count(&self) -> usize {
        self.word_count.unwrap_or(DEFAULT_WORD_COUNT)
    }

    /// Primary keywords split on commas, trimmed, empties dropped
    pub fn primary_keyword_list(&self) -> Vec<&str> {
        split_keywords(&self.primary_keywords)
    }

    /// Supporting keywords split on commas, trimmed, empties dropped
    pub fn additional_keyword_list(&self) -> Vec<&str> {
        split_keywords(&self.additional_keywords)
    }

    /// Query string for the video search: topic plus first two keywords
    pub fn video_query(&self) -> String {
        let keywords = self.primary_keyword_list();
        let mut query = self.topic.clone();
        for keyword in keywords.iter().take(2) {
            query.push(' ');
            query.push_str(keyword);
        }
        query
    }
}

fn split_keywords(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Custom article outline supplied as JSON in the input file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outline {
    /// Ordered article sections
    pub sections: Vec<OutlineSection>,
}

/// One section of a custom outline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineSection {
    /// Section heading
    pub title: String,

    /// Ordered subsection labels
    #[serde(default)]
    pub subsections: Vec<String>,
}
