//! Publish records — one entry per create/update action.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post visibility at publish time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    /// Published immediately
    Published,

    /// Scheduled for a future date
    Scheduled,
}

/// One entry in the publish history log.
///
/// Create actions set `created_at`; update actions set `updated_at`.
/// Records are never deduplicated — re-publishing the same topic
/// appends a second record even when the post id repeats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishRecord {
    /// Publisher-assigned post identifier
    pub post_id: String,

    /// Post title
    pub title: String,

    /// When the post was created (create actions)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// When the post was updated (update actions)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Post status at the time of the action
    pub status: PostStatus,

    /// Crate version that wrote this record
    pub schema_version: String,

    /// Source URLs of the images used in the post
    #[serde(default)]
    pub images: Vec<String>,

    /// Categories applied to the post
    #[serde(default)]
    pub categories: Vec<String>,

    /// Tags applied to the post
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PublishRecord {
    /// Record for a newly created post
    pub fn created(post_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            post_id: post_id.into(),
            title: title.into(),
            created_at: Some(Utc::now()),
            updated_at: None,
            status: PostStatus::Published,
            schema_version: env!("CARGO_PKG_VERSION").to_string(),
            images: Vec::new(),
            categories: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Record for an update to an existing post
    pub fn updated(post_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            created_at: None,
            updated_at: Some(Utc::now()),
            ..Self::created(post_id, title)
        }
    }

    /// Attach the image URLs used in the post
    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    /// Attach categories
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    /// Attach tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_record() {
        let record = PublishRecord::created("42", "Organic Gardening")
            .with_images(vec!["https://images.example.com/a.jpg".to_string()])
            .with_categories(vec!["Gardening".to_string()])
            .with_tags(vec!["organic".to_string()]);

        assert!(record.created_at.is_some());
        assert!(record.updated_at.is_none());
        assert_eq!(record.status, PostStatus::Published);
        assert_eq!(record.images.len(), 1);
    }

    #[test]
    fn test_updated_record() {
        let record = PublishRecord::updated("42", "Organic Gardening");
        assert!(record.created_at.is_none());
        assert!(record.updated_at.is_some());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&PostStatus::Scheduled).unwrap();
        assert_eq!(json, "\"scheduled\"");
    }
}
