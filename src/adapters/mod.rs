//! Capability interfaces for external services.
//!
//! Each remote collaborator sits behind a narrow trait implemented by
//! both the real adapter and test doubles: text generation, media
//! search, and publishing.

pub mod openai;
pub mod unsplash;
pub mod wordpress;

use async_trait::async_trait;

use crate::domain::{ImageRef, PostStatus};
use crate::error::PipelineError;

// Re-export the real adapters
pub use openai::OpenAiClient;
pub use unsplash::{ImageFilter, UnsplashMedia};
pub use wordpress::WordPressPublisher;

/// Text generation service
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Human-readable client name
    fn name(&self) -> &str;

    /// Complete a prompt, returning raw generated text
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
    ) -> Result<String, PipelineError>;
}

/// Image and video lookup service
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Ranked image candidates for a query. May return fewer than
    /// requested; empty is a valid, non-error outcome.
    async fn search(&self, query: &str, count: usize) -> Result<Vec<ImageRef>, PipelineError>;

    /// A single embeddable video URL for a query, if one exists
    async fn find_video(&self, query: &str) -> Result<Option<String>, PipelineError>;

    /// Fetch an image's byte content
    async fn fetch(&self, image: &ImageRef) -> Result<Vec<u8>, PipelineError>;
}

/// Fields for a new post
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub body: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub featured_media: Option<u64>,
}

/// Partial fields for a post update
#[derive(Debug, Clone, Default)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub body: Option<String>,
    pub status: Option<PostStatus>,
}

/// Content-management publishing service
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Upload media bytes, returning the publisher-assigned id
    async fn upload_media(&self, bytes: Vec<u8>, file_name: &str) -> Result<u64, PipelineError>;

    /// Create a post, returning the opaque post identifier
    async fn create_post(&self, draft: &PostDraft) -> Result<String, PipelineError>;

    /// Update an existing post by identifier
    async fn update_post(&self, post_id: &str, update: &PostUpdate)
        -> Result<bool, PipelineError>;
}
