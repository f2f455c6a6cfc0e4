//! Batch coordinator — sequences assembly, media, composition,
//! publishing, and history tracking for each topic.
//!
//! Topics are processed one at a time. Every per-topic error is caught
//! at this boundary and converted into an error outcome; the batch
//! always continues. A configurable delay separates consecutive topics
//! to respect publisher/media-source rate limits.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::adapters::{MediaSource, PostDraft, PostUpdate, Publisher};
use crate::domain::{ImageRef, PostStatus, PublishRecord, Topic, UploadedImage};
use crate::error::PipelineError;

use super::assembler::ContentAssembler;
use super::compositor::compose;
use super::tracker::PublicationTracker;

/// Category applied when a topic specifies none
const DEFAULT_CATEGORY: &str = "Article";

/// Batch-level settings
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Images to request per post (1 featured + the rest inline)
    pub images_per_post: usize,

    /// Delay between consecutive topics
    pub post_delay: Duration,

    /// Word count target when a topic specifies none
    pub default_word_count: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            images_per_post: 4,
            post_delay: Duration::from_secs(300),
            default_word_count: crate::domain::DEFAULT_WORD_COUNT,
        }
    }
}

/// Per-topic processing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicStage {
    Pending,
    ContentGenerated,
    MediaFetched,
    Composed,
    Published,
    Tracked,
}

/// Result of processing one topic
#[derive(Debug, Clone, Serialize)]
pub struct TopicOutcome {
    /// Topic title from the input row
    pub topic: String,

    /// `success` or `error`
    pub status: OutcomeStatus,

    /// Publisher-assigned post id (success only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,

    /// Error description (error only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Success,
    Error,
}

/// Sequences the pipeline for a batch of topics
pub struct Coordinator {
    assembler: ContentAssembler,
    media: Arc<dyn MediaSource>,
    publisher: Arc<dyn Publisher>,
    tracker: PublicationTracker,
    options: BatchOptions,
}

impl Coordinator {
    pub fn new(
        assembler: ContentAssembler,
        media: Arc<dyn MediaSource>,
        publisher: Arc<dyn Publisher>,
        tracker: PublicationTracker,
        options: BatchOptions,
    ) -> Self {
        Self {
            assembler,
            media,
            publisher,
            tracker,
            options,
        }
    }

    /// The publish history accumulated so far
    pub fn tracker(&self) -> &PublicationTracker {
        &self.tracker
    }

    /// Process every topic in order, isolating per-topic failures
    pub async fn run(&mut self, topics: &[Topic]) -> Vec<TopicOutcome> {
        let mut outcomes = Vec::with_capacity(topics.len());

        for (index, topic) in topics.iter().enumerate() {
            info!(
                index = index + 1,
                total = topics.len(),
                topic = %topic.topic,
                "Processing topic"
            );

            match self.process_topic(topic).await {
                Ok(post_id) => {
                    info!(topic = %topic.topic, %post_id, "Topic published");
                    outcomes.push(TopicOutcome {
                        topic: topic.topic.clone(),
                        status: OutcomeStatus::Success,
                        post_id: Some(post_id),
                        message: None,
                    });
                }
                Err(e) => {
                    error!(topic = %topic.topic, error = %e, "Topic failed");
                    outcomes.push(TopicOutcome {
                        topic: topic.topic.clone(),
                        status: OutcomeStatus::Error,
                        post_id: None,
                        message: Some(e.to_string()),
                    });
                }
            }

            // Delay only when more topics remain
            if index + 1 < topics.len() && !self.options.post_delay.is_zero() {
                info!(
                    delay_seconds = self.options.post_delay.as_secs(),
                    "Waiting before next topic"
                );
                tokio::time::sleep(self.options.post_delay).await;
            }
        }

        outcomes
    }

    /// Run one topic through the full pipeline
    async fn process_topic(&mut self, topic: &Topic) -> Result<String, PipelineError> {
        let mut stage = TopicStage::Pending;
        debug!(topic = %topic.topic, ?stage, "Topic accepted");

        topic.validate()?;

        let target = topic.word_count.unwrap_or(self.options.default_word_count);
        let content = self.assembler.assemble(topic, target).await?;
        stage = TopicStage::ContentGenerated;
        debug!(topic = %topic.topic, ?stage, word_count = content.word_count, "Stage complete");

        // Media failures degrade to "no media" instead of aborting
        let images = match self
            .media
            .search(&topic.primary_keywords, self.options.images_per_post)
            .await
        {
            Ok(images) => images,
            Err(e) => {
                warn!(topic = %topic.topic, error = %e, "Image search failed, continuing without images");
                Vec::new()
            }
        };

        let video_url = if topic.video_required {
            match self.media.find_video(&topic.video_query()).await {
                Ok(video) => video,
                Err(e) => {
                    warn!(topic = %topic.topic, error = %e, "Video lookup failed, continuing without video");
                    None
                }
            }
        } else {
            None
        };
        stage = TopicStage::MediaFetched;
        debug!(topic = %topic.topic, ?stage, images = images.len(), video = video_url.is_some(), "Stage complete");

        let uploaded = self.upload_images(&images).await;
        let body = compose(&content.body, &uploaded, video_url.as_deref());
        stage = TopicStage::Composed;
        debug!(topic = %topic.topic, ?stage, inline_images = uploaded.len().saturating_sub(1), "Stage complete");

        let draft = PostDraft {
            title: content.title.clone(),
            body,
            categories: if topic.categories.is_empty() {
                vec![DEFAULT_CATEGORY.to_string()]
            } else {
                topic.categories.clone()
            },
            tags: if topic.tags.is_empty() {
                topic
                    .primary_keyword_list()
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            } else {
                topic.tags.clone()
            },
            status: PostStatus::Published,
            featured_media: uploaded.first().map(|u| u.media_id),
        };

        let post_id = self.publisher.create_post(&draft).await?;
        stage = TopicStage::Published;
        debug!(topic = %topic.topic, ?stage, %post_id, "Stage complete");

        let record = PublishRecord::created(&post_id, &content.title)
            .with_images(uploaded.iter().map(|u| u.source_url.clone()).collect())
            .with_categories(draft.categories.clone())
            .with_tags(draft.tags.clone());

        // The post exists at this point; a history flush failure is
        // logged rather than turning a published topic into an error.
        if let Err(e) = self.tracker.record(record).await {
            error!(topic = %topic.topic, %post_id, error = %e, "Failed to persist history record");
        }
        stage = TopicStage::Tracked;
        debug!(topic = %topic.topic, ?stage, "Stage complete");

        Ok(post_id)
    }

    /// Fetch and upload image bytes; a failed image is skipped
    async fn upload_images(&self, images: &[ImageRef]) -> Vec<UploadedImage> {
        let mut uploaded = Vec::with_capacity(images.len());

        for (index, image) in images.iter().enumerate() {
            let bytes = match self.media.fetch(image).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(url = %image.url, error = %e, "Image fetch failed, skipping");
                    continue;
                }
            };

            let file_name = format!("image_{}_{index}.jpg", Utc::now().format("%Y%m%d_%H%M%S"));

            match self.publisher.upload_media(bytes, &file_name).await {
                Ok(media_id) => uploaded.push(UploadedImage {
                    media_id,
                    source_url: image.url.clone(),
                }),
                Err(e) => {
                    warn!(url = %image.url, error = %e, "Image upload failed, skipping");
                }
            }
        }

        uploaded
    }

    /// Update an existing post and record the action on success
    pub async fn update_post(
        &mut self,
        post_id: &str,
        update: &PostUpdate,
    ) -> Result<bool, PipelineError> {
        let updated = self.publisher.update_post(post_id, update).await?;

        if updated {
            let title = update.title.clone().unwrap_or_default();
            let record = PublishRecord::updated(post_id, title);
            if let Err(e) = self.tracker.record(record).await {
                error!(%post_id, error = %e, "Failed to persist history record");
            }
        }

        Ok(updated)
    }
}
