//! End-to-end pipeline tests with stub adapters: success path,
//! per-topic failure isolation, and media degradation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use draftpress::core::{
    BatchOptions, CacheStore, ContentAssembler, Coordinator, OutcomeStatus, PublicationTracker,
};
use draftpress::{
    GenerationClient, ImageRef, MediaSource, PipelineError, PostDraft, PostUpdate, Publisher,
    Topic,
};

// ---------------------------------------------------------------------------
// Stub adapters
// ---------------------------------------------------------------------------

struct StubGeneration {
    words: usize,
}

#[async_trait]
impl GenerationClient for StubGeneration {
    fn name(&self) -> &str {
        "stub"
    }

    async fn complete(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        _max_tokens: u32,
    ) -> Result<String, PipelineError> {
        let mut text = String::from("# Stubbed Article\n\n");
        text.push_str(&vec!["word"; self.words - 3].join(" "));
        Ok(text)
    }
}

#[derive(Default)]
struct StubMedia {
    images: Vec<ImageRef>,
    video: Option<String>,
    fail_search: bool,
}

fn image(url: &str) -> ImageRef {
    ImageRef {
        url: url.to_string(),
        width: 1600,
        height: 900,
        description: "stub".to_string(),
        attribution: "Stub Author".to_string(),
    }
}

#[async_trait]
impl MediaSource for StubMedia {
    async fn search(&self, _query: &str, count: usize) -> Result<Vec<ImageRef>, PipelineError> {
        if self.fail_search {
            return Err(PipelineError::upstream("stub-media", "search unavailable"));
        }
        Ok(self.images.iter().take(count).cloned().collect())
    }

    async fn find_video(&self, _query: &str) -> Result<Option<String>, PipelineError> {
        Ok(self.video.clone())
    }

    async fn fetch(&self, _image: &ImageRef) -> Result<Vec<u8>, PipelineError> {
        Ok(vec![0xFF, 0xD8, 0xFF])
    }
}

#[derive(Default)]
struct StubPublisher {
    posts: Mutex<Vec<PostDraft>>,
    next_media_id: AtomicU64,
    fail_create: bool,
}

#[async_trait]
impl Publisher for StubPublisher {
    async fn upload_media(&self, _bytes: Vec<u8>, _file_name: &str) -> Result<u64, PipelineError> {
        Ok(self.next_media_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn create_post(&self, draft: &PostDraft) -> Result<String, PipelineError> {
        if self.fail_create {
            return Err(PipelineError::Publish("401 Unauthorized".to_string()));
        }
        let mut posts = self.posts.lock().unwrap();
        posts.push(draft.clone());
        Ok(format!("post-{}", posts.len()))
    }

    async fn update_post(
        &self,
        _post_id: &str,
        _update: &PostUpdate,
    ) -> Result<bool, PipelineError> {
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

fn topic(name: &str) -> Topic {
    Topic {
        topic: name.to_string(),
        primary_keywords: "a,b".to_string(),
        additional_keywords: "c".to_string(),
        target_audience: "y".to_string(),
        tone_style: "z".to_string(),
        word_count: Some(500),
        ..Default::default()
    }
}

async fn build_coordinator(
    temp: &TempDir,
    media: StubMedia,
    publisher: Arc<StubPublisher>,
) -> Coordinator {
    let cache = CacheStore::new(temp.path().join("cache"));
    let tracker = PublicationTracker::open(temp.path().join("post_history.json"))
        .await
        .unwrap();

    let assembler = ContentAssembler::new(Arc::new(StubGeneration { words: 500 }), cache, 3);

    Coordinator::new(
        assembler,
        Arc::new(media),
        publisher,
        tracker,
        BatchOptions {
            images_per_post: 4,
            post_delay: Duration::ZERO,
            default_word_count: 3200,
        },
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_end_to_end_publish_with_media() {
    let temp = TempDir::new().unwrap();
    let publisher = Arc::new(StubPublisher::default());
    let media = StubMedia {
        images: vec![image("u1"), image("u2"), image("u3")],
        ..Default::default()
    };

    let mut coordinator = build_coordinator(&temp, media, publisher.clone()).await;
    let outcomes = coordinator.run(&[topic("X")]).await;

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].status, OutcomeStatus::Success);
    assert_eq!(outcomes[0].post_id.as_deref(), Some("post-1"));

    let posts = publisher.posts.lock().unwrap();
    let post = &posts[0];

    assert_eq!(post.title, "Stubbed Article");
    assert!(post.body.starts_with("[featured-image id=\"1\"]\n"));
    assert!(post.body.contains("[gallery ids=\"2\"]"));
    assert!(post.body.contains("[gallery ids=\"3\"]"));
    assert_eq!(post.featured_media, Some(1));
    assert_eq!(post.categories, vec!["Article"]);
    assert_eq!(post.tags, vec!["a", "b"]);

    let history = coordinator.tracker().history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].post_id, "post-1");
    assert_eq!(history[0].images, vec!["u1", "u2", "u3"]);
}

#[tokio::test]
async fn test_invalid_row_aborts_only_that_topic() {
    let temp = TempDir::new().unwrap();
    let publisher = Arc::new(StubPublisher::default());

    let mut broken = topic("Broken");
    broken.tone_style = String::new();

    let mut coordinator = build_coordinator(&temp, StubMedia::default(), publisher.clone()).await;
    let outcomes = coordinator.run(&[broken, topic("Good")]).await;

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].status, OutcomeStatus::Error);
    assert!(outcomes[0]
        .message
        .as_deref()
        .unwrap()
        .contains("tone_style"));
    assert_eq!(outcomes[1].status, OutcomeStatus::Success);

    // only the good topic reached the publisher and the history log
    assert_eq!(publisher.posts.lock().unwrap().len(), 1);
    assert_eq!(coordinator.tracker().history().len(), 1);
}

#[tokio::test]
async fn test_media_failure_degrades_to_no_media() {
    let temp = TempDir::new().unwrap();
    let publisher = Arc::new(StubPublisher::default());
    let media = StubMedia {
        fail_search: true,
        ..Default::default()
    };

    let mut coordinator = build_coordinator(&temp, media, publisher.clone()).await;
    let outcomes = coordinator.run(&[topic("X")]).await;

    assert_eq!(outcomes[0].status, OutcomeStatus::Success);

    let posts = publisher.posts.lock().unwrap();
    assert!(!posts[0].body.contains("[featured-image"));
    assert!(!posts[0].body.contains("[gallery"));
    assert_eq!(posts[0].featured_media, None);
}

#[tokio::test]
async fn test_video_required_inserts_embed() {
    let temp = TempDir::new().unwrap();
    let publisher = Arc::new(StubPublisher::default());
    let media = StubMedia {
        video: Some("https://www.youtube.com/embed/abc".to_string()),
        ..Default::default()
    };

    let mut wants_video = topic("X");
    wants_video.video_required = true;

    let mut coordinator = build_coordinator(&temp, media, publisher.clone()).await;
    coordinator.run(&[wants_video]).await;

    let posts = publisher.posts.lock().unwrap();
    assert!(posts[0]
        .body
        .contains("[embed]https://www.youtube.com/embed/abc[/embed]"));
}

#[tokio::test]
async fn test_publish_failure_writes_no_history() {
    let temp = TempDir::new().unwrap();
    let publisher = Arc::new(StubPublisher {
        fail_create: true,
        ..Default::default()
    });

    let mut coordinator = build_coordinator(&temp, StubMedia::default(), publisher).await;
    let outcomes = coordinator.run(&[topic("X")]).await;

    assert_eq!(outcomes[0].status, OutcomeStatus::Error);
    assert!(outcomes[0].message.as_deref().unwrap().contains("401"));
    assert!(coordinator.tracker().history().is_empty());
}

#[tokio::test]
async fn test_update_post_records_history() {
    let temp = TempDir::new().unwrap();
    let publisher = Arc::new(StubPublisher::default());

    let mut coordinator = build_coordinator(&temp, StubMedia::default(), publisher).await;

    let update = PostUpdate {
        title: Some("Revised Title".to_string()),
        ..Default::default()
    };
    let updated = coordinator.update_post("post-9", &update).await.unwrap();

    assert!(updated);
    let history = coordinator.tracker().history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].post_id, "post-9");
    assert!(history[0].updated_at.is_some());
}
