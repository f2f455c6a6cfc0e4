//! Unsplash photo search plus YouTube video lookup.
//!
//! All remote calls go through a shared sliding-window budget; search
//! results and fetched image bytes are cached by fingerprint so a
//! repeated query never re-hits the network.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::core::{fingerprint, media_fingerprint, CacheStore, SlidingWindow};
use crate::domain::ImageRef;
use crate::error::PipelineError;

use super::MediaSource;

const UNSPLASH_API_URL: &str = "https://api.unsplash.com";
const YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Minimum acceptable image dimensions
#[derive(Debug, Clone, Copy)]
pub struct ImageFilter {
    pub min_width: u32,
    pub min_height: u32,
}

/// Unsplash-backed media source with optional YouTube video lookup
pub struct UnsplashMedia {
    access_key: String,
    youtube_key: Option<String>,
    filter: ImageFilter,
    http: reqwest::Client,
    limiter: SlidingWindow,
    cache: CacheStore,
    base_url: String,
    youtube_base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    width: u32,
    height: u32,
    description: Option<String>,
    urls: PhotoUrls,
    user: PhotoUser,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    raw: String,
}

#[derive(Debug, Deserialize)]
struct PhotoUser {
    name: String,
}

#[derive(Debug, Deserialize)]
struct VideoSearchResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: VideoId,
}

#[derive(Debug, Deserialize)]
struct VideoId {
    #[serde(rename = "videoId")]
    video_id: String,
}

impl UnsplashMedia {
    pub fn new(
        access_key: impl Into<String>,
        youtube_key: Option<String>,
        filter: ImageFilter,
        limiter: SlidingWindow,
        cache: CacheStore,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            youtube_key,
            filter,
            http: reqwest::Client::new(),
            limiter,
            cache,
            base_url: UNSPLASH_API_URL.to_string(),
            youtube_base_url: YOUTUBE_API_URL.to_string(),
        }
    }

    /// Point the adapter at different endpoints (tests, proxies)
    pub fn with_base_urls(
        mut self,
        base_url: impl Into<String>,
        youtube_base_url: impl Into<String>,
    ) -> Self {
        self.base_url = base_url.into();
        self.youtube_base_url = youtube_base_url.into();
        self
    }
}

#[async_trait]
impl MediaSource for UnsplashMedia {
    async fn search(&self, query: &str, count: usize) -> Result<Vec<ImageRef>, PipelineError> {
        let key = fingerprint(&[query, &count.to_string()]);

        match self.cache.load::<Vec<ImageRef>>(&key).await {
            Ok(Some(cached)) => {
                info!(query, images = cached.len(), "Image search cache hit");
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => warn!(%key, error = %e, "Cache read failed, treating as miss"),
        }

        self.limiter.acquire().await;
        debug!(query, count, "Searching images");

        // Over-fetch so dimension filtering still fills the quota
        let per_page = (count * 2).to_string();

        let response = self
            .http
            .get(format!("{}/search/photos", self.base_url))
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .query(&[
                ("query", query),
                ("per_page", per_page.as_str()),
                ("orientation", "landscape"),
            ])
            .send()
            .await
            .map_err(|e| PipelineError::upstream("unsplash", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::upstream(
                "unsplash",
                format!("{status}: {body}"),
            ));
        }

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::upstream("unsplash", e))?;

        let images = select_images(search.results, self.filter, count, query);
        info!(query, images = images.len(), "Image search complete");

        if let Err(e) = self.cache.store(&key, &images).await {
            warn!(%key, error = %e, "Cache write failed");
        }

        Ok(images)
    }

    async fn find_video(&self, query: &str) -> Result<Option<String>, PipelineError> {
        let Some(youtube_key) = &self.youtube_key else {
            return Ok(None);
        };

        self.limiter.acquire().await;
        debug!(query, "Searching video");

        let response = self
            .http
            .get(format!("{}/search", self.youtube_base_url))
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("key", youtube_key.as_str()),
                ("maxResults", "1"),
                ("type", "video"),
            ])
            .send()
            .await
            .map_err(|e| PipelineError::upstream("youtube", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::upstream(
                "youtube",
                format!("{status}: {body}"),
            ));
        }

        let search: VideoSearchResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::upstream("youtube", e))?;

        Ok(search
            .items
            .into_iter()
            .next()
            .map(|item| format!("https://www.youtube.com/embed/{}", item.id.video_id)))
    }

    async fn fetch(&self, image: &ImageRef) -> Result<Vec<u8>, PipelineError> {
        let key = media_fingerprint(&image.url);

        match self.cache.load_bytes(&key).await {
            Ok(Some(bytes)) => {
                debug!(url = %image.url, "Image bytes cache hit");
                return Ok(bytes);
            }
            Ok(None) => {}
            Err(e) => warn!(%key, error = %e, "Cache read failed, treating as miss"),
        }

        self.limiter.acquire().await;
        debug!(url = %image.url, "Fetching image bytes");

        let response = self
            .http
            .get(&image.url)
            .send()
            .await
            .map_err(|e| PipelineError::upstream("unsplash", e))?;

        if !response.status().is_success() {
            return Err(PipelineError::upstream(
                "unsplash",
                format!("image fetch {}", response.status()),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PipelineError::upstream("unsplash", e))?
            .to_vec();

        if let Err(e) = self.cache.store_bytes(&key, &bytes).await {
            warn!(%key, error = %e, "Cache write failed");
        }

        Ok(bytes)
    }
}

/// Keep photos meeting the dimension floor, in rank order, up to count
fn select_images(photos: Vec<Photo>, filter: ImageFilter, count: usize, query: &str) -> Vec<ImageRef> {
    photos
        .into_iter()
        .filter(|p| p.width >= filter.min_width && p.height >= filter.min_height)
        .take(count)
        .map(|p| ImageRef {
            url: p.urls.raw,
            width: p.width,
            height: p.height,
            description: p.description.unwrap_or_else(|| query.to_string()),
            attribution: p.user.name,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(width: u32, height: u32, url: &str) -> Photo {
        Photo {
            width,
            height,
            description: None,
            urls: PhotoUrls {
                raw: url.to_string(),
            },
            user: PhotoUser {
                name: "Jane Doe".to_string(),
            },
        }
    }

    #[test]
    fn test_select_filters_small_images() {
        let filter = ImageFilter {
            min_width: 1200,
            min_height: 800,
        };

        let photos = vec![
            photo(800, 600, "small"),
            photo(1600, 900, "big1"),
            photo(1200, 800, "big2"),
        ];

        let images = select_images(photos, filter, 4, "gardening");
        let urls: Vec<&str> = images.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, vec!["big1", "big2"]);
    }

    #[test]
    fn test_select_caps_at_count_and_defaults_description() {
        let filter = ImageFilter {
            min_width: 1,
            min_height: 1,
        };

        let photos = vec![photo(10, 10, "a"), photo(10, 10, "b"), photo(10, 10, "c")];
        let images = select_images(photos, filter, 2, "gardening");

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].description, "gardening");
        assert_eq!(images[0].attribution, "Jane Doe");
    }

    #[test]
    fn test_search_response_parsing() {
        let raw = r#"{
            "results": [{
                "width": 1600,
                "height": 900,
                "description": "a garden",
                "urls": {"raw": "https://images.example.com/a"},
                "user": {"name": "Jane Doe"}
            }]
        }"#;

        let response: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].urls.raw, "https://images.example.com/a");
    }

    #[test]
    fn test_video_response_parsing() {
        let raw = r#"{"items":[{"id":{"kind":"youtube#video","videoId":"abc123"}}]}"#;
        let response: VideoSearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.items[0].id.video_id, "abc123");
    }
}
