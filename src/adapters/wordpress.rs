//! WordPress REST API publisher.
//!
//! Uses application-password basic auth against the v2 REST routes.
//! Category and tag names are resolved to term ids, creating terms
//! that do not exist yet.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::PostStatus;
use crate::error::PipelineError;

use super::{PostDraft, PostUpdate, Publisher};

/// WordPress-backed publisher
pub struct WordPressPublisher {
    base_url: String,
    username: String,
    password: String,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct NewPost<'a> {
    title: &'a str,
    content: &'a str,
    status: &'a str,
    categories: Vec<u64>,
    tags: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    featured_media: Option<u64>,
}

#[derive(Debug, Default, Serialize)]
struct EditPost<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ObjectId {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct Term {
    id: u64,
    name: String,
}

#[derive(Debug, Serialize)]
struct NewTerm<'a> {
    name: &'a str,
}

fn status_str(status: PostStatus) -> &'static str {
    match status {
        PostStatus::Published => "publish",
        PostStatus::Scheduled => "future",
    }
}

impl WordPressPublisher {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            http: reqwest::Client::new(),
        }
    }

    fn route(&self, path: &str) -> String {
        format!("{}/wp-json/wp/v2/{path}", self.base_url)
    }

    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response, PipelineError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(PipelineError::Publish(format!("{status}: {body}")))
    }

    /// Resolve a term name to its id, creating the term when absent
    async fn resolve_term(&self, taxonomy: &str, name: &str) -> Result<u64, PipelineError> {
        let response = self
            .http
            .get(self.route(taxonomy))
            .basic_auth(&self.username, Some(&self.password))
            .query(&[("search", name)])
            .send()
            .await
            .map_err(|e| PipelineError::Publish(e.to_string()))?;

        let terms: Vec<Term> = self
            .check(response)
            .await?
            .json()
            .await
            .map_err(|e| PipelineError::Publish(e.to_string()))?;

        if let Some(id) = matching_term(&terms, name) {
            return Ok(id);
        }

        debug!(taxonomy, name, "Creating missing term");

        let response = self
            .http
            .post(self.route(taxonomy))
            .basic_auth(&self.username, Some(&self.password))
            .json(&NewTerm { name })
            .send()
            .await
            .map_err(|e| PipelineError::Publish(e.to_string()))?;

        let term: ObjectId = self
            .check(response)
            .await?
            .json()
            .await
            .map_err(|e| PipelineError::Publish(e.to_string()))?;

        Ok(term.id)
    }

    async fn resolve_terms(
        &self,
        taxonomy: &str,
        names: &[String],
    ) -> Result<Vec<u64>, PipelineError> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            ids.push(self.resolve_term(taxonomy, name).await?);
        }
        Ok(ids)
    }
}

#[async_trait]
impl Publisher for WordPressPublisher {
    async fn upload_media(&self, bytes: Vec<u8>, file_name: &str) -> Result<u64, PipelineError> {
        debug!(file_name, size = bytes.len(), "Uploading media");

        let response = self
            .http
            .post(self.route("media"))
            .basic_auth(&self.username, Some(&self.password))
            .header(
                "Content-Disposition",
                format!("attachment; filename=\"{file_name}\""),
            )
            .header("Content-Type", "image/jpeg")
            .body(bytes)
            .send()
            .await
            .map_err(|e| PipelineError::Publish(e.to_string()))?;

        let media: ObjectId = self
            .check(response)
            .await?
            .json()
            .await
            .map_err(|e| PipelineError::Publish(e.to_string()))?;

        Ok(media.id)
    }

    async fn create_post(&self, draft: &PostDraft) -> Result<String, PipelineError> {
        let categories = self.resolve_terms("categories", &draft.categories).await?;
        let tags = self.resolve_terms("tags", &draft.tags).await?;

        let post = NewPost {
            title: &draft.title,
            content: &draft.body,
            status: status_str(draft.status),
            categories,
            tags,
            featured_media: draft.featured_media,
        };

        let response = self
            .http
            .post(self.route("posts"))
            .basic_auth(&self.username, Some(&self.password))
            .json(&post)
            .send()
            .await
            .map_err(|e| PipelineError::Publish(e.to_string()))?;

        let created: ObjectId = self
            .check(response)
            .await?
            .json()
            .await
            .map_err(|e| PipelineError::Publish(e.to_string()))?;

        info!(post_id = created.id, title = %draft.title, "Post created");

        Ok(created.id.to_string())
    }

    async fn update_post(
        &self,
        post_id: &str,
        update: &PostUpdate,
    ) -> Result<bool, PipelineError> {
        let edit = EditPost {
            title: update.title.as_deref(),
            content: update.body.as_deref(),
            status: update.status.map(status_str),
        };

        let response = self
            .http
            .post(self.route(&format!("posts/{post_id}")))
            .basic_auth(&self.username, Some(&self.password))
            .json(&edit)
            .send()
            .await
            .map_err(|e| PipelineError::Publish(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }

        self.check(response).await?;
        info!(post_id, "Post updated");

        Ok(true)
    }
}

/// Case-insensitive exact name match
fn matching_term(terms: &[Term], name: &str) -> Option<u64> {
    terms
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
        .map(|t| t.id)
}
