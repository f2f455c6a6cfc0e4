//! Content assembly — cache-checked, retry-driven generation that must
//! converge on a target word count.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::adapters::GenerationClient;
use crate::domain::{GeneratedContent, Topic};
use crate::error::PipelineError;

use super::cache::CacheStore;
use super::fingerprint::content_fingerprint;

/// Token budget per requested word
const TOKENS_PER_WORD: f64 = 1.3;

/// System role handed to the generation service
const SYSTEM_PROMPT: &str = "You are a professional content writer.";

/// Produces validated article content for a topic
pub struct ContentAssembler {
    client: Arc<dyn GenerationClient>,
    cache: CacheStore,
    max_attempts: u32,
}

impl ContentAssembler {
    pub fn new(client: Arc<dyn GenerationClient>, cache: CacheStore, max_attempts: u32) -> Self {
        Self {
            client,
            cache,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Generate article content, converging on the target word count.
    ///
    /// The cache key covers the topic and keyword fields only, so a hit
    /// short-circuits generation entirely — even when the cached entry
    /// was produced for a different length target. Retries reuse the
    /// same prompt; each generation call (including one that fails in
    /// transport) consumes one attempt. Exhausting the budget fails
    /// with `Generation` after exactly `max_attempts` calls.
    pub async fn assemble(
        &self,
        topic: &Topic,
        target_word_count: usize,
    ) -> Result<GeneratedContent, PipelineError> {
        let key = content_fingerprint(topic);

        match self.cache.load::<GeneratedContent>(&key).await {
            Ok(Some(cached)) => {
                info!(topic = %topic.topic, %key, "Content cache hit");
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => warn!(%key, error = %e, "Cache read failed, treating as miss"),
        }

        let prompt = build_prompt(topic, target_word_count);
        let max_tokens = (target_word_count as f64 * TOKENS_PER_WORD) as u32;

        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            debug!(
                topic = %topic.topic,
                attempt,
                max_attempts = self.max_attempts,
                "Requesting content generation"
            );

            let raw = match self
                .client
                .complete(SYSTEM_PROMPT, &prompt, max_tokens)
                .await
            {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(topic = %topic.topic, attempt, error = %e, "Generation call failed");
                    last_error = Some(e);
                    continue;
                }
            };

            let content = GeneratedContent::from_raw(&raw, target_word_count);

            if content.within_tolerance() {
                info!(
                    topic = %topic.topic,
                    attempt,
                    word_count = content.word_count,
                    target_word_count,
                    "Content accepted"
                );

                if let Err(e) = self.cache.store(&key, &content).await {
                    warn!(%key, error = %e, "Cache write failed");
                }

                return Ok(content);
            }

            warn!(
                topic = %topic.topic,
                attempt,
                word_count = content.word_count,
                target_word_count,
                "Word count out of tolerance, regenerating"
            );
            last_error = None;
        }

        match last_error {
            // The final attempt died in transport; surface that instead
            Some(e) => Err(e),
            None => Err(PipelineError::Generation {
                attempts: self.max_attempts,
                target: target_word_count,
            }),
        }
    }
}

/// Build the generation prompt for a topic.
///
/// Embeds the keyword lists, audience, tone, today's date, the length
/// requirement, and the fixed article structure; a custom outline is
/// appended when the topic carries one.
pub fn build_prompt(topic: &Topic, target_word_count: usize) -> String {
    let mut prompt = format!(
        "Write a comprehensive article about: {topic}\n\
         \n\
         Key Requirements:\n\
         - Article length: exactly {words} words ({words} words minimum)\n\
         - Include these primary keywords naturally: {primary}\n\
         - Work in these supporting keywords where they fit: {additional}\n\
         - Target audience: {audience}\n\
         - Tone and style: {tone}\n\
         - Today's date: {date}\n\
         - Optimize for SEO while maintaining readability\n\
         \n\
         Structure:\n\
         1. Title (first line, as a level-1 heading)\n\
         2. Meta description\n\
         3. Engaging introduction with hook\n\
         4. Main body sections with subheadings\n\
         5. Practical application section\n\
         6. FAQ\n\
         7. Conclusion with key takeaways\n",
        topic = topic.topic,
        words = target_word_count,
        primary = topic.primary_keyword_list().join(", "),
        additional = topic.additional_keyword_list().join(", "),
        audience = topic.target_audience,
        tone = topic.tone_style,
        date = Utc::now().format("%Y-%m-%d"),
    );

    if let Some(outline) = &topic.custom_outline {
        prompt.push_str("\nCustom Outline:\n");
        for section in &outline.sections {
            prompt.push('\n');
            prompt.push_str(&section.title);
            prompt.push('\n');
            for subsection in &section.subsections {
                prompt.push_str("- ");
                prompt.push_str(subsection);
                prompt.push('\n');
            }
        }
    }

    prompt
}
