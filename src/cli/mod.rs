//! Command-line interface for draftpress.
//!
//! Provides commands for running a topics batch, inspecting the
//! publish history, generating sample input, and showing the resolved
//! configuration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::adapters::{ImageFilter, OpenAiClient, UnsplashMedia, WordPressPublisher};
use crate::config::{Config, DEFAULT_CONFIG_PATH};
use crate::core::{
    BatchOptions, CacheStore, ContentAssembler, Coordinator, OutcomeStatus, PublicationTracker,
    SlidingWindow,
};
use crate::ingest;

/// draftpress - automated blog publishing pipeline
#[derive(Parser, Debug)]
#[command(name = "draftpress")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process a topics file and publish each article
    Run {
        /// Topics CSV (default: <data_dir>/topics.csv)
        input: Option<PathBuf>,
    },

    /// Show the publish history
    History {
        /// Maximum number of records to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Write a template topics file
    SampleTopics {
        /// Output path (default: <data_dir>/topics.csv)
        output: Option<PathBuf>,
    },

    /// Show the resolved configuration (secrets masked)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run { input } => run_batch(&self.config, input).await,
            Commands::History { limit } => show_history(&self.config, limit).await,
            Commands::SampleTopics { output } => write_sample_topics(&self.config, output),
            Commands::Config => show_config(&self.config),
        }
    }
}

/// Run the full pipeline over a topics file
async fn run_batch(config_path: &PathBuf, input: Option<PathBuf>) -> Result<()> {
    let config = Config::load(config_path)?;
    let input = input.unwrap_or_else(|| config.default_input_path());

    let topics = ingest::load_topics(&input)?;
    if topics.is_empty() {
        bail!("No topics found in {}", input.display());
    }

    info!(topics = topics.len(), input = %input.display(), "Starting batch");

    let cache = CacheStore::new(config.cache_dir());
    let tracker = PublicationTracker::open(config.history_path()).await?;

    let client = Arc::new(OpenAiClient::new(
        &config.openai.api_key,
        &config.openai.model,
    ));
    let assembler = ContentAssembler::new(client, cache.clone(), config.content.max_attempts);

    let limiter = SlidingWindow::new(
        config.media_rate_limit.calls,
        Duration::from_secs(config.media_rate_limit.period_seconds),
    );
    let media = Arc::new(UnsplashMedia::new(
        &config.unsplash.access_key,
        config.youtube.as_ref().map(|y| y.api_key.clone()),
        ImageFilter {
            min_width: config.images.min_width,
            min_height: config.images.min_height,
        },
        limiter,
        cache,
    ));

    let publisher = Arc::new(WordPressPublisher::new(
        &config.wordpress.url,
        &config.wordpress.username,
        &config.wordpress.password,
    ));

    let options = BatchOptions {
        images_per_post: config.images.per_post,
        post_delay: Duration::from_secs(config.content.post_delay_seconds),
        default_word_count: config.content.default_word_count,
    };

    let mut coordinator = Coordinator::new(assembler, media, publisher, tracker, options);
    let outcomes = coordinator.run(&topics).await;

    let mut published = 0;
    for outcome in &outcomes {
        match outcome.status {
            OutcomeStatus::Success => {
                published += 1;
                println!(
                    "✓ {} (post {})",
                    outcome.topic,
                    outcome.post_id.as_deref().unwrap_or("?")
                );
            }
            OutcomeStatus::Error => {
                println!(
                    "✗ {}: {}",
                    outcome.topic,
                    outcome.message.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }

    println!("\n{published}/{} topics published", outcomes.len());

    // Per-topic failures do not fail the run; only startup errors do
    Ok(())
}

/// Print recent publish history, oldest first
async fn show_history(config_path: &PathBuf, limit: usize) -> Result<()> {
    let config = Config::load(config_path)?;
    let tracker = PublicationTracker::open(config.history_path()).await?;

    let records = tracker.history();
    if records.is_empty() {
        println!("No publish history yet.");
        return Ok(());
    }

    let start = records.len().saturating_sub(limit);
    for record in &records[start..] {
        let (action, when) = match (record.created_at, record.updated_at) {
            (Some(at), _) => ("created", at),
            (None, Some(at)) => ("updated", at),
            (None, None) => continue,
        };

        println!(
            "{}  {:7}  post {}  {}",
            when.format("%Y-%m-%d %H:%M:%S"),
            action,
            record.post_id,
            record.title
        );
    }

    println!("\n{} of {} records", records.len().min(limit), records.len());

    Ok(())
}

/// Write a template topics CSV
fn write_sample_topics(config_path: &PathBuf, output: Option<PathBuf>) -> Result<()> {
    let config = Config::load(config_path)?;
    let output = output.unwrap_or_else(|| config.default_input_path());

    ingest::write_sample_topics(&output)?;
    println!("Sample topics written to {}", output.display());

    Ok(())
}

/// Show the resolved configuration with secrets masked
fn show_config(config_path: &PathBuf) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("config file:     {}", config_path.display());
    println!("wordpress.url:   {}", config.wordpress.url);
    println!("wordpress.user:  {}", config.wordpress.username);
    println!("wordpress.pass:  {}", mask(&config.wordpress.password));
    println!("openai.api_key:  {}", mask(&config.openai.api_key));
    println!("openai.model:    {}", config.openai.model);
    println!("unsplash.key:    {}", mask(&config.unsplash.access_key));
    println!(
        "youtube.key:     {}",
        config
            .youtube
            .as_ref()
            .map(|y| mask(&y.api_key))
            .unwrap_or_else(|| "(not set)".to_string())
    );
    println!("images:          {}x{} min, {} per post",
        config.images.min_width, config.images.min_height, config.images.per_post);
    println!(
        "content:         {} words, {} attempts, {}s delay",
        config.content.default_word_count,
        config.content.max_attempts,
        config.content.post_delay_seconds
    );
    println!(
        "rate limit:      {} calls / {}s",
        config.media_rate_limit.calls, config.media_rate_limit.period_seconds
    );
    println!("data dir:        {}", config.paths.data_dir.display());

    Ok(())
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        "(not set)".to_string()
    } else {
        let head: String = secret.chars().take(4).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_short_and_long() {
        assert_eq!(mask(""), "(not set)");
        assert_eq!(mask("ab"), "ab…");
        assert_eq!(mask("sk-abcdef"), "sk-a…");
    }
}
