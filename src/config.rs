//! Configuration loading.
//!
//! Configuration sources (highest priority first):
//! 1. The YAML config file (config/config.yaml by default)
//! 2. Environment variables for credentials left empty in the file
//!    (OPENAI_API_KEY, UNSPLASH_ACCESS_KEY, YOUTUBE_API_KEY,
//!    WORDPRESS_PASSWORD)
//! 3. Built-in defaults for tunables
//!
//! The loaded `Config` is constructed once in the CLI and passed by
//! reference into each component — there is no process-wide global.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Default location of the config file, relative to the working dir
pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

/// Full runtime configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub wordpress: WordPressConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub unsplash: UnsplashConfig,
    #[serde(default)]
    pub youtube: Option<YouTubeConfig>,
    #[serde(default)]
    pub images: ImageSettings,
    #[serde(default)]
    pub content: ContentSettings,
    #[serde(default)]
    pub media_rate_limit: RateLimitSettings,
    #[serde(default)]
    pub paths: PathSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WordPressConfig {
    /// Site base URL (e.g. https://blog.example.com)
    pub url: String,
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnsplashConfig {
    #[serde(default)]
    pub access_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeConfig {
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageSettings {
    #[serde(default = "default_min_width")]
    pub min_width: u32,
    #[serde(default = "default_min_height")]
    pub min_height: u32,
    /// Images per post: 1 featured + the rest inline
    #[serde(default = "default_images_per_post")]
    pub per_post: usize,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            min_width: default_min_width(),
            min_height: default_min_height(),
            per_post: default_images_per_post(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentSettings {
    #[serde(default = "default_word_count")]
    pub default_word_count: usize,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay between consecutive posts, in seconds
    #[serde(default = "default_post_delay")]
    pub post_delay_seconds: u64,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            default_word_count: default_word_count(),
            max_attempts: default_max_attempts(),
            post_delay_seconds: default_post_delay(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitSettings {
    #[serde(default = "default_rate_calls")]
    pub calls: usize,
    #[serde(default = "default_rate_period")]
    pub period_seconds: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            calls: default_rate_calls(),
            period_seconds: default_rate_period(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathSettings {
    /// Root for cache, history, and default input
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_model() -> String {
    "gpt-4".to_string()
}
fn default_min_width() -> u32 {
    1200
}
fn default_min_height() -> u32 {
    800
}
fn default_images_per_post() -> usize {
    4
}
fn default_word_count() -> usize {
    3200
}
fn default_max_attempts() -> u32 {
    3
}
fn default_post_delay() -> u64 {
    300
}
fn default_rate_calls() -> usize {
    30
}
fn default_rate_period() -> u64 {
    60
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Config {
    /// Load and validate configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Configuration file not found: {}", path.display());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.apply_env_fallbacks();
        config.validate()?;

        Ok(config)
    }

    /// Fill empty credentials from conventional environment variables
    fn apply_env_fallbacks(&mut self) {
        let fill = |field: &mut String, var: &str| {
            if field.is_empty() {
                if let Ok(value) = std::env::var(var) {
                    *field = value;
                }
            }
        };

        fill(&mut self.openai.api_key, "OPENAI_API_KEY");
        fill(&mut self.unsplash.access_key, "UNSPLASH_ACCESS_KEY");
        fill(&mut self.wordpress.password, "WORDPRESS_PASSWORD");

        if self.youtube.is_none() {
            if let Ok(api_key) = std::env::var("YOUTUBE_API_KEY") {
                self.youtube = Some(YouTubeConfig { api_key });
            }
        }
    }

    /// Check required settings, reporting every missing key at once
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("wordpress.url", &self.wordpress.url),
            ("wordpress.username", &self.wordpress.username),
            ("wordpress.password", &self.wordpress.password),
            ("openai.api_key", &self.openai.api_key),
            ("unsplash.access_key", &self.unsplash.access_key),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            bail!("Configuration validation failed, missing: {}", missing.join(", "));
        }
    }

    /// Directory for cached artifacts
    pub fn cache_dir(&self) -> PathBuf {
        self.paths.data_dir.join("cache")
    }

    /// Publish history log file
    pub fn history_path(&self) -> PathBuf {
        self.paths.data_dir.join("post_history.json")
    }

    /// Default topics input file
    pub fn default_input_path(&self) -> PathBuf {
        self.paths.data_dir.join("topics.csv")
    }
}
