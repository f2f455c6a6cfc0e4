//! Publish history tracking.
//!
//! Every create/update action is appended in memory and the full
//! sequence is rewritten to disk, through a temp file and an atomic
//! rename. A crash between append and persist loses at most the one
//! in-flight record and never corrupts prior ones.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::debug;

use crate::domain::PublishRecord;

/// Append-ordered, durable log of publish actions
#[derive(Debug)]
pub struct PublicationTracker {
    path: PathBuf,
    records: Vec<PublishRecord>,
}

impl PublicationTracker {
    /// Open a tracker, restoring any prior run's history.
    ///
    /// A missing file starts an empty history; a file that exists but
    /// does not parse is an error, since continuing would silently
    /// drop prior records on the next flush.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let records = if path.exists() {
            let raw = fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read history log: {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse history log: {}", path.display()))?
        } else {
            Vec::new()
        };

        debug!(path = %path.display(), records = records.len(), "History log opened");

        Ok(Self { path, records })
    }

    /// The file backing this tracker
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record and flush the full history to disk
    pub async fn record(&mut self, entry: PublishRecord) -> Result<()> {
        self.records.push(entry);
        self.persist().await
    }

    /// All records in append order, oldest first
    pub fn history(&self) -> &[PublishRecord] {
        &self.records
    }

    /// Rewrite the whole history file atomically
    async fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.records)?;

        // Write-then-rename keeps the flush all-or-nothing: readers
        // either see the old sequence or the new one, never a torn file.
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = tempfile::NamedTempFile::new_in(dir)
            .context("Failed to create temp file for history log")?;
        temp.write_all(json.as_bytes())
            .context("Failed to write history log")?;
        temp.persist(&self.path)
            .with_context(|| format!("Failed to replace history log: {}", self.path.display()))?;

        Ok(())
    }
}
