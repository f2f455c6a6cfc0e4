//! Domain types for the publishing pipeline.
//!
//! This module contains the core data structures:
//! - Topic: one validated input row
//! - GeneratedContent: structured generator output
//! - ImageRef/UploadedImage: media references
//! - PublishRecord: one history log entry

pub mod content;
pub mod media;
pub mod record;
pub mod topic;

// Re-export commonly used types
pub use content::{GeneratedContent, WORD_COUNT_TOLERANCE};
pub use media::{ImageRef, UploadedImage};
pub use record::{PostStatus, PublishRecord};
pub use topic::{Outline, OutlineSection, Topic, DEFAULT_WORD_COUNT};
