//! draftpress - automated blog publishing pipeline
//!
//! Turns a file of topic rows into published blog posts: article text
//! from a language-generation service, images and an optional video
//! embed merged in at computed offsets, and the result pushed through
//! a CMS remote API.
//!
//! # Architecture
//!
//! The pipeline is built around three core pieces:
//! - Content assembly: cache-checked, retry-driven generation that
//!   must converge on a target word count
//! - Media composition: deterministic interleaving of images and a
//!   video embed into the generated text
//! - Publication tracking: a durable, append-ordered history of every
//!   create/update action
//!
//! External services (generation, media search, publishing) sit behind
//! narrow traits in `adapters`, so the core runs identically against
//! real services and test doubles.
//!
//! # Modules
//!
//! - `adapters`: Capability traits and real service adapters
//! - `core`: Assembly, composition, caching, tracking, coordination
//! - `domain`: Data structures (Topic, GeneratedContent, PublishRecord)
//! - `ingest`: Topics CSV loading
//! - `config`: YAML configuration, passed explicitly (no globals)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Generate a template input file
//! draftpress sample-topics
//!
//! # Publish every topic in the batch
//! draftpress run data/topics.csv
//!
//! # Inspect what was published
//! draftpress history
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod error;
pub mod ingest;

// Re-export main types at crate root for convenience
pub use adapters::{GenerationClient, MediaSource, PostDraft, PostUpdate, Publisher};
pub use config::Config;
pub use crate::core::{
    compose, BatchOptions, CacheStore, ContentAssembler, Coordinator, PublicationTracker,
};
pub use domain::{GeneratedContent, ImageRef, PostStatus, PublishRecord, Topic, UploadedImage};
pub use error::{CacheError, PipelineError};
