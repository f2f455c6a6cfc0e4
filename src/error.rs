//! Error taxonomy for the publishing pipeline.
//!
//! Every per-topic failure is one of these variants; the coordinator
//! catches them at the topic boundary and the batch continues. Cache
//! failures are deliberately a separate type because they are never
//! propagated — the cache is an optimization, not a correctness
//! dependency.

use thiserror::Error;

/// Errors that abort a single topic's processing
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Malformed topic row, raised before any external call
    #[error("invalid topic row: {0}")]
    Validation(String),

    /// Generation never converged to the target word count
    #[error("generation did not converge after {attempts} attempts (target {target} words)")]
    Generation { attempts: u32, target: usize },

    /// Transport/auth/quota failure from an upstream service
    #[error("{service} request failed: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },

    /// The publisher rejected the post
    #[error("publish failed: {0}")]
    Publish(String),
}

impl PipelineError {
    /// Shorthand for an upstream failure from a named service
    pub fn upstream(service: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Upstream {
            service,
            message: err.to_string(),
        }
    }
}

/// Cache store read/write failures
///
/// Logged at the call site and treated as a miss (reads) or a no-op
/// (writes). Never converted into a `PipelineError`.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache io: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache payload: {0}")]
    Payload(#[from] serde_json::Error),
}
