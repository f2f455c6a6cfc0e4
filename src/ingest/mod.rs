//! Input ingestion.
//!
//! Loads topic rows from a CSV input file and provides a sample-data
//! generator for bootstrapping a new setup.

pub mod loader;

// Re-export key functions
pub use loader::{load_topics, write_sample_topics};
