// src/clones/mod.rs
//! Clone identity, indexing and connectivity analytics.
//!
//! - [`canonical`]: whitespace-insensitive snippet digests
//! - [`index`]: identity -> occurrences, plus each notebook's snippet list
//! - [`connectivity`]: per-notebook connection and clone-frequency counters
//! - [`external`]: corpus reconstruction from clone-pair detector output

pub mod canonical;
pub mod connectivity;
pub mod external;
pub mod index;
pub mod types;
pub mod union_find;

pub use connectivity::{CloneFrequency, ConnectionStats, Ratio};
pub use index::{CloneCorpus, CloneIndex, CorpusBuilder};
pub use types::{NotebookHandle, Occurrence, RepoName, SnippetIdentity};
