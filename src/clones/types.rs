// src/clones/types.rs
//! Core value types for the clone index.
//!
//! A snippet is identified by its content digest *and* its non-blank line
//! count. Occurrences and notebook handles carry an optional repository tag
//! that is informational only: it never takes part in equality.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Repository names are shared between every occurrence of a notebook.
/// Comparison is always by string value.
pub type RepoName = Arc<str>;

/// Hex digest of the empty byte string (MD5).
pub const EMPTY_DIGEST: &str = "D41D8CD98F00B204E9800998ECF8427E";

/// The clone-equivalence key: content digest plus non-blank line count.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnippetIdentity {
    digest: Arc<str>,
    line_count: usize,
}

impl SnippetIdentity {
    #[must_use]
    pub fn new(digest: impl Into<Arc<str>>, line_count: usize) -> Self {
        Self {
            digest: digest.into(),
            line_count,
        }
    }

    #[must_use]
    pub fn digest(&self) -> &str {
        &self.digest
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// An identity with no non-blank lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line_count == 0
    }
}

impl fmt::Display for SnippetIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digest)
    }
}

/// One place where a snippet identity occurs.
#[derive(Debug, Clone)]
pub struct Occurrence {
    pub notebook: Arc<str>,
    pub index: usize,
    pub repository: Option<RepoName>,
}

impl Occurrence {
    #[must_use]
    pub fn new(notebook: impl Into<Arc<str>>, index: usize, repository: Option<RepoName>) -> Self {
        Self {
            notebook: notebook.into(),
            index,
            repository,
        }
    }

    /// Builds the occurrence of snippet `index` in `notebook`.
    #[must_use]
    pub fn of(notebook: &NotebookHandle, index: usize) -> Self {
        Self {
            notebook: Arc::clone(&notebook.name),
            index,
            repository: notebook.repository.clone(),
        }
    }
}

impl PartialEq for Occurrence {
    fn eq(&self, other: &Self) -> bool {
        self.notebook == other.notebook && self.index == other.index
    }
}

impl Eq for Occurrence {}

impl Hash for Occurrence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.notebook.hash(state);
        self.index.hash(state);
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.notebook, self.index)
    }
}

/// A notebook, identified by its file name (basename incl. extension).
///
/// The repository is attached after construction and does not take part in
/// equality or hashing: two handles with the same name are the same notebook.
#[derive(Debug, Clone)]
pub struct NotebookHandle {
    pub name: Arc<str>,
    pub repository: Option<RepoName>,
}

impl NotebookHandle {
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            repository: None,
        }
    }

    #[must_use]
    pub fn with_repository(mut self, repository: Option<RepoName>) -> Self {
        self.repository = repository;
        self
    }

    /// True if `other` lives in the same repository. Unknown equals unknown.
    #[must_use]
    pub fn same_repository(&self, other: Option<&RepoName>) -> bool {
        same_repository(self.repository.as_ref(), other)
    }
}

impl PartialEq for NotebookHandle {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for NotebookHandle {}

impl Hash for NotebookHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for NotebookHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Value comparison of two optional repository names.
#[must_use]
pub fn same_repository(a: Option<&RepoName>, b: Option<&RepoName>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.as_ref() == b.as_ref(),
        (None, None) => true,
        _ => false,
    }
}

/// Name of the notebook with number `number` in a numbered corpus.
#[must_use]
pub fn numbered_notebook_name(number: u64) -> String {
    format!("nb_{number}.ipynb")
}
