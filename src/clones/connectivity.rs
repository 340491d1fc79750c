// src/clones/connectivity.rs
//! Per-notebook connectivity and clone-frequency metrics.
//!
//! Imagine a graph whose nodes are snippet occurrences and where every pair
//! of occurrences sharing an identity is joined by an edge. For a notebook N
//! in repository R, each of its snippets contributes the edges to every
//! *other* occurrence of its identity. Those edges are split by whether the
//! far end lives in R (intra-repository) or elsewhere (inter-repository).

use super::index::{CloneCorpus, CloneIndex};
use super::types::{NotebookHandle, RepoName, SnippetIdentity};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A ratio whose zero-denominator value is the literal `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio {
    pub numerator: usize,
    pub denominator: usize,
}

impl Ratio {
    #[must_use]
    pub fn new(numerator: usize, denominator: usize) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// The ratio as a float; 0.0 when the denominator is 0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self) -> f64 {
        if self.denominator == 0 {
            0.0
        } else {
            self.numerator as f64 / self.denominator as f64
        }
    }
}

impl fmt::Display for Ratio {
    /// Four decimals with a `.` separator, or `0` if undefined.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == 0 {
            f.write_str("0")
        } else {
            write!(f, "{:.4}", self.value())
        }
    }
}

/// The connection counters for one notebook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionStats {
    pub notebook: String,
    pub snippets: usize,
    pub non_empty_snippets: usize,
    pub connections: usize,
    pub non_empty_connections: usize,
    pub intra_repo_connections: usize,
    pub non_empty_intra_repo_connections: usize,
    pub inter_repo_connections: usize,
    pub non_empty_inter_repo_connections: usize,
    /// Distinct other repositories reached by any snippet.
    pub inter_repos: usize,
    /// Distinct other repositories reached by non-empty snippets.
    pub non_empty_inter_repos: usize,
}

impl ConnectionStats {
    #[must_use]
    pub fn connections_normalized(&self) -> Ratio {
        Ratio::new(self.connections, self.snippets)
    }

    #[must_use]
    pub fn non_empty_connections_normalized(&self) -> Ratio {
        Ratio::new(self.non_empty_connections, self.non_empty_snippets)
    }

    /// Inter-repository connections per distinct other repository.
    #[must_use]
    pub fn mean_inter_repo_connections(&self) -> Ratio {
        Ratio::new(self.inter_repo_connections, self.inter_repos)
    }

    #[must_use]
    pub fn mean_non_empty_inter_repo_connections(&self) -> Ratio {
        Ratio::new(
            self.non_empty_inter_repo_connections,
            self.non_empty_inter_repos,
        )
    }
}

/// Clone counts for one notebook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloneFrequency {
    pub notebook: String,
    pub unique: usize,
    pub clones: usize,
    pub empty: usize,
    /// Clones among the non-empty snippets.
    pub non_empty_clones: usize,
    pub intra_clones: usize,
    pub non_empty_intra_clones: usize,
}

impl CloneFrequency {
    #[must_use]
    pub fn clone_frequency(&self) -> Ratio {
        Ratio::new(self.clones, self.unique + self.clones)
    }

    #[must_use]
    pub fn non_empty_clone_frequency(&self) -> Ratio {
        let non_empty = (self.unique + self.clones).saturating_sub(self.empty);
        Ratio::new(self.non_empty_clones, non_empty)
    }
}

/// Computes connection stats for every notebook, in corpus order.
#[must_use]
pub fn connections(corpus: &CloneCorpus) -> Vec<ConnectionStats> {
    let notebooks: Vec<_> = corpus.notebooks().collect();
    notebooks
        .par_iter()
        .map(|(nb, snippets)| notebook_connections(nb, snippets, corpus.index()))
        .collect()
}

/// Computes connection stats for a single notebook.
#[must_use]
pub fn notebook_connections(
    notebook: &NotebookHandle,
    snippets: &[SnippetIdentity],
    index: &CloneIndex,
) -> ConnectionStats {
    let mut stats = ConnectionStats {
        notebook: notebook.name.to_string(),
        snippets: snippets.len(),
        ..ConnectionStats::default()
    };
    let mut other_repos: HashSet<Option<&RepoName>> = HashSet::new();
    let mut other_non_empty_repos: HashSet<Option<&RepoName>> = HashSet::new();

    for snippet in snippets {
        let Some(locations) = index.get(snippet) else {
            continue;
        };
        let links = locations.len().saturating_sub(1);
        let mut same_repo = 0usize;
        let mut other_repo = 0usize;
        for friend in locations {
            if notebook.same_repository(friend.repository.as_ref()) {
                same_repo += 1;
            } else {
                other_repo += 1;
                other_repos.insert(friend.repository.as_ref());
                if !snippet.is_empty() {
                    other_non_empty_repos.insert(friend.repository.as_ref());
                }
            }
        }
        // The snippet's own occurrence is always in the notebook's repository.
        let intra = same_repo.saturating_sub(1);

        stats.connections += links;
        stats.intra_repo_connections += intra;
        stats.inter_repo_connections += other_repo;
        if !snippet.is_empty() {
            stats.non_empty_snippets += 1;
            stats.non_empty_connections += links;
            stats.non_empty_intra_repo_connections += intra;
            stats.non_empty_inter_repo_connections += other_repo;
        }
    }

    // `Option<&Arc<str>>` hashes by value, so equal names collapse here.
    stats.inter_repos = other_repos.len();
    stats.non_empty_inter_repos = other_non_empty_repos.len();
    stats
}

/// Computes clone-frequency counters for every notebook, in corpus order.
#[must_use]
pub fn clone_frequencies(corpus: &CloneCorpus) -> Vec<CloneFrequency> {
    let notebooks: Vec<_> = corpus.notebooks().collect();
    notebooks
        .par_iter()
        .map(|(nb, snippets)| notebook_clone_frequency(nb, snippets, corpus.index()))
        .collect()
}

#[must_use]
pub fn notebook_clone_frequency(
    notebook: &NotebookHandle,
    snippets: &[SnippetIdentity],
    index: &CloneIndex,
) -> CloneFrequency {
    let mut local: HashMap<&SnippetIdentity, usize> = HashMap::new();
    for snippet in snippets {
        *local.entry(snippet).or_default() += 1;
    }

    let mut freq = CloneFrequency {
        notebook: notebook.name.to_string(),
        ..CloneFrequency::default()
    };
    for snippet in snippets {
        let clone = index.is_clone(snippet);
        let intra = local.get(snippet).copied().unwrap_or(0) >= 2;
        if clone {
            freq.clones += 1;
        } else {
            freq.unique += 1;
        }
        if intra {
            freq.intra_clones += 1;
        }
        if snippet.is_empty() {
            freq.empty += 1;
        } else {
            if clone {
                freq.non_empty_clones += 1;
            }
            if intra {
                freq.non_empty_intra_clones += 1;
            }
        }
    }
    freq
}
