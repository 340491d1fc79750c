// src/corpus/mod.rs
//! Live ingestion of a notebook corpus.
//!
//! Notebooks are discovered on disk, tagged with their repository, and
//! processed by a worker pool. Results are merged into a [`CloneCorpus`] by
//! the calling thread, one notebook at a time and in discovery order.

pub mod cache;
pub mod discovery;
pub mod notebook;
pub mod worker;

pub use cache::DocumentCache;
pub use notebook::{Document, LocSummary, Notebook};
pub use worker::{NotebookStats, WorkerPool};

use crate::clones::index::{CloneCorpus, CorpusBuilder};
use crate::clones::types::SnippetIdentity;
use crate::config::Config;
use crate::error::Result;
use crate::repos::RepositoryMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Notebooks merged between two progress messages.
pub const NOTEBOOK_HEARTBEAT: usize = 10_000;

/// Line counts of one notebook, by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocRow {
    pub notebook: String,
    pub loc: LocSummary,
}

/// Code-cell count of one notebook, by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeCellRow {
    pub notebook: String,
    pub code_cells: usize,
}

/// The outcome of a single pass computing every per-notebook statistic.
#[derive(Debug, Default)]
pub struct CorpusAnalysis {
    pub clones: CloneCorpus,
    pub loc: Vec<LocRow>,
    pub code_cells: Vec<CodeCellRow>,
}

/// A notebook corpus ready for analysis.
#[derive(Debug)]
pub struct Corpus {
    notebooks: Vec<Notebook>,
    cache: DocumentCache,
    pool: WorkerPool,
}

impl Corpus {
    /// Discovers the notebooks under `root` and attaches repositories.
    ///
    /// # Errors
    /// Returns error if `root` does not exist or the worker pool cannot start.
    pub fn open(root: &Path, repos: Option<&RepositoryMap>, config: &Config) -> Result<Self> {
        let paths = discovery::discover(root)?;
        info!("Found {} notebooks under {}", paths.len(), root.display());
        Self::from_paths(paths, repos, config)
    }

    /// Builds a corpus from explicit notebook paths.
    ///
    /// # Errors
    /// Returns error if the worker pool cannot start.
    pub fn from_paths(paths: Vec<PathBuf>, repos: Option<&RepositoryMap>, config: &Config) -> Result<Self> {
        let notebooks = paths
            .into_iter()
            .map(|path| {
                let mut nb = Notebook::new(path);
                if let Some(repos) = repos {
                    let repository = repos.by_name(nb.name());
                    nb.set_repository(repository);
                }
                nb
            })
            .collect();
        Ok(Self {
            notebooks,
            cache: DocumentCache::new(config.cache.documents),
            pool: WorkerPool::new(config.worker_threads())?,
        })
    }

    #[must_use]
    pub fn notebooks(&self) -> &[Notebook] {
        &self.notebooks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notebooks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notebooks.is_empty()
    }

    /// Computes every notebook's snippet identities and builds the clone index.
    #[must_use]
    pub fn clones(&self) -> CloneCorpus {
        let identities = self
            .pool
            .run(&self.notebooks, &self.cache, worker::snippet_identities);
        self.merge(identities)
    }

    /// Line counts of every notebook.
    #[must_use]
    pub fn loc(&self) -> Vec<LocRow> {
        let summaries = self.pool.run(&self.notebooks, &self.cache, worker::loc_summary);
        self.notebooks
            .iter()
            .zip(summaries)
            .map(|(nb, loc)| LocRow {
                notebook: nb.name().to_string(),
                loc,
            })
            .collect()
    }

    /// Code-cell count of every notebook.
    #[must_use]
    pub fn code_cells(&self) -> Vec<CodeCellRow> {
        let counts = self.pool.run(&self.notebooks, &self.cache, worker::code_cells);
        self.notebooks
            .iter()
            .zip(counts)
            .map(|(nb, code_cells)| CodeCellRow {
                notebook: nb.name().to_string(),
                code_cells,
            })
            .collect()
    }

    /// Identities, line counts and code-cell counts from one pass.
    #[must_use]
    pub fn analyze(&self) -> CorpusAnalysis {
        let stats = self.pool.run(&self.notebooks, &self.cache, worker::notebook_stats);
        let mut loc = Vec::with_capacity(stats.len());
        let mut code_cells = Vec::with_capacity(stats.len());
        let mut identities = Vec::with_capacity(stats.len());
        for (nb, s) in self.notebooks.iter().zip(stats) {
            loc.push(LocRow {
                notebook: nb.name().to_string(),
                loc: s.loc,
            });
            code_cells.push(CodeCellRow {
                notebook: nb.name().to_string(),
                code_cells: s.code_cells,
            });
            identities.push(s.snippets);
        }
        CorpusAnalysis {
            clones: self.merge(identities),
            loc,
            code_cells,
        }
    }

    fn merge(&self, identities: Vec<Vec<SnippetIdentity>>) -> CloneCorpus {
        let mut builder = CorpusBuilder::new();
        for (i, (nb, snippets)) in self.notebooks.iter().zip(identities).enumerate() {
            if i > 0 && i % NOTEBOOK_HEARTBEAT == 0 {
                info!("Hashes from notebook {i} of {} stored.", self.notebooks.len());
            }
            builder.add_notebook(nb.handle().clone(), snippets);
        }
        let corpus = builder.finish();
        info!(
            "Indexed {} snippets with {} distinct identities from {} notebooks",
            corpus.snippet_count(),
            corpus.index().len(),
            corpus.notebook_count()
        );
        corpus
    }
}
