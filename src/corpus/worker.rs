// src/corpus/worker.rs
//! Per-notebook tasks and the pool that runs them.
//!
//! Each task is a plain function of one notebook. The pool runs a task over
//! every notebook in parallel and hands the results back in submission
//! order; a failed task is logged and replaced by the default result.

use super::cache::DocumentCache;
use super::notebook::{LocSummary, Notebook};
use crate::clones::types::SnippetIdentity;
use crate::error::{CloneError, Result};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, warn};

/// Everything computed for a notebook in a single pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotebookStats {
    pub snippets: Vec<SnippetIdentity>,
    pub loc: LocSummary,
    pub code_cells: usize,
}

/// Snippet identities of every code cell.
///
/// # Errors
/// Returns error if the notebook cannot be loaded.
pub fn snippet_identities(notebook: &Notebook, cache: &DocumentCache) -> Result<Vec<SnippetIdentity>> {
    Ok(notebook.document(cache)?.snippet_identities())
}

/// Line counts of the notebook.
///
/// # Errors
/// Returns error if the notebook cannot be loaded.
pub fn loc_summary(notebook: &Notebook, cache: &DocumentCache) -> Result<LocSummary> {
    notebook.loc(cache)
}

/// Number of code cells.
///
/// # Errors
/// Returns error if the notebook cannot be loaded.
pub fn code_cells(notebook: &Notebook, cache: &DocumentCache) -> Result<usize> {
    Ok(notebook.document(cache)?.code_cell_count())
}

/// Identities, line counts and cell count from one load of the document.
///
/// # Errors
/// Returns error if the notebook cannot be loaded.
pub fn notebook_stats(notebook: &Notebook, cache: &DocumentCache) -> Result<NotebookStats> {
    let doc = notebook.document(cache)?;
    let loc = doc.loc();
    notebook.remember_loc(loc);
    Ok(NotebookStats {
        snippets: doc.snippet_identities(),
        loc,
        code_cells: doc.code_cell_count(),
    })
}

/// A fixed-size pool of worker threads.
pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    /// Builds a pool with `threads` workers.
    ///
    /// # Errors
    /// Returns error if the threads cannot be spawned.
    pub fn new(threads: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|i| format!("nbclone-worker-{i}"))
            .build()
            .map_err(|e| CloneError::Other(format!("failed to start worker pool: {e}")))?;
        debug!("Started worker pool with {} threads", pool.current_num_threads());
        Ok(Self { pool })
    }

    #[must_use]
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Runs `task` on every notebook and returns the results in the order
    /// of `notebooks`.
    pub fn run<T, F>(&self, notebooks: &[Notebook], cache: &DocumentCache, task: F) -> Vec<T>
    where
        T: Default + Send,
        F: Fn(&Notebook, &DocumentCache) -> Result<T> + Sync,
    {
        let outcomes: Vec<Result<T>> = self
            .pool
            .install(|| notebooks.par_iter().map(|nb| task(nb, cache)).collect());

        notebooks
            .iter()
            .zip(outcomes)
            .map(|(nb, outcome)| {
                outcome.unwrap_or_else(|e| {
                    warn!("Skipping notebook {}: {e}", nb.path().display());
                    T::default()
                })
            })
            .collect()
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("threads", &self.threads())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_failed_task_yields_default() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let good = dir.path().join("good.ipynb");
        let bad = dir.path().join("bad.ipynb");
        fs::write(&good, r#"{"cells": [{"cell_type": "code", "source": ["x"]}]}"#)?;
        fs::write(&bad, "{ not json")?;

        let pool = WorkerPool::new(2)?;
        let cache = DocumentCache::new(4);
        let notebooks = vec![
            Notebook::new(&bad),
            Notebook::new(&good),
            Notebook::new(dir.path().join("missing.ipynb")),
        ];
        let counts = pool.run(&notebooks, &cache, code_cells);
        assert_eq!(counts, vec![0, 1, 0]);
        Ok(())
    }

    #[test]
    fn test_stats_pass_remembers_loc() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("n.ipynb");
        fs::write(&path, r#"{"cells": [{"cell_type": "code", "source": ["a\n", "\n"]}]}"#)?;
        let nb = Notebook::new(&path);
        let cache = DocumentCache::disabled();
        let stats = notebook_stats(&nb, &cache)?;
        assert_eq!(stats.code_cells, 1);
        assert_eq!(stats.snippets.len(), 1);
        assert_eq!(nb.cached_loc(), Some(stats.loc));
        assert_eq!(stats.loc.blank, 1);
        Ok(())
    }
}
