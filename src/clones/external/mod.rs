// src/clones/external/mod.rs
//! Rebuilds a clone corpus from the output of an external token-based clone
//! detector.
//!
//! The detector reports clones as pairs of its own snippet ids; a stats file
//! maps each id to a snippet file (which encodes the notebook number and cell
//! index) and a line count. Pairs are merged transitively into clone groups,
//! and every group becomes one clone-index entry with a synthetic digest.

pub mod pairs;
pub mod stats;

use super::index::{CloneCorpus, CorpusBuilder};
use super::types::{numbered_notebook_name, NotebookHandle, SnippetIdentity};
use super::union_find::UnionFind;
use crate::error::{CloneError, Result};
use crate::lines::{self, LineResult};
use crate::repos::RepositoryMap;
use stats::{parse_stats_line, ToolSnippetId};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

/// Counters for what was read and what was skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub snippets: usize,
    pub notebooks: usize,
    pub skipped_stats_lines: usize,
    pub pair_lines: u64,
    pub skipped_pair_lines: u64,
}

/// One snippet from the stats file, by dense index.
#[derive(Debug, Clone, Copy)]
struct SnippetRecord {
    notebook: usize,
    index: usize,
    loc: usize,
}

/// Notebooks seen in the stats file, by dense index.
#[derive(Debug, Default)]
struct NotebookArena {
    handles: Vec<NotebookHandle>,
    by_number: HashMap<u64, usize>,
}

impl NotebookArena {
    fn resolve(&mut self, number: u64, repos: &RepositoryMap) -> usize {
        if let Some(&slot) = self.by_number.get(&number) {
            return slot;
        }
        let repository = repos.by_number(number);
        if repository.is_none() {
            debug!("No repository information for notebook number {number}");
        }
        let handle =
            NotebookHandle::new(numbered_notebook_name(number)).with_repository(repository);
        self.handles.push(handle);
        let slot = self.handles.len() - 1;
        self.by_number.insert(number, slot);
        slot
    }
}

/// Incrementally ingests a stats file and then a pair file.
///
/// Stats must be read before pairs: a pair whose ids are not in the stats
/// table is skipped.
#[derive(Debug)]
pub struct ExternalIngest<'a> {
    repos: &'a RepositoryMap,
    notebooks: NotebookArena,
    snippets: Vec<SnippetRecord>,
    by_tool_id: HashMap<ToolSnippetId, usize>,
    groups: UnionFind,
    summary: IngestSummary,
}

impl<'a> ExternalIngest<'a> {
    #[must_use]
    pub fn new(repos: &'a RepositoryMap) -> Self {
        Self {
            repos,
            notebooks: NotebookArena::default(),
            snippets: Vec::new(),
            by_tool_id: HashMap::new(),
            groups: UnionFind::default(),
            summary: IngestSummary::default(),
        }
    }

    /// Reads the stats file at `path`.
    ///
    /// # Errors
    /// Returns error if the file cannot be opened or read.
    pub fn load_stats(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path).map_err(|e| CloneError::io(e, path))?;
        self.read_stats(BufReader::new(file)).map_err(|e| match e {
            CloneError::Io { source, .. } => CloneError::io(source, path),
            other => other,
        })
    }

    /// Reads stats lines from any buffered source.
    ///
    /// # Errors
    /// Returns error only on read failure; bad lines are skipped.
    pub fn read_stats<R: BufRead>(&mut self, reader: R) -> Result<()> {
        lines::for_each_line(reader, |line| match line {
            Ok(line) if line.trim().is_empty() => {}
            Ok(line) => {
                self.add_stats_line(line);
            }
            Err(e) => {
                warn!("Line in stats file is not UTF-8 ({e}). Skipping line!");
                self.summary.skipped_stats_lines += 1;
            }
        })?;
        Ok(())
    }

    /// Adds one stats line. Returns false if it was skipped.
    pub fn add_stats_line(&mut self, line: &str) -> bool {
        let parsed = match parse_stats_line(line) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Invalid line \"{line}\" in stats file ({e}). Skipping line!");
                self.summary.skipped_stats_lines += 1;
                return false;
            }
        };
        if self.by_tool_id.contains_key(&parsed.id) {
            warn!("Duplicate snippet id ({}) in stats file. Skipping line!", parsed.id);
            self.summary.skipped_stats_lines += 1;
            return false;
        }
        let notebook = self.notebooks.resolve(parsed.notebook_number, self.repos);
        let slot = self.groups.push();
        self.snippets.push(SnippetRecord {
            notebook,
            index: parsed.snippet_index,
            loc: parsed.loc,
        });
        self.by_tool_id.insert(parsed.id, slot);
        true
    }

    /// Reads the pair file at `path` (plain text, or a zip archive).
    ///
    /// # Errors
    /// Returns error if the file cannot be opened or read.
    pub fn load_pairs(&mut self, path: &Path) -> Result<()> {
        pairs::for_each_line(path, |line| {
            self.add_decoded_pair_line(line);
        })?;
        Ok(())
    }

    /// Reads pair lines from any buffered source.
    ///
    /// # Errors
    /// Returns error only on read failure; bad lines are skipped.
    pub fn read_pairs<R: BufRead>(&mut self, reader: R) -> Result<()> {
        pairs::read_lines(reader, self.summary.pair_lines, &mut |line: LineResult| {
            self.add_decoded_pair_line(line);
        })?;
        Ok(())
    }

    fn add_decoded_pair_line(&mut self, line: LineResult<'_>) {
        match line {
            Ok(line) => {
                self.add_pair_line(line);
            }
            Err(e) => {
                warn!("Line in pair file is not UTF-8 ({e}). Skipping line!");
                self.summary.pair_lines += 1;
                self.summary.skipped_pair_lines += 1;
            }
        }
    }

    /// Merges the two snippets of one pair line. Returns false if skipped.
    pub fn add_pair_line(&mut self, line: &str) -> bool {
        self.summary.pair_lines += 1;
        let (a, b) = match pairs::parse_pair_line(line) {
            Ok(ids) => ids,
            Err(e) => {
                warn!("Invalid line \"{line}\" in pair file ({e}). Skipping line!");
                self.summary.skipped_pair_lines += 1;
                return false;
            }
        };
        let (Some(&x), Some(&y)) = (self.by_tool_id.get(&a), self.by_tool_id.get(&b)) else {
            for id in [a, b] {
                if !self.by_tool_id.contains_key(&id) {
                    warn!("ID for nonexistent snippet ({id}) found on line \"{line}\". Skipping clone pair!");
                }
            }
            self.summary.skipped_pair_lines += 1;
            return false;
        };
        self.groups.union(x, y);
        true
    }

    #[must_use]
    pub fn summary(&self) -> IngestSummary {
        IngestSummary {
            snippets: self.snippets.len(),
            notebooks: self.notebooks.handles.len(),
            ..self.summary
        }
    }

    /// Turns the clone groups into a corpus.
    ///
    /// Groups are numbered from 1 in order of their first member; group `k`
    /// gets digest `k` as 32 uppercase hex digits and the median LOC of its
    /// members. Notebooks appear in stats order, their snippets by index.
    #[must_use]
    #[allow(clippy::indexing_slicing)]
    pub fn finish(mut self) -> CloneCorpus {
        let summary = self.summary();
        let mut per_notebook: Vec<Vec<(usize, SnippetIdentity)>> =
            vec![Vec::new(); self.notebooks.handles.len()];

        for (ordinal, members) in self.groups.groups().into_iter().enumerate() {
            let mut locs: Vec<usize> = members.iter().map(|&m| self.snippets[m].loc).collect();
            let loc = median_loc(&mut locs);
            if locs.first() != locs.last() {
                debug!(
                    "Clone group {} has LOC {:?}; using median {loc}",
                    ordinal + 1,
                    locs
                );
            }
            let identity = SnippetIdentity::new(synthetic_digest(ordinal + 1), loc);
            for &m in &members {
                let record = self.snippets[m];
                per_notebook[record.notebook].push((record.index, identity.clone()));
            }
        }

        let mut builder = CorpusBuilder::new();
        for (handle, mut snippets) in self.notebooks.handles.into_iter().zip(per_notebook) {
            snippets.sort_by_key(|(index, _)| *index);
            builder.add_indexed(handle, snippets);
        }
        info!(
            "Ingested {} snippets in {} notebooks ({} stats lines and {} of {} pair lines skipped)",
            summary.snippets,
            summary.notebooks,
            summary.skipped_stats_lines,
            summary.skipped_pair_lines,
            summary.pair_lines
        );
        builder.finish()
    }
}

/// Loads the stats and pair files and builds the corpus.
///
/// # Errors
/// Returns error if either file cannot be read.
pub fn ingest(stats_file: &Path, pair_file: &Path, repos: &RepositoryMap) -> Result<CloneCorpus> {
    let mut ingest = ExternalIngest::new(repos);
    ingest.load_stats(stats_file)?;
    info!("Read {} snippets from {}", ingest.snippets.len(), stats_file.display());
    ingest.load_pairs(pair_file)?;
    Ok(ingest.finish())
}

/// Median of `values` as `(v[n/2] + v[(n-1)/2]) / 2` on the sorted values.
///
/// Sorts `values` in place. Returns 0 for an empty slice.
#[allow(clippy::indexing_slicing)]
pub fn median_loc(values: &mut [usize]) -> usize {
    if values.is_empty() {
        return 0;
    }
    values.sort_unstable();
    let n = values.len();
    let (hi, lo) = (values[n / 2], values[(n - 1) / 2]);
    lo + (hi - lo) / 2
}

/// The synthetic digest of clone group `ordinal`.
#[must_use]
pub fn synthetic_digest(ordinal: usize) -> String {
    format!("{ordinal:032X}")
}
