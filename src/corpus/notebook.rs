// src/corpus/notebook.rs
//! `.ipynb` documents and the per-notebook aggregates computed from them.

use super::cache::DocumentCache;
use crate::clones::canonical;
use crate::clones::types::{NotebookHandle, RepoName, SnippetIdentity};
use crate::error::{CloneError, Result};
use parking_lot::Mutex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// Cell source: either one string or a list of lines.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CellSource {
    Text(String),
    Lines(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct RawCell {
    cell_type: Option<String>,
    source: Option<CellSource>,
    // Pre-v4 notebooks keep code cell text under `input`.
    input: Option<CellSource>,
}

#[derive(Debug, Deserialize)]
struct RawWorksheet {
    #[serde(default)]
    cells: Vec<RawCell>,
}

#[derive(Debug, Deserialize)]
struct RawNotebook {
    #[serde(default)]
    cells: Vec<RawCell>,
    #[serde(default)]
    worksheets: Vec<RawWorksheet>,
}

/// Line counts over all code cells of a notebook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocSummary {
    pub total: usize,
    pub non_blank: usize,
    pub blank: usize,
}

impl LocSummary {
    fn add_lines<S: AsRef<str>>(&mut self, lines: &[S]) {
        self.total += lines.len();
        let non_blank = canonical::non_blank_lines(lines);
        self.non_blank += non_blank;
        self.blank += lines.len() - non_blank;
    }
}

/// A parsed notebook: the source lines of each code cell, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    code_cells: Vec<Vec<String>>,
}

impl Document {
    /// Parses notebook JSON. `origin` only labels warnings.
    ///
    /// # Errors
    /// Returns `CloneError::Json` if `text` is not a notebook document.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let raw: RawNotebook = serde_json::from_str(text)?;
        let cells = raw
            .cells
            .into_iter()
            .chain(raw.worksheets.into_iter().flat_map(|w| w.cells));

        let mut code_cells = Vec::new();
        for cell in cells {
            match cell.cell_type.as_deref() {
                Some("code") => {}
                Some(_) => continue,
                None => {
                    warn!("Key \"cell_type\" is missing in a cell in {}", origin.display());
                    continue;
                }
            }
            code_cells.push(cell_lines(cell, origin));
        }
        Ok(Self { code_cells })
    }

    /// Reads and parses the notebook at `path`.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| CloneError::io(e, path))?;
        Self::parse(&text, path).map_err(|e| CloneError::Notebook {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    #[must_use]
    pub fn code_cells(&self) -> &[Vec<String>] {
        &self.code_cells
    }

    #[must_use]
    pub fn code_cell_count(&self) -> usize {
        self.code_cells.len()
    }

    /// The identity of every code cell, in order.
    #[must_use]
    pub fn snippet_identities(&self) -> Vec<SnippetIdentity> {
        self.code_cells.iter().map(|c| canonical::identify(c)).collect()
    }

    #[must_use]
    pub fn loc(&self) -> LocSummary {
        let mut summary = LocSummary::default();
        for cell in &self.code_cells {
            summary.add_lines(cell);
        }
        summary
    }
}

/// Source lines of a cell, each terminated by a newline.
///
/// A list source gets a newline appended to its last line. A string source
/// is split on newlines with trailing empty pieces dropped.
fn cell_lines(cell: RawCell, origin: &Path) -> Vec<String> {
    let Some(source) = cell.source.or(cell.input) else {
        warn!(
            "Keys \"source\" and \"input\" are missing in a cell in {}",
            origin.display()
        );
        return Vec::new();
    };
    match source {
        CellSource::Lines(mut lines) => {
            if let Some(last) = lines.last_mut() {
                last.push('\n');
            }
            lines
        }
        CellSource::Text(text) => {
            let mut pieces: Vec<&str> = text.split('\n').collect();
            while pieces.last().is_some_and(|p| p.is_empty()) {
                pieces.pop();
            }
            pieces.into_iter().map(|p| format!("{p}\n")).collect()
        }
    }
}

/// One notebook file of the corpus.
///
/// The parsed document is not kept here; it lives in the shared
/// [`DocumentCache`] and is re-read when evicted. The line-count summary is
/// computed once and remembered.
#[derive(Debug)]
pub struct Notebook {
    path: PathBuf,
    handle: NotebookHandle,
    loc: Mutex<Option<LocSummary>>,
}

impl Notebook {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map_or_else(|| path.to_string_lossy(), |n| n.to_string_lossy())
            .into_owned();
        Self {
            handle: NotebookHandle::new(name),
            path,
            loc: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.handle.name
    }

    #[must_use]
    pub fn handle(&self) -> &NotebookHandle {
        &self.handle
    }

    pub fn set_repository(&mut self, repository: Option<RepoName>) {
        self.handle.repository = repository;
    }

    /// The parsed document, from `cache` when present.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn document(&self, cache: &DocumentCache) -> Result<Arc<Document>> {
        cache.get_or_load(&self.path, || Document::read(&self.path))
    }

    /// The notebook's line counts, computed on first call.
    ///
    /// # Errors
    /// Returns error if the document is needed and cannot be loaded. A failed
    /// attempt is not remembered.
    pub fn loc(&self, cache: &DocumentCache) -> Result<LocSummary> {
        let mut slot = self.loc.lock();
        if let Some(summary) = *slot {
            return Ok(summary);
        }
        let summary = self.document(cache)?.loc();
        *slot = Some(summary);
        Ok(summary)
    }

    /// Remembers a summary computed elsewhere from this notebook's document.
    pub fn remember_loc(&self, summary: LocSummary) {
        let mut slot = self.loc.lock();
        if slot.is_none() {
            *slot = Some(summary);
        }
    }

    #[must_use]
    pub fn cached_loc(&self) -> Option<LocSummary> {
        *self.loc.lock()
    }
}
