// src/report/mod.rs
//! Writes the CSV report files.
//!
//! Every report lands in `<dir>/<prefix><suffix>.csv`, where the suffix is
//! shared by all reports of one run.

pub mod csv;

use crate::clones::{connectivity, index::CloneCorpus};
use crate::corpus::{CodeCellRow, LocRow};
use crate::error::{CloneError, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Which clone reports to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneReportSet {
    /// All clone reports: hashes per file, files per hash, frequencies,
    /// connections and clone line counts.
    Full,
    /// Only the statistics: frequencies, connections and clone line counts.
    Statistics,
}

/// Writes report files into one directory with one shared suffix.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
    suffix: String,
}

impl ReportWriter {
    /// # Errors
    /// Returns error if `dir` cannot be created.
    pub fn new(dir: impl Into<PathBuf>, suffix: impl Into<String>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| CloneError::io(e, &dir))?;
        Ok(Self {
            dir,
            suffix: suffix.into(),
        })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the report named `prefix`.
    #[must_use]
    pub fn path_for(&self, prefix: &str) -> PathBuf {
        self.dir.join(format!("{prefix}{}.csv", self.suffix))
    }

    /// Creates the report `prefix` and fills it with `render`.
    ///
    /// # Errors
    /// Returns error if the file cannot be created or written.
    pub fn write<F>(&self, prefix: &str, render: F) -> Result<PathBuf>
    where
        F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
    {
        let path = self.path_for(prefix);
        let file = File::create(&path).map_err(|e| CloneError::io(e, &path))?;
        let mut out = BufWriter::new(file);
        render(&mut out)
            .and_then(|()| out.flush())
            .map_err(|e| CloneError::io(e, &path))?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }

    /// Writes the clone reports for `corpus`.
    ///
    /// # Errors
    /// Returns error on the first report that cannot be written.
    pub fn write_clone_reports(&self, corpus: &CloneCorpus, set: CloneReportSet) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        if set == CloneReportSet::Full {
            written.push(self.write("file2hashesA", |w| csv::file2hashes(w, corpus, false))?);
            written.push(self.write("file2hashesNE", |w| csv::file2hashes(w, corpus, true))?);
            written.push(self.write("hash2filesA", |w| csv::hash2files(w, corpus))?);
        }

        let frequencies = connectivity::clone_frequencies(corpus);
        written.push(self.write("cloneFrequency", |w| csv::clone_frequency(w, &frequencies))?);

        let connections = connectivity::connections(corpus);
        written.push(self.write("connections", |w| csv::connections(w, &connections))?);

        written.push(self.write("cloneLoc", |w| csv::clone_loc(w, corpus))?);
        info!(
            "Clone reports for {} notebooks written to {}",
            corpus.notebook_count(),
            self.dir.display()
        );
        Ok(written)
    }

    /// # Errors
    /// Returns error if the report cannot be written.
    pub fn write_loc(&self, rows: &[LocRow]) -> Result<PathBuf> {
        self.write("loc", |w| csv::loc(w, rows))
    }

    /// # Errors
    /// Returns error if the report cannot be written.
    pub fn write_code_cells(&self, rows: &[CodeCellRow]) -> Result<PathBuf> {
        self.write("code_cells", |w| csv::code_cells(w, rows))
    }
}
